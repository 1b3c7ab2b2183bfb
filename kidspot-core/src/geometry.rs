//! Great-circle distance between WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention used across the crate:
//! `x = longitude`, `y = latitude`, both in degrees.

use geo::Coord;

/// Mean Earth radius in metres used by [`haversine_distance_m`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Return the haversine distance between `origin` and `target` in metres.
///
/// The intermediate haversine term is clamped to `0.0..=1.0` so rounding
/// noise near antipodal points cannot produce `NaN`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kidspot_core::geometry::haversine_distance_m;
///
/// let se = Coord { x: -46.633308, y: -23.55052 };
/// let paulista = Coord { x: -46.6559, y: -23.5614 };
/// let metres = haversine_distance_m(se, paulista);
/// assert!((2_400.0..2_700.0).contains(&metres));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "great-circle distance is inherently floating-point"
)]
pub fn haversine_distance_m(origin: Coord<f64>, target: Coord<f64>) -> f64 {
    let delta_lat = (target.y - origin.y).to_radians();
    let delta_lng = (target.x - origin.x).to_radians();
    let lat1 = origin.y.to_radians();
    let lat2 = target.y.to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let hav = sin_lat.mul_add(sin_lat, lat1.cos() * lat2.cos() * sin_lng * sin_lng);
    let clamped = hav.clamp(0.0, 1.0);
    let central_angle = 2.0 * clamped.sqrt().atan2((1.0 - clamped).max(0.0).sqrt());
    EARTH_RADIUS_METERS * central_angle
}

/// Return `coord` when both components are finite.
#[must_use]
pub fn finite_coord(coord: Coord<f64>) -> Option<Coord<f64>> {
    (coord.x.is_finite() && coord.y.is_finite()).then_some(coord)
}

/// Serde adapter encoding an optional [`Coord`] as `{ "lat": .., "lng": .. }`.
#[cfg(feature = "serde")]
pub(crate) mod lat_lng {
    use geo::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLng {
        lat: f64,
        lng: f64,
    }

    #[expect(
        clippy::ref_option,
        reason = "serde `with` adapters receive a reference to the field"
    )]
    pub(crate) fn serialize<S>(value: &Option<Coord<f64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value
            .map(|coord| LatLng {
                lat: coord.y,
                lng: coord.x,
            })
            .serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Coord<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<LatLng>::deserialize(deserializer)?;
        Ok(raw.map(|point| Coord {
            x: point.lng,
            y: point.lat,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE_M: f64 = 1.0;

    #[rstest]
    fn identical_points_are_zero_apart() {
        let point = Coord { x: -46.6, y: -23.5 };
        assert!(haversine_distance_m(point, point).abs() < f64::EPSILON);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tests compare distances")]
    fn one_degree_of_latitude_is_about_111_km() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let north = Coord { x: 0.0, y: 1.0 };
        let metres = haversine_distance_m(origin, north);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((metres - expected).abs() < TOLERANCE_M, "got {metres}");
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tests compare distances")]
    fn antipodal_points_stay_finite() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let antipode = Coord { x: 180.0, y: 0.0 };
        let metres = haversine_distance_m(origin, antipode);
        assert!(metres.is_finite());
        let half_circumference = EARTH_RADIUS_METERS * std::f64::consts::PI;
        assert!((metres - half_circumference).abs() < TOLERANCE_M);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = Coord { x: -46.63, y: -23.55 };
        let b = Coord { x: -46.70, y: -23.60 };
        let forward = haversine_distance_m(a, b);
        let backward = haversine_distance_m(b, a);
        assert!((forward - backward).abs() < 1e-6);
    }

    #[rstest]
    fn finite_coord_rejects_nan() {
        assert!(finite_coord(Coord { x: f64::NAN, y: 0.0 }).is_none());
        assert!(finite_coord(Coord { x: 0.0, y: f64::INFINITY }).is_none());
        assert!(finite_coord(Coord { x: 1.0, y: 2.0 }).is_some());
    }
}
