//! Offline venue source backed by a JSON fixture.
//!
//! The fixture is a JSON array of places in the camelCase wire format. The
//! source is used when no API key is configured, when demo mode is forced,
//! and as the fallback after a failed live fetch.

use std::io::BufReader;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use kidspot_core::Place;
use kidspot_core::geometry::haversine_distance_m;
use kidspot_core::text::normalize;
use thiserror::Error;

use crate::places::{PlaceSource, PlacesError, SearchQuery};

/// Errors raised while loading a demo fixture.
#[derive(Debug, Error)]
pub enum DemoSourceError {
    /// The fixture could not be opened.
    #[error("failed to open demo fixture at {path}")]
    Open {
        /// Fixture path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The fixture is not a JSON array of places.
    #[error("failed to parse demo fixture at {path}")]
    Parse {
        /// Fixture path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory venue list with keyword and radius selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoPlaceSource {
    places: Vec<Place>,
}

impl DemoPlaceSource {
    /// Wrap an existing venue list.
    #[must_use]
    pub const fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Load a fixture from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DemoSourceError`] when the file cannot be opened or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, DemoSourceError> {
        let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            DemoSourceError::Open {
                path: path.to_owned(),
                source,
            }
        })?;
        let places: Vec<Place> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                DemoSourceError::Parse {
                    path: path.to_owned(),
                    source,
                }
            })?;
        log::debug!("loaded {} demo places from {path}", places.len());
        Ok(Self::new(places))
    }

    /// All venues in fixture order.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Select venues for a search.
    ///
    /// A keyword keeps venues whose normalised name, address, description or
    /// any category contains it. With a centre, located venues are limited
    /// to the first radius in `radii_m` that contains any of them (all
    /// located venues when none does), sorted nearest first, followed by the
    /// venues without coordinates. An empty `radii_m` keeps every located
    /// venue.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use kidspot_core::Place;
    /// use kidspot_data::demo::DemoPlaceSource;
    ///
    /// let source = DemoPlaceSource::new(vec![
    ///     Place::new("far", "Parque Longe").with_location(Coord { x: 0.0, y: 0.05 }),
    ///     Place::new("near", "Parque Perto").with_location(Coord { x: 0.0, y: 0.001 }),
    ///     Place::new("loose", "Parque Sem Mapa"),
    /// ]);
    /// let picked = source.select(Some("parque"), Some(Coord { x: 0.0, y: 0.0 }), &[500, 800]);
    /// let ids: Vec<_> = picked.iter().map(|p| p.id.as_str()).collect();
    /// assert_eq!(ids, ["near", "loose"]);
    /// ```
    #[must_use]
    pub fn select(
        &self,
        keyword: Option<&str>,
        center: Option<Coord<f64>>,
        radii_m: &[u32],
    ) -> Vec<Place> {
        let needle = keyword.map(str::trim).filter(|k| !k.is_empty()).map(normalize);
        let matching = self
            .places
            .iter()
            .filter(|place| needle.as_deref().is_none_or(|n| matches_keyword(place, n)));

        let Some(origin) = center else {
            return matching.cloned().collect();
        };

        let (located, unlocated): (Vec<&Place>, Vec<&Place>) =
            matching.partition(|place| place.has_valid_location());
        let measured: Vec<(f64, &Place)> = located
            .into_iter()
            .filter_map(|place| {
                place
                    .valid_location()
                    .map(|at| (haversine_distance_m(origin, at), place))
            })
            .collect();

        let mut selected = radii_m
            .iter()
            .map(|radius| {
                measured
                    .iter()
                    .filter(|(distance, _)| *distance <= f64::from(*radius))
                    .copied()
                    .collect::<Vec<_>>()
            })
            .find(|within| !within.is_empty())
            .unwrap_or_else(|| measured.clone());
        selected.sort_by(|a, b| a.0.total_cmp(&b.0));

        selected
            .into_iter()
            .map(|(_, place)| place)
            .chain(unlocated)
            .cloned()
            .collect()
    }
}

fn matches_keyword(place: &Place, needle: &str) -> bool {
    [
        Some(place.name.as_str()),
        place.address.as_deref(),
        place.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .chain(place.categories.iter().map(String::as_str))
    .any(|text| normalize(text).contains(needle))
}

#[async_trait]
impl PlaceSource for DemoPlaceSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Place>, PlacesError> {
        Ok(self.select(query.keyword(), Some(query.center()), &[query.radius_m()]))
    }
}
