//! Venue records and their review material.

use geo::Coord;

use crate::geometry::finite_coord;
use crate::{AgePreference, Amenity};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// A structured review excerpt with optional rating and timestamp.
///
/// # Examples
/// ```
/// use kidspot_core::ReviewHighlight;
///
/// let review = ReviewHighlight::new("Otimo espaco kids")
///     .with_rating(5.0)
///     .with_created_at(1_700_000_000_000);
/// assert_eq!(review.rating, Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReviewHighlight {
    /// Source identifier, when the upstream provides one.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    /// Free-form review text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: String,
    /// Star rating in `1.0..=5.0`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rating: Option<f64>,
    /// Creation time in epoch milliseconds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub created_at: Option<EpochMillis>,
}

impl ReviewHighlight {
    /// Build a highlight carrying only text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach a star rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attach a creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: EpochMillis) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A venue that may suit families.
///
/// Coordinates use `x = longitude` and `y = latitude`. Optional fields
/// degrade to "no evidence" during scoring.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kidspot_core::{Amenity, Place};
///
/// let place = Place::new("p1", "Cafe Quintal")
///     .with_location(Coord { x: -46.6, y: -23.5 })
///     .with_categories(["cafe"])
///     .with_amenities([Amenity::Playground]);
///
/// assert!(place.has_valid_location());
/// assert!(place.has_amenity(Amenity::Playground));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Place {
    /// Stable identity used for deduplication.
    pub id: String,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Free-text description.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Open-vocabulary category tags such as `restaurant`.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::lenient::strings")
    )]
    pub categories: Vec<String>,
    /// Geographic position, if known.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "coords",
            default,
            with = "crate::geometry::lat_lng",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub location: Option<Coord<f64>>,
    /// Postal address.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub address: Option<String>,
    /// Contact phone number.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub phone: Option<String>,
    /// Website URL.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub website: Option<String>,
    /// Upstream Google place identifier.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub google_place_id: Option<String>,
    /// External rating in `0.0..=5.0`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub google_rating: Option<f64>,
    /// Number of external ratings.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::count",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub google_user_ratings_total: Option<u32>,
    /// Internal rating used when no external rating exists.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub kidspot_rating: Option<f64>,
    /// Human-readable opening hours, one entry per day.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::strings",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub opening_hours: Vec<String>,
    /// Structured amenities. Unknown tags are dropped on deserialisation.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::lenient::amenities")
    )]
    pub amenities: Vec<Amenity>,
    /// Age band the venue targets.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub age_range: Option<AgePreference>,
    /// Cuisine tags for food venues.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::strings",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub cuisine: Vec<String>,
    /// Photo references.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::strings",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub photos: Vec<String>,
    /// Unstructured review excerpts without rating or timestamp.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::strings",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub review_snippets: Vec<String>,
    /// Structured review excerpts.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::lenient::highlights",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub review_highlights: Vec<ReviewHighlight>,
}

impl Place {
    /// Construct a `Place` with an identity and name and no other data.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the category tags.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the geographic position.
    #[must_use]
    pub fn with_location(mut self, location: Coord<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Replace the amenities.
    #[must_use]
    pub fn with_amenities<I>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = Amenity>,
    {
        self.amenities = amenities.into_iter().collect();
        self
    }

    /// Set the external rating and its count.
    #[must_use]
    pub fn with_google_rating(mut self, rating: f64, total: u32) -> Self {
        self.google_rating = Some(rating);
        self.google_user_ratings_total = Some(total);
        self
    }

    /// Replace the unstructured review snippets.
    #[must_use]
    pub fn with_review_snippets<I, S>(mut self, snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.review_snippets = snippets.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the structured review highlights.
    #[must_use]
    pub fn with_review_highlights<I>(mut self, highlights: I) -> Self
    where
        I: IntoIterator<Item = ReviewHighlight>,
    {
        self.review_highlights = highlights.into_iter().collect();
        self
    }

    /// Report whether the venue lists `amenity`.
    #[must_use]
    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        self.amenities.contains(&amenity)
    }

    /// Return the position when both components are finite.
    #[must_use]
    pub fn valid_location(&self) -> Option<Coord<f64>> {
        self.location.and_then(finite_coord)
    }

    /// Report whether the venue has a finite position.
    #[must_use]
    pub fn has_valid_location(&self) -> bool {
        self.valid_location().is_some()
    }

    /// Rating used for ordering: external first, then internal.
    #[must_use]
    pub fn effective_rating(&self) -> Option<f64> {
        self.google_rating
            .filter(|rating| rating.is_finite())
            .or_else(|| self.kidspot_rating.filter(|rating| rating.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn non_finite_location_is_invalid() {
        let place = Place::new("p1", "Nowhere").with_location(Coord {
            x: f64::NAN,
            y: -23.5,
        });
        assert!(!place.has_valid_location());
        assert!(Place::new("p2", "Unplaced").valid_location().is_none());
    }

    #[rstest]
    fn effective_rating_falls_back_to_internal() {
        let mut place = Place::new("p1", "Cafe");
        assert_eq!(place.effective_rating(), None);
        place.kidspot_rating = Some(4.1);
        assert_eq!(place.effective_rating(), Some(4.1));
        place.google_rating = Some(4.7);
        assert_eq!(place.effective_rating(), Some(4.7));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_camel_case_fixture_and_drops_unknown_amenities() {
        let json = r#"{
            "id": "p1",
            "name": "Restaurante Familia Feliz",
            "categories": ["restaurant"],
            "coords": { "lat": -23.5, "lng": -46.6 },
            "amenities": ["playroom", "jacuzzi", "kids_menu"],
            "googleRating": 4.5,
            "googleUserRatingsTotal": 120,
            "reviewHighlights": [{ "text": "Otimo", "rating": 5, "createdAt": 1700000000000 }]
        }"#;

        let place: Place = serde_json::from_str(json).expect("fixture should parse");

        assert_eq!(place.amenities, vec![Amenity::Playroom, Amenity::KidsMenu]);
        assert_eq!(place.location, Some(Coord { x: -46.6, y: -23.5 }));
        assert_eq!(place.google_user_ratings_total, Some(120));
        assert_eq!(place.review_highlights.len(), 1);
        assert_eq!(
            place.review_highlights.first().and_then(|r| r.created_at),
            Some(1_700_000_000_000)
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn loosely_typed_record_defaults_instead_of_failing() {
        let json = r#"{
            "id": "p2",
            "name": "Parque Solto",
            "categories": null,
            "amenities": ["playground", 42, null],
            "reviewSnippets": null,
            "reviewHighlights": [{ "text": "Amplo" }, "sem estrutura"],
            "googleUserRatingsTotal": 120.0,
            "photos": "foto.jpg"
        }"#;

        let place: Place = serde_json::from_str(json).expect("loose record should parse");

        assert!(place.categories.is_empty());
        assert_eq!(place.amenities, vec![Amenity::Playground]);
        assert!(place.review_snippets.is_empty());
        assert_eq!(place.review_highlights, vec![ReviewHighlight::new("Amplo")]);
        assert_eq!(place.google_user_ratings_total, Some(120));
        assert!(place.photos.is_empty());
    }
}
