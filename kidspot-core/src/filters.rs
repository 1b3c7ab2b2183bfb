//! Search preferences chosen by the family.
//!
//! Only the age band feeds scoring directly; the radius shapes fetching and
//! the remaining fields are display filters owned by the caller. Filters are
//! always passed explicitly, there is no ambient filter state.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Amenity;

/// Children's age band.
///
/// # Examples
/// ```
/// use kidspot_core::AgePreference;
///
/// assert_eq!("0-5".parse::<AgePreference>(), Ok(AgePreference::UpToFive));
/// assert_eq!(AgePreference::FivePlus.as_str(), "5+");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgePreference {
    /// Babies and toddlers up to five years old.
    #[cfg_attr(feature = "serde", serde(rename = "0-5"))]
    UpToFive,
    /// Children older than five.
    #[cfg_attr(feature = "serde", serde(rename = "5+"))]
    FivePlus,
    /// No age preference.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "all"))]
    All,
}

impl AgePreference {
    /// Return the wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpToFive => "0-5",
            Self::FivePlus => "5+",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for AgePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0-5" => Ok(Self::UpToFive),
            "5+" => Ok(Self::FivePlus),
            "all" => Ok(Self::All),
            _ => Err(format!("unknown age preference '{s}'")),
        }
    }
}

/// Preferred venue environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Environment {
    /// Enclosed venues.
    Indoor,
    /// Open-air venues.
    Outdoor,
    /// Venues with both.
    Mixed,
    /// No preference.
    #[default]
    Any,
}

/// Category restriction applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// A single named category such as `restaurant`.
    Only(String),
}

/// Errors returned by [`Filters::new`] and [`Filters::with_radius_km`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FiltersError {
    /// The radius was zero, negative or not finite.
    #[error("search radius must be a positive number of kilometres, got {radius_km}")]
    InvalidRadius {
        /// Rejected radius.
        radius_km: f64,
    },
}

/// Default search radius in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// User-selected search preferences.
///
/// # Examples
/// ```
/// use kidspot_core::{AgePreference, Filters};
///
/// # fn main() -> Result<(), kidspot_core::FiltersError> {
/// let filters = Filters::new(4.0)?.with_age(AgePreference::UpToFive);
/// assert_eq!(filters.radius_km(), 4.0);
/// assert!(Filters::new(-1.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Filters {
    radius_km: f64,
    /// Children's age band.
    pub children_age: AgePreference,
    /// Preferred environment.
    pub environment: Environment,
    /// Amenities the family wants.
    pub amenities: BTreeSet<Amenity>,
    /// Desired cuisine tags.
    pub cuisine: Vec<String>,
    /// Only show venues open right now.
    pub open_now: bool,
    /// Category restriction.
    pub category: CategoryFilter,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            children_age: AgePreference::All,
            environment: Environment::Any,
            amenities: BTreeSet::new(),
            cuisine: Vec::new(),
            open_now: false,
            category: CategoryFilter::All,
        }
    }
}

impl Filters {
    /// Validate the radius and construct default filters around it.
    ///
    /// # Errors
    /// Returns [`FiltersError::InvalidRadius`] when `radius_km` is not a
    /// positive finite number.
    pub fn new(radius_km: f64) -> Result<Self, FiltersError> {
        Self::default().with_radius_km(radius_km)
    }

    /// Replace the radius after validating it.
    ///
    /// # Errors
    /// Returns [`FiltersError::InvalidRadius`] when `radius_km` is not a
    /// positive finite number.
    pub fn with_radius_km(mut self, radius_km: f64) -> Result<Self, FiltersError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(FiltersError::InvalidRadius { radius_km });
        }
        self.radius_km = radius_km;
        Ok(self)
    }

    /// Search radius in kilometres.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Search radius in metres.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "unit conversion")]
    pub fn radius_m(&self) -> f64 {
        self.radius_km * 1_000.0
    }

    /// Set the age band while returning `self` for chaining.
    #[must_use]
    pub const fn with_age(mut self, age: AgePreference) -> Self {
        self.children_age = age;
        self
    }

    /// Toggle an amenity in the desired set.
    pub fn toggle_amenity(&mut self, amenity: Amenity) {
        if !self.amenities.remove(&amenity) {
            self.amenities.insert(amenity);
        }
    }
}
