//! Serde adapters that default loosely typed venue fields.
//!
//! Fixtures and upstream payloads sometimes carry `null` lists, stray
//! non-string entries or fractional counts. These adapters drop what they
//! cannot read so one odd record never fails a whole fixture.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::{Amenity, ReviewHighlight};

/// A value of the expected shape, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Valid(T),
    #[serde(deserialize_with = "skip")]
    Invalid,
}

fn skip<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(())
}

fn list<'de, D, T>(deserializer: D, field: &str) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let Some(raw) = Option::<Entry<Vec<Entry<T>>>>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let Entry::Valid(entries) = raw else {
        log::debug!("ignoring non-list {field} value");
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Valid(value) => Some(value),
            Entry::Invalid => {
                log::debug!("dropping malformed {field} entry");
                None
            }
        })
        .collect())
}

/// String list; `null` and non-string entries are dropped.
pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    list(deserializer, "text")
}

/// Amenity list; unknown tags and non-string entries are dropped.
pub(crate) fn amenities<'de, D>(deserializer: D) -> Result<Vec<Amenity>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Vec<String> = list(deserializer, "amenity")?;
    Ok(Amenity::parse_lenient(tags))
}

pub(crate) fn highlights<'de, D>(deserializer: D) -> Result<Vec<ReviewHighlight>, D::Error>
where
    D: Deserializer<'de>,
{
    list(deserializer, "review highlight")
}

/// Rating count; fractional values are rounded and anything else is absent.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Entry<f64>>::deserialize(deserializer)?;
    Ok(raw.and_then(|entry| match entry {
        Entry::Valid(value) => whole_count(value),
        Entry::Invalid => {
            log::debug!("ignoring non-numeric rating count");
            None
        }
    }))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "finite non-negative value is clamped to the u32 range first"
)]
fn whole_count(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0).then(|| value.round().min(f64::from(u32::MAX)) as u32)
}
