//! Display chips derived from amenities and description keywords.
//!
//! Chips are independent of review analysis: a chip appears when the place
//! lists the matching amenity or its text contains one of the chip keywords.

use crate::lexicon::{KeywordList, aggregate_text};
use crate::{Amenity, Place};

struct ChipRule {
    label: &'static str,
    keywords: &'static [&'static str],
    amenity: Option<Amenity>,
}

const CHIP_RULES: [ChipRule; 6] = [
    ChipRule {
        label: "Espaco kids",
        keywords: &["espaco kids", "area kids", "brinquedoteca"],
        amenity: Some(Amenity::Playroom),
    },
    ChipRule {
        label: "Menu infantil",
        keywords: &["menu infantil", "menu kids"],
        amenity: Some(Amenity::KidsMenu),
    },
    ChipRule {
        label: "Fraldario",
        keywords: &["fraldario", "troca de fraldas"],
        amenity: Some(Amenity::ChangingTable),
    },
    ChipRule {
        label: "Cadeirao",
        keywords: &["cadeirao", "cadeira de bebe"],
        amenity: None,
    },
    ChipRule {
        label: "Area cercada",
        keywords: &["area cercada", "espaco cercado"],
        amenity: Some(Amenity::FencedArea),
    },
    ChipRule {
        label: "Monitores",
        keywords: &["monitoria", "monitores", "monitor infantil"],
        amenity: Some(Amenity::Monitors),
    },
];

/// Return the feature chips for `place` in fixed display order.
///
/// # Examples
/// ```
/// use kidspot_core::{Amenity, Place, feature_chips};
///
/// let place = Place::new("p1", "Cafe")
///     .with_description("Temos cadeirão e fraldário")
///     .with_amenities([Amenity::Playroom]);
/// assert_eq!(feature_chips(&place), vec!["Espaco kids", "Fraldario", "Cadeirao"]);
/// ```
#[must_use]
pub fn feature_chips(place: &Place) -> Vec<&'static str> {
    let haystack = aggregate_text(place);
    CHIP_RULES
        .iter()
        .filter(|rule| {
            rule.amenity.is_some_and(|amenity| place.has_amenity(amenity))
                || KeywordList::new(rule.keywords).matches_normalized(&haystack)
        })
        .map(|rule| rule.label)
        .collect()
}
