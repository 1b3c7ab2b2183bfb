//! Score results and the tunable constants behind them.

use std::time::Duration;

use crate::AgePreference;

/// Coarse family-fitness bucket evaluated before the numeric score.
///
/// The derived ordering puts `A` first, so sorting ascending yields the
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityLayer {
    /// Venue dedicated to children.
    A,
    /// Food venue with strong kids-area evidence.
    B,
    /// Some family evidence.
    C,
    /// No family evidence.
    #[default]
    D,
}

impl PriorityLayer {
    /// Return the single-letter identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for PriorityLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative label summarising a scored venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Badge {
    /// Venue dedicated to children.
    #[cfg_attr(feature = "serde", serde(rename = "Infantil dedicado"))]
    DedicatedKids,
    /// Strong kids-area evidence.
    #[cfg_attr(feature = "serde", serde(rename = "Area kids forte"))]
    StrongKidsArea,
    /// Supervising staff.
    #[cfg_attr(feature = "serde", serde(rename = "Monitores"))]
    Monitors,
    /// Playground.
    #[cfg_attr(feature = "serde", serde(rename = "Parquinho"))]
    Playground,
}

impl Badge {
    /// Return the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DedicatedKids => "Infantil dedicado",
            Self::StrongKidsArea => "Area kids forte",
            Self::Monitors => "Monitores",
            Self::Playground => "Parquinho",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of scoring one place against one set of filters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PlaceScoreDetails {
    /// Final score in `0.0..=100.0`.
    pub score: f64,
    /// Review-derived share of the score, before penalties and clamping.
    pub review_bonus: f64,
    /// Labels of mention categories found in reviews.
    pub review_chips: Vec<String>,
    /// Priority tier.
    pub priority_layer: PriorityLayer,
    /// Badges in display order.
    pub badges: Vec<Badge>,
    /// Exclude the venue from results.
    pub should_hide: bool,
}

impl PlaceScoreDetails {
    /// The terminal result for disqualified venues.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            should_hide: true,
            ..Self::default()
        }
    }
}

/// Which age band a bonus targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusFlavor {
    /// Younger children; doubled for `0-5`.
    Small,
    /// Older, active children; boosted for `5+`.
    Active,
    /// Unaffected by age.
    Neutral,
}

/// Per-review bonus with a cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CappedBonus {
    /// Points per mentioning review.
    pub per_review: f64,
    /// Maximum points.
    pub cap: f64,
}

impl CappedBonus {
    /// Points for `count` mentioning reviews.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "review counts are small"
    )]
    pub fn points(self, count: usize) -> f64 {
        (self.per_review * count as f64).min(self.cap)
    }
}

/// Bonus per priority tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBonuses {
    /// Tier A bonus.
    pub a: f64,
    /// Tier B bonus.
    pub b: f64,
    /// Tier C bonus.
    pub c: f64,
    /// Tier D bonus.
    pub d: f64,
}

impl LayerBonuses {
    /// Bonus for `layer`.
    #[must_use]
    pub const fn for_layer(&self, layer: PriorityLayer) -> f64 {
        match layer {
            PriorityLayer::A => self.a,
            PriorityLayer::B => self.b,
            PriorityLayer::C => self.c,
            PriorityLayer::D => self.d,
        }
    }
}

/// Default lookback for recent review mentions.
pub const DEFAULT_RECENCY_WINDOW: Duration = Duration::from_secs(180 * 24 * 60 * 60);

/// Constants of the heuristic scorer.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kidspot_core::ScoringConfig;
///
/// let config = ScoringConfig::default().with_recency_window(Duration::from_secs(3_600));
/// assert_eq!(config.base_score, 20.0);
/// assert_eq!(config.recency_window, Duration::from_secs(3_600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Starting score.
    pub base_score: f64,
    /// Bonus per tier.
    pub layer_bonus: LayerBonuses,
    /// Minimum external rating for the popularity bonus.
    pub popular_min_rating: f64,
    /// Rating count for the large popularity bonus.
    pub popular_high_count: u32,
    /// Large popularity bonus.
    pub popular_high_bonus: f64,
    /// Rating count for the small popularity bonus.
    pub popular_low_count: u32,
    /// Small popularity bonus.
    pub popular_low_bonus: f64,
    /// Direct kids-area keyword.
    pub kids_area_bonus: f64,
    /// Playroom amenity.
    pub playroom_bonus: f64,
    /// Playground evidence.
    pub playground_bonus: f64,
    /// Changing table or baby support keyword.
    pub baby_support_bonus: f64,
    /// Kids menu amenity.
    pub kids_menu_bonus: f64,
    /// High-chair keyword.
    pub highchair_bonus: f64,
    /// Monitors evidence.
    pub monitors_bonus: f64,
    /// Active-play evidence.
    pub active_play_bonus: f64,
    /// Family keyword.
    pub family_bonus: f64,
    /// Kids-area review mentions.
    pub kids_area_reviews: CappedBonus,
    /// Playground review mentions.
    pub playground_reviews: CappedBonus,
    /// Monitor review mentions.
    pub monitors_reviews: CappedBonus,
    /// Tier B venue with monitors evidence.
    pub layer_b_monitors_bonus: f64,
    /// Recent kids-area or playground mention.
    pub recent_kids_bonus: f64,
    /// Mentioning reviews needed for the volume bonus.
    pub many_reviews_threshold: usize,
    /// Volume bonus.
    pub many_reviews_bonus: f64,
    /// Combined kids-area and playground mentions counting as strong.
    pub strong_review_total: usize,
    /// Recent kids-area and playground mentions counting as strong.
    pub strong_review_recent: usize,
    /// Adult-venue penalty.
    pub adult_penalty: f64,
    /// Romantic or quiet ambiance penalty.
    pub romantic_penalty: f64,
    /// Multiplier for small-kids bonuses under `0-5`.
    pub small_kids_multiplier: f64,
    /// Multiplier for active bonuses under `5+`.
    pub active_multiplier: f64,
    /// Lookback for recent mentions.
    pub recency_window: Duration,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 20.0,
            layer_bonus: LayerBonuses {
                a: 40.0,
                b: 28.0,
                c: 10.0,
                d: 0.0,
            },
            popular_min_rating: 4.3,
            popular_high_count: 100,
            popular_high_bonus: 8.0,
            popular_low_count: 50,
            popular_low_bonus: 4.0,
            kids_area_bonus: 8.0,
            playroom_bonus: 6.0,
            playground_bonus: 6.0,
            baby_support_bonus: 4.0,
            kids_menu_bonus: 3.0,
            highchair_bonus: 4.0,
            monitors_bonus: 4.0,
            active_play_bonus: 8.0,
            family_bonus: 4.0,
            kids_area_reviews: CappedBonus {
                per_review: 6.0,
                cap: 18.0,
            },
            playground_reviews: CappedBonus {
                per_review: 5.0,
                cap: 15.0,
            },
            monitors_reviews: CappedBonus {
                per_review: 4.0,
                cap: 12.0,
            },
            layer_b_monitors_bonus: 6.0,
            recent_kids_bonus: 4.0,
            many_reviews_threshold: 5,
            many_reviews_bonus: 3.0,
            strong_review_total: 3,
            strong_review_recent: 2,
            adult_penalty: 15.0,
            romantic_penalty: 8.0,
            small_kids_multiplier: 2.0,
            active_multiplier: 1.5,
            recency_window: DEFAULT_RECENCY_WINDOW,
        }
    }
}

impl ScoringConfig {
    /// Override the recent-mention lookback.
    #[must_use]
    pub const fn with_recency_window(mut self, window: Duration) -> Self {
        self.recency_window = window;
        self
    }

    /// Apply the age multiplier for `flavor` under `age`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "bonus scaling")]
    pub fn adjust(&self, value: f64, flavor: BonusFlavor, age: AgePreference) -> f64 {
        match (age, flavor) {
            (AgePreference::UpToFive, BonusFlavor::Small) => value * self.small_kids_multiplier,
            (AgePreference::FivePlus, BonusFlavor::Active) => value * self.active_multiplier,
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AgePreference::UpToFive, BonusFlavor::Small, 12.0)]
    #[case(AgePreference::UpToFive, BonusFlavor::Active, 6.0)]
    #[case(AgePreference::FivePlus, BonusFlavor::Active, 9.0)]
    #[case(AgePreference::FivePlus, BonusFlavor::Small, 6.0)]
    #[case(AgePreference::All, BonusFlavor::Small, 6.0)]
    #[case(AgePreference::All, BonusFlavor::Neutral, 6.0)]
    #[expect(clippy::float_arithmetic, reason = "tests compare scores")]
    fn age_multipliers(
        #[case] age: AgePreference,
        #[case] flavor: BonusFlavor,
        #[case] expected: f64,
    ) {
        let adjusted = ScoringConfig::default().adjust(6.0, flavor, age);
        assert!((adjusted - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 6.0)]
    #[case(3, 18.0)]
    #[case(7, 18.0)]
    #[expect(clippy::float_arithmetic, reason = "tests compare scores")]
    fn capped_bonus_saturates(#[case] count: usize, #[case] expected: f64) {
        let bonus = ScoringConfig::default().kids_area_reviews;
        assert!((bonus.points(count) - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    fn layers_sort_in_display_order() {
        let mut layers = vec![PriorityLayer::D, PriorityLayer::A, PriorityLayer::C, PriorityLayer::B];
        layers.sort();
        assert_eq!(
            layers,
            vec![PriorityLayer::A, PriorityLayer::B, PriorityLayer::C, PriorityLayer::D]
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn badges_serialise_as_labels() {
        let json = serde_json::to_string(&[Badge::DedicatedKids, Badge::Playground])
            .expect("serialise badges");
        assert_eq!(json, r#"["Infantil dedicado","Parquinho"]"#);
    }
}
