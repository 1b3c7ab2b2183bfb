//! Score places for a family's preferences.
//!
//! The [`PlaceScorer`] trait assigns a [`PlaceScoreDetails`] to a
//! [`Place`] given the caller's [`Filters`]. [`HeuristicScorer`] is the
//! keyword and review driven implementation; its vocabulary and constants are
//! injected as a [`Lexicon`] and a [`ScoringConfig`].

use std::sync::LazyLock;

use crate::lexicon::{KeywordList, Lexicon, aggregate_text, includes_any_type};
use crate::reviews::{MentionCategory, ReviewSignals, analyze_reviews};
use crate::score::{Badge, BonusFlavor, PlaceScoreDetails, PriorityLayer, ScoringConfig};
use crate::{AgePreference, Amenity, EpochMillis, Filters, Place};

/// Calculate score details for a place.
///
/// Implementations must be pure: identical `(place, filters, now)` input
/// yields identical output. `now` is the only clock the scorer may consult.
///
/// # Examples
///
/// ```rust
/// use kidspot_core::{EpochMillis, Filters, Place, PlaceScoreDetails, PlaceScorer};
///
/// struct FlatScorer;
///
/// impl PlaceScorer for FlatScorer {
///     fn score_details(&self, _: &Place, _: &Filters, _: EpochMillis) -> PlaceScoreDetails {
///         PlaceScoreDetails { score: 50.0, ..PlaceScoreDetails::default() }
///     }
/// }
///
/// let details = FlatScorer.score_details(&Place::new("p", "Park"), &Filters::default(), 0);
/// assert_eq!(details.score, 50.0);
/// ```
pub trait PlaceScorer: Send + Sync {
    /// Return score details for `place` under `filters` at time `now`.
    fn score_details(&self, place: &Place, filters: &Filters, now: EpochMillis)
    -> PlaceScoreDetails;

    /// Return only the numeric score.
    fn score(&self, place: &Place, filters: &Filters, now: EpochMillis) -> f64 {
        self.score_details(place, filters, now).score
    }

    /// Clamp a raw score to `0.0..=100.0`, mapping non-finite values to `0.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 100.0)
    }
}

/// Keyword, amenity and review evidence for one place.
#[derive(Debug, Clone, Default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent signal"
)]
struct Evidence {
    adult: bool,
    romantic: bool,
    food: bool,
    kids_area_keyword: bool,
    playroom: bool,
    playground: bool,
    monitors: bool,
    active_play: bool,
    baby_support: bool,
    kids_menu: bool,
    highchair: bool,
    family: bool,
    dedicated_type: bool,
    event_keyword: bool,
    dedicated_keyword: bool,
    strong_kids_area: bool,
}

/// Running score with the review share tracked separately.
struct Tally<'a> {
    config: &'a ScoringConfig,
    age: AgePreference,
    score: f64,
    review_bonus: f64,
}

impl Tally<'_> {
    #[expect(clippy::float_arithmetic, reason = "score accumulation")]
    fn feature(&mut self, value: f64, flavor: BonusFlavor) {
        self.score += self.config.adjust(value, flavor, self.age);
    }

    #[expect(clippy::float_arithmetic, reason = "score accumulation")]
    fn review(&mut self, value: f64, flavor: BonusFlavor) {
        let adjusted = self.config.adjust(value, flavor, self.age);
        self.review_bonus += adjusted;
        self.score += adjusted;
    }

    #[expect(clippy::float_arithmetic, reason = "score accumulation")]
    fn penalty(&mut self, value: f64) {
        self.score -= value;
    }
}

/// Heuristic scorer driven by a [`Lexicon`] and a [`ScoringConfig`].
///
/// # Examples
/// ```
/// use kidspot_core::{Amenity, Filters, HeuristicScorer, Place, PlaceScorer, PriorityLayer};
///
/// let scorer = HeuristicScorer::default();
/// let park = Place::new("p1", "Parque Diversao")
///     .with_categories(["amusement_park"])
///     .with_amenities([Amenity::Playground]);
///
/// let details = scorer.score_details(&park, &Filters::default(), 0);
/// assert_eq!(details.priority_layer, PriorityLayer::A);
/// assert!(!details.should_hide);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    lexicon: Lexicon,
    config: ScoringConfig,
}

impl HeuristicScorer {
    /// Create a scorer from a vocabulary and constants.
    #[must_use]
    pub const fn new(lexicon: Lexicon, config: ScoringConfig) -> Self {
        Self { lexicon, config }
    }

    /// Vocabulary in use.
    #[must_use]
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Constants in use.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn is_hotel(&self, place: &Place, haystack: &str) -> bool {
        includes_any_type(place, &self.lexicon.hotel_types)
            || self.lexicon.hotel_keywords.matches_normalized(haystack)
    }

    fn gather(&self, place: &Place, haystack: &str, signals: &ReviewSignals) -> Evidence {
        let lex = &self.lexicon;
        let kw = |list: &KeywordList| list.matches_normalized(haystack);

        let playroom = place.has_amenity(Amenity::Playroom);
        let kids_area_keyword = kw(&lex.kids_area_keywords) || playroom;
        let strong_reviews = signals.mentions.kids_related() >= self.config.strong_review_total
            || signals.recent_mentions.kids_related() >= self.config.strong_review_recent;

        Evidence {
            adult: includes_any_type(place, &lex.adult_types) || kw(&lex.adult_keywords),
            romantic: kw(&lex.romantic_keywords),
            food: includes_any_type(place, &lex.food_types) || kw(&lex.food_keywords),
            kids_area_keyword,
            playroom,
            playground: place.has_amenity(Amenity::Playground)
                || kw(&lex.playground_keywords)
                || signals.mentioned(MentionCategory::Playground),
            monitors: place.has_amenity(Amenity::Monitors)
                || kw(&lex.monitor_keywords)
                || signals.mentioned(MentionCategory::Monitors),
            active_play: kw(&lex.active_play_keywords)
                || includes_any_type(place, &lex.active_types),
            baby_support: place.has_amenity(Amenity::ChangingTable)
                || kw(&lex.baby_support_keywords),
            kids_menu: place.has_amenity(Amenity::KidsMenu),
            highchair: kw(&lex.highchair_keywords),
            family: kw(&lex.family_keywords),
            dedicated_type: includes_any_type(place, &lex.dedicated_types),
            event_keyword: kw(&lex.dedicated_event_keywords),
            dedicated_keyword: kw(&lex.dedicated_kids_keywords),
            strong_kids_area: kids_area_keyword
                || strong_reviews
                || signals.mentioned(MentionCategory::KidsArea),
        }
    }

    /// First matching tier wins.
    fn classify(evidence: &Evidence, signals: &ReviewSignals) -> PriorityLayer {
        let dedicated = evidence.event_keyword
            || evidence.dedicated_type
            || (!evidence.food
                && (evidence.dedicated_keyword
                    || evidence.active_play
                    || evidence.strong_kids_area));
        if dedicated {
            return PriorityLayer::A;
        }
        if evidence.food && evidence.strong_kids_area {
            return PriorityLayer::B;
        }
        if evidence.family
            || evidence.strong_kids_area
            || signals.total_mention_reviews > 0
            || evidence.playground
            || evidence.active_play
        {
            return PriorityLayer::C;
        }
        PriorityLayer::D
    }

    fn badges(evidence: &Evidence, layer: PriorityLayer) -> Vec<Badge> {
        [
            (layer == PriorityLayer::A, Badge::DedicatedKids),
            (evidence.strong_kids_area, Badge::StrongKidsArea),
            (evidence.monitors, Badge::Monitors),
            (evidence.playground, Badge::Playground),
        ]
        .into_iter()
        .filter_map(|(earned, badge)| earned.then_some(badge))
        .collect()
    }

    fn popularity_bonus(&self, place: &Place) -> f64 {
        let cfg = &self.config;
        match (place.google_rating, place.google_user_ratings_total) {
            (Some(rating), Some(total)) if rating >= cfg.popular_min_rating => {
                if total >= cfg.popular_high_count {
                    cfg.popular_high_bonus
                } else if total >= cfg.popular_low_count {
                    cfg.popular_low_bonus
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    fn accumulate(
        &self,
        place: &Place,
        evidence: &Evidence,
        signals: &ReviewSignals,
        layer: PriorityLayer,
        age: AgePreference,
    ) -> (f64, f64) {
        let cfg = &self.config;
        let mut tally = Tally {
            config: cfg,
            age,
            score: cfg.base_score,
            review_bonus: 0.0,
        };

        tally.feature(cfg.layer_bonus.for_layer(layer), BonusFlavor::Neutral);
        tally.feature(self.popularity_bonus(place), BonusFlavor::Neutral);

        let features = [
            (evidence.kids_area_keyword, cfg.kids_area_bonus, BonusFlavor::Small),
            (evidence.playroom, cfg.playroom_bonus, BonusFlavor::Small),
            (evidence.playground, cfg.playground_bonus, BonusFlavor::Small),
            (evidence.baby_support, cfg.baby_support_bonus, BonusFlavor::Small),
            (evidence.kids_menu, cfg.kids_menu_bonus, BonusFlavor::Small),
            (evidence.highchair, cfg.highchair_bonus, BonusFlavor::Small),
            (evidence.monitors, cfg.monitors_bonus, BonusFlavor::Active),
            (evidence.active_play, cfg.active_play_bonus, BonusFlavor::Active),
            (evidence.family, cfg.family_bonus, BonusFlavor::Neutral),
        ];
        for (present, value, flavor) in features {
            if present {
                tally.feature(value, flavor);
            }
        }

        let mentions = signals.mentions;
        if mentions.kids_area > 0 {
            tally.review(cfg.kids_area_reviews.points(mentions.kids_area), BonusFlavor::Small);
        }
        if mentions.playground > 0 {
            tally.review(cfg.playground_reviews.points(mentions.playground), BonusFlavor::Small);
        }
        if mentions.monitors > 0 {
            tally.review(cfg.monitors_reviews.points(mentions.monitors), BonusFlavor::Active);
        }
        if layer == PriorityLayer::B && evidence.monitors {
            tally.review(cfg.layer_b_monitors_bonus, BonusFlavor::Active);
        }
        if signals.has_recent_kids_mention {
            tally.review(cfg.recent_kids_bonus, BonusFlavor::Small);
        }
        if signals.total_mention_reviews >= cfg.many_reviews_threshold {
            tally.review(cfg.many_reviews_bonus, BonusFlavor::Neutral);
        }

        if evidence.adult {
            tally.penalty(cfg.adult_penalty);
        }
        if evidence.romantic {
            tally.penalty(cfg.romantic_penalty);
        }

        (Self::sanitise(tally.score), tally.review_bonus)
    }
}

impl PlaceScorer for HeuristicScorer {
    fn score_details(
        &self,
        place: &Place,
        filters: &Filters,
        now: EpochMillis,
    ) -> PlaceScoreDetails {
        let haystack = aggregate_text(place);
        if self.is_hotel(place, &haystack) {
            return PlaceScoreDetails::hidden();
        }

        let signals = analyze_reviews(place, &self.lexicon.review, now, self.config.recency_window);
        let evidence = self.gather(place, &haystack, &signals);
        let layer = Self::classify(&evidence, &signals);
        let (score, review_bonus) =
            self.accumulate(place, &evidence, &signals, layer, filters.children_age);

        PlaceScoreDetails {
            score,
            review_bonus,
            review_chips: signals.chips.iter().map(|chip| (*chip).to_owned()).collect(),
            priority_layer: layer,
            badges: Self::badges(&evidence, layer),
            should_hide: false,
        }
    }
}

static DEFAULT_SCORER: LazyLock<HeuristicScorer> = LazyLock::new(HeuristicScorer::default);

/// Shared scorer with the built-in lexicon and constants.
pub(crate) fn default_scorer() -> &'static HeuristicScorer {
    &DEFAULT_SCORER
}

/// Score `place` with the built-in lexicon and constants.
///
/// # Examples
/// ```
/// use kidspot_core::{Filters, Place, score_place_with_details};
///
/// let hotel = Place::new("h1", "Hotel Central")
///     .with_categories(["lodging"])
///     .with_description("Hotel focado em adultos");
/// let details = score_place_with_details(&hotel, &Filters::default(), 0);
/// assert!(details.should_hide);
/// assert_eq!(details.score, 0.0);
/// ```
#[must_use]
pub fn score_place_with_details(
    place: &Place,
    filters: &Filters,
    now: EpochMillis,
) -> PlaceScoreDetails {
    default_scorer().score_details(place, filters, now)
}

/// Return only the score of [`score_place_with_details`].
#[must_use]
pub fn calculate_place_score(place: &Place, filters: &Filters, now: EpochMillis) -> f64 {
    default_scorer().score(place, filters, now)
}
