//! Detect positive kids-related mentions in venue reviews.
//!
//! Each review is normalised and scanned for every keyword of the three
//! mention categories. An occurrence counts only when it is not negated:
//! the text immediately before it must not end with a negation phrase, the
//! text after it must not start with one, and the review must not contain a
//! canned negative phrase for the category. A review contributes at most
//! once per category.

use std::time::Duration;

use crate::lexicon::{KeywordList, MentionVocabulary, ReviewLexicon};
use crate::text::normalize;
use crate::{EpochMillis, Place};

/// Reviews rated below this are not treated as positive mentions.
pub const MIN_POSITIVE_RATING: f64 = 4.0;

/// Feature categories tracked in reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MentionCategory {
    /// Indoor kids area or playroom.
    KidsArea,
    /// Playground.
    Playground,
    /// Staff supervising children.
    Monitors,
}

impl MentionCategory {
    /// Every category, in chip display order.
    pub const ALL: [Self; 3] = [Self::KidsArea, Self::Playground, Self::Monitors];

    /// Return the identifier, e.g. `"kids-area"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KidsArea => "kids-area",
            Self::Playground => "playground",
            Self::Monitors => "monitors",
        }
    }

    /// Return the review chip label shown when the category is mentioned.
    #[must_use]
    pub const fn chip_label(self) -> &'static str {
        match self {
            Self::KidsArea => "Espaco kids citado",
            Self::Playground => "Parquinho citado",
            Self::Monitors => "Monitores citados",
        }
    }

    const fn vocabulary(self, lexicon: &ReviewLexicon) -> &MentionVocabulary {
        match self {
            Self::KidsArea => &lexicon.kids_area,
            Self::Playground => &lexicon.playground,
            Self::Monitors => &lexicon.monitors,
        }
    }
}

/// Number of reviews mentioning each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MentionCounts {
    /// Reviews mentioning a kids area.
    pub kids_area: usize,
    /// Reviews mentioning a playground.
    pub playground: usize,
    /// Reviews mentioning monitors.
    pub monitors: usize,
}

impl MentionCounts {
    /// Return the count for `category`.
    #[must_use]
    pub const fn get(&self, category: MentionCategory) -> usize {
        match category {
            MentionCategory::KidsArea => self.kids_area,
            MentionCategory::Playground => self.playground,
            MentionCategory::Monitors => self.monitors,
        }
    }

    const fn increment(&mut self, category: MentionCategory) {
        match category {
            MentionCategory::KidsArea => self.kids_area += 1,
            MentionCategory::Playground => self.playground += 1,
            MentionCategory::Monitors => self.monitors += 1,
        }
    }

    /// Combined kids-area and playground count.
    #[must_use]
    pub const fn kids_related(&self) -> usize {
        self.kids_area.saturating_add(self.playground)
    }
}

/// Review evidence extracted from a place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewSignals {
    /// Mentioning reviews per category.
    pub mentions: MentionCounts,
    /// Recent mentioning reviews per category.
    pub recent_mentions: MentionCounts,
    /// Chip labels for mentioned categories, in display order.
    pub chips: Vec<&'static str>,
    /// Reviews mentioning at least one category.
    pub total_mention_reviews: usize,
    /// Recent reviews mentioning at least one category.
    pub recent_mention_reviews: usize,
    /// A recent review mentions a kids area or playground.
    pub has_recent_kids_mention: bool,
    /// At least one considered review carries a five-star rating.
    pub has_five_star_review: bool,
}

impl ReviewSignals {
    /// Report whether any review mentions `category`.
    #[must_use]
    pub const fn mentioned(&self, category: MentionCategory) -> bool {
        self.mentions.get(category) > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct ReviewSource<'a> {
    text: &'a str,
    rating: Option<f64>,
    created_at: Option<EpochMillis>,
}

impl ReviewSource<'_> {
    fn is_positive(&self) -> bool {
        self.rating
            .filter(|rating| rating.is_finite())
            .is_none_or(|rating| rating >= MIN_POSITIVE_RATING)
    }

    fn is_five_star(&self) -> bool {
        self.rating.is_some_and(|rating| rating >= 5.0)
    }

    fn is_recent(&self, now: EpochMillis, window_ms: EpochMillis) -> bool {
        self.created_at
            .is_some_and(|created_at| now.saturating_sub(created_at) <= window_ms)
    }
}

/// Highlights with text are preferred; snippets are used only without them.
fn collect_review_sources(place: &Place) -> Vec<ReviewSource<'_>> {
    let highlights: Vec<ReviewSource<'_>> = place
        .review_highlights
        .iter()
        .filter(|highlight| !highlight.text.trim().is_empty())
        .map(|highlight| ReviewSource {
            text: highlight.text.as_str(),
            rating: highlight.rating,
            created_at: highlight.created_at,
        })
        .collect();
    if !highlights.is_empty() {
        return highlights;
    }
    place
        .review_snippets
        .iter()
        .filter(|snippet| !snippet.trim().is_empty())
        .map(|snippet| ReviewSource {
            text: snippet.as_str(),
            rating: None,
            created_at: None,
        })
        .collect()
}

/// Last `count` characters of `text`.
fn tail_chars(text: &str, count: usize) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map_or(text.len(), |(idx, _)| idx);
    text.get(start..).unwrap_or_default()
}

/// First `count` characters of `text`.
fn head_chars(text: &str, count: usize) -> &str {
    let end = text
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(idx, _)| idx);
    text.get(..end).unwrap_or(text)
}

fn ends_with_any(window: &str, hints: &KeywordList) -> bool {
    hints.iter().any(|hint| window.ends_with(hint))
}

fn starts_with_any(window: &str, hints: &KeywordList) -> bool {
    hints.iter().any(|hint| window.starts_with(hint))
}

fn is_negated(
    text: &str,
    start: usize,
    keyword: &str,
    vocabulary: &MentionVocabulary,
    lexicon: &ReviewLexicon,
) -> bool {
    let prefix = text.get(..start).unwrap_or_default();
    let before = tail_chars(prefix, lexicon.window_chars).trim_end();
    if ends_with_any(before, &lexicon.negation_before) {
        return true;
    }

    let suffix = text
        .get(start.saturating_add(keyword.len())..)
        .unwrap_or_default();
    let after = head_chars(suffix, lexicon.window_chars).trim_start();
    if starts_with_any(after, &lexicon.negation_after) {
        return true;
    }

    vocabulary.negative_phrases.matches_normalized(text)
}

/// Return `true` when the normalised review mentions the category at least
/// once without negation.
fn mentions(text: &str, vocabulary: &MentionVocabulary, lexicon: &ReviewLexicon) -> bool {
    vocabulary.keywords.iter().any(|keyword| {
        text.match_indices(keyword)
            .any(|(start, _)| !is_negated(text, start, keyword, vocabulary, lexicon))
    })
}

fn window_millis(window: Duration) -> EpochMillis {
    EpochMillis::try_from(window.as_millis()).unwrap_or(EpochMillis::MAX)
}

/// Analyse the reviews of `place`.
///
/// `now` anchors the recency window; reviews created within `recency_window`
/// of it count as recent. Reviews without a timestamp are never recent.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kidspot_core::reviews::{MentionCategory, analyze_reviews};
/// use kidspot_core::lexicon::ReviewLexicon;
/// use kidspot_core::{Place, ReviewHighlight};
///
/// let place = Place::new("p1", "Cafe").with_review_highlights([
///     ReviewHighlight::new("Ótimo espaço kids").with_rating(5.0),
///     ReviewHighlight::new("Pena que não tem parquinho").with_rating(4.0),
/// ]);
/// let signals = analyze_reviews(
///     &place,
///     &ReviewLexicon::default(),
///     0,
///     Duration::from_secs(180 * 24 * 60 * 60),
/// );
/// assert!(signals.mentioned(MentionCategory::KidsArea));
/// assert!(!signals.mentioned(MentionCategory::Playground));
/// assert_eq!(signals.chips, vec!["Espaco kids citado"]);
/// ```
#[must_use]
pub fn analyze_reviews(
    place: &Place,
    lexicon: &ReviewLexicon,
    now: EpochMillis,
    recency_window: Duration,
) -> ReviewSignals {
    let window_ms = window_millis(recency_window);
    let mut signals = ReviewSignals::default();

    for review in collect_review_sources(place) {
        if !review.is_positive() {
            continue;
        }
        if review.is_five_star() {
            signals.has_five_star_review = true;
        }

        let text = normalize(review.text);
        let recent = review.is_recent(now, window_ms);
        let mut any_category = false;

        for category in MentionCategory::ALL {
            if !mentions(&text, category.vocabulary(lexicon), lexicon) {
                continue;
            }
            any_category = true;
            signals.mentions.increment(category);
            if recent {
                signals.recent_mentions.increment(category);
            }
        }

        if any_category {
            signals.total_mention_reviews += 1;
            if recent {
                signals.recent_mention_reviews += 1;
            }
        }
    }

    signals.has_recent_kids_mention = signals.recent_mentions.kids_related() > 0;
    signals.chips = MentionCategory::ALL
        .into_iter()
        .filter(|category| signals.mentioned(*category))
        .map(MentionCategory::chip_label)
        .collect();
    signals
}
