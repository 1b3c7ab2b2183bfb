//! Keyword and category vocabularies used by the scorer.
//!
//! Every list is data: a [`Lexicon`] can be built in code, deserialised from
//! JSON, or taken from [`Lexicon::default`], which carries the built-in
//! Portuguese/English vocabulary. Entries are normalised on construction so
//! matching never has to re-normalise the needles.
//!
//! # Examples
//! ```
//! use kidspot_core::lexicon::{KeywordList, has_keyword};
//!
//! let keywords = KeywordList::new(["Espaço Kids", "brinquedoteca"]);
//! assert!(has_keyword("Restaurante com ESPACO kids", &keywords));
//! assert!(!has_keyword("Restaurante tranquilo", &keywords));
//! ```

use std::collections::BTreeSet;

use crate::Place;
use crate::text::normalize;

/// A list of normalised keyword phrases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    /// Normalise and store `keywords`, dropping entries that normalise to
    /// the empty string.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|keyword| normalize(keyword.as_ref()))
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        )
    }

    /// Report whether the already normalised `haystack` contains any entry.
    #[must_use]
    pub fn matches_normalized(&self, haystack: &str) -> bool {
        self.0.iter().any(|keyword| haystack.contains(keyword.as_str()))
    }

    /// Iterate over the normalised entries.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether the list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for KeywordList {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<KeywordList> for Vec<String> {
    fn from(value: KeywordList) -> Self {
        value.0
    }
}

/// A set of normalised category tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct TypeSet(BTreeSet<String>);

impl TypeSet {
    /// Normalise and store `types`.
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            types
                .into_iter()
                .map(|tag| normalize(tag.as_ref()))
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }

    /// Report whether `category` belongs to the set after normalisation.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(&normalize(category))
    }
}

impl From<Vec<String>> for TypeSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<TypeSet> for Vec<String> {
    fn from(value: TypeSet) -> Self {
        value.0.into_iter().collect()
    }
}

/// Return `true` when the normalised `haystack` contains any keyword.
#[must_use]
pub fn has_keyword(haystack: &str, keywords: &KeywordList) -> bool {
    keywords.matches_normalized(&normalize(haystack))
}

/// Return `true` when any of the place's normalised categories is in `types`.
#[must_use]
pub fn includes_any_type(place: &Place, types: &TypeSet) -> bool {
    place
        .categories
        .iter()
        .any(|category| types.contains(category))
}

/// Keywords and canned negative phrases for one review mention category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MentionVocabulary {
    /// Phrases that count as a mention.
    pub keywords: KeywordList,
    /// Phrases whose presence anywhere in a review negates every mention.
    pub negative_phrases: KeywordList,
}

/// Vocabulary for review mention analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReviewLexicon {
    /// Kids-area mentions.
    pub kids_area: MentionVocabulary,
    /// Playground mentions.
    pub playground: MentionVocabulary,
    /// Monitor mentions.
    pub monitors: MentionVocabulary,
    /// Phrases that negate a mention when they end the preceding window.
    pub negation_before: KeywordList,
    /// Phrases that negate a mention when they start the following window.
    pub negation_after: KeywordList,
    /// Width, in characters, of the windows examined around a match.
    pub window_chars: usize,
}

/// Default negation window width in characters.
pub const DEFAULT_NEGATION_WINDOW: usize = 24;

impl Default for ReviewLexicon {
    fn default() -> Self {
        Self {
            kids_area: MentionVocabulary {
                keywords: KeywordList::new([
                    "espaco kids",
                    "area kids",
                    "brinquedoteca",
                    "kids area",
                    "kids room",
                    "play area",
                ]),
                negative_phrases: KeywordList::new([
                    "sem espaco kids",
                    "sem area kids",
                    "sem espaco infantil",
                    "sem brinquedoteca",
                    "nao tem espaco kids",
                    "nao tem area kids",
                    "nao tem brinquedoteca",
                    "sem kids area",
                    "nao tem kids area",
                    "sem play area",
                    "nao tem play area",
                    "espaco kids inexistente",
                    "area kids inexistente",
                    "kids area inexistente",
                ]),
            },
            playground: MentionVocabulary {
                keywords: KeywordList::new(["parquinho", "playground"]),
                negative_phrases: KeywordList::new([
                    "sem playground",
                    "sem parquinho",
                    "nao tem playground",
                    "nao tem parquinho",
                    "playground inexistente",
                    "parquinho inexistente",
                ]),
            },
            monitors: MentionVocabulary {
                keywords: KeywordList::new([
                    "monitores",
                    "monitoria",
                    "recreadores",
                    "recreacao infantil",
                    "staff supervising",
                    "monitors",
                ]),
                negative_phrases: KeywordList::new([
                    "sem monitores",
                    "nao tem monitores",
                    "sem monitoria",
                    "nao tem monitoria",
                    "sem recreacao infantil",
                    "nao tem recreacao infantil",
                    "sem supervisao",
                    "nao tem supervisao",
                ]),
            },
            negation_before: KeywordList::new([
                "nao tem",
                "nao possui",
                "nao oferece",
                "nao tinha",
                "sem",
                "sem um",
                "sem uma",
                "sem nenhum",
                "sem nenhuma",
                "sem qualquer",
                "faltou",
                "inexistente",
            ]),
            negation_after: KeywordList::new(["sem", "faltou", "inexistente", "ausente"]),
            window_chars: DEFAULT_NEGATION_WINDOW,
        }
    }
}

/// Complete vocabulary consumed by the scoring engine.
///
/// The `version` string identifies the vocabulary so tuned lexicons can be
/// told apart in logs and stored results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Lexicon {
    /// Vocabulary identifier.
    pub version: String,
    /// Lodging category tags.
    pub hotel_types: TypeSet,
    /// Lodging keywords.
    pub hotel_keywords: KeywordList,
    /// Adult-venue category tags.
    pub adult_types: TypeSet,
    /// Adult-venue keywords.
    pub adult_keywords: KeywordList,
    /// Romantic or quiet ambiance keywords.
    pub romantic_keywords: KeywordList,
    /// Category tags of venues dedicated to children.
    pub dedicated_types: TypeSet,
    /// Category tags of active-play venues.
    pub active_types: TypeSet,
    /// Food-venue category tags.
    pub food_types: TypeSet,
    /// Food-venue keywords.
    pub food_keywords: KeywordList,
    /// Keywords of venues dedicated to children.
    pub dedicated_kids_keywords: KeywordList,
    /// Children's party and event keywords.
    pub dedicated_event_keywords: KeywordList,
    /// Kids-area keywords.
    pub kids_area_keywords: KeywordList,
    /// Playground keywords.
    pub playground_keywords: KeywordList,
    /// Supervision keywords.
    pub monitor_keywords: KeywordList,
    /// Active-play keywords.
    pub active_play_keywords: KeywordList,
    /// Family-friendliness keywords.
    pub family_keywords: KeywordList,
    /// Baby-care keywords.
    pub baby_support_keywords: KeywordList,
    /// High-chair keywords.
    pub highchair_keywords: KeywordList,
    /// Review mention vocabulary.
    pub review: ReviewLexicon,
}

/// Identifier of the built-in vocabulary.
pub const DEFAULT_LEXICON_VERSION: &str = "pt-br-2024.1";

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: DEFAULT_LEXICON_VERSION.to_owned(),
            hotel_types: TypeSet::new(["lodging", "hotel", "motel", "hostel", "resort"]),
            // "inn" is left out: as a substring it hits words like "dinner".
            hotel_keywords: KeywordList::new([
                "hotel",
                "pousada",
                "resort",
                "hostel",
                "pousada infantil",
                "apart hotel",
            ]),
            adult_types: TypeSet::new(["bar", "night_club", "liquor_store", "casino", "wine_bar"]),
            adult_keywords: KeywordList::new([
                "balada",
                "boate",
                "pub",
                "wine bar",
                "vinho",
                "boteco",
                "choperia",
                "cocktail",
                "speakeasy",
                "whisky",
            ]),
            romantic_keywords: KeywordList::new([
                "romantico",
                "silencioso",
                "adult only",
                "som baixo",
                "casal",
                "para casais",
                "fine dining",
            ]),
            dedicated_types: TypeSet::new([
                "playground",
                "amusement_park",
                "theme_park",
                "bowling_alley",
                "trampoline_park",
                "arcade",
                "laser_tag_center",
                "children_museum",
                "indoor_play_area",
            ]),
            active_types: TypeSet::new([
                "amusement_park",
                "theme_park",
                "bowling_alley",
                "trampoline_park",
                "arcade",
                "laser_tag_center",
                "recreation_center",
            ]),
            food_types: TypeSet::new([
                "restaurant",
                "food",
                "cafe",
                "bakery",
                "barbecue",
                "meal_takeaway",
                "meal_delivery",
                "coffee_shop",
                "ice_cream",
                "pizzeria",
                "steakhouse",
                "confectionery",
            ]),
            food_keywords: KeywordList::new([
                "restaurante",
                "restaurant",
                "cafe",
                "cafeteria",
                "padaria",
                "bakery",
                "lanchonete",
                "sorveteria",
                "bistro",
                "pizzaria",
                "churrascaria",
                "brasserie",
                "doceria",
            ]),
            dedicated_kids_keywords: KeywordList::new([
                "brinquedoteca",
                "buffet infantil",
                "casa de festas infantil",
                "casa de festa infantil",
                "playground indoor",
                "playground coberto",
                "parque infantil",
                "parque kids",
                "parque de trampolim",
                "trampoline park",
                "jump park",
                "trampolim",
                "arcade",
                "laser tag",
                "boliche",
                "bowling",
                "recreacao infantil",
                "recreacao monitorada",
                "museu infantil",
                "aquario infantil",
                "zoologico infantil",
            ]),
            dedicated_event_keywords: KeywordList::new([
                "buffet infantil",
                "casa de festas infantil",
                "festa infantil",
                "aniversario infantil",
                "espaco festa infantil",
            ]),
            kids_area_keywords: KeywordList::new([
                "espaco kids",
                "area kids",
                "kids area",
                "kids space",
                "kids zone",
                "kids corner",
                "sala kids",
                "sala infantil",
                "brinquedoteca",
                "play area",
            ]),
            playground_keywords: KeywordList::new([
                "playground",
                "parquinho",
                "praca infantil",
                "espaco brincar",
                "espaco de brincar",
                "play kids",
                "brinquedos ao ar livre",
            ]),
            monitor_keywords: KeywordList::new([
                "monitores",
                "monitoria",
                "monitor infantil",
                "recreacao infantil",
                "recreadores",
                "recreacao monitorada",
                "animacao infantil",
                "staff supervisionado",
            ]),
            active_play_keywords: KeywordList::new([
                "trampolim",
                "trampoline",
                "jump",
                "pista de aventura",
                "escalada",
                "climbing",
                "parkour",
                "arvorismo",
                "tirolesa",
                "arcade",
                "laser tag",
                "boliche",
                "bowling",
                "kart",
                "games",
                "arena kids",
            ]),
            family_keywords: KeywordList::new([
                "kids friendly",
                "kid friendly",
                "family friendly",
                "familia",
                "criancas",
                "para criancas",
                "lugar para familia",
            ]),
            baby_support_keywords: KeywordList::new([
                "fraldario",
                "troca de fraldas",
                "cantinho baby",
                "baby care",
                "amamentacao",
                "lactario",
                "espaco baby",
            ]),
            highchair_keywords: KeywordList::new(["cadeirao", "cadeira de bebe", "cadeirao infantil"]),
            review: ReviewLexicon::default(),
        }
    }
}

/// Build the normalised haystack matched against the lexicon.
///
/// Joins the name, description, categories, amenity identifiers, review
/// snippets and highlight texts with spaces, then normalises the result.
#[must_use]
pub fn aggregate_text(place: &Place) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.push(place.name.as_str());
    if let Some(description) = place.description.as_deref() {
        parts.push(description);
    }
    parts.extend(place.categories.iter().map(String::as_str));
    parts.extend(place.amenities.iter().map(|amenity| amenity.as_str()));
    parts.extend(place.review_snippets.iter().map(String::as_str));
    parts.extend(
        place
            .review_highlights
            .iter()
            .map(|highlight| highlight.text.as_str()),
    );
    parts.retain(|part| !part.is_empty());
    normalize(&parts.join(" "))
}
