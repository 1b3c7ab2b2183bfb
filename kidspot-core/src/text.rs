//! Text normalisation for keyword matching.
//!
//! Free-form venue text mixes Portuguese and English, with and without
//! diacritics. Matching always happens on the normalised form: lower-cased,
//! canonically decomposed, with combining marks removed, so `"Espaço"` and
//! `"espaco"` compare equal.
//!
//! # Examples
//! ```
//! use kidspot_core::text::normalize;
//!
//! assert_eq!(normalize("Espaço KIDS"), "espaco kids");
//! assert_eq!(normalize(""), "");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalise `value` for case- and accent-insensitive matching.
///
/// The output is stable: normalising an already normalised string returns
/// it unchanged.
#[must_use]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

/// Normalise an optional value, treating `None` as the empty string.
#[must_use]
pub fn normalize_opt(value: Option<&str>) -> String {
    value.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Espaço", "espaco")]
    #[case("FRALDÁRIO", "fraldario")]
    #[case("Não tem", "nao tem")]
    #[case("cadeirão", "cadeirao")]
    #[case("Recreação Infantil", "recreacao infantil")]
    #[case("already plain", "already plain")]
    fn strips_case_and_diacritics(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    fn empty_and_missing_input_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("Área")), "area");
    }

    #[rstest]
    #[case("Espaço Kids Çàü")]
    #[case("ÀÉÎÕÜ")]
    fn normalisation_is_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}
