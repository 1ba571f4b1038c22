//! Keyword evidence: does an action's free text mention the goal's keywords?
//!
//! Comparison is a case-insensitive substring test over NFKC-normalised text,
//! so `"RUN"` matches keyword `"run"` and full-width or ligature forms fold to
//! their plain equivalents.

use unicode_normalization::UnicodeNormalization;

use crate::model::Action;

/// Marker a keyword may end with (e.g. `"writ*"`). Stripped before comparison.
pub const WILDCARD: char = '*';

/// Fold text for comparison: NFKC, then lower-case.
pub fn fold_text(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Normalise a keyword: trim, strip wildcard markers, fold. Blank keywords
/// yield `None`.
pub fn normalize_keyword(keyword: &str) -> Option<String> {
    let stripped = keyword.trim().replace(WILDCARD, "");
    let folded = fold_text(stripped.trim());
    (!folded.is_empty()).then_some(folded)
}

/// Whether `action`'s title or description contains any of `keywords`.
///
/// An empty keyword list admits everything. A non-empty list can never be
/// satisfied by an action without text.
pub fn matches_on_keywords<I>(action: &Action, keywords: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let keywords: Vec<String> = keywords
        .into_iter()
        .filter_map(|k| normalize_keyword(k.as_ref()))
        .collect();
    if keywords.is_empty() {
        return true;
    }

    let haystacks: Vec<String> = action.text_fields().map(fold_text).collect();
    if haystacks.is_empty() {
        return false;
    }

    keywords
        .iter()
        .any(|kw| haystacks.iter().any(|text| text.contains(kw.as_str())))
}
