use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Normalize a raw search term: NFKC, trim, collapse whitespace runs to a single space.
/// Case is preserved; the catalog matches case-insensitively on its side.
pub fn normalize_term(raw: &str) -> String {
    let normalized = raw.nfkc().collect::<String>();
    WHITESPACE.replace_all(normalized.trim(), " ").into_owned()
}
