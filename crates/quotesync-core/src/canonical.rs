//! Content-derived identity for quotes.
//!
//! Two quotes with the same canonical key are the same logical quote,
//! whatever their provenance, timestamps or sync flags. De-duplication on
//! import and matching during reconciliation both go through [`canonical_key`].

/// Separator between the folded text and category.
pub const KEY_SEPARATOR: &str = "||";

/// Build the canonical key for a text/category pair.
///
/// Both parts are trimmed and lower-cased before joining. Empty inputs
/// produce a degenerate but valid key.
///
/// # Examples
///
/// ```
/// use quotesync_core::canonical::canonical_key;
///
/// assert_eq!(canonical_key(" Hi ", "A"), canonical_key("hi", "a"));
/// assert_eq!(canonical_key("Hi", "A"), "hi||a");
/// ```
#[must_use]
pub fn canonical_key(text: &str, category: &str) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}",
        text.trim().to_lowercase(),
        category.trim().to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case_and_surrounding_whitespace() {
        assert_eq!(canonical_key(" Hi ", "A"), canonical_key("hi", "a"));
        assert_eq!(canonical_key("\tHELLO\n", " Life "), "hello||life");
    }

    #[test]
    fn key_keeps_inner_whitespace() {
        assert_ne!(canonical_key("a b", "c"), canonical_key("ab", "c"));
    }

    #[test]
    fn key_is_total_over_empty_strings() {
        assert_eq!(canonical_key("", ""), "||");
        assert_eq!(canonical_key("   ", "x"), "||x");
    }

    #[test]
    fn text_and_category_do_not_bleed_into_each_other() {
        assert_ne!(canonical_key("a", "bc"), canonical_key("ab", "c"));
    }
}
