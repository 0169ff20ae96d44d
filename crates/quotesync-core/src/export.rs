//! JSON export and import of the quote list.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Quote;
use crate::store::QuoteStore;

/// File name offered by export flows.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "quotes.json";

/// Render quotes as pretty-printed JSON.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// A text/category pair accepted from an import payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    pub text: String,
    pub category: String,
}

impl ImportCandidate {
    /// Convert into a dirty local quote, failing on blank fields.
    pub fn into_quote(self) -> Result<Quote> {
        Quote::new_local(self.text, self.category)
    }
}

/// Outcome of merging an import into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Well-formed candidates found in the payload
    pub accepted: usize,
    /// Candidates inserted as new quotes
    pub added: usize,
    /// Candidates whose canonical key was already present
    pub skipped_duplicates: usize,
}

/// Parse an import payload.
///
/// Accepts a single object or an array of objects. Elements without string
/// `text` and `category` fields are dropped. Anything that is not JSON, or
/// whose top level is neither an object nor an array, rejects the whole
/// import with [`Error::MalformedImport`].
pub fn parse_import(raw: &str) -> Result<Vec<ImportCandidate>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| Error::MalformedImport(format!("invalid JSON: {error}")))?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(Error::MalformedImport(
                "expected a JSON object or array of objects".to_string(),
            ))
        }
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            let text = item.get("text")?.as_str()?;
            let category = item.get("category")?.as_str()?;
            Some(ImportCandidate {
                text: text.to_string(),
                category: category.to_string(),
            })
        })
        .collect())
}

/// Parse `raw` and merge it into `store` with canonical-key de-duplication.
///
/// Either the payload is rejected as a whole and the store is untouched, or
/// every new well-formed quote is added as a dirty local record.
pub fn import_into(store: &mut QuoteStore, raw: &str) -> Result<ImportSummary> {
    let quotes = parse_import(raw)?
        .into_iter()
        .filter_map(|candidate| candidate.into_quote().ok())
        .collect::<Vec<_>>();

    let accepted = quotes.len();
    let added = store.merge_insert(quotes);
    Ok(ImportSummary {
        accepted,
        added,
        skipped_duplicates: accepted - added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn keys(store: &QuoteStore) -> BTreeSet<String> {
        store.all().iter().map(Quote::canonical_key).collect()
    }

    #[test]
    fn parse_import_accepts_single_object() {
        let candidates = parse_import(r#"{"text": "Hi", "category": "A"}"#).unwrap();
        assert_eq!(
            candidates,
            vec![ImportCandidate {
                text: "Hi".to_string(),
                category: "A".to_string(),
            }]
        );
    }

    #[test]
    fn parse_import_drops_invalid_candidates() {
        let raw = r#"[
            {"text": "Good", "category": "A"},
            {"text": 5, "category": "A"},
            {"text": "No category"},
            "just a string",
            null
        ]"#;
        let candidates = parse_import(raw).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Good");
    }

    #[test]
    fn parse_import_rejects_malformed_payloads() {
        assert!(matches!(
            parse_import("{not json"),
            Err(Error::MalformedImport(_))
        ));
        assert!(matches!(parse_import("42"), Err(Error::MalformedImport(_))));
        assert!(matches!(
            parse_import(r#""text""#),
            Err(Error::MalformedImport(_))
        ));
    }

    #[test]
    fn import_with_one_duplicate_adds_one() {
        let mut store = QuoteStore::new();
        store.add_local("Existing", "Life").unwrap();

        let summary = import_into(
            &mut store,
            r#"[{"text": " existing", "category": "LIFE"}, {"text": "Brand new", "category": "Life"}]"#,
        )
        .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                accepted: 2,
                added: 1,
                skipped_duplicates: 1,
            }
        );
        assert_eq!(store.len(), 2);
        assert!(store.all()[1].dirty);
    }

    #[test]
    fn malformed_import_leaves_store_untouched() {
        let mut store = QuoteStore::new();
        store.add_local("Existing", "Life").unwrap();
        let before = store.clone();

        assert!(import_into(&mut store, "[{]").is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn blank_candidates_are_dropped() {
        let mut store = QuoteStore::new();
        let summary =
            import_into(&mut store, r#"[{"text": "  ", "category": "A"}]"#).unwrap();
        assert_eq!(summary, ImportSummary::default());
        assert!(store.is_empty());
    }

    #[test]
    fn export_then_import_reproduces_keys() {
        let mut store = QuoteStore::new();
        store.add_local("One", "A").unwrap();
        store.add_local("Two", "B").unwrap();
        store
            .add(Quote::from_remote("Three", "Server", None))
            .unwrap();

        let exported = render_json_export(store.all()).unwrap();
        let mut fresh = QuoteStore::new();
        import_into(&mut fresh, &exported).unwrap();

        assert_eq!(keys(&fresh), keys(&store));
    }

    #[test]
    fn export_is_pretty_printed() {
        let quotes = vec![Quote::new_local("One", "A").unwrap()];
        let exported = render_json_export(&quotes).unwrap();
        assert!(exported.starts_with("[\n"));
        assert!(exported.contains("\"text\": \"One\""));
    }
}
