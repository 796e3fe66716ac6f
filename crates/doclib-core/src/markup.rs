//! Declared type references in catalog markup.
//!
//! The catalog page links each offered document as `...?type=<id>"` or
//! declares it as `type="<id>"`. A token starts right after `type=` (one
//! opening double quote is skipped) and runs up to the next double quote.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TYPE_PATTERN: Regex =
        Regex::new(r#"type="?([^"]+)"#).expect("type pattern is valid");
}

/// Every `type=` token in `markup`, in document order, duplicates included.
pub fn extract_type_tokens(markup: &str) -> Vec<String> {
    TYPE_PATTERN
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinct `type=` tokens, sorted.
pub fn distinct_type_tokens(markup: &str) -> BTreeSet<String> {
    extract_type_tokens(markup).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoted_attribute() {
        assert_eq!(
            extract_type_tokens(r#"<a data-doc type="poa">Proof</a>"#),
            vec!["poa"]
        );
    }

    #[test]
    fn query_string_link() {
        let html = r#"<a href="generator.html?type=proof-of-loss">Proof of Loss</a>"#;
        assert_eq!(extract_type_tokens(html), vec!["proof-of-loss"]);
    }

    #[test]
    fn duplicates_kept_in_order() {
        let html = r#"type="poa" type="aob" type="poa" type="aob""#;
        assert_eq!(extract_type_tokens(html), vec!["poa", "aob", "poa", "aob"]);
    }

    #[test]
    fn distinct_collapses_duplicates() {
        let html = r#"type="poa" type="aob" type="poa" type="aob""#;
        let set = distinct_type_tokens(html);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["aob", "poa"]);
    }

    #[test]
    fn token_runs_to_next_quote() {
        let html = r#"<a href="doc.html?type=poa&lang=en">x</a>"#;
        assert_eq!(extract_type_tokens(html), vec!["poa&lang=en"]);
    }

    #[test]
    fn empty_quoted_value_is_skipped() {
        assert!(extract_type_tokens(r#"<input type="">"#).is_empty());
    }

    #[test]
    fn no_tokens() {
        assert!(extract_type_tokens("<html><body>nothing here</body></html>").is_empty());
    }
}
