use crate::error::{Error, Result};
use crate::types::PrefEntry;
use glob::Pattern;

/// Query preference entries by glob patterns (OR logic)
///
/// Returns the entries whose key matches any of the patterns, in input order.
/// No patterns means no filtering.
pub fn query_preferences(entries: &[PrefEntry], patterns: &[&str]) -> Result<Vec<PrefEntry>> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e))))
        .collect::<Result<Vec<_>>>()?;

    if compiled_patterns.is_empty() {
        return Ok(entries.to_vec());
    }

    Ok(entries
        .iter()
        .filter(|entry| compiled_patterns.iter().any(|pattern| pattern.matches(&entry.key)))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_prefs_js;

    fn create_test_entries() -> Vec<PrefEntry> {
        parse_prefs_js(
            r#"
            user_pref("Network/CookiesPolicy", "acceptAll");
            user_pref("Network/DoNotTrackPolicy", "skip");
            user_pref("Browser/PrivateMode", false);
            user_pref("History/ClearOnClose", []);
        "#,
        )
        .unwrap()
    }

    #[test]
    fn test_query_single_pattern() {
        let queried = query_preferences(&create_test_entries(), &["Network/*"]).unwrap();
        assert_eq!(queried.len(), 2);
        assert!(queried.iter().all(|e| e.key.starts_with("Network/")));
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let queried =
            query_preferences(&create_test_entries(), &["Network/*", "Browser/PrivateMode"])
                .unwrap();
        assert_eq!(queried.len(), 3);
    }

    #[test]
    fn test_query_no_matches() {
        let queried = query_preferences(&create_test_entries(), &["Nothing/*"]).unwrap();
        assert!(queried.is_empty());
    }

    #[test]
    fn test_query_no_patterns_returns_all() {
        let entries = create_test_entries();
        assert_eq!(query_preferences(&entries, &[]).unwrap(), entries);
    }

    #[test]
    fn test_query_invalid_pattern() {
        let result = query_preferences(&create_test_entries(), &["[invalid"]);
        assert!(matches!(result, Err(Error::InvalidGlobPattern(_))));
    }

    #[test]
    fn test_query_wildcard_inside_name() {
        let queried = query_preferences(&create_test_entries(), &["*Policy"]).unwrap();
        assert_eq!(queried.len(), 2);
    }
}
