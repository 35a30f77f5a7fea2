// Public API tests for reading and writing prefs files
use prefpane::{
    parse_prefs_js, parse_prefs_js_file, query_preferences, write_prefs_js, Error, OptionKey,
    PrefEntry, PrefSource, PrefType, PrefValue, PrefValueExt,
};
use tempfile::TempDir;

#[test]
fn test_parse_prefs_js_basic_api() {
    let content = r#"
        user_pref("Network/DoNotTrackPolicy", "allow");
        user_pref("Browser/PrivateMode", true);
        pref("Network/CookiesKeepMode", "ask");
        sticky_pref("History/RememberBrowsing", true);
        lock_pref("Browser/RememberPasswords", false);
    "#;

    let prefs = parse_prefs_js(content).expect("Failed to parse preferences");
    assert_eq!(prefs.len(), 5);

    let policy = PrefEntry::find_by_key(&prefs, "Network/DoNotTrackPolicy").unwrap();
    assert_eq!(policy.value, PrefValue::String("allow".to_string()));
    assert_eq!(policy.pref_type, PrefType::User);
    assert_eq!(policy.source, Some(PrefSource::User));

    let types: Vec<PrefType> = prefs.iter().map(|p| p.pref_type).collect();
    assert_eq!(
        types,
        vec![
            PrefType::User,
            PrefType::User,
            PrefType::Default,
            PrefType::Sticky,
            PrefType::Locked
        ]
    );
}

#[test]
fn test_parse_string_lists() {
    let content = r#"
        user_pref("History/ClearOnClose", ["browsing", "cookies"]);
        user_pref("Network/ThirdPartyCookiesAcceptedHosts", []);
    "#;

    let prefs = parse_prefs_js(content).expect("Failed to parse");
    assert_eq!(
        prefs[0].value.as_string_list(),
        Some(&["browsing".to_string(), "cookies".to_string()][..])
    );
    assert_eq!(prefs[1].value, PrefValue::StringList(vec![]));
    assert!(OptionKey::HistoryClearOnClose.validate(&prefs[0].value).is_ok());
}

#[test]
fn test_parse_prefs_js_file_sets_source_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.js");
    std::fs::write(&path, "// comment\nuser_pref(\"Browser/PrivateMode\", false);\n").unwrap();

    let prefs = parse_prefs_js_file(&path).expect("Failed to parse prefs.js");
    assert_eq!(prefs.len(), 1);
    assert_eq!(prefs[0].source_file.as_deref(), Some("prefs.js"));

    let missing = parse_prefs_js_file(&dir.path().join("missing.js"));
    assert!(matches!(missing, Err(Error::Io(_))));
}

#[test]
fn test_query_multiple_patterns() {
    let content = r#"
        user_pref("Network/CookiesPolicy", "readOnly");
        user_pref("Network/DoNotTrackPolicy", "skip");
        user_pref("Browser/PrivateMode", true);
        user_pref("History/RememberDownloads", false);
    "#;
    let prefs = parse_prefs_js(content).expect("Failed to parse");

    let network = query_preferences(&prefs, &["Network/*"]).expect("Failed to query");
    assert_eq!(network.len(), 2);
    assert!(network.iter().all(|p| p.key.starts_with("Network/")));

    let results =
        query_preferences(&prefs, &["Browser/*", "History/*"]).expect("Failed to query");
    assert_eq!(results.len(), 2);

    assert!(matches!(
        query_preferences(&prefs, &["[invalid"]),
        Err(Error::InvalidGlobPattern(_))
    ));
}

#[test]
fn test_write_then_parse_keeps_statements() {
    let content = r#"
        user_pref("Network/CookiesPolicy", "acceptExisting");
        sticky_pref("Browser/PrivateMode", true);
        user_pref("History/ClearOnClose", ["forms", "quote\"d"]);
        user_pref("Some/Other", 12);
    "#;
    let prefs = parse_prefs_js(content).expect("Failed to parse");

    let written = write_prefs_js(&prefs);
    assert!(written.contains(r#"sticky_pref("Browser/PrivateMode", true);"#));

    let reparsed = parse_prefs_js(&written).expect("Failed to reparse");
    let pairs = |entries: &[PrefEntry]| -> Vec<(String, PrefValue, PrefType)> {
        entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone(), e.pref_type))
            .collect()
    };
    assert_eq!(pairs(&reparsed), pairs(&prefs));
}

#[test]
fn test_json_serialization() {
    let prefs = parse_prefs_js(r#"user_pref("History/ClearOnClose", ["caches"]);"#)
        .expect("Failed to parse");

    let json = serde_json::to_value(&prefs[0]).expect("Failed to serialize");
    assert_eq!(json["key"], "History/ClearOnClose");
    assert_eq!(json["value"], serde_json::json!(["caches"]));
    assert_eq!(json["source"], "user");

    assert_eq!(
        serde_json::to_string(&PrefSource::DefaultsFile).unwrap(),
        "\"defaults_file\""
    );
}

#[test]
fn test_syntax_errors_carry_position() {
    match parse_prefs_js("user_pref(\"Browser/PrivateMode\" true);") {
        Err(Error::Parser {
            line,
            column,
            message,
        }) => {
            assert_eq!(line, 1);
            assert!(column > 1);
            assert!(!message.is_empty());
        }
        other => panic!("Expected parser error, got {:?}", other),
    }

    match parse_prefs_js("user_pref(\"unclosed);") {
        Err(Error::Lexer { line, .. }) => assert_eq!(line, 1),
        other => panic!("Expected lexer error, got {:?}", other),
    }
}
