//! Serializer for prefs files
//!
//! Produces text that [`crate::parse_prefs_js`] reads back to the same values.

use crate::types::{PrefEntry, PrefValue};
use std::fmt::Write;

const HEADER: &str = "// prefpane user preferences\n\
// Written by prefpane; edits made while the browser is running may be overwritten.\n\n";

/// Render entries as prefs file statements, one per line, after a short header
pub fn write_prefs_js(entries: &[PrefEntry]) -> String {
    let mut out = String::from(HEADER);
    for entry in entries {
        write_statement(&mut out, entry);
    }
    out
}

fn write_statement(out: &mut String, entry: &PrefEntry) {
    out.push_str(entry.pref_type.function_name());
    out.push('(');
    write_string(out, &entry.key);
    out.push_str(", ");
    write_value(out, &entry.value);
    out.push_str(");\n");
}

fn write_value(out: &mut String, value: &PrefValue) {
    match value {
        PrefValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        PrefValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        PrefValue::Float(f) if f.is_finite() => {
            let _ = write!(out, "{:?}", f);
        }
        // prefs syntax has no NaN or infinity
        PrefValue::Float(_) | PrefValue::Null => out.push_str("null"),
        PrefValue::String(s) => write_string(out, s),
        PrefValue::StringList(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, item);
            }
            out.push(']');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_prefs_js;
    use crate::types::PrefType;

    fn entry(key: &str, value: PrefValue, pref_type: PrefType) -> PrefEntry {
        PrefEntry {
            key: key.to_string(),
            value,
            pref_type,
            explanation: None,
            source: None,
            source_file: None,
        }
    }

    #[test]
    fn test_write_statement_forms() {
        let text = write_prefs_js(&[
            entry("Browser/PrivateMode", PrefValue::Bool(true), PrefType::User),
            entry(
                "History/ClearOnClose",
                PrefValue::list(["browsing", "caches"]),
                PrefType::Locked,
            ),
        ]);
        assert!(text.contains("user_pref(\"Browser/PrivateMode\", true);\n"));
        assert!(text.contains("lock_pref(\"History/ClearOnClose\", [\"browsing\", \"caches\"]);\n"));
    }

    #[test]
    fn test_written_text_parses_back() {
        let entries = vec![
            entry("a", PrefValue::String("quote \" slash \\ nl \n bell \x07".to_string()), PrefType::User),
            entry("b", PrefValue::Integer(-7), PrefType::Sticky),
            entry("c", PrefValue::Float(0.25), PrefType::User),
            entry("d", PrefValue::StringList(Vec::new()), PrefType::User),
            entry("e", PrefValue::Null, PrefType::Default),
        ];
        let parsed = parse_prefs_js(&write_prefs_js(&entries)).unwrap();
        assert_eq!(parsed.len(), entries.len());
        for (written, read) in entries.iter().zip(&parsed) {
            assert_eq!(written.key, read.key);
            assert_eq!(written.value, read.value);
            assert_eq!(written.pref_type, read.pref_type);
        }
    }

    #[test]
    fn test_whole_float_reads_back_as_integer() {
        let parsed =
            parse_prefs_js(&write_prefs_js(&[entry("f", PrefValue::Float(2.0), PrefType::User)]))
                .unwrap();
        assert_eq!(parsed[0].value, PrefValue::Integer(2));
    }
}
