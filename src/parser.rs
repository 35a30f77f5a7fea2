//! Parser for prefs files
//!
//! A recursive descent parser over the JavaScript-like preference syntax:
//!
//! ```text
//! user_pref("Browser/PrivateMode", true);          // user value
//! pref("Network/CookiesPolicy", "acceptAll");      // default
//! lock_pref("Browser/RememberPasswords", false);   // locked
//! sticky_pref("History/RememberBrowsing", true);   // sticky
//! user_pref("History/ClearOnClose", ["browsing"]); // string list
//! ```
//!
//! # Example
//!
//! ```rust
//! use prefpane::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     // comment
//!     user_pref("Network/DoNotTrackPolicy", "doNotAllow");
//!     lock_pref("Browser/PrivateMode", true);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! assert_eq!(prefs[0].value, PrefValue::String("doNotAllow".to_string()));
//! assert_eq!(prefs[1].pref_type, PrefType::Locked);
//! # Ok::<(), prefpane::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::options;
use crate::types::{PrefEntry, PrefSource, PrefType, PrefValue};
use std::path::Path;

/// Parse prefs file content into entries, in file order
pub fn parse_prefs_js(content: &str) -> Result<Vec<PrefEntry>> {
    Parser::new(content)?.parse()
}

/// Read and parse a prefs file, tagging entries with the file name
pub fn parse_prefs_js_file(path: &Path) -> Result<Vec<PrefEntry>> {
    let content = std::fs::read_to_string(path)?;
    let mut entries = parse_prefs_js(&content)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    for entry in &mut entries {
        entry.source_file = Some(file_name.clone());
    }
    Ok(entries)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current lookahead token
    current: Token,
    /// Position where `current` starts
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut parser = Parser {
            lexer: Lexer::new(input),
            current: Token::Eof,
            line: 1,
            column: 1,
        };
        parser.advance()?;
        Ok(parser)
    }

    fn parse(&mut self) -> Result<Vec<PrefEntry>> {
        let mut preferences = Vec::new();

        while self.current != Token::Eof {
            let (key, value, pref_type) = self.parse_statement()?;
            let source = match pref_type {
                PrefType::Default => PrefSource::DefaultsFile,
                _ => PrefSource::User,
            };
            preferences.push(PrefEntry {
                explanation: options::describe(&key),
                key,
                value,
                pref_type,
                source: Some(source),
                source_file: None,
            });
        }

        Ok(preferences)
    }

    /// pref_function "(" key "," value ")" ";"
    fn parse_statement(&mut self) -> Result<(String, PrefValue, PrefType)> {
        let pref_type = self.parse_pref_function()?;
        self.expect(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect(Token::Comma)?;
        let value = self.parse_value()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;
        Ok((key, value, pref_type))
    }

    fn parse_pref_function(&mut self) -> Result<PrefType> {
        let pref_type = match &self.current {
            Token::Identifier(ident) => match ident.as_str() {
                "user_pref" => PrefType::User,
                "pref" => PrefType::Default,
                "lock_pref" => PrefType::Locked,
                "sticky_pref" => PrefType::Sticky,
                _ => {
                    return Err(self.error(format!(
                        "Unknown pref function '{}'. Expected user_pref, pref, lock_pref, or sticky_pref",
                        ident
                    )))
                }
            },
            other => {
                return Err(self.error(format!(
                    "Expected pref function name (user_pref, pref, lock_pref, sticky_pref), got {:?}",
                    other
                )))
            }
        };
        self.advance()?;
        Ok(pref_type)
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        let value = match &mut self.current {
            Token::String(s) => PrefValue::String(std::mem::take(s)),
            Token::Number(n) => PrefValue::from_f64(*n),
            Token::Boolean(b) => PrefValue::Bool(*b),
            Token::Null => PrefValue::Null,
            Token::LeftBracket => return self.parse_list(),
            Token::Eof => return Err(self.error("Unexpected end of input")),
            other => {
                let message = format!("Expected value, got {:?}", other);
                return Err(self.error(message));
            }
        };
        self.advance()?;
        Ok(value)
    }

    /// "[" ( string ( "," string )* )? "]"
    fn parse_list(&mut self) -> Result<PrefValue> {
        self.expect(Token::LeftBracket)?;
        let mut items = Vec::new();

        if self.current == Token::RightBracket {
            self.advance()?;
            return Ok(PrefValue::StringList(items));
        }

        loop {
            items.push(self.expect_string()?);
            match self.current {
                Token::Comma => self.advance()?,
                Token::RightBracket => {
                    self.advance()?;
                    return Ok(PrefValue::StringList(items));
                }
                _ => {
                    return Err(self.error(format!(
                        "Expected ',' or ']' in string list, got {:?}",
                        self.current
                    )))
                }
            }
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current == expected {
            return self.advance();
        }
        if self.current == Token::Eof {
            return Err(self.error("Unexpected end of input"));
        }
        Err(self.error(format!("Expected {:?}, got {:?}", expected, self.current)))
    }

    fn expect_string(&mut self) -> Result<String> {
        match &mut self.current {
            Token::String(s) => {
                let s = std::mem::take(s);
                self.advance()?;
                Ok(s)
            }
            Token::Eof => Err(self.error("Unexpected end of input")),
            other => {
                let message = format!("Expected string, got {:?}", other);
                Err(self.error(message))
            }
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        (self.line, self.column) = self.lexer.token_start();
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parser {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValueExt;

    fn single(input: &str) -> PrefEntry {
        let mut result = parse_prefs_js(input).unwrap();
        assert_eq!(result.len(), 1);
        result.remove(0)
    }

    #[test]
    fn test_parse_string() {
        let entry = single(r#"user_pref("Network/DoNotTrackPolicy", "allow");"#);
        assert_eq!(entry.key, "Network/DoNotTrackPolicy");
        assert_eq!(entry.value, PrefValue::String("allow".to_string()));
        assert_eq!(entry.pref_type, PrefType::User);
        assert_eq!(entry.source, Some(PrefSource::User));
    }

    #[test]
    fn test_parse_boolean_and_numbers() {
        let result = parse_prefs_js(
            r#"
            user_pref("a", true);
            user_pref("b", 0);
            user_pref("c", -3.14);
            user_pref("d", null);
        "#,
        )
        .unwrap();
        assert_eq!(result[0].value, PrefValue::Bool(true));
        assert_eq!(result[1].value, PrefValue::Integer(0));
        assert!(result[2].value.is_number());
        assert_eq!(result[3].value, PrefValue::Null);
    }

    #[test]
    fn test_parse_string_list() {
        let entry = single(r#"user_pref("History/ClearOnClose", ["browsing", "", "caches"]);"#);
        assert_eq!(
            entry.value,
            PrefValue::list(["browsing", "", "caches"])
        );
    }

    #[test]
    fn test_parse_empty_list() {
        let entry = single(r#"user_pref("Network/ThirdPartyCookiesAcceptedHosts", []);"#);
        assert_eq!(entry.value, PrefValue::StringList(Vec::new()));
    }

    #[test]
    fn test_parse_list_rejects_non_strings() {
        assert!(parse_prefs_js(r#"user_pref("a", ["x", 1]);"#).is_err());
        assert!(parse_prefs_js(r#"user_pref("a", ["x" "y"]);"#).is_err());
        assert!(parse_prefs_js(r#"user_pref("a", ["x",]);"#).is_err());
    }

    #[test]
    fn test_parse_pref_types() {
        let result = parse_prefs_js(
            r#"
            user_pref("user.pref", "v1");
            pref("default.pref", "v2");
            lock_pref("locked.pref", "v3");
            sticky_pref("sticky.pref", "v4");
        "#,
        )
        .unwrap();
        let types: Vec<PrefType> = result.iter().map(|e| e.pref_type).collect();
        assert_eq!(
            types,
            vec![
                PrefType::User,
                PrefType::Default,
                PrefType::Locked,
                PrefType::Sticky
            ]
        );
        assert_eq!(result[1].source, Some(PrefSource::DefaultsFile));
    }

    #[test]
    fn test_parse_multiline_with_comments() {
        let entry = single(
            r#"
            user_pref(
                "test",  // inline comment
                /* block */ "value"
            );
        "#,
        );
        assert_eq!(entry.value.as_str(), Some("value"));
    }

    #[test]
    fn test_parse_escaped_json_string() {
        let entry = single(r#"user_pref("test", "{\"key\":\"value\"}");"#);
        assert_eq!(entry.value.as_str(), Some("{\"key\":\"value\"}"));
    }

    #[test]
    fn test_malformed_missing_semicolon() {
        assert!(parse_prefs_js(r#"user_pref("test", "value")"#).is_err());
    }

    #[test]
    fn test_malformed_unclosed_string() {
        assert!(parse_prefs_js(r#"user_pref("test", "value);"#).is_err());
    }

    #[test]
    fn test_malformed_unknown_pref_function() {
        let err = parse_prefs_js(r#"unknown_func("test", "value");"#).unwrap_err();
        assert!(err.to_string().contains("Unknown pref function"));
    }

    #[test]
    fn test_error_position() {
        let err = parse_prefs_js("user_pref(\"a\", 1);\nuser_pref(\"b\" 2);").unwrap_err();
        match err {
            Error::Parser { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 15);
            }
            other => panic!("expected parser error, got {:?}", other),
        }
    }

    #[test]
    fn test_known_options_get_explanations() {
        let result = parse_prefs_js(
            r#"
            user_pref("Browser/PrivateMode", true);
            user_pref("unknown.preference", "test");
        "#,
        )
        .unwrap();
        assert!(result[0].explanation.is_some());
        assert!(result[1].explanation.is_none());
    }
}
