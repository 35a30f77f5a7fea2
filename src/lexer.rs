//! Lexer for tokenizing prefs files
//!
//! Converts a character stream into tokens for the prefs file parser. Handles
//! JavaScript string escapes, `//` and `/* */` comments, and the bracketed
//! string lists used for list-valued options. Line and column numbers are
//! tracked for error reporting.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (user_pref, pref, lock_pref, sticky_pref)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Numeric value (integer or float)
    Number(f64),
    Boolean(bool),
    Null,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Eof,
}

/// Lexer for tokenizing prefs files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Position where the most recently returned token starts
    token_start: (usize, usize),
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            token_start: (1, 1),
        }
    }

    /// Line and column where the last token returned by [`Lexer::next_token`] starts
    pub fn token_start(&self) -> (usize, usize) {
        self.token_start
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;
        self.token_start = (self.line, self.column);

        let Some(&c) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(token) = single {
            self.bump();
            return Ok(token);
        }

        match c {
            '"' => self.lex_string(),
            '-' | '0'..='9' => self.lex_number(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier()),
            _ => Err(self.error(format!("Unexpected character: '{}'", c))),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Lexer {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    /// Consume one character, keeping line/column in sync
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while matches!(self.chars.peek(), Some(' ' | '\t' | '\r' | '\n')) {
                self.bump();
            }

            if self.chars.peek() != Some(&'/') {
                return Ok(());
            }
            self.bump();

            match self.chars.peek() {
                Some('/') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('*') => {
                    self.bump();
                    let (line, column) = (self.line, self.column);
                    loop {
                        match self.bump() {
                            Some('*') if self.chars.peek() == Some(&'/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(Error::Lexer {
                                    line,
                                    column,
                                    message: "Unterminated block comment".to_string(),
                                })
                            }
                        }
                    }
                }
                _ => return Err(self.error("Unexpected character: '/'")),
            }
        }
    }

    /// Lex an identifier or keyword (true, false, null)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            ident.push(c);
            self.bump();
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a double-quoted string literal
    fn lex_string(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);
        self.bump();

        let mut result = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => self.lex_escape(&mut result)?,
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_col,
                        message: "Unterminated string literal".to_string(),
                    })
                }
            }
        }
    }

    /// Decode the escape following a backslash into `out`
    fn lex_escape(&mut self, out: &mut String) -> Result<()> {
        match self.bump() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('0') => {
                if self.chars.peek() == Some(&'0') {
                    return Err(
                        self.error("Octal escape sequences are not supported. Use \\x00 instead.")
                    );
                }
                out.push('\0');
            }
            Some('x') => {
                let code = self.lex_hex_digits(2, "hex")?;
                out.push(char::from(code as u8));
            }
            Some('u') => {
                let code = self.lex_hex_digits(4, "unicode")?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some(c) => return Err(self.error(format!("Invalid escape sequence: \\{}", c))),
            None => return Err(self.error("Unexpected end of input in escape sequence")),
        }
        Ok(())
    }

    fn lex_hex_digits(&mut self, count: usize, kind: &str) -> Result<u32> {
        let mut hex = String::with_capacity(count);
        while hex.len() < count {
            match self.chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    self.bump();
                }
                _ => break,
            }
        }
        if hex.len() != count {
            return Err(self.error(format!("Incomplete {} escape: {}", kind, hex)));
        }
        u32::from_str_radix(&hex, 16)
            .map_err(|_| self.error(format!("Invalid {} escape: {}", kind, hex)))
    }

    /// Lex a number (integer or float, including scientific notation)
    fn lex_number(&mut self) -> Result<Token> {
        let start_col = self.column;
        let mut num_str = String::new();

        if self.chars.peek() == Some(&'-') {
            num_str.push('-');
            self.bump();
        }
        self.take_digits(&mut num_str);

        if self.chars.peek() == Some(&'.') {
            num_str.push('.');
            self.bump();
            self.take_digits(&mut num_str);
        }

        if matches!(self.chars.peek(), Some('e' | 'E')) {
            num_str.push('e');
            self.bump();
            if let Some(&sign @ ('+' | '-')) = self.chars.peek() {
                num_str.push(sign);
                self.bump();
            }
            if self.take_digits(&mut num_str) == 0 {
                return Err(self.error("Missing exponent digits in scientific notation"));
            }
        }

        num_str.parse::<f64>().map(Token::Number).map_err(|_| Error::Lexer {
            line: self.line,
            column: start_col,
            message: format!("Failed to parse number: {}", num_str),
        })
    }

    fn take_digits(&mut self, out: &mut String) -> usize {
        let mut taken = 0;
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.bump();
            taken += 1;
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_lexer_punctuation() {
        assert_eq!(
            tokens("( ) [ ] , ;"),
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Comma,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lexer_comments() {
        assert_eq!(
            tokens("( // line comment\n /* block\ncomment */ )"),
            vec![Token::LeftParen, Token::RightParen]
        );
    }

    #[test]
    fn test_lexer_unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_stray_slash() {
        let mut lexer = Lexer::new("/ user_pref");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_keywords_and_identifiers() {
        assert_eq!(
            tokens("user_pref lock_pref true false null"),
            vec![
                Token::Identifier("user_pref".to_string()),
                Token::Identifier("lock_pref".to_string()),
                Token::Boolean(true),
                Token::Boolean(false),
                Token::Null,
            ]
        );
    }

    #[test]
    fn test_lexer_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b\\c\n\t\x41B\b\f\0""#),
            vec![Token::String("a\"b\\c\n\tAB\x08\x0c\0".to_string())]
        );
    }

    #[test]
    fn test_lexer_null_escape_followed_by_digit() {
        assert_eq!(
            tokens(r#""test\01""#),
            vec![Token::String("test\x001".to_string())]
        );
    }

    #[test]
    fn test_lexer_string_errors() {
        for input in [r#""test\00""#, r#""\xG1""#, r#""\u12""#, r#""\q""#, r#""open"#] {
            let mut lexer = Lexer::new(input);
            assert!(lexer.next_token().is_err(), "expected error for {}", input);
        }
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(
            tokens("42 -42 2.5 1.5e10 3e-8"),
            vec![
                Token::Number(42.0),
                Token::Number(-42.0),
                Token::Number(2.5),
                Token::Number(1.5e10),
                Token::Number(3e-8),
            ]
        );
    }

    #[test]
    fn test_lexer_missing_exponent() {
        let mut lexer = Lexer::new("1e");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_tracks_lines() {
        let mut lexer = Lexer::new("(\n\n  @");
        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
        match lexer.next_token() {
            Err(Error::Lexer { line, column, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, 3);
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_lexer_list_statement() {
        assert_eq!(
            tokens(r#"user_pref("History/ClearOnClose", ["browsing", "cookies"]);"#),
            vec![
                Token::Identifier("user_pref".to_string()),
                Token::LeftParen,
                Token::String("History/ClearOnClose".to_string()),
                Token::Comma,
                Token::LeftBracket,
                Token::String("browsing".to_string()),
                Token::Comma,
                Token::String("cookies".to_string()),
                Token::RightBracket,
                Token::RightParen,
                Token::Semicolon,
            ]
        );
    }
}
