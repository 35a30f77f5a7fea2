//! Core value types shared by the prefs file parser and the settings store

use serde::Serialize;
use std::fmt;

/// How a preference was declared in a prefs file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefType {
    /// `user_pref(...)`
    User,
    /// `pref(...)`
    Default,
    /// `lock_pref(...)`
    Locked,
    /// `sticky_pref(...)`
    Sticky,
}

impl PrefType {
    /// Name of the statement function that declares this type
    pub fn function_name(&self) -> &'static str {
        match self {
            PrefType::User => "user_pref",
            PrefType::Default => "pref",
            PrefType::Locked => "lock_pref",
            PrefType::Sticky => "sticky_pref",
        }
    }
}

/// Layer a preference value was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefSource {
    /// Compiled-in default from the option registry
    BuiltIn,
    /// `pref()` line from the defaults file
    DefaultsFile,
    /// Value from the user prefs file or set through the store
    User,
}

/// A preference value
///
/// Numbers are kept as [`PrefValue::Integer`] when they have no fractional
/// part. String lists are an extension over plain prefs.js syntax and are
/// written as `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
    Null,
}

impl PrefValue {
    /// Convert a lexed number, keeping whole numbers as integers
    pub fn from_f64(n: f64) -> Self {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            PrefValue::Integer(n as i64)
        } else {
            PrefValue::Float(n)
        }
    }

    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Integer(_) => "integer",
            PrefValue::Float(_) => "float",
            PrefValue::String(_) => "string",
            PrefValue::StringList(_) => "string list",
            PrefValue::Null => "null",
        }
    }

    /// Build a string list value from anything yielding strings
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrefValue::StringList(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

impl From<Vec<String>> for PrefValue {
    fn from(value: Vec<String>) -> Self {
        PrefValue::StringList(value)
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(i) => write!(f, "{}", i),
            PrefValue::Float(x) => write!(f, "{}", x),
            PrefValue::String(s) => write!(f, "{}", s),
            PrefValue::StringList(items) => write!(f, "[{}]", items.join(", ")),
            PrefValue::Null => write!(f, "null"),
        }
    }
}

/// Convenience accessors for [`PrefValue`]
pub trait PrefValueExt {
    fn as_bool(&self) -> Option<bool>;
    fn as_i64(&self) -> Option<i64>;
    fn as_f64(&self) -> Option<f64>;
    fn as_str(&self) -> Option<&str>;
    fn as_string_list(&self) -> Option<&[String]>;
    fn is_number(&self) -> bool;
}

impl PrefValueExt for PrefValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Integer(i) => Some(*i as f64),
            PrefValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn as_string_list(&self) -> Option<&[String]> {
        match self {
            PrefValue::StringList(items) => Some(items),
            _ => None,
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, PrefValue::Integer(_) | PrefValue::Float(_))
    }
}

/// One statement read from a prefs file, or one effective option value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PrefSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl PrefEntry {
    /// Find the last entry for `key`; later statements win, as in prefs.js
    pub fn find_by_key<'a>(entries: &'a [PrefEntry], key: &str) -> Option<&'a PrefEntry> {
        entries.iter().rev().find(|e| e.key == key)
    }
}
