//! Registry of the options the preference pages read and write
//!
//! Each option has a persisted name, a value kind, a documented default and a
//! human-readable description. Descriptions are also looked up by name for
//! entries read from prefs files, through a lazily built table.

use crate::error::{Error, Result};
use crate::types::PrefValue;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Kind of value an option holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Bool,
    String,
    StringList,
}

impl OptionKind {
    pub fn name(&self) -> &'static str {
        match self {
            OptionKind::Bool => "bool",
            OptionKind::String => "string",
            OptionKind::StringList => "string list",
        }
    }

    /// Whether `value` is acceptable for an option of this kind
    pub fn accepts(&self, value: &PrefValue) -> bool {
        matches!(
            (self, value),
            (OptionKind::Bool, PrefValue::Bool(_))
                | (OptionKind::String, PrefValue::String(_))
                | (OptionKind::StringList, PrefValue::StringList(_))
        )
    }
}

/// Identifier of a known option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    BrowserPrivateMode,
    BrowserRememberPasswords,
    HistoryClearOnClose,
    HistoryRememberBrowsing,
    HistoryRememberDownloads,
    NetworkCookiesKeepMode,
    NetworkCookiesPolicy,
    NetworkDoNotTrackPolicy,
    NetworkThirdPartyCookiesAcceptedHosts,
    NetworkThirdPartyCookiesPolicy,
    NetworkThirdPartyCookiesRejectedHosts,
}

impl OptionKey {
    /// Every known option, sorted by name
    pub const ALL: [OptionKey; 11] = [
        OptionKey::BrowserPrivateMode,
        OptionKey::BrowserRememberPasswords,
        OptionKey::HistoryClearOnClose,
        OptionKey::HistoryRememberBrowsing,
        OptionKey::HistoryRememberDownloads,
        OptionKey::NetworkCookiesKeepMode,
        OptionKey::NetworkCookiesPolicy,
        OptionKey::NetworkDoNotTrackPolicy,
        OptionKey::NetworkThirdPartyCookiesAcceptedHosts,
        OptionKey::NetworkThirdPartyCookiesPolicy,
        OptionKey::NetworkThirdPartyCookiesRejectedHosts,
    ];

    /// Name the option is persisted under
    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::BrowserPrivateMode => "Browser/PrivateMode",
            OptionKey::BrowserRememberPasswords => "Browser/RememberPasswords",
            OptionKey::HistoryClearOnClose => "History/ClearOnClose",
            OptionKey::HistoryRememberBrowsing => "History/RememberBrowsing",
            OptionKey::HistoryRememberDownloads => "History/RememberDownloads",
            OptionKey::NetworkCookiesKeepMode => "Network/CookiesKeepMode",
            OptionKey::NetworkCookiesPolicy => "Network/CookiesPolicy",
            OptionKey::NetworkDoNotTrackPolicy => "Network/DoNotTrackPolicy",
            OptionKey::NetworkThirdPartyCookiesAcceptedHosts => {
                "Network/ThirdPartyCookiesAcceptedHosts"
            }
            OptionKey::NetworkThirdPartyCookiesPolicy => "Network/ThirdPartyCookiesPolicy",
            OptionKey::NetworkThirdPartyCookiesRejectedHosts => {
                "Network/ThirdPartyCookiesRejectedHosts"
            }
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            OptionKey::BrowserPrivateMode
            | OptionKey::BrowserRememberPasswords
            | OptionKey::HistoryRememberBrowsing
            | OptionKey::HistoryRememberDownloads => OptionKind::Bool,
            OptionKey::NetworkCookiesKeepMode
            | OptionKey::NetworkCookiesPolicy
            | OptionKey::NetworkDoNotTrackPolicy
            | OptionKey::NetworkThirdPartyCookiesPolicy => OptionKind::String,
            OptionKey::HistoryClearOnClose
            | OptionKey::NetworkThirdPartyCookiesAcceptedHosts
            | OptionKey::NetworkThirdPartyCookiesRejectedHosts => OptionKind::StringList,
        }
    }

    /// Compiled-in default value
    pub fn default_value(&self) -> PrefValue {
        match self {
            OptionKey::BrowserPrivateMode | OptionKey::BrowserRememberPasswords => {
                PrefValue::Bool(false)
            }
            OptionKey::HistoryRememberBrowsing | OptionKey::HistoryRememberDownloads => {
                PrefValue::Bool(true)
            }
            OptionKey::NetworkCookiesKeepMode => PrefValue::from("keepUntilExpires"),
            OptionKey::NetworkCookiesPolicy | OptionKey::NetworkThirdPartyCookiesPolicy => {
                PrefValue::from("acceptAll")
            }
            OptionKey::NetworkDoNotTrackPolicy => PrefValue::from("skip"),
            OptionKey::HistoryClearOnClose
            | OptionKey::NetworkThirdPartyCookiesAcceptedHosts
            | OptionKey::NetworkThirdPartyCookiesRejectedHosts => {
                PrefValue::StringList(Vec::new())
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OptionKey::BrowserPrivateMode => {
                "Opens every window in private mode. While enabled, browsing and download \
                 history are not recorded and the history settings have no effect."
            }
            OptionKey::BrowserRememberPasswords => {
                "Offers to store passwords entered into web forms and fills them in on later visits."
            }
            OptionKey::HistoryClearOnClose => {
                "Categories of data removed when the browser exits (browsing, cookies, forms, \
                 downloads, search, caches, storage, passwords). Empty means nothing is cleared."
            }
            OptionKey::HistoryRememberBrowsing => {
                "Records visited pages in the browsing history."
            }
            OptionKey::HistoryRememberDownloads => {
                "Keeps a list of finished downloads in the downloads history."
            }
            OptionKey::NetworkCookiesKeepMode => {
                "How long accepted cookies are kept: keepUntilExpires honours the cookie's own \
                 expiry, keepUntilExit drops them when the session ends, ask prompts each time."
            }
            OptionKey::NetworkCookiesPolicy => {
                "Which cookies websites may set: acceptAll, acceptExisting (only update cookies \
                 already stored), readOnly (send stored cookies but accept no changes) or \
                 ignore (cookies disabled)."
            }
            OptionKey::NetworkDoNotTrackPolicy => {
                "Do Not Track header sent with requests: doNotAllow asks sites not to track, \
                 allow signals consent, skip sends no header."
            }
            OptionKey::NetworkThirdPartyCookiesAcceptedHosts => {
                "Hosts whose third-party cookies are always accepted, regardless of the \
                 third-party cookies policy."
            }
            OptionKey::NetworkThirdPartyCookiesPolicy => {
                "Which third-party cookies are accepted: acceptAll, acceptExisting or ignore."
            }
            OptionKey::NetworkThirdPartyCookiesRejectedHosts => {
                "Hosts whose third-party cookies are always rejected, regardless of the \
                 third-party cookies policy."
            }
        }
    }

    /// Look up an option by its persisted name
    pub fn from_name(name: &str) -> Option<OptionKey> {
        options_by_name().get(name).copied()
    }

    /// Like [`OptionKey::from_name`], but an unknown name is an error
    pub fn parse(name: &str) -> Result<OptionKey> {
        Self::from_name(name).ok_or_else(|| Error::UnknownOption(name.to_string()))
    }

    /// Check that `value` has the kind this option stores
    pub fn validate(&self, value: &PrefValue) -> Result<()> {
        let kind = self.kind();
        if kind.accepts(value) {
            Ok(())
        } else {
            Err(Error::InvalidOptionValue {
                option: self.name(),
                expected: kind.name(),
                actual: value.kind_name(),
            })
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static OPTIONS_BY_NAME: OnceLock<HashMap<&'static str, OptionKey>> = OnceLock::new();

fn options_by_name() -> &'static HashMap<&'static str, OptionKey> {
    OPTIONS_BY_NAME.get_or_init(|| OptionKey::ALL.iter().map(|k| (k.name(), *k)).collect())
}

/// Description of a known option, by persisted name
pub(crate) fn describe(name: &str) -> Option<&'static str> {
    OptionKey::from_name(name).map(|key| key.description())
}
