//! Option tokens persisted for the privacy settings
//!
//! Each enum maps to the exact strings stored in the settings store, plus the
//! label shown next to it on the page.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A closed set of persisted string values
pub trait OptionToken: Copy + PartialEq + fmt::Debug + 'static {
    /// Every value, in display order
    const ALL: &'static [Self];

    fn token(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.token() == token)
    }
}

macro_rules! option_tokens {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($token:literal, $label:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl OptionToken for $name {
            const ALL: &'static [Self] = &[$($name::$variant,)+];

            fn token(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as OptionToken>::from_token(s).ok_or_else(|| {
                    let valid: Vec<&str> = Self::ALL.iter().map(|v| v.token()).collect();
                    format!("unknown value '{}', expected one of: {}", s, valid.join(", "))
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.token())
            }
        }
    };
}

option_tokens! {
    /// What websites are told about tracking
    pub enum DoNotTrackPolicy {
        DoNotAllow => ("doNotAllow", "Inform websites that I do not want to be tracked"),
        Allow => ("allow", "Inform websites that I allow tracking"),
        Skip => ("skip", "Do not inform websites about my preference"),
    }
}

option_tokens! {
    /// Which cookies are accepted; `Ignore` means cookies are disabled
    pub enum CookiesPolicy {
        AcceptAll => ("acceptAll", "Always"),
        AcceptExisting => ("acceptExisting", "Only existing"),
        ReadOnly => ("readOnly", "Only read existing"),
        Ignore => ("ignore", "Never"),
    }
}

impl CookiesPolicy {
    /// Choices offered while cookies are enabled
    pub const SELECTABLE: &'static [CookiesPolicy] = &[
        CookiesPolicy::AcceptAll,
        CookiesPolicy::AcceptExisting,
        CookiesPolicy::ReadOnly,
    ];
}

option_tokens! {
    /// How long cookies are kept
    pub enum CookiesKeepMode {
        KeepUntilExpires => ("keepUntilExpires", "Expires"),
        KeepUntilExit => ("keepUntilExit", "Current session is closed"),
        Ask => ("ask", "Always ask"),
    }
}

option_tokens! {
    pub enum ThirdPartyCookiesPolicy {
        AcceptAll => ("acceptAll", "Always"),
        AcceptExisting => ("acceptExisting", "Only existing"),
        Ignore => ("ignore", "Never"),
    }
}

option_tokens! {
    /// Data removed when history is cleared
    pub enum ClearHistoryCategory {
        Browsing => ("browsing", "Browsing history"),
        Cookies => ("cookies", "Cookies"),
        Forms => ("forms", "Forms history"),
        Downloads => ("downloads", "Downloads history"),
        Search => ("search", "Search history"),
        Caches => ("caches", "Caches"),
        Storage => ("storage", "Websites storage"),
        Passwords => ("passwords", "Passwords"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(DoNotTrackPolicy::Skip.token(), "skip");
        assert_eq!(CookiesPolicy::ReadOnly.token(), "readOnly");
        assert_eq!(CookiesKeepMode::KeepUntilExit.token(), "keepUntilExit");
        assert_eq!(ThirdPartyCookiesPolicy::Ignore.token(), "ignore");
    }

    #[test]
    fn test_from_token() {
        assert_eq!(
            CookiesPolicy::from_token("acceptExisting"),
            Some(CookiesPolicy::AcceptExisting)
        );
        assert_eq!(DoNotTrackPolicy::from_token("Skip"), None);
        assert_eq!(CookiesKeepMode::from_token(""), None);
    }

    #[test]
    fn test_from_str_error_lists_tokens() {
        let err = "sometimes".parse::<CookiesKeepMode>().unwrap_err();
        assert!(err.contains("keepUntilExpires, keepUntilExit, ask"));
        assert_eq!("ask".parse::<CookiesKeepMode>(), Ok(CookiesKeepMode::Ask));
    }

    #[test]
    fn test_selectable_cookies_policies() {
        assert!(!CookiesPolicy::SELECTABLE.contains(&CookiesPolicy::Ignore));
        assert_eq!(CookiesPolicy::ALL.len(), 4);
    }

    #[test]
    fn test_serialize_as_token() {
        assert_eq!(
            serde_json::to_string(&ThirdPartyCookiesPolicy::AcceptExisting).unwrap(),
            "\"acceptExisting\""
        );
    }
}
