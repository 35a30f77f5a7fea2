//! Modal sub-dialogs used by the privacy page
//!
//! A dialog is a single call returning [`DialogResult`]: the page hands over
//! the current state and gets either the edited state or a cancellation back.

use super::tokens::{ClearHistoryCategory, OptionToken};
use serde::Serialize;

/// Outcome of a modal dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult<T> {
    Accepted(T),
    Cancelled,
}

/// Third-party cookie host exceptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostExceptions {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

pub trait CookiesExceptionsDialog {
    fn exec(&mut self, accepted: &[String], rejected: &[String]) -> DialogResult<HostExceptions>;
}

pub trait ClearHistoryDialog {
    /// `modal` asks the dialog to only edit the settings instead of clearing
    /// history right away
    fn exec(&mut self, settings: &[String], modal: bool) -> DialogResult<Vec<String>>;
}

/// One edit applied by [`ScriptedCookiesExceptions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEdit {
    Accept(String),
    Reject(String),
    Remove(String),
}

/// Non-interactive exceptions dialog that applies a fixed list of edits
#[derive(Debug, Clone, Default)]
pub struct ScriptedCookiesExceptions {
    edits: Vec<HostEdit>,
    cancel: bool,
    /// Lists the dialog was opened with, once it ran
    pub seen: Option<HostExceptions>,
}

impl ScriptedCookiesExceptions {
    pub fn new(edits: Vec<HostEdit>) -> Self {
        ScriptedCookiesExceptions {
            edits,
            ..Default::default()
        }
    }

    pub fn cancelling() -> Self {
        ScriptedCookiesExceptions {
            cancel: true,
            ..Default::default()
        }
    }
}

fn normalize_host(host: &str) -> Option<String> {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

impl CookiesExceptionsDialog for ScriptedCookiesExceptions {
    fn exec(&mut self, accepted: &[String], rejected: &[String]) -> DialogResult<HostExceptions> {
        let mut hosts = HostExceptions {
            accepted: accepted.to_vec(),
            rejected: rejected.to_vec(),
        };
        self.seen = Some(hosts.clone());
        if self.cancel {
            tracing::debug!("cookies exceptions dialog cancelled");
            return DialogResult::Cancelled;
        }

        for edit in &self.edits {
            match edit {
                HostEdit::Accept(host) => {
                    if let Some(host) = normalize_host(host) {
                        hosts.rejected.retain(|h| *h != host);
                        push_unique(&mut hosts.accepted, &host);
                    }
                }
                HostEdit::Reject(host) => {
                    if let Some(host) = normalize_host(host) {
                        hosts.accepted.retain(|h| *h != host);
                        push_unique(&mut hosts.rejected, &host);
                    }
                }
                HostEdit::Remove(host) => {
                    if let Some(host) = normalize_host(host) {
                        hosts.accepted.retain(|h| *h != host);
                        hosts.rejected.retain(|h| *h != host);
                    }
                }
            }
        }
        tracing::debug!(
            accepted = hosts.accepted.len(),
            rejected = hosts.rejected.len(),
            "cookies exceptions dialog accepted"
        );
        DialogResult::Accepted(hosts)
    }
}

/// Non-interactive clear-history dialog returning a fixed selection
#[derive(Debug, Clone, Default)]
pub struct ScriptedClearHistory {
    result: Option<Vec<ClearHistoryCategory>>,
    /// Settings and modal flag the dialog was opened with, once it ran
    pub seen: Option<(Vec<String>, bool)>,
}

impl ScriptedClearHistory {
    pub fn accepting(categories: Vec<ClearHistoryCategory>) -> Self {
        ScriptedClearHistory {
            result: Some(categories),
            seen: None,
        }
    }

    pub fn cancelling() -> Self {
        ScriptedClearHistory::default()
    }
}

impl ClearHistoryDialog for ScriptedClearHistory {
    fn exec(&mut self, settings: &[String], modal: bool) -> DialogResult<Vec<String>> {
        self.seen = Some((settings.to_vec(), modal));
        match &self.result {
            Some(categories) => {
                let mut selected: Vec<String> = Vec::new();
                for category in categories {
                    push_unique(&mut selected, category.token());
                }
                DialogResult::Accepted(selected)
            }
            None => DialogResult::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scripted_exceptions_edits() {
        let mut dialog = ScriptedCookiesExceptions::new(vec![
            HostEdit::Accept(" Example.COM ".to_string()),
            HostEdit::Reject("tracker.net".to_string()),
            HostEdit::Remove("old.org".to_string()),
            HostEdit::Accept("".to_string()),
        ]);
        let result = dialog.exec(
            &strings(&["old.org"]),
            &strings(&["example.com", "old.org"]),
        );
        assert_eq!(
            result,
            DialogResult::Accepted(HostExceptions {
                accepted: strings(&["example.com"]),
                rejected: strings(&["tracker.net"]),
            })
        );
        assert_eq!(dialog.seen.unwrap().rejected, strings(&["example.com", "old.org"]));
    }

    #[test]
    fn test_scripted_exceptions_cancel() {
        let mut dialog = ScriptedCookiesExceptions::cancelling();
        assert_eq!(dialog.exec(&[], &[]), DialogResult::Cancelled);
        assert!(dialog.seen.is_some());
    }

    #[test]
    fn test_scripted_clear_history() {
        let mut dialog = ScriptedClearHistory::accepting(vec![
            ClearHistoryCategory::Cookies,
            ClearHistoryCategory::Caches,
            ClearHistoryCategory::Cookies,
        ]);
        assert_eq!(
            dialog.exec(&strings(&["browsing"]), true),
            DialogResult::Accepted(strings(&["cookies", "caches"]))
        );
        assert_eq!(dialog.seen, Some((strings(&["browsing"]), true)));

        let mut dialog = ScriptedClearHistory::cancelling();
        assert_eq!(dialog.exec(&[], true), DialogResult::Cancelled);
    }
}
