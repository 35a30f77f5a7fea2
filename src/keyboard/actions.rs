//! Action catalog and dispatch
//!
//! The catalog lists the actions a keyboard profile may bind, with their
//! human-readable labels and default shortcuts. The dispatcher is the
//! fire-and-forget entry point pages use to trigger an action elsewhere in the
//! browser.

use serde::Serialize;
use std::collections::BTreeMap;

/// Per-binding action parameters, e.g. `{"tab": 2}` for `ActivateTab`
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// A bindable action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    pub identifier: &'static str,
    pub label: &'static str,
    pub default_shortcuts: &'static [&'static str],
}

/// Source of the actions a profile editor offers
pub trait ActionCatalog {
    fn actions(&self) -> &[ActionDefinition];

    fn find(&self, identifier: &str) -> Option<&ActionDefinition> {
        self.actions().iter().find(|a| a.identifier == identifier)
    }

    /// Label for display; unknown identifiers are shown as-is
    fn label_for(&self, identifier: &str) -> String {
        self.find(identifier)
            .map(|a| a.label.to_string())
            .unwrap_or_else(|| identifier.to_string())
    }
}

/// The browser's built-in actions
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinActions;

impl ActionCatalog for BuiltinActions {
    fn actions(&self) -> &[ActionDefinition] {
        BUILTIN_ACTIONS
    }
}

const fn action(
    identifier: &'static str,
    label: &'static str,
    default_shortcuts: &'static [&'static str],
) -> ActionDefinition {
    ActionDefinition {
        identifier,
        label,
        default_shortcuts,
    }
}

static BUILTIN_ACTIONS: &[ActionDefinition] = &[
    action("NewWindow", "New Window", &["Ctrl+N"]),
    action("NewWindowPrivate", "New Private Window", &["Ctrl+Shift+N"]),
    action("NewTab", "New Tab", &["Ctrl+T"]),
    action("NewTabPrivate", "New Private Tab", &["Ctrl+Shift+P"]),
    action("Open", "Open…", &["Ctrl+O"]),
    action("Save", "Save…", &["Ctrl+S"]),
    action("CloseTab", "Close Tab", &["Ctrl+W", "Ctrl+F4"]),
    action("ReopenTab", "Reopen Previously Closed Tab", &["Ctrl+Shift+T"]),
    action("ActivateTab", "Activate Tab", &[]),
    action("ActivateTabOnLeft", "Go to Tab on Left", &["Ctrl+PgUp"]),
    action("ActivateTabOnRight", "Go to Tab on Right", &["Ctrl+PgDown"]),
    action("Go", "Go", &[]),
    action("GoBack", "Back", &["Alt+Left", "Backspace"]),
    action("GoForward", "Forward", &["Alt+Right"]),
    action("GoToHomePage", "Go to Home Page", &["Alt+Home"]),
    action("Reload", "Reload", &["F5", "Ctrl+R"]),
    action("ReloadAndBypassCache", "Reload and Bypass Cache", &["Ctrl+F5"]),
    action("Stop", "Stop", &["Esc"]),
    action("Find", "Find…", &["Ctrl+F"]),
    action("FindNext", "Find Next", &["F3"]),
    action("FindPrevious", "Find Previous", &["Shift+F3"]),
    action("ZoomIn", "Zoom In", &["Ctrl++"]),
    action("ZoomOut", "Zoom Out", &["Ctrl+-"]),
    action("ZoomOriginal", "Zoom Original", &["Ctrl+0"]),
    action("FullScreen", "Full Screen", &["F11"]),
    action("Bookmarks", "Manage Bookmarks", &["Ctrl+Shift+B"]),
    action("History", "View History", &["Ctrl+H"]),
    action("ClearHistory", "Clear History…", &["Ctrl+Shift+Del"]),
    action("Downloads", "Downloads", &["Ctrl+J"]),
    action("Passwords", "Passwords", &[]),
    action("Cookies", "Cookies", &[]),
    action("Preferences", "Preferences…", &["Ctrl+,"]),
    action("Exit", "Exit", &["Ctrl+Q"]),
];

/// Receiver of triggered actions
pub trait ActionDispatcher {
    /// Trigger `action`; `origin` names the view that requested it
    fn trigger(&mut self, action: &str, parameters: &Parameters, origin: &str);
}

/// Dispatcher that only logs requests
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

impl ActionDispatcher for LoggingDispatcher {
    fn trigger(&mut self, action: &str, parameters: &Parameters, origin: &str) {
        tracing::info!(
            action,
            origin,
            parameters = parameters.len(),
            "action triggered"
        );
    }
}

/// One call received by a [`RecordingDispatcher`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAction {
    pub action: String,
    pub parameters: Parameters,
    pub origin: String,
}

/// Dispatcher that keeps every request, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    pub triggered: Vec<TriggeredAction>,
}

impl ActionDispatcher for RecordingDispatcher {
    fn trigger(&mut self, action: &str, parameters: &Parameters, origin: &str) {
        self.triggered.push(TriggeredAction {
            action: action.to_string(),
            parameters: parameters.clone(),
            origin: origin.to_string(),
        });
    }
}
