//! # prefpane - Browser preferences view-models
//!
//! This library holds the state and behaviour behind two pages of a web
//! browser's preferences UI, without any GUI toolkit:
//!
//! - a **keyboard profile editor**: a table of action bindings edited in place
//!   through per-column cell editors
//! - a **privacy page**: form controls over eleven privacy settings, with two
//!   modal sub-dialogs for cookie host exceptions and clear-on-close history
//!
//! Both work against small traits ([`SettingsStore`], [`ActionCatalog`],
//! [`ActionDispatcher`], [`CookiesExceptionsDialog`], [`ClearHistoryDialog`])
//! so a front end can plug in its own implementations.
//!
//! ## Features
//!
//! - Layered settings store persisted in prefs.js syntax (`user_pref("key", value);`)
//!   with defaults, locked and sticky values
//! - Portable keyboard shortcuts with multi-chord sequences (`Ctrl+K, Ctrl+C`)
//! - Keyboard profiles stored as JSON, with duplicate and conflict reports
//! - Query options using glob patterns (e.g. `"Network/*"`)
//!
//! ## Quick Start
//!
//! ### Privacy Page
//!
//! ```rust
//! use prefpane::{
//!     MemoryStore, OptionKey, PrivacyPage, ScriptedClearHistory, SettingsStore,
//! };
//!
//! let mut store = MemoryStore::new().with(OptionKey::NetworkCookiesPolicy, "readOnly");
//! let mut page = PrivacyPage::load(&store);
//!
//! // the user unticks "Enable cookies"; nothing is written yet
//! page.on_cookies_toggled(false);
//! assert_eq!(store.get_string(OptionKey::NetworkCookiesPolicy), "readOnly");
//!
//! // an empty clear-history selection unticks the check box
//! page.setup_clear_history(&mut ScriptedClearHistory::accepting(vec![]));
//! assert!(!page.clear_history().checked);
//!
//! page.save(&mut store)?;
//! assert_eq!(store.get_string(OptionKey::NetworkCookiesPolicy), "ignore");
//! # Ok::<(), prefpane::Error>(())
//! ```
//!
//! ### Keyboard Profile Editor
//!
//! ```rust
//! use prefpane::{BuiltinActions, CellEditor, Column, KeyboardProfile, ProfileEditor};
//! use std::collections::HashMap;
//!
//! let profile = KeyboardProfile::from_defaults("default", &BuiltinActions);
//! let profiles = HashMap::from([("default".to_string(), profile.clone())]);
//!
//! let mut editor = ProfileEditor::new("default", &profiles, &BuiltinActions);
//! assert_eq!(editor.get_profile(), profile);
//!
//! editor.add_action();
//! let row = editor.row_count() - 1;
//! if let Some(CellEditor::Action(mut cell)) = editor.create_editor(row, Column::Action) {
//!     cell.select("Passwords");
//!     editor.commit(CellEditor::Action(cell));
//! }
//! if let Some(CellEditor::Shortcut(mut cell)) = editor.create_editor(row, Column::Shortcut) {
//!     cell.set_text("Ctrl+Shift+K")?;
//!     editor.commit(CellEditor::Shortcut(cell));
//! }
//!
//! assert!(editor.is_modified());
//! assert!(editor.get_profile().binding("Passwords").is_some());
//! # Ok::<(), prefpane::Error>(())
//! ```
//!
//! ### Persistent Settings
//!
//! ```rust,no_run
//! use prefpane::{OptionKey, PrefsStore, PrivacyPage, StoreConfig};
//!
//! let mut store = PrefsStore::open(StoreConfig::new("/tmp/prefpane/prefs.js"))?;
//! for warning in store.warnings() {
//!     eprintln!("Warning: {}", warning);
//! }
//!
//! let mut page = PrivacyPage::load(&store);
//! page.on_private_mode_toggled(true);
//! page.save(&mut store)?;
//! store.save()?;
//! # Ok::<(), prefpane::Error>(())
//! ```
//!
//! ### Parsing Prefs Files
//!
//! ```rust
//! use prefpane::{parse_prefs_js, PrefType, PrefValue, PrefValueExt};
//!
//! let content = r#"
//!     user_pref("Network/DoNotTrackPolicy", "doNotAllow");
//!     lock_pref("Browser/PrivateMode", true);
//!     user_pref("History/ClearOnClose", ["cookies", "caches"]);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! assert_eq!(prefs[0].value, PrefValue::String("doNotAllow".to_string()));
//! assert_eq!(prefs[1].pref_type, PrefType::Locked);
//! assert_eq!(prefs[2].value.as_string_list().map(|l| l.len()), Some(2));
//! # Ok::<(), prefpane::Error>(())
//! ```
//!
//! ### Querying Options
//!
//! ```rust
//! use prefpane::{query_preferences, PrefsStore, StoreConfig};
//!
//! let dir = tempfile::tempdir()?;
//! let store = PrefsStore::open(StoreConfig::new(dir.path().join("prefs.js")))?;
//! let network = query_preferences(&store.entries(), &["Network/*"])?;
//! assert_eq!(network.len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Preference Types
//!
//! Prefs files support four statement types:
//!
//! - **user_pref()** - [`PrefType::User`]: user-set values (most common)
//! - **pref()** - [`PrefType::Default`]: defaults, overridden by user values
//! - **lock_pref()** - [`PrefType::Locked`]: locked values; writes are rejected
//! - **sticky_pref()** - [`PrefType::Sticky`]: kept even when equal to the default
//!
//! ## Error Handling
//!
//! All fallible functions return [`Result<T, Error>`]. The view-model
//! operations themselves cannot fail; only parsing, persistence and input
//! validation do:
//!
//! ```rust
//! use prefpane::{parse_prefs_js, Error};
//!
//! match parse_prefs_js("user_pref(invalid syntax") {
//!     Ok(_) => println!("Parsed successfully"),
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

// Re-export all public types at crate root
pub use types::{PrefEntry, PrefSource, PrefType, PrefValue, PrefValueExt};

// Re-export error types
pub use error::{Error, Result};

// Re-export option registry and stores
pub use options::{OptionKey, OptionKind};
pub use store::{MemoryStore, PrefsStore, SettingsStore, StoreConfig};

// Re-export all public functions at crate root
pub use parser::{parse_prefs_js, parse_prefs_js_file};
pub use query::query_preferences;
pub use writer::write_prefs_js;

// Re-export keyboard profiles
pub use keyboard::{
    load_profiles, parse_shortcut, validate_profile_name, ActionCatalog, ActionChoice,
    ActionDefinition, ActionDispatcher, ActionEditor, BuiltinActions, CellDisplay, CellEditor,
    Column, ConflictKind, ControlState, Key, KeyChord, KeyboardBinding, KeyboardProfile,
    LoggingDispatcher, Modifiers, NamedKey, Parameters, ProfileEditor, ProfileInfo, ProfileRow,
    ProfileStore, RecordingDispatcher, Shortcut, ShortcutConflict, ShortcutEditor,
    TriggeredAction, MAX_CHORDS,
};

// Re-export privacy page
pub use privacy::{
    Button, CheckBox, ClearHistoryCategory, ClearHistoryDialog, ComboBox, ComboItem,
    CookiesExceptionsDialog, CookiesKeepMode, CookiesPolicy, DialogResult, DoNotTrackPolicy,
    HostEdit, HostExceptions, OptionToken, PageServices, PageSignal, PrivacyEvent, PrivacyPage,
    PrivacySnapshot, ScriptedClearHistory, ScriptedCookiesExceptions, Section,
    ThirdPartyCookiesPolicy, PAGE_ORIGIN, PASSWORDS_ACTION,
};

pub mod keyboard;
pub mod paths;
pub mod privacy;

mod error;
mod lexer;
mod options;
mod parser;
mod query;
mod store;
mod types;
mod writer;
