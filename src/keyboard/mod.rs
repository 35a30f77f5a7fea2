//! Keyboard profiles: shortcuts, the action catalog, profile storage and the
//! profile editor

pub mod actions;
pub mod editor;
pub mod profile;
pub mod profile_store;
pub mod shortcut;

pub use actions::{
    ActionCatalog, ActionDefinition, ActionDispatcher, BuiltinActions, LoggingDispatcher,
    Parameters, RecordingDispatcher, TriggeredAction,
};
pub use editor::{
    ActionChoice, ActionEditor, CellDisplay, CellEditor, Column, ControlState, ProfileEditor,
    ProfileRow, ShortcutEditor,
};
pub use profile::{ConflictKind, KeyboardBinding, KeyboardProfile, ShortcutConflict};
pub use profile_store::{load_profiles, validate_profile_name, ProfileInfo, ProfileStore};
pub use shortcut::{parse_shortcut, Key, KeyChord, Modifiers, NamedKey, Shortcut, MAX_CHORDS};
