//! Settings store
//!
//! [`SettingsStore`] is the get/set contract the preference pages work
//! against. [`MemoryStore`] keeps values in memory. [`PrefsStore`] layers
//! values from several sources with proper precedence and persists user
//! changes to a prefs file:
//!
//! 1. Built-in defaults from the option registry (lowest precedence)
//! 2. `pref()` / `lock_pref()` lines from an optional defaults file
//! 3. `user_pref()` / `sticky_pref()` / `lock_pref()` lines from the user prefs file
//!
//! A `lock_pref()` value from either file wins over everything and rejects
//! writes.

use crate::error::{Error, Result};
use crate::options::OptionKey;
use crate::parser::parse_prefs_js_file;
use crate::types::{PrefEntry, PrefSource, PrefType, PrefValue, PrefValueExt};
use crate::writer::write_prefs_js;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read/write access to named options
///
/// `get` never fails: a missing value, or a stored value of the wrong kind,
/// yields the option's default.
pub trait SettingsStore {
    fn get(&self, key: OptionKey) -> PrefValue;

    fn set(&mut self, key: OptionKey, value: PrefValue) -> Result<()>;

    fn get_bool(&self, key: OptionKey) -> bool {
        self.get(key).as_bool().unwrap_or_default()
    }

    fn get_string(&self, key: OptionKey) -> String {
        match self.get(key) {
            PrefValue::String(s) => s,
            _ => String::new(),
        }
    }

    fn get_string_list(&self, key: OptionKey) -> Vec<String> {
        match self.get(key) {
            PrefValue::StringList(items) => items,
            _ => Vec::new(),
        }
    }
}

/// In-memory store, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<OptionKey, PrefValue>,
    locked: BTreeSet<OptionKey>,
    writes: Vec<(OptionKey, PrefValue)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert that skips kind validation
    pub fn with(mut self, key: OptionKey, value: impl Into<PrefValue>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn lock(&mut self, key: OptionKey) {
        self.locked.insert(key);
    }

    /// Every successful `set` call, in order
    pub fn writes(&self) -> &[(OptionKey, PrefValue)] {
        &self.writes
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: OptionKey) -> PrefValue {
        match self.values.get(&key) {
            Some(value) if key.kind().accepts(value) => value.clone(),
            _ => key.default_value(),
        }
    }

    fn set(&mut self, key: OptionKey, value: PrefValue) -> Result<()> {
        key.validate(&value)?;
        if self.locked.contains(&key) {
            // writing back the locked value leaves it untouched
            if self.get(key) == value {
                return Ok(());
            }
            return Err(Error::LockedOption(key.name()));
        }
        self.writes.push((key, value.clone()));
        self.values.insert(key, value);
        Ok(())
    }
}

/// Configuration for opening a [`PrefsStore`]
///
/// # Example
///
/// ```rust,no_run
/// use prefpane::{PrefsStore, StoreConfig};
///
/// let config = StoreConfig {
///     prefs_path: "/home/user/.config/prefpane/prefs.js".into(),
///     defaults_path: None,
///     continue_on_error: true,
/// };
/// let store = PrefsStore::open(config)?;
/// # Ok::<(), prefpane::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// User prefs file, read on open and written by [`PrefsStore::save`]
    pub prefs_path: PathBuf,
    /// Optional file of `pref()` defaults layered over the built-ins
    pub defaults_path: Option<PathBuf>,
    /// Turn unreadable layers into warnings instead of failing
    pub continue_on_error: bool,
}

impl StoreConfig {
    pub fn new(prefs_path: impl Into<PathBuf>) -> Self {
        Self {
            prefs_path: prefs_path.into(),
            defaults_path: None,
            continue_on_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UserValue {
    value: PrefValue,
    pref_type: PrefType,
}

/// File-backed, layered settings store
#[derive(Debug)]
pub struct PrefsStore {
    config: StoreConfig,
    defaults: HashMap<OptionKey, PrefValue>,
    locked: HashMap<OptionKey, PrefValue>,
    user: BTreeMap<OptionKey, UserValue>,
    /// User-file statements for keys outside the registry, kept for save
    foreign: Vec<PrefEntry>,
    /// User-file statements for known keys whose value has the wrong kind,
    /// written back until a valid value replaces them
    invalid: BTreeMap<OptionKey, PrefEntry>,
    loaded_sources: Vec<PrefSource>,
    warnings: Vec<String>,
    dirty: bool,
}

impl PrefsStore {
    /// Open the store, loading every configured layer
    ///
    /// A missing user prefs file is not an error: the store starts empty and
    /// creates the file on the first save.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let mut store = PrefsStore {
            config,
            defaults: HashMap::new(),
            locked: HashMap::new(),
            user: BTreeMap::new(),
            foreign: Vec::new(),
            invalid: BTreeMap::new(),
            loaded_sources: vec![PrefSource::BuiltIn],
            warnings: Vec::new(),
            dirty: false,
        };

        if let Some(defaults_path) = store.config.defaults_path.clone() {
            match parse_prefs_js_file(&defaults_path) {
                Ok(entries) => {
                    tracing::debug!(
                        count = entries.len(),
                        path = %defaults_path.display(),
                        "loaded defaults file"
                    );
                    for entry in entries {
                        store.apply_defaults_entry(entry);
                    }
                    store.loaded_sources.push(PrefSource::DefaultsFile);
                }
                Err(e) => store.layer_failed(&defaults_path, e)?,
            }
        }

        let prefs_path = store.config.prefs_path.clone();
        if prefs_path.exists() {
            match parse_prefs_js_file(&prefs_path) {
                Ok(entries) => {
                    tracing::debug!(
                        count = entries.len(),
                        path = %prefs_path.display(),
                        "loaded user prefs"
                    );
                    for entry in entries {
                        store.apply_user_entry(entry);
                    }
                    store.loaded_sources.push(PrefSource::User);
                }
                Err(e) => store.layer_failed(&prefs_path, e)?,
            }
        } else {
            tracing::debug!(path = %prefs_path.display(), "no user prefs file yet");
        }

        Ok(store)
    }

    fn layer_failed(&mut self, path: &Path, error: Error) -> Result<()> {
        if !self.config.continue_on_error {
            return Err(error);
        }
        let message = format!("Failed to load {}: {}", path.display(), error);
        tracing::warn!("{}", message);
        self.warnings.push(message);
        Ok(())
    }

    /// Resolve an entry's key against the registry, recording a warning when
    /// a known option carries a value of the wrong kind
    fn known_key(&mut self, entry: &PrefEntry) -> Option<OptionKey> {
        let key = OptionKey::from_name(&entry.key)?;
        match key.validate(&entry.value) {
            Ok(()) => Some(key),
            Err(e) => {
                let message = format!("Ignoring stored value: {}", e);
                tracing::warn!("{}", message);
                self.warnings.push(message);
                None
            }
        }
    }

    fn apply_defaults_entry(&mut self, entry: PrefEntry) {
        let Some(key) = self.known_key(&entry) else {
            return;
        };
        if entry.pref_type == PrefType::Locked {
            self.locked.insert(key, entry.value);
        } else {
            self.defaults.insert(key, entry.value);
        }
    }

    fn apply_user_entry(&mut self, entry: PrefEntry) {
        let Some(key) = self.known_key(&entry) else {
            match OptionKey::from_name(&entry.key) {
                Some(key) => {
                    self.invalid.insert(key, entry);
                }
                None => self.foreign.push(entry),
            }
            return;
        };
        self.invalid.remove(&key);
        match entry.pref_type {
            PrefType::Default => {
                self.defaults.insert(key, entry.value);
            }
            PrefType::Locked => {
                self.locked.insert(key, entry.value.clone());
                self.user.insert(
                    key,
                    UserValue {
                        value: entry.value,
                        pref_type: PrefType::Locked,
                    },
                );
            }
            PrefType::User | PrefType::Sticky => {
                self.user.insert(
                    key,
                    UserValue {
                        value: entry.value,
                        pref_type: entry.pref_type,
                    },
                );
            }
        }
    }

    /// Default in effect for `key` once the defaults file is applied
    pub fn effective_default(&self, key: OptionKey) -> PrefValue {
        self.defaults
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    pub fn is_locked(&self, key: OptionKey) -> bool {
        self.locked.contains_key(&key)
    }

    /// Effective value of every known option, with its source
    pub fn entries(&self) -> Vec<PrefEntry> {
        OptionKey::ALL
            .iter()
            .map(|&key| {
                let (value, pref_type, source) = if let Some(value) = self.locked.get(&key) {
                    (value.clone(), PrefType::Locked, self.source_of(key))
                } else if let Some(user) = self.user.get(&key) {
                    (user.value.clone(), user.pref_type, PrefSource::User)
                } else if let Some(value) = self.defaults.get(&key) {
                    (value.clone(), PrefType::Default, PrefSource::DefaultsFile)
                } else {
                    (key.default_value(), PrefType::Default, PrefSource::BuiltIn)
                };
                PrefEntry {
                    key: key.name().to_string(),
                    value,
                    pref_type,
                    explanation: Some(key.description()),
                    source: Some(source),
                    source_file: None,
                }
            })
            .collect()
    }

    fn source_of(&self, key: OptionKey) -> PrefSource {
        if self.user.contains_key(&key) {
            PrefSource::User
        } else {
            PrefSource::DefaultsFile
        }
    }

    pub fn loaded_sources(&self) -> &[PrefSource] {
        &self.loaded_sources
    }

    /// Layers that failed to load with `continue_on_error` set
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether there are changes not yet written by [`PrefsStore::save`]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Write the user layer to the prefs file
    ///
    /// The file is replaced atomically. Statements for unknown keys, and
    /// statements whose value did not fit their option, are written back
    /// after the known options.
    pub fn save(&mut self) -> Result<()> {
        let mut entries: Vec<PrefEntry> = self
            .user
            .iter()
            .map(|(key, user)| PrefEntry {
                key: key.name().to_string(),
                value: user.value.clone(),
                pref_type: user.pref_type,
                explanation: None,
                source: Some(PrefSource::User),
                source_file: None,
            })
            .collect();
        entries.extend(
            self.invalid
                .iter()
                .filter(|(key, _)| !self.user.contains_key(*key))
                .map(|(_, entry)| entry.clone()),
        );
        entries.extend(self.foreign.iter().cloned());

        let path = &self.config.prefs_path;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(write_prefs_js(&entries).as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        tracing::info!(count = entries.len(), path = %path.display(), "saved preferences");
        self.dirty = false;
        Ok(())
    }
}

impl SettingsStore for PrefsStore {
    fn get(&self, key: OptionKey) -> PrefValue {
        if let Some(value) = self.locked.get(&key) {
            return value.clone();
        }
        match self.user.get(&key) {
            Some(user) => user.value.clone(),
            None => self.effective_default(key),
        }
    }

    fn set(&mut self, key: OptionKey, value: PrefValue) -> Result<()> {
        key.validate(&value)?;
        if let Some(locked) = self.locked.get(&key) {
            if *locked == value {
                return Ok(());
            }
            return Err(Error::LockedOption(key.name()));
        }

        let sticky = matches!(
            self.user.get(&key),
            Some(UserValue {
                pref_type: PrefType::Sticky,
                ..
            })
        );

        let replaced_invalid = self.invalid.remove(&key).is_some();
        let changed = if value == self.effective_default(key) && !sticky {
            self.user.remove(&key).is_some()
        } else {
            let pref_type = if sticky {
                PrefType::Sticky
            } else {
                PrefType::User
            };
            let next = UserValue { value, pref_type };
            let changed = self.user.get(&key) != Some(&next);
            self.user.insert(key, next);
            changed
        };

        if changed || replaced_invalid {
            tracing::trace!(option = key.name(), "option changed");
            self.dirty = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::TempDir;

    fn open_with(user: &str) -> (TempDir, PrefsStore) {
        let temp_dir = TempDir::new().unwrap();
        let prefs_path = temp_dir.path().join("prefs.js");
        write(&prefs_path, user).unwrap();
        let store = PrefsStore::open(StoreConfig::new(prefs_path)).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get_string(OptionKey::NetworkDoNotTrackPolicy),
            "skip"
        );
        assert!(store.get_bool(OptionKey::HistoryRememberBrowsing));
        assert!(store.get_string_list(OptionKey::HistoryClearOnClose).is_empty());
    }

    #[test]
    fn test_memory_store_wrong_kind_falls_back() {
        let store = MemoryStore::new().with(OptionKey::BrowserPrivateMode, "yes");
        assert!(!store.get_bool(OptionKey::BrowserPrivateMode));
    }

    #[test]
    fn test_wrong_kind_line_survives_save() {
        let (dir, mut store) = open_with(
            r#"
            user_pref("Browser/PrivateMode", "yes");
            user_pref("x.y", 1);
            "#,
        );
        store
            .set(OptionKey::HistoryRememberBrowsing, PrefValue::Bool(false))
            .unwrap();
        store.save().unwrap();

        let content = std::fs::read_to_string(dir.path().join("prefs.js")).unwrap();
        assert!(content.contains(r#"user_pref("Browser/PrivateMode", "yes");"#));
        assert!(content.contains(r#"user_pref("History/RememberBrowsing", false);"#));
        assert!(content.contains(r#"user_pref("x.y", 1);"#));
    }

    #[test]
    fn test_valid_set_replaces_wrong_kind_line() {
        let (dir, mut store) = open_with(r#"user_pref("Browser/PrivateMode", "yes");"#);
        store
            .set(OptionKey::BrowserPrivateMode, PrefValue::Bool(false))
            .unwrap();
        assert!(store.is_dirty());
        store.save().unwrap();

        let content = std::fs::read_to_string(dir.path().join("prefs.js")).unwrap();
        assert!(!content.contains("Browser/PrivateMode"));
    }

    #[test]
    fn test_memory_store_lock() {
        let mut store = MemoryStore::new();
        store.lock(OptionKey::BrowserPrivateMode);
        assert!(matches!(
            store.set(OptionKey::BrowserPrivateMode, PrefValue::Bool(true)),
            Err(Error::LockedOption(_))
        ));
        assert!(store.writes().is_empty());

        store
            .set(OptionKey::BrowserPrivateMode, PrefValue::Bool(false))
            .unwrap();
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = PrefsStore::open(StoreConfig::new(temp_dir.path().join("prefs.js"))).unwrap();
        assert_eq!(store.loaded_sources(), &[PrefSource::BuiltIn]);
        assert!(store.warnings().is_empty());
        assert!(!store.get_bool(OptionKey::BrowserPrivateMode));
    }

    #[test]
    fn test_user_layer_overrides_defaults() {
        let (_dir, store) = open_with(
            r#"
            pref("Network/DoNotTrackPolicy", "allow");
            user_pref("Browser/PrivateMode", true);
        "#,
        );
        assert!(store.get_bool(OptionKey::BrowserPrivateMode));
        assert_eq!(store.get_string(OptionKey::NetworkDoNotTrackPolicy), "allow");
        assert_eq!(
            store.effective_default(OptionKey::NetworkDoNotTrackPolicy),
            PrefValue::from("allow")
        );
    }

    #[test]
    fn test_locked_option_rejects_set() {
        let (_dir, mut store) = open_with(r#"lock_pref("Browser/RememberPasswords", false);"#);
        assert!(store.is_locked(OptionKey::BrowserRememberPasswords));
        let err = store
            .set(OptionKey::BrowserRememberPasswords, PrefValue::Bool(true))
            .unwrap_err();
        assert!(err.to_string().contains("locked"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_writing_locked_value_is_accepted() {
        let (_dir, mut store) = open_with(r#"lock_pref("Browser/RememberPasswords", false);"#);
        store
            .set(OptionKey::BrowserRememberPasswords, PrefValue::Bool(false))
            .unwrap();
        assert!(!store.is_dirty());
        assert!(store.is_locked(OptionKey::BrowserRememberPasswords));
    }

    #[test]
    fn test_set_default_value_removes_user_entry() {
        let (_dir, mut store) = open_with(r#"user_pref("Browser/PrivateMode", true);"#);
        store
            .set(OptionKey::BrowserPrivateMode, PrefValue::Bool(false))
            .unwrap();
        assert!(store.is_dirty());
        let entry = store
            .entries()
            .into_iter()
            .find(|e| e.key == "Browser/PrivateMode")
            .unwrap();
        assert_eq!(entry.source, Some(PrefSource::BuiltIn));
    }

    #[test]
    fn test_sticky_value_survives_default() {
        let (_dir, mut store) = open_with(r#"sticky_pref("Browser/PrivateMode", true);"#);
        store
            .set(OptionKey::BrowserPrivateMode, PrefValue::Bool(false))
            .unwrap();
        let entry = store
            .entries()
            .into_iter()
            .find(|e| e.key == "Browser/PrivateMode")
            .unwrap();
        assert_eq!(entry.pref_type, PrefType::Sticky);
        assert_eq!(entry.value, PrefValue::Bool(false));
    }

    #[test]
    fn test_unchanged_set_is_not_dirty() {
        let (_dir, mut store) = open_with(r#"user_pref("Browser/PrivateMode", true);"#);
        store
            .set(OptionKey::BrowserPrivateMode, PrefValue::Bool(true))
            .unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_wrong_kind_in_file_is_warned() {
        let (_dir, store) = open_with(r#"user_pref("Browser/PrivateMode", "yes");"#);
        assert_eq!(store.warnings().len(), 1);
        assert!(!store.get_bool(OptionKey::BrowserPrivateMode));
    }

    #[test]
    fn test_parse_failure_with_continue_on_error() {
        let (_dir, store) = open_with("user_pref(broken");
        assert_eq!(store.warnings().len(), 1);
        assert_eq!(store.loaded_sources(), &[PrefSource::BuiltIn]);
    }

    #[test]
    fn test_parse_failure_without_continue_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let prefs_path = temp_dir.path().join("prefs.js");
        write(&prefs_path, "user_pref(broken").unwrap();
        let config = StoreConfig {
            prefs_path,
            defaults_path: None,
            continue_on_error: false,
        };
        assert!(PrefsStore::open(config).is_err());
    }

    #[test]
    fn test_save_and_reopen() {
        let (dir, mut store) = open_with(r#"user_pref("custom.key", 5);"#);
        store
            .set(
                OptionKey::HistoryClearOnClose,
                PrefValue::list(["browsing", "caches"]),
            )
            .unwrap();
        store
            .set(OptionKey::NetworkCookiesPolicy, PrefValue::from("ignore"))
            .unwrap();
        store.save().unwrap();
        assert!(!store.is_dirty());

        let reopened = PrefsStore::open(StoreConfig::new(dir.path().join("prefs.js"))).unwrap();
        assert_eq!(
            reopened.get_string_list(OptionKey::HistoryClearOnClose),
            vec!["browsing".to_string(), "caches".to_string()]
        );
        assert_eq!(reopened.get_string(OptionKey::NetworkCookiesPolicy), "ignore");

        let text = std::fs::read_to_string(dir.path().join("prefs.js")).unwrap();
        assert!(text.contains(r#"user_pref("custom.key", 5);"#));
    }

    #[test]
    fn test_defaults_file_layer() {
        let temp_dir = TempDir::new().unwrap();
        let defaults_path = temp_dir.path().join("defaults.js");
        write(
            &defaults_path,
            r#"
            pref("Network/CookiesKeepMode", "ask");
            lock_pref("Browser/PrivateMode", true);
        "#,
        )
        .unwrap();
        let config = StoreConfig {
            prefs_path: temp_dir.path().join("prefs.js"),
            defaults_path: Some(defaults_path),
            continue_on_error: false,
        };
        let store = PrefsStore::open(config).unwrap();
        assert_eq!(
            store.loaded_sources(),
            &[PrefSource::BuiltIn, PrefSource::DefaultsFile]
        );
        assert_eq!(store.get_string(OptionKey::NetworkCookiesKeepMode), "ask");
        assert!(store.get_bool(OptionKey::BrowserPrivateMode));
        assert!(store.is_locked(OptionKey::BrowserPrivateMode));
    }
}
