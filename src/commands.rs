use crate::cli::{Cli, Commands, KeyboardCommand, PrivacyCommand, PrivacySetArgs};
use anyhow::{anyhow, bail, Context};
use prefpane::{
    paths, query_preferences, validate_profile_name, ActionCatalog, ActionDispatcher,
    BuiltinActions, CellEditor, Column, CookiesPolicy, Error, HostEdit, KeyboardProfile,
    LoggingDispatcher, PageServices, PageSignal, Parameters, PrefsStore, PrivacyEvent, PrivacyPage,
    ProfileEditor, ProfileStore, RecordingDispatcher, ScriptedClearHistory,
    ScriptedCookiesExceptions, Shortcut, StoreConfig,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Profile name that falls back to the built-in shortcuts when not stored
const DEFAULT_PROFILE: &str = "default";

/// File locations for one invocation
pub struct Locations {
    pub store: StoreConfig,
    pub profiles_dir: PathBuf,
}

impl Locations {
    /// Resolve locations from CLI flags, falling back to the configuration
    /// directory
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let home = paths::config_home(cli.home.as_deref());
        let require_home = || {
            home.as_ref()
                .map_err(|e| anyhow!("Failed to determine configuration directory: {}", e))
        };

        let prefs_path = match &cli.prefs {
            Some(path) => path.clone(),
            None => paths::prefs_path(require_home()?),
        };
        let defaults_path = match &cli.defaults {
            Some(path) => Some(path.clone()),
            None => home.as_ref().ok().and_then(|h| paths::defaults_path(h)),
        };
        let profiles_dir = match &cli.profiles_dir {
            Some(path) => path.clone(),
            None => paths::keyboard_dir(require_home()?),
        };

        Ok(Locations {
            store: StoreConfig {
                prefs_path,
                defaults_path,
                continue_on_error: !cli.strict,
            },
            profiles_dir,
        })
    }

    fn open_store(&self) -> anyhow::Result<PrefsStore> {
        PrefsStore::open(self.store.clone()).with_context(|| {
            format!(
                "Failed to load preferences from {}",
                self.store.prefs_path.display()
            )
        })
    }

    fn profiles(&self) -> ProfileStore {
        ProfileStore::new(&self.profiles_dir)
    }
}

/// Run the parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let locations = Locations::resolve(&cli)?;

    match cli.command {
        Commands::Options { query } => list_options(&locations, &query),
        Commands::Privacy { command } => match command {
            PrivacyCommand::Show => privacy_show(&locations),
            PrivacyCommand::Set(args) => privacy_set(&locations, &args),
            PrivacyCommand::Exceptions {
                accept,
                reject,
                remove,
            } => privacy_exceptions(&locations, accept, reject, remove),
            PrivacyCommand::ClearHistory { category, cancel } => {
                let mut dialog = if cancel {
                    ScriptedClearHistory::cancelling()
                } else {
                    ScriptedClearHistory::accepting(category)
                };
                privacy_clear_history(&locations, &mut dialog)
            }
            PrivacyCommand::ManagePasswords => privacy_manage_passwords(&locations),
        },
        Commands::Keyboard { command } => match command {
            KeyboardCommand::List => print_json(&locations.profiles().list()),
            KeyboardCommand::Show { name } => keyboard_show(&locations, &name),
            KeyboardCommand::Bind {
                name,
                action,
                shortcuts,
                parameters,
            } => keyboard_bind(
                &locations,
                &name,
                &action,
                shortcuts,
                parameters.into_iter().collect(),
            ),
            KeyboardCommand::Unbind { name, action } => keyboard_unbind(&locations, &name, &action),
            KeyboardCommand::Check { name } => keyboard_check(&locations, &name),
            KeyboardCommand::Meta {
                name,
                title,
                description,
                author,
                version,
            } => keyboard_meta(
                &locations,
                &name,
                ProfileMetadata {
                    title,
                    description,
                    author,
                    version,
                },
            ),
            KeyboardCommand::Actions => print_json(&BuiltinActions.actions()),
        },
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// List options with their effective values
fn list_options(locations: &Locations, query: &[String]) -> anyhow::Result<()> {
    let store = locations.open_store()?;
    let patterns: Vec<&str> = query.iter().map(String::as_str).collect();
    let entries = query_preferences(&store.entries(), &patterns)
        .map_err(|e| anyhow!("Failed to apply query: {}", e))?;
    print_json(&entries)
}

fn privacy_show(locations: &Locations) -> anyhow::Result<()> {
    let store = locations.open_store()?;
    print_json(&PrivacyPage::load(&store).snapshot())
}

fn save_page(page: &PrivacyPage, store: &mut PrefsStore) -> anyhow::Result<()> {
    page.save(&mut *store)
        .map_err(|e| anyhow!("Failed to apply privacy settings: {}", e))?;
    store.save().with_context(|| {
        format!(
            "Failed to write preferences to {}",
            store.config().prefs_path.display()
        )
    })?;
    Ok(())
}

/// Translate `privacy set` flags into page events, in page order
fn set_events(args: &PrivacySetArgs) -> anyhow::Result<Vec<PrivacyEvent>> {
    if args.cookies_policy == Some(CookiesPolicy::Ignore) {
        bail!("Use '--cookies false' to disable cookies instead of '--cookies-policy ignore'");
    }

    let events = [
        args.do_not_track.map(PrivacyEvent::DoNotTrackSelected),
        args.private_mode.map(PrivacyEvent::PrivateModeToggled),
        args.remember_browsing
            .map(PrivacyEvent::RememberBrowsingToggled),
        args.remember_downloads
            .map(PrivacyEvent::RememberDownloadsToggled),
        args.cookies.map(PrivacyEvent::CookiesToggled),
        args.cookies_policy.map(PrivacyEvent::CookiesPolicySelected),
        args.keep_mode.map(PrivacyEvent::KeepModeSelected),
        args.third_party_policy
            .map(PrivacyEvent::ThirdPartyPolicySelected),
        args.clear_on_close.map(PrivacyEvent::ClearHistoryToggled),
        args.remember_passwords
            .map(PrivacyEvent::RememberPasswordsToggled),
    ];
    Ok(events.into_iter().flatten().collect())
}

fn privacy_set(locations: &Locations, args: &PrivacySetArgs) -> anyhow::Result<()> {
    let events = set_events(args)?;
    let mut store = locations.open_store()?;
    let mut page = PrivacyPage::load(&store);

    let mut exceptions = ScriptedCookiesExceptions::cancelling();
    let mut clear_history = ScriptedClearHistory::cancelling();
    let mut dispatcher = LoggingDispatcher;
    let mut services = PageServices {
        cookies_exceptions: &mut exceptions,
        clear_history: &mut clear_history,
        dispatcher: &mut dispatcher,
    };
    for event in events {
        page.handle(event, &mut services);
    }

    if page.clear_history().checked && page.clear_history_settings().is_empty() {
        tracing::warn!(
            "clearing history on close has no categories; use 'privacy clear-history --category'"
        );
    }

    save_page(&page, &mut store)?;
    print_json(&page.snapshot())
}

fn privacy_exceptions(
    locations: &Locations,
    accept: Vec<String>,
    reject: Vec<String>,
    remove: Vec<String>,
) -> anyhow::Result<()> {
    let edits: Vec<HostEdit> = accept
        .into_iter()
        .map(HostEdit::Accept)
        .chain(reject.into_iter().map(HostEdit::Reject))
        .chain(remove.into_iter().map(HostEdit::Remove))
        .collect();

    let mut store = locations.open_store()?;
    let mut page = PrivacyPage::load(&store);
    let mut exceptions = ScriptedCookiesExceptions::new(edits);
    page.setup_third_party_cookies_exceptions(&mut exceptions);

    if page.take_signals().contains(&PageSignal::SettingsModified) {
        save_page(&page, &mut store)?;
    }
    print_json(&page.snapshot())
}

fn privacy_clear_history(
    locations: &Locations,
    dialog: &mut ScriptedClearHistory,
) -> anyhow::Result<()> {
    let mut store = locations.open_store()?;
    let mut page = PrivacyPage::load(&store);
    page.setup_clear_history(dialog);

    if page.take_signals().contains(&PageSignal::SettingsModified) {
        save_page(&page, &mut store)?;
    }
    print_json(&page.snapshot())
}

fn privacy_manage_passwords(locations: &Locations) -> anyhow::Result<()> {
    let store = locations.open_store()?;
    let mut page = PrivacyPage::load(&store);
    let mut dispatcher = RecordingDispatcher::default();
    page.manage_passwords(&mut dispatcher);

    // no browser to hand the request to, so it is logged and printed
    let mut logger = LoggingDispatcher;
    for request in &dispatcher.triggered {
        logger.trigger(&request.action, &request.parameters, &request.origin);
    }
    print_json(&dispatcher.triggered)
}

/// Load a stored profile; `default` falls back to the built-in shortcuts
fn load_profile(store: &ProfileStore, name: &str) -> anyhow::Result<Option<KeyboardProfile>> {
    match store.load(name) {
        Ok(profile) => Ok(Some(profile)),
        Err(Error::ProfileNotFound { .. }) if name == DEFAULT_PROFILE => {
            Ok(Some(KeyboardProfile::from_defaults(name, &BuiltinActions)))
        }
        Err(Error::ProfileNotFound { .. }) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to load keyboard profile '{}'", name)),
    }
}

fn require_profile(store: &ProfileStore, name: &str) -> anyhow::Result<KeyboardProfile> {
    load_profile(store, name)?.ok_or_else(|| {
        anyhow!(
            "Keyboard profile '{}' not found in {}. \
             Use 'prefpane keyboard list' to see available profiles.",
            name,
            store.dir().display()
        )
    })
}

fn keyboard_show(locations: &Locations, name: &str) -> anyhow::Result<()> {
    let profile = require_profile(&locations.profiles(), name)?;
    print_json(&ProfileView::new(&profile))
}

#[derive(Serialize)]
struct ProfileView<'p> {
    name: &'p str,
    #[serde(flatten)]
    profile: &'p KeyboardProfile,
}

impl<'p> ProfileView<'p> {
    fn new(profile: &'p KeyboardProfile) -> Self {
        ProfileView {
            name: &profile.name,
            profile,
        }
    }
}

fn keyboard_bind(
    locations: &Locations,
    name: &str,
    action: &str,
    shortcuts: Vec<Shortcut>,
    parameters: Parameters,
) -> anyhow::Result<()> {
    validate_profile_name(name)?;
    let catalog = BuiltinActions;
    if catalog.find(action).is_none() {
        bail!(
            "Unknown action '{}'. Use 'prefpane keyboard actions' to see available actions.",
            action
        );
    }

    let store = locations.profiles();
    let mut profiles = HashMap::new();
    if let Some(profile) = load_profile(&store, name)? {
        profiles.insert(name.to_string(), profile);
    }

    let mut editor = ProfileEditor::new(name, &profiles, &catalog);
    let existing = editor
        .rows()
        .iter()
        .position(|row| row.identifier.as_deref() == Some(action));
    let row = match existing {
        Some(row) => row,
        None => {
            editor.add_action();
            let row = editor.row_count() - 1;
            if let Some(CellEditor::Action(mut cell)) = editor.create_editor(row, Column::Action) {
                cell.select(action);
                editor.commit(CellEditor::Action(cell));
            }
            row
        }
    };

    if let Some(CellEditor::Shortcut(mut cell)) = editor.create_editor(row, Column::Shortcut) {
        cell.clear();
        for shortcut in shortcuts {
            cell.capture(shortcut);
        }
        editor.commit(CellEditor::Shortcut(cell));
    }
    if !parameters.is_empty() {
        editor.set_parameters(row, parameters);
    }

    let profile = editor.get_profile();
    if editor.is_modified() {
        store
            .save(&profile)
            .with_context(|| format!("Failed to save keyboard profile '{}'", name))?;
    } else {
        tracing::info!(name, action, "binding unchanged");
    }

    for conflict in profile.conflicts() {
        if conflict.actions.0 == action || conflict.actions.1 == action {
            tracing::warn!(
                "{} conflicts with {} ({} / {})",
                conflict.shortcut,
                conflict.other,
                conflict.actions.0,
                conflict.actions.1
            );
        }
    }

    print_json(&profile.binding(action))
}

fn keyboard_unbind(locations: &Locations, name: &str, action: &str) -> anyhow::Result<()> {
    let store = locations.profiles();
    let profile = require_profile(&store, name)?;
    let profiles = HashMap::from([(name.to_string(), profile)]);

    let mut editor = ProfileEditor::new(name, &profiles, &BuiltinActions);
    let rows: Vec<usize> = editor
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.identifier.as_deref() == Some(action))
        .map(|(i, _)| i)
        .collect();
    if rows.is_empty() {
        bail!("Action '{}' is not bound in keyboard profile '{}'", action, name);
    }

    editor.select(rows);
    editor.remove_action();
    let profile = editor.get_profile();
    store
        .save(&profile)
        .with_context(|| format!("Failed to save keyboard profile '{}'", name))?;
    print_json(&ProfileView::new(&profile))
}

/// Metadata fields to change; `None` leaves a field as it is
#[derive(Debug, Default)]
struct ProfileMetadata {
    title: Option<String>,
    description: Option<String>,
    author: Option<String>,
    version: Option<String>,
}

fn keyboard_meta(
    locations: &Locations,
    name: &str,
    metadata: ProfileMetadata,
) -> anyhow::Result<()> {
    let store = locations.profiles();
    let profile = require_profile(&store, name)?;
    let profiles = HashMap::from([(name.to_string(), profile)]);

    let mut editor = ProfileEditor::new(name, &profiles, &BuiltinActions);
    if let Some(title) = &metadata.title {
        editor.set_title(title);
    }
    if let Some(description) = &metadata.description {
        editor.set_description(description);
    }
    if let Some(author) = &metadata.author {
        editor.set_author(author);
    }
    if let Some(version) = &metadata.version {
        editor.set_version(version);
    }

    let profile = editor.get_profile();
    if editor.is_modified() {
        store
            .save(&profile)
            .with_context(|| format!("Failed to save keyboard profile '{}'", name))?;
    } else {
        tracing::info!(name, "profile metadata unchanged");
    }
    print_json(&ProfileView::new(&profile))
}

#[derive(Serialize)]
struct CheckReport<'p> {
    name: &'p str,
    duplicate_actions: Vec<String>,
    conflicts: Vec<prefpane::ShortcutConflict>,
}

fn keyboard_check(locations: &Locations, name: &str) -> anyhow::Result<()> {
    let profile = require_profile(&locations.profiles(), name)?;
    print_json(&CheckReport {
        name,
        duplicate_actions: profile.duplicate_actions(),
        conflicts: profile.conflicts(),
    })
}
