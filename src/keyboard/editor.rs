//! Keyboard profile editor view-model
//!
//! [`ProfileEditor`] holds a table with one row per binding. Rows are edited
//! in place through a [`CellEditor`], picked by column: the action column gets
//! an [`ActionEditor`], the shortcut column a [`ShortcutEditor`]. The profile
//! handed back by [`ProfileEditor::get_profile`] is rebuilt from the rows on
//! every call.

use super::actions::{ActionCatalog, Parameters};
use super::profile::{KeyboardBinding, KeyboardProfile};
use super::shortcut::{parse_shortcut, Shortcut};
use crate::error::Result;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Separator between shortcuts in a shortcut cell's text
pub const SHORTCUT_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Action,
    Shortcut,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    /// `None` until an action is chosen for a newly added row
    pub identifier: Option<String>,
    pub label: String,
    pub shortcuts: Vec<Shortcut>,
    pub parameters: Parameters,
}

impl ProfileRow {
    fn from_binding(binding: &KeyboardBinding, catalog: &dyn ActionCatalog) -> Self {
        ProfileRow {
            label: catalog.label_for(&binding.action),
            identifier: Some(binding.action.clone()),
            shortcuts: binding.shortcuts.clone(),
            parameters: binding.parameters.clone(),
        }
    }

    fn to_binding(&self) -> Option<KeyboardBinding> {
        Some(KeyboardBinding {
            action: self.identifier.clone()?,
            shortcuts: self.shortcuts.clone(),
            parameters: self.parameters.clone(),
        })
    }
}

/// Enabled state of the add/remove buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub add_enabled: bool,
    pub remove_enabled: bool,
}

/// Rendered cell: the main text plus a separately styled annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellDisplay {
    pub text: String,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionChoice {
    pub identifier: String,
    pub label: String,
}

/// Drop-down of known actions for the action column
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEditor {
    row: usize,
    choices: Vec<ActionChoice>,
    current: Option<usize>,
}

impl ActionEditor {
    fn new(row: usize, identifier: Option<&str>, catalog: &dyn ActionCatalog) -> Self {
        let mut choices: Vec<ActionChoice> = catalog
            .actions()
            .iter()
            .map(|a| ActionChoice {
                identifier: a.identifier.to_string(),
                label: a.label.to_string(),
            })
            .collect();

        // keep identifiers the catalog does not know selectable
        if let Some(identifier) = identifier {
            if !choices.iter().any(|c| c.identifier == identifier) {
                choices.push(ActionChoice {
                    identifier: identifier.to_string(),
                    label: catalog.label_for(identifier),
                });
            }
        }

        let current = identifier.and_then(|id| choices.iter().position(|c| c.identifier == id));
        ActionEditor {
            row,
            choices,
            current,
        }
    }

    pub fn choices(&self) -> &[ActionChoice] {
        &self.choices
    }

    pub fn current(&self) -> Option<&ActionChoice> {
        self.current.and_then(|i| self.choices.get(i))
    }

    /// Select by identifier; returns false if it is not offered
    pub fn select(&mut self, identifier: &str) -> bool {
        match self.choices.iter().position(|c| c.identifier == identifier) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }
}

/// Key capture input for the shortcut column
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutEditor {
    row: usize,
    shortcuts: Vec<Shortcut>,
}

impl ShortcutEditor {
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn text(&self) -> String {
        join_shortcuts(&self.shortcuts)
    }

    /// Replace the shortcuts from text such as `"Ctrl+T; F5"`.
    ///
    /// Shortcuts are separated by `"; "` only, so `Ctrl+;` stays one key.
    /// Nothing changes if any part fails to parse.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.shortcuts = text
            .split(SHORTCUT_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_shortcut)
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Add a captured key combination unless it is already present
    pub fn capture(&mut self, shortcut: Shortcut) {
        if !self.shortcuts.contains(&shortcut) {
            self.shortcuts.push(shortcut);
        }
    }

    pub fn clear(&mut self) {
        self.shortcuts.clear();
    }
}

/// In-place editing strategy for one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellEditor {
    Action(ActionEditor),
    Shortcut(ShortcutEditor),
}

impl CellEditor {
    pub fn row(&self) -> usize {
        match self {
            CellEditor::Action(editor) => editor.row,
            CellEditor::Shortcut(editor) => editor.row,
        }
    }

    pub fn column(&self) -> Column {
        match self {
            CellEditor::Action(_) => Column::Action,
            CellEditor::Shortcut(_) => Column::Shortcut,
        }
    }
}

fn join_shortcuts(shortcuts: &[Shortcut]) -> String {
    shortcuts
        .iter()
        .map(Shortcut::to_string)
        .collect::<Vec<_>>()
        .join(SHORTCUT_SEPARATOR)
}

fn format_parameters(parameters: &Parameters) -> Option<String> {
    if parameters.is_empty() {
        return None;
    }
    Some(
        parameters
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}={}", key, s),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Editing state of one keyboard profile
pub struct ProfileEditor<'a> {
    profile: KeyboardProfile,
    rows: Vec<ProfileRow>,
    selection: BTreeSet<usize>,
    controls: ControlState,
    modified: bool,
    catalog: &'a dyn ActionCatalog,
}

impl<'a> ProfileEditor<'a> {
    /// Open `name` from `profiles`; an unknown name starts an empty profile
    pub fn new(
        name: &str,
        profiles: &HashMap<String, KeyboardProfile>,
        catalog: &'a dyn ActionCatalog,
    ) -> Self {
        let profile = profiles.get(name).cloned().unwrap_or_else(|| {
            tracing::debug!(name, "starting new keyboard profile");
            KeyboardProfile::new(name)
        });
        let rows = profile
            .bindings
            .iter()
            .map(|b| ProfileRow::from_binding(b, catalog))
            .collect();

        let mut editor = ProfileEditor {
            profile,
            rows,
            selection: BTreeSet::new(),
            controls: ControlState {
                add_enabled: true,
                remove_enabled: false,
            },
            modified: false,
            catalog,
        };
        editor.update_actions();
        editor
    }

    /// Append an unassigned row and select it
    pub fn add_action(&mut self) {
        self.rows.push(ProfileRow {
            identifier: None,
            label: String::new(),
            shortcuts: Vec::new(),
            parameters: Parameters::new(),
        });
        self.selection = BTreeSet::from([self.rows.len() - 1]);
        self.modified = true;
        self.update_actions();
    }

    /// Remove the selected rows
    pub fn remove_action(&mut self) {
        let selected = std::mem::take(&mut self.selection);
        for &row in selected.iter().rev() {
            if row < self.rows.len() {
                self.rows.remove(row);
                self.modified = true;
            }
        }
        self.update_actions();
    }

    /// Recompute the add/remove button state from the selection
    pub fn update_actions(&mut self) {
        self.controls = ControlState {
            add_enabled: true,
            remove_enabled: !self.selection.is_empty(),
        };
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Replace the selection; out-of-range rows are ignored
    pub fn select(&mut self, rows: impl IntoIterator<Item = usize>) {
        let count = self.rows.len();
        self.selection = rows.into_iter().filter(|&row| row < count).collect();
        self.update_actions();
    }

    pub fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    /// Editor for a cell, chosen by column
    pub fn create_editor(&self, row: usize, column: Column) -> Option<CellEditor> {
        let current = self.rows.get(row)?;
        let editor = match column {
            Column::Action => CellEditor::Action(ActionEditor::new(
                row,
                current.identifier.as_deref(),
                self.catalog,
            )),
            Column::Shortcut => CellEditor::Shortcut(ShortcutEditor {
                row,
                shortcuts: current.shortcuts.clone(),
            }),
        };
        Some(editor)
    }

    /// Write an editor's value back into its cell.
    ///
    /// Returns whether the cell changed. Editors for rows that no longer
    /// exist are dropped.
    pub fn commit(&mut self, editor: CellEditor) -> bool {
        let Some(row) = self.rows.get_mut(editor.row()) else {
            return false;
        };

        let changed = match editor {
            CellEditor::Action(editor) => match editor.current() {
                Some(choice) => {
                    let changed = row.identifier.as_deref() != Some(choice.identifier.as_str())
                        || row.label != choice.label;
                    row.identifier = Some(choice.identifier.clone());
                    row.label = choice.label.clone();
                    changed
                }
                None => false,
            },
            CellEditor::Shortcut(editor) => {
                let changed = row.shortcuts != editor.shortcuts;
                row.shortcuts = editor.shortcuts;
                changed
            }
        };

        if changed {
            self.modified = true;
        }
        changed
    }

    /// Replace a row's action parameters; returns whether they changed
    pub fn set_parameters(&mut self, row: usize, parameters: Parameters) -> bool {
        let Some(current) = self.rows.get_mut(row) else {
            return false;
        };
        if current.parameters == parameters {
            return false;
        }
        current.parameters = parameters;
        self.modified = true;
        true
    }

    /// Rendered contents of a cell
    pub fn display(&self, row: usize, column: Column) -> Option<CellDisplay> {
        let current = self.rows.get(row)?;
        let display = match column {
            Column::Action => CellDisplay {
                text: current.label.clone(),
                annotation: None,
            },
            Column::Shortcut => CellDisplay {
                text: join_shortcuts(&current.shortcuts),
                annotation: format_parameters(&current.parameters),
            },
        };
        Some(display)
    }

    /// The profile as the table currently describes it.
    ///
    /// Rows that never got an action are left out. Duplicate actions are
    /// kept as they are.
    pub fn get_profile(&self) -> KeyboardProfile {
        KeyboardProfile {
            bindings: self.rows.iter().filter_map(ProfileRow::to_binding).collect(),
            ..self.profile.clone()
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn set_title(&mut self, title: &str) {
        Self::set_field(&mut self.profile.title, title, &mut self.modified);
    }

    pub fn set_description(&mut self, description: &str) {
        Self::set_field(&mut self.profile.description, description, &mut self.modified);
    }

    pub fn set_author(&mut self, author: &str) {
        Self::set_field(&mut self.profile.author, author, &mut self.modified);
    }

    pub fn set_version(&mut self, version: &str) {
        Self::set_field(&mut self.profile.version, version, &mut self.modified);
    }

    fn set_field(field: &mut String, value: &str, modified: &mut bool) {
        if field != value {
            *field = value.to_string();
            *modified = true;
        }
    }

    /// Refresh action labels after a locale change
    pub fn retranslate(&mut self, catalog: &'a dyn ActionCatalog) {
        self.catalog = catalog;
        for row in &mut self.rows {
            if let Some(identifier) = &row.identifier {
                row.label = catalog.label_for(identifier);
            }
        }
    }
}
