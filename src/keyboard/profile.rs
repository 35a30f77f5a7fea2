//! Keyboard profile model

use super::actions::{ActionCatalog, Parameters};
use super::shortcut::{parse_shortcut, Shortcut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One action with its assigned shortcuts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardBinding {
    pub action: String,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
}

impl KeyboardBinding {
    pub fn new(action: impl Into<String>, shortcuts: Vec<Shortcut>) -> Self {
        KeyboardBinding {
            action: action.into(),
            shortcuts,
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

/// A named set of keyboard bindings
///
/// The name is not part of the serialized form; it comes from the file the
/// profile is stored in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardProfile {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub bindings: Vec<KeyboardBinding>,
}

/// How two bindings collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Both use the same shortcut
    Identical,
    /// The first shortcut is a leading chord sequence of the second, so the
    /// second can never be typed
    Prefix,
}

/// A shortcut collision between two bindings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortcutConflict {
    pub kind: ConflictKind,
    pub shortcut: Shortcut,
    pub other: Shortcut,
    pub actions: (String, String),
}

impl KeyboardProfile {
    pub fn new(name: impl Into<String>) -> Self {
        KeyboardProfile {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Profile binding every catalog action that has default shortcuts
    pub fn from_defaults(name: impl Into<String>, catalog: &dyn ActionCatalog) -> Self {
        let mut profile = KeyboardProfile::new(name);
        profile.title = "Default".to_string();
        for action in catalog.actions() {
            let shortcuts: Vec<Shortcut> = action
                .default_shortcuts
                .iter()
                .filter_map(|text| match parse_shortcut(text) {
                    Ok(shortcut) => Some(shortcut),
                    Err(e) => {
                        tracing::warn!(action = action.identifier, "skipping default shortcut: {}", e);
                        None
                    }
                })
                .collect();
            if !shortcuts.is_empty() {
                profile
                    .bindings
                    .push(KeyboardBinding::new(action.identifier, shortcuts));
            }
        }
        profile
    }

    /// First binding for `action`
    pub fn binding(&self, action: &str) -> Option<&KeyboardBinding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    /// Action identifiers bound more than once, in first-seen order
    pub fn duplicate_actions(&self) -> Vec<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for binding in &self.bindings {
            match counts.iter_mut().find(|(action, _)| *action == binding.action) {
                Some((_, count)) => *count += 1,
                None => counts.push((&binding.action, 1)),
            }
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(action, _)| action.to_string())
            .collect()
    }

    /// Shortcut collisions between different bindings
    pub fn conflicts(&self) -> Vec<ShortcutConflict> {
        let assigned: Vec<(usize, &Shortcut)> = self
            .bindings
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.shortcuts.iter().map(move |s| (i, s)))
            .collect();

        let mut conflicts = Vec::new();
        for (n, &(i, first)) in assigned.iter().enumerate() {
            for &(j, second) in &assigned[n + 1..] {
                if i == j {
                    continue;
                }
                // the shorter shortcut goes first
                let (kind, (a, sa), (b, sb)) = if first == second {
                    (ConflictKind::Identical, (i, first), (j, second))
                } else if is_prefix(first, second) {
                    (ConflictKind::Prefix, (i, first), (j, second))
                } else if is_prefix(second, first) {
                    (ConflictKind::Prefix, (j, second), (i, first))
                } else {
                    continue;
                };
                conflicts.push(ShortcutConflict {
                    kind,
                    shortcut: sa.clone(),
                    other: sb.clone(),
                    actions: (
                        self.bindings[a].action.clone(),
                        self.bindings[b].action.clone(),
                    ),
                });
            }
        }
        conflicts
    }
}

fn is_prefix(short: &Shortcut, long: &Shortcut) -> bool {
    let (short, long) = (short.chords(), long.chords());
    short.len() < long.len() && long.starts_with(short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::actions::BuiltinActions;

    fn shortcut(text: &str) -> Shortcut {
        parse_shortcut(text).unwrap()
    }

    #[test]
    fn test_from_defaults() {
        let profile = KeyboardProfile::from_defaults("default", &BuiltinActions);
        assert_eq!(profile.name, "default");
        let reload = profile.binding("Reload").unwrap();
        assert_eq!(reload.shortcuts, vec![shortcut("F5"), shortcut("Ctrl+R")]);
        // actions without defaults are not bound
        assert!(profile.binding("Passwords").is_none());
        assert!(profile.conflicts().is_empty());
    }

    #[test]
    fn test_duplicate_actions() {
        let mut profile = KeyboardProfile::new("test");
        for action in ["Find", "Stop", "Find", "Reload", "Find"] {
            profile.bindings.push(KeyboardBinding::new(action, vec![]));
        }
        assert_eq!(profile.duplicate_actions(), vec!["Find".to_string()]);
    }

    #[test]
    fn test_conflicts() {
        let mut profile = KeyboardProfile::new("test");
        profile
            .bindings
            .push(KeyboardBinding::new("Find", vec![shortcut("Ctrl+F")]));
        profile
            .bindings
            .push(KeyboardBinding::new("FullScreen", vec![shortcut("ctrl+f")]));
        profile
            .bindings
            .push(KeyboardBinding::new("Bookmarks", vec![shortcut("Ctrl+K, Ctrl+B")]));
        profile
            .bindings
            .push(KeyboardBinding::new("Go", vec![shortcut("Ctrl+K")]));

        let conflicts = profile.conflicts();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].kind, ConflictKind::Identical);
        assert_eq!(
            conflicts[0].actions,
            ("Find".to_string(), "FullScreen".to_string())
        );
        assert_eq!(conflicts[1].kind, ConflictKind::Prefix);
        assert_eq!(conflicts[1].shortcut, shortcut("Ctrl+K"));
        assert_eq!(conflicts[1].actions.0, "Go");
    }

    #[test]
    fn test_json_format() {
        let mut profile = KeyboardProfile::new("mine");
        profile.title = "Mine".to_string();
        profile.bindings.push(
            KeyboardBinding::new("ActivateTab", vec![shortcut("Alt+1")])
                .with_parameter("tab", serde_json::json!(0)),
        );
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["bindings"][0]["shortcuts"][0], "Alt+1");
        assert_eq!(json["bindings"][0]["parameters"]["tab"], 0);
        assert!(json.get("name").is_none());

        let mut back: KeyboardProfile = serde_json::from_value(json).unwrap();
        back.name = "mine".to_string();
        assert_eq!(back, profile);
    }
}
