//! Keyboard profile discovery and persistence
//!
//! Profiles live as `<name>.json` files in a single directory. The directory
//! is not required to exist until the first profile is saved.

use super::profile::KeyboardProfile;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

const PROFILE_EXTENSION: &str = "json";

/// Public profile information for listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub title: String,
    pub path: PathBuf,
    pub bindings: usize,
}

/// Directory of keyboard profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ProfileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_profile_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, PROFILE_EXTENSION)))
    }

    /// Names of the stored profiles, sorted
    pub fn names(&self) -> Vec<String> {
        if !self.dir.is_dir() {
            return Vec::new();
        }

        let mut names: Vec<String> = walkdir::WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == PROFILE_EXTENSION)
                    .unwrap_or(false)
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .filter(|name| validate_profile_name(name).is_ok())
            .collect();
        names.sort();
        names
    }

    /// Load one profile by name
    pub fn load(&self, name: &str) -> Result<KeyboardProfile> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(Error::ProfileNotFound {
                name: name.to_string(),
                directory: self.dir.clone(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let mut profile: KeyboardProfile =
            serde_json::from_str(&content).map_err(|source| Error::ProfileFormat {
                path: path.clone(),
                source,
            })?;
        profile.name = name.to_string();
        tracing::debug!(
            name,
            bindings = profile.bindings.len(),
            "loaded keyboard profile"
        );
        Ok(profile)
    }

    /// Load every readable profile; broken files are skipped with a warning
    pub fn load_all(&self) -> HashMap<String, KeyboardProfile> {
        let mut profiles = HashMap::new();
        for name in self.names() {
            match self.load(&name) {
                Ok(profile) => {
                    profiles.insert(name, profile);
                }
                Err(e) => tracing::warn!(name = %name, "skipping keyboard profile: {}", e),
            }
        }
        profiles
    }

    /// Listing entries for every readable profile, sorted by name
    pub fn list(&self) -> Vec<ProfileInfo> {
        let mut infos: Vec<ProfileInfo> = self
            .load_all()
            .into_values()
            .filter_map(|profile| {
                let path = self.path_for(&profile.name).ok()?;
                Some(ProfileInfo {
                    bindings: profile.bindings.len(),
                    title: profile.title,
                    name: profile.name,
                    path,
                })
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Write `profile` to `<dir>/<profile.name>.json`, replacing any previous
    /// file atomically
    pub fn save(&self, profile: &KeyboardProfile) -> Result<PathBuf> {
        let path = self.path_for(&profile.name)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(profile).map_err(|source| Error::ProfileFormat {
            path: path.clone(),
            source,
        })?;

        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::info!(name = %profile.name, path = %path.display(), "saved keyboard profile");
        Ok(path)
    }
}

/// Load the profile mapping a [`ProfileEditor`](super::ProfileEditor) is
/// constructed from
pub fn load_profiles(dir: &Path) -> HashMap<String, KeyboardProfile> {
    ProfileStore::new(dir).load_all()
}

/// Profile names become file names, so they are limited to a portable subset
pub fn validate_profile_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidProfileName(name.to_string()))
    }
}
