//! Location of the configuration directory
//!
//! The directory holds the user prefs file and the keyboard profiles:
//!
//! ```text
//! <home>/prefs.js
//! <home>/defaults.js     (optional)
//! <home>/keyboard/<name>.json
//! ```

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const HOME_ENV: &str = "PREFPANE_HOME";

pub const PREFS_FILE: &str = "prefs.js";
pub const DEFAULTS_FILE: &str = "defaults.js";
pub const KEYBOARD_DIR: &str = "keyboard";

/// Get the configuration directory from a manual path, env var, or the
/// platform default
///
/// Priority:
/// 1. Manual path provided via CLI or parameter
/// 2. PREFPANE_HOME environment variable
/// 3. Platform config directory (e.g. `~/.config/prefpane` on Linux)
///
/// The directory does not have to exist yet; it is created on the first save.
pub fn config_home(manual_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = manual_path {
        return validate_home(path);
    }

    if let Some(env_path) = std::env::var_os(HOME_ENV).filter(|p| !p.is_empty()) {
        return validate_home(Path::new(&env_path));
    }

    let dirs = ProjectDirs::from("org", "prefpane", "prefpane").ok_or_else(|| {
        Error::ConfigHome(format!(
            "no home directory found; set {} to choose one",
            HOME_ENV
        ))
    })?;
    Ok(dirs.config_dir().to_path_buf())
}

fn validate_home(path: &Path) -> Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(Error::ConfigHome(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

pub fn prefs_path(home: &Path) -> PathBuf {
    home.join(PREFS_FILE)
}

/// Defaults file inside `home`, if there is one
pub fn defaults_path(home: &Path) -> Option<PathBuf> {
    let path = home.join(DEFAULTS_FILE);
    path.is_file().then_some(path)
}

pub fn keyboard_dir(home: &Path) -> PathBuf {
    home.join(KEYBOARD_DIR)
}
