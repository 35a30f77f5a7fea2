use clap::{ArgAction, Parser, Subcommand};
use prefpane::{
    ClearHistoryCategory, CookiesKeepMode, CookiesPolicy, DoNotTrackPolicy, Shortcut,
    ThirdPartyCookiesPolicy,
};
use std::path::PathBuf;

/// CLI arguments for prefpane
#[derive(Parser, Debug)]
#[command(name = "prefpane")]
#[command(version)]
#[command(about = "Edit browser privacy preferences and keyboard profiles from the command line")]
pub struct Cli {
    /// Configuration directory (default: $PREFPANE_HOME or the platform config directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// User prefs file (default: <home>/prefs.js)
    #[arg(long, global = true, value_name = "FILE")]
    pub prefs: Option<PathBuf>,

    /// Defaults file with pref() lines (default: <home>/defaults.js if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub defaults: Option<PathBuf>,

    /// Keyboard profiles directory (default: <home>/keyboard)
    #[arg(long, global = true, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,

    /// Fail when a prefs file cannot be read instead of warning
    #[arg(long, global = true)]
    pub strict: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known options with their effective value and source
    Options {
        /// Filter option names by glob pattern (can be repeated)
        #[arg(short, long, value_name = "PATTERN")]
        query: Vec<String>,
    },

    /// Privacy preferences page
    Privacy {
        #[command(subcommand)]
        command: PrivacyCommand,
    },

    /// Keyboard profiles
    Keyboard {
        #[command(subcommand)]
        command: KeyboardCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrivacyCommand {
    /// Print the page state as JSON
    Show,

    /// Change page controls and save
    Set(PrivacySetArgs),

    /// Edit third-party cookie host exceptions and save
    Exceptions {
        /// Always accept third-party cookies from HOST
        #[arg(long, value_name = "HOST")]
        accept: Vec<String>,

        /// Always reject third-party cookies from HOST
        #[arg(long, value_name = "HOST")]
        reject: Vec<String>,

        /// Drop HOST from both lists
        #[arg(long, value_name = "HOST")]
        remove: Vec<String>,
    },

    /// Choose what is cleared when the browser closes and save
    ClearHistory {
        /// Category to clear (can be repeated; none disables clearing)
        #[arg(long, value_name = "CATEGORY", conflicts_with = "cancel")]
        category: Vec<ClearHistoryCategory>,

        /// Open and cancel the dialog, keeping the current selection
        #[arg(long)]
        cancel: bool,
    },

    /// Open the password manager
    ManagePasswords,
}

#[derive(clap::Args, Debug, Default)]
pub struct PrivacySetArgs {
    #[arg(long, value_name = "POLICY")]
    pub do_not_track: Option<DoNotTrackPolicy>,

    #[arg(long, value_name = "BOOL")]
    pub private_mode: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub remember_browsing: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub remember_downloads: Option<bool>,

    /// Enable or disable cookies altogether
    #[arg(long, value_name = "BOOL")]
    pub cookies: Option<bool>,

    /// acceptAll, acceptExisting or readOnly
    #[arg(long, value_name = "POLICY")]
    pub cookies_policy: Option<CookiesPolicy>,

    #[arg(long, value_name = "MODE")]
    pub keep_mode: Option<CookiesKeepMode>,

    #[arg(long, value_name = "POLICY")]
    pub third_party_policy: Option<ThirdPartyCookiesPolicy>,

    #[arg(long, value_name = "BOOL")]
    pub clear_on_close: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub remember_passwords: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum KeyboardCommand {
    /// List stored keyboard profiles
    List,

    /// Print a profile as JSON
    Show { name: String },

    /// Assign shortcuts to an action, creating the profile if needed
    Bind {
        name: String,
        action: String,

        /// Shortcuts such as "Ctrl+T" or "Ctrl+K, Ctrl+C"; none clears them
        shortcuts: Vec<Shortcut>,

        /// Action parameter as KEY=VALUE; VALUE is read as JSON when possible
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_parameter)]
        parameters: Vec<(String, serde_json::Value)>,
    },

    /// Remove every binding of an action
    Unbind { name: String, action: String },

    /// Report duplicate actions and shortcut conflicts
    Check { name: String },

    /// Change a profile's title, description, author or version
    Meta {
        name: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        version: Option<String>,
    },

    /// List the actions that can be bound
    Actions,
}

fn parse_parameter(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("tab=2").unwrap(),
            ("tab".to_string(), serde_json::json!(2))
        );
        assert_eq!(
            parse_parameter("url=https://example.com").unwrap(),
            (
                "url".to_string(),
                serde_json::json!("https://example.com")
            )
        );
        assert!(parse_parameter("novalue").is_err());
        assert!(parse_parameter("=1").is_err());
    }

    #[test]
    fn test_parse_privacy_set() {
        let cli = Cli::try_parse_from([
            "prefpane",
            "privacy",
            "set",
            "--do-not-track",
            "doNotAllow",
            "--cookies",
            "false",
        ])
        .unwrap();
        let Commands::Privacy {
            command: PrivacyCommand::Set(args),
        } = cli.command
        else {
            panic!("expected privacy set");
        };
        assert_eq!(args.do_not_track, Some(DoNotTrackPolicy::DoNotAllow));
        assert_eq!(args.cookies, Some(false));
        assert_eq!(args.private_mode, None);
    }

    #[test]
    fn test_parse_keyboard_bind() {
        let cli = Cli::try_parse_from([
            "prefpane",
            "-v",
            "keyboard",
            "bind",
            "mine",
            "ActivateTab",
            "Alt+1",
            "Ctrl+K, Ctrl+1",
            "--param",
            "tab=0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Keyboard {
            command:
                KeyboardCommand::Bind {
                    shortcuts,
                    parameters,
                    ..
                },
        } = cli.command
        else {
            panic!("expected keyboard bind");
        };
        assert_eq!(shortcuts.len(), 2);
        assert_eq!(shortcuts[1].chords().len(), 2);
        assert_eq!(parameters, vec![("tab".to_string(), serde_json::json!(0))]);
    }

    #[test]
    fn test_rejects_unknown_token() {
        assert!(Cli::try_parse_from(["prefpane", "privacy", "set", "--keep-mode", "forever"]).is_err());
        assert!(Cli::try_parse_from(["prefpane", "keyboard", "bind", "x", "Stop", "Ctrl+"]).is_err());
    }
}
