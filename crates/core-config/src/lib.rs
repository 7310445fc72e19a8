//! Configuration loading and parsing.
//!
//! `ceramic.toml` is discovered in the working directory first, then in the
//! platform config dir. A missing or unparsable file falls back to defaults
//! so a bad config can never keep the editor from starting. Unknown fields
//! are ignored to allow forward evolution.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const CONFIG_FILE: &str = "ceramic.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct EditorSection {
    /// Consecutive quit requests required to abandon unsaved changes.
    #[serde(default = "EditorSection::default_quit_confirm")]
    pub quit_confirm: u32,
    /// Seconds a status message stays visible.
    #[serde(default = "EditorSection::default_message_ttl_secs")]
    pub message_ttl_secs: u64,
}

impl EditorSection {
    const fn default_quit_confirm() -> u32 {
        2
    }
    const fn default_message_ttl_secs() -> u64 {
        5
    }
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            quit_confirm: Self::default_quit_confirm(),
            message_ttl_secs: Self::default_message_ttl_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorSection,
}

/// Effective configuration handed to the editor.
#[derive(Debug, Clone)]
pub struct Config {
    pub quit_confirm: u32,
    pub message_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            // a zero confirm count would make quitting impossible to guard
            quit_confirm: file.editor.quit_confirm.max(1),
            message_ttl: Duration::from_secs(file.editor.message_ttl_secs),
        }
    }
}

/// Best-effort config path: prefer a local `ceramic.toml`, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ceramic").join(CONFIG_FILE);
    }
    PathBuf::from(CONFIG_FILE)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "runtime", path = %path.display(), "config_loaded");
            Ok(file.into())
        }
        Err(e) => {
            tracing::warn!(target: "runtime", %e, "config_parse_error_using_defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_constants() {
        let c = Config::default();
        assert_eq!(c.quit_confirm, 2);
        assert_eq!(c.message_ttl, Duration::from_secs(5));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = load_from(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(c.quit_confirm, 2);
    }

    #[test]
    fn parse_error_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "editor = not toml [").unwrap();
        let c = load_from(Some(path)).unwrap();
        assert_eq!(c.quit_confirm, 2);
    }

    #[test]
    fn values_are_read_and_zero_confirm_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[editor]\nquit_confirm = 0\nmessage_ttl_secs = 9\n").unwrap();
        let c = load_from(Some(path)).unwrap();
        assert_eq!(c.quit_confirm, 1);
        assert_eq!(c.message_ttl, Duration::from_secs(9));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[editor]\nquit_confirm = 3\n[future]\nx = 1\n").unwrap();
        let c = load_from(Some(path)).unwrap();
        assert_eq!(c.quit_confirm, 3);
    }
}
