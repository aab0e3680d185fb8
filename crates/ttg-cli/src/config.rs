//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ttg_store::Layout;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the project list and the history log.
    pub data_dir: PathBuf,
    /// Directory holding one file per running session.
    pub state_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let state_dir = dirs_state_path().unwrap_or_else(|| data_dir.join("state"));
        Self {
            data_dir,
            state_dir,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TTG_*)
        figment = figment.merge(Env::prefixed("TTG_"));

        figment.extract()
    }

    /// Store layout described by this configuration.
    pub fn layout(&self) -> Layout {
        Layout::new(&self.data_dir, &self.state_dir)
    }
}

/// Returns the platform-specific config directory for ttg.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ttg"))
}

/// Returns the platform-specific data directory for ttg.
///
/// On Linux: `~/.local/share/ttg`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ttg"))
}

/// Returns the state directory for ttg.
///
/// On Linux: `~/.local/state/ttg`. Platforms without a state directory use
/// the same path under the home directory.
pub fn dirs_state_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("state")))
        .map(|p| p.join("ttg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_ttg() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "ttg");
    }

    #[test]
    fn test_dirs_state_path_ends_with_ttg() {
        let path = dirs_state_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "ttg");
    }

    #[test]
    fn test_default_config_uses_platform_dirs() {
        let config = Config::default();
        assert_eq!(config.data_dir, dirs_data_path().unwrap());
        assert_eq!(config.state_dir, dirs_state_path().unwrap());
    }

    #[test]
    fn test_layout_places_files() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            state_dir: PathBuf::from("/state"),
        };
        let layout = config.layout();
        assert_eq!(layout.registry_path(), PathBuf::from("/data/projects.json"));
        assert_eq!(layout.history_path(), PathBuf::from("/data/history.json"));
        assert_eq!(
            layout.pending_path("work").unwrap(),
            PathBuf::from("/state/work.json")
        );
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "state_dir = \"/tmp/ttg-state\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();

        if std::env::var_os("TTG_STATE_DIR").is_none() {
            assert_eq!(config.state_dir, PathBuf::from("/tmp/ttg-state"));
        }
    }
}
