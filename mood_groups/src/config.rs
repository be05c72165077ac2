use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::cli::Cli;

/// Runtime configuration resolved from file, env and CLI.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base directory holding the JSON store file.
    pub data_dir: PathBuf,
    /// Chat retention window used by the expired scope and the sweep.
    pub retention_days: u16,
    /// Whether verbose logging is enabled.
    pub logging_enabled: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    storage: FileStorage,
    #[serde(default)]
    chat: FileChat,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Deserialize, Default)]
struct FileStorage {
    data_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
struct FileChat {
    #[serde(default = "default_retention_days")]
    retention_days: u16,
}

#[derive(Deserialize)]
struct FileLogging {
    #[serde(default = "default_logging")]
    enabled: bool,
}

fn default_retention_days() -> u16 {
    30
}

fn default_logging() -> bool {
    true
}

impl Default for FileChat {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

impl Default for FileLogging {
    fn default() -> Self {
        Self {
            enabled: default_logging(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI, environment variables, config file
    /// and defaults, in that order of precedence.
    pub fn load(cli: &Cli) -> Result<Self> {
        // built-in defaults
        let mut data_dir: Option<PathBuf> = None;
        let mut retention_days = default_retention_days();
        let mut logging = default_logging();

        // config file path precedence: CLI -> ENV -> default
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("MINDSPACE_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config/mindspace.toml"));

        if let Ok(bytes) = fs::read(&config_path) {
            let contents = String::from_utf8_lossy(&bytes);
            let file_cfg: FileConfig = toml::from_str(&contents).context("invalid config file")?;
            data_dir = file_cfg.storage.data_dir;
            retention_days = file_cfg.chat.retention_days;
            logging = file_cfg.logging.enabled;
        }

        // environment overrides
        if let Ok(dir) = std::env::var("MINDSPACE_DATA_DIR") {
            data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(days) = std::env::var("MINDSPACE_RETENTION_DAYS") {
            if let Ok(days) = days.parse::<u16>() {
                retention_days = days;
            }
        }
        if let Ok(enabled) = std::env::var("MINDSPACE_LOGGING") {
            if let Ok(enabled) = enabled.parse::<bool>() {
                logging = enabled;
            }
        }

        // CLI overrides
        if let Some(dir) = &cli.data_dir {
            data_dir = Some(dir.clone());
        }
        if let Some(days) = cli.retention_days {
            retention_days = days;
        }
        if let Some(enabled) = cli.logging {
            logging = enabled;
        }

        if !(1..=3650).contains(&retention_days) {
            anyhow::bail!("invalid_retention");
        }

        Ok(Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            retention_days,
            logging_enabled: logging,
        })
    }

    /// Path of the JSON store file inside the data directory.
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("data.json")
    }
}

/// Determine the default data directory.
pub fn default_data_dir() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "campusmindspace", "mindspace") {
        proj.data_dir().to_path_buf()
    } else {
        PathBuf::from("./mindspace_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn clear_env() {
        std::env::remove_var("MINDSPACE_CONFIG");
        std::env::remove_var("MINDSPACE_DATA_DIR");
        std::env::remove_var("MINDSPACE_RETENTION_DAYS");
        std::env::remove_var("MINDSPACE_LOGGING");
    }

    #[test]
    #[serial]
    fn valid_config_parses() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(
            &path,
            "[storage]\ndata_dir=\"/tmp/ms\"\n[chat]\nretention_days=7\n[logging]\nenabled=false\n",
        )
        .unwrap();
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ms"));
        assert_eq!(cfg.retention_days, 7);
        assert!(!cfg.logging_enabled);
    }

    #[test]
    #[serial]
    fn invalid_retention_fails() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "[chat]\nretention_days=0\n").unwrap();
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        assert!(Config::load(&cli).is_err());
    }

    #[test]
    #[serial]
    fn missing_keys_default() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "").unwrap();
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.retention_days, 30);
        assert!(cfg.logging_enabled);
    }

    #[test]
    #[serial]
    fn precedence_cli_env_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "[chat]\nretention_days=10\n").unwrap();
        std::env::set_var("MINDSPACE_RETENTION_DAYS", "20");
        let cli = Cli {
            config: Some(path.clone()),
            retention_days: Some(40),
            ..Default::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.retention_days, 40);
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.retention_days, 20);
        std::env::remove_var("MINDSPACE_RETENTION_DAYS");
    }

    #[test]
    #[serial]
    fn logging_toggle() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "[logging]\nenabled=false\n").unwrap();
        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert!(!cfg.logging_enabled);
    }
}
