use anyhow::Result;
use crate::session::SessionStamp;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory (config.toml, credentials.toml, logs/)
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";
/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("jellysync");

        Ok(Self::with_config_dir(base_dir))
    }

    /// Layout rooted at `config_dir`: data/ and logs/ live underneath it
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            data_dir: config_dir.join("data"),
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// Honor `CONFIG_DIR` / `DATA_DIR`, falling back to `./config` when no
    /// platform config directory is available
    pub fn from_env() -> Self {
        let mut manager = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::with_config_dir(PathBuf::from(dir)),
            _ => Self::new().unwrap_or_else(|_| Self::with_config_dir(PathBuf::from("config"))),
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                manager.data_dir = PathBuf::from(dir);
            }
        }
        manager
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Log file for one sync run, e.g. `logs/log_2024_03_01-08_15_42_PM.txt`
    pub fn session_log_file(&self, session: &SessionStamp) -> PathBuf {
        self.log_dir.join(format!("log_{}.txt", session.file_stamp()))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        Self::from_env()
    }
}
