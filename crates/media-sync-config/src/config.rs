use media_sync_models::ItemKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the catalog page size
pub const PAGE_SIZE_ENV: &str = "QUERY_LIMIT";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library_a: Option<ServerConfig>,
    #[serde(default)]
    pub library_b: Option<ServerConfig>,
    #[serde(default)]
    pub sync: SyncOptions,
}

/// Connection settings for one catalog account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Library user whose watch state is synced (defaults to `server_username`)
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub server_url: String,
    /// Account used to log in to the server
    #[serde(default)]
    pub server_username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    #[serde(default = "configured_page_size")]
    pub page_size: usize,
    #[serde(default = "ItemKind::default_kinds")]
    pub item_types: Vec<ItemKind>,
    #[serde(default)]
    pub log_to_file: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{side} is missing required setting '{field}'")]
    MissingField { side: String, field: &'static str },
    #[error("page_size must be greater than zero")]
    InvalidPageSize,
    #[error("item_types must list at least one item type")]
    NoItemTypes,
}

pub fn default_page_size() -> usize {
    5000
}

/// Page size from `QUERY_LIMIT`, if set to a positive integer
pub fn page_size_from_env() -> Option<usize> {
    std::env::var(PAGE_SIZE_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|size| *size > 0)
}

/// Page size used when the config file does not set one: `QUERY_LIMIT`, else 5000
pub fn configured_page_size() -> usize {
    page_size_from_env().unwrap_or_else(default_page_size)
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: configured_page_size(),
            item_types: ItemKind::default_kinds(),
            log_to_file: false,
        }
    }
}

impl SyncOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.item_types.is_empty() {
            return Err(ConfigError::NoItemTypes);
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Library user to sync; falls back to the login account
    pub fn effective_username(&self) -> &str {
        if self.username.is_empty() {
            &self.server_username
        } else {
            &self.username
        }
    }

    /// Check that everything needed to log in is present
    pub fn validate(&self, side: &str) -> Result<(), ConfigError> {
        let missing = if self.server_url.trim().is_empty() {
            Some("server_url")
        } else if self.server_username.is_empty() {
            Some("server_username")
        } else if self.server_password.is_empty() {
            Some("server_password")
        } else {
            None
        };

        match missing {
            Some(field) => Err(ConfigError::MissingField {
                side: side.to_string(),
                field,
            }),
            None => Ok(()),
        }
    }

    /// Copy with the password replaced, for display
    pub fn masked(&self) -> Self {
        let server_password = if self.server_password.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        Self {
            server_password,
            ..self.clone()
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (side, server) in [("library_a", &self.library_a), ("library_b", &self.library_b)] {
            match server {
                Some(server) => server.validate(side)?,
                None => {
                    return Err(ConfigError::MissingField {
                        side: side.to_string(),
                        field: "server_url",
                    })
                }
            }
        }
        self.sync.validate()
    }
}
