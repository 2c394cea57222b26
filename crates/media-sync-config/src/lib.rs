pub mod config;
pub mod credentials;
pub mod paths;
pub mod session;

pub use config::{Config, ConfigError, ServerConfig, SyncOptions, configured_page_size, default_page_size, page_size_from_env};
pub use credentials::CredentialStore;
pub use paths::PathManager;
pub use session::SessionStamp;
