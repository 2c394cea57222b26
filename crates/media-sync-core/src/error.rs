use media_sync_config::ConfigError;
use media_sync_sources::CatalogError;
use thiserror::Error;

/// Errors that stop a sync run before any remote call is made
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("missing credentials: {0}")]
    MissingCredential(#[from] ConfigError),

    #[error("invalid server for {side}: {source}")]
    InvalidServer {
        side: String,
        #[source]
        source: CatalogError,
    },
}
