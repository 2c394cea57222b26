use async_trait::async_trait;
use media_sync_models::{CatalogItem, ItemKind};
use crate::error::CatalogError;

/// A remote media catalog holding items and per-user watch state
///
/// Every call is awaited by the caller before the next one is issued; nothing
/// here is expected to be invoked concurrently.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Base URL of the server, for log messages
    fn server_url(&self) -> &str;

    // Session lifecycle, wraps one sync run
    async fn login(&mut self) -> Result<(), CatalogError>;
    fn is_authenticated(&self) -> bool;
    async fn logout(&mut self) -> Result<(), CatalogError> {
        Ok(())
    }

    /// Catalog user ID for `username`, `None` if no such user exists
    async fn resolve_user(&self, username: &str) -> Result<Option<String>, CatalogError>;

    /// One page of items of `kind`, in DateCreated, SortName, Type, Id ascending order
    async fn fetch_items_page(
        &self,
        user_id: &str,
        kind: ItemKind,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError>;

    async fn mark_played(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError>;
    async fn set_favorite(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError>;

    /// Clear the played marker, then record `ticks` as the resume position
    async fn set_playback_position(
        &self,
        user_id: &str,
        item_id: &str,
        ticks: i64,
    ) -> Result<(), CatalogError>;
}

/// Watch-state writes for one user on one catalog
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    async fn mark_played(&self, item_id: &str) -> Result<(), CatalogError>;
    async fn set_favorite(&self, item_id: &str) -> Result<(), CatalogError>;
    async fn set_playback_position(&self, item_id: &str, ticks: i64) -> Result<(), CatalogError>;
}
