use async_trait::async_trait;
use crate::error::CatalogError;
use crate::traits::{CatalogClient, CatalogWriter};

/// Binds a `CatalogClient` to one user so it can be used as a `CatalogWriter`
pub struct UserWriter<'a> {
    client: &'a dyn CatalogClient,
    user_id: String,
}

impl<'a> UserWriter<'a> {
    pub fn new(client: &'a dyn CatalogClient, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl CatalogWriter for UserWriter<'_> {
    async fn mark_played(&self, item_id: &str) -> Result<(), CatalogError> {
        self.client.mark_played(&self.user_id, item_id).await
    }

    async fn set_favorite(&self, item_id: &str) -> Result<(), CatalogError> {
        self.client.set_favorite(&self.user_id, item_id).await
    }

    async fn set_playback_position(&self, item_id: &str, ticks: i64) -> Result<(), CatalogError> {
        self.client.set_playback_position(&self.user_id, item_id, ticks).await
    }
}
