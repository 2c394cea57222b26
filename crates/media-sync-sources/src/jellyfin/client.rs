use crate::error::CatalogError;
use crate::jellyfin::api::{ItemsQuery, JellyfinHttpClient};
use crate::jellyfin::auth::{ClientIdentity, UserDto};
use crate::traits::CatalogClient;
use async_trait::async_trait;
use media_sync_config::ServerConfig;
use media_sync_models::{CatalogItem, ItemKind};
use tracing::{debug, info, warn};

/// `CatalogClient` for a Jellyfin (or Emby-compatible) server
pub struct JellyfinClient {
    http: JellyfinHttpClient,
    server_username: String,
    server_password: String,
    token: Option<String>,
    // Account returned by the login call, lets non-admin logins resolve themselves
    login_user: Option<UserDto>,
}

impl JellyfinClient {
    pub fn new(server_url: &str, server_username: &str, server_password: &str) -> Result<Self, CatalogError> {
        let identity = ClientIdentity::for_account(server_url, server_username);
        Ok(Self {
            http: JellyfinHttpClient::new(server_url, identity)?,
            server_username: server_username.to_string(),
            server_password: server_password.to_string(),
            token: None,
            login_user: None,
        })
    }

    pub fn from_server_config(config: &ServerConfig) -> Result<Self, CatalogError> {
        Self::new(&config.server_url, &config.server_username, &config.server_password)
    }

    fn token(&self) -> Result<&str, CatalogError> {
        self.token
            .as_deref()
            .ok_or_else(|| CatalogError::NotAuthenticated(self.http.base_url().to_string()))
    }
}

#[async_trait]
impl CatalogClient for JellyfinClient {
    fn server_url(&self) -> &str {
        self.http.base_url()
    }

    async fn login(&mut self) -> Result<(), CatalogError> {
        let result = self
            .http
            .authenticate_by_name(&self.server_username, &self.server_password)
            .await?;

        let token = result
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::Protocol("login response carried no access token".to_string()))?;

        self.token = Some(token);
        self.login_user = result.user;
        info!(
            operation = "login",
            server = self.http.base_url(),
            "Logged in to Jellyfin as {}",
            self.server_username
        );
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn logout(&mut self) -> Result<(), CatalogError> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        self.login_user = None;
        self.http.logout(&token).await?;
        debug!("Jellyfin: logged out of {}", self.http.base_url());
        Ok(())
    }

    async fn resolve_user(&self, username: &str) -> Result<Option<String>, CatalogError> {
        let token = self.token()?;

        if let Some(user) = &self.login_user {
            if user.name.as_deref() == Some(username) {
                debug!("Jellyfin: {} is the login account ({})", username, user.id);
                return Ok(Some(user.id.clone()));
            }
        }

        let users = self.http.get_users(token).await?;
        let user_id = users
            .into_iter()
            .find(|u| u.name.as_deref() == Some(username))
            .map(|u| u.id);

        match &user_id {
            Some(id) => debug!("Jellyfin: matched id {} for username {}", id, username),
            None => warn!("Jellyfin: user {} not found on {}", username, self.http.base_url()),
        }
        Ok(user_id)
    }

    async fn fetch_items_page(
        &self,
        user_id: &str,
        kind: ItemKind,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let token = self.token()?;
        let query = ItemsQuery {
            kind,
            start_index: offset,
            limit,
        };
        let result = self.http.get_items(token, user_id, &query).await?;
        debug!(
            "Jellyfin: {} page at {} returned {} items (total {:?})",
            kind,
            offset,
            result.items.len(),
            result.total_record_count
        );
        Ok(result.items)
    }

    async fn mark_played(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        let token = self.token()?;
        self.http
            .post_for_user(token, user_id, &format!("PlayedItems/{}", item_id))
            .await
    }

    async fn set_favorite(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        let token = self.token()?;
        self.http
            .post_for_user(token, user_id, &format!("FavoriteItems/{}", item_id))
            .await
    }

    async fn set_playback_position(
        &self,
        user_id: &str,
        item_id: &str,
        ticks: i64,
    ) -> Result<(), CatalogError> {
        let token = self.token()?;
        self.http
            .delete_for_user(token, user_id, &format!("PlayedItems/{}", item_id), &[])
            .await?;
        self.http
            .delete_for_user(
                token,
                user_id,
                &format!("PlayingItems/{}", item_id),
                &[("PositionTicks", ticks.to_string())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_config() {
        let config = ServerConfig {
            username: "kid".to_string(),
            server_url: "http://media.local:8096/".to_string(),
            server_username: "admin".to_string(),
            server_password: "pw".to_string(),
        };
        let client = JellyfinClient::from_server_config(&config).unwrap();
        assert_eq!(client.server_url(), "http://media.local:8096");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_invalid_server_url() {
        assert!(matches!(
            JellyfinClient::new("ftp://media.local", "admin", "pw"),
            Err(CatalogError::InvalidServerUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_calls_before_login_are_rejected() {
        let mut client = JellyfinClient::new("http://127.0.0.1:9", "admin", "pw").unwrap();

        assert!(matches!(
            client.resolve_user("admin").await,
            Err(CatalogError::NotAuthenticated(_))
        ));
        assert!(matches!(
            client.fetch_items_page("u1", ItemKind::Episode, 0, 10).await,
            Err(CatalogError::NotAuthenticated(_))
        ));
        assert!(matches!(
            client.set_playback_position("u1", "i1", 10).await,
            Err(CatalogError::NotAuthenticated(_))
        ));
        // Logging out without a session is a no-op
        assert!(client.logout().await.is_ok());
    }
}
