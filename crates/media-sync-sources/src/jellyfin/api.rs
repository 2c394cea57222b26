use crate::error::CatalogError;
use crate::jellyfin::auth::{AuthenticateByName, AuthenticationResult, ClientIdentity, UserDto};
use media_sync_models::{CatalogItem, ItemKind};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

const AUTHORIZATION_HEADER: &str = "X-Emby-Authorization";

/// Sort order that makes snapshot order stable across runs
pub const ITEMS_SORT_BY: &str = "DateCreated,SortName,Type,Id";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResult {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub total_record_count: Option<u64>,
}

/// Query for one page of `GET /Users/{user}/Items`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsQuery {
    pub kind: ItemKind,
    pub start_index: usize,
    pub limit: usize,
}

impl ItemsQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Recursive", "true".to_string()),
            ("IncludeItemTypes", self.kind.as_str().to_string()),
            ("SortBy", ITEMS_SORT_BY.to_string()),
            ("SortOrder", "Ascending".to_string()),
            ("EnableImages", "false".to_string()),
            ("EnableUserData", "true".to_string()),
            ("Fields", "ProviderIds".to_string()),
            ("StartIndex", self.start_index.to_string()),
            ("Limit", self.limit.to_string()),
        ]
    }
}

/// Thin HTTP layer over the Jellyfin REST API; holds no session state
pub struct JellyfinHttpClient {
    client: Client,
    base_url: String,
    identity: ClientIdentity,
}

impl JellyfinHttpClient {
    pub fn new(server_url: &str, identity: ClientIdentity) -> Result<Self, CatalogError> {
        let base_url = normalize_server_url(server_url)?;
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|source| CatalogError::Http {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            identity,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> (RequestBuilder, String) {
        let url = self.url(path);
        let builder = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION_HEADER, self.identity.authorization_header(token));
        (builder, url)
    }

    async fn send(method: &'static str, builder: RequestBuilder, url: String) -> Result<Response, CatalogError> {
        trace!("Jellyfin: {} {}", method, url);
        let response = builder
            .send()
            .await
            .map_err(|source| CatalogError::Http { url: url.clone(), source })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            debug!("Jellyfin: {} {} returned {}", method, url, status);
            Err(CatalogError::Status { method, url, status })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: String) -> Result<T, CatalogError> {
        response
            .json::<T>()
            .await
            .map_err(|source| CatalogError::Decode { url, source })
    }

    pub async fn authenticate_by_name(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResult, CatalogError> {
        let (builder, url) = self.request(Method::POST, "Users/AuthenticateByName", None);
        let builder = builder.json(&AuthenticateByName { username, pw: password });
        let response = Self::send("POST", builder, url.clone()).await?;
        Self::decode(response, url).await
    }

    pub async fn get_users(&self, token: &str) -> Result<Vec<UserDto>, CatalogError> {
        let (builder, url) = self.request(Method::GET, "Users", Some(token));
        let response = Self::send("GET", builder, url.clone()).await?;
        Self::decode(response, url).await
    }

    pub async fn get_items(
        &self,
        token: &str,
        user_id: &str,
        query: &ItemsQuery,
    ) -> Result<ItemsResult, CatalogError> {
        let (builder, url) = self.request(Method::GET, &format!("Users/{}/Items", user_id), Some(token));
        let builder = builder.query(&query.to_params());
        let response = Self::send("GET", builder, url.clone()).await?;
        Self::decode(response, url).await
    }

    /// `POST /Users/{user}/{path}` with an empty body
    pub async fn post_for_user(&self, token: &str, user_id: &str, path: &str) -> Result<(), CatalogError> {
        let (builder, url) = self.request(Method::POST, &format!("Users/{}/{}", user_id, path), Some(token));
        Self::send("POST", builder, url).await?;
        Ok(())
    }

    /// `DELETE /Users/{user}/{path}` with optional query parameters
    pub async fn delete_for_user(
        &self,
        token: &str,
        user_id: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), CatalogError> {
        let (builder, url) = self.request(Method::DELETE, &format!("Users/{}/{}", user_id, path), Some(token));
        let builder = if params.is_empty() { builder } else { builder.query(params) };
        Self::send("DELETE", builder, url).await?;
        Ok(())
    }

    pub async fn logout(&self, token: &str) -> Result<(), CatalogError> {
        let (builder, url) = self.request(Method::POST, "Sessions/Logout", Some(token));
        Self::send("POST", builder, url).await?;
        Ok(())
    }
}

/// Trim trailing slashes and require an http(s) scheme
pub fn normalize_server_url(server_url: &str) -> Result<String, CatalogError> {
    let trimmed = server_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: "empty".to_string(),
        });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(CatalogError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: "expected an http:// or https:// URL".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
