// In-memory catalog and writer doubles shared by the unit tests

use async_trait::async_trait;
use media_sync_models::{CatalogItem, CatalogUserData, Item, ItemKind, RemoteWrite, UserData};
use media_sync_sources::{CatalogClient, CatalogError, CatalogWriter};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn item(id: &str, name: &str, item_type: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        item_type: item_type.to_string(),
        provider_ids: HashMap::new(),
        user_data: UserData::default(),
    }
}

pub fn episode(id: &str, name: &str) -> Item {
    item(id, name, "Episode")
}

pub fn movie(id: &str, name: &str) -> Item {
    item(id, name, "Movie")
}

pub fn with_providers(mut item: Item, providers: &[(&str, &str)]) -> Item {
    item.provider_ids = providers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    item
}

pub fn raw(id: &str, name: &str, kind: ItemKind, played: bool) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        item_type: kind.as_str().to_string(),
        provider_ids: HashMap::new(),
        user_data: Some(CatalogUserData {
            played,
            ..CatalogUserData::default()
        }),
        series_name: None,
        production_year: None,
    }
}

/// Records every write; fails the operations listed in `failing`
#[derive(Default)]
pub struct RecordingWriter {
    pub writes: Mutex<Vec<RemoteWrite>>,
    failing: Vec<&'static str>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(operations: &[&'static str]) -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            failing: operations.to_vec(),
        }
    }

    pub fn recorded(&self) -> Vec<RemoteWrite> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, write: RemoteWrite) -> Result<(), CatalogError> {
        let operation = write.operation();
        self.writes.lock().unwrap().push(write);
        if self.failing.contains(&operation) {
            return Err(CatalogError::Protocol(format!("{} rejected", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogWriter for RecordingWriter {
    async fn mark_played(&self, item_id: &str) -> Result<(), CatalogError> {
        self.record(RemoteWrite::MarkPlayed { item_id: item_id.to_string() })
    }

    async fn set_favorite(&self, item_id: &str) -> Result<(), CatalogError> {
        self.record(RemoteWrite::SetFavorite { item_id: item_id.to_string() })
    }

    async fn set_playback_position(&self, item_id: &str, ticks: i64) -> Result<(), CatalogError> {
        self.record(RemoteWrite::SetPlaybackPosition {
            item_id: item_id.to_string(),
            ticks,
        })
    }
}

/// Catalog serving fixed item lists, paged like the real server
#[derive(Default)]
pub struct FakeCatalog {
    pub url: String,
    pub users: HashMap<String, String>,
    pub items: HashMap<ItemKind, Vec<CatalogItem>>,
    /// Fail the page request for this kind at this offset
    pub fail_page: Option<(ItemKind, usize)>,
    pub fail_login: bool,
    pub fail_user_lookup: bool,
    pub logged_in: bool,
    pub logged_out: bool,
    pub page_requests: Mutex<Vec<(ItemKind, usize, usize)>>,
    pub writes: Mutex<Vec<(String, RemoteWrite)>>,
}

impl FakeCatalog {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, name: &str, id: &str) -> Self {
        self.users.insert(name.to_string(), id.to_string());
        self
    }

    pub fn with_items(mut self, kind: ItemKind, items: Vec<CatalogItem>) -> Self {
        self.items.insert(kind, items);
        self
    }

    pub fn recorded_writes(&self) -> Vec<(String, RemoteWrite)> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, user_id: &str, write: RemoteWrite) -> Result<(), CatalogError> {
        self.writes.lock().unwrap().push((user_id.to_string(), write));
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    fn server_url(&self) -> &str {
        &self.url
    }

    async fn login(&mut self) -> Result<(), CatalogError> {
        if self.fail_login {
            return Err(CatalogError::Protocol("invalid username or password".to_string()));
        }
        self.logged_in = true;
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.logged_in
    }

    async fn logout(&mut self) -> Result<(), CatalogError> {
        self.logged_in = false;
        self.logged_out = true;
        Ok(())
    }

    async fn resolve_user(&self, username: &str) -> Result<Option<String>, CatalogError> {
        if self.fail_user_lookup {
            return Err(CatalogError::Protocol("users endpoint unavailable".to_string()));
        }
        Ok(self.users.get(username).cloned())
    }

    async fn fetch_items_page(
        &self,
        _user_id: &str,
        kind: ItemKind,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.page_requests.lock().unwrap().push((kind, offset, limit));
        if self.fail_page == Some((kind, offset)) {
            return Err(CatalogError::Protocol(format!("page {} of {} failed", offset, kind)));
        }
        let all = self.items.get(&kind).cloned().unwrap_or_default();
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn mark_played(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        self.record(user_id, RemoteWrite::MarkPlayed { item_id: item_id.to_string() })
    }

    async fn set_favorite(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        self.record(user_id, RemoteWrite::SetFavorite { item_id: item_id.to_string() })
    }

    async fn set_playback_position(
        &self,
        user_id: &str,
        item_id: &str,
        ticks: i64,
    ) -> Result<(), CatalogError> {
        self.record(
            user_id,
            RemoteWrite::SetPlaybackPosition {
                item_id: item_id.to_string(),
                ticks,
            },
        )
    }
}
