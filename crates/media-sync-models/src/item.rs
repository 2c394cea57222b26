use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// External cross-reference IDs keyed by provider name (e.g. "Imdb", "Tmdb", "Tvdb")
pub type ProviderIds = HashMap<String, String>;

/// A playable unit (episode or movie) as known to one catalog
///
/// `id` is only meaningful inside the catalog the item came from. Two snapshots
/// from different servers never share an ID space, so items are matched through
/// `provider_ids` or, when those are absent, through `name` + `item_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Catalog type discriminator ("Episode", "Movie", ...)
    pub item_type: String,
    #[serde(default)]
    pub provider_ids: ProviderIds,
    #[serde(default)]
    pub user_data: UserData,
}

/// Per-user watch state of an item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserData {
    pub played: bool,
    /// Resume position in catalog ticks (100ns units on Jellyfin)
    pub playback_position_ticks: i64,
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<DateTime<Utc>>,
}

impl UserData {
    /// Last played date, with "never played" mapped to the Unix epoch
    pub fn last_played_or_epoch(&self) -> DateTime<Utc> {
        match self.last_played_date {
            Some(date) => date,
            None => DateTime::UNIX_EPOCH,
        }
    }

    /// True when the item carries any watch signal worth propagating
    pub fn is_interesting(&self) -> bool {
        self.played || self.playback_position_ticks > 0 || self.is_favorite
    }
}

/// Item categories fetched from a catalog, in the order they are requested
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Episode,
    Movie,
}

impl ItemKind {
    /// Value used by the catalog's `IncludeItemTypes` filter and `Type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Episode => "Episode",
            ItemKind::Movie => "Movie",
        }
    }

    pub fn default_kinds() -> Vec<ItemKind> {
        vec![ItemKind::Episode, ItemKind::Movie]
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "episode" | "episodes" => Ok(ItemKind::Episode),
            "movie" | "movies" => Ok(ItemKind::Movie),
            _ => Err(format!("Unsupported item type: {}. Use 'Episode' or 'Movie'", s)),
        }
    }
}
