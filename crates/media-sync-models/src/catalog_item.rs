use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::item::{Item, ProviderIds, UserData};
use tracing::warn;

/// One entry of a catalog items page, in the catalog's wire shape
///
/// Only `Id`, `Name`, `Type`, `ProviderIds` and `UserData` feed the sync; the
/// remaining fields are kept for log messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub item_type: String,
    #[serde(default)]
    pub provider_ids: ProviderIds,
    #[serde(default)]
    pub user_data: Option<CatalogUserData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_year: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogUserData {
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub playback_position_ticks: i64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "deserialize_catalog_date", skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub play_count: u32,
}

impl CatalogItem {
    /// Human-readable label ("Series - Episode" for episodes)
    pub fn display_name(&self) -> String {
        match &self.series_name {
            Some(series) if !series.is_empty() => format!("{} - {}", series, self.name),
            _ => self.name.clone(),
        }
    }
}

impl From<CatalogItem> for Item {
    fn from(raw: CatalogItem) -> Self {
        let user_data = raw.user_data.unwrap_or_default();
        Item {
            id: raw.id,
            name: raw.name,
            item_type: raw.item_type,
            provider_ids: raw.provider_ids,
            user_data: UserData {
                played: user_data.played,
                playback_position_ticks: user_data.playback_position_ticks,
                is_favorite: user_data.is_favorite,
                last_played_date: user_data.last_played_date,
            },
        }
    }
}

/// Accept RFC 3339 timestamps and the zone-less form some servers emit (read as UTC)
///
/// Anything else is logged and read as absent.
fn deserialize_catalog_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Ok(Some(naive.and_utc())),
        Err(e) => {
            warn!(value = raw, error = %e, "Ignoring unparsable LastPlayedDate");
            Ok(None)
        }
    }
}
