use serde::{Deserialize, Serialize};
use std::fmt;

/// A single watch-state change pushed to a catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteWrite {
    MarkPlayed { item_id: String },
    SetPlaybackPosition { item_id: String, ticks: i64 },
    SetFavorite { item_id: String },
}

impl RemoteWrite {
    pub fn item_id(&self) -> &str {
        match self {
            RemoteWrite::MarkPlayed { item_id }
            | RemoteWrite::SetPlaybackPosition { item_id, .. }
            | RemoteWrite::SetFavorite { item_id } => item_id,
        }
    }

    /// Short operation name used in log fields
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteWrite::MarkPlayed { .. } => "mark_played",
            RemoteWrite::SetPlaybackPosition { .. } => "set_playback_position",
            RemoteWrite::SetFavorite { .. } => "set_favorite",
        }
    }
}

impl fmt::Display for RemoteWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteWrite::MarkPlayed { item_id } => write!(f, "MarkPlayed({})", item_id),
            RemoteWrite::SetPlaybackPosition { item_id, ticks } => {
                write!(f, "SetPlaybackPosition({}, {})", item_id, ticks)
            }
            RemoteWrite::SetFavorite { item_id } => write!(f, "SetFavorite({})", item_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteStatus {
    Applied,
    Failed { reason: String },
}

/// Result of issuing one `RemoteWrite`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteOutcome {
    pub write: RemoteWrite,
    #[serde(flatten)]
    pub status: WriteStatus,
}

impl WriteOutcome {
    pub fn applied(write: RemoteWrite) -> Self {
        Self { write, status: WriteStatus::Applied }
    }

    pub fn failed(write: RemoteWrite, reason: impl Into<String>) -> Self {
        Self {
            write,
            status: WriteStatus::Failed { reason: reason.into() },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, WriteStatus::Applied)
    }
}
