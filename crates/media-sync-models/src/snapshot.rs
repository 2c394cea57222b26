use serde::{Deserialize, Serialize};
use crate::item::Item;

/// All items of interest for one user on one catalog, in catalog order
///
/// Order is DateCreated, SortName, Type, Id ascending as returned by the catalog.
/// Matching relies on it as the first-match-wins priority, so it must be kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibrarySnapshot {
    pub user: String,
    /// Catalog user ID, `None` when the user could not be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub items: Vec<Item>,
}

impl LibrarySnapshot {
    pub fn new(user: impl Into<String>, user_id: Option<String>, items: Vec<Item>) -> Self {
        Self {
            user: user.into(),
            user_id,
            items,
        }
    }

    /// Snapshot for a user that does not exist (or could not be looked up) on the catalog
    pub fn empty(user: impl Into<String>) -> Self {
        Self::new(user, None, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
