use crate::report::{IssueKind, SyncIssue};
use media_sync_models::{Item, ItemKind, LibrarySnapshot};
use media_sync_sources::CatalogClient;
use tracing::{debug, info, instrument, warn};

/// Snapshot plus whatever went wrong while building it
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuild {
    pub snapshot: LibrarySnapshot,
    pub issues: Vec<SyncIssue>,
}

/// Pages a user's items out of one catalog
///
/// Best effort throughout: an unknown user gives an empty snapshot and a failed
/// page ends that category with what was fetched so far. Both are reported as
/// issues instead of errors.
pub struct SnapshotBuilder<'a> {
    client: &'a dyn CatalogClient,
    side: String,
    page_size: usize,
    kinds: Vec<ItemKind>,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(client: &'a dyn CatalogClient, side: impl Into<String>) -> Self {
        Self {
            client,
            side: side.into(),
            page_size: media_sync_config::configured_page_size(),
            kinds: ItemKind::default_kinds(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<ItemKind>) -> Self {
        self.kinds = kinds;
        self
    }

    #[instrument(skip(self), fields(side = %self.side, server = self.client.server_url()))]
    pub async fn build(&self, username: &str) -> SnapshotBuild {
        let mut issues = Vec::new();

        let user_id = match self.client.resolve_user(username).await {
            Ok(Some(user_id)) => user_id,
            Ok(None) => {
                warn!(operation = "resolve_user", side = %self.side, "User {} not found, using an empty library", username);
                issues.push(SyncIssue::new(
                    IssueKind::UserResolution,
                    &self.side,
                    format!("user '{}' not found on {}", username, self.client.server_url()),
                ));
                return SnapshotBuild {
                    snapshot: LibrarySnapshot::empty(username),
                    issues,
                };
            }
            Err(e) => {
                warn!(operation = "resolve_user", side = %self.side, error = %e, "Failed to look up user {}", username);
                issues.push(SyncIssue::new(
                    IssueKind::UserResolution,
                    &self.side,
                    format!("failed to look up user '{}': {}", username, e),
                ));
                return SnapshotBuild {
                    snapshot: LibrarySnapshot::empty(username),
                    issues,
                };
            }
        };

        let mut items = Vec::new();
        let mut counts = Vec::new();
        for kind in &self.kinds {
            let category = self.fetch_category(&user_id, *kind, &mut issues).await;
            counts.push(format!("{} {}", category.len(), kind));
            items.extend(category);
        }

        info!(
            side = %self.side,
            "user {} has {}",
            username,
            counts.join(", ")
        );

        SnapshotBuild {
            snapshot: LibrarySnapshot::new(username, Some(user_id), items),
            issues,
        }
    }

    /// All items of one kind, paging until the catalog returns an empty page
    pub async fn fetch_category(&self, user_id: &str, kind: ItemKind, issues: &mut Vec<SyncIssue>) -> Vec<Item> {
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = match self.client.fetch_items_page(user_id, kind, offset, self.page_size).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        operation = "fetch_items",
                        side = %self.side,
                        kind = %kind,
                        offset,
                        error = %e,
                        "Fetching {} failed, keeping {} items fetched so far",
                        kind,
                        items.len()
                    );
                    issues.push(SyncIssue::new(
                        IssueKind::RemoteFetch,
                        &self.side,
                        format!("{} page at offset {} failed: {}", kind, offset, e),
                    ));
                    break;
                }
            };

            if page.is_empty() {
                break;
            }
            offset += page.len();
            debug!("{} += {} (offset {})", kind, page.len(), offset);
            items.extend(page.into_iter().map(Item::from));
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{raw, FakeCatalog};

    fn catalog_with_episodes(count: usize) -> FakeCatalog {
        let episodes = (0..count)
            .map(|i| raw(&format!("e{}", i), &format!("Episode {}", i), ItemKind::Episode, i % 2 == 0))
            .collect();
        FakeCatalog::new("http://a")
            .with_user("alice", "u-alice")
            .with_items(ItemKind::Episode, episodes)
            .with_items(ItemKind::Movie, vec![raw("m0", "Heat", ItemKind::Movie, true)])
    }

    #[tokio::test]
    async fn test_pages_until_empty_page() {
        let catalog = catalog_with_episodes(7);
        let build = SnapshotBuilder::new(&catalog, "A")
            .with_page_size(3)
            .build("alice")
            .await;

        assert!(build.issues.is_empty());
        assert_eq!(build.snapshot.user, "alice");
        assert_eq!(build.snapshot.user_id.as_deref(), Some("u-alice"));
        assert_eq!(build.snapshot.len(), 8);
        // Episodes first, in catalog order, then movies
        assert_eq!(build.snapshot.items[0].id, "e0");
        assert_eq!(build.snapshot.items[6].id, "e6");
        assert_eq!(build.snapshot.items[7].id, "m0");

        let requests = catalog.page_requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                (ItemKind::Episode, 0, 3),
                (ItemKind::Episode, 3, 3),
                (ItemKind::Episode, 6, 3),
                (ItemKind::Episode, 7, 3),
                (ItemKind::Movie, 0, 3),
                (ItemKind::Movie, 1, 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_page_error_keeps_partial_category() {
        let mut catalog = catalog_with_episodes(7);
        catalog.fail_page = Some((ItemKind::Episode, 3));

        let build = SnapshotBuilder::new(&catalog, "A")
            .with_page_size(3)
            .build("alice")
            .await;

        let ids: Vec<&str> = build.snapshot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["e0", "e1", "e2", "m0"]);
        assert_eq!(build.issues.len(), 1);
        assert_eq!(build.issues[0].kind, IssueKind::RemoteFetch);
        assert_eq!(build.issues[0].side, "A");
    }

    #[tokio::test]
    async fn test_unknown_user_gives_empty_snapshot() {
        let catalog = catalog_with_episodes(2);
        let build = SnapshotBuilder::new(&catalog, "B").build("mallory").await;

        assert!(build.snapshot.is_empty());
        assert!(build.snapshot.user_id.is_none());
        assert_eq!(build.issues[0].kind, IssueKind::UserResolution);
        assert!(catalog.page_requests.lock().unwrap().is_empty());

        let mut failing = catalog_with_episodes(2);
        failing.fail_user_lookup = true;
        let build = SnapshotBuilder::new(&failing, "B").build("alice").await;
        assert!(build.snapshot.is_empty());
        assert_eq!(build.issues[0].kind, IssueKind::UserResolution);
    }

    #[tokio::test]
    async fn test_only_configured_kinds_are_fetched() {
        let catalog = catalog_with_episodes(2);
        let build = SnapshotBuilder::new(&catalog, "A")
            .with_kinds(vec![ItemKind::Movie])
            .build("alice")
            .await;

        assert_eq!(build.snapshot.len(), 1);
        assert_eq!(build.snapshot.items[0].item_type, "Movie");
    }
}
