use crate::error::SyncError;
use crate::filter::interesting_items;
use crate::matching::find_match;
use crate::reconcile::reconcile;
use crate::report::{DirectionReport, IssueKind, PairOutcome, SyncIssue, SyncReport};
use crate::snapshot::SnapshotBuilder;
use media_sync_config::{ServerConfig, SessionStamp, SyncOptions};
use media_sync_models::{LibrarySnapshot, WriteStatus};
use media_sync_sources::{CatalogClient, CatalogWriter, JellyfinClient, UserWriter};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

pub const SIDE_A: &str = "A";
pub const SIDE_B: &str = "B";

/// Two-way watch-state sync between two catalog accounts
///
/// Both directions work on the snapshots taken at the start of the run; nothing
/// is re-fetched between direction A -> B and B -> A.
pub struct SyncOrchestrator {
    options: SyncOptions,
    session: SessionStamp,
}

pub struct SyncResult {
    pub report: SyncReport,
    pub duration: Duration,
    pub session: SessionStamp,
}

impl SyncResult {
    pub fn matched_items(&self) -> usize {
        self.report.matched_items
    }
}

impl SyncOrchestrator {
    pub fn new(options: SyncOptions, session: SessionStamp) -> Self {
        Self { options, session }
    }

    pub fn session(&self) -> &SessionStamp {
        &self.session
    }

    /// Run A -> B, then B -> A, and return the combined report
    pub async fn sync(
        &self,
        snapshot_a: &LibrarySnapshot,
        snapshot_b: &LibrarySnapshot,
        writer_a: &dyn CatalogWriter,
        writer_b: &dyn CatalogWriter,
    ) -> SyncReport {
        info!("found {} items in library A ({})", snapshot_a.len(), snapshot_a.user);
        info!("found {} items in library B ({})", snapshot_b.len(), snapshot_b.user);

        let mut report = SyncReport::default();

        info!("Syncing ->");
        let forward = Self::sync_direction("A -> B", snapshot_a, snapshot_b, writer_b, &mut report.issues).await;
        info!("Syncing <-");
        let backward = Self::sync_direction("B -> A", snapshot_b, snapshot_a, writer_a, &mut report.issues).await;

        report.matched_items = forward.matched + backward.matched;
        report.directions = vec![forward, backward];

        info!(
            operation = "sync_complete",
            matched = report.matched_items,
            writes_applied = report.writes_applied(),
            writes_failed = report.writes_failed(),
            "matched {} items",
            report.matched_items
        );
        report
    }

    async fn sync_direction(
        label: &str,
        source: &LibrarySnapshot,
        destination: &LibrarySnapshot,
        writer: &dyn CatalogWriter,
        issues: &mut Vec<SyncIssue>,
    ) -> DirectionReport {
        let mut direction = DirectionReport::new(label);

        for item in interesting_items(source) {
            direction.scanned += 1;

            let Some(target) = find_match(item, &destination.items) else {
                trace!("{}: no match for {} ({})", label, item.name, item.id);
                continue;
            };
            direction.matched += 1;
            debug!("{}: {} ({}) matched {}", label, item.name, item.id, target.id);

            let writes = reconcile(item, target, writer).await;
            if writes.is_empty() {
                continue;
            }

            for outcome in &writes {
                match &outcome.status {
                    WriteStatus::Applied => direction.writes_applied += 1,
                    WriteStatus::Failed { reason } => {
                        direction.writes_failed += 1;
                        issues.push(SyncIssue::new(
                            IssueKind::RemoteWrite,
                            label,
                            format!("{} for '{}' failed: {}", outcome.write, item.name, reason),
                        ));
                    }
                }
            }

            direction.pairs.push(PairOutcome {
                source_id: item.id.clone(),
                destination_id: target.id.clone(),
                name: item.name.clone(),
                writes,
            });
        }

        direction
    }

    /// Full run against two Jellyfin servers
    ///
    /// Missing credentials or an unusable server URL fail before any request is
    /// sent. Everything after that is best effort and ends up in the report.
    pub async fn run(&self, library_a: &ServerConfig, library_b: &ServerConfig) -> Result<SyncResult, SyncError> {
        library_a.validate("library_a")?;
        library_b.validate("library_b")?;

        let mut client_a = JellyfinClient::from_server_config(library_a).map_err(|source| SyncError::InvalidServer {
            side: "library_a".to_string(),
            source,
        })?;
        let mut client_b = JellyfinClient::from_server_config(library_b).map_err(|source| SyncError::InvalidServer {
            side: "library_b".to_string(),
            source,
        })?;

        Ok(self
            .run_with_clients(
                &mut client_a,
                library_a.effective_username(),
                &mut client_b,
                library_b.effective_username(),
            )
            .await)
    }

    /// Log in, snapshot both libraries, sync, log out
    #[instrument(skip_all, fields(session = %self.session))]
    pub async fn run_with_clients(
        &self,
        client_a: &mut dyn CatalogClient,
        username_a: &str,
        client_b: &mut dyn CatalogClient,
        username_b: &str,
    ) -> SyncResult {
        let start = Instant::now();
        info!("started new session at {}", self.session);
        info!("Syncing [{}] and [{}]", client_a.server_url(), client_b.server_url());

        let mut issues = Vec::new();
        let snapshot_a = self.open_side(SIDE_A, client_a, username_a, &mut issues).await;
        let snapshot_b = self.open_side(SIDE_B, client_b, username_b, &mut issues).await;

        let mut report = {
            let writer_a = UserWriter::new(&*client_a, snapshot_a.user_id.clone().unwrap_or_default());
            let writer_b = UserWriter::new(&*client_b, snapshot_b.user_id.clone().unwrap_or_default());
            self.sync(&snapshot_a, &snapshot_b, &writer_a, &writer_b).await
        };

        Self::close_side(SIDE_A, client_a).await;
        Self::close_side(SIDE_B, client_b).await;

        issues.append(&mut report.issues);
        report.issues = issues;

        let duration = start.elapsed();
        info!("total runtime: {:?}", duration);
        SyncResult {
            report,
            duration,
            session: self.session.clone(),
        }
    }

    async fn close_side(side: &str, client: &mut dyn CatalogClient) {
        if !client.is_authenticated() {
            return;
        }
        if let Err(e) = client.logout().await {
            warn!(operation = "logout", side, error = %e, "Failed to log out of {}", client.server_url());
        }
    }

    async fn open_side(
        &self,
        side: &str,
        client: &mut dyn CatalogClient,
        username: &str,
        issues: &mut Vec<SyncIssue>,
    ) -> LibrarySnapshot {
        if let Err(e) = client.login().await {
            warn!(operation = "login", side, error = %e, "Failed to log in to {}", client.server_url());
            issues.push(SyncIssue::new(
                IssueKind::Login,
                side,
                format!("login to {} failed: {}", client.server_url(), e),
            ));
            return LibrarySnapshot::empty(username);
        }

        let build = SnapshotBuilder::new(&*client, side)
            .with_page_size(self.options.page_size)
            .with_kinds(self.options.item_types.clone())
            .build(username)
            .await;
        issues.extend(build.issues);
        build.snapshot
    }
}
