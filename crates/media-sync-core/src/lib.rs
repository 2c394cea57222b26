pub mod error;
pub mod filter;
pub mod matching;
pub mod reconcile;
pub mod report;
pub mod snapshot;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SyncError;
pub use filter::{interesting_items, is_interesting};
pub use matching::find_match;
pub use reconcile::{plan_writes, reconcile};
pub use report::{DirectionReport, IssueKind, PairOutcome, SyncIssue, SyncReport};
pub use snapshot::{SnapshotBuild, SnapshotBuilder};
pub use sync::{SyncOrchestrator, SyncResult};
