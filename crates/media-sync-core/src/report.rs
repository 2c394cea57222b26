use media_sync_models::WriteOutcome;
use serde::Serialize;
use std::fmt;

/// What went wrong, without stopping the run
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Login failed; the side is treated as an empty library
    Login,
    /// The library user does not exist or could not be looked up
    UserResolution,
    /// A page request failed; the category was kept partial
    RemoteFetch,
    /// A push to the destination catalog failed
    RemoteWrite,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncIssue {
    pub kind: IssueKind,
    pub side: String,
    pub detail: String,
}

impl SyncIssue {
    pub fn new(kind: IssueKind, side: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            side: side.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.kind, self.side, self.detail)
    }
}

/// Writes issued for one matched pair
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PairOutcome {
    pub source_id: String,
    pub destination_id: String,
    pub name: String,
    pub writes: Vec<WriteOutcome>,
}

/// Counters for one direction (e.g. "A -> B")
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DirectionReport {
    pub label: String,
    /// Interesting source items considered
    pub scanned: usize,
    pub matched: usize,
    pub writes_applied: usize,
    pub writes_failed: usize,
    /// Only pairs that needed at least one write
    pub pairs: Vec<PairOutcome>,
}

impl DirectionReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SyncReport {
    /// Matched pairs over both directions, changed or not
    pub matched_items: usize,
    pub directions: Vec<DirectionReport>,
    pub issues: Vec<SyncIssue>,
}

impl SyncReport {
    pub fn writes_applied(&self) -> usize {
        self.directions.iter().map(|d| d.writes_applied).sum()
    }

    pub fn writes_failed(&self) -> usize {
        self.directions.iter().map(|d| d.writes_failed).sum()
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &SyncIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }
}
