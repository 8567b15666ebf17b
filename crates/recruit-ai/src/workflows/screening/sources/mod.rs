//! Record sources and the merger combining them into one candidate pool.
//!
//! The remote source is always read first and local records are appended after
//! it, so remote candidates win score ties downstream.

mod local;
pub(crate) mod parser;
mod remote;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CandidateRecord, ProtectedAttribute};

pub use local::{CandidateStore, CsvCandidateStore, StoreError};
pub use parser::{CandidateRow, CANDIDATE_COLUMNS};
pub use remote::{FetchError, HttpFetcher, RecordFetcher, RemoteCandidateSource};

/// Records read from one source plus the protected columns its header carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub candidates: Vec<CandidateRecord>,
    pub protected_columns: BTreeSet<ProtectedAttribute>,
}

/// Outcome of loading a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { records: usize },
    Unavailable { reason: String },
    Disabled,
}

/// Per-source outcome returned alongside every analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub remote: SourceStatus,
    pub local: SourceStatus,
}

impl SourceReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.remote, SourceStatus::Unavailable { .. })
            || matches!(self.local, SourceStatus::Unavailable { .. })
    }
}

/// A loaded source: never an error, failures are folded into the status.
#[derive(Debug, Clone)]
pub struct SourceLoad {
    pub batch: SourceBatch,
    pub status: SourceStatus,
}

impl SourceLoad {
    pub(crate) fn loaded(batch: SourceBatch) -> Self {
        let status = SourceStatus::Loaded {
            records: batch.candidates.len(),
        };
        Self { batch, status }
    }

    fn unavailable(reason: String) -> Self {
        Self {
            batch: SourceBatch::default(),
            status: SourceStatus::Unavailable { reason },
        }
    }

    fn disabled() -> Self {
        Self {
            batch: SourceBatch::default(),
            status: SourceStatus::Disabled,
        }
    }
}

/// Merged candidates in tie-break order.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    pub candidates: Vec<CandidateRecord>,
    pub protected_columns: BTreeSet<ProtectedAttribute>,
    pub report: SourceReport,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Raised when neither source produced a single record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no candidate records available from the remote or local source")]
pub struct DataUnavailable {
    pub report: SourceReport,
}

pub fn load_remote<F: RecordFetcher>(source: Option<&RemoteCandidateSource<F>>) -> SourceLoad {
    let Some(source) = source else {
        return SourceLoad::disabled();
    };

    match source.load() {
        Ok(batch) => SourceLoad::loaded(batch),
        Err(err) => {
            warn!(error = %err, "remote candidate source unavailable, continuing without it");
            SourceLoad::unavailable(err.to_string())
        }
    }
}

pub fn load_local<S: CandidateStore + ?Sized>(store: &S) -> SourceLoad {
    match store.load() {
        Ok(batch) => SourceLoad::loaded(batch),
        Err(err) => {
            warn!(error = %err, "local candidate store unreadable, continuing without it");
            SourceLoad::unavailable(err.to_string())
        }
    }
}

/// Concatenate remote then local records. No deduplication by id.
pub fn merge(remote: SourceLoad, local: SourceLoad) -> Result<CandidatePool, DataUnavailable> {
    let report = SourceReport {
        remote: remote.status,
        local: local.status,
    };

    let mut candidates = remote.batch.candidates;
    candidates.extend(local.batch.candidates);

    if candidates.is_empty() {
        return Err(DataUnavailable { report });
    }

    let mut protected_columns = remote.batch.protected_columns;
    protected_columns.extend(local.batch.protected_columns);

    info!(
        candidates = candidates.len(),
        degraded = report.is_degraded(),
        "merged candidate pool"
    );

    Ok(CandidatePool {
        candidates,
        protected_columns,
        report,
    })
}

/// Load both sources and merge them.
pub fn merge_sources<F, S>(
    remote: Option<&RemoteCandidateSource<F>>,
    local: &S,
) -> Result<CandidatePool, DataUnavailable>
where
    F: RecordFetcher,
    S: CandidateStore + ?Sized,
{
    let remote = load_remote(remote);
    let local = load_local(local);
    merge(remote, local)
}
