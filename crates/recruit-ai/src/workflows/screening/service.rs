use std::sync::{Arc, PoisonError, RwLock};

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::CandidateId;
use super::intake::{
    next_candidate_id, ArchiveError, ArchivedSubmission, CandidateSubmission, IntakeError,
    SubmissionArchive,
};
use super::pipeline::{ResultBundle, ScreeningPipeline};
use super::sources::{
    self, CandidateStore, DataUnavailable, RecordFetcher, RemoteCandidateSource, SourceLoad,
    StoreError,
};

/// Service composing the record sources, the intake archive and the pipeline.
///
/// Submissions hold the dataset lock exclusively from id allocation until the
/// re-analysis finishes; analyses share it, so they never observe a half-written
/// local store.
pub struct ScreeningService<S, F, A> {
    store: Arc<S>,
    remote: Option<RemoteCandidateSource<F>>,
    archive: Arc<A>,
    pipeline: ScreeningPipeline,
    dataset_lock: RwLock<()>,
}

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub status: &'static str,
    pub id: CandidateId,
    pub is_best: bool,
    pub results: ResultBundle,
}

impl<S, F, A> ScreeningService<S, F, A>
where
    S: CandidateStore + 'static,
    F: RecordFetcher + 'static,
    A: SubmissionArchive + 'static,
{
    pub fn new(
        store: Arc<S>,
        remote: Option<RemoteCandidateSource<F>>,
        archive: Arc<A>,
        pipeline: ScreeningPipeline,
    ) -> Self {
        Self {
            store,
            remote,
            archive,
            pipeline,
            dataset_lock: RwLock::new(()),
        }
    }

    pub fn pipeline(&self) -> &ScreeningPipeline {
        &self.pipeline
    }

    /// Merge both sources and analyze them for `query`.
    pub fn analyze(
        &self,
        query: Option<&CandidateId>,
    ) -> Result<ResultBundle, ScreeningServiceError> {
        let _shared = self
            .dataset_lock
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let pool = sources::merge_sources(self.remote.as_ref(), self.store.as_ref())?;
        Ok(self.pipeline.analyze(pool, query)?)
    }

    /// Id the next submission would receive. Fails when the local store cannot
    /// be read.
    pub fn next_id(&self) -> Result<CandidateId, ScreeningServiceError> {
        let _shared = self
            .dataset_lock
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let (remote, local) = self.load_for_allocation()?;
        Ok(allocate(&remote, &local))
    }

    /// Allocate an id, persist the candidate, archive the raw form and re-run
    /// the analysis for the new id.
    ///
    /// The row is appended before the archive entry is written. An archive
    /// failure is reported as an error but leaves the appended row in place.
    pub fn submit(
        &self,
        submission: CandidateSubmission,
    ) -> Result<SubmissionReceipt, ScreeningServiceError> {
        let _exclusive = self
            .dataset_lock
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let (remote, local) = self.load_for_allocation()?;
        let id = allocate(&remote, &local);

        let row = submission.to_row(&id)?;
        self.store.append(&row)?;
        self.archive.record(&ArchivedSubmission {
            id: id.clone(),
            submitted_at: Utc::now(),
            submission,
        })?;

        // The remote snapshot is reused; only the local store changed.
        let local = sources::load_local(self.store.as_ref());
        let pool = sources::merge(remote, local)?;
        let results = self.pipeline.analyze(pool, Some(&id))?;

        info!(
            candidate = %id,
            rank = results.current_candidate.rank,
            is_best = results.current_candidate.is_best,
            "candidate submitted"
        );

        Ok(SubmissionReceipt {
            status: "success",
            is_best: results.current_candidate.is_best,
            id,
            results,
        })
    }
}

impl<S, F, A> ScreeningService<S, F, A>
where
    S: CandidateStore,
    F: RecordFetcher,
{
    /// Both sources for id allocation. An unreachable remote is tolerated, an
    /// unreadable local store is not.
    fn load_for_allocation(&self) -> Result<(SourceLoad, SourceLoad), StoreError> {
        let remote = sources::load_remote(self.remote.as_ref());
        let local = SourceLoad::loaded(self.store.load()?);
        Ok((remote, local))
    }
}

fn allocate(remote: &SourceLoad, local: &SourceLoad) -> CandidateId {
    next_candidate_id(
        remote
            .batch
            .candidates
            .iter()
            .chain(&local.batch.candidates)
            .map(|candidate| &candidate.id),
    )
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    DataUnavailable(#[from] DataUnavailable),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl ScreeningServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScreeningServiceError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScreeningServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScreeningServiceError::Store(_) | ScreeningServiceError::Archive(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
