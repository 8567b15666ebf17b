//! Candidate screening workflow: merge record sources, score and rank the pool,
//! and audit the top of the ranking for skew on protected attributes.

pub mod audit;
pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod normalizer;
pub mod pipeline;
pub mod ranking;
pub mod router;
pub mod service;
pub mod sources;

#[cfg(test)]
mod tests;

pub use audit::{BiasAuditor, BiasSummary, CategoryShare};
pub use domain::{CandidateId, CandidateRecord, ProtectedAttribute, ProtectedAttributes};
pub use evaluation::{ScoreBreakdown, ScoredCandidate, ScoringEngine, ScoringWeights};
pub use intake::{
    next_candidate_id, CandidateSubmission, FileSubmissionArchive, SubmissionArchive,
    SubstitutionCipher,
};
pub use pipeline::{run_analysis, BestCandidate, ResultBundle, ScreeningPipeline};
pub use ranking::{CandidateNotFound, CandidateStanding, RankedPool};
pub use router::screening_router;
pub use service::{ScreeningService, ScreeningServiceError, SubmissionReceipt};
pub use sources::{
    CandidatePool, CandidateStore, CsvCandidateStore, DataUnavailable, FetchError, HttpFetcher,
    RecordFetcher, RemoteCandidateSource, SourceReport, SourceStatus,
};
