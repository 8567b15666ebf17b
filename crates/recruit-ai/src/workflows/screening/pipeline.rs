use serde::Serialize;
use tracing::{info, warn};

use super::audit::{BiasAuditor, BiasSummary};
use super::domain::CandidateId;
use super::evaluation::{ScoringEngine, ScoringWeights};
use super::ranking::{CandidateStanding, RankedPool};
use super::sources::{
    self, CandidatePool, CandidateStore, DataUnavailable, RecordFetcher, RemoteCandidateSource,
    SourceReport,
};

/// Highest-scoring candidate of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestCandidate {
    pub id: CandidateId,
    pub display_name: String,
    pub score: f64,
}

/// Everything one analysis run returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub best_candidate: BestCandidate,
    pub bias_summary: BiasSummary,
    pub current_candidate: CandidateStanding,
    pub sources: SourceReport,
}

/// Scoring, ranking and audit over an already merged pool.
#[derive(Debug, Clone, Default)]
pub struct ScreeningPipeline {
    engine: ScoringEngine,
    auditor: BiasAuditor,
}

impl ScreeningPipeline {
    pub fn new(weights: ScoringWeights, top_n: usize) -> Self {
        Self {
            engine: ScoringEngine::new(weights),
            auditor: BiasAuditor::new(top_n),
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self::new(ScoringWeights::STANDARD, top_n)
    }

    pub fn top_n(&self) -> usize {
        self.auditor.top_n()
    }

    pub fn analyze(
        &self,
        pool: CandidatePool,
        query: Option<&CandidateId>,
    ) -> Result<ResultBundle, DataUnavailable> {
        let CandidatePool {
            candidates,
            protected_columns,
            report,
        } = pool;

        let scored = self.engine.score_pool(candidates);
        let faults: usize = scored.iter().map(|candidate| candidate.features.faults.len()).sum();
        let ranked = RankedPool::rank(scored);

        let Some(best) = ranked.best() else {
            return Err(DataUnavailable { report });
        };
        let best_candidate = BestCandidate {
            id: best.record.id.clone(),
            display_name: best.record.display_name(),
            score: best.final_score(),
        };

        let bias_summary = self.auditor.audit(&ranked, &protected_columns);

        let current_candidate = match query {
            Some(id) => ranked.standing(id).unwrap_or_else(|err| {
                warn!(error = %err, "queried candidate missing from pool");
                CandidateStanding::NOT_FOUND
            }),
            None => CandidateStanding::NOT_FOUND,
        };

        info!(
            candidates = ranked.len(),
            coerced_fields = faults,
            best = %best_candidate.id,
            top_n = self.auditor.top_n(),
            "screening analysis complete"
        );

        Ok(ResultBundle {
            best_candidate,
            bias_summary,
            current_candidate,
            sources: report,
        })
    }
}

/// Merge both sources and analyze the result for `query`.
pub fn run_analysis<F, S>(
    pipeline: &ScreeningPipeline,
    remote: Option<&RemoteCandidateSource<F>>,
    local: &S,
    query: Option<&CandidateId>,
) -> Result<ResultBundle, DataUnavailable>
where
    F: RecordFetcher,
    S: CandidateStore + ?Sized,
{
    let pool = sources::merge_sources(remote, local)?;
    pipeline.analyze(pool, query)
}
