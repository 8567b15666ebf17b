mod config;
pub mod rules;

pub use config::{ScoringWeights, EXPERIENCE_BOOST};

use serde::Serialize;

use super::domain::CandidateRecord;
use super::normalizer::{self, CandidateFeatures};

/// Stateless scorer applying the weights to every candidate of a pool.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, record: CandidateRecord) -> ScoredCandidate {
        let features = normalizer::normalize(&record);
        let breakdown = self.breakdown(&record, &features);
        ScoredCandidate {
            record,
            features,
            breakdown,
        }
    }

    /// Score a pool, preserving merge order.
    pub fn score_pool(&self, records: Vec<CandidateRecord>) -> Vec<ScoredCandidate> {
        records
            .into_iter()
            .map(|record| self.score(record))
            .collect()
    }

    /// Percentages are used as-is; out-of-range inputs are not clamped.
    pub fn breakdown(&self, record: &CandidateRecord, features: &CandidateFeatures) -> ScoreBreakdown {
        let degree = rules::degree_score(&record.degree_title);
        let certification = rules::certification_score(&record.certifications);
        let language = rules::language_score(&record.language_levels);

        let w = &self.weights;
        let base = features.python_pct * w.python
            + features.sql_pct * w.sql
            + features.stats_pct * w.statistics
            + features.r_pct * w.r
            + degree * w.degree
            + certification * w.certifications
            + language * w.languages;

        let multiplier = experience_multiplier(features.years_experience);

        ScoreBreakdown {
            degree,
            certification,
            language,
            base,
            experience_multiplier: multiplier,
            final_score: base * multiplier,
        }
    }
}

/// `1 + 0.05 * ln(1 + years)`; exactly 1.0 at zero years.
pub fn experience_multiplier(years_experience: f64) -> f64 {
    1.0 + EXPERIENCE_BOOST * years_experience.max(0.0).ln_1p()
}

/// Transparent score trail for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub degree: f64,
    pub certification: f64,
    pub language: f64,
    pub base: f64,
    pub experience_multiplier: f64,
    pub final_score: f64,
}

/// Candidate with its features and final score attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: CandidateRecord,
    pub features: CandidateFeatures,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn final_score(&self) -> f64 {
        self.breakdown.final_score
    }
}
