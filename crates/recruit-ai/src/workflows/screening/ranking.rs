use serde::Serialize;

use super::domain::CandidateId;
use super::evaluation::ScoredCandidate;

/// Scored pool in ranking order.
///
/// Sorting is stable, so candidates with equal final scores keep their merge order.
#[derive(Debug, Clone)]
pub struct RankedPool {
    ranked: Vec<ScoredCandidate>,
    /// `merge_positions[i]` is the merge-order index of `ranked[i]`.
    merge_positions: Vec<usize>,
}

/// Where a queried candidate landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateStanding {
    pub is_best: bool,
    pub score: f64,
    /// 1-based; `0` only in the not-found standing.
    pub rank: usize,
}

impl CandidateStanding {
    /// Placeholder reported when the queried id is not in the pool.
    pub const NOT_FOUND: CandidateStanding = CandidateStanding {
        is_best: false,
        score: 0.0,
        rank: 0,
    };

    pub fn is_found(&self) -> bool {
        self.rank > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("candidate {0} is not in the pool")]
pub struct CandidateNotFound(pub CandidateId);

impl RankedPool {
    pub fn rank(scored: Vec<ScoredCandidate>) -> Self {
        let mut indexed: Vec<(usize, ScoredCandidate)> = scored.into_iter().enumerate().collect();
        indexed.sort_by(|(_, a), (_, b)| b.final_score().total_cmp(&a.final_score()));

        let (merge_positions, ranked) = indexed.into_iter().unzip();
        Self {
            ranked,
            merge_positions,
        }
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn ranked(&self) -> &[ScoredCandidate] {
        &self.ranked
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.ranked.first()
    }

    /// Highest-ranked `n` candidates (all of them if the pool is smaller).
    pub fn top(&self, n: usize) -> &[ScoredCandidate] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// Standing of the first candidate in merge order carrying `id`.
    pub fn standing(&self, id: &CandidateId) -> Result<CandidateStanding, CandidateNotFound> {
        let position = self
            .ranked
            .iter()
            .zip(&self.merge_positions)
            .enumerate()
            .filter(|(_, (candidate, _))| candidate.record.id == *id)
            .min_by_key(|(_, (_, merge_position))| **merge_position)
            .map(|(position, _)| position)
            .ok_or_else(|| CandidateNotFound(id.clone()))?;

        let candidate = &self.ranked[position];
        let is_best = self
            .best()
            .map(|best| best.record.id == candidate.record.id)
            .unwrap_or(false);

        Ok(CandidateStanding {
            is_best,
            score: candidate.final_score(),
            rank: position + 1,
        })
    }
}
