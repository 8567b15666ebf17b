//! Top-N representation audit over protected attributes.
//!
//! The audit is descriptive only: it reports how each category's share among the
//! top-ranked candidates differs from its share of the whole pool. No significance
//! test is run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::domain::ProtectedAttribute;
use super::evaluation::ScoredCandidate;
use super::ranking::RankedPool;

/// One category of a protected attribute in the audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub population_pct: f64,
    pub top_pct: f64,
    /// `top_pct - population_pct`; positive means over-represented at the top.
    pub difference: f64,
}

pub type BiasSummary = BTreeMap<ProtectedAttribute, Vec<CategoryShare>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasAuditor {
    top_n: usize,
}

impl Default for BiasAuditor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_AUDIT_TOP_N)
    }
}

impl BiasAuditor {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn audit(
        &self,
        pool: &RankedPool,
        attributes: &BTreeSet<ProtectedAttribute>,
    ) -> BiasSummary {
        let top = pool.top(self.top_n);

        attributes
            .iter()
            .map(|attribute| {
                let population = distribution(pool.ranked(), *attribute);
                let selected = distribution(top, *attribute);
                (*attribute, compare(&population, &selected))
            })
            .collect()
    }
}

/// Percentage of each non-empty category value, rounded to 2 decimals.
fn distribution(candidates: &[ScoredCandidate], attribute: ProtectedAttribute) -> HashMap<String, f64> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for candidate in candidates {
        let value = candidate.record.protected.value(attribute).trim();
        if value.is_empty() {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
        total += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| {
            let pct = round2(count as f64 * 100.0 / total as f64);
            (category, pct)
        })
        .collect()
}

fn compare(population: &HashMap<String, f64>, selected: &HashMap<String, f64>) -> Vec<CategoryShare> {
    let categories: BTreeSet<&String> = population.keys().chain(selected.keys()).collect();

    let mut shares: Vec<CategoryShare> = categories
        .into_iter()
        .map(|category| {
            let population_pct = population.get(category).copied().unwrap_or(0.0);
            let top_pct = selected.get(category).copied().unwrap_or(0.0);
            CategoryShare {
                category: category.clone(),
                population_pct,
                top_pct,
                difference: top_pct - population_pct,
            }
        })
        .collect();

    // Categories arrive sorted by name; the stable sort keeps that order on ties.
    shares.sort_by(|a, b| b.population_pct.total_cmp(&a.population_pct));
    shares
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
