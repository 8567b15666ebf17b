use serde::{Deserialize, Serialize};

/// Weights of the linear base score. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub python: f64,
    pub sql: f64,
    pub statistics: f64,
    pub r: f64,
    pub degree: f64,
    pub certifications: f64,
    pub languages: f64,
}

impl ScoringWeights {
    pub const STANDARD: ScoringWeights = ScoringWeights {
        python: 0.25,
        sql: 0.20,
        statistics: 0.15,
        r: 0.05,
        degree: 0.15,
        certifications: 0.10,
        languages: 0.10,
    };

    pub fn sum(&self) -> f64 {
        self.python
            + self.sql
            + self.statistics
            + self.r
            + self.degree
            + self.certifications
            + self.languages
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Slope of the logarithmic experience boost.
pub const EXPERIENCE_BOOST: f64 = 0.05;
