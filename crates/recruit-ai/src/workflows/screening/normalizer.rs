use serde::Serialize;
use tracing::debug;

use super::domain::CandidateRecord;

/// Sentinel reported for availability labels outside the ordinal table.
pub const UNMAPPED_AVAILABILITY: i16 = -1;

const AVAILABILITY_TABLE: &[(&str, u8)] = &[
    ("6 meses", 0),
    ("1 mes", 20),
    ("4 semanas", 40),
    ("3 semanas", 60),
    ("2 semanas", 80),
    ("Inmediata", 100),
];

/// A field whose raw text could not be read as the expected type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("field `{field}` could not be parsed from {raw:?}")]
pub struct ParseError {
    pub field: &'static str,
    pub raw: String,
}

/// Numeric view of a candidate, with every coercion recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFeatures {
    pub years_experience: f64,
    pub python_pct: f64,
    pub sql_pct: f64,
    pub stats_pct: f64,
    pub r_pct: f64,
    pub monthly_salary: f64,
    /// Ordinal availability; `None` when the label is not in the table.
    pub availability: Option<u8>,
    pub faults: Vec<ParseError>,
}

impl CandidateFeatures {
    pub fn availability_code(&self) -> i16 {
        self.availability
            .map(i16::from)
            .unwrap_or(UNMAPPED_AVAILABILITY)
    }
}

pub fn normalize(record: &CandidateRecord) -> CandidateFeatures {
    let mut faults = Vec::new();
    let mut number = |field: &'static str, raw: &str| match parse_number(field, raw) {
        Ok(value) => value,
        Err(fault) => {
            faults.push(fault);
            0.0
        }
    };

    let years_experience = number("years_experience", &record.years_experience).max(0.0);
    let python_pct = number("python_pct", &record.python_pct);
    let sql_pct = number("sql_pct", &record.sql_pct);
    let stats_pct = number("stats_pct", &record.stats_pct);
    let r_pct = number("r_pct", &record.r_pct);
    let monthly_salary = number("monthly_salary", &record.monthly_salary);

    let availability = availability_rank(&record.availability);

    if !faults.is_empty() {
        debug!(candidate = %record.id, faults = faults.len(), "coerced malformed fields to zero");
    }

    CandidateFeatures {
        years_experience,
        python_pct,
        sql_pct,
        stats_pct,
        r_pct,
        monthly_salary,
        availability,
        faults,
    }
}

/// Ordinal rank for an availability label, compared after trimming.
pub fn availability_rank(label: &str) -> Option<u8> {
    let label = label.trim();
    AVAILABILITY_TABLE
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, rank)| *rank)
}

/// Empty, non-numeric and non-finite values are faults.
fn parse_number(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError {
            field,
            raw: raw.to_string(),
        })
}
