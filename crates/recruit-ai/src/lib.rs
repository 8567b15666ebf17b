//! Candidate screening: merges applicant pools, scores and ranks candidates,
//! and audits the top of the ranking for demographic skew.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
