use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every candidate identifier (`DS07`).
pub const CANDIDATE_ID_PREFIX: &str = "DS";

/// Identifier wrapper for candidate records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    /// Numeric suffix after the `DS` prefix, if the id follows the scheme.
    pub fn sequence(&self) -> Option<u32> {
        self.0
            .trim()
            .strip_prefix(CANDIDATE_ID_PREFIX)
            .and_then(|digits| digits.parse::<u32>().ok())
    }

    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("{CANDIDATE_ID_PREFIX}{sequence:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One applicant exactly as read from a record source.
///
/// Every field stays textual; numeric interpretation happens in the normalizer so
/// that malformed values degrade instead of rejecting the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub given_names: String,
    pub paternal_surname: String,
    pub years_experience: String,
    pub degree_title: String,
    pub certifications: [String; 2],
    pub python_pct: String,
    pub r_pct: String,
    pub sql_pct: String,
    pub stats_pct: String,
    pub monthly_salary: String,
    pub availability: String,
    pub language_levels: [String; 2],
    pub protected: ProtectedAttributes,
}

impl CandidateRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_names.trim(), self.paternal_surname.trim())
            .trim()
            .to_string()
    }
}

/// Demographic attributes that must never influence the score, only the audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedAttributes {
    pub age: String,
    pub gender: String,
    pub religion: String,
    pub political_affiliation: String,
    pub socioeconomic_tier: String,
    pub ethnicity: String,
}

impl ProtectedAttributes {
    pub fn value(&self, attribute: ProtectedAttribute) -> &str {
        match attribute {
            ProtectedAttribute::Age => &self.age,
            ProtectedAttribute::Gender => &self.gender,
            ProtectedAttribute::Religion => &self.religion,
            ProtectedAttribute::PoliticalAffiliation => &self.political_affiliation,
            ProtectedAttribute::SocioeconomicTier => &self.socioeconomic_tier,
            ProtectedAttribute::Ethnicity => &self.ethnicity,
        }
    }
}

/// Protected attribute audited for top-N skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedAttribute {
    Age,
    Gender,
    Religion,
    PoliticalAffiliation,
    SocioeconomicTier,
    Ethnicity,
}

impl ProtectedAttribute {
    pub const fn ordered() -> [ProtectedAttribute; 6] {
        [
            ProtectedAttribute::Age,
            ProtectedAttribute::Gender,
            ProtectedAttribute::Religion,
            ProtectedAttribute::PoliticalAffiliation,
            ProtectedAttribute::SocioeconomicTier,
            ProtectedAttribute::Ethnicity,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProtectedAttribute::Age => "age",
            ProtectedAttribute::Gender => "gender",
            ProtectedAttribute::Religion => "religion",
            ProtectedAttribute::PoliticalAffiliation => "political_affiliation",
            ProtectedAttribute::SocioeconomicTier => "socioeconomic_tier",
            ProtectedAttribute::Ethnicity => "ethnicity",
        }
    }

    /// Column carrying the attribute in the record schema.
    pub const fn column(self) -> &'static str {
        match self {
            ProtectedAttribute::Age => "Edad",
            ProtectedAttribute::Gender => "Género",
            ProtectedAttribute::Religion => "Religión_ficticia",
            ProtectedAttribute::PoliticalAffiliation => "Afiliación_política_ficticia",
            ProtectedAttribute::SocioeconomicTier => "Nivel_Socio_Económico(NSE_AMAI)",
            ProtectedAttribute::Ethnicity => "Etnia_(Autodefinición)",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|attribute| attribute.column() == column.trim())
    }
}

impl fmt::Display for ProtectedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
