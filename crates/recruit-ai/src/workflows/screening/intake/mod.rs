//! Intake of new candidates submitted through the web form.
//!
//! Wire keys follow the form's Spanish field names; numeric inputs may arrive as
//! JSON numbers or as the strings an HTML input produces.

mod archive;
mod cipher;
mod ids;

pub use archive::{ArchiveError, ArchivedSubmission, FileSubmissionArchive, SubmissionArchive};
pub use cipher::SubstitutionCipher;
pub use ids::next_candidate_id;

use serde::{Deserialize, Serialize};

use super::domain::CandidateId;
use super::sources::CandidateRow;

// Defaults the form does not collect.
const DEFAULT_NEIGHBOURHOOD: &str = "Online";
const DEFAULT_UNIVERSITY: &str = "Online Univ";
const DEFAULT_GRADUATION_YEAR: &str = "2024";
const DEFAULT_MONTHLY_SALARY: &str = "30000";
const DEFAULT_AVAILABILITY: &str = "Inmediata ";
const DEFAULT_TRAVEL_AVAILABILITY: &str = "No reubicación";
const DEFAULT_SOCIOECONOMIC_TIER: &str = "C";

/// Form payload for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    #[serde(rename = "datos_personales", default)]
    pub personal: PersonalDetails,
    #[serde(rename = "datos_laborales_y_habilidades", default)]
    pub professional: ProfessionalDetails,
    #[serde(rename = "porcentajes_conocimiento", default)]
    pub skill_percentages: SkillPercentages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    #[serde(rename = "nombre")]
    pub given_names: String,
    #[serde(rename = "apellido_paterno")]
    pub paternal_surname: String,
    #[serde(rename = "apellido_materno")]
    pub maternal_surname: String,
    #[serde(rename = "edad")]
    pub age: FormValue,
    #[serde(rename = "genero")]
    pub gender: String,
    pub religion: String,
    #[serde(rename = "preferencia_politica")]
    pub political_affiliation: String,
    #[serde(rename = "raza")]
    pub ethnicity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalDetails {
    #[serde(rename = "años_experiencia")]
    pub years_experience: FormValue,
    #[serde(rename = "titulo_profesional")]
    pub degree_title: String,
    #[serde(rename = "habilidades")]
    pub personal_skills: Vec<PersonalSkill>,
    #[serde(rename = "certificaciones")]
    pub certifications: Vec<String>,
    #[serde(rename = "idioma")]
    pub language: String,
    #[serde(rename = "nivel_idioma")]
    pub language_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalSkill {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nivel")]
    pub level: String,
}

/// Skill percentages on a 0-100 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillPercentages {
    pub python: FormValue,
    pub r: FormValue,
    pub sql: FormValue,
    #[serde(rename = "estadistica_avanzada")]
    pub advanced_statistics: FormValue,
}

/// A form input that may be a JSON number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl Default for FormValue {
    fn default() -> Self {
        FormValue::Text(String::new())
    }
}

impl FormValue {
    /// Numeric value; an empty input reads as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
            FormValue::Text(text) if text.trim().is_empty() => Some(0.0),
            FormValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Text written to the CSV column, without a trailing `.0` for whole numbers.
    pub fn to_field(&self) -> String {
        match self {
            FormValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{value:.0}")
            }
            FormValue::Number(value) => value.to_string(),
            FormValue::Text(text) => text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("`{field}` must be numeric, got {value:?}")]
    NotNumeric { field: &'static str, value: FormValue },
}

impl CandidateSubmission {
    /// Map the form onto the candidate CSV schema, converting percentages to fractions.
    pub fn to_row(&self, id: &CandidateId) -> Result<CandidateRow, IntakeError> {
        let fraction = |field: &'static str, value: &FormValue| {
            value
                .as_number()
                .map(|pct| (pct / 100.0).to_string())
                .ok_or_else(|| IntakeError::NotNumeric {
                    field,
                    value: value.clone(),
                })
        };

        let personal = &self.personal;
        let professional = &self.professional;
        let skills = &self.skill_percentages;
        let skill_name = |index: usize| {
            professional
                .personal_skills
                .get(index)
                .map(|skill| skill.name.clone())
                .unwrap_or_default()
        };
        let certification = |index: usize| {
            professional
                .certifications
                .get(index)
                .cloned()
                .unwrap_or_default()
        };

        Ok(CandidateRow {
            id: id.to_string(),
            years_experience: professional.years_experience.to_field(),
            given_names: personal.given_names.clone(),
            paternal_surname: personal.paternal_surname.clone(),
            maternal_surname: personal.maternal_surname.clone(),
            age: personal.age.to_field(),
            gender: personal.gender.clone(),
            degree_title: professional.degree_title.clone(),
            personal_skill_1: skill_name(0),
            personal_skill_2: skill_name(1),
            neighbourhood: DEFAULT_NEIGHBOURHOOD.to_string(),
            university: DEFAULT_UNIVERSITY.to_string(),
            graduation_year: DEFAULT_GRADUATION_YEAR.to_string(),
            certification_1: certification(0),
            certification_2: certification(1),
            python_pct: fraction("python", &skills.python)?,
            r_pct: fraction("r", &skills.r)?,
            sql_pct: fraction("sql", &skills.sql)?,
            stats_pct: fraction("estadistica_avanzada", &skills.advanced_statistics)?,
            monthly_salary: DEFAULT_MONTHLY_SALARY.to_string(),
            availability: DEFAULT_AVAILABILITY.to_string(),
            travel_availability: DEFAULT_TRAVEL_AVAILABILITY.to_string(),
            language_1: professional.language.clone(),
            language_level_1: professional.language_level.clone(),
            religion: personal.religion.clone(),
            political_affiliation: personal.political_affiliation.clone(),
            socioeconomic_tier: DEFAULT_SOCIOECONOMIC_TIER.to_string(),
            ethnicity: personal.ethnicity.clone(),
            ..CandidateRow::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> serde_json::Value {
        json!({
            "datos_personales": {
                "nombre": "Valeria",
                "apellido_paterno": "Núñez",
                "apellido_materno": "Ortiz",
                "edad": "31",
                "genero": "Femenino",
                "religion": "Ninguna",
                "preferencia_politica": "Centro",
                "raza": "Mestiza"
            },
            "datos_laborales_y_habilidades": {
                "años_experiencia": 4,
                "titulo_profesional": "Doctorado en Ciencia de Datos",
                "habilidades": [{ "nombre": "Liderazgo", "nivel": "Alto" }],
                "certificaciones": ["AWS Certified", "Data Specialty"],
                "idioma": "Inglés",
                "nivel_idioma": "B2"
            },
            "porcentajes_conocimiento": {
                "python": "90",
                "r": 50,
                "sql": "85",
                "estadistica_avanzada": "75"
            }
        })
    }

    #[test]
    fn maps_form_onto_candidate_row_with_defaults() {
        let submission: CandidateSubmission = serde_json::from_value(form()).expect("form parses");
        let row = submission.to_row(&CandidateId::from("DS05")).expect("row");

        assert_eq!(row.id, "DS05");
        assert_eq!(row.years_experience, "4");
        assert_eq!(row.age, "31");
        assert_eq!(row.personal_skill_1, "Liderazgo");
        assert_eq!(row.personal_skill_2, "");
        assert_eq!(row.certification_2, "Data Specialty");
        assert_eq!(row.python_pct, "0.9");
        assert_eq!(row.r_pct, "0.5");
        assert_eq!(row.monthly_salary, "30000");
        assert_eq!(row.availability, "Inmediata ");
        assert_eq!(row.socioeconomic_tier, "C");
        assert_eq!(row.language_level_1, "B2");
        assert_eq!(row.language_level_2, "");
    }

    #[test]
    fn missing_sections_fall_back_to_empty_values() {
        let submission: CandidateSubmission =
            serde_json::from_value(json!({ "datos_personales": { "nombre": "Iker" } }))
                .expect("sparse form parses");
        let row = submission.to_row(&CandidateId::from("DS01")).expect("row");
        assert_eq!(row.given_names, "Iker");
        assert_eq!(row.python_pct, "0");
        assert_eq!(row.certification_1, "");
    }

    #[test]
    fn rejects_non_numeric_percentages() {
        let mut submission: CandidateSubmission =
            serde_json::from_value(form()).expect("form parses");
        submission.skill_percentages.sql = FormValue::Text("mucho".to_string());

        match submission.to_row(&CandidateId::from("DS02")) {
            Err(IntakeError::NotNumeric { field, .. }) => assert_eq!(field, "sql"),
            other => panic!("expected numeric validation error, got {other:?}"),
        }
    }
}
