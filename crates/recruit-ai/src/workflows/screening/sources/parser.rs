use std::collections::BTreeSet;
use std::io::{Read, Write};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SourceBatch;
use crate::workflows::screening::domain::{
    CandidateId, CandidateRecord, ProtectedAttribute, ProtectedAttributes,
};

/// Header of the candidate CSV schema, in column order.
pub const CANDIDATE_COLUMNS: [&str; 35] = [
    "ID",
    "Años de experiencia",
    "Nombre(s)",
    "Apellido_Paterno",
    "Apellido_Materno",
    "Edad",
    "Género",
    "Título_Principal",
    "Habilidades_Personales_1",
    "Habilidades_Personales_2",
    "Colonia",
    "Deporte",
    "Música",
    "Pasatiempo",
    "Lectura",
    "Logro_Profesional",
    "Universidad",
    "Año_Graduación",
    "Certificación_1",
    "Certificación_2",
    "Python_Porcentaje",
    "R_Porcentaje",
    "SQL_Porcentaje",
    "Estadística_Avanzada_Porcentaje",
    "Sueldo_mensual",
    "Disponibilidad_contratación",
    "Disponibilidad_de_viajar",
    "Idioma_1",
    "Nivel_idioma_1",
    "Idioma_2",
    "Nivel_idioma_2",
    "Religión_ficticia",
    "Afiliación_política_ficticia",
    "Nivel_Socio_Económico(NSE_AMAI)",
    "Etnia_(Autodefinición)",
];

/// One CSV row of the candidate schema. Field order matches [`CANDIDATE_COLUMNS`].
///
/// Missing columns deserialize as empty strings so that schema drift between the
/// remote and local sources never rejects a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Años de experiencia")]
    pub years_experience: String,
    #[serde(rename = "Nombre(s)")]
    pub given_names: String,
    #[serde(rename = "Apellido_Paterno")]
    pub paternal_surname: String,
    #[serde(rename = "Apellido_Materno")]
    pub maternal_surname: String,
    #[serde(rename = "Edad")]
    pub age: String,
    #[serde(rename = "Género")]
    pub gender: String,
    #[serde(rename = "Título_Principal")]
    pub degree_title: String,
    #[serde(rename = "Habilidades_Personales_1")]
    pub personal_skill_1: String,
    #[serde(rename = "Habilidades_Personales_2")]
    pub personal_skill_2: String,
    #[serde(rename = "Colonia")]
    pub neighbourhood: String,
    #[serde(rename = "Deporte")]
    pub sport: String,
    #[serde(rename = "Música")]
    pub music: String,
    #[serde(rename = "Pasatiempo")]
    pub hobby: String,
    #[serde(rename = "Lectura")]
    pub reading: String,
    #[serde(rename = "Logro_Profesional")]
    pub professional_achievement: String,
    #[serde(rename = "Universidad")]
    pub university: String,
    #[serde(rename = "Año_Graduación")]
    pub graduation_year: String,
    #[serde(rename = "Certificación_1")]
    pub certification_1: String,
    #[serde(rename = "Certificación_2")]
    pub certification_2: String,
    #[serde(rename = "Python_Porcentaje")]
    pub python_pct: String,
    #[serde(rename = "R_Porcentaje")]
    pub r_pct: String,
    #[serde(rename = "SQL_Porcentaje")]
    pub sql_pct: String,
    #[serde(rename = "Estadística_Avanzada_Porcentaje")]
    pub stats_pct: String,
    #[serde(rename = "Sueldo_mensual")]
    pub monthly_salary: String,
    #[serde(rename = "Disponibilidad_contratación")]
    pub availability: String,
    #[serde(rename = "Disponibilidad_de_viajar")]
    pub travel_availability: String,
    #[serde(rename = "Idioma_1")]
    pub language_1: String,
    #[serde(rename = "Nivel_idioma_1")]
    pub language_level_1: String,
    #[serde(rename = "Idioma_2")]
    pub language_2: String,
    #[serde(rename = "Nivel_idioma_2")]
    pub language_level_2: String,
    #[serde(rename = "Religión_ficticia")]
    pub religion: String,
    #[serde(rename = "Afiliación_política_ficticia")]
    pub political_affiliation: String,
    #[serde(rename = "Nivel_Socio_Económico(NSE_AMAI)")]
    pub socioeconomic_tier: String,
    #[serde(rename = "Etnia_(Autodefinición)")]
    pub ethnicity: String,
}

impl CandidateRow {
    pub fn into_record(self) -> CandidateRecord {
        CandidateRecord {
            id: CandidateId(self.id.trim().to_string()),
            given_names: self.given_names,
            paternal_surname: self.paternal_surname,
            years_experience: self.years_experience,
            degree_title: self.degree_title,
            certifications: [self.certification_1, self.certification_2],
            python_pct: self.python_pct,
            r_pct: self.r_pct,
            sql_pct: self.sql_pct,
            stats_pct: self.stats_pct,
            monthly_salary: self.monthly_salary,
            availability: self.availability,
            language_levels: [self.language_level_1, self.language_level_2],
            protected: ProtectedAttributes {
                age: self.age,
                gender: self.gender,
                religion: self.religion,
                political_affiliation: self.political_affiliation,
                socioeconomic_tier: self.socioeconomic_tier,
                ethnicity: self.ethnicity,
            },
        }
    }
}

/// Parse a candidate CSV. Only a broken header or an I/O failure is an error;
/// individual rows degrade to empty fields instead.
pub(crate) fn parse_batch<R: Read>(reader: R) -> Result<SourceBatch, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = StringRecord::from_byte_record_lossy(csv_reader.byte_headers()?.clone());
    let protected_columns: BTreeSet<ProtectedAttribute> = headers
        .iter()
        .filter_map(ProtectedAttribute::from_column)
        .collect();

    let mut candidates = Vec::new();
    for (index, raw) in csv_reader.byte_records().enumerate() {
        let mut record = StringRecord::from_byte_record_lossy(raw?);
        // serde deserialization requires one field per header.
        while record.len() < headers.len() {
            record.push_field("");
        }
        let row = match record.deserialize::<CandidateRow>(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                debug!(row = index + 1, error = %err, "candidate row unreadable, using empty fields");
                CandidateRow::default()
            }
        };
        candidates.push(row.into_record());
    }

    Ok(SourceBatch {
        candidates,
        protected_columns,
    })
}

pub(crate) fn write_header<W: Write>(writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
    writer.write_record(CANDIDATE_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_rows_and_keeps_whitespace_in_values() {
        let csv = "ID,Nombre(s),Disponibilidad_contratación,Género\nDS01,Ana,Inmediata ,F\n";
        let batch = parse_batch(Cursor::new(csv)).expect("parse");

        assert_eq!(batch.candidates.len(), 1);
        let record = &batch.candidates[0];
        assert_eq!(record.id.as_str(), "DS01");
        assert_eq!(record.given_names, "Ana");
        assert_eq!(record.availability, "Inmediata ");
        assert_eq!(record.protected.gender, "F");
        assert_eq!(
            batch.protected_columns.iter().copied().collect::<Vec<_>>(),
            vec![ProtectedAttribute::Gender]
        );
    }

    #[test]
    fn tolerates_short_rows_and_unknown_columns() {
        let csv = " ID ,Python_Porcentaje,Columna_Nueva,SQL_Porcentaje\nDS02,0.9\nDS03,0.5,x,0.7,extra\n";
        let batch = parse_batch(Cursor::new(csv)).expect("parse");

        assert_eq!(batch.candidates.len(), 2);
        assert_eq!(batch.candidates[0].python_pct, "0.9");
        assert_eq!(batch.candidates[0].sql_pct, "");
        assert_eq!(batch.candidates[1].sql_pct, "0.7");
        assert!(batch.protected_columns.is_empty());
    }

    #[test]
    fn latin1_header_is_decoded_lossily() {
        let csv: &[u8] = b"ID,A\xF1os de experiencia,G\xE9nero,Python_Porcentaje\nDS01,3,F,0.9\nDS02,1,M,0.5\n";
        let batch = parse_batch(Cursor::new(csv)).expect("parse");

        assert_eq!(batch.candidates.len(), 2);
        assert_eq!(batch.candidates[0].id.as_str(), "DS01");
        assert_eq!(batch.candidates[1].python_pct, "0.5");
        // Mangled column names no longer match the schema.
        assert_eq!(batch.candidates[0].years_experience, "");
        assert!(batch.protected_columns.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_batch() {
        let batch = parse_batch(Cursor::new("")).expect("parse");
        assert!(batch.candidates.is_empty());
    }

    #[test]
    fn row_serialization_follows_column_order() {
        let row = CandidateRow {
            id: "DS09".to_string(),
            ethnicity: "Mestiza".to_string(),
            ..CandidateRow::default()
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        write_header(&mut writer).expect("header");
        writer.serialize(&row).expect("row");
        let bytes = writer.into_inner().expect("flush");

        let batch = parse_batch(Cursor::new(bytes)).expect("reparse");
        assert_eq!(batch.candidates[0].id.as_str(), "DS09");
        assert_eq!(batch.candidates[0].protected.ethnicity, "Mestiza");
        assert_eq!(batch.protected_columns.len(), 6);
    }
}
