use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::RemoteSourceConfig;
use crate::workflows::screening::domain::{CandidateRecord, ProtectedAttribute};
use crate::workflows::screening::intake::{
    ArchiveError, ArchivedSubmission, CandidateSubmission, SubmissionArchive,
};
use crate::workflows::screening::sources::{
    CandidateRow, CandidateStore, FetchError, RecordFetcher, RemoteCandidateSource, SourceBatch,
    StoreError,
};
use crate::workflows::screening::{ScreeningPipeline, ScreeningService};

pub(super) const PRIMARY_URL: &str = "https://example.test/main/candidates.csv";
pub(super) const FALLBACK_URL: &str = "https://example.test/master/candidates.csv";

/// Row matching the reference scoring example: final score of about 0.8995.
pub(super) fn reference_row(id: &str) -> CandidateRow {
    CandidateRow {
        id: id.to_string(),
        years_experience: "4".to_string(),
        given_names: "Valeria".to_string(),
        paternal_surname: "Núñez".to_string(),
        age: "31".to_string(),
        gender: "Femenino".to_string(),
        degree_title: "Doctorado en Ciencia de Datos".to_string(),
        certification_1: "AWS Certified".to_string(),
        certification_2: "Data Specialty".to_string(),
        python_pct: "0.90".to_string(),
        r_pct: "0.50".to_string(),
        sql_pct: "0.85".to_string(),
        stats_pct: "0.75".to_string(),
        monthly_salary: "42000".to_string(),
        availability: "Inmediata".to_string(),
        language_1: "Inglés".to_string(),
        language_level_1: "B2".to_string(),
        language_2: "Francés".to_string(),
        language_level_2: "B1".to_string(),
        religion: "Ninguna".to_string(),
        political_affiliation: "Centro".to_string(),
        socioeconomic_tier: "A/B".to_string(),
        ethnicity: "Mestiza".to_string(),
        ..CandidateRow::default()
    }
}

/// Modest profile scoring well below [`reference_row`].
pub(super) fn junior_row(id: &str, gender: &str) -> CandidateRow {
    CandidateRow {
        id: id.to_string(),
        years_experience: "1".to_string(),
        given_names: format!("Junior {id}"),
        paternal_surname: "Pérez".to_string(),
        age: "24".to_string(),
        gender: gender.to_string(),
        degree_title: "Lic. en Economía".to_string(),
        python_pct: "0.40".to_string(),
        r_pct: "0.20".to_string(),
        sql_pct: "0.35".to_string(),
        stats_pct: "0.30".to_string(),
        monthly_salary: "18000".to_string(),
        availability: "1 mes".to_string(),
        language_level_1: "A2".to_string(),
        religion: "Católica".to_string(),
        political_affiliation: "Izquierda".to_string(),
        socioeconomic_tier: "C".to_string(),
        ethnicity: "Indígena".to_string(),
        ..CandidateRow::default()
    }
}

pub(super) fn record(row: CandidateRow) -> CandidateRecord {
    row.into_record()
}

/// Serialize rows with the full candidate header.
pub(super) fn to_csv(rows: &[CandidateRow]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).expect("row serializes");
    }
    let bytes = writer.into_inner().expect("flush csv");
    String::from_utf8(bytes).expect("utf-8 csv")
}

pub(super) fn all_protected_columns() -> BTreeSet<ProtectedAttribute> {
    ProtectedAttribute::ordered().into_iter().collect()
}

#[derive(Default)]
pub(super) struct MemoryStore {
    rows: Mutex<Vec<CandidateRow>>,
}

impl MemoryStore {
    pub(super) fn with_rows(rows: Vec<CandidateRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub(super) fn rows(&self) -> Vec<CandidateRow> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

impl CandidateStore for MemoryStore {
    fn load(&self) -> Result<SourceBatch, StoreError> {
        let rows = self.rows();
        let protected_columns = if rows.is_empty() {
            BTreeSet::new()
        } else {
            all_protected_columns()
        };
        Ok(SourceBatch {
            candidates: rows.into_iter().map(CandidateRow::into_record).collect(),
            protected_columns,
        })
    }

    fn append(&self, row: &CandidateRow) -> Result<(), StoreError> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push(row.clone());
        Ok(())
    }
}

/// Store whose reads and writes always fail.
pub(super) struct UnavailableStore;

impl UnavailableStore {
    fn error() -> StoreError {
        StoreError::Io {
            path: PathBuf::from("data/new_candidates.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"),
        }
    }
}

impl CandidateStore for UnavailableStore {
    fn load(&self) -> Result<SourceBatch, StoreError> {
        Err(Self::error())
    }

    fn append(&self, _row: &CandidateRow) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

/// Store that cannot be read but still accepts appends.
#[derive(Default)]
pub(super) struct UnreadableStore {
    appended: Mutex<Vec<CandidateRow>>,
}

impl UnreadableStore {
    pub(super) fn appended(&self) -> Vec<CandidateRow> {
        self.appended.lock().expect("store mutex poisoned").clone()
    }
}

impl CandidateStore for UnreadableStore {
    fn load(&self) -> Result<SourceBatch, StoreError> {
        Err(UnavailableStore::error())
    }

    fn append(&self, row: &CandidateRow) -> Result<(), StoreError> {
        self.appended
            .lock()
            .expect("store mutex poisoned")
            .push(row.clone());
        Ok(())
    }
}

/// Fetcher serving canned bodies per URL and recording every request.
#[derive(Default)]
pub(super) struct StaticFetcher {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(super) fn serving(url: &str, body: String) -> Self {
        let mut bodies = HashMap::new();
        bodies.insert(url.to_string(), body);
        Self {
            bodies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn offline() -> Self {
        Self::default()
    }

    pub(super) fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("fetcher mutex poisoned").clone()
    }
}

impl RecordFetcher for StaticFetcher {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
        self.requests
            .lock()
            .expect("fetcher mutex poisoned")
            .push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

pub(super) fn remote_source(fetcher: Arc<StaticFetcher>) -> RemoteCandidateSource<StaticFetcher> {
    RemoteCandidateSource::new(
        RemoteSourceConfig {
            primary_url: PRIMARY_URL.to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            timeout: Duration::from_secs(10),
        },
        fetcher,
    )
}

#[derive(Default)]
pub(super) struct MemoryArchive {
    entries: Mutex<Vec<ArchivedSubmission>>,
}

impl MemoryArchive {
    pub(super) fn entries(&self) -> Vec<ArchivedSubmission> {
        self.entries.lock().expect("archive mutex poisoned").clone()
    }
}

impl SubmissionArchive for MemoryArchive {
    fn record(&self, entry: &ArchivedSubmission) -> Result<(), ArchiveError> {
        self.entries
            .lock()
            .expect("archive mutex poisoned")
            .push(entry.clone());
        Ok(())
    }
}

/// Archive whose writes always fail.
pub(super) struct FailingArchive;

impl SubmissionArchive for FailingArchive {
    fn record(&self, _entry: &ArchivedSubmission) -> Result<(), ArchiveError> {
        Err(ArchiveError::Io {
            path: PathBuf::from("data/database.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "archive volume full"),
        })
    }
}

pub(super) type MemoryService = ScreeningService<MemoryStore, StaticFetcher, MemoryArchive>;

pub(super) struct Harness {
    pub(super) service: Arc<MemoryService>,
    pub(super) store: Arc<MemoryStore>,
    pub(super) fetcher: Arc<StaticFetcher>,
    pub(super) archive: Arc<MemoryArchive>,
}

/// Service over a remote pool served at the primary URL and a local store.
pub(super) fn harness(remote_rows: &[CandidateRow], local_rows: Vec<CandidateRow>) -> Harness {
    let fetcher = Arc::new(if remote_rows.is_empty() {
        StaticFetcher::offline()
    } else {
        StaticFetcher::serving(PRIMARY_URL, to_csv(remote_rows))
    });
    let store = Arc::new(MemoryStore::with_rows(local_rows));
    let archive = Arc::new(MemoryArchive::default());
    let service = Arc::new(ScreeningService::new(
        store.clone(),
        Some(remote_source(fetcher.clone())),
        archive.clone(),
        ScreeningPipeline::default(),
    ));

    Harness {
        service,
        store,
        fetcher,
        archive,
    }
}

pub(super) fn submission() -> CandidateSubmission {
    serde_json::from_value(serde_json::json!({
        "datos_personales": {
            "nombre": "Mateo",
            "apellido_paterno": "Ríos",
            "apellido_materno": "Vega",
            "edad": 29,
            "genero": "Masculino",
            "religion": "Ninguna",
            "preferencia_politica": "Centro",
            "raza": "Mestiza"
        },
        "datos_laborales_y_habilidades": {
            "años_experiencia": "6",
            "titulo_profesional": "Maestría en Estadística",
            "habilidades": [{ "nombre": "Comunicación", "nivel": "Alto" }],
            "certificaciones": ["GCP Data Engineer"],
            "idioma": "Inglés",
            "nivel_idioma": "C1"
        },
        "porcentajes_conocimiento": {
            "python": "80",
            "r": "40",
            "sql": "90",
            "estadistica_avanzada": "70"
        }
    }))
    .expect("submission fixture parses")
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
