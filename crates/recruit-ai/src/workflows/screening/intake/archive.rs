use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::cipher::SubstitutionCipher;
use super::CandidateSubmission;
use crate::workflows::screening::domain::CandidateId;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keeps a copy of every raw submission next to the candidate store.
pub trait SubmissionArchive: Send + Sync {
    fn record(&self, entry: &ArchivedSubmission) -> Result<(), ArchiveError>;
}

/// Submission as archived, with its allocated id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchivedSubmission {
    pub id: CandidateId,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: CandidateSubmission,
}

/// JSON list of submissions plus an obfuscated copy of the same list.
#[derive(Debug, Clone)]
pub struct FileSubmissionArchive {
    json_path: PathBuf,
    obfuscated_path: PathBuf,
    cipher: SubstitutionCipher,
}

impl FileSubmissionArchive {
    pub fn new(
        json_path: impl Into<PathBuf>,
        obfuscated_path: impl Into<PathBuf>,
        cipher: SubstitutionCipher,
    ) -> Self {
        Self {
            json_path: json_path.into(),
            obfuscated_path: obfuscated_path.into(),
            cipher,
        }
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn obfuscated_path(&self) -> &Path {
        &self.obfuscated_path
    }

    /// Existing entries; an unreadable or corrupt archive starts over empty.
    fn existing_entries(&self) -> Vec<serde_json::Value> {
        let Ok(contents) = fs::read_to_string(&self.json_path) else {
            return Vec::new();
        };
        if contents.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %self.json_path.display(), error = %err, "submission archive corrupt, starting a new one");
            Vec::new()
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), ArchiveError> {
        let io_error = |source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, contents).map_err(io_error)
    }
}

impl SubmissionArchive for FileSubmissionArchive {
    fn record(&self, entry: &ArchivedSubmission) -> Result<(), ArchiveError> {
        let mut entries = self.existing_entries();
        entries.push(serde_json::to_value(entry)?);

        self.write(&self.json_path, &serde_json::to_string_pretty(&entries)?)?;
        let obfuscated = self.cipher.encrypt(&serde_json::to_string(&entries)?);
        self.write(&self.obfuscated_path, &obfuscated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::intake::PersonalDetails;

    fn entry(id: &str, name: &str) -> ArchivedSubmission {
        ArchivedSubmission {
            id: CandidateId::from(id),
            submitted_at: Utc::now(),
            submission: CandidateSubmission {
                personal: PersonalDetails {
                    given_names: name.to_string(),
                    ..PersonalDetails::default()
                },
                ..CandidateSubmission::default()
            },
        }
    }

    #[test]
    fn appends_entries_and_keeps_obfuscated_copy_in_sync() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cipher = SubstitutionCipher::new(42);
        let archive = FileSubmissionArchive::new(
            dir.path().join("database.json"),
            dir.path().join("encrypted_database.txt"),
            cipher.clone(),
        );

        archive.record(&entry("DS01", "Ana")).expect("first");
        archive.record(&entry("DS02", "Luis")).expect("second");

        let plain = fs::read_to_string(archive.json_path()).expect("json");
        let entries: Vec<serde_json::Value> = serde_json::from_str(&plain).expect("valid json");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["id"], "DS02");
        assert_eq!(entries[1]["datos_personales"]["nombre"], "Luis");

        let obfuscated = fs::read_to_string(archive.obfuscated_path()).expect("obfuscated");
        let revealed: Vec<serde_json::Value> =
            serde_json::from_str(&cipher.decrypt(&obfuscated)).expect("decrypts to json");
        assert_eq!(revealed, entries);
    }

    #[test]
    fn corrupt_archive_is_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("database.json");
        fs::write(&json_path, "not json").expect("seed corrupt file");
        let archive = FileSubmissionArchive::new(
            &json_path,
            dir.path().join("encrypted_database.txt"),
            SubstitutionCipher::new(1),
        );

        archive.record(&entry("DS03", "Eva")).expect("record");
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&json_path).expect("json")).expect("valid");
        assert_eq!(entries.len(), 1);
    }
}
