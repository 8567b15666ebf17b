use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use super::parser::{self, CandidateRow};
use super::SourceBatch;

/// Local store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("candidate store io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("candidate store csv failure: {0}")]
    Csv(#[from] csv::Error),
}

/// Storage abstraction for previously submitted candidates.
pub trait CandidateStore: Send + Sync {
    fn load(&self) -> Result<SourceBatch, StoreError>;
    fn append(&self, row: &CandidateRow) -> Result<(), StoreError>;
}

/// CSV file holding submitted candidates, one row per submission.
#[derive(Debug, Clone)]
pub struct CsvCandidateStore {
    path: PathBuf,
}

impl CsvCandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CandidateStore for CsvCandidateStore {
    /// A store that has never been written to is an empty source.
    fn load(&self) -> Result<SourceBatch, StoreError> {
        if !self.path.exists() {
            return Ok(SourceBatch::default());
        }

        let file = File::open(&self.path).map_err(|err| self.io_error(err))?;
        Ok(parser::parse_batch(file)?)
    }

    fn append(&self, row: &CandidateRow) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.io_error(err))?;
        let is_new = file.metadata().map_err(|err| self.io_error(err))?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            parser::write_header(&mut writer)?;
        }
        writer.serialize(row)?;
        writer.flush().map_err(|err| self.io_error(err))?;
        Ok(())
    }
}
