mod normalizer;
mod parser;

use crate::statistics::{StatisticsError, VacancyRecord};
use std::io::Read;
use std::path::Path;
use tracing::info;

pub use normalizer::collapse_whitespace;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Csv(csv::Error),
    Record { line: u64, source: StatisticsError },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "failed to read vacancy export: {}", err),
            LoadError::Csv(err) => write!(f, "invalid vacancy CSV data: {}", err),
            LoadError::Record { line, source } => {
                write!(f, "invalid vacancy on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Csv(err) => Some(err),
            LoadError::Record { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads vacancy exports with `name`, `salary_from`, `salary_to`,
/// `salary_currency`, `area_name`, and `published_at` columns.
///
/// Rows with any empty cell are skipped; every other row must parse.
pub struct VacancyCsvLoader;

impl VacancyCsvLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VacancyRecord>, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let records = Self::from_reader(file)?;
        info!(path = %path.display(), records = records.len(), "loaded vacancy export");
        Ok(records)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<VacancyRecord>, LoadError> {
        let parsed = parser::parse_records(reader)?;
        if parsed.skipped > 0 {
            info!(skipped = parsed.skipped, "skipped vacancy rows with empty fields");
        }
        Ok(parsed.records)
    }
}
