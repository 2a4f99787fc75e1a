use crate::model::{StorageError, Vacancy};
use crate::storage::{Criteria, VacancyStore, matches_criteria, replace_file};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// One JSON object per line.
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every stored record with the line it came from. A missing file is an empty store.
    fn read_lines(&self) -> Result<Vec<(String, Vacancy)>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let vacancy: Vacancy = serde_json::from_str(line).map_err(|e| StorageError::Corrupt {
                line: idx + 1,
                reason: e.to_string(),
            })?;
            records.push((line.to_string(), vacancy));
        }
        Ok(records)
    }
}

impl VacancyStore for JsonLinesStore {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&self, vacancy: &Vacancy) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(vacancy)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn query(&self, criteria: &Criteria) -> Result<Vec<Vacancy>, StorageError> {
        let mut found = Vec::new();
        for (_, vacancy) in self.read_lines()? {
            if matches_criteria(&vacancy, criteria)? {
                found.push(vacancy);
            }
        }
        Ok(found)
    }

    fn remove(&self, vacancy: &Vacancy) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut kept = String::new();
        for (line, stored) in self.read_lines()? {
            if &stored != vacancy {
                kept.push_str(&line);
                kept.push('\n');
            }
        }
        replace_file(&self.path, kept.as_bytes())
    }
}
