// Flat-file vacancy stores sharing one append/query/remove contract.

pub mod csv_file;
pub mod json_lines;

pub use csv_file::CsvStore;
pub use json_lines::JsonLinesStore;

use crate::model::{StorageError, Vacancy};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Field name to expected value. Empty criteria match every record.
pub type Criteria = BTreeMap<String, Value>;

pub trait VacancyStore {
    fn name(&self) -> &str;

    /// Adds one record after the existing ones.
    fn append(&self, vacancy: &Vacancy) -> Result<(), StorageError>;

    /// Records whose fields equal every criterion, in stored order.
    fn query(&self, criteria: &Criteria) -> Result<Vec<Vacancy>, StorageError>;

    /// Rewrites the store without records equal to `vacancy`.
    fn remove(&self, vacancy: &Vacancy) -> Result<(), StorageError>;
}

/// Unknown criterion fields never match.
pub fn matches_criteria(vacancy: &Vacancy, criteria: &Criteria) -> Result<bool, StorageError> {
    if criteria.is_empty() {
        return Ok(true);
    }
    let Value::Object(fields) = serde_json::to_value(vacancy)? else {
        return Ok(false);
    };
    Ok(criteria
        .iter()
        .all(|(key, expected)| fields.get(key) == Some(expected)))
}

/// Writes the full replacement next to the store, then renames it into place.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let tmp = sibling_tmp(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn sibling_tmp(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
