use crate::model::{StorageError, Vacancy};
use crate::storage::{Criteria, VacancyStore, matches_criteria, replace_file};
use csv::{ReaderBuilder, Terminator, Writer, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::PathBuf;

const HEADER: [&str; 4] = ["title", "link", "salary", "date"];

/// Comma separated rows under a `title,link,salary,date` header.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Vec<Vacancy>, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader.headers().map_err(corrupt)?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().eq(HEADER) {
            return Err(StorageError::Corrupt {
                line: headers.position().map_or(1, |p| p.line() as usize),
                reason: format!("unexpected header {:?}", headers),
            });
        }

        let mut records = Vec::new();
        for row in reader.deserialize::<Vacancy>() {
            records.push(row.map_err(corrupt)?);
        }
        Ok(records)
    }

    /// True when the file is missing or holds nothing but whitespace.
    fn has_no_rows(&self) -> Result<bool, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };
        for byte in BufReader::new(file).bytes() {
            if !byte?.is_ascii_whitespace() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Decoding failures carry the offending line; I/O failures stay as they are.
fn corrupt(e: csv::Error) -> StorageError {
    if e.is_io_error() {
        return StorageError::Csv(e);
    }
    StorageError::Corrupt {
        line: e.position().map_or(0, |p| p.line() as usize),
        reason: e.to_string(),
    }
}

fn csv_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn row(vacancy: &Vacancy) -> [String; 4] {
    [
        vacancy.title().to_string(),
        vacancy.link().to_string(),
        vacancy.salary().to_string(),
        vacancy.date().to_string(),
    ]
}

impl VacancyStore for CsvStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn append(&self, vacancy: &Vacancy) -> Result<(), StorageError> {
        let needs_header = self.has_no_rows()?;
        // a blank file starts over so the header is its first line
        let file = if needs_header {
            OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };

        let mut writer = csv_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.write_record(row(vacancy))?;
        writer.flush()?;
        Ok(())
    }

    fn query(&self, criteria: &Criteria) -> Result<Vec<Vacancy>, StorageError> {
        let mut found = Vec::new();
        for vacancy in self.read_all()? {
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
        let records = self.read_all()?;

        let mut writer = csv_writer(Vec::new());
        writer.write_record(HEADER)?;
        for stored in records.iter().filter(|stored| *stored != vacancy) {
            writer.write_record(row(stored))?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        replace_file(&self.path, &contents)
    }
}
