// Core structs: Vacancy, RawRecord, PendingVacancy and the error types
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Canonical vacancy. Salary is always present and expressed in base currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    title: String,
    link: String,
    salary: i64,
    date: String,
}

impl Vacancy {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        salary: i64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            salary,
            date: date.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn salary(&self) -> i64 {
        self.salary
    }

    /// Publication date, `YYYY.MM.DD`.
    pub fn date(&self) -> &str {
        &self.date
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} RUB | {} | {}",
            self.title, self.salary, self.date, self.link
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    HeadHunter,
    SuperJob,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::HeadHunter => f.write_str("hh.ru"),
            SourceKind::SuperJob => f.write_str("superjob.ru"),
        }
    }
}

/// Provider-specific record exactly as the job board returned it.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub source: SourceKind,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Normalized record before currency conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVacancy {
    pub title: String,
    pub link: String,
    pub salary_raw: Option<f64>,
    pub date: String,
    pub currency: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {provider} failed: {error}")]
    Http {
        provider: SourceKind,
        #[source]
        error: reqwest::Error,
    },
    #[error("{provider} responded with status {status}")]
    Status {
        provider: SourceKind,
        status: reqwest::StatusCode,
    },
    #[error("{provider} returned an undecodable body: {error}")]
    InvalidResponse {
        provider: SourceKind,
        #[source]
        error: reqwest::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("record has no usable `{0}` field")]
    MalformedRecord(&'static str),
}

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("no conversion rate for currency {0}")]
    UnknownCurrency(String),
    #[error("invalid conversion rate {rate} for currency {code}")]
    InvalidRate { code: String, rate: f64 },
    #[error("rate provider unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("source failed: {0}")]
    Source(#[from] SourceError),
}
