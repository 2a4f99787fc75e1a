use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub const SUPERJOB_KEY_ENV: &str = "API_SUPERJOB_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub page_size: u32,
    pub headhunter_url: String,
    pub superjob_url: String,
    pub superjob_api_key: Option<String>,
    pub rates_url: String,
    pub base_currency_aliases: Vec<String>,
    pub json_store_path: PathBuf,
    pub csv_store_path: PathBuf,
    pub abort_on_source_error: bool,
    pub request_timeout_seconds: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            headhunter_url: "https://api.hh.ru/vacancies".into(),
            superjob_url: "https://api.superjob.ru/2.0/vacancies".into(),
            superjob_api_key: None,
            rates_url: "https://www.cbr-xml-daily.ru/daily_json.js".into(),
            base_currency_aliases: vec!["RUR".into(), "RUB".into()],
            json_store_path: "json_vacancies.json".into(),
            csv_store_path: "csv_vacancies.csv".into(),
            abort_on_source_error: false,
            request_timeout_seconds: None,
        }
    }
}

/// Reads the JSON config. A missing file falls back to defaults;
/// the SuperJob key from the environment wins over the file.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => parse_config(&content)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No {} found, using default configuration", path);
            AppConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Ok(key) = std::env::var(SUPERJOB_KEY_ENV) {
        config.superjob_api_key = Some(key);
    }
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}
