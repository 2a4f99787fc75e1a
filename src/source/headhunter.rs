use crate::model::{RawRecord, SourceError, SourceKind};
use crate::source::{SourceAdapter, fetch_json, records_from_body};
use reqwest::Client;
use tracing::info;

pub struct HeadHunterSource {
    client: Client,
    url: String,
    page_size: u32,
}

impl HeadHunterSource {
    pub fn new(client: Client, url: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            url: url.into(),
            page_size,
        }
    }

    /// Only vacancies with a salary, full-time employment.
    fn params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("text", query.to_string()),
            ("per_page", self.page_size.to_string()),
            ("only_with_salary", "true".to_string()),
            ("employment", "full".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl SourceAdapter for HeadHunterSource {
    fn kind(&self) -> SourceKind {
        SourceKind::HeadHunter
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>, SourceError> {
        let request = self.client.get(&self.url).query(&self.params(query));
        let body = fetch_json(self.kind(), request).await?;
        let records = records_from_body(self.kind(), body, "items");
        info!("hh.ru returned {} records for '{}'", records.len(), query);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_carry_provider_filters() {
        let source = HeadHunterSource::new(Client::new(), "http://localhost/vacancies", 50);
        let params = source.params("rust developer");
        assert!(params.contains(&("text", "rust developer".to_string())));
        assert!(params.contains(&("per_page", "50".to_string())));
        assert!(params.contains(&("only_with_salary", "true".to_string())));
        assert!(params.contains(&("employment", "full".to_string())));
    }
}
