use crate::model::{RawRecord, SourceError, SourceKind};
use crate::source::{SourceAdapter, fetch_json, records_from_body};
use reqwest::Client;
use tracing::{info, warn};

const API_KEY_HEADER: &str = "X-Api-App-Id";

pub struct SuperJobSource {
    client: Client,
    url: String,
    page_size: u32,
    api_key: Option<String>,
}

impl SuperJobSource {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        page_size: u32,
        api_key: Option<String>,
    ) -> Self {
        if api_key.is_none() {
            warn!("SuperJob API key is not set, requests will be rejected");
        }
        Self {
            client,
            url: url.into(),
            page_size,
            api_key,
        }
    }

    // srws=1 restricts the keyword match to the vacancy title
    fn params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("keywords[0][srws]", "1".to_string()),
            ("keywords[0][keys]", query.to_string()),
            ("count", self.page_size.to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl SourceAdapter for SuperJobSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SuperJob
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>, SourceError> {
        let mut request = self.client.get(&self.url).query(&self.params(query));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let body = fetch_json(self.kind(), request).await?;
        let records = records_from_body(self.kind(), body, "objects");
        info!("superjob.ru returned {} records for '{}'", records.len(), query);
        Ok(records)
    }
}
