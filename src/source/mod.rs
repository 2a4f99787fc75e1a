// Job board clients: one adapter per provider behind a shared trait.

pub mod headhunter;
pub mod superjob;
pub mod traits;

pub use headhunter::HeadHunterSource;
pub use superjob::SuperJobSource;
pub use traits::SourceAdapter;

use crate::model::{RawRecord, SourceError, SourceKind};
use reqwest::RequestBuilder;
use serde_json::Value;

/// Takes the record array from a response body. A missing field means no results.
pub fn records_from_body(source: SourceKind, body: Value, field: &str) -> Vec<RawRecord> {
    let Value::Object(mut top) = body else {
        return Vec::new();
    };
    let Some(Value::Array(items)) = top.remove(field) else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(RawRecord { source, fields }),
            _ => None,
        })
        .collect()
}

/// Sends the request and decodes the JSON body, mapping failures to `SourceError`.
pub(crate) async fn fetch_json(
    source: SourceKind,
    request: RequestBuilder,
) -> Result<Value, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|error| SourceError::Http { provider: source, error })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status { provider: source, status });
    }

    response
        .json::<Value>()
        .await
        .map_err(|error| SourceError::InvalidResponse { provider: source, error })
}
