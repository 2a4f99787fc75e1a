use crate::model::{RawRecord, SourceError, SourceKind};

#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>, SourceError>;
}
