use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{RecordListResponse, RecordSet};

/// Offset/size window plus an optional free-text filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub size: usize,
    pub query: Option<String>,
}

impl PageRequest {
    pub fn new(offset: usize, size: usize) -> Self {
        Self {
            offset,
            size,
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
        self
    }

    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.size,
            ..self.clone()
        }
    }
}

/// Per-id outcome of a delete call, as reported by the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
    #[serde(rename = "Id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "Deleted", alias = "deleted", default)]
    pub deleted: bool,
    #[serde(rename = "Error", alias = "error", default)]
    pub error: Option<Value>,
}

/// The archive's HTTP surface as the viewer consumes it.
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    async fn list_record_sets(&self, page: &PageRequest) -> Result<RecordListResponse>;
    async fn get_record_set(&self, id: &str) -> Result<RecordSet>;
    async fn get_file(&self, id: &str, filename: &str) -> Result<Vec<u8>>;
    async fn delete_record_sets(&self, ids: &[String]) -> Result<Vec<DeleteRecordResponse>>;
}

/// Fetches one attachment of a thread and writes it to `target`.
pub async fn download_file(
    api: &dyn ArchiveApi,
    id: &str,
    filename: &str,
    target: &Path,
) -> Result<u64> {
    let bytes = api.get_file(id, filename).await?;
    if let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(target, &bytes).await?;
    tracing::info!(id, filename, path = %target.display(), bytes = bytes.len(), "Saved file");
    Ok(bytes.len() as u64)
}
