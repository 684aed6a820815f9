use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use url::Url;

use super::traits::{ArchiveApi, DeleteRecordResponse, PageRequest};
use crate::config::ArchiveConfig;
use crate::error::{Result, ViewerError};
use crate::models::{RecordListResponse, RecordSet};

const RECORDS_PATH: [&str; 2] = ["chronicler", "records"];

/// HTTP client for the archive API. One request per call: retries are left
/// to whoever drives it.
#[derive(Clone)]
pub struct ArchiveApiClient {
    client: Client,
    base_url: Url,
}

impl ArchiveApiClient {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ViewerError::Validation(format!(
                "Archive base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/chronicler/records/{segments...}` with each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(RECORDS_PATH).extend(segments);
        }
        url
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, url = %url, "Archive request failed");

        if status == StatusCode::NOT_FOUND {
            return Err(ViewerError::NotFound(if body.trim().is_empty() {
                url
            } else {
                body.trim().to_string()
            }));
        }
        Err(ViewerError::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[async_trait]
impl ArchiveApi for ArchiveApiClient {
    async fn list_record_sets(&self, page: &PageRequest) -> Result<RecordListResponse> {
        let mut query = vec![
            ("offset", page.offset.to_string()),
            ("size", page.size.to_string()),
        ];
        if let Some(q) = &page.query {
            query.push(("query", q.clone()));
        }

        let url = self.endpoint(&[]);
        tracing::debug!(%url, offset = page.offset, size = page.size, "Listing record sets");
        let response = self.client.get(url).query(&query).send().await?;
        let body = Self::check(response).await?.text().await?;
        RecordListResponse::from_json(&body)
    }

    async fn get_record_set(&self, id: &str) -> Result<RecordSet> {
        if id.trim().is_empty() {
            return Err(ViewerError::Validation(
                "Record set id cannot be empty".to_string(),
            ));
        }

        let url = self.endpoint(&[id]);
        tracing::debug!(%url, "Fetching record set");
        let response = self.client.get(url).send().await?;
        let body = Self::check(response).await?.text().await?;
        RecordSet::from_json(&body)
    }

    async fn get_file(&self, id: &str, filename: &str) -> Result<Vec<u8>> {
        if id.trim().is_empty() || filename.trim().is_empty() {
            return Err(ViewerError::Validation(
                "Record set id and file name are required".to_string(),
            ));
        }

        let url = self.endpoint(&[id]);
        tracing::debug!(%url, filename, "Fetching file");
        let response = self
            .client
            .get(url)
            .query(&[("file", filename)])
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn delete_record_sets(&self, ids: &[String]) -> Result<Vec<DeleteRecordResponse>> {
        let ids: Vec<&str> = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Err(ViewerError::Validation(
                "At least one record set id is required".to_string(),
            ));
        }

        let url = self.endpoint(&["delete"]);
        tracing::info!(count = ids.len(), "Deleting record sets");
        let response = self
            .client
            .get(url)
            .query(&[("ids", ids.join(","))])
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
