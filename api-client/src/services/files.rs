use std::path::Path;

use serde_json::Value;
use shared::{CommonError, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::http::ApiTransport;
use crate::models::{FileInfo, FileRecord};
use crate::pagination::{fetch_all, EndpointPager, FetchOutcome};
use crate::upload::{HttpUploadBackend, UploadOrchestrator};

#[derive(Clone)]
pub struct FilesService {
    transport: ApiTransport,
}

impl FilesService {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn list_all(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome<FileRecord>> {
        let pager = EndpointPager::new(self.transport.clone(), "files");
        fetch_all(&pager, limit, cancel).await
    }

    pub async fn info(&self, id: i64) -> Result<FileInfo> {
        self.transport
            .get(&format!("files/{}/info", id), &[])
            .await?
            .ensure_success("Failed to load file info")?
            .into_data()
    }

    /// Short-lived URL the file can be downloaded from
    pub async fn download_url(&self, id: i64) -> Result<String> {
        let url: String = self
            .transport
            .get(&format!("files/{}/download", id), &[])
            .await?
            .ensure_success("Download request failed")?
            .into_data()?;

        if url.trim().is_empty() {
            return Err(CommonError::Decode("No download URL returned".to_string()));
        }
        Ok(url)
    }

    /// Fetch the file's bytes and write them to `destination`, returning the byte count
    pub async fn download_to(&self, id: i64, destination: &Path) -> Result<u64> {
        let url = self.download_url(id).await?;
        let contents = self.transport.get_bytes(&url).await?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, &contents).await?;

        info!("Downloaded file {} to {}", id, destination.display());
        Ok(contents.len() as u64)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .transport
            .delete::<Value>(&format!("files/{}", id))
            .await?;
        response.ensure_success("Failed to delete file")?;

        debug!("Deleted file {}", id);
        Ok(())
    }

    /// Orchestrator that uploads through this client's transport
    pub fn uploader(&self) -> UploadOrchestrator<HttpUploadBackend> {
        UploadOrchestrator::new(HttpUploadBackend::new(self.transport.clone()))
    }
}
