use shared::Result;
use tokio_util::sync::CancellationToken;

use crate::http::ApiTransport;
use crate::models::{DashboardStats, FileRecord};
use crate::pagination::{fetch_all, EndpointPager, FetchOutcome};

#[derive(Clone)]
pub struct DashboardService {
    transport: ApiTransport,
}

impl DashboardService {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let response = self.transport.get("dashboard/stats", &[]).await?;
        Ok(response
            .ensure_success("Failed to load dashboard stats")?
            .data
            .unwrap_or_default())
    }

    /// Recently touched files; the list arrives under `recentFiles`
    pub async fn recent_files(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome<FileRecord>> {
        let pager = EndpointPager::new(self.transport.clone(), "dashboard/recent-files");
        fetch_all(&pager, limit, cancel).await
    }
}
