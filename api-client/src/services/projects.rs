use serde_json::Value;
use shared::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::ApiTransport;
use crate::models::{NewProject, Project};
use crate::pagination::{fetch_all, EndpointPager, FetchOutcome};

#[derive(Clone)]
pub struct ProjectsService {
    transport: ApiTransport,
}

impl ProjectsService {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn list_all(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome<Project>> {
        let pager = EndpointPager::new(self.transport.clone(), "projects");
        fetch_all(&pager, limit, cancel).await
    }

    /// Validate and create a storage project
    pub async fn create(&self, project: NewProject) -> Result<()> {
        project.check()?;

        let response = self.transport.post::<_, Value>("projects", &project).await?;
        response.ensure_success("Failed to create project")?;

        info!(
            "Created project {} on {}",
            project.title, project.compatibility_services
        );
        Ok(())
    }
}
