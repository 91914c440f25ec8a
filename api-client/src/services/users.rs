use serde_json::Value;
use shared::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;
use validator::Validate;

use crate::http::ApiTransport;
use crate::models::{NewUser, UserRecord};
use crate::pagination::{fetch_all, EndpointPager, FetchOutcome};

#[derive(Clone)]
pub struct UsersService {
    transport: ApiTransport,
}

impl UsersService {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn list_all(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome<UserRecord>> {
        let pager = EndpointPager::new(self.transport.clone(), "users");
        fetch_all(&pager, limit, cancel).await
    }

    /// Invite a user; the backend's message is surfaced when it refuses
    pub async fn add(&self, user: NewUser) -> Result<()> {
        let user = user.normalized();
        user.validate()?;

        let response = self.transport.post::<_, Value>("users/add", &user).await?;
        response.ensure_success("Failed to add user")?;

        info!("Added user {}", user.email);
        Ok(())
    }
}
