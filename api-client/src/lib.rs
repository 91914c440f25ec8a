//! FileDeck API client
//!
//! Talks to the FileDeck backend on behalf of the dashboard: listing
//! collections page by page, uploading files through signed storage URLs,
//! OTP login and the administration calls for projects and users.

pub mod config;
pub mod http;
pub mod models;
pub mod pagination;
pub mod services;
pub mod session;
pub mod upload;
pub mod utils;

use std::sync::Arc;

use shared::Result;
use tracing::debug;

pub use crate::config::ClientConfig;
pub use http::ApiTransport;
pub use pagination::{fetch_all, EndpointPager, FetchOutcome, PageLoader};
pub use services::{AuthService, DashboardService, FilesService, ProjectsService, UsersService};
pub use session::{AppContext, AuthState, FileSessionStore, MemorySessionStore, SessionStore, UserProfile};
pub use upload::{
    HttpUploadBackend, LocalFile, ProgressReporter, SilentReporter, TransferPayload, UploadBackend,
    UploadOptions, UploadOrchestrator, UploadQueue, UploadReport, UploadStatus, UploadTask,
    UploadedFile,
};

/// Entry point bundling the transport, the session and the page size
#[derive(Clone)]
pub struct FileDeckClient {
    transport: ApiTransport,
    page_limit: u32,
}

impl FileDeckClient {
    pub fn new(config: &ClientConfig, context: AppContext) -> Result<Self> {
        config.validate()?;
        let transport = ApiTransport::new(&config.api, context)?;
        Ok(Self {
            transport,
            page_limit: config.api.page_limit,
        })
    }

    /// Client whose session is persisted to the configured session file
    pub fn with_file_session(config: &ClientConfig) -> Result<Self> {
        let store = FileSessionStore::new(config.session_path()?);
        debug!("Using session file {}", store.path().display());
        Self::new(config, AppContext::load(Arc::new(store)))
    }

    pub fn context(&self) -> &AppContext {
        self.transport.context()
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.transport.clone())
    }

    pub fn files(&self) -> FilesService {
        FilesService::new(self.transport.clone())
    }

    pub fn projects(&self) -> ProjectsService {
        ProjectsService::new(self.transport.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.transport.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.transport.clone())
    }
}
