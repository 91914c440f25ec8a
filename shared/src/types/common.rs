use serde::{Deserialize, Serialize};

// Constants
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const FIRST_PAGE: u32 = 1;

/// Response envelope used by every backend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

/// One page request against a list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// List payload as sent by the backend.
///
/// Most list endpoints wrap the rows as `data: { <key>, pagination_info }`,
/// where the key depends on the endpoint. Unpaged endpoints send the rows
/// as a bare `data` array, which is read as the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageEnvelope<T> {
    Unpaged(Vec<T>),
    Paged {
        #[serde(
            default = "Vec::new",
            alias = "recentFiles",
            alias = "filesData",
            alias = "allUsers"
        )]
        items: Vec<T>,
        #[serde(default)]
        pagination_info: Option<PaginationInfo>,
    },
}

/// A page of items plus the cursor for the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}
