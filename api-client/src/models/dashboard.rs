use serde::{Deserialize, Serialize};

/// Storage totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_file_size: u64,
    #[serde(default)]
    pub total_folders: u64,
    #[serde(default)]
    pub total_categories: u64,
    #[serde(default)]
    pub total_tags: u64,
}
