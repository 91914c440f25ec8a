use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::{CommonError, Result};
use validator::Validate;

/// Object storage providers a project can be backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageService {
    #[serde(rename = "S3")]
    S3,
    #[serde(rename = "B2")]
    B2,
    #[serde(rename = "GCS")]
    Gcs,
    #[serde(rename = "DIGITAL_OCEAN")]
    DigitalOcean,
    #[serde(rename = "LINODE")]
    Linode,
    #[serde(rename = "MinIO")]
    MinIo,
    #[serde(rename = "AZURE")]
    Azure,
    #[serde(rename = "R2")]
    R2,
}

impl StorageService {
    pub const ALL: [StorageService; 8] = [
        StorageService::S3,
        StorageService::B2,
        StorageService::Gcs,
        StorageService::DigitalOcean,
        StorageService::Linode,
        StorageService::MinIo,
        StorageService::Azure,
        StorageService::R2,
    ];

    /// Value the backend stores in `compatibility_services`
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageService::S3 => "S3",
            StorageService::B2 => "B2",
            StorageService::Gcs => "GCS",
            StorageService::DigitalOcean => "DIGITAL_OCEAN",
            StorageService::Linode => "LINODE",
            StorageService::MinIo => "MinIO",
            StorageService::Azure => "AZURE",
            StorageService::R2 => "R2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StorageService::S3 => "Amazon S3",
            StorageService::B2 => "Backblaze B2",
            StorageService::Gcs => "Google Cloud Storage",
            StorageService::DigitalOcean => "Digital Ocean Spaces",
            StorageService::Linode => "Linode",
            StorageService::MinIo => "MinIO",
            StorageService::Azure => "Microsoft Azure Blob Storage",
            StorageService::R2 => "Cloudflare R2",
        }
    }
}

impl fmt::Display for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageService {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CommonError::ValidationFailed(format!("Unknown storage service: {}", wanted))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ManagementType {
    /// Storage provisioned and run by the platform
    Managed,
    /// Customer-supplied bucket and credentials
    Custom,
}

impl ManagementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagementType::Managed => "MANAGED",
            ManagementType::Custom => "CUSTOM",
        }
    }
}

impl FromStr for ManagementType {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "MANAGED" => Ok(ManagementType::Managed),
            "CUSTOM" => Ok(ManagementType::Custom),
            other => Err(CommonError::ValidationFailed(format!(
                "Unknown management type: {}",
                other
            ))),
        }
    }
}

/// A configured storage project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub compatibility_services: String,
    #[serde(default)]
    pub management_type: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub storage_type: Option<String>,
    #[serde(default)]
    pub bucket_name: Option<String>,
}

impl Project {
    /// Human name of the backing service, falling back to the raw value
    pub fn service_name(&self) -> &str {
        match self.compatibility_services.parse::<StorageService>() {
            Ok(service) => service.display_name(),
            Err(_) => &self.compatibility_services,
        }
    }
}

/// Body of the create-project request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProject {
    #[validate(length(min = 1, message = "Project title is required"))]
    pub title: String,

    pub compatibility_services: StorageService,

    pub management_type: ManagementType,

    pub key: String,

    pub secret_key: String,

    #[validate(length(min = 1, message = "Bucket name is required"))]
    pub bucket_name: String,

    #[validate(length(min = 1, message = "Region is required"))]
    pub region: String,
}

impl NewProject {
    /// Field checks plus the credentials a custom project needs
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.title.trim().is_empty() {
            return Err(CommonError::ValidationFailed("Project title is required".to_string()));
        }
        if self.management_type == ManagementType::Custom {
            if self.key.trim().is_empty() {
                return Err(CommonError::ValidationFailed(
                    "Access key is required for custom projects".to_string(),
                ));
            }
            if self.secret_key.trim().is_empty() {
                return Err(CommonError::ValidationFailed(
                    "Secret key is required for custom projects".to_string(),
                ));
            }
        }
        Ok(())
    }
}
