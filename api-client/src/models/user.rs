use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::{CommonError, Result};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    #[default]
    User,
    Admin,
}

impl FromStr for UserType {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Ok(UserType::User),
            "ADMIN" => Ok(UserType::Admin),
            other => Err(CommonError::ValidationFailed(format!("Unknown user type: {}", other))),
        }
    }
}

/// Row of the user administration table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub service: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub total_size: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Body of the add-user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub full_name: String,

    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    /// Blank phone numbers are sent as null
    pub phone: Option<String>,

    pub user_type: UserType,
}

impl NewUser {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            user_type: UserType::default(),
        }
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    /// Trim fields and turn a blank phone into `None`
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self
    }
}
