use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::session::UserProfile;

pub const OTP_LENGTH: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(equal = 4))]
    pub otp: String,
}

impl VerifyOtpRequest {
    /// The OTP screen only accepts digits
    pub fn otp_is_numeric(&self) -> bool {
        self.otp.len() == OTP_LENGTH && self.otp.chars().all(|c| c.is_ascii_digit())
    }
}

/// Payload of a successful OTP verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_details: UserProfile,
}
