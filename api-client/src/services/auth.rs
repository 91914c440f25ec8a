use serde_json::Value;
use shared::{ApiResponse, CommonError, Result};
use tracing::info;
use validator::Validate;

use crate::http::ApiTransport;
use crate::models::{LoginRequest, LoginResponse, VerifyOtpRequest, OTP_LENGTH};
use crate::session::UserProfile;

const DEFAULT_LOGIN_ERROR: &str = "Email not found";

/// Email + one-time-password login
#[derive(Clone)]
pub struct AuthService {
    transport: ApiTransport,
}

impl AuthService {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Ask the backend to email a one-time password
    pub async fn request_otp(&self, email: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;

        let response: ApiResponse<Value> = self.transport.post("users/login", &request).await?;
        response.ensure_success(DEFAULT_LOGIN_ERROR)?;

        info!("One-time password sent to {}", request.email);
        Ok(())
    }

    /// Exchange the emailed OTP for tokens and store them in the context
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<UserProfile> {
        let request = VerifyOtpRequest {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        request.validate()?;
        if !request.otp_is_numeric() {
            return Err(CommonError::ValidationFailed(format!(
                "OTP must be {} digits",
                OTP_LENGTH
            )));
        }

        let login: LoginResponse = self
            .transport
            .post("users/verify-otp", &request)
            .await?
            .ensure_success(DEFAULT_LOGIN_ERROR)?
            .into_data()?;

        if login.access_token.is_empty() {
            return Err(CommonError::Unauthorized("No access token returned".to_string()));
        }

        let user = login.user_details;
        self.transport
            .context()
            .set_login(login.access_token, login.refresh_token, user.clone())?;

        info!("Signed in as {}", user.email);
        Ok(user)
    }

    /// Drop the stored session
    pub fn logout(&self) -> Result<()> {
        self.transport.context().clear()?;
        info!("Signed out");
        Ok(())
    }
}
