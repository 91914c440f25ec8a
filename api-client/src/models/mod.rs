//! Request and response payloads for the backend endpoints

pub mod auth;
pub mod dashboard;
pub mod file;
pub mod project;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, VerifyOtpRequest, OTP_LENGTH};
pub use dashboard::DashboardStats;
pub use file::{
    FileInfo, FileRecord, RegisterFileRequest, RegisteredFile, SignedUrlRequest, SignedUrlResponse,
    SignedWriteCredential,
};
pub use project::{ManagementType, NewProject, Project, StorageService};
pub use user::{NewUser, UserRecord, UserType};
