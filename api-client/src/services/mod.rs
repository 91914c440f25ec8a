//! Thin wrappers over the backend endpoints, one per dashboard area

pub mod auth;
pub mod dashboard;
pub mod files;
pub mod projects;
pub mod users;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use files::FilesService;
pub use projects::ProjectsService;
pub use users::UsersService;
