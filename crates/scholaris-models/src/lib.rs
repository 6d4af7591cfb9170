//! # Scholaris Models
//!
//! Domain models and DTOs for the Scholaris API.
//!
//! # Modules
//!
//! - [`accounts`]: stored accounts and the per-request [`Identity`]
//! - [`auth`]: login, refresh and logout DTOs
//! - [`directory`]: student, teacher and parent records and [`ResourceType`]

pub mod accounts;
pub mod auth;
pub mod directory;

// Re-export commonly used types at crate root for convenience
pub use accounts::{Account, Credentials, Identity};
pub use auth::{
    LoginRequest, LoginResponse, LogoutRequest, MessageResponse, RefreshTokenRequest,
    SessionResponse,
};
pub use directory::{ParentProfile, ResourceType, StudentProfile, TeacherProfile};
