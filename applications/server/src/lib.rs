//! Shelf Server Library
//!
//! Multi-user album catalogue with cookie sessions and per-user ownership.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod seed;
pub mod services;
pub mod session;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{FormRejection, Result, ServerError};
pub use services::auth::AuthService;
pub use session::Session;
pub use state::AppState;
