//! Shelf Core
//!
//! Storage-agnostic domain types, traits, and error handling for Shelf, a
//! multi-user album catalogue.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Album`, their ids and per-field validation
//! - **Store Traits**: `UserStore`, `AlbumStore`, implemented by `shelf-storage`
//! - **Catalog Operations**: unique album id generation, create/update flows
//! - **Ownership**: the `Owned` trait and `assert_owner` check
//! - **Error Handling**: Unified `ShelfError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use shelf_core::slug::album_slug;
//! use shelf_core::types::UserId;
//!
//! let owner = UserId::new("u1");
//! let slug = album_slug("OK Computer", "Radiohead", Some(&owner));
//! assert_eq!(slug, "ok-computer-by-radiohead-u1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod ownership;
pub mod slug;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ShelfError};
pub use ownership::{assert_owner, Owned};
pub use storage::{AlbumStore, UserStore};

pub use types::{
    // Albums
    Album, AlbumField, AlbumFields, AlbumId, NewAlbum,
    // Users
    NewUser, User, UserCredentials, UserField, UserId,
    // Validation
    FieldError, FieldErrorKind, ValidationErrors,
};
