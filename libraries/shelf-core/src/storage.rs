//! Store traits for users and albums
//!
//! `shelf-storage` implements these on top of `SQLite`; tests substitute
//! mocks. Unique key violations must surface as [`ShelfError::Duplicate`].
//!
//! [`ShelfError::Duplicate`]: crate::ShelfError::Duplicate

use crate::error::Result;
use crate::types::{Album, AlbumFields, AlbumId, NewAlbum, NewUser, User, UserCredentials, UserId};
use async_trait::async_trait;

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user; fails with `Duplicate` if the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Look up a user by exact username, including the password hash
    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;

    /// All users, ordered by username
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Number of users
    async fn count_users(&self) -> Result<i64>;

    /// Delete every user, returning how many were removed
    async fn delete_all_users(&self) -> Result<u64>;
}

/// Persistence for albums
#[async_trait]
pub trait AlbumStore: Send + Sync {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Whether an album with this id exists
    async fn album_exists(&self, id: &AlbumId) -> Result<bool>;

    /// Get album by ID, with tracks in order
    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>>;

    /// All albums owned by `owner`, ordered by title
    async fn list_albums_by_owner(&self, owner: &UserId) -> Result<Vec<Album>>;

    /// Number of albums across all users
    async fn count_albums(&self) -> Result<i64>;

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert an album; fails with `Duplicate` if the id is taken
    async fn insert_album(&self, album: NewAlbum) -> Result<Album>;

    /// Overwrite the editable fields of an album
    async fn update_album(&self, id: &AlbumId, fields: AlbumFields) -> Result<Album>;

    /// Delete an album, returning how many rows were removed
    async fn delete_album(&self, id: &AlbumId) -> Result<u64>;

    /// Delete every album, returning how many were removed
    async fn delete_all_albums(&self) -> Result<u64>;
}
