use crate::{albums, users};
use async_trait::async_trait;
use shelf_core::{error::Result, storage::*, types::*};
use sqlx::SqlitePool;

/// `SQLite`-backed store for users and albums
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        users::find_credentials(&self.pool, username).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn count_users(&self) -> Result<i64> {
        users::count(&self.pool).await
    }

    async fn delete_all_users(&self) -> Result<u64> {
        users::delete_all(&self.pool).await
    }
}

#[async_trait]
impl AlbumStore for SqliteStore {
    async fn album_exists(&self, id: &AlbumId) -> Result<bool> {
        albums::exists(&self.pool, id).await
    }

    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>> {
        albums::get_by_id(&self.pool, id).await
    }

    async fn list_albums_by_owner(&self, owner: &UserId) -> Result<Vec<Album>> {
        albums::get_by_owner(&self.pool, owner).await
    }

    async fn count_albums(&self) -> Result<i64> {
        albums::count(&self.pool).await
    }

    async fn insert_album(&self, album: NewAlbum) -> Result<Album> {
        albums::create(&self.pool, album).await
    }

    async fn update_album(&self, id: &AlbumId, fields: AlbumFields) -> Result<Album> {
        albums::update(&self.pool, id, fields).await
    }

    async fn delete_album(&self, id: &AlbumId) -> Result<u64> {
        albums::delete(&self.pool, id).await
    }

    async fn delete_all_albums(&self) -> Result<u64> {
        albums::delete_all(&self.pool).await
    }
}
