//! User management and credential queries

use chrono::{DateTime, Utc};
use shelf_core::{error::Result, types::*, ShelfError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        created_at: DateTime::from_timestamp(row.get("created_at"), 0).unwrap_or_default(),
    }
}

/// Create a user
///
/// The id is derived from the trimmed username. A taken username fails with
/// `ShelfError::Duplicate`.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    user.validate().map_err(ShelfError::UserInvalid)?;

    let id = user.id();
    let created_at = Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(created_at)
    .execute(pool)
    .await
    .map_err(|e| match ShelfError::from(e) {
        ShelfError::Duplicate(_) => {
            ShelfError::duplicate(format!("username {} is already taken", user.username))
        }
        other => other,
    })?;

    Ok(User {
        id,
        username: user.username,
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Look up a user by exact username, including the password hash
///
/// This is the only query that reads `password_hash`.
pub async fn find_credentials(pool: &SqlitePool, username: &str) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserCredentials {
        user: user_from_row(&row),
        password_hash: row.get("password_hash"),
    }))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, username, created_at FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Count users
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Delete every user
///
/// Their albums go with them through the foreign key cascade.
pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users").execute(pool).await?;
    Ok(result.rows_affected())
}
