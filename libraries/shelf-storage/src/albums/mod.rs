//! Album queries
//!
//! Track lists live in `album_tracks`, one row per track, ordered by
//! `position`. Every write that touches an album and its tracks runs in a
//! single transaction.

use chrono::{DateTime, Utc};
use shelf_core::{error::Result, types::*, ShelfError};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

const ALBUM_COLUMNS: &str =
    "id, title, artist, year, running_time, owner_id, created_at, updated_at";

fn album_from_row(row: &SqliteRow, tracks: Vec<String>) -> Album {
    Album {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        year: row.get("year"),
        running_time: row.get("running_time"),
        tracks,
        owner_id: row.get("owner_id"),
        created_at: DateTime::from_timestamp(row.get("created_at"), 0).unwrap_or_default(),
        updated_at: DateTime::from_timestamp(row.get("updated_at"), 0).unwrap_or_default(),
    }
}

async fn get_tracks(pool: &SqlitePool, id: &AlbumId) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT title FROM album_tracks WHERE album_id = ? ORDER BY position")
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(|row| row.get("title")).collect())
}

async fn insert_tracks(
    tx: &mut Transaction<'_, Sqlite>,
    id: &AlbumId,
    tracks: &[String],
) -> Result<()> {
    for (position, title) in tracks.iter().enumerate() {
        sqlx::query("INSERT INTO album_tracks (album_id, position, title) VALUES (?, ?, ?)")
            .bind(id)
            .bind(position as i64)
            .bind(title)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Whether an album with this id exists
pub async fn exists(pool: &SqlitePool, id: &AlbumId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM albums WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Get album by ID, with its tracks in order
pub async fn get_by_id(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(&format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let tracks = get_tracks(pool, id).await?;
    Ok(Some(album_from_row(&row, tracks)))
}

/// Get a user's albums, ordered by title
pub async fn get_by_owner(pool: &SqlitePool, owner: &UserId) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums WHERE owner_id = ? ORDER BY title COLLATE NOCASE, id"
    ))
    .bind(owner)
    .fetch_all(pool)
    .await?;

    // One query for every track of every album this user owns
    let track_rows = sqlx::query(
        r#"
        SELECT t.album_id, t.title
        FROM album_tracks t
        INNER JOIN albums a ON a.id = t.album_id
        WHERE a.owner_id = ?
        ORDER BY t.album_id, t.position
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    let mut tracks: HashMap<AlbumId, Vec<String>> = HashMap::new();
    for row in &track_rows {
        tracks
            .entry(row.get("album_id"))
            .or_default()
            .push(row.get("title"));
    }

    Ok(rows
        .iter()
        .map(|row| {
            let id: AlbumId = row.get("id");
            album_from_row(row, tracks.remove(&id).unwrap_or_default())
        })
        .collect())
}

/// Insert a new album and its tracks
///
/// Fails with `ShelfError::Duplicate` if the id is already taken.
pub async fn create(pool: &SqlitePool, album: NewAlbum) -> Result<Album> {
    let now = Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO albums (id, title, artist, year, running_time, owner_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&album.id)
    .bind(&album.fields.title)
    .bind(&album.fields.artist)
    .bind(album.fields.year)
    .bind(album.fields.running_time)
    .bind(&album.owner_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_tracks(&mut tx, &album.id, &album.fields.tracks).await?;

    tx.commit().await?;

    let created_at = DateTime::from_timestamp(now, 0).unwrap_or_default();
    Ok(Album {
        id: album.id,
        title: album.fields.title,
        artist: album.fields.artist,
        year: album.fields.year,
        running_time: album.fields.running_time,
        tracks: album.fields.tracks,
        owner_id: album.owner_id,
        created_at,
        updated_at: created_at,
    })
}

/// Overwrite an album's editable fields and replace its track list
pub async fn update(pool: &SqlitePool, id: &AlbumId, fields: AlbumFields) -> Result<Album> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE albums
        SET title = ?, artist = ?, year = ?, running_time = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.artist)
    .bind(fields.year)
    .bind(fields.running_time)
    .bind(Utc::now().timestamp())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ShelfError::not_found("Album", id.as_str()));
    }

    sqlx::query("DELETE FROM album_tracks WHERE album_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    insert_tracks(&mut tx, id, &fields.tracks).await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| ShelfError::not_found("Album", id.as_str()))
}

/// Delete an album (tracks cascade)
pub async fn delete(pool: &SqlitePool, id: &AlbumId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Count all albums
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM albums")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Delete every album
pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM albums").execute(pool).await?;
    Ok(result.rows_affected())
}
