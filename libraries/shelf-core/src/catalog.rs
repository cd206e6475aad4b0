//! Album catalogue operations
//!
//! These compose the store traits with validation, id generation and the
//! ownership check. Request handlers call these instead of the store
//! directly so every path enforces the same rules.

use crate::error::{Result, ShelfError};
use crate::ownership::assert_owner;
use crate::slug::{album_slug, candidate};
use crate::storage::AlbumStore;
use crate::types::{Album, AlbumFields, AlbumId, NewAlbum, UserId};

/// Find the first free id for an album
///
/// Probes `slug`, `slug-1`, `slug-2`, ... until the store reports no album
/// with that id. A store error aborts the probe.
pub async fn generate_album_id<S: AlbumStore + ?Sized>(
    store: &S,
    title: &str,
    artist: &str,
    owner: Option<&UserId>,
) -> Result<AlbumId> {
    let base = album_slug(title, artist, owner);
    let mut counter = 0;

    loop {
        let id = AlbumId::new(candidate(&base, counter));
        if !store.album_exists(&id).await? {
            return Ok(id);
        }
        counter += 1;
    }
}

/// Validate and insert a new album owned by `owner`
///
/// The probe-then-insert sequence can race with a concurrent creation of the
/// same slug. The store's primary key catches that; the probe and insert are
/// then repeated once before giving up with `Duplicate`.
pub async fn create_album<S: AlbumStore + ?Sized>(
    store: &S,
    owner: &UserId,
    mut fields: AlbumFields,
) -> Result<Album> {
    fields.normalize();
    fields.validate().map_err(ShelfError::AlbumInvalid)?;

    let mut retried = false;
    loop {
        let id = generate_album_id(store, &fields.title, &fields.artist, Some(owner)).await?;
        let album = NewAlbum {
            id: id.clone(),
            owner_id: owner.clone(),
            fields: fields.clone(),
        };

        match store.insert_album(album).await {
            Err(err) if err.is_duplicate() && !retried => {
                tracing::warn!("Album id {} was taken concurrently, probing again", id);
                retried = true;
            }
            result => return result,
        }
    }
}

/// Load an album on behalf of `user_id`
///
/// `NotFound` if it doesn't exist, `Forbidden` if it belongs to someone else.
pub async fn get_owned_album<S: AlbumStore + ?Sized>(
    store: &S,
    id: &AlbumId,
    user_id: &UserId,
) -> Result<Album> {
    let album = store
        .get_album(id)
        .await?
        .ok_or_else(|| ShelfError::not_found("Album", id.as_str()))?;
    assert_owner(&album, user_id)?;
    Ok(album)
}

/// Overwrite an album's editable fields on behalf of `user_id`
pub async fn update_owned_album<S: AlbumStore + ?Sized>(
    store: &S,
    id: &AlbumId,
    user_id: &UserId,
    mut fields: AlbumFields,
) -> Result<Album> {
    get_owned_album(store, id, user_id).await?;

    fields.normalize();
    fields.validate().map_err(ShelfError::AlbumInvalid)?;

    store.update_album(id, fields).await
}

/// Delete an album on behalf of `user_id`
pub async fn delete_owned_album<S: AlbumStore + ?Sized>(
    store: &S,
    id: &AlbumId,
    user_id: &UserId,
) -> Result<()> {
    get_owned_album(store, id, user_id).await?;
    store.delete_album(id).await?;
    Ok(())
}

/// The albums of `owner`, optionally filtered by a search term
///
/// The term is trimmed and matched case-insensitively against title and
/// artist. A blank term returns everything.
pub async fn list_albums<S: AlbumStore + ?Sized>(
    store: &S,
    owner: &UserId,
    query: Option<&str>,
) -> Result<Vec<Album>> {
    let albums = store.list_albums_by_owner(owner).await?;

    let term = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    if term.is_empty() {
        return Ok(albums);
    }

    Ok(albums
        .into_iter()
        .filter(|album| {
            album.title.to_lowercase().contains(&term)
                || album.artist.to_lowercase().contains(&term)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlbumField;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Album store backed by a map
    ///
    /// `phantom_inserts` makes that many inserts fail with `Duplicate` after
    /// stashing the album, as if another request had won the race.
    #[derive(Default)]
    struct MemoryAlbums {
        albums: Mutex<BTreeMap<AlbumId, Album>>,
        phantom_inserts: AtomicUsize,
        fail_probes: bool,
    }

    #[async_trait]
    impl AlbumStore for MemoryAlbums {
        async fn album_exists(&self, id: &AlbumId) -> Result<bool> {
            if self.fail_probes {
                return Err(ShelfError::storage("store unavailable"));
            }
            Ok(self.albums.lock().unwrap().contains_key(id))
        }

        async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>> {
            Ok(self.albums.lock().unwrap().get(id).cloned())
        }

        async fn list_albums_by_owner(&self, owner: &UserId) -> Result<Vec<Album>> {
            let mut albums: Vec<Album> = self
                .albums
                .lock()
                .unwrap()
                .values()
                .filter(|album| &album.owner_id == owner)
                .cloned()
                .collect();
            albums.sort_by(|a, b| a.title.cmp(&b.title));
            Ok(albums)
        }

        async fn count_albums(&self) -> Result<i64> {
            Ok(self.albums.lock().unwrap().len() as i64)
        }

        async fn insert_album(&self, album: NewAlbum) -> Result<Album> {
            let now = Utc::now();
            let stored = Album {
                id: album.id.clone(),
                title: album.fields.title,
                artist: album.fields.artist,
                year: album.fields.year,
                running_time: album.fields.running_time,
                tracks: album.fields.tracks,
                owner_id: album.owner_id,
                created_at: now,
                updated_at: now,
            };

            let mut albums = self.albums.lock().unwrap();
            if self.phantom_inserts.load(Ordering::SeqCst) > 0 {
                self.phantom_inserts.fetch_sub(1, Ordering::SeqCst);
                albums.insert(album.id.clone(), stored);
                return Err(ShelfError::duplicate(album.id.to_string()));
            }
            if albums.contains_key(&album.id) {
                return Err(ShelfError::duplicate(album.id.to_string()));
            }
            albums.insert(album.id, stored.clone());
            Ok(stored)
        }

        async fn update_album(&self, id: &AlbumId, fields: AlbumFields) -> Result<Album> {
            let mut albums = self.albums.lock().unwrap();
            let album = albums
                .get_mut(id)
                .ok_or_else(|| ShelfError::not_found("Album", id.as_str()))?;
            album.title = fields.title;
            album.artist = fields.artist;
            album.year = fields.year;
            album.running_time = fields.running_time;
            album.tracks = fields.tracks;
            album.updated_at = Utc::now();
            Ok(album.clone())
        }

        async fn delete_album(&self, id: &AlbumId) -> Result<u64> {
            Ok(u64::from(self.albums.lock().unwrap().remove(id).is_some()))
        }

        async fn delete_all_albums(&self) -> Result<u64> {
            let mut albums = self.albums.lock().unwrap();
            let count = albums.len() as u64;
            albums.clear();
            Ok(count)
        }
    }

    fn ok_computer() -> AlbumFields {
        AlbumFields::new("OK Computer", "Radiohead").with_year(1997)
    }

    #[tokio::test]
    async fn first_album_gets_base_slug() {
        let store = MemoryAlbums::default();
        let album = create_album(&store, &UserId::new("u1"), ok_computer())
            .await
            .unwrap();
        assert_eq!(album.id.as_str(), "ok-computer-by-radiohead-u1");
    }

    #[tokio::test]
    async fn collisions_get_smallest_free_suffix() {
        let store = MemoryAlbums::default();
        let owner = UserId::new("u1");

        let first = create_album(&store, &owner, ok_computer()).await.unwrap();
        let second = create_album(&store, &owner, ok_computer()).await.unwrap();
        let third = create_album(&store, &owner, ok_computer()).await.unwrap();

        assert_eq!(first.id.as_str(), "ok-computer-by-radiohead-u1");
        assert_eq!(second.id.as_str(), "ok-computer-by-radiohead-u1-1");
        assert_eq!(third.id.as_str(), "ok-computer-by-radiohead-u1-2");

        // Freeing the -1 slot makes it the next pick again
        store.delete_album(&second.id).await.unwrap();
        let refill = create_album(&store, &owner, ok_computer()).await.unwrap();
        assert_eq!(refill.id.as_str(), "ok-computer-by-radiohead-u1-1");
    }

    #[tokio::test]
    async fn same_record_for_different_users_does_not_collide() {
        let store = MemoryAlbums::default();
        let a = create_album(&store, &UserId::new("u1"), ok_computer()).await.unwrap();
        let b = create_album(&store, &UserId::new("u2"), ok_computer()).await.unwrap();
        assert_eq!(a.id.as_str(), "ok-computer-by-radiohead-u1");
        assert_eq!(b.id.as_str(), "ok-computer-by-radiohead-u2");
    }

    #[tokio::test]
    async fn lost_race_is_retried_once() {
        let store = MemoryAlbums {
            phantom_inserts: AtomicUsize::new(1),
            ..MemoryAlbums::default()
        };

        let album = create_album(&store, &UserId::new("u1"), ok_computer())
            .await
            .unwrap();
        assert_eq!(album.id.as_str(), "ok-computer-by-radiohead-u1-1");
    }

    #[tokio::test]
    async fn second_lost_race_is_a_conflict() {
        let store = MemoryAlbums {
            phantom_inserts: AtomicUsize::new(2),
            ..MemoryAlbums::default()
        };

        let err = create_album(&store, &UserId::new("u1"), ok_computer())
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn probe_failure_aborts_creation() {
        let store = MemoryAlbums {
            fail_probes: true,
            ..MemoryAlbums::default()
        };

        let err = create_album(&store, &UserId::new("u1"), ok_computer())
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::Storage(_)));
        assert_eq!(store.albums.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected_before_probing() {
        let store = MemoryAlbums {
            fail_probes: true,
            ..MemoryAlbums::default()
        };

        let err = create_album(&store, &UserId::new("u1"), AlbumFields::new("OK", ""))
            .await
            .unwrap_err();
        let ShelfError::AlbumInvalid(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get(&AlbumField::Title).is_some());
        assert!(errors.get(&AlbumField::Artist).is_some());
    }

    #[tokio::test]
    async fn tracks_keep_their_order() {
        let store = MemoryAlbums::default();
        let owner = UserId::new("u1");
        let album = create_album(&store, &owner, ok_computer().with_tracks(["A", "B", "C"]))
            .await
            .unwrap();

        let loaded = get_owned_album(&store, &album.id, &owner).await.unwrap();
        assert_eq!(loaded.tracks, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn other_users_cannot_read_update_or_delete() {
        let store = MemoryAlbums::default();
        let owner = UserId::new("u1");
        let intruder = UserId::new("u2");
        let album = create_album(&store, &owner, ok_computer()).await.unwrap();

        assert!(matches!(
            get_owned_album(&store, &album.id, &intruder).await,
            Err(ShelfError::Forbidden(_))
        ));
        assert!(matches!(
            update_owned_album(&store, &album.id, &intruder, ok_computer()).await,
            Err(ShelfError::Forbidden(_))
        ));
        assert!(matches!(
            delete_owned_album(&store, &album.id, &intruder).await,
            Err(ShelfError::Forbidden(_))
        ));
        assert!(store.album_exists(&album.id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_album_is_not_found() {
        let store = MemoryAlbums::default();
        let err = get_owned_album(&store, &AlbumId::new("nope"), &UserId::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_keeps_the_id() {
        let store = MemoryAlbums::default();
        let owner = UserId::new("u1");
        let album = create_album(&store, &owner, ok_computer()).await.unwrap();

        let updated = update_owned_album(
            &store,
            &album.id,
            &owner,
            AlbumFields::new("Kid A", "Radiohead").with_year(2000),
        )
        .await
        .unwrap();

        assert_eq!(updated.id, album.id);
        assert_eq!(updated.title, "Kid A");
        assert_eq!(updated.year, Some(2000));
    }

    #[tokio::test]
    async fn list_filters_on_title_or_artist() {
        let store = MemoryAlbums::default();
        let owner = UserId::new("u1");
        create_album(&store, &owner, ok_computer()).await.unwrap();
        create_album(&store, &owner, AlbumFields::new("Blue Train", "John Coltrane"))
            .await
            .unwrap();
        create_album(&store, &UserId::new("u2"), AlbumFields::new("Kid A", "Radiohead"))
            .await
            .unwrap();

        let all = list_albums(&store, &owner, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_artist = list_albums(&store, &owner, Some("  RADIO ")).await.unwrap();
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].title, "OK Computer");

        let by_title = list_albums(&store, &owner, Some("train")).await.unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].artist, "John Coltrane");

        let blank = list_albums(&store, &owner, Some("   ")).await.unwrap();
        assert_eq!(blank.len(), 2);
    }
}
