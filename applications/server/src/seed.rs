//! Sample data for development databases
//!
//! Reseeding wipes every album and user, then recreates the sample users and
//! gives each of them [`ALBUMS_PER_USER`] sample albums. User *i* gets albums
//! *i*, *i+1*, *i+2* (wrapping), so the result is the same on every run.

use crate::{error::Result, services::AuthService};
use serde::Serialize;
use shelf_core::{catalog, AlbumFields, AlbumStore, NewUser, UserStore};

/// Albums created for each sample user
pub const ALBUMS_PER_USER: usize = 3;

/// A sample account
pub struct SeedUser {
    pub username: &'static str,
    pub password: &'static str,
}

/// A sample album
pub struct SeedAlbum {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: i32,
    pub running_time: i32,
    pub tracks: &'static [&'static str],
}

impl SeedAlbum {
    fn fields(&self) -> AlbumFields {
        AlbumFields::new(self.title, self.artist)
            .with_year(self.year)
            .with_running_time(self.running_time)
            .with_tracks(self.tracks.iter().copied())
    }
}

pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "alice",
        password: "alicepassword",
    },
    SeedUser {
        username: "bob",
        password: "bobpassword",
    },
    SeedUser {
        username: "carol",
        password: "carolpassword",
    },
];

pub const SEED_ALBUMS: &[SeedAlbum] = &[
    SeedAlbum {
        title: "OK Computer",
        artist: "Radiohead",
        year: 1997,
        running_time: 53,
        tracks: &[
            "Airbag",
            "Paranoid Android",
            "Subterranean Homesick Alien",
            "Exit Music (For a Film)",
            "Let Down",
            "Karma Police",
        ],
    },
    SeedAlbum {
        title: "Homogenic",
        artist: "Björk",
        year: 1997,
        running_time: 43,
        tracks: &["Hunter", "Jóga", "Unravel", "Bachelorette", "All Neon Like"],
    },
    SeedAlbum {
        title: "Blue Lines",
        artist: "Massive Attack",
        year: 1991,
        running_time: 45,
        tracks: &[
            "Safe from Harm",
            "One Love",
            "Blue Lines",
            "Be Thankful for What You've Got",
            "Unfinished Sympathy",
        ],
    },
    SeedAlbum {
        title: "Dummy",
        artist: "Portishead",
        year: 1994,
        running_time: 49,
        tracks: &["Mysterons", "Sour Times", "Strangers", "It Could Be Sweet", "Wandering Star"],
    },
    SeedAlbum {
        title: "Kind of Blue",
        artist: "Miles Davis",
        year: 1959,
        running_time: 46,
        tracks: &["So What", "Freddie Freeloader", "Blue in Green", "All Blues", "Flamenco Sketches"],
    },
    SeedAlbum {
        title: "Remain in Light",
        artist: "Talking Heads",
        year: 1980,
        running_time: 40,
        tracks: &[
            "Born Under Punches",
            "Crosseyed and Painless",
            "The Great Curve",
            "Once in a Lifetime",
        ],
    },
];

/// Row counts in the database next to the size of the sample set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub db_users_count: i64,
    pub db_albums_count: i64,
    pub seed_users_count: usize,
    pub seed_albums_count: usize,
}

/// Count what is in the database now
pub async fn report<S>(store: &S) -> Result<SeedReport>
where
    S: UserStore + AlbumStore + ?Sized,
{
    Ok(SeedReport {
        db_users_count: store.count_users().await?,
        db_albums_count: store.count_albums().await?,
        seed_users_count: SEED_USERS.len(),
        seed_albums_count: SEED_ALBUMS.len(),
    })
}

/// Replace every user and album with the sample data
pub async fn reseed<S>(store: &S, auth_service: &AuthService) -> Result<SeedReport>
where
    S: UserStore + AlbumStore + ?Sized,
{
    let deleted_albums = store.delete_all_albums().await?;
    tracing::info!("Seeding: deleted {} albums", deleted_albums);
    let deleted_users = store.delete_all_users().await?;
    tracing::info!("Seeding: deleted {} users", deleted_users);

    for (i, seed_user) in SEED_USERS.iter().enumerate() {
        let password_hash = auth_service.hash_password(seed_user.password)?;
        let user = store
            .create_user(NewUser::new(seed_user.username, password_hash))
            .await?;

        for offset in 0..ALBUMS_PER_USER {
            let album = &SEED_ALBUMS[(i + offset) % SEED_ALBUMS.len()];
            catalog::create_album(store, &user.id, album.fields()).await?;
        }

        tracing::info!(
            "Seeding: created {} albums for user {}",
            ALBUMS_PER_USER,
            user.username
        );
    }

    report(store).await
}
