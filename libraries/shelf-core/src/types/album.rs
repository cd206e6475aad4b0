/// Album domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AlbumId, UserId};
use super::validation::{FieldErrorKind, ValidationErrors};

/// Minimum title length, in characters, after trimming
pub const TITLE_MIN_LEN: usize = 3;

/// Earliest accepted release year
pub const YEAR_MIN: i32 = 1900;

/// Latest accepted release year
pub const YEAR_MAX: i32 = 5555;

/// Album in a user's catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Slug identifier, fixed at creation
    pub id: AlbumId,

    /// Album title
    pub title: String,

    /// Performing artist
    pub artist: String,

    /// Release year
    pub year: Option<i32>,

    /// Running time in minutes
    pub running_time: Option<i32>,

    /// Track titles in play order
    pub tracks: Vec<String>,

    /// Owning user
    pub owner_id: UserId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields of an `Album` that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlbumField {
    /// `title`
    Title,
    /// `artist`
    Artist,
    /// `year`
    Year,
    /// `runningTime`
    RunningTime,
    /// `tracks`
    Tracks,
}

/// The user-editable part of an album
///
/// Edits overwrite all of these at once; `id` and `owner_id` never change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumFields {
    /// Album title
    pub title: String,

    /// Performing artist
    pub artist: String,

    /// Release year
    pub year: Option<i32>,

    /// Running time in minutes
    pub running_time: Option<i32>,

    /// Track titles in play order
    pub tracks: Vec<String>,
}

impl AlbumFields {
    /// Create fields with just a title and artist
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    /// Set the release year
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the running time in minutes
    #[must_use]
    pub fn with_running_time(mut self, minutes: i32) -> Self {
        self.running_time = Some(minutes);
        self
    }

    /// Set the track list
    #[must_use]
    pub fn with_tracks<I, S>(mut self, tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracks = tracks.into_iter().map(Into::into).collect();
        self
    }

    /// Trim text fields in place
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.artist = self.artist.trim().to_string();
        self.tracks = self
            .tracks
            .iter()
            .map(|track| track.trim())
            .filter(|track| !track.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Check the declared field constraints
    pub fn validate(&self) -> Result<(), ValidationErrors<AlbumField>> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add(
                AlbumField::Title,
                FieldErrorKind::Required,
                "Title is required",
            );
        } else if title.chars().count() < TITLE_MIN_LEN {
            errors.add(AlbumField::Title, FieldErrorKind::TooShort, "That's too short");
        }

        if self.artist.trim().is_empty() {
            errors.add(
                AlbumField::Artist,
                FieldErrorKind::Required,
                "Artist is required",
            );
        }

        if let Some(year) = self.year {
            if year < YEAR_MIN {
                errors.add(AlbumField::Year, FieldErrorKind::TooSmall, "That's too old");
            } else if year > YEAR_MAX {
                errors.add(AlbumField::Year, FieldErrorKind::TooLarge, "That's the future");
            }
        }

        if matches!(self.running_time, Some(minutes) if minutes < 0) {
            errors.add(
                AlbumField::RunningTime,
                FieldErrorKind::TooSmall,
                "Running time can't be negative",
            );
        }

        errors.into_result()
    }
}

/// An album ready to be inserted, with its id already resolved
#[derive(Debug, Clone)]
pub struct NewAlbum {
    /// Collision-free slug id
    pub id: AlbumId,

    /// Owning user
    pub owner_id: UserId,

    /// Editable fields
    pub fields: AlbumFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_album_passes() {
        let fields = AlbumFields::new("OK Computer", "Radiohead")
            .with_year(1997)
            .with_running_time(53);
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn year_and_running_time_are_optional() {
        assert!(AlbumFields::new("Kid A", "Radiohead").validate().is_ok());
    }

    #[test]
    fn title_and_artist_are_required() {
        let errors = AlbumFields::new("", "  ").validate().unwrap_err();
        assert_eq!(
            errors.get(&AlbumField::Title).unwrap().kind,
            FieldErrorKind::Required
        );
        assert_eq!(
            errors.get(&AlbumField::Artist).unwrap().kind,
            FieldErrorKind::Required
        );
    }

    #[test]
    fn short_title_is_rejected() {
        let errors = AlbumFields::new("OK", "Radiohead").validate().unwrap_err();
        assert_eq!(
            errors.get(&AlbumField::Title).unwrap().kind,
            FieldErrorKind::TooShort
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(AlbumFields::new("Old", "Someone").with_year(1900).validate().is_ok());
        assert!(AlbumFields::new("Far", "Someone").with_year(5555).validate().is_ok());

        let too_old = AlbumFields::new("Old", "Someone").with_year(1899);
        assert_eq!(
            too_old.validate().unwrap_err().get(&AlbumField::Year).unwrap().kind,
            FieldErrorKind::TooSmall
        );

        let too_new = AlbumFields::new("Far", "Someone").with_year(5556);
        assert_eq!(
            too_new.validate().unwrap_err().get(&AlbumField::Year).unwrap().kind,
            FieldErrorKind::TooLarge
        );
    }

    #[test]
    fn normalize_trims_and_drops_blank_tracks() {
        let mut fields = AlbumFields::new("  Kid A ", " Radiohead")
            .with_tracks(["Everything In Its Right Place\r", "", "  Kid A  ", "   "]);
        fields.normalize();

        assert_eq!(fields.title, "Kid A");
        assert_eq!(fields.artist, "Radiohead");
        assert_eq!(fields.tracks, vec!["Everything In Its Right Place", "Kid A"]);
    }

    #[test]
    fn normalize_keeps_track_order() {
        let mut fields = AlbumFields::new("Abc", "Xyz").with_tracks(["C", "A", "B"]);
        fields.normalize();
        assert_eq!(fields.tracks, vec!["C", "A", "B"]);
    }
}
