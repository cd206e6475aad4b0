mod album;
mod ids;
mod user;
mod validation;

pub use album::{Album, AlbumField, AlbumFields, NewAlbum};
pub use ids::{AlbumId, UserId};
pub use user::{is_username_char, NewUser, User, UserCredentials, UserField};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};
