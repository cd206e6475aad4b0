//! Per-resource ownership checks
//!
//! Reading and mutating a resource go through the same check: there is no
//! case where a user may see something they may not change.

use crate::error::{Result, ShelfError};
use crate::types::{Album, UserId};

/// A resource that belongs to exactly one user
pub trait Owned {
    /// The owning user's id
    fn owner_id(&self) -> &UserId;

    /// Short description used in the `Forbidden` message
    fn describe(&self) -> String;
}

impl Owned for Album {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    fn describe(&self) -> String {
        format!("album {}", self.id)
    }
}

/// Fail with `Forbidden` unless `user_id` owns `resource`
pub fn assert_owner<R: Owned + ?Sized>(resource: &R, user_id: &UserId) -> Result<()> {
    if resource.owner_id() == user_id {
        Ok(())
    } else {
        Err(ShelfError::forbidden(format!(
            "{} does not belong to {}",
            resource.describe(),
            user_id
        )))
    }
}
