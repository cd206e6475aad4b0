//! Human-readable album identifiers
//!
//! An album's id is `"{title}-by-{artist}"` reduced to a slug, suffixed with
//! the owner's id so two users can catalogue the same record. Collisions are
//! resolved by [`crate::catalog::generate_album_id`] using [`candidate`].

use crate::types::UserId;

/// Reduce text to a slug
///
/// Lowercases, drops everything except word characters (ASCII letters,
/// digits, `_`), whitespace and `-`, turns whitespace runs into a single `-`,
/// collapses repeated `-` and trims `-` from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.to_lowercase().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        let keep = c == '-' || c == '_' || c.is_ascii_alphanumeric();
        if !keep || (c == '-' && slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }

    slug.trim_matches('-').to_string()
}

/// Base slug for an album, before collision handling
pub fn album_slug(title: &str, artist: &str, owner: Option<&UserId>) -> String {
    let base = slugify(&format!("{title}-by-{artist}"));
    match owner {
        Some(owner) => format!("{base}-{owner}"),
        None => base,
    }
}

/// The `counter`-th candidate id for a base slug
///
/// `0` is the base itself, then `base-1`, `base-2`, ...
pub fn candidate(base: &str, counter: u32) -> String {
    if counter == 0 {
        base.to_string()
    } else {
        format!("{base}-{counter}")
    }
}
