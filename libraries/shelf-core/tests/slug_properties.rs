//! Property-based tests for album slugs

use proptest::prelude::*;
use shelf_core::slug::{album_slug, candidate, slugify};
use shelf_core::types::UserId;

fn is_slug_char(c: char) -> bool {
    c == '-' || c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit()
}

proptest! {
    #[test]
    fn slug_only_contains_slug_characters(text in any::<String>()) {
        let slug = slugify(&text);
        prop_assert!(slug.chars().all(is_slug_char), "unexpected char in {:?}", slug);
    }

    #[test]
    fn slug_has_no_edge_or_doubled_hyphens(text in any::<String>()) {
        let slug = slugify(&text);
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn slugify_is_idempotent(text in any::<String>()) {
        let once = slugify(&text);
        prop_assert_eq!(slugify(&once), once.clone());
    }

    #[test]
    fn album_slug_joins_title_and_artist_slugs(
        title in "[A-Za-z0-9]{1,12}( [A-Za-z0-9]{1,12}){0,3}",
        artist in "[A-Za-z0-9]{1,12}( [A-Za-z0-9]{1,12}){0,3}",
        owner in "[a-z0-9]{1,8}",
    ) {
        let owner = UserId::new(owner);
        let expected = format!("{}-by-{}-{}", slugify(&title), slugify(&artist), owner);
        prop_assert_eq!(album_slug(&title, &artist, Some(&owner)), expected);
    }

    #[test]
    fn candidates_are_distinct(base in "[a-z]{1,10}", a in 0u32..1000, b in 0u32..1000) {
        prop_assume!(a != b);
        prop_assert_ne!(candidate(&base, a), candidate(&base, b));
    }
}
