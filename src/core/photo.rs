//! Photo records and the key used to identify them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between album id and photo id in a [`PhotoKey`].
pub const KEY_SEPARATOR: char = '-';

/// A photo record as served by the remote source.
///
/// Only the fields the gallery needs are kept; anything else in the payload is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Photo id, unique within its album.
    pub id: u64,
    /// Album the photo belongs to.
    pub album_id: u64,
    /// Display title.
    pub title: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Full-size image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Photo {
    /// The identity of this photo in the disabled set.
    #[must_use]
    pub fn key(&self) -> PhotoKey {
        PhotoKey::new(self.album_id, self.id)
    }

    /// Case-insensitive title match. An empty needle matches everything.
    #[must_use]
    pub fn title_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Composite `albumId-id` key identifying a photo.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoKey(String);

impl PhotoKey {
    /// Build the key for a photo.
    #[must_use]
    pub fn new(album_id: u64, id: u64) -> Self {
        Self(format!("{album_id}{KEY_SEPARATOR}{id}"))
    }

    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into `(album_id, id)`.
    ///
    /// Keys read from storage are not validated on load, so this returns
    /// `None` for anything that was not produced by [`PhotoKey::new`].
    #[must_use]
    pub fn parts(&self) -> Option<(u64, u64)> {
        let (album, id) = self.0.split_once(KEY_SEPARATOR)?;
        Some((album.parse().ok()?, id.parse().ok()?))
    }
}

impl fmt::Display for PhotoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string is not a valid photo key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid photo key {0:?}: expected <albumId>-<id>")]
pub struct KeyParseError(pub String);

impl FromStr for PhotoKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (album, id) = s
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyParseError(s.to_string()))?;
        match (album.parse::<u64>(), id.parse::<u64>()) {
            (Ok(album), Ok(id)) => Ok(Self::new(album, id)),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn photo(album_id: u64, id: u64, title: &str) -> Photo {
    Photo {
        id,
        album_id,
        title: title.to_string(),
        thumbnail_url: format!("https://example.test/150/{album_id}-{id}"),
        url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_album_and_id() {
        assert_eq!(PhotoKey::new(1, 2).as_str(), "1-2");
        assert_eq!(photo(3, 14, "x").key().as_str(), "3-14");
    }

    #[test]
    fn key_ignores_other_fields() {
        let a = photo(1, 1, "first");
        let mut b = photo(1, 1, "second");
        b.thumbnail_url = "elsewhere".to_string();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn key_is_not_ambiguous_across_digit_boundaries() {
        assert_ne!(PhotoKey::new(1, 12), PhotoKey::new(11, 2));
    }

    #[test]
    fn parse_accepts_valid_keys() {
        let key: PhotoKey = "7-42".parse().unwrap();
        assert_eq!(key, PhotoKey::new(7, 42));
        assert_eq!(key.parts(), Some((7, 42)));

        let key: PhotoKey = " 1-2 ".parse().unwrap();
        assert_eq!(key.as_str(), "1-2");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "12", "a-1", "1-b", "1-2-3", "-1", "1-"] {
            assert!(bad.parse::<PhotoKey>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn parts_of_foreign_key_is_none() {
        let key: PhotoKey = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(key.parts(), None);
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let p = photo(1, 1, "Banana split");
        assert!(p.title_matches("b"));
        assert!(p.title_matches("SPLIT"));
        assert!(p.title_matches(""));
        assert!(!p.title_matches("apple"));
    }

    #[test]
    fn deserializes_camel_case_and_ignores_extra_fields() {
        let json = r#"{
            "albumId": 1,
            "id": 2,
            "title": "reprehenderit est",
            "url": "https://via.placeholder.com/600/771796",
            "thumbnailUrl": "https://via.placeholder.com/150/771796",
            "extra": true
        }"#;
        let p: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(p.album_id, 1);
        assert_eq!(p.id, 2);
        assert_eq!(p.thumbnail_url, "https://via.placeholder.com/150/771796");
        assert_eq!(p.url.as_deref(), Some("https://via.placeholder.com/600/771796"));
    }
}
