//! Mesh-type identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique name of a schema element.
///
/// The conventional shape is `<subject-area>/<element>`, e.g.
/// `bookmark.meshweave.example/BookmarkCollection_Name`, but the identifier
/// itself is an opaque string: uniqueness is what matters, structure is a
/// naming convention enforced by the builder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshTypeIdentifier(String);

impl MeshTypeIdentifier {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The element name after the last `/`, or the whole identifier if it
    /// has no subject-area prefix.
    pub fn local_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for MeshTypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MeshTypeIdentifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for MeshTypeIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MeshTypeIdentifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_subject_area_prefix() {
        let id = MeshTypeIdentifier::new("bookmark.meshweave.example/Bookmark_Name");
        assert_eq!(id.local_name(), "Bookmark_Name");

        let bare = MeshTypeIdentifier::new("Bookmark");
        assert_eq!(bare.local_name(), "Bookmark");
    }
}
