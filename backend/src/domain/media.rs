//! Listing media values: accepted content types and store paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;
/// Largest number of paths accepted by one bulk delete.
pub const MAX_MEDIA_DELETE_BATCH: usize = 100;
const MAX_MEDIA_PATH_LEN: usize = 512;

/// Image formats accepted for listing media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaContentType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
    #[serde(rename = "image/gif")]
    Gif,
}

impl MediaContentType {
    /// Parse a MIME type, ignoring parameters and case.
    ///
    /// # Examples
    /// ```
    /// use listings::domain::MediaContentType;
    ///
    /// assert_eq!(
    ///     MediaContentType::from_mime("Image/JPEG; q=0.9"),
    ///     Some(MediaContentType::Jpeg),
    /// );
    /// assert_eq!(MediaContentType::from_mime("application/pdf"), None);
    /// ```
    pub fn from_mime(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Canonical MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// File extension used in store paths.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}

/// Validation errors raised by [`MediaPath::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPathError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
    Traversal,
}

impl fmt::Display for MediaPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "media path must not be empty"),
            Self::TooLong { max } => write!(f, "media path must be at most {max} characters"),
            Self::InvalidCharacters => write!(
                f,
                "media path may only contain lowercase letters, digits, '-', '_', '.' and '/'"
            ),
            Self::Traversal => write!(f, "media path must be relative and stay inside its folder"),
        }
    }
}

impl std::error::Error for MediaPathError {}

/// Relative object path inside the media bucket.
///
/// ## Invariants
/// - Only `[a-z0-9._/-]`, no leading `/`, no empty, `.` or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaPath(String);

impl MediaPath {
    /// Validate a path received from a caller or built by the service.
    pub fn new(value: impl Into<String>) -> Result<Self, MediaPathError> {
        let value = value.into();
        if value.is_empty() {
            return Err(MediaPathError::Empty);
        }
        if value.len() > MAX_MEDIA_PATH_LEN {
            return Err(MediaPathError::TooLong {
                max: MAX_MEDIA_PATH_LEN,
            });
        }
        let allowed = |ch: char| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_' | '.' | '/')
        };
        if !value.chars().all(allowed) {
            return Err(MediaPathError::InvalidCharacters);
        }
        if value
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(MediaPathError::Traversal);
        }
        Ok(Self(value))
    }

    /// Whether the path lives under `prefix`, which must end with `/`.
    pub fn is_under(&self, prefix: &str) -> bool {
        prefix.ends_with('/') && self.0.starts_with(prefix)
    }
}

impl AsRef<str> for MediaPath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MediaPath> for String {
    fn from(value: MediaPath) -> Self {
        value.0
    }
}

impl TryFrom<String> for MediaPath {
    type Error = MediaPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Object written to the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub path: MediaPath,
    pub public_url: String,
    pub content_type: MediaContentType,
    pub size_bytes: usize,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", MediaPathError::Empty)]
    #[case("/properties/ktr-482/a.jpg", MediaPathError::Traversal)]
    #[case("properties/ktr-482/../abc-234/a.jpg", MediaPathError::Traversal)]
    #[case("properties//a.jpg", MediaPathError::Traversal)]
    #[case("properties/KTR-482/a.jpg", MediaPathError::InvalidCharacters)]
    #[case("properties\\ktr-482\\a.jpg", MediaPathError::InvalidCharacters)]
    fn rejects_unsafe_paths(#[case] raw: &str, #[case] expected: MediaPathError) {
        assert_eq!(MediaPath::new(raw), Err(expected));
    }

    #[rstest]
    #[case("properties/ktr-482/photo.jpg", "properties/ktr-482/", true)]
    #[case("properties/ktr-482x/photo.jpg", "properties/ktr-482/", false)]
    #[case("properties/ktr-482/photo.jpg", "properties/ktr-482", false)]
    fn prefix_checks_require_folder_boundaries(
        #[case] raw: &str,
        #[case] prefix: &str,
        #[case] expected: bool,
    ) {
        let path = MediaPath::new(raw).expect("valid path");
        assert_eq!(path.is_under(prefix), expected);
    }
}
