//! Photo payload carrier for provider calls.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A JPEG photo held as base64-encoded data.
///
/// This is the shape every provider capability consumes and the shape the
/// pipeline embeds into the persisted document. The raw bytes are encoded
/// once at the capture boundary and never decoded inside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    data: String,
}

impl Photo {
    /// Wraps already base64-encoded JPEG data.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Encodes raw JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(bytes),
        }
    }

    /// Returns the base64 payload without any data-URL prefix.
    pub fn as_base64(&self) -> &str {
        &self.data
    }

    /// Renders the photo as a `data:` URL, the form stored in
    /// `RepairDocument::user_photo_url`.
    pub fn to_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.data)
    }

    /// Recovers a photo from a stored `data:` URL or bare base64 string.
    pub fn from_stored_url(url: &str) -> Self {
        let data = url.rsplit_once(',').map_or(url, |(_, tail)| tail);
        Self::from_base64(data)
    }
}
