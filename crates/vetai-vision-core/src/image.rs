//! Image references for uploaded studies.
//!
//! An uploaded file is held as a `data:<mime>;base64,<payload>` URL, the
//! same shape a browser file reader produces, so it can be handed straight
//! to a rendering layer. Only `image/*` MIME types are accepted.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Image intake errors.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an image: {mime}")]
    NotAnImage { mime: String },

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Encoding(#[from] base64::DecodeError),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A selected image, stored as a data URL.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef {
    mime: String,
    data_url: String,
    digest: String,
    byte_len: usize,
}

impl ImageRef {
    /// Build from raw bytes and a MIME type.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> ImageResult<Self> {
        if !is_image_mime(mime) {
            return Err(ImageError::NotAnImage { mime: mime.to_string() });
        }
        Ok(Self {
            mime: mime.to_string(),
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
            digest: sha256_hex(bytes),
            byte_len: bytes.len(),
        })
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ImageError::NotAnImage {
                mime: mime.essence_str().to_string(),
            });
        }

        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, mime.essence_str())
    }

    /// Parse an existing data URL.
    pub fn parse(data_url: &str) -> ImageResult<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::MalformedDataUrl("missing data: prefix".into()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ImageError::MalformedDataUrl("missing ;base64, marker".into()))?;

        let bytes = STANDARD.decode(payload)?;
        Self::from_bytes(&bytes, mime)
    }

    /// MIME type (e.g. "image/png").
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The full data URL.
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }

    /// SHA-256 of the image bytes, hex encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Size of the decoded image.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

// Payloads can run to megabytes; keep them out of debug output and logs.
impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRef")
            .field("mime", &self.mime)
            .field("digest", &self.digest)
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        image.data_url
    }
}

/// Check whether a MIME type names an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/") && mime.len() > "image/".len()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
