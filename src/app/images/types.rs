//! Image values produced by the image pipeline
//!
//! Every request resolves to an [`Image`]: either a decoded bitmap or one of
//! a small set of deterministic placeholders. Callers render both the same
//! way and never see an error.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

/// Deterministic substitute for an image that could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// The full locator could not be parsed, no request was made
    InvalidLocator,
    /// The download failed at the transport level
    TransportError,
    /// The server answered but the bytes are not a decodable image
    Undecodable,
}

impl Placeholder {
    /// Stable identifier for the placeholder artwork
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::InvalidLocator => "placeholder.invalid-locator",
            Placeholder::TransportError => "placeholder.transport-error",
            Placeholder::Undecodable => "placeholder.undecodable",
        }
    }

    /// Whether this outcome is stored in the image cache
    ///
    /// Only transport failures are cached. An undecodable body may decode on
    /// a later attempt, and an invalid locator never reaches the network.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Placeholder::TransportError)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an image request
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    /// Successfully downloaded and decoded image
    Decoded(Arc<DynamicImage>),
    /// Placeholder standing in for an unavailable image
    Placeholder(Placeholder),
}

impl Image {
    /// Decode raw bytes into an image
    ///
    /// # Errors
    ///
    /// Returns the decoder's error when the format is unknown or corrupt
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Image::Decoded(Arc::new(decoded)))
    }

    /// Whether this is a placeholder rather than real image data
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Image::Placeholder(_))
    }

    /// The placeholder kind, if any
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Image::Placeholder(kind) => Some(*kind),
            Image::Decoded(_) => None,
        }
    }

    /// Width and height of a decoded image
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Image::Decoded(image) => Some((image.width(), image.height())),
            Image::Placeholder(_) => None,
        }
    }

    /// Approximate in-memory size of the pixel data
    pub fn byte_size(&self) -> usize {
        match self {
            Image::Decoded(image) => image.as_bytes().len(),
            Image::Placeholder(_) => 0,
        }
    }
}

impl From<Placeholder> for Image {
    fn from(kind: Placeholder) -> Self {
        Image::Placeholder(kind)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Image::Decoded(image) => write!(f, "image {}x{}", image.width(), image.height()),
            Image::Placeholder(kind) => write!(f, "{}", kind),
        }
    }
}
