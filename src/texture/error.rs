// Texture errors
//
// Every failure in the texture subsystem is reported through `TextureError`.
// The variants fall into three kinds: allocation failures, decode failures and
// contract violations on the data handed to a texture.

use super::format::TextureFormat;
use std::fmt;
use std::io;

/// Broad classification of a [`TextureError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A texel, palette or conversion buffer could not be allocated
    Allocation,

    /// An image file could not be read or turned into texels
    Decode,

    /// Data supplied to a texture does not match its format
    ContractViolation,
}

/// Which buffer an allocation was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Texel storage owned by a texture
    Texels,

    /// Palette storage owned by an indexed texture
    Palette,

    /// Temporary buffer used while converting a decoded image
    Conversion,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Texels => f.write_str("texels"),
            BufferKind::Palette => f.write_str("palette"),
            BufferKind::Conversion => f.write_str("conversion buffer"),
        }
    }
}

/// Errors that can occur while creating or loading a texture
#[derive(Debug)]
pub enum TextureError {
    /// Buffer allocation failed or exceeded the configured ceiling
    OutOfMemory { buffer: BufferKind, bytes: u64 },

    /// The texture has no allocated storage to load into
    NoStorage,

    /// I/O error while reading an image file
    Io(io::Error),

    /// The first 8 bytes are not a PNG signature
    InvalidSignature,

    /// The PNG decoder aborted
    Decoding(png::DecodingError),

    /// The decoded image has a sample layout this loader cannot convert
    UnsupportedImage(String),

    /// Indexed formats cannot be produced from an image file
    PalettisedImageFormat(TextureFormat),

    /// A palette is required by the format but none was given
    MissingPalette(TextureFormat),

    /// A palette was given for a format that has none
    UnexpectedPalette(TextureFormat),

    /// The palette source holds fewer entries than the format requires
    PaletteTooShort { expected: usize, found: usize },

    /// The texel source holds fewer bytes than the texture requires
    TexelDataTooShort { expected: u64, found: usize },

    /// A row stride cannot hold one row of converted texels
    StrideTooSmall { expected: u64, found: usize },
}

impl TextureError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TextureError::OutOfMemory { .. } | TextureError::NoStorage => ErrorKind::Allocation,
            TextureError::Io(_)
            | TextureError::InvalidSignature
            | TextureError::Decoding(_)
            | TextureError::UnsupportedImage(_)
            | TextureError::PalettisedImageFormat(_) => ErrorKind::Decode,
            TextureError::MissingPalette(_)
            | TextureError::UnexpectedPalette(_)
            | TextureError::PaletteTooShort { .. }
            | TextureError::TexelDataTooShort { .. }
            | TextureError::StrideTooSmall { .. } => ErrorKind::ContractViolation,
        }
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::OutOfMemory { buffer, bytes } => {
                write!(f, "Out of memory for {} ({} bytes)", buffer, bytes)
            }
            TextureError::NoStorage => write!(f, "Texture has no allocated storage"),
            TextureError::Io(e) => write!(f, "I/O error: {}", e),
            TextureError::InvalidSignature => write!(f, "Not a PNG file (bad signature)"),
            TextureError::Decoding(e) => write!(f, "PNG decoding error: {}", e),
            TextureError::UnsupportedImage(what) => write!(f, "Unsupported image: {}", what),
            TextureError::PalettisedImageFormat(format) => {
                write!(f, "Can't use palettised format {} for png", format)
            }
            TextureError::MissingPalette(format) => {
                write!(f, "No palette provided for {} texture", format)
            }
            TextureError::UnexpectedPalette(format) => {
                write!(f, "Palette provided for {} texture, which has none", format)
            }
            TextureError::PaletteTooShort { expected, found } => {
                write!(
                    f,
                    "Palette too short: expected {} entries, found {}",
                    expected, found
                )
            }
            TextureError::TexelDataTooShort { expected, found } => {
                write!(
                    f,
                    "Texel data too short: expected {} bytes, found {}",
                    expected, found
                )
            }
            TextureError::StrideTooSmall { expected, found } => {
                write!(
                    f,
                    "Stride too small: expected at least {} bytes, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io(e) => Some(e),
            TextureError::Decoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TextureError {
    fn from(e: io::Error) -> Self {
        TextureError::Io(e)
    }
}

impl From<png::DecodingError> for TextureError {
    fn from(e: png::DecodingError) -> Self {
        TextureError::Decoding(e)
    }
}
