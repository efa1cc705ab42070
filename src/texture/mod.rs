// Texture module - Hardware-ready texture resources
//
// This module provides:
// - The closed set of texel formats and their row packing
// - Power-of-two dimension correction and minimum-pitch block widths
// - Reference-counted textures owning texel and palette storage
// - PNG decoding into the direct-color formats
// - A factory tying allocation policy, decoding and loading together

pub mod buffer;
pub mod dimension;
pub mod error;
pub mod factory;
pub mod format;
pub mod native;
pub mod pixel;
pub mod png_loader;

pub use buffer::AllocationPolicy;
pub use dimension::{correct_dimension, texture_block_width, MIN_ROW_PITCH, MIN_TEXTURE_DIMENSION};
pub use error::{BufferKind, ErrorKind, TextureError};
pub use factory::TextureFactory;
pub use format::{TextureFormat, UnknownFormat, PALETTE4_ENTRIES, PALETTE8_ENTRIES};
pub use native::{NativeTexture, TextureRef};
pub use pixel::{Pf4444, Pf5551, Pf5650, Pf8888, Texel};
pub use png_loader::{DecodedImage, SourceLayout, PNG_SIGNATURE};
