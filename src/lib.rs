// Native Texture Library
// Power-of-two texture buffers for a fixed-function rasterizer

// Public modules
pub mod config;
pub mod texture;

// Re-export main types for convenience
pub use config::TextureConfig;
pub use texture::{
    correct_dimension, texture_block_width, AllocationPolicy, DecodedImage, ErrorKind,
    NativeTexture, SourceLayout, TextureError, TextureFactory, TextureFormat, TextureRef,
};
