// Dimension correction - Power-of-two sizes and minimum row pitch
//
// The rasterizer addresses textures with power-of-two dimensions and fetches
// rows in 16-byte bursts, so every allocation is rounded up on both counts.
//
// Corrected sizes are held in `u64` so that any `u32` logical dimension has a
// representable power of two.

use super::format::TextureFormat;

/// Smallest dimension a texture is ever allocated with
pub const MIN_TEXTURE_DIMENSION: u64 = 1;

/// Minimum number of bytes in a texture row
pub const MIN_ROW_PITCH: u64 = 16;

/// Round a logical dimension up to the allocated power-of-two dimension
///
/// # Examples
///
/// ```
/// use native_texture::texture::correct_dimension;
///
/// assert_eq!(correct_dimension(0), 1);
/// assert_eq!(correct_dimension(5), 8);
/// assert_eq!(correct_dimension(64), 64);
/// ```
pub fn correct_dimension(dimension: u32) -> u64 {
    u64::from(dimension)
        .next_power_of_two()
        .max(MIN_TEXTURE_DIMENSION)
}

/// Width used to compute the row stride of a texture
///
/// Starting from the corrected width, doubles until a row occupies at least
/// [`MIN_ROW_PITCH`] bytes. The result may be wider than the addressable
/// width; row offsets must always come from the stride derived from it.
///
/// `corrected_width` must already be a power of two.
pub fn texture_block_width(corrected_width: u64, format: TextureFormat) -> u64 {
    debug_assert!(
        corrected_width.is_power_of_two(),
        "Width {} is not a power of 2",
        corrected_width
    );

    let mut width = corrected_width.max(MIN_TEXTURE_DIMENSION);
    while format.bytes_required_for_row(width) < MIN_ROW_PITCH {
        width *= 2;
    }
    width
}
