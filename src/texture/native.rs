// Native texture - Hardware-ready texel and palette storage
//
// A `NativeTexture` holds texels at power-of-two dimensions with a row stride
// that satisfies the rasterizer's minimum pitch. Indexed formats also own a
// palette of 8888 colors. Textures are shared through `TextureRef`; the
// buffers are released when the last handle is dropped.

use super::buffer::AllocationPolicy;
use super::dimension::{correct_dimension, texture_block_width};
use super::error::{BufferKind, TextureError};
use super::format::TextureFormat;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, trace};

/// Shared handle to a texture
///
/// Consumers hold clones of the handle. Writes go through `borrow_mut`, which
/// keeps a load from overlapping any outstanding read.
pub type TextureRef = Rc<RefCell<NativeTexture>>;

/// A texture laid out for the rasterizer
///
/// # Examples
///
/// ```
/// use native_texture::{NativeTexture, TextureFormat};
///
/// let texture = NativeTexture::create(3, 5, TextureFormat::Rgb5650);
/// let texture = texture.borrow();
///
/// assert_eq!(texture.corrected_width(), 4);
/// assert_eq!(texture.corrected_height(), 8);
/// // Four 16-bit texels are only 8 bytes, so the row is padded to 16
/// assert_eq!(texture.stride(), 16);
/// assert_eq!(texture.bytes_required(), 16 * 8);
/// ```
#[derive(Debug)]
pub struct NativeTexture {
    /// Texel encoding
    format: TextureFormat,

    /// Requested width in texels
    width: u32,

    /// Requested height in texels
    height: u32,

    /// Allocated (power-of-two) width
    corrected_width: u64,

    /// Allocated (power-of-two) height
    corrected_height: u64,

    /// Width used for the row stride; at least `corrected_width`
    block_width: u64,

    /// Texel storage, `stride * corrected_height` bytes
    data: Option<Vec<u8>>,

    /// Palette storage, present only for indexed formats
    palette: Option<Vec<u32>>,

    /// Texel data lives in device memory
    is_data_vid_mem: bool,

    /// Palette lives in device memory
    is_palette_vid_mem: bool,

    /// Contents are still in the layout the hardware swizzler produced
    is_swizzled: bool,

    /// The palette has been loaded at least once
    palette_set: bool,
}

impl NativeTexture {
    /// Create a shared texture with unlimited allocation
    ///
    /// Always returns a texture. If storage could not be allocated the error
    /// is logged and `has_data()` is false.
    pub fn create(width: u32, height: u32, format: TextureFormat) -> TextureRef {
        Rc::new(RefCell::new(Self::new(
            width,
            height,
            format,
            &AllocationPolicy::UNLIMITED,
        )))
    }

    /// Create a texture, logging any allocation failure
    ///
    /// The returned texture is valid either way; check `has_data()` before
    /// loading it.
    pub fn new(width: u32, height: u32, format: TextureFormat, policy: &AllocationPolicy) -> Self {
        let mut texture = Self::unallocated(width, height, format);
        if let Err(e) = texture.allocate_storage(policy) {
            error!(
                width,
                height,
                %format,
                "Texture allocation failed: {}", e
            );
        }
        texture
    }

    /// Create a texture, returning the allocation error instead of logging it
    pub fn try_new(
        width: u32,
        height: u32,
        format: TextureFormat,
        policy: &AllocationPolicy,
    ) -> Result<Self, TextureError> {
        let mut texture = Self::unallocated(width, height, format);
        texture.allocate_storage(policy)?;
        Ok(texture)
    }

    fn unallocated(width: u32, height: u32, format: TextureFormat) -> Self {
        let corrected_width = correct_dimension(width);
        let corrected_height = correct_dimension(height);

        NativeTexture {
            format,
            width,
            height,
            corrected_width,
            corrected_height,
            block_width: texture_block_width(corrected_width, format),
            data: None,
            palette: None,
            is_data_vid_mem: false,
            is_palette_vid_mem: false,
            is_swizzled: true,
            palette_set: false,
        }
    }

    /// Allocate texels first, then the palette
    fn allocate_storage(&mut self, policy: &AllocationPolicy) -> Result<(), TextureError> {
        let bytes_required = self
            .checked_bytes_required()
            .ok_or(TextureError::OutOfMemory {
                buffer: BufferKind::Texels,
                bytes: u64::MAX,
            })?;
        self.data = Some(policy.allocate(BufferKind::Texels, bytes_required)?);

        if let Some(entries) = self.format.palette_entries() {
            self.palette = Some(policy.allocate(BufferKind::Palette, entries as u64)?);
        }

        debug!(
            width = self.width,
            height = self.height,
            corrected_width = self.corrected_width,
            corrected_height = self.corrected_height,
            stride = self.stride(),
            format = %self.format,
            "Allocated texture ({} bytes)",
            bytes_required
        );
        Ok(())
    }

    /// Texel format
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Requested width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Allocated power-of-two width
    pub fn corrected_width(&self) -> u64 {
        self.corrected_width
    }

    /// Allocated power-of-two height
    pub fn corrected_height(&self) -> u64 {
        self.corrected_height
    }

    /// Width the stride is computed from
    pub fn block_width(&self) -> u64 {
        self.block_width
    }

    /// Texture-coordinate scale, `(1 / corrected_width, 1 / corrected_height)`
    pub fn scale(&self) -> (f32, f32) {
        (
            1.0 / self.corrected_width as f32,
            1.0 / self.corrected_height as f32,
        )
    }

    /// Bytes from the start of one texel row to the next
    pub fn stride(&self) -> u64 {
        self.format.bytes_required_for_row(self.block_width)
    }

    /// Total size of the texel buffer in bytes
    ///
    /// Saturates at `u64::MAX` when `stride * corrected_height` does not fit;
    /// such a texture never gets storage.
    pub fn bytes_required(&self) -> u64 {
        self.checked_bytes_required().unwrap_or(u64::MAX)
    }

    fn checked_bytes_required(&self) -> Option<u64> {
        self.stride().checked_mul(self.corrected_height)
    }

    /// Check whether storage is allocated
    ///
    /// Indexed textures need both texel and palette storage.
    pub fn has_data(&self) -> bool {
        self.data.is_some() && (!self.format.is_palettised() || self.palette.is_some())
    }

    /// Check whether the palette has been loaded at least once
    pub fn is_palette_set(&self) -> bool {
        self.palette_set
    }

    /// Check whether the texture can be handed to the rasterizer
    pub fn is_usable(&self) -> bool {
        self.has_data() && (!self.format.is_palettised() || self.palette_set)
    }

    /// Load texels (and palette, for indexed formats)
    ///
    /// `texels` must already be laid out at this texture's stride; exactly
    /// `bytes_required()` bytes are copied. Indexed formats require a palette
    /// of at least `palette_entries()` colors, direct-color formats must not
    /// be given one. Nothing is modified unless every check passes.
    pub fn set_data(&mut self, texels: &[u8], palette: Option<&[u32]>) -> Result<(), TextureError> {
        if !self.has_data() {
            return Err(TextureError::NoStorage);
        }

        let bytes_required = self.bytes_required();
        if (texels.len() as u64) < bytes_required {
            return Err(TextureError::TexelDataTooShort {
                expected: bytes_required,
                found: texels.len(),
            });
        }

        let palette = match (self.format.palette_entries(), palette) {
            (Some(_), None) => return Err(TextureError::MissingPalette(self.format)),
            (None, Some(_)) => return Err(TextureError::UnexpectedPalette(self.format)),
            (Some(entries), Some(source)) if source.len() < entries => {
                return Err(TextureError::PaletteTooShort {
                    expected: entries,
                    found: source.len(),
                })
            }
            (Some(entries), Some(source)) => Some(&source[..entries]),
            (None, None) => None,
        };

        if let Some(data) = self.data.as_mut() {
            let len = data.len();
            data.copy_from_slice(&texels[..len]);
        }
        if let (Some(dest), Some(source)) = (self.palette.as_mut(), palette) {
            dest.copy_from_slice(source);
            self.palette_set = true;
        }
        self.is_swizzled = false;

        Ok(())
    }

    /// Raw texel storage
    pub fn texels(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// One row of texels, `stride()` bytes long
    pub fn texel_row(&self, y: u64) -> Option<&[u8]> {
        if y >= self.corrected_height {
            return None;
        }
        let data = self.data.as_deref()?;
        let stride = usize::try_from(self.stride()).ok()?;
        let start = usize::try_from(y).ok()? * stride;
        data.get(start..start + stride)
    }

    /// Palette storage (indexed formats only)
    pub fn palette(&self) -> Option<&[u32]> {
        self.palette.as_deref()
    }

    /// Texel data is resident in device memory
    pub fn is_data_vid_mem(&self) -> bool {
        self.is_data_vid_mem
    }

    /// Palette is resident in device memory
    pub fn is_palette_vid_mem(&self) -> bool {
        self.is_palette_vid_mem
    }

    /// Contents are still in the hardware-swizzled layout
    pub fn is_swizzled(&self) -> bool {
        self.is_swizzled
    }

    /// Record where the graphics back end placed the buffers
    ///
    /// The palette flag is ignored for direct-color formats.
    pub fn set_residency(&mut self, data_vid_mem: bool, palette_vid_mem: bool) {
        self.is_data_vid_mem = data_vid_mem;
        self.is_palette_vid_mem = palette_vid_mem && self.format.is_palettised();
    }

    /// Bytes of device memory used by the texels
    pub fn video_memory_usage(&self) -> u64 {
        if self.is_data_vid_mem {
            self.bytes_required()
        } else {
            0
        }
    }

    /// Bytes of system memory used by the texels
    pub fn system_memory_usage(&self) -> u64 {
        if self.is_data_vid_mem {
            0
        } else {
            self.bytes_required()
        }
    }

    /// Bind the texture for drawing
    ///
    /// Binding belongs to the graphics back end; this layer only guarantees
    /// that the layout and stride are correct inputs to it.
    pub fn install_texture(&self) {
        trace!(format = %self.format, stride = self.stride(), "install_texture");
    }
}

impl Drop for NativeTexture {
    fn drop(&mut self) {
        trace!(
            width = self.width,
            height = self.height,
            format = %self.format,
            "Releasing texture"
        );
    }
}
