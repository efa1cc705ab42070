// Texture factory - Builds textures from dimensions or image files
//
// The factory applies the configured allocation policy and residency to
// every texture it creates. Image-backed creation decodes, converts and loads
// in one call; on failure nothing is returned and every intermediate buffer
// has already been dropped.

use super::buffer::AllocationPolicy;
use super::error::{BufferKind, TextureError};
use super::format::TextureFormat;
use super::native::{NativeTexture, TextureRef};
use super::png_loader::{self, DecodedImage};
use crate::config::TextureConfig;
use std::cell::RefCell;
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

/// Creates [`NativeTexture`]s
#[derive(Debug, Clone, Default)]
pub struct TextureFactory {
    policy: AllocationPolicy,
    place_in_video_memory: bool,
}

impl TextureFactory {
    /// Create a factory from configuration
    pub fn new(config: &TextureConfig) -> Self {
        TextureFactory {
            policy: config.allocation_policy(),
            place_in_video_memory: config.loader.place_in_video_memory,
        }
    }

    /// Allocation limits used by this factory
    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Create an empty texture
    ///
    /// Always returns a texture; `has_data()` is false if allocation failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use native_texture::{TextureFactory, TextureFormat};
    ///
    /// let factory = TextureFactory::default();
    /// let texture = factory.create_resource(100, 30, TextureFormat::Ci8);
    /// let texture = texture.borrow();
    ///
    /// assert!(texture.has_data());
    /// assert_eq!(texture.corrected_width(), 128);
    /// assert_eq!(texture.corrected_height(), 32);
    /// ```
    pub fn create_resource(&self, width: u32, height: u32, format: TextureFormat) -> TextureRef {
        let mut texture = NativeTexture::new(width, height, format, &self.policy);
        self.apply_residency(&mut texture);
        Rc::new(RefCell::new(texture))
    }

    /// Create a texture from a PNG file
    pub fn create_resource_from_png<P: AsRef<Path>>(
        &self,
        path: P,
        format: TextureFormat,
    ) -> Result<TextureRef, TextureError> {
        let path = path.as_ref();
        check_image_format(format)
            .and_then(|()| png_loader::decode_png_file(path, &self.policy))
            .and_then(|image| self.load_image(&image, format))
            .map_err(|e| {
                warn!(path = %path.display(), %format, "Failed to load texture: {}", e);
                e
            })
    }

    /// Create a texture from a PNG stream
    pub fn create_resource_from_png_reader<R: Read + Seek>(
        &self,
        reader: R,
        format: TextureFormat,
    ) -> Result<TextureRef, TextureError> {
        check_image_format(format)
            .and_then(|()| png_loader::decode_png(reader, &self.policy))
            .and_then(|image| self.load_image(&image, format))
            .map_err(|e| {
                warn!(%format, "Failed to load texture: {}", e);
                e
            })
    }

    /// Create a texture from an already decoded image
    pub fn create_resource_from_image(
        &self,
        image: &DecodedImage,
        format: TextureFormat,
    ) -> Result<TextureRef, TextureError> {
        check_image_format(format)?;
        self.load_image(image, format)
    }

    /// Convert and load a decoded image
    fn load_image(
        &self,
        image: &DecodedImage,
        format: TextureFormat,
    ) -> Result<TextureRef, TextureError> {
        let mut texture =
            NativeTexture::try_new(image.width(), image.height(), format, &self.policy)?;

        let bytes_required = texture.bytes_required();
        let stride =
            usize::try_from(texture.stride()).map_err(|_| TextureError::OutOfMemory {
                buffer: BufferKind::Conversion,
                bytes: bytes_required,
            })?;
        let mut texels: Vec<u8> = self.policy.allocate(BufferKind::Conversion, bytes_required)?;

        png_loader::convert_image(image, format, stride, &mut texels)?;
        texture.set_data(&texels, None)?;
        self.apply_residency(&mut texture);

        debug!(
            width = image.width(),
            height = image.height(),
            layout = ?image.layout(),
            %format,
            "Loaded texture from image"
        );
        Ok(Rc::new(RefCell::new(texture)))
    }

    fn apply_residency(&self, texture: &mut NativeTexture) {
        if self.place_in_video_memory {
            texture.set_residency(true, true);
        }
    }
}

/// Indexed formats are refused before anything is decoded
fn check_image_format(format: TextureFormat) -> Result<(), TextureError> {
    if format.is_palettised() {
        Err(TextureError::PalettisedImageFormat(format))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::error::ErrorKind;
    use crate::texture::png_loader::SourceLayout;

    fn red_image() -> DecodedImage {
        // b, g, r, a
        DecodedImage::new(2, 2, SourceLayout::Bgra, [0, 0, 255, 255].repeat(4)).unwrap()
    }

    #[test]
    fn test_create_resource_applies_policy() {
        let mut config = TextureConfig::default();
        config.memory.max_allocation_bytes = Some(1024);
        let factory = TextureFactory::new(&config);

        assert!(factory
            .create_resource(8, 8, TextureFormat::Rgba8888)
            .borrow()
            .has_data());
        assert!(!factory
            .create_resource(64, 64, TextureFormat::Rgba8888)
            .borrow()
            .has_data());
    }

    #[test]
    fn test_from_image_red_8888() {
        let texture = TextureFactory::default()
            .create_resource_from_image(&red_image(), TextureFormat::Rgba8888)
            .expect("load should succeed");
        let texture = texture.borrow();

        assert_eq!((texture.corrected_width(), texture.corrected_height()), (2, 2));
        assert!(texture.is_usable());
        assert!(!texture.is_swizzled());
        for y in 0..2 {
            let row = texture.texel_row(y).expect("row");
            assert_eq!(&row[..8], &[255, 0, 0, 255, 255, 0, 0, 255]);
            // Padding up to the 16-byte stride
            assert!(row[8..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_one_image_loads_into_every_direct_format() {
        let factory = TextureFactory::default();
        let image = red_image();

        for format in [
            TextureFormat::Rgb5650,
            TextureFormat::Rgba5551,
            TextureFormat::Rgba4444,
            TextureFormat::Rgba8888,
        ] {
            let texture = factory
                .create_resource_from_image(&image, format)
                .expect("load should succeed");
            assert!(texture.borrow().is_usable());
        }
        // The caller keeps its image
        assert_eq!(image, red_image());
    }

    #[test]
    fn test_from_image_within_exact_ceiling() {
        // 2x2 8888: stride 16, so the texels and the conversion buffer are
        // 32 bytes each
        let mut config = TextureConfig::default();
        config.memory.max_allocation_bytes = Some(32);
        let factory = TextureFactory::new(&config);

        let texture = factory
            .create_resource_from_image(&red_image(), TextureFormat::Rgba8888)
            .expect("load should fit the ceiling");
        assert_eq!(texture.borrow().bytes_required(), 32);
    }

    #[test]
    fn test_from_image_rejects_indexed_formats() {
        let factory = TextureFactory::default();
        for format in [TextureFormat::Ci4, TextureFormat::Ci8] {
            let result = factory.create_resource_from_image(&red_image(), format);
            let err = result.expect_err("indexed formats must fail");
            assert_eq!(err.kind(), ErrorKind::Decode);
        }
    }

    #[test]
    fn test_from_image_allocation_failure() {
        let mut config = TextureConfig::default();
        config.memory.max_allocation_bytes = Some(8);
        let result = TextureFactory::new(&config)
            .create_resource_from_image(&red_image(), TextureFormat::Rgba8888);

        assert_eq!(result.expect_err("should fail").kind(), ErrorKind::Allocation);
    }

    #[test]
    fn test_residency_from_config() {
        let mut config = TextureConfig::default();
        config.loader.place_in_video_memory = true;
        let factory = TextureFactory::new(&config);

        let texture = factory.create_resource(4, 4, TextureFormat::Ci4);
        let texture = texture.borrow();
        assert!(texture.is_data_vid_mem());
        assert!(texture.is_palette_vid_mem());
        assert_eq!(texture.system_memory_usage(), 0);
    }
}
