// PNG loader - Decodes PNG files into direct-color texels
//
// Decoding is done by the `png` crate with palette and low-bit-depth images
// expanded and 16-bit samples stripped to 8 bits, so every image reaches the
// converter as 8-bit gray, gray+alpha, color or color+alpha scanlines. Color
// samples are handed over in b, g, r order.
//
// Images without an alpha channel are color keyed: pure black texels become
// fully transparent and everything else is opaque. Gray+alpha images follow
// the same rule and their alpha samples are ignored.

use super::buffer::AllocationPolicy;
use super::error::{BufferKind, TextureError};
use super::format::TextureFormat;
use super::pixel::{Pf4444, Pf5551, Pf5650, Pf8888, Texel};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

/// Number of signature bytes checked before decoding
pub const SIGNATURE_SIZE: usize = 8;

/// The PNG file signature
pub const PNG_SIGNATURE: [u8; SIGNATURE_SIZE] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Sample layout of one decoded texel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// One gray sample
    Gray,

    /// Gray sample followed by alpha
    GrayAlpha,

    /// Blue, green, red
    Bgr,

    /// Blue, green, red, alpha
    Bgra,
}

impl SourceLayout {
    /// Number of bytes per source texel
    pub fn channels(self) -> usize {
        match self {
            SourceLayout::Gray => 1,
            SourceLayout::GrayAlpha => 2,
            SourceLayout::Bgr => 3,
            SourceLayout::Bgra => 4,
        }
    }

    /// Turn one source texel into `[r, g, b, a]`
    #[inline]
    fn to_rgba(self, texel: &[u8]) -> [u8; 4] {
        match self {
            SourceLayout::Gray | SourceLayout::GrayAlpha => {
                let v = texel[0];
                [v, v, v, black_key_alpha(v, v, v)]
            }
            SourceLayout::Bgr => {
                let (b, g, r) = (texel[0], texel[1], texel[2]);
                [r, g, b, black_key_alpha(r, g, b)]
            }
            SourceLayout::Bgra => [texel[2], texel[1], texel[0], texel[3]],
        }
    }
}

/// Alpha for images without an alpha channel: pure black is transparent
#[inline]
fn black_key_alpha(r: u8, g: u8, b: u8) -> u8 {
    if r == 0 && g == 0 && b == 0 {
        0x00
    } else {
        0xFF
    }
}

/// A decoded image, one row of samples per scanline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    layout: SourceLayout,
    samples: Vec<u8>,
}

impl DecodedImage {
    /// Wrap tightly packed scanlines
    ///
    /// `samples` must hold exactly `width * height * layout.channels()` bytes.
    pub fn new(
        width: u32,
        height: u32,
        layout: SourceLayout,
        samples: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let expected = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|texels| texels.checked_mul(layout.channels() as u64));
        if expected != Some(samples.len() as u64) {
            return Err(TextureError::UnsupportedImage(format!(
                "{}x{} {:?} image does not match {} sample bytes",
                width,
                height,
                layout,
                samples.len()
            )));
        }

        Ok(DecodedImage {
            width,
            height,
            layout,
            samples,
        })
    }

    /// Image width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample layout of every scanline
    pub fn layout(&self) -> SourceLayout {
        self.layout
    }

    /// Bytes in one scanline
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.layout.channels()
    }

    /// Iterate over scanlines, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on a zero chunk size
        let row_bytes = self.row_bytes().max(1);
        self.samples
            .chunks_exact(row_bytes)
            .take(self.height as usize)
    }
}

/// Check the first bytes of a file against the PNG signature
pub fn check_signature(header: &[u8]) -> bool {
    header.len() >= SIGNATURE_SIZE && header[..SIGNATURE_SIZE] == PNG_SIGNATURE
}

/// Decode a PNG file
pub fn decode_png_file<P: AsRef<Path>>(
    path: P,
    policy: &AllocationPolicy,
) -> Result<DecodedImage, TextureError> {
    decode_png(File::open(path)?, policy)
}

/// Decode a PNG stream
///
/// The signature is verified before the decoder is started. The sample
/// buffer is allocated under `policy`.
pub fn decode_png<R: Read + Seek>(
    mut reader: R,
    policy: &AllocationPolicy,
) -> Result<DecodedImage, TextureError> {
    let start = reader.stream_position()?;
    let mut signature = [0u8; SIGNATURE_SIZE];
    match reader.read_exact(&mut signature) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(TextureError::InvalidSignature)
        }
        Err(e) => return Err(e.into()),
    }
    if !check_signature(&signature) {
        return Err(TextureError::InvalidSignature);
    }
    reader.seek(io::SeekFrom::Start(start))?;

    let mut decoder = png::Decoder::new(BufReader::new(reader));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut png_reader = decoder.read_info()?;

    let buffer_size = png_reader
        .output_buffer_size()
        .ok_or(TextureError::OutOfMemory {
            buffer: BufferKind::Conversion,
            bytes: u64::MAX,
        })?;
    let mut samples: Vec<u8> = policy.allocate(BufferKind::Conversion, buffer_size as u64)?;
    let frame = png_reader.next_frame(&mut samples)?;

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(TextureError::UnsupportedImage(format!(
            "{:?} bit samples",
            frame.bit_depth
        )));
    }
    let layout = match frame.color_type {
        png::ColorType::Grayscale => SourceLayout::Gray,
        png::ColorType::GrayscaleAlpha => SourceLayout::GrayAlpha,
        png::ColorType::Rgb => SourceLayout::Bgr,
        png::ColorType::Rgba => SourceLayout::Bgra,
        png::ColorType::Indexed => {
            return Err(TextureError::UnsupportedImage(
                "indexed color images".to_string(),
            ))
        }
    };

    let channels = layout.channels();
    if frame.line_size != frame.width as usize * channels {
        return Err(TextureError::UnsupportedImage(format!(
            "unexpected scanline size {}",
            frame.line_size
        )));
    }
    samples.truncate(frame.line_size * frame.height as usize);

    // Decoder output is r, g, b; scanlines are handed over as b, g, r
    if channels >= 3 {
        for texel in samples.chunks_exact_mut(channels) {
            texel.swap(0, 2);
        }
    }

    DecodedImage::new(frame.width, frame.height, layout, samples)
}

/// Convert every scanline into `T` texels
///
/// Rows are written `stride` bytes apart; bytes past the image width are
/// left untouched. `stride` and `dest` must already be checked against the
/// image by `convert_image`.
pub(crate) fn convert_scanlines<T: Texel>(
    image: &DecodedImage,
    stride: usize,
    dest: &mut [u8],
) {
    let channels = image.layout.channels();
    let width = image.width as usize;

    for (source_row, dest_row) in image.rows().zip(dest.chunks_exact_mut(stride)) {
        let texels = source_row.chunks_exact(channels).take(width);
        for (texel, out) in texels.zip(dest_row.chunks_exact_mut(T::BYTES)) {
            let [r, g, b, a] = image.layout.to_rgba(texel);
            T::pack(r, g, b, a).write_to(out);
        }
    }
}

/// Convert an image into `format` texels laid out at `stride`
///
/// Indexed formats are rejected; this loader never builds palettes. The
/// stride must hold one converted row and `dest` must hold `stride * height`
/// bytes.
pub fn convert_image(
    image: &DecodedImage,
    format: TextureFormat,
    stride: usize,
    dest: &mut [u8],
) -> Result<(), TextureError> {
    if format.is_palettised() {
        return Err(TextureError::PalettisedImageFormat(format));
    }

    let row_bytes = format.bytes_required_for_row(u64::from(image.width));
    if (stride as u64) < row_bytes.max(1) {
        return Err(TextureError::StrideTooSmall {
            expected: row_bytes.max(1),
            found: stride,
        });
    }
    let dest_bytes = (stride as u64).saturating_mul(u64::from(image.height));
    if (dest.len() as u64) < dest_bytes {
        return Err(TextureError::TexelDataTooShort {
            expected: dest_bytes,
            found: dest.len(),
        });
    }

    match format {
        TextureFormat::Rgb5650 => convert_scanlines::<Pf5650>(image, stride, dest),
        TextureFormat::Rgba5551 => convert_scanlines::<Pf5551>(image, stride, dest),
        TextureFormat::Rgba4444 => convert_scanlines::<Pf4444>(image, stride, dest),
        TextureFormat::Rgba8888 => convert_scanlines::<Pf8888>(image, stride, dest),
        TextureFormat::Ci4 | TextureFormat::Ci8 => {
            return Err(TextureError::PalettisedImageFormat(format))
        }
    }
    Ok(())
}
