// Pixel format catalog - Packing parameters for every texture format
//
// The target rasterizer understands a closed set of fixed-point encodings:
// three 16-bit direct-color formats, one 32-bit direct-color format and two
// indexed (paletted) formats whose palette entries are 32-bit colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of entries in a 4-bit palette
pub const PALETTE4_ENTRIES: usize = 16;

/// Number of entries in an 8-bit palette
pub const PALETTE8_ENTRIES: usize = 256;

/// Size of one palette entry in bytes (palettes always hold 8888 colors)
pub const PALETTE_ENTRY_BYTES: usize = 4;

/// Texture pixel format
///
/// Each variant names the bit layout of a single texel. Direct-color formats
/// are listed red-first; bits are packed little-endian with red in the
/// lowest bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 16-bit, 5 bits red, 6 bits green, 5 bits blue, no alpha
    #[serde(rename = "5650")]
    Rgb5650,

    /// 16-bit, 5 bits per color channel and a 1-bit alpha
    #[serde(rename = "5551")]
    Rgba5551,

    /// 16-bit, 4 bits per channel
    #[serde(rename = "4444")]
    Rgba4444,

    /// 32-bit, 8 bits per channel
    #[serde(rename = "8888")]
    Rgba8888,

    /// 4-bit index into a 16-entry 8888 palette
    #[serde(rename = "ci4")]
    Ci4,

    /// 8-bit index into a 256-entry 8888 palette
    #[serde(rename = "ci8")]
    Ci8,
}

impl TextureFormat {
    /// Every supported format, direct-color formats first
    pub const ALL: [TextureFormat; 6] = [
        TextureFormat::Rgb5650,
        TextureFormat::Rgba5551,
        TextureFormat::Rgba4444,
        TextureFormat::Rgba8888,
        TextureFormat::Ci4,
        TextureFormat::Ci8,
    ];

    /// Number of bits used by one texel
    pub fn bits_per_texel(self) -> u32 {
        match self {
            TextureFormat::Rgb5650 | TextureFormat::Rgba5551 | TextureFormat::Rgba4444 => 16,
            TextureFormat::Rgba8888 => 32,
            TextureFormat::Ci4 => 4,
            TextureFormat::Ci8 => 8,
        }
    }

    /// Check whether texels are indices into a palette
    pub fn is_palettised(self) -> bool {
        matches!(self, TextureFormat::Ci4 | TextureFormat::Ci8)
    }

    /// Number of palette entries, or `None` for direct-color formats
    pub fn palette_entries(self) -> Option<usize> {
        match self {
            TextureFormat::Ci4 => Some(PALETTE4_ENTRIES),
            TextureFormat::Ci8 => Some(PALETTE8_ENTRIES),
            _ => None,
        }
    }

    /// Size of the palette in bytes, or `None` for direct-color formats
    pub fn palette_bytes(self) -> Option<usize> {
        self.palette_entries()
            .map(|entries| entries * PALETTE_ENTRY_BYTES)
    }

    /// Number of bytes needed to store one row of `width` texels
    ///
    /// 4-bit texels are stored two per byte, so odd widths are rounded up to
    /// the next whole texel pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use native_texture::TextureFormat;
    ///
    /// assert_eq!(TextureFormat::Rgba8888.bytes_required_for_row(4), 16);
    /// assert_eq!(TextureFormat::Ci4.bytes_required_for_row(3), 2);
    /// ```
    pub fn bytes_required_for_row(self, width: u64) -> u64 {
        match self {
            TextureFormat::Ci4 => width.div_ceil(2),
            _ => width * u64::from(self.bits_per_texel() / 8),
        }
    }

    /// Short name used in configuration files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            TextureFormat::Rgb5650 => "5650",
            TextureFormat::Rgba5551 => "5551",
            TextureFormat::Rgba4444 => "4444",
            TextureFormat::Rgba8888 => "8888",
            TextureFormat::Ci4 => "ci4",
            TextureFormat::Ci8 => "ci8",
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown texture format '{}' (expected 5650, 5551, 4444, 8888, ci4 or ci8)",
            self.0
        )
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for TextureFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextureFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_per_texel() {
        assert_eq!(TextureFormat::Rgb5650.bits_per_texel(), 16);
        assert_eq!(TextureFormat::Rgba5551.bits_per_texel(), 16);
        assert_eq!(TextureFormat::Rgba4444.bits_per_texel(), 16);
        assert_eq!(TextureFormat::Rgba8888.bits_per_texel(), 32);
        assert_eq!(TextureFormat::Ci4.bits_per_texel(), 4);
        assert_eq!(TextureFormat::Ci8.bits_per_texel(), 8);
    }

    #[test]
    fn test_palette_parameters() {
        for format in TextureFormat::ALL {
            assert_eq!(format.is_palettised(), format.palette_entries().is_some());
        }
        assert_eq!(TextureFormat::Ci4.palette_bytes(), Some(64));
        assert_eq!(TextureFormat::Ci8.palette_bytes(), Some(1024));
        assert_eq!(TextureFormat::Rgba8888.palette_bytes(), None);
    }

    #[test]
    fn test_row_bytes_direct_color() {
        assert_eq!(TextureFormat::Rgb5650.bytes_required_for_row(1), 2);
        assert_eq!(TextureFormat::Rgba4444.bytes_required_for_row(8), 16);
        assert_eq!(TextureFormat::Rgba8888.bytes_required_for_row(3), 12);
        assert_eq!(TextureFormat::Ci8.bytes_required_for_row(5), 5);
    }

    #[test]
    fn test_row_bytes_4bit_rounds_to_texel_pairs() {
        assert_eq!(TextureFormat::Ci4.bytes_required_for_row(0), 0);
        assert_eq!(TextureFormat::Ci4.bytes_required_for_row(1), 1);
        assert_eq!(TextureFormat::Ci4.bytes_required_for_row(2), 1);
        assert_eq!(TextureFormat::Ci4.bytes_required_for_row(7), 4);
        assert_eq!(TextureFormat::Ci4.bytes_required_for_row(32), 16);
    }

    #[test]
    fn test_parse_names() {
        for format in TextureFormat::ALL {
            assert_eq!(format.name().parse::<TextureFormat>(), Ok(format));
        }
        assert_eq!("CI8".parse::<TextureFormat>(), Ok(TextureFormat::Ci8));
        assert!("565".parse::<TextureFormat>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            format: TextureFormat,
        }

        let toml_str = toml::to_string(&Wrapper {
            format: TextureFormat::Rgba4444,
        })
        .expect("Failed to serialize");
        assert_eq!(toml_str.trim(), "format = \"4444\"");

        let parsed: Wrapper = toml::from_str("format = \"ci4\"").expect("Failed to deserialize");
        assert_eq!(parsed.format, TextureFormat::Ci4);
    }
}
