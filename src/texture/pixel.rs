// Texel packing - Bit layouts for the direct-color texture formats
//
// Each packed type converts an 8-bit-per-channel (r, g, b, a) color into the
// fixed-point representation the rasterizer reads. Channels are truncated,
// never rounded, and texels are stored little-endian.

/// A direct-color texel encoding
///
/// Implementors pack an 8-bit RGBA color and write themselves into a byte
/// slice of exactly `BYTES` bytes.
pub trait Texel: Copy {
    /// Size of one texel in bytes
    const BYTES: usize;

    /// Pack an 8-bit-per-channel color
    fn pack(r: u8, g: u8, b: u8, a: u8) -> Self;

    /// Write the texel into `dest` (must be `BYTES` long)
    fn write_to(self, dest: &mut [u8]);
}

/// 16-bit 5:6:5 texel (no alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pf5650(pub u16);

/// 16-bit 5:5:5:1 texel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pf5551(pub u16);

/// 16-bit 4:4:4:4 texel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pf4444(pub u16);

/// 32-bit 8:8:8:8 texel, also the layout of palette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pf8888(pub u32);

impl Texel for Pf5650 {
    const BYTES: usize = 2;

    #[inline]
    fn pack(r: u8, g: u8, b: u8, _a: u8) -> Self {
        let r = u16::from(r >> 3);
        let g = u16::from(g >> 2);
        let b = u16::from(b >> 3);
        Pf5650(r | (g << 5) | (b << 11))
    }

    #[inline]
    fn write_to(self, dest: &mut [u8]) {
        dest.copy_from_slice(&self.0.to_le_bytes());
    }
}

impl Texel for Pf5551 {
    const BYTES: usize = 2;

    #[inline]
    fn pack(r: u8, g: u8, b: u8, a: u8) -> Self {
        let r = u16::from(r >> 3);
        let g = u16::from(g >> 3);
        let b = u16::from(b >> 3);
        let a = u16::from(a >> 7);
        Pf5551(r | (g << 5) | (b << 10) | (a << 15))
    }

    #[inline]
    fn write_to(self, dest: &mut [u8]) {
        dest.copy_from_slice(&self.0.to_le_bytes());
    }
}

impl Texel for Pf4444 {
    const BYTES: usize = 2;

    #[inline]
    fn pack(r: u8, g: u8, b: u8, a: u8) -> Self {
        let r = u16::from(r >> 4);
        let g = u16::from(g >> 4);
        let b = u16::from(b >> 4);
        let a = u16::from(a >> 4);
        Pf4444(r | (g << 4) | (b << 8) | (a << 12))
    }

    #[inline]
    fn write_to(self, dest: &mut [u8]) {
        dest.copy_from_slice(&self.0.to_le_bytes());
    }
}

impl Texel for Pf8888 {
    const BYTES: usize = 4;

    #[inline]
    fn pack(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pf8888(u32::from_le_bytes([r, g, b, a]))
    }

    #[inline]
    fn write_to(self, dest: &mut [u8]) {
        dest.copy_from_slice(&self.0.to_le_bytes());
    }
}

impl Pf8888 {
    /// Split the texel back into `[r, g, b, a]`
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of<T: Texel>(texel: T) -> Vec<u8> {
        let mut out = vec![0u8; T::BYTES];
        texel.write_to(&mut out);
        out
    }

    #[test]
    fn test_5650_packing() {
        assert_eq!(Pf5650::pack(0xFF, 0, 0, 0xFF), Pf5650(0x001F));
        assert_eq!(Pf5650::pack(0, 0xFF, 0, 0xFF), Pf5650(0x07E0));
        assert_eq!(Pf5650::pack(0, 0, 0xFF, 0xFF), Pf5650(0xF800));
        // Alpha has no storage
        assert_eq!(Pf5650::pack(0x80, 0x80, 0x80, 0x00), Pf5650::pack(0x80, 0x80, 0x80, 0xFF));
        // Low bits are truncated
        assert_eq!(Pf5650::pack(0x07, 0x03, 0x07, 0), Pf5650(0));
    }

    #[test]
    fn test_5551_packing() {
        assert_eq!(Pf5551::pack(0xFF, 0, 0, 0), Pf5551(0x001F));
        assert_eq!(Pf5551::pack(0, 0xFF, 0, 0), Pf5551(0x03E0));
        assert_eq!(Pf5551::pack(0, 0, 0xFF, 0), Pf5551(0x7C00));
        assert_eq!(Pf5551::pack(0, 0, 0, 0xFF), Pf5551(0x8000));
        // Alpha is the top bit of the source alpha
        assert_eq!(Pf5551::pack(0, 0, 0, 0x7F), Pf5551(0));
        assert_eq!(Pf5551::pack(0, 0, 0, 0x80), Pf5551(0x8000));
    }

    #[test]
    fn test_4444_packing() {
        assert_eq!(Pf4444::pack(0xFF, 0, 0, 0), Pf4444(0x000F));
        assert_eq!(Pf4444::pack(0, 0xFF, 0, 0), Pf4444(0x00F0));
        assert_eq!(Pf4444::pack(0, 0, 0xFF, 0), Pf4444(0x0F00));
        assert_eq!(Pf4444::pack(0, 0, 0, 0xFF), Pf4444(0xF000));
        assert_eq!(Pf4444::pack(0x12, 0x34, 0x56, 0x78), Pf4444(0x7531));
    }

    #[test]
    fn test_8888_packing() {
        let texel = Pf8888::pack(0x11, 0x22, 0x33, 0x44);
        assert_eq!(texel, Pf8888(0x4433_2211));
        assert_eq!(texel.to_rgba(), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_texels_are_little_endian() {
        assert_eq!(bytes_of(Pf5650(0xF800)), vec![0x00, 0xF8]);
        assert_eq!(bytes_of(Pf4444(0x1234)), vec![0x34, 0x12]);
        assert_eq!(bytes_of(Pf8888::pack(1, 2, 3, 4)), vec![1, 2, 3, 4]);
    }
}
