// Common test utilities for image-backed texture tests
//
// Fixtures are encoded with the `png` crate at test time and written into a
// temporary directory that is removed when the returned guard drops.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A PNG fixture on disk
pub struct PngFixture {
    /// Keeps the directory alive for the duration of the test
    _dir: TempDir,
    /// Path to the encoded file
    pub path: PathBuf,
}

/// Encode 8-bit image data as PNG bytes
pub fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("Failed to write PNG header");
        writer
            .write_image_data(data)
            .expect("Failed to write PNG data");
    }
    out
}

/// Write a PNG fixture to a fresh temporary directory
pub fn write_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> PngFixture {
    write_file("fixture.png", &encode_png(width, height, color, data))
}

/// Write arbitrary bytes to a fresh temporary directory
pub fn write_file(name: &str, contents: &[u8]) -> PngFixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    PngFixture { _dir: dir, path }
}

/// Read texel `x` of row `y` from an 8888 texture row
pub fn rgba_at(row: &[u8], x: usize) -> [u8; 4] {
    let offset = x * 4;
    [row[offset], row[offset + 1], row[offset + 2], row[offset + 3]]
}
