// Texture layout and lifecycle tests
//
// Exercises the public API the caching and rendering layers consume:
// dimension correction, stride, loading and shared ownership.

use native_texture::texture::MIN_ROW_PITCH;
use native_texture::*;
use std::rc::Rc;

#[test]
fn test_layout_invariants_for_all_formats() {
    let sizes = [(1, 1), (2, 3), (7, 9), (31, 1), (50, 50), (300, 200), (1024, 1)];
    for format in TextureFormat::ALL {
        for (w, h) in sizes {
            let texture = NativeTexture::create(w, h, format);
            let texture = texture.borrow();

            assert!(texture.corrected_width().is_power_of_two());
            assert!(texture.corrected_height().is_power_of_two());
            assert!(texture.corrected_width() >= u64::from(w));
            assert!(texture.corrected_height() >= u64::from(h));
            assert!(texture.block_width() >= texture.corrected_width());
            assert!(texture.stride() >= MIN_ROW_PITCH);
            assert_eq!(
                texture.bytes_required(),
                texture.stride() * texture.corrected_height()
            );
        }
    }
}

#[test]
fn test_load_every_format() {
    let factory = TextureFactory::default();
    for format in TextureFormat::ALL {
        let texture = factory.create_resource(10, 6, format);
        let mut texture = texture.borrow_mut();

        let texels: Vec<u8> = (0..texture.bytes_required()).map(|i| i as u8).collect();
        let palette: Option<Vec<u32>> = format
            .palette_entries()
            .map(|n| (0..n as u32).map(|i| i * 0x0101_0101).collect());

        texture
            .set_data(&texels, palette.as_deref())
            .unwrap_or_else(|e| panic!("{}: {}", format, e));
        assert!(texture.has_data());
        assert!(texture.is_usable());
        assert_eq!(texture.texels(), Some(texels.as_slice()));

        // Reload replaces the contents wholesale
        let zeros = vec![0u8; texels.len()];
        texture
            .set_data(&zeros, palette.as_deref())
            .unwrap_or_else(|e| panic!("{}: {}", format, e));
        assert_eq!(texture.texels(), Some(zeros.as_slice()));
    }
}

#[test]
fn test_palette_contract_violations() {
    let texture = NativeTexture::create(4, 4, TextureFormat::Ci8);
    let mut texture = texture.borrow_mut();
    let texels = vec![0u8; texture.bytes_required() as usize];

    let err = texture.set_data(&texels, None).expect_err("palette required");
    assert_eq!(err.kind(), ErrorKind::ContractViolation);

    let direct = NativeTexture::create(4, 4, TextureFormat::Rgb5650);
    let mut direct = direct.borrow_mut();
    let texels = vec![0u8; direct.bytes_required() as usize];
    let err = direct
        .set_data(&texels, Some(&[0u32; 16]))
        .expect_err("palette not allowed");
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
}

#[test]
fn test_allocation_failure_is_safe() {
    let mut config = TextureConfig::default();
    config.memory.max_allocation_bytes = Some(16);
    let factory = TextureFactory::new(&config);

    for format in TextureFormat::ALL {
        let texture = factory.create_resource(256, 256, format);
        {
            let mut texture = texture.borrow_mut();
            assert!(!texture.has_data(), "{}", format);
            assert!(!texture.is_usable());
            let err = texture.set_data(&[], None).expect_err("no storage");
            assert_eq!(err.kind(), ErrorKind::Allocation);
            texture.install_texture();
        }
        drop(texture);
    }
}

#[test]
fn test_shared_until_last_holder() {
    let texture = TextureFactory::default().create_resource(16, 16, TextureFormat::Rgba8888);
    let holders: Vec<TextureRef> = (0..3).map(|_| Rc::clone(&texture)).collect();
    let weak = Rc::downgrade(&texture);
    assert_eq!(Rc::strong_count(&texture), 4);

    drop(texture);
    for holder in holders {
        assert!(weak.upgrade().is_some());
        assert!(holder.borrow().has_data());
    }
    assert!(weak.upgrade().is_none());
}
