use super::*;

fn frame(px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: px.repeat(4),
        premultiplied,
    }
}

#[test]
fn png_roundtrips_straight_alpha() {
    let settings = FlattenSettings {
        format: OutputFormat::Png,
        jpeg_quality: 80,
    };
    // Premultiplied (64, 0, 0, 128) is straight (128, 0, 0, 128).
    let bytes = encode_frame(&frame([64, 0, 0, 128], true), &settings).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn jpeg_composites_over_white() {
    let bytes = encode_frame(&frame([0, 0, 0, 0], true), &FlattenSettings::default()).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let [r, g, b] = img.get_pixel(1, 1).0;
    assert!(r > 250 && g > 250 && b > 250, "{r} {g} {b}");
}

#[test]
fn straight_frames_are_premultiplied_before_jpeg() {
    let f = frame([255, 0, 0, 0], false);
    let rgb = over_white_rgb(&f);
    assert_eq!(&rgb[..3], &[255, 255, 255]);
}

#[test]
fn buffer_size_mismatch_is_rejected() {
    let mut f = frame([0, 0, 0, 255], true);
    f.data.pop();
    assert!(encode_frame(&f, &FlattenSettings::default()).is_err());
}
