use std::io::Cursor;

use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::foundation::math::{mul_div255_u16, unpremultiply_rgba8_in_place};
use crate::render::{FlattenSettings, FrameRGBA, OutputFormat};

/// Encode a rendered frame as PNG or JPEG.
///
/// JPEG has no alpha, so translucent pixels are composited over white first.
pub fn encode_frame(frame: &FrameRGBA, settings: &FlattenSettings) -> MemoriesResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(MemoriesError::flatten(format!(
            "frame has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let mut buf = Vec::new();
    match settings.format {
        OutputFormat::Png => {
            let mut rgba = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut rgba);
            }
            let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
                .ok_or_else(|| MemoriesError::flatten("frame buffer does not match its size"))?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| MemoriesError::flatten(format!("encode png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb = over_white_rgb(frame);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, settings.quality())
                .encode(
                    &rgb,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| MemoriesError::flatten(format!("encode jpeg: {e}")))?;
        }
    }
    Ok(buf)
}

fn over_white_rgb(frame: &FrameRGBA) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame.width as usize * frame.height as usize * 3);
    for px in frame.data.chunks_exact(4) {
        let a = u16::from(px[3]);
        for &c in &px[..3] {
            let c = u16::from(c);
            let premul = if frame.premultiplied {
                c
            } else {
                mul_div255_u16(c, a)
            };
            out.push((premul + (255 - a)).min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
