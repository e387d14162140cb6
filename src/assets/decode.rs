use std::{io::Cursor, sync::Arc};

use crate::foundation::core::Size;
use crate::foundation::error::{MemoriesError, MemoriesResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[derive(Clone, Debug)]
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}

impl PreparedSvg {
    pub fn size(&self) -> Size {
        let s = self.tree.size();
        Size::new(f64::from(s.width()), f64::from(s.height()))
    }
}

pub fn decode_image(bytes: &[u8]) -> MemoriesResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MemoriesError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(MemoriesError::decode("decoded image is empty"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Natural pixel size of encoded image bytes, read from the header only.
pub fn read_image_size(bytes: &[u8]) -> MemoriesResult<Size> {
    let (w, h) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MemoriesError::decode(format!("guess image format: {e}")))?
        .into_dimensions()
        .map_err(|e| MemoriesError::decode(format!("read image dimensions: {e}")))?;
    if w == 0 || h == 0 {
        return Err(MemoriesError::decode(format!("image has empty size {w}x{h}")));
    }
    Ok(Size::new(f64::from(w), f64::from(h)))
}

pub fn parse_svg(bytes: &[u8]) -> MemoriesResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| MemoriesError::decode(format!("parse svg tree: {e}")))?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
