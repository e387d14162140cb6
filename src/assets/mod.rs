//! Image, SVG, and background template assets.
//!
//! Everything here front-loads decoding so renderers never touch encoded
//! bytes or the filesystem.

pub mod decode;
pub mod svg_raster;
pub mod templates;

pub use decode::{PreparedImage, PreparedSvg, decode_image, parse_svg, read_image_size};
pub use templates::{
    BACKGROUND_TEMPLATES, DirTemplateSource, PreparedTemplate, TemplateBytes, TemplateFormat,
    TemplateSource,
};
