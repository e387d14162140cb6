use super::*;
use crate::assets::decode::parse_svg;

const RED_SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

#[test]
fn params_follow_draw_scale() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    let (w, h, adjust) = svg_raster_params(&svg.tree, Affine::scale_non_uniform(3.0, 2.0)).unwrap();
    assert_eq!((w, h), (30, 20));
    let p = adjust * kurbo::Point::new(30.0, 20.0);
    assert!((p.x - 10.0).abs() < 1e-9 && (p.y - 10.0).abs() < 1e-9);
}

#[test]
fn huge_scale_is_rejected() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    let err = svg_raster_params(&svg.tree, Affine::scale(5_000.0)).unwrap_err();
    assert!(err.to_string().starts_with("flatten error:"));
}

#[test]
fn rasterizes_opaque_fill() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    let px = rasterize_svg_to_premul_rgba8(&svg.tree, 4, 4).unwrap();
    assert_eq!(px.len(), 4 * 4 * 4);
    assert_eq!(&px[..4], &[255, 0, 0, 255]);
}
