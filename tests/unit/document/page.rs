use super::*;
use crate::foundation::core::Size;

fn image_at(x: f64, y: f64) -> CanvasItem {
    CanvasItem::image(vec![0x89, b'P', b'N', b'G'], Size::new(400.0, 200.0), Point::new(x, y))
        .unwrap()
}

#[test]
fn empty_page_has_white_default_background() {
    let page = PageDocument::create_empty();
    assert!(page.items().is_empty());
    assert!(page.drawing_data().is_empty());
    assert_eq!(page.body_text(), "");
    assert_eq!(page.active_background(), Background::None);
    assert_eq!(page.active_background().base_color(), Rgba8::WHITE);
    assert_ne!(page.id(), PageDocument::create_empty().id());
}

#[test]
fn insert_then_remove_image() {
    let mut page = PageDocument::create_empty();
    let item = image_at(500.0, 700.0);
    let id = item.id;
    page.push_item(item).unwrap();

    let stored = page.item(id).unwrap();
    assert_eq!(stored.frame.origin, Point::new(375.0, 650.0));
    assert_eq!(stored.frame.size, Size::new(250.0, 125.0));

    assert!(page.remove_item(id));
    assert!(page.items().is_empty());
    assert!(!page.remove_item(id));
}

#[test]
fn removing_unknown_id_leaves_page_untouched() {
    let mut page = PageDocument::create_empty();
    page.push_item(image_at(100.0, 100.0)).unwrap();
    let before = page.clone();
    assert!(!page.remove_item(ItemId::new()));
    assert_eq!(page, before);
}

#[test]
fn duplicate_item_ids_are_rejected() {
    let mut page = PageDocument::create_empty();
    let item = image_at(1.0, 1.0);
    page.push_item(item.clone()).unwrap();
    let err = page.push_item(item).unwrap_err();
    assert!(matches!(err, MemoriesError::Validation(_)));
}

#[test]
fn transform_update_on_missing_item_is_not_found() {
    let mut page = PageDocument::create_empty();
    let ghost = ItemId::new();
    let err = page
        .update_item_transform(ghost, Frame::new(Point::ORIGIN, Size::new(1.0, 1.0)), 0.0)
        .unwrap_err();
    assert!(matches!(err, MemoriesError::NotFound(id) if id == ghost));
}

#[test]
fn transform_update_rejects_nan() {
    let mut page = PageDocument::create_empty();
    let item = image_at(1.0, 1.0);
    let id = item.id;
    page.push_item(item).unwrap();
    let frame = page.item(id).unwrap().frame;
    assert!(page.update_item_transform(id, frame, f64::NAN).is_err());
    assert_eq!(page.item(id).unwrap().rotation, 0.0);
}

#[test]
fn bring_to_front_reorders_only_target() {
    let mut page = PageDocument::create_empty();
    let ids: Vec<_> = (0..3)
        .map(|i| {
            let item = image_at(100.0 * f64::from(i), 100.0);
            let id = item.id;
            page.push_item(item).unwrap();
            id
        })
        .collect();
    page.bring_to_front(ids[0]).unwrap();
    let order: Vec<_> = page.items().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn item_at_prefers_topmost() {
    let mut page = PageDocument::create_empty();
    let below = image_at(500.0, 500.0);
    let above = image_at(520.0, 500.0);
    let (below_id, above_id) = (below.id, above.id);
    page.push_item(below).unwrap();
    page.push_item(above).unwrap();
    assert_eq!(page.item_at(Point::new(510.0, 500.0)).map(|i| i.id), Some(above_id));
    assert_eq!(page.item_at(Point::new(380.0, 500.0)).map(|i| i.id), Some(below_id));
    assert!(page.item_at(Point::new(10.0, 10.0)).is_none());
}

#[test]
fn image_background_takes_precedence_over_color() {
    let mut page = PageDocument::create_empty();
    page.set_background_color(Some(Rgba8::opaque(10, 20, 30)));
    assert_eq!(
        page.active_background(),
        Background::Color(Rgba8::opaque(10, 20, 30))
    );
    page.set_background_image(Some("letterbg1".into()));
    assert_eq!(page.active_background(), Background::Image("letterbg1".into()));
    assert_eq!(page.background_color(), Some(Rgba8::opaque(10, 20, 30)));
}

#[test]
fn legacy_text_can_be_edited_but_images_cannot() {
    let mut page = PageDocument::create_empty();
    let text = CanvasItem {
        id: ItemId::new(),
        frame: Frame::new(Point::new(10.0, 10.0), Size::new(200.0, 50.0)),
        rotation: 0.0,
        content: ItemContent::Text("old".into()),
    };
    let text_id = text.id;
    let image = image_at(300.0, 300.0);
    let image_id = image.id;
    page.push_item(text).unwrap();
    page.push_item(image).unwrap();

    page.update_text_content(text_id, "new").unwrap();
    assert_eq!(page.item(text_id).unwrap().text_content(), Some("new"));
    assert!(page.update_text_content(image_id, "nope").is_err());
}

#[test]
fn json_roundtrip_preserves_everything() {
    let mut page = PageDocument::create_empty();
    let mut item = image_at(500.0, 700.0);
    item.rotation = 0.3;
    page.push_item(item).unwrap();
    page.set_drawing_data(vec![9, 8, 7]);

    let rich = RichText::plain("Dear you", crate::document::TextStyle::default());
    page.set_body_text(rich.text());
    page.set_attributed_body_text(Some(rich.to_bytes().unwrap()));
    page.set_background_image(Some("letterbg1".into()));

    let bytes = page.to_json_bytes().unwrap();
    let back = PageDocument::from_json_bytes(&bytes).unwrap();
    assert_eq!(back, page);
    assert_eq!(back.rich_body().unwrap(), Some(rich));
}

#[test]
fn json_uses_camel_case_and_omits_absent_fields() {
    let page = PageDocument::create_empty();
    let v: serde_json::Value = serde_json::from_slice(&page.to_json_bytes().unwrap()).unwrap();
    assert!(v.get("drawingData").is_some());
    assert!(v.get("bodyText").is_some());
    assert!(v.get("backgroundColor").is_none());
    assert!(v.get("attributedBodyText").is_none());
}

#[test]
fn minimal_document_decodes_with_defaults() {
    let json = br#"{"id":"6f9619ff-8b86-d011-b42d-00c04fc964ff"}"#;
    let page = PageDocument::from_json_bytes(json).unwrap();
    assert!(page.items().is_empty());
    assert_eq!(page.active_background(), Background::None);
}

#[test]
fn decoding_rejects_duplicate_item_ids() {
    let item = r#"{"id":"6f9619ff-8b86-d011-b42d-00c04fc964ff","frame":[[0,0],[1,1]],"rotation":0,"type":"image","imageData":"AQID"}"#;
    let json = format!(
        r#"{{"id":"00000000-0000-0000-0000-000000000001","items":[{item},{item}]}}"#
    );
    let err = PageDocument::from_json_bytes(json.as_bytes()).unwrap_err();
    assert!(matches!(err, MemoriesError::Validation(_)), "{err}");
}

#[test]
fn garbage_is_a_serde_error() {
    let err = PageDocument::from_json_bytes(b"not json").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}
