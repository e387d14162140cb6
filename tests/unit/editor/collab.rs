use super::*;
use crate::store::InMemoryPageStore;

#[test]
fn user_ids_parse_and_display() {
    let id = UserId::new();
    assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    let err = "not-a-uuid".parse::<LetterId>().unwrap_err();
    assert!(err.to_string().contains("invalid letter id 'not-a-uuid'"));
}

#[test]
fn letter_record_serializes_timestamp_as_rfc3339() {
    let letter = Letter {
        id: LetterId::new(),
        sender_id: UserId::new(),
        recipient_id: UserId::new(),
        image_url: "outbox/x.jpg".to_string(),
        created_at: DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc),
    };
    let json = serde_json::to_value(&letter).unwrap();
    assert_eq!(json["created_at"], "2024-05-01T12:30:00Z");
    assert_eq!(serde_json::from_value::<Letter>(json).unwrap(), letter);
}

#[test]
fn collaborators_debug_reports_wiring() {
    let c = Collaborators::new(InMemoryPageStore::new());
    let s = format!("{c:?}");
    assert!(s.contains("transport: false"));
    assert!(s.contains("templates: false"));
}
