use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MemoriesError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MemoriesError::decode("x").to_string().contains("decode error:"));
    assert!(
        MemoriesError::flatten("x")
            .to_string()
            .contains("flatten error:")
    );
    assert!(
        MemoriesError::transmission("x")
            .to_string()
            .contains("transmission error:")
    );
    assert!(
        MemoriesError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(
        MemoriesError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn not_found_names_the_item() {
    let id = ItemId::new();
    let err = MemoriesError::NotFound(id);
    assert!(err.to_string().contains(&id.to_string()));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemoriesError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_io_bound_failures_are_retryable() {
    assert!(MemoriesError::transmission("offline").is_retryable());
    assert!(MemoriesError::persistence("disk full").is_retryable());
    assert!(!MemoriesError::decode("garbage").is_retryable());
    assert!(!MemoriesError::flatten("zero bounds").is_retryable());
}
