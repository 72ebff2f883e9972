//! Tests for delete identifier resolution.

use curio::{MatchKind, extract_remote_id, remote_id_for, resolve_identifier};
use curio_core::AssetRecord;

fn records() -> Vec<AssetRecord> {
    vec![
        AssetRecord::new(
            "https://cdn.test/image/upload/v1/gallery/sunset.jpg",
            Some("gallery/sunset".to_string()),
            300,
        ),
        AssetRecord::new("https://cdn.test/image/upload/v1/gallery/2.jpg", None, 200),
        AssetRecord::new(
            "https://cdn.test/image/upload/v1/gallery/sunset-2.jpg",
            Some("gallery/sunset-2".to_string()),
            100,
        ),
    ]
}

#[test]
fn test_position_wins() {
    let records = records();
    let resolution = resolve_identifier(&records, "2").unwrap();
    assert_eq!(resolution.index, 2);
    assert_eq!(resolution.matched_by, MatchKind::Position);
}

#[test]
fn test_out_of_bounds_position_falls_through() {
    let records = records();
    // With two records "2" is out of bounds and matches ".../2.jpg" instead
    let resolution = resolve_identifier(&records[..2], "2").unwrap();
    assert_eq!(resolution.index, 1);
    assert_eq!(resolution.matched_by, MatchKind::Substring);

    assert!(resolve_identifier(&records, "99").is_none());
}

#[test]
fn test_remote_id_before_url() {
    let records = records();
    let resolution = resolve_identifier(&records, "gallery/sunset-2").unwrap();
    assert_eq!(resolution.index, 2);
    assert_eq!(resolution.matched_by, MatchKind::RemoteId);
}

#[test]
fn test_exact_url_before_substring() {
    let records = records();
    let resolution =
        resolve_identifier(&records, "https://cdn.test/image/upload/v1/gallery/sunset-2.jpg")
            .unwrap();
    assert_eq!(resolution.index, 2);
    assert_eq!(resolution.matched_by, MatchKind::ExactUrl);
}

#[test]
fn test_substring_takes_first_match() {
    let records = records();
    let resolution = resolve_identifier(&records, "sunset").unwrap();
    assert_eq!(resolution.index, 0);
    assert_eq!(resolution.matched_by, MatchKind::Substring);
}

#[test]
fn test_identifier_containing_url() {
    let records = records();
    let resolution = resolve_identifier(
        &records,
        "https://cdn.test/image/upload/v1/gallery/2.jpg?width=300",
    )
    .unwrap();
    assert_eq!(resolution.index, 1);
    assert_eq!(resolution.matched_by, MatchKind::Substring);
}

#[test]
fn test_resolution_is_deterministic() {
    let records = records();
    for identifier in ["0", "gallery/sunset", "sunset", "jpg"] {
        assert_eq!(
            resolve_identifier(&records, identifier),
            resolve_identifier(&records, identifier)
        );
    }
}

#[test]
fn test_empty_and_unmatched() {
    let records = records();
    assert!(resolve_identifier(&records, "").is_none());
    assert!(resolve_identifier(&records, "nothing-like-this").is_none());
    assert!(resolve_identifier(&[], "0").is_none());
}

#[test]
fn test_extract_remote_id() {
    assert_eq!(
        extract_remote_id("https://res.test/demo/image/upload/v1712/gallery/sunset.jpg").as_deref(),
        Some("gallery/sunset")
    );
    assert_eq!(
        extract_remote_id("http://localhost:8080/media/image/upload/projects/abc123.png")
            .as_deref(),
        Some("projects/abc123")
    );
    assert_eq!(
        extract_remote_id("https://res.test/raw/upload/v3/resumes/cv").as_deref(),
        Some("resumes/cv")
    );
    assert_eq!(extract_remote_id("https://elsewhere.test/sunset.jpg"), None);
}

#[test]
fn test_remote_id_for_prefers_stored_id() {
    let stored = AssetRecord::new(
        "https://cdn.test/image/upload/v1/gallery/a.jpg",
        Some("custom/id".to_string()),
        0,
    );
    assert_eq!(remote_id_for(&stored).as_deref(), Some("custom/id"));

    let blank = AssetRecord::new(
        "https://cdn.test/image/upload/v1/gallery/a.jpg",
        Some(String::new()),
        0,
    );
    assert_eq!(remote_id_for(&blank).as_deref(), Some("gallery/a"));
}
