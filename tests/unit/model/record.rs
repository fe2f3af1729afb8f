use super::*;

#[test]
fn track_number_pads_to_two_digits() {
    assert_eq!(TrackNumber::parse("1").unwrap().to_string(), "01");
    assert_eq!(TrackNumber::parse("12").unwrap().to_string(), "12");
    assert_eq!(TrackNumber::new(0).unwrap().as_padded(), "00");
    assert!(TrackNumber::parse("123").is_none());
    assert!(TrackNumber::parse("a1").is_none());
    assert!(TrackNumber::parse("").is_none());
    assert!(TrackNumber::new(100).is_none());
}

#[test]
fn record_json_normalizes_numbers_and_defaults_missing_fields() {
    let json = r#"{
        "title": "STARLIGHT",
        "tracks": [
            { "number": 1, "title": "Opening" },
            { "number": "2", "title": "Second", "staff": ["作詞：A", "作曲：B"] }
        ]
    }"#;
    let rec: ReleaseRecord = serde_json::from_str(json).unwrap();
    assert_eq!(rec.release_date, "");
    assert_eq!(rec.cover_ref, None);
    assert_eq!(rec.tracks[0].number.to_string(), "01");
    assert_eq!(rec.tracks[1].display_line(), "02 Second");
    assert_eq!(
        rec.tracks[1].joined_staff(" / ").as_deref(),
        Some("作詞：A / 作曲：B")
    );
    assert_eq!(rec.tracks[0].joined_staff(" / "), None);

    let out = serde_json::to_value(&rec).unwrap();
    assert_eq!(out["tracks"][0]["number"], "01");
}

#[test]
fn record_json_rejects_bad_track_numbers() {
    let json = r#"{ "tracks": [ { "number": "001", "title": "x" } ] }"#;
    assert!(serde_json::from_str::<ReleaseRecord>(json).is_err());
    let json = r#"{ "tracks": [ { "number": 300, "title": "x" } ] }"#;
    assert!(serde_json::from_str::<ReleaseRecord>(json).is_err());
}

#[test]
fn staff_order_is_preserved() {
    let t = Track::new(TrackNumber::new(3).unwrap(), "T").with_staff(["c", "a", "b"]);
    assert_eq!(t.staff, vec!["c", "a", "b"]);
}
