use super::*;

#[test]
fn empty_font_bytes_are_unavailable() {
    let err = FontFace::from_bytes(Vec::new()).unwrap_err();
    assert!(matches!(err, CardError::FontUnavailable(_)));
}

#[test]
fn garbage_font_bytes_are_unavailable() {
    let err = FontFace::from_bytes(b"definitely not a font".to_vec()).unwrap_err();
    assert!(matches!(err, CardError::FontUnavailable(_)));
}

#[test]
fn missing_font_file_is_unavailable() {
    let err = FontFace::load("this/path/does/not/exist.otf").unwrap_err();
    assert!(matches!(err, CardError::FontUnavailable(_)));
    assert!(err.to_string().contains("exist.otf"));
}

#[test]
fn fixed_advance_distinguishes_ascii_and_wide() {
    let m = FixedAdvance;
    assert_eq!(m.width("", 20.0), 0.0);
    assert_eq!(m.width("ab", 20.0), 20.0);
    assert_eq!(m.width("曲目", 20.0), 40.0);
    assert_eq!(m.width("a曲", 10.0), 15.0);
}

#[test]
fn fixed_advance_is_monotonic_under_append() {
    let m = FixedAdvance;
    let text = "01 READY!! 作詞：yura / 作曲：NBGI";
    let mut prefix = String::new();
    let mut last = 0.0;
    for ch in text.chars() {
        prefix.push(ch);
        let w = m.width(&prefix, 22.0);
        assert!(w >= last);
        last = w;
    }
}
