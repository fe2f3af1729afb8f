use super::*;

fn page(lines: &[&str]) -> ReleaseText {
    ReleaseText {
        lines: lines.iter().map(|s| s.to_string()).collect(),
        ..ReleaseText::default()
    }
}

#[test]
fn extracts_labelled_date_artist_and_tracks() {
    let p = page(&[
        "  ",
        "THE IDOLM@STER MASTER ARTIST 5",
        "発売日：2024/3/6",
        "歌：天海春香 (CV.中村繪里子)",
        "01：READY!!",
        "作詞：yura",
        "作曲・編曲：NBGI",
        "■ 特典",
        "02：Brand New Day",
        "text 作詞 ignored",
        "作詞：X",
    ]);
    let rec = extract_release(&p);
    assert_eq!(rec.title, "THE IDOLM@STER MASTER ARTIST 5");
    assert_eq!(rec.release_date, "2024/3/6");
    assert_eq!(rec.artist_line, "歌：天海春香 (CV.中村繪里子)");
    assert_eq!(rec.tracks.len(), 2);
    assert_eq!(rec.tracks[0].number.to_string(), "01");
    assert_eq!(rec.tracks[0].title, "READY!!");
    assert_eq!(rec.tracks[0].staff, vec!["作詞：yura", "作曲・編曲：NBGI"]);
    assert_eq!(rec.tracks[1].staff, vec!["作詞：X"]);
}

#[test]
fn falls_back_to_release_stamp_and_artist_label() {
    let p = page(&[
        "2025.04.09 RELEASE",
        "アーティスト：シャイニーカラーズ",
        "1．Title One",
        "10 : Title Ten",
    ]);
    let rec = extract_release(&p);
    assert_eq!(rec.release_date, "2025/4/9");
    assert_eq!(rec.artist_line, "アーティスト：シャイニーカラーズ");
    let numbers: Vec<String> = rec.tracks.iter().map(|t| t.number.to_string()).collect();
    assert_eq!(numbers, vec!["01", "10"]);
    assert_eq!(rec.tracks[1].title, "Title Ten");
    assert_eq!(rec.title, "");
}

#[test]
fn heading_wins_over_title_marker() {
    let mut p = page(&["THE IDOLM@STER fallback"]);
    p.heading = Some("  Heading Title ".to_string());
    p.cover_url = Some("https://example.com/c.jpg".to_string());
    let rec = extract_release(&p);
    assert_eq!(rec.title, "Heading Title");
    assert_eq!(rec.cover_ref.as_deref(), Some("https://example.com/c.jpg"));
}

#[test]
fn staff_lines_before_first_track_are_ignored() {
    let rec = extract_release(&page(&["作詞：orphan", "03：Only"]));
    assert_eq!(rec.tracks.len(), 1);
    assert!(rec.tracks[0].staff.is_empty());
}

#[test]
fn track_line_parser_rejects_near_misses() {
    assert!(parse_track_line("123：x").is_none());
    assert!(parse_track_line("01 x").is_none());
    assert!(parse_track_line("01：").is_none());
    assert!(parse_track_line("：x").is_none());
    assert!(parse_release_stamp("2024.1.2 RELEASED").is_none());
    assert!(parse_release_stamp("24.1.2 RELEASE").is_none());
}

#[test]
fn full_width_track_numbers_are_recognised() {
    let (n, title) = parse_track_line("１：曲名").unwrap();
    assert_eq!((n.get(), title.as_str()), (1, "曲名"));
    let (n, title) = parse_track_line("１２．Title").unwrap();
    assert_eq!((n.get(), title.as_str()), (12, "Title"));
    let (n, _) = parse_track_line("0３:Mixed").unwrap();
    assert_eq!(n.get(), 3);
    assert!(parse_track_line("１２３：x").is_none());

    let rec = extract_release(&page(&["０１：春", "作曲：A", "０２：夏"]));
    let numbers: Vec<u8> = rec.tracks.iter().map(|t| t.number.get()).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(rec.tracks[0].staff, vec!["作曲：A"]);
}

#[test]
fn from_text_splits_lines() {
    let p = ReleaseText::from_text("01：A\n作曲：B\n");
    let rec = extract_release(&p);
    assert_eq!(rec.tracks[0].staff, vec!["作曲：B"]);
}
