use std::io::Cursor;

use super::*;
use crate::assets::qr::qr_image;
use crate::foundation::error::CardError;
use crate::model::record::{Track, TrackNumber};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn test_face() -> Option<FontFace> {
    let from_env = std::env::var("CDCARD_TEST_FONT").ok();
    let path = from_env
        .as_deref()
        .into_iter()
        .chain(FONT_CANDIDATES.iter().copied())
        .find(|p| std::path::Path::new(p).is_file())?;
    FontFace::load(path).ok()
}

fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn sample_record(tracks: u8) -> ReleaseRecord {
    ReleaseRecord {
        title: "THE IDOLM@STER MASTER ARTIST 4".to_string(),
        release_date: "2024/3/6".to_string(),
        artist_line: "歌：天海春香 (CV.中村繪里子)".to_string(),
        cover_ref: None,
        tracks: (1..=tracks)
            .map(|n| {
                Track::new(TrackNumber::new(n).unwrap(), format!("Track {n}"))
                    .with_staff(["作詞：someone", "作曲：someone else"])
            })
            .collect(),
    }
}

#[test]
fn invalid_config_is_rejected_before_font_use() {
    let cfg = LayoutConfig {
        outer_padding: 0,
        ..LayoutConfig::default()
    };
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let err = CardRenderer::new(cfg, face).unwrap_err();
    assert!(matches!(err, CardError::ConfigurationInvalid(_)));
}

#[test]
fn fixed_height_is_capped_at_maximum() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let req = CardRequest::new(sample_record(1), "x").with_fixed_height(4000);
    assert_eq!(r.resolve_height(&req), 1500);
    let req = CardRequest::new(sample_record(1), "x").with_fixed_height(700);
    assert_eq!(r.resolve_height(&req), 700);
}

#[test]
fn render_matches_estimate_and_encodes_png() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let req = CardRequest::new(sample_record(4), "https://example.com/release")
        .with_cover(png(600, 300, [200, 10, 10, 255]))
        .with_code(png(50, 50, [0, 0, 0, 255]));

    let est = r.estimate(&req.record);
    let frame = r.render(&req).unwrap();
    assert_eq!(frame.width, 1200);
    assert_eq!(frame.height, est.resolved);

    let plan = r.plan(&req).unwrap();
    let cover = plan.regions.cover;
    let mid = frame
        .pixel(
            ((cover.x0 + cover.x1) / 2.0) as u32,
            ((cover.y0 + cover.y1) / 2.0) as u32,
        )
        .unwrap();
    let expected = [200u8, 10, 10, 255];
    for (got, want) in mid.iter().zip(expected) {
        assert!(got.abs_diff(want) <= 2, "cover pixel {mid:?}");
    }

    let bytes = r.render_png(&req).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 1200);
}

#[test]
fn corrupt_images_render_empty_slots() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let req = CardRequest::new(sample_record(2), "x")
        .with_cover(b"garbage".to_vec())
        .with_code(b"garbage".to_vec());
    let frame = r.render(&req).unwrap();
    let plan = r.plan(&req).unwrap();
    let code = plan.regions.code;
    let px = frame
        .pixel(
            ((code.x0 + code.x1) / 2.0) as u32,
            ((code.y0 + code.y1) / 2.0) as u32,
        )
        .unwrap();
    assert_eq!(px, [255, 255, 255, 255]);
}

#[test]
fn forty_tracks_render_at_maximum_height() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let req = CardRequest::new(sample_record(40), "x");
    let plan = r.plan(&req).unwrap();
    assert_eq!(plan.canvas.height, 1500);
    assert!(plan.is_truncated());
    assert!(plan.regions.tracklist_bottom <= plan.regions.code.y0);
    let frame = r.render(&req).unwrap();
    assert_eq!(frame.height, 1500);
}

#[test]
fn link_qr_fills_code_slot_when_no_image_is_given() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let link = "https://example.com/release";
    let req = CardRequest::new(sample_record(2), link).with_link_qr();
    let frame = r.render(&req).unwrap();
    let code = r.plan(&req).unwrap().regions.code;

    // Map source pixels of the unscaled symbol onto the 190px slot.
    let src_side = f64::from(qr_image(link).unwrap().width());
    let at = |src: f64| -> (u32, u32) {
        let d = src * code.width() / src_side;
        ((code.x0 + d) as u32, (code.y0 + d) as u32)
    };
    // Quiet zone is light, the top-left finder center is dark.
    let (x, y) = at(3.0);
    assert_eq!(frame.pixel(x, y), Some([255, 255, 255, 255]));
    let (x, y) = at(27.0);
    assert_eq!(frame.pixel(x, y), Some([0, 0, 0, 255]));

    // Without the flag the slot stays empty.
    let frame = r.render(&CardRequest::new(sample_record(2), link)).unwrap();
    let (x, y) = at(27.0);
    assert_eq!(frame.pixel(x, y), Some([255, 255, 255, 255]));
}

#[test]
fn supplied_code_image_wins_over_link_qr() {
    let Some(face) = test_face() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let r = CardRenderer::new(LayoutConfig::default(), face).unwrap();
    let req = CardRequest::new(sample_record(1), "https://example.com")
        .with_code(png(10, 10, [0, 0, 255, 255]))
        .with_link_qr();
    let frame = r.render(&req).unwrap();
    let code = r.plan(&req).unwrap().regions.code;
    let px = frame
        .pixel((code.x0 + 3.0) as u32, (code.y0 + 3.0) as u32)
        .unwrap();
    assert_eq!(px, [0, 0, 255, 255]);
}
