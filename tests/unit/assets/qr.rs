use super::*;
use crate::assets::decode::{SlotFit, prepare_for_slot};
use crate::foundation::error::CardError;

/// Luma of the pixel at the center of module `(mx, my)`, quiet zone excluded.
fn module_luma(img: &image::GrayImage, mx: u32, my: u32) -> u8 {
    let at = |m: u32| (m + QUIET_ZONE) * MODULE_PX + MODULE_PX / 2;
    img.get_pixel(at(mx), at(my)).0[0]
}

#[test]
fn symbol_has_quiet_zone_and_finder_patterns() {
    let img = qr_image("https://example.com").unwrap().to_luma8();
    let side = img.width();
    assert_eq!(img.height(), side);
    assert_eq!(side % MODULE_PX, 0);
    let modules = side / MODULE_PX - 2 * QUIET_ZONE;
    // Version 1 is 21 modules; every version adds 4.
    assert!(modules >= 21 && (modules - 21) % 4 == 0);

    assert_eq!(img.get_pixel(0, 0).0[0], 255);
    assert_eq!(img.get_pixel(side - 1, side - 1).0[0], 255);

    // Top-left finder: dark ring, light ring, dark 3x3 center.
    assert_eq!(module_luma(&img, 0, 0), 0);
    assert_eq!(module_luma(&img, 1, 1), 255);
    assert_eq!(module_luma(&img, 3, 3), 0);
    // Top-right and bottom-left finders.
    assert_eq!(module_luma(&img, modules - 1, 0), 0);
    assert_eq!(module_luma(&img, 0, modules - 1), 0);
    // Separator next to the top-left finder.
    assert_eq!(module_luma(&img, 7, 0), 255);
}

#[test]
fn longer_links_need_larger_symbols() {
    let short = qr_image("https://a.jp").unwrap();
    let long = qr_image(&format!("https://example.com/{}", "x".repeat(200))).unwrap();
    assert!(long.width() > short.width());
}

#[test]
fn oversized_payload_is_an_error() {
    let err = qr_image(&"x".repeat(8000)).unwrap_err();
    assert!(matches!(err, CardError::Other(_)));
}

#[test]
fn fills_the_code_slot() {
    let img = qr_image("https://www.lantis.jp/imas/").unwrap();
    let prepared = prepare_for_slot(&img, 190, SlotFit::Fill);
    assert_eq!((prepared.width, prepared.height), (190, 190));
    // Opaque black and white only.
    for px in prepared.rgba8_premul.chunks_exact(4) {
        assert_eq!(px[3], 255);
        assert!(px[0] == 0 || px[0] == 255);
    }
}
