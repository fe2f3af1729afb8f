//! QR code of the link line, for cards without a supplied code image.

use anyhow::Context as _;
use qrcode::{Color, QrCode};

use crate::foundation::error::CardResult;

/// Light modules around the symbol.
const QUIET_ZONE: u32 = 1;
/// Pixels per module before the image is sized for its slot.
const MODULE_PX: u32 = 6;

/// Black-on-white QR code encoding `target`, with a one-module quiet zone.
///
/// The result is square; size it for the code slot with [`SlotFit::Fill`].
///
/// [`SlotFit::Fill`]: crate::assets::decode::SlotFit::Fill
pub fn qr_image(target: &str) -> CardResult<image::DynamicImage> {
    let code = QrCode::new(target.as_bytes())
        .with_context(|| format!("encode {} bytes as a QR code", target.len()))?;
    let modules = u32::try_from(code.width()).context("QR symbol width")?;
    let colors = code.to_colors();

    let side = (modules + 2 * QUIET_ZONE) * MODULE_PX;
    let img = image::GrayImage::from_fn(side, side, |x, y| {
        let module = |p: u32| (p / MODULE_PX).checked_sub(QUIET_ZONE).filter(|m| *m < modules);
        let dark = match (module(x), module(y)) {
            (Some(mx), Some(my)) => colors[(my * modules + mx) as usize] == Color::Dark,
            _ => false,
        };
        image::Luma([if dark { 0 } else { 255 }])
    });
    Ok(image::DynamicImage::ImageLuma8(img))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/qr.rs"]
mod tests;
