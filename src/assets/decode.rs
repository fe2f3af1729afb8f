use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::CardResult;

/// Raster image in premultiplied RGBA8 form, sized for the slot it will fill.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// How a decoded image is sized into a square slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotFit {
    /// Keep the aspect ratio and only ever shrink, so the image fits inside the square.
    Contain,
    /// Resize to exactly fill the square.
    Fill,
}

/// Decode encoded image bytes (PNG, JPEG, ...).
pub fn decode_image(bytes: &[u8]) -> CardResult<image::DynamicImage> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(img)
}

/// Decode an optional, decorative asset. Absent or undecodable bytes yield `None`; the
/// slot is then drawn as an empty outlined box.
pub fn decode_optional(bytes: Option<&[u8]>, what: &str) -> Option<image::DynamicImage> {
    let Some(bytes) = bytes else {
        tracing::debug!(asset = what, "no image supplied");
        return None;
    };
    match decode_image(bytes) {
        Ok(img) => Some(img),
        Err(err) => {
            tracing::warn!(asset = what, error = %err, "image unavailable, leaving slot empty");
            None
        }
    }
}

/// Size `img` for a square slot of `side` pixels and convert to premultiplied RGBA8.
pub fn prepare_for_slot(img: &image::DynamicImage, side: u32, fit: SlotFit) -> PreparedImage {
    let side = side.max(1);
    let sized = match fit {
        SlotFit::Contain if img.width() > side || img.height() > side => {
            img.resize(side, side, image::imageops::FilterType::Lanczos3)
        }
        SlotFit::Contain => img.clone(),
        SlotFit::Fill if img.width() == side && img.height() == side => img.clone(),
        SlotFit::Fill => img.resize_exact(side, side, image::imageops::FilterType::Nearest),
    };

    let rgba = sized.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Undo premultiplication, for encoders that expect straight alpha.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
