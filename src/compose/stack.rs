use rayon::prelude::*;

use crate::config::layout::LayoutConfig;
use crate::foundation::core::{Rgba8, palette};
use crate::foundation::error::{CardError, CardResult};
use crate::render::card::{CardRenderer, CardRequest};
use crate::render::frame::CardImage;
use crate::text::measure::FontFace;

/// Appearance of a stacked sheet of cards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StackOptions {
    /// Margin around the sheet and gap between cards.
    pub padding: u32,
    /// Sheet color.
    pub background: Rgba8,
    /// Card outline color.
    pub border: Rgba8,
    /// Card outline width in pixels.
    pub border_width: u32,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            padding: 30,
            background: palette::STACK_BACKGROUND,
            border: palette::STACK_BORDER,
            border_width: 2,
        }
    }
}

/// Render many cards in parallel, one [`CardRenderer`] per worker thread.
///
/// Output order matches `requests`. The first failing card fails the batch.
#[tracing::instrument(skip(config, font, requests), fields(cards = requests.len()))]
pub fn render_batch(
    config: &LayoutConfig,
    font: &FontFace,
    requests: &[CardRequest],
    threads: Option<usize>,
) -> CardResult<Vec<CardImage>> {
    config.validate()?;
    let pool = build_thread_pool(threads)?;

    let rendered = pool.install(|| {
        requests
            .par_iter()
            .map_init(
                || CardRenderer::new(config.clone(), font.clone()),
                |renderer, request| -> CardResult<CardImage> {
                    match renderer {
                        Ok(r) => r.render(request),
                        Err(e) => Err(CardError::Other(anyhow::anyhow!(
                            "worker renderer setup failed: {e}"
                        ))),
                    }
                },
            )
            .collect::<Vec<_>>()
    });

    rendered.into_iter().collect()
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::config("batch 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Stack cards vertically on one sheet, each centered and outlined.
///
/// Returns `None` for an empty slice.
pub fn stack_cards(
    cards: &[CardImage],
    opts: &StackOptions,
) -> CardResult<Option<image::RgbaImage>> {
    let Some(max_w) = cards.iter().map(|c| c.width).max() else {
        return Ok(None);
    };
    let pad = opts.padding;
    let width = pad + max_w + pad;
    let gaps = pad * (cards.len() as u32 - 1);
    let height = pad + cards.iter().map(|c| c.height).sum::<u32>() + gaps + pad;

    let bg = image::Rgba([
        opts.background.r,
        opts.background.g,
        opts.background.b,
        opts.background.a,
    ]);
    let mut sheet = image::RgbaImage::from_pixel(width, height, bg);

    let mut y = pad;
    for card in cards {
        let x = pad + (max_w - card.width) / 2;
        let img = card.to_rgba_image()?;
        image::imageops::overlay(&mut sheet, &img, i64::from(x), i64::from(y));
        outline(&mut sheet, x, y, card.width, card.height, opts);
        y += card.height + pad;
    }
    Ok(Some(sheet))
}

/// Outline the inclusive box `[x, x + w] x [y, y + h]`, growing inward.
fn outline(sheet: &mut image::RgbaImage, x: u32, y: u32, w: u32, h: u32, opts: &StackOptions) {
    let color = image::Rgba([opts.border.r, opts.border.g, opts.border.b, opts.border.a]);
    let (x1, y1) = (x + w, y + h);
    let mut put = |px: u32, py: u32| {
        if px < sheet.width() && py < sheet.height() {
            sheet.put_pixel(px, py, color);
        }
    };
    for t in 0..opts.border_width.min(w / 2 + 1).min(h / 2 + 1) {
        for px in x + t..=x1 - t {
            put(px, y + t);
            put(px, y1 - t);
        }
        for py in y + t..=y1 - t {
            put(x + t, py);
            put(x1 - t, py);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/stack.rs"]
mod tests;
