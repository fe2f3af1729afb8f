use crate::assets::decode::{SlotFit, decode_optional, prepare_for_slot};
use crate::assets::qr::qr_image;
use crate::config::layout::LayoutConfig;
use crate::foundation::error::CardResult;
use crate::layout::estimate::{HeightEstimate, estimate_height};
use crate::layout::plan::{CardPlan, plan_card};
use crate::model::record::ReleaseRecord;
use crate::render::cpu::{SlotImages, rasterize};
use crate::render::frame::CardImage;
use crate::text::measure::{FontFace, ParleyMeasurer};

/// Everything needed to draw one card.
#[derive(Clone, Debug, Default)]
pub struct CardRequest {
    /// Text shown under the code image, usually the release page URL.
    pub link_text: String,
    /// Release to draw.
    pub record: ReleaseRecord,
    /// Encoded cover image; absent or undecodable bytes leave an empty outlined square.
    pub cover: Option<Vec<u8>>,
    /// Encoded code image, scaled to fill its square.
    pub code: Option<Vec<u8>>,
    /// Draw a QR code of `link_text` when no usable code image is supplied.
    pub qr_from_link: bool,
    /// Use this canvas height instead of the estimate (still capped at the maximum).
    pub fixed_height: Option<u32>,
}

impl CardRequest {
    /// Request without images, at the estimated height.
    pub fn new(record: ReleaseRecord, link_text: impl Into<String>) -> Self {
        Self {
            link_text: link_text.into(),
            record,
            ..Self::default()
        }
    }

    /// Attach encoded cover bytes.
    pub fn with_cover(mut self, bytes: Vec<u8>) -> Self {
        self.cover = Some(bytes);
        self
    }

    /// Attach encoded code image bytes.
    pub fn with_code(mut self, bytes: Vec<u8>) -> Self {
        self.code = Some(bytes);
        self
    }

    /// Render at `height` instead of the estimate.
    pub fn with_fixed_height(mut self, height: u32) -> Self {
        self.fixed_height = Some(height);
        self
    }

    /// Fall back to a QR code of the link text for the code slot.
    pub fn with_link_qr(mut self) -> Self {
        self.qr_from_link = true;
        self
    }
}

/// Renders release cards with one layout configuration and one font.
///
/// A renderer is cheap to keep around and reuses its shaping caches between cards. It is
/// not `Sync`; give each thread its own.
#[derive(Debug)]
pub struct CardRenderer {
    config: LayoutConfig,
    measurer: ParleyMeasurer,
}

impl CardRenderer {
    /// Validate `config` and register `font`.
    pub fn new(config: LayoutConfig, font: FontFace) -> CardResult<Self> {
        config.validate()?;
        let measurer = ParleyMeasurer::new(font)?;
        Ok(Self { config, measurer })
    }

    /// Layout configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Measurer shared by layout and drawing.
    pub fn measurer(&self) -> &ParleyMeasurer {
        &self.measurer
    }

    /// Height estimate for `record` with this renderer's font.
    pub fn estimate(&self, record: &ReleaseRecord) -> HeightEstimate {
        estimate_height(&self.measurer, record, &self.config)
    }

    /// Canvas height a request renders at.
    pub fn resolve_height(&self, request: &CardRequest) -> u32 {
        match request.fixed_height {
            Some(h) => h.min(self.config.max_canvas_height),
            None => self.estimate(&request.record).resolved,
        }
    }

    /// Layout phase only.
    pub fn plan(&self, request: &CardRequest) -> CardResult<CardPlan> {
        let height = self.resolve_height(request);
        plan_card(
            &self.measurer,
            &request.record,
            &request.link_text,
            &self.config,
            height,
        )
    }

    /// Lay out and rasterize one card.
    #[tracing::instrument(skip_all, fields(title = %request.record.title, tracks = request.record.tracks.len()))]
    pub fn render(&self, request: &CardRequest) -> CardResult<CardImage> {
        let plan = self.plan(request)?;

        let cover_side = plan.regions.cover.width().round() as u32;
        let code_side = plan.regions.code.width().round() as u32;
        let images = SlotImages {
            cover: decode_optional(request.cover.as_deref(), "cover")
                .map(|img| prepare_for_slot(&img, cover_side, SlotFit::Contain)),
            code: code_image(request).map(|img| prepare_for_slot(&img, code_side, SlotFit::Fill)),
        };

        let frame = rasterize(&plan, &self.measurer, &images)?;
        tracing::info!(
            width = frame.width,
            height = frame.height,
            drawn = plan.tracks_drawn,
            truncated = plan.is_truncated(),
            "card rendered"
        );
        Ok(frame)
    }

    /// [`Self::render`] followed by lossless PNG encoding.
    pub fn render_png(&self, request: &CardRequest) -> CardResult<Vec<u8>> {
        self.render(request)?.encode_png()
    }
}

fn code_image(request: &CardRequest) -> Option<image::DynamicImage> {
    let supplied = decode_optional(request.code.as_deref(), "code");
    if supplied.is_some() || !request.qr_from_link || request.link_text.is_empty() {
        return supplied;
    }
    match qr_image(&request.link_text) {
        Ok(img) => {
            tracing::debug!(side = img.width(), "code image generated from link");
            Some(img)
        }
        Err(e) => {
            tracing::warn!(error = %e, "link QR code generation failed; leaving code slot empty");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/card.rs"]
mod tests;
