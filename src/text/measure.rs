use std::{borrow::Cow, cell::RefCell, path::Path, sync::Arc};

use parley::style::{FontStack, StyleProperty};

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Fnv1a64;

/// Pixel-width measurement of single-line text.
///
/// Implementations must be monotonic: appending a character never makes a string
/// narrower. The line breaker relies on this to decide break points incrementally.
pub trait TextMeasure {
    /// Width in pixels of `text` laid out on one line at `size_px`. Empty text is 0.
    fn width(&self, text: &str, size_px: f32) -> f32;

    /// Identity of the metrics source. Two measurers with equal fingerprints produce
    /// identical widths.
    fn fingerprint(&self) -> u64;
}

/// Font file loaded into memory and checked to contain at least one usable face.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    family: String,
    fingerprint: u64,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

impl FontFace {
    /// Validate font bytes. Fails with [`CardError::FontUnavailable`] when no face can
    /// be registered from them.
    pub fn from_bytes(bytes: Vec<u8>) -> CardResult<Self> {
        if bytes.is_empty() {
            return Err(CardError::font("font data is empty"));
        }
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, &bytes)?;

        let mut hasher = Fnv1a64::new_default();
        hasher.write_bytes(&bytes);
        Ok(Self {
            bytes: Arc::new(bytes),
            family,
            fingerprint: hasher.finish(),
        })
    }

    /// Read and validate a font file.
    pub fn load(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CardError::font(format!("read '{}': {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Primary family name found in the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font file contents.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// FNV-1a hash of the font bytes.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

fn register_family(font_ctx: &mut parley::FontContext, bytes: &[u8]) -> CardResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CardError::font("no font families registered from font bytes"))?;
    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_string)
        .ok_or_else(|| CardError::font("registered font family has no name"))
}

/// [`TextMeasure`] backed by Parley, shaping with one registered font.
///
/// The same instance shapes the glyphs that get drawn, so measured and drawn widths
/// agree. Parley contexts are caches that need `&mut`; they live in `RefCell`s, which
/// makes a measurer `Send` but not `Sync`. Each render owns its own.
pub struct ParleyMeasurer {
    face: FontFace,
    font_ctx: RefCell<parley::FontContext>,
    layout_ctx: RefCell<parley::LayoutContext<()>>,
    family: String,
}

impl std::fmt::Debug for ParleyMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMeasurer")
            .field("face", &self.face)
            .finish_non_exhaustive()
    }
}

impl ParleyMeasurer {
    /// Register `face` with a fresh font context.
    pub fn new(face: FontFace) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, face.bytes())?;
        Ok(Self {
            face,
            font_ctx: RefCell::new(font_ctx),
            layout_ctx: RefCell::new(parley::LayoutContext::new()),
            family,
        })
    }

    /// The font this measurer shapes with.
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Shape `text` as a single unbroken line.
    pub(crate) fn layout_line(&self, text: &str, size_px: f32) -> parley::Layout<()> {
        let mut font_ctx = self.font_ctx.borrow_mut();
        let mut layout_ctx = self.layout_ctx.borrow_mut();

        let mut builder = layout_ctx.ranged_builder(&mut font_ctx, text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Borrowed(
            self.family.as_str(),
        ))));
        builder.push_default(StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Font handle for the CPU rasterizer, built from the same bytes.
    pub(crate) fn raster_font(&self) -> vello_cpu::peniko::FontData {
        let bytes = self.face.bytes().as_ref().clone();
        vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0)
    }
}

impl TextMeasure for ParleyMeasurer {
    fn width(&self, text: &str, size_px: f32) -> f32 {
        if text.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return 0.0;
        }
        let layout = self.layout_line(text, size_px);
        layout
            .lines()
            .map(|line| line.metrics().advance)
            .fold(0.0_f32, f32::max)
            .max(0.0)
    }

    fn fingerprint(&self) -> u64 {
        self.face.fingerprint()
    }
}

/// Deterministic metrics without a font file: half an em for ASCII characters and a
/// full em for everything else (CJK, full-width punctuation).
///
/// Useful for dry-run height estimates and for layout tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedAdvance;

impl FixedAdvance {
    const FINGERPRINT: u64 = 0x6669_7865_645f_6164;

    /// Advance of a single character.
    pub fn char_width(ch: char, size_px: f32) -> f32 {
        if ch.is_ascii() {
            size_px * 0.5
        } else {
            size_px
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn width(&self, text: &str, size_px: f32) -> f32 {
        text.chars().map(|c| Self::char_width(c, size_px)).sum()
    }

    fn fingerprint(&self) -> u64 {
        Self::FINGERPRINT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
