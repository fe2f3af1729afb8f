use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Point, Rect};

/// Pixel dimensions of a rendered card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting sizes the CPU raster backend cannot address.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::config(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(CardError::config(format!(
                "canvas {width}x{height} exceeds {} px per side",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// The whole canvas as a rectangle at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque gray with all channels at `v`.
    pub const fn gray(v: u8) -> Self {
        Self::opaque(v, v, v)
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Fixed palette of the card design.
pub mod palette {
    use super::Rgba8;

    /// Canvas behind the panels.
    pub const BACKGROUND: Rgba8 = Rgba8::gray(250);
    /// Panel interior.
    pub const PANEL_FILL: Rgba8 = Rgba8::gray(255);
    /// Panel outline.
    pub const PANEL_BORDER: Rgba8 = Rgba8::gray(225);
    /// Outline of the cover and code squares.
    pub const SLOT_BORDER: Rgba8 = Rgba8::gray(210);
    /// Release date line.
    pub const DATE: Rgba8 = Rgba8::gray(60);
    /// Title lines.
    pub const TITLE: Rgba8 = Rgba8::gray(20);
    /// Artist lines.
    pub const ARTIST: Rgba8 = Rgba8::gray(50);
    /// Tracklist header.
    pub const HEADER: Rgba8 = Rgba8::gray(10);
    /// Track rows.
    pub const TRACK: Rgba8 = Rgba8::gray(30);
    /// Staff credit lines.
    pub const STAFF: Rgba8 = Rgba8::gray(95);
    /// Truncation marker.
    pub const MARKER: Rgba8 = Rgba8::gray(110);
    /// Link line under the code image.
    pub const LINK: Rgba8 = Rgba8::gray(80);
    /// Sheet behind stacked cards.
    pub const STACK_BACKGROUND: Rgba8 = Rgba8::gray(245);
    /// Outline around each stacked card.
    pub const STACK_BORDER: Rgba8 = Rgba8::gray(220);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
