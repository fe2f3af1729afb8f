use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};

/// Horizontal inset of panel content from the panel edge.
pub(crate) const CONTENT_INSET: f64 = 20.0;
/// Vertical offset of the first content line below the panel top.
pub(crate) const TOP_OFFSET: f64 = 18.0;
/// Extra indent of staff lines relative to the track row.
pub(crate) const STAFF_INDENT: f64 = 20.0;
/// Corner radius of both panels.
pub(crate) const PANEL_RADIUS: f64 = 18.0;
/// Stroke width of panel and slot outlines.
pub(crate) const BORDER_WIDTH: f64 = 2.0;

/// Per-role font sizes in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    /// Title lines.
    pub title: f32,
    /// Release date line.
    pub date: f32,
    /// Tracklist header and track rows.
    pub body: f32,
    /// Artist lines, truncation marker and the link block height.
    pub small: f32,
    /// Staff credit lines.
    pub staff: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 34.0,
            date: 30.0,
            body: 26.0,
            small: 20.0,
            staff: 22.0,
        }
    }
}

/// Fixed strings printed by the card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardLabels {
    /// Printed before the release date.
    pub date_prefix: String,
    /// Heading above the tracklist.
    pub tracklist_header: String,
    /// Line drawn above the code block when tracks were cut off.
    pub truncation_marker: String,
    /// Joins a track's staff lines before wrapping.
    pub staff_separator: String,
}

impl Default for CardLabels {
    fn default() -> Self {
        Self {
            date_prefix: "発売日：".to_string(),
            tracklist_header: "曲目 / Staff".to_string(),
            truncation_marker: "……（曲目过多，已截断）".to_string(),
            staff_separator: " / ".to_string(),
        }
    }
}

/// Card layout configuration. Every field has a default; partial JSON overrides only
/// the fields it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Card width in pixels.
    pub canvas_width: u32,
    /// Upper bound for estimated and fixed heights.
    pub max_canvas_height: u32,
    /// Margin around the panels and gap between them.
    pub outer_padding: u32,
    /// Width of the left panel.
    pub left_panel_width: u32,
    /// Side of the square code-image block.
    pub code_image_size: u32,
    /// Per-role font sizes.
    pub font_sizes: FontSizes,
    /// Descending candidates for the one-line link text.
    pub link_font_sizes: Vec<f32>,
    /// Link size used when no candidate fits.
    pub min_link_font_size: f32,
    /// Fixed strings.
    pub labels: CardLabels,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            max_canvas_height: 1500,
            outer_padding: 30,
            left_panel_width: 430,
            code_image_size: 190,
            font_sizes: FontSizes::default(),
            link_font_sizes: (12..=20).rev().map(|s| s as f32).collect(),
            min_link_font_size: 12.0,
            labels: CardLabels::default(),
        }
    }
}

impl LayoutConfig {
    /// Check every invariant the layout relies on.
    pub fn validate(&self) -> CardResult<()> {
        Canvas::new(self.canvas_width, self.max_canvas_height)?;
        if self.outer_padding == 0 {
            return Err(CardError::config("outer_padding must be > 0"));
        }
        if self.code_image_size == 0 {
            return Err(CardError::config("code_image_size must be > 0"));
        }

        let reserved = u64::from(self.left_panel_width) + 3 * u64::from(self.outer_padding);
        if reserved >= u64::from(self.canvas_width) {
            return Err(CardError::config(format!(
                "left_panel_width ({}) + 3 * outer_padding ({}) must be < canvas_width ({})",
                self.left_panel_width, self.outer_padding, self.canvas_width
            )));
        }

        let g = self.geometry();
        if g.left_text_width() <= 0.0 {
            return Err(CardError::config(format!(
                "left_panel_width ({}) leaves no room for text",
                self.left_panel_width
            )));
        }
        if g.staff_text_width() <= 0.0 {
            return Err(CardError::config(format!(
                "right panel width ({}) leaves no room for staff credits",
                g.right_width
            )));
        }

        let sizes = &self.font_sizes;
        for (role, size) in [
            ("title", sizes.title),
            ("date", sizes.date),
            ("body", sizes.body),
            ("small", sizes.small),
            ("staff", sizes.staff),
            ("min_link", self.min_link_font_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(CardError::config(format!(
                    "font size for '{role}' must be finite and > 0"
                )));
            }
        }

        if self.link_font_sizes.is_empty() {
            return Err(CardError::config("link_font_sizes must not be empty"));
        }
        if self
            .link_font_sizes
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(CardError::config(
                "link_font_sizes must be finite and > 0",
            ));
        }
        if self.link_font_sizes.windows(2).any(|w| w[0] <= w[1]) {
            return Err(CardError::config(
                "link_font_sizes must be strictly descending",
            ));
        }
        Ok(())
    }

    /// Panel geometry derived from the configuration.
    pub fn geometry(&self) -> CardGeometry {
        let pad = f64::from(self.outer_padding);
        let left_width = f64::from(self.left_panel_width);
        let right_x = pad + left_width + pad;
        CardGeometry {
            width: f64::from(self.canvas_width),
            pad,
            left_width,
            right_x,
            right_width: f64::from(self.canvas_width) - right_x - pad,
            code_size: f64::from(self.code_image_size),
        }
    }
}

/// Horizontal layout of the two panels, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    /// Canvas width.
    pub width: f64,
    /// Outer padding.
    pub pad: f64,
    /// Left panel width.
    pub left_width: f64,
    /// Left edge of the right panel.
    pub right_x: f64,
    /// Right panel width.
    pub right_width: f64,
    /// Side of the code square.
    pub code_size: f64,
}

impl CardGeometry {
    /// Top of the first line in either panel.
    pub fn content_top(&self) -> f64 {
        self.pad + TOP_OFFSET
    }

    /// Left edge of the left panel content.
    pub fn left_text_x(&self) -> f64 {
        self.pad + CONTENT_INSET
    }

    /// Left edge of the right panel content.
    pub fn right_text_x(&self) -> f64 {
        self.right_x + CONTENT_INSET
    }

    /// Wrap budget for date and title.
    pub fn left_text_width(&self) -> f64 {
        self.left_width - 2.0 * CONTENT_INSET
    }

    /// Side of the cover square.
    pub fn cover_size(&self) -> f64 {
        self.left_text_width()
    }

    /// Wrap budget for artist, track rows and the link line.
    pub fn right_text_width(&self) -> f64 {
        self.right_width - 2.0 * CONTENT_INSET
    }

    /// Wrap budget for indented staff lines.
    pub fn staff_text_width(&self) -> f64 {
        self.right_text_width() - STAFF_INDENT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/layout.rs"]
mod tests;
