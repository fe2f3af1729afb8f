//! Dry-run layout of both panels.
//!
//! The flows here place every text line of a card top-down without drawing anything.
//! The height estimate and the drawing plan both read the same flows, so the two can
//! never disagree about where a line ends up.

use crate::config::layout::{CardGeometry, LayoutConfig, STAFF_INDENT};
use crate::foundation::core::Rect;
use crate::foundation::math::ceil_px;
use crate::model::record::ReleaseRecord;
use crate::text::measure::TextMeasure;
use crate::text::wrap::{first_line, wrap, wrap_capped};

pub(crate) const DATE_LEADING: f64 = 6.0;
pub(crate) const TITLE_LEADING: f64 = 4.0;
pub(crate) const ARTIST_LEADING: f64 = 3.0;
pub(crate) const ARTIST_GAP: f64 = 8.0;
pub(crate) const HEADER_GAP: f64 = 8.0;
pub(crate) const TRACK_LEADING: f64 = 2.0;
pub(crate) const STAFF_LEADING: f64 = 2.0;
pub(crate) const TRACK_GAP: f64 = 8.0;
pub(crate) const COVER_GAP: f64 = 10.0;
pub(crate) const CODE_GAP: f64 = 18.0;
pub(crate) const LINK_GAP: f64 = 8.0;
pub(crate) const LINK_BOTTOM_GAP: f64 = 10.0;
pub(crate) const MARKER_GAP: f64 = 6.0;
/// Artist and staff text never take more than this many lines.
pub(crate) const MAX_SECONDARY_LINES: usize = 2;

/// What a text line shows; decides its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Release date, left panel.
    Date,
    /// Title, left panel.
    Title,
    /// Artist credit, right panel.
    Artist,
    /// Tracklist heading.
    Header,
    /// Track number and title.
    Track,
    /// Staff credits under a track.
    Staff,
    /// Truncation marker.
    Marker,
    /// Link under the code image.
    Link,
}

/// One line of text at its final position. `y` is the top of the line box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Text as drawn.
    pub text: String,
    /// Left edge.
    pub x: f64,
    /// Top of the line box.
    pub y: f64,
    /// Font size in pixels.
    pub size_px: f32,
    /// What the line shows.
    pub role: TextRole,
}

impl TextLine {
    /// Bottom of the glyph box (top plus font size).
    pub fn bottom(&self) -> f64 {
        self.y + f64::from(self.size_px)
    }
}

/// Left panel content: date, title, cover square.
#[derive(Clone, Debug, PartialEq)]
pub struct LeftFlow {
    /// Date and title lines.
    pub lines: Vec<TextLine>,
    /// Cover square below the title.
    pub cover: Rect,
    /// Minimum canvas height for this panel, bottom padding included.
    pub required_height: f64,
}

/// One tracklist entry: its main row and up to two staff lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRow {
    /// Main row followed by its staff lines.
    pub lines: Vec<TextLine>,
    /// Top of the main row.
    pub top: f64,
    /// Cursor after the last line of the row, before the inter-track gap.
    pub bottom: f64,
}

/// Right panel content above the code block.
#[derive(Clone, Debug, PartialEq)]
pub struct RightFlow {
    /// Artist lines and the tracklist header.
    pub head: Vec<TextLine>,
    /// Every track, whether or not it ends up drawn.
    pub tracks: Vec<TrackRow>,
    /// Cursor after the last track, inter-track gap included.
    pub cursor: f64,
    /// Minimum canvas height for this panel, including code block, link line and
    /// bottom padding.
    pub required_height: f64,
}

/// Unclamped minimum heights of both panels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelHeights {
    /// Left panel requirement.
    pub left: f64,
    /// Right panel requirement.
    pub right: f64,
}

impl PanelHeights {
    /// Height needed so neither panel is cropped.
    pub fn required(self) -> f64 {
        self.left.max(self.right)
    }
}

/// Result of the dry run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightEstimate {
    /// Per-panel requirements before clamping.
    pub panels: PanelHeights,
    /// `min(max_canvas_height, ceil(required))`.
    pub resolved: u32,
    /// Whether the content needed more than `max_canvas_height`.
    pub clamped: bool,
}

/// Lay out the left panel.
pub fn flow_left(
    measure: &dyn TextMeasure,
    record: &ReleaseRecord,
    cfg: &LayoutConfig,
) -> LeftFlow {
    let g = cfg.geometry();
    let sizes = &cfg.font_sizes;
    let x = g.left_text_x();
    let mut y = g.content_top();
    let mut lines = Vec::new();

    if !record.release_date.is_empty() {
        let date = format!("{}{}", cfg.labels.date_prefix, record.release_date);
        for text in wrap(measure, &date, sizes.date, g.left_text_width()) {
            lines.push(TextLine {
                text,
                x,
                y,
                size_px: sizes.date,
                role: TextRole::Date,
            });
            y += f64::from(sizes.date) + DATE_LEADING;
        }
    }

    for text in wrap(measure, &record.title, sizes.title, g.left_text_width()) {
        lines.push(TextLine {
            text,
            x,
            y,
            size_px: sizes.title,
            role: TextRole::Title,
        });
        y += f64::from(sizes.title) + TITLE_LEADING;
    }

    y += COVER_GAP;
    let side = g.cover_size();
    let cover = Rect::new(x, y, x + side, y + side);
    LeftFlow {
        lines,
        cover,
        required_height: cover.y1 + g.pad,
    }
}

/// Lay out the right panel down to the end of the tracklist.
pub fn flow_right(
    measure: &dyn TextMeasure,
    record: &ReleaseRecord,
    cfg: &LayoutConfig,
) -> RightFlow {
    let g = cfg.geometry();
    let sizes = &cfg.font_sizes;
    let x = g.right_text_x();
    let mut y = g.content_top();
    let mut head = Vec::new();

    if !record.artist_line.is_empty() {
        for text in wrap_capped(
            measure,
            &record.artist_line,
            sizes.small,
            g.right_text_width(),
            MAX_SECONDARY_LINES,
        ) {
            head.push(TextLine {
                text,
                x,
                y,
                size_px: sizes.small,
                role: TextRole::Artist,
            });
            y += f64::from(sizes.small) + ARTIST_LEADING;
        }
        y += ARTIST_GAP;
    }

    head.push(TextLine {
        text: cfg.labels.tracklist_header.clone(),
        x,
        y,
        size_px: sizes.body,
        role: TextRole::Header,
    });
    y += f64::from(sizes.body) + HEADER_GAP;

    let mut tracks = Vec::with_capacity(record.tracks.len());
    for track in &record.tracks {
        let top = y;
        let mut lines = vec![TextLine {
            text: first_line(
                measure,
                &track.display_line(),
                sizes.body,
                g.right_text_width(),
            ),
            x,
            y,
            size_px: sizes.body,
            role: TextRole::Track,
        }];
        y += f64::from(sizes.body) + TRACK_LEADING;

        if let Some(staff) = track.joined_staff(&cfg.labels.staff_separator) {
            for text in wrap_capped(
                measure,
                &staff,
                sizes.staff,
                g.staff_text_width(),
                MAX_SECONDARY_LINES,
            ) {
                lines.push(TextLine {
                    text,
                    x: x + STAFF_INDENT,
                    y,
                    size_px: sizes.staff,
                    role: TextRole::Staff,
                });
                y += f64::from(sizes.staff) + STAFF_LEADING;
            }
        }
        tracks.push(TrackRow {
            lines,
            top,
            bottom: y,
        });
        y += TRACK_GAP;
    }

    RightFlow {
        head,
        tracks,
        cursor: y,
        required_height: y + CODE_GAP + g.code_size + link_block_height(cfg) + g.pad,
    }
}

/// Space below the code image: gap, link line, gap.
pub(crate) fn link_block_height(cfg: &LayoutConfig) -> f64 {
    LINK_GAP + f64::from(cfg.font_sizes.small) + LINK_BOTTOM_GAP
}

/// Minimum height of each panel.
pub fn panel_heights(
    measure: &dyn TextMeasure,
    record: &ReleaseRecord,
    cfg: &LayoutConfig,
) -> PanelHeights {
    PanelHeights {
        left: flow_left(measure, record, cfg).required_height,
        right: flow_right(measure, record, cfg).required_height,
    }
}

/// Canvas height that fits both panels, clamped to `max_canvas_height`.
#[tracing::instrument(skip_all, fields(tracks = record.tracks.len()))]
pub fn estimate_height(
    measure: &dyn TextMeasure,
    record: &ReleaseRecord,
    cfg: &LayoutConfig,
) -> HeightEstimate {
    let panels = panel_heights(measure, record, cfg);
    resolve(panels, cfg)
}

pub(crate) fn resolve(panels: PanelHeights, cfg: &LayoutConfig) -> HeightEstimate {
    let need = ceil_px(panels.required());
    let resolved = need.min(cfg.max_canvas_height);
    let clamped = need > cfg.max_canvas_height;
    tracing::debug!(
        left = panels.left,
        right = panels.right,
        resolved,
        clamped,
        "resolved card height"
    );
    HeightEstimate {
        panels,
        resolved,
        clamped,
    }
}

/// Panel rectangles for a canvas of `height` pixels.
pub(crate) fn panel_rects(g: &CardGeometry, height: f64) -> (Rect, Rect) {
    let left = Rect::new(g.pad, g.pad, g.pad + g.left_width, height - g.pad);
    let right = Rect::new(g.right_x, g.pad, g.width - g.pad, height - g.pad);
    (left, right)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/estimate.rs"]
mod tests;
