use crate::config::layout::{LayoutConfig, PANEL_RADIUS};
use crate::foundation::core::{Canvas, Rect, Rgba8, palette};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::ceil_px;
use crate::layout::estimate::{
    CODE_GAP, LINK_GAP, MARKER_GAP, TextLine, TextRole, flow_left, flow_right,
    link_block_height, panel_rects,
};
use crate::model::record::ReleaseRecord;
use crate::text::fit::fit_one_line;
use crate::text::measure::TextMeasure;

/// Externally supplied picture a slot on the card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// Release cover, scaled down to fit the square and centered.
    Cover,
    /// Scannable code image, scaled to fill its square.
    Code,
}

/// A single drawing instruction of a [`CardPlan`], in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Rounded panel, filled and outlined.
    Panel {
        /// Panel bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
    },
    /// One line of text.
    Text(TextLine),
    /// Paste the slot's image inside `frame`; nothing is drawn when it is absent.
    Image {
        /// Which picture.
        slot: ImageSlot,
        /// Square the picture is centered in.
        frame: Rect,
    },
    /// Rectangle outline.
    Border {
        /// Outlined rectangle.
        rect: Rect,
        /// Stroke color.
        color: Rgba8,
    },
}

/// Region boundaries resolved before any drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct CardRegions {
    /// Left panel bounds.
    pub left_panel: Rect,
    /// Right panel bounds.
    pub right_panel: Rect,
    /// Cover square.
    pub cover: Rect,
    /// Code square, after relocation.
    pub code: Rect,
    /// Truncation marker line, when the tracklist did not fit.
    pub marker: Option<TextLine>,
    /// Lowest extent of the drawn tracklist (last row or marker line).
    pub tracklist_bottom: f64,
    /// Link line, also present when its text is empty.
    pub link: TextLine,
}

/// Read-only result of the layout phase; the rasterizer consumes it as is.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPlan {
    /// Output size.
    pub canvas: Canvas,
    /// [`TextMeasure::fingerprint`] of the metrics used for layout.
    pub metrics_fingerprint: u64,
    /// Drawing instructions in paint order.
    pub ops: Vec<DrawOp>,
    /// Resolved regions.
    pub regions: CardRegions,
    /// Tracks in the record.
    pub tracks_total: usize,
    /// Tracks that fit above the code block.
    pub tracks_drawn: usize,
}

impl CardPlan {
    /// Whether the truncation marker is drawn.
    pub fn is_truncated(&self) -> bool {
        self.regions.marker.is_some()
    }

    /// Text lines in paint order.
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(line) => Some(line),
            _ => None,
        })
    }
}

/// Color of each text role.
pub fn role_color(role: TextRole) -> Rgba8 {
    match role {
        TextRole::Date => palette::DATE,
        TextRole::Title => palette::TITLE,
        TextRole::Artist => palette::ARTIST,
        TextRole::Header => palette::HEADER,
        TextRole::Track => palette::TRACK,
        TextRole::Staff => palette::STAFF,
        TextRole::Marker => palette::MARKER,
        TextRole::Link => palette::LINK,
    }
}

/// Resolve every region of a card of `height` pixels.
///
/// The code block sits below the tracklist; when that would run past the bottom
/// padding it moves up to the lowest position that still fits. If the tracklist then
/// reaches into the code block, only the tracks ending above a truncation marker are
/// kept and the marker is placed directly above the code block.
///
/// A height too small to keep the panel text inside its panel is a
/// [`CardError::ConfigurationInvalid`].
#[tracing::instrument(skip(measure, record, link_text, cfg), fields(tracks = record.tracks.len()))]
pub fn plan_card(
    measure: &dyn TextMeasure,
    record: &ReleaseRecord,
    link_text: &str,
    cfg: &LayoutConfig,
    height: u32,
) -> CardResult<CardPlan> {
    cfg.validate()?;
    if height > cfg.max_canvas_height {
        return Err(CardError::config(format!(
            "height {height} exceeds max_canvas_height {}",
            cfg.max_canvas_height
        )));
    }
    let canvas = Canvas::new(cfg.canvas_width, height)?;

    let g = cfg.geometry();
    let sizes = &cfg.font_sizes;
    let h = f64::from(height);
    let (left_panel, right_panel) = panel_rects(&g, h);
    let left = flow_left(measure, record, cfg);
    let right = flow_right(measure, record, cfg);

    let x = g.right_text_x();
    let bottom_limit = h - g.pad;
    let link_block = link_block_height(cfg);
    let mut code_top = right.cursor + CODE_GAP;
    if code_top + g.code_size + link_block > bottom_limit {
        code_top = bottom_limit - link_block - g.code_size;
    }

    // The head always stays above the code block, with room for the marker when at
    // least one track exists.
    let head_end = right.tracks.first().map_or(right.cursor, |row| row.top);
    let marker_room = if right.tracks.is_empty() {
        0.0
    } else {
        f64::from(sizes.small) + MARKER_GAP
    };
    let left_bottom = left.lines.last().map_or(0.0, |line| line.bottom());
    if code_top < head_end + marker_room || left_bottom > bottom_limit {
        let need = (head_end + marker_room + g.code_size + link_block + g.pad)
            .max(left_bottom + g.pad);
        return Err(CardError::config(format!(
            "height {height} cannot hold the card text, need at least {}",
            ceil_px(need)
        )));
    }
    let code = Rect::new(x, code_top, x + g.code_size, code_top + g.code_size);

    let (marker, tracks_drawn) = if right.cursor > code_top {
        let marker = TextLine {
            text: cfg.labels.truncation_marker.clone(),
            x,
            y: code_top - (f64::from(sizes.small) + MARKER_GAP),
            size_px: sizes.small,
            role: TextRole::Marker,
        };
        let fits = right
            .tracks
            .iter()
            .take_while(|row| row.bottom <= marker.y)
            .count();
        tracing::debug!(
            drawn = fits,
            total = right.tracks.len(),
            "tracklist truncated above code block"
        );
        (Some(marker), fits)
    } else {
        (None, right.tracks.len())
    };

    let tracklist_bottom = match &marker {
        Some(m) => m.bottom(),
        None => right
            .tracks
            .last()
            .map(|row| row.bottom)
            .unwrap_or(right.cursor),
    };

    let link_size = fit_one_line(
        measure,
        link_text,
        g.right_text_width(),
        &cfg.link_font_sizes,
        cfg.min_link_font_size,
    );
    let link = TextLine {
        text: link_text.to_string(),
        x,
        y: code.y1 + LINK_GAP,
        size_px: link_size,
        role: TextRole::Link,
    };

    let mut ops = vec![
        DrawOp::Panel {
            rect: left_panel,
            radius: PANEL_RADIUS,
        },
        DrawOp::Panel {
            rect: right_panel,
            radius: PANEL_RADIUS,
        },
    ];
    ops.extend(left.lines.iter().cloned().map(DrawOp::Text));
    ops.push(DrawOp::Image {
        slot: ImageSlot::Cover,
        frame: left.cover,
    });
    ops.push(DrawOp::Border {
        rect: left.cover,
        color: palette::SLOT_BORDER,
    });
    ops.extend(right.head.iter().cloned().map(DrawOp::Text));
    for row in &right.tracks[..tracks_drawn] {
        ops.extend(row.lines.iter().cloned().map(DrawOp::Text));
    }
    if let Some(m) = &marker {
        ops.push(DrawOp::Text(m.clone()));
    }
    ops.push(DrawOp::Image {
        slot: ImageSlot::Code,
        frame: code,
    });
    ops.push(DrawOp::Border {
        rect: code,
        color: palette::SLOT_BORDER,
    });
    if !link.text.is_empty() {
        ops.push(DrawOp::Text(link.clone()));
    }

    Ok(CardPlan {
        canvas,
        metrics_fingerprint: measure.fingerprint(),
        ops,
        regions: CardRegions {
            left_panel,
            right_panel,
            cover: left.cover,
            code,
            marker,
            tracklist_bottom,
            link,
        },
        tracks_total: right.tracks.len(),
        tracks_drawn,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
