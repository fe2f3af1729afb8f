use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::config::layout::BORDER_WIDTH;
use crate::foundation::core::{Rect, Rgba8, palette};
use crate::foundation::error::{CardError, CardResult};
use crate::layout::estimate::TextLine;
use crate::layout::plan::{CardPlan, DrawOp, ImageSlot, role_color};
use crate::render::frame::CardImage;
use crate::text::measure::{ParleyMeasurer, TextMeasure};

/// Pictures for the two image slots, already sized for their squares.
#[derive(Clone, Debug, Default)]
pub struct SlotImages {
    /// Cover picture, contained in its square.
    pub cover: Option<PreparedImage>,
    /// Code picture, filling its square.
    pub code: Option<PreparedImage>,
}

impl SlotImages {
    fn get(&self, slot: ImageSlot) -> Option<&PreparedImage> {
        match slot {
            ImageSlot::Cover => self.cover.as_ref(),
            ImageSlot::Code => self.code.as_ref(),
        }
    }
}

/// Execute a [`CardPlan`] on a CPU pixmap.
///
/// The plan must have been laid out with the same font metrics that shape the glyphs
/// here; a plan from a different measurer is rejected rather than drawn misaligned.
pub fn rasterize(
    plan: &CardPlan,
    measurer: &ParleyMeasurer,
    images: &SlotImages,
) -> CardResult<CardImage> {
    if plan.metrics_fingerprint != measurer.fingerprint() {
        return Err(CardError::config(format!(
            "plan was laid out with metrics {:016x}, renderer uses {:016x}",
            plan.metrics_fingerprint,
            measurer.fingerprint()
        )));
    }

    let width: u16 = plan
        .canvas
        .width
        .try_into()
        .map_err(|_| CardError::config("canvas width exceeds u16"))?;
    let height: u16 = plan
        .canvas
        .height
        .try_into()
        .map_err(|_| CardError::config("canvas height exceeds u16"))?;

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    let font = measurer.raster_font();
    let mut ctx = vello_cpu::RenderContext::new(width, height);

    // The context overwrites the whole pixmap on render, so the background is a fill.
    ctx.set_paint(color_to_cpu(palette::BACKGROUND));
    ctx.fill_rect(&rect_to_cpu(plan.canvas.rect()));
    for op in &plan.ops {
        draw_op(&mut ctx, op, measurer, &font, images)?;
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(CardImage {
        width: plan.canvas.width,
        height: plan.canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn draw_op(
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    measurer: &ParleyMeasurer,
    font: &vello_cpu::peniko::FontData,
    images: &SlotImages,
) -> CardResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::Panel { rect, radius } => {
            use vello_cpu::kurbo::Shape;

            let path = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(*rect), *radius)
                .to_path(0.1);
            ctx.set_paint(color_to_cpu(palette::PANEL_FILL));
            ctx.fill_path(&path);
            ctx.set_paint(color_to_cpu(palette::PANEL_BORDER));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(BORDER_WIDTH));
            ctx.stroke_path(&path);
            Ok(())
        }
        DrawOp::Border { rect, color } => {
            ctx.set_paint(color_to_cpu(*color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(BORDER_WIDTH));
            ctx.stroke_rect(&rect_to_cpu(*rect));
            Ok(())
        }
        DrawOp::Image { slot, frame } => {
            let Some(prepared) = images.get(*slot) else {
                return Ok(());
            };
            let (w, h) = (f64::from(prepared.width), f64::from(prepared.height));
            // Cover images keep their aspect ratio and are centered; code images fill.
            let origin_x = frame.x0 + ((frame.width() - w) / 2.0).max(0.0).round();
            let origin_y = frame.y0 + ((frame.height() - h) / 2.0).max(0.0).round();

            let pixmap =
                image_premul_bytes_to_pixmap(&prepared.rgba8_premul, prepared.width, prepared.height)?;
            let paint = vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            };
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            Ok(())
        }
        DrawOp::Text(line) => {
            draw_text_line(ctx, line, measurer, font);
            Ok(())
        }
    }
}

fn draw_text_line(
    ctx: &mut vello_cpu::RenderContext,
    line: &TextLine,
    measurer: &ParleyMeasurer,
    font: &vello_cpu::peniko::FontData,
) {
    if line.text.is_empty() {
        return;
    }
    let layout = measurer.layout_line(&line.text, line.size_px);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((line.x, line.y)));
    ctx.set_paint(color_to_cpu(role_color(line.role)));

    for layout_line in layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::config("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::config("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::config("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
