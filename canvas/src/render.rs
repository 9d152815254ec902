//! Rendering: draws the card and its selection UI to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the card, the element document and the
//! selection and produces pixels. The only state it mutates is the image
//! cache, which starts downloads on first use.
//!
//! Paint order, bottom first: background, uploaded images, overlay, headline
//! and description, every other element in document order, selection UI.
//! The card's CSS filter applies to everything but the selection UI.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level callers ([`crate::engine::Engine::render`] and
//! [`crate::export::export_png`]) handle the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use crate::background::{self, Background, GradientShape, GradientSpec};
use crate::card::{Card, TextAlign, TextSlot};
use crate::consts::{
    BACKGROUND_BASE, BROKEN_IMAGE_FILL, BROKEN_IMAGE_STROKE, CONTROL_DOT_COLOR, CONTROL_DOT_RADIUS_PX,
    DEFAULT_TABLE_GRID, SELECTION_COLOR, STICKY_TEXT_COLOR, TABLE_BORDER_FALLBACK,
};
use crate::doc::{CanvasElement, DocStore, ElementKind, ShapeType};
use crate::geometry::{self, Rect};
use crate::hit;
use crate::images::{ImageCache, ImageStatus};
use crate::input::SelectionTarget;
use crate::layout::{self, EstimatedMeasure, FontSpec, TextMeasure};
use crate::path::{self, PathCommand};
use crate::shapes::{self, LineGeometry, Outline};

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Shortest arrowhead in card pixels; thicker lines get longer heads.
const ARROW_MIN_SIZE: f64 = 10.0;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Half side of a drawn resize handle in screen pixels.
const HANDLE_DRAW_PX: f64 = 5.0;

const STICKY_FONT: &str = "Caveat, cursive";
const STICKY_FONT_SIZE: f64 = 19.2;
const STICKY_PADDING: f64 = 16.0;

/// Font of free text elements.
const TEXT_ELEMENT_FONT: &str = "Inter, sans-serif";
const TEXT_ELEMENT_SIZE: f64 = 16.0;

/// Scale of the backing store relative to card pixels, and the editor zoom
/// used to keep selection chrome a constant screen size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub scale: f64,
    pub zoom: f64,
}

/// Text measurement backed by the 2D context's font metrics.
pub struct ContextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl ContextMeasure {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for ContextMeasure {
    fn text_width(&self, text: &str, font: &FontSpec<'_>) -> f64 {
        self.ctx.save();
        self.ctx.set_font(&font.css());
        let width = match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => EstimatedMeasure.text_width(text, font),
        };
        self.ctx.restore();
        width
    }
}

/// Draw the full card and, unless `selection` is `None`, its selection UI.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    card: &Card,
    selection: SelectionTarget,
    images: &mut ImageCache,
    view: View,
) -> Result<(), JsValue> {
    let measure = ContextMeasure::new(ctx.clone());
    let (w, h) = card.size();

    // Layer 1: clear and scale card pixels to the backing store.
    ctx.set_transform(view.scale, 0.0, 0.0, view.scale, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, w, h);

    // Layer 2: card content, clipped to the card and filtered.
    with_saved::<_, JsValue, _>(ctx, || {
        ctx.begin_path();
        ctx.rect(0.0, 0.0, w, h);
        ctx.clip();
        ctx.set_filter(&card.filter);

        draw_background(ctx, card, images)?;
        for el in doc.elements().iter().filter(|el| el.below_overlay()) {
            draw_element(ctx, el, images, &measure)?;
        }
        draw_overlay(ctx, card);
        for slot in [TextSlot::Headline, TextSlot::Description] {
            draw_text_field(ctx, card, slot, &measure)?;
        }
        for el in doc.elements().iter().filter(|el| !el.below_overlay()) {
            draw_element(ctx, el, images, &measure)?;
        }
        Ok(())
    })?;

    // Layer 3: selection UI.
    draw_selection(ctx, doc, card, selection, &measure, view.zoom)
}

/// A context with a save/restore state stack.
trait StateStack {
    fn save(&self);
    fn restore(&self);
}

impl StateStack for CanvasRenderingContext2d {
    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }
}

/// Run `f` between `save` and `restore`. The context is restored even when
/// `f` fails part-way.
fn with_saved<S, E, F>(ctx: &S, f: F) -> Result<(), E>
where
    S: StateStack,
    F: FnOnce() -> Result<(), E>,
{
    StateStack::save(ctx);
    let result = f();
    StateStack::restore(ctx);
    result
}

/// Every image source the card currently shows.
#[must_use]
pub fn image_sources<'a>(doc: &'a DocStore, card: &'a Card) -> Vec<&'a str> {
    let mut out: Vec<&str> = doc
        .elements()
        .iter()
        .filter(|el| el.kind == ElementKind::Image)
        .filter_map(|el| el.src.as_deref())
        .collect();
    if card.background_kind().is_image() {
        out.push(card.background.trim());
    }
    out
}

// =============================================================
// Card layers
// =============================================================

fn draw_background(ctx: &CanvasRenderingContext2d, card: &Card, images: &mut ImageCache) -> Result<(), JsValue> {
    let (w, h) = card.size();
    match card.background_kind() {
        Background::Color(color) => {
            ctx.set_fill_style_str(&color);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        Background::Gradient(value) => {
            ctx.set_fill_style_str(BACKGROUND_BASE);
            ctx.fill_rect(0.0, 0.0, w, h);
            let gradient = background::parse_gradient(&value)
                .map_err(|e| JsValue::from_str(&e.to_string()))
                .and_then(|spec| canvas_gradient(ctx, &spec, w, h));
            match gradient {
                Ok(gradient) => {
                    ctx.set_fill_style_canvas_gradient(&gradient);
                    ctx.fill_rect(0.0, 0.0, w, h);
                }
                Err(e) => log::warn!("background gradient not drawn: {e:?}"),
            }
        }
        Background::Image(src) => {
            ctx.set_fill_style_str(BACKGROUND_BASE);
            ctx.fill_rect(0.0, 0.0, w, h);
            draw_image_box(ctx, images, &src, layout::background_rect(card))?;
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn canvas_gradient(ctx: &CanvasRenderingContext2d, spec: &GradientSpec, w: f64, h: f64) -> Result<CanvasGradient, JsValue> {
    let gradient = match spec.shape {
        GradientShape::Linear { angle_deg } => {
            let (a, b) = background::linear_endpoints(angle_deg, w, h);
            ctx.create_linear_gradient(a.x, a.y, b.x, b.y)
        }
        GradientShape::Radial => {
            ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, background::radial_radius(w, h))?
        }
    };
    let offsets = background::resolved_offsets(&spec.stops);
    for (stop, offset) in spec.stops.iter().zip(offsets) {
        gradient.add_color_stop(offset as f32, &stop.color)?;
    }
    Ok(gradient)
}

fn draw_overlay(ctx: &CanvasRenderingContext2d, card: &Card) {
    if card.overlay_opacity <= 0.0 {
        return;
    }
    let (w, h) = card.size();
    ctx.save();
    ctx.set_global_alpha(card.overlay_opacity);
    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.restore();
}

fn draw_text_field(
    ctx: &CanvasRenderingContext2d,
    card: &Card,
    slot: TextSlot,
    measure: &dyn TextMeasure,
) -> Result<(), JsValue> {
    let field = card.text(slot);
    let (card_w, _) = card.size();
    let (lines, rect) = layout::text_field_layout(field, slot, card_w, measure);
    let font = layout::field_font(field);
    let line_h = font.line_height();

    let x = match field.style.align {
        TextAlign::Left => rect.x,
        TextAlign::Center => rect.x + rect.width / 2.0,
        TextAlign::Right => rect.right(),
    };

    with_saved(ctx, || {
        ctx.set_font(&font.css());
        ctx.set_fill_style_str(&field.style.color);
        ctx.set_text_align(field.style.align.as_css());
        ctx.set_text_baseline("middle");
        for (idx, line) in lines.iter().enumerate() {
            let y = rect.y + line_h * (idx as f64 + 0.5);
            ctx.fill_text(line, x, y)?;
            if field.style.underline && !line.is_empty() {
                let line_w = measure.text_width(line, &font);
                let left = match field.style.align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - line_w / 2.0,
                    TextAlign::Right => x - line_w,
                };
                let under_y = y + font.size * 0.55;
                ctx.set_stroke_style_str(&field.style.color);
                ctx.set_line_width((font.size / 16.0).max(1.0));
                ctx.begin_path();
                ctx.move_to(left, under_y);
                ctx.line_to(left + line_w, under_y);
                ctx.stroke();
            }
        }
        Ok(())
    })
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(
    ctx: &CanvasRenderingContext2d,
    el: &CanvasElement,
    images: &mut ImageCache,
    measure: &dyn TextMeasure,
) -> Result<(), JsValue> {
    let w = el.width_px();
    let h = el.height_px();
    if w <= 0.0 || h <= 0.0 {
        return Ok(());
    }

    with_saved(ctx, || {
        enter_element(ctx, el)?;
        match el.kind {
            ElementKind::Text => draw_text_element(ctx, el, measure),
            ElementKind::Sticky => draw_sticky(ctx, el, measure),
            ElementKind::Shape => draw_shape(ctx, el),
            ElementKind::Line => draw_line(ctx, el),
            ElementKind::Draw => {
                draw_strokes(ctx, el);
                Ok(())
            }
            ElementKind::Table => {
                draw_table(ctx, el);
                Ok(())
            }
            ElementKind::Image => {
                let src = el.src.as_deref().unwrap_or_default();
                draw_image_box(ctx, images, src, Rect::new(0.0, 0.0, w, h))
            }
        }
    })
}

fn draw_text_element(ctx: &CanvasRenderingContext2d, el: &CanvasElement, measure: &dyn TextMeasure) -> Result<(), JsValue> {
    let font = FontSpec {
        family: TEXT_ELEMENT_FONT,
        size: el.font_size.unwrap_or(TEXT_ELEMENT_SIZE),
        bold: false,
        italic: false,
    };
    let text = el.content.as_deref().unwrap_or_default();
    let w = el.width_px();
    let lines = layout::wrap_lines(text, w, &font, measure);

    ctx.set_font(&font.css());
    ctx.set_fill_style_str(el.color_or("#ffffff"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let line_h = font.line_height();
    for (idx, line) in lines.iter().enumerate() {
        ctx.fill_text(line, w / 2.0, line_h * (idx as f64 + 0.5))?;
    }
    Ok(())
}

fn draw_sticky(ctx: &CanvasRenderingContext2d, el: &CanvasElement, measure: &dyn TextMeasure) -> Result<(), JsValue> {
    let w = el.width_px();
    let h = el.height_px();

    ctx.save();
    ctx.set_shadow_color("rgba(0, 0, 0, 0.15)");
    ctx.set_shadow_blur(6.0);
    ctx.set_shadow_offset_y(4.0);
    ctx.set_fill_style_str(el.color_or("#fef3c7"));
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.restore();

    let font = FontSpec { family: STICKY_FONT, size: STICKY_FONT_SIZE, bold: false, italic: false };
    let text = el.content.as_deref().unwrap_or_default();
    let max_w = (w - STICKY_PADDING * 2.0).max(1.0);
    let lines = layout::wrap_lines(text, max_w, &font, measure);

    ctx.set_font(&font.css());
    ctx.set_fill_style_str(STICKY_TEXT_COLOR);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    let line_h = font.line_height();
    for (idx, line) in lines.iter().enumerate() {
        let y = STICKY_PADDING + line_h * idx as f64;
        if y + line_h > h {
            break;
        }
        ctx.fill_text(line, STICKY_PADDING, y)?;
    }
    Ok(())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, el: &CanvasElement) -> Result<(), JsValue> {
    let w = el.width_px();
    let h = el.height_px();
    ctx.set_fill_style_str(el.color_or("#374151"));
    match Outline::for_shape(el.shape_type.unwrap_or(ShapeType::Square)) {
        Outline::Rect => ctx.fill_rect(0.0, 0.0, w, h),
        Outline::Ellipse => {
            ctx.begin_path();
            ctx.ellipse(w / 2.0, h / 2.0, w / 2.0, h / 2.0, 0.0, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        outline @ Outline::Polygon(_) => {
            ctx.begin_path();
            for (idx, p) in outline.vertices(w, h).iter().enumerate() {
                if idx == 0 {
                    ctx.move_to(p.x, p.y);
                } else {
                    ctx.line_to(p.x, p.y);
                }
            }
            ctx.close_path();
            ctx.fill();
        }
    }
    Ok(())
}

fn draw_line(ctx: &CanvasRenderingContext2d, el: &CanvasElement) -> Result<(), JsValue> {
    let w = el.width_px();
    let h = el.height_px();
    let color = el.color_or("#000000");
    let stroke = el.stroke_width_or_default();

    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(stroke);
    ctx.set_line_cap("round");

    match LineGeometry::for_element(el) {
        LineGeometry::Segment { start, end, start_arrow, end_arrow } => {
            let a = shapes::to_local(start, w, h);
            let b = shapes::to_local(end, w, h);
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.stroke();

            let angle = (b.y - a.y).atan2(b.x - a.x);
            let size = ARROW_MIN_SIZE.max(stroke * 2.5);
            if end_arrow {
                draw_arrowhead(ctx, b.x, b.y, angle, size);
            }
            if start_arrow {
                draw_arrowhead(ctx, a.x, a.y, angle + PI, size);
            }
        }
        LineGeometry::Curve { start, control, end } => {
            let a = shapes::to_local(start, w, h);
            let c = shapes::to_local(control, w, h);
            let b = shapes::to_local(end, w, h);
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.quadratic_curve_to(c.x, c.y, b.x, b.y);
            ctx.stroke();
        }
    }
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, angle: f64, size: f64) {
    let x1 = tip_x - size * (angle - ARROW_ANGLE).cos();
    let y1 = tip_y - size * (angle - ARROW_ANGLE).sin();
    let x2 = tip_x - size * (angle + ARROW_ANGLE).cos();
    let y2 = tip_y - size * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip_x, tip_y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.fill();
}

fn draw_strokes(ctx: &CanvasRenderingContext2d, el: &CanvasElement) {
    let data = el.path.as_deref().unwrap_or_default();
    if data.is_empty() {
        return;
    }
    let commands = match path::parse(data) {
        Ok(commands) => commands,
        Err(e) => {
            log::warn!("draw element {} has an unreadable path: {e}", el.id);
            return;
        }
    };

    ctx.set_stroke_style_str(el.color_or("#000000"));
    ctx.set_line_width(el.stroke_width_or_default());
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathCommand::LineTo(p) => ctx.line_to(p.x, p.y),
        }
    }
    ctx.stroke();
}

fn draw_table(ctx: &CanvasRenderingContext2d, el: &CanvasElement) {
    let w = el.width_px();
    let h = el.height_px();
    let rows = el.rows.unwrap_or(DEFAULT_TABLE_GRID);
    let cols = el.cols.unwrap_or(DEFAULT_TABLE_GRID);
    let (xs, ys) = shapes::table_grid(rows, cols, w, h);

    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_stroke_style_str(el.color_or(TABLE_BORDER_FALLBACK));
    ctx.set_line_width(1.0);
    ctx.stroke_rect(0.0, 0.0, w, h);
    ctx.begin_path();
    for x in xs {
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
    }
    for y in ys {
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
    }
    ctx.stroke();
}

// =============================================================
// Images
// =============================================================

/// Draw `src` cropped to cover `dest`; a placeholder when it failed to load.
fn draw_image_box(ctx: &CanvasRenderingContext2d, images: &mut ImageCache, src: &str, dest: Rect) -> Result<(), JsValue> {
    match images.get(src)? {
        ImageStatus::Loading => Ok(()),
        ImageStatus::Ready(img) => {
            let nw = f64::from(img.natural_width());
            let nh = f64::from(img.natural_height());
            let Some(crop) = geometry::cover_crop(nw, nh, dest.width, dest.height) else {
                return Ok(());
            };
            ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                img,
                crop.x,
                crop.y,
                crop.width,
                crop.height,
                dest.x,
                dest.y,
                dest.width,
                dest.height,
            )
        }
        ImageStatus::Broken => {
            draw_broken_image(ctx, dest);
            Ok(())
        }
    }
}

fn draw_broken_image(ctx: &CanvasRenderingContext2d, r: Rect) {
    ctx.save();
    ctx.set_fill_style_str(BROKEN_IMAGE_FILL);
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_stroke_style_str(BROKEN_IMAGE_STROKE);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(r.x, r.y);
    ctx.line_to(r.right(), r.bottom());
    ctx.move_to(r.right(), r.y);
    ctx.line_to(r.x, r.bottom());
    ctx.stroke();
    ctx.restore();
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    card: &Card,
    selection: SelectionTarget,
    measure: &dyn TextMeasure,
    zoom: f64,
) -> Result<(), JsValue> {
    let Some(rect) = layout::target_rect(selection, doc, card, measure) else {
        return Ok(());
    };

    with_saved::<_, JsValue, _>(ctx, || {
        ctx.set_stroke_style_str(SELECTION_COLOR);
        if selection == SelectionTarget::Background {
            ctx.set_line_width(2.0 / zoom);
        } else {
            let dash = SELECTION_DASH_PX / zoom;
            let dash_array = js_sys::Array::new();
            dash_array.push(&dash.into());
            dash_array.push(&dash.into());
            ctx.set_line_dash(&dash_array)?;
            ctx.set_line_width(1.0 / zoom);
        }
        ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
        ctx.set_line_dash(&js_sys::Array::new())?;

        // Resize handles.
        let half = HANDLE_DRAW_PX / zoom;
        ctx.set_fill_style_str("#fff");
        for (_, pos) in hit::handle_positions(selection, rect) {
            ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
            ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
        }
        Ok(())
    })?;

    if let Some(el) = selection.element_id().and_then(|id| doc.get(&id)) {
        if el.is_curve() {
            draw_curve_controls(ctx, el, zoom)?;
        }
    }
    Ok(())
}

/// Guides from the curve ends to its control point, and the draggable dot.
fn draw_curve_controls(ctx: &CanvasRenderingContext2d, el: &CanvasElement, zoom: f64) -> Result<(), JsValue> {
    let LineGeometry::Curve { start, end, .. } = LineGeometry::for_element(el) else {
        return Ok(());
    };
    let w = el.width_px();
    let h = el.height_px();
    let a = shapes::to_local(start, w, h);
    let b = shapes::to_local(end, w, h);
    let dot = hit::control_point_position(el);

    with_saved(ctx, || {
        ctx.set_global_alpha(0.5);
        ctx.set_stroke_style_str(SELECTION_COLOR);
        ctx.set_line_width(1.0 / zoom);
        ctx.begin_path();
        ctx.move_to(el.x + a.x, el.y + a.y);
        ctx.line_to(dot.x, dot.y);
        ctx.line_to(el.x + b.x, el.y + b.y);
        ctx.stroke();
        ctx.set_global_alpha(1.0);

        ctx.begin_path();
        ctx.arc(dot.x, dot.y, CONTROL_DOT_RADIUS_PX / zoom, 0.0, 2.0 * PI)?;
        ctx.set_fill_style_str(CONTROL_DOT_COLOR);
        ctx.fill();
        ctx.set_stroke_style_str("#fff");
        ctx.set_line_width(2.0 / zoom);
        ctx.stroke();
        Ok(())
    })
}

// =============================================================
// Helpers
// =============================================================

/// Move the origin to the element's top-left corner, rotated about its center.
fn enter_element(ctx: &CanvasRenderingContext2d, el: &CanvasElement) -> Result<(), JsValue> {
    let w = el.width_px();
    let h = el.height_px();
    let cx = el.x + w / 2.0;
    let cy = el.y + h / 2.0;
    ctx.translate(cx, cy)?;
    ctx.rotate(el.rotation.to_radians())?;
    ctx.translate(-w / 2.0, -h / 2.0)?;
    Ok(())
}
