//! Transform math: pointer movement to element position, size and
//! control-point updates.
//!
//! Everything here is pure and works in card pixels. Bounds are optional:
//! `None` means the target may leave the card (the background image).

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{FALLBACK_BOX, VIEWBOX};
use crate::doc::Size;
use crate::hit::ResizeAnchor;

/// Axis-aligned rectangle in card pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// `p` relative to the top-left corner.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }
}

/// Move `orig` by `delta`, keeping it inside `bounds` when given. A rect
/// larger than the bounds pins to the bounds' top-left.
#[must_use]
pub fn drag_rect(orig: Rect, delta: Point, bounds: Option<Rect>) -> Rect {
    let mut x = orig.x + delta.x;
    let mut y = orig.y + delta.y;
    if let Some(b) = bounds {
        x = clamp_axis(x, orig.width, b.x, b.width);
        y = clamp_axis(y, orig.height, b.y, b.height);
    }
    Rect { x, y, ..orig }
}

fn clamp_axis(pos: f64, len: f64, min: f64, span: f64) -> f64 {
    let max = (min + span - len).max(min);
    pos.clamp(min, max)
}

/// Resize `orig` by dragging the `anchor` handle by `delta`.
///
/// Only the edges the anchor owns move. Moving edges stop at `bounds` and
/// never come closer than `min_size` to the opposite edge.
#[must_use]
pub fn resize_rect(orig: Rect, anchor: ResizeAnchor, delta: Point, bounds: Option<Rect>, min_size: f64) -> Rect {
    let edges = anchor.edges();
    let mut left = orig.x;
    let mut right = orig.right();
    let mut top = orig.y;
    let mut bottom = orig.bottom();

    if edges.left {
        left += delta.x;
        if let Some(b) = bounds {
            left = left.max(b.x);
        }
        left = left.min(right - min_size);
    }
    if edges.right {
        right += delta.x;
        if let Some(b) = bounds {
            right = right.min(b.right());
        }
        right = right.max(left + min_size);
    }
    if edges.top {
        top += delta.y;
        if let Some(b) = bounds {
            top = top.max(b.y);
        }
        top = top.min(bottom - min_size);
    }
    if edges.bottom {
        bottom += delta.y;
        if let Some(b) = bounds {
            bottom = bottom.min(b.bottom());
        }
        bottom = bottom.max(top + min_size);
    }

    Rect::new(left, top, right - left, bottom - top)
}

/// Move a curve control point by a pointer delta.
///
/// The delta is normalized against the element's own pixel box (100×100 when
/// unresolved) into 0–100 percentage space and the result is clamped, so
/// the curve keeps its shape when the element is later resized.
#[must_use]
pub fn control_point_drag(current: (f64, f64), delta: Point, width: Size, height: Size) -> (f64, f64) {
    let w = width.px().filter(|v| *v > 0.0).unwrap_or(FALLBACK_BOX);
    let h = height
        .px()
        .filter(|v| *v > 0.0)
        .unwrap_or(FALLBACK_BOX);
    let nx = (current.0 + delta.x / w * VIEWBOX).clamp(0.0, VIEWBOX);
    let ny = (current.1 + delta.y / h * VIEWBOX).clamp(0.0, VIEWBOX);
    (nx, ny)
}

/// Source rectangle that crops an `src_w`×`src_h` image to fill a
/// `box_w`×`box_h` box without distortion, centered.
#[must_use]
pub fn cover_crop(src_w: f64, src_h: f64, box_w: f64, box_h: f64) -> Option<Rect> {
    if src_w <= 0.0 || src_h <= 0.0 || box_w <= 0.0 || box_h <= 0.0 {
        return None;
    }
    let scale = (box_w / src_w).max(box_h / src_h);
    let sw = box_w / scale;
    let sh = box_h / scale;
    Some(Rect::new((src_w - sw) / 2.0, (src_h - sh) / 2.0, sw, sh))
}
