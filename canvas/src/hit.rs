//! Hit-testing: which target and which part of it lies under a card point.
//!
//! Order matters and follows paint order in reverse. Handles of the current
//! selection win over everything so a handle overlapping another element still
//! resizes the selection. Then come elements top-most first, the fixed text
//! fields, uploaded images (painted under the overlay) and finally the
//! background image.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::card::{Card, TextSlot};
use crate::consts::{CONTROL_DOT_RADIUS_PX, CONTROL_DOT_SLOP_PX, HANDLE_RADIUS_PX};
use crate::doc::{CanvasElement, DocStore, ElementKind, ShapeType};
use crate::geometry::Rect;
use crate::input::SelectionTarget;
use crate::layout::{self, TextMeasure};
use crate::shapes::{self, Outline};

/// Which part of a target was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    /// The draggable dot of a selected curve line.
    ControlPoint,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

/// Which edges of a box a handle moves.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// Text fields only grow sideways: no pure top or bottom handle.
    pub const TEXT: [Self; 6] = [Self::Ne, Self::E, Self::Se, Self::Sw, Self::W, Self::Nw];

    #[must_use]
    pub fn edges(self) -> Edges {
        Edges {
            left: matches!(self, Self::W | Self::Nw | Self::Sw),
            right: matches!(self, Self::E | Self::Ne | Self::Se),
            top: matches!(self, Self::N | Self::Ne | Self::Nw),
            bottom: matches!(self, Self::S | Self::Se | Self::Sw),
        }
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    /// Handle center on `rect`.
    #[must_use]
    pub fn position(self, rect: Rect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(rect.right(), rect.y),
            Self::E => Point::new(rect.right(), cy),
            Self::Se => Point::new(rect.right(), rect.bottom()),
            Self::S => Point::new(cx, rect.bottom()),
            Self::Sw => Point::new(rect.x, rect.bottom()),
            Self::W => Point::new(rect.x, cy),
            Self::Nw => Point::new(rect.x, rect.y),
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: SelectionTarget,
    pub part: HitPart,
}

/// Handles shown for a selected target.
#[must_use]
pub fn anchors_for(target: SelectionTarget) -> &'static [ResizeAnchor] {
    match target {
        SelectionTarget::None => &[],
        SelectionTarget::Headline | SelectionTarget::Description => &ResizeAnchor::TEXT,
        _ => &ResizeAnchor::ALL,
    }
}

/// Handle centers for a selected target's box.
#[must_use]
pub fn handle_positions(target: SelectionTarget, rect: Rect) -> Vec<(ResizeAnchor, Point)> {
    anchors_for(target)
        .iter()
        .map(|a| (*a, a.position(rect)))
        .collect()
}

/// Control dot center of a curve line in card coordinates.
#[must_use]
pub fn control_point_position(el: &CanvasElement) -> Point {
    let (cx, cy) = el.control_point();
    let local = shapes::to_local(Point::new(cx, cy), el.width_px(), el.height_px());
    Point::new(el.x + local.x, el.y + local.y)
}

/// Find the target under `card_pt`, checking the selection's handles first.
#[must_use]
pub fn hit_test(
    card_pt: Point,
    doc: &DocStore,
    card: &Card,
    measure: &dyn TextMeasure,
    camera: &Camera,
    selection: SelectionTarget,
) -> Option<Hit> {
    if let Some(hit) = hit_selection_ui(card_pt, doc, card, measure, camera, selection) {
        return Some(hit);
    }

    let top_element = |below_overlay: bool| {
        doc.elements()
            .iter()
            .rev()
            .filter(|el| el.below_overlay() == below_overlay)
            .find(|el| element_contains(el, card_pt))
            .map(|el| Hit { target: SelectionTarget::Element(el.id), part: HitPart::Body })
    };

    if let Some(hit) = top_element(false) {
        return Some(hit);
    }

    let (card_w, _) = card.size();
    for slot in [TextSlot::Description, TextSlot::Headline] {
        let (_, rect) = layout::text_field_layout(card.text(slot), slot, card_w, measure);
        if rect.contains(card_pt) {
            return Some(Hit { target: slot.into(), part: HitPart::Body });
        }
    }

    if let Some(hit) = top_element(true) {
        return Some(hit);
    }

    if card.background_kind().is_image() && layout::background_rect(card).contains(card_pt) {
        return Some(Hit { target: SelectionTarget::Background, part: HitPart::Body });
    }

    None
}

fn hit_selection_ui(
    card_pt: Point,
    doc: &DocStore,
    card: &Card,
    measure: &dyn TextMeasure,
    camera: &Camera,
    selection: SelectionTarget,
) -> Option<Hit> {
    if let Some(el) = selection.element_id().and_then(|id| doc.get(&id)) {
        if el.is_curve() {
            let slop = camera.screen_dist_to_card(CONTROL_DOT_RADIUS_PX + CONTROL_DOT_SLOP_PX);
            let dot = control_point_position(el);
            if dist(card_pt, dot) <= slop {
                return Some(Hit { target: selection, part: HitPart::ControlPoint });
            }
        }
    }

    let rect = layout::target_rect(selection, doc, card, measure)?;
    let radius = camera.screen_dist_to_card(HANDLE_RADIUS_PX);
    handle_positions(selection, rect)
        .into_iter()
        .find(|(_, pos)| dist(card_pt, *pos) <= radius)
        .map(|(anchor, _)| Hit { target: selection, part: HitPart::ResizeHandle(anchor) })
}

/// Whether `p` is on an element's body, honoring its rotation and, for
/// filled shapes, its outline.
fn element_contains(el: &CanvasElement, p: Point) -> bool {
    let w = el.width_px();
    let h = el.height_px();
    let local = unrotate(el, p);
    if el.kind == ElementKind::Shape {
        return Outline::for_shape(el.shape_type.unwrap_or(ShapeType::Square)).contains(local, w, h);
    }
    local.x >= 0.0 && local.x <= w && local.y >= 0.0 && local.y <= h
}

/// `p` in the element's unrotated local frame, origin at its top-left.
fn unrotate(el: &CanvasElement, p: Point) -> Point {
    let w = el.width_px();
    let h = el.height_px();
    let cx = el.x + w / 2.0;
    let cy = el.y + h / 2.0;
    let (sin, cos) = (-el.rotation.to_radians()).sin_cos();
    let dx = p.x - cx;
    let dy = p.y - cy;
    Point::new(dx * cos - dy * sin + w / 2.0, dx * sin + dy * cos + h / 2.0)
}

fn dist(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
