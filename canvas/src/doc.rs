//! Element model: placeable card elements, sparse updates, and the in-memory store.
//!
//! This module defines what sits on the card besides the two fixed text
//! fields and the background (`CanvasElement`, `ElementKind`), a sparse-update
//! type for incremental edits (`PartialElement`), the creation payload
//! (`AddPayload`), and the store that owns all live elements (`DocStore`).
//!
//! The store keeps elements in a `Vec` whose order is the z-order: later
//! entries draw on top and are hit-tested first. Every mutation addressed to
//! an id that is not present is a silent no-op, so host events that race with
//! a deletion never fail.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_CONTROL, DEFAULT_STROKE_WIDTH, DUPLICATE_OFFSET, FALLBACK_BOX};

/// Unique identifier for a card element.
pub type ElementId = Uuid;

/// The kind of a card element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Free text box.
    Text,
    /// Colored note with editable text.
    Sticky,
    /// Filled square, circle, triangle, star or hexagon.
    Shape,
    /// Straight, arrow or curved line.
    Line,
    /// Freehand drawing surface.
    Draw,
    /// Grid of empty cells.
    Table,
    /// User-supplied image, independent of the background.
    Image,
}

/// A width or height: a concrete pixel value, or sized by its owner until the
/// first manual resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Auto,
    Px(f64),
}

impl Size {
    /// The pixel value, if resolved.
    #[must_use]
    pub fn px(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Px(v) => Some(v),
        }
    }

    /// The pixel value, or `fallback` when still automatic.
    #[must_use]
    pub fn resolve_or(self, fallback: f64) -> f64 {
        self.px().unwrap_or(fallback)
    }
}

/// Variant selector within shapes and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Square,
    Circle,
    Triangle,
    Star,
    Hexagon,
    Straight,
    Arrow,
    Curved,
}

impl ShapeType {
    /// Whether this variant styles a line rather than a filled shape.
    #[must_use]
    pub fn is_line_style(self) -> bool {
        matches!(self, Self::Straight | Self::Arrow | Self::Curved)
    }
}

/// Line end decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[default]
    None,
    Arrow,
}

/// Starting text for a free text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPreset {
    #[default]
    Heading,
    Subheading,
    Body,
}

impl TextPreset {
    fn content(self) -> &'static str {
        match self {
            Self::Heading => "Adicionar um título",
            Self::Subheading => "Adicionar subtítulo",
            Self::Body => "Adicionar um pouquinho de texto",
        }
    }

    fn font_size(self) -> f64 {
        match self {
            Self::Heading => 32.0,
            Self::Subheading => 24.0,
            Self::Body => 16.0,
        }
    }
}

/// A placed element as stored in the document and exchanged with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Left edge in card pixels.
    pub x: f64,
    /// Top edge in card pixels.
    pub y: f64,
    pub width: Size,
    pub height: Size,
    /// Degrees. Stored but not yet driven by any gesture.
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    /// Freehand command sequence in element-local pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<Marker>,
    /// Locked elements ignore body drags.
    #[serde(default)]
    pub locked: bool,
    /// Curve control point x in 0–100 box percentage space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_x: Option<f64>,
    /// Curve control point y in 0–100 box percentage space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl CanvasElement {
    /// Build a new element of `kind` with per-kind defaults. Payload fields
    /// the kind does not use are ignored.
    #[must_use]
    pub fn with_defaults(id: ElementId, kind: ElementKind, payload: &AddPayload) -> Self {
        let mut el = Self {
            id,
            kind,
            x: 100.0,
            y: 100.0,
            width: Size::Px(100.0),
            height: Size::Px(100.0),
            rotation: 0.0,
            content: None,
            color: Some(payload.color.clone().unwrap_or_else(|| "#ffffff".into())),
            shape_type: None,
            path: None,
            stroke_width: None,
            start_marker: None,
            end_marker: None,
            locked: false,
            control_x: None,
            control_y: None,
            rows: None,
            cols: None,
            src: payload.src.clone(),
            font_size: None,
        };

        match kind {
            ElementKind::Text => {
                let preset = payload.preset.unwrap_or_default();
                el.content = Some(preset.content().into());
                el.font_size = Some(preset.font_size());
            }
            ElementKind::Sticky => {
                el.width = Size::Px(200.0);
                el.height = Size::Px(200.0);
                el.content = Some("Nova Nota".into());
                el.color = Some(payload.color.clone().unwrap_or_else(|| "#fef3c7".into()));
            }
            ElementKind::Shape => {
                let shape = payload
                    .shape_type
                    .filter(|s| !s.is_line_style())
                    .unwrap_or(ShapeType::Square);
                el.shape_type = Some(shape);
                el.color = Some("#374151".into());
            }
            ElementKind::Line => {
                el.width = Size::Px(200.0);
                el.height = Size::Px(20.0);
                let style = payload
                    .shape_type
                    .filter(|s| s.is_line_style())
                    .unwrap_or(ShapeType::Straight);
                el.shape_type = Some(style);
                el.color = Some("#000000".into());
            }
            ElementKind::Table => {
                el.width = Size::Px(300.0);
                el.height = Size::Px(200.0);
                el.color = Some("#e5e7eb".into());
                el.rows = Some(3);
                el.cols = Some(3);
            }
            ElementKind::Draw => {
                el.width = Size::Px(400.0);
                el.height = Size::Px(400.0);
                el.color = Some(payload.color.clone().unwrap_or_else(|| "#000000".into()));
                el.path = Some(String::new());
            }
            ElementKind::Image => {
                el.width = Size::Px(200.0);
                el.height = Size::Px(200.0);
                el.src = Some(payload.src.clone().unwrap_or_default());
            }
        }
        el
    }

    /// Width in pixels, falling back to the default box for automatic sizes.
    #[must_use]
    pub fn width_px(&self) -> f64 {
        self.width.resolve_or(FALLBACK_BOX)
    }

    /// Height in pixels, falling back to the default box for automatic sizes.
    #[must_use]
    pub fn height_px(&self) -> f64 {
        self.height.resolve_or(FALLBACK_BOX)
    }

    /// Curve control point, defaulting to the box center.
    #[must_use]
    pub fn control_point(&self) -> (f64, f64) {
        (self.control_x.unwrap_or(DEFAULT_CONTROL), self.control_y.unwrap_or(DEFAULT_CONTROL))
    }

    /// Stroke width, defaulting to 4.
    #[must_use]
    pub fn stroke_width_or_default(&self) -> f64 {
        self.stroke_width
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    /// Fill or stroke color, or `fallback` when none is stored.
    #[must_use]
    pub fn color_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(fallback)
    }

    /// Uploaded images sit between the background and the overlay; everything
    /// else paints above the fixed text.
    #[must_use]
    pub fn below_overlay(&self) -> bool {
        self.kind == ElementKind::Image
    }

    /// Whether the element is a curved line, the only kind with a control point.
    #[must_use]
    pub fn is_curve(&self) -> bool {
        self.kind == ElementKind::Line && self.shape_type == Some(ShapeType::Curved)
    }
}

/// Type-specific creation payload. Fields the kind does not use are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPayload {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape_type: Option<ShapeType>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub preset: Option<TextPreset>,
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl PartialElement {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn merge_into(&self, el: &mut CanvasElement) {
        fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        set(&mut el.x, self.x.as_ref());
        set(&mut el.y, self.y.as_ref());
        set(&mut el.width, self.width.as_ref());
        set(&mut el.height, self.height.as_ref());
        set(&mut el.rotation, self.rotation.as_ref());
        set(&mut el.locked, self.locked.as_ref());
        set_opt(&mut el.content, self.content.as_ref());
        set_opt(&mut el.color, self.color.as_ref());
        set_opt(&mut el.shape_type, self.shape_type.as_ref());
        set_opt(&mut el.path, self.path.as_ref());
        set_opt(&mut el.stroke_width, self.stroke_width.as_ref());
        set_opt(&mut el.start_marker, self.start_marker.as_ref());
        set_opt(&mut el.end_marker, self.end_marker.as_ref());
        set_opt(&mut el.control_x, self.control_x.as_ref());
        set_opt(&mut el.control_y, self.control_y.as_ref());
        set_opt(&mut el.rows, self.rows.as_ref());
        set_opt(&mut el.cols, self.cols.as_ref());
        set_opt(&mut el.src, self.src.as_ref());
        set_opt(&mut el.font_size, self.font_size.as_ref());
    }
}

/// In-memory store of card elements in z-order (first = bottom).
#[derive(Debug, Default)]
pub struct DocStore {
    elements: Vec<CanvasElement>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Create an element of `kind` with per-kind defaults on top of the stack.
    pub fn add(&mut self, kind: ElementKind, payload: &AddPayload) -> ElementId {
        let id = Uuid::new_v4();
        self.elements
            .push(CanvasElement::with_defaults(id, kind, payload));
        id
    }

    /// Insert an element on top, replacing any existing element with the same id in place.
    pub fn insert(&mut self, el: CanvasElement) {
        if let Some(existing) = self.elements.iter_mut().find(|e| e.id == el.id) {
            *existing = el;
        } else {
            self.elements.push(el);
        }
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<CanvasElement> {
        let idx = self.index_of(id)?;
        Some(self.elements.remove(idx))
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Apply a partial update. Returns false if the element doesn't exist.
    pub fn apply_partial(&mut self, id: &ElementId, partial: &PartialElement) -> bool {
        let Some(el) = self.elements.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        partial.merge_into(el);
        true
    }

    /// Clone an element with a fresh id, offset so the copy is visible, on
    /// top of the stack. Returns the new id, or `None` if `id` is absent.
    pub fn duplicate(&mut self, id: &ElementId) -> Option<ElementId> {
        let mut copy = self.get(id)?.clone();
        copy.id = Uuid::new_v4();
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        let new_id = copy.id;
        self.elements.push(copy);
        Some(new_id)
    }

    /// Position of an element in the z-order.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    /// All elements bottom to top.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
