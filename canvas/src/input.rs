//! Input model: selection targets, modifier keys, mouse buttons, and the
//! gesture state machine.
//!
//! `SelectionTarget` is the single selection namespace shared by elements,
//! the two fixed text fields and the background image. `InputState` is the
//! active gesture tracked between pointer-down and pointer-up, carrying the
//! context needed to turn later pointer positions into field updates.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::card::TextSlot;
use crate::doc::ElementId;
use crate::geometry::Rect;
use crate::hit::ResizeAnchor;

/// What is currently selected. At most one target at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum SelectionTarget {
    #[default]
    None,
    Element(ElementId),
    Headline,
    Description,
    Background,
}

impl SelectionTarget {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    #[must_use]
    pub fn element_id(self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(id),
            _ => None,
        }
    }

    /// The text field this target names, if it is one.
    #[must_use]
    pub fn text_slot(self) -> Option<TextSlot> {
        match self {
            Self::Headline => Some(TextSlot::Headline),
            Self::Description => Some(TextSlot::Description),
            _ => None,
        }
    }
}

impl From<TextSlot> for SelectionTarget {
    fn from(slot: TextSlot) -> Self {
        match slot {
            TextSlot::Headline => Self::Headline,
            TextSlot::Description => Self::Description,
        }
    }
}

/// Contextual toolbar the host should show for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolbar {
    #[default]
    None,
    /// Color, stroke width, markers, curve toggle, lock, duplicate, delete.
    Line,
    /// Font, size, color, bold/italic/underline, alignment.
    Text,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_dom(index: i16) -> Self {
        match index {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    pub selection: SelectionTarget,
}

/// The gesture in progress.
///
/// Drag and resize remember the pointer position and target box at
/// pointer-down so every move recomputes from the origin; drawing and
/// control-point drags are incremental.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture; hover only updates the cursor.
    #[default]
    Idle,
    /// Moving a target by its body.
    Dragging {
        target: SelectionTarget,
        /// Card-space pointer position at pointer-down.
        start: Point,
        orig: Rect,
    },
    /// Dragging one of the eight (or six, for text) resize handles.
    Resizing {
        target: SelectionTarget,
        anchor: ResizeAnchor,
        start: Point,
        orig: Rect,
    },
    /// Appending segments to the current sub-path of a draw element.
    Drawing { id: ElementId },
    /// Bending a curve line through its control point.
    DraggingControlPoint {
        id: ElementId,
        /// Card-space pointer position at the previous event.
        last: Point,
    },
}

impl InputState {
    /// Whether a pointer gesture is in progress and window capture is needed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The target the gesture acts on.
    #[must_use]
    pub fn target(&self) -> SelectionTarget {
        match *self {
            Self::Idle => SelectionTarget::None,
            Self::Dragging { target, .. } | Self::Resizing { target, .. } => target,
            Self::Drawing { id } | Self::DraggingControlPoint { id, .. } => SelectionTarget::Element(id),
        }
    }
}
