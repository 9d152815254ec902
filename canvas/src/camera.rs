#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

/// A point in either screen or card space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Display scale of the card.
///
/// Screen coordinates are CSS pixels relative to the card's top-left corner as
/// the browser lays it out, so they already include the zoom. Card coordinates
/// are the unscaled pixel space elements are stored in.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to card coordinates.
    #[must_use]
    pub fn screen_to_card(&self, screen: Point) -> Point {
        Point { x: screen.x / self.zoom, y: screen.y / self.zoom }
    }

    /// Convert a card-space point to screen coordinates.
    #[must_use]
    pub fn card_to_screen(&self, card: Point) -> Point {
        Point { x: card.x * self.zoom, y: card.y * self.zoom }
    }

    /// Convert a screen-space distance to card-space distance.
    #[must_use]
    pub fn screen_dist_to_card(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Step the zoom up by one increment. Returns `true` when it changed.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Step the zoom down by one increment. Returns `true` when it changed.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Set the zoom, clamped to the allowed range and rounded to one decimal
    /// so repeated steps do not drift.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let next = ((zoom * 10.0).round() / 10.0).clamp(ZOOM_MIN, ZOOM_MAX);
        if (next - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = next;
        true
    }
}
