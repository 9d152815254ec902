//! Per-type geometry in element-local units.
//!
//! Filled shapes are described in 0–100 percentage space of their box, line
//! variants in the 100×100 view box that is stretched over the element. The
//! renderer and hit-tester both read from here so what is drawn and what is
//! clickable agree.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use crate::camera::Point;
use crate::consts::{MARKER_INSET_END, MARKER_INSET_START, VIEWBOX};
use crate::doc::{CanvasElement, Marker, ShapeType};

const TRIANGLE: &[(f64, f64)] = &[(50.0, 0.0), (0.0, 100.0), (100.0, 100.0)];

const STAR: &[(f64, f64)] = &[
    (50.0, 0.0),
    (61.0, 35.0),
    (98.0, 35.0),
    (68.0, 57.0),
    (79.0, 91.0),
    (50.0, 70.0),
    (21.0, 91.0),
    (32.0, 57.0),
    (2.0, 35.0),
    (39.0, 35.0),
];

const HEXAGON: &[(f64, f64)] = &[
    (25.0, 0.0),
    (75.0, 0.0),
    (100.0, 50.0),
    (75.0, 100.0),
    (25.0, 100.0),
    (0.0, 50.0),
];

/// Filled outline of a `shape` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Rect,
    Ellipse,
    /// Vertices in percent of the element box.
    Polygon(&'static [(f64, f64)]),
}

impl Outline {
    #[must_use]
    pub fn for_shape(shape: ShapeType) -> Self {
        match shape {
            ShapeType::Circle => Self::Ellipse,
            ShapeType::Triangle => Self::Polygon(TRIANGLE),
            ShapeType::Star => Self::Polygon(STAR),
            ShapeType::Hexagon => Self::Polygon(HEXAGON),
            _ => Self::Rect,
        }
    }

    /// Vertices scaled to a `w`×`h` box. Empty for non-polygons.
    #[must_use]
    pub fn vertices(&self, w: f64, h: f64) -> Vec<Point> {
        match self {
            Self::Polygon(pts) => pts
                .iter()
                .map(|&(px, py)| Point::new(px / 100.0 * w, py / 100.0 * h))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether local point `p` lies inside the outline of a `w`×`h` box.
    #[must_use]
    pub fn contains(&self, p: Point, w: f64, h: f64) -> bool {
        if w <= 0.0 || h <= 0.0 || p.x < 0.0 || p.y < 0.0 || p.x > w || p.y > h {
            return false;
        }
        match self {
            Self::Rect => true,
            Self::Ellipse => {
                let nx = (p.x - w / 2.0) / (w / 2.0);
                let ny = (p.y - h / 2.0) / (h / 2.0);
                nx * nx + ny * ny <= 1.0
            }
            Self::Polygon(_) => point_in_polygon(p, &self.vertices(w, h)),
        }
    }
}

/// Even-odd ray cast.
fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let mut inside = false;
    let mut j = poly.len().wrapping_sub(1);
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Stroke geometry of a `line` element in view-box units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineGeometry {
    /// Horizontal segment through the middle of the box. Endpoints pull in
    /// where an arrowhead sits so the head ends at the box edge.
    Segment {
        start: Point,
        end: Point,
        start_arrow: bool,
        end_arrow: bool,
    },
    /// Quadratic bezier from the bottom-left to the top-right corner.
    Curve { start: Point, control: Point, end: Point },
}

impl LineGeometry {
    #[must_use]
    pub fn for_element(el: &CanvasElement) -> Self {
        let mid = VIEWBOX / 2.0;
        let end_arrow = el.end_marker == Some(Marker::Arrow);
        match el.shape_type.unwrap_or(ShapeType::Straight) {
            ShapeType::Curved => {
                let (cx, cy) = el.control_point();
                Self::Curve {
                    start: Point::new(0.0, VIEWBOX),
                    control: Point::new(cx, cy),
                    end: Point::new(VIEWBOX, 0.0),
                }
            }
            ShapeType::Arrow => Self::Segment {
                start: Point::new(0.0, mid),
                end: Point::new(if end_arrow { MARKER_INSET_END } else { VIEWBOX }, mid),
                start_arrow: false,
                end_arrow: true,
            },
            _ => {
                let start_arrow = el.start_marker == Some(Marker::Arrow);
                Self::Segment {
                    start: Point::new(if start_arrow { MARKER_INSET_START } else { 0.0 }, mid),
                    end: Point::new(if end_arrow { MARKER_INSET_END } else { VIEWBOX }, mid),
                    start_arrow,
                    end_arrow,
                }
            }
        }
    }
}

/// Map a view-box point into a `w`×`h` element box.
#[must_use]
pub fn to_local(p: Point, w: f64, h: f64) -> Point {
    Point::new(p.x / VIEWBOX * w, p.y / VIEWBOX * h)
}

/// Interior grid line offsets of a `rows`×`cols` table in a `w`×`h` box:
/// `(column x positions, row y positions)`.
#[must_use]
pub fn table_grid(rows: u32, cols: u32, w: f64, h: f64) -> (Vec<f64>, Vec<f64>) {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let xs = (1..cols).map(|c| w * f64::from(c) / f64::from(cols)).collect();
    let ys = (1..rows).map(|r| h * f64::from(r) / f64::from(rows)).collect();
    (xs, ys)
}
