//! Card background: classification of the single background value and CSS
//! gradient parsing.
//!
//! The background is stored as one string, exactly as the user (or a preset,
//! template or AI suggestion) supplied it. `Background::classify` decides how
//! to draw it: URLs become images, `linear-gradient(...)` /
//! `radial-gradient(...)` become canvas gradients, anything else is a flat
//! color. Gradients are parsed into stops once per draw; a malformed gradient
//! falls back to the black base fill rather than failing the frame.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use crate::camera::Point;

/// How the background value is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(String),
    Gradient(String),
    Image(String),
}

impl Background {
    /// Classify a raw background value.
    #[must_use]
    pub fn classify(value: &str) -> Self {
        let v = value.trim();
        if v.starts_with("http") || v.starts_with("blob:") || v.starts_with("data:") {
            Self::Image(v.to_owned())
        } else if v.starts_with("linear-gradient") || v.starts_with("radial-gradient") {
            Self::Gradient(v.to_owned())
        } else {
            Self::Color(v.to_owned())
        }
    }

    /// Only image backgrounds are selectable and movable.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// The raw value this background was classified from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Color(v) | Self::Gradient(v) | Self::Image(v) => v,
        }
    }
}

/// Failure to turn a gradient string into drawable stops.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradientError {
    #[error("unsupported gradient function: {0}")]
    Unsupported(String),
    #[error("gradient needs at least two color stops")]
    TooFewStops,
    #[error("invalid gradient angle: {0}")]
    BadAngle(String),
}

/// Geometry of a parsed gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    /// CSS angle: 0 points up, increasing clockwise.
    Linear { angle_deg: f64 },
    /// Centered, reaching the farthest corner.
    Radial,
}

/// One color stop; `offset` is a 0–1 fraction when given.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: String,
    pub offset: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientSpec {
    pub shape: GradientShape,
    pub stops: Vec<ColorStop>,
}

/// Parse `linear-gradient(...)` or `radial-gradient(...)`.
///
/// # Errors
///
/// Returns an error for other functions, bad angles, or fewer than two stops.
pub fn parse_gradient(value: &str) -> Result<GradientSpec, GradientError> {
    let v = value.trim();
    let (radial, body) = if let Some(rest) = v.strip_prefix("linear-gradient(") {
        (false, rest)
    } else if let Some(rest) = v.strip_prefix("radial-gradient(") {
        (true, rest)
    } else {
        return Err(GradientError::Unsupported(v.to_owned()));
    };
    let body = body
        .strip_suffix(')')
        .ok_or_else(|| GradientError::Unsupported(v.to_owned()))?;

    let mut parts = split_top_level(body);
    let mut shape = if radial {
        GradientShape::Radial
    } else {
        GradientShape::Linear { angle_deg: 180.0 }
    };

    if let Some(first) = parts.first() {
        if radial && is_radial_shape(first) {
            parts.remove(0);
        } else if !radial && is_direction(first) {
            shape = GradientShape::Linear { angle_deg: parse_direction(first)? };
            parts.remove(0);
        }
    }

    let stops: Vec<ColorStop> = parts.iter().map(|p| parse_stop(p)).collect();
    if stops.len() < 2 {
        return Err(GradientError::TooFewStops);
    }
    Ok(GradientSpec { shape, stops })
}

/// Fill in missing stop offsets: the first defaults to 0, the last to 1, and
/// gaps are spread evenly. Offsets never decrease.
#[must_use]
pub fn resolved_offsets(stops: &[ColorStop]) -> Vec<f64> {
    let n = stops.len();
    let mut out: Vec<Option<f64>> = stops.iter().map(|s| s.offset).collect();
    if n == 0 {
        return Vec::new();
    }
    if out[0].is_none() {
        out[0] = Some(0.0);
    }
    if out[n - 1].is_none() {
        out[n - 1] = Some(1.0);
    }

    let mut i = 0;
    while i < n {
        if out[i].is_some() {
            i += 1;
            continue;
        }
        let start = i - 1;
        let mut end = i;
        while out[end].is_none() {
            end += 1;
        }
        let from = out[start].unwrap_or(0.0);
        let to = out[end].unwrap_or(1.0);
        let span = (end - start) as f64;
        for (step, slot) in out.iter_mut().enumerate().take(end).skip(i) {
            *slot = Some(from + (to - from) * ((step - start) as f64) / span);
        }
        i = end;
    }

    let mut last = 0.0_f64;
    out.into_iter()
        .map(|o| {
            let v = o.unwrap_or(last).clamp(0.0, 1.0).max(last);
            last = v;
            v
        })
        .collect()
}

/// Start and end points of a CSS linear gradient over a `w`×`h` box.
#[must_use]
pub fn linear_endpoints(angle_deg: f64, w: f64, h: f64) -> (Point, Point) {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let half_len = ((w * sin).abs() + (h * cos).abs()) / 2.0;
    let cx = w / 2.0;
    let cy = h / 2.0;
    (
        Point::new(cx - sin * half_len, cy + cos * half_len),
        Point::new(cx + sin * half_len, cy - cos * half_len),
    )
}

/// Radius reaching the farthest corner from the center of a `w`×`h` box.
#[must_use]
pub fn radial_radius(w: f64, h: f64) -> f64 {
    (w / 2.0).hypot(h / 2.0)
}

fn split_top_level(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut current = String::new();
    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_owned());
    }
    parts
}

fn is_direction(part: &str) -> bool {
    part.starts_with("to ") || part.ends_with("deg") || part.ends_with("turn") || part.ends_with("rad")
}

fn is_radial_shape(part: &str) -> bool {
    ["circle", "ellipse", "closest-", "farthest-", "at "]
        .iter()
        .any(|p| part.starts_with(p))
}

fn parse_direction(part: &str) -> Result<f64, GradientError> {
    if let Some(sides) = part.strip_prefix("to ") {
        let mut words: Vec<&str> = sides.split_whitespace().collect();
        words.sort_unstable();
        return match words.as_slice() {
            ["top"] => Ok(0.0),
            ["right"] => Ok(90.0),
            ["bottom"] => Ok(180.0),
            ["left"] => Ok(270.0),
            ["right", "top"] => Ok(45.0),
            ["bottom", "right"] => Ok(135.0),
            ["bottom", "left"] => Ok(225.0),
            ["left", "top"] => Ok(315.0),
            _ => Err(GradientError::BadAngle(part.to_owned())),
        };
    }

    let bad = || GradientError::BadAngle(part.to_owned());
    if let Some(n) = part.strip_suffix("deg") {
        n.trim().parse::<f64>().map_err(|_| bad())
    } else if let Some(n) = part.strip_suffix("turn") {
        n.trim()
            .parse::<f64>()
            .map(|t| t * 360.0)
            .map_err(|_| bad())
    } else if let Some(n) = part.strip_suffix("rad") {
        n.trim()
            .parse::<f64>()
            .map(f64::to_degrees)
            .map_err(|_| bad())
    } else {
        Err(bad())
    }
}

fn parse_stop(part: &str) -> ColorStop {
    // The offset, when present, is the last whitespace-separated token outside parentheses.
    if let Some(idx) = last_top_level_space(part) {
        let (color, tail) = part.split_at(idx);
        if let Some(pct) = tail.trim().strip_suffix('%') {
            if let Ok(v) = pct.parse::<f64>() {
                return ColorStop { color: color.trim().to_owned(), offset: Some(v / 100.0) };
            }
        }
        if tail.trim().ends_with("px") {
            return ColorStop { color: color.trim().to_owned(), offset: None };
        }
    }
    ColorStop { color: part.trim().to_owned(), offset: None }
}

fn last_top_level_space(part: &str) -> Option<usize> {
    let mut depth = 0_i32;
    let mut found = None;
    for (i, ch) in part.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => found = Some(i),
            _ => {}
        }
    }
    found
}
