//! Freehand path encoding.
//!
//! A draw element stores all of its strokes as one SVG-style command string in
//! element-local pixels: every stroke is a `M x y` followed by any number of
//! `L x y` segments. Strokes are only ever appended; nothing here truncates an
//! existing path.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use crate::camera::Point;

/// One drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

/// Failure to read a stored path string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("unknown path command `{0}`")]
    UnknownCommand(String),
    #[error("path command `{0}` is missing a coordinate")]
    MissingCoordinate(char),
    #[error("invalid path coordinate `{0}`")]
    BadCoordinate(String),
}

/// Start a new sub-path at `at`, keeping every earlier stroke.
#[must_use]
pub fn begin_stroke(existing: &str, at: Point) -> String {
    let cmd = format!("M {} {}", format_coord(at.x), format_coord(at.y));
    if existing.trim().is_empty() {
        cmd
    } else {
        format!("{existing} {cmd}")
    }
}

/// Append one line segment to the current sub-path.
pub fn extend_stroke(path: &mut String, to: Point) {
    path.push_str(&format!(" L {} {}", format_coord(to.x), format_coord(to.y)));
}

/// Parse a stored path into commands.
///
/// # Errors
///
/// Returns [`PathError`] on a command letter other than `M`/`L` or a missing
/// or non-numeric coordinate.
pub fn parse(path: &str) -> Result<Vec<PathCommand>, PathError> {
    let mut tokens = path.split_whitespace();
    let mut out = Vec::new();
    while let Some(tok) = tokens.next() {
        let letter = match tok {
            "M" => 'M',
            "L" => 'L',
            other => return Err(PathError::UnknownCommand(other.to_owned())),
        };
        let x = next_coord(&mut tokens, letter)?;
        let y = next_coord(&mut tokens, letter)?;
        let p = Point::new(x, y);
        out.push(if letter == 'M' { PathCommand::MoveTo(p) } else { PathCommand::LineTo(p) });
    }
    Ok(out)
}

fn next_coord<'a>(tokens: &mut impl Iterator<Item = &'a str>, letter: char) -> Result<f64, PathError> {
    let tok = tokens.next().ok_or(PathError::MissingCoordinate(letter))?;
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PathError::BadCoordinate(tok.to_owned())),
    }
}

/// Whole numbers print without decimals; others keep at most two.
#[must_use]
pub fn format_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.fract().abs() < f64::EPSILON {
        // `+ 0.0` folds negative zero.
        format!("{:.0}", rounded + 0.0)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').to_owned()
    }
}
