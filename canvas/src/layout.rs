//! Text measurement and the resolved boxes of every selectable target.
//!
//! Hit-testing, drag clamping and drawing all need the same on-card box for a
//! target. For elements that is just their stored geometry; for the fixed text
//! fields it depends on wrapped text, so measurement goes through the
//! [`TextMeasure`] seam: the browser engine measures with the 2D context and
//! the browser-free core uses a glyph-width estimate.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::card::{Card, TextField, TextSlot};
use crate::consts::LINE_HEIGHT_RATIO;
use crate::doc::{CanvasElement, DocStore};
use crate::geometry::Rect;
use crate::input::SelectionTarget;

/// Font description shared by measuring and drawing.
#[derive(Debug, Clone, Copy)]
pub struct FontSpec<'a> {
    pub family: &'a str,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec<'_> {
    /// CSS `font` shorthand, e.g. `italic bold 48px Inter, sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        let style = if self.italic { "italic " } else { "" };
        let weight = if self.bold { "bold " } else { "" };
        format!("{style}{weight}{}px {}", self.size, self.family)
    }

    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.size * LINE_HEIGHT_RATIO
    }
}

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &FontSpec<'_>) -> f64;
}

/// Average-glyph estimate used when no rendering context exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

impl TextMeasure for EstimatedMeasure {
    fn text_width(&self, text: &str, font: &FontSpec<'_>) -> f64 {
        let per_char = if font.bold { 0.6 } else { 0.55 };
        text.chars().count() as f64 * font.size * per_char
    }
}

/// Font of a fixed text field.
#[must_use]
pub fn field_font(field: &TextField) -> FontSpec<'_> {
    FontSpec {
        family: &field.style.font_family,
        size: field.style.font_size,
        bold: field.style.bold,
        italic: field.style.italic,
    }
}

/// Break `text` into lines no wider than `max_w`. Explicit newlines are kept;
/// words longer than a line are split by character.
#[must_use]
pub fn wrap_lines(text: &str, max_w: f64, font: &FontSpec<'_>, measure: &dyn TextMeasure) -> Vec<String> {
    let fits = |s: &str| measure.text_width(s, font) <= max_w;
    let mut out = Vec::new();

    for raw_line in text.lines() {
        let words: Vec<&str> = raw_line.split_whitespace().collect();
        if words.is_empty() {
            out.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in words {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_owned();
            } else {
                let mut chunks = break_long_word(word, &fits);
                if let Some(last) = chunks.pop() {
                    out.extend(chunks);
                    current = last;
                }
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn break_long_word(word: &str, fits: &dyn Fn(&str) -> bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if !current.is_empty() && !fits(&candidate) {
            lines.push(current);
            current = ch.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrapped lines and box of a fixed text field on a card `card_w` wide.
///
/// An automatic width shrinks to the widest line, capped at the space left
/// between the field and the right edge of the card.
#[must_use]
pub fn text_field_layout(field: &TextField, slot: TextSlot, card_w: f64, measure: &dyn TextMeasure) -> (Vec<String>, Rect) {
    let font = field_font(field);
    let text = field.display_text(slot);
    let (lines, width) = match field.width.px() {
        Some(w) => (wrap_lines(text, w, &font, measure), w),
        None => {
            let cap = (card_w - field.x).max(font.size);
            let lines = wrap_lines(text, cap, &font, measure);
            let widest = lines
                .iter()
                .map(|l| measure.text_width(l, &font))
                .fold(0.0_f64, f64::max);
            (lines, widest.min(cap))
        }
    };
    let height = lines.len().max(1) as f64 * font.line_height();
    (lines, Rect::new(field.x, field.y, width, height))
}

/// Stored box of an element.
#[must_use]
pub fn element_rect(el: &CanvasElement) -> Rect {
    Rect::new(el.x, el.y, el.width_px(), el.height_px())
}

/// The card's own rectangle.
#[must_use]
pub fn card_rect(card: &Card) -> Rect {
    let (w, h) = card.size();
    Rect::new(0.0, 0.0, w, h)
}

/// Box of the background image; automatic sizes fill the card.
#[must_use]
pub fn background_rect(card: &Card) -> Rect {
    let (w, h) = card.size();
    let p = card.background_placement;
    Rect::new(p.x, p.y, p.width.resolve_or(w), p.height.resolve_or(h))
}

/// Resolved box of any selectable target, or `None` when it doesn't exist.
#[must_use]
pub fn target_rect(target: SelectionTarget, doc: &DocStore, card: &Card, measure: &dyn TextMeasure) -> Option<Rect> {
    match target {
        SelectionTarget::None => None,
        SelectionTarget::Element(id) => doc.get(&id).map(element_rect),
        SelectionTarget::Headline | SelectionTarget::Description => {
            let slot = target.text_slot()?;
            let (w, _) = card.size();
            Some(text_field_layout(card.text(slot), slot, w, measure).1)
        }
        SelectionTarget::Background => Some(background_rect(card)),
    }
}

/// Area a target must stay inside while dragged or resized.
#[must_use]
pub fn target_bounds(target: SelectionTarget, card: &Card) -> Option<Rect> {
    match target {
        SelectionTarget::Background => None,
        _ => Some(card_rect(card)),
    }
}
