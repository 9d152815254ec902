//! Card-level state: the two fixed text fields, the background layer, overlay,
//! filter and output format.
//!
//! Headline and description are not elements: they always exist, cannot be
//! deleted, and carry a richer style than generic elements. They share the
//! selection namespace and the transform code path with elements through
//! [`crate::input::SelectionTarget`].

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use serde::{Deserialize, Serialize};

use crate::background::Background;
use crate::doc::Size;
use crate::format::{self, DEFAULT_FORMAT, Format};

/// Which fixed text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSlot {
    Headline,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// Canvas `textAlign` keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Per-field text style.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
}

/// A fixed text field. Height is always derived from the wrapped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// `Auto` fits the text until the first manual resize.
    pub width: Size,
    pub style: TextStyle,
}

impl TextField {
    fn headline() -> Self {
        Self {
            text: "Promoção de Verão 2024".into(),
            x: 50.0,
            y: 100.0,
            width: Size::Auto,
            style: TextStyle {
                font_family: DEFAULT_FONT.into(),
                font_size: 48.0,
                color: "#ffffff".into(),
                bold: false,
                italic: false,
                underline: false,
                align: TextAlign::Center,
            },
        }
    }

    fn description() -> Self {
        Self {
            text: "Ganhe 50% de desconto em todos os itens apenas neste fim de semana.".into(),
            x: 50.0,
            y: 300.0,
            width: Size::Auto,
            style: TextStyle {
                font_family: DEFAULT_FONT.into(),
                font_size: 16.0,
                color: "#e0e0e0".into(),
                bold: false,
                italic: false,
                underline: false,
                align: TextAlign::Center,
            },
        }
    }

    /// Text to draw: the field's text, or a prompt when it is empty.
    #[must_use]
    pub fn display_text(&self, slot: TextSlot) -> &str {
        if !self.text.trim().is_empty() {
            return &self.text;
        }
        match slot {
            TextSlot::Headline => "Seu Título",
            TextSlot::Description => "Escreva uma descrição chamativa para o seu card.",
        }
    }
}

/// Sparse update for a text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTextField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl PartialTextField {
    fn merge_into(&self, field: &mut TextField) {
        if let Some(ref t) = self.text {
            field.text.clone_from(t);
        }
        if let Some(x) = self.x {
            field.x = x;
        }
        if let Some(y) = self.y {
            field.y = y;
        }
        if let Some(w) = self.width {
            field.width = w;
        }
        if let Some(ref f) = self.font_family {
            field.style.font_family.clone_from(f);
        }
        if let Some(s) = self.font_size {
            field.style.font_size = s;
        }
        if let Some(ref c) = self.color {
            field.style.color.clone_from(c);
        }
        if let Some(b) = self.bold {
            field.style.bold = b;
        }
        if let Some(i) = self.italic {
            field.style.italic = i;
        }
        if let Some(u) = self.underline {
            field.style.underline = u;
        }
        if let Some(a) = self.align {
            field.style.align = a;
        }
    }
}

/// Position and size of a background image. `Auto` sizes fill the card.
/// Unlike every other target, it may leave the card bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: Size,
    pub height: Size,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, width: Size::Auto, height: Size::Auto }
    }
}

pub const DEFAULT_FONT: &str = "Inter, sans-serif";

pub const DEFAULT_BACKGROUND: &str =
    "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?auto=format&fit=crop&w=1000&q=80";

/// Everything on the card apart from the element collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Canonical format key.
    pub format: String,
    pub headline: TextField,
    pub description: TextField,
    /// Raw background value: color, gradient or image URL.
    pub background: String,
    pub background_placement: ImagePlacement,
    /// 0–1 opacity of the black overlay.
    pub overlay_opacity: f64,
    /// CSS filter applied to the composed card.
    pub filter: String,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.into(),
            headline: TextField::headline(),
            description: TextField::description(),
            background: DEFAULT_BACKGROUND.into(),
            background_placement: ImagePlacement::default(),
            overlay_opacity: 0.2,
            filter: "none".into(),
        }
    }
}

impl Card {
    #[must_use]
    pub fn text(&self, slot: TextSlot) -> &TextField {
        match slot {
            TextSlot::Headline => &self.headline,
            TextSlot::Description => &self.description,
        }
    }

    pub fn text_mut(&mut self, slot: TextSlot) -> &mut TextField {
        match slot {
            TextSlot::Headline => &mut self.headline,
            TextSlot::Description => &mut self.description,
        }
    }

    /// Merge a partial update into a text field. Returns `true` if anything changed.
    pub fn apply_text(&mut self, slot: TextSlot, partial: &PartialTextField) -> bool {
        let field = self.text_mut(slot);
        let before = field.clone();
        partial.merge_into(field);
        *field != before
    }

    /// The resolved output format.
    #[must_use]
    pub fn format(&self) -> &'static Format {
        format::lookup(&self.format)
    }

    /// Switch format; unknown keys resolve to the default format.
    pub fn set_format(&mut self, key: &str) {
        self.format = format::lookup(key).key.to_owned();
    }

    /// Card size in pixels at zoom 1.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        let f = self.format();
        (f.width, f.height)
    }

    #[must_use]
    pub fn background_kind(&self) -> Background {
        Background::classify(&self.background)
    }

    /// Replace the background value. Image placement is kept so a cropped
    /// image stays cropped when swapped.
    pub fn set_background(&mut self, value: &str) {
        self.background = value.trim().to_owned();
    }

    pub fn set_overlay_opacity(&mut self, opacity: f64) {
        self.overlay_opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 0.0 };
    }

    /// Set the CSS filter; blank means none.
    pub fn set_filter(&mut self, filter: &str) {
        let f = filter.trim();
        self.filter = if f.is_empty() { "none".into() } else { f.to_owned() };
    }
}
