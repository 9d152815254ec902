//! Output formats and the fixed pickers the editor offers: filters, fonts,
//! palettes and background presets.
//!
//! Format sizes are CSS pixels at zoom 1. Exports render at twice that size,
//! which lands on (or near) each platform's recommended resolution.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// An output size preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Format {
    pub key: &'static str,
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
}

/// Key used when none, or an unknown one, is given.
pub const DEFAULT_FORMAT: &str = "instagram-square";

pub const FORMATS: &[Format] = &[
    Format { key: "instagram-square", label: "Instagram Post (1:1)", width: 540.0, height: 540.0 },
    Format { key: "instagram-story", label: "Instagram Story (9:16)", width: 360.0, height: 640.0 },
    Format { key: "instagram-portrait", label: "Instagram Retrato (4:5)", width: 432.0, height: 540.0 },
    Format { key: "whatsapp-status", label: "WhatsApp Status", width: 360.0, height: 640.0 },
    Format { key: "facebook-post", label: "Facebook Post", width: 600.0, height: 315.0 },
    Format { key: "facebook-cover", label: "Facebook Capa", width: 820.0, height: 312.0 },
    Format { key: "youtube-thumbnail", label: "YouTube Thumbnail", width: 640.0, height: 360.0 },
    Format { key: "youtube-banner", label: "YouTube Banner", width: 1024.0, height: 169.0 },
    Format { key: "twitter-post", label: "Twitter Post", width: 600.0, height: 338.0 },
    Format { key: "twitter-header", label: "Twitter Header", width: 750.0, height: 250.0 },
    Format { key: "linkedin-post", label: "LinkedIn Post", width: 600.0, height: 314.0 },
    Format { key: "linkedin-banner", label: "LinkedIn Banner", width: 792.0, height: 198.0 },
    Format { key: "tiktok-video", label: "TikTok Vídeo", width: 360.0, height: 640.0 },
];

/// Resolve a format key, falling back to the square Instagram post.
#[must_use]
pub fn lookup(key: &str) -> &'static Format {
    FORMATS
        .iter()
        .find(|f| f.key == key)
        .unwrap_or(&FORMATS[0])
}

/// File name of an exported raster for `key`.
#[must_use]
pub fn export_file_name(key: &str) -> String {
    format!("card-{key}.png")
}

/// `(label, css filter)` pairs offered by the filter picker.
pub const FILTERS: &[(&str, &str)] = &[
    ("Normal", "none"),
    ("P&B", "grayscale(100%)"),
    ("Sépia", "sepia(100%)"),
    ("Vintage", "sepia(50%) contrast(120%)"),
    ("Desfoque", "blur(2px)"),
    ("Saturado", "saturate(200%)"),
    ("Frio", "hue-rotate(180deg)"),
    ("Invertido", "invert(100%)"),
    ("Brilhante", "brightness(150%)"),
    ("Escuro", "brightness(50%)"),
    ("Quente", "sepia(30%) saturate(140%)"),
    ("Contraste", "contrast(200%)"),
    ("Fade", "opacity(50%)"),
];

/// `(label, css font-family)` pairs offered by the font picker.
pub const FONTS: &[(&str, &str)] = &[
    ("Inter (Padrão)", "Inter, sans-serif"),
    ("Roboto", "Roboto, sans-serif"),
    ("Open Sans", "Open Sans, sans-serif"),
    ("Lato", "Lato, sans-serif"),
    ("Montserrat", "Montserrat, sans-serif"),
    ("Playfair Display (Serif)", "\"Playfair Display\", serif"),
    ("Merriweather (Serif)", "Merriweather, serif"),
    ("Arial", "Arial, sans-serif"),
    ("Georgia", "Georgia, serif"),
    ("Courier New", "\"Courier New\", monospace"),
    ("Comic Sans MS", "\"Comic Sans MS\", cursive"),
];

pub const LINE_COLORS: &[&str] = &["#000000", "#ffffff", "#ef4444", "#22c55e", "#3b82f6", "#eab308"];

pub const STROKE_WIDTHS: &[f64] = &[2.0, 4.0, 8.0, 12.0];

pub const STICKY_COLORS: &[&str] = &["#fef3c7", "#bfdbfe", "#bbf7d0", "#fbcfe8"];

/// `(name, color)` freehand presets.
pub const DRAW_PRESETS: &[(&str, &str)] = &[("pen", "#000000"), ("marker", "#ef4444")];

pub const BACKGROUND_PRESETS: &[&str] = &[
    "https://images.unsplash.com/photo-1557683316-973673baf926?auto=format&fit=crop&w=500&q=80",
    "https://images.unsplash.com/photo-1579546929518-9e396f3cc809?auto=format&fit=crop&w=500&q=80",
    "https://images.unsplash.com/photo-1550684848-fac1c5b4e853?auto=format&fit=crop&w=500&q=80",
    "https://images.unsplash.com/photo-1557682250-33bd709cbe85?auto=format&fit=crop&w=500&q=80",
    "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    "linear-gradient(135deg, #6B73FF 0%, #000DFF 100%)",
    "linear-gradient(45deg, #FF9A9E 0%, #FECFEF 99%, #FECFEF 100%)",
    "linear-gradient(to top, #cfd9df 0%, #e2ebf0 100%)",
];
