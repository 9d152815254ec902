//! PNG export of the composed card.
//!
//! The card is redrawn without selection UI into a detached canvas at
//! [`EXPORT_SCALE`] times its size and handed to the browser as a download.
//! Images still loading at that moment are left out of the export.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::card::Card;
use crate::consts::EXPORT_SCALE;
use crate::doc::DocStore;
use crate::images::ImageCache;
use crate::input::SelectionTarget;
use crate::render::{self, View};

/// Pixel size of an exported card.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn export_size(card: &Card) -> (u32, u32) {
    let (w, h) = card.size();
    ((w * EXPORT_SCALE).round() as u32, (h * EXPORT_SCALE).round() as u32)
}

/// Render `card` offscreen and download it as `file_name`.
///
/// # Errors
///
/// Returns `Err` when there is no document, the offscreen canvas cannot be
/// created, or reading it back fails because a cross-origin image tainted it.
pub fn export_png(doc: &DocStore, card: &Card, images: &mut ImageCache, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document to export from"))?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    let (px_w, px_h) = export_size(card);
    canvas.set_width(px_w);
    canvas.set_height(px_h);
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("export canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let view = View { scale: EXPORT_SCALE, zoom: 1.0 };
    render::draw(&ctx, doc, card, SelectionTarget::None, images, view)?;
    let data_url = canvas.to_data_url_with_type("image/png")?;

    let link = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    link.set_download(file_name);
    link.set_href(&data_url);
    link.click();
    Ok(())
}
