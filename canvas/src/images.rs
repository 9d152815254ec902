//! Decoded images keyed by source URL.
//!
//! The renderer asks for an image every frame. The first request starts the
//! download and reports [`ImageStatus::Loading`]; the host's callback fires
//! when the browser finishes (or fails) so it can schedule another frame.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

/// Load state of a cached image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Broken,
}

/// Load state derived from an image element's `complete` flag and natural width.
#[must_use]
pub fn status_of(complete: bool, natural_width: u32) -> LoadState {
    match (complete, natural_width) {
        (false, _) => LoadState::Loading,
        (true, 0) => LoadState::Broken,
        (true, _) => LoadState::Ready,
    }
}

/// What the renderer can draw for a source right now.
pub enum ImageStatus<'a> {
    Loading,
    Ready(&'a HtmlImageElement),
    Broken,
}

pub struct ImageCache {
    entries: HashMap<String, HtmlImageElement>,
    on_ready: js_sys::Function,
}

impl ImageCache {
    #[must_use]
    pub fn new(on_ready: js_sys::Function) -> Self {
        Self { entries: HashMap::new(), on_ready }
    }

    /// Look up `src`, starting its download on first use.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    pub fn get(&mut self, src: &str) -> Result<ImageStatus<'_>, JsValue> {
        if src.is_empty() {
            return Ok(ImageStatus::Broken);
        }
        if !self.entries.contains_key(src) {
            let img = HtmlImageElement::new()?;
            // Anonymous CORS keeps exports from tainting the canvas when the
            // host serves the right headers.
            if !src.starts_with("data:") && !src.starts_with("blob:") {
                img.set_cross_origin(Some("anonymous"));
            }
            img.set_onload(Some(&self.on_ready));
            img.set_onerror(Some(&self.on_ready));
            img.set_src(src);
            log::debug!("loading image {src}");
            self.entries.insert(src.to_owned(), img);
        }
        let Some(img) = self.entries.get(src) else {
            return Ok(ImageStatus::Loading);
        };
        Ok(match status_of(img.complete(), img.natural_width()) {
            LoadState::Loading => ImageStatus::Loading,
            LoadState::Ready => ImageStatus::Ready(img),
            LoadState::Broken => ImageStatus::Broken,
        })
    }

    /// Drop images no longer referenced by `in_use`, detaching their callbacks.
    pub fn retain_only<'a>(&mut self, in_use: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = in_use.into_iter().collect();
        self.entries.retain(|src, img| {
            let used = keep.contains(src.as_str());
            if !used {
                img.set_onload(None);
                img.set_onerror(None);
            }
            used
        });
    }
}
