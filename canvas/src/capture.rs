//! Window-level pointer listeners held for the length of one gesture.
//!
//! Once a drag, resize, stroke or control-point drag starts, moves and the
//! release must keep arriving even when the pointer leaves the canvas.
//! Listeners are attached to the window and removed when the capture is
//! detached or dropped.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{PointerEvent, Window};

type PointerListener = Closure<dyn FnMut(PointerEvent)>;

pub struct WindowCapture {
    window: Window,
    listeners: Vec<(&'static str, PointerListener)>,
    attached: bool,
}

impl WindowCapture {
    /// Attach one listener per `(event type, handler)` pair. Listeners the
    /// window refuses are logged and skipped.
    #[must_use]
    pub fn attach(window: Window, handlers: Vec<(&'static str, Box<dyn FnMut(PointerEvent)>)>) -> Self {
        let mut listeners = Vec::with_capacity(handlers.len());
        for (event, handler) in handlers {
            let closure = Closure::wrap(handler);
            if let Err(e) = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
                log::warn!("window {event} listener not attached: {e:?}");
                continue;
            }
            listeners.push((event, closure));
        }
        Self { window, listeners, attached: true }
    }

    /// Remove the listeners. The closures stay alive until drop so a handler
    /// may end its own capture.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        for (event, closure) in &self.listeners {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("window {event} listener not removed: {e:?}");
            }
        }
    }
}

impl Drop for WindowCapture {
    fn drop(&mut self) {
        self.detach();
    }
}
