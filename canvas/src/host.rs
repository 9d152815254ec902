//! JavaScript-facing bridge around [`Engine`].
//!
//! The page creates one [`EditorHost`] per mounted canvas and hands it a
//! callback. The host wires DOM input to the engine, carries out the side
//! effects the engine asks for (redraw, window pointer capture, cursor) and
//! forwards every action batch to the callback as a JSON array so the page's
//! panels stay in sync. Structured arguments cross the boundary as JSON
//! strings.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use serde::de::DeserializeOwned;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

use crate::camera::Point;
use crate::capture::WindowCapture;
use crate::card::{PartialTextField, TextSlot};
use crate::doc::{AddPayload, ElementId, ElementKind, PartialElement};
use crate::engine::{Action, Engine};
use crate::format;
use crate::input::{Button, Key, Modifiers, SelectionTarget};
use crate::suggest::{self, Template};

/// Failure to read an argument passed from JavaScript.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid element id: {0}")]
    Id(String),
    #[error(transparent)]
    Suggestion(#[from] suggest::SuggestionError),
}

impl From<HostError> for JsValue {
    fn from(e: HostError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Decode a JSON argument.
///
/// # Errors
///
/// Returns [`HostError::Json`] naming `what` when `json` doesn't decode.
pub fn parse_json<T: DeserializeOwned>(what: &'static str, json: &str) -> Result<T, HostError> {
    serde_json::from_str(json).map_err(|source| HostError::Json { what, source })
}

/// Decode a bare enum name such as `"sticky"` or `"headline"`.
///
/// # Errors
///
/// Returns [`HostError::Json`] for unknown names.
pub fn parse_name<T: DeserializeOwned>(what: &'static str, name: &str) -> Result<T, HostError> {
    serde_json::from_value(serde_json::Value::String(name.to_owned())).map_err(|source| HostError::Json { what, source })
}

/// # Errors
///
/// Returns [`HostError::Id`] when `id` is not a UUID.
pub fn parse_id(id: &str) -> Result<ElementId, HostError> {
    ElementId::parse_str(id.trim()).map_err(|_| HostError::Id(id.to_owned()))
}

/// Keys the canvas consumes instead of the browser.
#[must_use]
pub fn should_prevent_default_key(key: &str) -> bool {
    matches!(key, "Delete" | "Backspace" | "Escape")
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            log::debug!("console logger already set: {e}");
        }
    });
}

type CanvasListener = Closure<dyn FnMut(Event)>;

struct HostInner {
    engine: RefCell<Engine>,
    canvas: HtmlCanvasElement,
    on_change: js_sys::Function,
    capture: RefCell<Option<WindowCapture>>,
    /// A capture ended from inside one of its own handlers; dropped on the next gesture.
    retired: RefCell<Option<WindowCapture>>,
    listeners: RefCell<Vec<(&'static str, CanvasListener)>>,
    _image_ready: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
pub struct EditorHost {
    inner: Rc<HostInner>,
}

#[wasm_bindgen]
impl EditorHost {
    /// Bind to `canvas`. `on_change` receives a JSON array of actions after
    /// every state change.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, on_change: js_sys::Function) -> Result<EditorHost, JsValue> {
        init_logging();

        let slot: Rc<RefCell<Weak<HostInner>>> = Rc::new(RefCell::new(Weak::new()));
        let slot_for_cb = Rc::clone(&slot);
        let image_ready = Closure::wrap(Box::new(move || {
            if let Some(inner) = slot_for_cb.borrow().upgrade() {
                render(&inner);
            }
        }) as Box<dyn FnMut()>);
        let ready_fn: js_sys::Function = image_ready.as_ref().unchecked_ref::<js_sys::Function>().clone();

        let engine = Engine::new(canvas.clone(), ready_fn)?;
        let inner = Rc::new(HostInner {
            engine: RefCell::new(engine),
            canvas,
            on_change,
            capture: RefCell::new(None),
            retired: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            _image_ready: image_ready,
        });
        *slot.borrow_mut() = Rc::downgrade(&inner);

        attach_canvas_listeners(&inner)?;
        render(&inner);
        log::info!("editor mounted");
        Ok(EditorHost { inner })
    }

    // --- Elements ---

    /// Add an element of `kind` (`"text"`, `"sticky"`, ...). Returns its id.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&self, kind: &str, payload: &str) -> Result<String, JsValue> {
        let kind: ElementKind = parse_name("element kind", kind)?;
        let payload: AddPayload = if payload.trim().is_empty() {
            AddPayload::default()
        } else {
            parse_json("element payload", payload)?
        };
        let (id, actions) = self.inner.engine.borrow_mut().core.add_element(kind, &payload);
        dispatch(&self.inner, actions);
        Ok(id.to_string())
    }

    #[wasm_bindgen(js_name = updateElement)]
    pub fn update_element(&self, id: &str, fields: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        let fields: PartialElement = parse_json("element fields", fields)?;
        let actions = self.inner.engine.borrow_mut().core.update_element(&id, &fields);
        dispatch(&self.inner, actions);
        Ok(())
    }

    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&self, id: &str, text: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        let actions = self.inner.engine.borrow_mut().core.set_content(&id, text);
        dispatch(&self.inner, actions);
        Ok(())
    }

    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&self, id: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        let actions = self.inner.engine.borrow_mut().core.delete_element(&id);
        dispatch(&self.inner, actions);
        Ok(())
    }

    /// Duplicate an element. Returns the copy's id, or `undefined` for unknown ids.
    #[wasm_bindgen(js_name = duplicateElement)]
    pub fn duplicate_element(&self, id: &str) -> Result<Option<String>, JsValue> {
        let id = parse_id(id)?;
        let (new_id, actions) = self.inner.engine.borrow_mut().core.duplicate_element(&id);
        dispatch(&self.inner, actions);
        Ok(new_id.map(|id| id.to_string()))
    }

    /// Select a target given as `{"kind":"element","id":"..."}`, `{"kind":"headline"}`, etc.
    pub fn select(&self, target: &str) -> Result<(), JsValue> {
        let target: SelectionTarget = parse_json("selection target", target)?;
        let actions = self.inner.engine.borrow_mut().core.select(target);
        dispatch(&self.inner, actions);
        Ok(())
    }

    pub fn toolbar(&self) -> String {
        let toolbar = self.inner.engine.borrow().core.toolbar();
        serde_json::to_value(toolbar)
            .map(|v| v.as_str().unwrap_or_default().to_owned())
            .unwrap_or_default()
    }

    // --- Card ---

    #[wasm_bindgen(js_name = updateTextField)]
    pub fn update_text_field(&self, slot: &str, fields: &str) -> Result<(), JsValue> {
        let slot: TextSlot = parse_name("text slot", slot)?;
        let fields: PartialTextField = parse_json("text field", fields)?;
        let actions = self.inner.engine.borrow_mut().core.update_text_field(slot, &fields);
        dispatch(&self.inner, actions);
        Ok(())
    }

    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&self, value: &str) {
        let actions = self.inner.engine.borrow_mut().core.set_background(value);
        dispatch(&self.inner, actions);
    }

    #[wasm_bindgen(js_name = setOverlayOpacity)]
    pub fn set_overlay_opacity(&self, opacity: f64) {
        let actions = self.inner.engine.borrow_mut().core.set_overlay_opacity(opacity);
        dispatch(&self.inner, actions);
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&self, filter: &str) {
        let actions = self.inner.engine.borrow_mut().core.set_filter(filter);
        dispatch(&self.inner, actions);
    }

    #[wasm_bindgen(js_name = setFormat)]
    pub fn set_format(&self, key: &str) {
        let actions = self.inner.engine.borrow_mut().core.set_format(key);
        dispatch(&self.inner, actions);
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        let actions = self.inner.engine.borrow_mut().core.zoom_in();
        dispatch(&self.inner, actions);
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        let actions = self.inner.engine.borrow_mut().core.zoom_out();
        dispatch(&self.inner, actions);
    }

    /// Apply the suggestion service's raw text answer.
    #[wasm_bindgen(js_name = applySuggestion)]
    pub fn apply_suggestion(&self, answer: &str) -> Result<(), JsValue> {
        let suggestion = suggest::parse_suggestion(answer).map_err(HostError::from)?;
        let actions = self.inner.engine.borrow_mut().core.apply_suggestion(&suggestion);
        dispatch(&self.inner, actions);
        Ok(())
    }

    #[wasm_bindgen(js_name = applyTemplate)]
    pub fn apply_template(&self, template: &str) -> Result<(), JsValue> {
        let template: Template = parse_json("template", template)?;
        let actions = self.inner.engine.borrow_mut().core.apply_template(&template);
        dispatch(&self.inner, actions);
        Ok(())
    }

    // --- Output ---

    /// Download the card as a PNG. The cleared selection reaches `on_change`
    /// even when the export itself fails.
    pub fn export(&self) -> Result<(), JsValue> {
        let (actions, result) = self.inner.engine.borrow_mut().export();
        dispatch(&self.inner, actions);
        result
    }

    /// Elements, card, selection, toolbar and zoom as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let engine = self.inner.engine.borrow();
        serde_json::to_string(&engine.core.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setDevicePixelRatio)]
    pub fn set_device_pixel_ratio(&self, dpr: f64) {
        self.inner.engine.borrow_mut().set_device_pixel_ratio(dpr);
        render(&self.inner);
    }

    pub fn render(&self) {
        render(&self.inner);
    }

    /// Detach every DOM listener. The host is unusable afterwards.
    pub fn destroy(&self) {
        detach_canvas_listeners(&self.inner);
        self.inner.capture.borrow_mut().take();
        self.inner.retired.borrow_mut().take();
        log::info!("editor unmounted");
    }
}

/// Prompt sent to the suggestion service for a user request.
#[wasm_bindgen(js_name = suggestionPrompt)]
#[must_use]
pub fn suggestion_prompt(request: &str) -> String {
    suggest::card_prompt(request)
}

/// User request built from an Instagram URL or caption.
#[wasm_bindgen(js_name = instagramPrompt)]
#[must_use]
pub fn instagram_prompt(url_or_caption: &str) -> String {
    suggest::instagram_prompt(url_or_caption)
}

/// Picker contents (formats, filters, fonts, palettes, background presets) as JSON.
#[wasm_bindgen]
#[must_use]
pub fn catalog() -> String {
    let formats: Vec<serde_json::Value> = format::FORMATS
        .iter()
        .map(|f| serde_json::json!({ "key": f.key, "label": f.label, "width": f.width, "height": f.height }))
        .collect();
    let pairs = |list: &[(&str, &str)]| -> Vec<serde_json::Value> {
        list.iter()
            .map(|(label, value)| serde_json::json!({ "label": label, "value": value }))
            .collect()
    };
    serde_json::json!({
        "formats": formats,
        "filters": pairs(format::FILTERS),
        "fonts": pairs(format::FONTS),
        "lineColors": format::LINE_COLORS,
        "strokeWidths": format::STROKE_WIDTHS,
        "stickyColors": format::STICKY_COLORS,
        "drawPresets": pairs(format::DRAW_PRESETS),
        "backgrounds": format::BACKGROUND_PRESETS,
    })
    .to_string()
}

// =============================================================
// Action dispatch
// =============================================================

fn dispatch(inner: &Rc<HostInner>, actions: Vec<Action>) {
    if actions.is_empty() {
        return;
    }
    let mut needs_render = false;
    for action in &actions {
        match action {
            Action::RenderNeeded => needs_render = true,
            Action::CaptureStarted => start_capture(inner),
            Action::CaptureEnded => end_capture(inner),
            Action::SetCursor { cursor } => {
                if let Err(e) = inner.canvas.style().set_property("cursor", cursor) {
                    log::warn!("cursor not set: {e:?}");
                }
            }
            _ => {}
        }
    }
    if needs_render {
        render(inner);
    }
    notify(inner, &actions);
}

fn notify(inner: &HostInner, actions: &[Action]) {
    let json = match serde_json::to_string(actions) {
        Ok(json) => json,
        Err(e) => {
            log::error!("actions not serialized: {e}");
            return;
        }
    };
    if let Err(e) = inner.on_change.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        log::warn!("change callback failed: {e:?}");
    }
}

fn render(inner: &HostInner) {
    if let Err(e) = inner.engine.borrow_mut().render() {
        log::warn!("render failed: {e:?}");
    }
}

// =============================================================
// Pointer capture
// =============================================================

fn start_capture(inner: &Rc<HostInner>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    inner.retired.borrow_mut().take();
    end_capture(inner);

    let on_move = {
        let weak = Rc::downgrade(inner);
        Box::new(move |ev: PointerEvent| {
            if let Some(inner) = weak.upgrade() {
                pointer_move(&inner, &ev);
            }
        }) as Box<dyn FnMut(PointerEvent)>
    };
    let on_up = {
        let weak = Rc::downgrade(inner);
        Box::new(move |ev: PointerEvent| {
            if let Some(inner) = weak.upgrade() {
                let pt = local_point(&inner.canvas, &ev);
                let button = Button::from_dom(ev.button());
                let actions = inner.engine.borrow_mut().core.on_pointer_up(pt, button, modifiers(&ev));
                dispatch(&inner, actions);
            }
        }) as Box<dyn FnMut(PointerEvent)>
    };
    let on_cancel = {
        let weak = Rc::downgrade(inner);
        Box::new(move |_ev: PointerEvent| {
            if let Some(inner) = weak.upgrade() {
                let actions = inner.engine.borrow_mut().core.on_pointer_cancel();
                dispatch(&inner, actions);
            }
        }) as Box<dyn FnMut(PointerEvent)>
    };

    let capture = WindowCapture::attach(
        window,
        vec![("pointermove", on_move), ("pointerup", on_up), ("pointercancel", on_cancel)],
    );
    *inner.capture.borrow_mut() = Some(capture);
}

fn end_capture(inner: &HostInner) {
    let Some(mut capture) = inner.capture.borrow_mut().take() else {
        return;
    };
    capture.detach();
    *inner.retired.borrow_mut() = Some(capture);
}

fn pointer_move(inner: &Rc<HostInner>, ev: &PointerEvent) {
    let pt = local_point(&inner.canvas, ev);
    let actions = inner.engine.borrow_mut().core.on_pointer_move(pt, modifiers(ev));
    dispatch(inner, actions);
}

// =============================================================
// Canvas listeners
// =============================================================

fn attach_canvas_listeners(inner: &Rc<HostInner>) -> Result<(), JsValue> {
    inner.canvas.set_tab_index(0);

    let on_down = {
        let weak = Rc::downgrade(inner);
        Box::new(move |ev: Event| {
            let (Some(inner), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<PointerEvent>()) else {
                return;
            };
            ev.prevent_default();
            if let Err(e) = inner.canvas.focus() {
                log::debug!("canvas focus failed: {e:?}");
            }
            let pt = local_point(&inner.canvas, ev);
            let button = Button::from_dom(ev.button());
            let actions = inner.engine.borrow_mut().core.on_pointer_down(pt, button, modifiers(ev));
            dispatch(&inner, actions);
        }) as Box<dyn FnMut(Event)>
    };
    let on_hover = {
        let weak = Rc::downgrade(inner);
        Box::new(move |ev: Event| {
            let (Some(inner), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<PointerEvent>()) else {
                return;
            };
            // The window listener owns moves while a gesture is captured.
            if inner.capture.borrow().is_some() {
                return;
            }
            pointer_move(&inner, ev);
        }) as Box<dyn FnMut(Event)>
    };
    let on_key = {
        let weak = Rc::downgrade(inner);
        Box::new(move |ev: Event| {
            let (Some(inner), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<KeyboardEvent>()) else {
                return;
            };
            let key = ev.key();
            let mods = Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() };
            let actions = inner.engine.borrow_mut().core.on_key_down(&Key(key.clone()), mods);
            if !actions.is_empty() && should_prevent_default_key(&key) {
                ev.prevent_default();
            }
            dispatch(&inner, actions);
        }) as Box<dyn FnMut(Event)>
    };

    let mut listeners = inner.listeners.borrow_mut();
    for (event, handler) in [("pointerdown", on_down), ("pointermove", on_hover), ("keydown", on_key)] {
        let closure = Closure::wrap(handler);
        inner
            .canvas
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        listeners.push((event, closure));
    }
    Ok(())
}

fn detach_canvas_listeners(inner: &HostInner) {
    for (event, closure) in inner.listeners.borrow_mut().drain(..) {
        if let Err(e) = inner
            .canvas
            .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("canvas {event} listener not removed: {e:?}");
        }
    }
}

// =============================================================
// Event mapping
// =============================================================

/// Pointer position relative to the canvas's top-left corner, in CSS pixels.
fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top())
}

fn modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}
