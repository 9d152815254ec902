use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::card::{Card, ImagePlacement, PartialTextField, TextSlot};
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{AddPayload, CanvasElement, DocStore, ElementId, ElementKind, PartialElement, Size};
use crate::export;
use crate::geometry::{self, Rect};
use crate::hit::{self, Hit, HitPart};
use crate::images::ImageCache;
use crate::input::{Button, InputState, Key, Modifiers, SelectionTarget, Toolbar, UiState};
use crate::layout::{self, EstimatedMeasure, TextMeasure};
use crate::path;
use crate::render::{self, ContextMeasure, View};
use crate::suggest::{AiSuggestion, Template};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    ElementCreated { element: CanvasElement },
    ElementUpdated { id: ElementId, fields: PartialElement },
    ElementDeleted { id: ElementId },
    TextFieldUpdated { slot: TextSlot, fields: PartialTextField },
    BackgroundChanged { background: String, placement: ImagePlacement },
    OverlayChanged { opacity: f64 },
    FilterChanged { filter: String },
    FormatChanged { format: String, width: f64, height: f64 },
    ZoomChanged { zoom: f64 },
    SelectionChanged { target: SelectionTarget, toolbar: Toolbar },
    /// The host should open an in-place editor for a sticky or text element.
    EditTextRequested { id: ElementId, text: String },
    SetCursor { cursor: String },
    /// Window-level pointer listeners are needed until `CaptureEnded`.
    CaptureStarted,
    CaptureEnded,
    Exported { file_name: String },
    RenderNeeded,
}

/// Everything the host needs to rebuild its panels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub elements: &'a [CanvasElement],
    pub card: &'a Card,
    pub selection: SelectionTarget,
    pub toolbar: Toolbar,
    pub zoom: f64,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub card: Card,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    measure: Box<dyn TextMeasure>,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: DocStore::new(),
            card: Card::default(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            measure: Box::new(EstimatedMeasure),
            cursor: "default",
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text measurer used for layout and hit-testing.
    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    // --- Element model ---

    /// Add an element with per-kind defaults on top of the stack.
    pub fn add_element(&mut self, kind: ElementKind, payload: &AddPayload) -> (ElementId, Vec<Action>) {
        let id = self.doc.add(kind, payload);
        log::debug!("added {kind:?} element {id}");
        let actions = self.created_actions(&id);
        (id, actions)
    }

    /// Merge `fields` into an element. Empty updates and unknown ids do nothing.
    pub fn update_element(&mut self, id: &ElementId, fields: &PartialElement) -> Vec<Action> {
        if fields.is_empty() || !self.doc.apply_partial(id, fields) {
            return Vec::new();
        }
        vec![Action::ElementUpdated { id: *id, fields: fields.clone() }, Action::RenderNeeded]
    }

    /// Replace the text of a sticky or text element.
    pub fn set_content(&mut self, id: &ElementId, text: &str) -> Vec<Action> {
        let fields = PartialElement { content: Some(text.to_owned()), ..Default::default() };
        self.update_element(id, &fields)
    }

    /// Remove an element. Unknown ids do nothing.
    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if self.input.target() == SelectionTarget::Element(*id) {
            actions.extend(self.end_gesture());
        }
        if self.ui.selection == SelectionTarget::Element(*id) {
            actions.extend(self.select(SelectionTarget::None));
        }
        actions.retain(|a| *a != Action::RenderNeeded);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Copy an element, offset and on top. Unknown ids do nothing.
    pub fn duplicate_element(&mut self, id: &ElementId) -> (Option<ElementId>, Vec<Action>) {
        match self.doc.duplicate(id) {
            Some(new_id) => {
                let actions = self.created_actions(&new_id);
                (Some(new_id), actions)
            }
            None => (None, Vec::new()),
        }
    }

    fn created_actions(&self, id: &ElementId) -> Vec<Action> {
        self.doc
            .get(id)
            .map(|el| vec![Action::ElementCreated { element: el.clone() }, Action::RenderNeeded])
            .unwrap_or_default()
    }

    // --- Selection ---

    /// Make `target` the only selection. Targets that don't exist select nothing.
    pub fn select(&mut self, target: SelectionTarget) -> Vec<Action> {
        let target = match target {
            SelectionTarget::Element(id) if self.doc.get(&id).is_none() => SelectionTarget::None,
            SelectionTarget::Background if !self.card.background_kind().is_image() => SelectionTarget::None,
            t => t,
        };
        if target == self.ui.selection {
            return Vec::new();
        }
        self.ui.selection = target;
        vec![Action::SelectionChanged { target, toolbar: self.toolbar() }, Action::RenderNeeded]
    }

    /// Contextual toolbar for the current selection.
    #[must_use]
    pub fn toolbar(&self) -> Toolbar {
        match self.ui.selection {
            SelectionTarget::Headline | SelectionTarget::Description => Toolbar::Text,
            SelectionTarget::Element(id) => match self.doc.get(&id).map(|el| el.kind) {
                Some(ElementKind::Line | ElementKind::Draw) => Toolbar::Line,
                _ => Toolbar::None,
            },
            SelectionTarget::None | SelectionTarget::Background => Toolbar::None,
        }
    }

    // --- Card ---

    pub fn update_text_field(&mut self, slot: TextSlot, fields: &PartialTextField) -> Vec<Action> {
        if !self.card.apply_text(slot, fields) {
            return Vec::new();
        }
        vec![Action::TextFieldUpdated { slot, fields: fields.clone() }, Action::RenderNeeded]
    }

    /// Swap the background. A selected background image is deselected when
    /// the new value is not an image.
    pub fn set_background(&mut self, value: &str) -> Vec<Action> {
        self.card.set_background(value);
        let mut actions = vec![self.background_changed()];
        if self.ui.selection == SelectionTarget::Background && !self.card.background_kind().is_image() {
            actions.extend(self.select(SelectionTarget::None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn background_changed(&self) -> Action {
        Action::BackgroundChanged {
            background: self.card.background.clone(),
            placement: self.card.background_placement,
        }
    }

    pub fn set_overlay_opacity(&mut self, opacity: f64) -> Vec<Action> {
        self.card.set_overlay_opacity(opacity);
        vec![Action::OverlayChanged { opacity: self.card.overlay_opacity }, Action::RenderNeeded]
    }

    pub fn set_filter(&mut self, filter: &str) -> Vec<Action> {
        self.card.set_filter(filter);
        vec![Action::FilterChanged { filter: self.card.filter.clone() }, Action::RenderNeeded]
    }

    /// Switch the output format. Unknown keys fall back to the default.
    pub fn set_format(&mut self, key: &str) -> Vec<Action> {
        self.card.set_format(key);
        let (width, height) = self.card.size();
        vec![Action::FormatChanged { format: self.card.format.clone(), width, height }, Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let changed = self.camera.zoom_in();
        self.zoom_actions(changed)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let changed = self.camera.zoom_out();
        self.zoom_actions(changed)
    }

    fn zoom_actions(&self, changed: bool) -> Vec<Action> {
        if !changed {
            return Vec::new();
        }
        vec![Action::ZoomChanged { zoom: self.camera.zoom }, Action::RenderNeeded]
    }

    /// Apply AI-generated content. Absent optional fields leave state as is.
    pub fn apply_suggestion(&mut self, s: &AiSuggestion) -> Vec<Action> {
        let mut actions = Vec::new();
        let fields = [
            (TextSlot::Headline, &s.headline, &s.headline_color),
            (TextSlot::Description, &s.description, &s.description_color),
        ];
        for (slot, text, color) in fields {
            let partial = PartialTextField {
                text: Some(text.clone()),
                color: Some(color.clone()),
                font_family: s.font_family.clone(),
                ..Default::default()
            };
            actions.extend(self.update_text_field(slot, &partial));
        }
        if let Some(bg) = s.background_color.as_deref().filter(|v| !v.trim().is_empty()) {
            actions.extend(self.set_background(bg));
        }
        actions.retain(|a| *a != Action::RenderNeeded);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Apply a gallery template: format and optional background only.
    pub fn apply_template(&mut self, template: &Template) -> Vec<Action> {
        let mut actions = self.set_format(&template.format);
        if let Some(url) = template.image_url.as_deref().filter(|v| !v.trim().is_empty()) {
            actions.extend(self.set_background(url));
        }
        actions.retain(|a| *a != Action::RenderNeeded);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Prepare an export: end any gesture and clear the selection so no
    /// selection UI reaches the image. Returns the file name to save as.
    pub fn begin_export(&mut self) -> (String, Vec<Action>) {
        let mut actions = self.end_gesture();
        actions.extend(self.select(SelectionTarget::None));
        actions.retain(|a| *a != Action::RenderNeeded);
        actions.push(Action::RenderNeeded);
        (crate::format::export_file_name(&self.card.format), actions)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let pt = self.camera.screen_to_card(screen_pt);
        let Some(Hit { target, part }) = self.hit_at(pt) else {
            let mut actions = self.end_gesture();
            actions.extend(self.select(SelectionTarget::None));
            return actions;
        };

        match part {
            HitPart::ControlPoint => {
                let Some(id) = target.element_id() else {
                    return Vec::new();
                };
                self.input = InputState::DraggingControlPoint { id, last: pt };
                self.capture_started("move")
            }
            HitPart::ResizeHandle(anchor) => {
                let Some(orig) = self.target_rect(target) else {
                    return Vec::new();
                };
                self.input = InputState::Resizing { target, anchor, start: pt, orig };
                self.capture_started(anchor.cursor())
            }
            HitPart::Body => self.body_down(target, pt),
        }
    }

    fn body_down(&mut self, target: SelectionTarget, pt: Point) -> Vec<Action> {
        let was_selected = self.ui.selection == target;
        let mut actions = self.select(target);

        if let Some(el) = target.element_id().and_then(|id| self.doc.get(&id)) {
            let id = el.id;
            match el.kind {
                ElementKind::Draw => {
                    let local = Point::new(pt.x - el.x, pt.y - el.y);
                    let path = path::begin_stroke(el.path.as_deref().unwrap_or_default(), local);
                    self.input = InputState::Drawing { id };
                    actions.extend(self.update_element(&id, &PartialElement { path: Some(path), ..Default::default() }));
                    actions.extend(self.capture_started("crosshair"));
                    return actions;
                }
                ElementKind::Sticky | ElementKind::Text if was_selected => {
                    let text = el.content.clone().unwrap_or_default();
                    actions.push(Action::EditTextRequested { id, text });
                    return actions;
                }
                _ if el.locked => return actions,
                _ => {}
            }
        }

        let Some(orig) = self.target_rect(target) else {
            return actions;
        };
        self.input = InputState::Dragging { target, start: pt, orig };
        actions.extend(self.capture_started("move"));
        actions
    }

    fn capture_started(&mut self, cursor: &'static str) -> Vec<Action> {
        let mut actions = vec![Action::CaptureStarted];
        actions.extend(self.set_cursor(cursor));
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let pt = self.camera.screen_to_card(screen_pt);
        match self.input {
            InputState::Idle => {
                let cursor = self.hover_cursor(pt);
                self.set_cursor(cursor)
            }
            InputState::Dragging { target, start, orig } => {
                let bounds = layout::target_bounds(target, &self.card);
                let rect = geometry::drag_rect(orig, pt.sub(start), bounds);
                self.apply_target_rect(target, rect, false)
            }
            InputState::Resizing { target, anchor, start, orig } => {
                let mut delta = pt.sub(start);
                if target.text_slot().is_some() {
                    delta.y = 0.0;
                }
                let bounds = layout::target_bounds(target, &self.card);
                let rect = geometry::resize_rect(orig, anchor, delta, bounds, MIN_ELEMENT_SIZE);
                self.apply_target_rect(target, rect, true)
            }
            InputState::Drawing { id } => self.extend_stroke(&id, pt),
            InputState::DraggingControlPoint { id, last } => {
                let Some(el) = self.doc.get(&id) else {
                    return self.end_gesture();
                };
                let (cx, cy) = geometry::control_point_drag(el.control_point(), pt.sub(last), el.width, el.height);
                self.input = InputState::DraggingControlPoint { id, last: pt };
                let fields = PartialElement { control_x: Some(cx), control_y: Some(cy), ..Default::default() };
                self.update_element(&id, &fields)
            }
        }
    }

    fn extend_stroke(&mut self, id: &ElementId, pt: Point) -> Vec<Action> {
        let Some(el) = self.doc.get(id) else {
            return self.end_gesture();
        };
        let (w, h) = self.card.size();
        let clamped = Point::new(pt.x.clamp(0.0, w), pt.y.clamp(0.0, h));
        let mut path = el.path.clone().unwrap_or_default();
        path::extend_stroke(&mut path, Point::new(clamped.x - el.x, clamped.y - el.y));
        self.update_element(id, &PartialElement { path: Some(path), ..Default::default() })
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture()
    }

    /// Pointer capture was lost (e.g. `pointercancel`).
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        let prev = std::mem::take(&mut self.input);
        if !prev.is_active() {
            return Vec::new();
        }
        let mut actions = vec![Action::CaptureEnded];
        actions.extend(self.set_cursor("default"));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => match self.ui.selection.element_id() {
                Some(id) => self.delete_element(&id),
                None => Vec::new(),
            },
            "Escape" => {
                let mut actions = self.end_gesture();
                actions.extend(self.select(SelectionTarget::None));
                actions
            }
            _ => Vec::new(),
        }
    }

    // --- Helpers ---

    fn hit_at(&self, pt: Point) -> Option<Hit> {
        hit::hit_test(pt, &self.doc, &self.card, self.measure.as_ref(), &self.camera, self.ui.selection)
    }

    fn hover_cursor(&self, pt: Point) -> &'static str {
        match self.hit_at(pt) {
            None => "default",
            Some(Hit { part: HitPart::ResizeHandle(anchor), .. }) => anchor.cursor(),
            Some(Hit { part: HitPart::ControlPoint, .. }) => "move",
            Some(Hit { target, .. }) => match target.element_id().and_then(|id| self.doc.get(&id)) {
                Some(el) if el.kind == ElementKind::Draw => "crosshair",
                Some(el) if el.locked => "default",
                _ => "move",
            },
        }
    }

    fn set_cursor(&mut self, cursor: &'static str) -> Vec<Action> {
        if self.cursor == cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor { cursor: cursor.to_owned() }]
    }

    fn target_rect(&self, target: SelectionTarget) -> Option<Rect> {
        layout::target_rect(target, &self.doc, &self.card, self.measure.as_ref())
    }

    /// Write a transformed box back to the target it came from. Resizes
    /// resolve automatic sizes to pixels.
    fn apply_target_rect(&mut self, target: SelectionTarget, rect: Rect, resized: bool) -> Vec<Action> {
        match target {
            SelectionTarget::None => Vec::new(),
            SelectionTarget::Element(id) => {
                let mut fields = PartialElement { x: Some(rect.x), y: Some(rect.y), ..Default::default() };
                if resized {
                    fields.width = Some(Size::Px(rect.width));
                    fields.height = Some(Size::Px(rect.height));
                }
                self.update_element(&id, &fields)
            }
            SelectionTarget::Headline | SelectionTarget::Description => {
                let Some(slot) = target.text_slot() else {
                    return Vec::new();
                };
                let mut fields = PartialTextField { x: Some(rect.x), y: Some(rect.y), ..Default::default() };
                if resized {
                    fields.width = Some(Size::Px(rect.width));
                }
                self.update_text_field(slot, &fields)
            }
            SelectionTarget::Background => {
                let placement = &mut self.card.background_placement;
                placement.x = rect.x;
                placement.y = rect.y;
                if resized {
                    placement.width = Size::Px(rect.width);
                    placement.height = Size::Px(rect.height);
                }
                vec![self.background_changed(), Action::RenderNeeded]
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> SelectionTarget {
        self.ui.selection
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            elements: self.doc.elements(),
            card: &self.card,
            selection: self.ui.selection,
            toolbar: self.toolbar(),
            zoom: self.camera.zoom,
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: ImageCache,
    pub core: EngineCore,
    dpr: f64,
}

impl Engine {
    /// Bind to `canvas`. `on_image_ready` is called whenever an image the
    /// scene uses finishes loading, so the host can schedule a redraw.
    ///
    /// # Errors
    ///
    /// Fails if the canvas cannot provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement, on_image_ready: js_sys::Function) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut core = EngineCore::new();
        core.set_measure(Box::new(ContextMeasure::new(ctx.clone())));
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        Ok(Self { canvas, ctx, images: ImageCache::new(on_image_ready), core, dpr })
    }

    // --- Viewport ---

    /// Update the device pixel ratio, e.g. after moving between screens.
    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        if dpr.is_finite() && dpr > 0.0 {
            self.dpr = dpr;
        }
    }

    /// Size the backing store and CSS box to the card at the current zoom.
    fn fit_canvas(&self) -> Result<(), JsValue> {
        let (w, h) = self.core.card.size();
        let zoom = self.core.camera.zoom;
        let css_w = w * zoom;
        let css_h = h * zoom;
        let px_w = px_len(css_w * self.dpr);
        let px_h = px_len(css_h * self.dpr);
        if self.canvas.width() != px_w {
            self.canvas.set_width(px_w);
        }
        if self.canvas.height() != px_h {
            self.canvas.set_height(px_h);
        }
        let style = self.canvas.style();
        style.set_property("width", &format!("{css_w}px"))?;
        style.set_property("height", &format!("{css_h}px"))?;
        Ok(())
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.fit_canvas()?;
        let view = View { scale: self.core.camera.zoom * self.dpr, zoom: self.core.camera.zoom };
        render::draw(&self.ctx, &self.core.doc, &self.core.card, self.core.ui.selection, &mut self.images, view)?;
        self.images
            .retain_only(render::image_sources(&self.core.doc, &self.core.card));
        Ok(())
    }

    /// Download the card as a PNG at twice its size. Does nothing while the
    /// canvas is not attached to a document.
    ///
    /// The returned actions are valid whether or not the export succeeded:
    /// the selection and any gesture are cleared before the capture starts.
    /// The result is `Err` if the offscreen canvas cannot be created or read
    /// back (a cross-origin image without CORS headers taints it).
    pub fn export(&mut self) -> (Vec<Action>, Result<(), JsValue>) {
        if !self.canvas.is_connected() {
            log::debug!("export skipped: canvas not mounted");
            return (Vec::new(), Ok(()));
        }
        let (file_name, mut actions) = self.core.begin_export();
        if let Err(e) = export::export_png(&self.core.doc, &self.core.card, &mut self.images, &file_name) {
            log::warn!("export of {file_name} failed: {e:?}");
            return (actions, Err(e));
        }
        log::info!("exported {file_name}");
        actions.push(Action::Exported { file_name });
        (actions, Ok(()))
    }

    /// The canvas element this engine draws into.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

/// Whole backing-store pixels for a CSS length.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px_len(v: f64) -> u32 {
    v.round().max(1.0) as u32
}
