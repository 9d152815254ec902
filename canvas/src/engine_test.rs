#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::ZOOM_MAX;
use crate::doc::ShapeType;
use crate::hit::ResizeAnchor;

// =============================================================
// Helpers
// =============================================================

/// Core with a flat background so misses select nothing.
fn core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_background("#1f2937");
    core
}

fn add(core: &mut EngineCore, kind: ElementKind) -> ElementId {
    core.add_element(kind, &AddPayload::default()).0
}

fn add_with(core: &mut EngineCore, kind: ElementKind, payload: AddPayload) -> ElementId {
    core.add_element(kind, &payload).0
}

fn move_to(core: &mut EngineCore, id: &ElementId, x: f64, y: f64) {
    core.update_element(id, &PartialElement { x: Some(x), y: Some(y), ..Default::default() });
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, no_modifiers())
}

fn drag(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_move(pt(x, y), no_modifiers())
}

fn up(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_up(pt(x, y), Button::Primary, no_modifiers())
}

fn key(core: &mut EngineCore, name: &str) -> Vec<Action> {
    core.on_key_down(&Key(name.into()), no_modifiers())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_capture_started(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::CaptureStarted))
}

fn el(core: &EngineCore, id: &ElementId) -> CanvasElement {
    core.element(id).unwrap().clone()
}

fn px(size: Size) -> f64 {
    size.px().unwrap()
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_new_has_no_selection() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert_eq!(core.toolbar(), Toolbar::None);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn core_default_zoom_is_one() {
    let core = EngineCore::new();
    assert_eq!(core.camera().zoom, 1.0);
}

#[test]
fn core_default_card_is_square_post() {
    let core = EngineCore::new();
    assert_eq!(core.card.size(), (540.0, 540.0));
    assert!(core.doc.is_empty());
}

// =============================================================
// Element model
// =============================================================

#[test]
fn add_element_emits_created_without_selecting() {
    let mut core = core();
    let (id, actions) = core.add_element(ElementKind::Sticky, &AddPayload::default());
    assert!(matches!(&actions[0], Action::ElementCreated { element } if element.id == id));
    assert!(has_render_needed(&actions));
    assert!(core.selection().is_none());

    let sticky = el(&core, &id);
    assert_eq!(sticky.content.as_deref(), Some("Nova Nota"));
    assert_eq!(px(sticky.width), 200.0);
}

#[test]
fn add_element_stacks_on_top() {
    let mut core = core();
    let a = add(&mut core, ElementKind::Shape);
    let b = add(&mut core, ElementKind::Shape);
    assert_eq!(core.doc.index_of(&a), Some(0));
    assert_eq!(core.doc.index_of(&b), Some(1));
}

#[test]
fn update_element_merges_fields() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    let fields = PartialElement { color: Some("#ff0000".into()), ..Default::default() };
    let actions = core.update_element(&id, &fields);
    assert_eq!(actions[0], Action::ElementUpdated { id, fields });
    assert_eq!(el(&core, &id).color.as_deref(), Some("#ff0000"));
    assert_eq!(el(&core, &id).x, 100.0);
}

#[test]
fn empty_update_does_nothing() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    let before = el(&core, &id);
    assert!(core.update_element(&id, &PartialElement::default()).is_empty());
    assert_eq!(el(&core, &id), before);
}

#[test]
fn mutations_on_unknown_ids_do_nothing() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    let ghost = uuid::Uuid::new_v4();
    let fields = PartialElement { x: Some(1.0), ..Default::default() };
    assert!(core.update_element(&ghost, &fields).is_empty());
    assert!(core.delete_element(&ghost).is_empty());
    assert!(core.set_content(&ghost, "hi").is_empty());
    assert_eq!(core.duplicate_element(&ghost), (None, Vec::new()));
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn set_content_replaces_text() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Text);
    core.set_content(&id, "Olá");
    assert_eq!(el(&core, &id).content.as_deref(), Some("Olá"));
}

#[test]
fn duplicate_offsets_copy_on_top() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    let (copy, actions) = core.duplicate_element(&id);
    let copy = copy.unwrap();
    assert_ne!(copy, id);
    assert!(matches!(&actions[0], Action::ElementCreated { element } if element.id == copy));

    let (orig, dup) = (el(&core, &id), el(&core, &copy));
    assert_eq!(dup.x, orig.x + 20.0);
    assert_eq!(dup.y, orig.y + 20.0);
    assert_eq!(dup.shape_type, orig.shape_type);
    assert_eq!(core.doc.index_of(&copy), Some(1));
}

#[test]
fn delete_selected_element_clears_selection() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    let actions = core.delete_element(&id);
    assert_eq!(actions[0], Action::ElementDeleted { id });
    assert!(has_action(&actions, |a| matches!(
        a,
        Action::SelectionChanged { target: SelectionTarget::None, .. }
    )));
    assert!(core.selection().is_none());
    assert!(core.element(&id).is_none());
}

#[test]
fn delete_other_element_keeps_selection() {
    let mut core = core();
    let a = add(&mut core, ElementKind::Shape);
    let b = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(a));
    core.delete_element(&b);
    assert_eq!(core.selection(), SelectionTarget::Element(a));
}

#[test]
fn deleting_element_mid_stroke_ends_capture() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    let actions = down(&mut core, 110.0, 110.0);
    assert!(has_capture_started(&actions));

    let actions = key(&mut core, "Delete");
    assert!(actions.contains(&Action::ElementDeleted { id }));
    assert!(actions.contains(&Action::CaptureEnded));
    assert!(actions.contains(&Action::SetCursor { cursor: "default".into() }));
    assert_eq!(actions.iter().filter(|a| **a == Action::RenderNeeded).count(), 1);
    assert_eq!(core.input, InputState::Idle);
    assert!(up(&mut core, 150.0, 150.0).is_empty());
}

#[test]
fn deleting_dragged_element_ends_capture() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = core.delete_element(&id);
    assert!(actions.contains(&Action::CaptureEnded));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn deleting_other_element_keeps_gesture() {
    let mut core = core();
    let other = add(&mut core, ElementKind::Table);
    move_to(&mut core, &other, 400.0, 400.0);
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = core.delete_element(&other);
    assert!(!actions.contains(&Action::CaptureEnded));
    assert!(matches!(core.input, InputState::Dragging { .. }));
}

#[test]
fn vanished_stroke_target_ends_capture() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    down(&mut core, 110.0, 110.0);
    core.doc.remove(&id);
    let actions = drag(&mut core, 150.0, 150.0);
    assert!(actions.contains(&Action::CaptureEnded));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn vanished_curve_target_ends_capture() {
    let mut core = core();
    let id = curve(&mut core);
    core.select(SelectionTarget::Element(id));
    down(&mut core, 200.0, 110.0);
    core.doc.remove(&id);
    let actions = drag(&mut core, 250.0, 110.0);
    assert!(actions.contains(&Action::CaptureEnded));
    assert_eq!(core.input, InputState::Idle);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_is_exclusive() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    let actions = core.select(SelectionTarget::Headline);
    assert_eq!(core.selection(), SelectionTarget::Headline);
    assert_eq!(
        actions[0],
        Action::SelectionChanged { target: SelectionTarget::Headline, toolbar: Toolbar::Text }
    );
}

#[test]
fn reselecting_same_target_is_silent() {
    let mut core = core();
    core.select(SelectionTarget::Description);
    assert!(core.select(SelectionTarget::Description).is_empty());
}

#[test]
fn selecting_missing_targets_selects_nothing() {
    let mut core = core();
    core.select(SelectionTarget::Headline);
    core.select(SelectionTarget::Element(uuid::Uuid::new_v4()));
    assert!(core.selection().is_none());

    // A flat background is not selectable.
    core.select(SelectionTarget::Background);
    assert!(core.selection().is_none());
}

#[test]
fn toolbar_follows_selection_kind() {
    let mut core = core();
    let line = add(&mut core, ElementKind::Line);
    let draw = add(&mut core, ElementKind::Draw);
    let shape = add(&mut core, ElementKind::Shape);

    core.select(SelectionTarget::Element(line));
    assert_eq!(core.toolbar(), Toolbar::Line);
    core.select(SelectionTarget::Element(draw));
    assert_eq!(core.toolbar(), Toolbar::Line);
    core.select(SelectionTarget::Element(shape));
    assert_eq!(core.toolbar(), Toolbar::None);
    core.select(SelectionTarget::Description);
    assert_eq!(core.toolbar(), Toolbar::Text);
}

// =============================================================
// Pointer: select and drag
// =============================================================

#[test]
fn pointer_down_on_element_selects_and_starts_drag() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    let actions = down(&mut core, 150.0, 150.0);
    assert_eq!(core.selection(), SelectionTarget::Element(id));
    assert!(has_capture_started(&actions));
    assert!(matches!(core.input, InputState::Dragging { .. }));
}

#[test]
fn pointer_down_on_empty_flat_card_deselects() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    let actions = down(&mut core, 520.0, 520.0);
    assert!(core.selection().is_none());
    assert!(!has_capture_started(&actions));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    let actions = core.on_pointer_down(pt(150.0, 150.0), Button::Secondary, no_modifiers());
    assert!(actions.is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn drag_moves_one_to_one() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = drag(&mut core, 180.0, 170.0);
    assert!(has_action(&actions, |a| matches!(a, Action::ElementUpdated { .. })));
    let shape = el(&core, &id);
    assert_eq!((shape.x, shape.y), (130.0, 120.0));
    assert_eq!(px(shape.width), 100.0);
}

#[test]
fn drag_recomputes_from_gesture_origin() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    drag(&mut core, 200.0, 200.0);
    drag(&mut core, 160.0, 150.0);
    assert_eq!(el(&core, &id).x, 110.0);
    assert_eq!(el(&core, &id).y, 100.0);
}

#[test]
fn drag_stays_inside_card() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    drag(&mut core, 2000.0, -500.0);
    let shape = el(&core, &id);
    assert_eq!(shape.x, 440.0);
    assert_eq!(shape.y, 0.0);
}

#[test]
fn drag_divides_by_zoom() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.camera.set_zoom(2.0);
    down(&mut core, 300.0, 300.0);
    drag(&mut core, 360.0, 300.0);
    assert_eq!(el(&core, &id).x, 130.0);
}

#[test]
fn pointer_up_ends_gesture() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = up(&mut core, 150.0, 150.0);
    assert!(has_action(&actions, |a| matches!(a, Action::CaptureEnded)));
    assert_eq!(core.input, InputState::Idle);
    assert!(up(&mut core, 150.0, 150.0).is_empty());
}

#[test]
fn pointer_cancel_ends_gesture() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = core.on_pointer_cancel();
    assert!(has_action(&actions, |a| matches!(a, Action::CaptureEnded)));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn locked_element_selects_without_dragging() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.update_element(&id, &PartialElement { locked: Some(true), ..Default::default() });
    let actions = down(&mut core, 150.0, 150.0);
    assert_eq!(core.selection(), SelectionTarget::Element(id));
    assert!(!has_capture_started(&actions));
    drag(&mut core, 200.0, 200.0);
    assert_eq!(el(&core, &id).x, 100.0);
}

#[test]
fn second_press_on_selected_sticky_requests_editing() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Sticky);
    down(&mut core, 150.0, 150.0);
    up(&mut core, 150.0, 150.0);

    let actions = down(&mut core, 150.0, 150.0);
    assert!(actions.contains(&Action::EditTextRequested { id, text: "Nova Nota".into() }));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn headline_drags_like_an_element() {
    let mut core = core();
    down(&mut core, 60.0, 110.0);
    assert_eq!(core.selection(), SelectionTarget::Headline);
    let actions = drag(&mut core, 70.0, 115.0);
    assert!(has_action(&actions, |a| matches!(
        a,
        Action::TextFieldUpdated { slot: TextSlot::Headline, .. }
    )));
    assert_eq!((core.card.headline.x, core.card.headline.y), (60.0, 105.0));
}

#[test]
fn uploaded_image_sits_under_headline() {
    let mut core = core();
    let payload = AddPayload { src: Some("data:image/png;base64,AAAA".into()), ..Default::default() };
    let img = add_with(&mut core, ElementKind::Image, payload);
    move_to(&mut core, &img, 40.0, 90.0);

    down(&mut core, 60.0, 120.0);
    assert_eq!(core.selection(), SelectionTarget::Headline);
    up(&mut core, 60.0, 120.0);

    down(&mut core, 45.0, 280.0);
    assert_eq!(core.selection(), SelectionTarget::Element(img));
}

// =============================================================
// Pointer: resize
// =============================================================

#[test]
fn resize_from_corner_handle() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));

    let actions = down(&mut core, 200.0, 200.0);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Se, .. }));
    assert!(has_action(&actions, |a| *a == Action::SetCursor { cursor: "nwse-resize".into() }));

    drag(&mut core, 250.0, 230.0);
    let shape = el(&core, &id);
    assert_eq!((shape.x, shape.y), (100.0, 100.0));
    assert_eq!(px(shape.width), 150.0);
    assert_eq!(px(shape.height), 130.0);
}

#[test]
fn resize_from_top_left_moves_origin() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    down(&mut core, 100.0, 100.0);
    drag(&mut core, 80.0, 90.0);
    let shape = el(&core, &id);
    assert_eq!((shape.x, shape.y), (80.0, 90.0));
    assert_eq!(px(shape.width), 120.0);
    assert_eq!(px(shape.height), 110.0);
}

#[test]
fn resize_respects_minimum_size() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    down(&mut core, 200.0, 200.0);
    drag(&mut core, 0.0, 0.0);
    let shape = el(&core, &id);
    assert_eq!(px(shape.width), MIN_ELEMENT_SIZE);
    assert_eq!(px(shape.height), MIN_ELEMENT_SIZE);
}

#[test]
fn text_field_resizes_horizontally_only() {
    let mut core = core();
    core.select(SelectionTarget::Headline);
    let rect = layout::target_rect(SelectionTarget::Headline, &core.doc, &core.card, &EstimatedMeasure).unwrap();
    let handle = ResizeAnchor::E.position(rect);

    down(&mut core, handle.x, handle.y);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::E, .. }));
    drag(&mut core, handle.x - 40.0, handle.y + 80.0);

    let field = &core.card.headline;
    assert_eq!(field.y, 100.0);
    let w = px(field.width);
    assert!((w - (rect.width - 40.0)).abs() < 1e-9);
}

// =============================================================
// Pointer: freehand drawing
// =============================================================

#[test]
fn drawing_builds_path_in_local_coordinates() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    move_to(&mut core, &id, 100.0, 100.0);

    let actions = down(&mut core, 110.0, 110.0);
    assert_eq!(core.input, InputState::Drawing { id });
    assert!(has_capture_started(&actions));
    assert_eq!(el(&core, &id).path.as_deref(), Some("M 10 10"));

    drag(&mut core, 150.0, 150.0);
    up(&mut core, 150.0, 150.0);
    assert_eq!(el(&core, &id).path.as_deref(), Some("M 10 10 L 50 50"));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn second_stroke_appends() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    down(&mut core, 110.0, 110.0);
    drag(&mut core, 150.0, 150.0);
    up(&mut core, 150.0, 150.0);

    down(&mut core, 120.0, 130.0);
    drag(&mut core, 121.0, 131.0);
    assert_eq!(el(&core, &id).path.as_deref(), Some("M 10 10 L 50 50 M 20 30 L 21 31"));
}

#[test]
fn drawing_never_drags_the_element() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    core.select(SelectionTarget::Element(id));
    down(&mut core, 300.0, 300.0);
    drag(&mut core, 350.0, 320.0);
    let draw = el(&core, &id);
    assert_eq!((draw.x, draw.y), (100.0, 100.0));
}

#[test]
fn drawing_clamps_to_card() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Draw);
    down(&mut core, 110.0, 110.0);
    drag(&mut core, 1000.0, -50.0);
    assert_eq!(el(&core, &id).path.as_deref(), Some("M 10 10 L 440 -100"));
}

// =============================================================
// Pointer: curve control point
// =============================================================

fn curve(core: &mut EngineCore) -> ElementId {
    let payload = AddPayload { shape_type: Some(ShapeType::Curved), ..Default::default() };
    add_with(core, ElementKind::Line, payload)
}

#[test]
fn control_point_drag_normalizes_and_clamps() {
    let mut core = core();
    let id = curve(&mut core);
    core.select(SelectionTarget::Element(id));

    // 200×20 box at (100, 100): the default control sits at its center.
    down(&mut core, 200.0, 110.0);
    assert!(matches!(core.input, InputState::DraggingControlPoint { .. }));

    drag(&mut core, 300.0, 90.0);
    let line = el(&core, &id);
    assert_eq!(line.control_x, Some(100.0));
    assert_eq!(line.control_y, Some(0.0));

    drag(&mut core, 250.0, 90.0);
    assert_eq!(el(&core, &id).control_x, Some(75.0));
}

#[test]
fn control_point_only_when_selected() {
    let mut core = core();
    curve(&mut core);
    down(&mut core, 200.0, 110.0);
    assert!(matches!(core.input, InputState::Dragging { .. }));
}

// =============================================================
// Hover cursor
// =============================================================

#[test]
fn hover_reports_cursor_changes_only() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    let actions = drag(&mut core, 150.0, 150.0);
    assert_eq!(actions, vec![Action::SetCursor { cursor: "move".into() }]);
    assert!(drag(&mut core, 151.0, 150.0).is_empty());
    let actions = drag(&mut core, 520.0, 520.0);
    assert_eq!(actions, vec![Action::SetCursor { cursor: "default".into() }]);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_key_removes_selected_element() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    let actions = key(&mut core, "Delete");
    assert!(actions.contains(&Action::ElementDeleted { id }));
    assert!(core.doc.is_empty());
}

#[test]
fn backspace_removes_selected_element() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Table);
    core.select(SelectionTarget::Element(id));
    key(&mut core, "Backspace");
    assert!(core.doc.is_empty());
}

#[test]
fn delete_key_ignores_text_fields() {
    let mut core = core();
    core.select(SelectionTarget::Headline);
    assert!(key(&mut core, "Delete").is_empty());
    assert_eq!(core.selection(), SelectionTarget::Headline);
}

#[test]
fn escape_ends_gesture_and_deselects() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let actions = key(&mut core, "Escape");
    assert!(has_action(&actions, |a| matches!(a, Action::CaptureEnded)));
    assert!(core.selection().is_none());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn other_keys_do_nothing() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Shape);
    core.select(SelectionTarget::Element(id));
    assert!(key(&mut core, "a").is_empty());
}

// =============================================================
// Background
// =============================================================

#[test]
fn image_background_is_selectable_and_unbounded() {
    let mut core = EngineCore::new();
    down(&mut core, 10.0, 10.0);
    assert_eq!(core.selection(), SelectionTarget::Background);

    let actions = drag(&mut core, -50.0, -60.0);
    assert!(has_action(&actions, |a| matches!(a, Action::BackgroundChanged { .. })));
    let p = core.card.background_placement;
    assert_eq!((p.x, p.y), (-60.0, -70.0));
}

#[test]
fn switching_to_color_deselects_background() {
    let mut core = EngineCore::new();
    core.select(SelectionTarget::Background);
    assert_eq!(core.selection(), SelectionTarget::Background);
    let actions = core.set_background("linear-gradient(135deg, #667eea 0%, #764ba2 100%)");
    assert!(core.selection().is_none());
    assert!(has_action(&actions, |a| matches!(a, Action::BackgroundChanged { .. })));
}

#[test]
fn overlay_opacity_is_clamped() {
    let mut core = core();
    let actions = core.set_overlay_opacity(1.7);
    assert_eq!(actions[0], Action::OverlayChanged { opacity: 1.0 });
    core.set_overlay_opacity(-3.0);
    assert_eq!(core.card.overlay_opacity, 0.0);
}

#[test]
fn blank_filter_means_none() {
    let mut core = core();
    core.set_filter("sepia(100%)");
    assert_eq!(core.card.filter, "sepia(100%)");
    let actions = core.set_filter("  ");
    assert_eq!(actions[0], Action::FilterChanged { filter: "none".into() });
}

// =============================================================
// Format and zoom
// =============================================================

#[test]
fn set_format_reports_size() {
    let mut core = core();
    let actions = core.set_format("instagram-story");
    assert_eq!(
        actions[0],
        Action::FormatChanged { format: "instagram-story".into(), width: 360.0, height: 640.0 }
    );
}

#[test]
fn unknown_format_falls_back() {
    let mut core = core();
    core.set_format("myspace-banner");
    assert_eq!(core.card.format, "instagram-square");
}

#[test]
fn zoom_steps_and_clamps() {
    let mut core = core();
    let actions = core.zoom_in();
    assert_eq!(actions[0], Action::ZoomChanged { zoom: 1.1 });
    for _ in 0..20 {
        core.zoom_in();
    }
    assert_eq!(core.camera().zoom, ZOOM_MAX);
    assert!(core.zoom_in().is_empty());
    for _ in 0..30 {
        core.zoom_out();
    }
    assert_eq!(core.camera().zoom, 0.5);
}

// =============================================================
// Suggestions, templates and export
// =============================================================

fn suggestion(background: Option<&str>) -> AiSuggestion {
    AiSuggestion {
        headline: "Pizza em Dobro".into(),
        description: "Compre uma e leve duas hoje.".into(),
        headline_color: "#fff000".into(),
        description_color: "#eeeeee".into(),
        background_color: background.map(str::to_owned),
        font_family: Some("Montserrat, sans-serif".into()),
        suggested_image_keyword: Some("pizza".into()),
    }
}

#[test]
fn suggestion_fills_text_fields() {
    let mut core = core();
    let actions = core.apply_suggestion(&suggestion(None));
    assert_eq!(core.card.headline.text, "Pizza em Dobro");
    assert_eq!(core.card.headline.style.color, "#fff000");
    assert_eq!(core.card.description.style.color, "#eeeeee");
    assert_eq!(core.card.headline.style.font_family, "Montserrat, sans-serif");
    assert_eq!(core.card.description.style.font_family, "Montserrat, sans-serif");
    assert_eq!(actions.last(), Some(&Action::RenderNeeded));
    assert_eq!(actions.iter().filter(|a| **a == Action::RenderNeeded).count(), 1);
}

#[test]
fn suggestion_without_background_keeps_background() {
    let mut core = core();
    let actions = core.apply_suggestion(&suggestion(None));
    assert_eq!(core.card.background, "#1f2937");
    assert!(!has_action(&actions, |a| matches!(a, Action::BackgroundChanged { .. })));

    core.apply_suggestion(&suggestion(Some("   ")));
    assert_eq!(core.card.background, "#1f2937");
}

#[test]
fn suggestion_background_is_applied() {
    let mut core = core();
    core.apply_suggestion(&suggestion(Some("#ff6347")));
    assert_eq!(core.card.background, "#ff6347");
}

#[test]
fn template_sets_format_and_photo() {
    let mut core = core();
    let template = Template {
        id: "t1".into(),
        title: "Story".into(),
        category: "Vendas".into(),
        format: "instagram-story".into(),
        image_url: Some("https://images.unsplash.com/photo-1".into()),
    };
    core.apply_template(&template);
    assert_eq!(core.card.format, "instagram-story");
    assert!(core.card.background_kind().is_image());
}

#[test]
fn template_without_photo_keeps_background() {
    let mut core = core();
    let template = Template {
        id: "t2".into(),
        title: "Banner".into(),
        category: "YouTube".into(),
        format: "youtube-banner".into(),
        image_url: None,
    };
    core.apply_template(&template);
    assert_eq!(core.card.format, "youtube-banner");
    assert_eq!(core.card.background, "#1f2937");
}

#[test]
fn begin_export_clears_selection_and_gesture() {
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let (file_name, actions) = core.begin_export();
    assert_eq!(file_name, "card-instagram-square.png");
    assert!(has_action(&actions, |a| matches!(a, Action::CaptureEnded)));
    assert!(core.selection().is_none());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn begin_export_actions_stand_alone() {
    // The host dispatches these even when the capture itself fails, so they
    // must fully describe the cleared state.
    let mut core = core();
    add(&mut core, ElementKind::Shape);
    down(&mut core, 150.0, 150.0);
    let (_, actions) = core.begin_export();
    assert!(actions.contains(&Action::SelectionChanged { target: SelectionTarget::None, toolbar: Toolbar::None }));
    assert!(actions.contains(&Action::SetCursor { cursor: "default".into() }));
    assert_eq!(actions.last(), Some(&Action::RenderNeeded));
    assert_eq!(actions.iter().filter(|a| **a == Action::RenderNeeded).count(), 1);
}

#[test]
fn begin_export_without_selection_still_redraws() {
    let mut core = core();
    let (_, actions) = core.begin_export();
    assert_eq!(actions, vec![Action::RenderNeeded]);
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn actions_serialize_tagged_camel_case() {
    let v = serde_json::to_value(Action::SelectionChanged {
        target: SelectionTarget::Headline,
        toolbar: Toolbar::Text,
    })
    .unwrap();
    assert_eq!(v["type"], "selectionChanged");
    assert_eq!(v["target"]["kind"], "headline");
    assert_eq!(v["toolbar"], "text");

    let v = serde_json::to_value(Action::Exported { file_name: "card.png".into() }).unwrap();
    assert_eq!(v["fileName"], "card.png");
    assert_eq!(serde_json::to_value(Action::RenderNeeded).unwrap()["type"], "renderNeeded");
}

#[test]
fn snapshot_carries_everything_panels_need() {
    let mut core = core();
    let id = add(&mut core, ElementKind::Line);
    core.select(SelectionTarget::Element(id));
    let v = serde_json::to_value(core.snapshot()).unwrap();
    assert_eq!(v["elements"].as_array().unwrap().len(), 1);
    assert_eq!(v["selection"]["kind"], "element");
    assert_eq!(v["toolbar"], "line");
    assert_eq!(v["zoom"], 1.0);
    assert_eq!(v["card"]["format"], "instagram-square");
}
