//! Shared numeric and color constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 2.0;

/// Zoom change per zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

// ── Element model ───────────────────────────────────────────────

/// Offset applied to both axes of a duplicated element.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Smallest width or height a resize gesture can produce, in card pixels.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Stroke width used for lines and freehand strokes when none is stored.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;

/// Control point coordinate used when `control_x` / `control_y` are absent.
pub const DEFAULT_CONTROL: f64 = 50.0;

/// Side of the percentage space used by line and shape geometry.
pub const VIEWBOX: f64 = 100.0;

/// Local x where a line ends when an end marker is drawn, reserving room for the arrowhead.
pub const MARKER_INSET_END: f64 = 90.0;

/// Local x where a line starts when a start marker is drawn.
pub const MARKER_INSET_START: f64 = 10.0;

/// Fallback box side used to normalize control-point drags on unresolved sizes.
pub const FALLBACK_BOX: f64 = 100.0;

/// Rows and columns of a table that carries no explicit grid size.
pub const DEFAULT_TABLE_GRID: u32 = 3;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Radius of the curve control dot in screen pixels.
pub const CONTROL_DOT_RADIUS_PX: f64 = 6.0;

/// Extra screen-space slop around the control dot.
pub const CONTROL_DOT_SLOP_PX: f64 = 4.0;

// ── Colors ──────────────────────────────────────────────────────

/// Selection outline and handle color.
pub const SELECTION_COLOR: &str = "#a855f7";

/// Curve control dot fill.
pub const CONTROL_DOT_COLOR: &str = "#22c55e";

/// Sticky note text color.
pub const STICKY_TEXT_COLOR: &str = "#374151";

/// Table border color when the element has none.
pub const TABLE_BORDER_FALLBACK: &str = "#ddd";

/// Base fill drawn under image and gradient backgrounds.
pub const BACKGROUND_BASE: &str = "#000";

/// Placeholder fill for images that failed to load.
pub const BROKEN_IMAGE_FILL: &str = "#e5e7eb";

/// Placeholder cross color for images that failed to load.
pub const BROKEN_IMAGE_STROKE: &str = "#9ca3af";

// ── Export ──────────────────────────────────────────────────────

/// Upscaling factor of exported rasters.
pub const EXPORT_SCALE: f64 = 2.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;
