//! Canvas scene and direct-manipulation engine for the card editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! card being designed (format, background, overlay, filter and the two fixed
//! text fields) plus the free elements placed on it, and the full lifecycle of
//! the canvas: translating raw DOM input into selection, drag, resize, freehand
//! and curve edits, hit-testing, rendering, and PNG export. The page only
//! mounts an [`host::EditorHost`], renders its panels from the
//! [`engine::Action`]s it receives, and calls back with panel edits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`host`] | `wasm-bindgen` bridge: DOM listeners, action dispatch |
//! | [`doc`] | Element types, sparse updates and the element store |
//! | [`card`] | Card state: text fields, background, overlay, filter, format |
//! | [`format`] | Output formats and picker presets |
//! | [`background`] | Background classification and CSS gradient parsing |
//! | [`camera`] | Editor zoom and screen/card coordinate conversions |
//! | [`input`] | Selection targets, input types and the gesture state machine |
//! | [`geometry`] | Drag, resize and control-point math |
//! | [`layout`] | Text measurement and resolved target boxes |
//! | [`shapes`] | Shape outlines, line geometry and table grids |
//! | [`path`] | Freehand path encoding |
//! | [`hit`] | Hit-testing against the selection UI, elements and card |
//! | [`render`] | Card and selection rendering to a 2D context |
//! | [`images`] | Image loading cache |
//! | [`export`] | Offscreen PNG export |
//! | [`capture`] | Window pointer listeners for an active gesture |
//! | [`suggest`] | AI suggestion records, prompts and templates |
//! | [`consts`] | Shared numeric and color constants |

pub mod background;
pub mod camera;
pub mod capture;
pub mod card;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod format;
pub mod geometry;
pub mod hit;
pub mod host;
pub mod images;
pub mod input;
pub mod layout;
pub mod path;
pub mod render;
pub mod shapes;
pub mod suggest;
