//! Aquarium aquascape designer: scene model, interaction, and rendering.
//!
//! This crate is compiled to WebAssembly and runs in the browser, with a
//! small native CLI for the image and tank helpers. It owns the design
//! session end to end: the scene store of placed hardscape and plants, the
//! tank's physical dimensions, the pointer state machine that drags, rotates
//! and scales objects, and both presentations (a flat perspective drawing
//! and a 3D scene description). The host JavaScript layer wires DOM events
//! to the engine and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`store`] | Scene store: objects, selection, custom assets, appearance configs |
//! | [`doc`] | Scene object, asset and config types |
//! | [`layer`] | Z-order arithmetic for the layering commands |
//! | [`tank`] | Tank dimensions, presets, volume |
//! | [`input`] | Input event types and the transform state machine |
//! | [`hit`] | Object footprints and hit-testing |
//! | [`geom`] | Points, rects, and percent/pixel conversions |
//! | [`render`] | Flat and 3D presentations behind a drawing surface |
//! | [`upload`] | Image file validation and the upload session |
//! | [`cutout`] | Background removal and thumbnails |
//! | [`config`] | Tunable bounds with environment overrides |
//! | [`consts`] | Shared numeric constants (scale limits, handle sizes, etc.) |

pub mod config;
pub mod consts;
pub mod cutout;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layer;
pub mod render;
pub mod store;
pub mod tank;
pub mod upload;
