//! Rendering module
//!
//! The scene turns a [`Session`](crate::Session) into a flat draw list in
//! canvas pixels; backends only paint that list. The browser backend uses the
//! 2D canvas context.

pub mod draw;
pub mod layout;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use draw::{Color, DrawCmd, Stroke, TextAlign};
pub use layout::{Layout, Rect};
pub use scene::Scene;
