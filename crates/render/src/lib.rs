//! Renderer-agnostic seam for the waveplane scene.
//!
//! # Invariants
//! - Renderers never mutate the surface; displacement is driver-owned.
//! - The text backend carries no GPU dependency and runs headless.

pub mod renderer;

pub use renderer::{DebugTextRenderer, Renderer, SceneView};
