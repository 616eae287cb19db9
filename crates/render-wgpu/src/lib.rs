//! wgpu render backend for the waveplane scene.
//!
//! Renders the displaced plane with matcap shading. Vertices are rewritten
//! each frame from the kernel's surface state; the shaders are fixed WGSL.
//!
//! # Invariants
//! - The renderer never mutates the surface; it only reads displaced state.
//! - Camera motion lives outside the kernel and is applied once per frame.

mod camera;
mod gpu;
mod matcap;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WaveplaneRenderer;
pub use matcap::MatcapImage;
