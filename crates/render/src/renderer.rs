use glam::Vec3;
use waveplane_kernel::PlaneGeometry;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SceneView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 100.0, 40.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the displaced surface and a view configuration, then
/// produces output. It never mutates the surface.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given surface state and view.
    fn render(&self, mesh: &PlaneGeometry, view: &SceneView) -> Self::Output;
}

/// Height-map characters from trough to crest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Debug text renderer for headless use.
///
/// Produces a human-readable dump of the surface state: dimensions, offset
/// bounds, and a coarse character height map. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, mesh: &PlaneGeometry, view: &SceneView) -> String {
        let (sx, sy) = mesh.segments();
        let (lo, hi) = mesh.offset_bounds();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Waveplane Surface ({sx}x{sy} segments, {} vertices) ===\n",
            mesh.vertex_count()
        ));
        out.push_str(&format!("Offsets: min={lo:.3} max={hi:.3}\n"));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        // Downsample to at most 16 columns/rows so wide meshes stay readable.
        let cols = sx + 1;
        let step_x = (cols / 16).max(1) as usize;
        let step_y = ((sy + 1) / 16).max(1) as usize;
        let span = (hi - lo).max(1e-6);
        let offsets = mesh.offsets();
        for j in (0..=sy as usize).step_by(step_y) {
            out.push_str("  ");
            for i in (0..=sx as usize).step_by(step_x) {
                let o = offsets[j * cols as usize + i];
                let k = (((o - lo) / span) * (RAMP.len() - 1) as f32).round() as usize;
                out.push(RAMP[k.min(RAMP.len() - 1)] as char);
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveplane_kernel::{FrameDriver, RippleParams};

    #[test]
    fn dumps_flat_surface() {
        let mesh = PlaneGeometry::new(100.0, 100.0, 8, 8).unwrap();
        let out = DebugTextRenderer::new().render(&mesh, &SceneView::default());
        assert!(out.contains("8x8 segments"));
        assert!(out.contains("81 vertices"));
        assert!(out.contains("min=0.000 max=0.000"));
    }

    #[test]
    fn dumps_rippled_surface() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 16, 16).unwrap();
        let mut driver = FrameDriver::new();
        for _ in 0..20 {
            driver.drive(&mut mesh, Some(&RippleParams::default()));
        }
        let out = DebugTextRenderer::new().render(&mesh, &SceneView::default());
        // A live ripple spans more than one ramp character.
        let map_chars: std::collections::HashSet<char> = out
            .lines()
            .filter(|l| l.starts_with("  "))
            .flat_map(|l| l.trim_start().chars())
            .collect();
        assert!(map_chars.len() > 1);
    }

    #[test]
    fn default_view_matches_scene_start() {
        let view = SceneView::default();
        assert_eq!(view.eye, Vec3::new(0.0, 100.0, 40.0));
        assert_eq!(view.fov_degrees, 75.0);
    }
}
