use crate::clock::FrameClock;
use crate::mesh::PlaneGeometry;
use crate::params::RippleParams;

/// Per-frame driver for the rippling surface.
///
/// Owns the time accumulator and the one-shot attachment guard for the
/// tuning panel. All work happens synchronously inside the frame callback:
/// advance the clock, evaluate the displacement at every surface point,
/// rebuild smooth normals.
#[derive(Debug, Default)]
pub struct FrameDriver {
    clock: FrameClock,
    panel_attached: bool,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(step: f32) -> Self {
        Self {
            clock: FrameClock::with_step(step),
            panel_attached: false,
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Run one frame: advance the clock, then displace the surface.
    ///
    /// The clock advance always precedes evaluation. `None` params means the
    /// tuning context does not exist yet; the surface relaxes to zero offset
    /// for the frame instead of erroring. Returns the frame's time.
    pub fn drive(&mut self, mesh: &mut PlaneGeometry, params: Option<&RippleParams>) -> f32 {
        let t = self.clock.advance();
        mesh.displace(t, params);
        mesh.recompute_normals();
        t
    }

    /// One-shot guard for wiring the tuning panel to the live parameters.
    ///
    /// Returns `true` exactly once; later frames get `false` and must not
    /// re-attach.
    pub fn attach_panel_once(&mut self) -> bool {
        if self.panel_attached {
            return false;
        }
        self.panel_attached = true;
        tracing::debug!("tuning panel attached");
        true
    }

    pub fn panel_attached(&self) -> bool {
        self.panel_attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DEFAULT_STEP;
    use crate::displace::{CENTER, ripple_offset};

    fn small_mesh() -> PlaneGeometry {
        PlaneGeometry::new(100.0, 100.0, 2, 2).unwrap()
    }

    #[test]
    fn clock_advances_before_evaluation() {
        let mut driver = FrameDriver::new();
        let mut mesh = small_mesh();
        let params = RippleParams::default();

        let t = driver.drive(&mut mesh, Some(&params));
        assert_eq!(t, DEFAULT_STEP);
        // The center vertex would be exactly flat at t=0; a nonzero offset
        // proves the first frame evaluated at the advanced time.
        let expected = ripple_offset(CENTER, DEFAULT_STEP, &params);
        assert_eq!(mesh.offsets()[4], expected);
        assert_ne!(mesh.offsets()[4], 0.0);
    }

    #[test]
    fn time_accumulates_per_frame() {
        let mut driver = FrameDriver::new();
        let mut mesh = small_mesh();
        for _ in 0..40 {
            driver.drive(&mut mesh, Some(&RippleParams::default()));
        }
        assert_eq!(driver.clock().frames(), 40);
        assert!((driver.clock().time() - 40.0 * DEFAULT_STEP).abs() < 1e-4);
    }

    #[test]
    fn missing_params_is_a_zero_offset_frame() {
        let mut driver = FrameDriver::new();
        let mut mesh = small_mesh();
        driver.drive(&mut mesh, Some(&RippleParams::default()));
        driver.drive(&mut mesh, None);
        assert!(mesh.offsets().iter().all(|&o| o == 0.0));
        // Clock still advanced.
        assert_eq!(driver.clock().frames(), 2);
    }

    #[test]
    fn attach_guard_fires_exactly_once() {
        let mut driver = FrameDriver::new();
        assert!(!driver.panel_attached());
        assert!(driver.attach_panel_once());
        assert!(driver.panel_attached());
        for _ in 0..10 {
            assert!(!driver.attach_panel_once());
        }
    }

    #[test]
    fn panel_writes_visible_next_frame() {
        let mut driver = FrameDriver::new();
        let mut mesh = small_mesh();
        let mut params = RippleParams::default();
        driver.drive(&mut mesh, Some(&params));

        params.set_height(0.0);
        driver.drive(&mut mesh, Some(&params));
        assert!(mesh.offsets().iter().all(|&o| o == 0.0));
    }
}
