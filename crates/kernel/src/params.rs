use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Live tuning parameters for the ripple displacement.
///
/// Three named scalars: spatial frequency ("width"), amplitude ("height"),
/// and temporal frequency ("speed"). Values always lie within their declared
/// ranges because every write path clamps. The record is shared between the
/// tuning panel (writes) and the frame driver (reads); both run on the frame
/// thread, so no locking is involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleParams {
    width: f32,
    height: f32,
    speed: f32,
}

impl RippleParams {
    /// Adjustable range for the spatial frequency.
    pub const WIDTH_RANGE: RangeInclusive<f32> = 0.0..=100.0;
    /// Adjustable range for the amplitude.
    pub const HEIGHT_RANGE: RangeInclusive<f32> = 0.0..=20.0;
    /// Adjustable range for the temporal frequency.
    pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=5.0;

    /// Build a parameter set, clamping each value to its declared range.
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        let mut params = Self {
            width: 0.0,
            height: 0.0,
            speed: 0.0,
        };
        params.set_width(width);
        params.set_height(height);
        params.set_speed(speed);
        params
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_width(&mut self, value: f32) {
        self.width = value.clamp(*Self::WIDTH_RANGE.start(), *Self::WIDTH_RANGE.end());
    }

    pub fn set_height(&mut self, value: f32) {
        self.height = value.clamp(*Self::HEIGHT_RANGE.start(), *Self::HEIGHT_RANGE.end());
    }

    pub fn set_speed(&mut self, value: f32) {
        self.speed = value.clamp(*Self::SPEED_RANGE.start(), *Self::SPEED_RANGE.end());
    }
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 4.0,
            speed: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene() {
        let p = RippleParams::default();
        assert_eq!(p.width(), 20.0);
        assert_eq!(p.height(), 4.0);
        assert_eq!(p.speed(), 1.0);
    }

    #[test]
    fn setters_clamp_to_declared_range() {
        let mut p = RippleParams::default();
        p.set_width(250.0);
        assert_eq!(p.width(), 100.0);
        p.set_width(-3.0);
        assert_eq!(p.width(), 0.0);
        p.set_height(21.5);
        assert_eq!(p.height(), 20.0);
        p.set_speed(-0.1);
        assert_eq!(p.speed(), 0.0);
    }

    #[test]
    fn new_clamps_out_of_range_inputs() {
        let p = RippleParams::new(1000.0, -5.0, 2.5);
        assert_eq!(p.width(), 100.0);
        assert_eq!(p.height(), 0.0);
        assert_eq!(p.speed(), 2.5);
    }

    #[test]
    fn in_range_writes_pass_through() {
        let mut p = RippleParams::default();
        p.set_width(42.5);
        assert_eq!(p.width(), 42.5);
    }

    #[test]
    fn serializes_named_fields() {
        let p = RippleParams::default();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"width\":20.0"));
        assert!(json.contains("\"speed\":1.0"));
    }
}
