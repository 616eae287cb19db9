use crate::params::RippleParams;
use glam::Vec2;

/// Center of the ripple in unit texture space.
pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Signed height offset for the surface point `uv` at time `t`.
///
/// `offset = sin(distance * width - t * speed) * height`, where `distance`
/// is the euclidean distance from `uv` to [`CENTER`]. Pure and total over
/// all real inputs; no error conditions.
pub fn ripple_offset(uv: Vec2, t: f32, params: &RippleParams) -> f32 {
    let distance = uv.distance(CENTER);
    (distance * params.width() - t * params.speed()).sin() * params.height()
}
