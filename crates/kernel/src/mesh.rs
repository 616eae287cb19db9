use crate::displace::ripple_offset;
use crate::params::RippleParams;
use glam::{Vec2, Vec3};

/// Errors from plane geometry construction.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("segment count must be at least 1, got {0}")]
    ZeroSegments(u32),
    #[error("plane extent must be finite and positive, got {0}")]
    BadExtent(f32),
    #[error("mesh exceeds 16-bit index range with {0} vertices")]
    TooManyVertices(usize),
}

/// Subdivided plane surface with per-vertex ripple offsets.
///
/// Base positions span `[-extent/2, extent/2]` in the local XY plane with
/// the local normal along +Z. Surface points (unit-UV coordinates) are fixed
/// at construction; offsets and normals are rewritten each frame by the
/// driver. Indices are u16, so the subdivision is capped at 65536 vertices.
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    positions: Vec<Vec2>,
    uvs: Vec<Vec2>,
    offsets: Vec<f32>,
    normals: Vec<Vec3>,
    indices: Vec<u16>,
    segments: (u32, u32),
    extent: (f32, f32),
}

impl PlaneGeometry {
    /// Build a grid plane of `segments_x` x `segments_y` quads covering
    /// `extent_x` x `extent_y` local units, centered on the origin.
    pub fn new(
        extent_x: f32,
        extent_y: f32,
        segments_x: u32,
        segments_y: u32,
    ) -> Result<Self, GeometryError> {
        for extent in [extent_x, extent_y] {
            if !extent.is_finite() || extent <= 0.0 {
                return Err(GeometryError::BadExtent(extent));
            }
        }
        for segments in [segments_x, segments_y] {
            if segments == 0 {
                return Err(GeometryError::ZeroSegments(segments));
            }
        }

        let cols = segments_x as usize + 1;
        let rows = segments_y as usize + 1;
        let vertex_count = cols * rows;
        if vertex_count > u16::MAX as usize + 1 {
            return Err(GeometryError::TooManyVertices(vertex_count));
        }

        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for j in 0..rows {
            for i in 0..cols {
                let u = i as f32 / segments_x as f32;
                let v = j as f32 / segments_y as f32;
                positions.push(Vec2::new((u - 0.5) * extent_x, (v - 0.5) * extent_y));
                uvs.push(Vec2::new(u, v));
            }
        }

        let mut indices = Vec::with_capacity(segments_x as usize * segments_y as usize * 6);
        for j in 0..segments_y as usize {
            for i in 0..segments_x as usize {
                let a = (j * cols + i) as u16;
                let b = a + 1;
                let c = a + cols as u16;
                let d = c + 1;
                // Counter-clockwise when viewed from local +Z.
                indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }

        Ok(Self {
            positions,
            uvs,
            offsets: vec![0.0; vertex_count],
            normals: vec![Vec3::Z; vertex_count],
            indices,
            segments: (segments_x, segments_y),
            extent: (extent_x, extent_y),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn segments(&self) -> (u32, u32) {
        self.segments
    }

    pub fn extent(&self) -> (f32, f32) {
        self.extent
    }

    /// Base grid positions in the local XY plane.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Fixed unit-UV surface points.
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Current per-vertex ripple offsets.
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Current smooth normals.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Vertex position with the ripple offset applied along the local normal.
    pub fn displaced_position(&self, index: usize) -> Vec3 {
        let base = self.positions[index];
        Vec3::new(base.x, base.y, self.offsets[index])
    }

    /// Evaluate the displacement at every surface point for time `t`.
    ///
    /// `None` means the tuning context is not attached yet; offsets are
    /// zeroed for the frame rather than signaling an error.
    pub fn displace(&mut self, t: f32, params: Option<&RippleParams>) {
        match params {
            Some(p) => {
                for (offset, uv) in self.offsets.iter_mut().zip(&self.uvs) {
                    *offset = ripple_offset(*uv, t, p);
                }
            }
            None => self.offsets.fill(0.0),
        }
    }

    /// Rebuild smooth normals from the displaced surface.
    ///
    /// Face normals are accumulated per vertex (area-weighted) and
    /// normalized, so shading follows the ripple.
    pub fn recompute_normals(&mut self) {
        self.normals.fill(Vec3::ZERO);
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = self.displaced_position(a);
            let pb = self.displaced_position(b);
            let pc = self.displaced_position(c);
            let face = (pb - pa).cross(pc - pa);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for normal in &mut self.normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Z);
        }
    }

    /// Minimum and maximum offset over the surface.
    pub fn offset_bounds(&self) -> (f32, f32) {
        self.offsets
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &o| {
                (lo.min(o), hi.max(o))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts() {
        let mesh = PlaneGeometry::new(100.0, 100.0, 25, 25).unwrap();
        assert_eq!(mesh.vertex_count(), 26 * 26);
        assert_eq!(mesh.indices().len(), 25 * 25 * 6);
    }

    #[test]
    fn uv_corners_span_unit_square() {
        let mesh = PlaneGeometry::new(10.0, 10.0, 4, 4).unwrap();
        let uvs = mesh.uvs();
        assert_eq!(uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(uvs[4], Vec2::new(1.0, 0.0));
        assert_eq!(*uvs.last().unwrap(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn positions_centered_on_origin() {
        let mesh = PlaneGeometry::new(100.0, 100.0, 2, 2).unwrap();
        assert_eq!(mesh.positions()[0], Vec2::new(-50.0, -50.0));
        // Center vertex of a 2x2 grid sits at the origin with uv (0.5, 0.5).
        assert_eq!(mesh.positions()[4], Vec2::ZERO);
        assert_eq!(mesh.uvs()[4], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            PlaneGeometry::new(100.0, 100.0, 0, 25),
            Err(GeometryError::ZeroSegments(0))
        ));
        assert!(matches!(
            PlaneGeometry::new(-1.0, 100.0, 25, 25),
            Err(GeometryError::BadExtent(_))
        ));
        assert!(matches!(
            PlaneGeometry::new(1.0, f32::NAN, 25, 25),
            Err(GeometryError::BadExtent(_))
        ));
    }

    #[test]
    fn rejects_meshes_beyond_u16_indices() {
        assert!(matches!(
            PlaneGeometry::new(100.0, 100.0, 300, 300),
            Err(GeometryError::TooManyVertices(_))
        ));
    }

    #[test]
    fn displace_without_params_zeroes_offsets() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 4, 4).unwrap();
        mesh.displace(3.0, Some(&RippleParams::default()));
        assert!(mesh.offsets().iter().any(|o| o.abs() > 0.0));
        mesh.displace(3.0, None);
        assert!(mesh.offsets().iter().all(|&o| o == 0.0));
    }

    #[test]
    fn center_vertex_flat_at_time_zero() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 2, 2).unwrap();
        mesh.displace(0.0, Some(&RippleParams::default()));
        assert_eq!(mesh.offsets()[4], 0.0);
    }

    #[test]
    fn flat_surface_has_unit_z_normals() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 8, 8).unwrap();
        mesh.recompute_normals();
        for n in mesh.normals() {
            assert!((n.distance(Vec3::Z)) < 1e-5);
        }
    }

    #[test]
    fn displaced_normals_are_unit_length_and_tilted() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 16, 16).unwrap();
        mesh.displace(1.0, Some(&RippleParams::default()));
        mesh.recompute_normals();
        let mut tilted = 0;
        for n in mesh.normals() {
            assert!((n.length() - 1.0).abs() < 1e-4);
            if n.distance(Vec3::Z) > 1e-3 {
                tilted += 1;
            }
        }
        assert!(tilted > 0);
    }

    #[test]
    fn offset_bounds_track_amplitude() {
        let mut mesh = PlaneGeometry::new(100.0, 100.0, 32, 32).unwrap();
        mesh.displace(2.0, Some(&RippleParams::new(60.0, 4.0, 1.0)));
        let (lo, hi) = mesh.offset_bounds();
        assert!(lo >= -4.0 - 1e-5);
        assert!(hi <= 4.0 + 1e-5);
        assert!(hi > lo);
    }
}
