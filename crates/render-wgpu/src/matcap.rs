use glam::Vec3;

/// Procedurally shaded sphere image used for the matcap lookup.
///
/// Generated once at startup instead of loading an image file: a warm base
/// tone with a key light, a cool rim, and a specular highlight. RGBA8 rows,
/// top to bottom.
#[derive(Debug, Clone)]
pub struct MatcapImage {
    size: u32,
    pixels: Vec<u8>,
}

impl MatcapImage {
    /// Render a `size` x `size` matcap sphere.
    pub fn generate(size: u32) -> Self {
        let key_light = Vec3::new(0.4, 0.6, 0.7).normalize();
        let half = (key_light + Vec3::Z).normalize();
        let base = Vec3::new(0.82, 0.52, 0.34);
        let rim_tint = Vec3::new(0.20, 0.26, 0.38);

        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let nx = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                let ny = 1.0 - (y as f32 + 0.5) / size as f32 * 2.0;
                let r2 = nx * nx + ny * ny;
                // Pixels outside the sphere take the rim normal so edge
                // samples stay continuous.
                let normal = if r2 >= 1.0 {
                    Vec3::new(nx, ny, 0.0).normalize()
                } else {
                    Vec3::new(nx, ny, (1.0 - r2).sqrt())
                };

                let diffuse = normal.dot(key_light).max(0.0);
                let rim = (1.0 - normal.z).powi(3);
                let specular = normal.dot(half).max(0.0).powi(48);

                let color = base * (0.25 + 0.75 * diffuse)
                    + rim_tint * rim
                    + Vec3::splat(specular * 0.8);
                pixels.push((color.x.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push((color.y.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push((color.z.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push(255);
            }
        }

        Self { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Upload to an sRGB texture and return a view plus a linear sampler.
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> (wgpu::TextureView, wgpu::Sampler) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("matcap_texture"),
            size: wgpu::Extent3d {
                width: self.size,
                height: self.size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size),
                rows_per_image: Some(self.size),
            },
            wgpu::Extent3d {
                width: self.size,
                height: self.size,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&Default::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("matcap_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        (view, sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(img: &MatcapImage, x: u32, y: u32) -> f32 {
        let i = ((y * img.size() + x) * 4) as usize;
        let p = img.pixels();
        0.2126 * p[i] as f32 + 0.7152 * p[i + 1] as f32 + 0.0722 * p[i + 2] as f32
    }

    #[test]
    fn image_is_fully_populated_rgba() {
        let img = MatcapImage::generate(64);
        assert_eq!(img.pixels().len(), 64 * 64 * 4);
        assert!(img.pixels().iter().skip(3).step_by(4).all(|&a| a == 255));
    }

    #[test]
    fn lit_hemisphere_is_brighter_than_the_rim() {
        let img = MatcapImage::generate(128);
        // Key light leans up-right, so sample there against the lower-left corner.
        let lit = luminance(&img, 80, 40);
        let rim = luminance(&img, 2, 125);
        assert!(lit > rim);
    }

    #[test]
    fn edge_pixels_are_continuous() {
        let img = MatcapImage::generate(32);
        // No panic on the r2 >= 1 path and the corner is still opaque.
        let i = 0;
        assert_eq!(img.pixels()[i + 3], 255);
    }
}
