//! Box blur used by the post-process pass.
//!
//! [`BoxBlur`] is the single definition of the kernel: the GLSL fragment
//! stage is generated from it, and [`BoxBlur::apply`] is a CPU reference of
//! the same filter.

use glam::Vec2;
use image::RgbImage;
use serde::Deserialize;

/// Largest accepted [`BoxBlur::radius`].
pub const MAX_RADIUS: u32 = 16;

/// Unweighted square kernel sampled at fixed texture-coordinate spacing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoxBlur {
    /// Samples on each side of the center; the kernel is `2 * radius + 1` wide.
    pub radius: u32,
    /// Horizontal distance between samples, in texture coordinates.
    pub step_h: f32,
    /// Vertical distance between samples, in texture coordinates.
    pub step_v: f32,
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self {
            radius: 4,
            step_h: 1.0 / 300.0,
            step_v: 1.0 / 200.0,
        }
    }
}

impl BoxBlur {
    /// Rejects kernels the GPU pass cannot run.
    pub fn check(&self) -> Result<(), String> {
        if self.radius > MAX_RADIUS {
            return Err(format!(
                "blur radius {} exceeds the maximum of {MAX_RADIUS}",
                self.radius
            ));
        }
        if !(self.step_h.is_finite() && self.step_v.is_finite()) {
            return Err("blur steps must be finite".to_string());
        }
        Ok(())
    }

    /// Kernel width (and height). Saturates for radii [`check`](Self::check) rejects.
    pub fn size(&self) -> u32 {
        self.radius.saturating_mul(2).saturating_add(1)
    }

    /// Total samples taken per output pixel.
    pub fn sample_count(&self) -> u32 {
        self.size().saturating_mul(self.size())
    }

    /// Weight of each sample.
    pub fn weight(&self) -> f32 {
        1.0 / self.sample_count() as f32
    }

    /// Texture-coordinate offsets of every sample, column by column.
    pub fn offsets(&self) -> impl Iterator<Item = Vec2> + '_ {
        let r = i32::try_from(self.radius).unwrap_or(i32::MAX);
        (-r..=r).flat_map(move |x| {
            (-r..=r).map(move |y| Vec2::new(x as f32 * self.step_h, y as f32 * self.step_v))
        })
    }

    /// GLSL 150 fragment stage sampling `texFramebuffer` through this kernel.
    pub fn fragment_source(&self) -> String {
        format!(
            r#"#version 150 core
in vec2 Texcoord;
out vec4 outColor;
uniform sampler2D texFramebuffer;
const float blurSizeH = {h:?};
const float blurSizeV = {v:?};
void main()
{{
    vec4 sum = vec4(0.0);
    for (int x = -{r}; x <= {r}; x++)
        for (int y = -{r}; y <= {r}; y++)
            sum += texture(texFramebuffer, vec2(Texcoord.x + float(x) * blurSizeH, Texcoord.y + float(y) * blurSizeV)) / {n}.0;
    outColor = sum;
}}
"#,
            h = self.step_h,
            v = self.step_v,
            r = self.radius,
            n = self.sample_count(),
        )
    }

    /// Blurs `image` on the CPU with nearest-texel sampling and clamp-to-edge
    /// addressing, matching what the GPU pass computes for texel centers.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let offsets: Vec<Vec2> = self.offsets().collect();
        let weight = self.weight();

        RgbImage::from_fn(width, height, |px, py| {
            let center = Vec2::new(
                (px as f32 + 0.5) / width as f32,
                (py as f32 + 0.5) / height as f32,
            );
            let mut sum = [0.0f32; 3];
            for offset in &offsets {
                let uv = center + *offset;
                let tx = texel(uv.x, width);
                let ty = texel(uv.y, height);
                let sample = image.get_pixel(tx, ty);
                for (acc, channel) in sum.iter_mut().zip(sample.0) {
                    *acc += channel as f32 * weight;
                }
            }
            image::Rgb(sum.map(|c| c.round().clamp(0.0, 255.0) as u8))
        })
    }
}

fn texel(coord: f32, extent: u32) -> u32 {
    ((coord * extent as f32).floor().max(0.0) as u32).min(extent - 1)
}
