//! Pre-decoded height images and color textures
//!
//! Images are decoded once when configuration is loaded; sampling works on
//! in-memory float data only, keeping disk I/O off the generation path.

use std::path::Path;

use terra_core::{Color, Result, TerraError};

/// A grayscale height image with bilinear sampling
#[derive(Clone, Debug)]
pub struct HeightImage {
    /// Row-major height values normalized to [0..1]
    samples: Vec<f32>,
    width: u32,
    height: u32,
}

impl HeightImage {
    /// Decode a grayscale image file. Values are normalized to [0..1]
    /// regardless of bit depth.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            TerraError::ImageError(format!("failed to load '{}': {}", path.display(), e))
        })?;

        let gray = img.into_luma16();
        let width = gray.width();
        let height = gray.height();
        if width < 2 || height < 2 {
            return Err(TerraError::ImageError(format!(
                "height image '{}' must be at least 2x2 pixels",
                path.display()
            )));
        }

        let samples: Vec<f32> = gray.pixels().map(|p| p.0[0] as f32 / 65535.0).collect();

        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// Create from raw float data (for testing)
    pub fn from_raw(samples: Vec<f32>, width: u32, height: u32) -> Self {
        assert!(width >= 2 && height >= 2);
        assert_eq!(samples.len(), (width * height) as usize);
        Self {
            samples,
            width,
            height,
        }
    }

    /// Bilinear sample at normalized UV coordinates, clamped to [0, 1].
    /// Returns an interpolated value in [0..1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fy = v * (self.height - 1) as f32;

        let x0 = (fx as u32).min(self.width - 2);
        let y0 = (fy as u32).min(self.height - 2);

        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let h00 = self.get(x0, y0);
        let h10 = self.get(x0 + 1, y0);
        let h01 = self.get(x0, y0 + 1);
        let h11 = self.get(x0 + 1, y0 + 1);

        let a = h00 * (1.0 - tx) + h10 * tx;
        let b = h01 * (1.0 - tx) + h11 * tx;
        a * (1.0 - ty) + b * ty
    }

    fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[(y * self.width + x) as usize]
    }
}

/// An RGBA texture sampled for zone vertex colors
#[derive(Clone, Debug)]
pub struct ColorTexture {
    /// Row-major RGBA values in [0..1]
    texels: Vec<[f32; 4]>,
    width: u32,
    height: u32,
}

impl ColorTexture {
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            TerraError::ImageError(format!("failed to load '{}': {}", path.display(), e))
        })?;

        let rgba = img.into_rgba8();
        let width = rgba.width();
        let height = rgba.height();
        if width < 2 || height < 2 {
            return Err(TerraError::ImageError(format!(
                "texture '{}' must be at least 2x2 pixels",
                path.display()
            )));
        }

        let texels: Vec<[f32; 4]> = rgba
            .pixels()
            .map(|p| {
                [
                    p.0[0] as f32 / 255.0,
                    p.0[1] as f32 / 255.0,
                    p.0[2] as f32 / 255.0,
                    p.0[3] as f32 / 255.0,
                ]
            })
            .collect();

        Ok(Self {
            texels,
            width,
            height,
        })
    }

    /// Create from raw texel data (for testing)
    pub fn from_raw(texels: Vec<[f32; 4]>, width: u32, height: u32) -> Self {
        assert!(width >= 2 && height >= 2);
        assert_eq!(texels.len(), (width * height) as usize);
        Self {
            texels,
            width,
            height,
        }
    }

    /// Bilinear sample at normalized UV coordinates, clamped to [0, 1]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fy = v * (self.height - 1) as f32;

        let x0 = (fx as u32).min(self.width - 2);
        let y0 = (fy as u32).min(self.height - 2);

        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let mut out = [0.0f32; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            let c00 = self.get(x0, y0)[i];
            let c10 = self.get(x0 + 1, y0)[i];
            let c01 = self.get(x0, y0 + 1)[i];
            let c11 = self.get(x0 + 1, y0 + 1)[i];
            let a = c00 * (1.0 - tx) + c10 * tx;
            let b = c01 * (1.0 - tx) + c11 * tx;
            *channel = a * (1.0 - ty) + b * ty;
        }

        Color::new(out[0], out[1], out[2], out[3])
    }

    fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_sampling_interpolates() {
        // 3x3 image: center pixel is 1.0, edges are 0.0
        let samples = vec![
            0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0,
        ];
        let img = HeightImage::from_raw(samples, 3, 3);

        assert!((img.sample(0.5, 0.5) - 1.0).abs() < 0.01);
        assert!(img.sample(0.0, 0.0).abs() < 0.01);
        // halfway between edge and center
        let mid = img.sample(0.25, 0.5);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn out_of_range_uv_clamps_to_border() {
        let img = HeightImage::from_raw(vec![0.25; 4], 2, 2);
        assert_eq!(img.sample(-3.0, 0.5), 0.25);
        assert_eq!(img.sample(0.5, 42.0), 0.25);
    }

    #[test]
    fn color_sampling_blends_channels() {
        let texels = vec![
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
        ];
        let tex = ColorTexture::from_raw(texels, 2, 2);

        let mid = tex.sample(0.5, 0.5);
        assert!((mid.r - 0.5).abs() < 0.01);
        assert!((mid.b - 0.5).abs() < 0.01);
        assert_eq!(mid.g, 0.0);
    }
}
