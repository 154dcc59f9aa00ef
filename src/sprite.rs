use image::imageops::FilterType;
use std::path::Path;

/// Sprites larger than this are downscaled on load; a terminal never needs more
const MAX_SPRITE_DIM: u32 = 96;

/// Texels with alpha below this are treated as transparent
const ALPHA_THRESHOLD: u8 = 128;

const BUILTIN_DIM: u32 = 48;
const BANANA_YELLOW: [u8; 4] = [255, 225, 53, 255];
const BANANA_TIP: [u8; 4] = [139, 90, 43, 255];

/// Decoded RGBA raster handed to the draw step
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    texels: Vec<[u8; 4]>,
}

impl Sprite {
    pub fn from_rgba(width: u32, height: u32, texels: Vec<[u8; 4]>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("Sprite has zero size".to_string());
        }
        if texels.len() != (width * height) as usize {
            return Err(format!(
                "Sprite texel count {} does not match {}x{}",
                texels.len(),
                width,
                height
            ));
        }
        Ok(Self { width, height, texels })
    }

    /// Load and decode an image file, downscaling large images
    pub fn load(path: &Path) -> Result<Self, String> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to load sprite {}: {}", path.display(), e))?
            .to_rgba8();

        let (w, h) = img.dimensions();
        let img = if w > MAX_SPRITE_DIM || h > MAX_SPRITE_DIM {
            let ratio = MAX_SPRITE_DIM as f32 / w.max(h) as f32;
            let nw = ((w as f32 * ratio).round() as u32).max(1);
            let nh = ((h as f32 * ratio).round() as u32).max(1);
            image::imageops::resize(&img, nw, nh, FilterType::Triangle)
        } else {
            img
        };

        let (w, h) = img.dimensions();
        let texels = img.pixels().map(|p| p.0).collect();
        let sprite = Self::from_rgba(w, h, texels)?;
        let coverage = sprite.coverage();
        if coverage == 0.0 {
            return Err(format!("Sprite {} is fully transparent", path.display()));
        }
        log::info!(
            "Loaded sprite {} ({}x{}, {:.0}% opaque)",
            path.display(),
            w,
            h,
            coverage * 100.0
        );
        Ok(sprite)
    }

    /// Procedural crescent banana with brown tips
    pub fn builtin() -> Self {
        let dim = BUILTIN_DIM;
        let mut texels = Vec::with_capacity((dim * dim) as usize);
        for py in 0..dim {
            for px in 0..dim {
                let u = (px as f32 + 0.5) / dim as f32;
                let v = (py as f32 + 0.5) / dim as f32;
                // Crescent: inside the lower circle, outside the upper one
                let outer = (u - 0.5).powi(2) + v.powi(2) < 0.62 * 0.62;
                let inner = (u - 0.5).powi(2) + (v + 0.22).powi(2) < 0.66 * 0.66;
                let texel = if outer && !inner {
                    if !(0.08..=0.92).contains(&u) {
                        BANANA_TIP
                    } else {
                        BANANA_YELLOW
                    }
                } else {
                    [0, 0, 0, 0]
                };
                texels.push(texel);
            }
        }
        Self {
            width: dim,
            height: dim,
            texels,
        }
    }

    /// Colour at normalised coordinates, or None when transparent or outside
    pub fn sample(&self, u: f32, v: f32) -> Option<[u8; 3]> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let [r, g, b, a] = self.texels[(y * self.width + x) as usize];
        if a >= ALPHA_THRESHOLD {
            Some([r, g, b])
        } else {
            None
        }
    }

    /// Fraction of opaque texels
    pub fn coverage(&self) -> f32 {
        let opaque = self.texels.iter().filter(|t| t[3] >= ALPHA_THRESHOLD).count();
        opaque as f32 / self.texels.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_a_crescent() {
        let sprite = Sprite::builtin();
        // Middle of the arc is filled, the area above it is empty
        assert_eq!(sprite.sample(0.5, 0.52), Some([255, 225, 53]));
        assert_eq!(sprite.sample(0.5, 0.2), None);
        assert_eq!(sprite.sample(0.5, 0.9), None);
        let coverage = sprite.coverage();
        assert!(coverage > 0.05 && coverage < 0.5, "coverage {}", coverage);
    }

    #[test]
    fn test_builtin_tips_are_brown() {
        let sprite = Sprite::builtin();
        assert_eq!(sprite.sample(0.03, 0.33), Some([139, 90, 43]));
    }

    #[test]
    fn test_sample_out_of_range() {
        let sprite = Sprite::builtin();
        assert_eq!(sprite.sample(-0.1, 0.5), None);
        assert_eq!(sprite.sample(0.5, 1.0), None);
    }

    #[test]
    fn test_from_rgba_validates_size() {
        assert!(Sprite::from_rgba(0, 4, vec![]).is_err());
        assert!(Sprite::from_rgba(2, 2, vec![[0; 4]; 3]).is_err());
        assert!(Sprite::from_rgba(2, 2, vec![[255; 4]; 4]).is_ok());
    }

    #[test]
    fn test_load_png_and_downscale() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let img = image::RgbaImage::from_pixel(200, 100, image::Rgba([10, 20, 30, 255]));
        img.save(file.path()).unwrap();

        let sprite = Sprite::load(file.path()).unwrap();
        assert_eq!(sprite.width, 96);
        assert_eq!(sprite.height, 48);
        assert_eq!(sprite.sample(0.5, 0.5), Some([10, 20, 30]));
    }

    #[test]
    fn test_load_rejects_transparent_image() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 0]));
        img.save(file.path()).unwrap();
        assert!(Sprite::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Sprite::load(Path::new("/nonexistent/banana.png")).is_err());
    }
}
