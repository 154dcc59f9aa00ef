use crate::braille::{BrailleCell, DotGrid};
use crate::sprite::Sprite;
use glam::{Affine2, Vec2};

/// Determinants smaller than this are treated as a collapsed transform
const MIN_DETERMINANT: f32 = 1e-6;

/// 2-D drawing surface the frame driver renders into.
///
/// Coordinates are world pixels; transforms compose like a canvas context
/// (each call post-multiplies the current transform).
pub trait Surface {
    /// Current surface size in world pixels
    fn size(&self) -> (f32, f32);
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `radians`, clockwise on screen (y points down)
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Draw `sprite` stretched over the rectangle (x, y, w, h) in local coordinates
    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32);
}

/// Surface backed by a Braille dot grid.
///
/// `pixel_ratio` is the number of world pixels per dot, the terminal
/// counterpart of a device pixel ratio.
pub struct BrailleSurface {
    grid: DotGrid,
    pixel_ratio: f32,
    base: Affine2,
    current: Affine2,
    stack: Vec<Affine2>,
}

impl BrailleSurface {
    pub fn new(cells_w: u16, cells_h: u16, pixel_ratio: f32) -> Self {
        let pixel_ratio = pixel_ratio.max(f32::EPSILON);
        let base = Affine2::from_scale(Vec2::splat(1.0 / pixel_ratio));
        Self {
            grid: DotGrid::for_cells(cells_w, cells_h),
            pixel_ratio,
            base,
            current: base,
            stack: Vec::new(),
        }
    }

    /// Reallocate for a new canvas size; the contents are discarded
    pub fn resize(&mut self, cells_w: u16, cells_h: u16) {
        self.grid = DotGrid::for_cells(cells_w, cells_h);
        self.current = self.base;
        self.stack.clear();
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn grid(&self) -> &DotGrid {
        &self.grid
    }

    pub fn cells(&self) -> Vec<BrailleCell> {
        self.grid.to_cells()
    }

    /// Dot-space bounding box of a local rectangle, clipped to the grid
    fn dot_bounds(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(usize, usize, usize, usize)> {
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x, y + h),
            Vec2::new(x + w, y + h),
        ]
        .map(|c| self.current.transform_point2(c));

        let min = corners.iter().fold(Vec2::splat(f32::INFINITY), |acc, c| acc.min(*c));
        let max = corners.iter().fold(Vec2::splat(f32::NEG_INFINITY), |acc, c| acc.max(*c));
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.grid.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.grid.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

impl Surface for BrailleSurface {
    fn size(&self) -> (f32, f32) {
        (
            self.grid.width as f32 * self.pixel_ratio,
            self.grid.height as f32 * self.pixel_ratio,
        )
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if let Some((x0, y0, x1, y1)) = self.dot_bounds(x, y, w, h) {
            self.grid.clear_region(x0, y0, x1, y1);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.current = self.current * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.current = self.current * Affine2::from_angle(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.current = self.current * Affine2::from_scale(Vec2::new(sx, sy));
    }

    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 || self.current.matrix2.determinant().abs() < MIN_DETERMINANT {
            return;
        }
        // Fully off-surface images are culled here
        let Some((x0, y0, x1, y1)) = self.dot_bounds(x, y, w, h) else {
            return;
        };

        let inverse = self.current.inverse();
        for py in y0..y1 {
            for px in x0..x1 {
                let local = inverse.transform_point2(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                let u = (local.x - x) / w;
                let v = (local.y - y) / h;
                if let Some(color) = sprite.sample(u, v) {
                    self.grid.set(px, py, color);
                }
            }
        }
    }
}
