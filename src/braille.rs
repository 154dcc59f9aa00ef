use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

pub const DOTS_PER_CELL_X: usize = 2;
pub const DOTS_PER_CELL_Y: usize = 4;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Dot raster at Braille resolution; each dot is empty or carries a colour
#[derive(Debug, Clone, PartialEq)]
pub struct DotGrid {
    pub width: usize,
    pub height: usize,
    dots: Vec<Option<[u8; 3]>>,
}

impl DotGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![None; width * height],
        }
    }

    /// Grid covering a canvas of terminal cells
    pub fn for_cells(cells_w: u16, cells_h: u16) -> Self {
        let (w, h) = dot_size(cells_w, cells_h);
        Self::new(w, h)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, color: [u8; 3]) {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x] = Some(color);
        }
    }

    /// Clear dots in [x0, x1) x [y0, y1), clipped to the grid
    pub fn clear_region(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0.min(y1)..y1 {
            self.dots[y * self.width + x0.min(x1)..y * self.width + x1].fill(None);
        }
    }

    pub fn filled(&self) -> usize {
        self.dots.iter().filter(|d| d.is_some()).count()
    }

    /// Encode the grid as Braille characters, averaging dot colours per cell
    pub fn to_cells(&self) -> Vec<BrailleCell> {
        let cells_w = self.width.div_ceil(DOTS_PER_CELL_X);
        let cells_h = self.height.div_ceil(DOTS_PER_CELL_Y);
        let mut cells = Vec::new();

        for cy in 0..cells_h {
            for cx in 0..cells_w {
                let mut pattern: u8 = 0;
                let mut sum = [0u32; 3];
                let mut dot_count: u32 = 0;

                let base_x = cx * DOTS_PER_CELL_X;
                let base_y = cy * DOTS_PER_CELL_Y;

                for dx in 0..DOTS_PER_CELL_X {
                    for dy in 0..DOTS_PER_CELL_Y {
                        if let Some([r, g, b]) = self.get(base_x + dx, base_y + dy) {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            sum[0] += r as u32;
                            sum[1] += g as u32;
                            sum[2] += b as u32;
                            dot_count += 1;
                        }
                    }
                }

                // Only emit cells that have at least one dot
                if pattern != 0 {
                    let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    let color = Color::Rgb(
                        (sum[0] / dot_count) as u8,
                        (sum[1] / dot_count) as u8,
                        (sum[2] / dot_count) as u8,
                    );
                    cells.push(BrailleCell {
                        x: cx as u16,
                        y: cy as u16,
                        char: braille_char,
                        color,
                    });
                }
            }
        }

        cells
    }
}

/// Dot resolution for a canvas of terminal cells
pub fn dot_size(cells_w: u16, cells_h: u16) -> (usize, usize) {
    (
        cells_w as usize * DOTS_PER_CELL_X,
        cells_h as usize * DOTS_PER_CELL_Y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_empty_grid_has_no_cells() {
        let grid = DotGrid::for_cells(10, 5);
        assert_eq!(grid.width, 20);
        assert_eq!(grid.height, 20);
        assert!(grid.to_cells().is_empty());
    }

    #[test]
    fn test_full_cell_and_colour_average() {
        let mut grid = DotGrid::for_cells(2, 1);
        for dx in 0..2 {
            for dy in 0..4 {
                let shade = if dy < 2 { 100 } else { 200 };
                grid.set(2 + dx, dy, [shade, 0, 50]);
            }
        }
        let cells = grid.to_cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, 1);
        assert_eq!(cells[0].char, '\u{28FF}');
        assert_eq!(cells[0].color, Color::Rgb(150, 0, 50));
    }

    #[test]
    fn test_clear_region_clips() {
        let mut grid = DotGrid::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                grid.set(x, y, [1, 1, 1]);
            }
        }
        grid.clear_region(2, 2, 10, 10);
        assert_eq!(grid.filled(), 12);
        assert_eq!(grid.get(3, 3), None);
        assert_eq!(grid.get(1, 3), Some([1, 1, 1]));
    }

    #[test]
    fn test_out_of_bounds_access_is_ignored() {
        let mut grid = DotGrid::new(2, 2);
        grid.set(5, 5, [9, 9, 9]);
        assert_eq!(grid.filled(), 0);
        assert_eq!(grid.get(5, 5), None);
    }
}
