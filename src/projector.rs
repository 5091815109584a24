use crate::config::Config;
use crate::level::TileKind;
use crate::raycaster::{RayHit, Side};

/// Hits closer than this are treated as this close.
const MIN_DISTANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Integer halving of every channel, for faces in shadow.
    #[inline]
    pub fn halved(self) -> Self {
        Self::new(self.r / 2, self.g / 2, self.b / 2)
    }

    /// 0RGB, as softbuffer expects
    #[inline]
    pub fn pack(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }
}

pub fn tile_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Wall => Rgb::new(100, 100, 100),
        TileKind::Enemy => Rgb::new(58, 231, 144),
        TileKind::Exit => Rgb::new(95, 158, 160),
        TileKind::PlayerStart => Rgb::new(218, 165, 32),
        TileKind::Empty => Rgb::new(200, 200, 200),
    }
}

/// One vertical run of pixels, rows `start_y..end_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSlice {
    pub column: usize,
    pub start_y: usize,
    pub end_y: usize,
    pub color: Rgb,
}

pub struct ColumnProjector {
    screen_height: usize,
    wall_height_factor: f64,
}

impl ColumnProjector {
    pub fn new(config: &Config) -> Self {
        Self {
            screen_height: config.screen_height,
            wall_height_factor: config.wall_height_factor,
        }
    }

    /// Projected height in pixels of a one-tile-tall object at `distance`.
    #[inline]
    pub fn line_height(&self, distance: f64) -> i64 {
        (self.screen_height as f64 / distance.max(MIN_DISTANCE)) as i64
    }

    pub fn project(&self, hit: &RayHit, column: usize) -> ScreenSlice {
        let h = self.screen_height as i64;
        let mut line_height = self.line_height(hit.distance);
        let mut draw_start = h / 2 - line_height / 2;
        let draw_end = h / 2 + line_height / 2;

        if hit.kind == TileKind::Wall {
            // taller walls, bottom edge kept on the floor line
            line_height = (line_height as f64 * self.wall_height_factor) as i64;
            draw_start = draw_end - line_height;
        }

        let mut color = tile_color(hit.kind);
        if hit.side == Side::Y {
            color = color.halved();
        }

        ScreenSlice {
            column,
            start_y: draw_start.max(0) as usize,
            end_y: draw_end.min(h - 1) as usize,
            color,
        }
    }
}
