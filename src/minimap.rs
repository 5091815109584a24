use crate::camera::Pose;
use crate::level::{Enemy, TileGrid, TileKind};
use crate::projector::Rgb;

const WALL: Rgb = Rgb::new(50, 50, 50);
const FLOOR: Rgb = Rgb::new(140, 140, 140);
const PLAYER: Rgb = Rgb::new(255, 0, 0);
const ENEMY: Rgb = Rgb::new(0, 255, 0);
const MARKER_RADIUS: i64 = 2;

/// Top-down thumbnail of the level. Tiles never change after load, so the
/// tile image is drawn once and only the markers are redrawn per frame.
pub struct Minimap {
    pixels: Vec<u32>,
    width: usize,
    scale: usize,
    margin: usize,
}

impl Minimap {
    pub fn new(grid: &TileGrid, scale: usize, margin: usize) -> Self {
        let width = grid.width() * scale;
        let mut pixels = vec![0; width * grid.height() * scale];

        for (y, row) in pixels.chunks_mut(width).enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                let color = match grid.kind_at(x / scale, y / scale) {
                    TileKind::Wall => WALL,
                    _ => FLOOR,
                };
                *px = color.pack();
            }
        }

        Self {
            pixels,
            width,
            scale,
            margin,
        }
    }

    /// Top-left corner on a `buf_w` wide screen, anchored top-right.
    fn origin(&self, buf_w: usize) -> (i64, i64) {
        (
            buf_w as i64 - self.width as i64 - self.margin as i64,
            self.margin as i64,
        )
    }

    pub fn draw(
        &self,
        buf: &mut [u32],
        buf_w: usize,
        buf_h: usize,
        pose: &Pose,
        enemies: &[Enemy],
    ) {
        let (ox, oy) = self.origin(buf_w);

        for (y, row) in self.pixels.chunks(self.width).enumerate() {
            let dy = oy + y as i64;
            if dy < 0 || dy >= buf_h as i64 {
                continue;
            }
            // clip horizontally against the buffer
            let skip = (-ox).max(0) as usize;
            let first = (ox + skip as i64) as usize;
            if skip >= row.len() || first >= buf_w {
                continue;
            }
            let n = (row.len() - skip).min(buf_w - first);
            let dst = dy as usize * buf_w + first;
            buf[dst..dst + n].copy_from_slice(&row[skip..skip + n]);
        }

        let to_screen = |x: f64, y: f64| {
            (
                ox + (x * self.scale as f64) as i64,
                oy + (y * self.scale as f64) as i64,
            )
        };

        let (px, py) = to_screen(pose.pos[0], pose.pos[1]);
        fill_circle(buf, buf_w, buf_h, px, py, MARKER_RADIUS, PLAYER.pack());
        for enemy in enemies {
            let (ex, ey) = to_screen(enemy.x, enemy.y);
            fill_circle(buf, buf_w, buf_h, ex, ey, MARKER_RADIUS, ENEMY.pack());
        }
    }
}

fn fill_circle(buf: &mut [u32], w: usize, h: usize, cx: i64, cy: i64, r: i64, color: u32) {
    for y in (cy - r).max(0)..=(cy + r).min(h as i64 - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w as i64 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                buf[y as usize * w + x as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ascii_level;

    #[test]
    fn prerenders_tiles_at_scale() {
        let level = ascii_level(&["####", "#P.#", "####"]);
        let map = Minimap::new(&level.grid, 4, 10);
        assert_eq!((map.width, map.pixels.len()), (16, 16 * 12));
        assert_eq!(map.pixels[0], WALL.pack());
        // first pixel of tile (1, 1)
        assert_eq!(map.pixels[4 * 16 + 4], FLOOR.pack());
        assert_eq!(map.pixels[7 * 16 + 11], FLOOR.pack());
        assert_eq!(map.pixels[7 * 16 + 12], WALL.pack());
    }

    #[test]
    fn draws_in_top_right_corner_with_markers() {
        let level = ascii_level(&["#####", "#P..#", "#.E.#", "#####"]);
        let map = Minimap::new(&level.grid, 4, 10);
        let (w, h) = (100, 60);
        let mut buf = vec![0u32; w * h];
        let pose = Pose::new([1.5, 1.5], [1.0, 0.0], 0.66);

        map.draw(&mut buf, w, h, &pose, &level.enemies);

        let (ox, oy) = (100 - 20 - 10, 10);
        assert_eq!(buf[oy * w + ox], WALL.pack());
        assert_eq!(buf[oy * w + ox - 1], 0);
        assert_eq!(buf[(oy + 15) * w + ox + 19], WALL.pack());
        assert_eq!(buf[(oy + 15) * w + ox + 20], 0);
        assert_eq!(buf[(oy + 16) * w + ox], 0);

        // player at (1.5, 1.5) * 4 = (6, 6)
        assert_eq!(buf[(oy + 6) * w + ox + 6], PLAYER.pack());
        // enemy centred at (2.5, 2.5) * 4 = (10, 10)
        assert_eq!(buf[(oy + 10) * w + ox + 10], ENEMY.pack());
    }

    #[test]
    fn clips_when_wider_than_screen() {
        let level = ascii_level(&["######", "#P...#", "######"]);
        let map = Minimap::new(&level.grid, 4, 2);
        let (w, h) = (16, 8);
        let mut buf = vec![0u32; w * h];
        let pose = Pose::new([4.5, 1.5], [1.0, 0.0], 0.66);

        map.draw(&mut buf, w, h, &pose, &[]);

        // origin x = 16 - 24 - 2 = -10, so tile image column 10 lands on 0
        assert_eq!(buf[2 * w], map.pixels[10]);
        assert_eq!(buf[2 * w + 13], map.pixels[23]);
        assert_eq!(buf[2 * w + 14], 0);
    }
}
