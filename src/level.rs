use crate::config::Config;
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Empty,
    Wall,
    Enemy,
    Exit,
    PlayerStart,
}

impl TileKind {
    /// Exact color match, one pixel per tile.
    pub fn from_rgb(rgb: [u8; 3]) -> Option<Self> {
        match rgb {
            [255, 255, 255] => Some(TileKind::Empty),
            [0, 0, 0] => Some(TileKind::Wall),
            [255, 0, 0] => Some(TileKind::Enemy),
            [0, 255, 0] => Some(TileKind::Exit),
            [0, 0, 255] => Some(TileKind::PlayerStart),
            _ => None,
        }
    }

    #[inline]
    pub fn blocks_movement(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::Enemy)
    }
}

/// Immutable, wall-bounded grid of tiles addressed by (column, row).
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>, // row-major
}

impl TileGrid {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Callers must stay inside the grid; use [`TileGrid::get`] when unsure.
    #[inline]
    pub fn kind_at(&self, col: usize, row: usize) -> TileKind {
        assert!(
            col < self.width && row < self.height,
            "tile ({}, {}) outside {}x{} grid",
            col,
            row,
            self.width,
            self.height
        );
        self.tiles[row * self.width + col]
    }

    /// Checked lookup for signed cell coordinates.
    #[inline]
    pub fn get(&self, col: i64, row: i64) -> Option<TileKind> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(self.tiles[row as usize * self.width + col as usize])
    }

    fn check_border(&self) -> Result<(), LoadError> {
        let (w, h) = (self.width, self.height);
        let border = (0..w)
            .flat_map(|x| [(x, 0), (x, h - 1)])
            .chain((0..h).flat_map(|y| [(0, y), (w - 1, y)]));
        for (x, y) in border {
            if self.kind_at(x, y) != TileKind::Wall {
                return Err(LoadError::OpenBorder { x, y });
            }
        }
        Ok(())
    }
}

/// Static enemy placement. Stored at the tile centre (cell + 0.5) rather
/// than the tile corner, so minimap markers sit in the middle of the tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
}

pub struct Level {
    pub grid: TileGrid,
    pub enemies: Vec<Enemy>,
    pub spawn: (usize, usize), // player start cell
}

impl Level {
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        Self::from_image_bytes(config.level)
    }

    /// Decode a color-coded image where each pixel is one tile.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)?.to_rgb8();

        let rows = img
            .rows()
            .enumerate()
            .map(|(y, row)| {
                row.enumerate()
                    .map(|(x, px)| {
                        TileKind::from_rgb(px.0).ok_or(LoadError::UnknownColor { x, y, rgb: px.0 })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(rows)
    }

    /// Validate a tile matrix and split out the player start and enemies.
    pub fn from_rows(rows: Vec<Vec<TileKind>>) -> Result<Self, LoadError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 || height == 0 {
            return Err(LoadError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut spawn: Option<(usize, usize)> = None;
        let mut enemies = Vec::new();

        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(LoadError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, kind) in row.into_iter().enumerate() {
                match kind {
                    TileKind::PlayerStart => {
                        if let Some(first) = spawn {
                            return Err(LoadError::DuplicatePlayerStart {
                                first,
                                second: (x, y),
                            });
                        }
                        spawn = Some((x, y));
                        // the player must not see itself
                        tiles.push(TileKind::Empty);
                        continue;
                    }
                    TileKind::Enemy => enemies.push(Enemy {
                        x: x as f64 + 0.5,
                        y: y as f64 + 0.5,
                    }),
                    _ => {}
                }
                tiles.push(kind);
            }
        }

        let grid = TileGrid {
            width,
            height,
            tiles,
        };
        grid.check_border()?;
        let spawn = spawn.ok_or(LoadError::MissingPlayerStart)?;

        log::info!(
            "loaded {}x{} level: {} enemies, player start at ({}, {})",
            width,
            height,
            enemies.len(),
            spawn.0,
            spawn.1
        );

        Ok(Self {
            grid,
            enemies,
            spawn,
        })
    }
}

#[cfg(test)]
pub(crate) fn ascii_rows(rows: &[&str]) -> Vec<Vec<TileKind>> {
    rows.iter()
        .map(|r| {
            r.chars()
                .map(|c| match c {
                    '#' => TileKind::Wall,
                    'E' => TileKind::Enemy,
                    'X' => TileKind::Exit,
                    'P' => TileKind::PlayerStart,
                    _ => TileKind::Empty,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn ascii_level(rows: &[&str]) -> Level {
    Level::from_rows(ascii_rows(rows)).expect("valid test level")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];
    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn png_from(rows: &[&[[u8; 3]]]) -> Vec<u8> {
        let img = RgbImage::from_fn(rows[0].len() as u32, rows.len() as u32, |x, y| {
            Rgb(rows[y as usize][x as usize])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_color_coded_image() {
        let png = png_from(&[
            &[BLACK, BLACK, BLACK, BLACK, BLACK],
            &[BLACK, BLUE, WHITE, GREEN, BLACK],
            &[BLACK, WHITE, RED, WHITE, BLACK],
            &[BLACK, BLACK, BLACK, BLACK, BLACK],
        ]);
        let level = Level::from_image_bytes(&png).unwrap();

        assert_eq!(level.grid.width(), 5);
        assert_eq!(level.grid.height(), 4);
        assert_eq!(level.spawn, (1, 1));
        assert_eq!(level.grid.kind_at(1, 1), TileKind::Empty);
        assert_eq!(level.grid.kind_at(3, 1), TileKind::Exit);
        assert_eq!(level.grid.kind_at(2, 2), TileKind::Enemy);
        assert_eq!(level.enemies, vec![Enemy { x: 2.5, y: 2.5 }]);
    }

    #[test]
    fn rejects_unknown_color() {
        let gray = [128, 128, 128];
        let png = png_from(&[
            &[BLACK, BLACK, BLACK],
            &[BLACK, gray, BLACK],
            &[BLACK, BLACK, BLACK],
        ]);
        assert_eq!(
            Level::from_image_bytes(&png).err(),
            Some(LoadError::UnknownColor {
                x: 1,
                y: 1,
                rgb: gray
            })
        );
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(matches!(
            Level::from_image_bytes(b"not an image"),
            Err(LoadError::Decode(_))
        ));
    }

    #[test]
    fn rejects_missing_and_duplicate_player_start() {
        let missing = Level::from_rows(ascii_rows(&["###", "#.#", "###"]));
        assert_eq!(missing.err(), Some(LoadError::MissingPlayerStart));

        let duplicate = Level::from_rows(ascii_rows(&["####", "#PP#", "####"]));
        assert_eq!(
            duplicate.err(),
            Some(LoadError::DuplicatePlayerStart {
                first: (1, 1),
                second: (2, 1)
            })
        );
    }

    #[test]
    fn rejects_open_border() {
        let open = Level::from_rows(ascii_rows(&["####", "#P..", "####"]));
        assert_eq!(open.err(), Some(LoadError::OpenBorder { x: 3, y: 1 }));

        // a player start on the border turns into empty space
        let spawn_on_edge = Level::from_rows(ascii_rows(&["#P##", "#..#", "####"]));
        assert_eq!(spawn_on_edge.err(), Some(LoadError::OpenBorder { x: 1, y: 0 }));
    }

    #[test]
    fn rejects_ragged_and_empty_rows() {
        let ragged = Level::from_rows(ascii_rows(&["####", "#P#", "####"]));
        assert_eq!(
            ragged.err(),
            Some(LoadError::Ragged {
                row: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(Level::from_rows(Vec::new()).err(), Some(LoadError::Empty));
    }

    #[test]
    fn validated_grids_have_wall_borders() {
        let level = ascii_level(&["#####", "#P..#", "#.E.#", "#..X#", "#####"]);
        let g = &level.grid;
        for x in 0..g.width() {
            assert_eq!(g.kind_at(x, 0), TileKind::Wall);
            assert_eq!(g.kind_at(x, g.height() - 1), TileKind::Wall);
        }
        for y in 0..g.height() {
            assert_eq!(g.kind_at(0, y), TileKind::Wall);
            assert_eq!(g.kind_at(g.width() - 1, y), TileKind::Wall);
        }
    }

    #[test]
    fn checked_lookup_outside_grid() {
        let level = ascii_level(&["###", "#P#", "###"]);
        assert_eq!(level.grid.get(-1, 0), None);
        assert_eq!(level.grid.get(0, 3), None);
        assert_eq!(level.grid.get(2, 2), Some(TileKind::Wall));
    }

    #[test]
    fn embedded_level_loads() {
        let level = Level::load(&Config::default()).unwrap();
        assert_eq!(level.grid.width(), 24);
        assert_eq!(level.grid.height(), 24);
        assert_eq!(level.spawn, (1, 1));
        assert_eq!(level.enemies.len(), 3);
    }
}
