use crate::level::TileGrid;

/// Player position plus the direction and camera-plane vectors used to
/// build one ray per screen column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos: [f64; 2],   // (x, y) in grid space, y grows downward
    pub dir: [f64; 2],   // facing direction
    pub plane: [f64; 2], // camera plane, a quarter turn clockwise from dir
}

impl Pose {
    /// Facing `dir`, with a plane of length `fov_plane` relative to it.
    pub fn new(pos: [f64; 2], dir: [f64; 2], fov_plane: f64) -> Self {
        Self {
            pos,
            dir,
            plane: [-dir[1] * fov_plane, dir[0] * fov_plane],
        }
    }

    /// Place the player inside a spawn cell.
    pub fn spawn(cell: (usize, usize), offset: f64, dir: [f64; 2], fov_plane: f64) -> Self {
        let pos = [cell.0 as f64 + offset, cell.1 as f64 + offset];
        Self::new(pos, dir, fov_plane)
    }

    /// Ray direction through screen column `column` of `screen_width`.
    #[inline]
    pub fn ray_dir(&self, column: usize, screen_width: usize) -> [f64; 2] {
        let camera_x = 2.0 * column as f64 / screen_width as f64 - 1.0;
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }

    #[inline]
    pub fn cell(&self) -> (i64, i64) {
        (self.pos[0].floor() as i64, self.pos[1].floor() as i64)
    }

    /// Step along the facing direction. Each axis is tested on its own
    /// against the current position so the player slides along walls.
    pub fn advance(&mut self, grid: &TileGrid, speed: f64) {
        let next_x = self.pos[0] + self.dir[0] * speed;
        let next_y = self.pos[1] + self.dir[1] * speed;

        if !is_blocked(grid, next_x, self.pos[1]) {
            self.pos[0] = next_x;
        }
        if !is_blocked(grid, self.pos[0], next_y) {
            self.pos[1] = next_y;
        }
    }

    /// Rotate direction and plane together; positive angles turn right.
    pub fn rotate(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.dir = rotate_vec(self.dir, c, s);
        self.plane = rotate_vec(self.plane, c, s);
    }
}

#[inline]
fn rotate_vec(v: [f64; 2], c: f64, s: f64) -> [f64; 2] {
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

/// Outside the grid, a wall, or an enemy.
pub fn is_blocked(grid: &TileGrid, x: f64, y: f64) -> bool {
    if x < 0.0 || y < 0.0 {
        return true;
    }
    grid.get(x as i64, y as i64)
        .is_none_or(|kind| kind.blocks_movement())
}
