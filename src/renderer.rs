use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::camera::Pose;
use crate::config::Config;
use crate::error::CastError;
use crate::level::{Enemy, TileGrid};
use crate::minimap::Minimap;
use crate::projector::{ColumnProjector, Rgb, ScreenSlice};
use crate::raycaster::cast_ray;

const CEILING: Rgb = Rgb::new(160, 227, 254);
const FLOOR: Rgb = Rgb::new(30, 30, 30);

/// Paints whole frames into a fixed-size 0RGB framebuffer.
pub struct FrameCompositor {
    width: usize,
    height: usize,
    projector: ColumnProjector,
    minimap: Minimap,
}

impl FrameCompositor {
    pub fn new(config: &Config, grid: &TileGrid) -> Self {
        Self {
            width: config.screen_width,
            height: config.screen_height,
            projector: ColumnProjector::new(config),
            minimap: Minimap::new(grid, config.minimap_scale, config.minimap_margin),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn render(
        &self,
        buf: &mut [u32],
        grid: &TileGrid,
        pose: &Pose,
        enemies: &[Enemy],
    ) -> Result<(), CastError> {
        let (width, height) = (self.width, self.height);
        debug_assert_eq!(buf.len(), width * height);

        let (ceiling, floor) = buf.split_at_mut((height / 2) * width);
        ceiling.fill(CEILING.pack());
        floor.fill(FLOOR.pack());

        // Columns only read the grid and this frame's pose, so they can be
        // cast in parallel; painting stays sequential.
        let columns = (0..width)
            .into_par_iter()
            .map(|x| self.column_slices(grid, pose, x))
            .collect::<Result<Vec<_>, _>>()?;

        for slice in columns.iter().flatten() {
            paint_slice(buf, width, slice);
        }

        self.minimap.draw(buf, width, height, pose, enemies);
        Ok(())
    }

    /// Slices for one column, farthest first so nearer ones overpaint them.
    fn column_slices(
        &self,
        grid: &TileGrid,
        pose: &Pose,
        column: usize,
    ) -> Result<Vec<ScreenSlice>, CastError> {
        let hits = cast_ray(grid, pose, pose.ray_dir(column, self.width))?;
        Ok(hits
            .iter()
            .rev()
            .map(|hit| self.projector.project(hit, column))
            .collect())
    }
}

fn paint_slice(buf: &mut [u32], width: usize, slice: &ScreenSlice) {
    let color = slice.color.pack();
    let mut idx = slice.start_y * width + slice.column;
    for _y in slice.start_y..slice.end_y {
        buf[idx] = color;
        idx += width;
    }
}
