use crate::camera::Pose;
use crate::error::CastError;
use crate::level::{TileGrid, TileKind};

/// Which family of grid lines the ray crossed to enter the hit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X, // stepped along x, hit a face perpendicular to the x axis
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub kind: TileKind,
    pub distance: f64, // perpendicular to the camera plane
    pub side: Side,
}

/// Per-axis DDA state.
struct Axis {
    cell: i64,
    step: i64,
    side_dist: f64,
    delta_dist: f64,
}

impl Axis {
    fn new(pos: f64, ray: f64) -> Self {
        let cell = pos.floor() as i64;
        if ray == 0.0 {
            // parallel to this axis' grid lines, never crosses one
            return Self {
                cell,
                step: 0,
                side_dist: f64::INFINITY,
                delta_dist: f64::INFINITY,
            };
        }

        let delta_dist = (1.0 / ray).abs();
        let (step, side_dist) = if ray < 0.0 {
            (-1, (pos - cell as f64) * delta_dist)
        } else {
            (1, (cell as f64 + 1.0 - pos) * delta_dist)
        };
        Self {
            cell,
            step,
            side_dist,
            delta_dist,
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.side_dist += self.delta_dist;
        self.cell += self.step;
    }

    /// Distance along the ray to the face just crossed on this axis.
    #[inline]
    fn perp_distance(&self, pos: f64, ray: f64) -> f64 {
        (self.cell as f64 - pos + (1 - self.step) as f64 / 2.0) / ray
    }
}

/// Walk the grid from the pose along `ray` and collect every non-empty
/// cell, nearest first, ending with the first wall.
pub fn cast_ray(grid: &TileGrid, pose: &Pose, ray: [f64; 2]) -> Result<Vec<RayHit>, CastError> {
    if ray[0] == 0.0 && ray[1] == 0.0 {
        return Err(CastError::DegenerateRay);
    }

    let mut x = Axis::new(pose.pos[0], ray[0]);
    let mut y = Axis::new(pose.pos[1], ray[1]);

    if grid.get(x.cell, y.cell).is_none() {
        return Err(CastError::OutOfBounds {
            x: x.cell,
            y: y.cell,
        });
    }

    let mut hits = Vec::new();
    loop {
        let side = if x.side_dist < y.side_dist {
            x.advance();
            Side::X
        } else {
            y.advance();
            Side::Y
        };

        let kind = grid.get(x.cell, y.cell).ok_or(CastError::OutOfBounds {
            x: x.cell,
            y: y.cell,
        })?;
        if kind == TileKind::Empty {
            continue;
        }

        let distance = match side {
            Side::X => x.perp_distance(pose.pos[0], ray[0]),
            Side::Y => y.perp_distance(pose.pos[1], ray[1]),
        };
        hits.push(RayHit {
            kind,
            distance,
            side,
        });

        if kind == TileKind::Wall {
            return Ok(hits);
        }
    }
}
