use crate::camera::Pose;
use crate::config::Config;
use crate::level::{Level, TileKind};

/// Level plus player state. The level is fixed after load; only the pose
/// changes, and only between frames.
pub struct Game {
    pub level: Level,
    pub pose: Pose,
    exit_requested: bool,
}

impl Game {
    pub fn new(level: Level, config: &Config) -> Self {
        let pose = Pose::spawn(
            level.spawn,
            config.spawn_offset,
            config.spawn_dir,
            config.fov_plane,
        );
        Self {
            level,
            pose,
            exit_requested: false,
        }
    }

    /// Positive speeds walk forward, negative walk backward.
    pub fn handle_move(&mut self, signed_speed: f64) {
        self.pose.advance(&self.level.grid, signed_speed);
    }

    /// Positive angles turn right.
    pub fn handle_rotate(&mut self, angle: f64) {
        self.pose.rotate(angle);
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    pub fn on_exit_tile(&self) -> bool {
        let (x, y) = self.pose.cell();
        self.level.grid.get(x, y) == Some(TileKind::Exit)
    }
}
