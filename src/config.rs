/// Level shipped inside the binary.
pub const EMBEDDED_LEVEL: &[u8] = include_bytes!("../assets/level-1.png");

/// Everything the loader, the simulation and the compositor need to know
/// about screen size, speeds and the level source.
#[derive(Clone, Debug)]
pub struct Config {
    pub screen_width: usize,
    pub screen_height: usize,

    pub move_speed: f64, // tiles per second
    pub rot_speed: f64,  // radians per second

    /// Walls are drawn this many times taller than their projected height.
    pub wall_height_factor: f64,

    pub fov_plane: f64,    // camera plane length relative to a unit direction
    pub spawn_offset: f64, // offset inside the player start cell, both axes
    pub spawn_dir: [f64; 2],

    pub minimap_scale: usize, // pixels per tile
    pub minimap_margin: usize,

    pub level: &'static [u8],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,

            move_speed: 4.8,
            rot_speed: 4.2,

            wall_height_factor: 2.0,

            fov_plane: 0.66,
            spawn_offset: 0.2,
            spawn_dir: [-1.0, 0.0], // west

            minimap_scale: 4,
            minimap_margin: 10,

            level: EMBEDDED_LEVEL,
        }
    }
}
