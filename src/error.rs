use std::fmt;

/// Reasons a level image is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The bytes are not a decodable image
    Decode(String),
    /// Zero-width or zero-height level
    Empty,
    /// A row whose length differs from the first row
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A pixel that maps to no tile kind
    UnknownColor { x: usize, y: usize, rgb: [u8; 3] },
    MissingPlayerStart,
    DuplicatePlayerStart {
        first: (usize, usize),
        second: (usize, usize),
    },
    /// A border cell that is not a wall
    OpenBorder { x: usize, y: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Decode(msg) => write!(f, "failed to decode level image: {}", msg),
            LoadError::Empty => write!(f, "level has no tiles"),
            LoadError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} tiles, expected {} (level must be rectangular)",
                row, found, expected
            ),
            LoadError::UnknownColor { x, y, rgb } => write!(
                f,
                "unrecognized color ({}, {}, {}) at pixel ({}, {})",
                rgb[0], rgb[1], rgb[2], x, y
            ),
            LoadError::MissingPlayerStart => write!(f, "level has no player start tile"),
            LoadError::DuplicatePlayerStart { first, second } => write!(
                f,
                "level has more than one player start: ({}, {}) and ({}, {})",
                first.0, first.1, second.0, second.1
            ),
            LoadError::OpenBorder { x, y } => {
                write!(f, "border cell ({}, {}) is not a wall", x, y)
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Decode(e.to_string())
    }
}

/// Failures while walking a ray through the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastError {
    /// The ray left the grid before reaching a wall
    OutOfBounds { x: i64, y: i64 },
    /// Both ray direction components are zero
    DegenerateRay,
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastError::OutOfBounds { x, y } => write!(
                f,
                "ray left the grid at cell ({}, {}) without hitting a wall",
                x, y
            ),
            CastError::DegenerateRay => write!(f, "ray direction is zero on both axes"),
        }
    }
}

impl std::error::Error for CastError {}
