use failure::Fail;

/// Everything that can go wrong while carving.  All three variants are
/// raised synchronously at validation time; a rejected input leaves the
/// carver's grids exactly as they were.
#[derive(Debug, Fail, PartialEq)]
pub enum CarveError {
    /// A coordinate fell outside the current grid.
    #[fail(display = "pixel ({}, {}) is outside the {}x{} grid", x, y, width, height)]
    OutOfRange { x: u32, y: u32, width: u32, height: u32 },

    /// A seam failed validation: wrong length, an index out of bounds,
    /// or two consecutive entries more than one apart.
    #[fail(display = "invalid seam: {}", reason)]
    InvalidSeam { reason: String },

    /// A required input was unusable, such as a zero-dimension image.
    #[fail(display = "invalid argument: {}", reason)]
    InvalidArgument { reason: String },
}
