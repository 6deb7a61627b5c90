// #![deny(missing_docs)]

//! Content-aware image shrinking.
//!
//! Repeatedly find and remove the cheapest connected path of pixels
//! (a "seam") running top-to-bottom or left-to-right, shrinking the
//! image by one column or row per removal while the visually
//! important content stays put.

pub mod ternary;

pub mod error;
pub use error::CarveError;

pub mod gridmap;
pub use gridmap::GridMap;

pub mod pixelgrid;
pub use pixelgrid::PixelGrid;

pub mod energy;
pub use energy::{EnergyField, BORDER_ENERGY};

pub mod seamfinder;
pub use seamfinder::{shortest_seam, SeamFinder};

pub mod seamcarver;
pub use seamcarver::SeamCarver;
