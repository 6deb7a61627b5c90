// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel importance field.
//!
//! Every pixel gets a scalar energy from the dual-gradient metric:
//! central color differences along each axis, squared and summed over
//! the three channels, square-rooted.  Low energy marks pixels safe to
//! remove.  The outermost ring is pinned to a high sentinel instead,
//! both because the central difference is undefined there and because
//! a seam hugging the border is the degenerate answer we never want.

use crate::error::CarveError;
use crate::gridmap::GridMap;
use crate::pick;
use crate::pixelgrid::PixelGrid;
use image::{GrayImage, Luma};
use itertools::iproduct;
use num_traits::clamp;
use std::ops::Index;

/// The fixed energy of every border pixel, independent of its color.
pub const BORDER_ENERGY: f64 = 1000.0;

/// A field of energies kept dimension-for-dimension in lockstep with a
/// [`PixelGrid`] by the carver that owns both.
#[derive(Debug, Clone)]
pub struct EnergyField {
    cells: GridMap<f64>,
}

// Takes the channels (R,G,B) from two packed samples, maps the
// difference per channel, squares it, and sums them up.  This is half
// of:
//
//        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²
//        |Δy|² = (Δry)²+(Δgy)²+(Δby)²
//       e(x,y) = sqrt(|Δx|²+|Δy|²)
fn channel_deltas(one: u32, other: u32) -> f64 {
    [16u32, 8, 0]
        .iter()
        .map(|shift| {
            let delta = ((one >> shift) & 0xff) as i32 - ((other >> shift) & 0xff) as i32;
            f64::from(delta * delta)
        })
        .sum()
}

// The energy of a single pixel, read fresh from the pixel grid.
fn dual_gradient(pixels: &PixelGrid, x: u32, y: u32) -> f64 {
    let (width, height) = (pixels.width(), pixels.height());
    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        return BORDER_ENERGY;
    }
    let gradx = channel_deltas(pixels[(x - 1, y)], pixels[(x + 1, y)]);
    let grady = channel_deltas(pixels[(x, y - 1)], pixels[(x, y + 1)]);
    (gradx + grady).sqrt()
}

impl EnergyField {
    /// Derive a full field from a pixel grid.
    pub fn new(pixels: &PixelGrid) -> Self {
        let mut field = EnergyField {
            cells: GridMap::new(pixels.width(), pixels.height()),
        };
        field.recompute_all(pixels);
        field
    }

    #[cfg(test)]
    pub(crate) fn from_values(width: u32, height: u32, values: Vec<f64>) -> Self {
        EnergyField {
            cells: GridMap::from_vec(width, height, values),
        }
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    /// The stored energy at `(x, y)`, bounds-checked.
    pub fn energy_at(&self, x: u32, y: u32) -> Result<f64, CarveError> {
        if !self.cells.in_bounds(x, y) {
            return Err(CarveError::OutOfRange {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.cells[(x, y)])
    }

    /// Rebuild every cell.  O(width * height); done once at
    /// construction, and again only when a caller wants to verify the
    /// incremental path against the ground truth.
    pub fn recompute_all(&mut self, pixels: &PixelGrid) {
        for (y, x) in iproduct!(0..self.height(), 0..self.width()) {
            self.cells[(x, y)] = dual_gradient(pixels, x, y);
        }
    }

    /// Repair the field after a column removal, touching only the
    /// cells whose gradients referenced the removed sample.  Every
    /// cell two or more columns away from the seam kept its whole
    /// neighborhood (shifted as a block by the removal), so only
    /// `seam[y] - 1 ..= seam[y] + 1` need a fresh read.  O(height).
    pub fn recompute_around(&mut self, pixels: &PixelGrid, seam: &[u32]) {
        let width = self.width();
        for (row, &col) in seam.iter().enumerate() {
            let y = row as u32;
            let from = pick!(col == 0, 0, col - 1);
            let upto = pick!(col + 1 >= width, width - 1, col + 1);
            for x in from..=upto {
                self.cells[(x, y)] = dual_gradient(pixels, x, y);
            }
        }
    }

    /// Delete one cell per row.  The orchestrator has already
    /// validated the seam against the twin pixel grid.
    pub fn remove_column(&mut self, picks: &[u32]) {
        self.cells.remove_one_per_row(picks);
    }

    /// Swap rows and columns, in lockstep with the pixel grid.
    pub fn transpose(&mut self) {
        self.cells.transpose();
    }

    /// Render the field as a grayscale image, brightest at the highest
    /// energy.  Handy for eyeballing what the carver will avoid.
    pub fn to_image(&self) -> GrayImage {
        let mut out = GrayImage::new(self.width(), self.height());
        let ceiling = self
            .cells
            .as_slice()
            .iter()
            .cloned()
            .fold(BORDER_ENERGY, f64::max);
        for (y, x) in iproduct!(0..self.height(), 0..self.width()) {
            let level = clamp(self.cells[(x, y)] * 255.0 / ceiling, 0.0, 255.0);
            out.put_pixel(x, y, Luma([level as u8]));
        }
        out
    }
}

impl Index<(u32, u32)> for EnergyField {
    type Output = f64;

    fn index(&self, point: (u32, u32)) -> &f64 {
        &self.cells[point]
    }
}
