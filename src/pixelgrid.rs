// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The mutable grid of color samples being carved.
//!
//! Samples are packed `0x00RRGGBB` words in a flat row-major map, the
//! same layout the gradient code wants for its shift-and-mask channel
//! reads.  The grid is built once from an image and then only ever
//! shrinks, one column (or, transposed, one row) at a time.

use crate::error::CarveError;
use crate::gridmap::GridMap;
use image::{GenericImageView, Pixel, Primitive, Rgb, RgbImage};
use itertools::iproduct;
use num_traits::NumCast;
use std::ops::Index;

#[derive(Debug, Clone)]
pub struct PixelGrid {
    cells: GridMap<u32>,
}

// (Pixel) -> packed 0x00RRGGBB
fn pack<P, S>(pixel: &P) -> u32
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
    Rgb<S>: Pixel<Subpixel = S>,
{
    let rgb = pixel.to_rgb();
    let channels = rgb.channels();
    let (r, g, b): (u32, u32, u32) = (
        NumCast::from(channels[0]).unwrap(),
        NumCast::from(channels[1]).unwrap(),
        NumCast::from(channels[2]).unwrap(),
    );
    ((r & 0xff) << 16) | ((g & 0xff) << 8) | (b & 0xff)
}

impl PixelGrid {
    /// Copy an image into a fresh grid.  Anything satisfying the
    /// ImageRS view trait will do; channels are converted through
    /// `NumCast` and packed.
    pub fn from_image<I, P, S>(image: &I) -> Result<Self, CarveError>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
        Rgb<S>: Pixel<Subpixel = S>,
    {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidArgument {
                reason: format!("cannot carve a {}x{} image", width, height),
            });
        }
        let mut cells = GridMap::new(width, height);
        for (x, y, pixel) in image.pixels() {
            cells[(x, y)] = pack(&pixel);
        }
        Ok(PixelGrid { cells })
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    /// The packed sample at `(x, y)`, bounds-checked.
    pub fn get(&self, x: u32, y: u32) -> Result<u32, CarveError> {
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

    /// Delete the given column index from each row.  The index list is
    /// validated in full before any cell moves, so a rejected list
    /// leaves the grid untouched.
    pub fn remove_column(&mut self, picks: &[u32]) -> Result<(), CarveError> {
        let (width, height) = (self.width(), self.height());
        if width <= 1 {
            return Err(CarveError::InvalidSeam {
                reason: "a 1-wide grid has nothing left to remove".to_string(),
            });
        }
        if picks.len() != height as usize {
            return Err(CarveError::InvalidSeam {
                reason: format!("expected {} indices, got {}", height, picks.len()),
            });
        }
        if let Some(&stray) = picks.iter().find(|&&pick| pick >= width) {
            return Err(CarveError::InvalidSeam {
                reason: format!("column {} is outside a {}-wide grid", stray, width),
            });
        }
        self.cells.remove_one_per_row(picks);
        Ok(())
    }

    /// Swap rows and columns.  Only ever called in lockstep with the
    /// energy field's transpose; the orchestrator owns that invariant.
    pub fn transpose(&mut self) {
        self.cells.transpose();
    }

    /// Materialize an independent copy of the current contents.  The
    /// caller keeps it; later carving cannot reach into it.
    pub fn to_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width(), self.height());
        for (y, x) in iproduct!(0..self.height(), 0..self.width()) {
            let rgb = self.cells[(x, y)];
            out.put_pixel(x, y, Rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]));
        }
        out
    }
}

impl Index<(u32, u32)> for PixelGrid {
    type Output = u32;

    fn index(&self, point: (u32, u32)) -> &u32 {
        &self.cells[point]
    }
}
