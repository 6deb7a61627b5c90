// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - the orchestrator.
//!
//! [`SeamCarver`] owns the pixel grid and its derived energy field and
//! keeps the pair in lockstep: every mutation lands on both grids as
//! one logical step, so their dimensions can never drift apart.  Seam
//! discovery and seam removal are the public contract; everything else
//! serves those two.

use crate::energy::EnergyField;
use crate::error::CarveError;
use crate::pick;
use crate::pixelgrid::PixelGrid;
use crate::seamfinder::{shortest_seam, SeamFinder};
use image::{GenericImageView, GrayImage, Pixel, Primitive, Rgb, RgbImage};
use log::{debug, info};

// This is silly and basically a reimplementation of `bool` and `not`,
// but it makes it much clearer in the code what the shrink loop is
// doing.  And I like that.
#[derive(PartialEq, Copy, Clone, Debug)]
enum Carve {
    Width,
    Height,
}

impl Carve {
    fn turn(self) -> Self {
        pick!(self == Carve::Width, Carve::Height, Carve::Width)
    }
}

/// A carver for one image.  Construct it once; carve until done; take
/// a snapshot.  Nothing outside the carver ever aliases the grids.
pub struct SeamCarver {
    pixels: PixelGrid,
    energy: EnergyField,
}

impl SeamCarver {
    /// Copy `image` into a fresh carver.  Rejects zero-dimension
    /// images; everything at least 1x1 is carvable down to 1x1.
    pub fn new<I, P, S>(image: &I) -> Result<Self, CarveError>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
        Rgb<S>: Pixel<Subpixel = S>,
    {
        let pixels = PixelGrid::from_image(image)?;
        let energy = EnergyField::new(&pixels);
        Ok(SeamCarver { pixels, energy })
    }

    /// Width of the current, post-removal image.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height of the current, post-removal image.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The packed `0x00RRGGBB` sample at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<u32, CarveError> {
        self.pixels.get(x, y)
    }

    /// The energy at `(x, y)`.
    pub fn energy(&self, x: u32, y: u32) -> Result<f64, CarveError> {
        self.energy.energy_at(x, y)
    }

    /// An independent copy of the current image.  Later carving cannot
    /// corrupt it.
    pub fn snapshot(&self) -> RgbImage {
        self.pixels.to_image()
    }

    /// The current energy field rendered for inspection.
    pub fn energy_image(&self) -> GrayImage {
        self.energy.to_image()
    }

    // Both grids turn together, as one logical step.  This is the
    // whole of the orientation trick: a horizontal operation is the
    // vertical one run between two of these.
    fn reorient(&mut self) {
        self.pixels.transpose();
        self.energy.transpose();
    }

    // A seam is checked in full before either grid mutates: one entry
    // per `along` unit, every entry inside `across`, consecutive
    // entries at most one apart, and an `across` of at least 2 so the
    // image survives the removal.
    fn validate_seam(&self, seam: &[u32], along: u32, across: u32) -> Result<(), CarveError> {
        if across <= 1 {
            return Err(CarveError::InvalidSeam {
                reason: "the image cannot shrink below one pixel".to_string(),
            });
        }
        if seam.len() != along as usize {
            return Err(CarveError::InvalidSeam {
                reason: format!("expected {} entries, got {}", along, seam.len()),
            });
        }
        let mut prev = seam[0];
        for &entry in seam {
            if entry >= across {
                return Err(CarveError::InvalidSeam {
                    reason: format!("entry {} is outside [0, {})", entry, across),
                });
            }
            let delta = pick!(entry > prev, entry - prev, prev - entry);
            if delta > 1 {
                return Err(CarveError::InvalidSeam {
                    reason: format!("entries {} and {} are not adjacent", prev, entry),
                });
            }
            prev = entry;
        }
        Ok(())
    }

    /// Remove a top-to-bottom seam: one column index per row.  Both
    /// grids narrow by one, then the energies beside the seam's former
    /// position are re-derived.
    pub fn remove_vertical_seam(&mut self, seam: &[u32]) -> Result<(), CarveError> {
        self.validate_seam(seam, self.height(), self.width())?;
        self.pixels.remove_column(seam)?;
        self.energy.remove_column(seam);
        self.energy.recompute_around(&self.pixels, seam);
        debug!("removed vertical seam; image is now {}x{}", self.width(), self.height());
        Ok(())
    }

    /// Remove a left-to-right seam: one row index per column.
    /// Validated in row space, then reduced to the vertical case by
    /// reorienting, removing, and reorienting back.
    pub fn remove_horizontal_seam(&mut self, seam: &[u32]) -> Result<(), CarveError> {
        self.validate_seam(seam, self.width(), self.height())?;
        self.reorient();
        let removed = self.remove_vertical_seam(seam);
        self.reorient();
        removed
    }

    fn carve_once(&mut self, direction: Carve) -> Result<(), CarveError> {
        if direction == Carve::Height {
            let seam = self.find_horizontal_seam();
            self.remove_horizontal_seam(&seam)?;
        } else {
            let seam = self.find_vertical_seam();
            self.remove_vertical_seam(&seam)?;
        }
        info!("carved {:?}: now {}x{}", direction, self.width(), self.height());
        Ok(())
    }

    /// Shrink to exactly `new_width` by `new_height`, removing one
    /// seam at a time and alternating directions while both dimensions
    /// are oversized.  Carving can only shrink; targets must stay
    /// between 1 and the current size.
    pub fn carve_to(&mut self, new_width: u32, new_height: u32) -> Result<(), CarveError> {
        if new_width == 0 || new_height == 0 {
            return Err(CarveError::InvalidArgument {
                reason: "target dimensions must be at least 1x1".to_string(),
            });
        }
        if new_width > self.width() || new_height > self.height() {
            return Err(CarveError::InvalidArgument {
                reason: format!(
                    "cannot upscale {}x{} to {}x{}",
                    self.width(),
                    self.height(),
                    new_width,
                    new_height
                ),
            });
        }
        let mut direction = Carve::Width;
        while self.width() > new_width && self.height() > new_height {
            self.carve_once(direction)?;
            direction = direction.turn();
        }
        while self.width() > new_width {
            self.carve_once(Carve::Width)?;
        }
        while self.height() > new_height {
            self.carve_once(Carve::Height)?;
        }
        Ok(())
    }
}

impl SeamFinder for SeamCarver {
    fn find_vertical_seam(&mut self) -> Vec<u32> {
        shortest_seam(&self.energy)
    }

    fn find_horizontal_seam(&mut self) -> Vec<u32> {
        self.reorient();
        let seam = shortest_seam(&self.energy);
        self.reorient();
        seam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn textured(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let v = ((x * 53 + y * 31) % 256) as u8;
            *pixel = Rgb([v, v.wrapping_mul(5), v ^ 0x33]);
        }
        img
    }

    fn uniform(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([120, 80, 40]))
    }

    #[test]
    fn uniform_image_seams_are_deterministic() {
        let mut carver = SeamCarver::new(&uniform(5, 5)).unwrap();
        // All interior energies are zero and all borders are the
        // sentinel, so the strict-improvement rule fixes the answer.
        assert_eq!(carver.find_vertical_seam(), [0, 1, 1, 1, 0]);
        assert_eq!(carver.find_horizontal_seam(), [0, 1, 1, 1, 0]);
    }

    #[test]
    fn seam_discovery_leaves_dimensions_alone() {
        let mut carver = SeamCarver::new(&textured(6, 4)).unwrap();
        let vertical = carver.find_vertical_seam();
        let horizontal = carver.find_horizontal_seam();
        assert_eq!(vertical.len(), 4);
        assert_eq!(horizontal.len(), 6);
        assert!(vertical.iter().all(|&col| col < 6));
        assert!(horizontal.iter().all(|&row| row < 4));
        assert_eq!((carver.width(), carver.height()), (6, 4));
    }

    #[test]
    fn removal_shrinks_exactly_one_dimension() {
        let mut carver = SeamCarver::new(&textured(6, 5)).unwrap();
        let seam = carver.find_vertical_seam();
        carver.remove_vertical_seam(&seam).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 5));
        let seam = carver.find_horizontal_seam();
        carver.remove_horizontal_seam(&seam).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 4));
    }

    #[test]
    fn rejects_malformed_seams_without_mutating() {
        let mut carver = SeamCarver::new(&textured(5, 4)).unwrap();
        // Wrong length.
        assert!(carver.remove_vertical_seam(&[1, 1, 1]).is_err());
        // Out of range.
        assert!(carver.remove_vertical_seam(&[1, 1, 5, 1]).is_err());
        // Two entries differing by 2.
        assert!(matches!(
            carver.remove_vertical_seam(&[0, 2, 2, 2]),
            Err(CarveError::InvalidSeam { .. })
        ));
        assert_eq!((carver.width(), carver.height()), (5, 4));
    }

    #[test]
    fn rejects_out_of_range_reads() {
        let carver = SeamCarver::new(&textured(4, 4)).unwrap();
        assert!(matches!(carver.pixel(4, 0), Err(CarveError::OutOfRange { .. })));
        assert!(matches!(carver.energy(0, 9), Err(CarveError::OutOfRange { .. })));
    }

    #[test]
    fn snapshot_survives_later_carving() {
        let source = textured(6, 5);
        let mut carver = SeamCarver::new(&source).unwrap();
        let before = carver.snapshot();
        let seam = carver.find_vertical_seam();
        carver.remove_vertical_seam(&seam).unwrap();
        assert_eq!(before.dimensions(), (6, 5));
        assert_eq!(before, source);
        assert_eq!(carver.snapshot().dimensions(), (5, 5));
    }

    #[test]
    fn carving_stops_at_one_pixel_wide() {
        let mut carver = SeamCarver::new(&textured(4, 3)).unwrap();
        for expected in (1..4).rev() {
            let seam = carver.find_vertical_seam();
            carver.remove_vertical_seam(&seam).unwrap();
            assert_eq!(carver.width(), expected);
        }
        let seam = carver.find_vertical_seam();
        assert_eq!(seam, [0, 0, 0]);
        assert!(matches!(
            carver.remove_vertical_seam(&seam),
            Err(CarveError::InvalidSeam { .. })
        ));
        assert_eq!((carver.width(), carver.height()), (1, 3));
    }

    #[test]
    fn carve_to_hits_the_requested_dimensions() {
        let mut carver = SeamCarver::new(&textured(8, 7)).unwrap();
        carver.carve_to(5, 4).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 4));
        assert_eq!(carver.snapshot().dimensions(), (5, 4));
    }

    #[test]
    fn carve_to_rejects_bad_targets() {
        let mut carver = SeamCarver::new(&textured(4, 4)).unwrap();
        assert!(matches!(
            carver.carve_to(5, 4),
            Err(CarveError::InvalidArgument { .. })
        ));
        assert!(matches!(
            carver.carve_to(0, 2),
            Err(CarveError::InvalidArgument { .. })
        ));
        assert_eq!((carver.width(), carver.height()), (4, 4));
    }

    #[test]
    fn rejects_zero_dimension_construction() {
        let empty = RgbImage::new(0, 0);
        assert!(matches!(
            SeamCarver::new(&empty),
            Err(CarveError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn energy_stays_consistent_across_many_removals() {
        let mut carver = SeamCarver::new(&textured(9, 8)).unwrap();
        for _ in 0..4 {
            let seam = carver.find_vertical_seam();
            carver.remove_vertical_seam(&seam).unwrap();
        }
        // The incrementally repaired field must agree with a field
        // rebuilt from scratch over the carved pixels.
        let rebuilt = SeamCarver::new(&carver.snapshot()).unwrap();
        for y in 0..carver.height() {
            for x in 0..carver.width() {
                assert_eq!(carver.energy(x, y), rebuilt.energy(x, y));
            }
        }
    }
}
