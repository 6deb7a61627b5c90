// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through an energy field.
//!
//! A single deterministic computation: seed the top row, relax
//! downward through the implicit grid graph (each pixel reaches the
//! three pixels below it), then walk the back-pointers up from the
//! cheapest bottom cell.  Horizontal seams never get their own
//! algorithm; the carver transposes, runs this, and transposes back.

use crate::energy::EnergyField;
use crate::gridmap::GridMap;
use crate::pick;

/// How seams are requested from a carver.  It's a primitive interface,
/// just enough to make room for multiple seam strategies as well as
/// caching.  Both methods take `&mut self`: the horizontal path
/// reorients the grids internally and restores them before returning.
pub trait SeamFinder {
    /// The cheapest left-to-right seam: one row index per column.
    fn find_horizontal_seam(&mut self) -> Vec<u32>;

    /// The cheapest top-to-bottom seam: one column index per row.
    fn find_vertical_seam(&mut self) -> Vec<u32>;
}

/// The cheapest top-to-bottom path through `energy`, as one column
/// index per row, adjacent entries never more than one apart.  Total
/// for any field of at least 1x1; ties go to the lowest column index.
/// O(width * height) time and space.
pub fn shortest_seam(energy: &EnergyField) -> Vec<u32> {
    let (width, height) = (energy.width(), energy.height());
    let mut dist_to: GridMap<f64> = GridMap::filled(width, height, f64::INFINITY);
    let mut edge_to: GridMap<u32> = GridMap::new(width, height);

    // The top row reaches itself for free.
    for x in 0..width {
        dist_to[(x, 0)] = energy[(x, 0)];
    }

    // Relax row by row.  Only a strictly cheaper path displaces an
    // earlier one, which is what keeps ties on the leftmost parent.
    let rightmost = width - 1;
    for y in 0..height - 1 {
        for x in 0..width {
            let reach = dist_to[(x, y)];
            let span = pick!(x == 0, 0, x - 1)..=pick!(x == rightmost, rightmost, x + 1);
            for next in span {
                let candidate = reach + energy[(next, y + 1)];
                if candidate < dist_to[(next, y + 1)] {
                    dist_to[(next, y + 1)] = candidate;
                    edge_to[(next, y + 1)] = x;
                }
            }
        }
    }

    // The cheapest bottom cell, scanned left to right with a strict
    // comparison so the first minimum encountered wins.
    let floor = height - 1;
    let mut tail = 0;
    for x in 1..width {
        if dist_to[(x, floor)] < dist_to[(tail, floor)] {
            tail = x;
        }
    }

    // Working backwards, accumulate the column for each row, then
    // reverse into top-down order.
    (0..height)
        .rev()
        .fold(Vec::with_capacity(height as usize), |mut seam, y| {
            seam.push(tail);
            tail = edge_to[(tail, y)];
            seam
        })
        .into_iter()
        .rev()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY_DATA: [f64; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0, //
        9.0, 1.0, 9.0, 8.0, 9.0, //
        9.0, 9.0, 9.0, 9.0, 0.0, //
        9.0, 9.0, 9.0, 0.0, 9.0,
    ];

    #[test]
    fn energy_grid_to_vertical_seam() {
        let energies = EnergyField::from_values(5, 4, ENERGY_DATA.to_vec());
        let expected = [2, 3, 4, 3];
        assert_eq!(shortest_seam(&energies), expected);
    }

    #[test]
    fn ties_break_toward_the_lowest_column() {
        let flat = EnergyField::from_values(3, 2, vec![7.0; 6]);
        assert_eq!(shortest_seam(&flat), [0, 0]);
    }

    #[test]
    fn single_column_fields_yield_a_straight_seam() {
        let skinny = EnergyField::from_values(1, 5, vec![3.0, 1.0, 4.0, 1.0, 5.0]);
        assert_eq!(shortest_seam(&skinny), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn single_row_fields_pick_the_cheapest_cell() {
        let squat = EnergyField::from_values(4, 1, vec![6.0, 2.0, 2.0, 5.0]);
        assert_eq!(shortest_seam(&squat), [1]);
    }

    #[test]
    fn seams_always_satisfy_the_path_invariants() {
        let values: Vec<f64> = (0..7 * 6).map(|i| ((i * 7 + i / 5) % 17) as f64).collect();
        let field = EnergyField::from_values(7, 6, values);
        let seam = shortest_seam(&field);
        assert_eq!(seam.len(), 6);
        for window in seam.windows(2) {
            let delta = pick!(window[1] > window[0], window[1] - window[0], window[0] - window[1]);
            assert!(delta <= 1);
        }
        assert!(seam.iter().all(|&col| col < 7));
    }
}
