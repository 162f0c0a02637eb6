//! Tiled grid index over entry locations.
//!
//! Points land in quarter-degree tiles keyed by latitude and longitude cell
//! index. A proximity query scans every tile the radius could reach, widening
//! the longitude span per row as latitude grows and wrapping across the
//! antimeridian. The caller applies the exact distance filter; the grid only
//! narrows the candidate set.

use std::collections::BTreeMap;

use crate::domain::GeoPoint;

const CELL_SIZE_DEGREES: f64 = 0.25;
const METRES_PER_DEGREE_LATITUDE: f64 = 111_320.0;
/// Longitude degrees shrink with the cosine of latitude; rows touching a
/// pole use this floor to keep the span finite.
const MIN_LATITUDE_COSINE: f64 = 0.01;

pub(super) struct GeoGrid {
    cells: BTreeMap<(i32, i32), Vec<(u64, GeoPoint)>>,
}

impl GeoGrid {
    pub(super) fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    pub(super) fn insert(&mut self, seq: u64, point: GeoPoint) {
        self.cells
            .entry(cell_of(point))
            .or_default()
            .push((seq, point));
    }

    pub(super) fn remove(&mut self, seq: u64, point: GeoPoint) {
        let key = cell_of(point);
        if let Some(bucket) = self.cells.get_mut(&key) {
            bucket.retain(|(member, _)| *member != seq);
            if bucket.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Every indexed point in a tile the radius could reach from `origin`.
    pub(super) fn candidates(&self, origin: GeoPoint, radius_metres: f64) -> Vec<(u64, GeoPoint)> {
        let lat_span = radius_metres / METRES_PER_DEGREE_LATITUDE;
        let min_lat = (origin.latitude() - lat_span).max(-90.0);
        let max_lat = (origin.latitude() + lat_span).min(90.0);

        let mut found = Vec::new();
        for row in cell_index(min_lat)..=cell_index(max_lat) {
            let span = row_longitude_span(row, radius_metres);
            for (start, end) in longitude_ranges(origin.longitude(), span) {
                for column in cell_index(start)..=cell_index(end) {
                    if let Some(bucket) = self.cells.get(&(row, column)) {
                        found.extend(bucket.iter().copied());
                    }
                }
            }
        }
        found
    }
}

fn cell_of(point: GeoPoint) -> (i32, i32) {
    (cell_index(point.latitude()), cell_index(point.longitude()))
}

fn cell_index(degrees: f64) -> i32 {
    (degrees / CELL_SIZE_DEGREES).floor() as i32
}

/// Longitude span in degrees the radius covers within one latitude row.
///
/// Measured at the row edge closest to a pole, so the span never undershoots
/// anywhere in the row.
fn row_longitude_span(row: i32, radius_metres: f64) -> f64 {
    let edge_a = f64::from(row) * CELL_SIZE_DEGREES;
    let edge_b = edge_a + CELL_SIZE_DEGREES;
    let widest = edge_a.abs().max(edge_b.abs()).min(90.0);
    let cosine = widest.to_radians().cos().max(MIN_LATITUDE_COSINE);
    radius_metres / (METRES_PER_DEGREE_LATITUDE * cosine)
}

/// Longitude intervals to scan, split in two when the span crosses the
/// antimeridian.
fn longitude_ranges(origin: f64, span: f64) -> Vec<(f64, f64)> {
    if span >= 180.0 {
        return vec![(-180.0, 180.0)];
    }
    let min = origin - span;
    let max = origin + span;
    if min < -180.0 {
        vec![(min + 360.0, 180.0), (-180.0, max)]
    } else if max > 180.0 {
        vec![(min, 180.0), (-180.0, max - 360.0)]
    } else {
        vec![(min, max)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(longitude: f64, latitude: f64) -> GeoPoint {
        GeoPoint::new(longitude, latitude).expect("valid point")
    }

    #[test]
    fn finds_points_within_reach_and_skips_remote_tiles() {
        let mut grid = GeoGrid::new();
        grid.insert(1, point(-0.09, 51.505));
        grid.insert(2, point(-0.10, 51.51));
        grid.insert(3, point(2.35, 48.85));

        let found = grid.candidates(point(-0.095, 51.5), 5_000.0);
        let seqs: Vec<u64> = found.iter().map(|(seq, _)| *seq).collect();

        assert!(seqs.contains(&1));
        assert!(seqs.contains(&2));
        assert!(!seqs.contains(&3));
    }

    #[test]
    fn wraps_across_the_antimeridian() {
        let mut grid = GeoGrid::new();
        grid.insert(7, point(-179.95, 0.0));

        let found = grid.candidates(point(179.9, 0.0), 20_000.0);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 7);
    }

    #[test]
    fn clamps_rows_at_the_poles() {
        let mut grid = GeoGrid::new();
        grid.insert(4, point(12.0, 89.9));

        let found = grid.candidates(point(11.0, 89.95), 50_000.0);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 4);
    }

    #[test]
    fn removal_empties_the_tile() {
        let mut grid = GeoGrid::new();
        grid.insert(9, point(-0.09, 51.5));
        grid.remove(9, point(-0.09, 51.5));

        assert!(grid.cells.is_empty());
        assert!(grid.candidates(point(-0.09, 51.5), 1_000.0).is_empty());
    }
}
