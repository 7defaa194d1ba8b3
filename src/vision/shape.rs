//! Contour extraction and shape statistics over the edge mask.
//!
//! A contour is a 4-connected component of edge pixels. Its "perimeter" is
//! `sqrt(boundary contacts)`, where a boundary contact is an in-bounds
//! neighbour of a member pixel that is not an edge. This is a proxy, not a
//! geometric perimeter: with it `circularity = 4*pi*area / contacts`, which
//! is at least `pi` for every contour because each pixel has at most four
//! contacts. Consequently irregularity is always negative and the
//! small-irregular bucket stays empty on real masks. The decision
//! thresholds are tuned against this proxy.

use std::f64::consts::PI;

use serde::Serialize;

use super::raster::BitGrid;

/// Components smaller than this are noise, not contours.
pub const MIN_CONTOUR_AREA: usize = 20;

const SMALL_CONTOUR_MAX_AREA: usize = 500;
const SMALL_IRREGULAR_MIN_IRREGULARITY: f64 = 0.4;
const LARGE_CONTOUR_MIN_AREA: usize = 2000;
const LARGE_SMOOTH_MAX_IRREGULARITY: f64 = 0.2;
const CIRCULAR_MIN_CIRCULARITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contour {
    pub area: usize,
    pub boundary_contacts: usize,
    pub perimeter: f64,
    pub circularity: f64,
    pub irregularity: f64,
}

impl Contour {
    fn new(area: usize, boundary_contacts: usize) -> Self {
        let perimeter = (boundary_contacts as f64).sqrt();
        // Zero contacts (mask fills the image) gives +inf, which still
        // compares as "perfectly smooth".
        let circularity = 4.0 * PI * area as f64 / (perimeter * perimeter);
        Self {
            area,
            boundary_contacts,
            perimeter,
            circularity,
            irregularity: 1.0 - circularity,
        }
    }

    pub fn is_small_irregular(&self) -> bool {
        self.area < SMALL_CONTOUR_MAX_AREA && self.irregularity > SMALL_IRREGULAR_MIN_IRREGULARITY
    }

    pub fn is_large_smooth(&self) -> bool {
        self.area > LARGE_CONTOUR_MIN_AREA && self.irregularity < LARGE_SMOOTH_MAX_IRREGULARITY
    }

    pub fn is_circular(&self) -> bool {
        self.circularity > CIRCULAR_MIN_CIRCULARITY
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShapeStats {
    pub contour_count: usize,
    pub small_irregular_count: usize,
    pub large_smooth_count: usize,
    pub circular_count: usize,
    /// Mean irregularity over all contours (0 when there are none).
    pub mean_irregularity: f64,
}

/// Every 4-connected edge component with area >= [`MIN_CONTOUR_AREA`],
/// in raster scan order of their first pixel.
pub fn find_contours(edges: &BitGrid) -> Vec<Contour> {
    let mut visited = BitGrid::new(edges.width(), edges.height());
    let mut stack = Vec::new();
    let mut contours = Vec::new();

    for start in 0..edges.len() {
        if !edges.get(start) || visited.get(start) {
            continue;
        }
        let contour = flood_fill(edges, &mut visited, &mut stack, start);
        if contour.area >= MIN_CONTOUR_AREA {
            contours.push(contour);
        }
    }

    contours
}

/// Depth-first fill from `start`, counting members and boundary contacts.
///
/// `stack` is reused across calls to avoid reallocating per component.
fn flood_fill(edges: &BitGrid, visited: &mut BitGrid, stack: &mut Vec<usize>, start: usize) -> Contour {
    let w = edges.width() as usize;
    let h = edges.height() as usize;

    stack.clear();
    stack.push(start);
    visited.set(start);
    let mut area = 1usize;
    let mut contacts = 0usize;

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % w, idx / w);
        let neighbours = [
            (x + 1 < w).then(|| idx + 1),
            (y + 1 < h).then(|| idx + w),
            (x > 0).then(|| idx - 1),
            (y > 0).then(|| idx - w),
        ];
        for n in neighbours.into_iter().flatten() {
            if !edges.get(n) {
                contacts += 1;
            } else if !visited.get(n) {
                visited.set(n);
                stack.push(n);
                area += 1;
            }
        }
    }

    Contour::new(area, contacts)
}

/// Aggregate contour counts and mean irregularity.
pub fn analyze_shapes(edges: &BitGrid) -> ShapeStats {
    let contours = find_contours(edges);
    if contours.is_empty() {
        return ShapeStats::default();
    }

    let irregularity_total: f64 = contours.iter().map(|c| c.irregularity).sum();
    ShapeStats {
        contour_count: contours.len(),
        small_irregular_count: contours.iter().filter(|c| c.is_small_irregular()).count(),
        large_smooth_count: contours.iter().filter(|c| c.is_large_smooth()).count(),
        circular_count: contours.iter().filter(|c| c.is_circular()).count(),
        mean_irregularity: irregularity_total / contours.len() as f64,
    }
}
