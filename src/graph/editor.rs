//! In-place refinement of a built graph

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::error::Result;
use crate::generation::Voronoi;
use crate::geometry::polygon_centroid;

use super::VoronoiGraph;

impl VoronoiGraph {
    /// Move every inner corner to the average center of the regions it touches
    ///
    /// Border corners stay put. All new locations are computed before any is
    /// written, so the result does not depend on corner order.
    pub fn improve_corners(&mut self) {
        let locations: Vec<DVec2> = self
            .corners
            .iter()
            .map(|corner| {
                if corner.border || corner.touches.is_empty() {
                    return corner.location;
                }
                let sum: DVec2 = corner
                    .touches
                    .iter()
                    .map(|&r| self.regions[r].center)
                    .sum();
                sum / corner.touches.len() as f64
            })
            .collect();

        for (corner, location) in self.corners.iter_mut().zip(locations) {
            corner.location = location;
        }
    }

    /// Displace every inner corner by up to `max_distance` in a random direction
    pub fn jitter_corners<R: Rng + ?Sized>(&mut self, max_distance: f64, rng: &mut R) {
        if max_distance <= 0.0 {
            return;
        }
        for corner in self.corners.iter_mut().filter(|c| !c.border) {
            let distance = rng.gen_range(0.0..=max_distance);
            let angle = rng.gen_range(0.0..TAU);
            corner.location += DVec2::from_angle(angle) * distance;
        }
    }

    /// New site positions in diagram space: each region's corner polygon
    /// centroid, mapped back from world space
    pub fn relaxed_sites(&self) -> Vec<DVec2> {
        self.regions
            .iter()
            .map(|region| {
                let polygon = self.region_polygon(region.id);
                let centroid = polygon_centroid(&polygon).unwrap_or(region.center);
                self.target.map_point(centroid, &self.bounds)
            })
            .collect()
    }

    /// One Lloyd pass driven by the graph: a fresh diagram over the same
    /// bounds with every site moved to its region centroid
    pub fn lloyd_relaxation(&self) -> Result<Voronoi> {
        Voronoi::new(&self.relaxed_sites(), self.bounds)
    }
}
