//! Region/corner/edge map graph
//!
//! The graph is the dual view of a clipped [`Voronoi`](crate::Voronoi)
//! diagram mapped into world space. Elements refer to each other by ID
//! (their index in the owning vector):
//!
//! - a [`Region`] per site, with its corners sorted counter-clockwise
//! - a [`Corner`] per distinct Voronoi vertex, plus the four world corners
//! - an [`Edge`] per visible Voronoi segment, joining two corners and
//!   separating two regions
//!
//! Adjacency lists are sets that keep insertion order.

mod builder;
mod editor;
mod triangle;

pub use builder::{BORDER_EPSILON, CORNER_EPSILON};
pub use triangle::{barycentric, MeshData, Triangle};

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// One Voronoi cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Same as the site's position in the input
    pub id: usize,
    /// Site location in world space
    pub center: DVec2,
    /// Corner IDs, counter-clockwise around the center
    pub corners: Vec<usize>,
    /// Edge IDs bounding this region
    pub borders: Vec<usize>,
    /// Region IDs sharing an edge with this one
    pub neighbors: Vec<usize>,
}

/// A deduplicated Voronoi vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub id: usize,
    pub location: DVec2,
    /// Lies on the edge of the world rectangle
    pub border: bool,
    /// Regions whose corner list holds this corner
    pub touches: Vec<usize>,
    /// Corners joined to this one by an edge
    pub adjacent: Vec<usize>,
    /// Incident edge IDs
    pub edges: Vec<usize>,
}

/// A Voronoi segment between two corners, separating two regions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: usize,
    pub corner0: usize,
    pub corner1: usize,
    pub region0: usize,
    pub region1: usize,
}

impl Edge {
    /// The corner at the other end from `corner`
    pub fn other_corner(&self, corner: usize) -> Option<usize> {
        if corner == self.corner0 {
            Some(self.corner1)
        } else if corner == self.corner1 {
            Some(self.corner0)
        } else {
            None
        }
    }

    /// The region on the other side from `region`
    pub fn other_region(&self, region: usize) -> Option<usize> {
        if region == self.region0 {
            Some(self.region1)
        } else if region == self.region1 {
            Some(self.region0)
        } else {
            None
        }
    }
}

/// The full map graph
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiGraph {
    /// Diagram space the graph was built from
    bounds: Rect,
    /// World space the graph lives in
    target: Rect,
    regions: Vec<Region>,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
}

impl VoronoiGraph {
    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[inline]
    pub fn target(&self) -> &Rect {
        &self.target
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn region(&self, id: usize) -> Option<&Region> {
        self.regions.get(id)
    }

    #[inline]
    pub fn corner(&self, id: usize) -> Option<&Corner> {
        self.corners.get(id)
    }

    #[inline]
    pub fn edge(&self, id: usize) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Corner locations of a region in polygon order; empty for unknown IDs
    pub fn region_polygon(&self, id: usize) -> Vec<DVec2> {
        self.regions
            .get(id)
            .map(|r| r.corners.iter().map(|&c| self.corners[c].location).collect())
            .unwrap_or_default()
    }

    /// Whether any corner of the region lies on the world border
    pub fn is_border_region(&self, id: usize) -> bool {
        self.regions
            .get(id)
            .is_some_and(|r| r.corners.iter().any(|&c| self.corners[c].border))
    }

    /// Regions reachable within `hops` neighbor steps of `center_id`, in
    /// breadth-first order starting with `center_id`
    ///
    /// Empty if `center_id` is out of range.
    pub fn find_regions_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.regions.len() {
            return vec![];
        }

        let mut visited = vec![false; self.regions.len()];
        visited[center_id] = true;
        let mut found = vec![center_id];
        let mut frontier = 0;
        for _ in 0..hops {
            let end = found.len();
            for i in frontier..end {
                for &neighbor in &self.regions[found[i]].neighbors {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        found.push(neighbor);
                    }
                }
            }
            frontier = end;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Voronoi;

    fn grid_graph() -> VoronoiGraph {
        // 4 x 4 lattice, slightly sheared so no four sites are cocircular
        let mut sites = Vec::new();
        for j in 0..4 {
            for i in 0..4 {
                sites.push(DVec2::new(12.5 + 25.0 * i as f64 + 0.5 * j as f64, 12.5 + 25.0 * j as f64));
            }
        }
        let bounds = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        let voronoi = Voronoi::new(&sites, bounds).unwrap();
        VoronoiGraph::new(&voronoi, bounds).unwrap()
    }

    #[test]
    fn test_edge_other_ends() {
        let edge = Edge {
            id: 0,
            corner0: 3,
            corner1: 4,
            region0: 7,
            region1: 8,
        };
        assert_eq!(edge.other_corner(3), Some(4));
        assert_eq!(edge.other_corner(5), None);
        assert_eq!(edge.other_region(8), Some(7));
    }

    #[test]
    fn test_find_regions_within_hops() {
        let graph = grid_graph();
        assert_eq!(graph.find_regions_within_hops(5, 0), vec![5]);

        let ring = graph.find_regions_within_hops(5, 1);
        assert_eq!(ring[0], 5);
        assert_eq!(ring.len(), 1 + graph.region(5).unwrap().neighbors.len());

        let two = graph.find_regions_within_hops(5, 2);
        assert!(two.len() > ring.len());
        let everything = graph.find_regions_within_hops(0, 10);
        assert_eq!(everything.len(), 16);

        assert!(graph.find_regions_within_hops(99, 3).is_empty());
    }

    #[test]
    fn test_border_regions_and_polygons() {
        let graph = grid_graph();
        // lattice position (1, 1) is interior, (0, 0) touches the border
        assert!(!graph.is_border_region(5));
        assert!(graph.is_border_region(0));
        assert!(!graph.is_border_region(99));

        let polygon = graph.region_polygon(0);
        assert!(polygon.contains(&DVec2::ZERO));
        assert!(graph.region_polygon(99).is_empty());
    }
}
