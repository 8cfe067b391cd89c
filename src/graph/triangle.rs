//! Fan triangles and mesh export
//!
//! Every region splits into triangles `(center, corner_i, corner_i+1)` around
//! its sorted corners. Triangles are derived on demand and never stored.

use glam::{DVec2, DVec3};

use super::VoronoiGraph;

/// Barycentric coordinates of `p` in triangle `[a, b, c]`
///
/// `None` for a degenerate triangle.
pub fn barycentric(p: DVec2, [a, b, c]: [DVec2; 3]) -> Option<DVec3> {
    let det = (b - a).perp_dot(c - a);
    if det.abs() < 1e-12 {
        return None;
    }
    let l1 = (p - a).perp_dot(c - a) / det;
    let l2 = (b - a).perp_dot(p - a) / det;
    Some(DVec3::new(1.0 - l1 - l2, l1, l2))
}

/// One fan triangle of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub region: usize,
    pub corner0: usize,
    pub corner1: usize,
}

impl Triangle {
    /// Region center, then the two corners
    pub fn points(&self, graph: &VoronoiGraph) -> [DVec2; 3] {
        [
            graph.regions[self.region].center,
            graph.corners[self.corner0].location,
            graph.corners[self.corner1].location,
        ]
    }

    /// Whether `p` lies inside or on the triangle
    pub fn contains(&self, graph: &VoronoiGraph, p: DVec2) -> bool {
        barycentric(p, self.points(graph))
            .is_some_and(|l| l.min_element() >= -1e-9)
    }

    /// Linear interpolation of per-vertex `values` (center, corner0, corner1) at `p`
    pub fn interpolate(&self, graph: &VoronoiGraph, p: DVec2, values: [f64; 3]) -> Option<f64> {
        let l = barycentric(p, self.points(graph))?;
        Some(l.dot(DVec3::from_array(values)))
    }
}

/// Engine-agnostic triangle mesh of the graph
///
/// Each region becomes a fan: its center vertex followed by its corners.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions in world space
    pub positions: Vec<[f32; 2]>,
    /// Region each vertex belongs to
    pub regions: Vec<u32>,
    /// Triangle indices, counter-clockwise
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl VoronoiGraph {
    /// Fan triangles of every region with at least three corners
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::new();
        for region in &self.regions {
            let n = region.corners.len();
            if n < 3 {
                continue;
            }
            triangles.extend((0..n).map(|i| Triangle {
                region: region.id,
                corner0: region.corners[i],
                corner1: region.corners[(i + 1) % n],
            }));
        }
        triangles
    }

    /// The fan triangle of region `region` containing `p`
    pub fn triangle_at(&self, region: usize, p: DVec2) -> Option<Triangle> {
        let r = self.regions.get(region)?;
        let n = r.corners.len();
        if n < 3 {
            return None;
        }
        (0..n)
            .map(|i| Triangle {
                region,
                corner0: r.corners[i],
                corner1: r.corners[(i + 1) % n],
            })
            .find(|t| t.contains(self, p))
    }

    /// Triangulate every region as a fan around its center
    pub fn mesh(&self) -> MeshData {
        let mut mesh = MeshData::default();
        for region in &self.regions {
            if region.corners.len() < 3 {
                continue;
            }
            let base = mesh.positions.len() as u32;
            let id = region.id as u32;

            mesh.positions.push(region.center.as_vec2().to_array());
            mesh.regions.push(id);
            for &c in &region.corners {
                mesh.positions.push(self.corners[c].location.as_vec2().to_array());
                mesh.regions.push(id);
            }

            let n = region.corners.len() as u32;
            for i in 0..n {
                mesh.indices.push(base);
                mesh.indices.push(base + 1 + i);
                mesh.indices.push(base + 1 + (i + 1) % n);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Voronoi;
    use crate::geometry::{polygon_area, Rect};

    fn graph() -> VoronoiGraph {
        let sites = [
            DVec2::new(20.0, 20.0),
            DVec2::new(80.0, 25.0),
            DVec2::new(75.0, 80.0),
            DVec2::new(25.0, 75.0),
            DVec2::new(50.0, 50.0),
        ];
        let bounds = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        VoronoiGraph::new(&Voronoi::new(&sites, bounds).unwrap(), bounds).unwrap()
    }

    #[test]
    fn test_barycentric() {
        let tri = [DVec2::ZERO, DVec2::new(4.0, 0.0), DVec2::new(0.0, 2.0)];
        let l = barycentric(DVec2::new(1.0, 0.5), tri).unwrap();
        assert!((l - DVec3::new(0.5, 0.25, 0.25)).length() < 1e-12);
        assert_eq!(barycentric(DVec2::X, tri).unwrap(), DVec3::new(0.75, 0.25, 0.0));

        let flat = [DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)];
        assert!(barycentric(DVec2::Y, flat).is_none());
    }

    #[test]
    fn test_triangles_cover_the_world() {
        let graph = graph();
        let area: f64 = graph
            .triangles()
            .iter()
            .map(|t| polygon_area(&t.points(&graph)))
            .sum();
        assert!((area - 10_000.0).abs() < 1e-6, "area {}", area);
    }

    #[test]
    fn test_interpolate_at_vertices() {
        let graph = graph();
        let triangle = graph.triangle_at(4, DVec2::new(52.0, 50.0)).unwrap();
        let [center, c0, c1] = triangle.points(&graph);
        let values = [1.0, 2.0, 3.0];
        assert!((triangle.interpolate(&graph, center, values).unwrap() - 1.0).abs() < 1e-9);
        assert!((triangle.interpolate(&graph, c0, values).unwrap() - 2.0).abs() < 1e-9);
        assert!((triangle.interpolate(&graph, c1, values).unwrap() - 3.0).abs() < 1e-9);
        assert!(graph.triangle_at(4, DVec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_mesh_counts() {
        let graph = graph();
        let mesh = graph.mesh();
        let corner_total: usize = graph.regions().iter().map(|r| r.corners.len()).sum();
        assert_eq!(mesh.vertex_count(), graph.regions().len() + corner_total);
        assert_eq!(mesh.triangle_count(), graph.triangles().len());
        assert_eq!(mesh.regions.len(), mesh.vertex_count());
        assert!(!mesh.is_empty());
    }
}
