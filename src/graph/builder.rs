//! Building the map graph from a clipped diagram

use std::collections::HashMap;

use glam::DVec2;

use crate::error::Result;
use crate::generation::Voronoi;
use crate::geometry::Rect;
use crate::util::Timed;

use super::{Corner, Edge, Region, VoronoiGraph};

/// World-space distance within which two vertices are the same corner
pub const CORNER_EPSILON: f64 = 1e-6;

/// World-space distance from a side within which a corner is on the border
pub const BORDER_EPSILON: f64 = 1e-3;

/// Corner lookup on a grid of `CORNER_EPSILON` cells
///
/// A point is compared with the corners in its own cell and the eight around
/// it, so any two points within the epsilon meet no matter where the cell
/// boundaries fall.
#[derive(Default)]
struct CornerMap {
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl CornerMap {
    fn key(p: DVec2) -> (i64, i64) {
        (
            (p.x / CORNER_EPSILON).floor() as i64,
            (p.y / CORNER_EPSILON).floor() as i64,
        )
    }

    fn find(&self, p: DVec2, corners: &[Corner]) -> Option<usize> {
        let (kx, ky) = Self::key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.cells.get(&(kx + dx, ky + dy)) else {
                    continue;
                };
                if let Some(&id) = ids
                    .iter()
                    .find(|&&id| corners[id].location.distance(p) <= CORNER_EPSILON)
                {
                    return Some(id);
                }
            }
        }
        None
    }

    fn insert(&mut self, p: DVec2, id: usize) {
        self.cells.entry(Self::key(p)).or_default().push(id);
    }
}

fn push_unique(list: &mut Vec<usize>, id: usize) {
    if !list.contains(&id) {
        list.push(id);
    }
}

struct Builder {
    target: Rect,
    regions: Vec<Region>,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    corner_map: CornerMap,
}

impl Builder {
    /// The canonical corner at `p`, created on first sight
    fn make_corner(&mut self, p: DVec2) -> usize {
        if let Some(id) = self.corner_map.find(p, &self.corners) {
            return id;
        }
        let id = self.corners.len();
        self.corners.push(Corner {
            id,
            location: p,
            border: self.target.is_near_side(p, BORDER_EPSILON),
            touches: Vec::new(),
            adjacent: Vec::new(),
            edges: Vec::new(),
        });
        self.corner_map.insert(p, id);
        id
    }

    fn add_edge(&mut self, p0: DVec2, p1: DVec2, region0: usize, region1: usize) {
        let corner0 = self.make_corner(p0);
        let corner1 = self.make_corner(p1);
        if corner0 == corner1 {
            log::trace!("dropping zero-length edge at {} between regions {} and {}", p0, region0, region1);
            return;
        }

        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            corner0,
            corner1,
            region0,
            region1,
        });

        for (region, other) in [(region0, region1), (region1, region0)] {
            let r = &mut self.regions[region];
            r.borders.push(id);
            push_unique(&mut r.neighbors, other);
            push_unique(&mut r.corners, corner0);
            push_unique(&mut r.corners, corner1);
        }
        for (corner, other) in [(corner0, corner1), (corner1, corner0)] {
            let c = &mut self.corners[corner];
            c.edges.push(id);
            push_unique(&mut c.adjacent, other);
            push_unique(&mut c.touches, region0);
            push_unique(&mut c.touches, region1);
        }
    }

    /// Attach each world corner to the region whose center is nearest
    fn add_world_corners(&mut self) {
        if self.regions.is_empty() {
            return;
        }
        for p in self.target.corners() {
            let nearest = self
                .regions
                .iter()
                .min_by(|a, b| {
                    a.center
                        .distance_squared(p)
                        .total_cmp(&b.center.distance_squared(p))
                })
                .map(|r| r.id)
                .unwrap_or(0);
            let corner = self.make_corner(p);
            push_unique(&mut self.regions[nearest].corners, corner);
            push_unique(&mut self.corners[corner].touches, nearest);
        }
    }

    /// Sort every region's corners counter-clockwise around its center
    fn order_corners(&mut self) {
        let corners = &self.corners;
        for region in &mut self.regions {
            let center = region.center;
            region.corners.sort_by(|&a, &b| {
                let angle = |id: usize| {
                    let d = corners[id].location - center;
                    d.y.atan2(d.x)
                };
                angle(a).total_cmp(&angle(b))
            });
        }
    }
}

impl VoronoiGraph {
    /// Build the graph of `voronoi`, mapped from its plot bounds into `target`
    ///
    /// Regions follow the input order of the diagram's sites. Edges follow
    /// the diagram's edge order, skipping invisible ones.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `target` is not finite or is inverted.
    pub fn new(voronoi: &Voronoi, target: Rect) -> Result<Self> {
        let _t = Timed::debug("Graph build").items(voronoi.len());
        let target = Rect::try_new(target.min, target.max)?;
        let bounds = *voronoi.plot_bounds();

        let regions = voronoi
            .site_coords()
            .into_iter()
            .enumerate()
            .map(|(id, site)| Region {
                id,
                center: bounds.map_point(site, &target),
                corners: Vec::new(),
                borders: Vec::new(),
                neighbors: Vec::new(),
            })
            .collect();

        let mut builder = Builder {
            target,
            regions,
            corners: Vec::new(),
            edges: Vec::new(),
            corner_map: CornerMap::default(),
        };

        let sites = voronoi.sites();
        for edge in voronoi.edges() {
            let Some(ends) = edge.clipped_ends() else {
                continue;
            };
            builder.add_edge(
                bounds.map_point(ends.left, &target),
                bounds.map_point(ends.right, &target),
                sites[edge.left_site].input_index,
                sites[edge.right_site].input_index,
            );
        }
        builder.add_world_corners();
        builder.order_corners();

        log::debug!(
            "Graph: {} regions, {} corners ({} border), {} edges",
            builder.regions.len(),
            builder.corners.len(),
            builder.corners.iter().filter(|c| c.border).count(),
            builder.edges.len()
        );

        Ok(Self {
            bounds,
            target,
            regions: builder.regions,
            corners: builder.corners,
            edges: builder.edges,
        })
    }
}
