//! Voronoi diagram and its dual Delaunay triangulation
//!
//! [`Voronoi`] runs Fortune's sweep over a point set and keeps the clipped
//! edges together with the sites they bisect. Every query that names a site
//! takes the site's position in the input slice; sweep order stays internal.

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::geometry::{winding, LineSegment, Rect, Winding};
use crate::util::Timed;

use super::edge::Edge;
use super::fortune;
use super::reorder::{Criterion, EdgeReorderer};
use super::site::{Site, SiteList};
use super::spanning_tree::{kruskal, SpanningTreeKind};

/// Points closer than this are the same point when assembling region polygons
pub const CLOSE_ENOUGH_EPSILON: f64 = 0.005;

#[inline]
fn close_enough(p: DVec2, q: DVec2) -> bool {
    p.distance(q) < CLOSE_ENOUGH_EPSILON
}

/// A Voronoi diagram clipped to its plot bounds
///
/// # Example
///
/// ```
/// use rust_voronoi_map::{Rect, Voronoi};
/// use glam::DVec2;
///
/// let points = [DVec2::new(2.0, 5.0), DVec2::new(8.0, 5.0)];
/// let voronoi = Voronoi::new(&points, Rect::from_origin_size(0.0, 0.0, 10.0, 10.0)).unwrap();
///
/// // one bisector, x = 5, splits the square in two
/// assert_eq!(voronoi.edges().len(), 1);
/// let left = voronoi.region(0).unwrap();
/// assert_eq!(left.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Voronoi {
    /// Sites in sweep order
    sites: Vec<Site>,
    /// Input position -> sweep position
    sweep_index: Vec<usize>,
    edges: Vec<Edge>,
    vertex_count: usize,
    plot_bounds: Rect,
}

impl Voronoi {
    /// Build the diagram of `points` clipped to `plot_bounds`
    ///
    /// Coincident points are accepted; every copy after the first gets an
    /// empty region.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a point or a bounds corner is not finite, or
    /// if the bounds are inverted.
    pub fn new(points: &[DVec2], plot_bounds: Rect) -> Result<Self> {
        let _t = Timed::debug("Voronoi diagram").items(points.len());
        let plot_bounds = Rect::try_new(plot_bounds.min, plot_bounds.max)?;
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(VoronoiError::InvalidInput(format!(
                "site {} is not finite ({})",
                i, p
            )));
        }

        let mut list = SiteList::new();
        for (i, &p) in points.iter().enumerate() {
            list.push(Site::new(p, i));
        }
        list.sort();
        let result = fortune::sweep(&mut list, &plot_bounds)?;

        let sites = list.into_sites();
        let mut sweep_index = vec![0; sites.len()];
        for site in &sites {
            sweep_index[site.input_index] = site.index;
        }

        Ok(Self {
            sites,
            sweep_index,
            edges: result.edges,
            vertex_count: result.vertex_count,
            plot_bounds,
        })
    }

    #[inline]
    pub fn plot_bounds(&self) -> &Rect {
        &self.plot_bounds
    }

    /// Number of sites
    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Number of Voronoi vertices produced by circle events
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// All bisector edges, visible or not; their site fields are sweep positions
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sites in sweep order
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// The site given as `points[input_index]`
    pub fn site(&self, input_index: usize) -> Option<&Site> {
        self.sweep_index.get(input_index).map(|&i| &self.sites[i])
    }

    fn site_or_err(&self, input_index: usize) -> Result<&Site> {
        self.site(input_index)
            .ok_or(VoronoiError::RegionNotFound(input_index))
    }

    /// Site coordinates in input order
    pub fn site_coords(&self) -> Vec<DVec2> {
        self.sweep_index
            .iter()
            .map(|&i| self.sites[i].coord)
            .collect()
    }

    /// Clipped region polygon of the site at `input_index`, counter-clockwise
    ///
    /// Empty when the site has no visible edges.
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if `input_index` is out of range.
    pub fn region(&self, input_index: usize) -> Result<Vec<DVec2>> {
        let site = self.site_or_err(input_index)?;
        Ok(self.region_of(site))
    }

    /// Every region polygon, in input order
    pub fn regions(&self) -> Vec<Vec<DVec2>> {
        self.sweep_index
            .iter()
            .map(|&i| self.region_of(&self.sites[i]))
            .collect()
    }

    fn region_of(&self, site: &Site) -> Vec<DVec2> {
        if site.edges.is_empty() {
            return Vec::new();
        }
        let chain = EdgeReorderer::new(&site.edges, &self.edges, Criterion::Vertex);
        let mut points = clip_to_bounds(&chain, &self.edges, &self.plot_bounds, site.coord);
        if winding(&points) == Winding::Clockwise {
            points.reverse();
        }
        points
    }

    /// Input indices of the sites sharing a bisector with the site at `input_index`
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if `input_index` is out of range.
    pub fn neighbor_sites_for_site(&self, input_index: usize) -> Result<Vec<usize>> {
        let site = self.site_or_err(input_index)?;
        Ok(site
            .edges
            .iter()
            .map(|&e| {
                let edge = &self.edges[e];
                let other = if edge.left_site == site.index {
                    edge.right_site
                } else {
                    edge.left_site
                };
                self.sites[other].input_index
            })
            .collect())
    }

    /// Visible Voronoi segments bounding the region of the site at `input_index`
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if `input_index` is out of range.
    pub fn voronoi_boundary_for_site(&self, input_index: usize) -> Result<Vec<LineSegment>> {
        let site = self.site_or_err(input_index)?;
        Ok(site
            .edges
            .iter()
            .filter_map(|&e| self.edges[e].voronoi_edge())
            .collect())
    }

    /// Delaunay lines from the site at `input_index` to each of its neighbors
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if `input_index` is out of range.
    pub fn delaunay_lines_for_site(&self, input_index: usize) -> Result<Vec<LineSegment>> {
        let site = self.site_or_err(input_index)?;
        Ok(site
            .edges
            .iter()
            .map(|&e| self.edges[e].delaunay_line(&self.sites))
            .collect())
    }

    /// Every visible clipped Voronoi segment
    pub fn voronoi_diagram(&self) -> Vec<LineSegment> {
        self.edges.iter().filter_map(Edge::voronoi_edge).collect()
    }

    /// Every Delaunay line
    pub fn delaunay_triangulation(&self) -> Vec<LineSegment> {
        self.edges
            .iter()
            .map(|e| e.delaunay_line(&self.sites))
            .collect()
    }

    fn hull_edges(&self) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_part_of_convex_hull())
            .map(|(i, _)| i)
            .collect()
    }

    /// Delaunay lines along the convex hull of the sites
    pub fn hull(&self) -> Vec<LineSegment> {
        self.hull_edges()
            .into_iter()
            .map(|e| self.edges[e].delaunay_line(&self.sites))
            .collect()
    }

    /// Convex hull sites as one chained polygon
    pub fn hull_points_in_order(&self) -> Vec<DVec2> {
        let hull_edges = self.hull_edges();
        EdgeReorderer::new(&hull_edges, &self.edges, Criterion::Site)
            .iter()
            .map(|(e, side)| self.sites[self.edges[e].site(side)].coord)
            .collect()
    }

    /// Minimum or maximum spanning tree of the Delaunay triangulation
    pub fn spanning_tree(&self, kind: SpanningTreeKind) -> Vec<LineSegment> {
        kruskal(&self.edges, &self.sites, kind)
    }
}

/// Assemble a closed polygon from a vertex-chained edge list, walking along
/// the bounds wherever consecutive visible edges leave and re-enter them
fn clip_to_bounds(chain: &EdgeReorderer, edges: &[Edge], bounds: &Rect, site: DVec2) -> Vec<DVec2> {
    let segments: Vec<(DVec2, DVec2)> = chain
        .iter()
        .filter_map(|(e, side)| {
            edges[e]
                .clipped_ends()
                .map(|ends| (ends.get(side), ends.get(side.other())))
        })
        .collect();
    let Some(&(start, end)) = segments.first() else {
        return Vec::new();
    };

    // the chain turns the same way around the site all along; the largest
    // cross product gives the most reliable sign
    let turn = segments
        .iter()
        .map(|&(a, b)| (b - a).perp_dot(site - a))
        .fold(0.0_f64, |best, t| if t.abs() > best.abs() { t } else { best });
    let counter_clockwise = turn >= 0.0;

    let mut points = Vec::with_capacity(segments.len() * 2 + 4);
    points.push(start);
    points.push(end);
    for &(near, far) in &segments[1..] {
        connect(&mut points, near, far, bounds, counter_clockwise);
    }
    if let Some(&last) = points.last() {
        if !close_enough(last, start) {
            walk_bounds(&mut points, last, start, bounds, counter_clockwise);
        }
    }
    points
}

/// Append the segment `near -> far` to the polygon, going around the bounds
/// first when it does not start where the polygon currently ends
fn connect(points: &mut Vec<DVec2>, near: DVec2, far: DVec2, bounds: &Rect, counter_clockwise: bool) {
    let Some(&last) = points.last() else {
        return;
    };
    if !close_enough(last, near) {
        walk_bounds(points, last, near, bounds, counter_clockwise);
        points.push(near);
    }
    if !close_enough(points[0], far) {
        points.push(far);
    }
}

/// Push the bounds corners passed when following the perimeter from `from`
/// to `to` in the given direction
///
/// Both points are taken to lie on the perimeter. A corner at either end is
/// not repeated.
fn walk_bounds(points: &mut Vec<DVec2>, from: DVec2, to: DVec2, bounds: &Rect, counter_clockwise: bool) {
    let perimeter = bounds.perimeter();
    if perimeter <= 0.0 {
        return;
    }
    let start = bounds.perimeter_position(from);
    let distance = |position: f64| {
        let d = if counter_clockwise {
            position - start
        } else {
            start - position
        };
        d.rem_euclid(perimeter)
    };
    let span = distance(bounds.perimeter_position(to));
    let eps = perimeter * 1e-12;

    let mut passed: Vec<(f64, DVec2)> = bounds
        .corners()
        .into_iter()
        .map(|corner| (distance(bounds.perimeter_position(corner)), corner))
        .filter(|&(d, _)| d > eps && d < span - eps)
        .collect();
    passed.sort_by(|a, b| a.0.total_cmp(&b.0));
    points.extend(passed.into_iter().map(|(_, corner)| corner));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_area;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn square(size: f64) -> Rect {
        Rect::from_origin_size(0.0, 0.0, size, size)
    }

    fn points(coords: &[(f64, f64)]) -> Vec<DVec2> {
        coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    fn random_points(n: usize, size: f64, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| DVec2::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size)))
            .collect()
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let bounds = square(10.0);
        assert!(Voronoi::new(&[DVec2::new(f64::NAN, 1.0)], bounds).is_err());
        let inverted = Rect::new(DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0));
        assert!(Voronoi::new(&[DVec2::new(1.0, 1.0)], inverted).is_err());
    }

    #[test]
    fn test_empty_and_single_site() {
        let empty = Voronoi::new(&[], square(10.0)).unwrap();
        assert!(empty.is_empty());
        assert!(empty.regions().is_empty());
        assert!(empty.hull_points_in_order().is_empty());

        let single = Voronoi::new(&[DVec2::new(3.0, 3.0)], square(10.0)).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single.region(0).unwrap().is_empty());
        assert_eq!(single.region(1), Err(VoronoiError::RegionNotFound(1)));
    }

    #[test]
    fn test_two_sites_split_the_square() {
        let voronoi = Voronoi::new(&points(&[(8.0, 5.0), (2.0, 5.0)]), square(10.0)).unwrap();

        let right = voronoi.region(0).unwrap();
        let left = voronoi.region(1).unwrap();
        assert!((polygon_area(&right) - 50.0).abs() < 1e-9);
        assert!((polygon_area(&left) - 50.0).abs() < 1e-9);
        assert_eq!(winding(&left), Winding::CounterClockwise);
        assert!(left.iter().all(|p| p.x <= 5.0 + 1e-12));
        assert!(right.iter().all(|p| p.x >= 5.0 - 1e-12));

        assert_eq!(voronoi.neighbor_sites_for_site(0).unwrap(), vec![1]);
        assert_eq!(voronoi.site_coords(), points(&[(8.0, 5.0), (2.0, 5.0)]));
    }

    #[test]
    fn test_regions_tile_the_bounds() {
        let bounds = Rect::from_origin_size(0.0, 0.0, 100.0, 60.0);
        let sites = random_points(40, 60.0, 7)
            .into_iter()
            .map(|p| DVec2::new(p.x * 100.0 / 60.0, p.y))
            .collect::<Vec<_>>();
        let voronoi = Voronoi::new(&sites, bounds).unwrap();

        let regions = voronoi.regions();
        assert_eq!(regions.len(), 40);
        let total: f64 = regions.iter().map(|r| polygon_area(r)).sum();
        assert!((total - 6000.0).abs() < 1e-6, "total area {}", total);
        for (i, region) in regions.iter().enumerate() {
            assert!(region.len() >= 3, "region {} has {} points", i, region.len());
            assert_eq!(winding(region), Winding::CounterClockwise);
        }
    }

    fn assert_tiles(voronoi: &Voronoi) {
        let bounds = voronoi.plot_bounds();
        let regions = voronoi.regions();
        let total: f64 = regions.iter().map(|r| polygon_area(r)).sum();
        let expected = bounds.width() * bounds.height();
        assert!((total - expected).abs() < 1e-6 * expected, "total area {} of {}", total, expected);

        for (region, site) in regions.iter().zip(voronoi.site_coords()) {
            assert_eq!(winding(region), Winding::CounterClockwise);
            for (i, &a) in region.iter().enumerate() {
                let b = region[(i + 1) % region.len()];
                assert!((b - a).perp_dot(site - a) > -1e-9, "site {} outside {:?}", site, region);
            }
        }
    }

    fn owners_of_corner(voronoi: &Voronoi, corner: DVec2) -> Vec<usize> {
        voronoi
            .regions()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.iter().any(|p| p.distance(corner) < 1e-9))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_cell_wrapping_three_corners() {
        let voronoi = Voronoi::new(&points(&[(1.0, 1.0), (5.0, 5.0)]), square(10.0)).unwrap();

        let small = voronoi.region(0).unwrap();
        let large = voronoi.region(1).unwrap();
        assert!((polygon_area(&small) - 18.0).abs() < 1e-9);
        assert!((polygon_area(&large) - 82.0).abs() < 1e-9);
        assert_eq!(small.len(), 3);
        assert_eq!(large.len(), 5);

        assert_eq!(owners_of_corner(&voronoi, DVec2::ZERO), vec![0]);
        for corner in [DVec2::new(10.0, 0.0), DVec2::new(10.0, 10.0), DVec2::new(0.0, 10.0)] {
            assert_eq!(owners_of_corner(&voronoi, corner), vec![1]);
        }
        assert_tiles(&voronoi);
    }

    #[test]
    fn test_small_site_sets_tile_the_bounds() {
        // horizontal split: two corners each
        let voronoi = Voronoi::new(&points(&[(5.0, 2.0), (5.0, 8.0)]), square(10.0)).unwrap();
        assert_tiles(&voronoi);
        assert_eq!(owners_of_corner(&voronoi, DVec2::new(10.0, 10.0)), vec![1]);

        // one cell holds three corners, the other two share a side
        let voronoi = Voronoi::new(
            &points(&[(10.0, 10.0), (30.0, 12.0), (12.0, 30.0)]),
            square(100.0),
        )
        .unwrap();
        assert_tiles(&voronoi);
        assert_eq!(owners_of_corner(&voronoi, DVec2::ZERO), vec![0]);
        assert_eq!(owners_of_corner(&voronoi, DVec2::new(100.0, 0.0)), vec![1]);
        assert_eq!(owners_of_corner(&voronoi, DVec2::new(0.0, 100.0)), vec![2]);

        // one corner per cell
        let voronoi = Voronoi::new(
            &points(&[(20.0, 20.0), (80.0, 25.0), (75.0, 80.0), (25.0, 75.0)]),
            square(100.0),
        )
        .unwrap();
        assert_tiles(&voronoi);
        let corners = voronoi.plot_bounds().corners();
        for (i, corner) in corners.into_iter().enumerate() {
            assert_eq!(owners_of_corner(&voronoi, corner), vec![i]);
        }
    }

    #[test]
    fn test_random_small_site_sets_tile_the_bounds() {
        let bounds = Rect::from_origin_size(-3.0, 2.0, 12.0, 7.0);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..60 {
            let count = rng.gen_range(2..=5);
            let sites: Vec<DVec2> = (0..count)
                .map(|_| {
                    DVec2::new(
                        rng.gen_range(bounds.min.x..bounds.max.x),
                        rng.gen_range(bounds.min.y..bounds.max.y),
                    )
                })
                .collect();
            assert_tiles(&Voronoi::new(&sites, bounds).unwrap());
        }
    }

    #[test]
    fn test_clipped_segments_stay_in_bounds() {
        let bounds = square(50.0);
        let voronoi = Voronoi::new(&random_points(100, 50.0, 3), bounds).unwrap();
        for segment in voronoi.voronoi_diagram() {
            for p in [segment.p0, segment.p1] {
                assert!(p.x >= -1e-9 && p.x <= 50.0 + 1e-9);
                assert!(p.y >= -1e-9 && p.y <= 50.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_delaunay_queries() {
        // a square of four sites plus its center
        let voronoi = Voronoi::new(
            &points(&[(2.0, 2.0), (8.0, 2.5), (8.5, 8.0), (2.5, 8.5), (5.0, 5.0)]),
            square(10.0),
        )
        .unwrap();

        let center_lines = voronoi.delaunay_lines_for_site(4).unwrap();
        assert_eq!(center_lines.len(), 4);
        let mut neighbors = voronoi.neighbor_sites_for_site(4).unwrap();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 1, 2, 3]);
        assert_eq!(voronoi.voronoi_boundary_for_site(4).unwrap().len(), 4);

        assert_eq!(voronoi.delaunay_triangulation().len(), voronoi.edges().len());
        assert_eq!(voronoi.hull().len(), 4);
        assert_eq!(voronoi.hull_points_in_order().len(), 4);

        let tree = voronoi.spanning_tree(SpanningTreeKind::Minimum);
        assert_eq!(tree.len(), 4);
    }
}
