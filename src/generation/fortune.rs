//! Fortune's sweep
//!
//! Alternates site events and circle events until both the site list and the
//! event queue are exhausted, then clips every edge to the plot bounds. The
//! half-edge arena, beachline and queue belong to one call and are dropped
//! when it returns.

use glam::DVec2;

use crate::error::Result;
use crate::geometry::{Rect, Side};
use crate::util::Timed;

use super::beachline::Beachline;
use super::edge::{Edge, Vertex};
use super::event_queue::EventQueue;
use super::halfedge::{HalfedgeId, Halfedges};
use super::site::{compare_by_y_then_x, SiteList};

/// Output of one sweep
pub(crate) struct SweepResult {
    pub edges: Vec<Edge>,
    pub vertex_count: usize,
}

struct Sweep<'a> {
    sites: &'a mut SiteList,
    edges: Vec<Edge>,
    halfedges: Halfedges,
    beachline: Beachline,
    queue: EventQueue,
    bottom_most_site: usize,
    vertex_count: usize,
}

/// Run the sweep over `sites` (sorted here if needed) and clip to `plot_bounds`
pub(crate) fn sweep(sites: &mut SiteList, plot_bounds: &Rect) -> Result<SweepResult> {
    let _t = Timed::debug("Fortune sweep").items(sites.len());
    if !sites.is_sorted() {
        sites.sort();
    }
    sites.restart()?;

    let bottom_most_site = match sites.next()? {
        Some(site) => site,
        None => {
            return Ok(SweepResult {
                edges: Vec::new(),
                vertex_count: 0,
            })
        }
    };

    let data_bounds = sites.bounding_box()?;
    let sqrt_nsites = ((sites.len() + 4) as f64).sqrt() as usize;
    let mut halfedges = Halfedges::with_capacity(8 * sites.len() + 6 * sqrt_nsites);
    let beachline = Beachline::new(
        &mut halfedges,
        data_bounds.min.x,
        data_bounds.width(),
        sqrt_nsites,
    );
    let queue = EventQueue::new(
        &mut halfedges,
        data_bounds.min.y,
        data_bounds.height(),
        sqrt_nsites,
    );

    let site_count = sites.len();
    let (mut edges, vertex_count) = {
        let mut sweep = Sweep {
            sites,
            edges: Vec::with_capacity(3 * site_count),
            halfedges,
            beachline,
            queue,
            bottom_most_site,
            vertex_count: 0,
        };
        sweep.run()?;
        (sweep.edges, sweep.vertex_count)
    };
    for edge in edges.iter_mut() {
        edge.clip_vertices(plot_bounds);
    }

    log::debug!(
        "Fortune sweep: {} sites, {} edges ({} visible), {} vertices",
        site_count,
        edges.len(),
        edges.iter().filter(|e| e.is_visible()).count(),
        vertex_count
    );
    Ok(SweepResult {
        edges,
        vertex_count,
    })
}

impl Sweep<'_> {
    fn run(&mut self) -> Result<()> {
        let mut new_site = self.sites.next()?;
        let mut last_coord = self.site_coord(self.bottom_most_site);
        loop {
            let circle_min = self.queue.min(&self.halfedges);
            match (new_site, circle_min) {
                (Some(site), min)
                    if min.map_or(true, |m| {
                        compare_by_y_then_x(self.site_coord(site), m).is_lt()
                    }) =>
                {
                    // coincident sites are adjacent after sorting; later copies get no edges
                    let coord = self.site_coord(site);
                    if coord != last_coord {
                        self.site_event(site);
                        last_coord = coord;
                    } else {
                        log::trace!("skipping coincident site {} at {}", site, coord);
                    }
                    new_site = self.sites.next()?;
                }
                (_, Some(_)) => self.circle_event(),
                (None, None) => break,
                // the guard above accepts every site when the queue is empty
                (Some(_), None) => unreachable!(),
            }
        }
        Ok(())
    }

    #[inline]
    fn site_coord(&self, site: usize) -> DVec2 {
        self.sites.as_slice()[site].coord
    }

    fn left_region(&self, he: HalfedgeId) -> usize {
        match self.halfedges.edge_of(he) {
            Some(e) => self.edges[e].site(self.halfedges[he].side),
            None => self.bottom_most_site,
        }
    }

    fn right_region(&self, he: HalfedgeId) -> usize {
        match self.halfedges.edge_of(he) {
            Some(e) => self.edges[e].site(self.halfedges[he].side.other()),
            None => self.bottom_most_site,
        }
    }

    fn create_bisector(&mut self, site0: usize, site1: usize) -> usize {
        let sites = self.sites.as_mut_slice();
        let edge = Edge::bisector(&sites[site0], &sites[site1]);
        let id = self.edges.len();
        self.edges.push(edge);
        sites[site0].edges.push(id);
        sites[site1].edges.push(id);
        id
    }

    fn intersect(&self, he0: HalfedgeId, he1: HalfedgeId) -> Option<DVec2> {
        self.halfedges
            .intersect(he0, he1, &self.edges, self.sites.as_slice())
    }

    /// Give `he` the pending circle event at `vertex`, replacing any earlier one
    fn schedule(&mut self, he: HalfedgeId, vertex: DVec2, site: usize) {
        self.queue.remove(&mut self.halfedges, he);
        let node = &mut self.halfedges[he];
        node.vertex = Some(vertex);
        node.ystar = vertex.y + self.sites.as_slice()[site].dist(vertex);
        self.queue.insert(&mut self.halfedges, he);
    }

    /// A new arc appears: split the arc above `site` with a fresh bisector
    fn site_event(&mut self, site: usize) {
        let coord = self.site_coord(site);
        let lbnd = self.beachline.left_neighbor(
            &self.halfedges,
            coord,
            &self.edges,
            self.sites.as_slice(),
        );
        let rbnd = self.beachline.right_of(&self.halfedges, lbnd);
        let bottom_site = self.right_region(lbnd);

        let edge = self.create_bisector(bottom_site, site);

        let bisector = self.halfedges.create(edge, Side::Left);
        self.beachline.insert(&mut self.halfedges, lbnd, bisector);
        if let Some(vertex) = self.intersect(lbnd, bisector) {
            self.schedule(lbnd, vertex, site);
        }

        let lbnd = bisector;
        let bisector = self.halfedges.create(edge, Side::Right);
        self.beachline.insert(&mut self.halfedges, lbnd, bisector);
        if let Some(vertex) = self.intersect(bisector, rbnd) {
            self.schedule(bisector, vertex, site);
        }
    }

    /// An arc vanishes: fix a Voronoi vertex and join the outer neighbors
    fn circle_event(&mut self) {
        let lbnd = match self.queue.extract_min(&mut self.halfedges) {
            Some(he) => he,
            None => return,
        };
        let llbnd = self.beachline.left_of(&self.halfedges, lbnd);
        let rbnd = self.beachline.right_of(&self.halfedges, lbnd);
        let rrbnd = self.beachline.right_of(&self.halfedges, rbnd);
        let mut bottom_site = self.left_region(lbnd);
        let mut top_site = self.right_region(rbnd);

        let coord = self.halfedges[lbnd]
            .vertex
            .expect("extracted circle event without a vertex");
        let vertex = Vertex {
            index: self.vertex_count,
            coord,
        };
        self.vertex_count += 1;

        for he in [lbnd, rbnd] {
            let e = self
                .halfedges
                .edge_of(he)
                .expect("retired half-edge must wrap an edge");
            self.edges[e].set_vertex(self.halfedges[he].side, vertex);
        }
        self.beachline.remove(&mut self.halfedges, lbnd);
        self.queue.remove(&mut self.halfedges, rbnd);
        self.beachline.remove(&mut self.halfedges, rbnd);

        let mut side = Side::Left;
        if self.site_coord(bottom_site).y > self.site_coord(top_site).y {
            std::mem::swap(&mut bottom_site, &mut top_site);
            side = Side::Right;
        }
        let edge = self.create_bisector(bottom_site, top_site);
        let bisector = self.halfedges.create(edge, side);
        self.beachline.insert(&mut self.halfedges, llbnd, bisector);
        self.edges[edge].set_vertex(side.other(), vertex);

        if let Some(v) = self.intersect(llbnd, bisector) {
            self.schedule(llbnd, v, bottom_site);
        }
        if let Some(v) = self.intersect(bisector, rrbnd) {
            self.schedule(bisector, v, bottom_site);
        }
    }
}
