//! Half-edge arena shared by the beachline and the event queue
//!
//! Both structures link the same nodes, so nodes live in one arena and are
//! referred to by [`HalfedgeId`]. Removing a node from the beachline only
//! tombstones it (its edge slot becomes [`EdgeSlot::Deleted`]); a stale hash
//! bucket can still point at it, so slots are only reclaimed when the arena is
//! dropped at the end of the sweep.

use std::ops::{Index, IndexMut};

use glam::DVec2;

use crate::geometry::Side;

use super::edge::{Edge, PARALLEL_EPSILON};
use super::site::{compare_by_y_then_x, Site};

/// Handle to a half-edge slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HalfedgeId(u32);

/// What a half-edge currently wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeSlot {
    /// Beachline sentinel or queue bucket head
    Dummy,
    /// Removed from the beachline
    Deleted,
    Edge(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct Halfedge {
    pub edge: EdgeSlot,
    pub side: Side,
    pub left: Option<HalfedgeId>,
    pub right: Option<HalfedgeId>,
    pub next_in_queue: Option<HalfedgeId>,
    /// Pending circle-event vertex
    pub vertex: Option<DVec2>,
    /// Sweep position at which the pending circle event fires
    pub ystar: f64,
}

impl Halfedge {
    /// Whether `p` lies left of this half-edge's arc boundary
    ///
    /// The fast path settles the `a == 1` case with sign tests where it can;
    /// the slow path compares squared distances along the parabola.
    pub fn is_left_of(&self, p: DVec2, edges: &[Edge], sites: &[Site]) -> bool {
        let edge = match self.edge {
            EdgeSlot::Edge(e) => &edges[e],
            _ => unreachable!("is_left_of on a sentinel or deleted half-edge"),
        };
        let top_site = sites[edge.right_site].coord;
        let right_of_site = p.x > top_site.x;
        if right_of_site && self.side == Side::Left {
            return true;
        }
        if !right_of_site && self.side == Side::Right {
            return false;
        }

        let above = if edge.a == 1.0 {
            let dyp = p.y - top_site.y;
            let dxp = p.x - top_site.x;
            let mut fast = false;
            let mut above;
            if (!right_of_site && edge.b < 0.0) || (right_of_site && edge.b >= 0.0) {
                above = dyp >= edge.b * dxp;
                fast = above;
            } else {
                above = p.x + p.y * edge.b > edge.c;
                if edge.b < 0.0 {
                    above = !above;
                }
                if !above {
                    fast = true;
                }
            }
            if !fast {
                let dxs = top_site.x - sites[edge.left_site].coord.x;
                above = edge.b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + edge.b * edge.b);
                if edge.b < 0.0 {
                    above = !above;
                }
            }
            above
        } else {
            let yl = edge.c - edge.a * p.x;
            let t1 = p.y - yl;
            let t2 = p.x - top_site.x;
            let t3 = yl - top_site.y;
            t1 * t1 > t2 * t2 + t3 * t3
        };

        if self.side == Side::Left {
            above
        } else {
            !above
        }
    }
}

/// Arena owning every half-edge created during one sweep
#[derive(Debug, Default)]
pub(crate) struct Halfedges {
    nodes: Vec<Halfedge>,
}

impl Halfedges {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn create(&mut self, edge: usize, side: Side) -> HalfedgeId {
        self.push(EdgeSlot::Edge(edge), side)
    }

    pub fn create_dummy(&mut self) -> HalfedgeId {
        self.push(EdgeSlot::Dummy, Side::Left)
    }

    fn push(&mut self, edge: EdgeSlot, side: Side) -> HalfedgeId {
        let id = HalfedgeId(self.nodes.len() as u32);
        self.nodes.push(Halfedge {
            edge,
            side,
            left: None,
            right: None,
            next_in_queue: None,
            vertex: None,
            ystar: 0.0,
        });
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Edge ID of a live half-edge
    #[inline]
    pub fn edge_of(&self, id: HalfedgeId) -> Option<usize> {
        match self[id].edge {
            EdgeSlot::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Circle-event point where the bisectors of `he0` and `he1` meet, if that
    /// point is a genuine upcoming event.
    ///
    /// Rejects sentinels, bisectors sharing their right site, near-parallel
    /// bisectors, and points on the wrong side of the younger edge's right site.
    pub fn intersect(
        &self,
        he0: HalfedgeId,
        he1: HalfedgeId,
        edges: &[Edge],
        sites: &[Site],
    ) -> Option<DVec2> {
        let (e0, e1) = (self.edge_of(he0)?, self.edge_of(he1)?);
        let (edge0, edge1) = (&edges[e0], &edges[e1]);
        if edge0.right_site == edge1.right_site {
            return None;
        }

        let determinant = edge0.a * edge1.b - edge0.b * edge1.a;
        if determinant.abs() < PARALLEL_EPSILON {
            return None;
        }
        let x = (edge0.c * edge1.b - edge1.c * edge0.b) / determinant;
        let y = (edge1.c * edge0.a - edge0.c * edge1.a) / determinant;

        let (he, edge) = if compare_by_y_then_x(
            sites[edge0.right_site].coord,
            sites[edge1.right_site].coord,
        )
        .is_lt()
        {
            (he0, edge0)
        } else {
            (he1, edge1)
        };
        let right_of_site = x >= sites[edge.right_site].coord.x;
        let side = self[he].side;
        if (right_of_site && side == Side::Left) || (!right_of_site && side == Side::Right) {
            return None;
        }
        Some(DVec2::new(x, y))
    }
}

impl Index<HalfedgeId> for Halfedges {
    type Output = Halfedge;

    #[inline]
    fn index(&self, id: HalfedgeId) -> &Halfedge {
        &self.nodes[id.0 as usize]
    }
}

impl IndexMut<HalfedgeId> for Halfedges {
    #[inline]
    fn index_mut(&mut self, id: HalfedgeId) -> &mut Halfedge {
        &mut self.nodes[id.0 as usize]
    }
}
