//! Bisector edges and Voronoi vertices
//!
//! An [`Edge`] is the perpendicular bisector of two sites stored as the line
//! `a·x + b·y = c`, normalised so that either `a` or `b` is exactly `1.0`.
//! Its endpoints are filled in by circle events; an endpoint that never gets
//! a vertex stays unbounded, which makes the edge part of the convex hull.

use glam::DVec2;

use crate::geometry::{LineSegment, Rect, Side};

use super::site::Site;

/// Determinant below which two bisectors are treated as parallel
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// A Voronoi vertex created by a circle event
///
/// Vertices are immutable; identity is the index assigned when the circle
/// event that produced the vertex fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub index: usize,
    pub coord: DVec2,
}

impl Vertex {
    /// Sentinel for chains that run off to infinity
    pub const AT_INFINITY: Vertex = Vertex {
        index: usize::MAX,
        coord: DVec2::new(f64::NAN, f64::NAN),
    };

    #[inline]
    pub fn is_at_infinity(&self) -> bool {
        self.index == usize::MAX
    }
}

/// Clipped endpoints of a visible edge, tagged by side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedEnds {
    pub left: DVec2,
    pub right: DVec2,
}

impl ClippedEnds {
    #[inline]
    pub fn get(&self, side: Side) -> DVec2 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// A bisector edge between two sites
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Sorted index of the site on the left of the bisector
    pub left_site: usize,
    /// Sorted index of the site on the right of the bisector
    pub right_site: usize,
    pub left_vertex: Option<Vertex>,
    pub right_vertex: Option<Vertex>,
    clipped: Option<ClippedEnds>,
}

impl Edge {
    /// Perpendicular bisector of `site0` and `site1`
    ///
    /// Normalises on the axis with the larger delta so the other coefficient
    /// stays within `[-1, 1]`.
    pub fn bisector(site0: &Site, site1: &Site) -> Self {
        let d = site1.coord - site0.coord;
        let mut c = site0.coord.dot(d) + d.length_squared() * 0.5;
        let (a, b) = if d.x.abs() > d.y.abs() {
            c /= d.x;
            (1.0, d.y / d.x)
        } else {
            c /= d.y;
            (d.x / d.y, 1.0)
        };
        Self {
            a,
            b,
            c,
            left_site: site0.index,
            right_site: site1.index,
            left_vertex: None,
            right_vertex: None,
            clipped: None,
        }
    }

    #[inline]
    pub fn site(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left_site,
            Side::Right => self.right_site,
        }
    }

    #[inline]
    pub fn vertex(&self, side: Side) -> Option<Vertex> {
        match side {
            Side::Left => self.left_vertex,
            Side::Right => self.right_vertex,
        }
    }

    pub fn set_vertex(&mut self, side: Side, vertex: Vertex) {
        match side {
            Side::Left => self.left_vertex = Some(vertex),
            Side::Right => self.right_vertex = Some(vertex),
        }
    }

    /// Whether one of the endpoints is unbounded
    #[inline]
    pub fn is_part_of_convex_hull(&self) -> bool {
        self.left_vertex.is_none() || self.right_vertex.is_none()
    }

    /// Whether clipping left a segment inside the plot bounds
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.clipped.is_some()
    }

    #[inline]
    pub fn clipped_ends(&self) -> Option<&ClippedEnds> {
        self.clipped.as_ref()
    }

    /// The clipped Voronoi segment, left end first
    pub fn voronoi_edge(&self) -> Option<LineSegment> {
        self.clipped.map(|ends| LineSegment::new(ends.left, ends.right))
    }

    /// The dual Delaunay segment between the two sites
    pub fn delaunay_line(&self, sites: &[Site]) -> LineSegment {
        LineSegment::new(sites[self.left_site].coord, sites[self.right_site].coord)
    }

    /// Distance between the two sites
    pub fn sites_distance(&self, sites: &[Site]) -> f64 {
        sites[self.left_site].dist(sites[self.right_site].coord)
    }

    /// Clip the (possibly unbounded) edge to `bounds`
    ///
    /// Walks the line from each finite vertex, or from the rectangle side when
    /// the end is unbounded, clamping against all four sides. Endpoints whose
    /// original vertex lies inside `bounds` are snapped back to that vertex so
    /// coincident vertices stay bit-identical.
    pub fn clip_vertices(&mut self, bounds: &Rect) {
        let (xmin, ymin, xmax, ymax) = (bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y);
        let (a, b, c) = (self.a, self.b, self.c);

        // vertex0 is always the end with the smaller y (a == 1) or x (b == 1)
        let swapped = a == 1.0 && b >= 0.0;
        let (vertex0, vertex1) = if swapped {
            (self.right_vertex, self.left_vertex)
        } else {
            (self.left_vertex, self.right_vertex)
        };

        let (mut x0, mut y0, mut x1, mut y1);
        if a == 1.0 {
            y0 = match vertex0 {
                Some(v) if v.coord.y > ymin => v.coord.y,
                _ => ymin,
            };
            if y0 > ymax {
                self.clipped = None;
                return;
            }
            x0 = c - b * y0;

            y1 = match vertex1 {
                Some(v) if v.coord.y < ymax => v.coord.y,
                _ => ymax,
            };
            if y1 < ymin {
                self.clipped = None;
                return;
            }
            x1 = c - b * y1;

            if (x0 > xmax && x1 > xmax) || (x0 < xmin && x1 < xmin) {
                self.clipped = None;
                return;
            }

            if x0 > xmax {
                x0 = xmax;
                y0 = (c - x0) / b;
            } else if x0 < xmin {
                x0 = xmin;
                y0 = (c - x0) / b;
            }
            if x1 > xmax {
                x1 = xmax;
                y1 = (c - x1) / b;
            } else if x1 < xmin {
                x1 = xmin;
                y1 = (c - x1) / b;
            }
        } else {
            x0 = match vertex0 {
                Some(v) if v.coord.x > xmin => v.coord.x,
                _ => xmin,
            };
            if x0 > xmax {
                self.clipped = None;
                return;
            }
            y0 = c - a * x0;

            x1 = match vertex1 {
                Some(v) if v.coord.x < xmax => v.coord.x,
                _ => xmax,
            };
            if x1 < xmin {
                self.clipped = None;
                return;
            }
            y1 = c - a * x1;

            if (y0 > ymax && y1 > ymax) || (y0 < ymin && y1 < ymin) {
                self.clipped = None;
                return;
            }

            if y0 > ymax {
                y0 = ymax;
                x0 = (c - y0) / a;
            } else if y0 < ymin {
                y0 = ymin;
                x0 = (c - y0) / a;
            }
            if y1 > ymax {
                y1 = ymax;
                x1 = (c - y1) / a;
            } else if y1 < ymin {
                y1 = ymin;
                x1 = (c - y1) / a;
            }
        }

        let (p0, p1) = (DVec2::new(x0, y0), DVec2::new(x1, y1));
        let mut ends = if swapped {
            ClippedEnds { left: p1, right: p0 }
        } else {
            ClippedEnds { left: p0, right: p1 }
        };

        if let Some(v) = self.left_vertex.filter(|v| bounds.contains(v.coord)) {
            ends.left = v.coord;
        }
        if let Some(v) = self.right_vertex.filter(|v| bounds.contains(v.coord)) {
            ends.right = v.coord;
        }
        self.clipped = Some(ends);
    }
}
