//! Chaining unordered edges into a path
//!
//! A site's bisectors come out of the sweep in creation order. Region polygons
//! need them chained vertex to vertex, and the hull needs its edges chained
//! site to site. [`EdgeReorderer`] does both, recording for each edge which of
//! its ends faces the start of the chain.

use std::collections::VecDeque;

use crate::geometry::Side;

use super::edge::Edge;

/// Which endpoints link consecutive edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Chain by shared Voronoi vertices
    Vertex,
    /// Chain by shared sites
    Site,
}

/// Endpoint key used for matching. `None` is an unbounded end; two unbounded
/// ends match each other so chains can run around infinity.
type Key = Option<usize>;

/// Edge IDs in chain order plus the orientation of each edge in the chain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeReorderer {
    edges: Vec<usize>,
    orientations: Vec<Side>,
}

impl EdgeReorderer {
    /// Reorder `edge_ids` (indices into `edges`) by `criterion`
    ///
    /// The first edge anchors the chain with `Left` orientation. Every later
    /// edge is attached to whichever end of the chain it shares an endpoint
    /// with. The result is empty when an endpoint is [`Vertex::AT_INFINITY`]
    /// or when the edges do not form one connected chain.
    ///
    /// [`Vertex::AT_INFINITY`]: super::edge::Vertex::AT_INFINITY
    pub fn new(edge_ids: &[usize], edges: &[Edge], criterion: Criterion) -> Self {
        match reorder(edge_ids, edges, criterion) {
            Some((edges, orientations)) => Self {
                edges,
                orientations,
            },
            None => Self::default(),
        }
    }

    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    #[inline]
    pub fn orientations(&self) -> &[Side] {
        &self.orientations
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `(edge, orientation)` pairs in chain order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Side)> + '_ {
        self.edges
            .iter()
            .copied()
            .zip(self.orientations.iter().copied())
    }
}

/// Endpoint keys of `edge`, or `None` if one of them is the infinity sentinel
fn endpoints(edge: &Edge, criterion: Criterion) -> Option<(Key, Key)> {
    match criterion {
        Criterion::Site => Some((Some(edge.left_site), Some(edge.right_site))),
        Criterion::Vertex => {
            let key = |side: Side| match edge.vertex(side) {
                Some(v) if v.is_at_infinity() => Err(()),
                Some(v) => Ok(Some(v.index)),
                None => Ok(None),
            };
            Some((key(Side::Left).ok()?, key(Side::Right).ok()?))
        }
    }
}

fn reorder(
    edge_ids: &[usize],
    edges: &[Edge],
    criterion: Criterion,
) -> Option<(Vec<usize>, Vec<Side>)> {
    let (&first, rest) = edge_ids.split_first()?;
    let (mut first_point, mut last_point) = endpoints(&edges[first], criterion)?;

    let mut chain = VecDeque::with_capacity(edge_ids.len());
    let mut orientations = VecDeque::with_capacity(edge_ids.len());
    chain.push_back(first);
    orientations.push_back(Side::Left);

    let mut done = vec![false; rest.len()];
    let mut remaining = rest.len();
    while remaining > 0 {
        let before = remaining;
        for (i, &id) in rest.iter().enumerate() {
            if done[i] {
                continue;
            }
            let (left_point, right_point) = endpoints(&edges[id], criterion)?;
            if left_point == last_point {
                last_point = right_point;
                chain.push_back(id);
                orientations.push_back(Side::Left);
            } else if right_point == first_point {
                first_point = left_point;
                chain.push_front(id);
                orientations.push_front(Side::Left);
            } else if left_point == first_point {
                first_point = right_point;
                chain.push_front(id);
                orientations.push_front(Side::Right);
            } else if right_point == last_point {
                last_point = left_point;
                chain.push_back(id);
                orientations.push_back(Side::Right);
            } else {
                continue;
            }
            done[i] = true;
            remaining -= 1;
        }
        if remaining == before {
            log::warn!(
                "edge chain is disconnected: {} of {} edges left over",
                remaining,
                edge_ids.len()
            );
            return None;
        }
    }

    Some((chain.into(), orientations.into()))
}
