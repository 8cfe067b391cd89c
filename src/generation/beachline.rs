//! The sweep line's ordered list of half-edges
//!
//! A doubly linked list between two permanent sentinels, plus a hash table of
//! buckets over the x range that remembers a recently resolved half-edge near
//! each x so lookups rarely walk far.

use glam::DVec2;

use super::edge::Edge;
use super::halfedge::{EdgeSlot, HalfedgeId, Halfedges};
use super::site::Site;

pub(crate) struct Beachline {
    hash: Vec<Option<HalfedgeId>>,
    xmin: f64,
    delta_x: f64,
    pub left_end: HalfedgeId,
    pub right_end: HalfedgeId,
}

impl Beachline {
    pub fn new(halfedges: &mut Halfedges, xmin: f64, delta_x: f64, sqrt_nsites: usize) -> Self {
        let hash_size = (2 * sqrt_nsites).max(2);
        let left_end = halfedges.create_dummy();
        let right_end = halfedges.create_dummy();
        halfedges[left_end].right = Some(right_end);
        halfedges[right_end].left = Some(left_end);

        let mut hash = vec![None; hash_size];
        hash[0] = Some(left_end);
        hash[hash_size - 1] = Some(right_end);

        Self {
            hash,
            xmin,
            delta_x,
            left_end,
            right_end,
        }
    }

    /// Splice `new` in directly right of `after`
    pub fn insert(&self, halfedges: &mut Halfedges, after: HalfedgeId, new: HalfedgeId) {
        let right = halfedges[after]
            .right
            .expect("beachline node without a right neighbor");
        halfedges[new].left = Some(after);
        halfedges[new].right = Some(right);
        halfedges[right].left = Some(new);
        halfedges[after].right = Some(new);
    }

    /// Unlink `he` and tombstone its edge slot so stale buckets can detect it
    pub fn remove(&self, halfedges: &mut Halfedges, he: HalfedgeId) {
        let (left, right) = match (halfedges[he].left, halfedges[he].right) {
            (Some(left), Some(right)) => (left, right),
            _ => unreachable!("removing a half-edge that is not on the beachline"),
        };
        halfedges[left].right = Some(right);
        halfedges[right].left = Some(left);
        let node = &mut halfedges[he];
        node.edge = EdgeSlot::Deleted;
        node.left = None;
        node.right = None;
    }

    #[inline]
    pub fn left_of(&self, halfedges: &Halfedges, he: HalfedgeId) -> HalfedgeId {
        halfedges[he].left.expect("left sentinel has no left neighbor")
    }

    #[inline]
    pub fn right_of(&self, halfedges: &Halfedges, he: HalfedgeId) -> HalfedgeId {
        halfedges[he].right.expect("right sentinel has no right neighbor")
    }

    fn bucket_of(&self, x: f64) -> usize {
        let last = self.hash.len() - 1;
        let bucket = ((x - self.xmin) / self.delta_x * self.hash.len() as f64).floor();
        if bucket.is_nan() || bucket < 0.0 {
            0
        } else if bucket >= last as f64 {
            last
        } else {
            bucket as usize
        }
    }

    /// Cached half-edge for `bucket`, pruning entries that point at removed nodes
    fn get_hash(&mut self, halfedges: &Halfedges, bucket: isize) -> Option<HalfedgeId> {
        if bucket < 0 || bucket as usize >= self.hash.len() {
            return None;
        }
        let bucket = bucket as usize;
        let he = self.hash[bucket]?;
        if halfedges[he].edge == EdgeSlot::Deleted {
            self.hash[bucket] = None;
            return None;
        }
        Some(he)
    }

    /// The rightmost half-edge that is still left of `p`
    pub fn left_neighbor(
        &mut self,
        halfedges: &Halfedges,
        p: DVec2,
        edges: &[Edge],
        sites: &[Site],
    ) -> HalfedgeId {
        let bucket = self.bucket_of(p.x);
        let mut he = self.get_hash(halfedges, bucket as isize);
        let mut offset = 1isize;
        while he.is_none() {
            // the sentinels in the first and last buckets are never pruned
            he = self
                .get_hash(halfedges, bucket as isize - offset)
                .or_else(|| self.get_hash(halfedges, bucket as isize + offset));
            offset += 1;
        }
        let mut he = he.unwrap_or(self.left_end);

        let is_left_of = |id: HalfedgeId| halfedges[id].is_left_of(p, edges, sites);
        if he == self.left_end || (he != self.right_end && is_left_of(he)) {
            loop {
                he = self.right_of(halfedges, he);
                if he == self.right_end || !is_left_of(he) {
                    break;
                }
            }
            he = self.left_of(halfedges, he);
        } else {
            loop {
                he = self.left_of(halfedges, he);
                if he == self.left_end || is_left_of(he) {
                    break;
                }
            }
        }

        if bucket > 0 && bucket < self.hash.len() - 1 {
            self.hash[bucket] = Some(he);
        }
        he
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;

    fn sites(points: &[(f64, f64)]) -> Vec<Site> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Site::new(DVec2::new(x, y), i))
            .collect()
    }

    #[test]
    fn test_empty_beachline_returns_left_end() {
        let mut arena = Halfedges::default();
        let mut beachline = Beachline::new(&mut arena, 0.0, 10.0, 3);
        let he = beachline.left_neighbor(&arena, DVec2::new(5.0, 1.0), &[], &[]);
        assert_eq!(he, beachline.left_end);
        assert_eq!(beachline.right_of(&arena, he), beachline.right_end);
    }

    #[test]
    fn test_insert_remove_and_locate() {
        let sites = sites(&[(4.0, 0.0), (6.0, 1.0)]);
        let edges = vec![Edge::bisector(&sites[0], &sites[1])];
        let mut arena = Halfedges::default();
        let mut beachline = Beachline::new(&mut arena, 4.0, 2.0, 2);

        let left = arena.create(0, Side::Left);
        let right = arena.create(0, Side::Right);
        beachline.insert(&mut arena, beachline.left_end, left);
        beachline.insert(&mut arena, left, right);
        assert_eq!(beachline.right_of(&arena, left), right);
        assert_eq!(beachline.left_of(&arena, beachline.right_end), right);

        // at sweep y = 5 the breakpoints sit at x = 4 and x = 24
        let found = beachline.left_neighbor(&arena, DVec2::new(20.0, 5.0), &edges, &sites);
        assert_eq!(found, left);
        let found = beachline.left_neighbor(&arena, DVec2::new(30.0, 5.0), &edges, &sites);
        assert_eq!(found, right);
        let found = beachline.left_neighbor(&arena, DVec2::new(-20.0, 5.0), &edges, &sites);
        assert_eq!(found, beachline.left_end);

        beachline.remove(&mut arena, left);
        assert_eq!(arena[left].edge, EdgeSlot::Deleted);
        assert_eq!(beachline.right_of(&arena, beachline.left_end), right);
        assert_eq!(arena[left].left, None);
    }

    #[test]
    fn test_stale_bucket_is_pruned() {
        let sites = sites(&[(0.0, 0.0), (10.0, 0.5)]);
        let edges = vec![Edge::bisector(&sites[0], &sites[1])];
        let mut arena = Halfedges::default();
        let mut beachline = Beachline::new(&mut arena, 0.0, 10.0, 4);

        let he = arena.create(0, Side::Left);
        beachline.insert(&mut arena, beachline.left_end, he);
        let found = beachline.left_neighbor(&arena, DVec2::new(6.0, 3.0), &edges, &sites);
        assert_eq!(found, he);

        beachline.remove(&mut arena, he);
        let found = beachline.left_neighbor(&arena, DVec2::new(6.0, 3.0), &edges, &sites);
        assert_eq!(found, beachline.left_end);
        assert!(beachline.hash.iter().flatten().all(|&id| id != he));
    }
}
