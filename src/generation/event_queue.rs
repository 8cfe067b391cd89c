//! Bucketed priority queue of pending circle events
//!
//! Buckets partition the y range; each bucket is a chain hanging off a dummy
//! head and kept sorted by `(ystar, vertex.x)`. Bucket width follows site
//! density so chains stay short.

use glam::DVec2;

use super::halfedge::{HalfedgeId, Halfedges};

pub(crate) struct EventQueue {
    hash: Vec<HalfedgeId>,
    ymin: f64,
    delta_y: f64,
    count: usize,
    min_bucket: usize,
}

impl EventQueue {
    pub fn new(halfedges: &mut Halfedges, ymin: f64, delta_y: f64, sqrt_nsites: usize) -> Self {
        let hash_size = (4 * sqrt_nsites).max(1);
        let hash = (0..hash_size).map(|_| halfedges.create_dummy()).collect();
        Self {
            hash,
            ymin,
            delta_y,
            count: 0,
            min_bucket: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    fn bucket(&self, halfedges: &Halfedges, he: HalfedgeId) -> usize {
        let last = self.hash.len() - 1;
        let bucket =
            ((halfedges[he].ystar - self.ymin) / self.delta_y * self.hash.len() as f64).floor();
        if bucket.is_nan() || bucket < 0.0 {
            0
        } else if bucket >= last as f64 {
            last
        } else {
            bucket as usize
        }
    }

    /// Queue `he`, whose `vertex` and `ystar` must already be set
    pub fn insert(&mut self, halfedges: &mut Halfedges, he: HalfedgeId) {
        let vertex_x = halfedges[he]
            .vertex
            .expect("queued half-edge without a circle event")
            .x;
        let ystar = halfedges[he].ystar;
        let bucket = self.bucket(halfedges, he);
        if bucket < self.min_bucket {
            self.min_bucket = bucket;
        }

        let mut previous = self.hash[bucket];
        while let Some(next) = halfedges[previous].next_in_queue {
            let node = &halfedges[next];
            let next_x = node.vertex.map_or(f64::NEG_INFINITY, |v| v.x);
            if ystar > node.ystar || (ystar == node.ystar && vertex_x > next_x) {
                previous = next;
            } else {
                break;
            }
        }
        halfedges[he].next_in_queue = halfedges[previous].next_in_queue;
        halfedges[previous].next_in_queue = Some(he);
        self.count += 1;
    }

    /// Drop the pending event of `he`; a no-op when it has none
    pub fn remove(&mut self, halfedges: &mut Halfedges, he: HalfedgeId) {
        if halfedges[he].vertex.is_none() {
            return;
        }
        let bucket = self.bucket(halfedges, he);
        let mut previous = self.hash[bucket];
        while let Some(next) = halfedges[previous].next_in_queue {
            if next == he {
                halfedges[previous].next_in_queue = halfedges[he].next_in_queue;
                self.count -= 1;
                break;
            }
            previous = next;
        }
        let node = &mut halfedges[he];
        node.vertex = None;
        node.next_in_queue = None;
    }

    fn adjust_min_bucket(&mut self, halfedges: &Halfedges) {
        while self.min_bucket < self.hash.len() - 1
            && halfedges[self.hash[self.min_bucket]].next_in_queue.is_none()
        {
            self.min_bucket += 1;
        }
    }

    /// Earliest pending event as `(vertex.x, ystar)`
    pub fn min(&mut self, halfedges: &Halfedges) -> Option<DVec2> {
        if self.is_empty() {
            return None;
        }
        self.adjust_min_bucket(halfedges);
        let he = halfedges[self.hash[self.min_bucket]].next_in_queue?;
        let node = &halfedges[he];
        node.vertex.map(|v| DVec2::new(v.x, node.ystar))
    }

    /// Unlink and return the earliest pending event; its vertex stays set
    pub fn extract_min(&mut self, halfedges: &mut Halfedges) -> Option<HalfedgeId> {
        if self.is_empty() {
            return None;
        }
        self.adjust_min_bucket(halfedges);
        let head = self.hash[self.min_bucket];
        let he = halfedges[head].next_in_queue?;
        halfedges[head].next_in_queue = halfedges[he].next_in_queue;
        halfedges[he].next_in_queue = None;
        self.count -= 1;
        Some(he)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;

    fn pending(arena: &mut Halfedges, x: f64, ystar: f64) -> HalfedgeId {
        let he = arena.create(0, Side::Left);
        arena[he].vertex = Some(DVec2::new(x, ystar - 1.0));
        arena[he].ystar = ystar;
        he
    }

    #[test]
    fn test_extracts_in_ystar_then_x_order() {
        let mut arena = Halfedges::default();
        let mut queue = EventQueue::new(&mut arena, 0.0, 10.0, 2);

        let c = pending(&mut arena, 1.0, 7.5);
        let a = pending(&mut arena, 4.0, 2.0);
        let b2 = pending(&mut arena, 3.0, 2.5);
        let b1 = pending(&mut arena, 1.0, 2.5);
        for he in [c, a, b2, b1] {
            queue.insert(&mut arena, he);
        }
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.min(&arena), Some(DVec2::new(4.0, 2.0)));

        let order: Vec<HalfedgeId> =
            std::iter::from_fn(|| queue.extract_min(&mut arena)).collect();
        assert_eq!(order, vec![a, b1, b2, c]);
        assert!(queue.is_empty());
        assert_eq!(queue.min(&arena), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut arena = Halfedges::default();
        let mut queue = EventQueue::new(&mut arena, 0.0, 10.0, 2);
        let a = pending(&mut arena, 1.0, 3.0);
        let b = pending(&mut arena, 2.0, 4.0);
        queue.insert(&mut arena, a);
        queue.insert(&mut arena, b);

        queue.remove(&mut arena, a);
        assert_eq!(queue.len(), 1);
        assert_eq!(arena[a].vertex, None);
        queue.remove(&mut arena, a);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.extract_min(&mut arena), Some(b));
        // extraction keeps the vertex for the circle event
        assert!(arena[b].vertex.is_some());
    }

    #[test]
    fn test_min_bucket_moves_back_on_lower_insert() {
        let mut arena = Halfedges::default();
        let mut queue = EventQueue::new(&mut arena, 0.0, 10.0, 3);
        let high = pending(&mut arena, 0.0, 9.0);
        queue.insert(&mut arena, high);
        assert_eq!(queue.min(&arena), Some(DVec2::new(0.0, 9.0)));

        let low = pending(&mut arena, 0.0, 0.5);
        queue.insert(&mut arena, low);
        assert_eq!(queue.extract_min(&mut arena), Some(low));
        assert_eq!(queue.extract_min(&mut arena), Some(high));
    }
}
