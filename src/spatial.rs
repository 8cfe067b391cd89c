//! Spatial indexing for fast position-to-region lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::DVec2;

/// KD-tree over region centers
///
/// The region containing a point is the one whose center (site) is nearest,
/// so a nearest-neighbor query answers point location in O(log n).
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build the index from region centers; region IDs are positions in `centers`
    ///
    /// ```
    /// use rust_voronoi_map::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0), DVec2::new(-1.0, 0.0)];
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(DVec2::new(0.9, 0.2)), Some(0));
    /// # }
    /// ```
    pub fn new(centers: &[DVec2]) -> Self {
        if centers.is_empty() {
            return Self { tree: None };
        }
        let points: Vec<[f64; 2]> = centers.iter().map(|c| c.to_array()).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// ID of the region whose center is nearest to `position`; `None` when empty
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(result.item as usize)
    }
}
