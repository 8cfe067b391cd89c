//! Seeded uniform site sampling
//!
//! The graph layer works with any site set; this sampler only feeds
//! config-driven generation, where Lloyd's relaxation evens the spacing out.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geometry::Rect;

/// `count` sites drawn uniformly from `bounds`
///
/// The same seed always yields the same sites.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_map::generation::random_sites;
/// use rust_voronoi_map::Rect;
///
/// let bounds = Rect::from_origin_size(0.0, 0.0, 512.0, 256.0);
/// let sites = random_sites(1000, &bounds, 42);
/// assert_eq!(sites.len(), 1000);
/// assert!(sites.iter().all(|p| bounds.contains(*p)));
/// ```
pub fn random_sites(count: usize, bounds: &Rect, seed: u32) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let (min, size) = (bounds.min, bounds.size());
    (0..count)
        .map(|_| DVec2::new(min.x + rng.gen::<f64>() * size.x, min.y + rng.gen::<f64>() * size.y))
        .collect()
}
