//! Lloyd's relaxation for uniform site distribution
//!
//! Each pass moves every site to the centroid of its clipped region and runs
//! a fresh sweep over the same bounds.

use glam::DVec2;

use crate::error::Result;
use crate::geometry::polygon_centroid;

use super::voronoi::Voronoi;

/// Options for Lloyd's relaxation
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of passes
    pub max_iterations: usize,
    /// Stop once the largest site displacement of a pass falls below this
    /// fraction of the bounds diagonal. 0.0 disables early termination.
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.001,
        }
    }
}

/// Centroid of each site's region, in input order, and the largest move
///
/// Sites with an empty region stay where they are.
pub fn relaxed_sites(voronoi: &Voronoi) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;
    let sites = voronoi
        .site_coords()
        .into_iter()
        .zip(voronoi.regions())
        .map(|(site, region)| {
            let centroid = polygon_centroid(&region).unwrap_or(site);
            max_displacement = max_displacement.max(site.distance(centroid));
            centroid
        })
        .collect();
    (sites, max_displacement)
}

/// One relaxation pass: a new diagram over the same bounds with every site
/// moved to its region centroid
pub fn lloyd_relaxation(voronoi: &Voronoi) -> Result<Voronoi> {
    let (sites, _) = relaxed_sites(voronoi);
    Voronoi::new(&sites, *voronoi.plot_bounds())
}

/// Relax `voronoi` until `options` say stop
pub fn lloyd_relaxation_with_options(voronoi: Voronoi, options: LloydOptions) -> Result<Voronoi> {
    let threshold = options.convergence_threshold * voronoi.plot_bounds().diagonal();
    log::debug!(
        "Lloyd: {} sites, max {} iterations, threshold {:.4} (abs {:.4})",
        voronoi.len(),
        options.max_iterations,
        options.convergence_threshold,
        threshold
    );

    let mut voronoi = voronoi;
    for iteration in 0..options.max_iterations {
        let (sites, max_displacement) = relaxed_sites(&voronoi);
        voronoi = Voronoi::new(&sites, *voronoi.plot_bounds())?;
        log::debug!(
            "Lloyd iteration {}: max displacement {:.4}",
            iteration + 1,
            max_displacement
        );

        if threshold > 0.0 && max_displacement < threshold {
            log::info!(
                "Lloyd converged after {} iterations (max displacement {:.4} < {:.4})",
                iteration + 1,
                max_displacement,
                threshold
            );
            break;
        }
    }
    Ok(voronoi)
}
