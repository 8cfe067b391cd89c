//! Voronoi diagram generation
//!
//! Fortune's sweep over a sorted site list produces bisector edges, which are
//! clipped to the plot bounds and exposed through [`Voronoi`]. Lloyd's
//! relaxation and the seeded site sampler sit on top of it.

pub mod site;
pub mod edge;
mod halfedge;
mod beachline;
mod event_queue;
mod fortune;
pub mod reorder;
mod spanning_tree;
mod voronoi;
mod lloyd;
mod points;

pub use site::{compare_by_y_then_x, Site, SiteList};
pub use edge::{ClippedEnds, Edge, Vertex, PARALLEL_EPSILON};
pub use reorder::{Criterion, EdgeReorderer};
pub use spanning_tree::SpanningTreeKind;
pub use voronoi::{Voronoi, CLOSE_ENOUGH_EPSILON};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, relaxed_sites, LloydOptions};
pub use points::random_sites;

use crate::config::MapConfig;
use crate::error::Result;

/// Build the diagram a configuration describes: seeded sites, then Lloyd's
/// relaxation with the configured convergence threshold
pub fn generate_voronoi(config: &MapConfig) -> Result<Voronoi> {
    let sites = points::random_sites(config.site_count(), &config.bounds, config.seed);
    let voronoi = Voronoi::new(&sites, config.bounds)?;
    relax_with_config(voronoi, config)
}

/// Apply the configured Lloyd passes to an existing diagram
pub fn relax_with_config(voronoi: Voronoi, config: &MapConfig) -> Result<Voronoi> {
    if config.lloyd_iterations == 0 {
        return Ok(voronoi);
    }
    let options = LloydOptions {
        max_iterations: config.lloyd_iterations,
        convergence_threshold: config.lloyd_convergence,
    };
    lloyd::lloyd_relaxation_with_options(voronoi, options)
}
