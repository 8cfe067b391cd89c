//! Voronoi map generation on a rectangle
//!
//! Fortune's sweep builds the diagram of a set of sites, clipped to a plot
//! rectangle. On top of it sit Delaunay and hull queries, Lloyd's relaxation,
//! and a region/corner/edge graph in world space that map generators
//! (terrain, biomes, rivers) can walk.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_map::*;
//!
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Tiny)
//!     .lloyd_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let map = VoronoiMap::generate(config).unwrap();
//! let mesh = map.graph().mesh();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! The diagram can also be used directly:
//!
//! ```rust
//! use rust_voronoi_map::{Rect, Voronoi};
//! use rust_voronoi_map::generation::random_sites;
//!
//! let bounds = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
//! let voronoi = Voronoi::new(&random_sites(50, &bounds, 7), bounds).unwrap();
//! let region = voronoi.region(0).unwrap();
//! assert!(region.len() >= 3);
//! assert!(!voronoi.delaunay_triangulation().is_empty());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) position-to-region lookups using a KD-tree
//! - `serde`: serialization support for configuration and the graph

pub mod error;
pub mod config;
pub mod geometry;
pub mod generation;
pub mod graph;
pub mod map;
mod util;

#[cfg(feature = "spatial-index")]
pub mod spatial;

pub use error::{VoronoiError, Result};
pub use config::{MapConfig, MapConfigBuilder, MapSize};
pub use geometry::{LineSegment, Rect, Side, Winding};
pub use generation::{LloydOptions, SpanningTreeKind, Voronoi};
pub use graph::{Corner, Edge, MeshData, Region, Triangle, VoronoiGraph};
pub use map::VoronoiMap;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
