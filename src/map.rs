//! VoronoiMap main structure

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::Result;
use crate::generation::{generate_voronoi, relax_with_config, Voronoi};
use crate::graph::{Region, VoronoiGraph};
use crate::util::Timed;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// RNG stream for corner jitter, kept apart from site sampling
const JITTER_STREAM: u64 = 1;

/// A complete generated map: the relaxed diagram and its world-space graph
///
/// # Examples
///
/// ```
/// use rust_voronoi_map::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Tiny)
///     .build()
///     .unwrap();
///
/// let map = VoronoiMap::generate(config).unwrap();
/// assert_eq!(map.region_count(), 256);
///
/// if let Some(region) = map.get_region(0) {
///     println!("Region 0 has {} corners", region.corners.len());
/// }
/// ```
#[derive(Clone)]
pub struct VoronoiMap {
    config: MapConfig,

    /// Diagram after relaxation, in `config.bounds`
    voronoi: Voronoi,

    /// Graph in `config.target`
    graph: VoronoiGraph,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiMap {
    /// Generate a map from seeded random sites
    ///
    /// Runs site sampling, Lloyd's relaxation, graph construction, then the
    /// optional corner improvement and jitter passes.
    ///
    /// ```
    /// use rust_voronoi_map::*;
    ///
    /// let config = MapConfigBuilder::new()
    ///     .seed(12345)
    ///     .map_size(MapSize::Tiny)
    ///     .target(Rect::from_origin_size(0.0, 0.0, 2048.0, 1024.0))
    ///     .unwrap()
    ///     .improve_corners(true)
    ///     .build()
    ///     .unwrap();
    ///
    /// let map = VoronoiMap::generate(config).unwrap();
    /// assert!(map.graph().corners().len() > map.region_count());
    /// ```
    pub fn generate(config: MapConfig) -> Result<Self> {
        let _t = Timed::info("Map generation");
        log::info!(
            "Generating {} map ({} sites, seed {})",
            config.map_size.name(),
            config.site_count(),
            config.seed
        );

        let voronoi = generate_voronoi(&config)?;
        Self::from_voronoi(config, voronoi)
    }

    /// Generate a map over caller-provided sites instead of random ones
    ///
    /// The sites are relaxed like generated ones; `config.map_size` is ignored.
    pub fn generate_with_sites(config: MapConfig, sites: &[DVec2]) -> Result<Self> {
        let _t = Timed::info("Map generation");
        log::info!("Generating map from {} sites", sites.len());

        let voronoi = relax_with_config(Voronoi::new(sites, config.bounds)?, &config)?;
        Self::from_voronoi(config, voronoi)
    }

    fn from_voronoi(config: MapConfig, voronoi: Voronoi) -> Result<Self> {
        let mut graph = VoronoiGraph::new(&voronoi, config.target)?;
        if config.improve_corners {
            graph.improve_corners();
        }
        if config.jitter > 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);
            rng.set_stream(JITTER_STREAM);
            graph.jitter_corners(config.jitter, &mut rng);
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<DVec2> = graph.regions().iter().map(|r| r.center).collect();
            SpatialIndex::new(&centers)
        };

        log::info!(
            "Map ready: {} regions, {} corners, {} edges",
            graph.regions().len(),
            graph.corners().len(),
            graph.edges().len()
        );

        Ok(Self {
            config,
            voronoi,
            graph,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The relaxed diagram in diagram space
    #[inline]
    pub fn voronoi(&self) -> &Voronoi {
        &self.voronoi
    }

    #[inline]
    pub fn graph(&self) -> &VoronoiGraph {
        &self.graph
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.graph.regions().len()
    }

    /// `None` if the ID is out of range
    #[inline]
    pub fn get_region(&self, id: usize) -> Option<&Region> {
        self.graph.region(id)
    }

    /// Neighbor region IDs; empty for an unknown region
    pub fn get_neighbors(&self, region_id: usize) -> &[usize] {
        self.graph
            .region(region_id)
            .map(|r| r.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Find the region containing a world-space position (requires spatial-index feature)
    ///
    /// ```
    /// # use rust_voronoi_map::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let config = MapConfigBuilder::new().seed(1).map_size(MapSize::Tiny).build().unwrap();
    /// # let map = VoronoiMap::generate(config).unwrap();
    /// let center = map.get_region(7).unwrap().center;
    /// assert_eq!(map.find_region_at(center), Some(7));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_region_at(&self, position: DVec2) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Regions within `hops` neighbor steps of `center_id`, center first
    pub fn find_regions_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        self.graph.find_regions_within_hops(center_id, hops)
    }
}
