//! Map configuration and builder
//!
//! A [`MapConfig`] fully determines a generated map: the same configuration
//! always yields the same sites, diagram and graph.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::geometry::Rect;

/// Site count presets
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapSize {
    /// 256 regions
    Tiny,
    /// 1,024 regions
    Small,
    /// 4,096 regions (default)
    #[default]
    Medium,
    /// 16,384 regions
    Large,
    /// Any number of regions
    Custom {
        site_count: usize,
    },
}

impl MapSize {
    /// Number of sites, and therefore regions, for this size
    pub fn site_count(self) -> usize {
        match self {
            MapSize::Tiny => 256,
            MapSize::Small => 1_024,
            MapSize::Medium => 4_096,
            MapSize::Large => 16_384,
            MapSize::Custom { site_count } => site_count,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MapSize::Tiny => "Tiny",
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

/// Side length of the default square diagram space
pub const DEFAULT_BOUNDS_SIZE: f64 = 1024.0;

/// Configuration for deterministic map generation
///
/// Only the configuration needs to be stored; the map is rebuilt from it.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_map::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Tiny)
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Seed for site placement and corner jitter
    pub seed: u32,

    /// Site count preset
    pub map_size: MapSize,

    /// Diagram space: sites are sampled here and edges clipped to it
    pub bounds: Rect,

    /// World space the graph is mapped into
    pub target: Rect,

    /// Lloyd's relaxation passes
    ///
    /// - 0: raw random regions
    /// - 1-2: regular enough for most maps (default 2)
    /// - more: diminishing returns
    pub lloyd_iterations: usize,

    /// Early stop for Lloyd's relaxation, as a fraction of the bounds diagonal
    ///
    /// 0.0 runs every pass.
    pub lloyd_convergence: f64,

    /// Move each inner corner to the average of its region centers
    pub improve_corners: bool,

    /// Largest random corner displacement in target units; 0.0 disables jitter
    pub jitter: f64,
}

impl MapConfig {
    #[inline]
    pub fn site_count(&self) -> usize {
        self.map_size.site_count()
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let builder = MapConfigBuilder::new();
        MapConfig {
            seed: rand::random(),
            map_size: builder.map_size,
            bounds: builder.bounds,
            target: builder.bounds,
            lloyd_iterations: builder.lloyd_iterations,
            lloyd_convergence: builder.lloyd_convergence,
            improve_corners: builder.improve_corners,
            jitter: builder.jitter,
        }
    }
}

/// Builder for [`MapConfig`] with validation
///
/// ```rust
/// use rust_voronoi_map::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(12345)
///     .map_size(MapSize::Small)
///     .bounds(Rect::from_origin_size(0.0, 0.0, 512.0, 256.0))
///     .unwrap()
///     .lloyd_iterations(3)
///     .unwrap()
///     .jitter(1.5)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.target, config.bounds);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u32>,
    map_size: MapSize,
    bounds: Rect,
    target: Option<Rect>,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
    improve_corners: bool,
    jitter: f64,
}

impl MapConfigBuilder {
    /// Defaults:
    /// - seed: random
    /// - map_size: Medium (4,096 regions)
    /// - bounds: `[0, 1024] × [0, 1024]`, target: same as bounds
    /// - lloyd_iterations: 2, lloyd_convergence: 0.001
    /// - improve_corners: true, jitter: 0.0
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: MapSize::default(),
            bounds: Rect::new(DVec2::ZERO, DVec2::splat(DEFAULT_BOUNDS_SIZE)),
            target: None,
            lloyd_iterations: 2,
            lloyd_convergence: 0.001,
            improve_corners: true,
            jitter: 0.0,
        }
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn map_size(mut self, size: MapSize) -> Self {
        self.map_size = size;
        self
    }

    /// Set the diagram space
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless the rectangle is finite with positive area
    pub fn bounds(mut self, bounds: Rect) -> Result<Self> {
        self.bounds = validate_rect("bounds", bounds)?;
        Ok(self)
    }

    /// Set the world space; defaults to the bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless the rectangle is finite with positive area
    pub fn target(mut self, target: Rect) -> Result<Self> {
        self.target = Some(validate_rect("target", target)?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if the threshold is negative or not finite
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !(threshold >= 0.0 && threshold.is_finite()) {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    pub fn improve_corners(mut self, enabled: bool) -> Self {
        self.improve_corners = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if the distance is negative or not finite
    pub fn jitter(mut self, max_distance: f64) -> Result<Self> {
        if !(max_distance >= 0.0 && max_distance.is_finite()) {
            return Err(VoronoiError::InvalidConfig(format!(
                "jitter distance must be >= 0 (got {})",
                max_distance
            )));
        }
        self.jitter = max_distance;
        Ok(self)
    }

    /// Build the configuration, drawing a random seed if none was set
    pub fn build(self) -> Result<MapConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(MapConfig {
            seed,
            map_size: self.map_size,
            bounds: self.bounds,
            target: self.target.unwrap_or(self.bounds),
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            improve_corners: self.improve_corners,
            jitter: self.jitter,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_rect(name: &str, rect: Rect) -> Result<Rect> {
    let rect = Rect::try_new(rect.min, rect.max)
        .map_err(|e| VoronoiError::InvalidConfig(format!("{}: {}", name, e)))?;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(VoronoiError::InvalidConfig(format!(
            "{} must have positive area (got {} x {})",
            name,
            rect.width(),
            rect.height()
        )));
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_site_counts() {
        assert_eq!(MapSize::Tiny.site_count(), 256);
        assert_eq!(MapSize::Small.site_count(), 1_024);
        assert_eq!(MapSize::Medium.site_count(), 4_096);
        assert_eq!(MapSize::Large.site_count(), 16_384);
        let custom = MapSize::Custom { site_count: 77 };
        assert_eq!(custom.site_count(), 77);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = MapConfigBuilder::new().build().unwrap();
        assert_eq!(config.map_size, MapSize::Medium);
        assert_eq!(config.lloyd_iterations, 2);
        assert_eq!(config.bounds, config.target);
        assert_eq!(config.bounds.size(), DVec2::splat(DEFAULT_BOUNDS_SIZE));
        assert!(config.improve_corners);
        assert_eq!(config.jitter, 0.0);

        let default = MapConfig::default();
        assert_eq!(default.map_size, config.map_size);
        assert_eq!(default.bounds, config.bounds);
    }

    #[test]
    fn test_builder_custom() {
        let target = Rect::from_origin_size(-100.0, -50.0, 200.0, 100.0);
        let config = MapConfigBuilder::new()
            .seed(42)
            .map_size(MapSize::Small)
            .target(target)
            .unwrap()
            .lloyd_iterations(3)
            .unwrap()
            .lloyd_convergence(0.0)
            .unwrap()
            .improve_corners(false)
            .jitter(2.0)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.site_count(), 1_024);
        assert_eq!(config.target, target);
        assert_eq!(config.lloyd_iterations, 3);
        assert_eq!(config.lloyd_convergence, 0.0);
        assert!(!config.improve_corners);
        assert_eq!(config.jitter, 2.0);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(MapConfigBuilder::new().lloyd_iterations(21).is_err());
        assert!(MapConfigBuilder::new().lloyd_convergence(-0.1).is_err());
        assert!(MapConfigBuilder::new().lloyd_convergence(f64::NAN).is_err());
        assert!(MapConfigBuilder::new().jitter(-1.0).is_err());

        let flat = Rect::from_origin_size(0.0, 0.0, 10.0, 0.0);
        assert!(matches!(
            MapConfigBuilder::new().bounds(flat),
            Err(VoronoiError::InvalidConfig(_))
        ));
        let inverted = Rect::new(DVec2::new(5.0, 5.0), DVec2::ZERO);
        assert!(MapConfigBuilder::new().target(inverted).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = MapConfigBuilder::new()
            .seed(12345)
            .map_size(MapSize::Custom { site_count: 10 })
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
