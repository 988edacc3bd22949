//! # Generation Module
//!
//! Seeded voxel terrain for demos, tests and benchmarks.
//!
//! Terrain is a heightmap from Perlin noise with scattered two-block pillars
//! as obstacles and the odd slab as a step-capable surface. The same seed
//! always produces the same world.

pub mod terrain;

pub use terrain::*;

use crate::world::VoxelGrid;
use crate::{VoxPathError, VoxPathResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// World size along x
    pub width: u32,
    /// World size along y
    pub height: u32,
    /// World size along z
    pub depth: u32,
    /// Mean top layer of the ground
    pub base_height: i32,
    /// Maximum deviation of the ground from `base_height`
    pub amplitude: f64,
    /// Noise sampling frequency per cell
    pub frequency: f64,
    /// Probability of a pillar on a column (0.0 to 1.0)
    pub pillar_density: f64,
    /// Probability of a slab on a column (0.0 to 1.0)
    pub slab_chance: f64,
}

impl TerrainConfig {
    /// Creates a default terrain configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxpath::TerrainConfig;
    ///
    /// let config = TerrainConfig::new(7);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: 48,
            height: 16,
            depth: 48,
            base_height: 4,
            amplitude: 3.0,
            frequency: 0.08,
            pillar_density: 0.04,
            slab_chance: 0.02,
        }
    }

    /// Small, gentle terrain for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 16,
            height: 8,
            depth: 16,
            base_height: 2,
            amplitude: 1.0,
            frequency: 0.1,
            pillar_density: 0.03,
            slab_chance: 0.0,
        }
    }

    /// Completely flat ground with no obstacles.
    pub fn flat(seed: u64, width: u32, depth: u32) -> Self {
        Self {
            seed,
            width,
            height: 6,
            depth,
            base_height: 0,
            amplitude: 0.0,
            frequency: 0.1,
            pillar_density: 0.0,
            slab_chance: 0.0,
        }
    }

    /// Sets the horizontal size.
    pub fn with_size(mut self, width: u32, depth: u32) -> Self {
        self.width = width;
        self.depth = depth;
        self
    }

    /// Checks the configuration describes a buildable world.
    pub fn validate(&self) -> VoxPathResult<()> {
        if self.width == 0 || self.depth == 0 {
            return Err(VoxPathError::InvalidConfig(
                "terrain width and depth must be positive".to_string(),
            ));
        }
        if self.base_height < 0 || self.base_height + 3 > self.height as i32 {
            return Err(VoxPathError::InvalidConfig(format!(
                "base_height {} leaves no headroom in a world {} high",
                self.base_height, self.height
            )));
        }
        for (name, p) in [
            ("pillar_density", self.pillar_density),
            ("slab_chance", self.slab_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(VoxPathError::InvalidConfig(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for world generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &TerrainConfig, rng: &mut StdRng) -> VoxPathResult<T>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &TerrainConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

/// Generates a world with the default terrain generator.
pub fn generate_world(config: &TerrainConfig) -> VoxPathResult<VoxelGrid> {
    let mut rng = create_rng(config);
    NoiseTerrainGenerator::new().generate(config, &mut rng)
}
