//! # Noise Terrain
//!
//! Heightmap terrain generator built on Perlin noise.

use super::{Generator, TerrainConfig};
use crate::world::{Block, Cell, VoxelGrid};
use crate::VoxPathResult;
use log::debug;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::Rng;

/// Height of the obstacle pillars above the ground.
const PILLAR_HEIGHT: i32 = 2;

/// Generates rolling ground with pillars and slabs.
#[derive(Debug, Clone, Default)]
pub struct NoiseTerrainGenerator;

impl NoiseTerrainGenerator {
    /// Creates a new terrain generator.
    pub fn new() -> Self {
        Self
    }

    /// Top solid layer of the ground at a column.
    fn ground_height(&self, config: &TerrainConfig, perlin: &Perlin, x: i32, z: i32) -> i32 {
        let sample = perlin.get([x as f64 * config.frequency, z as f64 * config.frequency]);
        let offset = (sample * config.amplitude).round() as i32;
        // Keep two layers of headroom above the ground for the agent.
        (config.base_height + offset).clamp(0, config.height as i32 - 3)
    }
}

impl Generator<VoxelGrid> for NoiseTerrainGenerator {
    fn generate(&self, config: &TerrainConfig, rng: &mut StdRng) -> VoxPathResult<VoxelGrid> {
        config.validate()?;

        let perlin = Perlin::new(config.seed as u32);
        let mut grid = VoxelGrid::new(config.width, config.height, config.depth);
        let mut pillars = 0;
        let mut slabs = 0;

        for z in 0..config.depth as i32 {
            for x in 0..config.width as i32 {
                let ground = self.ground_height(config, &perlin, x, z);
                grid.fill(Cell::new(x, 0, z), Cell::new(x, ground, z), Block::Solid)?;

                let top = (ground + PILLAR_HEIGHT).min(config.height as i32 - 1);
                if rng.gen_bool(config.pillar_density) {
                    grid.fill(Cell::new(x, ground + 1, z), Cell::new(x, top, z), Block::Solid)?;
                    pillars += 1;
                } else if rng.gen_bool(config.slab_chance) {
                    grid.set(Cell::new(x, ground + 1, z), Block::Slab)?;
                    slabs += 1;
                }
            }
        }

        debug!(
            "Generated {}x{}x{} terrain (seed {}): {} pillars, {} slabs",
            config.width, config.height, config.depth, config.seed, pillars, slabs
        );
        Ok(grid)
    }

    fn generator_type(&self) -> &'static str {
        "NoiseTerrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{create_rng, generate_world};
    use crate::world::WorldQuery;

    #[test]
    fn test_same_seed_same_world() {
        let config = TerrainConfig::for_testing(99);
        assert_eq!(generate_world(&config).unwrap(), generate_world(&config).unwrap());
    }

    #[test]
    fn test_flat_config_is_flat() {
        let config = TerrainConfig::flat(3, 8, 8);
        let grid = generate_world(&config).unwrap();
        for z in 0..8 {
            for x in 0..8 {
                assert_eq!(grid.surface_cell(x, z), Some(Cell::new(x, 1, z)));
            }
        }
    }

    #[test]
    fn test_every_column_has_ground() {
        let config = TerrainConfig::new(5).with_size(20, 20);
        let mut rng = create_rng(&config);
        let grid = NoiseTerrainGenerator::new().generate(&config, &mut rng).unwrap();

        assert_eq!(grid.dimensions(), (20, config.height, 20));
        for z in 0..20 {
            for x in 0..20 {
                assert_eq!(grid.get(Cell::new(x, 0, z)), Some(Block::Solid));
            }
        }
        // Most columns are standable.
        let standable = (0..20)
            .flat_map(|z| (0..20).map(move |x| (x, z)))
            .filter(|&(x, z)| grid.surface_cell(x, z).map_or(false, |c| grid.is_walkable(c)))
            .count();
        assert!(standable > 300);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = TerrainConfig::for_testing(1);
        config.slab_chance = -0.1;
        let mut rng = create_rng(&config);
        assert!(NoiseTerrainGenerator::new().generate(&config, &mut rng).is_err());
        assert_eq!(NoiseTerrainGenerator::new().generator_type(), "NoiseTerrain");
    }
}
