//! # Voxel Grid
//!
//! Bounded in-memory voxel world implementing [`WorldQuery`].
//!
//! Cells outside the grid answer with [`WorldQueryError::OutOfBounds`], so
//! the search treats the grid border as impassable without any special
//! casing.

use super::{Cell, SurfaceKind, WorldQuery, WorldQueryError};
use crate::{VoxPathError, VoxPathResult};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// Empty space
    #[default]
    Air,
    /// Full cube that can be stood on
    Solid,
    /// Half-height block; can be occupied and allows a half-step rise
    Slab,
}

impl Block {
    /// Whether an agent can occupy this block.
    pub fn is_open(self) -> bool {
        matches!(self, Block::Air | Block::Slab)
    }

    /// Whether this block supports an agent standing on top of it.
    pub fn is_solid(self) -> bool {
        matches!(self, Block::Solid)
    }

    /// Surface kind reported to the pathfinder.
    pub fn surface_kind(self) -> SurfaceKind {
        match self {
            Block::Slab => SurfaceKind::StepCapable,
            Block::Air | Block::Solid => SurfaceKind::Normal,
        }
    }

    /// Character used by the layer text format.
    pub fn symbol(self) -> char {
        match self {
            Block::Air => '.',
            Block::Solid => '#',
            Block::Slab => '_',
        }
    }

    /// Parses a layer text character.
    pub fn from_symbol(symbol: char) -> Option<Block> {
        match symbol {
            '.' => Some(Block::Air),
            '#' => Some(Block::Solid),
            '_' => Some(Block::Slab),
            _ => None,
        }
    }
}

/// A block placed at a cell, as listed in a scene file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub cell: Cell,
    pub block: Block,
}

/// An axis-aligned box filled with one block, inclusive on both corners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFill {
    pub from: Cell,
    pub to: Cell,
    pub block: Block,
}

/// JSON description of a world.
///
/// ```json
/// {
///   "width": 10, "height": 4, "depth": 10,
///   "floor": 0,
///   "fills": [{ "from": {"x":3,"y":1,"z":0}, "to": {"x":3,"y":2,"z":8}, "block": "solid" }],
///   "blocks": [{ "cell": {"x":1,"y":1,"z":1}, "block": "slab" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridScene {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Fill every layer up to and including this one with solid blocks
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub fills: Vec<BlockFill>,
    #[serde(default)]
    pub blocks: Vec<PlacedBlock>,
}

/// Dense voxel grid spanning `[0, width) x [0, height) x [0, depth)`.
///
/// # Examples
///
/// ```
/// use voxpath::{Block, Cell, VoxelGrid, WorldQuery};
///
/// let mut grid = VoxelGrid::flat(8, 4, 8, 0);
/// assert!(grid.is_walkable(Cell::new(2, 1, 2)));
///
/// grid.set(Cell::new(2, 1, 2), Block::Solid).unwrap();
/// assert!(!grid.is_walkable(Cell::new(2, 1, 2)));
/// assert!(grid.is_walkable(Cell::new(2, 2, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelGrid {
    width: u32,
    height: u32,
    depth: u32,
    blocks: Vec<Block>,
}

impl VoxelGrid {
    /// Creates a grid filled with air.
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let volume = width as usize * height as usize * depth as usize;
        Self {
            width,
            height,
            depth,
            blocks: vec![Block::Air; volume],
        }
    }

    /// Creates a grid whose layers `0..=floor_y` are solid and the rest air.
    pub fn flat(width: u32, height: u32, depth: u32, floor_y: i32) -> Self {
        let mut grid = Self::new(width, height, depth);
        for y in 0..=floor_y.min(height as i32 - 1) {
            for z in 0..depth as i32 {
                for x in 0..width as i32 {
                    if let Some(index) = grid.index(Cell::new(x, y, z)) {
                        grid.blocks[index] = Block::Solid;
                    }
                }
            }
        }
        grid
    }

    /// Builds a grid from a JSON scene description.
    pub fn from_scene(scene: &GridScene) -> VoxPathResult<Self> {
        if scene.width == 0 || scene.height == 0 || scene.depth == 0 {
            return Err(VoxPathError::InvalidWorld(format!(
                "scene dimensions must be positive, got {}x{}x{}",
                scene.width, scene.height, scene.depth
            )));
        }

        let mut grid = match scene.floor {
            Some(floor_y) => Self::flat(scene.width, scene.height, scene.depth, floor_y),
            None => Self::new(scene.width, scene.height, scene.depth),
        };
        for fill in &scene.fills {
            grid.fill(fill.from, fill.to, fill.block)?;
        }
        for placed in &scene.blocks {
            grid.set(placed.cell, placed.block)?;
        }
        Ok(grid)
    }

    /// Parses a JSON scene string.
    pub fn from_json_str(json: &str) -> VoxPathResult<Self> {
        let scene: GridScene = serde_json::from_str(json)?;
        Self::from_scene(&scene)
    }

    /// Loads a JSON scene file.
    pub fn load(path: impl AsRef<FsPath>) -> VoxPathResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses stacked text layers, bottom layer first.
    ///
    /// Layers are separated by blank lines. Each line of a layer is a row of
    /// constant `z` (first line `z = 0`) and each character a column of
    /// constant `x`, using `#` for solid, `.` for air and `_` for slab. All
    /// rows must have the same length and all layers the same row count.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxpath::{Block, Cell, VoxelGrid};
    ///
    /// let grid = VoxelGrid::from_layers("###\n###\n\n.#.\n...").unwrap();
    /// assert_eq!(grid.dimensions(), (3, 2, 2));
    /// assert_eq!(grid.get(Cell::new(1, 1, 0)), Some(Block::Solid));
    /// assert_eq!(grid.get(Cell::new(1, 1, 1)), Some(Block::Air));
    /// ```
    pub fn from_layers(text: &str) -> VoxPathResult<Self> {
        let mut layers: Vec<Vec<&str>> = vec![Vec::new()];
        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                if layers.last().map_or(false, |layer| !layer.is_empty()) {
                    layers.push(Vec::new());
                }
            } else if let Some(layer) = layers.last_mut() {
                layer.push(line);
            }
        }
        layers.retain(|layer| !layer.is_empty());

        let first = layers
            .first()
            .ok_or_else(|| VoxPathError::InvalidWorld("no layers given".to_string()))?;
        let depth = first.len();
        let width = first.first().map_or(0, |row| row.chars().count());

        let mut grid = Self::new(width as u32, layers.len() as u32, depth as u32);
        for (y, layer) in layers.iter().enumerate() {
            if layer.len() != depth {
                return Err(VoxPathError::InvalidWorld(format!(
                    "layer {} has {} rows, expected {}",
                    y,
                    layer.len(),
                    depth
                )));
            }
            for (z, row) in layer.iter().enumerate() {
                if row.chars().count() != width {
                    return Err(VoxPathError::InvalidWorld(format!(
                        "row {} of layer {} has length {}, expected {}",
                        z,
                        y,
                        row.chars().count(),
                        width
                    )));
                }
                for (x, symbol) in row.chars().enumerate() {
                    let block = Block::from_symbol(symbol).ok_or_else(|| {
                        VoxPathError::InvalidWorld(format!("unknown block symbol '{}'", symbol))
                    })?;
                    grid.set(Cell::new(x as i32, y as i32, z as i32), block)?;
                }
            }
        }
        Ok(grid)
    }

    /// Grid size as `(width, height, depth)`.
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.depth)
    }

    /// Whether the cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Block at a cell, or `None` outside the grid.
    pub fn get(&self, cell: Cell) -> Option<Block> {
        self.index(cell).map(|index| self.blocks[index])
    }

    /// Replaces the block at a cell.
    pub fn set(&mut self, cell: Cell, block: Block) -> VoxPathResult<()> {
        let index = self.index(cell).ok_or_else(|| {
            VoxPathError::InvalidWorld(format!("cell {} is outside the grid", cell))
        })?;
        self.blocks[index] = block;
        Ok(())
    }

    /// Fills the inclusive box between two corners, in any order.
    pub fn fill(&mut self, from: Cell, to: Cell, block: Block) -> VoxPathResult<()> {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for z in from.z.min(to.z)..=from.z.max(to.z) {
                for x in from.x.min(to.x)..=from.x.max(to.x) {
                    self.set(Cell::new(x, y, z), block)?;
                }
            }
        }
        Ok(())
    }

    /// Highest cell in the column that an agent could stand in.
    pub fn surface_cell(&self, x: i32, z: i32) -> Option<Cell> {
        (0..self.height as i32)
            .rev()
            .map(|y| Cell::new(x, y, z))
            .find(|&cell| self.is_walkable(cell))
    }

    /// Renders the grid back into the layer text format.
    pub fn to_layers(&self) -> String {
        let mut layers = Vec::with_capacity(self.height as usize);
        for y in 0..self.height as i32 {
            let rows: Vec<String> = (0..self.depth as i32)
                .map(|z| {
                    (0..self.width as i32)
                        .map(|x| self.get(Cell::new(x, y, z)).unwrap_or_default().symbol())
                        .collect()
                })
                .collect();
            layers.push(rows.join("\n"));
        }
        layers.join("\n\n")
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0
            || cell.y < 0
            || cell.z < 0
            || cell.x >= self.width as i32
            || cell.y >= self.height as i32
            || cell.z >= self.depth as i32
        {
            return None;
        }
        let (w, d) = (self.width as usize, self.depth as usize);
        Some((cell.y as usize * d + cell.z as usize) * w + cell.x as usize)
    }

    fn block(&self, cell: Cell) -> Result<Block, WorldQueryError> {
        self.get(cell).ok_or(WorldQueryError::OutOfBounds(cell))
    }
}

impl WorldQuery for VoxelGrid {
    fn is_open_space(&self, cell: Cell) -> Result<bool, WorldQueryError> {
        Ok(self.block(cell)?.is_open())
    }

    fn has_solid_support_below(&self, cell: Cell) -> Result<bool, WorldQueryError> {
        Ok(self.block(cell.down())?.is_solid())
    }

    fn surface_kind(&self, cell: Cell) -> Result<SurfaceKind, WorldQueryError> {
        Ok(self.block(cell)?.surface_kind())
    }
}
