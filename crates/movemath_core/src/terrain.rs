//! Read-only terrain sampling.
//!
//! Queries see the map through [`TerrainSource`], so a host engine can plug
//! in its own heightmap storage. [`TerrainGrid`] is a straightforward
//! in-memory implementation.

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::{MoveError, Result};
use crate::move_def::SpeedModClass;

/// Per-class speed multipliers of one terrain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainType {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Multiplier for tanks.
    #[serde(default = "default_speed")]
    pub tank_speed: f32,
    /// Multiplier for kbots.
    #[serde(default = "default_speed")]
    pub kbot_speed: f32,
    /// Multiplier for hovercraft.
    #[serde(default = "default_speed")]
    pub hover_speed: f32,
    /// Multiplier for ships.
    #[serde(default = "default_speed")]
    pub ship_speed: f32,
}

const fn default_speed() -> f32 {
    1.0
}

impl Default for TerrainType {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            tank_speed: 1.0,
            kbot_speed: 1.0,
            hover_speed: 1.0,
            ship_speed: 1.0,
        }
    }
}

impl TerrainType {
    /// Speed multiplier for a locomotion class.
    #[must_use]
    pub const fn speed_for(&self, class: SpeedModClass) -> f32 {
        match class {
            SpeedModClass::Tank => self.tank_speed,
            SpeedModClass::KBot => self.kbot_speed,
            SpeedModClass::Hover => self.hover_speed,
            SpeedModClass::Ship => self.ship_speed,
        }
    }

    /// Feed the speed values into a running checksum.
    pub fn checksum_into(&self, sum: &mut Checksum) {
        sum.f32(self.tank_speed)
            .f32(self.kbot_speed)
            .f32(self.hover_speed)
            .f32(self.ship_speed);
    }
}

/// Everything the speed functions need to know about one square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareSample {
    /// Terrain height; negative values are under water.
    pub height: f32,
    /// Slope in `[0, 1]` (`1 - normal.y`).
    pub slope: f32,
    /// X component of the square's surface normal.
    pub normal_x: f32,
    /// Z component of the square's surface normal.
    pub normal_z: f32,
    /// Terrain-type speed multiplier for the queried class.
    pub type_speed: f32,
}

/// Read-only view of the map used by the query functions.
///
/// Implementations must be safe to read from many query threads at once.
pub trait TerrainSource: Sync {
    /// Map width in squares.
    fn width(&self) -> i32;

    /// Map height in squares.
    fn height(&self) -> i32;

    /// Sample square `(x, z)`. Callers guarantee the square is on the map.
    fn sample(&self, x: i32, z: i32, class: SpeedModClass) -> SquareSample;

    /// Highest corner height of square `(x, z)`; on-map squares only.
    fn max_height(&self, x: i32, z: i32) -> f32;

    /// True if `(x, z)` lies on the map.
    #[inline]
    fn contains(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width() && z < self.height()
    }
}

/// Per-square terrain layers stored in row-major order.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    width: i32,
    height: i32,
    heights: Vec<f32>,
    max_heights: Vec<f32>,
    slopes: Vec<f32>,
    normals: Vec<[f32; 2]>,
    type_map: Vec<u8>,
    terrain_types: Vec<TerrainType>,
}

impl TerrainGrid {
    /// Flat map at `ground_height` with a single default terrain type.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn flat(width: i32, height: i32, ground_height: f32) -> Self {
        assert!(width > 0, "TerrainGrid width must be positive");
        assert!(height > 0, "TerrainGrid height must be positive");

        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            heights: vec![ground_height; count],
            max_heights: vec![ground_height; count],
            slopes: vec![0.0; count],
            normals: vec![[0.0, 0.0]; count],
            type_map: vec![0; count],
            terrain_types: vec![TerrainType::default()],
        }
    }

    /// Build a grid from a row-major height layer; slopes start flat.
    pub fn from_heights(width: i32, height: i32, heights: Vec<f32>) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(MoveError::InvalidTerrain(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = (width as usize) * (height as usize);
        if heights.len() != expected {
            return Err(MoveError::InvalidTerrain(format!(
                "expected {expected} heights for {width}x{height}, got {}",
                heights.len()
            )));
        }

        let mut grid = Self::flat(width, height, 0.0);
        grid.max_heights.clone_from(&heights);
        grid.heights = heights;
        Ok(grid)
    }

    /// Replace the terrain-type table. Existing type indices must stay valid.
    pub fn set_terrain_types(&mut self, types: Vec<TerrainType>) -> Result<()> {
        let max_index = self.type_map.iter().copied().max().unwrap_or(0) as usize;
        if types.len() <= max_index {
            return Err(MoveError::InvalidTerrain(format!(
                "type map references type {max_index} but only {} types given",
                types.len()
            )));
        }
        self.terrain_types = types;
        Ok(())
    }

    /// Terrain-type table.
    #[must_use]
    pub fn terrain_types(&self) -> &[TerrainType] {
        &self.terrain_types
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> usize {
        debug_assert!(self.contains(x, z), "square ({x}, {z}) off map");
        (z as usize) * (self.width as usize) + (x as usize)
    }

    /// Set height (and max corner height) of one square.
    pub fn set_height(&mut self, x: i32, z: i32, height: f32) {
        let i = self.index(x, z);
        self.heights[i] = height;
        self.max_heights[i] = height;
    }

    /// Set only the max corner height of one square.
    pub fn set_max_height(&mut self, x: i32, z: i32, height: f32) {
        let i = self.index(x, z);
        self.max_heights[i] = height;
    }

    /// Set slope and 2D normal of one square.
    pub fn set_slope(&mut self, x: i32, z: i32, slope: f32, normal_x: f32, normal_z: f32) {
        let i = self.index(x, z);
        self.slopes[i] = slope;
        self.normals[i] = [normal_x, normal_z];
    }

    /// Assign a terrain type to one square.
    ///
    /// # Panics
    ///
    /// Panics if `type_index` is not in the terrain-type table.
    pub fn set_terrain_type(&mut self, x: i32, z: i32, type_index: u8) {
        assert!(
            (type_index as usize) < self.terrain_types.len(),
            "unknown terrain type {type_index}"
        );
        let i = self.index(x, z);
        self.type_map[i] = type_index;
    }

    /// Set the height of every square in an inclusive rectangle (clamped to the map).
    pub fn fill(&mut self, xmin: i32, xmax: i32, zmin: i32, zmax: i32, height: f32) {
        for z in zmin.max(0)..=zmax.min(self.height - 1) {
            for x in xmin.max(0)..=xmax.min(self.width - 1) {
                self.set_height(x, z, height);
            }
        }
    }
}

impl TerrainSource for TerrainGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn sample(&self, x: i32, z: i32, class: SpeedModClass) -> SquareSample {
        let i = self.index(x, z);
        let [normal_x, normal_z] = self.normals[i];
        SquareSample {
            height: self.heights[i],
            slope: self.slopes[i],
            normal_x,
            normal_z,
            type_speed: self.terrain_types[self.type_map[i] as usize].speed_for(class),
        }
    }

    fn max_height(&self, x: i32, z: i32) -> f32 {
        self.max_heights[self.index(x, z)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_grid() {
        let grid = TerrainGrid::flat(4, 3, 10.0);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);

        let s = grid.sample(3, 2, SpeedModClass::Tank);
        assert_eq!(s.height, 10.0);
        assert_eq!(s.slope, 0.0);
        assert_eq!(s.type_speed, 1.0);
        assert_eq!(grid.max_height(3, 2), 10.0);
    }

    #[test]
    fn test_contains() {
        let grid = TerrainGrid::flat(4, 3, 0.0);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(3, 2));
        assert!(!grid.contains(4, 0));
        assert!(!grid.contains(0, 3));
        assert!(!grid.contains(-1, 0));
    }

    #[test]
    fn test_from_heights_validates_size() {
        assert!(TerrainGrid::from_heights(2, 2, vec![0.0; 3]).is_err());
        assert!(TerrainGrid::from_heights(0, 2, vec![]).is_err());

        let grid = TerrainGrid::from_heights(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.sample(1, 1, SpeedModClass::KBot).height, 4.0);
        assert_eq!(grid.max_height(0, 1), 3.0);
    }

    #[test]
    fn test_terrain_type_speeds() {
        let mut grid = TerrainGrid::flat(2, 2, 0.0);
        grid.set_terrain_types(vec![
            TerrainType::default(),
            TerrainType {
                name: "mud".into(),
                tank_speed: 0.5,
                kbot_speed: 0.8,
                hover_speed: 1.0,
                ship_speed: 1.0,
            },
        ])
        .unwrap();
        grid.set_terrain_type(1, 0, 1);

        assert_eq!(grid.sample(1, 0, SpeedModClass::Tank).type_speed, 0.5);
        assert_eq!(grid.sample(1, 0, SpeedModClass::KBot).type_speed, 0.8);
        assert_eq!(grid.sample(0, 0, SpeedModClass::Tank).type_speed, 1.0);
    }

    #[test]
    fn test_set_terrain_types_keeps_indices_valid() {
        let mut grid = TerrainGrid::flat(2, 2, 0.0);
        grid.set_terrain_types(vec![TerrainType::default(); 3]).unwrap();
        grid.set_terrain_type(0, 0, 2);
        assert!(grid.set_terrain_types(vec![TerrainType::default()]).is_err());
    }

    #[test]
    fn test_fill_clamps() {
        let mut grid = TerrainGrid::flat(3, 3, 0.0);
        grid.fill(-5, 1, 2, 10, -20.0);
        assert_eq!(grid.sample(0, 2, SpeedModClass::Ship).height, -20.0);
        assert_eq!(grid.sample(1, 2, SpeedModClass::Ship).height, -20.0);
        assert_eq!(grid.sample(2, 2, SpeedModClass::Ship).height, 0.0);
        assert_eq!(grid.sample(0, 1, SpeedModClass::Ship).height, 0.0);
    }

    #[test]
    fn test_terrain_type_ron() {
        let t: TerrainType = ron::from_str(r#"(name: "sand", tank_speed: 0.7)"#).unwrap();
        assert_eq!(t.tank_speed, 0.7);
        assert_eq!(t.ship_speed, 1.0);
    }
}
