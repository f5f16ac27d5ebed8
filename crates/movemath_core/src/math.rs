//! Geometric primitives for movement queries.
//!
//! World-space positions use fixed-point arithmetic so that the mapping
//! from a position to its grid cell is identical on every platform. Terrain
//! cost curves (cosines, reciprocals) work on `f32` samples.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

use crate::constants::SQUARE_SIZE;

/// Fixed-point number type for world-space coordinates.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Fixed-point position or direction on the ground plane.
///
/// `x` runs east and `z` runs south, matching the terrain grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Z coordinate.
    #[serde(with = "fixed_serde")]
    pub z: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, z: Fixed) -> Self {
        Self { x, z }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        z: Fixed::ZERO,
    };

    /// Grid cell containing this position.
    #[must_use]
    pub fn cell(self) -> Cell {
        Cell::new(world_to_cell(self.x), world_to_cell(self.z))
    }
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            z: self.z - rhs.z,
        }
    }
}

/// Convert one world coordinate to a cell index.
///
/// Rounds towards negative infinity, so positions just left of the map
/// edge land on cell `-1` rather than being folded onto cell `0`.
#[inline]
#[must_use]
pub fn world_to_cell(coord: Fixed) -> i32 {
    (coord / SQUARE_SIZE).to_num::<i32>()
}

/// Integer grid coordinate (heightmap square).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column.
    pub x: i32,
    /// Row.
    pub z: i32,
}

impl Cell {
    /// Create a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// True if both axes differ by at most one.
    #[inline]
    #[must_use]
    pub fn is_adjacent_or_equal(self, other: Self) -> bool {
        (self.x - other.x).abs() <= 1 && (self.z - other.z).abs() <= 1
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Minimum column.
    pub xmin: i32,
    /// Maximum column (inclusive).
    pub xmax: i32,
    /// Minimum row.
    pub zmin: i32,
    /// Maximum row (inclusive).
    pub zmax: i32,
}

impl CellRect {
    /// Rectangle covering `center` grown by `xh`/`zh` cells on each side.
    #[must_use]
    pub const fn around(center: Cell, xh: i32, zh: i32) -> Self {
        Self {
            xmin: center.x - xh,
            xmax: center.x + xh,
            zmin: center.z - zh,
            zmax: center.z + zh,
        }
    }

    /// Clamp to a `width` x `height` grid. May produce an empty rectangle.
    #[must_use]
    pub fn clamped(self, width: i32, height: i32) -> Self {
        Self {
            xmin: self.xmin.max(0),
            xmax: self.xmax.min(width - 1),
            zmin: self.zmin.max(0),
            zmax: self.zmax.min(height - 1),
        }
    }

    /// True if the rectangle contains no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.zmin > self.zmax
    }

    /// Iterate cells in row-major order (z outer, x inner).
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.zmin..=self.zmax).flat_map(move |z| (self.xmin..=self.xmax).map(move |x| Cell::new(x, z)))
    }
}

/// Unit direction on the ground plane used for directional slope costs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dir2 {
    /// X component.
    pub x: f32,
    /// Z component.
    pub z: f32,
}

impl Dir2 {
    /// Zero direction; disables the uphill penalty.
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    /// Normalize a fixed-point vector, yielding [`Dir2::ZERO`] for zero input.
    #[must_use]
    pub fn from_vec(v: Vec2Fixed) -> Self {
        let x = v.x.to_num::<f32>();
        let z = v.z.to_num::<f32>();
        let len = (x * x + z * z).sqrt();

        if len <= f32::EPSILON {
            return Self::ZERO;
        }

        Self {
            x: x / len,
            z: z / len,
        }
    }

    /// Dot product with a 2D vector.
    #[inline]
    #[must_use]
    pub fn dot(self, x: f32, z: f32) -> f32 {
        self.x * x + self.z * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(n: f64) -> Fixed {
        Fixed::from_num(n)
    }

    #[test]
    fn test_world_to_cell() {
        assert_eq!(world_to_cell(fixed(0.0)), 0);
        assert_eq!(world_to_cell(fixed(7.99)), 0);
        assert_eq!(world_to_cell(fixed(8.0)), 1);
        assert_eq!(world_to_cell(fixed(-0.5)), -1);
    }

    #[test]
    fn test_vec_cell() {
        let v = Vec2Fixed::new(fixed(20.0), fixed(33.0));
        assert_eq!(v.cell(), Cell::new(2, 4));
    }

    #[test]
    fn test_rect_clamp_and_iter() {
        let rect = CellRect::around(Cell::new(0, 0), 1, 1).clamped(4, 4);
        assert_eq!(rect, CellRect { xmin: 0, xmax: 1, zmin: 0, zmax: 1 });

        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_rect_fully_off_map_is_empty() {
        let rect = CellRect::around(Cell::new(-10, 2), 1, 1).clamped(4, 4);
        assert!(rect.is_empty());
        assert_eq!(rect.cells().count(), 0);
    }

    #[test]
    fn test_dir_normalize() {
        let d = Dir2::from_vec(Vec2Fixed::new(fixed(3.0), fixed(4.0)));
        assert!((d.x - 0.6).abs() < 1e-6);
        assert!((d.z - 0.8).abs() < 1e-6);

        assert_eq!(Dir2::from_vec(Vec2Fixed::ZERO), Dir2::ZERO);
    }
}
