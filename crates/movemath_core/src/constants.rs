//! Engine-wide constants shared by the query modules.

use crate::math::Fixed;

/// Side length of one heightmap square in world units.
pub const SQUARE_SIZE: Fixed = Fixed::const_from_int(8);

/// [`SQUARE_SIZE`] as a float, for footprint radius helpers.
pub const SQUARE_SIZE_F32: f32 = 8.0;

/// Unit footprints are given in build-grid units; each is this many squares.
pub const FOOTPRINT_SCALE: i32 = 2;

/// Simulation frames per second.
pub const GAME_SPEED: i32 = 30;

/// Maximum number of move defs a registry can hold.
pub const MAX_MOVE_DEFS: usize = 256;

/// Lower clamp applied to depth-mod scale values.
pub const DEPTH_MOD_MIN_SCALE: f32 = 0.01;
