//! # Movemath Core
//!
//! Movement traversability queries for grid-based unit simulation.
//!
//! Given a unit's move def, the terrain and the objects standing on it,
//! this crate answers whether a straight line, a box or a single position
//! is passable, and at what terrain speed cost.
//!
//! This crate contains **only** query logic:
//! - No path search (planners are consumers)
//! - No IO on the query path
//! - No locks; each worker thread brings its own [`blocking::QueryScratch`]
//!
//! This separation enables:
//! - Calling the same queries from many path-planner threads at once
//! - Checksummed move data for lockstep sessions
//! - Testing every query against small hand-built maps
//!
//! ## Crate Structure
//!
//! - [`move_def`] - Per-unit-type movement parameters and cost curves
//! - [`registry`] - Loading and lookup of move defs
//! - [`speed_mod`] - Terrain speed modifiers per square
//! - [`blocking`] - Blocking-object grid and epoch-marked range checks
//! - [`line_walk`] - Bidirectional line rasterization
//! - [`submersible`] - Virtual collider for diving units
//! - [`queries`] - Line, range and position queries
//! - [`math`] - Fixed-point positions and grid cells

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod blocking;
pub mod checksum;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod line_walk;
pub mod math;
pub mod move_def;
pub mod queries;
pub mod registry;
pub mod speed_mod;
pub mod submersible;
pub mod terrain;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::blocking::{
        BlockType, BlockingGrid, BlockingObject, BlockingSession, Collider, Epoch, Motion,
        ObjectId, PhysicalState, QueryScratch,
    };
    pub use crate::config::MoveMathConfig;
    pub use crate::data::{MoveDataFile, MoveDefData};
    pub use crate::error::{MoveError, Result};
    pub use crate::math::{Cell, CellRect, Dir2, Fixed, Vec2Fixed};
    pub use crate::move_def::{MoveDef, MoveDefId, SpeedModClass, TerrainClass};
    pub use crate::queries::{
        raw_search, test_move_position_for_objects, test_move_square_range, LineQuery,
        MoveContext, MoveTest, MoveTestOptions, RangeQuery,
    };
    pub use crate::registry::MoveDefRegistry;
    pub use crate::speed_mod::pos_speed_mod;
    pub use crate::terrain::{TerrainGrid, TerrainSource, TerrainType};
}
