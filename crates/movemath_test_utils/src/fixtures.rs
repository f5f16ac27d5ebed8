//! Test fixtures and helpers.
//!
//! Pre-built move defs, maps and worlds for consistent testing.

use fixed::types::I32F32;
use movemath_core::blocking::{BlockingGrid, BlockingObject, Motion, ObjectId};
use movemath_core::config::MoveMathConfig;
use movemath_core::data::MoveDefData;
use movemath_core::math::{Cell, CellRect, Vec2Fixed};
use movemath_core::move_def::{MoveDef, MoveDefId, SpeedModClass};
use movemath_core::queries::MoveContext;
use movemath_core::registry::MoveDefRegistry;
use movemath_core::terrain::{TerrainGrid, TerrainSource};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// World position from integer coordinates.
#[must_use]
pub fn pos(x: i32, z: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(z))
}

/// World position at the center of square `(x, z)`.
#[must_use]
pub fn square_center(x: i32, z: i32) -> Vec2Fixed {
    pos(x * 8 + 4, z * 8 + 4)
}

/// Build a move def from data with id 0.
#[must_use]
pub fn def_from(data: &MoveDefData) -> MoveDef {
    MoveDef::from_data(data, MoveDefId::new(0))
}

/// Ground vehicle with the given footprint (build-grid units).
#[must_use]
pub fn tank(footprint: i32) -> MoveDef {
    let mut data = MoveDefData::named(format!("tank{footprint}"));
    data.footprint_x = footprint;
    data.max_water_depth = 22.0;
    data.max_slope = Some(30.0);
    def_from(&data)
}

/// Legged unit with the given footprint.
#[must_use]
pub fn kbot(footprint: i32) -> MoveDef {
    let mut data = MoveDefData::named(format!("kbot{footprint}"));
    data.footprint_x = footprint;
    data.max_water_depth = 22.0;
    def_from(&data)
}

/// Amphibious ground unit that walks along the sea floor.
#[must_use]
pub fn amphibious(footprint: i32) -> MoveDef {
    let mut data = MoveDefData::named(format!("atank{footprint}"));
    data.speed_mod_class = Some(SpeedModClass::Tank);
    data.footprint_x = footprint;
    data.max_water_depth = 5000.0;
    data.depth_mod_params.max_scale = Some(1.5);
    def_from(&data)
}

/// Hovercraft with the given footprint.
#[must_use]
pub fn hover(footprint: i32) -> MoveDef {
    let mut data = MoveDefData::named(format!("hover{footprint}"));
    data.footprint_x = footprint;
    def_from(&data)
}

/// Surface ship needing `min_depth` of water.
#[must_use]
pub fn boat(footprint: i32, min_depth: f32) -> MoveDef {
    let mut data = MoveDefData::named(format!("boat{footprint}"));
    data.footprint_x = footprint;
    data.min_water_depth = min_depth;
    def_from(&data)
}

/// Submarine needing `min_depth` of water.
#[must_use]
pub fn submarine(footprint: i32, min_depth: f32) -> MoveDef {
    let mut data = MoveDefData::named(format!("uboat{footprint}"));
    data.footprint_x = footprint;
    data.min_water_depth = min_depth;
    data.sub_marine = true;
    def_from(&data)
}

/// A small but varied set of move defs as a data file.
pub const SAMPLE_MOVE_DATA: &str = r#"
MoveDataFile(
    move_defs: [
        (name: "kbot1", footprint_x: 1, max_water_depth: 15.0),
        (name: "tank3", footprint_x: 3, max_slope: Some(18.0), max_water_depth: 22.0, crush_strength: 250.0),
        (name: "atank3", speed_mod_class: Some(Tank), footprint_x: 3, max_water_depth: 5000.0,
            depth_mod_params: (max_scale: Some(1.5))),
        (name: "hover3", footprint_x: 3),
        (name: "boat5", footprint_x: 5, min_water_depth: 10.0),
        (name: "uboat3", footprint_x: 3, min_water_depth: 15.0, sub_marine: true),
    ],
    terrain_types: [
        (name: "grass"),
        (name: "mud", tank_speed: 0.5, kbot_speed: 0.8),
    ],
    config: (water_damage: 0.0),
)
"#;

/// Registry loaded from [`SAMPLE_MOVE_DATA`].
///
/// # Panics
///
/// Panics if the sample data fails to load.
#[must_use]
pub fn sample_registry() -> MoveDefRegistry {
    MoveDefRegistry::from_ron(SAMPLE_MOVE_DATA).expect("sample move data must load")
}

/// Map with a land strip on the west, a shore, and deep sea on the east.
///
/// Columns `0..w/3` are land at height 20, the next column is shallow
/// water at -5, and the rest is sea at `sea_depth` (negative).
#[must_use]
pub fn coast_terrain(w: i32, h: i32, sea_depth: f32) -> TerrainGrid {
    let mut terrain = TerrainGrid::flat(w, h, 20.0);
    let shore = w / 3;
    terrain.fill(shore, shore, 0, h - 1, -5.0);
    terrain.fill(shore + 1, w - 1, 0, h - 1, sea_depth);
    terrain
}

/// Terrain, blocking grid and config for one test map.
#[derive(Debug, Clone)]
pub struct TestWorld {
    /// Terrain layers.
    pub terrain: TerrainGrid,
    /// Blocking objects.
    pub blocking: BlockingGrid,
    /// Query tunables.
    pub config: MoveMathConfig,
}

impl TestWorld {
    /// Flat dry map of `w` x `h` squares.
    #[must_use]
    pub fn flat(w: i32, h: i32) -> Self {
        Self::with_terrain(TerrainGrid::flat(w, h, 10.0))
    }

    /// World around existing terrain with an empty blocking grid.
    #[must_use]
    pub fn with_terrain(terrain: TerrainGrid) -> Self {
        let blocking = BlockingGrid::new(terrain.width(), terrain.height());
        Self {
            terrain,
            blocking,
            config: MoveMathConfig::default(),
        }
    }

    /// Query context borrowing this world.
    #[must_use]
    pub fn ctx(&self) -> MoveContext<'_, TerrainGrid> {
        MoveContext::new(&self.terrain, &self.blocking, &self.config)
    }

    /// Add a ground-level structure covering a rectangle of squares.
    pub fn add_structure(&mut self, rect: CellRect) -> ObjectId {
        self.blocking
            .add_object(BlockingObject::structure(10.0, 30.0), rect)
    }

    /// Add a mobile unit on one square.
    pub fn add_unit(&mut self, x: i32, z: i32, motion: Motion) -> ObjectId {
        self.blocking.add_object(
            BlockingObject::unit(10.0, 20.0, motion),
            CellRect::around(Cell::new(x, z), 0, 0),
        )
    }
}
