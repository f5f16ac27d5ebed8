//! Movement profiles ("move defs").
//!
//! A [`MoveDef`] describes how one class of mobile unit interacts with the
//! terrain: its footprint, which slopes and depths it can handle and how
//! those slow it down. Move defs are built once at load time by
//! [`MoveDefRegistry`](crate::registry::MoveDefRegistry) and never change
//! afterwards, so they can be shared freely across query threads.

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::constants::{DEPTH_MOD_MIN_SCALE, FOOTPRINT_SCALE, GAME_SPEED, SQUARE_SIZE_F32};
use crate::data::MoveDefData;

/// Broad locomotion class; selects the terrain speed function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedModClass {
    /// Tracked or wheeled ground vehicle.
    Tank,
    /// Legged ground unit.
    KBot,
    /// Hovercraft; floats over water.
    Hover,
    /// Surface ship or submarine.
    Ship,
}

impl SpeedModClass {
    /// Stable numeric index, used for checksums and terrain-speed lookup.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Tank => 0,
            Self::KBot => 1,
            Self::Hover => 2,
            Self::Ship => 3,
        }
    }

    /// Infer a class from a (lowercase) move-def name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.contains("boat") || name.contains("ship") {
            Self::Ship
        } else if name.contains("hover") {
            Self::Hover
        } else if name.contains("tank") {
            Self::Tank
        } else {
            Self::KBot
        }
    }
}

/// Which kinds of surface a move def can traverse. Derived, not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainClass {
    /// Dry land only.
    Land,
    /// Water only.
    Water,
    /// Both land and water (amphibious).
    #[default]
    Mixed,
}

impl TerrainClass {
    const fn index(self) -> u8 {
        match self {
            Self::Land => 0,
            Self::Water => 1,
            Self::Mixed => 2,
        }
    }

    /// Classify a move def from its speed class and water-depth limits.
    ///
    /// Rules are applied in order and later matches win.
    #[must_use]
    pub fn classify(class: SpeedModClass, min_water_depth: f32, max_water_depth: f32) -> Self {
        let follow_ground = matches!(class, SpeedModClass::Tank | SpeedModClass::KBot);
        let ship = class == SpeedModClass::Ship;
        let mut terrain = Self::default();

        if (follow_ground && max_water_depth <= 0.0) || class == SpeedModClass::Hover {
            terrain = Self::Land;
        }
        if (ship && min_water_depth > 0.0) || (follow_ground && min_water_depth > 0.0) {
            terrain = Self::Water;
        }
        if (follow_ground && max_water_depth > 0.0) || (ship && min_water_depth < 0.0) {
            terrain = Self::Mixed;
        }

        terrain
    }
}

/// Quadratic depth-modifier curve.
///
/// For a depth `d` between `min_height` and `max_height` the speed factor is
/// `1 / clamp(a*d^2 + b*d + c, 0.01, max_scale)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthModParams {
    /// Depth where the curve starts.
    pub min_height: f32,
    /// Depth where the unit becomes stuck. Always `>= min_height`.
    pub max_height: f32,
    /// Upper clamp of the scale. Always `>= 0.01`.
    pub max_scale: f32,
    /// Quadratic coefficient `a`.
    pub quadratic_coeff: f32,
    /// Linear coefficient `b`.
    pub linear_coeff: f32,
    /// Constant coefficient `c`.
    pub constant_coeff: f32,
}

impl Default for DepthModParams {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: f32::MAX,
            max_scale: f32::MAX,
            quadratic_coeff: 0.0,
            linear_coeff: 0.1,
            constant_coeff: 1.0,
        }
    }
}

/// Index into [`MoveDef::speed_mod_mults`].
pub const SPEEDMOD_MOBILE_BUSY_MULT: usize = 0;
/// Index into [`MoveDef::speed_mod_mults`].
pub const SPEEDMOD_MOBILE_IDLE_MULT: usize = 1;
/// Index into [`MoveDef::speed_mod_mults`].
pub const SPEEDMOD_MOBILE_MOVE_MULT: usize = 2;

/// Numeric handle of a move def inside its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct MoveDefId(u16);

impl MoveDefId {
    /// Create a new move def ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Raw index.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Raw index as `usize` for slice access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable movement profile for one unit movement type.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDef {
    /// Lowercased name.
    pub name: String,
    /// Registry handle ("path type").
    pub id: MoveDefId,

    /// Locomotion class.
    pub speed_mod_class: SpeedModClass,
    /// Derived surface class.
    pub terrain_class: TerrainClass,

    /// Footprint width in squares; always odd.
    pub xsize: i32,
    /// `xsize >> 1`.
    pub xsizeh: i32,
    /// Footprint depth in squares; always odd.
    pub zsize: i32,
    /// `zsize >> 1`.
    pub zsizeh: i32,

    /// Minimum water depth for ships, maximum for everything else.
    pub depth: f32,
    /// Depth-modifier curve.
    pub depth_mod_params: DepthModParams,
    /// Steepest passable slope, in `[0, 1]` (`1 - cos(angle)`).
    pub max_slope: f32,
    /// Slope penalty factor.
    pub slope_mod: f32,
    /// Crush strength against crushable obstacles.
    pub crush_strength: f32,
    /// Mobile-obstacle multipliers (busy, idle, moving, reserved).
    pub speed_mod_mults: [f32; 4],

    /// Heat cost factor.
    pub heat_mod: f32,
    /// Flow cost factor.
    pub flow_mod: f32,
    /// Heat produced per visited square.
    pub heat_produced: i32,

    /// Ground units hug the sea floor; ships stay at their waterline.
    pub follow_ground: bool,
    /// Ship travels submerged.
    pub is_submarine: bool,
    /// Path costs account for mobile units.
    pub avoid_mobiles_on_path: bool,
    /// Unit may collide with terrain.
    pub allow_terrain_collisions: bool,
    /// Unit may skip path planning when a raw line is clear.
    pub allow_raw_movement: bool,
    /// Unit leaves path heat behind.
    pub heat_mapping: bool,
    /// Unit contributes to the flow map.
    pub flow_mapping: bool,
}

/// Convert a slope limit in degrees to the `[0, 1]` slope scale.
///
/// The input is clamped to `[0, 60]` and stretched by 1.5, so 60 degrees
/// maps to `1 - cos(90°) = 1`.
#[must_use]
pub fn degrees_to_max_slope(degrees: f32) -> f32 {
    let deg = degrees.clamp(0.0, 60.0) * 1.5;
    1.0 - deg.to_radians().cos()
}

/// Force a footprint dimension to be odd, so footprints have a center square.
#[must_use]
pub const fn odd_footprint(size: i32) -> i32 {
    if size & 1 == 1 {
        size
    } else {
        size - 1
    }
}

impl MoveDef {
    /// Build a move def from raw data, applying defaults and clamps.
    #[must_use]
    pub fn from_data(data: &MoveDefData, id: MoveDefId) -> Self {
        let name = data.name.to_lowercase();
        let speed_mod_class = data
            .speed_mod_class
            .unwrap_or_else(|| SpeedModClass::from_name(&name));

        let mut depth_mod_params = DepthModParams::default();
        let mut is_submarine = false;

        let (depth, max_slope) = match speed_mod_class {
            SpeedModClass::Tank | SpeedModClass::KBot => {
                let dm = &data.depth_mod_params;
                let min_height = dm.min_height.unwrap_or(0.0).max(0.0);
                let max_height = dm.max_height.unwrap_or(f32::MAX);

                if max_height < min_height {
                    tracing::warn!(
                        move_def = %name,
                        min_height,
                        max_height,
                        "depth-mod max height below min height; raising it"
                    );
                }

                depth_mod_params = DepthModParams {
                    min_height,
                    max_height: max_height.max(min_height),
                    max_scale: dm.max_scale.unwrap_or(f32::MAX).max(DEPTH_MOD_MIN_SCALE),
                    quadratic_coeff: dm.quadratic_coeff.unwrap_or(0.0).max(0.0),
                    linear_coeff: dm
                        .linear_coeff
                        .unwrap_or(data.depth_mod.unwrap_or(0.1))
                        .max(0.0),
                    constant_coeff: dm.constant_coeff.unwrap_or(1.0).max(0.0),
                };

                (
                    data.max_water_depth,
                    degrees_to_max_slope(data.max_slope.unwrap_or(60.0)),
                )
            }
            SpeedModClass::Hover => (
                data.max_water_depth,
                degrees_to_max_slope(data.max_slope.unwrap_or(15.0)),
            ),
            SpeedModClass::Ship => {
                is_submarine = data.sub_marine;
                // slope limits do not apply to ships
                (data.min_water_depth, 0.0)
            }
        };

        let mults = &data.speed_mod_mults;
        let speed_mod_mults = [
            mults.mobile_busy_mult.max(0.01),
            mults.mobile_idle_mult.max(0.01),
            mults.mobile_move_mult.max(0.01),
            0.0,
        ];

        let follow_ground = matches!(speed_mod_class, SpeedModClass::Tank | SpeedModClass::KBot);
        let terrain_class =
            TerrainClass::classify(speed_mod_class, data.min_water_depth, data.max_water_depth);

        let xsize_def = data.footprint_x.max(1);
        let zsize_def = data.footprint_z.unwrap_or(xsize_def).max(1);
        let xsize = odd_footprint(xsize_def * FOOTPRINT_SCALE);
        let zsize = odd_footprint(zsize_def * FOOTPRINT_SCALE);
        debug_assert!(xsize & 1 == 1 && zsize & 1 == 1);

        Self {
            name,
            id,
            speed_mod_class,
            terrain_class,
            xsize,
            xsizeh: xsize >> 1,
            zsize,
            zsizeh: zsize >> 1,
            depth,
            depth_mod_params,
            max_slope,
            slope_mod: data.slope_mod.unwrap_or(4.0 / (max_slope + 0.001)),
            crush_strength: data.crush_strength,
            speed_mod_mults,
            heat_mod: data
                .heat_mod
                .unwrap_or((1.0 / (GAME_SPEED as f32 * 2.0)) * 0.25),
            flow_mod: data.flow_mod,
            heat_produced: data.heat_produced.unwrap_or(GAME_SPEED * 2),
            follow_ground,
            is_submarine,
            avoid_mobiles_on_path: data.avoid_mobiles_on_path,
            allow_terrain_collisions: data.allow_terrain_collisions,
            allow_raw_movement: data.allow_raw_movement,
            heat_mapping: data.heat_mapping,
            flow_mapping: data.flow_mapping,
        }
    }

    /// Speed factor for standing at terrain height `height` (negative = under water).
    ///
    /// Returns exactly 1 at or above `-min_height`, exactly 0 at or below
    /// `-max_height`, and the reciprocal of the clamped quadratic in between.
    /// Values above 1 are a speed-up.
    #[must_use]
    pub fn depth_mod(&self, height: f32) -> f32 {
        let p = &self.depth_mod_params;

        // min/max heights are never negative, only depths are penalized
        if height >= -p.min_height {
            return 1.0;
        }
        if height <= -p.max_height {
            return 0.0;
        }

        let depth = -height;
        let scale = (p.quadratic_coeff * depth * depth + p.linear_coeff * depth + p.constant_coeff)
            .clamp(DEPTH_MOD_MIN_SCALE, p.max_scale);

        1.0 / scale
    }

    /// Radius of the circle circumscribing the footprint.
    #[must_use]
    pub fn min_exterior_radius(&self, scale: f32) -> f32 {
        let (x, z) = (self.xsize as f32, self.zsize as f32);
        (x * x + z * z).sqrt() * 0.5 * SQUARE_SIZE_F32 * scale
    }

    /// Radius of the circle inscribed in the footprint's longer side.
    #[must_use]
    pub fn max_interior_radius(&self, scale: f32) -> f32 {
        self.xsize.max(self.zsize) as f32 * 0.5 * SQUARE_SIZE_F32 * scale
    }

    /// How elongated the footprint is: 0 for square, towards 1 for thin.
    #[must_use]
    pub fn axis_stretch_factor(&self) -> f32 {
        (self.xsize - self.zsize).abs() as f32 / (self.xsize + self.zsize) as f32
    }

    /// Whether a collider of `collider_height` can end up fully under water.
    #[must_use]
    pub fn is_submersible(&self, collider_height: f32) -> bool {
        self.is_submarine || (self.follow_ground && self.depth > collider_height)
    }

    /// Deterministic digest of every simulation-relevant parameter.
    ///
    /// Name and id are excluded so that the digest only reflects behavior.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        let p = &self.depth_mod_params;
        let mut sum = Checksum::new();

        sum.bytes(&[self.speed_mod_class.index(), self.terrain_class.index()])
            .i32(self.xsize)
            .i32(self.xsizeh)
            .i32(self.zsize)
            .i32(self.zsizeh)
            .f32(self.depth)
            .f32(p.min_height)
            .f32(p.max_height)
            .f32(p.max_scale)
            .f32(p.quadratic_coeff)
            .f32(p.linear_coeff)
            .f32(p.constant_coeff)
            .f32(self.max_slope)
            .f32(self.slope_mod)
            .f32(self.crush_strength);
        for mult in self.speed_mod_mults {
            sum.f32(mult);
        }
        sum.f32(self.heat_mod)
            .f32(self.flow_mod)
            .i32(self.heat_produced)
            .bool(self.follow_ground)
            .bool(self.is_submarine)
            .bool(self.avoid_mobiles_on_path)
            .bool(self.allow_terrain_collisions)
            .bool(self.allow_raw_movement)
            .bool(self.heat_mapping)
            .bool(self.flow_mapping);

        sum.finish()
    }
}
