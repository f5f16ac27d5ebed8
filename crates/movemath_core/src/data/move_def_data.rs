//! Raw move-def parameters as read from data files.

use serde::{Deserialize, Serialize};

use crate::move_def::SpeedModClass;

/// Optional depth-modifier curve overrides.
///
/// Only ground units (tanks, kbots) read these; hovercraft and ships keep
/// the built-in curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthModData {
    /// Depth below which the curve starts to apply.
    #[serde(default)]
    pub min_height: Option<f32>,
    /// Depth beyond which the unit cannot move at all.
    #[serde(default)]
    pub max_height: Option<f32>,
    /// Upper clamp of the curve value.
    #[serde(default)]
    pub max_scale: Option<f32>,
    /// Quadratic coefficient.
    #[serde(default)]
    pub quadratic_coeff: Option<f32>,
    /// Linear coefficient.
    #[serde(default)]
    pub linear_coeff: Option<f32>,
    /// Constant coefficient.
    #[serde(default)]
    pub constant_coeff: Option<f32>,
}

/// Speed multipliers applied when the path crosses other mobile units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedModMultsData {
    /// Multiplier for squares holding a busy mobile unit.
    #[serde(default = "default_mult")]
    pub mobile_busy_mult: f32,
    /// Multiplier for squares holding an idle mobile unit.
    #[serde(default = "default_mult")]
    pub mobile_idle_mult: f32,
    /// Multiplier for squares holding a moving mobile unit.
    #[serde(default = "default_mult")]
    pub mobile_move_mult: f32,
}

impl Default for SpeedModMultsData {
    fn default() -> Self {
        Self {
            mobile_busy_mult: default_mult(),
            mobile_idle_mult: default_mult(),
            mobile_move_mult: default_mult(),
        }
    }
}

/// Data-driven move-def definition.
///
/// Every field except `name` is optional in data; absent fields take the
/// defaults documented on them. Turned into an immutable
/// [`MoveDef`](crate::move_def::MoveDef) by the registry.
///
/// # Example RON
///
/// ```ron
/// MoveDefData(
///     name: "tank3",
///     footprint_x: 3,
///     max_slope: Some(18.0),
///     max_water_depth: 22.0,
///     crush_strength: 250.0,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDefData {
    /// Name; lowercased on load and used for lookups.
    pub name: String,

    /// Explicit speed class. Inferred from the name when absent.
    #[serde(default)]
    pub speed_mod_class: Option<SpeedModClass>,

    /// Footprint width in build-grid units.
    #[serde(default = "default_footprint")]
    pub footprint_x: i32,

    /// Footprint depth in build-grid units (defaults to `footprint_x`).
    #[serde(default)]
    pub footprint_z: Option<i32>,

    /// Shallowest water the unit may enter (ships).
    #[serde(default = "default_min_water_depth")]
    pub min_water_depth: f32,

    /// Deepest water the unit may enter (ground units, hovercraft).
    #[serde(default = "default_max_water_depth")]
    pub max_water_depth: f32,

    /// Steepest climbable slope in degrees (60 for ground units, 15 for hover).
    #[serde(default)]
    pub max_slope: Option<f32>,

    /// Slope penalty factor (defaults to `4 / (max_slope + 0.001)`).
    #[serde(default)]
    pub slope_mod: Option<f32>,

    /// Legacy linear depth coefficient, used when the curve omits one.
    #[serde(default)]
    pub depth_mod: Option<f32>,

    /// Depth-modifier curve.
    #[serde(default)]
    pub depth_mod_params: DepthModData,

    /// Mobile-obstacle speed multipliers.
    #[serde(default)]
    pub speed_mod_mults: SpeedModMultsData,

    /// Crush strength against crushable obstacles.
    #[serde(default = "default_crush_strength")]
    pub crush_strength: f32,

    /// Ship moves below the surface.
    #[serde(default)]
    pub sub_marine: bool,

    /// Path costs account for mobile units.
    #[serde(default = "default_true")]
    pub avoid_mobiles_on_path: bool,

    /// Unit may collide with terrain.
    #[serde(default = "default_true")]
    pub allow_terrain_collisions: bool,

    /// Unit may skip path planning when a raw line is clear.
    #[serde(default)]
    pub allow_raw_movement: bool,

    /// Unit leaves path heat behind.
    #[serde(default)]
    pub heat_mapping: bool,

    /// Unit contributes to the flow map.
    #[serde(default = "default_true")]
    pub flow_mapping: bool,

    /// Heat cost factor.
    #[serde(default)]
    pub heat_mod: Option<f32>,

    /// Flow cost factor.
    #[serde(default = "default_mult")]
    pub flow_mod: f32,

    /// Heat produced per visited square.
    #[serde(default)]
    pub heat_produced: Option<i32>,
}

impl MoveDefData {
    /// Minimal definition with every optional field at its default.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed_mod_class: None,
            footprint_x: default_footprint(),
            footprint_z: None,
            min_water_depth: default_min_water_depth(),
            max_water_depth: default_max_water_depth(),
            max_slope: None,
            slope_mod: None,
            depth_mod: None,
            depth_mod_params: DepthModData::default(),
            speed_mod_mults: SpeedModMultsData::default(),
            crush_strength: default_crush_strength(),
            sub_marine: false,
            avoid_mobiles_on_path: true,
            allow_terrain_collisions: true,
            allow_raw_movement: false,
            heat_mapping: false,
            flow_mapping: true,
            heat_mod: None,
            flow_mod: default_mult(),
            heat_produced: None,
        }
    }
}

const fn default_footprint() -> i32 {
    1
}

const fn default_min_water_depth() -> f32 {
    -1e6
}

const fn default_max_water_depth() -> f32 {
    1e6
}

const fn default_crush_strength() -> f32 {
    10.0
}

const fn default_mult() -> f32 {
    1.0
}

const fn default_true() -> bool {
    true
}
