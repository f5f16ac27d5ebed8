//! Terrain speed modifiers.
//!
//! Converts one terrain square plus a movement direction into a scalar
//! speed multiplier for a move def. Zero means impassable. Values are
//! usually in `[0, 1]`; a depth curve with a constant below 1 can push
//! them above.

use crate::config::MoveMathConfig;
use crate::math::Dir2;
use crate::move_def::{MoveDef, SpeedModClass};
use crate::terrain::{SquareSample, TerrainSource};

/// Speed modifier of square `(x, z)` for `def`.
///
/// With `dir` set, only uphill movement along `dir` is penalized; with
/// `None` the full slope counts regardless of direction. Off-map squares
/// yield 0; the walkers skip them before sampling.
#[must_use]
pub fn pos_speed_mod<T: TerrainSource + ?Sized>(
    def: &MoveDef,
    terrain: &T,
    config: &MoveMathConfig,
    x: i32,
    z: i32,
    dir: Option<Dir2>,
) -> f32 {
    if !terrain.contains(x, z) {
        return 0.0;
    }

    let sample = terrain.sample(x, z, def.speed_mod_class);
    let speed = match def.speed_mod_class {
        SpeedModClass::Tank | SpeedModClass::KBot => ground_speed_mod(def, config, &sample, dir),
        SpeedModClass::Hover => hover_speed_mod(def, config, &sample, dir),
        SpeedModClass::Ship => ship_speed_mod(def, &sample),
    };

    speed * sample.type_speed
}

/// Effective slope: full slope without a direction, else only the uphill
/// component along `dir` (downhill never speeds a unit up).
#[inline]
fn effective_slope(sample: &SquareSample, dir: Option<Dir2>) -> f32 {
    match dir {
        None => sample.slope,
        Some(dir) => {
            let dir_slope_mod = -dir.dot(sample.normal_x, sample.normal_z);
            (sample.slope * dir_slope_mod).max(0.0)
        }
    }
}

fn ground_speed_mod(
    def: &MoveDef,
    config: &MoveMathConfig,
    sample: &SquareSample,
    dir: Option<Dir2>,
) -> f32 {
    if sample.slope > def.max_slope {
        return 0.0;
    }
    if -sample.height > def.depth {
        return 0.0;
    }

    let mut speed = 1.0 / (1.0 + effective_slope(sample, dir) * def.slope_mod);
    if sample.height < 0.0 {
        speed *= config.water_damage_cost();
    }
    speed * def.depth_mod(sample.height)
}

fn hover_speed_mod(
    def: &MoveDef,
    config: &MoveMathConfig,
    sample: &SquareSample,
    dir: Option<Dir2>,
) -> f32 {
    // no slope penalty on water
    if sample.height < 0.0 {
        return if config.no_hover_water_move() { 0.0 } else { 1.0 };
    }
    if sample.slope > def.max_slope {
        return 0.0;
    }

    1.0 / (1.0 + effective_slope(sample, dir) * def.slope_mod)
}

fn ship_speed_mod(def: &MoveDef, sample: &SquareSample) -> f32 {
    if -sample.height < def.depth {
        0.0
    } else {
        1.0
    }
}
