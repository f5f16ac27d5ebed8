//! Map- and mod-level settings consumed by the speed functions.

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::{MoveError, Result};

/// Water damage at or above which ground units treat water as impassable.
const MAX_ALLOWED_WATER_DAMAGE_GMM: f32 = 1e3;
/// Water damage at or above which hovercraft cannot cross water.
const MAX_ALLOWED_WATER_DAMAGE_HMM: f32 = 1e4;

/// Tunables shared by every query.
///
/// # Example RON
///
/// ```ron
/// MoveMathConfig(
///     raw_move_speed_threshold: 0.0,
///     water_damage: 50.0,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMathConfig {
    /// A raw line walk fails on any square whose speed modifier is at or
    /// below this value.
    #[serde(default)]
    pub raw_move_speed_threshold: f32,

    /// Damage per second dealt by map water.
    #[serde(default)]
    pub water_damage: f32,
}

impl Default for MoveMathConfig {
    fn default() -> Self {
        Self {
            raw_move_speed_threshold: 0.0,
            water_damage: 0.0,
        }
    }
}

impl MoveMathConfig {
    /// Parse a config from RON source.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| MoveError::DataParseError {
            path: "<config>".into(),
            message: e.to_string(),
        })
    }

    /// Speed multiplier for ground units on under-water squares.
    #[must_use]
    pub fn water_damage_cost(&self) -> f32 {
        if self.water_damage >= MAX_ALLOWED_WATER_DAMAGE_GMM {
            0.0
        } else {
            1.0 / (1.0 + self.water_damage * 0.1)
        }
    }

    /// Hovercraft cannot move over water at all.
    #[must_use]
    pub fn no_hover_water_move(&self) -> bool {
        self.water_damage >= MAX_ALLOWED_WATER_DAMAGE_HMM
    }

    /// Feed the derived water values into a running checksum.
    pub fn checksum_into(&self, sum: &mut Checksum) {
        sum.f32(self.water_damage_cost()).bool(self.no_hover_water_move());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MoveMathConfig::default();
        assert_eq!(config.water_damage_cost(), 1.0);
        assert!(!config.no_hover_water_move());
    }

    #[test]
    fn test_water_damage_cost() {
        let config = MoveMathConfig {
            water_damage: 10.0,
            ..Default::default()
        };
        assert!((config.water_damage_cost() - 0.5).abs() < 1e-6);
        assert!(!config.no_hover_water_move());

        let lethal = MoveMathConfig {
            water_damage: 5000.0,
            ..Default::default()
        };
        assert_eq!(lethal.water_damage_cost(), 0.0);
        assert!(!lethal.no_hover_water_move());

        let acid = MoveMathConfig {
            water_damage: 1e4,
            ..Default::default()
        };
        assert!(acid.no_hover_water_move());
    }

    #[test]
    fn test_from_ron() {
        let config = MoveMathConfig::from_ron("(water_damage: 10.0)").unwrap();
        assert_eq!(config.raw_move_speed_threshold, 0.0);
        assert_eq!(config.water_damage, 10.0);

        assert!(MoveMathConfig::from_ron("(water_damage: )").is_err());
    }
}
