//! Top-level move data file: move defs plus the map settings they depend on.

use serde::{Deserialize, Serialize};

use super::MoveDefData;
use crate::config::MoveMathConfig;
use crate::terrain::TerrainType;

/// Contents of one move data file.
///
/// # Example RON
///
/// ```ron
/// MoveDataFile(
///     move_defs: [
///         (name: "tank2", footprint_x: 2, max_slope: Some(30.0), max_water_depth: 22.0),
///         (name: "boat4", footprint_x: 4, min_water_depth: 10.0),
///     ],
///     terrain_types: [
///         (name: "grass"),
///         (name: "mud", tank_speed: 0.5),
///     ],
///     config: (water_damage: 0.0),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveDataFile {
    /// Move defs in id order.
    pub move_defs: Vec<MoveDefData>,
    /// Terrain types in type-map order.
    #[serde(default)]
    pub terrain_types: Vec<TerrainType>,
    /// Query tunables.
    #[serde(default)]
    pub config: MoveMathConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let file: MoveDataFile = ron::from_str(r#"(move_defs: [(name: "kbot1")])"#).unwrap();
        assert_eq!(file.move_defs.len(), 1);
        assert!(file.terrain_types.is_empty());
        assert_eq!(file.config, MoveMathConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let source = r#"
            MoveDataFile(
                move_defs: [
                    (name: "tank2", footprint_x: 2, max_water_depth: 22.0),
                    (name: "boat4", footprint_x: 4, min_water_depth: 10.0),
                ],
                terrain_types: [(name: "mud", tank_speed: 0.5)],
                config: (raw_move_speed_threshold: 0.1, water_damage: 5.0),
            )
        "#;
        let file: MoveDataFile = ron::from_str(source).unwrap();
        assert_eq!(file.move_defs[1].name, "boat4");
        assert_eq!(file.terrain_types[0].tank_speed, 0.5);
        assert_eq!(file.config.water_damage, 5.0);
    }
}
