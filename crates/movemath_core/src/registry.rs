//! Registry of loaded move defs.
//!
//! Built once at load time and read-only afterwards, so it can be shared by
//! reference across query threads. Defs are addressed by [`MoveDefId`]
//! (their position in load order) or by lowercased name.

use std::collections::HashMap;
use std::path::Path;

use crate::checksum::Checksum;
use crate::config::MoveMathConfig;
use crate::constants::MAX_MOVE_DEFS;
use crate::data::{MoveDataFile, MoveDefData};
use crate::error::{MoveError, Result};
use crate::move_def::{MoveDef, MoveDefId};
use crate::terrain::TerrainType;

/// All move defs of a session.
#[derive(Debug, Clone, Default)]
pub struct MoveDefRegistry {
    defs: Vec<MoveDef>,
    by_name: HashMap<String, MoveDefId>,
    largest_size: i32,
    largest_size_h: i32,
    checksum: u32,
}

impl MoveDefRegistry {
    /// Build every def from `data`, in order.
    ///
    /// The session checksum covers every def plus the terrain-type speeds
    /// and the water settings of `config`, since all of them change query
    /// results.
    pub fn load(
        data: &[MoveDefData],
        terrain_types: &[TerrainType],
        config: &MoveMathConfig,
    ) -> Result<Self> {
        if data.len() > MAX_MOVE_DEFS {
            return Err(MoveError::TooManyMoveDefs {
                count: data.len(),
                max: MAX_MOVE_DEFS,
            });
        }

        let mut registry = Self::default();

        for (index, raw) in data.iter().enumerate() {
            // bounded by MAX_MOVE_DEFS above
            let id = MoveDefId::new(index as u16);
            let def = MoveDef::from_data(raw, id);

            if registry.by_name.contains_key(&def.name) {
                return Err(MoveError::DuplicateMoveDef(def.name));
            }

            registry.largest_size = registry.largest_size.max(def.xsize).max(def.zsize);
            registry.largest_size_h = registry.largest_size_h.max(def.xsizeh).max(def.zsizeh);
            registry.checksum ^= def.checksum();

            tracing::debug!(
                move_def = %def.name,
                id = index,
                class = ?def.speed_mod_class,
                terrain = ?def.terrain_class,
                xsize = def.xsize,
                zsize = def.zsize,
                "Loaded move def"
            );

            registry.by_name.insert(def.name.clone(), id);
            registry.defs.push(def);
        }

        let mut types_sum = Checksum::new();
        for terrain_type in terrain_types {
            terrain_type.checksum_into(&mut types_sum);
        }
        let mut config_sum = Checksum::new();
        config.checksum_into(&mut config_sum);

        registry.checksum ^= types_sum.finish() ^ config_sum.finish();

        tracing::debug!(
            count = registry.defs.len(),
            checksum = format_args!("{:#010x}", registry.checksum),
            "Move def registry ready"
        );
        Ok(registry)
    }

    /// Load from a parsed data file.
    pub fn from_file_data(file: &MoveDataFile) -> Result<Self> {
        Self::load(&file.move_defs, &file.terrain_types, &file.config)
    }

    /// Parse a [`MoveDataFile`] from RON source and load it.
    pub fn from_ron(source: &str) -> Result<Self> {
        let file = parse_data_file(source, "<memory>")?;
        Self::from_file_data(&file)
    }

    /// Def by id.
    #[must_use]
    pub fn get(&self, id: MoveDefId) -> Option<&MoveDef> {
        self.defs.get(id.index())
    }

    /// Def by name (case-insensitive).
    pub fn find(&self, name: &str) -> Result<&MoveDef> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|id| &self.defs[id.index()])
            .ok_or_else(|| MoveError::UnknownMoveDef(name.to_string()))
    }

    /// All defs in id order.
    #[must_use]
    pub fn all(&self) -> &[MoveDef] {
        &self.defs
    }

    /// Number of defs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True if no defs are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Largest footprint side over all defs, in squares.
    #[must_use]
    pub const fn largest_size(&self) -> i32 {
        self.largest_size
    }

    /// Largest footprint half-size over all defs.
    #[must_use]
    pub const fn largest_size_h(&self) -> i32 {
        self.largest_size_h
    }

    /// Session checksum. Identical data on every participant gives an
    /// identical value.
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }
}

/// Parse a move data file, labelling errors with `path`.
pub fn parse_data_file(source: &str, path: &str) -> Result<MoveDataFile> {
    ron::from_str(source).map_err(|e| MoveError::DataParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a move data file from disk.
pub fn load_data_file(path: &Path) -> Result<MoveDataFile> {
    let path_str = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| MoveError::IoError {
        path: path_str.clone(),
        source: e,
    })?;
    parse_data_file(&contents, &path_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_def::{SpeedModClass, TerrainClass};

    fn defs() -> Vec<MoveDefData> {
        let mut boat = MoveDefData::named("BOAT4");
        boat.footprint_x = 4;
        boat.min_water_depth = 10.0;

        let mut tank = MoveDefData::named("tank2");
        tank.footprint_x = 2;
        tank.footprint_z = Some(3);

        vec![tank, boat, MoveDefData::named("kbot1")]
    }

    fn load(data: &[MoveDefData]) -> Result<MoveDefRegistry> {
        MoveDefRegistry::load(data, &[TerrainType::default()], &MoveMathConfig::default())
    }

    #[test]
    fn test_load_and_lookup() {
        let registry = load(&defs()).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());

        let boat = registry.find("boat4").unwrap();
        assert_eq!(boat.id, MoveDefId::new(1));
        assert_eq!(boat.speed_mod_class, SpeedModClass::Ship);
        assert_eq!(boat.terrain_class, TerrainClass::Water);
        assert_eq!(registry.find("Boat4").unwrap().id, boat.id);

        let kbot = registry.get(MoveDefId::new(2)).unwrap();
        assert_eq!(kbot.name, "kbot1");
        assert!(registry.get(MoveDefId::new(3)).is_none());

        let names: Vec<_> = registry.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["tank2", "boat4", "kbot1"]);
    }

    #[test]
    fn test_unknown_name() {
        let registry = load(&defs()).unwrap();
        assert!(matches!(registry.find("hover9"), Err(MoveError::UnknownMoveDef(n)) if n == "hover9"));
    }

    #[test]
    fn test_largest_size() {
        let registry = load(&defs()).unwrap();
        // boat footprint 4 -> 8 squares -> 7
        assert_eq!(registry.largest_size(), 7);
        assert_eq!(registry.largest_size_h(), 3);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let data = vec![MoveDefData::named("tank2"), MoveDefData::named("TANK2")];
        assert!(matches!(load(&data), Err(MoveError::DuplicateMoveDef(n)) if n == "tank2"));
    }

    #[test]
    fn test_too_many_defs() {
        let data: Vec<_> = (0..=MAX_MOVE_DEFS)
            .map(|i| MoveDefData::named(format!("kbot{i}")))
            .collect();
        assert!(matches!(
            load(&data),
            Err(MoveError::TooManyMoveDefs { count, max }) if count == MAX_MOVE_DEFS + 1 && max == MAX_MOVE_DEFS
        ));

        assert_eq!(load(&data[..MAX_MOVE_DEFS]).unwrap().len(), MAX_MOVE_DEFS);
    }

    #[test]
    fn test_checksum_is_order_independent() {
        let data = defs();
        let mut reversed = data.clone();
        reversed.reverse();

        let a = load(&data).unwrap().checksum();
        let b = load(&data).unwrap().checksum();
        let c = load(&reversed).unwrap().checksum();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_checksum_covers_terrain_and_config() {
        let data = defs();
        let base = load(&data).unwrap().checksum();

        let mud = TerrainType {
            tank_speed: 0.5,
            ..TerrainType::default()
        };
        let with_mud = MoveDefRegistry::load(&data, &[mud], &MoveMathConfig::default()).unwrap();
        assert_ne!(base, with_mud.checksum());

        let acid = MoveMathConfig {
            water_damage: 100.0,
            ..Default::default()
        };
        let with_acid = MoveDefRegistry::load(&data, &[TerrainType::default()], &acid).unwrap();
        assert_ne!(base, with_acid.checksum());

        let mut edited = data;
        edited[0].crush_strength = 99.0;
        assert_ne!(base, load(&edited).unwrap().checksum());
    }

    #[test]
    fn test_from_ron() {
        let registry = MoveDefRegistry::from_ron(
            r#"(
                move_defs: [(name: "hover3", footprint_x: 3), (name: "kbot2", footprint_x: 2)],
                terrain_types: [(name: "grass")],
            )"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("hover3").unwrap().speed_mod_class, SpeedModClass::Hover);

        let err = MoveDefRegistry::from_ron("(move_defs: [").unwrap_err();
        assert!(matches!(err, MoveError::DataParseError { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_data_file(Path::new("/nonexistent/moves.ron")).unwrap_err();
        assert!(matches!(err, MoveError::IoError { .. }));
    }
}
