//! Data validation utilities.

use std::fmt;
use std::path::{Path, PathBuf};

use movemath_core::error::{MoveError, Result};
use movemath_core::move_def::{MoveDef, SpeedModClass, TerrainClass};
use movemath_core::registry::{load_data_file, MoveDefRegistry};

/// Summary of one move def for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDefSummary {
    /// Lowercased name.
    pub name: String,
    /// Speed class.
    pub class: SpeedModClass,
    /// Derived terrain class.
    pub terrain: TerrainClass,
    /// Footprint in squares.
    pub size: (i32, i32),
    /// Per-def checksum.
    pub checksum: u32,
}

impl From<&MoveDef> for MoveDefSummary {
    fn from(def: &MoveDef) -> Self {
        Self {
            name: def.name.clone(),
            class: def.speed_mod_class,
            terrain: def.terrain_class,
            size: (def.xsize, def.zsize),
            checksum: def.checksum(),
        }
    }
}

/// Result of validating one data file.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// File that was validated.
    pub path: PathBuf,
    /// One entry per move def, in id order.
    pub move_defs: Vec<MoveDefSummary>,
    /// Number of terrain types in the file.
    pub terrain_types: usize,
    /// Session checksum of the whole file.
    pub checksum: u32,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} move defs, {} terrain types, checksum {:#010x}",
            self.path.display(),
            self.move_defs.len(),
            self.terrain_types,
            self.checksum
        )?;
        for def in &self.move_defs {
            let class = format!("{:?}", def.class);
            let terrain = format!("{:?}", def.terrain);
            writeln!(
                f,
                "  {:<16} {class:<6} {terrain:<6} {}x{}  {:#010x}",
                def.name,
                def.size.0,
                def.size.1,
                def.checksum
            )?;
        }
        Ok(())
    }
}

/// Load one data file and build its registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// registry rejects it (duplicate names, too many defs).
pub fn validate_data_file(path: &Path) -> Result<ValidationReport> {
    let file = load_data_file(path)?;
    let registry = MoveDefRegistry::from_file_data(&file)?;

    Ok(ValidationReport {
        path: path.to_path_buf(),
        move_defs: registry.all().iter().map(MoveDefSummary::from).collect(),
        terrain_types: file.terrain_types.len(),
        checksum: registry.checksum(),
    })
}

/// Validate all RON data files in a directory, in name order.
///
/// # Errors
///
/// Returns the first error encountered.
pub fn validate_data_directory(path: &Path) -> Result<Vec<ValidationReport>> {
    let io_error = |source: std::io::Error| MoveError::IoError {
        path: path.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_error)? {
        let file = entry.map_err(io_error)?.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();

    files.iter().map(|file| validate_data_file(file)).collect()
}

/// Validate a single file or every data file in a directory.
///
/// # Errors
///
/// Returns the first error encountered.
pub fn validate_path(path: &Path) -> Result<Vec<ValidationReport>> {
    if path.is_dir() {
        validate_data_directory(path)
    } else {
        validate_data_file(path).map(|report| vec![report])
    }
}
