//! Data structures for move-def configuration.
//!
//! Pure data records deserialized from RON. They carry raw, unvalidated
//! values; [`crate::move_def::MoveDef::from_data`] applies defaults and
//! clamps.

mod move_data_file;
mod move_def_data;

pub use move_data_file::MoveDataFile;
pub use move_def_data::{DepthModData, MoveDefData, SpeedModMultsData};
