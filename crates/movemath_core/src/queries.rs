//! Passability queries: straight lines, rectangles and single positions.
//!
//! Every query borrows the shared world state through a [`MoveContext`] and
//! only mutates the caller's [`QueryScratch`], so worker threads can run
//! queries against the same terrain and blocking grid in parallel.
//!
//! # Results
//!
//! Line and range queries return a [`MoveTest`]. The auxiliary payloads
//! (`min_speed_mod`, `block_bits`) describe the squares that were actually
//! examined before the query finished. When `passable` is `false` they stop
//! at the failing square, so read them only after checking `passable`.

use serde::{Deserialize, Serialize};

use crate::blocking::{BlockType, BlockingGrid, BlockingSession, Collider, Epoch, QueryScratch};
use crate::config::MoveMathConfig;
use crate::line_walk::{line_cells, walk_line};
use crate::math::{CellRect, Dir2, Vec2Fixed};
use crate::move_def::MoveDef;
use crate::speed_mod::pos_speed_mod;
use crate::submersible::SubmersibleTracker;
use crate::terrain::TerrainSource;

/// Shared, read-only world state a query runs against.
#[derive(Debug)]
pub struct MoveContext<'a, T: TerrainSource + ?Sized> {
    /// Terrain heights, slopes and types.
    pub terrain: &'a T,
    /// Blocking objects.
    pub blocking: &'a BlockingGrid,
    /// Map and mod tunables.
    pub config: &'a MoveMathConfig,
}

impl<T: TerrainSource + ?Sized> Clone for MoveContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: TerrainSource + ?Sized> Copy for MoveContext<'_, T> {}

impl<'a, T: TerrainSource + ?Sized> MoveContext<'a, T> {
    /// Bundle world state for queries.
    #[must_use]
    pub const fn new(terrain: &'a T, blocking: &'a BlockingGrid, config: &'a MoveMathConfig) -> Self {
        Self {
            terrain,
            blocking,
            config,
        }
    }
}

/// Which checks a query performs.
///
/// At least one of `test_terrain` and `test_objects` must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveTestOptions {
    /// Sample terrain speed modifiers.
    pub test_terrain: bool,
    /// Check the blocking grid.
    pub test_objects: bool,
    /// Check only the center square instead of the whole footprint.
    pub center_only: bool,
}

impl Default for MoveTestOptions {
    fn default() -> Self {
        Self {
            test_terrain: true,
            test_objects: true,
            center_only: false,
        }
    }
}

impl MoveTestOptions {
    /// Terrain checks only.
    #[must_use]
    pub const fn terrain_only() -> Self {
        Self {
            test_terrain: true,
            test_objects: false,
            center_only: false,
        }
    }

    /// Blocking-object checks only.
    #[must_use]
    pub const fn objects_only() -> Self {
        Self {
            test_terrain: false,
            test_objects: true,
            center_only: false,
        }
    }

    /// Same checks, restricted to the center square.
    #[must_use]
    pub const fn center_only(self) -> Self {
        Self {
            center_only: true,
            ..self
        }
    }
}

/// A straight-line movement to test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineQuery {
    /// World-space start.
    pub start: Vec2Fixed,
    /// World-space end.
    pub end: Vec2Fixed,
    /// Direction for uphill penalties; [`Dir2::ZERO`] ignores slopes.
    pub move_dir: Dir2,
    /// Checks to perform.
    pub options: MoveTestOptions,
}

impl LineQuery {
    /// Line from `start` to `end`, moving along the line, with default options.
    #[must_use]
    pub fn new(start: Vec2Fixed, end: Vec2Fixed) -> Self {
        Self {
            start,
            end,
            move_dir: Dir2::from_vec(end - start),
            options: MoveTestOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub const fn with_options(mut self, options: MoveTestOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the movement direction.
    #[must_use]
    pub const fn with_move_dir(mut self, move_dir: Dir2) -> Self {
        self.move_dir = move_dir;
        self
    }
}

/// An axis-aligned world-space box to test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeQuery {
    /// Minimum corner.
    pub mins: Vec2Fixed,
    /// Maximum corner.
    pub maxs: Vec2Fixed,
    /// Direction for uphill penalties; `None` applies the full slope.
    pub move_dir: Option<Dir2>,
    /// Checks to perform.
    pub options: MoveTestOptions,
}

impl RangeQuery {
    /// Box between `mins` and `maxs` with default options.
    #[must_use]
    pub const fn new(mins: Vec2Fixed, maxs: Vec2Fixed) -> Self {
        Self {
            mins,
            maxs,
            move_dir: None,
            options: MoveTestOptions {
                test_terrain: true,
                test_objects: true,
                center_only: false,
            },
        }
    }

    /// Box covering the single square under `pos`.
    #[must_use]
    pub const fn at(pos: Vec2Fixed) -> Self {
        Self::new(pos, pos)
    }

    /// Replace the options.
    #[must_use]
    pub const fn with_options(mut self, options: MoveTestOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the movement direction.
    #[must_use]
    pub const fn with_move_dir(mut self, move_dir: Option<Dir2>) -> Self {
        self.move_dir = move_dir;
        self
    }
}

/// Outcome of a line or range query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveTest {
    /// Whether the movement is possible.
    pub passable: bool,
    /// Lowest terrain speed modifier seen; `None` if no on-map square was
    /// sampled (terrain checks off, or every square off the map).
    pub min_speed_mod: Option<f32>,
    /// Blocking bits of the last footprint checked; `None` if the object
    /// checks did not run.
    pub block_bits: Option<BlockType>,
}

impl MoveTest {
    fn passable() -> Self {
        Self {
            passable: true,
            ..Self::default()
        }
    }
}

fn footprint_rect(def: &MoveDef, rect: CellRect, center_only: bool) -> CellRect {
    if center_only {
        return rect;
    }
    CellRect {
        xmin: rect.xmin - def.xsizeh,
        xmax: rect.xmax + def.xsizeh,
        zmin: rect.zmin - def.zsizeh,
        zmax: rect.zmax + def.zsizeh,
    }
}

fn check_options(options: MoveTestOptions) {
    #[cfg(feature = "debug-validation")]
    assert!(
        options.test_terrain || options.test_objects,
        "movement query with neither terrain nor object checks"
    );
    debug_assert!(
        options.test_terrain || options.test_objects,
        "movement query with neither terrain nor object checks"
    );
}

/// Test a straight-line movement from `query.start` to `query.end`.
///
/// The terrain pass samples every square on the line and fails on the first
/// square at or below the configured speed threshold. Squares off the map
/// are skipped. If terrain passes, the object pass checks the unit's
/// footprint at every square of the line against the blocking grid and
/// fails on the first structure. For units that can submerge, the footprint
/// is checked at the elevation the unit would have on each square.
///
/// `block_bits` holds the bits of the last footprint checked, not the union
/// over the line.
///
/// Calling with both checks disabled is a contract violation; in release
/// builds it reports the line as passable with empty payloads.
pub fn raw_search<T: TerrainSource + ?Sized>(
    ctx: &MoveContext<'_, T>,
    def: &MoveDef,
    collider: &Collider,
    query: &LineQuery,
    scratch: &mut QueryScratch,
) -> MoveTest {
    let options = query.options;
    check_options(options);

    let (start, end) = line_cells(query.start, query.end);
    let mut result = MoveTest::passable();

    if options.test_terrain {
        let threshold = ctx.config.raw_move_speed_threshold;
        let mut min_speed: Option<f32> = None;

        result.passable = walk_line(start, end, |cell| {
            if !ctx.terrain.contains(cell.x, cell.z) {
                return true;
            }
            let speed = pos_speed_mod(
                def,
                ctx.terrain,
                ctx.config,
                cell.x,
                cell.z,
                Some(query.move_dir),
            );
            min_speed = Some(min_speed.map_or(speed, |m| m.min(speed)));
            speed > threshold
        });
        result.min_speed_mod = min_speed;
    }

    if options.test_objects && result.passable {
        let mut session = BlockingSession::new(scratch);
        let mut tracker = SubmersibleTracker::new(def, collider);
        let mut block_bits = BlockType::NONE;

        result.passable = walk_line(start, end, |cell| {
            let rect = footprint_rect(def, CellRect::around(cell, 0, 0), options.center_only);
            tracker.advance(ctx.terrain, cell, &mut session);

            block_bits =
                ctx.blocking
                    .range_blocked_in_session(def, rect, Some(tracker.collider()), &mut session);
            !block_bits.is_structure()
        });
        result.block_bits = Some(block_bits);
    }

    if !result.passable {
        tracing::trace!(
            move_def = %def.name,
            ?start,
            ?end,
            block_bits = ?result.block_bits,
            "Raw search blocked"
        );
    }
    result
}

/// Test every square of a box, grown by the footprint unless `center_only`.
///
/// Terrain is scanned row by row and fails on the first square with zero
/// speed; off-map squares are skipped. If terrain passes, the whole box is
/// checked against the blocking grid in one go with no epoch, so no state
/// carries over between calls.
#[must_use]
pub fn test_move_square_range<T: TerrainSource + ?Sized>(
    ctx: &MoveContext<'_, T>,
    def: &MoveDef,
    collider: &Collider,
    query: &RangeQuery,
) -> MoveTest {
    let options = query.options;
    check_options(options);

    let cells = CellRect {
        xmin: query.mins.cell().x,
        xmax: query.maxs.cell().x,
        zmin: query.mins.cell().z,
        zmax: query.maxs.cell().z,
    };
    let rect = footprint_rect(def, cells, options.center_only);
    let mut result = MoveTest::passable();

    if options.test_terrain {
        let mut min_speed: Option<f32> = None;

        for cell in rect.cells() {
            if !ctx.terrain.contains(cell.x, cell.z) {
                continue;
            }
            let speed = pos_speed_mod(def, ctx.terrain, ctx.config, cell.x, cell.z, query.move_dir);
            min_speed = Some(min_speed.map_or(speed, |m| m.min(speed)));

            if speed <= 0.0 {
                result.passable = false;
                break;
            }
        }
        result.min_speed_mod = min_speed;
    }

    if options.test_objects && result.passable {
        let bits = ctx.blocking.range_blocked(def, rect, Some(collider));
        result.block_bits = Some(bits);
        result.passable = !bits.is_structure();
    }
    result
}

/// Check the unit's footprint at `pos` for blocking structures.
///
/// Objects already marked under `epoch` in `scratch` are skipped, so a
/// batch of candidate positions can share one epoch from
/// [`QueryScratch::next_epoch`] and count each object once.
#[must_use]
pub fn test_move_position_for_objects<T: TerrainSource + ?Sized>(
    ctx: &MoveContext<'_, T>,
    def: &MoveDef,
    collider: &Collider,
    pos: Vec2Fixed,
    scratch: &mut QueryScratch,
    epoch: Epoch,
) -> bool {
    let rect = CellRect::around(pos.cell(), def.xsizeh, def.zsizeh);
    let bits = ctx
        .blocking
        .range_blocked_with_epoch(def, rect, Some(collider), scratch, epoch);
    !bits.is_structure()
}
