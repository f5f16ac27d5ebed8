//! Blocking-object grid and footprint range checks.
//!
//! The grid records which objects occupy each square. Range checks walk the
//! squares of a footprint-expanded rectangle and classify each object found
//! into a [`BlockType`] bitmask.
//!
//! # Epochs
//!
//! A line walk checks heavily overlapping rectangles, so most objects would
//! be classified many times. Each worker thread owns a [`QueryScratch`]
//! holding one visited mark per object. A range check in an epoch skips
//! every object already marked with that epoch and marks the ones it
//! classifies. Starting a new epoch invalidates all marks at once without
//! clearing anything.
//!
//! # Concurrency
//!
//! Queries take `&BlockingGrid` and `&mut QueryScratch`, so any number of
//! threads can query one grid as long as each brings its own scratch.
//! Mutating the grid needs `&mut`, which keeps updates between simulation
//! steps.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::math::CellRect;
use crate::move_def::MoveDef;

/// Bitmask describing why a range is (partially) obstructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockType(u8);

impl BlockType {
    /// Nothing in the way.
    pub const NONE: Self = Self(0);
    /// A mobile unit that is currently moving.
    pub const MOVING: Self = Self(1 << 0);
    /// An idle mobile unit.
    pub const MOBILE: Self = Self(1 << 1);
    /// A mobile unit busy with a task.
    pub const MOBILE_BUSY: Self = Self(1 << 2);
    /// An obstacle the unit cannot pass or push.
    pub const STRUCTURE: Self = Self(1 << 3);
    /// Impassable terrain (reserved for callers that fold terrain in).
    pub const TERRAIN: Self = Self(1 << 4);
    /// Structure or terrain.
    pub const IMPASSABLE: Self = Self(Self::STRUCTURE.0 | Self::TERRAIN.0);

    /// Check if any flags in `other` are set in `self`.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Check if all flags in `other` are set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True when the structure bit is set.
    #[inline]
    #[must_use]
    pub const fn is_structure(self) -> bool {
        self.intersects(Self::STRUCTURE)
    }

    /// Combine two masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for BlockType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for BlockType {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Physical-state bits of a collider relevant to blocking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PhysicalState(u8);

impl PhysicalState {
    /// Touching or below the water surface.
    pub const IN_WATER: Self = Self(1 << 0);

    /// Empty state.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if all flags in `other` are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Set the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// State implied by a base elevation relative to the water surface.
    #[must_use]
    pub fn from_elevation(y: f32) -> Self {
        let mut state = Self::empty();
        if y < 0.0 {
            state.insert(Self::IN_WATER);
        }
        state
    }
}

/// Handle of an object in a [`BlockingGrid`]; dense, starting at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Create an id from a raw index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a mobile object is doing; immobile objects ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Motion {
    /// Standing still with nothing to do.
    #[default]
    Idle,
    /// Executing a task in place.
    Busy,
    /// Moving.
    Moving,
}

/// One object registered on the blocking grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingObject {
    /// Base elevation.
    pub y: f32,
    /// Vertical extent above `y`.
    pub height: f32,
    /// Buildings, features and other static obstacles.
    pub immobile: bool,
    /// Mobile unit that refuses to be pushed aside.
    pub push_resistant: bool,
    /// Can be crushed by a strong enough unit.
    pub crushable: bool,
    /// Crush strength needed to flatten this object.
    pub crush_resistance: f32,
    /// Participates in solid-object collisions.
    pub solid: bool,
    /// Currently marked on the blocking map.
    pub blocking: bool,
    /// Activity of mobile objects.
    pub motion: Motion,
}

impl BlockingObject {
    /// Solid, uncrushable structure standing on the ground.
    #[must_use]
    pub fn structure(y: f32, height: f32) -> Self {
        Self {
            y,
            height,
            immobile: true,
            push_resistant: false,
            crushable: false,
            crush_resistance: 0.0,
            solid: true,
            blocking: true,
            motion: Motion::Idle,
        }
    }

    /// Solid mobile unit with the given activity.
    #[must_use]
    pub fn unit(y: f32, height: f32, motion: Motion) -> Self {
        Self {
            immobile: false,
            motion,
            ..Self::structure(y, height)
        }
    }

    fn in_water(&self) -> bool {
        self.y < 0.0
    }
}

/// The object doing the moving, as seen by blocking checks.
///
/// Also used as the "virtual collider" of a line walk: a disposable copy
/// whose elevation and water state follow the terrain being crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Grid entry of the collider itself, skipped during checks.
    pub id: Option<ObjectId>,
    /// Base elevation.
    pub y: f32,
    /// Vertical extent above `y`.
    pub height: f32,
    /// Physical-state bits.
    pub state: PhysicalState,
}

impl Collider {
    /// Collider at elevation `y` with water state derived from it.
    #[must_use]
    pub fn new(id: Option<ObjectId>, y: f32, height: f32) -> Self {
        Self {
            id,
            y,
            height,
            state: PhysicalState::from_elevation(y),
        }
    }

    /// True if the in-water bit is set.
    #[must_use]
    pub fn in_water(&self) -> bool {
        self.state.contains(PhysicalState::IN_WATER)
    }
}

/// Per-thread query generation.
///
/// Only [`QueryScratch::next_epoch`] issues epochs and they start at 1, so
/// an object that was never marked can not look seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(NonZeroU64);

impl Epoch {
    /// Raw generation number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Per-thread scratch state: an epoch counter and one visited mark per object.
///
/// Never share a scratch between concurrently running queries.
#[derive(Debug, Default, Clone)]
pub struct QueryScratch {
    epoch: Option<Epoch>,
    // 0 = never marked
    marks: Vec<u64>,
}

impl QueryScratch {
    /// Create an empty scratch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new epoch. Marks from earlier epochs become stale.
    pub fn next_epoch(&mut self) -> Epoch {
        let next = self
            .epoch
            .map_or(NonZeroU64::MIN, |e| e.0.saturating_add(1));
        let epoch = Epoch(next);
        self.epoch = Some(epoch);
        epoch
    }

    /// Most recently issued epoch; `None` before the first call.
    #[must_use]
    pub const fn current_epoch(&self) -> Option<Epoch> {
        self.epoch
    }

    /// Mark `id` for `epoch`; returns `false` if it was already marked.
    fn mark(&mut self, id: ObjectId, epoch: Epoch) -> bool {
        let i = id.index();
        if i >= self.marks.len() {
            self.marks.resize(i + 1, 0);
        }
        if self.marks[i] == epoch.get() {
            return false;
        }
        self.marks[i] = epoch.get();
        true
    }
}

/// One epoch of range checks that share visited marks.
///
/// Renew the session whenever the collider changes in a way that alters
/// which objects block it; objects skipped under the old epoch are then
/// classified again.
#[derive(Debug)]
pub struct BlockingSession<'s> {
    scratch: &'s mut QueryScratch,
    epoch: Epoch,
}

impl<'s> BlockingSession<'s> {
    /// Open a session on a fresh epoch of `scratch`.
    pub fn new(scratch: &'s mut QueryScratch) -> Self {
        let epoch = scratch.next_epoch();
        Self { scratch, epoch }
    }

    /// Switch to a fresh epoch.
    pub fn renew(&mut self) {
        self.epoch = self.scratch.next_epoch();
        tracing::trace!(epoch = self.epoch.get(), "blocking session renewed");
    }

    /// Epoch currently in use.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }
}

/// Grid of blocking objects.
#[derive(Debug, Clone)]
pub struct BlockingGrid {
    width: i32,
    height: i32,
    cells: Vec<Vec<ObjectId>>,
    objects: Vec<BlockingObject>,
}

impl BlockingGrid {
    /// Empty grid of `width` x `height` squares.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0, "BlockingGrid width must be positive");
        assert!(height > 0, "BlockingGrid height must be positive");

        Self {
            width,
            height,
            cells: vec![Vec::new(); (width as usize) * (height as usize)],
            objects: Vec::new(),
        }
    }

    /// Grid width in squares.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in squares.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of registered objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&BlockingObject> {
        self.objects.get(id.index())
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> usize {
        (z as usize) * (self.width as usize) + (x as usize)
    }

    /// Objects occupying square `(x, z)`; empty when off the grid.
    #[must_use]
    pub fn objects_at(&self, x: i32, z: i32) -> &[ObjectId] {
        if x < 0 || z < 0 || x >= self.width || z >= self.height {
            return &[];
        }
        &self.cells[self.index(x, z)]
    }

    /// Register an object covering `rect` (clamped to the grid).
    pub fn add_object(&mut self, object: BlockingObject, rect: CellRect) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);

        for cell in rect.clamped(self.width, self.height).cells() {
            let i = self.index(cell.x, cell.z);
            self.cells[i].push(id);
        }
        id
    }

    /// Remove an object from every square it occupies.
    ///
    /// The id stays allocated so other handles remain valid; the object is
    /// marked non-blocking.
    pub fn remove_object(&mut self, id: ObjectId) {
        for cell in &mut self.cells {
            cell.retain(|&o| o != id);
        }
        if let Some(object) = self.objects.get_mut(id.index()) {
            object.blocking = false;
        }
    }

    /// Classify every object in `rect` (variant without epoch).
    ///
    /// Objects spanning several squares may be classified more than once,
    /// which is harmless for the combined mask.
    #[must_use]
    pub fn range_blocked(
        &self,
        def: &MoveDef,
        rect: CellRect,
        collider: Option<&Collider>,
    ) -> BlockType {
        let mut ret = BlockType::NONE;

        for cell in rect.clamped(self.width, self.height).cells() {
            for &id in &self.cells[self.index(cell.x, cell.z)] {
                ret |= self.object_block_type(def, id, collider);
                if ret.is_structure() {
                    return ret;
                }
            }
        }
        ret
    }

    /// Classify objects in `rect` not yet seen in `epoch`, marking them.
    ///
    /// The caller chooses the epoch, typically one [`QueryScratch::next_epoch`]
    /// shared by a batch of related position checks.
    #[must_use]
    pub fn range_blocked_with_epoch(
        &self,
        def: &MoveDef,
        rect: CellRect,
        collider: Option<&Collider>,
        scratch: &mut QueryScratch,
        epoch: Epoch,
    ) -> BlockType {
        let mut ret = BlockType::NONE;

        for cell in rect.clamped(self.width, self.height).cells() {
            for &id in &self.cells[self.index(cell.x, cell.z)] {
                if !scratch.mark(id, epoch) {
                    continue;
                }
                ret |= self.object_block_type(def, id, collider);
                if ret.is_structure() {
                    return ret;
                }
            }
        }
        ret
    }

    /// Like [`Self::range_blocked_with_epoch`], using the session's epoch.
    #[must_use]
    pub fn range_blocked_in_session(
        &self,
        def: &MoveDef,
        rect: CellRect,
        collider: Option<&Collider>,
        session: &mut BlockingSession<'_>,
    ) -> BlockType {
        let epoch = session.epoch;
        self.range_blocked_with_epoch(def, rect, collider, session.scratch, epoch)
    }

    fn object_block_type(
        &self,
        def: &MoveDef,
        id: ObjectId,
        collider: Option<&Collider>,
    ) -> BlockType {
        let object = &self.objects[id.index()];

        if collider.is_some_and(|c| c.id == Some(id)) {
            return BlockType::NONE;
        }
        if is_non_blocking(object, collider) {
            return BlockType::NONE;
        }

        if object.immobile {
            return if crush_resistant(def, object) {
                BlockType::STRUCTURE
            } else {
                BlockType::NONE
            };
        }

        if object.push_resistant {
            return BlockType::STRUCTURE;
        }

        match object.motion {
            Motion::Moving => BlockType::MOVING,
            Motion::Busy => BlockType::MOBILE_BUSY,
            Motion::Idle => BlockType::MOBILE,
        }
    }
}

/// True if `object` cannot obstruct `collider` at all.
fn is_non_blocking(object: &BlockingObject, collider: Option<&Collider>) -> bool {
    if !object.solid || !object.blocking {
        return true;
    }
    let Some(collider) = collider else {
        return false;
    };

    // on dry land everything stacks into the same layer
    if !collider.in_water() && !object.in_water() {
        return false;
    }

    collider.y + collider.height < object.y || object.y + object.height < collider.y
}

fn crush_resistant(def: &MoveDef, object: &BlockingObject) -> bool {
    if !object.solid {
        return false;
    }
    if !object.crushable {
        return true;
    }
    object.crush_resistance > def.crush_strength
}
