//! Virtual collider state for units that dive and surface along a line.
//!
//! Whether two objects in water collide depends on their elevations, so a
//! unit that follows the sea floor can pass under a ship at one end of a
//! line but not at the other. The tracker moves a copy of the collider over
//! the terrain as the walk proceeds. The real collider is never touched.

use crate::blocking::{BlockingSession, Collider, PhysicalState};
use crate::math::Cell;
use crate::move_def::MoveDef;
use crate::terrain::TerrainSource;

/// Per-walk state of the virtual collider.
#[derive(Debug, Clone)]
pub struct SubmersibleTracker {
    collider: Collider,
    submersible: bool,
    last_y: f32,
    last_in_water: bool,
    last_under_water: bool,
}

impl SubmersibleTracker {
    /// Start tracking from the real collider's current elevation.
    #[must_use]
    pub fn new(def: &MoveDef, collider: &Collider) -> Self {
        let mut virtual_collider = *collider;
        let in_water = collider.y < 0.0;
        let under_water = collider.y + collider.height < 0.0;

        set_bit(&mut virtual_collider.state, PhysicalState::IN_WATER, in_water);

        Self {
            collider: virtual_collider,
            submersible: def.is_submersible(collider.height),
            last_y: collider.y,
            last_in_water: in_water,
            last_under_water: under_water,
        }
    }

    /// Whether this unit's elevation follows the terrain at all.
    #[must_use]
    pub const fn is_submersible(&self) -> bool {
        self.submersible
    }

    /// The virtual collider as it stands now.
    #[must_use]
    pub const fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Move the virtual collider onto `cell`.
    ///
    /// Crossing the surface completely (diving or surfacing) changes which
    /// objects block the unit, so the session is renewed and objects seen
    /// earlier are classified again. Off-map cells sample the nearest edge
    /// square.
    pub fn advance<T: TerrainSource + ?Sized>(
        &mut self,
        terrain: &T,
        cell: Cell,
        session: &mut BlockingSession<'_>,
    ) {
        if !self.submersible {
            return;
        }

        let x = cell.x.clamp(0, terrain.width() - 1);
        let z = cell.z.clamp(0, terrain.height() - 1);
        let y = terrain.max_height(x, z);
        if y == self.last_y {
            return;
        }

        self.collider.y = y;
        self.last_y = y;

        let under_water = y + self.collider.height < 0.0;
        let in_water = y < 0.0;

        if under_water != self.last_under_water {
            self.last_under_water = under_water;
            session.renew();
        }
        if in_water != self.last_in_water {
            set_bit(&mut self.collider.state, PhysicalState::IN_WATER, in_water);
            self.last_in_water = in_water;
        }
    }
}

fn set_bit(state: &mut PhysicalState, bit: PhysicalState, on: bool) {
    if on {
        state.insert(bit);
    } else {
        state.remove(bit);
    }
}
