//! Property tests for move defs, cost curves and the line walker.

use std::collections::BTreeSet;

use movemath_core::prelude::*;
use movemath_core::line_walk::walk_line;
use movemath_test_utils::determinism::strategies::{
    arb_cell, arb_cell_with_margin, arb_depth_mod_data, arb_move_def_data,
};
use movemath_test_utils::fixtures::{def_from, square_center, TestWorld};
use proptest::prelude::*;

fn visited(start: Cell, end: Cell) -> BTreeSet<Cell> {
    let mut cells = BTreeSet::new();
    walk_line(start, end, |c| {
        cells.insert(c);
        true
    });
    cells
}

proptest! {
    /// Footprints are odd and point-symmetric for any configured size.
    #[test]
    fn prop_footprint_always_odd(data in arb_move_def_data()) {
        let def = def_from(&data);
        prop_assert_eq!(def.xsize % 2, 1);
        prop_assert_eq!(def.zsize % 2, 1);
        prop_assert_eq!(def.xsizeh * 2 + 1, def.xsize);
        prop_assert_eq!(def.zsizeh * 2 + 1, def.zsize);
        prop_assert!(def.xsize >= 1 && def.zsize >= 1);
    }

    /// Depth-mod curve hits its bounds exactly and never rises with depth.
    #[test]
    fn prop_depth_mod_bounds_and_monotonic(
        curve in arb_depth_mod_data(),
        h1 in -600.0f32..0.0,
        h2 in -600.0f32..0.0,
    ) {
        let mut data = MoveDefData::named("tank");
        data.depth_mod_params = curve;
        let def = def_from(&data);
        let p = def.depth_mod_params;
        prop_assume!(p.max_height > p.min_height);

        prop_assert_eq!(def.depth_mod(-p.min_height), 1.0);
        prop_assert_eq!(def.depth_mod(-p.max_height), 0.0);

        let (shallow, deep) = if h1 >= h2 { (h1, h2) } else { (h2, h1) };
        if shallow < -p.min_height {
            prop_assert!(def.depth_mod(shallow) >= def.depth_mod(deep));
        }
    }

    /// Walking a line backwards visits the same set of cells.
    #[test]
    fn prop_walk_is_symmetric(
        a in arb_cell_with_margin(64, 64, 8),
        b in arb_cell_with_margin(64, 64, 8),
    ) {
        prop_assert_eq!(visited(a, b), visited(b, a));
    }

    /// Both endpoints are always visited, and every visited cell lies in
    /// the bounding box of the line.
    #[test]
    fn prop_walk_stays_in_bounds(a in arb_cell(64, 64), b in arb_cell(64, 64)) {
        let cells = visited(a, b);
        prop_assert!(cells.contains(&a));
        prop_assert!(cells.contains(&b));
        for c in cells {
            prop_assert!(c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x));
            prop_assert!(c.z >= a.z.min(b.z) && c.z <= a.z.max(b.z));
        }
    }

    /// Checksums are reproducible and do not depend on the assigned id.
    #[test]
    fn prop_checksum_deterministic(data in arb_move_def_data()) {
        let a = MoveDef::from_data(&data, MoveDefId::new(0));
        let b = MoveDef::from_data(&data, MoveDefId::new(7));
        prop_assert_eq!(a.checksum(), a.checksum());
        prop_assert_eq!(a.checksum(), b.checksum());
    }

    /// A line that starts and ends on the same square agrees with a
    /// one-square range query on terrain.
    #[test]
    fn prop_single_square_line_matches_range(
        data in arb_move_def_data(),
        height in -100.0f32..100.0,
        slope in 0.0f32..1.0,
        cell in arb_cell(8, 8),
    ) {
        let def = def_from(&data);
        let mut world = TestWorld::flat(8, 8);
        world.terrain.set_height(cell.x, cell.z, height);
        world.terrain.set_slope(cell.x, cell.z, slope, -0.6, -0.8);

        let p = square_center(cell.x, cell.z);
        let dir = Dir2 { x: 0.6, z: 0.8 };
        let line = LineQuery::new(p, p)
            .with_move_dir(dir)
            .with_options(MoveTestOptions::terrain_only());
        let range = RangeQuery::at(p)
            .with_move_dir(Some(dir))
            .with_options(MoveTestOptions::terrain_only().center_only());

        let collider = Collider::new(None, height, 20.0);
        let mut scratch = QueryScratch::new();
        let a = raw_search(&world.ctx(), &def, &collider, &line, &mut scratch);
        let b = test_move_square_range(&world.ctx(), &def, &collider, &range);

        prop_assert_eq!(a.passable, b.passable);
        prop_assert_eq!(a.min_speed_mod, b.min_speed_mod);
    }
}
