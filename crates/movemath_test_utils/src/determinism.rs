//! Determinism testing utilities.
//!
//! Provides a harness for verifying that movement queries produce
//! identical results no matter which thread runs them or how often.
//!
//! # Testing Strategy
//!
//! Path planners call the queries from many worker threads at once, and
//! lockstep sessions require every client to reach the same verdicts.
//! Sources of divergence include:
//!
//! - **Shared scratch state**: Each thread must bring its own
//!   [`QueryScratch`]. Stale epoch marks would make a query skip objects.
//!
//! - **Cell mapping**: Positions map to squares through fixed-point
//!   division ([`movemath_core::math::Fixed`]), never through floats.
//!
//! - **Order of evaluation**: Results must not depend on what the same
//!   scratch was used for before.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Each query against hand-built maps
//! 2. **Property tests**: Random lines and defs keep the invariants
//! 3. **Parallel tests**: The same batch on N threads gives N equal digests

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use movemath_core::blocking::QueryScratch;
use movemath_core::queries::MoveTest;

/// Result of running the same query batch several times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical digests.
    pub is_deterministic: bool,
    /// Digest from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>) -> Self {
        Self {
            is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
            hashes,
        }
    }

    /// Get all unique digests (should be 1 for deterministic queries).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that all runs agreed, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different digests.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Queries are non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Digest of a batch of query results.
///
/// Floats contribute their bit patterns, so `-0.0` and `0.0` differ.
#[must_use]
pub fn digest_results(results: &[MoveTest]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for result in results {
        result.passable.hash(&mut hasher);
        result.min_speed_mod.map(f32::to_bits).hash(&mut hasher);
        result.block_bits.map(|b| b.bits()).hash(&mut hasher);
    }
    hasher.finish()
}

/// Run a query batch `runs` times on one thread, reusing one scratch.
///
/// Reusing the scratch checks that epochs left behind by earlier runs do
/// not leak into later ones.
///
/// # Example
///
/// ```ignore
/// use movemath_test_utils::determinism::{digest_results, verify_determinism};
///
/// let result = verify_determinism(5, |scratch| {
///     let tests: Vec<_> = lines.iter()
///         .map(|q| raw_search(&ctx, &def, &collider, q, scratch))
///         .collect();
///     digest_results(&tests)
/// });
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<F>(runs: usize, batch: F) -> DeterminismResult
where
    F: Fn(&mut QueryScratch) -> u64,
{
    let mut scratch = QueryScratch::new();
    let hashes = (0..runs).map(|_| batch(&mut scratch)).collect();
    DeterminismResult::from_hashes(hashes)
}

/// Run a query batch on `num_threads` scoped threads at once.
///
/// Every thread owns its scratch and runs the batch `rounds` times; the
/// digest of the last round is reported. The batch borrows the shared
/// world, which is what the queries must tolerate in production.
pub fn run_parallel_queries<F>(num_threads: usize, rounds: usize, batch: F) -> DeterminismResult
where
    F: Fn(&mut QueryScratch) -> u64 + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                s.spawn(|| {
                    let mut scratch = QueryScratch::new();
                    let mut digest = 0;
                    for _ in 0..rounds.max(1) {
                        digest = batch(&mut scratch);
                    }
                    digest
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("query thread panicked"))
            .collect()
    });

    DeterminismResult::from_hashes(hashes)
}

/// Proptest strategies for movement queries.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing.
pub mod strategies {
    use movemath_core::data::{DepthModData, MoveDefData};
    use movemath_core::math::Cell;
    use movemath_core::move_def::SpeedModClass;
    use proptest::prelude::*;

    /// Generate a cell inside a `w` x `h` map.
    pub fn arb_cell(w: i32, h: i32) -> impl Strategy<Value = Cell> {
        (0..w, 0..h).prop_map(|(x, z)| Cell::new(x, z))
    }

    /// Generate a cell up to `margin` squares outside a `w` x `h` map.
    pub fn arb_cell_with_margin(w: i32, h: i32, margin: i32) -> impl Strategy<Value = Cell> {
        (-margin..w + margin, -margin..h + margin).prop_map(|(x, z)| Cell::new(x, z))
    }

    /// Generate a speed class.
    pub fn arb_speed_class() -> impl Strategy<Value = SpeedModClass> {
        prop_oneof![
            Just(SpeedModClass::Tank),
            Just(SpeedModClass::KBot),
            Just(SpeedModClass::Hover),
            Just(SpeedModClass::Ship),
        ]
    }

    /// Generate a depth-mod curve with non-negative coefficients.
    pub fn arb_depth_mod_data() -> impl Strategy<Value = DepthModData> {
        (
            0.0f32..50.0,
            0.0f32..500.0,
            0.01f32..10.0,
            0.0f32..0.1,
            0.0f32..1.0,
            0.0f32..2.0,
        )
            .prop_map(|(min, extra, max_scale, a, b, c)| DepthModData {
                min_height: Some(min),
                max_height: Some(min + extra),
                max_scale: Some(max_scale),
                quadratic_coeff: Some(a),
                linear_coeff: Some(b),
                constant_coeff: Some(c),
            })
    }

    /// Generate raw move-def data of any class.
    pub fn arb_move_def_data() -> impl Strategy<Value = MoveDefData> {
        (
            arb_speed_class(),
            1i32..8,
            proptest::option::of(1i32..8),
            -50.0f32..50.0,
            proptest::option::of(0.0f32..90.0),
            arb_depth_mod_data(),
            any::<bool>(),
        )
            .prop_map(
                |(class, footprint_x, footprint_z, water_depth, max_slope, depth_mod, sub)| {
                    let mut data = MoveDefData::named("generated");
                    data.speed_mod_class = Some(class);
                    data.footprint_x = footprint_x;
                    data.footprint_z = footprint_z;
                    data.min_water_depth = water_depth;
                    data.max_water_depth = water_depth.abs() * 2.0;
                    data.max_slope = max_slope;
                    data.depth_mod_params = depth_mod;
                    data.sub_marine = sub;
                    data
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    use movemath_core::blocking::BlockType;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, |scratch| {
            scratch.next_epoch();
            7
        });
        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![7, 7, 7]);
    }

    #[test]
    fn test_verify_determinism_detects_divergence() {
        let result = verify_determinism(3, |scratch| scratch.next_epoch().get());
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes(), vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics() {
        verify_determinism(2, |scratch| scratch.next_epoch().get()).assert_deterministic();
    }

    #[test]
    fn test_parallel_threads_have_own_scratch() {
        // a fresh scratch per thread always issues epoch 1 first
        let result = run_parallel_queries(4, 1, |scratch| scratch.next_epoch().get());
        result.assert_deterministic();
        assert_eq!(result.hashes, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_parallel_runs_every_thread() {
        let calls = AtomicU64::new(0);
        let result = run_parallel_queries(3, 2, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
            0
        });
        assert_eq!(result.hashes.len(), 3);
        assert_eq!(calls.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_digest_results() {
        let a = MoveTest {
            passable: true,
            min_speed_mod: Some(0.5),
            block_bits: Some(BlockType::MOBILE),
        };
        let b = MoveTest {
            block_bits: Some(BlockType::MOVING),
            ..a
        };
        assert_eq!(digest_results(&[a, b]), digest_results(&[a, b]));
        assert_ne!(digest_results(&[a, b]), digest_results(&[b, a]));
        assert_ne!(digest_results(&[a]), digest_results(&[b]));
    }
}
