//! Unopinionated standalone utilities.

mod geom;
pub use geom::chebyshev_len;

mod grid;
pub use grid::Grid;

mod rng;
pub use rng::{srng, GameRng};

pub type FastHasher = rustc_hash::FxHasher;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;
