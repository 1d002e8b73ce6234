//! Order book reconstruction module.
//!
//! The [`OrderRegistry`] owns every resting order; the two [`PriceLadder`]s
//! hold ids in FIFO order per price. [`BookReconstructor`] applies events to
//! both and [`build_snapshot`] aggregates them to a fixed depth.

pub mod ladder;
pub mod reconstructor;
pub mod registry;
pub mod snapshot;

pub use ladder::{LevelQueue, PriceLadder};
pub use reconstructor::{BookConfig, BookReconstructor, BookStats};
pub use registry::{OrderRegistry, RestingOrder};
pub use snapshot::{build_snapshot, fill_snapshot};
