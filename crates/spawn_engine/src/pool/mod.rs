//! Object pooling engine
//!
//! Recycles instances keyed by a logical spawn type so repeated
//! spawn/despawn cycles avoid allocation and destruction cost.

mod pool_manager;

pub use pool_manager::{PoolManager, PoolStats};
