//! # Spawn Engine
//!
//! Runtime object pooling and manager lifecycle for interactive
//! applications that repeatedly create and destroy short-lived
//! entities (projectiles, UI widgets, effects).
//!
//! ## Features
//!
//! - **Keyed Pooling**: per-key free queues with prewarm, spawn, and
//!   despawn semantics and a reverse index for O(1) despawn routing
//! - **Manager Lifecycle**: a uniform, idempotent
//!   initialize/shutdown contract across all subsystems
//! - **Resource Lookup**: ordered search-path resolution with a
//!   memoizing cache
//! - **Explicit Orchestration**: one owned context object instead of
//!   global singletons, so tests stay isolated
//!
//! ## Quick Start
//!
//! ```rust
//! use spawn_engine::prelude::*;
//!
//! let assets = MemoryAssets::new().with_template("Prefabs/Bullet", Prefab::new("Bullet"));
//! let mut game = Orchestrator::new(SceneHost::new(), assets);
//! game.initialize();
//!
//! game.register_prefab("Bullet", Prefab::new("Bullet"));
//! game.prewarm("Bullet", 3, None);
//!
//! let bullet = game
//!     .spawn("Bullet", Vec3::new(0.0, 1.0, 0.0), Quat::identity(), None, false, true)
//!     .expect("registered key");
//! game.despawn(bullet);
//!
//! game.shutdown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod host;
pub mod manager;
pub mod objects;
pub mod pool;
pub mod resources;

mod orchestrator;

pub use orchestrator::Orchestrator;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{EngineConfig, PoolConfig, ResourceConfig},
        foundation::math::{Quat, Transform, Vec3},
        host::{AssetDirectory, InstanceHost, MemoryAssets, NodeKey, Prefab, PrefabTemplate, SceneHost},
        manager::Manager,
        objects::ObjectManager,
        pool::{PoolManager, PoolStats},
        resources::ResourceManager,
        Orchestrator,
    };
}
