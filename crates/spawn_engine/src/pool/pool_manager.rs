//! Pool Manager
//!
//! Owns one free queue of inert instances per key, the key's template
//! binding, and a reverse index from instance back to key. Spawning
//! dequeues a free instance when one exists and falls back to fresh
//! instantiation; despawning returns the instance to its originating
//! queue. Instances created outside the pool are destroyed outright on
//! despawn rather than recycled.
//!
//! # Invariants
//!
//! - Every instance in a key's queue was created from that key's
//!   template.
//! - An instance is never present in two queues, and never present in
//!   any queue while it is active.
//! - Reparenting and activation always go through the [`InstanceHost`]
//!   so the pool never touches scene state directly.

use crate::foundation::math::{Quat, Vec3};
use crate::host::InstanceHost;
use crate::manager::{LifecycleState, Manager};
use std::collections::{HashMap, VecDeque};

/// Counters for monitoring pool behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances created by the pool since startup
    pub total_created: u64,
    /// Spawn calls that returned an instance
    pub total_spawned: u64,
    /// Despawn calls that re-pooled an instance
    pub total_despawned: u64,
    /// Instances destroyed by the pool (shutdown, unregister, orphans)
    pub total_destroyed: u64,
}

/// Keyed object pool over an [`InstanceHost`]
///
/// Pools are partitioned by string key rather than template identity,
/// so a key can be re-bound to a fresh template (e.g. hot reload)
/// while outstanding instances stay correctly tracked through the
/// reverse index.
pub struct PoolManager<H: InstanceHost> {
    lifecycle: LifecycleState,

    /// Free queue per key; instances here are inert and detached
    free: HashMap<String, VecDeque<H::Instance>>,

    /// Template binding per key; first registration wins
    templates: HashMap<String, H::Template>,

    /// Reverse index locating the origin pool of any tracked instance
    instance_keys: HashMap<H::Instance, String>,

    stats: PoolStats,
}

impl<H: InstanceHost> Default for PoolManager<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: InstanceHost> PoolManager<H> {
    /// Create an empty pool manager
    pub fn new() -> Self {
        Self {
            lifecycle: LifecycleState::new(),
            free: HashMap::new(),
            templates: HashMap::new(),
            instance_keys: HashMap::new(),
            stats: PoolStats::default(),
        }
    }

    /// Register a key with its template.
    ///
    /// Idempotent. If the key already has a template the existing
    /// binding is kept; re-registering with a different template does
    /// not overwrite it. An empty key is ignored.
    pub fn register(&mut self, key: &str, template: H::Template) {
        if key.is_empty() {
            return;
        }
        if !self.templates.contains_key(key) {
            self.templates.insert(key.to_owned(), template);
            log::info!("pool: registered key '{key}'");
        }
        self.free.entry(key.to_owned()).or_default();
    }

    /// Remove a key, destroying every instance queued under it.
    ///
    /// Instances currently active for the key are orphaned: they keep
    /// their reverse-index entry, and the next [`PoolManager::despawn`]
    /// destroys them instead of re-pooling, since the queue they came
    /// from no longer exists.
    pub fn unregister(&mut self, key: &str, host: &mut H) {
        if key.is_empty() {
            return;
        }
        self.templates.remove(key);
        if let Some(queue) = self.free.remove(key) {
            let drained = queue.len();
            for instance in queue {
                self.instance_keys.remove(&instance);
                host.destroy(instance);
                self.stats.total_destroyed += 1;
            }
            log::info!("pool: unregistered key '{key}', destroyed {drained} pooled instances");
        }
    }

    /// Whether a key currently has a template binding
    pub fn is_registered(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Pre-create `count` inert instances for a key.
    ///
    /// No-op when the key is unregistered or `count` is zero. The new
    /// instances are deactivated, parented under `container` when one
    /// is given, and enqueued for later spawns.
    pub fn prewarm(&mut self, key: &str, count: usize, container: Option<H::Container>, host: &mut H) {
        if count == 0 {
            return;
        }
        let Some(template) = self.templates.get(key).cloned() else {
            return;
        };
        for _ in 0..count {
            let instance = host.instantiate(&template);
            host.set_active(instance, false);
            host.set_parent(instance, container, false);
            self.instance_keys.insert(instance, key.to_owned());
            self.free.entry(key.to_owned()).or_default().push_back(instance);
            self.stats.total_created += 1;
        }
        log::debug!("pool: prewarmed '{key}' with {count} instances");
    }

    /// Take an instance for a key, reusing a pooled one when available.
    ///
    /// Returns `None` when the key is unregistered. The instance is
    /// reparented under `container`, moved to `position`/`rotation`,
    /// activated, and removed from the free queue before being
    /// returned.
    pub fn spawn(
        &mut self,
        key: &str,
        position: Vec3,
        rotation: Quat,
        container: Option<H::Container>,
        host: &mut H,
    ) -> Option<H::Instance> {
        let template = self.templates.get(key)?.clone();

        // Skip over queue entries the host has since invalidated.
        let mut reused = None;
        let mut dead = Vec::new();
        if let Some(queue) = self.free.get_mut(key) {
            while let Some(candidate) = queue.pop_front() {
                if host.is_alive(candidate) {
                    reused = Some(candidate);
                    break;
                }
                dead.push(candidate);
            }
        }
        for instance in dead {
            self.instance_keys.remove(&instance);
        }

        let instance = match reused {
            Some(instance) => instance,
            None => {
                let instance = host.instantiate(&template);
                self.instance_keys.insert(instance, key.to_owned());
                self.stats.total_created += 1;
                instance
            }
        };

        host.set_parent(instance, container, false);
        host.set_position_and_rotation(instance, position, rotation);
        host.set_active(instance, true);
        self.stats.total_spawned += 1;
        log::debug!("pool: spawned '{key}' -> {instance:?}");
        Some(instance)
    }

    /// Return an instance to its pool, or destroy it.
    ///
    /// Untracked instances (never produced by this pool) are destroyed
    /// outright. Tracked instances are deactivated, detached, and
    /// enqueued into their origin key's queue; if that key has been
    /// unregistered in the meantime the instance is destroyed instead.
    pub fn despawn(&mut self, instance: H::Instance, host: &mut H) {
        let Some(key) = self.instance_keys.get(&instance).cloned() else {
            host.destroy(instance);
            self.stats.total_destroyed += 1;
            log::debug!("pool: destroyed unmanaged instance {instance:?}");
            return;
        };

        if !self.templates.contains_key(&key) {
            // Orphaned by a prior unregister; its queue is gone.
            self.instance_keys.remove(&instance);
            host.destroy(instance);
            self.stats.total_destroyed += 1;
            log::debug!("pool: destroyed orphan of unregistered key '{key}'");
            return;
        }

        host.set_active(instance, false);
        host.set_parent(instance, None, false);
        self.free.entry(key).or_default().push_back(instance);
        self.stats.total_despawned += 1;
        log::debug!("pool: despawned {instance:?}");
    }

    /// Number of free instances queued for a key
    pub fn free_count(&self, key: &str) -> usize {
        self.free.get(key).map_or(0, VecDeque::len)
    }

    /// Whether the pool tracks this instance
    pub fn is_tracked(&self, instance: H::Instance) -> bool {
        self.instance_keys.contains_key(&instance)
    }

    /// Key an instance belongs to, if tracked
    pub fn key_of(&self, instance: H::Instance) -> Option<&str> {
        self.instance_keys.get(&instance).map(String::as_str)
    }

    /// Pool counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Destroy every queued instance and clear all state.
    ///
    /// Safe to call multiple times; subsequent calls are no-ops until
    /// the pool is initialized again.
    pub fn shutdown_with(&mut self, host: &mut H) {
        if !self.lifecycle.exit() {
            return;
        }
        let mut destroyed = 0usize;
        for (_, queue) in self.free.drain() {
            for instance in queue {
                host.destroy(instance);
                destroyed += 1;
                self.stats.total_destroyed += 1;
            }
        }
        self.templates.clear();
        self.instance_keys.clear();
        log::info!("pool: shut down, destroyed {destroyed} pooled instances");
    }
}

impl<H: InstanceHost> Manager for PoolManager<H> {
    fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    fn initialize(&mut self) {
        if self.lifecycle.enter() {
            log::info!("pool: initialized");
        }
    }

    /// Host-less teardown: clears tracking state without destroying
    /// host objects. Callers that own the host should prefer
    /// [`PoolManager::shutdown_with`].
    fn shutdown(&mut self) {
        if !self.lifecycle.exit() {
            return;
        }
        self.free.clear();
        self.templates.clear();
        self.instance_keys.clear();
        log::info!("pool: shut down (state only)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Prefab, SceneHost};

    fn pool_with_key(key: &str) -> (PoolManager<SceneHost>, SceneHost) {
        let mut pool = PoolManager::new();
        pool.initialize();
        pool.register(key, Prefab::new(key));
        (pool, SceneHost::new())
    }

    fn origin() -> (Vec3, Quat) {
        (Vec3::zeros(), Quat::identity())
    }

    #[test]
    fn register_is_idempotent_and_first_binding_wins() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.register("Bullet", Prefab::new("SomethingElse"));
        assert!(pool.is_registered("Bullet"));

        // Spawns still produce instances of the first template.
        let (pos, rot) = origin();
        let instance = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        assert_eq!(scene.instance_name(instance), Some("Bullet"));
    }

    #[test]
    fn register_empty_key_is_ignored() {
        let mut pool: PoolManager<SceneHost> = PoolManager::new();
        pool.register("", Prefab::new("Bullet"));
        assert!(!pool.is_registered(""));
    }

    #[test]
    fn spawn_unregistered_key_returns_none() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        let (pos, rot) = origin();
        assert!(pool.spawn("unknown-key", pos, rot, None, &mut scene).is_none());
        assert_eq!(scene.created_count(), 0);
    }

    #[test]
    fn prewarm_creates_inert_detached_instances() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 3, None, &mut scene);

        assert_eq!(pool.free_count("Bullet"), 3);
        assert_eq!(scene.created_count(), 3);
        assert_eq!(scene.node_count(), 3);
    }

    #[test]
    fn prewarm_unregistered_or_zero_is_noop() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 0, None, &mut scene);
        pool.prewarm("Rocket", 4, None, &mut scene);
        assert_eq!(pool.free_count("Bullet"), 0);
        assert_eq!(scene.created_count(), 0);
    }

    #[test]
    fn spawn_reuses_before_creating() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 2, None, &mut scene);
        assert_eq!(scene.created_count(), 2);

        let (pos, rot) = origin();
        let first = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        let second = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        assert_ne!(first, second);
        assert_eq!(scene.created_count(), 2, "prewarmed instances must be reused");

        let third = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        assert_eq!(scene.created_count(), 3, "exhausted pool falls back to creation");
        assert!(scene.is_active(third));
    }

    #[test]
    fn spawned_instance_leaves_free_queue() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 1, None, &mut scene);

        let (pos, rot) = origin();
        let instance = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        assert_eq!(pool.free_count("Bullet"), 0);
        assert!(scene.is_active(instance));
    }

    #[test]
    fn despawn_returns_instance_to_origin_pool() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        let (pos, rot) = origin();
        let instance = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();

        pool.despawn(instance, &mut scene);
        assert_eq!(pool.free_count("Bullet"), 1);
        assert!(!scene.is_active(instance));
        assert_eq!(scene.parent(instance), None);
        assert!(scene.is_alive(instance));
    }

    #[test]
    fn despawn_untracked_instance_destroys_it() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        let stray = scene.instantiate(&Prefab::new("Debris"));

        pool.despawn(stray, &mut scene);
        assert!(!scene.is_alive(stray));
        assert_eq!(pool.free_count("Bullet"), 0);
        assert_eq!(pool.free_count("Debris"), 0);
    }

    #[test]
    fn pool_partition_invariant_holds_across_keys() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.register("Rocket", Prefab::new("Rocket"));

        let (pos, rot) = origin();
        let bullet = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        let rocket = pool.spawn("Rocket", pos, rot, None, &mut scene).unwrap();
        pool.despawn(bullet, &mut scene);
        pool.despawn(rocket, &mut scene);

        assert_eq!(pool.free_count("Bullet"), 1);
        assert_eq!(pool.free_count("Rocket"), 1);
        assert_eq!(pool.key_of(bullet), Some("Bullet"));
        assert_eq!(pool.key_of(rocket), Some("Rocket"));
    }

    #[test]
    fn unregister_destroys_pooled_and_orphans_active() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 2, None, &mut scene);
        let (pos, rot) = origin();
        let active = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();

        pool.unregister("Bullet", &mut scene);
        assert_eq!(scene.destroyed_count(), 1, "one instance was still queued");
        assert!(scene.is_alive(active), "active instances are unaffected");
        assert!(!pool.is_registered("Bullet"));

        // The orphan is destroyed on its next despawn, not re-pooled.
        pool.despawn(active, &mut scene);
        assert!(!scene.is_alive(active));
        assert_eq!(pool.free_count("Bullet"), 0);
        assert!(!pool.is_tracked(active));
    }

    #[test]
    fn spawn_skips_instances_destroyed_behind_the_pools_back() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 1, None, &mut scene);

        // Simulate external destruction of the queued instance, so the
        // next dequeue lands on a dead handle.
        let (pos, rot) = origin();
        let first = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        pool.despawn(first, &mut scene);
        scene.destroy(first);
        assert_eq!(pool.free_count("Bullet"), 1);

        let respawned = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        assert_ne!(respawned, first, "dead handle is purged, not reused");
        assert!(scene.is_alive(respawned));
        assert!(!pool.is_tracked(first));
        assert_eq!(pool.stats().total_created, 2, "a fresh instance was created");
    }

    #[test]
    fn shutdown_destroys_everything_and_is_idempotent() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 3, None, &mut scene);

        pool.shutdown_with(&mut scene);
        assert_eq!(scene.destroyed_count(), 3);
        assert!(!pool.is_initialized());
        assert_eq!(pool.free_count("Bullet"), 0);

        // Second shutdown is a no-op.
        pool.shutdown_with(&mut scene);
        assert_eq!(scene.destroyed_count(), 3);
    }

    #[test]
    fn initialize_twice_is_equivalent_to_once() {
        let mut pool: PoolManager<SceneHost> = PoolManager::new();
        pool.initialize();
        pool.initialize();
        assert!(pool.is_initialized());
    }

    #[test]
    fn stats_track_creation_and_reuse() {
        let (mut pool, mut scene) = pool_with_key("Bullet");
        pool.prewarm("Bullet", 1, None, &mut scene);
        let (pos, rot) = origin();
        let instance = pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();
        pool.despawn(instance, &mut scene);
        pool.spawn("Bullet", pos, rot, None, &mut scene).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.total_created, 1);
        assert_eq!(stats.total_spawned, 2);
        assert_eq!(stats.total_despawned, 1);
    }
}
