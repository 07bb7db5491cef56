//! Object Manager
//!
//! Maintains the bidirectional key/template mapping and fronts the two
//! spawn paths: pooled (delegated to the [`PoolManager`]) and
//! unmanaged (direct instantiation, never recycled). Template
//! resolution falls back to the [`ResourceManager`] when a key has no
//! local registration.

use crate::foundation::math::{Quat, Vec3};
use crate::host::{AssetDirectory, InstanceHost, PrefabTemplate};
use crate::manager::{LifecycleState, Manager};
use crate::pool::PoolManager;
use crate::resources::ResourceManager;
use std::collections::HashMap;

/// Key/template registry delegating instance reuse to the pool engine.
///
/// Unregistering here removes only the local mapping; the pool keeps
/// its queue for the key. Callers wanting the cascade use
/// [`PoolManager::unregister`] directly.
pub struct ObjectManager<H: InstanceHost> {
    lifecycle: LifecycleState,

    key_to_prefab: HashMap<String, H::Template>,

    /// Template name back to its key; identity is the template's name
    prefab_to_key: HashMap<String, String>,
}

impl<H: InstanceHost> Default for ObjectManager<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: InstanceHost> ObjectManager<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            lifecycle: LifecycleState::new(),
            key_to_prefab: HashMap::new(),
            prefab_to_key: HashMap::new(),
        }
    }

    /// Register a template under a key and make it poolable.
    ///
    /// The local mapping is overwritten on re-registration; the pool's
    /// template binding keeps its first registration.
    pub fn register_prefab(&mut self, key: &str, template: H::Template, pool: &mut PoolManager<H>) {
        if key.is_empty() {
            return;
        }
        self.prefab_to_key
            .insert(template.name().to_owned(), key.to_owned());
        self.key_to_prefab.insert(key.to_owned(), template.clone());
        pool.initialize();
        pool.register(key, template);
        log::debug!("objects: registered prefab under '{key}'");
    }

    /// Remove the local key/template mapping.
    ///
    /// Does not touch the pool's queue or template binding for the key.
    pub fn unregister_prefab(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        if let Some(template) = self.key_to_prefab.remove(key) {
            self.prefab_to_key.remove(template.name());
        }
    }

    /// Whether a key has a local registration
    pub fn is_registered(&self, key: &str) -> bool {
        self.key_to_prefab.contains_key(key)
    }

    /// Key for a template, registering under the template's name when
    /// unseen.
    ///
    /// Guarantees every template used for spawning ends up with
    /// exactly one key. Identity is the template's name: two distinct
    /// templates sharing a name collide here, so register explicit
    /// keys when that matters.
    pub fn get_or_register_key_for_prefab(
        &mut self,
        template: &H::Template,
        pool: &mut PoolManager<H>,
    ) -> String {
        if let Some(existing) = self.prefab_to_key.get(template.name()) {
            return existing.clone();
        }
        let key = template.name().to_owned();
        self.register_prefab(&key, template.clone(), pool);
        key
    }

    /// Pre-create pooled instances for a registered key
    pub fn prewarm(
        &mut self,
        key: &str,
        count: usize,
        container: Option<H::Container>,
        pool: &mut PoolManager<H>,
        host: &mut H,
    ) {
        if count == 0 {
            return;
        }
        pool.initialize();
        pool.prewarm(key, count, container, host);
    }

    /// Pre-create pooled instances for a template, registering it first
    pub fn prewarm_prefab(
        &mut self,
        template: &H::Template,
        count: usize,
        container: Option<H::Container>,
        pool: &mut PoolManager<H>,
        host: &mut H,
    ) {
        if count == 0 {
            return;
        }
        let key = self.get_or_register_key_for_prefab(template, pool);
        self.prewarm(&key, count, container, pool, host);
    }

    /// Spawn an instance for a key.
    ///
    /// With `pooling` the key must be locally registered and the pool
    /// engine supplies the instance; when `world_space` is false and a
    /// container is given the transform is applied in the container's
    /// frame. Without `pooling` the template is resolved (local
    /// registry, then resource lookup) and instantiated directly; such
    /// instances are unmanaged and get destroyed on despawn instead of
    /// recycled.
    pub fn spawn<D: AssetDirectory<Template = H::Template>>(
        &mut self,
        key: &str,
        position: Vec3,
        rotation: Quat,
        container: Option<H::Container>,
        world_space: bool,
        pooling: bool,
        pool: &mut PoolManager<H>,
        resources: &mut ResourceManager<H::Template>,
        assets: &D,
        host: &mut H,
    ) -> Option<H::Instance> {
        if key.is_empty() {
            return None;
        }

        if pooling {
            let template = self.key_to_prefab.get(key)?.clone();
            pool.initialize();
            pool.register(key, template);
            let instance = pool.spawn(key, position, rotation, container, host)?;
            if !world_space && container.is_some() {
                host.set_local_position_and_rotation(instance, position, rotation);
            }
            return Some(instance);
        }

        let template = self.resolve_prefab(key, resources, assets)?;
        let instance = host.instantiate(&template);
        if container.is_some() {
            host.set_parent(instance, container, false);
        }
        host.set_position_and_rotation(instance, position, rotation);
        log::debug!("objects: spawned unmanaged '{key}'");
        Some(instance)
    }

    /// Spawn by template reference, deriving (and registering) its key
    pub fn spawn_prefab<D: AssetDirectory<Template = H::Template>>(
        &mut self,
        template: &H::Template,
        position: Vec3,
        rotation: Quat,
        container: Option<H::Container>,
        pooling: bool,
        pool: &mut PoolManager<H>,
        resources: &mut ResourceManager<H::Template>,
        assets: &D,
        host: &mut H,
    ) -> Option<H::Instance> {
        let key = self.get_or_register_key_for_prefab(template, pool);
        self.spawn(
            &key, position, rotation, container, false, pooling, pool, resources, assets, host,
        )
    }

    /// Return an instance to its pool (or destroy it when unmanaged)
    pub fn despawn(&mut self, instance: H::Instance, pool: &mut PoolManager<H>, host: &mut H) {
        pool.initialize();
        pool.despawn(instance, host);
    }

    /// Despawn every child of a container whose name starts with a
    /// prefix. Children are visited in reverse enumeration order.
    pub fn despawn_children_by_prefix(
        &mut self,
        container: H::Container,
        prefix: &str,
        pool: &mut PoolManager<H>,
        host: &mut H,
    ) {
        if prefix.is_empty() {
            return;
        }
        let matching: Vec<_> = host
            .children(container)
            .into_iter()
            .rev()
            .filter(|&child| {
                host.instance_name(child)
                    .is_some_and(|name| name.starts_with(prefix))
            })
            .collect();
        for child in matching {
            self.despawn(child, pool, host);
        }
    }

    /// Resolve a key to a template: local registry first, then the
    /// resource lookup collaborator.
    pub fn resolve_prefab<D: AssetDirectory<Template = H::Template>>(
        &self,
        key: &str,
        resources: &mut ResourceManager<H::Template>,
        assets: &D,
    ) -> Option<H::Template> {
        if key.is_empty() {
            return None;
        }
        if let Some(template) = self.key_to_prefab.get(key) {
            return Some(template.clone());
        }
        resources.load(key, assets)
    }

    /// Register every template discoverable under an asset path, each
    /// under its own name, optionally prewarming each key.
    ///
    /// Registration order follows the directory's enumeration order,
    /// which is not guaranteed stable across directory
    /// implementations. Returns the number of templates registered.
    pub fn register_all_in_path<D: AssetDirectory<Template = H::Template>>(
        &mut self,
        path: &str,
        prewarm_count: usize,
        container: Option<H::Container>,
        pool: &mut PoolManager<H>,
        host: &mut H,
        assets: &D,
    ) -> usize {
        let loaded = assets.load_all_under_path(path);
        let mut registered = 0;
        for template in loaded {
            let key = template.name().to_owned();
            self.register_prefab(&key, template, pool);
            registered += 1;
            if prewarm_count > 0 {
                self.prewarm(&key, prewarm_count, container, pool, host);
            }
        }
        log::info!("objects: registered {registered} prefabs from '{path}'");
        registered
    }
}

impl<H: InstanceHost> Manager for ObjectManager<H> {
    fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    fn initialize(&mut self) {
        if self.lifecycle.enter() {
            log::info!("objects: initialized");
        }
    }

    fn shutdown(&mut self) {
        if self.lifecycle.exit() {
            self.key_to_prefab.clear();
            self.prefab_to_key.clear();
            log::info!("objects: shut down");
        }
    }
}
