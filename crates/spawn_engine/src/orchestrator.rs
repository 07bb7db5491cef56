//! Composite manager sequencing subsystem lifecycles
//!
//! The [`Orchestrator`] is the explicit context object callers hold
//! instead of reaching for global state: it owns the instance host,
//! the asset directory, and at most one instance of each subsystem
//! manager, constructed lazily and torn down explicitly. Dropping or
//! shutting down an orchestrator leaves nothing behind, which keeps
//! tests isolated.
//!
//! Subsystems are initialized in dependency order (pool first, since
//! every spawn path ends there) and shut down in reverse. The spawn
//! facade ensures subsystems defensively, so strict pre-ordering is a
//! robustness layer rather than a correctness requirement.

use crate::core::config::EngineConfig;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::host::{AssetDirectory, InstanceHost};
use crate::manager::{LifecycleState, Manager};
use crate::objects::ObjectManager;
use crate::pool::{PoolManager, PoolStats};
use crate::resources::ResourceManager;

/// Owner and sequencer of the pooling subsystems.
///
/// Generic over the scene host `H` and the asset directory `D`
/// supplying templates for it.
pub struct Orchestrator<H, D>
where
    H: InstanceHost,
    D: AssetDirectory<Template = H::Template>,
{
    lifecycle: LifecycleState,
    config: EngineConfig,

    host: H,
    assets: D,

    pool: Option<PoolManager<H>>,
    objects: Option<ObjectManager<H>>,
    resources: Option<ResourceManager<H::Template>>,
}

impl<H, D> Orchestrator<H, D>
where
    H: InstanceHost,
    D: AssetDirectory<Template = H::Template>,
{
    /// Create an orchestrator with default configuration
    pub fn new(host: H, assets: D) -> Self {
        Self::with_config(host, assets, EngineConfig::default())
    }

    /// Create an orchestrator with an explicit configuration
    pub fn with_config(host: H, assets: D, config: EngineConfig) -> Self {
        Self {
            lifecycle: LifecycleState::new(),
            config,
            host,
            assets,
            pool: None,
            objects: None,
            resources: None,
        }
    }

    /// The owned instance host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the owned instance host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The owned asset directory
    pub fn assets(&self) -> &D {
        &self.assets
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Construct the pool subsystem if absent
    pub fn ensure_pool(&mut self) -> &mut PoolManager<H> {
        self.pool.get_or_insert_with(|| {
            log::debug!("orchestrator: constructing pool manager");
            PoolManager::new()
        })
    }

    /// Construct the object registry if absent
    pub fn ensure_objects(&mut self) -> &mut ObjectManager<H> {
        self.objects.get_or_insert_with(|| {
            log::debug!("orchestrator: constructing object manager");
            ObjectManager::new()
        })
    }

    /// Construct the resource lookup if absent
    pub fn ensure_resources(&mut self) -> &mut ResourceManager<H::Template> {
        self.resources.get_or_insert_with(|| {
            log::debug!("orchestrator: constructing resource manager");
            ResourceManager::new()
        })
    }

    /// Bring every subsystem up in dependency order.
    ///
    /// Lazily constructs missing subsystems, initializes the pool
    /// first, installs configured search paths into resource lookup,
    /// then applies the configured prewarm table (entries for keys
    /// without a registered template are skipped silently). Idempotent.
    pub fn initialize(&mut self) {
        if !self.lifecycle.enter() {
            return;
        }
        log::info!("orchestrator: initializing subsystems");

        self.ensure_pool().initialize();

        let paths = self.config.resources.search_paths.clone();
        let resources = self.ensure_resources();
        resources.configure_search_paths(&paths);
        resources.initialize();

        self.ensure_objects().initialize();

        self.apply_prewarm_table();
    }

    /// Tear every subsystem down in reverse order and release it.
    ///
    /// Pooled instances are destroyed through the host. After this the
    /// orchestrator holds no subsystems; a later
    /// [`Orchestrator::initialize`] starts clean. Idempotent, and
    /// never reconstructs a subsystem mid-shutdown.
    pub fn shutdown(&mut self) {
        if !self.lifecycle.exit() {
            return;
        }
        log::info!("orchestrator: shutting down subsystems");

        if let Some(objects) = self.objects.as_mut() {
            objects.shutdown();
        }
        if let Some(resources) = self.resources.as_mut() {
            resources.shutdown();
        }
        if let Some(pool) = self.pool.as_mut() {
            pool.shutdown_with(&mut self.host);
        }

        self.objects = None;
        self.resources = None;
        self.pool = None;
    }

    /// Initialize only the pool subsystem
    pub fn initialize_pool(&mut self) {
        self.ensure_pool().initialize();
    }

    /// Shut down only the pool subsystem, destroying pooled instances
    pub fn shutdown_pool(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.shutdown_with(&mut self.host);
        }
    }

    /// Initialize only the resource lookup subsystem
    pub fn initialize_resources(&mut self) {
        let paths = self.config.resources.search_paths.clone();
        let resources = self.ensure_resources();
        resources.configure_search_paths(&paths);
        resources.initialize();
    }

    /// Shut down only the resource lookup subsystem
    pub fn shutdown_resources(&mut self) {
        if let Some(resources) = self.resources.as_mut() {
            resources.shutdown();
        }
    }

    /// Initialize only the object registry subsystem
    pub fn initialize_objects(&mut self) {
        self.ensure_objects().initialize();
    }

    /// Shut down only the object registry subsystem
    pub fn shutdown_objects(&mut self) {
        if let Some(objects) = self.objects.as_mut() {
            objects.shutdown();
        }
    }

    /// Run the configured prewarm table against currently registered
    /// keys. Unregistered keys no-op.
    pub fn apply_prewarm_table(&mut self) {
        if self.config.pool.prewarm.is_empty() {
            return;
        }
        let entries = self.config.pool.prewarm.clone();
        self.ensure_pool();
        if let Some(pool) = self.pool.as_mut() {
            for entry in entries {
                pool.prewarm(&entry.key, entry.count, None, &mut self.host);
            }
        }
    }

    /// Register a template under a key in the registry and the pool
    pub fn register_prefab(&mut self, key: &str, template: H::Template) {
        self.ensure_pool();
        self.ensure_objects();
        if let (Some(objects), Some(pool)) = (self.objects.as_mut(), self.pool.as_mut()) {
            objects.register_prefab(key, template, pool);
        }
    }

    /// Remove the registry's key/template mapping (pool untouched)
    pub fn unregister_prefab(&mut self, key: &str) {
        if let Some(objects) = self.objects.as_mut() {
            objects.unregister_prefab(key);
        }
    }

    /// Remove a key from the pool, destroying its queued instances
    pub fn unregister_pool_key(&mut self, key: &str) {
        if let Some(pool) = self.pool.as_mut() {
            pool.unregister(key, &mut self.host);
        }
    }

    /// Pre-create pooled instances for a registered key
    pub fn prewarm(&mut self, key: &str, count: usize, container: Option<H::Container>) {
        self.ensure_pool();
        self.ensure_objects();
        if let (Some(objects), Some(pool)) = (self.objects.as_mut(), self.pool.as_mut()) {
            objects.prewarm(key, count, container, pool, &mut self.host);
        }
    }

    /// Spawn an instance for a key. See [`ObjectManager::spawn`].
    pub fn spawn(
        &mut self,
        key: &str,
        position: Vec3,
        rotation: Quat,
        container: Option<H::Container>,
        world_space: bool,
        pooling: bool,
    ) -> Option<H::Instance> {
        self.ensure_pool();
        self.ensure_objects();
        self.ensure_resources();
        match (
            self.objects.as_mut(),
            self.pool.as_mut(),
            self.resources.as_mut(),
        ) {
            (Some(objects), Some(pool), Some(resources)) => objects.spawn(
                key,
                position,
                rotation,
                container,
                world_space,
                pooling,
                pool,
                resources,
                &self.assets,
                &mut self.host,
            ),
            _ => None,
        }
    }

    /// Spawn at a bundled position and rotation
    pub fn spawn_with(
        &mut self,
        key: &str,
        transform: &Transform,
        container: Option<H::Container>,
        world_space: bool,
        pooling: bool,
    ) -> Option<H::Instance> {
        self.spawn(
            key,
            transform.position,
            transform.rotation,
            container,
            world_space,
            pooling,
        )
    }

    /// Spawn with the identity transform under an optional container
    pub fn spawn_at(
        &mut self,
        key: &str,
        container: Option<H::Container>,
        pooling: bool,
    ) -> Option<H::Instance> {
        self.spawn(key, Vec3::zeros(), Quat::identity(), container, false, pooling)
    }

    /// Spawn oriented along a direction vector (identity when the
    /// direction is zero)
    pub fn spawn_facing(
        &mut self,
        key: &str,
        position: Vec3,
        direction: Vec3,
        container: Option<H::Container>,
        pooling: bool,
    ) -> Option<H::Instance> {
        let rotation = if direction == Vec3::zeros() {
            Quat::identity()
        } else {
            Quat::face_towards(&direction, &Vec3::y())
        };
        self.spawn(key, position, rotation, container, false, pooling)
    }

    /// Spawn by template reference, deriving and registering its key
    pub fn spawn_prefab(
        &mut self,
        template: &H::Template,
        position: Vec3,
        rotation: Quat,
        container: Option<H::Container>,
        pooling: bool,
    ) -> Option<H::Instance> {
        self.ensure_pool();
        self.ensure_objects();
        self.ensure_resources();
        match (
            self.objects.as_mut(),
            self.pool.as_mut(),
            self.resources.as_mut(),
        ) {
            (Some(objects), Some(pool), Some(resources)) => objects.spawn_prefab(
                template,
                position,
                rotation,
                container,
                pooling,
                pool,
                resources,
                &self.assets,
                &mut self.host,
            ),
            _ => None,
        }
    }

    /// Return an instance to its pool (or destroy it when unmanaged)
    pub fn despawn(&mut self, instance: H::Instance) {
        self.ensure_pool();
        self.ensure_objects();
        if let (Some(objects), Some(pool)) = (self.objects.as_mut(), self.pool.as_mut()) {
            objects.despawn(instance, pool, &mut self.host);
        }
    }

    /// Despawn matching children of a container by name prefix
    pub fn despawn_children_by_prefix(&mut self, container: H::Container, prefix: &str) {
        self.ensure_pool();
        self.ensure_objects();
        if let (Some(objects), Some(pool)) = (self.objects.as_mut(), self.pool.as_mut()) {
            objects.despawn_children_by_prefix(container, prefix, pool, &mut self.host);
        }
    }

    /// Resolve a template by name through resource lookup
    pub fn load(&mut self, name: &str) -> Option<H::Template> {
        self.ensure_resources();
        self.resources
            .as_mut()
            .and_then(|resources| resources.load(name, &self.assets))
    }

    /// Bulk-register every template under an asset path. Returns the
    /// number registered.
    pub fn register_all_in_path(
        &mut self,
        path: &str,
        prewarm_count: usize,
        container: Option<H::Container>,
    ) -> usize {
        self.ensure_pool();
        self.ensure_objects();
        match (self.objects.as_mut(), self.pool.as_mut()) {
            (Some(objects), Some(pool)) => objects.register_all_in_path(
                path,
                prewarm_count,
                container,
                pool,
                &mut self.host,
                &self.assets,
            ),
            _ => 0,
        }
    }

    /// Pool counters; zeroed when the pool has not been constructed
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.as_ref().map(PoolManager::stats).unwrap_or_default()
    }

    /// Free-queue length for a key
    pub fn free_count(&self, key: &str) -> usize {
        self.pool.as_ref().map_or(0, |pool| pool.free_count(key))
    }
}

impl<H, D> Manager for Orchestrator<H, D>
where
    H: InstanceHost,
    D: AssetDirectory<Template = H::Template>,
{
    fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    fn initialize(&mut self) {
        Self::initialize(self);
    }

    fn shutdown(&mut self) {
        Self::shutdown(self);
    }
}
