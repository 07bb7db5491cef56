//! Resource Manager
//!
//! Resolves template names against an ordered list of search-path
//! prefixes, memoizing hits. Names containing a path separator are
//! tried as direct lookups first. Cache entries live until shutdown;
//! if the underlying asset is unloaded externally the cached template
//! goes stale, which is an accepted limitation of this layer.

use crate::host::AssetDirectory;
use crate::manager::{LifecycleState, Manager};
use std::collections::HashMap;

/// Search-path based template resolver with a memoizing cache.
///
/// The cache is keyed by name; each `ResourceManager` serves a single
/// template type, so no type component is needed in the key.
pub struct ResourceManager<T> {
    lifecycle: LifecycleState,

    /// Path prefixes tried in registration order
    search_paths: Vec<String>,

    /// Paths applied when `initialize` runs
    configured_paths: Vec<String>,

    cache: HashMap<String, T>,
}

impl<T: Clone> Default for ResourceManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ResourceManager<T> {
    /// Create a resource manager with no search paths
    pub fn new() -> Self {
        Self {
            lifecycle: LifecycleState::new(),
            search_paths: Vec::new(),
            configured_paths: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// Set the paths that `initialize` will install as search paths
    pub fn configure_search_paths<S: AsRef<str>>(&mut self, paths: &[S]) {
        self.configured_paths = paths.iter().map(|p| p.as_ref().to_owned()).collect();
    }

    /// Append search paths, normalizing separators and trimming
    /// leading/trailing slashes. Empty entries are skipped.
    pub fn add_search_paths<S: AsRef<str>>(&mut self, paths: &[S]) {
        for path in paths {
            let normalized = path.as_ref().replace('\\', "/");
            let trimmed = normalized.trim_matches('/');
            if !trimmed.is_empty() {
                self.search_paths.push(trimmed.to_owned());
            }
        }
    }

    /// Search paths currently in effect, in lookup order
    pub fn search_paths(&self) -> &[String] {
        &self.search_paths
    }

    /// Number of memoized templates
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a template by name.
    ///
    /// Lookup order: cache, direct path (only when `name` contains
    /// `/`), then each search path in registration order. The first
    /// hit is cached and returned; `None` when everything misses.
    pub fn load<D: AssetDirectory<Template = T>>(&mut self, name: &str, dir: &D) -> Option<T> {
        if name.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.get(name) {
            log::trace!("resources: cache hit for '{name}'");
            return Some(cached.clone());
        }

        if name.contains('/') {
            if let Some(template) = dir.load_by_path(name) {
                self.cache.insert(name.to_owned(), template.clone());
                return Some(template);
            }
        }

        for prefix in &self.search_paths {
            let full = format!("{prefix}/{name}");
            if let Some(template) = dir.load_by_path(&full) {
                log::trace!("resources: resolved '{name}' under '{prefix}'");
                self.cache.insert(name.to_owned(), template.clone());
                return Some(template);
            }
        }
        None
    }
}

impl<T: Clone> Manager for ResourceManager<T> {
    fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    fn initialize(&mut self) {
        if self.lifecycle.enter() {
            let configured = self.configured_paths.clone();
            self.add_search_paths(&configured);
            log::info!(
                "resources: initialized with {} search paths",
                self.search_paths.len()
            );
        }
    }

    fn shutdown(&mut self) {
        if self.lifecycle.exit() {
            self.cache.clear();
            self.search_paths.clear();
            log::info!("resources: shut down, cache cleared");
        }
    }
}
