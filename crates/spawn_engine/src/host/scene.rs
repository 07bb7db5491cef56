//! In-memory scene host and asset directory
//!
//! A deliberately small scene-graph stand-in backed by a slot map.
//! Nodes carry a name, an active flag, an optional parent, and a world
//! transform. This is enough to exercise every pooling code path
//! without pulling in a renderer.

use super::{AssetDirectory, InstanceHost, PrefabTemplate};
use crate::foundation::math::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeMap;

new_key_type! {
    /// Stable handle to a scene node
    pub struct NodeKey;
}

/// A named template instances are cloned from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
    name: String,
}

impl Prefab {
    /// Create a prefab with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PrefabTemplate for Prefab {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    active: bool,
    parent: Option<NodeKey>,
    position: Vec3,
    rotation: Quat,
}

/// Slot-map backed implementation of [`InstanceHost`]
#[derive(Default)]
pub struct SceneHost {
    nodes: SlotMap<NodeKey, Node>,
    created: u64,
    destroyed: u64,
}

impl SceneHost {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare container node, usable as a spawn parent
    pub fn create_container(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(Node {
            name: name.into(),
            active: true,
            parent: None,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        })
    }

    /// Number of live nodes in the scene
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total instances created since the scene was built
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total instances destroyed since the scene was built
    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }

    /// Whether a node is currently active
    pub fn is_active(&self, key: NodeKey) -> bool {
        self.nodes.get(key).is_some_and(|n| n.active)
    }

    /// Parent of a node, if attached
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// World position of a node
    pub fn position(&self, key: NodeKey) -> Option<Vec3> {
        self.nodes.get(key).map(|n| n.position)
    }

    /// World rotation of a node
    pub fn rotation(&self, key: NodeKey) -> Option<Quat> {
        self.nodes.get(key).map(|n| n.rotation)
    }
}

impl InstanceHost for SceneHost {
    type Template = Prefab;
    type Instance = NodeKey;
    type Container = NodeKey;

    fn instantiate(&mut self, template: &Prefab) -> NodeKey {
        self.created += 1;
        self.nodes.insert(Node {
            name: template.name.clone(),
            active: true,
            parent: None,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        })
    }

    fn destroy(&mut self, instance: NodeKey) {
        if self.nodes.remove(instance).is_some() {
            self.destroyed += 1;
        }
    }

    fn is_alive(&self, instance: NodeKey) -> bool {
        self.nodes.contains_key(instance)
    }

    fn set_active(&mut self, instance: NodeKey, active: bool) {
        if let Some(node) = self.nodes.get_mut(instance) {
            node.active = active;
        }
    }

    fn set_parent(&mut self, instance: NodeKey, parent: Option<NodeKey>, _world_space: bool) {
        // World transforms are stored directly, so reparenting never
        // moves a node; the flag only matters for hierarchical hosts.
        if let Some(node) = self.nodes.get_mut(instance) {
            node.parent = parent;
        }
    }

    fn set_position_and_rotation(&mut self, instance: NodeKey, position: Vec3, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(instance) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    fn set_local_position_and_rotation(&mut self, instance: NodeKey, position: Vec3, rotation: Quat) {
        let parent_frame = self
            .nodes
            .get(instance)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map(|p| (p.position, p.rotation));

        if let Some(node) = self.nodes.get_mut(instance) {
            match parent_frame {
                Some((parent_position, parent_rotation)) => {
                    node.position = parent_position + parent_rotation * position;
                    node.rotation = parent_rotation * rotation;
                }
                None => {
                    node.position = position;
                    node.rotation = rotation;
                }
            }
        }
    }

    fn children(&self, container: NodeKey) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(container))
            .map(|(key, _)| key)
            .collect()
    }

    fn instance_name(&self, instance: NodeKey) -> Option<&str> {
        self.nodes.get(instance).map(|n| n.name.as_str())
    }
}

/// Path-keyed in-memory implementation of [`AssetDirectory`]
///
/// Paths use `/` separators, e.g. `"Prefabs/UI/HealthBar"`. Iteration
/// is sorted by path so bulk registration is deterministic in tests.
#[derive(Default)]
pub struct MemoryAssets {
    templates: BTreeMap<String, Prefab>,
}

impl MemoryAssets {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template at a logical path
    pub fn insert(&mut self, path: impl Into<String>, template: Prefab) {
        self.templates.insert(path.into(), template);
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_template(mut self, path: impl Into<String>, template: Prefab) -> Self {
        self.insert(path, template);
        self
    }

    /// Number of templates stored
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl AssetDirectory for MemoryAssets {
    type Template = Prefab;

    fn load_by_path(&self, path: &str) -> Option<Prefab> {
        self.templates.get(path).cloned()
    }

    fn load_all_under_path(&self, path: &str) -> Vec<Prefab> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return self.templates.values().cloned().collect();
        }
        let prefix = format!("{trimmed}/");
        self.templates
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, template)| template.clone())
            .collect()
    }
}
