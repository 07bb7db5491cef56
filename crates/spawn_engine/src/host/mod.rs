//! Collaborator seams between the pooling core and its surroundings
//!
//! The pooling core never owns scene-graph or asset-loading behavior.
//! It talks to the outside world through three traits: [`PrefabTemplate`]
//! (a blueprint with a name), [`InstanceHost`] (instantiate, destroy,
//! activate, parent, and transform live instances), and
//! [`AssetDirectory`] (path-based template lookup and enumeration).
//!
//! [`scene::SceneHost`] and [`scene::MemoryAssets`] provide in-memory
//! implementations used by the demo application and the test suite.

pub mod scene;

pub use scene::{MemoryAssets, NodeKey, Prefab, SceneHost};

use crate::foundation::math::{Quat, Vec3};
use std::fmt::Debug;
use std::hash::Hash;

/// An immutable blueprint that instances are created from.
///
/// The core holds templates by value but treats them as opaque apart
/// from the name, which is the fallback identity used when deriving
/// pool keys.
pub trait PrefabTemplate {
    /// Human-meaningful name of this template
    fn name(&self) -> &str;
}

/// The scene-side collaborator that creates and manipulates instances.
///
/// All pooling operations funnel instance manipulation through this
/// trait so the core stays independent of any concrete scene graph.
pub trait InstanceHost {
    /// Template type instances are created from
    type Template: PrefabTemplate + Clone;

    /// Handle to a live instance; must stay valid until [`InstanceHost::destroy`]
    type Instance: Copy + Eq + Hash + Debug;

    /// Handle to a container instances can be parented under
    type Container: Copy;

    /// Create a fresh instance from a template. The new instance
    /// starts active and unparented.
    fn instantiate(&mut self, template: &Self::Template) -> Self::Instance;

    /// Release an instance permanently. Destroying an already-dead
    /// handle is a no-op.
    fn destroy(&mut self, instance: Self::Instance);

    /// Whether the handle still refers to a live instance
    fn is_alive(&self, instance: Self::Instance) -> bool;

    /// Activate or deactivate an instance
    fn set_active(&mut self, instance: Self::Instance, active: bool);

    /// Attach an instance under a container, or detach it with `None`.
    /// When `world_space` is true the instance keeps its world
    /// transform across the reparent.
    fn set_parent(
        &mut self,
        instance: Self::Instance,
        parent: Option<Self::Container>,
        world_space: bool,
    );

    /// Set world-space position and rotation
    fn set_position_and_rotation(&mut self, instance: Self::Instance, position: Vec3, rotation: Quat);

    /// Set position and rotation relative to the instance's parent
    fn set_local_position_and_rotation(
        &mut self,
        instance: Self::Instance,
        position: Vec3,
        rotation: Quat,
    );

    /// Instances currently attached under a container
    fn children(&self, container: Self::Container) -> Vec<Self::Instance>;

    /// Name of a live instance, `None` for dead handles
    fn instance_name(&self, instance: Self::Instance) -> Option<&str>;
}

/// The asset-side collaborator that resolves templates by path.
pub trait AssetDirectory {
    /// Template type this directory serves
    type Template: PrefabTemplate + Clone;

    /// Load the template stored at an exact logical path
    fn load_by_path(&self, path: &str) -> Option<Self::Template>;

    /// Enumerate every template under a logical path prefix.
    ///
    /// The iteration order is implementation-defined; callers must not
    /// rely on it being stable across directory implementations.
    fn load_all_under_path(&self, path: &str) -> Vec<Self::Template>;
}
