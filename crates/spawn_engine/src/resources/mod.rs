//! Resource lookup with ordered search paths and memoization

mod resource_manager;

pub use resource_manager::ResourceManager;
