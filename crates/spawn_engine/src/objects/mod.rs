//! Object registry mapping keys to templates on top of the pool engine

mod object_manager;

pub use object_manager::ObjectManager;
