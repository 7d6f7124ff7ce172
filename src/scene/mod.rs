//! Scene graph system
//!
//! Owns entities and the parent/child hierarchy:
//! - Object: a stable identity (id, name, enabled flag, sibling order)
//! - Scene: container that owns all objects, per-type component storage
//!   and the hierarchy adjacency
//! - ComponentsRegistry: per-type id → component storage
//! - GlobalComponentsRegistry: type-erased serialize/deserialize/delete/copy
//!   operations over heterogeneous component types

pub mod object;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod scene;

pub use object::{Object, ObjectId};
pub use registry::{Component, ComponentsRegistry, GlobalComponentsRegistry};
pub use scene::Scene;
