//! Built-in component types
//!
//! Every type here is plain serializable data keyed by object id; see
//! [`Component`](crate::scene::Component) for the contract. The set mirrors
//! what the editor inspects: Transform (mandatory), Material, Camera,
//! DirectionalLight, Mesh.

pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod transform;

pub use camera::Camera;
pub use light::{DirectionalLight, ShadowType};
pub use material::{Material, MaterialProperty};
pub use mesh::Mesh;
pub use transform::Transform;

use crate::scene::GlobalComponentsRegistry;

/// Registers every built-in component type with the global type-erasure
/// table.
///
/// Call once at program start, before any scene is created or loaded.
/// Registration is explicit (instead of static-initializer side effects) so
/// initialization order stays deterministic and testable; calling this more
/// than once is harmless.
pub fn register_all_components() {
    GlobalComponentsRegistry::register::<Transform>();
    GlobalComponentsRegistry::register::<Material>();
    GlobalComponentsRegistry::register::<Camera>();
    GlobalComponentsRegistry::register::<DirectionalLight>();
    GlobalComponentsRegistry::register::<Mesh>();
}
