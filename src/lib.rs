//! Entity-component scene graph runtime for a 3D scene editor.
//!
//! The crate is organized around a few pieces:
//! - [`Scene`]: owns every [`Object`], the parent/child hierarchy and
//!   per-type component storage
//! - [`GlobalComponentsRegistry`]: type-erased operations over
//!   heterogeneous component types; populate it once at startup with
//!   [`register_all_components`]
//! - [`AssetProvider`]: process-wide content-addressed store for
//!   heavyweight payloads (images, blobs)
//! - [`primitives`]: procedural starter geometry for the editor's
//!   "add object" menu

pub mod assets;
pub mod components;
pub mod errors;
pub mod primitives;
pub mod scene;

pub use assets::{AssetId, AssetProvider, AssetValue, ImageData};
pub use components::{
    Camera, DirectionalLight, Material, MaterialProperty, Mesh, ShadowType, Transform,
    register_all_components,
};
pub use errors::{Result, SandboxError};
pub use scene::{Component, ComponentsRegistry, GlobalComponentsRegistry, Object, ObjectId, Scene};
