//! Asset system
//!
//! Content-addressed deduplication store for heavyweight payloads
//! (decoded images, opaque blobs). Components reference assets by
//! [`AssetId`]; the store owns the bytes.

pub mod provider;
pub mod value;

pub use provider::{AssetProvider, PreparedAsset};
pub use value::{AssetId, AssetValue, ImageData};
