//! Material component
//!
//! A shader name plus a free-form property table. Heavyweight payloads
//! (textures) are not stored inline: an `image` property holds an
//! [`AssetProvider`](crate::assets::AssetProvider) id, so equal images are
//! shared across materials.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::assets::AssetId;
use crate::scene::Component;

/// A single material property, persisted as a `{type, value}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MaterialProperty {
    Bool(bool),
    Int(i32),
    Float(f32),
    /// Linear RGB.
    Color([f32; 3]),
    Vec2(Vec2),
    Vec3(Vec3),
    /// Id of a deduplicated image payload in the asset store.
    Image(AssetId),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub shader: String,
    /// BTreeMap keeps property order stable in saved files.
    pub properties: BTreeMap<String, MaterialProperty>,
}

impl Material {
    #[must_use]
    pub fn with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, property: MaterialProperty) {
        self.properties.insert(name.to_string(), property);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MaterialProperty> {
        self.properties.get(name)
    }

    /// Ids of every image property, for renderer-side texture preparation.
    pub fn image_ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.properties.values().filter_map(|p| match p {
            MaterialProperty::Image(id) => Some(*id),
            _ => None,
        })
    }
}

impl Component for Material {
    const NAME: &'static str = "Material";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_json_shape() {
        let json = serde_json::to_value(MaterialProperty::Int(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "int", "value": 5 }));

        let json = serde_json::to_value(MaterialProperty::Color([1.0, 0.5, 0.0])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "color", "value": [1.0, 0.5, 0.0] })
        );
    }

    #[test]
    fn image_ids_filters_non_images() {
        let mut material = Material::with_shader("phong");
        material.set("roughness", MaterialProperty::Float(0.4));
        material.set("albedo", MaterialProperty::Image(7));
        material.set("normal_map", MaterialProperty::Image(9));

        let ids: Vec<_> = material.image_ids().collect();
        assert_eq!(ids, vec![7, 9]);
    }
}
