//! Directional light component

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Component;

/// Shadow casting mode of a light source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShadowType {
    #[default]
    None,
    Hard,
    Soft {
        softness: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub shadow: ShadowType,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            shadow: ShadowType::None,
        }
    }
}

impl Component for DirectionalLight {
    const NAME: &'static str = "DirectionalLight";
}
