//! Camera component

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::components::Transform;
use crate::scene::Component;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Viewport rectangle `[x, y, w, h]`, each in `0..=1` of the render
    /// target.
    pub viewport: [f32; 4],
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub wireframe: bool,
    /// Linear RGB clear color.
    pub background: [f32; 3],
}

impl Camera {
    #[must_use]
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            aspect_ratio,
            self.near_clip,
            self.far_clip,
        )
    }

    /// View matrix from the camera's transform: rotate, then translate.
    #[must_use]
    pub fn view_matrix(&self, transform: &Transform) -> Mat4 {
        Mat4::from_quat(transform.rotation) * Mat4::from_translation(transform.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            viewport: [0.0, 0.0, 1.0, 1.0],
            fov: 45.0,
            near_clip: 0.1,
            far_clip: 1000.0,
            wireframe: false,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl Component for Camera {
    const NAME: &'static str = "Camera";
}
