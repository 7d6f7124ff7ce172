//! Mesh component
//!
//! Structure-of-arrays vertex data. GPU buffer upload is the renderer's
//! concern; the component only carries the CPU-side geometry.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::Component;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u16>,
}

impl Mesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Component for Mesh {
    const NAME: &'static str = "Mesh";
}
