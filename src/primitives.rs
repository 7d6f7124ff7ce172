//! Primitive mesh generators
//!
//! Unit-ish primitives for quickly populating a scene from the editor.
//! Normals are generated flat per face and averaged where vertices are
//! shared between triangles.

use glam::{Vec2, Vec3};

use crate::components::Mesh;

/// Axis-aligned cube spanning -1..1 on every axis, 4 vertices per face.
#[must_use]
pub fn create_cube() -> Mesh {
    let positions: Vec<Vec3> = [
        // Front (-Z)
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
        // Back (+Z)
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        // Left (-X)
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0],
        // Right (+X)
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
        // Top (+Y)
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        // Bottom (-Y)
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
    ]
    .iter()
    .map(|p| Vec3::from_array(*p))
    .collect();

    let uvs: Vec<Vec2> = [
        // Front
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        // Back
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        // Left
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
        // Right
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        // Top
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        // Bottom
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 1.0],
    ]
    .iter()
    .map(|uv| Vec2::from_array(*uv))
    .collect();

    let indices: Vec<u16> = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    let normals = generate_normals(&positions, &indices);
    Mesh {
        positions,
        uvs,
        normals,
        indices,
    }
}

/// Four-sided pyramid with a square base at y = -1 and apex at y = 1.
#[must_use]
pub fn create_pyramid() -> Mesh {
    let positions: Vec<Vec3> = [
        // Base
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        // Front
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [0.0, 1.0, 0.0],
        // Right
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [0.0, 1.0, 0.0],
        // Back
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [0.0, 1.0, 0.0],
        // Left
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [0.0, 1.0, 0.0],
    ]
    .iter()
    .map(|p| Vec3::from_array(*p))
    .collect();

    let uvs: Vec<Vec2> = [
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 1.0],
        [0.5, 1.0],
        [0.0, 0.0],
        [0.0, 1.0],
        [0.5, 1.0],
        [0.0, 0.0],
        [0.0, 1.0],
        [0.5, 1.0],
        [0.0, 0.0],
        [0.0, 1.0],
        [0.5, 1.0],
    ]
    .iter()
    .map(|uv| Vec2::from_array(*uv))
    .collect();

    let indices: Vec<u16> = vec![
        0, 1, 2, 2, 3, 0, // base
        6, 5, 4, // front
        9, 8, 7, // right
        12, 11, 10, // back
        15, 14, 13, // left
    ];

    let normals = generate_normals(&positions, &indices);
    Mesh {
        positions,
        uvs,
        normals,
        indices,
    }
}

/// Per-vertex normals: face normals accumulated over the index buffer, then
/// normalized. Vertices not referenced by any triangle get a zero normal.
#[must_use]
pub fn generate_normals(positions: &[Vec3], indices: &[u16]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face_normal = (positions[b] - positions[a])
            .cross(positions[c] - positions[a])
            .normalize_or_zero();
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }
    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}
