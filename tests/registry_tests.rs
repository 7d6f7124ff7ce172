//! Component Registration Tests
//!
//! Tests for:
//! - Explicit registration: idempotence, registered-type listing
//! - By-name component operations (the inspector path)
//! - The unregistered-type wiring panic

use sandbox::components::{Camera, Material, Transform};
use sandbox::register_all_components;
use sandbox::scene::{Component, GlobalComponentsRegistry, Scene};
use serde::{Deserialize, Serialize};

// ============================================================================
// Registration
// ============================================================================

#[test]
fn register_all_is_idempotent() {
    register_all_components();
    register_all_components();

    let types = GlobalComponentsRegistry::registered_types();
    for name in ["Camera", "DirectionalLight", "Material", "Mesh", "Transform"] {
        assert!(types.contains(&name), "{name} missing from {types:?}");
    }
}

#[test]
fn registered_types_are_sorted() {
    register_all_components();
    let types = GlobalComponentsRegistry::registered_types();
    let mut sorted = types.clone();
    sorted.sort_unstable();
    assert_eq!(types, sorted);
}

// ============================================================================
// By-Name Operations
// ============================================================================

#[test]
fn add_component_by_name_attaches_default() {
    register_all_components();
    let mut scene = Scene::new();
    let id = scene.create_object("thing");

    assert!(scene.add_component_by_name("Camera", id));
    assert!(scene.has_component::<Camera>(id));
    assert_eq!(scene.get_component::<Camera>(id), Some(&Camera::default()));
}

#[test]
fn add_component_by_name_rejects_unknown_inputs() {
    register_all_components();
    let mut scene = Scene::new();
    let id = scene.create_object("thing");

    assert!(!scene.add_component_by_name("NoSuchComponent", id));
    assert!(!scene.add_component_by_name("Camera", uuid::Uuid::new_v4()));
}

#[test]
fn has_component_by_name_tracks_attachment() {
    register_all_components();
    let mut scene = Scene::new();
    let id = scene.create_object("thing");

    assert!(scene.has_component_by_name("Transform", id));
    assert!(!scene.has_component_by_name("Material", id));
    assert!(!scene.has_component_by_name("NoSuchComponent", id));

    assert!(scene.add_component_by_name("Material", id));
    assert!(scene.has_component_by_name("Material", id));
}

#[test]
fn remove_component_by_name_detaches() {
    register_all_components();
    let mut scene = Scene::new();
    let id = scene.create_object("thing");
    scene.add_component::<Material>(id);

    scene.remove_component_by_name("Material", id);
    assert!(!scene.has_component::<Material>(id));

    // Unknown names and absent components are quiet no-ops.
    scene.remove_component_by_name("NoSuchComponent", id);
    scene.remove_component_by_name("Material", id);
}

#[test]
fn iter_components_enumerates_all_entries() {
    register_all_components();
    let mut scene = Scene::new();
    let a = scene.create_object("a");
    let b = scene.create_object("b");
    scene.add_component::<Material>(a);
    scene.add_component::<Material>(b);

    let mut ids: Vec<_> = scene.iter_components::<Material>().map(|(id, _)| id).collect();
    ids.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(ids, expected);

    // Transform was attached on creation; both show up there too.
    assert_eq!(scene.iter_components::<Transform>().count(), 2);
}

// ============================================================================
// Wiring Panic
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Unwired {
    value: i32,
}

impl Component for Unwired {
    const NAME: &'static str = "tests::Unwired";
}

#[test]
#[should_panic(expected = "never registered")]
fn unregistered_component_type_panics() {
    register_all_components();
    let mut scene = Scene::new();
    let id = scene.create_object("thing");
    scene.add_component::<Unwired>(id);
}
