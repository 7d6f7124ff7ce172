//! Scene container
//!
//! [`Scene`] owns every [`Object`], one lazily-created storage handle per
//! component type in use, and the parent/child adjacency. Parentage is a
//! property of the scene graph, not a component: it is preserved even for
//! objects that carry nothing beyond the mandatory [`Transform`].
//!
//! Serialization flows bottom-up: `to_json` serializes object identities,
//! the adjacency, every registered component table (via the type-erasure
//! ops) and the asset store. `from_json` reverses this in two phases —
//! all objects are reconstructed first so that component deserializers can
//! resolve ids to live objects.
//!
//! All of this is single-threaded editor state. `Scene` holds `dyn Any`
//! registry handles and is deliberately not shareable across threads.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Mat4;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::assets::AssetProvider;
use crate::components::Transform;
use crate::errors::{Result, SandboxError};
use crate::scene::object::{Object, ObjectId};
use crate::scene::registry::{
    Component, ComponentsRegistry, GlobalComponentsRegistry, RegistryHandle,
};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// The aggregate root of the runtime: objects, hierarchy and component
/// storage.
pub struct Scene {
    pub id: u32,

    /// All objects, in insertion order (which is also save order).
    objects: Vec<Object>,

    /// Component type name → opaque handle to that type's registry.
    /// Created on first use.
    registries: FxHashMap<&'static str, RegistryHandle>,

    /// Parent id → ordered list of child ids.
    children: FxHashMap<ObjectId, Vec<ObjectId>>,
    /// Child id → parent id. Kept in sync with `children`.
    parents: FxHashMap<ObjectId, ObjectId>,
}

impl Scene {
    /// Creates an empty scene: no objects, no hierarchy, no registries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            objects: Vec::new(),
            registries: FxHashMap::default(),
            children: FxHashMap::default(),
            parents: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Object lifecycle
    // ========================================================================

    /// Creates a new object owned by this scene and attaches the mandatory
    /// [`Transform`] component.
    ///
    /// # Panics
    /// Panics if [`Transform`] was never registered — call
    /// [`register_all_components`](crate::components::register_all_components)
    /// at startup.
    pub fn create_object(&mut self, name: &str) -> ObjectId {
        let mut object = Object::new(name);
        object.set_order_raw(self.next_order_among(None));
        let id = object.id();
        self.objects.push(object);
        self.insert_component(id, Transform::default());
        id
    }

    /// Adds a pre-built object (importer path). No component is attached.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        self.rebalance_orders(None);
        id
    }

    /// Removes an object and its entire subtree.
    ///
    /// The order matters: the subtree is removed first, then the object's
    /// component entries are purged through the delete ops, and only then is
    /// the object unlinked from its parent and dropped. Anything else leaves
    /// dangling adjacency or component entries.
    pub fn remove_object(&mut self, id: ObjectId) {
        if self.find_object(id).is_none() {
            return;
        }

        let subtree = self.children.get(&id).cloned().unwrap_or_default();
        for child in subtree {
            self.remove_object(child);
        }

        for (name, handle) in &mut self.registries {
            if let Some(ops) = GlobalComponentsRegistry::ops(name) {
                (ops.delete)(handle.as_mut(), id);
            }
        }

        if let Some(parent) = self.parents.remove(&id)
            && let Some(siblings) = self.children.get_mut(&parent)
        {
            siblings.retain(|&c| c != id);
        }
        self.children.remove(&id);
        self.objects.retain(|o| o.id() != id);
    }

    /// Clones an object: fresh id, name suffixed, same enabled state.
    ///
    /// The copy gets no automatic Transform — every copier (the mandatory
    /// component's included) restores its state from the source, so a fresh
    /// default would lose data. The copy is placed at the root level.
    pub fn copy_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let source = self.find_object(id)?;
        let mut copy = Object::new(&format!("{} (copy)", source.name()));
        copy.set_enabled_local(source.enabled());
        copy.set_order_raw(self.next_order_among(None));
        let copy_id = copy.id();
        self.objects.push(copy);

        // Only registries this scene ever instantiated can hold source data;
        // types never instantiated here are correctly a no-op.
        for (name, handle) in &mut self.registries {
            if let Some(ops) = GlobalComponentsRegistry::ops(name) {
                (ops.copy)(handle.as_mut(), id, copy_id);
            }
        }

        Some(copy_id)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn find_object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// First object with the given name, in insertion order.
    #[must_use]
    pub fn find_object_by_name(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` a child of `parent`. Re-parenting is move semantics:
    /// a previous parent link is detached first. Attempts that would create
    /// a cycle (an object becoming its own ancestor) are rejected.
    ///
    /// Returns `false` if the link was rejected.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> bool {
        if parent == child {
            log::warn!("cannot parent object {child} to itself");
            return false;
        }
        if self.find_object(parent).is_none() || self.find_object(child).is_none() {
            log::warn!("add_child: parent or child does not exist");
            return false;
        }
        if self.is_ancestor_of(child, parent) {
            log::warn!("rejecting re-parent of {child} under its own descendant {parent}");
            return false;
        }

        self.detach(child);
        self.children.entry(parent).or_default().push(child);
        self.parents.insert(child, parent);
        self.rebalance_orders(Some(parent));
        true
    }

    /// Detaches `child` from `parent`, making it a root. Ignored if the
    /// link does not exist.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) {
        if self.parents.get(&child) == Some(&parent) {
            self.detach(child);
            self.rebalance_orders(None);
        }
    }

    /// Detaches an object from whatever parent it has, making it a root.
    pub fn unset_parent(&mut self, child: ObjectId) {
        if self.parents.contains_key(&child) {
            self.detach(child);
            self.rebalance_orders(None);
        }
    }

    fn detach(&mut self, child: ObjectId) {
        if let Some(parent) = self.parents.remove(&child)
            && let Some(siblings) = self.children.get_mut(&parent)
        {
            siblings.retain(|&c| c != child);
        }
    }

    #[must_use]
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.parents.get(&id).copied()
    }

    /// Direct children of `id`, sorted by sibling order (matching
    /// [`Self::roots`]).
    #[must_use]
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut kids = self.children.get(&id).cloned().unwrap_or_default();
        kids.sort_by_key(|kid| self.find_object(*kid).map_or(0, Object::order));
        kids
    }

    /// Root objects (no parent), sorted by sibling order.
    #[must_use]
    pub fn roots(&self) -> Vec<ObjectId> {
        let mut roots: Vec<&Object> = self
            .objects
            .iter()
            .filter(|o| !self.parents.contains_key(&o.id()))
            .collect();
        roots.sort_by_key(|o| o.order());
        roots.iter().map(|o| o.id()).collect()
    }

    /// Breadth-first collection of the full descendant set of `id`.
    ///
    /// De-duplicates even if the traversal revisits a node, so a malformed
    /// graph cannot send the caller (drop-target cycle detection in the
    /// scene browser) into a loop.
    #[must_use]
    pub fn all_children_of(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue: Vec<ObjectId> = self.children(id);
        while let Some(current) = queue.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current));
        }
        result
    }

    /// Whether `ancestor` is a (transitive) ancestor of `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: ObjectId, node: ObjectId) -> bool {
        let mut current = self.parents.get(&node);
        while let Some(&p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parents.get(&p);
        }
        false
    }

    // ========================================================================
    // Enablement
    // ========================================================================

    /// Sets the enabled flag on `id` and overwrites the local flag of every
    /// descendant with the same value.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) {
        let subtree = self.all_children_of(id);
        if let Some(object) = self.object_mut(id) {
            object.set_enabled_local(enabled);
        }
        for child in subtree {
            if let Some(object) = self.object_mut(child) {
                object.set_enabled_local(enabled);
            }
        }
    }

    /// Effective visibility: the local flag AND every ancestor's local flag.
    /// Ancestor disablement is absorbing.
    #[must_use]
    pub fn is_enabled(&self, id: ObjectId) -> bool {
        let Some(object) = self.find_object(id) else {
            return false;
        };
        if !object.enabled() {
            return false;
        }
        match self.parent(id) {
            Some(parent) => self.is_enabled(parent),
            None => true,
        }
    }

    // ========================================================================
    // Sibling order
    // ========================================================================

    /// Sets an object's sibling order, then rebalances its sibling set so
    /// that no two siblings share a value.
    pub fn set_order(&mut self, id: ObjectId, order: u64) {
        let parent = self.parent(id);
        if let Some(object) = self.object_mut(id) {
            object.set_order_raw(order);
        }
        self.rebalance_orders(parent);
    }

    /// Collision pass over one sibling set (children of `parent`, or the
    /// roots when `None`): a colliding object is reassigned
    /// `max(existing orders) + 1`.
    pub fn rebalance_orders(&mut self, parent: Option<ObjectId>) {
        let siblings = self.sibling_set(parent);
        let mut seen: FxHashSet<u64> = FxHashSet::default();
        let mut max_order = siblings
            .iter()
            .filter_map(|id| self.find_object(*id))
            .map(Object::order)
            .max()
            .unwrap_or(0);

        for id in siblings {
            let Some(object) = self.object_mut(id) else {
                continue;
            };
            if seen.contains(&object.order()) {
                max_order += 1;
                object.set_order_raw(max_order);
            }
            seen.insert(object.order());
        }
    }

    /// Compacting renumber of one sibling set: 0..n by current order,
    /// preserving relative order.
    pub fn normalize_orders(&mut self, parent: Option<ObjectId>) {
        let mut siblings = self.sibling_set(parent);
        siblings.sort_by_key(|id| self.find_object(*id).map_or(0, Object::order));
        for (index, id) in siblings.into_iter().enumerate() {
            if let Some(object) = self.object_mut(id) {
                object.set_order_raw(index as u64);
            }
        }
    }

    fn sibling_set(&self, parent: Option<ObjectId>) -> Vec<ObjectId> {
        match parent {
            Some(p) => self.children(p),
            None => self
                .objects
                .iter()
                .map(Object::id)
                .filter(|id| !self.parents.contains_key(id))
                .collect(),
        }
    }

    fn next_order_among(&self, parent: Option<ObjectId>) -> u64 {
        self.sibling_set(parent)
            .iter()
            .filter_map(|id| self.find_object(*id))
            .map(Object::order)
            .max()
            .map_or(0, |max| max + 1)
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// The registry for `T`, if this scene has instantiated it.
    #[must_use]
    pub fn registry_of<T: Component>(&self) -> Option<&ComponentsRegistry<T>> {
        self.registries
            .get(T::NAME)
            .map(|handle| handle.downcast_ref().expect("registry type mismatch"))
    }

    /// The registry for `T`, created lazily on first use.
    ///
    /// # Panics
    /// Panics if `T` was never registered (a wiring bug, see
    /// [`GlobalComponentsRegistry`]).
    pub fn registry_of_mut<T: Component>(&mut self) -> &mut ComponentsRegistry<T> {
        let ops = GlobalComponentsRegistry::ops_of::<T>();
        self.registries
            .entry(T::NAME)
            .or_insert_with(|| (ops.make_registry)())
            .downcast_mut()
            .expect("registry type mismatch")
    }

    /// Attaches a default-constructed `T` to `id` (keeping an existing one),
    /// returning a mutable reference to it.
    pub fn add_component<T: Component>(&mut self, id: ObjectId) -> &mut T {
        let registry = self.registry_of_mut::<T>();
        if !registry.contains(id) {
            registry.insert(id, T::default());
        }
        registry.get_mut(id).expect("just inserted")
    }

    /// Attaches (or replaces) a component value on `id`.
    pub fn insert_component<T: Component>(&mut self, id: ObjectId, component: T) {
        self.registry_of_mut::<T>().insert(id, component);
    }

    #[must_use]
    pub fn get_component<T: Component>(&self, id: ObjectId) -> Option<&T> {
        self.registry_of::<T>()?.get(id)
    }

    pub fn get_component_mut<T: Component>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.registries
            .get_mut(T::NAME)?
            .downcast_mut::<ComponentsRegistry<T>>()
            .expect("registry type mismatch")
            .get_mut(id)
    }

    #[must_use]
    pub fn has_component<T: Component>(&self, id: ObjectId) -> bool {
        self.registry_of::<T>().is_some_and(|r| r.contains(id))
    }

    pub fn remove_component<T: Component>(&mut self, id: ObjectId) -> Option<T> {
        self.registries
            .get_mut(T::NAME)?
            .downcast_mut::<ComponentsRegistry<T>>()
            .expect("registry type mismatch")
            .remove(id)
    }

    /// All (id, component) pairs of type `T` (renderer enumeration path).
    pub fn iter_components<T: Component>(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.registry_of::<T>()
            .into_iter()
            .flat_map(ComponentsRegistry::iter)
    }

    /// Attaches a default component by type name (inspector "add component"
    /// path). Returns `false` for an unknown type name or object.
    pub fn add_component_by_name(&mut self, name: &str, id: ObjectId) -> bool {
        if self.find_object(id).is_none() {
            return false;
        }
        let Some((static_name, ops)) = GlobalComponentsRegistry::ops_entry(name) else {
            log::warn!("add_component_by_name: unknown component type '{name}'");
            return false;
        };
        let handle = self
            .registries
            .entry(static_name)
            .or_insert_with(|| (ops.make_registry)());
        (ops.insert_default)(handle.as_mut(), id);
        true
    }

    /// Presence check by type name (inspector checkbox state). `false` for
    /// unknown type names and for objects without the component.
    #[must_use]
    pub fn has_component_by_name(&self, name: &str, id: ObjectId) -> bool {
        if let Some(ops) = GlobalComponentsRegistry::ops(name)
            && let Some(handle) = self.registries.get(name)
        {
            return (ops.contains)(handle.as_ref(), id);
        }
        false
    }

    /// Removes a component by type name. No-op for unknown names.
    pub fn remove_component_by_name(&mut self, name: &str, id: ObjectId) {
        if let Some(ops) = GlobalComponentsRegistry::ops(name)
            && let Some(handle) = self.registries.get_mut(name)
        {
            (ops.delete)(handle.as_mut(), id);
        }
    }

    // ========================================================================
    // Transform composition
    // ========================================================================

    /// World matrix of `id`: the composition of every ancestor's local
    /// transform down to the object itself. Objects without a Transform
    /// contribute identity.
    #[must_use]
    pub fn world_transform(&self, id: ObjectId) -> Mat4 {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        let mut world = Mat4::IDENTITY;
        for node in chain.into_iter().rev() {
            if let Some(transform) = self.get_component::<Transform>(node) {
                world *= transform.local_matrix();
            }
        }
        world
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the scene: object identities, the children adjacency,
    /// every registered component table and the asset store.
    ///
    /// Every registered type appears under `"components"`; types this scene
    /// never instantiated serialize as an empty array.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let objects: Vec<Value> = self.objects.iter().map(Object::to_json).collect();

        // BTreeMap gives a stable key order in the saved file.
        let mut children: BTreeMap<String, Value> = BTreeMap::new();
        for (parent, kids) in &self.children {
            if kids.is_empty() {
                continue;
            }
            let ids: Vec<Value> = kids
                .iter()
                .map(|id| Value::String(id.to_string()))
                .collect();
            children.insert(parent.to_string(), Value::Array(ids));
        }

        let mut components = Map::new();
        for (name, ops) in GlobalComponentsRegistry::snapshot() {
            let table = match self.registries.get(name) {
                Some(handle) => (ops.serialize)(handle.as_ref()),
                None => Value::Array(Vec::new()),
            };
            components.insert(name.to_string(), table);
        }

        json!({
            "objects": objects,
            "children": children,
            "components": components,
            "assets": AssetProvider::global().to_json(),
        })
    }

    /// Restores a scene from a persisted file.
    ///
    /// Phase 1 reconstructs all object identities; phase 2 rebuilds the
    /// adjacency; phase 3 runs every registered component deserializer with
    /// a resolver over the now-live id set; phase 4 restores the asset
    /// store. Unknown component-type keys are ignored so newer files load
    /// on older builds.
    pub fn from_json(json: &Value) -> Result<Self> {
        let root = json.as_object().ok_or(SandboxError::NotAnObject)?;
        let mut scene = Self::new();

        // Phase 1: identities only. Components need all objects to exist.
        if let Some(objects) = root.get("objects").and_then(Value::as_array) {
            for record in objects {
                scene.objects.push(Object::from_json(record));
            }
        }

        // Phase 2: adjacency.
        if let Some(children) = root.get("children").and_then(Value::as_object) {
            for (parent_str, kids) in children {
                let Ok(parent) = Uuid::parse_str(parent_str) else {
                    log::warn!("children map: ignoring unparseable parent id '{parent_str}'");
                    continue;
                };
                if scene.find_object(parent).is_none() {
                    log::warn!("children map: ignoring unknown parent {parent}");
                    continue;
                }
                for kid in kids.as_array().map_or(&[][..], Vec::as_slice) {
                    let Some(child) = kid.as_str().and_then(|s| Uuid::parse_str(s).ok()) else {
                        continue;
                    };
                    if scene.find_object(child).is_none() {
                        log::warn!("children map: ignoring unknown child {child}");
                        continue;
                    }
                    if child == parent
                        || scene.parents.contains_key(&child)
                        || scene.is_ancestor_of(child, parent)
                    {
                        log::warn!("children map: ignoring invalid link {parent} -> {child}");
                        continue;
                    }
                    scene.children.entry(parent).or_default().push(child);
                    scene.parents.insert(child, parent);
                }
            }
        }

        // Phase 3: components, against the live id set.
        let ids: FxHashSet<ObjectId> = scene.objects.iter().map(Object::id).collect();
        let resolve = |id: ObjectId| ids.contains(&id);
        let empty = Map::new();
        let components = root
            .get("components")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        for (name, ops) in GlobalComponentsRegistry::snapshot() {
            let table = components.get(name).cloned().unwrap_or(Value::Array(Vec::new()));
            scene
                .registries
                .insert(name, (ops.deserialize)(&table, &resolve));
        }
        for name in components.keys() {
            if !GlobalComponentsRegistry::is_registered(name) {
                log::debug!("ignoring unknown component type '{name}' in scene file");
            }
        }

        // Phase 4: asset store.
        if let Some(assets) = root.get("assets") {
            AssetProvider::global().load_json(assets)?;
        }

        Ok(scene)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
