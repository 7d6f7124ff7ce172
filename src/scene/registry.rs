//! Component storage and type erasure
//!
//! Component types share no common base type. Cross-cutting operations
//! (serialize, deserialize, delete, copy) are instead driven through
//! [`GlobalComponentsRegistry`]: a process-wide table keyed by component
//! type name, each entry holding monomorphized function pointers that
//! operate on an opaque `dyn Any` handle to that type's
//! [`ComponentsRegistry`]. This lets [`Scene`](crate::scene::Scene)
//! serialize, copy and cascade-delete over every component type in use
//! without knowing the list at compile time.
//!
//! Registration is explicit and idempotent: call
//! [`register_all_components`](crate::components::register_all_components)
//! (or [`GlobalComponentsRegistry::register`] for custom types) once at
//! program start. Requesting storage for an unregistered type is a wiring
//! bug and panics.

use std::any::Any;
use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::scene::ObjectId;

/// Contract for a component type.
///
/// Components are plain serializable data keyed by the id of the object
/// they are attached to. They hold no reference to their owner or scene;
/// logic that needs the hierarchy (e.g. world transform composition) lives
/// on `Scene` and resolves ids at use time.
pub trait Component: Serialize + DeserializeOwned + Clone + Default + 'static {
    /// Stable, unique name of this component type; used as the key in the
    /// type-erasure tables and in the persisted `"components"` map.
    const NAME: &'static str;
}

// ============================================================================
// Per-type storage
// ============================================================================

/// Storage for one component type: a mapping from object id to exactly one
/// `T` value. An entry exists for an id iff that object currently has the
/// component.
///
/// Pure keyed storage by design — no business logic, so heterogeneous
/// component types share a completely generic container.
#[derive(Debug, Clone)]
pub struct ComponentsRegistry<T> {
    components: FxHashMap<ObjectId, T>,
}

impl<T> ComponentsRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.components.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.components.get_mut(&id)
    }

    /// Inserts (or replaces) the component for `id`.
    pub fn insert(&mut self, id: ObjectId, component: T) -> Option<T> {
        self.components.insert(id, component)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        self.components.remove(&id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.components.contains_key(&id)
    }

    /// Iterates over all (id, component) pairs, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.components.iter().map(|(id, c)| (*id, c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut T)> {
        self.components.iter_mut().map(|(id, c)| (*id, c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T> Default for ComponentsRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Type-erased operations
// ============================================================================

/// Opaque handle to a `ComponentsRegistry<T>` for some `T` the holder does
/// not know.
pub(crate) type RegistryHandle = Box<dyn Any>;

/// The type-erased operation table for one component type.
///
/// All entries are monomorphized function pointers closing over `T` only
/// through their instantiation, so they are `Copy` and live for the whole
/// program run.
#[derive(Clone, Copy)]
pub(crate) struct ComponentOps {
    /// Creates a fresh, empty registry behind an opaque handle.
    pub make_registry: fn() -> RegistryHandle,
    /// Serializes a registry to a JSON array of `{id, data}` records.
    pub serialize: fn(&dyn Any) -> Value,
    /// Rebuilds a registry from a JSON array. Entries whose id does not
    /// resolve to a live object, or whose data is malformed, are skipped.
    pub deserialize: fn(&Value, &dyn Fn(ObjectId) -> bool) -> RegistryHandle,
    /// Erases the entry for an id, if any.
    pub delete: fn(&mut dyn Any, ObjectId),
    /// Clones the source object's entry onto the destination object, if the
    /// source has one.
    pub copy: fn(&mut dyn Any, ObjectId, ObjectId),
    /// Presence probe.
    pub contains: fn(&dyn Any, ObjectId) -> bool,
    /// Attaches a default-constructed component to an id (inspector "add
    /// component" path).
    pub insert_default: fn(&mut dyn Any, ObjectId),
}

fn downcast<T: Component>(handle: &dyn Any) -> &ComponentsRegistry<T> {
    handle
        .downcast_ref::<ComponentsRegistry<T>>()
        .unwrap_or_else(|| panic!("registry handle for '{}' holds the wrong type", T::NAME))
}

fn downcast_mut<T: Component>(handle: &mut dyn Any) -> &mut ComponentsRegistry<T> {
    handle
        .downcast_mut::<ComponentsRegistry<T>>()
        .unwrap_or_else(|| panic!("registry handle for '{}' holds the wrong type", T::NAME))
}

fn make_registry<T: Component>() -> RegistryHandle {
    Box::new(ComponentsRegistry::<T>::new())
}

fn serialize_registry<T: Component>(handle: &dyn Any) -> Value {
    let registry = downcast::<T>(handle);
    let mut entries: Vec<(String, Value)> = Vec::with_capacity(registry.len());
    for (id, component) in registry.iter() {
        match serde_json::to_value(component) {
            Ok(data) => entries.push((id.to_string(), data)),
            Err(err) => log::error!("{}: failed to serialize component for {id}: {err}", T::NAME),
        }
    }
    // Stable entry order keeps saved files diffable.
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    Value::Array(
        entries
            .into_iter()
            .map(|(id, data)| {
                let mut record = Map::new();
                record.insert("id".into(), Value::String(id));
                record.insert("data".into(), data);
                Value::Object(record)
            })
            .collect(),
    )
}

fn deserialize_registry<T: Component>(
    json: &Value,
    resolve: &dyn Fn(ObjectId) -> bool,
) -> RegistryHandle {
    let mut registry = ComponentsRegistry::<T>::new();
    if let Some(entries) = json.as_array() {
        for entry in entries {
            let Some(id) = entry
                .get("id")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
            else {
                log::warn!("{}: skipping component entry without a valid id", T::NAME);
                continue;
            };
            if !resolve(id) {
                log::warn!("{}: dropping component for unknown object {id}", T::NAME);
                continue;
            }
            let data = entry
                .get("data")
                .cloned()
                .unwrap_or(Value::Object(Map::new()));
            match serde_json::from_value::<T>(data) {
                Ok(component) => {
                    registry.insert(id, component);
                }
                Err(err) => {
                    log::warn!("{}: skipping malformed component for {id}: {err}", T::NAME);
                }
            }
        }
    }
    Box::new(registry)
}

fn delete_component<T: Component>(handle: &mut dyn Any, id: ObjectId) {
    downcast_mut::<T>(handle).remove(id);
}

fn copy_component<T: Component>(handle: &mut dyn Any, from: ObjectId, to: ObjectId) {
    let registry = downcast_mut::<T>(handle);
    if let Some(component) = registry.get(from).cloned() {
        registry.insert(to, component);
    }
}

fn contains_component<T: Component>(handle: &dyn Any, id: ObjectId) -> bool {
    downcast::<T>(handle).contains(id)
}

fn insert_default_component<T: Component>(handle: &mut dyn Any, id: ObjectId) {
    downcast_mut::<T>(handle).insert(id, T::default());
}

// ============================================================================
// Global registration table
// ============================================================================

static OPS_TABLE: LazyLock<RwLock<FxHashMap<&'static str, ComponentOps>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Process-wide table of type-erased component operations, keyed by
/// component type name. Populated once at program start and read for the
/// rest of the run.
pub struct GlobalComponentsRegistry;

impl GlobalComponentsRegistry {
    /// Registers the operation table for `T`. Idempotent per type name.
    pub fn register<T: Component>() {
        let mut table = OPS_TABLE.write();
        table.entry(T::NAME).or_insert(ComponentOps {
            make_registry: make_registry::<T>,
            serialize: serialize_registry::<T>,
            deserialize: deserialize_registry::<T>,
            delete: delete_component::<T>,
            copy: copy_component::<T>,
            contains: contains_component::<T>,
            insert_default: insert_default_component::<T>,
        });
    }

    #[must_use]
    pub fn is_registered(name: &str) -> bool {
        OPS_TABLE.read().contains_key(name)
    }

    /// Names of all registered component types, sorted for deterministic
    /// iteration.
    #[must_use]
    pub fn registered_types() -> Vec<&'static str> {
        let mut names: Vec<_> = OPS_TABLE.read().keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn ops(name: &str) -> Option<ComponentOps> {
        OPS_TABLE.read().get(name).copied()
    }

    /// Like [`Self::ops`], but also yields the interned `'static` key, for
    /// callers that need to store it.
    pub(crate) fn ops_entry(name: &str) -> Option<(&'static str, ComponentOps)> {
        OPS_TABLE
            .read()
            .get_key_value(name)
            .map(|(key, ops)| (*key, *ops))
    }

    /// The operation table for `T`, panicking if `T` was never registered.
    /// An unregistered type is a build-time wiring bug, not a runtime data
    /// problem.
    pub(crate) fn ops_of<T: Component>() -> ComponentOps {
        Self::ops(T::NAME).unwrap_or_else(|| {
            panic!(
                "component type '{}' was never registered; call register_all_components() at startup",
                T::NAME
            )
        })
    }

    /// Snapshot of every registered (name, ops) pair, sorted by name.
    pub(crate) fn snapshot() -> Vec<(&'static str, ComponentOps)> {
        let table = OPS_TABLE.read();
        let mut entries: Vec<_> = table.iter().map(|(name, ops)| (*name, *ops)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }
}
