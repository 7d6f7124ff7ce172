//! Object identity
//!
//! An [`Object`] is an entity handle: a globally unique id plus the
//! bookkeeping the scene browser needs (display name, enabled flag,
//! sibling order). It carries no component data of its own.
//!
//! Objects are created and destroyed only through [`Scene`]; hierarchy and
//! enablement operations live on [`Scene`] as well and take an [`ObjectId`],
//! so an `Object` never holds a pointer back into the scene.
//!
//! [`Scene`]: crate::scene::Scene

use serde_json::{Value, json};
use uuid::Uuid;

/// Stable identifier of an [`Object`] within a running process and in
/// persisted scene files.
pub type ObjectId = Uuid;

pub(crate) const DEFAULT_NAME: &str = "<unnamed>";

/// An entity: identity and bookkeeping, no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    id: ObjectId,
    name: String,
    enabled: bool,
    order: u64,
}

impl Object {
    /// Creates a new object with a fresh id.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            enabled: true,
            order: 0,
        }
    }

    /// Restores identity fields from a persisted record.
    ///
    /// Components are populated later by the registry deserializers, once
    /// every object of the scene exists; this only rebuilds the identity.
    /// Missing or malformed fields fall back to defaults.
    #[must_use]
    pub fn from_json(json: &Value) -> Self {
        let id = json
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        let name = json
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NAME);
        let enabled = json.get("enabled").and_then(Value::as_bool).unwrap_or(true);
        let order = json.get("order").and_then(Value::as_u64).unwrap_or(0);

        Self {
            id,
            name: name.to_string(),
            enabled,
            order,
        }
    }

    /// Serializes the identity fields.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "enabled": self.enabled,
            "order": self.order,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The local enabled flag. Effective visibility also depends on the
    /// ancestors; see [`Scene::is_enabled`](crate::scene::Scene::is_enabled).
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled_local(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Position among siblings; unique within a sibling set after a
    /// rebalancing pass.
    #[inline]
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }

    pub(crate) fn set_order_raw(&mut self, order: u64) {
        self.order = order;
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_from_json_restores_identity() {
        let obj = Object::new("A");
        let restored = Object::from_json(&obj.to_json());
        assert_eq!(restored, obj);
    }

    #[test]
    fn object_from_json_tolerates_missing_fields() {
        let restored = Object::from_json(&json!({ "name": "B" }));
        assert_eq!(restored.name(), "B");
        assert!(restored.enabled());
        assert_eq!(restored.order(), 0);
    }
}
