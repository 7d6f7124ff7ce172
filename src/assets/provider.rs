//! Content-addressed asset store
//!
//! Maps arbitrary value payloads to small monotonically increasing ids,
//! with equal values sharing one id. Components hold the id, not the
//! payload. A second cache maps ids to lazily-prepared renderer-side
//! resources; that cache is only invalidated by explicit teardown — the
//! consuming component's dirty flag decides when to prepare again.
//!
//! One provider exists per process ([`AssetProvider::global`]); its
//! contents are persisted inside the scene file under the `"assets"` key.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::assets::value::{AssetId, AssetValue};
use crate::errors::{Result, SandboxError};

/// A renderer-side resource built from a raw asset value.
pub type PreparedAsset = Arc<dyn Any + Send + Sync>;

struct ProviderInner {
    /// Sorted by the two-tier comparator so dedup lookup is a tree search.
    assets: BTreeMap<Arc<AssetValue>, AssetId>,
    prepared: FxHashMap<AssetId, PreparedAsset>,
    next_id: AssetId,
}

static GLOBAL: LazyLock<AssetProvider> = LazyLock::new(AssetProvider::new);

pub struct AssetProvider {
    inner: RwLock<ProviderInner>,
}

impl AssetProvider {
    fn new() -> Self {
        Self {
            inner: RwLock::new(ProviderInner {
                assets: BTreeMap::new(),
                prepared: FxHashMap::default(),
                next_id: 1,
            }),
        }
    }

    /// The process-wide store.
    #[must_use]
    pub fn global() -> &'static AssetProvider {
        &GLOBAL
    }

    /// Stores a value and returns its id. An equal value already in the
    /// store returns the existing id (content deduplication).
    pub fn add(&self, value: AssetValue) -> AssetId {
        let mut inner = self.inner.write();
        if let Some(&id) = inner.assets.get(&value) {
            return id;
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.assets.insert(Arc::new(value), id);
        id
    }

    /// The stored value for `id`, or `None` if absent.
    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<Arc<AssetValue>> {
        let inner = self.inner.read();
        inner
            .assets
            .iter()
            .find(|&(_, &stored)| stored == id)
            .map(|(value, _)| Arc::clone(value))
    }

    #[must_use]
    pub fn has(&self, id: AssetId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().assets.is_empty()
    }

    // ========================================================================
    // Prepared-resource cache
    // ========================================================================

    /// Returns the prepared resource for `id`, building and caching it on
    /// first use. `None` if the id is not in the store.
    ///
    /// The cache never evicts on its own; see [`Self::unload_prepared`].
    pub fn prepare_with(
        &self,
        id: AssetId,
        build: impl FnOnce(&AssetValue) -> PreparedAsset,
    ) -> Option<PreparedAsset> {
        if let Some(prepared) = self.inner.read().prepared.get(&id) {
            return Some(Arc::clone(prepared));
        }
        let value = self.get(id)?;
        let prepared = build(&value);
        self.inner.write().prepared.insert(id, Arc::clone(&prepared));
        Some(prepared)
    }

    /// The cached prepared resource, if one was built.
    #[must_use]
    pub fn prepared(&self, id: AssetId) -> Option<PreparedAsset> {
        self.inner.read().prepared.get(&id).map(Arc::clone)
    }

    /// Explicit teardown of the prepared cache (e.g. GL context loss).
    /// Raw values stay.
    pub fn unload_prepared(&self) {
        self.inner.write().prepared.clear();
    }

    /// Clears everything and resets the id counter. Scene teardown only.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.assets.clear();
        inner.prepared.clear();
        inner.next_id = 1;
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serializes the id → value mapping as base64 canonical blobs keyed by
    /// decimal id.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.inner.read();
        let mut result = Map::new();
        for (value, id) in &inner.assets {
            result.insert(
                id.to_string(),
                Value::String(BASE64.encode(value.canonical_bytes())),
            );
        }
        Value::Object(result)
    }

    /// Restores persisted values, merging into the current store. The id
    /// counter is advanced past the maximum restored id so new `add` calls
    /// never collide with restored ids.
    ///
    /// Entries with unparseable id keys are skipped with a warning;
    /// undecodable blobs are an error (there is no sensible default for a
    /// corrupt payload).
    pub fn load_json(&self, json: &Value) -> Result<()> {
        let Some(entries) = json.as_object() else {
            return Ok(());
        };
        let mut inner = self.inner.write();
        for (key, blob) in entries {
            let Ok(id) = key.parse::<AssetId>() else {
                log::warn!("asset store: skipping unparseable asset id '{key}'");
                continue;
            };
            let encoded = blob.as_str().unwrap_or_default();
            let bytes = BASE64.decode(encoded)?;
            let value = AssetValue::from_canonical_bytes(&bytes)
                .ok_or(SandboxError::MalformedAsset { id })?;
            if id >= inner.next_id {
                inner.next_id = id + 1;
            }
            inner.assets.entry(Arc::new(value)).or_insert(id);
        }
        Ok(())
    }
}
