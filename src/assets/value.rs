//! Asset payloads
//!
//! [`AssetValue`] is the value type of the content-addressed store:
//! decoded images and opaque byte blobs. The store keeps values sorted, so
//! `AssetValue` carries a total order: type discriminator first, then an
//! image fast path comparing a precomputed xxh3 cache key of the pixel
//! data, and only then a byte-for-byte comparison of the canonical
//! encoding. The generic fallback is correct but slow for large binary
//! payloads; the fast path is valid only for the image shape.

use std::cmp::Ordering;

use xxhash_rust::xxh3::Xxh3;

const TAG_IMAGE: u8 = 1;
const TAG_BLOB: u8 = 2;

/// Id of a stored asset value. Small enough for components to hold freely.
pub type AssetId = u64;

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// xxh3 of dimensions + pixels, computed once at construction.
    cache_key: u64,
}

impl ImageData {
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let mut hasher = Xxh3::new();
        hasher.update(&width.to_le_bytes());
        hasher.update(&height.to_le_bytes());
        hasher.update(&pixels);
        let cache_key = hasher.digest();
        Self {
            width,
            height,
            pixels,
            cache_key,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Opaque key identifying the pixel content; equal images share it.
    #[inline]
    #[must_use]
    pub fn cache_key(&self) -> u64 {
        self.cache_key
    }
}

/// A value held by the asset store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValue {
    Image(ImageData),
    Blob(Vec<u8>),
}

impl AssetValue {
    fn discriminant(&self) -> u8 {
        match self {
            AssetValue::Image(_) => TAG_IMAGE,
            AssetValue::Blob(_) => TAG_BLOB,
        }
    }

    /// Canonical little-endian encoding: tag byte, then fields. This is the
    /// persisted form and the comparator's fallback.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            AssetValue::Image(image) => {
                let mut bytes = Vec::with_capacity(9 + image.pixels.len());
                bytes.push(TAG_IMAGE);
                bytes.extend_from_slice(&image.width.to_le_bytes());
                bytes.extend_from_slice(&image.height.to_le_bytes());
                bytes.extend_from_slice(&image.pixels);
                bytes
            }
            AssetValue::Blob(blob) => {
                let mut bytes = Vec::with_capacity(1 + blob.len());
                bytes.push(TAG_BLOB);
                bytes.extend_from_slice(blob);
                bytes
            }
        }
    }

    /// Decodes a canonical blob. `None` for an unknown tag or truncated
    /// data.
    #[must_use]
    pub fn from_canonical_bytes(bytes: &[u8]) -> Option<Self> {
        let (&tag, rest) = bytes.split_first()?;
        match tag {
            TAG_IMAGE => {
                if rest.len() < 8 {
                    return None;
                }
                let width = u32::from_le_bytes(rest[0..4].try_into().ok()?);
                let height = u32::from_le_bytes(rest[4..8].try_into().ok()?);
                Some(AssetValue::Image(ImageData::new(
                    width,
                    height,
                    rest[8..].to_vec(),
                )))
            }
            TAG_BLOB => Some(AssetValue::Blob(rest.to_vec())),
            _ => None,
        }
    }
}

impl Ord for AssetValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.discriminant()
            .cmp(&other.discriminant())
            .then_with(|| match (self, other) {
                // Fast path: images compare by cache key; the canonical
                // compare below only breaks hash ties.
                (AssetValue::Image(a), AssetValue::Image(b)) => a
                    .cache_key
                    .cmp(&b.cache_key)
                    .then_with(|| self.canonical_bytes().cmp(&other.canonical_bytes())),
                _ => self.canonical_bytes().cmp(&other.canonical_bytes()),
            })
    }
}

impl PartialOrd for AssetValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
