//! Content fingerprints and memo tables for incremental generation.
//!
//! Each pipeline stage stores its outputs in a [`Memo`] keyed by input
//! identity. A stored output is reused when the fingerprint of the new input
//! equals the fingerprint it was computed from.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A 256-bit content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Fingerprint a serializable value through its JSON form.
    pub fn of_value<T: Serialize + ?Sized>(value: &T) -> Self {
        let mut builder = FingerprintBuilder::new();
        builder.value(value);
        builder.finish()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Incremental fingerprint over several parts.
///
/// Every part is length-prefixed so that `("ab", "c")` and `("a", "bc")`
/// produce different fingerprints.
pub struct FingerprintBuilder {
    hasher: blake3::Hasher,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
        }
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    pub fn str(&mut self, text: &str) -> &mut Self {
        self.bytes(text.as_bytes())
    }

    pub fn fingerprint(&mut self, fingerprint: &Fingerprint) -> &mut Self {
        self.bytes(&fingerprint.0)
    }

    /// Add a value through its JSON form.
    pub fn value<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        match serde_json::to_vec(value) {
            Ok(json) => self.bytes(&json),
            // plain data models always serialize; fall back to a marker
            Err(_) => self.str("<unserializable>"),
        }
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint(*self.hasher.finalize().as_bytes())
    }
}

impl Default for FingerprintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit/miss counters for one memo table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    /// Entries reused from a previous run.
    pub reused: usize,
    /// Entries computed in this run.
    pub computed: usize,
}

#[derive(Debug)]
struct MemoEntry<V> {
    fingerprint: Fingerprint,
    value: Arc<V>,
}

/// Memoized outputs keyed by input identity.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: HashMap<K, MemoEntry<V>>,
}

impl<K: Eq + Hash + Clone, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Whether the stored output for `key` was computed from `fingerprint`.
    pub fn is_fresh(&self, key: &K, fingerprint: &Fingerprint) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.fingerprint == *fingerprint)
    }

    /// The stored output for `key`, if it is fresh for `fingerprint`.
    pub fn get_fresh(&self, key: &K, fingerprint: &Fingerprint) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| entry.fingerprint == *fingerprint)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Store an output computed from `fingerprint`.
    pub fn insert(&mut self, key: K, fingerprint: Fingerprint, value: Arc<V>) {
        self.entries.insert(key, MemoEntry { fingerprint, value });
    }

    /// Reuse the stored output or compute and store a new one.
    pub fn get_or_compute(
        &mut self,
        key: &K,
        fingerprint: Fingerprint,
        stats: &mut MemoStats,
        compute: impl FnOnce() -> V,
    ) -> Arc<V> {
        if let Some(value) = self.get_fresh(key, &fingerprint) {
            stats.reused += 1;
            return value;
        }
        stats.computed += 1;
        let value = Arc::new(compute());
        self.insert(key.clone(), fingerprint, Arc::clone(&value));
        value
    }

    /// Drop every entry whose key is not in `live`.
    pub fn retain_keys<'a>(&mut self, live: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let live: std::collections::HashSet<&K> = live.into_iter().collect();
        self.entries.retain(|key, _| live.contains(key));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
