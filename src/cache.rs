//! Content-addressed caching for the presence index.
//!
//! Rebuilding the index decodes every label raster, which dominates reload
//! cost. The cache keys the finished index on a hash of the resolved scan
//! roots and the sorted file listings, so reloading an unchanged dataset
//! reuses the previous build while any added, removed, or renamed file
//! forces a rebuild.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::index::PresenceIndex;

/// Cache key: hash of the resolved input roots and the listing snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey(u64);

impl IndexKey {
    /// Compute the key for one dataset snapshot.
    pub fn compute(
        image_root: &Path,
        label_root: &Path,
        images: &[PathBuf],
        labels: &[PathBuf],
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        resolved(image_root).hash(&mut hasher);
        resolved(label_root).hash(&mut hasher);
        images.hash(&mut hasher);
        labels.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Resolve symlinks and relative components where possible, falling back
/// to the path as given so a missing root still yields a stable key.
fn resolved(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Single-slot cache for the most recently built [`PresenceIndex`].
#[derive(Debug, Default)]
pub struct IndexCache {
    slot: Option<(IndexKey, PresenceIndex)>,
    hits: u64,
    misses: u64,
}

impl IndexCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached index, if it was built for `key`.
    pub fn lookup(&mut self, key: IndexKey) -> Option<&PresenceIndex> {
        match &self.slot {
            Some((cached, index)) if *cached == key => {
                self.hits += 1;
                log::debug!("Index cache hit ({} rows)", index.len());
                Some(index)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a freshly built index under `key`, returning a reference to it.
    pub fn store(&mut self, key: IndexKey, index: PresenceIndex) -> &PresenceIndex {
        let (_, stored) = self.slot.insert((key, index));
        stored
    }

    /// The most recently stored index, regardless of key.
    pub fn peek(&self) -> Option<&PresenceIndex> {
        self.slot.as_ref().map(|(_, index)| index)
    }

    /// Drop the cached index.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that required a rebuild.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_key_is_stable() {
        let images = vec![PathBuf::from("images/a.png"), PathBuf::from("images/b.png")];
        let labels = vec![PathBuf::from("labels/a.png"), PathBuf::from("labels/b.png")];

        let first = IndexKey::compute(Path::new("images"), Path::new("labels"), &images, &labels);
        let second = IndexKey::compute(Path::new("images"), Path::new("labels"), &images, &labels);
        assert_eq!(first, second);
    }

    #[test]
    fn test_key_tracks_listing_changes() {
        let root_i = Path::new("images");
        let root_l = Path::new("labels");
        let images = vec![PathBuf::from("images/a.png")];
        let labels = vec![PathBuf::from("labels/a.png")];

        let base = IndexKey::compute(root_i, root_l, &images, &labels);

        let mut added = images.clone();
        added.push(PathBuf::from("images/b.png"));
        assert_ne!(base, IndexKey::compute(root_i, root_l, &added, &labels));

        let renamed = vec![PathBuf::from("images/z.png")];
        assert_ne!(base, IndexKey::compute(root_i, root_l, &renamed, &labels));
    }

    #[test]
    fn test_key_resolves_root_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("images");
        fs::create_dir_all(&root).unwrap();
        let dotted = dir.path().join(".").join("images");

        let images: Vec<PathBuf> = Vec::new();
        let a = IndexKey::compute(&root, &root, &images, &images);
        let b = IndexKey::compute(&dotted, &root, &images, &images);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_hit_and_miss_counters() {
        let mut cache = IndexCache::new();
        let images = vec![PathBuf::from("images/a.png")];
        let key = IndexKey::compute(Path::new("i"), Path::new("l"), &images, &images);

        assert!(cache.lookup(key).is_none());
        cache.store(key, PresenceIndex::default());
        assert!(cache.lookup(key).is_some());

        let other = IndexKey::compute(Path::new("i"), Path::new("l"), &[], &[]);
        assert!(cache.lookup(other).is_none());

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_invalidate_clears_slot() {
        let mut cache = IndexCache::new();
        let key = IndexKey::compute(Path::new("i"), Path::new("l"), &[], &[]);
        cache.store(key, PresenceIndex::default());
        assert!(cache.peek().is_some());

        cache.invalidate();
        assert!(cache.peek().is_none());
        assert!(cache.lookup(key).is_none());
    }
}
