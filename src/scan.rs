//! Dataset discovery and image/label pairing.
//!
//! Images and labels live in two independent directory trees. Both are
//! walked recursively and files with a `.png`, `.jpg`, or `.jpeg`
//! extension (case-sensitive) are collected in sorted order. Pairing
//! between the two trees is explicit: the path relative to the scan root,
//! minus the extension, must match exactly. Anything unmatched is an
//! error, because silently zipping two sorted listings misassigns every
//! label after the first gap.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ViewerError;

/// File extensions recognized as dataset rasters.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One paired dataset sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Pairing key: path relative to the scan root, minus the extension
    pub stem: String,
    /// Path to the raw image
    pub image: PathBuf,
    /// Path to the label raster
    pub label: PathBuf,
}

/// Recursively collect raster files under `root`, sorted by path.
///
/// Subdirectories are descended into and symlinks are followed. Entries
/// the walker cannot read are logged and skipped. Fails with
/// [`ViewerError::NotFound`] when `root` is not a directory.
pub fn scan_images(root: &Path) -> Result<Vec<PathBuf>, ViewerError> {
    if !root.is_dir() {
        return Err(ViewerError::not_found(root));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry under {root:?}: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && is_dataset_image(entry.path()) {
            paths.push(entry.path().to_path_buf());
        }
    }

    // Walk order is platform-dependent; sort for determinism.
    paths.sort();
    paths.dedup();

    log::debug!("Scanned {:?}: {} raster file(s)", root, paths.len());
    Ok(paths)
}

/// Whether a path carries one of the recognized raster extensions.
///
/// The match is case-sensitive: `IMG.PNG` is not picked up.
fn is_dataset_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// Partition of two scans into stem-matched pairs and leftovers.
#[derive(Debug, Default)]
pub struct StemPairing {
    /// Matched entries, ordered by stem
    pub entries: Vec<DatasetEntry>,
    /// Image files whose stem has no counterpart under the label root
    pub images_only: Vec<PathBuf>,
    /// Label files whose stem has no counterpart under the image root
    pub labels_only: Vec<PathBuf>,
}

impl StemPairing {
    /// Match two scans by relative stem without failing on leftovers.
    ///
    /// Two files in the same tree claiming one stem (for example
    /// `city/42.png` next to `city/42.jpg`) is still an error, because the
    /// pair would be ambiguous.
    pub fn collect(
        image_root: &Path,
        label_root: &Path,
        images: &[PathBuf],
        labels: &[PathBuf],
    ) -> Result<Self, ViewerError> {
        let image_stems = index_by_stem(image_root, images)?;
        let mut label_stems = index_by_stem(label_root, labels)?;

        let mut pairing = Self::default();
        for (stem, image) in image_stems {
            match label_stems.remove(&stem) {
                Some(label) => pairing.entries.push(DatasetEntry { stem, image, label }),
                None => pairing.images_only.push(image),
            }
        }
        pairing.labels_only.extend(label_stems.into_values());
        Ok(pairing)
    }

    /// Whether every file found a counterpart.
    pub fn is_complete(&self) -> bool {
        self.images_only.is_empty() && self.labels_only.is_empty()
    }
}

/// Pair image and label scans one-to-one by relative stem.
///
/// Fails with [`ViewerError::UnpairedStems`] if any file on either side
/// lacks a counterpart, and with [`ViewerError::DuplicateStem`] if one
/// stem is claimed twice within a tree.
pub fn pair_by_stem(
    image_root: &Path,
    label_root: &Path,
    images: &[PathBuf],
    labels: &[PathBuf],
) -> Result<Vec<DatasetEntry>, ViewerError> {
    let pairing = StemPairing::collect(image_root, label_root, images, labels)?;
    if !pairing.is_complete() {
        return Err(ViewerError::UnpairedStems {
            images_only: pairing.images_only,
            labels_only: pairing.labels_only,
        });
    }
    log::debug!("Paired {} image/label entries", pairing.entries.len());
    Ok(pairing.entries)
}

fn index_by_stem(
    root: &Path,
    paths: &[PathBuf],
) -> Result<BTreeMap<String, PathBuf>, ViewerError> {
    let mut by_stem = BTreeMap::new();
    for path in paths {
        let Some(stem) = stem_of(root, path) else {
            log::warn!("Ignoring {path:?}: outside scan root {root:?}");
            continue;
        };
        if let Some(first) = by_stem.insert(stem.clone(), path.clone()) {
            return Err(ViewerError::DuplicateStem {
                stem,
                first,
                second: path.clone(),
            });
        }
    }
    Ok(by_stem)
}

/// Pairing key of `path`: its path relative to `root`, minus the extension.
fn stem_of(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(relative.with_extension("").to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound { .. }));
    }

    #[test]
    fn test_scan_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.png"));
        touch(&root.join("a/deep/c.jpeg"));
        touch(&root.join("a/d.jpg"));
        touch(&root.join("notes.txt"));

        let paths = scan_images(root).unwrap();
        assert_eq!(
            paths,
            vec![
                root.join("a/d.jpg"),
                root.join("a/deep/c.jpeg"),
                root.join("b.png"),
            ]
        );
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for name in ["z.png", "m.jpg", "a.jpeg"] {
            touch(&root.join(name));
        }
        assert_eq!(scan_images(root).unwrap(), scan_images(root).unwrap());
    }

    #[test]
    fn test_scan_extension_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("upper.PNG"));
        touch(&root.join("lower.png"));

        let paths = scan_images(root).unwrap();
        assert_eq!(paths, vec![root.join("lower.png")]);
    }

    #[test]
    fn test_pairing_matches_by_relative_stem() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        touch(&images.join("city/42.jpg"));
        touch(&images.join("city/7.png"));
        touch(&labels.join("city/42.png"));
        touch(&labels.join("city/7.png"));

        let image_paths = scan_images(&images).unwrap();
        let label_paths = scan_images(&labels).unwrap();
        let entries = pair_by_stem(&images, &labels, &image_paths, &label_paths).unwrap();

        assert_eq!(entries.len(), 2);
        // Ordered by stem, and extensions may differ across the two trees.
        assert_eq!(entries[0].stem, "city/42");
        assert_eq!(entries[0].image, images.join("city/42.jpg"));
        assert_eq!(entries[0].label, labels.join("city/42.png"));
        assert_eq!(entries[1].stem, "city/7");
    }

    #[test]
    fn test_pairing_fails_on_missing_label() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        touch(&images.join("a.png"));
        touch(&images.join("b.png"));
        touch(&labels.join("a.png"));

        let image_paths = scan_images(&images).unwrap();
        let label_paths = scan_images(&labels).unwrap();
        let err = pair_by_stem(&images, &labels, &image_paths, &label_paths).unwrap_err();

        match err {
            ViewerError::UnpairedStems {
                images_only,
                labels_only,
            } => {
                assert_eq!(images_only, vec![images.join("b.png")]);
                assert!(labels_only.is_empty());
            }
            other => panic!("expected UnpairedStems, got {other}"),
        }
    }

    #[test]
    fn test_pairing_fails_on_duplicate_stem() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        touch(&images.join("a.png"));
        touch(&images.join("a.jpg"));
        touch(&labels.join("a.png"));

        let image_paths = scan_images(&images).unwrap();
        let label_paths = scan_images(&labels).unwrap();
        let err = pair_by_stem(&images, &labels, &image_paths, &label_paths).unwrap_err();
        assert!(matches!(err, ViewerError::DuplicateStem { .. }));
    }

    #[test]
    fn test_collect_partitions_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        touch(&images.join("a.png"));
        touch(&labels.join("a.png"));
        touch(&labels.join("extra.png"));

        let image_paths = scan_images(&images).unwrap();
        let label_paths = scan_images(&labels).unwrap();
        let pairing =
            StemPairing::collect(&images, &labels, &image_paths, &label_paths).unwrap();

        assert!(!pairing.is_complete());
        assert_eq!(pairing.entries.len(), 1);
        assert_eq!(pairing.labels_only, vec![labels.join("extra.png")]);
    }

    #[test]
    fn test_empty_trees_pair_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&labels).unwrap();

        let entries = pair_by_stem(&images, &labels, &[], &[]).unwrap();
        assert!(entries.is_empty());
    }
}
