//! Class-presence index over the paired dataset.
//!
//! For every dataset entry the label raster is decoded once and its
//! distinct pixel colors are recorded. The index answers "which entries
//! contain class X" without touching the filesystem again. A label that
//! fails to decode does not abort the build: the entry is skipped,
//! recorded, and reported, so one corrupt file cannot take down the whole
//! dataset.

use std::collections::BTreeSet;
use std::path::Path;

use rayon::prelude::*;

use crate::color::ClassColor;
use crate::error::ViewerError;
use crate::scan::DatasetEntry;

/// Presence of one class color in one entry's label.
///
/// Absence is missing data rather than boolean false: an AND-filter drops
/// rows with an absent cell outright instead of comparing against a
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The color occurs in at least one pixel of the label
    Present,
    /// The color does not occur in the label
    Absent,
}

impl Presence {
    /// True for [`Presence::Present`].
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// One row of the presence index: a dataset entry plus the set of class
/// colors observed in its label raster.
#[derive(Debug, Clone)]
pub struct PresenceRow {
    /// The image/label pair this row describes
    pub entry: DatasetEntry,
    colors: BTreeSet<ClassColor>,
}

impl PresenceRow {
    /// Presence of `color` in this row's label.
    pub fn presence(&self, color: &ClassColor) -> Presence {
        if self.colors.contains(color) {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    /// Colors observed in this row's label, in sorted order.
    pub fn colors(&self) -> impl Iterator<Item = &ClassColor> {
        self.colors.iter()
    }
}

/// A dataset entry excluded from the index because its label failed to
/// decode.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    /// The excluded entry
    pub entry: DatasetEntry,
    /// Rendered decoder failure
    pub message: String,
}

/// Presence of every observed class color across every dataset entry.
#[derive(Debug, Clone, Default)]
pub struct PresenceIndex {
    rows: Vec<PresenceRow>,
    columns: BTreeSet<ClassColor>,
    skipped: Vec<SkippedEntry>,
}

impl PresenceIndex {
    /// Build the index by decoding labels sequentially.
    pub fn build(entries: Vec<DatasetEntry>) -> Self {
        let results: Vec<_> = entries
            .into_iter()
            .map(|entry| (label_colors(&entry.label), entry))
            .collect();
        Self::from_results(results)
    }

    /// Build the index with label decoding fanned out across the rayon
    /// thread pool.
    ///
    /// Entries are independent, so this is a pure speedup: the result is
    /// identical to [`PresenceIndex::build`], including row order.
    pub fn build_parallel(entries: Vec<DatasetEntry>) -> Self {
        let results: Vec<_> = entries
            .into_par_iter()
            .map(|entry| (label_colors(&entry.label), entry))
            .collect();
        Self::from_results(results)
    }

    fn from_results(results: Vec<(Result<BTreeSet<ClassColor>, ViewerError>, DatasetEntry)>) -> Self {
        let mut index = Self::default();
        for (result, entry) in results {
            match result {
                Ok(colors) => {
                    index.columns.extend(colors.iter().copied());
                    index.rows.push(PresenceRow { entry, colors });
                }
                Err(err) => {
                    log::warn!("Skipping {:?}: {err}", entry.label);
                    index.skipped.push(SkippedEntry {
                        entry,
                        message: err.to_string(),
                    });
                }
            }
        }
        log::info!(
            "Indexed {} label(s): {} class color(s) observed, {} skipped",
            index.rows.len(),
            index.columns.len(),
            index.skipped.len()
        );
        index
    }

    /// Indexed rows, in pairing order.
    pub fn rows(&self) -> &[PresenceRow] {
        &self.rows
    }

    /// Union of class colors observed across all labels, in sorted order.
    pub fn columns(&self) -> &BTreeSet<ClassColor> {
        &self.columns
    }

    /// Entries excluded because their label failed to decode.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Enumerate the distinct colors in a label raster.
///
/// The raster is converted to 8-bit RGB first, so palette and grayscale
/// masks are handled transparently. Pixel counts are discarded; presence
/// is binary.
pub fn label_colors(path: &Path) -> Result<BTreeSet<ClassColor>, ViewerError> {
    let label = image::open(path).map_err(|source| ViewerError::decode(path, source))?;
    let rgb = label.to_rgb8();

    let mut colors = BTreeSet::new();
    for pixel in rgb.pixels() {
        colors.insert(ClassColor::from(*pixel));
    }

    log::trace!("{path:?}: {} distinct color(s)", colors.len());
    Ok(colors)
}
