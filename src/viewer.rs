//! Viewer session facade.
//!
//! Ties the pipeline together for a rendering layer: load the class
//! specification, scan and pair the two trees, index class presence,
//! filter by the current selection, and composite overlays on demand.
//! Every query returns data; nothing here draws.

use image::RgbaImage;

use crate::cache::{IndexCache, IndexKey};
use crate::class_spec::{ClassEntry, ClassSpec};
use crate::color::ClassColor;
use crate::config::DataPaths;
use crate::error::ViewerError;
use crate::filter::{SelectionState, filter_entries};
use crate::index::PresenceIndex;
use crate::notice::Notice;
use crate::overlay;
use crate::scan::{DatasetEntry, pair_by_stem, scan_images};

/// One viewer session over a configured dataset.
///
/// Construction is cheap; call [`Viewer::reload`] to run the pipeline.
/// Pipeline problems never poison the session: they are collected as
/// [`Notice`]s and the affected stage degrades to empty output.
#[derive(Debug, Default)]
pub struct Viewer {
    paths: DataPaths,
    class_spec: Option<ClassSpec>,
    cache: IndexCache,
    selection: SelectionState,
    notices: Vec<Notice>,
}

impl Viewer {
    /// Create a session over the given input paths.
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }

    /// The input paths currently in effect.
    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Replace the input paths and drop the cached index. The new paths
    /// take effect on the next [`Viewer::reload`].
    pub fn set_paths(&mut self, paths: DataPaths) {
        self.paths = paths;
        self.cache.invalidate();
    }

    /// Run the pipeline: load the class specification, scan and pair both
    /// trees, and rebuild the presence index unless the dataset snapshot
    /// is unchanged since the previous build.
    pub fn reload(&mut self) {
        self.notices.clear();

        // The index does not depend on the class specification, so a
        // failure here only empties the class list.
        self.class_spec = match ClassSpec::load(&self.paths.class_spec) {
            Ok(spec) => Some(spec),
            Err(err) => {
                log::warn!("Class specification unavailable: {err}");
                self.notices
                    .push(Notice::error(err.to_string()).with_path(&self.paths.class_spec));
                None
            }
        };

        let images = match scan_images(&self.paths.images) {
            Ok(paths) => paths,
            Err(err) => {
                self.notices
                    .push(Notice::error(err.to_string()).with_path(&self.paths.images));
                Vec::new()
            }
        };
        let labels = match scan_images(&self.paths.labels) {
            Ok(paths) => paths,
            Err(err) => {
                self.notices
                    .push(Notice::error(err.to_string()).with_path(&self.paths.labels));
                Vec::new()
            }
        };
        self.notices.push(Notice::info(format!(
            "There are {} images and {} labels",
            images.len(),
            labels.len()
        )));

        let entries =
            match pair_by_stem(&self.paths.images, &self.paths.labels, &images, &labels) {
                Ok(entries) => entries,
                Err(err) => {
                    // A misaligned dataset must not be browsable at all;
                    // serving the previous index would show stale pairs.
                    log::warn!("Pairing failed: {err}");
                    self.notices.push(Notice::error(err.to_string()));
                    self.cache.invalidate();
                    return;
                }
            };

        let key = IndexKey::compute(&self.paths.images, &self.paths.labels, &images, &labels);
        if self.cache.lookup(key).is_none() {
            let index = PresenceIndex::build_parallel(entries);
            self.cache.store(key, index);
        } else {
            log::info!("Dataset listing unchanged, reusing presence index");
        }

        let skipped = self.skipped_count();
        if skipped > 0 {
            self.notices.push(Notice::warning(format!(
                "Skipped {skipped} label(s) that failed to decode"
            )));
        }
    }

    /// Ordered class list for swatch rendering.
    ///
    /// Driven by the class specification alone: classes never observed in
    /// any label stay listed and selectable (they simply filter everything
    /// out), and [`Viewer::is_observed`] lets a UI grey them out.
    pub fn classes(&self) -> &[ClassEntry] {
        match &self.class_spec {
            Some(spec) => spec.entries(),
            None => &[],
        }
    }

    /// The loaded class specification, if the last reload found one.
    pub fn class_spec(&self) -> Option<&ClassSpec> {
        self.class_spec.as_ref()
    }

    /// Whether a class color occurs in at least one indexed label.
    pub fn is_observed(&self, color: &ClassColor) -> bool {
        self.index()
            .is_some_and(|index| index.columns().contains(color))
    }

    /// The current presence index, if one has been built.
    pub fn index(&self) -> Option<&PresenceIndex> {
        self.cache.peek()
    }

    /// Check or uncheck one class for filtering.
    pub fn set_selected(&mut self, color: ClassColor, selected: bool) {
        self.selection.set_selected(color, selected);
    }

    /// Whether a class is currently checked.
    pub fn is_selected(&self, color: &ClassColor) -> bool {
        self.selection.is_selected(color)
    }

    /// Uncheck all classes.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The current selection and transparency.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Set the overlay transparency, clamped to `[0, 1]`.
    pub fn set_transparency(&mut self, value: f32) {
        self.selection.set_transparency(value);
    }

    /// The current overlay transparency.
    pub fn transparency(&self) -> f32 {
        self.selection.transparency()
    }

    /// Entries whose labels contain every selected class, in row order.
    ///
    /// Empty before the first reload and when the last reload failed.
    pub fn eligible_entries(&self) -> Vec<&DatasetEntry> {
        match self.index() {
            Some(index) => filter_entries(index, self.selection.selected()),
            None => Vec::new(),
        }
    }

    /// Composite one entry's image and label at the current transparency.
    pub fn compose_entry(&self, entry: &DatasetEntry) -> Result<RgbaImage, ViewerError> {
        overlay::compose(&entry.image, &entry.label, self.selection.transparency())
    }

    /// Notices produced by the most recent reload, in pipeline order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Entries excluded from the current index because their label failed
    /// to decode.
    pub fn skipped_count(&self) -> usize {
        self.index().map_or(0, |index| index.skipped().len())
    }

    /// Index cache statistics as `(hits, misses)`.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }
}

/// Paths that were saved with [`DataPaths::save_to_file`] can seed a
/// session directly.
impl From<DataPaths> for Viewer {
    fn from(paths: DataPaths) -> Self {
        Self::new(paths)
    }
}
