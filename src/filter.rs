//! Class selection and AND-filtering over the presence index.

use std::collections::BTreeSet;

use crate::color::ClassColor;
use crate::index::PresenceIndex;
use crate::scan::DatasetEntry;

/// Default overlay transparency.
pub const DEFAULT_TRANSPARENCY: f32 = 0.4;

/// The set of checked class colors plus the overlay transparency.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: BTreeSet<ClassColor>,
    transparency: f32,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}

impl SelectionState {
    /// Empty selection at the default transparency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck one class color.
    pub fn set_selected(&mut self, color: ClassColor, selected: bool) {
        if selected {
            self.selected.insert(color);
        } else {
            self.selected.remove(&color);
        }
    }

    /// Whether a class color is checked.
    pub fn is_selected(&self, color: &ClassColor) -> bool {
        self.selected.contains(color)
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// The checked colors, in sorted order.
    pub fn selected(&self) -> &BTreeSet<ClassColor> {
        &self.selected
    }

    /// Set the overlay transparency, clamped to `[0, 1]`. NaN is ignored.
    pub fn set_transparency(&mut self, value: f32) {
        if !value.is_nan() {
            self.transparency = value.clamp(0.0, 1.0);
        }
    }

    /// Current overlay transparency.
    pub fn transparency(&self) -> f32 {
        self.transparency
    }
}

/// Entries whose labels contain **all** selected colors.
///
/// An empty selection selects everything. A row lacking even one selected
/// color is dropped; absence is missing data, not a false value to compare
/// against. Row order is preserved. Pure function over in-memory data, no
/// I/O.
pub fn filter_entries<'a>(
    index: &'a PresenceIndex,
    selected: &BTreeSet<ClassColor>,
) -> Vec<&'a DatasetEntry> {
    index
        .rows()
        .iter()
        .filter(|row| selected.iter().all(|color| row.presence(color).is_present()))
        .map(|row| &row.entry)
        .collect()
}
