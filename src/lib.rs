//! Semantic-segmentation dataset viewer core.
//!
//! Pairs raw images with pixel-level label masks, indexes which semantic
//! classes occur in each mask, filters entries by a class selection, and
//! composites image/label overlays at a configurable transparency.
//! Rendering and interaction are left to an external layer: this crate
//! returns data and rasters, it never draws.
//!
//! ```no_run
//! use segview::{DataPaths, Viewer};
//!
//! let mut viewer = Viewer::new(DataPaths::default());
//! viewer.reload();
//! for class in viewer.classes() {
//!     println!("{} {}", class.color.to_hex(), class.name);
//! }
//! for entry in viewer.eligible_entries() {
//!     println!("{}", entry.stem);
//! }
//! ```

mod cache;
mod class_spec;
mod color;
mod config;
mod error;
mod filter;
mod index;
mod notice;
mod overlay;
mod scan;
mod viewer;

pub use cache::{IndexCache, IndexKey};
pub use class_spec::{ClassEntry, ClassSpec};
pub use color::ClassColor;
pub use config::DataPaths;
pub use error::ViewerError;
pub use filter::{DEFAULT_TRANSPARENCY, SelectionState, filter_entries};
pub use index::{Presence, PresenceIndex, PresenceRow, SkippedEntry, label_colors};
pub use notice::{Notice, NoticeSeverity};
pub use overlay::{blend_rgba, compose};
pub use scan::{DatasetEntry, IMAGE_EXTENSIONS, StemPairing, pair_by_stem, scan_images};
pub use viewer::Viewer;
