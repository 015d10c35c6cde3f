//! Input path configuration.
//!
//! The viewer consumes three filesystem inputs: the class specification
//! CSV, the raw image tree, and the label tree. Defaults follow the
//! conventional layout under the working directory and each path can be
//! overridden independently at runtime.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Data directory name under the base directory.
const DATA_DIR: &str = "data";
/// Default class specification filename.
const CLASS_SPEC_FILE: &str = "class_specification.csv";
/// Default image subdirectory.
const IMAGES_DIR: &str = "images";
/// Default label subdirectory.
const LABELS_DIR: &str = "labels";

/// The three filesystem inputs of a viewer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    /// Class specification CSV
    pub class_spec: PathBuf,
    /// Root of the raw image tree
    pub images: PathBuf,
    /// Root of the label tree
    pub labels: PathBuf,
}

/// Conventional layout under the current working directory:
/// `data/class_specification.csv`, `data/images`, `data/labels`.
impl Default for DataPaths {
    fn default() -> Self {
        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::under(&base)
    }
}

impl DataPaths {
    /// Conventional layout under `base`.
    pub fn under(base: &Path) -> Self {
        let data = base.join(DATA_DIR);
        Self {
            class_spec: data.join(CLASS_SPEC_FILE),
            images: data.join(IMAGES_DIR),
            labels: data.join(LABELS_DIR),
        }
    }

    /// Override the class specification path.
    pub fn with_class_spec(mut self, path: impl Into<PathBuf>) -> Self {
        self.class_spec = path.into();
        self
    }

    /// Override the image tree root.
    pub fn with_images(mut self, path: impl Into<PathBuf>) -> Self {
        self.images = path.into();
        self
    }

    /// Override the label tree root.
    pub fn with_labels(mut self, path: impl Into<PathBuf>) -> Self {
        self.labels = path.into();
        self
    }

    /// Save the configured paths as pretty-printed JSON.
    ///
    /// Only the paths are persisted; the dataset itself is re-scanned on
    /// every load.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ViewerError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Saved data paths to {path:?}");
        Ok(())
    }

    /// Load previously saved paths from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ViewerError> {
        if !path.is_file() {
            return Err(ViewerError::not_found(path));
        }
        let json = std::fs::read_to_string(path)?;
        let paths = serde_json::from_str(&json)?;
        log::info!("Loaded data paths from {path:?}");
        Ok(paths)
    }
}
