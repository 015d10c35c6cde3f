//! Severity-tagged reports for the rendering layer.
//!
//! Pipeline problems like a missing class specification, an unreadable
//! scan root, or a corrupt label must reach the user without taking the
//! session down. The viewer collects them as notices; whatever draws the
//! UI decides how to surface them.

use std::path::PathBuf;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeSeverity {
    /// Informational, not a problem
    Info,
    /// Something was skipped or degraded
    Warning,
    /// A pipeline stage could not run
    Error,
}

/// One report produced while loading or indexing a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity level
    pub severity: NoticeSeverity,
    /// Human-readable message
    pub message: String,
    /// Path this notice relates to, if any
    pub path: Option<PathBuf>,
}

impl Notice {
    /// Create a notice with the given severity.
    pub fn new(severity: NoticeSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            path: None,
        }
    }

    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Info, message)
    }

    /// Warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Warning, message)
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Error, message)
    }

    /// Attach the path the notice relates to.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        assert_eq!(Notice::info("x").severity, NoticeSeverity::Info);
        assert_eq!(Notice::warning("x").severity, NoticeSeverity::Warning);
        assert_eq!(Notice::error("x").severity, NoticeSeverity::Error);
    }

    #[test]
    fn test_with_path() {
        let notice = Notice::error("unreadable").with_path("/data/labels");
        assert_eq!(notice.path.as_deref(), Some(std::path::Path::new("/data/labels")));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(NoticeSeverity::Info < NoticeSeverity::Warning);
        assert!(NoticeSeverity::Warning < NoticeSeverity::Error);
    }
}
