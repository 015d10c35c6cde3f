//! Class specification registry.
//!
//! The class specification is a small CSV resource mapping each class color
//! to a human-readable name:
//!
//! ```text
//! ClassColor,ClassName
//! "255,0,0",Road
//! "0,255,0",Tree
//! ```
//!
//! Color fields embed commas, so they are double-quoted in the file. Row
//! order is preserved because it drives the display order of the class
//! list. A color listed twice keeps its original position and takes the
//! last name.

use std::collections::HashMap;
use std::path::Path;

use crate::color::ClassColor;
use crate::error::ViewerError;

/// Required header for the color column.
const COLOR_COLUMN: &str = "ClassColor";
/// Required header for the name column.
const NAME_COLUMN: &str = "ClassName";

/// One row of the class specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Color that paints the class in label rasters
    pub color: ClassColor,
    /// Human-readable class name
    pub name: String,
}

/// Ordered mapping from class color to class name.
#[derive(Debug, Clone, Default)]
pub struct ClassSpec {
    entries: Vec<ClassEntry>,
    by_color: HashMap<ClassColor, usize>,
}

impl ClassSpec {
    /// Load a class specification from a CSV file.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        if !path.is_file() {
            return Err(ViewerError::not_found(path));
        }
        let text = std::fs::read_to_string(path)?;
        let spec = Self::from_csv(&text)?;
        log::info!("Loaded {} classes from {:?}", spec.len(), path);
        Ok(spec)
    }

    /// Parse a class specification from CSV text.
    ///
    /// The header row must contain both `ClassColor` and `ClassName`
    /// columns (extra columns are ignored). Any row with an unparseable
    /// color or too few fields fails the whole load.
    pub fn from_csv(text: &str) -> Result<Self, ViewerError> {
        let mut lines = text.lines();
        let header = lines.next().unwrap_or("");
        let columns = split_record(header);
        let color_idx = find_column(&columns, COLOR_COLUMN)?;
        let name_idx = find_column(&columns, NAME_COLUMN)?;

        let mut spec = Self::default();
        for (row, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_record(line);
            if fields.len() <= color_idx.max(name_idx) {
                return Err(ViewerError::format(format!(
                    "class specification row {} has {} field(s), expected at least {}",
                    row + 2,
                    fields.len(),
                    color_idx.max(name_idx) + 1
                )));
            }
            let color: ClassColor = fields[color_idx].trim().parse().inspect_err(|err| {
                log::warn!("Class specification row {}: {}", row + 2, err);
            })?;
            spec.insert(color, fields[name_idx].trim());
        }
        Ok(spec)
    }

    /// Insert a class, keeping the position but replacing the name of an
    /// existing entry with the same color.
    pub fn insert(&mut self, color: ClassColor, name: impl Into<String>) {
        let name = name.into();
        match self.by_color.get(&color) {
            Some(&idx) => self.entries[idx].name = name,
            None => {
                self.by_color.insert(color, self.entries.len());
                self.entries.push(ClassEntry { color, name });
            }
        }
    }

    /// Entries in specification order.
    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    /// Name registered for a color, if any.
    pub fn name_of(&self, color: &ClassColor) -> Option<&str> {
        self.by_color
            .get(color)
            .map(|&idx| self.entries[idx].name.as_str())
    }

    /// Whether a color is listed in the specification.
    pub fn contains(&self, color: &ClassColor) -> bool {
        self.by_color.contains_key(color)
    }

    /// Colors in specification order.
    pub fn colors(&self) -> impl Iterator<Item = ClassColor> + '_ {
        self.entries.iter().map(|entry| entry.color)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the specification is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn find_column(columns: &[String], name: &'static str) -> Result<usize, ViewerError> {
    columns
        .iter()
        .position(|column| column.trim() == name)
        .ok_or(ViewerError::Schema { column: name })
}

/// Split one CSV record into fields, honoring double-quoted fields with
/// embedded commas and doubled quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "ClassColor,ClassName\n\"255,0,0\",Road\n\"0,255,0\",Tree\n";

    #[test]
    fn test_parse_preserves_row_order() {
        let spec = ClassSpec::from_csv(CSV).unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.entries()[0].name, "Road");
        assert_eq!(spec.entries()[0].color, ClassColor::new(255, 0, 0));
        assert_eq!(spec.entries()[1].name, "Tree");
    }

    #[test]
    fn test_parse_reordered_columns() {
        let csv = "ClassName,ClassColor\nRoad,\"255,0,0\"\n";
        let spec = ClassSpec::from_csv(csv).unwrap();
        assert_eq!(spec.name_of(&ClassColor::new(255, 0, 0)), Some("Road"));
    }

    #[test]
    fn test_parse_extra_columns_ignored() {
        let csv = "Id,ClassColor,ClassName\n7,\"1,2,3\",Water\n";
        let spec = ClassSpec::from_csv(csv).unwrap();
        assert_eq!(spec.name_of(&ClassColor::new(1, 2, 3)), Some("Water"));
    }

    #[test]
    fn test_missing_color_column() {
        let err = ClassSpec::from_csv("Color,ClassName\n").unwrap_err();
        assert!(matches!(
            err,
            ViewerError::Schema {
                column: "ClassColor"
            }
        ));
    }

    #[test]
    fn test_missing_name_column() {
        let err = ClassSpec::from_csv("ClassColor\n\"1,2,3\"\n").unwrap_err();
        assert!(matches!(err, ViewerError::Schema { column: "ClassName" }));
    }

    #[test]
    fn test_bad_color_fails_load() {
        let csv = "ClassColor,ClassName\n\"255,0\",Road\n";
        assert!(matches!(
            ClassSpec::from_csv(csv),
            Err(ViewerError::Format { .. })
        ));
    }

    #[test]
    fn test_short_row_fails_load() {
        let csv = "ClassColor,ClassName\n\"255,0,0\"\n";
        assert!(matches!(
            ClassSpec::from_csv(csv),
            Err(ViewerError::Format { .. })
        ));
    }

    #[test]
    fn test_duplicate_color_last_wins_keeps_position() {
        let csv = "ClassColor,ClassName\n\"1,2,3\",First\n\"9,9,9\",Other\n\"1,2,3\",Second\n";
        let spec = ClassSpec::from_csv(csv).unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.entries()[0].name, "Second");
        assert_eq!(spec.entries()[1].name, "Other");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "ClassColor,ClassName\n\n\"1,2,3\",Water\n   \n";
        let spec = ClassSpec::from_csv(csv).unwrap();
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_quoted_name_with_comma() {
        let csv = "ClassColor,ClassName\n\"1,2,3\",\"Water, still\"\n";
        let spec = ClassSpec::from_csv(csv).unwrap();
        assert_eq!(spec.name_of(&ClassColor::new(1, 2, 3)), Some("Water, still"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClassSpec::load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        drop(file);

        let spec = ClassSpec::load(&path).unwrap();
        assert!(spec.contains(&ClassColor::new(0, 255, 0)));
        assert_eq!(spec.name_of(&ClassColor::new(0, 255, 0)), Some("Tree"));
    }
}
