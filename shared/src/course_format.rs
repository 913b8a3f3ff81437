//! Course container format layout.
//!
//! `CourseFormat` is the single source of truth for entry names inside a
//! level archive and for the fixed directory geometry of a course blob.
//!
//! # Example
//!
//! ```
//! use course_shared::COURSE_FORMAT;
//!
//! assert_eq!(COURSE_FORMAT.course_name(1), "course1.bin");
//! assert_eq!(COURSE_FORMAT.layer_name(2, 0), "course2_bgdatL0.bin");
//! ```

/// Naming and layout constants for course containers.
#[derive(Debug, Clone, Copy)]
pub struct CourseFormat {
    /// Entry name prefix shared by course and layer entries (e.g. "course")
    pub prefix: &'static str,

    /// Entry extension without dot (e.g. "bin")
    pub extension: &'static str,

    /// Infix between area number and layer index (e.g. "_bgdatL")
    pub layer_infix: &'static str,

    /// Number of (offset, length) slots in the directory
    pub block_count: usize,

    /// Highest 1-based area number a level may hold
    pub max_areas: u8,

    /// Object layers per area
    pub layer_count: usize,
}

impl CourseFormat {
    pub const fn new(
        prefix: &'static str,
        extension: &'static str,
        layer_infix: &'static str,
        block_count: usize,
        max_areas: u8,
        layer_count: usize,
    ) -> Self {
        Self {
            prefix,
            extension,
            layer_infix,
            block_count,
            max_areas,
            layer_count,
        }
    }

    /// Directory size in bytes (8 bytes per slot)
    pub const fn directory_size(&self) -> usize {
        self.block_count * 8
    }

    /// Entry name of an area's course blob
    pub fn course_name(&self, area: u8) -> String {
        format!("{}{}.{}", self.prefix, area, self.extension)
    }

    /// Entry name of one of an area's object layers
    pub fn layer_name(&self, area: u8, layer: usize) -> String {
        format!(
            "{}{}{}{}.{}",
            self.prefix, area, self.layer_infix, layer, self.extension
        )
    }
}

/// Course container format: `course<N>.bin` + `course<N>_bgdatL{0,1,2}.bin`,
/// a 15-slot directory, up to 4 areas per level.
pub const COURSE_FORMAT: CourseFormat = CourseFormat::new("course", "bin", "_bgdatL", 15, 4, 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_size() {
        assert_eq!(COURSE_FORMAT.directory_size(), 0x78);
    }

    #[test]
    fn test_entry_names() {
        assert_eq!(COURSE_FORMAT.course_name(4), "course4.bin");
        assert_eq!(COURSE_FORMAT.layer_name(1, 2), "course1_bgdatL2.bin");
    }
}
