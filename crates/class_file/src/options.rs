/// Major version of Java 25 class files.
pub const LATEST_MAJOR_VERSION: u16 = 69;

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Limits applied while reading a class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Class files with a newer major version are rejected.
    pub max_major_version: u16,
    /// How deep arrays and nested annotations may go inside one element value.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_major_version: LATEST_MAJOR_VERSION,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_major_version(mut self, max_major_version: u16) -> Self {
        self.max_major_version = max_major_version;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}
