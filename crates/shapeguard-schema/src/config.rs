/// Controls structural comparison behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareConfig {
    /// Maximum nesting depth walked before the comparison is abandoned.
    pub max_depth: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}
