/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Indices of the chapters the command touched
    pub changed_chapters: Vec<usize>,
    pub version: u64,
}
