pub mod editing;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod serializer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, Patch, query::*, transforms::*};
pub use error::{DuplicateNumber, EditError, TransformPrecondition};
pub use io::*;
pub use models::*;
pub use parsing::{parse, parse_with, snapshot::outline};
pub use serializer::{normalize_whitespace, serialize, serialize_runs};
