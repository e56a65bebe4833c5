/*!
 * # Editing Core Module
 *
 * Structured editing of a USFM book.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the Document Tree
 * - A [`Document`] owns one typed [`Book`](crate::models::Book) tree
 * - Marker text is only produced on demand by the serializer
 * - **Round-trip**: `parse(text)` then `text()` gives back canonical text
 *
 * ### 2. Command-Based Editing
 * - All edits are **Commands** (`Cmd` enum) addressed by structural paths
 * - Every command validates its paths and offsets first; a rejected command
 *   leaves the tree untouched
 * - Verse transforms (join, unjoin, add, remove) are commands too
 *
 * ### 3. Normalization
 * - After every command the **normalizer** restores the tree invariants
 * - In debug builds the **invariant checker** asserts the result
 *
 * ## Module Structure
 *
 * - **`document`**: Core `Document` type, owner of tree, taxonomy and version
 * - **`commands`**: `Cmd` enum and its validation and application
 * - **`transforms`**: the four verse transforms
 * - **`normalize`**: fixed-point normalizer
 * - **`invariants`**: structural checks over a tree
 * - **`query`**: read-only lookups by position
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use usfm_editor_engine::editing::*;
 * use usfm_editor_engine::models::VersePath;
 *
 * // 1. Parse marker text into a document
 * let mut doc = Document::parse("\\c 1\n\\v 1-2 In the beginning").unwrap();
 *
 * // 2. Apply edits via commands
 * let patch = doc.apply(Cmd::UnjoinVerses { at: VersePath::new(0, 1) }).unwrap();
 * assert_eq!(patch.changed_chapters, vec![0]);
 *
 * // 3. Query by position
 * assert_eq!(query::find_verse(doc.book(), 1, 2), Some(VersePath::new(0, 2)));
 *
 * // 4. Serialize
 * assert_eq!(doc.text(), "\\c 1\n\\v 1 In the beginning\n\\v 2 ");
 * ```
 */

pub mod commands;
pub mod document;
pub mod invariants;
pub mod normalize;
pub mod patch;
pub mod query;
pub mod transforms;

pub use commands::Cmd;
pub use document::Document;
pub use invariants::{Invariant, Violation};
pub use patch::Patch;
