//! trellis-ast: the document tree model for the trellis editor.
//!
//! This crate defines:
//! - The node schema (groups, statements, headings, paragraphs, inlines)
//! - Builder functions that stamp block-level nodes with stable ids
//! - Type predicates used by the editor's normalizer and plugins
//! - The draft hydration payload exchanged with the backing store
//!
//! Builders are pure construction; cross-node invariants are the editor's
//! normalizer's job.

pub mod builder;
pub mod draft;
pub mod id;
pub mod node;

pub use draft::Draft;
pub use id::{BLOCK_ID_LEN, BlockId};
pub use node::{Element, GroupKind, Mark, MarkSet, Node, Text};
pub use smol_str::SmolStr;
