//! trellis-editor-core: Pure Rust document editor logic without framework
//! dependencies.
//!
//! This crate provides:
//! - `DocTree` - arena-backed document tree with stable `NodeId` handles
//! - `Editor` - the operation pipeline: change tracking, tree mutation,
//!   invariant normalization to fixpoint
//! - `EditorPlugin` / `PluginRegistry` - composable per-node-type
//!   capabilities (normalization, rendering, decorations, input handling)
//! - `default_plugins()` - the stock plugin set for every node kind
//! - Structural commands and change emission for incremental draft saves

pub mod changes;
pub mod commands;
pub mod editor;
pub mod events;
pub mod op;
pub mod plugin;
pub mod plugins;
pub mod selection;
mod transforms;
pub mod tree;
pub mod uri;

pub use changes::{ChangeLog, ChangeOp, DocumentChange};
pub use commands::BlockType;
pub use editor::Editor;
pub use events::{EventKind, InputEvent, InputIntent, Key, KeyEvent, Modifiers};
pub use op::Operation;
pub use plugin::{
    Decoration, EditorPlugin, ElementView, LeafView, NormalizeOutcome, PluginRegistry,
};
pub use plugins::default_plugins;
pub use selection::{Point, Selection};
pub use smol_str::SmolStr;
pub use tree::{DocTree, NodeId, NodeKind, Path};
pub use uri::{DocRef, UriError};
