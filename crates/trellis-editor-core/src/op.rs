//! Low-level tree mutation operations.
//!
//! Every primitive transform constructs one of these and routes it through
//! `Editor::apply`, where the change-tracking overlay observes it before the
//! tree mutates.

use crate::selection::Selection;
use crate::tree::{NodeId, NodeKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Attach an already-allocated (detached) subtree under `parent`.
    InsertNode {
        parent: NodeId,
        index: usize,
        node: NodeId,
    },
    /// Detach and free a subtree.
    RemoveNode { node: NodeId },
    /// Re-parent a subtree. `index` is relative to the destination child
    /// list after the node has been detached.
    MoveNode {
        node: NodeId,
        parent: NodeId,
        index: usize,
    },
    /// Replace a node's payload wholesale, keeping its children.
    SetNode { node: NodeId, kind: NodeKind },
    /// Splice text into a leaf at a character offset.
    InsertText {
        node: NodeId,
        offset: usize,
        text: String,
    },
    /// Remove `len` characters from a leaf at a character offset.
    RemoveText {
        node: NodeId,
        offset: usize,
        len: usize,
    },
    /// Replace the selection. Has no change-record equivalent.
    SetSelection { selection: Option<Selection> },
}

impl Operation {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InsertNode { .. } => "insert_node",
            Operation::RemoveNode { .. } => "remove_node",
            Operation::MoveNode { .. } => "move_node",
            Operation::SetNode { .. } => "set_node",
            Operation::InsertText { .. } => "insert_text",
            Operation::RemoveText { .. } => "remove_text",
            Operation::SetSelection { .. } => "set_selection",
        }
    }
}
