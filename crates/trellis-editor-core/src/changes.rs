//! Change tracking for incremental draft saves.
//!
//! Every operation flowing through `Editor::apply` is mapped to a coarse
//! per-block record before the tree mutates. Consecutive records that would
//! say the same thing collapse, so typing a sentence into one block costs a
//! single `ReplaceBlock`. At save time `transform_changes` turns the records
//! into backend patch entries, resolving block snapshots and positions
//! against the final tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use trellis_ast::{BlockId, Element};

use crate::editor::Editor;
use crate::op::Operation;
use crate::tree::NodeId;

/// One accumulated change record, keyed by block id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeOp {
    /// The block's content changed; resend it whole.
    ReplaceBlock(BlockId),
    /// The block moved to a new position.
    MoveBlock(BlockId),
    /// The block was removed.
    DeleteBlock(BlockId),
    SetTitle(String),
    SetSubtitle(String),
}

impl ChangeOp {
    fn block(&self) -> Option<&BlockId> {
        match self {
            ChangeOp::ReplaceBlock(id) | ChangeOp::MoveBlock(id) | ChangeOp::DeleteBlock(id) => {
                Some(id)
            }
            _ => None,
        }
    }
}

/// The accumulated records between two saves.
#[derive(Debug, Default)]
pub struct ChangeLog {
    entries: Vec<ChangeOp>,
}

impl ChangeLog {
    /// Append a record, collapsing it into the previous one when both say
    /// the same thing. Deletions never collapse.
    pub fn add(&mut self, op: ChangeOp) {
        if let Some(last) = self.entries.last_mut() {
            if should_override(&op, last) {
                *last = op;
                return;
            }
        }
        self.entries.push(op);
    }

    pub fn entries(&self) -> &[ChangeOp] {
        &self.entries
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

fn should_override(new: &ChangeOp, last: &ChangeOp) -> bool {
    match (new, last) {
        (ChangeOp::SetTitle(_), ChangeOp::SetTitle(_)) => true,
        (ChangeOp::SetSubtitle(_), ChangeOp::SetSubtitle(_)) => true,
        (ChangeOp::ReplaceBlock(a), ChangeOp::ReplaceBlock(b)) => a == b,
        (ChangeOp::MoveBlock(a), ChangeOp::MoveBlock(b)) => a == b,
        _ => false,
    }
}

/// A backend patch entry, produced at save time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DocumentChange {
    /// Full snapshot of a changed block.
    ReplaceBlock { block: Element },
    /// New position of a moved block. Empty strings mean "top level" and
    /// "first in its group" respectively.
    #[serde(rename_all = "camelCase")]
    MoveBlock {
        block_id: SmolStr,
        parent: SmolStr,
        left_sibling: SmolStr,
    },
    #[serde(rename_all = "camelCase")]
    DeleteBlock { block_id: SmolStr },
    SetTitle { value: String },
    SetSubtitle { value: String },
}

/// Map an operation to change records, against the pre-mutation tree.
pub(crate) fn record(editor: &mut Editor, op: &Operation) {
    let mut records = Vec::new();
    match op {
        Operation::InsertNode { parent, node, .. } => {
            record_arrival(editor, *node, *parent, &mut records);
        }
        Operation::MoveNode { parent, node, .. } => {
            record_arrival(editor, *node, *parent, &mut records);
        }
        Operation::RemoveNode { node } => {
            let kind = editor.tree.kind(*node);
            if kind.is_group() {
                record_subtree_deletes(editor, *node, &mut records);
            } else if let Some(id) = kind.block_id() {
                records.push(ChangeOp::DeleteBlock(id.clone()));
            } else {
                record_enclosing_replace(editor, *node, &mut records);
            }
        }
        Operation::SetNode { node, kind } => {
            // A retype may carry a fresh id; prefer the incoming one.
            let id = kind
                .block_id()
                .or_else(|| editor.tree.kind(*node).block_id());
            if let Some(id) = id {
                records.push(ChangeOp::ReplaceBlock(id.clone()));
            } else {
                record_enclosing_replace(editor, *node, &mut records);
            }
        }
        Operation::InsertText { node, .. } | Operation::RemoveText { node, .. } => {
            record_enclosing_replace(editor, *node, &mut records);
        }
        Operation::SetSelection { .. } => {}
    }
    for record in records {
        editor.changes.add(record);
    }
}

/// A subtree landing at a new position: flow blocks move and get resent;
/// anything else dirties the destination block.
fn record_arrival(editor: &Editor, node: NodeId, parent: NodeId, records: &mut Vec<ChangeOp>) {
    let kind = editor.tree.kind(node);
    if let Some(id) = kind.block_id() {
        records.push(ChangeOp::MoveBlock(id.clone()));
        records.push(ChangeOp::ReplaceBlock(id.clone()));
        return;
    }
    if kind.is_group() {
        for child in editor.tree.children(node) {
            record_arrival(editor, *child, node, records);
        }
        return;
    }
    match editor.tree.enclosing_flow(parent) {
        Some(block) => {
            if let Some(id) = editor.tree.kind(block).block_id() {
                records.push(ChangeOp::ReplaceBlock(id.clone()));
            }
        }
        None => {
            // Root-level structural churn (the top group) carries no id.
            tracing::debug!(kind = kind.kind_name(), "arrival outside any block");
        }
    }
}

/// Deleting a group deletes every flow block inside it, nested groups
/// included.
fn record_subtree_deletes(editor: &Editor, node: NodeId, records: &mut Vec<ChangeOp>) {
    for child in editor.tree.children(node) {
        let kind = editor.tree.kind(*child);
        if let Some(id) = kind.block_id() {
            records.push(ChangeOp::DeleteBlock(id.clone()));
            record_subtree_deletes(editor, *child, records);
        } else if kind.is_group() {
            record_subtree_deletes(editor, *child, records);
        }
    }
}

fn record_enclosing_replace(editor: &Editor, node: NodeId, records: &mut Vec<ChangeOp>) {
    match editor.tree.enclosing_flow(node) {
        Some(block) => {
            if let Some(id) = editor.tree.kind(block).block_id() {
                records.push(ChangeOp::ReplaceBlock(id.clone()));
            }
        }
        None => {
            tracing::debug!("edit outside any block dropped from the change log");
        }
    }
}

/// Turn the accumulated records into backend patch entries.
///
/// Block entries are emitted in document order of the final tree; deletions
/// go last so a moved-then-deleted neighbor cannot shadow them. Records for
/// blocks that no longer exist are dropped, except deletions.
pub(crate) fn transform_changes(editor: &Editor) -> Vec<DocumentChange> {
    let mut out = Vec::new();
    let mut positioned: Vec<(Vec<usize>, usize, &ChangeOp)> = Vec::new();
    let mut deletes = Vec::new();

    for (seq, entry) in editor.changes.entries().iter().enumerate() {
        match entry {
            ChangeOp::SetTitle(value) => out.push(DocumentChange::SetTitle {
                value: value.clone(),
            }),
            ChangeOp::SetSubtitle(value) => out.push(DocumentChange::SetSubtitle {
                value: value.clone(),
            }),
            ChangeOp::DeleteBlock(id) => deletes.push(DocumentChange::DeleteBlock {
                block_id: id.as_str().into(),
            }),
            ChangeOp::MoveBlock(id) | ChangeOp::ReplaceBlock(id) => {
                let Some(node) = editor.tree.block_by_id(id) else {
                    // Recorded against a block that was later removed; the
                    // delete record supersedes it.
                    continue;
                };
                positioned.push((editor.tree.path_of(node), seq, entry));
            }
        }
    }

    positioned.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    for (_, _, entry) in positioned {
        match entry {
            ChangeOp::MoveBlock(id) => {
                let node = editor.tree.block_by_id(id).expect("checked above");
                out.push(DocumentChange::MoveBlock {
                    block_id: id.as_str().into(),
                    parent: parent_block_id(editor, node),
                    left_sibling: left_sibling_id(editor, node),
                });
            }
            ChangeOp::ReplaceBlock(id) => {
                let node = editor.tree.block_by_id(id).expect("checked above");
                if let Some(block) = editor.tree.to_element(node) {
                    out.push(DocumentChange::ReplaceBlock { block });
                }
            }
            _ => unreachable!("only block positions are sorted"),
        }
    }

    out.extend(deletes);
    out
}

fn parent_block_id(editor: &Editor, node: NodeId) -> SmolStr {
    editor
        .tree
        .flow_above(node)
        .and_then(|block| editor.tree.kind(block).block_id())
        .map(|id| SmolStr::from(id.as_str()))
        .unwrap_or_default()
}

fn left_sibling_id(editor: &Editor, node: NodeId) -> SmolStr {
    editor
        .tree
        .prev_sibling(node)
        .and_then(|prev| editor.tree.kind(prev).block_id())
        .map(|id| SmolStr::from(id.as_str()))
        .unwrap_or_default()
}
