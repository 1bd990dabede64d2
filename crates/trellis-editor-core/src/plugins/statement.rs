//! Block-shape normalization shared by every flow block.
//!
//! These rules keep the block hierarchy legal: blocks live in groups, hold
//! a content child first and at most one trailing group, and dissolve when
//! they degenerate to bare text.

use trellis_ast::GroupKind;

use crate::editor::Editor;
use crate::op::Operation;
use crate::plugin::{EditorPlugin, NormalizeOutcome};
use crate::tree::{NodeId, NodeKind};

pub struct StatementPlugin;

impl EditorPlugin for StatementPlugin {
    fn name(&self) -> &'static str {
        "statement"
    }

    fn normalize(&self, editor: &mut Editor, node: NodeId) -> NormalizeOutcome {
        if !editor.tree().kind(node).is_flow() {
            return NormalizeOutcome::Continue;
        }
        normalize_flow_block(editor, node)
    }
}

/// The shared rules, in priority order. Exactly one fires per pass.
fn normalize_flow_block(editor: &mut Editor, node: NodeId) -> NormalizeOutcome {
    // Degenerate block: nothing inside at all.
    if editor.tree().child_count(node) == 0 {
        editor.apply(Operation::RemoveNode { node });
        return NormalizeOutcome::Changed;
    }

    // Degenerate block: a single bare text run and no structure.
    if editor.tree().child_count(node) == 1 {
        let only = editor.tree().first_child(node).expect("counted above");
        if editor.tree().kind(only).is_text() {
            editor.apply(Operation::RemoveNode { node });
            return NormalizeOutcome::Changed;
        }
        // Sole child is a container: the block adds nothing, lift it out.
        if editor.tree().kind(only).is_group() {
            editor.unwrap_node(node);
            return NormalizeOutcome::Changed;
        }
    }

    if let Some(parent) = editor.tree().parent(node) {
        let parent_kind = editor.tree().kind(parent).clone();
        if parent_kind.is_flow() {
            let first_of_heading = matches!(parent_kind, NodeKind::Heading { .. })
                && editor.tree().is_first_child(node);
            if !first_of_heading {
                // A block nested directly in a block belongs in the
                // parent's trailing group.
                if let Some(container) = trailing_group(editor, parent, node) {
                    let index = editor.tree().child_count(container);
                    editor.move_node(node, container, index);
                    return NormalizeOutcome::Changed;
                }
                match parent_kind {
                    NodeKind::Heading { .. } => {
                        // Headings keep their children in a group.
                        let index = editor.tree().child_count(parent);
                        let container =
                            editor.insert_kind(parent, index, NodeKind::Group(GroupKind::Group));
                        editor.move_node(node, container, 0);
                    }
                    _ => {
                        // Statements and blockquotes push the stray block
                        // out, next to themselves.
                        let grandparent =
                            editor.tree().parent(parent).expect("flow block has a parent");
                        let index = editor
                            .tree()
                            .index_in_parent(parent)
                            .expect("flow block has an index")
                            + 1;
                        editor.move_node(node, grandparent, index);
                    }
                }
                return NormalizeOutcome::Changed;
            }
        }
    }

    // Leading bare text: wrap the phrasing prefix in a content paragraph.
    // (Headings get a staticParagraph from their own plugin first.)
    if !matches!(editor.tree().kind(node), NodeKind::Heading { .. }) {
        if let Some(first) = editor.tree().first_child(node) {
            if editor.tree().kind(first).is_phrasing() {
                wrap_phrasing_prefix(editor, node, NodeKind::Paragraph);
                return NormalizeOutcome::Changed;
            }
        }
    }

    NormalizeOutcome::Continue
}

/// The parent's group child that should hold stray blocks, if any.
fn trailing_group(editor: &Editor, parent: NodeId, skip: NodeId) -> Option<NodeId> {
    editor
        .tree()
        .children(parent)
        .iter()
        .rev()
        .copied()
        .find(|child| *child != skip && editor.tree().kind(*child).is_group())
}

/// Wrap the contiguous phrasing run at the start of `node` in a fresh
/// content child of `kind`.
pub(crate) fn wrap_phrasing_prefix(editor: &mut Editor, node: NodeId, kind: NodeKind) {
    let run: Vec<NodeId> = editor
        .tree()
        .children(node)
        .iter()
        .copied()
        .take_while(|child| editor.tree().kind(*child).is_phrasing())
        .collect();
    editor.without_normalizing(|editor| {
        let content = editor.tree.alloc(kind);
        for (i, child) in run.iter().enumerate() {
            editor.apply(Operation::MoveNode {
                node: *child,
                parent: content,
                index: i,
            });
        }
        editor.apply(Operation::InsertNode {
            parent: node,
            index: 0,
            node: content,
        });
    });
}
