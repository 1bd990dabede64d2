//! Container normalization.
//!
//! Groups exist to hold blocks. An empty group (or one holding nothing but
//! empty text runs) disappears, a group nested directly in another group
//! dissolves into it, and loose phrasing content gets promoted into a
//! statement of its own.

use trellis_ast::BlockId;

use crate::editor::Editor;
use crate::op::Operation;
use crate::plugin::{EditorPlugin, NormalizeOutcome};
use crate::tree::{NodeId, NodeKind};

pub struct GroupPlugin;

impl EditorPlugin for GroupPlugin {
    fn name(&self) -> &'static str {
        "group"
    }

    fn normalize(&self, editor: &mut Editor, node: NodeId) -> NormalizeOutcome {
        if !editor.tree().kind(node).is_group() {
            return NormalizeOutcome::Continue;
        }

        if is_effectively_empty(editor, node) {
            editor.apply(Operation::RemoveNode { node });
            return NormalizeOutcome::Changed;
        }

        // A group directly inside a group says nothing; merge it.
        if let Some(parent) = editor.tree().parent(node) {
            if editor.tree().kind(parent).is_group() {
                editor.unwrap_node(node);
                return NormalizeOutcome::Changed;
            }
        }

        // Loose phrasing content in a group becomes a statement.
        let stray = editor
            .tree()
            .children(node)
            .iter()
            .copied()
            .find(|child| editor.tree().kind(*child).is_phrasing());
        if let Some(stray) = stray {
            wrap_in_statement(editor, node, stray);
            return NormalizeOutcome::Changed;
        }

        NormalizeOutcome::Continue
    }
}

fn is_effectively_empty(editor: &Editor, node: NodeId) -> bool {
    editor.tree().children(node).iter().all(|child| {
        editor
            .tree()
            .leaf_text(*child)
            .is_some_and(|text| text.is_empty())
    })
}

/// Wrap the contiguous phrasing run starting at `from` in a fresh
/// statement with a paragraph content child.
fn wrap_in_statement(editor: &mut Editor, group: NodeId, from: NodeId) {
    let start = editor
        .tree()
        .index_in_parent(from)
        .expect("child has an index");
    let run: Vec<NodeId> = editor.tree().children(group)[start..]
        .iter()
        .copied()
        .take_while(|child| editor.tree().kind(*child).is_phrasing())
        .collect();

    editor.without_normalizing(|editor| {
        let statement = editor.tree.alloc(NodeKind::Statement {
            id: BlockId::generate(),
        });
        let content = editor.tree.alloc(NodeKind::Paragraph);
        for (i, child) in run.iter().enumerate() {
            editor.apply(Operation::MoveNode {
                node: *child,
                parent: content,
                index: i,
            });
        }
        editor.apply(Operation::InsertNode {
            parent: statement,
            index: 0,
            node: content,
        });
        editor.apply(Operation::InsertNode {
            parent: group,
            index: start,
            node: statement,
        });
    });
}
