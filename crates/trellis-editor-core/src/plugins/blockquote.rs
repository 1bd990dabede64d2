//! Blockquote rendering. Shape rules come from the shared block
//! normalization.

use crate::editor::Editor;
use crate::plugin::{EditorPlugin, ElementView};
use crate::tree::{NodeId, NodeKind};

pub struct BlockquotePlugin;

impl EditorPlugin for BlockquotePlugin {
    fn name(&self) -> &'static str {
        "blockquote"
    }

    fn render_element(&self, editor: &Editor, node: NodeId) -> Option<ElementView> {
        match editor.tree().kind(node) {
            NodeKind::Blockquote { id } => Some(
                ElementView::new("blockquote", "blockquote")
                    .with_attr("data-block-id", id.as_str()),
            ),
            _ => None,
        }
    }
}
