//! High-level editing commands.
//!
//! Commands sit on top of the primitive transforms: each one runs inside a
//! `without_normalizing` scope so the invariant chain sees the final shape
//! once, and returns `false` when the document offers nothing to act on.

use trellis_ast::{Element, GroupKind, Mark, Node};

use crate::changes::ChangeOp;
use crate::editor::Editor;
use crate::selection::Point;
use crate::tree::{NodeId, NodeKind};

/// Target type for retyping a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Statement,
    Heading,
    Blockquote,
    Code,
}

impl Editor {
    // === Block-level ===

    /// Retype a flow block in place, keeping its id and children. Heading
    /// conversions also retype the content child, since headings hold
    /// static content.
    pub fn set_type(&mut self, block: NodeId, ty: BlockType) -> bool {
        let kind = self.tree.kind(block);
        let Some(id) = kind.block_id().cloned() else {
            return false;
        };
        let lang = match kind {
            NodeKind::Code { lang, .. } => lang.clone(),
            _ => None,
        };
        let new_kind = match ty {
            BlockType::Statement => NodeKind::Statement { id },
            BlockType::Heading => NodeKind::Heading { id },
            BlockType::Blockquote => NodeKind::Blockquote { id },
            BlockType::Code => NodeKind::Code { id, lang },
        };
        if *self.tree.kind(block) == new_kind {
            return false;
        }

        self.without_normalizing(|editor| {
            editor.set_kind(block, new_kind);
            if let Some(content) = editor.tree.first_child(block) {
                let content_kind = editor.tree.kind(content).clone();
                match (ty, content_kind) {
                    (BlockType::Heading, NodeKind::Paragraph) => {
                        editor.set_kind(content, NodeKind::StaticParagraph);
                    }
                    (
                        BlockType::Statement | BlockType::Blockquote | BlockType::Code,
                        NodeKind::StaticParagraph,
                    ) => {
                        editor.set_kind(content, NodeKind::Paragraph);
                    }
                    _ => {}
                }
            }
        });
        true
    }

    /// Retype the group holding `block` (list toggling).
    pub fn set_list(&mut self, block: NodeId, kind: GroupKind) -> bool {
        let Some(parent) = self.tree.parent(block) else {
            return false;
        };
        if !self.tree.kind(parent).is_group() {
            return false;
        }
        if self.tree.kind(parent).group_kind() == Some(&kind) {
            return false;
        }
        self.set_kind(parent, NodeKind::Group(kind));
        true
    }

    /// Move a block one nesting level up, to just after the block that
    /// contained it. Its old following siblings become its children so the
    /// visual order survives. No-op for top-level blocks.
    pub fn promote_block(&mut self, block: NodeId) -> bool {
        if !self.tree.kind(block).is_flow() {
            return false;
        }
        let Some(parent_block) = self.tree.flow_above(block) else {
            return false;
        };
        let Some(source_group) = self.tree.parent(block) else {
            return false;
        };
        let Some(dest_group) = self.tree.parent(parent_block) else {
            return false;
        };
        let dest_index = self
            .tree
            .index_in_parent(parent_block)
            .expect("block has an index")
            + 1;
        let source_index = self.tree.index_in_parent(block).expect("block has an index");
        let following: Vec<NodeId> = self.tree.children(source_group)[source_index + 1..].to_vec();
        let group_kind = self
            .tree
            .kind(source_group)
            .group_kind()
            .cloned()
            .unwrap_or(GroupKind::Group);

        self.without_normalizing(|editor| {
            editor.move_node(block, dest_group, dest_index);
            if !following.is_empty() {
                let container = editor.trailing_group(block, group_kind);
                let base = editor.tree.child_count(container);
                for (i, sibling) in following.into_iter().enumerate() {
                    editor.move_node(sibling, container, base + i);
                }
            }
        });
        true
    }

    /// Move a block one nesting level down, under its previous sibling.
    /// No-op for a group's first block.
    pub fn demote_block(&mut self, block: NodeId) -> bool {
        if !self.tree.kind(block).is_flow() {
            return false;
        }
        let Some(prev) = self.tree.prev_sibling(block) else {
            return false;
        };
        if !self.tree.kind(prev).is_flow() {
            return false;
        }
        let group_kind = self
            .tree
            .parent(block)
            .and_then(|g| self.tree.kind(g).group_kind().cloned())
            .unwrap_or(GroupKind::Group);

        self.without_normalizing(|editor| {
            let container = editor.trailing_group(prev, group_kind);
            let index = editor.tree.child_count(container);
            editor.move_node(block, container, index);
        });
        true
    }

    /// The group that holds a block's nested children, created on demand as
    /// the block's last child.
    fn trailing_group(&mut self, block: NodeId, kind: GroupKind) -> NodeId {
        if let Some(last) = self.tree.last_child(block) {
            if self.tree.kind(last).is_group() {
                return last;
            }
        }
        let index = self.tree.child_count(block);
        self.insert_kind(block, index, NodeKind::Group(kind))
    }

    // === Marks ===

    /// Toggle a mark over the current selection: off if every selected leaf
    /// carries it, on otherwise. No-op without an expanded selection.
    pub fn toggle_mark(&mut self, mark: Mark) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if sel.is_collapsed() {
            return false;
        }
        let (start, end) = self.ordered_selection(sel);
        let active = self
            .leaves_between(start, end)
            .iter()
            .filter(|leaf| {
                self.tree
                    .leaf_text(**leaf)
                    .is_some_and(|t| !t.is_empty())
            })
            .all(|leaf| {
                self.tree
                    .leaf_marks(*leaf)
                    .is_some_and(|marks| marks.has(mark))
            });
        self.set_marks_range(sel, |marks| marks.set(mark, !active));
        true
    }

    /// Set or clear the text color over the current selection.
    pub fn set_color(&mut self, color: Option<&str>) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if sel.is_collapsed() {
            return false;
        }
        let color = color.map(smol_str::SmolStr::from);
        self.set_marks_range(sel, move |marks| marks.color = color.clone());
        true
    }

    // === Inline elements ===

    /// Insert an inline element at a collapsed selection, splitting the
    /// leaf there.
    pub fn insert_inline(&mut self, el: &Element) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if !sel.is_collapsed() {
            return false;
        }
        let at = sel.anchor;
        let Some(parent) = self.tree.parent(at.node) else {
            return false;
        };
        if self.tree.leaf_text(at.node).is_none() {
            return false;
        }

        self.without_normalizing(|editor| {
            let index = editor
                .tree
                .index_in_parent(at.node)
                .expect("leaf has an index");
            let index = match editor.split_text_leaf(at.node, at.offset) {
                Some(right) if right == at.node => index,
                _ => index + 1,
            };
            let node = editor.tree.build_subtree(&Node::Element(el.clone()));
            editor.apply(crate::op::Operation::InsertNode {
                parent,
                index,
                node,
            });
        });
        true
    }

    /// Wrap the selected text in a link. A collapsed selection inserts the
    /// URL as a new link instead.
    pub fn wrap_link(&mut self, url: &str) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if sel.is_collapsed() {
            return self.insert_inline(&trellis_ast::builder::link(
                url,
                vec![trellis_ast::builder::text(url).into()],
            ));
        }
        let (start, end) = self.ordered_selection(sel);

        self.without_normalizing(|editor| {
            let leaves = editor.split_range_leaves(start, end);
            let Some(first) = leaves.first().copied() else {
                return;
            };
            let parent = editor.tree.parent(first).expect("leaf has a parent");
            let index = editor
                .tree
                .index_in_parent(first)
                .expect("leaf has an index");
            let link = editor.tree.alloc(NodeKind::Link { url: url.into() });
            editor.apply(crate::op::Operation::InsertNode {
                parent,
                index,
                node: link,
            });
            for (i, leaf) in leaves.into_iter().enumerate() {
                editor.move_node(leaf, link, i);
            }
        });
        true
    }

    /// Replace the link around the selection with its text.
    pub fn unwrap_link(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let Some(link) = self
            .tree
            .above(sel.anchor.node, |kind| {
                matches!(kind, NodeKind::Link { .. })
            })
            .or_else(|| {
                matches!(self.tree.kind(sel.anchor.node), NodeKind::Link { .. })
                    .then_some(sel.anchor.node)
            })
        else {
            return false;
        };
        self.unwrap_node(link);
        true
    }

    // === Document metadata ===

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
        self.changes.add(ChangeOp::SetTitle(title.to_owned()));
    }

    pub fn set_subtitle(&mut self, subtitle: &str) {
        self.subtitle = subtitle.to_owned();
        self.changes.add(ChangeOp::SetSubtitle(subtitle.to_owned()));
    }

    // === Selection helpers ===

    /// The flow block containing the selection anchor.
    pub fn selected_block(&self) -> Option<NodeId> {
        let sel = self.selection?;
        self.tree.enclosing_flow(sel.anchor.node)
    }

    /// Collapse the selection to the start of a block's first leaf.
    pub fn select_block_start(&mut self, block: NodeId) {
        let leaf = self
            .tree
            .descendants(block)
            .into_iter()
            .find(|n| self.tree.kind(*n).is_text());
        if let Some(leaf) = leaf {
            self.set_selection(Some(crate::selection::Selection::collapsed(Point::new(
                leaf, 0,
            ))));
        }
    }
}
