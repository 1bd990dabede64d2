//! Primitive tree transforms.
//!
//! Thin, composable mutations layered over `Editor::apply`. Structural
//! commands and normalization rules are built from these; nothing here
//! knows about document invariants.

use std::cmp::Ordering;

use trellis_ast::{Element, MarkSet, Node};

use crate::editor::Editor;
use crate::op::Operation;
use crate::selection::{Point, Selection};
use crate::tree::{NodeId, NodeKind};

impl Editor {
    /// Build `el` as a detached subtree and insert it under `parent`.
    pub fn insert_element(&mut self, parent: NodeId, index: usize, el: &Element) -> NodeId {
        let node = self.tree.build_subtree(&Node::Element(el.clone()));
        self.apply(Operation::InsertNode {
            parent,
            index,
            node,
        });
        node
    }

    /// Allocate a bare node of `kind` and insert it under `parent`.
    pub fn insert_kind(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let node = self.tree.alloc(kind);
        self.apply(Operation::InsertNode {
            parent,
            index,
            node,
        });
        node
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.apply(Operation::RemoveNode { node });
    }

    pub fn move_node(&mut self, node: NodeId, parent: NodeId, index: usize) {
        self.apply(Operation::MoveNode {
            node,
            parent,
            index,
        });
    }

    pub fn set_kind(&mut self, node: NodeId, kind: NodeKind) {
        self.apply(Operation::SetNode { node, kind });
    }

    /// Wrap `node` in a fresh container of `kind`, which takes its place.
    pub fn wrap_node(&mut self, node: NodeId, kind: NodeKind) -> NodeId {
        let parent = self.tree.parent(node).expect("cannot wrap the root");
        let index = self.tree.index_in_parent(node).expect("node has an index");
        let container = self.tree.alloc(kind);
        self.without_normalizing(|editor| {
            editor.apply(Operation::InsertNode {
                parent,
                index,
                node: container,
            });
            editor.apply(Operation::MoveNode {
                node,
                parent: container,
                index: 0,
            });
        });
        container
    }

    /// Replace `node` with its own children.
    pub fn unwrap_node(&mut self, node: NodeId) {
        let Some(parent) = self.tree.parent(node) else {
            return;
        };
        let index = self.tree.index_in_parent(node).expect("node has an index");
        let children = self.tree.children(node).to_vec();
        self.without_normalizing(|editor| {
            for (i, child) in children.into_iter().enumerate() {
                // Each move lands just before `node`, which keeps shifting right.
                editor.apply(Operation::MoveNode {
                    node: child,
                    parent,
                    index: index + i,
                });
            }
            editor.apply(Operation::RemoveNode { node });
        });
    }

    pub fn insert_text(&mut self, at: Point, text: &str) {
        self.apply(Operation::InsertText {
            node: at.node,
            offset: at.offset,
            text: text.to_owned(),
        });
    }

    pub fn delete_text(&mut self, node: NodeId, offset: usize, len: usize) {
        self.apply(Operation::RemoveText { node, offset, len });
    }

    /// Split a text leaf so that a leaf boundary falls at `offset`.
    ///
    /// Returns the leaf starting at `offset`: the node itself for
    /// `offset == 0`, `None` when the offset is at or past the end.
    pub fn split_text_leaf(&mut self, node: NodeId, offset: usize) -> Option<NodeId> {
        let text = self.tree.leaf_text(node)?;
        let len = text.chars().count();
        if offset == 0 {
            return Some(node);
        }
        if offset >= len {
            return None;
        }
        let tail: String = text.chars().skip(offset).collect();
        let marks = self.tree.leaf_marks(node).cloned().unwrap_or_default();
        let parent = self.tree.parent(node)?;
        let index = self.tree.index_in_parent(node)?;

        self.apply(Operation::RemoveText {
            node,
            offset,
            len: len - offset,
        });
        let right = self.tree.alloc(NodeKind::Text { text: tail, marks });
        self.apply(Operation::InsertNode {
            parent,
            index: index + 1,
            node: right,
        });
        Some(right)
    }

    // === Points and ranges ===

    /// Document order of two points.
    pub fn cmp_points(&self, a: Point, b: Point) -> Ordering {
        if a.node == b.node {
            return a.offset.cmp(&b.offset);
        }
        self.tree.path_of(a.node).cmp(&self.tree.path_of(b.node))
    }

    /// Selection endpoints in document order.
    pub fn ordered_selection(&self, sel: Selection) -> (Point, Point) {
        match self.cmp_points(sel.anchor, sel.focus) {
            Ordering::Greater => (sel.focus, sel.anchor),
            _ => (sel.anchor, sel.focus),
        }
    }

    /// Text leaves touched by the range, in document order, endpoints
    /// included.
    pub fn leaves_between(&self, start: Point, end: Point) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut in_range = false;
        for node in self.tree.descendants(self.tree.root()) {
            if !self.tree.kind(node).is_text() {
                continue;
            }
            if node == start.node {
                in_range = true;
            }
            if in_range {
                out.push(node);
            }
            if node == end.node {
                break;
            }
        }
        out
    }

    /// Split the boundary leaves of an ordered range so that whole leaves
    /// cover exactly its characters, and return them in document order.
    /// Must run with normalization deferred, or the merge rule undoes the
    /// splits immediately.
    pub(crate) fn split_range_leaves(&mut self, start: Point, end: Point) -> Vec<NodeId> {
        if start.node == end.node {
            // End first, so the start offset stays valid.
            self.split_text_leaf(start.node, end.offset);
            return match self.split_text_leaf(start.node, start.offset) {
                Some(leaf) => vec![leaf],
                None => vec![],
            };
        }
        let mut leaves = self.leaves_between(start, end);
        if let Some(first) = leaves.first().copied() {
            if let Some(split) = self.split_text_leaf(first, start.offset) {
                leaves[0] = split;
            } else {
                leaves.remove(0);
            }
        }
        if let Some(last) = leaves.last().copied() {
            if end.offset == 0 {
                // The range ends before this leaf's first character.
                leaves.pop();
            } else {
                self.split_text_leaf(last, end.offset);
            }
        }
        leaves
    }

    /// Apply a mark mutation over a selection, splitting boundary leaves
    /// so the change covers exactly the selected characters. The selection
    /// is re-pointed at the affected leaves. No-op when collapsed.
    pub fn set_marks_range(&mut self, sel: Selection, f: impl Fn(&mut MarkSet)) {
        if sel.is_collapsed() {
            return;
        }
        let (start, end) = self.ordered_selection(sel);

        self.without_normalizing(|editor| {
            let targets = editor.split_range_leaves(start, end);

            for leaf in &targets {
                let Some(marks) = editor.tree.leaf_marks(*leaf) else {
                    continue;
                };
                let mut marks = marks.clone();
                f(&mut marks);
                let text = editor
                    .tree
                    .leaf_text(*leaf)
                    .map(str::to_owned)
                    .unwrap_or_default();
                editor.set_kind(*leaf, NodeKind::Text { text, marks });
            }

            let new_selection = match (targets.first(), targets.last()) {
                (Some(first), Some(last)) => {
                    let last_len = editor
                        .tree
                        .leaf_text(*last)
                        .map(|t| t.chars().count())
                        .unwrap_or(0);
                    Some(Selection::new(
                        Point::new(*first, 0),
                        Point::new(*last, last_len),
                    ))
                }
                _ => None,
            };
            editor.apply(Operation::SetSelection {
                selection: new_selection,
            });
        });
    }

    /// Concatenated text of `container` up to `point` (which must sit in a
    /// leaf beneath it). `None` when the point is not inside `container`.
    pub fn text_before_in(&self, container: NodeId, point: Point) -> Option<String> {
        let mut out = String::new();
        for node in self.tree.descendants(container) {
            if let Some(text) = self.tree.leaf_text(node) {
                if node == point.node {
                    out.extend(text.chars().take(point.offset));
                    return Some(out);
                }
                out.push_str(text);
            }
        }
        None
    }

    /// Delete the characters between two points in document order.
    pub fn delete_between(&mut self, start: Point, end: Point) {
        let (start, end) = match self.cmp_points(start, end) {
            Ordering::Greater => (end, start),
            _ => (start, end),
        };
        self.without_normalizing(|editor| {
            let leaves = editor.leaves_between(start, end);
            for leaf in leaves {
                let len = editor
                    .tree
                    .leaf_text(leaf)
                    .map(|t| t.chars().count())
                    .unwrap_or(0);
                let from = if leaf == start.node { start.offset } else { 0 };
                let to = if leaf == end.node { end.offset } else { len };
                if to > from {
                    editor.delete_text(leaf, from, to - from);
                }
            }
        });
    }
}
