//! Arena-backed document tree.
//!
//! Nodes live in a slab and are addressed by stable `NodeId` handles with
//! parent/child index tables. Numeric paths are recomputed on demand and
//! never stored, so structural edits cannot leave dangling paths behind.

use slab::Slab;
use smol_str::SmolStr;
use trellis_ast::{BlockId, Element, GroupKind, MarkSet, Node, Text};

/// Handle to a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A numeric path from the root, child index per level.
pub type Path = Vec<usize>;

/// Per-node payload, without children.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Group(GroupKind),
    Statement {
        id: BlockId,
    },
    Heading {
        id: BlockId,
    },
    Blockquote {
        id: BlockId,
    },
    Code {
        id: BlockId,
        lang: Option<SmolStr>,
    },
    Paragraph,
    StaticParagraph,
    Link {
        url: SmolStr,
    },
    Embed {
        url: SmolStr,
    },
    Image {
        url: SmolStr,
        alt: SmolStr,
    },
    Video {
        url: SmolStr,
        alt: SmolStr,
    },
    Text {
        text: String,
        marks: MarkSet,
    },
}

impl NodeKind {
    /// Block-level nodes carrying a stable id.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            NodeKind::Statement { .. }
                | NodeKind::Heading { .. }
                | NodeKind::Blockquote { .. }
                | NodeKind::Code { .. }
        )
    }

    pub fn is_group(&self) -> bool {
        matches!(self, NodeKind::Group(_))
    }

    pub fn is_content(&self) -> bool {
        matches!(self, NodeKind::Paragraph)
    }

    pub fn is_static_content(&self) -> bool {
        matches!(self, NodeKind::StaticParagraph)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    pub fn is_inline_element(&self) -> bool {
        matches!(
            self,
            NodeKind::Link { .. }
                | NodeKind::Embed { .. }
                | NodeKind::Image { .. }
                | NodeKind::Video { .. }
        )
    }

    /// Phrasing content: text runs and inline elements.
    pub fn is_phrasing(&self) -> bool {
        self.is_text() || self.is_inline_element()
    }

    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            NodeKind::Statement { id }
            | NodeKind::Heading { id }
            | NodeKind::Blockquote { id }
            | NodeKind::Code { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn group_kind(&self) -> Option<&GroupKind> {
        match self {
            NodeKind::Group(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Group(GroupKind::Group) => "group",
            NodeKind::Group(GroupKind::UnorderedList) => "unorderedList",
            NodeKind::Group(GroupKind::OrderedList { .. }) => "orderedList",
            NodeKind::Statement { .. } => "statement",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Blockquote { .. } => "blockquote",
            NodeKind::Code { .. } => "code",
            NodeKind::Paragraph => "paragraph",
            NodeKind::StaticParagraph => "staticParagraph",
            NodeKind::Link { .. } => "link",
            NodeKind::Embed { .. } => "embed",
            NodeKind::Image { .. } => "image",
            NodeKind::Video { .. } => "video",
            NodeKind::Text { .. } => "text",
        }
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The document tree.
#[derive(Clone, Debug)]
pub struct DocTree {
    nodes: Slab<NodeData>,
    root: NodeId,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTree {
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(NodeData {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        }));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    // === Construction ===

    /// Allocate a detached node.
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        NodeId(self.nodes.insert(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        }))
    }

    /// Build a detached subtree from a hydration node.
    pub(crate) fn build_subtree(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Text(t) => self.alloc(NodeKind::Text {
                text: t.text.clone(),
                marks: t.marks.clone(),
            }),
            Node::Element(el) => {
                let kind = match el {
                    Element::Group { .. } => NodeKind::Group(GroupKind::Group),
                    Element::UnorderedList { .. } => NodeKind::Group(GroupKind::UnorderedList),
                    Element::OrderedList { start, .. } => {
                        NodeKind::Group(GroupKind::OrderedList { start: *start })
                    }
                    Element::Statement { id, .. } => NodeKind::Statement { id: id.clone() },
                    Element::Heading { id, .. } => NodeKind::Heading { id: id.clone() },
                    Element::Blockquote { id, .. } => NodeKind::Blockquote { id: id.clone() },
                    Element::Code { id, lang, .. } => NodeKind::Code {
                        id: id.clone(),
                        lang: lang.clone(),
                    },
                    Element::Paragraph { .. } => NodeKind::Paragraph,
                    Element::StaticParagraph { .. } => NodeKind::StaticParagraph,
                    Element::Link { url, .. } => NodeKind::Link { url: url.clone() },
                    Element::Embed { url, .. } => NodeKind::Embed { url: url.clone() },
                    Element::Image { url, alt, .. } => NodeKind::Image {
                        url: url.clone(),
                        alt: alt.clone(),
                    },
                    Element::Video { url, alt, .. } => NodeKind::Video {
                        url: url.clone(),
                        alt: alt.clone(),
                    },
                };
                let id = self.alloc(kind);
                for child in el.children() {
                    let child_id = self.build_subtree(child);
                    let index = self.child_count(id);
                    self.attach(child_id, id, index);
                }
                id
            }
        }
    }

    /// Attach a detached node under `parent` at `index`.
    pub(crate) fn attach(&mut self, child: NodeId, parent: NodeId, index: usize) {
        debug_assert!(self.nodes[child.0].parent.is_none());
        let index = index.min(self.child_count(parent));
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach a node from its parent, returning the old (parent, index).
    pub(crate) fn detach(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[child.0].parent.take()?;
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == child)
            .expect("child listed under its parent");
        self.nodes[parent.0].children.remove(index);
        Some((parent, index))
    }

    /// Free a detached subtree.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes.remove(id.0);
    }

    // === Traversal ===

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn is_first_child(&self, id: NodeId) -> bool {
        self.index_in_parent(id) == Some(0)
    }

    pub fn is_last_child(&self, id: NodeId) -> bool {
        match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(index)) => index + 1 == self.child_count(parent),
            _ => false,
        }
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        if index == 0 {
            None
        } else {
            Some(self.children(parent)[index - 1])
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Recompute the numeric path of a node.
    pub fn path_of(&self, id: NodeId) -> Path {
        let mut path = Path::new();
        let mut current = id;
        while let Some(index) = self.index_in_parent(current) {
            path.push(index);
            current = self.parent(current).expect("indexed node has a parent");
        }
        path.reverse();
        path
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root;
        for index in path {
            current = self.children(current).get(*index).copied()?;
        }
        Some(current)
    }

    /// Nearest strict ancestor matching a predicate.
    pub fn above(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut current = self.parent(id)?;
        loop {
            if pred(self.kind(current)) {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Nearest strict flow-content ancestor.
    pub fn flow_above(&self, id: NodeId) -> Option<NodeId> {
        self.above(id, NodeKind::is_flow)
    }

    /// The node itself if it is flow content, else its nearest flow ancestor.
    pub fn enclosing_flow(&self, id: NodeId) -> Option<NodeId> {
        if self.kind(id).is_flow() {
            Some(id)
        } else {
            self.flow_above(id)
        }
    }

    /// Pre-order traversal of the subtree rooted at `from`, including it.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Flow blocks of the whole document, in document order.
    pub fn flow_blocks(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.kind(*id).is_flow())
            .collect()
    }

    /// Concatenated text of a subtree.
    pub fn text_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text { text, .. } = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// The text of a leaf, if `id` is a text run.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn leaf_marks(&self, id: NodeId) -> Option<&MarkSet> {
        match self.kind(id) {
            NodeKind::Text { marks, .. } => Some(marks),
            _ => None,
        }
    }

    // === Extraction ===

    /// Serialize a subtree back to the hydration shape.
    pub fn to_node(&self, id: NodeId) -> Node {
        match self.kind(id) {
            NodeKind::Text { text, marks } => Node::Text(Text {
                text: text.clone(),
                marks: marks.clone(),
            }),
            kind => {
                let children: Vec<Node> = self
                    .children(id)
                    .iter()
                    .map(|child| self.to_node(*child))
                    .collect();
                let el = match kind {
                    NodeKind::Group(GroupKind::Group) => Element::Group { children },
                    NodeKind::Group(GroupKind::UnorderedList) => {
                        Element::UnorderedList { children }
                    }
                    NodeKind::Group(GroupKind::OrderedList { start }) => Element::OrderedList {
                        start: *start,
                        children,
                    },
                    NodeKind::Statement { id } => Element::Statement {
                        id: id.clone(),
                        children,
                    },
                    NodeKind::Heading { id } => Element::Heading {
                        id: id.clone(),
                        children,
                    },
                    NodeKind::Blockquote { id } => Element::Blockquote {
                        id: id.clone(),
                        children,
                    },
                    NodeKind::Code { id, lang } => Element::Code {
                        id: id.clone(),
                        lang: lang.clone(),
                        children,
                    },
                    NodeKind::Paragraph => Element::Paragraph { children },
                    NodeKind::StaticParagraph => Element::StaticParagraph { children },
                    NodeKind::Link { url } => Element::Link {
                        url: url.clone(),
                        children,
                    },
                    NodeKind::Embed { url } => Element::Embed {
                        url: url.clone(),
                        children,
                    },
                    NodeKind::Image { url, alt } => Element::Image {
                        url: url.clone(),
                        alt: alt.clone(),
                        children,
                    },
                    NodeKind::Video { url, alt } => Element::Video {
                        url: url.clone(),
                        alt: alt.clone(),
                        children,
                    },
                    NodeKind::Root => {
                        // The root is extracted via `extract_children`.
                        Element::Group { children }
                    }
                    NodeKind::Text { .. } => unreachable!("handled above"),
                };
                Node::Element(el)
            }
        }
    }

    pub fn to_element(&self, id: NodeId) -> Option<Element> {
        match self.to_node(id) {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Serialize the root's children (the document payload shape).
    pub fn extract_children(&self) -> Vec<Element> {
        self.children(self.root)
            .iter()
            .filter_map(|child| self.to_element(*child))
            .collect()
    }

    /// Look up a flow block by its stable id.
    pub fn block_by_id(&self, block: &BlockId) -> Option<NodeId> {
        self.flow_blocks()
            .into_iter()
            .find(|id| self.kind(*id).block_id() == Some(block))
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
