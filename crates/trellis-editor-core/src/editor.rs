//! The editor instance: tree, selection, plugins, and change log.
//!
//! All mutations go through `apply`, which lets the change-tracking overlay
//! observe the operation before the tree changes and then drives the
//! normalization chain to fixpoint. `without_normalizing` scopes defer the
//! fixpoint so structural commands normalize once, on the final shape.

use trellis_ast::{Draft, Element};

use crate::changes::{self, ChangeLog, ChangeOp, DocumentChange};
use crate::events::{EventKind, InputEvent, KeyEvent};
use crate::op::Operation;
use crate::plugin::{Decoration, ElementView, LeafView, NormalizeOutcome, PluginRegistry};
use crate::selection::Selection;
use crate::tree::{DocTree, NodeId, NodeKind};

pub struct Editor {
    pub(crate) tree: DocTree,
    pub(crate) selection: Option<Selection>,
    pub(crate) plugins: PluginRegistry,
    pub(crate) changes: ChangeLog,
    pub(crate) title: String,
    pub(crate) subtitle: String,
    defer_normalize: u32,
    normalizing: bool,
}

impl Editor {
    /// An empty editor with the given plugin set.
    pub fn new(plugins: PluginRegistry) -> Self {
        Self {
            tree: DocTree::new(),
            selection: None,
            plugins,
            changes: ChangeLog::default(),
            title: String::new(),
            subtitle: String::new(),
            defer_normalize: 0,
            normalizing: false,
        }
    }

    /// Hydrate from a draft payload. The tree is normalized once and the
    /// change log starts empty; hydration is not an edit.
    pub fn from_draft(draft: &Draft, plugins: PluginRegistry) -> Self {
        let mut editor = Self::from_elements(&draft.children, plugins);
        editor.title = draft.title.clone();
        editor.subtitle = draft.subtitle.clone();
        editor
    }

    pub fn from_elements(children: &[Element], plugins: PluginRegistry) -> Self {
        let mut editor = Self::new(plugins);
        let root = editor.tree.root();
        for (index, el) in children.iter().enumerate() {
            let subtree = editor.tree.build_subtree(&el.clone().into());
            editor.tree.attach(subtree, root, index);
        }
        editor.normalize();
        editor.changes.reset();
        editor
    }

    /// Serialize the current document back to the hydration shape.
    pub fn extract(&self) -> Draft {
        Draft {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            children: self.tree.extract_children(),
        }
    }

    pub fn tree(&self) -> &DocTree {
        &self.tree
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.apply(Operation::SetSelection { selection });
    }

    // === Operation pipeline ===

    /// Apply one low-level operation: record it for change tracking,
    /// mutate the tree, then normalize (unless deferred).
    pub fn apply(&mut self, op: Operation) {
        changes::record(self, &op);
        self.apply_to_tree(&op);
        if self.defer_normalize == 0 {
            self.normalize();
        }
    }

    /// Run `f` with normalization deferred; the fixpoint runs once at the
    /// end of the outermost scope.
    pub fn without_normalizing(&mut self, f: impl FnOnce(&mut Editor)) {
        self.defer_normalize += 1;
        f(self);
        self.defer_normalize -= 1;
        if self.defer_normalize == 0 {
            self.normalize();
        }
    }

    fn apply_to_tree(&mut self, op: &Operation) {
        match op {
            Operation::InsertNode {
                parent,
                index,
                node,
            } => {
                self.tree.attach(*node, *parent, *index);
            }
            Operation::RemoveNode { node } => {
                self.tree.detach(*node);
                self.tree.free_subtree(*node);
                self.drop_dangling_selection();
            }
            Operation::MoveNode {
                node,
                parent,
                index,
            } => {
                self.tree.detach(*node);
                self.tree.attach(*node, *parent, *index);
            }
            Operation::SetNode { node, kind } => {
                *self.tree.kind_mut(*node) = kind.clone();
            }
            Operation::InsertText { node, offset, text } => {
                if let NodeKind::Text { text: leaf, .. } = self.tree.kind_mut(*node) {
                    let byte = char_to_byte(leaf, *offset);
                    leaf.insert_str(byte, text);
                }
            }
            Operation::RemoveText { node, offset, len } => {
                if let NodeKind::Text { text: leaf, .. } = self.tree.kind_mut(*node) {
                    let start = char_to_byte(leaf, *offset);
                    let end = char_to_byte(leaf, *offset + *len);
                    leaf.replace_range(start..end, "");
                }
            }
            Operation::SetSelection { selection } => {
                self.selection = *selection;
            }
        }
    }

    fn drop_dangling_selection(&mut self) {
        if let Some(sel) = self.selection {
            if !self.tree.contains(sel.anchor.node) || !self.tree.contains(sel.focus.node) {
                self.selection = None;
            }
        }
    }

    // === Normalization ===

    /// Drive the plugin normalization chain to fixpoint over the whole
    /// tree. Convergence is bounded; a blown budget indicates a rule that
    /// fights another and is logged rather than looping forever.
    ///
    /// Re-entrant calls (rules apply operations, operations normalize) are
    /// absorbed by the running fixpoint.
    pub(crate) fn normalize(&mut self) {
        if self.normalizing {
            return;
        }
        self.normalizing = true;
        let mut passes = 0usize;
        'outer: loop {
            passes += 1;
            if passes > self.tree.len() * 4 + 16 {
                tracing::warn!(passes, "normalization did not converge");
                break;
            }
            let nodes = self.tree.descendants(self.tree.root());
            for node in nodes {
                if !self.tree.contains(node) {
                    continue;
                }
                if self.run_normalizers(node) == NormalizeOutcome::Changed {
                    continue 'outer;
                }
            }
            break;
        }
        self.normalizing = false;
    }

    fn run_normalizers(&mut self, node: NodeId) -> NormalizeOutcome {
        let plugins = std::mem::take(&mut self.plugins);
        let outcome = plugins.normalize(self, node);
        self.plugins = plugins;
        match outcome {
            NormalizeOutcome::Changed => NormalizeOutcome::Changed,
            NormalizeOutcome::Continue => self.default_normalize(node),
        }
    }

    /// Default per-type handling, run when no plugin rule fired: editable
    /// elements always hold at least one text leaf, and adjacent leaves
    /// with identical marks merge.
    fn default_normalize(&mut self, node: NodeId) -> NormalizeOutcome {
        let needs_leaf = matches!(
            self.tree.kind(node),
            NodeKind::Paragraph | NodeKind::StaticParagraph | NodeKind::Link { .. }
        );
        if needs_leaf && self.tree.child_count(node) == 0 {
            let leaf = self.tree.alloc(NodeKind::Text {
                text: String::new(),
                marks: Default::default(),
            });
            self.apply(Operation::InsertNode {
                parent: node,
                index: 0,
                node: leaf,
            });
            return NormalizeOutcome::Changed;
        }

        let children = self.tree.children(node).to_vec();
        for pair in children.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (mergeable, drop_first) = match (self.tree.kind(a), self.tree.kind(b)) {
                (
                    NodeKind::Text {
                        marks: ma,
                        text: ta,
                    },
                    NodeKind::Text {
                        marks: mb,
                        text: tb,
                    },
                ) => {
                    if ma == mb || tb.is_empty() {
                        (true, false)
                    } else {
                        // Differently-marked neighbors only collapse when
                        // the first is empty.
                        (false, ta.is_empty())
                    }
                }
                _ => (false, false),
            };
            if drop_first {
                self.apply(Operation::RemoveNode { node: a });
                return NormalizeOutcome::Changed;
            }
            if mergeable {
                let tail = self
                    .tree
                    .leaf_text(b)
                    .map(str::to_owned)
                    .unwrap_or_default();
                let offset = self
                    .tree
                    .leaf_text(a)
                    .map(|t| t.chars().count())
                    .unwrap_or(0);
                if !tail.is_empty() {
                    self.apply(Operation::InsertText {
                        node: a,
                        offset,
                        text: tail,
                    });
                }
                self.apply(Operation::RemoveNode { node: b });
                return NormalizeOutcome::Changed;
            }
        }

        NormalizeOutcome::Continue
    }

    // === Plugin-composed hooks ===

    /// Render an element node: first plugin match, then default.
    pub fn render_element(&self, node: NodeId) -> ElementView {
        self.plugins.render_element(self, node)
    }

    /// Render a text leaf: first plugin match, then default.
    pub fn render_leaf(&self, node: NodeId) -> LeafView {
        self.plugins.render_leaf(self, node)
    }

    /// Every plugin's decoration ranges for a node, concatenated.
    pub fn decorations(&self, node: NodeId) -> Vec<Decoration> {
        self.plugins.decorations(self, node)
    }

    /// Which event kinds the host UI must wire up.
    pub fn used_event_handlers(&self) -> Vec<EventKind> {
        self.plugins.used_event_handlers()
    }

    /// Run every plugin's key handler in registration order. Handlers that
    /// act mark the event consumed; none short-circuits the rest.
    ///
    /// The registry is taken out of the editor for the duration of the
    /// dispatch, so normalization is deferred until it is back in place.
    pub fn handle_key_down(&mut self, event: &mut KeyEvent) {
        let plugins = std::mem::take(&mut self.plugins);
        self.defer_normalize += 1;
        plugins.on_key_down(self, event);
        self.defer_normalize -= 1;
        self.plugins = plugins;
        if self.defer_normalize == 0 {
            self.normalize();
        }
    }

    /// Run every plugin's before-input handler in registration order, with
    /// the same normalization deferral as `handle_key_down`.
    pub fn handle_before_input(&mut self, event: &mut InputEvent) {
        let plugins = std::mem::take(&mut self.plugins);
        self.defer_normalize += 1;
        plugins.on_before_input(self, event);
        self.defer_normalize -= 1;
        self.plugins = plugins;
        if self.defer_normalize == 0 {
            self.normalize();
        }
    }

    /// Whether any plugin classifies this node as inline.
    pub fn is_inline(&self, node: NodeId) -> bool {
        self.plugins.is_inline(self.tree.kind(node))
    }

    /// Whether any plugin classifies this node as void.
    pub fn is_void(&self, node: NodeId) -> bool {
        self.plugins.is_void(self.tree.kind(node))
    }

    // === Change log ===

    /// The accumulated change records, oldest first.
    pub fn pending_changes(&self) -> &[ChangeOp] {
        self.changes.entries()
    }

    /// Append a change record directly, with the usual collapsing. Hosts
    /// use this for edits the operation pipeline cannot see.
    pub fn add_change(&mut self, op: ChangeOp) {
        self.changes.add(op);
    }

    /// Map the accumulated records into backend patch entries.
    pub fn transform_changes(&self) -> Vec<DocumentChange> {
        changes::transform_changes(self)
    }

    /// Drop all accumulated records (after a save, or on draft reset).
    pub fn reset_changes(&mut self) {
        self.changes.reset();
    }
}

fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::default_plugins;
    use pretty_assertions::assert_eq;
    use trellis_ast::builder::{group, paragraph, statement_with_id, text};

    fn editor_with(children: Vec<Element>) -> Editor {
        Editor::from_elements(&children, PluginRegistry::new(default_plugins()))
    }

    #[test]
    fn test_hydration_resets_changes() {
        let editor = editor_with(vec![group(vec![
            statement_with_id("b1", vec![paragraph(vec![text("hi").into()]).into()]).into(),
        ])]);
        assert!(editor.pending_changes().is_empty());
    }

    #[test]
    fn test_insert_text_records_replace() {
        let mut editor = editor_with(vec![group(vec![
            statement_with_id("b1", vec![paragraph(vec![text("hi").into()]).into()]).into(),
        ])]);
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let para = editor.tree().first_child(b1).unwrap();
        let leaf = editor.tree().first_child(para).unwrap();

        editor.apply(Operation::InsertText {
            node: leaf,
            offset: 2,
            text: " there".into(),
        });

        assert_eq!(editor.tree().text_of(b1), "hi there");
        assert_eq!(
            editor.pending_changes(),
            &[ChangeOp::ReplaceBlock("b1".into())]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut editor = editor_with(vec![group(vec![
            statement_with_id("b1", vec![paragraph(vec![text("one").into()]).into()]).into(),
            statement_with_id("b2", vec![paragraph(vec![text("two").into()]).into()]).into(),
        ])]);
        let before = editor.extract();
        editor.normalize();
        assert_eq!(editor.extract(), before);
    }

    #[test]
    fn test_adjacent_text_leaves_merge() {
        let mut editor = editor_with(vec![group(vec![
            statement_with_id(
                "b1",
                vec![paragraph(vec![text("foo").into(), text("bar").into()]).into()],
            )
            .into(),
        ])]);
        editor.normalize();
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let para = editor.tree().first_child(b1).unwrap();
        assert_eq!(editor.tree().child_count(para), 1);
        assert_eq!(editor.tree().text_of(para), "foobar");
    }

    #[test]
    fn test_selection_dropped_when_leaf_removed() {
        let mut editor = editor_with(vec![group(vec![
            statement_with_id("b1", vec![paragraph(vec![text("one").into()]).into()]).into(),
            statement_with_id("b2", vec![paragraph(vec![text("two").into()]).into()]).into(),
        ])]);
        let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
        let para = editor.tree().first_child(b2).unwrap();
        let leaf = editor.tree().first_child(para).unwrap();
        editor.set_selection(Some(Selection::collapsed(crate::selection::Point::new(
            leaf, 0,
        ))));

        editor.apply(Operation::RemoveNode { node: b2 });
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_extract_round_trips_title() {
        let draft = Draft {
            title: "T".into(),
            subtitle: "S".into(),
            children: vec![group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("x").into()]).into()]).into(),
            ])],
        };
        let editor = Editor::from_draft(&draft, PluginRegistry::new(default_plugins()));
        assert_eq!(editor.extract(), draft);
    }
}
