//! The plugin capability trait and its registry.
//!
//! A plugin is a bundle of optional capabilities scoped to one node type or
//! one cross-cutting concern. The registry is an explicit value injected at
//! editor construction and composes the capabilities in registration order:
//!
//! - render hooks: first non-`None` result wins, then a default renderer
//! - decorations: every plugin's ranges, concatenated
//! - key/input handlers: every handler runs; consuming the event is the
//!   handler's own job, nothing short-circuits
//! - inline/void classification: any plugin claiming `true` wins
//! - normalization: middleware chain, first `Changed` short-circuits

use smol_str::SmolStr;
use std::ops::Range;
use trellis_ast::GroupKind;

use crate::editor::Editor;
use crate::events::{EventKind, InputEvent, KeyEvent};
use crate::tree::{NodeId, NodeKind};

/// Result of one normalization rule pass over one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// A rule fired and mutated the tree; re-run the fixpoint.
    Changed,
    /// No rule matched; fall through to the next plugin or the default.
    Continue,
}

/// Framework-agnostic description of how to render an element node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementView {
    pub tag: SmolStr,
    pub class: SmolStr,
    pub attrs: Vec<(SmolStr, SmolStr)>,
}

impl ElementView {
    pub fn new(tag: impl Into<SmolStr>, class: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

/// Framework-agnostic description of how to render a text leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeafView {
    pub classes: Vec<SmolStr>,
    pub color: Option<SmolStr>,
}

/// A decoration over a character range of one text leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoration {
    pub leaf: NodeId,
    pub range: Range<usize>,
    pub class: Option<SmolStr>,
    pub color: Option<SmolStr>,
}

/// One plugin's optional capabilities. Implement only what the node type
/// needs; every method has a no-op default.
pub trait EditorPlugin {
    fn name(&self) -> &'static str;

    /// One normalization pass over `node`. Return `Changed` after mutating
    /// so the editor re-runs the fixpoint on the new shape.
    fn normalize(&self, _editor: &mut Editor, _node: NodeId) -> NormalizeOutcome {
        NormalizeOutcome::Continue
    }

    fn render_element(&self, _editor: &Editor, _node: NodeId) -> Option<ElementView> {
        None
    }

    fn render_leaf(&self, _editor: &Editor, _node: NodeId) -> Option<LeafView> {
        None
    }

    fn decorate(&self, _editor: &Editor, _node: NodeId) -> Vec<Decoration> {
        Vec::new()
    }

    fn on_key_down(&self, _editor: &mut Editor, _event: &mut KeyEvent) {}

    fn on_before_input(&self, _editor: &mut Editor, _event: &mut InputEvent) {}

    /// Claim a node kind as inline. `None` defers to other plugins.
    fn is_inline(&self, _kind: &NodeKind) -> Option<bool> {
        None
    }

    /// Claim a node kind as void (no editable children).
    fn is_void(&self, _kind: &NodeKind) -> Option<bool> {
        None
    }

    /// Which event kinds this plugin listens to, for host-UI wiring.
    fn event_handlers(&self) -> &'static [EventKind] {
        &[]
    }
}

/// An ordered set of plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn EditorPlugin>>,
}

impl PluginRegistry {
    pub fn new(plugins: Vec<Box<dyn EditorPlugin>>) -> Self {
        Self { plugins }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub(crate) fn normalize(&self, editor: &mut Editor, node: NodeId) -> NormalizeOutcome {
        for plugin in &self.plugins {
            if plugin.normalize(editor, node) == NormalizeOutcome::Changed {
                return NormalizeOutcome::Changed;
            }
        }
        NormalizeOutcome::Continue
    }

    pub(crate) fn render_element(&self, editor: &Editor, node: NodeId) -> ElementView {
        for plugin in &self.plugins {
            if let Some(view) = plugin.render_element(editor, node) {
                return view;
            }
        }
        default_element_view(editor.tree().kind(node))
    }

    pub(crate) fn render_leaf(&self, editor: &Editor, node: NodeId) -> LeafView {
        for plugin in &self.plugins {
            if let Some(view) = plugin.render_leaf(editor, node) {
                return view;
            }
        }
        LeafView::default()
    }

    pub(crate) fn decorations(&self, editor: &Editor, node: NodeId) -> Vec<Decoration> {
        let mut out = Vec::new();
        for plugin in &self.plugins {
            out.extend(plugin.decorate(editor, node));
        }
        out
    }

    pub(crate) fn on_key_down(&self, editor: &mut Editor, event: &mut KeyEvent) {
        for plugin in &self.plugins {
            plugin.on_key_down(editor, event);
        }
    }

    pub(crate) fn on_before_input(&self, editor: &mut Editor, event: &mut InputEvent) {
        for plugin in &self.plugins {
            plugin.on_before_input(editor, event);
        }
    }

    pub(crate) fn is_inline(&self, kind: &NodeKind) -> bool {
        self.plugins
            .iter()
            .any(|p| p.is_inline(kind) == Some(true))
    }

    pub(crate) fn is_void(&self, kind: &NodeKind) -> bool {
        self.plugins.iter().any(|p| p.is_void(kind) == Some(true))
    }

    pub(crate) fn used_event_handlers(&self) -> Vec<EventKind> {
        let mut out = Vec::new();
        for plugin in &self.plugins {
            for kind in plugin.event_handlers() {
                if !out.contains(kind) {
                    out.push(*kind);
                }
            }
        }
        out
    }
}

/// Fallback rendering when no plugin claims an element.
fn default_element_view(kind: &NodeKind) -> ElementView {
    match kind {
        NodeKind::Root => ElementView::new("div", "document"),
        NodeKind::Group(GroupKind::Group) => ElementView::new("ul", "group"),
        NodeKind::Group(GroupKind::UnorderedList) => ElementView::new("ul", "unordered-list"),
        NodeKind::Group(GroupKind::OrderedList { start }) => {
            let view = ElementView::new("ol", "ordered-list");
            match start {
                Some(start) => view.with_attr("start", start.to_string()),
                None => view,
            }
        }
        NodeKind::Statement { .. } => ElementView::new("li", "statement"),
        NodeKind::Heading { .. } => ElementView::new("li", "heading"),
        NodeKind::Blockquote { .. } => ElementView::new("blockquote", "blockquote"),
        NodeKind::Code { .. } => ElementView::new("pre", "code-block"),
        NodeKind::Paragraph => ElementView::new("p", "paragraph"),
        NodeKind::StaticParagraph => ElementView::new("span", "static-paragraph"),
        NodeKind::Link { url } => ElementView::new("a", "link").with_attr("href", url.clone()),
        NodeKind::Embed { url } => ElementView::new("q", "embed").with_attr("cite", url.clone()),
        NodeKind::Image { url, alt } => ElementView::new("img", "image")
            .with_attr("src", url.clone())
            .with_attr("alt", alt.clone()),
        NodeKind::Video { url, alt } => ElementView::new("video", "video")
            .with_attr("src", url.clone())
            .with_attr("title", alt.clone()),
        NodeKind::Text { .. } => ElementView::new("span", "text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::default_plugins;
    use trellis_ast::builder::{group, paragraph, statement_with_id, text};

    struct Claiming;

    impl EditorPlugin for Claiming {
        fn name(&self) -> &'static str {
            "claiming"
        }

        fn is_void(&self, kind: &NodeKind) -> Option<bool> {
            matches!(kind, NodeKind::Statement { .. }).then_some(true)
        }

        fn event_handlers(&self) -> &'static [EventKind] {
            &[EventKind::KeyDown]
        }
    }

    #[test]
    fn test_any_true_classification() {
        let registry = PluginRegistry::new(vec![Box::new(Claiming)]);
        assert!(registry.is_void(&NodeKind::Statement { id: "b1".into() }));
        assert!(!registry.is_void(&NodeKind::Paragraph));
        assert!(!registry.is_inline(&NodeKind::Paragraph));
    }

    #[test]
    fn test_used_event_handlers_deduped() {
        let registry = PluginRegistry::new(vec![Box::new(Claiming), Box::new(Claiming)]);
        assert_eq!(registry.used_event_handlers(), vec![EventKind::KeyDown]);
    }

    #[test]
    fn test_default_renderer_fallback() {
        let editor = Editor::from_elements(
            &[group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("x").into()]).into()]).into(),
            ])],
            PluginRegistry::new(default_plugins()),
        );
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let para = editor.tree().first_child(b1).unwrap();
        // No plugin claims paragraphs; the default renderer does.
        assert_eq!(editor.render_element(para).tag, "p");
    }
}
