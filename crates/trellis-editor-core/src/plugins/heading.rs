//! Heading normalization and rendering.
//!
//! A heading always leads with a staticParagraph. Whatever else lands in
//! the first slot is converted: a paragraph retypes in place, bare text
//! gets wrapped, and any block is dissolved down to its inline content.

use crate::editor::Editor;
use crate::op::Operation;
use crate::plugin::{EditorPlugin, ElementView, NormalizeOutcome};
use crate::plugins::statement::wrap_phrasing_prefix;
use crate::tree::{NodeId, NodeKind};

pub struct HeadingPlugin;

impl EditorPlugin for HeadingPlugin {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn normalize(&self, editor: &mut Editor, node: NodeId) -> NormalizeOutcome {
        if !matches!(editor.tree().kind(node), NodeKind::Heading { .. }) {
            return NormalizeOutcome::Continue;
        }
        let Some(first) = editor.tree().first_child(node) else {
            return NormalizeOutcome::Continue;
        };

        match editor.tree().kind(first) {
            NodeKind::StaticParagraph => NormalizeOutcome::Continue,
            NodeKind::Paragraph => {
                editor.set_kind(first, NodeKind::StaticParagraph);
                NormalizeOutcome::Changed
            }
            kind if kind.is_phrasing() => {
                wrap_phrasing_prefix(editor, node, NodeKind::StaticParagraph);
                NormalizeOutcome::Changed
            }
            kind if kind.is_group() => NormalizeOutcome::Continue,
            _ => {
                // A block in the title slot: keep its inline content only.
                rewrap_inline_content(editor, node, first);
                NormalizeOutcome::Changed
            }
        }
    }

    fn render_element(&self, editor: &Editor, node: NodeId) -> Option<ElementView> {
        match editor.tree().kind(node) {
            NodeKind::Heading { .. } => {
                let depth = heading_depth(editor, node).min(6);
                Some(ElementView::new("li", "heading").with_attr("data-level", depth.to_string()))
            }
            _ => None,
        }
    }
}

/// Nesting depth of a heading, counting enclosing flow blocks.
fn heading_depth(editor: &Editor, node: NodeId) -> usize {
    let mut depth = 1;
    let mut current = node;
    while let Some(above) = editor.tree().flow_above(current) {
        depth += 1;
        current = above;
    }
    depth
}

/// Replace `first` with a staticParagraph holding its phrasing content.
fn rewrap_inline_content(editor: &mut Editor, heading: NodeId, first: NodeId) {
    let inline: Vec<NodeId> = editor
        .tree()
        .descendants(first)
        .into_iter()
        .filter(|n| editor.tree().kind(*n).is_phrasing())
        // Top-level runs only; text inside an inline element travels with it.
        .filter(|n| editor.tree().above(*n, |kind| kind.is_phrasing()).is_none())
        .collect();

    editor.without_normalizing(|editor| {
        let content = editor.tree.alloc(NodeKind::StaticParagraph);
        for (i, child) in inline.iter().enumerate() {
            editor.apply(Operation::MoveNode {
                node: *child,
                parent: content,
                index: i,
            });
        }
        editor.apply(Operation::RemoveNode { node: first });
        editor.apply(Operation::InsertNode {
            parent: heading,
            index: 0,
            node: content,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginRegistry;
    use crate::plugins::default_plugins;
    use pretty_assertions::assert_eq;
    use trellis_ast::Element;
    use trellis_ast::builder::{group, heading_with_id, paragraph, statement_with_id, text};

    fn editor_with(children: Vec<Element>) -> Editor {
        Editor::from_elements(&children, PluginRegistry::new(default_plugins()))
    }

    #[test]
    fn test_paragraph_first_child_retyped() {
        let editor = editor_with(vec![group(vec![
            Element::Heading {
                id: "h1".into(),
                children: vec![paragraph(vec![text("title").into()]).into()],
            }
            .into(),
        ])]);
        let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
        let first = editor.tree().first_child(h1).unwrap();
        assert!(editor.tree().kind(first).is_static_content());
        assert_eq!(editor.tree().text_of(first), "title");
    }

    #[test]
    fn test_block_first_child_dissolved_to_inline_content() {
        let editor = editor_with(vec![group(vec![
            Element::Heading {
                id: "h1".into(),
                children: vec![
                    statement_with_id("b1", vec![paragraph(vec![text("inner").into()]).into()])
                        .into(),
                ],
            }
            .into(),
        ])]);
        let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
        let first = editor.tree().first_child(h1).unwrap();
        assert!(editor.tree().kind(first).is_static_content());
        assert_eq!(editor.tree().text_of(first), "inner");
        assert!(editor.tree().block_by_id(&"b1".into()).is_none());
    }

    #[test]
    fn test_bare_text_first_child_wrapped() {
        let editor = editor_with(vec![group(vec![
            Element::Heading {
                id: "h1".into(),
                children: vec![text("loose title").into()],
            }
            .into(),
        ])]);
        let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
        let first = editor.tree().first_child(h1).unwrap();
        assert!(editor.tree().kind(first).is_static_content());
        assert_eq!(editor.tree().text_of(first), "loose title");
    }

    #[test]
    fn test_extra_blocks_grouped_under_heading() {
        let editor = editor_with(vec![group(vec![heading_with_id(
            "h1",
            vec![
                Element::StaticParagraph {
                    children: vec![text("title").into()],
                }
                .into(),
                statement_with_id("b1", vec![paragraph(vec![text("body").into()]).into()])
                    .into(),
            ],
        )
        .into()])]);
        let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        assert_eq!(editor.tree().flow_above(b1), Some(h1));
        let container = editor.tree().parent(b1).unwrap();
        assert!(editor.tree().kind(container).is_group());
    }

    #[test]
    fn test_heading_render_carries_depth() {
        let editor = editor_with(vec![group(vec![
            Element::Heading {
                id: "h1".into(),
                children: vec![
                    Element::StaticParagraph {
                        children: vec![text("t").into()],
                    }
                    .into(),
                ],
            }
            .into(),
        ])]);
        let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
        let view = editor.render_element(h1);
        assert_eq!(view.tag, "li");
        assert!(view.attrs.contains(&("data-level".into(), "1".into())));
    }
}
