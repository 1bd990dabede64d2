//! Transclusion embeds.
//!
//! An embed is an inline void pointing at another document through a
//! `trellis://` reference. A reference that fails to parse renders as an
//! inline error placeholder instead of failing the render pass, and
//! Backspace on a selected embed removes it whole.

use crate::editor::Editor;
use crate::events::{EventKind, Key, KeyEvent};
use crate::op::Operation;
use crate::plugin::{EditorPlugin, ElementView};
use crate::tree::{NodeId, NodeKind};
use crate::uri::DocRef;

pub struct EmbedPlugin;

impl EditorPlugin for EmbedPlugin {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn render_element(&self, editor: &Editor, node: NodeId) -> Option<ElementView> {
        let NodeKind::Embed { url } = editor.tree().kind(node) else {
            return None;
        };
        match DocRef::parse(url) {
            Ok(doc_ref) => {
                let view = ElementView::new("q", "embed")
                    .with_attr("cite", url.clone())
                    .with_attr("data-doc", doc_ref.doc);
                Some(match doc_ref.block {
                    Some(block) => view.with_attr("data-block", block),
                    None => view,
                })
            }
            Err(err) => {
                tracing::debug!(%url, %err, "unreadable embed reference");
                Some(ElementView::new("span", "embed-error").with_attr("data-url", url.clone()))
            }
        }
    }

    fn is_inline(&self, kind: &NodeKind) -> Option<bool> {
        matches!(kind, NodeKind::Embed { .. }).then_some(true)
    }

    fn is_void(&self, kind: &NodeKind) -> Option<bool> {
        matches!(kind, NodeKind::Embed { .. }).then_some(true)
    }

    fn on_key_down(&self, editor: &mut Editor, event: &mut KeyEvent) {
        if event.is_consumed() || event.key != Key::Backspace {
            return;
        }
        let Some(sel) = editor.selection() else {
            return;
        };
        let anchor = sel.anchor.node;
        let embed = if matches!(editor.tree().kind(anchor), NodeKind::Embed { .. }) {
            Some(anchor)
        } else {
            editor
                .tree()
                .above(anchor, |kind| matches!(kind, NodeKind::Embed { .. }))
        };
        if let Some(embed) = embed {
            editor.apply(Operation::RemoveNode { node: embed });
            event.consume();
        }
    }

    fn event_handlers(&self) -> &'static [EventKind] {
        &[EventKind::KeyDown]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Modifiers;
    use crate::plugin::PluginRegistry;
    use crate::plugins::default_plugins;
    use crate::selection::{Point, Selection};
    use trellis_ast::builder::{embed, group, paragraph, statement_with_id, text};

    fn editor_with_embed(url: &str) -> Editor {
        Editor::from_elements(
            &[group(vec![
                statement_with_id(
                    "b1",
                    vec![
                        paragraph(vec![
                            text("before ").into(),
                            embed(url).into(),
                            text(" after").into(),
                        ])
                        .into(),
                    ],
                )
                .into(),
            ])],
            PluginRegistry::new(default_plugins()),
        )
    }

    fn find_embed(editor: &Editor) -> Option<NodeId> {
        editor
            .tree()
            .descendants(editor.tree().root())
            .into_iter()
            .find(|n| matches!(editor.tree().kind(*n), NodeKind::Embed { .. }))
    }

    #[test]
    fn test_valid_reference_renders_citation() {
        let editor = editor_with_embed("trellis://doc1/v2/#b3");
        let embed = find_embed(&editor).unwrap();
        let view = editor.render_element(embed);
        assert_eq!(view.tag, "q");
        assert!(view.attrs.contains(&("data-doc".into(), "doc1".into())));
        assert!(view.attrs.contains(&("data-block".into(), "b3".into())));
    }

    #[test]
    fn test_bad_reference_renders_placeholder() {
        let editor = editor_with_embed("not-a-reference");
        let embed = find_embed(&editor).unwrap();
        let view = editor.render_element(embed);
        assert_eq!(view.class, "embed-error");
    }

    #[test]
    fn test_embed_is_inline_void() {
        let editor = editor_with_embed("trellis://doc1");
        let embed = find_embed(&editor).unwrap();
        assert!(editor.is_inline(embed));
        assert!(editor.is_void(embed));
    }

    #[test]
    fn test_backspace_removes_selected_embed() {
        let mut editor = editor_with_embed("trellis://doc1");
        let embed = find_embed(&editor).unwrap();
        let inner = editor.tree().first_child(embed).unwrap();
        editor.set_selection(Some(Selection::collapsed(Point::new(inner, 0))));

        let mut event = KeyEvent::new(Key::Backspace, Modifiers::NONE);
        editor.handle_key_down(&mut event);
        assert!(event.is_consumed());
        assert!(find_embed(&editor).is_none());
    }
}
