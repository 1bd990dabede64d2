//! Inline links.
//!
//! Claims the link kind as inline and sniffs pasted plain text: pasting a
//! URL over an expanded selection turns the selection into a link instead
//! of replacing it.

use crate::editor::Editor;
use crate::events::{EventKind, InputEvent, InputIntent};
use crate::plugin::{EditorPlugin, ElementView};
use crate::tree::{NodeId, NodeKind};
use crate::uri;

pub struct LinkPlugin;

impl EditorPlugin for LinkPlugin {
    fn name(&self) -> &'static str {
        "link"
    }

    fn render_element(&self, editor: &Editor, node: NodeId) -> Option<ElementView> {
        match editor.tree().kind(node) {
            NodeKind::Link { url } => {
                Some(ElementView::new("a", "link").with_attr("href", url.clone()))
            }
            _ => None,
        }
    }

    fn is_inline(&self, kind: &NodeKind) -> Option<bool> {
        matches!(kind, NodeKind::Link { .. }).then_some(true)
    }

    fn on_before_input(&self, editor: &mut Editor, event: &mut InputEvent) {
        if event.is_consumed() {
            return;
        }
        let InputIntent::InsertFromPaste(pasted) = &event.intent else {
            return;
        };
        let url = pasted.trim();
        if !looks_like_url(url) {
            return;
        }
        let Some(sel) = editor.selection() else {
            return;
        };
        if sel.is_collapsed() {
            return;
        }
        let url = url.to_owned();
        if editor.wrap_link(&url) {
            event.consume();
        }
    }

    fn event_handlers(&self) -> &'static [EventKind] {
        &[EventKind::BeforeInput]
    }
}

fn looks_like_url(text: &str) -> bool {
    let rest = text
        .strip_prefix("http://")
        .or_else(|| text.strip_prefix("https://"))
        .or_else(|| text.strip_prefix(uri::SCHEME));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginRegistry;
    use crate::plugins::default_plugins;
    use crate::selection::{Point, Selection};
    use trellis_ast::builder::{group, paragraph, statement_with_id, text};

    fn editor_with_selection(from: usize, to: usize) -> Editor {
        let mut editor = Editor::from_elements(
            &[group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("read this now").into()]).into()])
                    .into(),
            ])],
            PluginRegistry::new(default_plugins()),
        );
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let para = editor.tree().first_child(b1).unwrap();
        let leaf = editor.tree().first_child(para).unwrap();
        editor.set_selection(Some(Selection::new(
            Point::new(leaf, from),
            Point::new(leaf, to),
        )));
        editor
    }

    #[test]
    fn test_pasted_url_becomes_link() {
        let mut editor = editor_with_selection(5, 9);
        let mut event =
            InputEvent::new(InputIntent::InsertFromPaste("https://example.com".into()));
        editor.handle_before_input(&mut event);
        assert!(event.is_consumed());

        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let para = editor.tree().first_child(b1).unwrap();
        let link = editor
            .tree()
            .children(para)
            .iter()
            .copied()
            .find(|n| matches!(editor.tree().kind(*n), NodeKind::Link { .. }));
        assert!(link.is_some());
        assert_eq!(editor.tree().text_of(link.unwrap()), "this");
    }

    #[test]
    fn test_plain_paste_left_alone() {
        let mut editor = editor_with_selection(5, 9);
        let mut event = InputEvent::new(InputIntent::InsertFromPaste("not a url".into()));
        editor.handle_before_input(&mut event);
        assert!(!event.is_consumed());
    }

    #[test]
    fn test_collapsed_selection_left_alone() {
        let mut editor = editor_with_selection(5, 5);
        let mut event =
            InputEvent::new(InputIntent::InsertFromPaste("https://example.com".into()));
        editor.handle_before_input(&mut event);
        assert!(!event.is_consumed());
    }
}
