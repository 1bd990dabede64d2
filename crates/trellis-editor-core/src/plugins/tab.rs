//! Tab reparenting: Tab promotes the selected block one level, Shift+Tab
//! demotes it under its previous sibling. The key is always consumed when a
//! block is selected, so focus never leaves the editor.

use crate::editor::Editor;
use crate::events::{EventKind, Key, KeyEvent};
use crate::plugin::EditorPlugin;

pub struct TabPlugin;

impl EditorPlugin for TabPlugin {
    fn name(&self) -> &'static str {
        "tab"
    }

    fn on_key_down(&self, editor: &mut Editor, event: &mut KeyEvent) {
        if event.is_consumed() || event.key != Key::Tab {
            return;
        }
        let Some(block) = editor.selected_block() else {
            return;
        };
        if event.modifiers.shift {
            editor.demote_block(block);
        } else {
            editor.promote_block(block);
        }
        event.consume();
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
    use pretty_assertions::assert_eq;
    use trellis_ast::Element;
    use trellis_ast::builder::{group, paragraph, statement_with_id, text, ul};

    fn editor_with_cursor(body: Vec<Element>, block: &str) -> Editor {
        let mut editor = Editor::from_elements(&body, PluginRegistry::new(default_plugins()));
        let block = editor.tree().block_by_id(&block.into()).unwrap();
        let para = editor.tree().first_child(block).unwrap();
        let leaf = editor.tree().first_child(para).unwrap();
        editor.set_selection(Some(Selection::collapsed(Point::new(leaf, 0))));
        editor
    }

    #[test]
    fn test_tab_at_root_depth_is_noop() {
        let mut editor = editor_with_cursor(
            vec![group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("one").into()]).into()]).into(),
            ])],
            "b1",
        );
        let before = editor.extract();

        let mut event = KeyEvent::new(Key::Tab, Modifiers::NONE);
        editor.handle_key_down(&mut event);
        assert!(event.is_consumed());
        assert_eq!(editor.extract(), before);
    }

    #[test]
    fn test_tab_promotes_nested_block() {
        let mut editor = editor_with_cursor(
            vec![group(vec![
                statement_with_id(
                    "b1",
                    vec![
                        paragraph(vec![text("one").into()]).into(),
                        ul(vec![
                            statement_with_id(
                                "b2",
                                vec![paragraph(vec![text("two").into()]).into()],
                            )
                            .into(),
                        ])
                        .into(),
                    ],
                )
                .into(),
            ])],
            "b2",
        );

        let mut event = KeyEvent::new(Key::Tab, Modifiers::NONE);
        editor.handle_key_down(&mut event);
        assert!(event.is_consumed());
        let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
        assert_eq!(editor.tree().flow_above(b2), None);
    }

    #[test]
    fn test_tab_promote_leaves_no_empty_container() {
        let mut editor = editor_with_cursor(
            vec![group(vec![
                statement_with_id(
                    "b1",
                    vec![
                        paragraph(vec![text("one").into()]).into(),
                        ul(vec![
                            statement_with_id(
                                "b2",
                                vec![paragraph(vec![text("two").into()]).into()],
                            )
                            .into(),
                        ])
                        .into(),
                    ],
                )
                .into(),
            ])],
            "b2",
        );

        let mut event = KeyEvent::new(Key::Tab, Modifiers::NONE);
        editor.handle_key_down(&mut event);

        // The list the promoted block left behind is dissolved by the time
        // the handler returns, not on some later edit.
        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        assert_eq!(editor.tree().child_count(b1), 1);
        for node in editor.tree().descendants(editor.tree().root()) {
            if editor.tree().kind(node).is_group() {
                assert!(editor.tree().child_count(node) >= 1);
            }
        }
    }

    #[test]
    fn test_shift_tab_demotes_under_prev_sibling() {
        let mut editor = editor_with_cursor(
            vec![group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("one").into()]).into()]).into(),
                statement_with_id("b2", vec![paragraph(vec![text("two").into()]).into()]).into(),
            ])],
            "b2",
        );

        let mut event = KeyEvent::new(Key::Tab, Modifiers::SHIFT);
        editor.handle_key_down(&mut event);
        assert!(event.is_consumed());

        let b1 = editor.tree().block_by_id(&"b1".into()).unwrap();
        let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
        assert_eq!(editor.tree().flow_above(b2), Some(b1));
        // The fresh container holds the demoted block alone.
        let container = editor.tree().parent(b2).unwrap();
        assert!(editor.tree().kind(container).is_group());
        assert_eq!(editor.tree().child_count(container), 1);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut editor = editor_with_cursor(
            vec![group(vec![
                statement_with_id("b1", vec![paragraph(vec![text("one").into()]).into()]).into(),
            ])],
            "b1",
        );
        let mut event = KeyEvent::new(Key::Enter, Modifiers::NONE);
        editor.handle_key_down(&mut event);
        assert!(!event.is_consumed());
    }
}
