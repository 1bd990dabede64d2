//! Markdown-style space shortcuts.
//!
//! Typing a marker at the start of a block and hitting space converts the
//! block: `-`/`*`/`+` for bullet lists, `N.` for numbered lists, `#` for a
//! heading, and a backtick fence for code. The marker text is removed as
//! part of the conversion.

use trellis_ast::GroupKind;

use crate::commands::BlockType;
use crate::editor::Editor;
use crate::events::{EventKind, InputEvent, InputIntent};
use crate::plugin::EditorPlugin;
use crate::selection::Point;
use crate::tree::NodeId;

pub struct MarkdownPlugin;

enum Shortcut {
    List(GroupKind),
    Block(BlockType),
}

impl EditorPlugin for MarkdownPlugin {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn on_before_input(&self, editor: &mut Editor, event: &mut InputEvent) {
        if event.is_consumed() {
            return;
        }
        let InputIntent::InsertText(inserted) = &event.intent else {
            return;
        };
        if inserted != " " {
            return;
        }
        let Some(sel) = editor.selection() else {
            return;
        };
        if !sel.is_collapsed() {
            return;
        }
        let Some(block) = editor.tree().enclosing_flow(sel.anchor.node) else {
            return;
        };
        let Some(content) = editor.tree().first_child(block) else {
            return;
        };
        if !editor.tree().kind(content).is_content() {
            return;
        }
        let Some(marker) = editor.text_before_in(content, sel.anchor) else {
            return;
        };
        let Some(shortcut) = parse_shortcut(&marker) else {
            return;
        };

        let start = first_leaf(editor, content);
        editor.without_normalizing(|editor| {
            if let Some(start) = start {
                editor.delete_between(Point::new(start, 0), sel.anchor);
            }
            match shortcut {
                Shortcut::List(kind) => convert_to_list(editor, block, kind),
                Shortcut::Block(ty) => {
                    editor.set_type(block, ty);
                }
            }
        });
        event.consume();
    }

    fn event_handlers(&self) -> &'static [EventKind] {
        &[EventKind::BeforeInput]
    }
}

/// Match the text between block start and cursor against the shortcuts.
fn parse_shortcut(marker: &str) -> Option<Shortcut> {
    match marker {
        "-" | "*" | "+" => return Some(Shortcut::List(GroupKind::UnorderedList)),
        "#" => return Some(Shortcut::Block(BlockType::Heading)),
        "```" => return Some(Shortcut::Block(BlockType::Code)),
        _ => {}
    }
    let digits = marker.strip_suffix('.')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let start = digits.parse::<u32>().ok()?;
    Some(Shortcut::List(GroupKind::OrderedList {
        start: (start != 1).then_some(start),
    }))
}

/// A block that opens a list: the first block of a group retypes the whole
/// group; any later block nests as a fresh list under its previous sibling.
fn convert_to_list(editor: &mut Editor, block: NodeId, kind: GroupKind) {
    if editor.tree().is_first_child(block) {
        editor.set_list(block, kind);
        return;
    }
    let Some(prev) = editor.tree().prev_sibling(block) else {
        return;
    };
    if !editor.tree().kind(prev).is_flow() {
        return;
    }
    if editor.demote_block(block) {
        editor.set_list(block, kind);
    }
}

fn first_leaf(editor: &Editor, node: NodeId) -> Option<NodeId> {
    editor
        .tree()
        .descendants(node)
        .into_iter()
        .find(|n| editor.tree().kind(*n).is_text())
}
