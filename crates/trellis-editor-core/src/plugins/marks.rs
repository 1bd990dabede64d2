//! Text formatting: leaf rendering and the format input intents.

use trellis_ast::Mark;

use crate::editor::Editor;
use crate::events::{EventKind, InputEvent, InputIntent};
use crate::plugin::{EditorPlugin, LeafView};
use crate::tree::NodeId;

pub struct MarksPlugin;

impl EditorPlugin for MarksPlugin {
    fn name(&self) -> &'static str {
        "marks"
    }

    fn render_leaf(&self, editor: &Editor, node: NodeId) -> Option<LeafView> {
        let marks = editor.tree().leaf_marks(node)?;
        if marks.is_plain() {
            return None;
        }
        let classes = Mark::ALL
            .iter()
            .copied()
            .filter(|mark| marks.has(*mark))
            .map(|mark| mark.name().into())
            .collect();
        Some(LeafView {
            classes,
            color: marks.color.clone(),
        })
    }

    fn on_before_input(&self, editor: &mut Editor, event: &mut InputEvent) {
        if event.is_consumed() {
            return;
        }
        let mark = match event.intent {
            InputIntent::FormatBold => Mark::Strong,
            InputIntent::FormatItalic => Mark::Emphasis,
            InputIntent::FormatUnderline => Mark::Underline,
            InputIntent::FormatStrikethrough => Mark::Strikethrough,
            InputIntent::FormatSuperscript => Mark::Superscript,
            InputIntent::FormatSubscript => Mark::Subscript,
            _ => return,
        };
        if editor.toggle_mark(mark) {
            event.consume();
        }
    }

    fn event_handlers(&self) -> &'static [EventKind] {
        &[EventKind::BeforeInput]
    }
}
