//! Code block rendering and syntax-highlight decorations.
//!
//! Highlighting runs through syntect against the bundled grammar set,
//! loaded lazily on first use. A language token without a grammar, or a
//! highlighter error, logs and renders the block unhighlighted.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::editor::Editor;
use crate::plugin::{Decoration, EditorPlugin, ElementView};
use crate::tree::{NodeId, NodeKind};

pub struct CodePlugin;

impl EditorPlugin for CodePlugin {
    fn name(&self) -> &'static str {
        "code"
    }

    fn render_element(&self, editor: &Editor, node: NodeId) -> Option<ElementView> {
        match editor.tree().kind(node) {
            NodeKind::Code { id, lang } => {
                let view =
                    ElementView::new("pre", "code-block").with_attr("data-block-id", id.as_str());
                Some(match lang {
                    Some(lang) => view.with_attr("data-lang", lang.clone()),
                    None => view,
                })
            }
            _ => None,
        }
    }

    fn decorate(&self, editor: &Editor, node: NodeId) -> Vec<Decoration> {
        let Some(text) = editor.tree().leaf_text(node) else {
            return Vec::new();
        };
        let Some(code) = editor.tree().above(node, |kind| {
            matches!(kind, NodeKind::Code { .. })
        }) else {
            return Vec::new();
        };
        let NodeKind::Code {
            lang: Some(lang), ..
        } = editor.tree().kind(code)
        else {
            return Vec::new();
        };

        let syntaxes = syntax_set();
        let Some(syntax) = syntaxes.find_syntax_by_token(lang) else {
            tracing::debug!(%lang, "no grammar for language token");
            return Vec::new();
        };

        let mut highlighter = HighlightLines::new(syntax, theme());
        let mut decorations = Vec::new();
        let mut offset = 0usize;
        for line in LinesWithEndings::from(text) {
            let ranges = match highlighter.highlight_line(line, syntaxes) {
                Ok(ranges) => ranges,
                Err(err) => {
                    tracing::debug!(%lang, %err, "highlighting failed");
                    return Vec::new();
                }
            };
            for (style, run) in ranges {
                let len = run.chars().count();
                let fg = style.foreground;
                decorations.push(Decoration {
                    leaf: node,
                    range: offset..offset + len,
                    class: None,
                    color: Some(format!("#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b).into()),
                });
                offset += len;
            }
        }
        decorations
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let mut themes = ThemeSet::load_defaults();
        themes
            .themes
            .remove("base16-ocean.dark")
            .expect("bundled theme present")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginRegistry;
    use crate::plugins::default_plugins;
    use trellis_ast::builder::{code_with_id, group, paragraph, text};

    fn editor_with_code(lang: Option<&str>, source: &str) -> Editor {
        Editor::from_elements(
            &[group(vec![
                code_with_id(
                    "c1",
                    lang.map(Into::into),
                    vec![paragraph(vec![text(source).into()]).into()],
                )
                .into(),
            ])],
            PluginRegistry::new(default_plugins()),
        )
    }

    fn code_leaf(editor: &Editor) -> NodeId {
        let c1 = editor.tree().block_by_id(&"c1".into()).unwrap();
        let para = editor.tree().first_child(c1).unwrap();
        editor.tree().first_child(para).unwrap()
    }

    #[test]
    fn test_render_carries_lang() {
        let editor = editor_with_code(Some("rust"), "fn main() {}");
        let c1 = editor.tree().block_by_id(&"c1".into()).unwrap();
        let view = editor.render_element(c1);
        assert_eq!(view.tag, "pre");
        assert!(view.attrs.contains(&("data-lang".into(), "rust".into())));
    }

    #[test]
    fn test_known_language_gets_decorations() {
        let editor = editor_with_code(Some("rust"), "fn main() {}");
        let leaf = code_leaf(&editor);
        let decorations = editor.decorations(leaf);
        assert!(!decorations.is_empty());
        assert!(decorations.iter().all(|d| d.color.is_some()));
        // Ranges tile the text from the start.
        assert_eq!(decorations[0].range.start, 0);
    }

    #[test]
    fn test_unknown_language_renders_plain() {
        let editor = editor_with_code(Some("not-a-language"), "plain text");
        assert!(editor.decorations(code_leaf(&editor)).is_empty());
    }

    #[test]
    fn test_no_language_renders_plain() {
        let editor = editor_with_code(None, "plain text");
        assert!(editor.decorations(code_leaf(&editor)).is_empty());
    }
}
