//! Builder functions for document nodes.
//!
//! Block builders stamp a fresh id; the `*_with_id` variants exist for
//! hydration and tests that need deterministic ids. Builders never validate
//! cross-node invariants.

use smol_str::SmolStr;

use crate::id::BlockId;
use crate::node::{Element, Node, Text};

pub fn group(children: Vec<Node>) -> Element {
    Element::Group { children }
}

pub fn ul(children: Vec<Node>) -> Element {
    Element::UnorderedList { children }
}

pub fn ol(start: Option<u32>, children: Vec<Node>) -> Element {
    Element::OrderedList { start, children }
}

pub fn statement(children: Vec<Node>) -> Element {
    Element::Statement {
        id: BlockId::generate(),
        children,
    }
}

pub fn statement_with_id(id: impl Into<BlockId>, children: Vec<Node>) -> Element {
    Element::Statement {
        id: id.into(),
        children,
    }
}

pub fn heading(children: Vec<Node>) -> Element {
    Element::Heading {
        id: BlockId::generate(),
        children,
    }
}

pub fn heading_with_id(id: impl Into<BlockId>, children: Vec<Node>) -> Element {
    Element::Heading {
        id: id.into(),
        children,
    }
}

pub fn blockquote(children: Vec<Node>) -> Element {
    Element::Blockquote {
        id: BlockId::generate(),
        children,
    }
}

pub fn blockquote_with_id(id: impl Into<BlockId>, children: Vec<Node>) -> Element {
    Element::Blockquote {
        id: id.into(),
        children,
    }
}

pub fn code(lang: Option<SmolStr>, children: Vec<Node>) -> Element {
    Element::Code {
        id: BlockId::generate(),
        lang,
        children,
    }
}

pub fn code_with_id(
    id: impl Into<BlockId>,
    lang: Option<SmolStr>,
    children: Vec<Node>,
) -> Element {
    Element::Code {
        id: id.into(),
        lang,
        children,
    }
}

pub fn paragraph(children: Vec<Node>) -> Element {
    Element::Paragraph { children }
}

pub fn static_paragraph(children: Vec<Node>) -> Element {
    Element::StaticParagraph { children }
}

pub fn link(url: impl Into<SmolStr>, children: Vec<Node>) -> Element {
    Element::Link {
        url: url.into(),
        children,
    }
}

pub fn embed(url: impl Into<SmolStr>) -> Element {
    Element::Embed {
        url: url.into(),
        children: vec![Node::Text(Text::default())],
    }
}

pub fn image(url: impl Into<SmolStr>, alt: impl Into<SmolStr>) -> Element {
    Element::Image {
        url: url.into(),
        alt: alt.into(),
        // Void inlines still carry an empty text child so the editor has a
        // selectable leaf.
        children: vec![Node::Text(Text::default())],
    }
}

pub fn video(url: impl Into<SmolStr>, alt: impl Into<SmolStr>) -> Element {
    Element::Video {
        url: url.into(),
        alt: alt.into(),
        children: vec![Node::Text(Text::default())],
    }
}

pub fn text(content: impl Into<String>) -> Text {
    Text::new(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_builders_stamp_ids() {
        let a = statement(vec![]);
        let b = statement(vec![]);
        assert_ne!(a.id(), b.id());
        assert!(heading(vec![]).id().is_some());
        assert!(blockquote(vec![]).id().is_some());
        assert!(code(None, vec![]).id().is_some());
    }

    #[test]
    fn test_containers_have_no_id() {
        assert!(group(vec![]).id().is_none());
        assert!(ul(vec![]).id().is_none());
        assert!(ol(Some(4), vec![]).id().is_none());
    }

    #[test]
    fn test_void_inlines_carry_empty_leaf() {
        let img = image("trellis://doc1/v1/b1", "a caption");
        assert_eq!(img.children().len(), 1);
        assert_eq!(img.children()[0].as_text().unwrap().text, "");
    }
}
