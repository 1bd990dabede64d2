//! The node schema: a tagged union over every node type the editor knows.
//!
//! Serialization matches the hydration payload: elements are internally
//! tagged (`{"type": "statement", ...}`), text runs are bare objects with a
//! `text` field and flattened mark flags.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::id::BlockId;

/// Any node in the document tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    /// Phrasing content: text runs and inline elements that flow inside
    /// a paragraph.
    pub fn is_phrasing(&self) -> bool {
        match self {
            Node::Text(_) => true,
            Node::Element(el) => matches!(
                el,
                Element::Link { .. }
                    | Element::Embed { .. }
                    | Element::Image { .. }
                    | Element::Video { .. }
            ),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Node::Text(t)
    }
}

/// An element node.
///
/// Containers (group/lists) hold an ordered sequence of blocks. Blocks
/// (statement/heading/blockquote/code) hold exactly one content child
/// (paragraph or staticParagraph) optionally followed by one nested
/// container. Inline elements (link/embed/image/video) live inside
/// paragraphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Group {
        children: Vec<Node>,
    },
    UnorderedList {
        children: Vec<Node>,
    },
    OrderedList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u32>,
        children: Vec<Node>,
    },
    Statement {
        id: BlockId,
        children: Vec<Node>,
    },
    Heading {
        id: BlockId,
        children: Vec<Node>,
    },
    Blockquote {
        id: BlockId,
        children: Vec<Node>,
    },
    Code {
        id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<SmolStr>,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    StaticParagraph {
        children: Vec<Node>,
    },
    Link {
        url: SmolStr,
        children: Vec<Node>,
    },
    Embed {
        url: SmolStr,
        children: Vec<Node>,
    },
    Image {
        url: SmolStr,
        #[serde(default, skip_serializing_if = "SmolStr::is_empty")]
        alt: SmolStr,
        children: Vec<Node>,
    },
    Video {
        url: SmolStr,
        #[serde(default, skip_serializing_if = "SmolStr::is_empty")]
        alt: SmolStr,
        children: Vec<Node>,
    },
}

/// The three container kinds, as a value (used by `set_list` and the
/// editor's group nodes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Group,
    UnorderedList,
    OrderedList { start: Option<u32> },
}

impl Element {
    /// The serialized tag name for this element.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Group { .. } => "group",
            Element::UnorderedList { .. } => "unorderedList",
            Element::OrderedList { .. } => "orderedList",
            Element::Statement { .. } => "statement",
            Element::Heading { .. } => "heading",
            Element::Blockquote { .. } => "blockquote",
            Element::Code { .. } => "code",
            Element::Paragraph { .. } => "paragraph",
            Element::StaticParagraph { .. } => "staticParagraph",
            Element::Link { .. } => "link",
            Element::Embed { .. } => "embed",
            Element::Image { .. } => "image",
            Element::Video { .. } => "video",
        }
    }

    /// Flow content: block-level nodes carrying a stable id.
    pub fn is_flow_content(&self) -> bool {
        matches!(
            self,
            Element::Statement { .. }
                | Element::Heading { .. }
                | Element::Blockquote { .. }
                | Element::Code { .. }
        )
    }

    /// Grouping content: containers holding an ordered sequence of blocks.
    pub fn is_group_content(&self) -> bool {
        matches!(
            self,
            Element::Group { .. } | Element::UnorderedList { .. } | Element::OrderedList { .. }
        )
    }

    /// Content: the editable paragraph of a block.
    pub fn is_content(&self) -> bool {
        matches!(self, Element::Paragraph { .. })
    }

    /// Static content: the non-block paragraph of a heading.
    pub fn is_static_content(&self) -> bool {
        matches!(self, Element::StaticParagraph { .. })
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Element::Link { .. }
                | Element::Embed { .. }
                | Element::Image { .. }
                | Element::Video { .. }
        )
    }

    /// The stable id, for flow content.
    pub fn id(&self) -> Option<&BlockId> {
        match self {
            Element::Statement { id, .. }
            | Element::Heading { id, .. }
            | Element::Blockquote { id, .. }
            | Element::Code { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Element::Group { children }
            | Element::UnorderedList { children }
            | Element::OrderedList { children, .. }
            | Element::Statement { children, .. }
            | Element::Heading { children, .. }
            | Element::Blockquote { children, .. }
            | Element::Code { children, .. }
            | Element::Paragraph { children }
            | Element::StaticParagraph { children }
            | Element::Link { children, .. }
            | Element::Embed { children, .. }
            | Element::Image { children, .. }
            | Element::Video { children, .. } => children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Element::Group { children }
            | Element::UnorderedList { children }
            | Element::OrderedList { children, .. }
            | Element::Statement { children, .. }
            | Element::Heading { children, .. }
            | Element::Blockquote { children, .. }
            | Element::Code { children, .. }
            | Element::Paragraph { children }
            | Element::StaticParagraph { children }
            | Element::Link { children, .. }
            | Element::Embed { children, .. }
            | Element::Image { children, .. }
            | Element::Video { children, .. } => children,
        }
    }
}

/// A text run with optional marks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(flatten)]
    pub marks: MarkSet,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::default(),
        }
    }
}

/// Boolean inline marks, toggled by formatting intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    Strong,
    Emphasis,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Code,
}

impl Mark {
    pub const ALL: [Mark; 7] = [
        Mark::Strong,
        Mark::Emphasis,
        Mark::Underline,
        Mark::Strikethrough,
        Mark::Superscript,
        Mark::Subscript,
        Mark::Code,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mark::Strong => "strong",
            Mark::Emphasis => "emphasis",
            Mark::Underline => "underline",
            Mark::Strikethrough => "strikethrough",
            Mark::Superscript => "superscript",
            Mark::Subscript => "subscript",
            Mark::Code => "code",
        }
    }
}

/// The marks applied to one text run.
///
/// Serialized flattened into the text object, omitting unset flags, so a
/// plain run round-trips as just `{"text": "..."}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSet {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strong: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub emphasis: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SmolStr>,
}

impl MarkSet {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Strong => self.strong,
            Mark::Emphasis => self.emphasis,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
            Mark::Superscript => self.superscript,
            Mark::Subscript => self.subscript,
            Mark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Strong => self.strong = on,
            Mark::Emphasis => self.emphasis = on,
            Mark::Underline => self.underline = on,
            Mark::Strikethrough => self.strikethrough = on,
            Mark::Superscript => self.superscript = on,
            Mark::Subscript => self.subscript = on,
            Mark::Code => self.code = on,
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.set(mark, true);
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// The marks set on this run, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = Mark> + '_ {
        Mark::ALL.into_iter().filter(|m| self.has(*m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{group, paragraph, statement_with_id, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_tag_names_round_trip() {
        let el = group(vec![
            statement_with_id("b1", vec![paragraph(vec![text("hi").into()]).into()]).into(),
        ]);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "group");
        assert_eq!(json["children"][0]["type"], "statement");
        assert_eq!(json["children"][0]["id"], "b1");
        assert_eq!(json["children"][0]["children"][0]["type"], "paragraph");
        assert_eq!(
            json["children"][0]["children"][0]["children"][0]["text"],
            "hi"
        );

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_plain_text_serializes_bare() {
        let node: Node = text("plain").into();
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"text":"plain"}"#);
    }

    #[test]
    fn test_marked_text_round_trip() {
        let mut t = Text::new("bold");
        t.marks.strong = true;
        t.marks.color = Some("#ff0000".into());
        let json = serde_json::to_value(Node::Text(t.clone())).unwrap();
        assert_eq!(json["strong"], true);
        assert_eq!(json["color"], "#ff0000");
        assert!(json.get("emphasis").is_none());

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, Node::Text(t));
    }

    #[test]
    fn test_predicates() {
        let st = statement_with_id("b1", vec![]);
        assert!(st.is_flow_content());
        assert!(!st.is_group_content());
        assert_eq!(st.id().unwrap(), &BlockId::from("b1"));

        let g = group(vec![]);
        assert!(g.is_group_content());
        assert!(g.id().is_none());

        let p = paragraph(vec![]);
        assert!(p.is_content());
        assert!(!p.is_static_content());
    }

    #[test]
    fn test_ordered_list_start_omitted_when_none() {
        let ol = Element::OrderedList {
            start: None,
            children: vec![],
        };
        let json = serde_json::to_value(&ol).unwrap();
        assert!(json.get("start").is_none());

        let ol = Element::OrderedList {
            start: Some(3),
            children: vec![],
        };
        let json = serde_json::to_value(&ol).unwrap();
        assert_eq!(json["start"], 3);
    }

    #[test]
    fn test_markset_active() {
        let marks = MarkSet::default().with(Mark::Strong).with(Mark::Code);
        let active: Vec<_> = marks.active().collect();
        assert_eq!(active, vec![Mark::Strong, Mark::Code]);
        assert!(!marks.is_plain());
        assert!(MarkSet::default().is_plain());
    }
}
