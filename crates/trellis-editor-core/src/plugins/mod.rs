//! The built-in node plugins.
//!
//! One plugin per node family plus the cross-cutting input plugins. The
//! default set covers every node kind the document model can hydrate;
//! hosts can prepend their own plugins to override rendering.

mod blockquote;
mod code;
mod embed;
mod group;
mod heading;
mod link;
mod markdown;
mod marks;
mod statement;
mod tab;

pub use blockquote::BlockquotePlugin;
pub use code::CodePlugin;
pub use embed::EmbedPlugin;
pub use group::GroupPlugin;
pub use heading::HeadingPlugin;
pub use link::LinkPlugin;
pub use markdown::MarkdownPlugin;
pub use marks::MarksPlugin;
pub use statement::StatementPlugin;
pub use tab::TabPlugin;

use crate::plugin::EditorPlugin;

/// The stock plugin set, in the order the invariants expect: block-shape
/// rules before group rules, input plugins last.
pub fn default_plugins() -> Vec<Box<dyn EditorPlugin>> {
    vec![
        Box::new(HeadingPlugin),
        Box::new(StatementPlugin),
        Box::new(BlockquotePlugin),
        Box::new(CodePlugin),
        Box::new(GroupPlugin),
        Box::new(LinkPlugin),
        Box::new(EmbedPlugin),
        Box::new(MarksPlugin),
        Box::new(MarkdownPlugin),
        Box::new(TabPlugin),
    ]
}
