//! The draft hydration payload.
//!
//! A draft (or publication) is supplied to the editor as a title, subtitle,
//! and the root's grouping children. The shape is otherwise opaque to the
//! editor; it is what the surrounding page loads and saves.

use serde::{Deserialize, Serialize};

use crate::node::Element;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Draft {
    pub fn new(children: Vec<Element>) -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            children,
        }
    }
}
