//! Selection state: a pair of points into text leaves.
//!
//! Points address a text leaf by arena handle plus a character offset, so
//! they stay valid across sibling edits without path fixups.

use crate::tree::NodeId;

/// A position inside a text leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub node: NodeId,
    /// Character offset into the leaf (not bytes).
    pub offset: usize,
}

impl Point {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A selection between two points. Anchor is where the selection started,
/// focus is where the cursor is now; they may be in either document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}
