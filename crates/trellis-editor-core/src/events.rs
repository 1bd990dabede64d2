//! Platform-agnostic input events.
//!
//! `Key`/`Modifiers` describe keyboard state; `InputIntent` carries the
//! semantic intent of a beforeinput-style event (based on the W3C Input
//! Events types, usable from any host). Handlers mark an event consumed to
//! suppress the host's default behavior; dispatch itself never
//! short-circuits.

use smol_str::SmolStr;

/// Key values the editor dispatches on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    /// Unrecognized key.
    Unidentified,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }
}

/// Modifier key state for a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };
}

/// A keyboard event passing through the plugin chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    consumed: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            consumed: false,
        }
    }

    /// Suppress the host's default behavior (the preventDefault analogue).
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Semantic intent of a beforeinput-style event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputIntent {
    /// Insert typed text.
    InsertText(String),
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert a soft line break (Shift+Enter).
    InsertLineBreak,
    /// Insert pasted data (plain text form).
    InsertFromPaste(String),

    DeleteContentBackward,
    DeleteContentForward,

    FormatBold,
    FormatItalic,
    FormatUnderline,
    FormatStrikethrough,
    FormatSuperscript,
    FormatSubscript,

    /// Unrecognized input type, carried verbatim.
    Unknown(String),
}

impl InputIntent {
    pub fn is_formatting(&self) -> bool {
        matches!(
            self,
            Self::FormatBold
                | Self::FormatItalic
                | Self::FormatUnderline
                | Self::FormatStrikethrough
                | Self::FormatSuperscript
                | Self::FormatSubscript
        )
    }
}

/// An input event passing through the plugin chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub intent: InputIntent,
    consumed: bool,
}

impl InputEvent {
    pub fn new(intent: InputIntent) -> Self {
        Self {
            intent,
            consumed: false,
        }
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// The DOM-level event classes plugins can listen to; the host asks the
/// registry which of these it must wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    KeyDown,
    BeforeInput,
}
