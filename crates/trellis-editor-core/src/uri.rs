//! `trellis://` document references.
//!
//! An embed or link can point at another document, optionally pinned to a
//! version and narrowed to a block:
//!
//! ```text
//! trellis://<document-id>[/<version-id>][/#<block-id>]
//! ```

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

pub const SCHEME: &str = "trellis://";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("reference does not start with {SCHEME}: {0:?}")]
    WrongScheme(String),
    #[error("reference has no document id: {0:?}")]
    MissingDocument(String),
    #[error("reference has too many segments: {0:?}")]
    TrailingSegments(String),
}

/// A parsed reference to (part of) a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocRef {
    pub doc: SmolStr,
    pub version: Option<SmolStr>,
    pub block: Option<SmolStr>,
}

impl DocRef {
    pub fn new(doc: impl Into<SmolStr>) -> Self {
        Self {
            doc: doc.into(),
            version: None,
            block: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<SmolStr>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_block(mut self, block: impl Into<SmolStr>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Parse a `trellis://` reference.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let Some(rest) = input.strip_prefix(SCHEME) else {
            return Err(UriError::WrongScheme(input.to_owned()));
        };
        let (rest, block) = match rest.split_once('#') {
            Some((head, block)) if !block.is_empty() => {
                (head.trim_end_matches('/'), Some(SmolStr::from(block)))
            }
            Some((head, _)) => (head.trim_end_matches('/'), None),
            None => (rest.trim_end_matches('/'), None),
        };
        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let Some(doc) = segments.next() else {
            return Err(UriError::MissingDocument(input.to_owned()));
        };
        let version = segments.next().map(SmolStr::from);
        if segments.next().is_some() {
            return Err(UriError::TrailingSegments(input.to_owned()));
        }
        Ok(Self {
            doc: doc.into(),
            version,
            block,
        })
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}", self.doc)?;
        if let Some(version) = &self.version {
            write!(f, "/{version}")?;
        }
        if let Some(block) = &self.block {
            write!(f, "/#{block}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DocRef {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
