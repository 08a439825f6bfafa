//! Shared test utilities for the contact-sheet test suite.
//!
//! Provides terse AST constructors (tests build documents by hand, not
//! through pandoc) and [`MockConverter`], the in-memory stand-in for the
//! pandoc boundary: `parse` serves staged documents by source path and
//! `render` emits the document's JSON encoding, so tests can make
//! substring assertions against "HTML" without pandoc installed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ast::{Attr, Document, Node, Target};
use crate::pandoc::{Converter, PandocError};

// =========================================================================
// AST constructors
// =========================================================================

pub fn text(s: &str) -> Node {
    Node::Str(s.to_string())
}

/// A level-1 heading with the given identifier and a single-word title.
pub fn h1(id: &str, title: &str) -> Node {
    Node::Header(
        1,
        Attr(id.to_string(), Vec::new(), Vec::new()),
        vec![text(title)],
    )
}

/// An image node referencing a photo by basename, as a bare
/// `![](name.jpg)` parses.
pub fn image(name: &str) -> Node {
    Node::Image(
        Attr::default(),
        Vec::new(),
        Target(name.to_string(), String::new()),
    )
}

/// A container div classed `aside`.
pub fn aside_div(blocks: Vec<Node>) -> Node {
    Node::Div(
        Attr(String::new(), vec!["aside".to_string()], Vec::new()),
        blocks,
    )
}

/// A code block whose literal text is a placeholder marker.
pub fn placeholder(marker: &str) -> Node {
    Node::CodeBlock(Attr::default(), marker.to_string())
}

/// A document with empty metadata around the given blocks.
pub fn doc(blocks: Vec<Node>) -> Document {
    Document {
        api_version: serde_json::json!([1, 23, 1]),
        meta: serde_json::json!({}),
        blocks,
    }
}

// =========================================================================
// Mock converter
// =========================================================================

/// In-memory [`Converter`]: staged documents in, JSON-encoded trees out.
#[derive(Default)]
pub struct MockConverter {
    docs: RefCell<BTreeMap<PathBuf, Document>>,
}

impl MockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the document `parse` will return for `source`.
    pub fn stage(&self, source: impl Into<PathBuf>, doc: Document) {
        self.docs.borrow_mut().insert(source.into(), doc);
    }
}

impl Converter for MockConverter {
    fn parse(&self, source: &Path) -> Result<Document, PandocError> {
        self.docs
            .borrow()
            .get(source)
            .cloned()
            .ok_or_else(|| PandocError::Failed {
                program: "mock".to_string(),
                stderr: format!("no staged document for {}", source.display()),
            })
    }

    fn render(&self, doc: &Document) -> Result<String, PandocError> {
        Ok(serde_json::to_string(doc)?)
    }
}
