//! The index compiler.
//!
//! Runs once, after every page has compiled, over `index.md`. The index
//! source marks injection points with literal code blocks; the walk
//! replaces them and leaves everything else alone:
//!
//! ````text
//! ```table of contents```   →  nested bullet list: one item per page
//!                              (title linked to the page, photo count),
//!                              each with a sub-list of aside links
//! ```inject photo list```   →  <script>const photo_list = [...]</script>
//! ````
//!
//! Page order in the table of contents is exactly the order pages were
//! compiled in; the photo list is ordered by page, then by in-page
//! encounter.

use crate::ast::{Document, Node};
use crate::page::Aside;
use crate::pandoc::{Converter, PandocError};
use crate::traverse;
use std::path::Path;
use thiserror::Error;

/// Placeholder markers recognized in the index source.
const TOC_MARKER: &str = "table of contents";
const PHOTO_LIST_MARKER: &str = "inject photo list";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Pandoc(#[from] PandocError),
    #[error("failed to serialize photo list: {0}")]
    PhotoList(#[from] serde_json::Error),
}

/// One page's contribution to the table of contents.
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub url: String,
    pub title: Vec<Node>,
    pub asides: Vec<Aside>,
    pub image_count: usize,
}

/// `(anchor URL, media path)` pairs, in global encounter order. Serialized
/// verbatim into the index for client-side use.
pub type PhotoList = Vec<(String, String)>;

/// Compile the index source: substitute placeholders, render, prepend the
/// preamble.
pub fn compile_index(
    source: &Path,
    converter: &dyn Converter,
    entries: &[TocEntry],
    photos: &PhotoList,
    preamble: &str,
) -> Result<String, IndexError> {
    let Document {
        api_version,
        meta,
        blocks,
    } = converter.parse(source)?;
    let blocks =
        traverse::postmap_seq(blocks, &mut |node| rewrite_block(node, entries, photos))?;
    let doc = Document {
        api_version,
        meta,
        blocks,
    };
    Ok(format!("{preamble}{}", converter.render(&doc)?))
}

/// The index-level rewrite rule: placeholder code blocks are replaced,
/// every other node passes through.
fn rewrite_block(
    node: Node,
    entries: &[TocEntry],
    photos: &PhotoList,
) -> Result<Vec<Node>, IndexError> {
    match node {
        Node::CodeBlock(attr, text) => match text.as_str() {
            TOC_MARKER => Ok(vec![contents_list(entries)]),
            PHOTO_LIST_MARKER => Ok(vec![photo_script(photos)?]),
            _ => Ok(vec![Node::CodeBlock(attr, text)]),
        },
        other => Ok(vec![other]),
    }
}

/// The table of contents: one bullet per page (linked title, photo count)
/// with a nested bullet list of that page's asides.
fn contents_list(entries: &[TocEntry]) -> Node {
    let items = entries
        .iter()
        .map(|entry| {
            let heading = Node::Plain(vec![
                Node::link(entry.title.clone(), entry.url.clone()),
                Node::Space,
                Node::Str(format!("({} pictures)", entry.image_count)),
            ]);
            let asides = Node::BulletList(
                entry
                    .asides
                    .iter()
                    .map(|aside| {
                        vec![Node::Plain(vec![Node::link(
                            aside.heading.clone(),
                            format!("{}#{}", entry.url, aside.id),
                        )])]
                    })
                    .collect(),
            );
            vec![heading, asides]
        })
        .collect();
    Node::BulletList(items)
}

/// The embedded client payload: the photo list as a literal array of
/// `[anchor, media path]` pairs.
fn photo_script(photos: &PhotoList) -> Result<Node, IndexError> {
    let payload = serde_json::to_string(photos)?;
    Ok(Node::raw_html_block(format!(
        "<script>const photo_list = {payload}</script>"
    )))
}
