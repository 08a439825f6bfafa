//! The page compiler.
//!
//! Turns one markdown source into a [`Page`]: rewritten HTML plus the
//! structures the index needs later (title, asides, image references).
//! One post-order walk over the document applies three rewrite rules:
//!
//! - **Images** are resolved through the [`MediaResolver`]: the referenced
//!   basename becomes the output href, and the node's identifier becomes
//!   the href's extensionless basename so the photo list can deep-link to
//!   it (`page.html#sunset`).
//! - **Links** become ruby annotations. The visible text stays as the ruby
//!   base; the percent-decoded destination is appended as the annotation.
//!   Every destination is thereby printed in the output; the pages are
//!   built to work on paper.
//! - **Divs classed `aside`** must contain exactly one level-1 heading,
//!   which is demoted to level 2 (so it nests under the page's own title)
//!   and recorded as the aside's label.
//!
//! After the walk, exactly one level-1 heading must remain: the page
//! title. Zero or several is a structural error naming the page. All
//! rewriting is pure: new nodes are built from the old ones' fields, and
//! recorded asides own their data rather than aliasing into the tree.

use crate::ast::{self, Attr, Document, Node, Target};
use crate::media::{self, MediaError, MediaResolver};
use crate::pandoc::{Converter, PandocError};
use crate::traverse;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Pandoc(#[from] PandocError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("expected exactly 1 level-1 heading in aside \"{container}\", found {count}")]
    AsideHeadings { container: String, count: usize },
    #[error("expected exactly 1 level-1 heading in {}, found {count}", .path.display())]
    TitleHeadings { path: PathBuf, count: usize },
}

/// A labeled side-note extracted from a page, keyed by its heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Aside {
    /// The heading's identifier attribute (pandoc auto-generates these).
    pub id: String,
    /// The heading's inline content, owned.
    pub heading: Vec<Node>,
}

/// A resolved image reference within a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    /// Extensionless basename of the resolved href; doubles as the HTML id.
    pub id: String,
    /// The href the image node now points at.
    pub href: String,
}

/// One compiled page, ready to write and to feed the index.
#[derive(Debug)]
pub struct Page {
    /// Output filename: source stem with the extension replaced by `.html`.
    pub url: String,
    /// The page's sole level-1 heading, as inline content.
    pub title: Vec<Node>,
    pub asides: Vec<Aside>,
    pub images: Vec<ImageRef>,
    /// Media names as referenced in the source, pre-resolution, in
    /// reference order. The driver concatenates these across pages for the
    /// conversion-script report.
    pub original_media: Vec<String>,
    /// Preamble plus pandoc-rendered body.
    pub html: String,
}

/// Everything the page walk extracts alongside the rewritten tree.
#[derive(Debug, Default)]
struct Extracted {
    asides: Vec<Aside>,
    images: Vec<ImageRef>,
    original_media: Vec<String>,
}

/// The fixed boilerplate every output file starts with: doctype,
/// stylesheet link, responsive viewport.
pub fn preamble(stylesheet: &str) -> String {
    format!(
        "<!DOCTYPE html><link rel=stylesheet href={stylesheet} />\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, user-scalable=yes\" />"
    )
}

/// Output filename for a source path: stem plus `.html`.
pub fn page_url(source: &Path) -> String {
    format!("{}.html", media::stem(&source.to_string_lossy()))
}

/// Compile one source page: parse, rewrite, check the title invariant,
/// render.
pub fn compile_page(
    source: &Path,
    converter: &dyn Converter,
    resolver: &MediaResolver,
    preamble: &str,
) -> Result<Page, CompileError> {
    let Document {
        api_version,
        meta,
        blocks,
    } = converter.parse(source)?;

    let mut extracted = Extracted::default();
    let blocks = traverse::postmap_seq(blocks, &mut |node| {
        rewrite_node(node, resolver, &mut extracted)
    })?;

    // Checked after the walk: aside headings were just demoted to level 2,
    // so exactly the page's own title should remain at level 1.
    let h1s = traverse::find_in(&blocks, ast::is_h1);
    if h1s.len() != 1 {
        return Err(CompileError::TitleHeadings {
            path: source.to_path_buf(),
            count: h1s.len(),
        });
    }
    let title = match h1s.into_iter().next() {
        Some(Node::Header(_, _, inlines)) => inlines,
        _ => Vec::new(), // is_h1 only matches headers
    };

    let doc = Document {
        api_version,
        meta,
        blocks,
    };
    let html = format!("{preamble}{}", converter.render(&doc)?);

    Ok(Page {
        url: page_url(source),
        title,
        asides: extracted.asides,
        images: extracted.images,
        original_media: extracted.original_media,
        html,
    })
}

/// The page-level rewrite rule, applied post-order by the traversal.
fn rewrite_node(
    node: Node,
    resolver: &MediaResolver,
    extracted: &mut Extracted,
) -> Result<Vec<Node>, CompileError> {
    match node {
        Node::Image(attr, alt, Target(name, title)) => {
            extracted.original_media.push(name.clone());
            let href = resolver.resolve(&name)?;
            let id = media::stem(&href);
            extracted.images.push(ImageRef {
                id: id.clone(),
                href: href.clone(),
            });
            Ok(vec![Node::Image(
                Attr(id, attr.1, attr.2),
                alt,
                Target(href, title),
            )])
        }
        Node::Link(_attr, content, Target(url, _title)) => {
            let destination = percent_decode_str(&url).decode_utf8_lossy().into_owned();
            let mut out = Vec::with_capacity(content.len() + 5);
            out.push(Node::raw_html("<ruby>"));
            out.extend(content);
            out.push(Node::raw_html("<rt>"));
            out.push(Node::Str(destination));
            out.push(Node::raw_html("</rt>"));
            out.push(Node::raw_html("</ruby>"));
            Ok(out)
        }
        Node::Div(attr, blocks) if attr.has_class("aside") => {
            let h1s = traverse::find_in(&blocks, ast::is_h1);
            if h1s.len() != 1 {
                return Err(CompileError::AsideHeadings {
                    container: attr.0.clone(),
                    count: h1s.len(),
                });
            }
            if let Some(Node::Header(_, heading_attr, inlines)) = h1s.into_iter().next() {
                extracted.asides.push(Aside {
                    id: heading_attr.0,
                    heading: inlines,
                });
            }
            let blocks =
                traverse::postmap_seq(blocks, &mut |n| -> Result<Vec<Node>, CompileError> {
                    Ok(match n {
                        Node::Header(1, heading_attr, inlines) => {
                            vec![Node::Header(2, heading_attr, inlines)]
                        }
                        other => vec![other],
                    })
                })?;
            Ok(vec![Node::Div(attr, blocks)])
        }
        other => Ok(vec![other]),
    }
}
