//! # Contact Sheet
//!
//! A minimal static site compiler for markdown photo essays. Each markdown
//! page describes photographs and annotations; the compiler turns the set
//! into a static website: one HTML file per page, an `index.html` with a
//! table of contents, and a client-side photo list for lightbox/search use.
//!
//! # Architecture: AST Rewriting Over Pandoc
//!
//! Contact Sheet does not parse markdown or render HTML itself. Pandoc does
//! both, at a narrow subprocess boundary: markdown in, JSON AST out, and
//! (after rewriting) JSON AST in, HTML out. Everything interesting happens
//! in between, as rewrites over the document tree:
//!
//! ```text
//! 1. Parse     page.md   →  Document        (pandoc --to json)
//! 2. Rewrite   Document  →  Document + Page (images, links, asides, title)
//! 3. Render    Document  →  page.html       (pandoc --from json --to html)
//! 4. Index     all Pages →  index.html      (table of contents, photo list)
//! ```
//!
//! The rewrite engine is deliberately generic: [`traverse::postmap`] is a
//! post-order tree rewrite where each step may replace one node with zero,
//! one, or many siblings, and [`traverse::find`] is the same walk used as a
//! pure collector. Page- and index-specific behavior is just a rewrite
//! function handed to the engine.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ast`] | Document tree: the closed [`ast::Node`] sum type over pandoc's JSON encoding |
//! | [`traverse`] | Generic post-order rewrite (`postmap`) and search (`find`) over the tree |
//! | [`media`] | Photo listing, basename uniqueness, publish/local-preview path resolution |
//! | [`pandoc`] | The subprocess boundary: [`pandoc::Converter`] trait and production implementation |
//! | [`page`] | Page compiler: image resolution, ruby link annotation, aside extraction |
//! | [`index`] | Index compiler: table-of-contents and photo-list placeholder substitution |
//! | [`build`] | Batch driver: sequential page loop, accumulation, output writing |
//! | [`config`] | `contact-sheet.toml` loading, defaults, stock config generation |
//! | [`output`] | CLI output formatting for build and check runs |
//!
//! # Design Decisions
//!
//! ## A Closed Node Type
//!
//! The pandoc AST is open-ended; this compiler's dispatch is not. [`ast::Node`]
//! is a closed sum type covering exactly the constructs the rewrite engine
//! knows how to re-thread. A document using anything else fails loudly at
//! deserialization, naming the offending tag: unsupported structure is a
//! compile error for the site, never a silently dropped subtree. The one
//! exception is `Table`, which is carried opaquely and never descended into:
//! rewrites do not reach table cells, and that limitation is documented
//! rather than papered over.
//!
//! ## Pure Rewriting, Explicit State
//!
//! Rewrite steps build new nodes from the old ones' fields; nothing mutates
//! a subtree in place. Extracted structures (asides, image references,
//! original media names) are threaded through compiler outputs (the page
//! compiler returns them in [`page::Page`] and the driver concatenates)
//! rather than living in process-wide accumulators.
//!
//! ## Links Are Printed, Not Clicked
//!
//! Every hyperlink is rewritten into a ruby annotation: the visible text
//! stays as the base, and the percent-decoded destination is typeset
//! beneath it. The output is meant to survive print and other
//! non-interactive contexts where a conventional link is a dead end.
//!
//! ## Conversion Is Computed, Never Executed
//!
//! Publishing maps each referenced `.jpg` to a `media/<name>.webp` output
//! path and the ImageMagick `convert` command that would produce it. The
//! compiler only computes the command; `--convert-script` prints the batch
//! for external execution. Local-preview mode skips conversion entirely and
//! points image references at the original files on disk.

pub mod ast;
pub mod build;
pub mod config;
pub mod index;
pub mod media;
pub mod output;
pub mod page;
pub mod pandoc;
pub mod traverse;

#[cfg(test)]
pub(crate) mod test_helpers;
