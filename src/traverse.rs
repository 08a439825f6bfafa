//! Generic tree traversal: post-order rewriting and searching.
//!
//! [`postmap`] is the engine every compiler pass runs on. It walks a node's
//! children first (per the node's content shape), splices each child's
//! rewrite result back into the parent, then applies the rewrite function
//! to the node itself. Because a rewrite returns a *vector* of nodes, one
//! node can expand into zero, one, or many siblings. That splice is how
//! link annotations and placeholder substitutions thread replacement
//! structure into a still-valid tree.
//!
//! Dispatch over node shapes is an exhaustive `match` on [`Node`]: adding a
//! variant to the tree without teaching the engine its shape is a compile
//! error. `Table` is the deliberate exception: the rewrite function is
//! applied to the table node itself, but its cells are never walked, so
//! image and link rewrites do not occur inside tables.
//!
//! [`find`] reuses the same walk as a pure collector: an identity rewrite
//! that appends matching nodes to an accumulator.

use crate::ast::Node;
use std::convert::Infallible;

/// Post-order rewrite of a single node.
///
/// Children are rewritten first and their results spliced in place; `f` is
/// then applied to the rebuilt node, and its result becomes the node's
/// replacement in the caller's sequence. Errors from `f` abort the walk.
pub fn postmap<F, E>(node: Node, f: &mut F) -> Result<Vec<Node>, E>
where
    F: FnMut(Node) -> Result<Vec<Node>, E>,
{
    let node = match node {
        // Flat child sequences, rewritten in place
        Node::Para(children) => Node::Para(postmap_seq(children, f)?),
        Node::Plain(children) => Node::Plain(postmap_seq(children, f)?),
        Node::Emph(children) => Node::Emph(postmap_seq(children, f)?),
        Node::BlockQuote(children) => Node::BlockQuote(postmap_seq(children, f)?),

        // Attributed elements: the child sequence lives next to the attributes
        Node::Header(level, attr, inlines) => Node::Header(level, attr, postmap_seq(inlines, f)?),
        Node::Image(attr, inlines, target) => Node::Image(attr, postmap_seq(inlines, f)?, target),
        Node::Link(attr, inlines, target) => Node::Link(attr, postmap_seq(inlines, f)?, target),
        Node::Quoted(kind, inlines) => Node::Quoted(kind, postmap_seq(inlines, f)?),
        Node::Div(attr, blocks) => Node::Div(attr, postmap_seq(blocks, f)?),

        // Lists: each item's block sequence is rewritten independently,
        // preserving the item grouping
        Node::BulletList(items) => Node::BulletList(
            items
                .into_iter()
                .map(|blocks| postmap_seq(blocks, &mut *f))
                .collect::<Result<_, E>>()?,
        ),
        Node::OrderedList(attrs, items) => Node::OrderedList(
            attrs,
            items
                .into_iter()
                .map(|blocks| postmap_seq(blocks, &mut *f))
                .collect::<Result<_, E>>()?,
        ),

        // Leaves: nothing to recurse into
        leaf @ (Node::Str(_)
        | Node::Space
        | Node::SoftBreak
        | Node::LineBreak
        | Node::Code(..)
        | Node::RawInline(..)
        | Node::CodeBlock(..)
        | Node::RawBlock(..)) => leaf,

        // Never descended into; cell contents are not rewritten
        table @ Node::Table(_) => table,
    };
    f(node)
}

/// Rewrite a sequence of sibling nodes, flattening each node's result into
/// the output. This is the splice: a rewrite returning N nodes grows the
/// sequence by N−1 at that position, order preserved.
pub fn postmap_seq<F, E>(nodes: Vec<Node>, f: &mut F) -> Result<Vec<Node>, E>
where
    F: FnMut(Node) -> Result<Vec<Node>, E>,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.extend(postmap(node, f)?);
    }
    Ok(out)
}

/// Collect every node in the tree satisfying `pred`, in walk order.
///
/// Runs [`postmap`] with an identity rewrite; the tree is not altered.
pub fn find<P>(node: &Node, pred: P) -> Vec<Node>
where
    P: Fn(&Node) -> bool,
{
    let mut found = Vec::new();
    let walked: Result<Vec<Node>, Infallible> = postmap(node.clone(), &mut |n| {
        if pred(&n) {
            found.push(n.clone());
        }
        Ok(vec![n])
    });
    match walked {
        Ok(_) => {}
        Err(never) => match never {},
    }
    found
}

/// [`find`] across a block sequence, results concatenated in block order.
pub fn find_in<P>(blocks: &[Node], pred: P) -> Vec<Node>
where
    P: Fn(&Node) -> bool,
{
    blocks.iter().flat_map(|block| find(block, &pred)).collect()
}
