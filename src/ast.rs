//! The document tree.
//!
//! Mirrors pandoc's JSON encoding of its AST: every node is a tagged value
//! `{"t": <tag>, "c": <content>}` where the shape of `c` depends on the tag
//! (unit tags like `Space` omit `c` entirely). Serde's adjacently tagged
//! representation matches that encoding exactly, so [`Node`] round-trips
//! through the pandoc boundary without a hand-written codec.
//!
//! ## The Set of Tags Is Closed
//!
//! [`Node`] covers exactly the constructs the rewrite engine in
//! [`traverse`](crate::traverse) handles. Deserializing a document that
//! uses any other pandoc construct fails with an `unknown variant` error
//! naming the tag. A photo essay that grows a definition list
//! or a footnote should fail the build until the engine learns to re-thread
//! it, not ship with a silently untransformed subtree.
//!
//! Content the engine never inspects (quote kinds, ordered-list numbering
//! attributes, whole tables) is carried as opaque [`serde_json::Value`] so
//! it survives the round-trip byte-equivalent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute triple carried by headings, images, links, code and containers:
/// identifier, classes, key-value pairs. Encoded as a three-element array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attr(pub String, pub Vec<String>, pub Vec<(String, String)>);

impl Attr {
    /// Whether the class list contains `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.1.iter().any(|class| class == name)
    }
}

/// Link or image target: URL and title. Encoded as a two-element array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target(pub String, pub String);

/// A single document tree node.
///
/// Variant payloads follow pandoc's `c` shapes: flat child sequences for
/// paragraph-like containers, attribute/content pairings for attributed
/// elements, one inner block sequence per item for lists, and plain data
/// for leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Node {
    // Inline leaves
    Str(String),
    Space,
    SoftBreak,
    LineBreak,
    Code(Attr, String),
    RawInline(String, String),

    // Inline containers
    Emph(Vec<Node>),
    Quoted(Value, Vec<Node>),
    Link(Attr, Vec<Node>, Target),
    Image(Attr, Vec<Node>, Target),

    // Block leaves
    CodeBlock(Attr, String),
    RawBlock(String, String),

    // Block containers
    Plain(Vec<Node>),
    Para(Vec<Node>),
    BlockQuote(Vec<Node>),
    Header(u32, Attr, Vec<Node>),
    BulletList(Vec<Vec<Node>>),
    OrderedList(Value, Vec<Vec<Node>>),
    Div(Attr, Vec<Node>),

    /// Carried opaquely; the rewrite engine never descends into tables.
    Table(Value),
}

impl Node {
    /// A raw inline HTML splice.
    pub fn raw_html(html: impl Into<String>) -> Node {
        Node::RawInline("html".to_string(), html.into())
    }

    /// A raw HTML block.
    pub fn raw_html_block(html: impl Into<String>) -> Node {
        Node::RawBlock("html".to_string(), html.into())
    }

    /// A link with empty attributes and no title, the shape pandoc gives
    /// a plain `[text](url)` markdown link.
    pub fn link(content: Vec<Node>, url: impl Into<String>) -> Node {
        Node::Link(Attr::default(), content, Target(url.into(), String::new()))
    }
}

/// Whether a node is a level-1 heading.
pub fn is_h1(node: &Node) -> bool {
    matches!(node, Node::Header(1, _, _))
}

/// Flatten inline content to plain text, for operator-facing output.
///
/// Containers contribute their children's text; whitespace markers become
/// single spaces; raw splices contribute nothing.
pub fn inline_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Str(s) => out.push_str(s),
            Node::Space | Node::SoftBreak | Node::LineBreak => out.push(' '),
            Node::Code(_, s) => out.push_str(s),
            Node::Emph(children) | Node::Plain(children) | Node::Para(children) => {
                out.push_str(&inline_text(children));
            }
            Node::Quoted(_, children) => out.push_str(&inline_text(children)),
            Node::Link(_, children, _) | Node::Image(_, children, _) => {
                out.push_str(&inline_text(children));
            }
            _ => {}
        }
    }
    out
}

/// A parsed document: pandoc's top-level object.
///
/// `pandoc-api-version` and `meta` are opaque passthrough: the compiler
/// only rewrites `blocks` and re-emits the rest unchanged so the renderer
/// sees a document it recognizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Value,
    pub meta: Value,
    pub blocks: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(value: serde_json::Value) -> serde_json::Value {
        let node: Node = serde_json::from_value(value).unwrap();
        serde_json::to_value(&node).unwrap()
    }

    // =========================================================================
    // Wire-format round trips, one per tag the engine claims to support
    // =========================================================================

    #[test]
    fn str_roundtrips() {
        let v = json!({"t": "Str", "c": "hello"});
        assert_eq!(roundtrip(v.clone()), v);
    }

    #[test]
    fn unit_tags_omit_content() {
        for tag in ["Space", "SoftBreak", "LineBreak"] {
            let v = json!({"t": tag});
            assert_eq!(roundtrip(v.clone()), v, "tag {tag}");
        }
    }

    #[test]
    fn para_and_friends_roundtrip() {
        for tag in ["Para", "Plain", "Emph", "BlockQuote"] {
            let v = json!({"t": tag, "c": [{"t": "Str", "c": "x"}, {"t": "Space"}]});
            assert_eq!(roundtrip(v.clone()), v, "tag {tag}");
        }
    }

    #[test]
    fn header_roundtrips() {
        let v = json!({"t": "Header", "c": [2, ["note", ["wide"], [["k", "v"]]], [{"t": "Str", "c": "Note"}]]});
        assert_eq!(roundtrip(v.clone()), v);
    }

    #[test]
    fn image_and_link_roundtrip() {
        for tag in ["Image", "Link"] {
            let v = json!({"t": tag, "c": [["", [], []], [{"t": "Str", "c": "alt"}], ["foo.jpg", "title"]]});
            assert_eq!(roundtrip(v.clone()), v, "tag {tag}");
        }
    }

    #[test]
    fn quoted_preserves_quote_kind() {
        let v = json!({"t": "Quoted", "c": [{"t": "DoubleQuote"}, [{"t": "Str", "c": "q"}]]});
        assert_eq!(roundtrip(v.clone()), v);
    }

    #[test]
    fn code_spans_and_blocks_roundtrip() {
        let code = json!({"t": "Code", "c": [["", [], []], "let x = 1"]});
        let block = json!({"t": "CodeBlock", "c": [["", [], []], "table of contents"]});
        assert_eq!(roundtrip(code.clone()), code);
        assert_eq!(roundtrip(block.clone()), block);
    }

    #[test]
    fn raw_markup_roundtrips() {
        let inline = json!({"t": "RawInline", "c": ["html", "<ruby>"]});
        let block = json!({"t": "RawBlock", "c": ["html", "<script></script>"]});
        assert_eq!(roundtrip(inline.clone()), inline);
        assert_eq!(roundtrip(block.clone()), block);
    }

    #[test]
    fn lists_roundtrip() {
        let bullet = json!({"t": "BulletList", "c": [[{"t": "Plain", "c": [{"t": "Str", "c": "a"}]}], [{"t": "Plain", "c": [{"t": "Str", "c": "b"}]}]]});
        let ordered = json!({"t": "OrderedList", "c": [[1, {"t": "Decimal"}, {"t": "Period"}], [[{"t": "Plain", "c": [{"t": "Str", "c": "a"}]}]]]});
        assert_eq!(roundtrip(bullet.clone()), bullet);
        assert_eq!(roundtrip(ordered.clone()), ordered);
    }

    #[test]
    fn div_roundtrips() {
        let v = json!({"t": "Div", "c": [["", ["aside"], []], [{"t": "Para", "c": [{"t": "Str", "c": "x"}]}]]});
        assert_eq!(roundtrip(v.clone()), v);
    }

    #[test]
    fn table_is_opaque() {
        // Not a real pandoc table; the point is the payload survives untyped.
        let v = json!({"t": "Table", "c": [["", [], []], "anything", [1, 2, 3]]});
        assert_eq!(roundtrip(v.clone()), v);
    }

    // =========================================================================
    // The closed-set contract
    // =========================================================================

    #[test]
    fn unknown_tag_fails_naming_the_tag() {
        let err = serde_json::from_value::<Node>(json!({"t": "DefinitionList", "c": []}))
            .unwrap_err()
            .to_string();
        assert!(err.contains("DefinitionList"), "error was: {err}");
    }

    #[test]
    fn document_passes_meta_through() {
        let v = json!({
            "pandoc-api-version": [1, 23, 1],
            "meta": {"title": {"t": "MetaString", "c": "unused"}},
            "blocks": [{"t": "Para", "c": [{"t": "Str", "c": "x"}]}]
        });
        let doc: Document = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), v);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn has_class_checks_class_list() {
        let attr = Attr(String::new(), vec!["aside".into(), "wide".into()], vec![]);
        assert!(attr.has_class("aside"));
        assert!(!attr.has_class("note"));
    }

    #[test]
    fn inline_text_flattens_whitespace_and_containers() {
        let nodes = vec![
            Node::Str("A".into()),
            Node::Space,
            Node::Emph(vec![Node::Str("day".into())]),
            Node::SoftBreak,
            Node::Str("out".into()),
        ];
        assert_eq!(inline_text(&nodes), "A day out");
    }

    #[test]
    fn inline_text_skips_raw_splices() {
        let nodes = vec![
            Node::raw_html("<ruby>"),
            Node::Str("Home".into()),
            Node::raw_html("</ruby>"),
        ];
        assert_eq!(inline_text(&nodes), "Home");
    }
}
