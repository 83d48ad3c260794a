//! Structural XML equality.

use roxmltree::{Document, Node};
use std::collections::BTreeMap;

/// Parse XML with the hardened defaults: no external entities, DTDs rejected.
pub fn parse(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse(text)
}

/// Whether two documents are structurally equal from their root elements down.
pub fn documents_equal(a: &Document<'_>, b: &Document<'_>) -> bool {
    elements_equal(a.root_element(), b.root_element())
}

/// Structural equality of two element trees.
///
/// Checks, in order and stopping at the first difference: tag name (namespace
/// included), leading text after trimming both sides, attributes regardless of
/// order, number of child elements, then each child pair in document order.
/// Comments, processing instructions and text after child elements are ignored.
pub fn elements_equal(a: Node<'_, '_>, b: Node<'_, '_>) -> bool {
    if a.tag_name() != b.tag_name() {
        return false;
    }
    if leading_text(a) != leading_text(b) {
        return false;
    }
    if attributes(a) != attributes(b) {
        return false;
    }

    let children_a: Vec<_> = a.children().filter(Node::is_element).collect();
    let children_b: Vec<_> = b.children().filter(Node::is_element).collect();
    if children_a.len() != children_b.len() {
        return false;
    }

    children_a.into_iter().zip(children_b).all(|(ca, cb)| elements_equal(ca, cb))
}

/// Text and CDATA before the first child element, trimmed.
///
/// Comments and processing instructions may split the text; they are skipped.
fn leading_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .children()
        .take_while(|child| !child.is_element())
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect();
    text.trim().to_string()
}

fn attributes<'a>(node: Node<'a, '_>) -> BTreeMap<(Option<&'a str>, &'a str), &'a str> {
    node.attributes().map(|attr| ((attr.namespace(), attr.name()), attr.value())).collect()
}
