//! The raw tag tree produced by the parser.
//!
//! Line-level nodes (chapters, verses, paragraphs) are siblings: a verse does
//! not contain the paragraph that follows it. Character spans nest.

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::label::VerseLabel;
use crate::taxonomy::StyleType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawNode {
    Text(String),
    Chapter {
        number: String,
        children: Vec<RawNode>,
    },
    Verse {
        label: VerseLabel,
        children: Vec<RawNode>,
    },
    Paragraph {
        marker: String,
        children: Vec<RawNode>,
    },
    Character {
        marker: String,
        attributes: Vec<Attribute>,
        children: Vec<RawNode>,
    },
    /// Notes, milestones and self-delimiting markers, kept as source text.
    Opaque {
        marker: String,
        style: StyleType,
        source: String,
    },
}

impl RawNode {
    pub fn text(text: impl Into<String>) -> Self {
        RawNode::Text(text.into())
    }

    pub fn children(&self) -> &[RawNode] {
        match self {
            RawNode::Chapter { children, .. }
            | RawNode::Verse { children, .. }
            | RawNode::Paragraph { children, .. }
            | RawNode::Character { children, .. } => children,
            RawNode::Text(_) | RawNode::Opaque { .. } => &[],
        }
    }

    /// Mutable children, or `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<RawNode>> {
        match self {
            RawNode::Chapter { children, .. }
            | RawNode::Verse { children, .. }
            | RawNode::Paragraph { children, .. }
            | RawNode::Character { children, .. } => Some(children),
            RawNode::Text(_) | RawNode::Opaque { .. } => None,
        }
    }
}

/// Render a raw tree as an indented outline, one node per line.
pub fn outline(nodes: &[RawNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &RawNode, depth: usize) {
    let prefix = "  ".repeat(depth);
    match node {
        RawNode::Text(text) => out.push_str(&format!("{prefix}Text {text:?}\n")),
        RawNode::Chapter { number, .. } => out.push_str(&format!("{prefix}Chapter {number}\n")),
        RawNode::Verse { label, .. } => out.push_str(&format!("{prefix}Verse {label}\n")),
        RawNode::Paragraph { marker, .. } => out.push_str(&format!("{prefix}Paragraph {marker}\n")),
        RawNode::Character {
            marker, attributes, ..
        } => {
            out.push_str(&format!("{prefix}Character {marker}"));
            if !attributes.is_empty() {
                out.push_str(&format!(
                    " {}",
                    crate::attributes::format_attributes(attributes)
                ));
            }
            out.push('\n');
        }
        RawNode::Opaque {
            marker,
            style,
            source,
        } => out.push_str(&format!("{prefix}Opaque {marker} {style:?} {source:?}\n")),
    }
    for child in node.children() {
        write_node(out, child, depth + 1);
    }
}
