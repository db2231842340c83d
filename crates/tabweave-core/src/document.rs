//! Parsed document trees.
//!
//! A [`DocumentTree`] is an arena of nodes rooted at [`NodeId::ROOT`]. It is
//! built completely by a [`DocumentParser`] before it is handed to a tab, and
//! is immutable afterwards; tabs hold it behind an `Arc` so a render swaps
//! whole trees.

use crate::errors::ParseError;
use crate::load::Request;

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Stacks children vertically.
    Block,
    /// Lays children out horizontally, sharing free width by grow factor.
    FlexRow,
    Heading { level: u8, text: String },
    Text(String),
    Link { href: String, label: String },
    Preformatted(String),
}

impl NodeKind {
    /// Text that flows inside this node, if it is a leaf.
    pub fn inline_text(&self) -> Option<&str> {
        match self {
            NodeKind::Heading { text, .. } => Some(text),
            NodeKind::Text(text) | NodeKind::Preformatted(text) => Some(text),
            NodeKind::Link { label, .. } => Some(label),
            NodeKind::Block | NodeKind::FlexRow => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Block | NodeKind::FlexRow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    /// Lower bound on the width a flex row may give this node.
    pub min_width: f64,
    /// Share of a flex row's free width; 0 keeps the node at its minimum.
    pub grow: f64,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            min_width: 0.0,
            grow: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    nodes: Vec<Node>,
}

impl DocumentTree {
    /// An empty document: a single root block.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Block)],
        }
    }

    /// Append a node under `parent`. Leaves cannot take children; appending
    /// to one attaches to the root instead.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        let parent = match self.nodes.get(parent.0) {
            Some(node) if node.kind.is_container() => parent,
            _ => NodeId::ROOT,
        };
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Set the flex parameters of a node.
    pub fn set_flex(&mut self, id: NodeId, grow: f64, min_width: f64) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.grow = grow.max(0.0);
            node.min_width = min_width.max(0.0);
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document has nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Text of the first heading, preferring lower levels.
    pub fn title(&self) -> Option<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Heading { level, text } if !text.trim().is_empty() => {
                    Some((*level, text.trim()))
                }
                _ => None,
            })
            .min_by_key(|(level, _)| *level)
            .map(|(_, text)| text)
    }

    /// All node ids in depth-first order, root first.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Every link target in document order.
    pub fn links(&self) -> Vec<&str> {
        self.walk()
            .into_iter()
            .filter_map(|id| match &self.node(id)?.kind {
                NodeKind::Link { href, .. } => Some(href.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a fetched payload into a document tree. Runs on the UI thread.
pub trait DocumentParser {
    fn parse(&self, payload: &[u8], request: &Request) -> Result<DocumentTree, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentTree {
        let mut doc = DocumentTree::new();
        doc.push(
            NodeId::ROOT,
            NodeKind::Heading {
                level: 2,
                text: "Sub".into(),
            },
        );
        doc.push(
            NodeId::ROOT,
            NodeKind::Heading {
                level: 1,
                text: "  Capsule  ".into(),
            },
        );
        let row = doc.push(NodeId::ROOT, NodeKind::FlexRow);
        doc.push(
            row,
            NodeKind::Link {
                href: "gemini://a/".into(),
                label: "a".into(),
            },
        );
        doc.push(row, NodeKind::Text("b".into()));
        doc
    }

    #[test]
    fn new_document_is_empty() {
        let doc = DocumentTree::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn title_prefers_top_level_heading() {
        assert_eq!(sample().title(), Some("Capsule"));
    }

    #[test]
    fn walk_is_depth_first() {
        let doc = sample();
        let order: Vec<usize> = doc.walk().into_iter().map(|id| id.0).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn push_onto_leaf_attaches_to_root() {
        let mut doc = DocumentTree::new();
        let text = doc.push(NodeId::ROOT, NodeKind::Text("x".into()));
        let stray = doc.push(text, NodeKind::Text("y".into()));
        assert!(doc.node(text).unwrap().children.is_empty());
        assert!(doc.node(NodeId::ROOT).unwrap().children.contains(&stray));
    }

    #[test]
    fn set_flex_clamps_negative_values() {
        let mut doc = DocumentTree::new();
        let id = doc.push(NodeId::ROOT, NodeKind::Text("x".into()));
        doc.set_flex(id, -2.0, -10.0);
        let node = doc.node(id).unwrap();
        assert_eq!(node.grow, 0.0);
        assert_eq!(node.min_width, 0.0);
    }

    #[test]
    fn links_in_order() {
        assert_eq!(sample().links(), vec!["gemini://a/"]);
    }
}
