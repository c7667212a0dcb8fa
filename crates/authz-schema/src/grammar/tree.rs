//! Arena-backed concrete syntax tree

use std::fmt::Write as _;
use std::ops::Range;

use super::language::NodeKind;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Zero-based row and byte column of a position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed schema.
///
/// Owns the (decoded) source text and every node. Trees are immutable; a new
/// parse is the only way to get a different tree.
#[derive(Debug, Clone)]
pub struct Tree {
    source: String,
    nodes: Vec<NodeData>,
    root: NodeId,
    line_starts: Vec<usize>,
}

impl Tree {
    pub(crate) fn new(source: String, nodes: Vec<NodeData>, root: NodeId) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self {
            source,
            nodes,
            root,
            line_starts,
        }
    }

    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in document (pre-)order.
    pub fn preorder(&self) -> Vec<Node<'_>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(self.node(id));
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn point_at(&self, byte: usize) -> Point {
        let row = match self.line_starts.binary_search(&byte) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point {
            row,
            column: byte - self.line_starts[row],
        }
    }

    /// Tree-sitter style S-expression of the node kinds.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self.root(), &mut out);
        out
    }

    /// Indented outline with the text of leaf nodes, for debugging.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in self.preorder() {
            let depth = node.depth();
            let _ = write!(
                out,
                "{:indent$}{} [{}-{}]",
                "",
                node.kind(),
                node.start_point(),
                node.end_point(),
                indent = depth * 2
            );
            if node.child_count() == 0 {
                let _ = write!(out, " {:?}", node.text());
            }
            out.push('\n');
        }
        out
    }
}

fn write_sexp(node: Node<'_>, out: &mut String) {
    out.push('(');
    out.push_str(node.kind().name());
    for child in node.children() {
        out.push(' ');
        write_sexp(child, out);
    }
    out.push(')');
}

/// A borrowed handle to one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    pub fn start_byte(&self) -> usize {
        self.tree.data(self.id).start
    }

    pub fn end_byte(&self) -> usize {
        self.tree.data(self.id).end
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_point(&self) -> Point {
        self.tree.point_at(self.start_byte())
    }

    pub fn end_point(&self) -> Point {
        self.tree.point_at(self.end_byte())
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        &self.tree.source[self.byte_range()]
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.tree
            .data(self.id)
            .parent
            .map(|id| self.tree.node(id))
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| tree.node(id))
    }

    /// First direct child of the given kind.
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<Node<'t>> {
        self.children().find(|child| child.kind() == kind)
    }

    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), |node| node.parent()).count()
    }

    pub fn is_error(&self) -> bool {
        self.kind() == NodeKind::Error
    }

    /// True if this node or any descendant is an `ERROR` node.
    pub fn has_error(&self) -> bool {
        self.is_error() || self.children().any(|child| child.has_error())
    }

    /// True if `other` lies inside this node's byte range.
    pub fn contains(&self, other: &Node<'_>) -> bool {
        self.start_byte() <= other.start_byte() && other.end_byte() <= self.end_byte()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}..{}] {:?}",
            self.kind(),
            self.start_byte(),
            self.end_byte(),
            self.text()
        )
    }
}
