//! Arena storage for parsed nodes.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. A circular
//! node is a leaf whose `circular_ref` points at an earlier slot, so the
//! storage itself never contains a cycle.

use anyhow::{bail, Result};

use crate::parser::types::{NodeKind, Scalar};

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,
    pub kind: NodeKind,
    pub path: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Root first
    pub ancestors: Vec<NodeId>,
    /// Value repeats an ancestor's value
    pub circular: bool,
    pub circular_ref: Option<NodeId>,
    /// Position of `circular_ref` within `ancestors`
    pub circular_ref_index: Option<usize>,
    pub prefix: String,
    pub joint: String,
    /// Set for scalar and function values only
    pub scalar: Option<Scalar>,
    pub process_result: Option<String>,
}

impl Node {
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A parsed node tree. Slot 0 is the root and nodes are stored pre-order,
/// so every parent sits before its children.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Assembles a tree from nodes built by another collaborator. Node ids
    /// are slot indices; slot 0 must be the root and every child must be
    /// stored after its parent.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self> {
        match nodes.first() {
            None => bail!("A tree needs at least a root node"),
            Some(root) if root.parent.is_some() => bail!("Slot 0 must hold the root node"),
            Some(_) => {}
        }

        let len = nodes.len();
        for (index, node) in nodes.iter().enumerate() {
            if let Some(child) = node.children.iter().find(|c| c.0 <= index || c.0 >= len) {
                bail!("Node {} has out-of-order child {}", index, child.0);
            }
            let mut links = node
                .parent
                .iter()
                .chain(node.circular_ref.iter())
                .chain(node.ancestors.iter());
            if let Some(link) = links.find(|id| id.0 >= index) {
                bail!("Node {} links forward to node {}", index, link.0);
            }
        }

        Ok(Self { nodes })
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id.0).map(|_| NodeRef { tree: self, id })
    }

    // Ids come from this tree; foreign ids go through `get`.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// All node ids in storage (pre-order) order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Finds a node by its path.
    pub fn find(&self, path: &str) -> Option<NodeRef<'_>> {
        self.ids()
            .map(|id| NodeRef { tree: self, id })
            .find(|node| node.path() == path)
    }
}

/// Borrowed view of one node, able to follow links to related nodes.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    fn data(&self) -> &'a Node {
        self.tree.node(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn key(&self) -> &'a str {
        &self.data().key
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn path(&self) -> &'a str {
        &self.data().path
    }

    pub fn prefix(&self) -> &'a str {
        &self.data().prefix
    }

    pub fn joint(&self) -> &'a str {
        &self.data().joint
    }

    pub fn depth(&self) -> usize {
        self.data().ancestors.len()
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.data().is_leaf()
    }

    pub fn is_branch(&self) -> bool {
        !self.is_leaf()
    }

    pub fn is_circular(&self) -> bool {
        self.data().is_circular()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|id| self.at(id))
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    pub fn ancestors(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .ancestors
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    pub fn circular_ref(&self) -> Option<NodeRef<'a>> {
        self.data().circular_ref.map(|id| self.at(id))
    }

    pub fn circular_ref_index(&self) -> Option<usize> {
        self.data().circular_ref_index
    }

    pub fn scalar(&self) -> Option<&'a Scalar> {
        self.data().scalar.as_ref()
    }

    pub fn process_result(&self) -> Option<&'a str> {
        self.data().process_result.as_deref()
    }

    /// First child with the given key.
    pub fn child(&self, key: &str) -> Option<NodeRef<'a>> {
        self.children().find(|child| child.key() == key)
    }

    /// Canonical string form of the node's value. Containers that were not
    /// expanded show as `{...}` or `[...]`.
    pub fn value_string(&self) -> String {
        if let Some(scalar) = self.scalar() {
            return scalar.to_string();
        }
        match self.kind() {
            NodeKind::EmptyObject => "{}".to_string(),
            NodeKind::EmptyArray => "[]".to_string(),
            NodeKind::Object => "{...}".to_string(),
            NodeKind::Array | NodeKind::ObjectArray => "[...]".to_string(),
            NodeKind::Scalar | NodeKind::Function => String::new(),
        }
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}
