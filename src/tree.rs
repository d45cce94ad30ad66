//! Dependency tree data structures
//!
//! A [`Tree`] is an arena of [`Node`]s for one sentence. Nodes refer to
//! their parent and children by [`NodeId`] (the node's position within the
//! sentence), so the tree owns every node exactly once and parent links are
//! plain lookups. Trees are assembled with a [`TreeBuilder`] and are
//! read-only afterward; [`NodeRef`] is the borrowed handle used to walk them.

use crate::pool::{StringPool, Sym};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Position of a node within its sentence
pub type NodeId = usize;

/// Morphological features as interned key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features(Vec<(Sym, Sym)>);

impl Features {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: Sym, value: Sym) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: Sym) -> Option<Sym> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sym, Sym)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A word (token) and its linguistic attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Index of the token in the response's document-wide token list
    pub index: usize,
    pub content: Sym,
    pub lemma: Sym,
    /// Start of the token's text span, when the provider reports one
    pub begin_offset: Option<usize>,
    /// Part-of-speech tag
    pub tag: Sym,
    /// Dependency label (relation to the head)
    pub label: Sym,
    pub feats: Features,
}

/// A node in a dependency tree
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub word: Word,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(id: NodeId, word: Word) -> Self {
        Self {
            id,
            word,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children_ids(&self) -> &[NodeId] {
        &self.children
    }
}

/// Error while assembling a tree
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    NoSuchNode(NodeId),

    #[error("node {0} cannot be its own parent")]
    SelfAttachment(NodeId),

    #[error("node {child} already has parent {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("tree has no root")]
    MissingRoot,

    #[error("tree has {} roots", .0.len())]
    MultipleRoots(Vec<NodeId>),

    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),
}

/// Collects words and head links, then validates them into a [`Tree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a word; its id is its position in insertion order
    pub fn add_word(&mut self, word: Word) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, word));
        id
    }

    /// Make `child` a dependent of `parent`
    ///
    /// A node's parent is assigned at most once. Children keep the order in
    /// which they were attached.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), TreeError> {
        if child >= self.nodes.len() {
            return Err(TreeError::NoSuchNode(child));
        }
        if parent >= self.nodes.len() {
            return Err(TreeError::NoSuchNode(parent));
        }
        if child == parent {
            return Err(TreeError::SelfAttachment(child));
        }
        if let Some(existing) = self.nodes[child].parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Check the tree invariants and freeze the tree
    ///
    /// Exactly one node may lack a parent, and every other node must reach
    /// it by following parent links.
    pub fn build(self, string_pool: Arc<StringPool>) -> Result<Tree, TreeError> {
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|node| node.id)
            .collect();

        let root_id = match roots.len() {
            0 => return Err(TreeError::MissingRoot),
            1 => roots[0],
            _ => return Err(TreeError::MultipleRoots(roots)),
        };

        let tree = Tree {
            nodes: self.nodes,
            root_id,
            string_pool,
        };

        // Nodes caught in a parent cycle are never reached from the root
        let mut reached = vec![false; tree.nodes.len()];
        for node in tree.root().walk() {
            reached[node.id()] = true;
        }
        if let Some(missing) = reached.iter().position(|seen| !seen) {
            return Err(TreeError::Unreachable(missing));
        }

        Ok(tree)
    }
}

/// A dependency tree (sentence)
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root_id: NodeId,
    string_pool: Arc<StringPool>,
}

impl Tree {
    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root_id,
        }
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// All nodes in textual order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |id| NodeRef { tree: self, id })
    }

    pub fn string_pool(&self) -> &StringPool {
        &self.string_pool
    }

    fn resolve(&self, sym: Sym) -> &str {
        self.string_pool.resolve(sym)
    }
}

/// Borrowed view of one node in a [`Tree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id]
    }

    pub fn word(&self) -> &'a Word {
        &self.node().word
    }

    /// Index of the token in the document-wide token list
    pub fn index(&self) -> usize {
        self.word().index
    }

    pub fn content(&self) -> &'a str {
        self.tree.resolve(self.word().content)
    }

    pub fn lemma(&self) -> &'a str {
        self.tree.resolve(self.word().lemma)
    }

    pub fn tag(&self) -> &'a str {
        self.tree.resolve(self.word().tag)
    }

    pub fn label(&self) -> &'a str {
        self.tree.resolve(self.word().label)
    }

    pub fn begin_offset(&self) -> Option<usize> {
        self.word().begin_offset
    }

    pub fn feature(&self, key: &str) -> Option<&'a str> {
        let key = self.tree.string_pool.get(key)?;
        self.word().feats.get(key).map(|value| self.tree.resolve(value))
    }

    pub fn features(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let tree = self.tree;
        self.word()
            .feats
            .iter()
            .map(move |(k, v)| (tree.resolve(k), tree.resolve(v)))
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node().parent.map(|id| NodeRef { tree, id })
    }

    /// Dependents in the order they were attached (token order)
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Pre-order walk of the subtree rooted here, starting with this node
    ///
    /// Children are visited in token order, so repeated walks yield the same
    /// sequence. This is not textual order in general.
    pub fn walk(&self) -> Walk<'a> {
        Walk {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// Nodes of [`walk`](Self::walk) accepted by `filter(start, node)`
    pub fn filtered_walk<F>(&self, mut filter: F) -> impl Iterator<Item = NodeRef<'a>> + 'a
    where
        F: FnMut(NodeRef<'a>, NodeRef<'a>) -> bool + 'a,
    {
        let start = *self;
        self.walk().filter(move |node| filter(start, *node))
    }

    /// Number of edges between this node and the root
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), NodeRef::parent).count()
    }

    /// Single-node description; `verbose` adds index, lemma and child indices
    pub fn string_repr(&self, verbose: bool) -> String {
        if verbose {
            let children: Vec<String> = self
                .children()
                .map(|child| child.index().to_string())
                .collect();
            format!(
                "Node(index={}, label='{}', content='{}', lemma='{}', tag='{}', children=[{}])",
                self.index(),
                self.label(),
                self.content(),
                self.lemma(),
                self.tag(),
                children.join(",")
            )
        } else {
            format!(
                "{} (tag={}, label={})",
                self.content(),
                self.tag(),
                self.label()
            )
        }
    }

    /// Indented rendering of the subtree, one line per node
    ///
    /// `max_depth` limits how many levels are printed; `None` prints all.
    pub fn printable_tree(&self, max_depth: Option<usize>, verbose: bool) -> String {
        let mut lines = Vec::new();
        self.tree_lines(max_depth, 1, verbose, &mut lines);
        lines.join("\n")
    }

    fn tree_lines(
        &self,
        max_depth: Option<usize>,
        depth: usize,
        verbose: bool,
        lines: &mut Vec<String>,
    ) {
        if max_depth == Some(0) {
            return;
        }

        let mut line = if depth <= 2 {
            String::new()
        } else {
            "   ".repeat(depth - 2)
        };
        if depth > 1 {
            line.push_str("|- ");
        }
        line.push_str(&self.string_repr(verbose));
        lines.push(line);

        let next_max_depth = max_depth.map(|d| d - 1);
        for child in self.children() {
            child.tree_lines(next_max_depth, depth + 1, verbose, lines);
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("content", &self.content())
            .field("label", &self.label())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_repr(true))
    }
}

/// Pre-order iterator over a subtree
#[derive(Clone)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id].children.iter().rev().copied());
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}
