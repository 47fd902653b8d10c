//! Tree nodes and the arena-backed tree that owns them.
//! 树节点以及拥有它们的基于 Arena 的树。
//!
//! Tokens, parse tree nonterminals and AST nodes all share the single
//! [`Node`] type and differ only in their [`Tag`]. Nodes are allocated in
//! the [`Tree`]'s arena and referred to by [`NodeId`] handles; a node never
//! frees its children, and all nodes are destroyed together when the tree
//! is dropped. Detaching a child therefore never destroys it, which lets
//! the AST builder move nodes between parents freely.

use std::ops::{Index, IndexMut};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

use nearlyc_common::{AnyArena, Arena, ChunkedArena, Location, Value, ValueKind};

use crate::{GrammarSymbol, Tag};

static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// Handle to a node stored in a [`Tree`].
///
/// A handle is only meaningful for the tree that created it; using it with
/// another tree panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    generation: u32,
    index: u32,
}

impl NodeId {
    /// Position of the node in allocation order.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// A tree node: a tag, ordered children, optional text and integer value,
/// and a source location.
/// 树节点：标签、有序子节点、可选的文本和整数值，以及源码位置。
#[derive(Debug, Clone)]
pub struct Node {
    tag: Tag,
    kids: Vec<NodeId>,
    text: String,
    ival: i64,
    loc: Location,
    loc_was_set_explicitly: bool,
}

impl Node {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Node {
            tag: tag.into(),
            kids: Vec::new(),
            text: String::new(),
            ival: 0,
            loc: Location::default(),
            loc_was_set_explicitly: false,
        }
    }

    pub fn with_text(tag: impl Into<Tag>, text: impl Into<String>) -> Self {
        Node {
            text: text.into(),
            ..Node::new(tag)
        }
    }

    pub fn with_ival(tag: impl Into<Tag>, ival: i64) -> Self {
        Node {
            ival,
            ..Node::new(tag)
        }
    }

    /// A node with both a lexeme and a numeric value, e.g. an integer or
    /// character literal token.
    pub fn with_text_and_ival(tag: impl Into<Tag>, text: impl Into<String>, ival: i64) -> Self {
        Node {
            text: text.into(),
            ival,
            ..Node::new(tag)
        }
    }

    /// Set the location explicitly (builder style).
    pub fn at(mut self, loc: Location) -> Self {
        self.set_loc(loc);
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The numeric value of an integer or character literal token.
    ///
    /// Integer literals are stored as a two's complement `i64`, so a
    /// literal above `i64::MAX` wraps (`18446744073709551615` reads as
    /// `-1`). Use [`Node::literal_value`] for the full magnitude.
    pub fn ival(&self) -> i64 {
        self.ival
    }

    /// The value of a literal token, recomputed from its text so that
    /// unsigned magnitudes survive. `None` for any other node.
    pub fn literal_value(&self) -> Option<Value> {
        let kind = match self.tag {
            Tag::Grammar(GrammarSymbol::TokIntLit) => ValueKind::Int,
            Tag::Grammar(GrammarSymbol::TokFpLit) => ValueKind::Fp,
            Tag::Grammar(GrammarSymbol::TokCharLit) => return Some(Value::from(self.ival)),
            _ => return None,
        };
        Value::convert_str(&self.text, kind).ok()
    }

    pub fn loc(&self) -> &Location {
        &self.loc
    }

    pub fn kids(&self) -> &[NodeId] {
        &self.kids
    }

    pub fn num_kids(&self) -> usize {
        self.kids.len()
    }

    /// The child at `index`.
    ///
    /// # Panics
    /// Panics if there is no such child.
    pub fn kid(&self, index: usize) -> NodeId {
        match self.kids.get(index) {
            Some(&kid) => kid,
            None => panic!(
                "{} node has no child {} (it has {})",
                self.tag,
                index,
                self.kids.len()
            ),
        }
    }

    /// The last child.
    ///
    /// # Panics
    /// Panics if the node has no children.
    pub fn last_kid(&self) -> NodeId {
        match self.kids.last() {
            Some(&kid) => kid,
            None => panic!("{} node has no children", self.tag),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_ival(&mut self, ival: i64) {
        self.ival = ival;
    }

    /// Set the location. An explicitly set location is not replaced by
    /// the location of children added later.
    pub fn set_loc(&mut self, loc: Location) {
        self.loc = loc;
        self.loc_was_set_explicitly = true;
    }

    pub fn loc_was_set_explicitly(&self) -> bool {
        self.loc_was_set_explicitly
    }
}

/// Owner of all nodes of one translation unit.
/// 一个翻译单元所有节点的拥有者。
///
/// Nodes live in an arena; dropping the tree runs every node's destructor
/// in allocation order and then releases the arena memory.
pub struct Tree {
    generation: u32,
    nodes: Vec<NonNull<Node>>,
    arena: AnyArena,
}

impl Tree {
    /// Create a tree backed by a default [`ChunkedArena`].
    pub fn new() -> Self {
        Self::with_arena(ChunkedArena::new())
    }

    pub fn with_arena(arena: impl Into<AnyArena>) -> Self {
        Tree {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            arena: arena.into(),
        }
    }

    pub fn arena(&self) -> &AnyArena {
        &self.arena
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles of every allocated node, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|index| NodeId {
            generation: self.generation,
            index: index as u32,
        })
    }

    /// Move `node` into the tree's arena.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let index = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("too many nodes in one tree"));
        let ptr = NonNull::from(self.arena.create(node));
        self.nodes.push(ptr);
        NodeId {
            generation: self.generation,
            index,
        }
    }

    /// Allocate a node with the given children. Its location is the first
    /// child's location.
    pub fn alloc_with_kids(
        &mut self,
        tag: impl Into<Tag>,
        kids: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let mut node = Node::new(tag);
        node.kids = kids.into_iter().collect();
        if let Some(&first) = node.kids.first() {
            node.loc = self[first].loc.clone();
        }
        self.alloc(node)
    }

    /// Add `kid` as the last child of `parent`. If `parent` has no valid
    /// location yet, it takes the child's.
    pub fn append_kid(&mut self, parent: NodeId, kid: NodeId) {
        let kid_loc = self[kid].loc.clone();
        let node = &mut self[parent];
        node.kids.push(kid);
        if !node.loc.is_valid() && !node.loc_was_set_explicitly {
            node.loc = kid_loc;
        }
    }

    /// Add `kid` as the first child of `parent`. The parent's location
    /// follows the new first child unless it was set explicitly.
    pub fn prepend_kid(&mut self, parent: NodeId, kid: NodeId) {
        let kid_loc = self[kid].loc.clone();
        let node = &mut self[parent];
        node.kids.insert(0, kid);
        if kid_loc.is_valid() && !node.loc_was_set_explicitly {
            node.loc = kid_loc;
        }
    }

    /// Detach and return the first child of `parent`. The caller becomes
    /// responsible for re-attaching it. If children remain, the parent's
    /// location is re-derived from the new first child.
    ///
    /// # Panics
    /// Panics if `parent` has no children.
    pub fn shift_kid(&mut self, parent: NodeId) -> NodeId {
        if self[parent].kids.is_empty() {
            panic!("cannot shift a child off {} node with no children", self[parent].tag);
        }
        let first = self[parent].kids.remove(0);
        if let Some(&next) = self[parent].kids.first() {
            let next_loc = self[next].loc.clone();
            let node = &mut self[parent];
            node.loc = next_loc;
            node.loc_was_set_explicitly = false;
        }
        first
    }

    /// Replace the child at `index` and return the displaced node, which is
    /// not destroyed. The parent's location is left unchanged.
    ///
    /// # Panics
    /// Panics if there is no such child.
    pub fn set_kid(&mut self, parent: NodeId, index: usize, kid: NodeId) -> NodeId {
        let node = &mut self[parent];
        let displaced = node.kid(index);
        node.kids[index] = kid;
        displaced
    }

    /// Shorthand for `self[parent].kid(index)`.
    pub fn kid(&self, parent: NodeId, index: usize) -> NodeId {
        self[parent].kid(index)
    }

    /// Iterate over the direct children of `id`.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self[id].kids.iter().copied()
    }

    /// Walk the subtree rooted at `root`, each node before its children.
    pub fn preorder(&self, root: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![root],
        }
    }

    /// Every allocated node that is not reachable from `root`.
    pub fn detached_from(&self, root: NodeId) -> Vec<NodeId> {
        let mut reachable = vec![false; self.nodes.len()];
        for id in self.preorder(root) {
            reachable[id.index()] = true;
        }
        self.ids().filter(|id| !reachable[id.index()]).collect()
    }

    fn ptr(&self, id: NodeId) -> NonNull<Node> {
        assert_eq!(
            id.generation, self.generation,
            "node handle belongs to a different tree"
        );
        self.nodes[id.index()]
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        // SAFETY: the pointer came from `self.arena`, which lives as long as
        // `self`, and shared access is tied to the borrow of `self`.
        unsafe { self.ptr(id).as_ref() }
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        // SAFETY: as above; each handle maps to a distinct allocation and
        // exclusive access is tied to the mutable borrow of `self`.
        unsafe { self.ptr(id).as_mut() }
    }
}

/// Preorder iterator over a subtree. See [`Tree::preorder`].
pub struct Preorder<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree[id].kids.iter().rev().copied());
        Some(id)
    }
}
