//! Generalized suffix tree over a terminated text buffer.
//!
//! Suffixes are inserted in order of their starting position. Each insertion
//! starts from the previously inserted leaf: its parent (the "head" of the
//! previous suffix) is linked to the node spelling the head minus its first
//! symbol, reached by skip/count descent, and the new suffix is then matched
//! symbol by symbol from there. Total work is linear in the text length.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::ops::Range;

use tracing::{debug, trace};

use crate::text::{GeneralizedText, Symbol};

/// Index of a node in the tree's node storage.
pub type NodeId = usize;

/// The root is always the first node created.
pub const ROOT: NodeId = 0;
const INVALID: NodeId = NodeId::MAX;

/// A node in the tree. The edge from the parent is stored on the child as a
/// half-open range into the text buffer, so there is no separate edge type.
/// `children` is keyed by the first symbol of each child edge and is ordered,
/// which makes every traversal deterministic.
#[derive(Debug)]
struct Node {
    start: usize,
    end: usize,

    /// Length of the path label from the root to this node.
    depth: usize,

    parent: NodeId,

    /// Only internal nodes get one, and only once construction reaches them.
    suffix_link: NodeId,

    children: BTreeMap<Symbol, NodeId>,

    is_leaf: bool,
}

impl Node {
    fn new(parent: NodeId, start: usize, end: usize, depth: usize, is_leaf: bool) -> Self {
        Self {
            start,
            end,
            depth,
            parent,
            suffix_link: INVALID,
            children: BTreeMap::new(),
            is_leaf,
        }
    }

    fn edge_len(&self) -> usize {
        self.end - self.start
    }

    fn get_suffix_link(&self) -> NodeId {
        assert!(self.suffix_link != INVALID, "Invalid suffix link");
        self.suffix_link
    }
}

/// A generalized suffix tree borrowing the text it was built over.
///
/// # Examples
///
/// ```
/// use common_substring::{GeneralizedText, SuffixTree, TerminatorPolicy};
/// let text = GeneralizedText::from_strs(&["abab", "baba"], TerminatorPolicy::default()).unwrap();
/// let tree = SuffixTree::build(&text);
/// assert_eq!(tree.leaf_count(), text.len());
/// ```
#[derive(Debug)]
pub struct SuffixTree<'t> {
    text: &'t GeneralizedText,
    node_storage: Vec<Node>,
    /// The most recently created leaf.
    active_leaf: NodeId,
}

impl<'t> SuffixTree<'t> {
    /// Build the tree, inserting one suffix per position of `text`.
    pub fn build(text: &'t GeneralizedText) -> Self {
        let mut node_storage = Vec::with_capacity(2 * text.len() + 1);
        node_storage.push(Node::new(INVALID, 0, 0, 0, false));
        let mut tree = Self {
            text,
            node_storage,
            active_leaf: ROOT,
        };
        for pos in 0..text.len() {
            tree.add_suffix(pos);
        }
        debug!(
            text_len = text.len(),
            strings = text.string_count(),
            nodes = tree.node_count(),
            leaves = tree.leaf_count(),
            "built generalized suffix tree"
        );
        tree
    }

    fn add_suffix(&mut self, pos: usize) {
        let mut cursor = pos;
        let prev = self.active_leaf;

        let node = if prev == ROOT || self.get_node(prev).parent == ROOT {
            self.careful_find(ROOT, &mut cursor)
        } else {
            let head = self.get_node(prev).parent;
            let grandparent = self.get_node(head).parent;
            let (start, end) = (self.get_node(head).start, self.get_node(head).end);

            let link = if grandparent == ROOT {
                if end - start > 1 {
                    // The head hangs off the root: drop its first symbol.
                    self.fast_find(ROOT, start + 1..end, &mut cursor)
                } else {
                    ROOT
                }
            } else {
                let from = self.get_node(grandparent).get_suffix_link();
                cursor += self.get_node(from).depth;
                self.fast_find(from, start..end, &mut cursor)
            };
            self.get_node_mut(head).suffix_link = link;
            self.careful_find(link, &mut cursor)
        };

        self.active_leaf = self.attach_leaf(node, cursor);
    }

    /// Skip/count descent along `label`, which is known to be spelled below
    /// `node`. Only edge lengths are compared. If `label` ends inside an edge,
    /// that edge is split and the new node is returned.
    fn fast_find(&mut self, mut node: NodeId, label: Range<usize>, cursor: &mut usize) -> NodeId {
        let mut begin = label.start;
        loop {
            let remaining = label.end - begin;
            if remaining == 0 {
                return node;
            }
            let Some(child) = self.transition(node, self.symbol(begin)) else {
                return node;
            };
            let edge_len = self.get_node(child).edge_len();
            if remaining < edge_len {
                *cursor += remaining;
                return self.split(child, remaining);
            }
            *cursor += edge_len;
            begin += edge_len;
            node = child;
        }
    }

    /// Match the text from `cursor` symbol by symbol, starting at `node`.
    /// Stops at the first mismatch, splitting the edge if it falls inside
    /// one. On return `cursor` points at the first unmatched symbol.
    fn careful_find(&mut self, mut node: NodeId, cursor: &mut usize) -> NodeId {
        let text_len = self.text.len();
        loop {
            if *cursor >= text_len {
                return node;
            }
            let Some(child) = self.transition(node, self.symbol(*cursor)) else {
                return node;
            };
            let (start, edge_len) = {
                let child = self.get_node(child);
                (child.start, child.edge_len())
            };
            for i in 1..edge_len {
                let pos = *cursor + i;
                if pos >= text_len || self.symbol(start + i) != self.symbol(pos) {
                    *cursor = pos;
                    return self.split(child, i);
                }
            }
            *cursor += edge_len;
            node = child;
        }
    }

    /// Divide the edge into `node` after `offset` symbols, inserting a new
    /// internal node between `node` and its parent.
    fn split(&mut self, node: NodeId, offset: usize) -> NodeId {
        let (parent, start) = {
            let node = self.get_node(node);
            (node.parent, node.start)
        };
        assert!(offset > 0 && offset < self.get_node(node).edge_len());

        let depth = self.get_node(parent).depth + offset;
        let mid = self.create_node(Node::new(parent, start, start + offset, depth, false));
        let tail_symbol = self.symbol(start + offset);
        self.get_node_mut(mid).children.insert(tail_symbol, node);
        let head_symbol = self.symbol(start);
        self.get_node_mut(parent).children.insert(head_symbol, mid);

        let node = self.get_node_mut(node);
        node.start = start + offset;
        node.parent = mid;

        trace!(mid, parent, depth, "split edge");
        mid
    }

    /// Hang a leaf labeled `text[cursor..]` under `node`.
    fn attach_leaf(&mut self, node: NodeId, cursor: usize) -> NodeId {
        let text_len = self.text.len();
        let depth = self.get_node(node).depth + text_len - cursor;
        let leaf = self.create_node(Node::new(node, cursor, text_len, depth, true));
        let first = self.symbol(cursor);
        let previous = self.get_node_mut(node).children.insert(first, leaf);
        assert!(previous.is_none(), "Leaf would replace an existing edge");
        leaf
    }

    fn create_node(&mut self, node: Node) -> NodeId {
        self.node_storage.push(node);
        self.node_storage.len() - 1
    }

    fn get_node(&self, node_id: NodeId) -> &Node {
        &self.node_storage[node_id]
    }

    fn get_node_mut(&mut self, node_id: NodeId) -> &mut Node {
        &mut self.node_storage[node_id]
    }

    fn symbol(&self, pos: usize) -> Symbol {
        self.text.symbols()[pos]
    }

    fn transition(&self, node: NodeId, ch: Symbol) -> Option<NodeId> {
        self.get_node(node).children.get(&ch).copied()
    }

    /// The text this tree was built over.
    pub fn text(&self) -> &'t GeneralizedText {
        self.text
    }

    pub fn node_count(&self) -> usize {
        self.node_storage.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.node_storage.iter().filter(|node| node.is_leaf).count()
    }

    /// All node ids. Ids are dense; [`ROOT`] is always the first.
    pub fn node_ids(&self) -> Range<NodeId> {
        0..self.node_storage.len()
    }

    /// Children of `node` in ascending order of their first edge symbol.
    pub fn children(&self, node: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.get_node(node).children.values().copied()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.get_node(node).parent;
        (parent != INVALID).then_some(parent)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.get_node(node).is_leaf
    }

    /// Length of the path label from the root to `node`.
    pub fn depth(&self, node: NodeId) -> usize {
        self.get_node(node).depth
    }

    /// Label of the edge from the parent of `node` to `node`.
    pub fn edge_label(&self, node: NodeId) -> &'t [Symbol] {
        let text: &'t GeneralizedText = self.text;
        let node = self.get_node(node);
        &text.symbols()[node.start..node.end]
    }

    pub fn suffix_link(&self, node: NodeId) -> Option<NodeId> {
        let link = self.get_node(node).suffix_link;
        (link != INVALID).then_some(link)
    }

    /// Start position of the suffix a leaf spells, `None` for internal nodes.
    pub fn leaf_position(&self, node: NodeId) -> Option<usize> {
        let node = self.get_node(node);
        node.is_leaf.then(|| self.text.len() - node.depth)
    }

    /// Concatenated edge labels from the root down to `node`.
    pub fn path_label(&self, node: NodeId) -> Vec<Symbol> {
        let mut labels = Vec::new();
        let mut cur = node;
        while cur != ROOT {
            labels.push(self.edge_label(cur));
            cur = self.get_node(cur).parent;
        }
        let mut path = Vec::with_capacity(self.depth(node));
        for label in labels.into_iter().rev() {
            path.extend_from_slice(label);
        }
        path
    }

    /// Indented dump of every edge label, one edge per line.
    /// Terminators are shown as `$<string index>`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> = self.children(ROOT).rev().map(|c| (c, 0)).collect();
        while let Some((node, indent)) = stack.pop() {
            let start = self.get_node(node).start;
            out.push_str(&" ".repeat(indent));
            for (offset, &ch) in self.edge_label(node).iter().enumerate() {
                if self.text.is_terminator(ch) {
                    let owner = self.text.owner_of_position(start + offset).unwrap_or_default();
                    let _ = write!(out, "${owner}");
                } else {
                    match u32::try_from(ch).ok().and_then(char::from_u32) {
                        Some(c) => out.push(c),
                        None => {
                            let _ = write!(out, "<{ch}>");
                        }
                    }
                }
            }
            out.push('\n');
            stack.extend(self.children(node).rev().map(|c| (c, indent + 4)));
        }
        out
    }
}
