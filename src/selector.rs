//! Selection of the longest substring common to every input string.
//!
//! A single post-order traversal tags each leaf with the string its suffix
//! starts in and unions the resulting membership masks upward. The deepest
//! node whose mask covers all K strings spells the answer.

use roaring::RoaringBitmap;
use tracing::debug;

use crate::text::Symbol;
use crate::tree::{NodeId, SuffixTree, ROOT};

/// The deepest common node and the substring it spells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonSubstring {
    /// [`ROOT`] when the strings share nothing.
    pub node: NodeId,
    pub length: usize,
    pub symbols: Vec<Symbol>,
}

impl CommonSubstring {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Per-node membership masks: bit `i` of a node's mask is set when some
/// suffix of string `i` passes through that node.
#[derive(Debug)]
pub struct Membership {
    masks: Vec<RoaringBitmap>,
    string_count: u64,
    best_node: NodeId,
    best_length: usize,
}

impl Membership {
    /// Annotate every node of `tree` and remember the deepest full node.
    ///
    /// Children are visited in ascending order of their first symbol and a
    /// node only replaces the current best when it is strictly deeper, so
    /// among equally long answers the first one in that order wins.
    pub fn annotate(tree: &SuffixTree) -> Self {
        let text = tree.text();
        let mut membership = Self {
            masks: vec![RoaringBitmap::new(); tree.node_count()],
            string_count: text.string_count() as u64,
            best_node: ROOT,
            best_length: 0,
        };

        let mut stack = vec![(ROOT, false)];
        while let Some((node, expanded)) = stack.pop() {
            if !expanded {
                stack.push((node, true));
                stack.extend(tree.children(node).rev().map(|child| (child, false)));
                continue;
            }
            let Some(parent) = tree.parent(node) else {
                // The root spells the empty string and is never an answer.
                continue;
            };

            let length = match tree.leaf_position(node) {
                Some(pos) => {
                    let owner = text
                        .owner_of_suffix(text.len() - pos)
                        .expect("suffix outside the owner table");
                    membership.masks[node].insert(owner as u32);
                    // Drop the terminator that ends every leaf.
                    tree.depth(node) - 1
                }
                None => tree.depth(node),
            };

            let mask = std::mem::take(&mut membership.masks[node]);
            membership.masks[parent] |= &mask;
            membership.masks[node] = mask;

            if membership.is_full(node) && length > membership.best_length {
                membership.best_node = node;
                membership.best_length = length;
            }
        }

        debug!(
            node = membership.best_node,
            length = membership.best_length,
            "selected deepest common node"
        );
        membership
    }

    pub fn mask(&self, node: NodeId) -> &RoaringBitmap {
        &self.masks[node]
    }

    /// Whether every input string reaches `node`.
    pub fn is_full(&self, node: NodeId) -> bool {
        self.string_count > 0 && self.masks[node].len() == self.string_count
    }

    /// Spell out the selected node from the root down.
    pub fn longest_common(&self, tree: &SuffixTree) -> CommonSubstring {
        let mut symbols = tree.path_label(self.best_node);
        symbols.truncate(self.best_length);
        CommonSubstring {
            node: self.best_node,
            length: self.best_length,
            symbols,
        }
    }
}

/// Annotate `tree` and return its longest common substring.
pub fn select(tree: &SuffixTree) -> CommonSubstring {
    Membership::annotate(tree).longest_common(tree)
}
