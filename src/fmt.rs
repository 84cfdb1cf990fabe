//! Formatting implementation for the PatriciaTree

use std::fmt::{Debug, Formatter, Result};

use super::*;

impl<P: Debug, T: Debug> Debug for PatriciaTree<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugNode(self, 0).fmt(f)
    }
}

/// Renders the subtree rooted at the given node as nested maps `prefix => (value, left, right)`.
struct DebugNode<'a, P, T>(&'a PatriciaTree<P, T>, usize);

impl<P: Debug, T: Debug> Debug for DebugNode<'_, P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let tree = self.0;
        let node = &tree.table[self.1];
        match (node.value.as_ref(), node.left, node.right) {
            (None, None, None) => node.prefix.fmt(f),
            (None, None, Some(child)) | (None, Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &Self(tree, child))
                .finish(),
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(Self(tree, left), Self(tree, right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&node.prefix, v).finish(),
            (Some(v), None, Some(child)) | (Some(v), Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(tree, child)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(tree, left), Self(tree, right)))
                .finish(),
        }
    }
}
