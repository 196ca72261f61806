//! Rotations and the per-node rebalance decision.
//!
//! These functions restructure a single subtree and fix the parent links inside it,
//! including the new subtree root's link to the old parent. Re-linking the old parent's
//! child slot is left to the caller, who knows whether that slot is the tree root.

use std::cmp;

use tracing::trace;

use super::node::{height, size, NodePtr};

/// Balance factor: `height(right) - height(left)`.
pub(super) fn balance_factor<T>(node_ptr: NodePtr<T>) -> isize {
    unsafe {
        let node = node_ptr.as_ref();
        height(node.right) as isize - height(node.left) as isize
    }
}

/// Recomputes cached height and size from the children.
pub(super) fn adjust<T>(mut node_ptr: NodePtr<T>) {
    unsafe {
        let node = node_ptr.as_mut();
        node.height = cmp::max(height(node.left), height(node.right)) + 1;
        node.size = size(node.left) + size(node.right) + 1;
    }
}

/// Promotes the right child of `node_ptr` and returns it as the new subtree root.
///
/// ```text
///   n            r
///  / \          / \
/// a   r   ->   n   c
///    / \      / \
///   b   c    a   b
/// ```
pub(super) fn rotate_left<T>(mut node_ptr: NodePtr<T>) -> NodePtr<T> {
    unsafe {
        let mut right_ptr = node_ptr
            .as_ref()
            .right
            .expect("rotate_left requires a right child");

        node_ptr.as_mut().right = right_ptr.as_ref().left;
        if let Some(mut right_left_ptr) = right_ptr.as_ref().left {
            right_left_ptr.as_mut().parent = Some(node_ptr);
        }

        right_ptr.as_mut().parent = node_ptr.as_ref().parent;
        right_ptr.as_mut().left = Some(node_ptr);
        node_ptr.as_mut().parent = Some(right_ptr);

        // Bottom up: the demoted node first
        adjust(node_ptr);
        adjust(right_ptr);
        right_ptr
    }
}

/// Promotes the left child of `node_ptr` and returns it as the new subtree root.
pub(super) fn rotate_right<T>(mut node_ptr: NodePtr<T>) -> NodePtr<T> {
    unsafe {
        let mut left_ptr = node_ptr
            .as_ref()
            .left
            .expect("rotate_right requires a left child");

        node_ptr.as_mut().left = left_ptr.as_ref().right;
        if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
            left_right_ptr.as_mut().parent = Some(node_ptr);
        }

        left_ptr.as_mut().parent = node_ptr.as_ref().parent;
        left_ptr.as_mut().right = Some(node_ptr);
        node_ptr.as_mut().parent = Some(left_ptr);

        adjust(node_ptr);
        adjust(left_ptr);
        left_ptr
    }
}

/// Restores the AVL condition at `node_ptr`, whose children are assumed balanced
/// with correct cached heights. Returns the (possibly new) subtree root.
/// The balance factor must be within -2..=2, which always holds after a single update.
pub(super) fn rebalance<T>(mut node_ptr: NodePtr<T>) -> NodePtr<T> {
    let factor = balance_factor(node_ptr);
    debug_assert!((-2..=2).contains(&factor));
    unsafe {
        match factor {
            2 => {
                let right_ptr = node_ptr.as_ref().right.expect("right-heavy node has a right child");
                if balance_factor(right_ptr) < 0 {
                    trace!(factor, "right-left rotation");
                    node_ptr.as_mut().right = Some(rotate_right(right_ptr));
                } else {
                    trace!(factor, "left rotation");
                }
                rotate_left(node_ptr)
            }
            -2 => {
                let left_ptr = node_ptr.as_ref().left.expect("left-heavy node has a left child");
                if balance_factor(left_ptr) > 0 {
                    trace!(factor, "left-right rotation");
                    node_ptr.as_mut().left = Some(rotate_left(left_ptr));
                } else {
                    trace!(factor, "right rotation");
                }
                rotate_right(node_ptr)
            }
            _ => {
                adjust(node_ptr);
                node_ptr
            }
        }
    }
}
