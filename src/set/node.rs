use std::ptr::NonNull;

pub(super) type NodePtr<T> = NonNull<Node<T>>;
pub(super) type Link<T> = Option<NodePtr<T>>;

/// A tree node. Owns its children through `left` and `right`;
/// `parent` is a back-reference used for traversal and rebalancing only.
/// The root's parent is `None`, which stands for the set itself.
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) left: Link<T>,
    pub(super) right: Link<T>,
    pub(super) parent: Link<T>,
    pub(super) height: usize,
    pub(super) size: usize,
}

impl<T> Node<T> {
    /// Allocates a leaf node.
    pub(super) fn create(parent: Link<T>, value: T) -> NodePtr<T> {
        let boxed = Box::new(Node {
            value,
            left: None,
            right: None,
            parent,
            height: 1,
            size: 1,
        });
        NonNull::from(Box::leak(boxed))
    }

    /// Frees a node allocated by `create` and hands back its value.
    ///
    /// # Safety
    ///
    /// The node must have been unlinked from its tree (or the whole tree is being torn down)
    /// and must not be accessed afterwards.
    pub(super) unsafe fn destroy(node_ptr: NodePtr<T>) -> T {
        let boxed = Box::from_raw(node_ptr.as_ptr());
        boxed.value
    }
}

pub(super) fn height<T>(link: Link<T>) -> usize {
    match link {
        None => 0,
        Some(node_ptr) => unsafe { node_ptr.as_ref().height },
    }
}

pub(super) fn size<T>(link: Link<T>) -> usize {
    match link {
        None => 0,
        Some(node_ptr) => unsafe { node_ptr.as_ref().size },
    }
}

/// Left-most node of the subtree rooted at `node_ptr`.
pub(super) fn leftmost<T>(mut node_ptr: NodePtr<T>) -> NodePtr<T> {
    while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
        node_ptr = left_ptr;
    }
    node_ptr
}

/// Right-most node of the subtree rooted at `node_ptr`.
pub(super) fn rightmost<T>(mut node_ptr: NodePtr<T>) -> NodePtr<T> {
    while let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
        node_ptr = right_ptr;
    }
    node_ptr
}

/// In-order successor, found through parent links only.
/// Returns `None` past the greatest node.
pub(super) fn successor<T>(node_ptr: NodePtr<T>) -> Link<T> {
    unsafe {
        if let Some(right_ptr) = node_ptr.as_ref().right {
            return Some(leftmost(right_ptr));
        }

        // Climb while we are a right child; the first parent reached from the left is next
        let mut child_ptr = node_ptr;
        let mut parent = node_ptr.as_ref().parent;
        while let Some(parent_ptr) = parent {
            if parent_ptr.as_ref().right != Some(child_ptr) {
                break;
            }
            child_ptr = parent_ptr;
            parent = parent_ptr.as_ref().parent;
        }
        parent
    }
}

/// In-order predecessor, mirror of `successor`.
/// Returns `None` before the smallest node.
pub(super) fn predecessor<T>(node_ptr: NodePtr<T>) -> Link<T> {
    unsafe {
        if let Some(left_ptr) = node_ptr.as_ref().left {
            return Some(rightmost(left_ptr));
        }

        let mut child_ptr = node_ptr;
        let mut parent = node_ptr.as_ref().parent;
        while let Some(parent_ptr) = parent {
            if parent_ptr.as_ref().left != Some(child_ptr) {
                break;
            }
            child_ptr = parent_ptr;
            parent = parent_ptr.as_ref().parent;
        }
        parent
    }
}

/// Number of nodes preceding `node_ptr` in the whole tree.
pub(super) fn rank<T>(node_ptr: NodePtr<T>) -> usize {
    unsafe {
        let mut rank = size(node_ptr.as_ref().left);
        let mut child_ptr = node_ptr;
        while let Some(parent_ptr) = child_ptr.as_ref().parent {
            if parent_ptr.as_ref().right == Some(child_ptr) {
                // Parent and its left subtree precede us
                rank += size(parent_ptr.as_ref().left) + 1;
            }
            child_ptr = parent_ptr;
        }
        rank
    }
}
