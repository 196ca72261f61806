//! An ordered set implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, trace};

mod balance;
mod cursor;
mod iter;
mod node;

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, Range};

use node::{Link, Node, NodePtr};

/// An ordered set implemented with an AVL tree.
///
/// Members are unique under `Ord` and kept in ascending order.
/// Positions in the set are represented by [`Cursor`]s, which may also point
/// past the greatest member (the end position).
///
/// ```
/// use avl_ordered_set::AvlTreeSet;
/// let mut set = AvlTreeSet::new();
/// set.insert(20);
/// set.insert(10);
/// assert_eq!(set.begin().get(), Some(&10));
/// assert_eq!(set.upper_bound(&15).get(), Some(&20));
/// assert!(set.upper_bound(&30).is_end());
/// set.remove(&10);
/// assert!(set.find(&10).is_end());
/// ```
pub struct AvlTreeSet<T> {
    // The set itself plays the role of the header node: `root` is its only child slot,
    // and a node whose parent link is `None` hangs directly off the header.
    root: Link<T>,
    leftmost: Link<T>,
}

// The set owns its nodes exclusively, like `Box<T>` does.
unsafe impl<T: Send> Send for AvlTreeSet<T> {}
unsafe impl<T: Sync> Sync for AvlTreeSet<T> {}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<T: Ord> AvlTreeSet<T> {
    /// Returns a cursor pointing at the member equal to `value`,
    /// or the end cursor if there is none.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.find_node(value))
    }

    /// Returns a mutable cursor pointing at the member equal to `value`,
    /// or at the end if there is none.
    pub fn find_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(value);
        CursorMut::new(self, node)
    }

    /// Returns a cursor pointing at the smallest member not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.lower_bound_node(value))
    }

    /// Returns a cursor pointing at the smallest member greater than `value`,
    /// or the end cursor if every member compares less or equal.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.upper_bound_node(value))
    }

    /// Returns a reference to the member equal to the given value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(value).get()
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(value).is_some()
    }

    /// Returns the number of members strictly less than `value`.
    /// The value does not need to be a member.
    pub fn rank<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = unsafe { node_ptr.as_ref() };
            if value.cmp(node.value.borrow()) == Ordering::Greater {
                rank += node::size(node.left) + 1;
                current = node.right;
            } else {
                current = node.left;
            }
        }
        rank
    }

    /// Inserts a value into the set.
    ///
    /// Returns a cursor pointing at the member equal to `value`. If such a member
    /// already existed, the set is left unchanged and `value` is dropped.
    pub fn insert(&mut self, value: T) -> Cursor<'_, T> {
        let (parent, ordering) = match self.find_insert_pos(&value) {
            Ok(existing_ptr) => return Cursor::new(self, Some(existing_ptr)),
            Err(pos) => pos,
        };

        let node_ptr = Node::create(parent, value);
        match parent {
            None => self.root = Some(node_ptr),
            Some(mut parent_ptr) => unsafe {
                if ordering == Ordering::Less {
                    parent_ptr.as_mut().left = Some(node_ptr);
                } else {
                    parent_ptr.as_mut().right = Some(node_ptr);
                }
            },
        }
        self.rebalance(parent);
        self.update_leftmost();
        trace!(len = self.len(), "inserted value");

        Cursor::new(self, Some(node_ptr))
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes a value from the set.
    /// Returns the value if it was previously in the set.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_ptr = self.find_node(value)?;
        let removed = self.remove_node(node_ptr);
        debug_assert!(self.find_node(value).is_none());
        Some(removed)
    }

    /// Moves all values from other into self, leaving other empty.
    pub fn append(&mut self, other: &mut Self) {
        if self.is_empty() {
            mem::swap(self, other);
            return;
        }
        let other = mem::take(other);
        debug!(len = self.len(), other_len = other.len(), "appending set");
        for value in other {
            self.insert(value);
        }
    }

    /// Gets an iterator over a sub-range of values in the set in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        T: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(start), Bound::Excluded(end)) if start == end => {
                panic!("range start and end are equal and excluded")
            }
            (
                Bound::Included(start) | Bound::Excluded(start),
                Bound::Included(end) | Bound::Excluded(end),
            ) if start > end => panic!("range start is greater than range end"),
            _ => {}
        }

        let first = match range.start_bound() {
            Bound::Included(start) => self.lower_bound_node(start),
            Bound::Excluded(start) => self.upper_bound_node(start),
            Bound::Unbounded => self.leftmost,
        };
        // Last member inside the range is the predecessor of the first one past it
        let last = match range.end_bound() {
            Bound::Included(end) => self.predecessor_or_last(self.upper_bound_node(end)),
            Bound::Excluded(end) => self.predecessor_or_last(self.lower_bound_node(end)),
            Bound::Unbounded => self.root.map(node::rightmost),
        };

        match (first, last) {
            (Some(first_ptr), Some(last_ptr))
                if unsafe { first_ptr.as_ref().value <= last_ptr.as_ref().value } =>
            {
                Range::new(first, last)
            }
            // No member falls inside the bounds
            _ => Range::new(None, None),
        }
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_ptr) = self.root {
                assert!(root_ptr.as_ref().parent.is_none());
            }

            // Check leftmost cache
            assert_eq!(self.leftmost, self.root.map(node::leftmost));

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let node = node_ptr.as_ref();

                // Check link for left child node
                if let Some(left_ptr) = node.left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert!(left_ptr.as_ref().value < node.value);
                }

                // Check link for right child node
                if let Some(right_ptr) = node.right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert!(right_ptr.as_ref().value > node.value);
                }

                // Check cached height and size
                let left_height = node::height(node.left);
                let right_height = node::height(node.right);
                assert_eq!(node.height, left_height.max(right_height) + 1);
                assert_eq!(node.size, node::size(node.left) + node::size(node.right) + 1);

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.len());
            assert_eq!(self.iter().count(), num_nodes);
        }
    }

    fn find_node<Q>(&self, value: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match value.cmp(node_ptr.as_ref().value.borrow()) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }

    /// Locates `value`, returning the matching node,
    /// or the parent to attach a new leaf to and the side to attach it on.
    fn find_insert_pos(&self, value: &T) -> Result<NodePtr<T>, (Link<T>, Ordering)> {
        let mut parent: Link<T> = None;
        let mut ordering = Ordering::Equal;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            ordering = value.cmp(unsafe { &node_ptr.as_ref().value });
            current = match ordering {
                Ordering::Equal => return Ok(node_ptr),
                Ordering::Less => unsafe { node_ptr.as_ref().left },
                Ordering::Greater => unsafe { node_ptr.as_ref().right },
            };
            parent = Some(node_ptr);
        }
        Err((parent, ordering))
    }

    fn lower_bound_node<Q>(&self, value: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut result = None;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = unsafe { node_ptr.as_ref() };
            if value.cmp(node.value.borrow()) == Ordering::Greater {
                current = node.right;
            } else {
                result = current;
                current = node.left;
            }
        }
        result
    }

    fn upper_bound_node<Q>(&self, value: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut result = None;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = unsafe { node_ptr.as_ref() };
            if value.cmp(node.value.borrow()) != Ordering::Less {
                current = node.right;
            } else {
                // Candidate; a tighter bound may still exist on the left
                result = current;
                current = node.left;
            }
        }
        result
    }
}

impl<T> AvlTreeSet<T> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            leftmost: None,
        }
    }

    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        node::size(self.root)
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!(len = self.len(), "clearing set");
        }
        self.postorder(|node_ptr| unsafe {
            Node::destroy(node_ptr);
        });
        self.root = None;
        self.leftmost = None;
    }

    /// Returns a cursor pointing at the smallest member,
    /// or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.leftmost)
    }

    /// Returns the cursor pointing past the greatest member.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, None)
    }

    /// Returns a mutable cursor pointing at the smallest member.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        let leftmost = self.leftmost;
        CursorMut::new(self, leftmost)
    }

    /// Returns a cursor pointing at the member with the given rank,
    /// i.e. the member preceded by exactly `index` members.
    /// Returns the end cursor if `index >= len()`.
    pub fn select(&self, mut index: usize) -> Cursor<'_, T> {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = unsafe { node_ptr.as_ref() };
            let left_size = node::size(node.left);
            current = match index.cmp(&left_size) {
                Ordering::Less => node.left,
                Ordering::Equal => break,
                Ordering::Greater => {
                    index -= left_size + 1;
                    node.right
                }
            };
        }
        Cursor::new(self, current)
    }

    /// Returns the smallest member.
    pub fn first(&self) -> Option<&T> {
        self.begin().get()
    }

    /// Returns the greatest member.
    pub fn last(&self) -> Option<&T> {
        self.root
            .map(|root_ptr| unsafe { &(*node::rightmost(root_ptr).as_ptr()).value })
    }

    /// Removes and returns the smallest member.
    pub fn pop_first(&mut self) -> Option<T> {
        let node_ptr = self.leftmost?;
        Some(self.remove_node(node_ptr))
    }

    /// Removes and returns the greatest member.
    pub fn pop_last(&mut self) -> Option<T> {
        let node_ptr = node::rightmost(self.root?);
        Some(self.remove_node(node_ptr))
    }

    /// Gets an iterator over the values of the set in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(
            self.leftmost,
            self.root.map(node::rightmost),
            self.len(),
        )
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        node::height(self.root)
    }

    fn predecessor_or_last(&self, link: Link<T>) -> Link<T> {
        match link {
            Some(node_ptr) => node::predecessor(node_ptr),
            None => self.root.map(node::rightmost),
        }
    }

    fn update_leftmost(&mut self) {
        self.leftmost = self.root.map(node::leftmost);
    }

    /// Points the child slot of `parent` that holds `old` at `new` instead.
    /// A `None` parent denotes the root slot.
    fn replace_child(&mut self, parent: Link<T>, old: NodePtr<T>, new: Link<T>) {
        match parent {
            None => self.root = new,
            Some(mut parent_ptr) => unsafe {
                if parent_ptr.as_ref().left == Some(old) {
                    parent_ptr.as_mut().left = new;
                } else {
                    debug_assert!(parent_ptr.as_ref().right == Some(old));
                    parent_ptr.as_mut().right = new;
                }
            },
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    ///
    /// Every ancestor gets its height and size recomputed, also after a rotation,
    /// since removal may require a rotation on each level.
    fn rebalance(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            let subtree_root = balance::rebalance(node_ptr);
            if subtree_root != node_ptr {
                self.replace_child(parent, node_ptr, Some(subtree_root));
            }
            current = parent;
        }
    }

    /// Unlinks `node_ptr` from the tree, frees it and returns its value.
    /// A node with two children is replaced by its in-order successor node;
    /// values never move between nodes.
    fn remove_node(&mut self, node_ptr: NodePtr<T>) -> T {
        let (parent, left, right) = unsafe {
            let node = node_ptr.as_ref();
            (node.parent, node.left, node.right)
        };

        let rebalance_from = match (left, right) {
            (Some(mut left_ptr), Some(mut right_ptr)) => unsafe {
                let mut successor_ptr = node::leftmost(right_ptr);
                let rebalance_from;
                if successor_ptr == right_ptr {
                    // Successor is the right child and keeps its own right subtree
                    rebalance_from = successor_ptr;
                } else {
                    // Splice successor out, its right child takes its place
                    let mut successor_parent_ptr = successor_ptr
                        .as_ref()
                        .parent
                        .expect("successor below the right child has a parent");
                    successor_parent_ptr.as_mut().left = successor_ptr.as_ref().right;
                    if let Some(mut successor_right_ptr) = successor_ptr.as_ref().right {
                        successor_right_ptr.as_mut().parent = Some(successor_parent_ptr);
                    }

                    successor_ptr.as_mut().right = Some(right_ptr);
                    right_ptr.as_mut().parent = Some(successor_ptr);
                    rebalance_from = successor_parent_ptr;
                }

                // Successor takes over the removed node's position
                successor_ptr.as_mut().left = Some(left_ptr);
                left_ptr.as_mut().parent = Some(successor_ptr);
                successor_ptr.as_mut().parent = parent;
                self.replace_child(parent, node_ptr, Some(successor_ptr));

                Some(rebalance_from)
            },
            (child, None) | (None, child) => {
                // Node is stem or leaf, its only child (if any) moves up
                if let Some(mut child_ptr) = child {
                    unsafe { child_ptr.as_mut().parent = parent };
                }
                self.replace_child(parent, node_ptr, child);
                parent
            }
        };

        self.rebalance(rebalance_from);
        self.update_leftmost();
        trace!(len = self.len(), "removed value");

        unsafe { Node::destroy(node_ptr) }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr<T>)>(&self, f: F) {
        self.traverse(f, |_| {}, |_| {});
    }

    fn postorder<F: FnMut(NodePtr<T>)>(&self, f: F) {
        self.traverse(|_| {}, |_| {}, f);
    }

    /// Iterative depth-first walk using parent links.
    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodePtr<T>),
        In: FnMut(NodePtr<T>),
        Post: FnMut(NodePtr<T>),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_ptr);
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Deep-copies the subtree at `node_ptr`, linking the copy's root to `parent`.
    unsafe fn clone_subtree(node_ptr: NodePtr<T>, parent: Link<T>) -> NodePtr<T>
    where
        T: Clone,
    {
        let node = node_ptr.as_ref();
        let mut copy_ptr = Node::create(parent, node.value.clone());
        let left = node.left.map(|left_ptr| Self::clone_subtree(left_ptr, Some(copy_ptr)));
        let right = node.right.map(|right_ptr| Self::clone_subtree(right_ptr, Some(copy_ptr)));

        let copy = copy_ptr.as_mut();
        copy.left = left;
        copy.right = right;
        copy.height = node.height;
        copy.size = node.size;
        copy_ptr
    }
}

impl<T> Drop for AvlTreeSet<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for AvlTreeSet<T> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for AvlTreeSet<T> {
    /// Deep-copies every node; the clone shares nothing with `self`.
    fn clone(&self) -> Self {
        let mut set = Self::new();
        set.root = self
            .root
            .map(|root_ptr| unsafe { Self::clone_subtree(root_ptr, None) });
        set.update_leftmost();
        debug!(len = set.len(), "cloned set");
        set
    }
}

impl<T: PartialEq> PartialEq for AvlTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlTreeSet<T> {}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
