use std::fmt;
use std::ptr;

use super::node::{self, Link};
use super::AvlTreeSet;

/// A position in an [`AvlTreeSet`]: either a member, or the end of the set.
///
/// Cursors move in both directions by following parent links, without an
/// auxiliary stack. The end position lies past the greatest member; moving
/// backwards from it yields the greatest member.
///
/// ```
/// use avl_ordered_set::AvlTreeSet;
/// let set: AvlTreeSet<_> = [43, 41, 42].into_iter().collect();
/// let mut cursor = set.end();
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&43));
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&42));
/// assert_eq!(cursor.rank(), 1);
/// ```
pub struct Cursor<'a, T> {
    current: Link<T>,
    set: &'a AvlTreeSet<T>,
}

/// A position in an [`AvlTreeSet`] with exclusive access to the set,
/// which allows removing the member at the cursor.
pub struct CursorMut<'a, T> {
    current: Link<T>,
    set: &'a mut AvlTreeSet<T>,
}

unsafe impl<T: Sync> Send for Cursor<'_, T> {}
unsafe impl<T: Sync> Sync for Cursor<'_, T> {}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(set: &'a AvlTreeSet<T>, current: Link<T>) -> Self {
        Self { current, set }
    }

    /// Returns the member at the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.current
            .map(|node_ptr| unsafe { &(*node_ptr.as_ptr()).value })
    }

    /// Returns true if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the next greater member, or to the end position after the greatest one.
    ///
    /// Advancing the end position is a logic error: it panics in debug builds
    /// and leaves the cursor at the end otherwise.
    pub fn move_next(&mut self) {
        debug_assert!(self.current.is_some(), "cursor advanced past the end");
        self.current = step_next(self.current);
    }

    /// Moves to the next smaller member. From the end position this is the greatest member.
    ///
    /// Moving back from the smallest member is a logic error: it panics in debug builds
    /// and moves the cursor to the end position otherwise.
    pub fn move_prev(&mut self) {
        self.current = step_prev(self.set, self.current);
    }

    /// Returns the number of members less than the member at the cursor.
    /// At the end position this is the number of members in the set.
    pub fn rank(&self) -> usize {
        match self.current {
            None => self.set.len(),
            Some(node_ptr) => node::rank(node_ptr),
        }
    }
}

impl<'a, T> CursorMut<'a, T> {
    pub(super) fn new(set: &'a mut AvlTreeSet<T>, current: Link<T>) -> Self {
        Self { current, set }
    }

    /// Returns the member at the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.current
            .map(|node_ptr| unsafe { &(*node_ptr.as_ptr()).value })
    }

    /// Returns true if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// See [`Cursor::move_next`].
    pub fn move_next(&mut self) {
        debug_assert!(self.current.is_some(), "cursor advanced past the end");
        self.current = step_next(self.current);
    }

    /// See [`Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.current = step_prev(&*self.set, self.current);
    }

    /// See [`Cursor::rank`].
    pub fn rank(&self) -> usize {
        self.as_cursor().rank()
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&*self.set, self.current)
    }

    /// Removes the member at the cursor and returns it.
    /// The cursor moves on to the member that followed the removed one.
    /// Returns `None` and does nothing at the end position.
    pub fn remove_current(&mut self) -> Option<T> {
        let node_ptr = self.current?;
        // The successor node survives the removal, even when it is
        // spliced into the removed node's position.
        self.current = node::successor(node_ptr);
        Some(self.set.remove_node(node_ptr))
    }
}

fn step_next<T>(current: Link<T>) -> Link<T> {
    // At the end position there is nowhere to go
    current.and_then(node::successor)
}

fn step_prev<T>(set: &AvlTreeSet<T>, current: Link<T>) -> Link<T> {
    match current {
        None => set.root.map(node::rightmost),
        Some(node_ptr) => {
            let prev = node::predecessor(node_ptr);
            debug_assert!(prev.is_some(), "cursor moved before the start");
            prev
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.set, other.set) && self.current == other.current
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}
