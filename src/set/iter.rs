use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::node::{self, Link};
use super::AvlTreeSet;

/// An iterator over the values of a set.
pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    remaining: usize,
    marker: PhantomData<&'a T>,
}

/// An iterator over a range of values of a set.
pub struct Range<'a, T> {
    // Both ends are inclusive; both are `None` once exhausted
    front: Link<T>,
    back: Link<T>,
    marker: PhantomData<&'a T>,
}

/// An owning iterator over the values of a set.
pub struct IntoIter<T> {
    set: AvlTreeSet<T>,
}

// Iterators only hand out shared references into the set
unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}
unsafe impl<T: Sync> Send for Range<'_, T> {}
unsafe impl<T: Sync> Sync for Range<'_, T> {}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(front: Link<T>, back: Link<T>, remaining: usize) -> Self {
        Self {
            front,
            back,
            remaining,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Range<'a, T> {
    pub(super) fn new(front: Link<T>, back: Link<T>) -> Self {
        debug_assert_eq!(front.is_none(), back.is_none());
        Self {
            front,
            back,
            marker: PhantomData,
        }
    }
}

impl<T> IntoIter<T> {
    pub(super) fn new(set: AvlTreeSet<T>) -> Self {
        Self { set }
    }
}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self::new(self.front, self.back, self.remaining)
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node_ptr = self.front?;
        self.front = node::successor(node_ptr);
        self.remaining -= 1;
        Some(unsafe { &(*node_ptr.as_ptr()).value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node_ptr = self.back?;
        self.back = node::predecessor(node_ptr);
        self.remaining -= 1;
        Some(unsafe { &(*node_ptr.as_ptr()).value })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Self::new(self.front, self.back)
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Range<'a, T> {
    fn take_front(&mut self, node_ptr: node::NodePtr<T>, step: Link<T>) -> Option<&'a T> {
        if Some(node_ptr) == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = step;
        }
        Some(unsafe { &(*node_ptr.as_ptr()).value })
    }

    fn take_back(&mut self, node_ptr: node::NodePtr<T>, step: Link<T>) -> Option<&'a T> {
        if Some(node_ptr) == self.front {
            self.front = None;
            self.back = None;
        } else {
            self.back = step;
        }
        Some(unsafe { &(*node_ptr.as_ptr()).value })
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.front?;
        self.take_front(node_ptr, node::successor(node_ptr))
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let node_ptr = self.back?;
        self.take_back(node_ptr, node::predecessor(node_ptr))
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.set.iter()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.set.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.set.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.set.pop_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
