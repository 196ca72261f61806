//! An ordered set implemented with an AVL tree.
//!
//! [`AvlTreeSet`] keeps unique values in ascending order and supports look-up,
//! insertion, removal, bound queries and rank queries in logarithmic time.
//! Positions in the set are [`Cursor`]s that move in both directions.
//!
//! ```
//! use avl_ordered_set::AvlTreeSet;
//! let mut set = AvlTreeSet::new();
//! set.insert("PANIC");
//! set.insert("DON'T");
//! assert_eq!(set.begin().get(), Some(&"DON'T"));
//! assert_eq!(set.find("PANIC").rank(), 1);
//! ```
//!
//! The [`plane`] module holds small, unrelated 2D geometry helpers.

pub mod plane;
pub mod set;

pub use set::{AvlTreeSet, Cursor, CursorMut};

#[cfg(test)]
mod tests;
