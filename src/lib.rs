//! This crate provides a queue of owned byte strings, stored in a doubly-linked
//! list with owned nodes, implemented as a cyclic list.
//!
//! The [`Queue`] inserts and removes strings at both ends in constant time, and
//! reorganizes itself in place (sorting, reversing, filtering, merging) by
//! relinking nodes only. Its storage is the generic [`List`], which can be used
//! on its own.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("cat")?;
//! queue.insert_tail("ant")?;
//! queue.insert_head("bee")?;
//! queue.insert_tail("ant")?;
//!
//! queue.sort(); // ["ant", "ant", "bee", "cat"]
//! queue.delete_dup()?; // ["bee", "cat"]
//! assert_eq!(queue.size(), 2);
//!
//! let mut buf = [0; 8];
//! let element = queue.remove_tail(&mut buf)?;
//! assert_eq!(element.as_bytes(), b"cat");
//! assert_eq!(&buf[..4], b"cat\0");
//! # Ok::<(), cyclic_queue::QueueError>(())
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ payload T ║           ║ payload T ║                        ┊No payload ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                               ↑   ↑
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     List
//! ```
//! The `List` only holds a pointer `ghost` to the ghost node. There is no
//! length field: the length is counted by walking the ring.
//!
//! Each node of the list `List<T>` is allocated on heap, which contains:
//! - the `next` pointer that points to the next element (or the ghost node if it
//!   is the last element in the list);
//! - the `prev` pointer that points to the previous element (or the ghost node if
//!   it is the first element in the list);
//! - the actual payload `T` that depends on the element type of the list, except
//!   the ghost node.
//!
//! Note that the ghost node has *NO* payload to save memory.
//!
//! Initially, there is a ghost node in an empty list, of which the `next` and `prev`
//! pointer point to itself.
//!
//! In a [`Queue`], the payload is an [`Element`]: a separately allocated buffer
//! holding the string bytes and a NUL terminator. Inserting a string costs two
//! allocations (node and payload) and dropping the queue releases both for every
//! element, then the ghost node.
//!
//! # Iteration
//!
//! [`Iter`] borrows the list and walks it from both ends, like a slice
//! iterator: it is double-ended, fused and stops at the ghost node instead of
//! cycling. [`IntoIter`] pops the elements off an owned list.
//!
//! ## Examples
//!
//! ```
//! use cyclic_queue::List;
//! use std::iter::FromIterator;
//!
//! let list = List::from_iter([1, 2, 3]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next_back(), Some(&3));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), None);
//! assert_eq!(iter.next_back(), None); // Fused and non-cyclic
//!
//! assert_eq!(Vec::from_iter(list.into_iter().rev()), vec![3, 2, 1]);
//! ```
//!
//! # Algorithms
//!
//! Whole-list algorithms relink nodes and never move payloads:
//! - [`remove_mid`]: remove the middle element;
//! - [`remove_duplicate_runs`]: remove every run of adjacent equal elements;
//! - [`swap_pairs`], [`reverse`] and [`reverse_k`]: reorder in place;
//! - [`sort`]: stable merge sort over the `next` links;
//! - [`remove_dominated_by`]: keep the suffix extrema only;
//! - [`merge_by`] and [`merge_all_by`]: merge sorted lists.
//!
//! Enabling the `verify-ring` feature checks the ring after each of them:
//! ```text
//! [dependencies]
//! cyclic_queue = { features = ["verify-ring"] }
//! ```
//!
//! # Logging
//!
//! The [`Queue`] reports through the [`log`] facade: allocation failures at
//! `warn`, whole-queue deletions and merges at `debug`, and insertions and
//! removals at `trace`. No logger is installed by this crate.
//!
//! [`List`]: crate::List
//! [`Iter`]: crate::Iter
//! [`IntoIter`]: crate::IntoIter
//! [`remove_mid`]: crate::List::remove_mid
//! [`remove_duplicate_runs`]: crate::List::remove_duplicate_runs
//! [`swap_pairs`]: crate::List::swap_pairs
//! [`reverse`]: crate::List::reverse
//! [`reverse_k`]: crate::List::reverse_k
//! [`sort`]: crate::List::sort
//! [`remove_dominated_by`]: crate::List::remove_dominated_by
//! [`merge_by`]: crate::List::merge_by
//! [`merge_all_by`]: crate::List::merge_all_by

#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::List;
#[doc(inline)]
pub use queue::{Element, Queue};

pub use error::{QueueError, Result};

pub mod list;
pub mod queue;

mod error;
