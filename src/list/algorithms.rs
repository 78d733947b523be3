use crate::list::{move_after, next_of, prev_of, List, Node};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

/// Asserts the ring invariant after a whole-list algorithm when the
/// `verify-ring` feature is enabled, and always in this crate's unit tests.
macro_rules! verify_ring {
    ($list:expr) => {
        #[cfg(any(test, feature = "verify-ring"))]
        assert!($list.is_well_formed(), "ring invariant broken");
    };
}

mod sort;

pub(crate) use sort::merge_all_with;

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: PartialOrd> PartialOrd for List<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord> Ord for List<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for elt in self {
            elt.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl<T> List<T> {
    /// Returns `true` if the `List` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_back(0);
    /// list.push_back(1);
    /// list.push_back(2);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Removes and returns the middle element, or `None` if the list is empty.
    ///
    /// In a list of length *n* the removed element is the one at 1-indexed
    /// position ⌈*n*/2⌉. Two cursors walk towards each other, one from each
    /// end, until they meet or become adjacent; the front one is removed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4, 5]);
    /// assert_eq!(list.remove_mid(), Some(3));
    /// assert_eq!(list.remove_mid(), Some(2));
    /// assert_eq!(Vec::from_iter(list), vec![1, 4, 5]);
    /// ```
    pub fn remove_mid(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let (mut front, mut back) = (self.front_node(), self.back_node());
        // SAFETY: both cursors stay inside the non-empty element range, as they
        // stop as soon as they meet or become adjacent.
        unsafe {
            while front != back && next_of(front) != back {
                front = next_of(front);
                back = prev_of(back);
            }
            Some(self.detach_node(front).into_element())
        }
    }

    /// Removes every run of two or more consecutive elements that `eq` reports
    /// equal, including the first element of each run. Returns the number of
    /// removed elements.
    ///
    /// A single left-to-right pass remembers whether the previous comparison
    /// matched, so the last element of a run is removed as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 1, 2, 3, 3, 3, 1]);
    /// assert_eq!(list.remove_duplicate_runs_by(|a, b| a == b), 5);
    /// assert_eq!(Vec::from_iter(list), vec![2, 1]);
    /// ```
    pub fn remove_duplicate_runs_by<F>(&mut self, mut eq: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let ghost = self.ghost_node();
        let (mut current, mut in_run, mut removed) = (self.front_node(), false, 0);
        while current != ghost {
            // SAFETY: `current` is a non-ghost node of the list; `next` is read
            // before `current` may be detached.
            unsafe {
                let next = next_of(current);
                let equal = next != ghost && eq(&current.as_ref().element, &next.as_ref().element);
                if in_run || equal {
                    drop(self.detach_node(current));
                    removed += 1;
                }
                in_run = equal;
                current = next;
            }
        }
        verify_ring!(self);
        removed
    }

    /// Like [`List::remove_duplicate_runs_by`], comparing with `==`.
    pub fn remove_duplicate_runs(&mut self) -> usize
    where
        T: PartialEq,
    {
        self.remove_duplicate_runs_by(|a, b| a == b)
    }

    /// Swaps every two adjacent elements, from the front. A trailing odd
    /// element keeps its position.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4, 5]);
    /// list.swap_pairs();
    /// assert_eq!(Vec::from_iter(list), vec![2, 1, 4, 3, 5]);
    /// ```
    pub fn swap_pairs(&mut self) {
        let ghost = self.ghost_node();
        let mut first = self.front_node();
        // SAFETY: `first` and `second` are checked to be non-ghost nodes before
        // `first` is moved right after `second`.
        unsafe {
            loop {
                let second = next_of(first);
                if first == ghost || second == ghost {
                    break;
                }
                move_after(first, second);
                first = next_of(first);
            }
        }
        verify_ring!(self);
    }

    /// Reverses the order of the elements in place.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// list.reverse();
    /// assert_eq!(Vec::from_iter(list), vec![3, 2, 1]);
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_node();
        // SAFETY: `ghost..ghost` spans the whole ring.
        unsafe { reverse_range(ghost, ghost) };
        verify_ring!(self);
    }

    /// Reverses the elements `k` at a time. A trailing group shorter than `k`
    /// keeps its original order. Does nothing if `k < 2`.
    ///
    /// Each full group is reversed with the node before it serving as the
    /// temporary head, so no node is allocated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4, 5, 6, 7, 8]);
    /// list.reverse_k(3);
    /// assert_eq!(Vec::from_iter(list), vec![3, 2, 1, 6, 5, 4, 7, 8]);
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        if k < 2 {
            return;
        }
        let ghost = self.ghost_node();
        let mut anchor = ghost;
        // SAFETY: `anchor` is either the ghost node or the last node of an
        // already reversed group; `start..end` is the group right after it.
        unsafe {
            loop {
                let start = next_of(anchor);
                let (mut end, mut count) = (start, 0);
                while count < k && end != ghost {
                    end = next_of(end);
                    count += 1;
                }
                if count < k {
                    break;
                }
                reverse_range(anchor, end);
                // the old group front is now its back
                anchor = start;
            }
        }
        verify_ring!(self);
    }

    /// Removes every element for which `dominated(element, later)` holds with
    /// some surviving `later` element after it, and returns the number of
    /// elements left.
    ///
    /// The list is walked once from the back. Each element is compared with
    /// the nearest survivor after it, so `dominated` must describe a strict
    /// order (e.g. `a < b`) for the survivors to be the suffix extrema.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// // keep every element that is >= all elements after it
    /// let mut list = List::from_iter([5, 2, 13, 3, 8]);
    /// assert_eq!(list.remove_dominated_by(|x, later| x < later), 2);
    /// assert_eq!(Vec::from_iter(list), vec![13, 8]);
    /// ```
    pub fn remove_dominated_by<F>(&mut self, mut dominated: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.is_empty() {
            return 0;
        }
        let ghost = self.ghost_node();
        let mut survivor = self.back_node();
        let mut kept = 1;
        // SAFETY: `survivor` is always a non-ghost node, and `candidate` is
        // checked against the ghost node before it is read or detached.
        unsafe {
            let mut candidate = prev_of(survivor);
            while candidate != ghost {
                let prev = prev_of(candidate);
                if dominated(&candidate.as_ref().element, &survivor.as_ref().element) {
                    drop(self.detach_node(candidate));
                } else {
                    survivor = candidate;
                    kept += 1;
                }
                candidate = prev;
            }
        }
        verify_ring!(self);
        kept
    }
}

/// Reverse the nodes strictly between `anchor` and `end`, by moving each of
/// them right after `anchor` in turn.
///
/// It is unsafe because `anchor..end` must be a valid range of a list; `anchor`
/// itself and `end` stay in place. `anchor == end` reverses the whole ring.
unsafe fn reverse_range<T>(anchor: NonNull<Node<T>>, end: NonNull<Node<T>>) {
    let mut current = next_of(anchor);
    while current != end {
        let next = next_of(current);
        move_after(current, anchor);
        current = next;
    }
}
