use crate::list::{connect, next_of, set_next, List, Node};
use std::cmp::Ordering;
use std::ptr::NonNull;

impl<T> List<T> {
    /// Sort the list.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time, with a
    /// recursion depth of *O*(log(*n*)).
    ///
    /// # Current Implementation
    ///
    /// The ring is cut into a chain threaded through `next` only, sorted by a
    /// top-down merge sort that splits at the midpoint found with a fast and a
    /// slow pointer, and the `prev` links are rebuilt in one final pass. No
    /// node is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([5, 2, 4, 3, 1]);
    ///
    /// list.sort();
    ///
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        merge_sort(self, |a, b| a.lt(b));
    }

    /// Sort the list with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// elements in the list. If the ordering is not total, the order
    /// of the elements is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut v = List::from_iter([5, 4, 1, 3, 2]);
    /// v.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(Vec::from_iter(v.iter().copied()), vec![1, 2, 3, 4, 5]);
    ///
    /// // reverse sorting
    /// v.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(Vec::from_iter(v), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        merge_sort(self, |a, b| compare(a, b) == Ordering::Less)
    }

    /// Sorts the list with a key extraction function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut v = List::from_iter([-5i32, 4, 1, -3, 2]);
    ///
    /// v.sort_by_key(|k| k.abs());
    /// assert_eq!(Vec::from_iter(v), vec![1, 2, -3, 4, -5]);
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        merge_sort(self, |a, b| f(a).lt(&f(b)));
    }

    /// Merges the sorted list `other` into this sorted list, leaving `other`
    /// empty. `less` is the strict order both lists are sorted by.
    ///
    /// The merge is stable: on equal elements, the ones from `self` come first.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* + *m*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 4, 6]);
    /// let mut other = List::from_iter([2, 3, 7]);
    /// list.merge_by(&mut other, |a, b| a < b);
    /// assert!(other.is_empty());
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3, 4, 6, 7]);
    /// ```
    pub fn merge_by<F>(&mut self, other: &mut Self, mut less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        merge_into(self, other, &mut less);
        verify_ring!(self);
    }

    /// Merges all sorted `lists` into `lists[0]`, leaving the others empty.
    /// Returns the length of the merged list, or 0 if `lists` is empty.
    ///
    /// Lists are merged pairwise in rounds (`1` into `0`, `3` into `2`, ...,
    /// then `2` into `0`, ...), so each element takes part in *O*(log(*k*))
    /// merges. On equal elements, the ones from lower-indexed lists come first.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut lists = vec![
    ///     List::from_iter([1, 5]),
    ///     List::from_iter([2, 3]),
    ///     List::new(),
    ///     List::from_iter([0, 4, 9]),
    /// ];
    /// assert_eq!(List::merge_all_by(&mut lists, |a, b| a < b), 7);
    /// assert!(lists[1..].iter().all(List::is_empty));
    /// assert_eq!(Vec::from_iter(lists[0].iter().copied()), vec![0, 1, 2, 3, 4, 5, 9]);
    /// ```
    pub fn merge_all_by<F>(lists: &mut [Self], less: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        merge_all_with(lists, |list| list, less)
    }
}

/// The k-way merge behind [`List::merge_all_by`], for any slice whose items
/// own a list reachable through `as_list`.
pub(crate) fn merge_all_with<L, T, F>(
    lists: &mut [L],
    as_list: fn(&mut L) -> &mut List<T>,
    mut less: F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut step = 1;
    while step < lists.len() {
        let mut i = 0;
        while i + step < lists.len() {
            let (left, right) = lists.split_at_mut(i + step);
            merge_into(as_list(&mut left[i]), as_list(&mut right[0]), &mut less);
            i += 2 * step;
        }
        step *= 2;
    }
    match lists.first_mut() {
        Some(merged) => {
            let merged = as_list(merged);
            verify_ring!(merged);
            merged.len()
        }
        None => 0,
    }
}

fn merge_sort<T, F>(list: &mut List<T>, mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let (front, ghost) = (list.front_node(), list.ghost_node());
    // SAFETY: the nodes of the list form a chain `front..ghost`, as the ghost
    // node terminates the `next` links.
    unsafe {
        if front == ghost || next_of(front) == ghost {
            return;
        }
        let head = sort_chain(front, ghost, &mut less);
        relink(ghost, head);
    }
    verify_ring!(list);
}

fn merge_into<T, F>(list: &mut List<T>, other: &mut List<T>, less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let detached = match other.detach_all_nodes() {
        Some(detached) => detached,
        None => return,
    };
    if list.is_empty() {
        // SAFETY: the ghost node of an empty list is adjacent to itself.
        unsafe { list.attach_nodes(list.ghost_node(), list.ghost_node(), detached) };
        return;
    }
    let ghost = list.ghost_node();
    // SAFETY: the nodes of `list` already form a chain ending at `ghost`, and
    // the detached nodes are terminated by `ghost` right here, so both are
    // valid chains owned by `list` only.
    unsafe {
        set_next(detached.back, ghost);
        let head = merge_chains(list.front_node(), detached.front, ghost, less);
        relink(ghost, head);
    }
}

/// Sort the non-empty chain `head..end` and return its new head.
///
/// It is unsafe because `head..end` must be a valid chain: following `next`
/// from `head` reaches `end`, and no other chain shares its nodes.
unsafe fn sort_chain<T, F>(
    head: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    if next_of(head) == end {
        return head;
    }
    let mid = split_chain(head, end);
    let left = sort_chain(head, end, less);
    let right = sort_chain(mid, end, less);
    merge_chains(left, right, end, less)
}

/// Cut the chain `head..end` of two or more nodes in halves, and return the
/// head of the second half. The first half ends at `end` afterwards.
///
/// The second half starts at node ⌊*n*/2⌋, located by a slow pointer moving
/// one node for every two nodes of the fast one.
unsafe fn split_chain<T>(head: NonNull<Node<T>>, end: NonNull<Node<T>>) -> NonNull<Node<T>> {
    let (mut fast, mut slow, mut before) = (head, head, head);
    while fast != end && next_of(fast) != end {
        fast = next_of(next_of(fast));
        before = slow;
        slow = next_of(slow);
    }
    set_next(before, end);
    slow
}

/// Merge two sorted chains ending at `end` into one and return its head.
///
/// The node from `left` is taken unless the one from `right` is strictly less,
/// which keeps the merge stable.
unsafe fn merge_chains<T, F>(
    mut left: NonNull<Node<T>>,
    mut right: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut head = end;
    let mut tail: Option<NonNull<Node<T>>> = None;
    while left != end && right != end {
        let node;
        if less(&right.as_ref().element, &left.as_ref().element) {
            node = right;
            right = next_of(right);
        } else {
            node = left;
            left = next_of(left);
        }
        match tail {
            Some(tail) => set_next(tail, node),
            None => head = node,
        }
        tail = Some(node);
    }
    let rest = if left != end { left } else { right };
    match tail {
        Some(tail) => set_next(tail, rest),
        None => head = rest,
    }
    head
}

/// Turn the chain `head..ghost` back into a ring: point `ghost.next` at
/// `head`, and rebuild every `prev` link, the ghost node's included.
unsafe fn relink<T>(ghost: NonNull<Node<T>>, head: NonNull<Node<T>>) {
    let (mut prev, mut node) = (ghost, head);
    while node != ghost {
        let next = next_of(node);
        connect(prev, node);
        prev = node;
        node = next;
    }
    connect(prev, ghost);
}

#[cfg(test)]
mod tests {
    use crate::List;
    use std::iter::FromIterator;

    #[test]
    fn list_sort() {
        fn test_sort(input: &[i32]) {
            let mut list = List::from_iter(input.iter().copied());
            list.sort();
            assert!(list.is_well_formed());
            let mut expected = input.to_vec();
            expected.sort();
            assert_eq!(Vec::from_iter(list.iter().copied()), expected);

            // sorting a sorted list changes nothing
            list.sort();
            assert!(list.is_well_formed());
            assert_eq!(Vec::from_iter(list), expected);
        }
        test_sort(&[]);
        test_sort(&[1]);
        test_sort(&[2, 1]);
        test_sort(&[1, 2]);
        test_sort(&[3, 1, 2]);
        test_sort(&[5, 5, 5, 5]);
        test_sort(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        test_sort(&[4, 1, 3, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9]);
    }

    #[test]
    fn list_sort_stable() {
        let rng = fastrand::Rng::with_seed(7);
        for len in 0..64 {
            let input: Vec<(u8, usize)> = (0..len).map(|i| (rng.u8(0..4), i)).collect();
            let mut list = List::from_iter(input.iter().copied());
            list.sort_by_key(|&(key, _)| key);
            assert!(list.is_well_formed());

            let mut expected = input.clone();
            expected.sort_by_key(|&(key, _)| key);
            assert_eq!(Vec::from_iter(list), expected);
        }
    }

    #[test]
    fn list_sort_back_links() {
        let mut list = List::from_iter([3, 1, 2, 0]);
        list.sort();
        let backwards: Vec<i32> = list.iter().rev().copied().collect();
        assert_eq!(backwards, vec![3, 2, 1, 0]);
        assert_eq!(list.back(), Some(&3));
        list.push_back(4);
        list.push_front(-1);
        assert_eq!(Vec::from_iter(list), vec![-1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn list_merge() {
        fn test_merge(left: &[i32], right: &[i32]) {
            let mut list = List::from_iter(left.iter().copied());
            let mut other = List::from_iter(right.iter().copied());
            list.merge_by(&mut other, |a, b| a < b);
            assert!(other.is_empty());
            assert!(other.is_well_formed());
            assert!(list.is_well_formed());
            let mut expected: Vec<i32> = left.iter().chain(right).copied().collect();
            expected.sort();
            assert_eq!(Vec::from_iter(list), expected);
        }
        test_merge(&[], &[]);
        test_merge(&[1], &[]);
        test_merge(&[], &[1]);
        test_merge(&[1, 3, 5], &[2, 4, 6]);
        test_merge(&[4, 5, 6], &[1, 2, 3]);
        test_merge(&[1, 2, 3], &[4, 5, 6]);
        test_merge(&[1, 1, 2], &[1, 2, 2]);
    }

    #[test]
    fn list_merge_stable() {
        let mut list = List::from_iter([(1, 'a'), (2, 'a')]);
        let mut other = List::from_iter([(1, 'b'), (2, 'b')]);
        list.merge_by(&mut other, |a, b| a.0 < b.0);
        assert_eq!(
            Vec::from_iter(list),
            vec![(1, 'a'), (1, 'b'), (2, 'a'), (2, 'b')]
        );
    }

    #[test]
    fn list_merge_all() {
        let mut lists: Vec<List<i32>> = Vec::new();
        assert_eq!(List::merge_all_by(&mut lists, |a, b| a < b), 0);

        let rng = fastrand::Rng::with_seed(42);
        for k in 1..9 {
            let mut expected = Vec::new();
            let mut lists: Vec<List<i32>> = (0..k)
                .map(|_| {
                    let mut items: Vec<i32> = (0..rng.usize(0..10)).map(|_| rng.i32(0..50)).collect();
                    items.sort();
                    expected.extend(items.iter().copied());
                    List::from_iter(items)
                })
                .collect();
            expected.sort();

            assert_eq!(List::merge_all_by(&mut lists, |a, b| a < b), expected.len());
            assert!(lists.iter().all(List::is_well_formed));
            assert!(lists[1..].iter().all(List::is_empty));
            assert_eq!(Vec::from_iter(lists[0].iter().copied()), expected);
        }
    }
}
