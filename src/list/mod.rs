use std::alloc::{alloc, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::{IntoIter, Iter};

pub mod iterator;

mod algorithms;

pub(crate) use algorithms::merge_all_with;

/// The `List` is a doubly-linked list with owned nodes, implemented as a cyclic list
/// closed by a ghost node.
///
/// Inserting and removing at either end take constant time. The length is not
/// stored: [`List::len`] walks the ring.
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `start..end`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node);
/// - a *chain* is a run of nodes threaded only through `next` and terminated by
///   the ghost node, used while sorting and merging.
pub struct List<T> {
    ghost: NonNull<Node<Erased>>,
    _marker: PhantomData<Box<Node<T>>>,
}

/// A link pair plus its payload. The ghost node shares the layout of the link
/// pair but carries no payload, hence `repr(C)`.
///
/// A `NonNull<Node<T>>` may point at the ghost node, whose allocation is only
/// as large as the link pair. Links are therefore read and written with
/// [`next_of`], [`prev_of`], [`set_next`] and [`set_prev`], and a whole
/// `&Node<T>` is only formed for nodes known to carry an element.
#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    pub(crate) element: T,
}

struct Erased;

/// Nodes fragment detached from a list, used in appending and merging.
///
/// When detached from a list, reading of `front.prev` and `back.next`
/// is invalid.
pub(crate) struct DetachedNodes<T> {
    pub(crate) front: NonNull<Node<T>>,
    pub(crate) back: NonNull<Node<T>>,
    _marker: PhantomData<Box<Node<T>>>,
}

// private methods
impl<T> List<T> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost.cast()
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { next_of(self.ghost_node()) }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { prev_of(self.ghost_node()) }
    }

    /// Detach a single node `node` from the list, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the list,
    /// or whether it is the ghost node.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node<T>>) -> Box<Node<T>> {
        connect(prev_of(node), next_of(node));
        Box::from_raw(node.as_ptr())
    }

    /// Attach a single detached node `node` to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the list, or whether they are adjacent (only in `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        node: NonNull<Node<T>>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
    }

    /// Detach a range of nodes `front..=back` from the list.
    ///
    /// It is unsafe because it does not check whether `front..=back` is a valid,
    /// non-empty range of this list.
    pub(crate) unsafe fn detach_nodes(
        &mut self,
        front: NonNull<Node<T>>,
        back: NonNull<Node<T>>,
    ) -> DetachedNodes<T> {
        connect(prev_of(front), next_of(back));
        DetachedNodes::new(front, back)
    }

    /// Attach a range of detached nodes to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the list, or whether they are adjacent (only in `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_nodes(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        detached: DetachedNodes<T>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, detached.front);
        connect(detached.back, next);
    }

    /// Detach all nodes from the list, or return `None` if the list is empty.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes<T>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: `front_node()..=back_node()` is a valid range of a non-empty list.
        unsafe { Some(self.detach_nodes(self.front_node(), self.back_node())) }
    }
}

impl<T> List<T> {
    /// Create an empty `List`
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::List;
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            ghost: new_ghost(),
            _marker: PhantomData,
        }
    }

    /// Create an empty `List`, or return `None` if the ghost node cannot be
    /// allocated.
    pub fn try_new() -> Option<Self> {
        Some(Self {
            ghost: try_new_ghost()?,
            _marker: PhantomData,
        })
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the length of the `List` by walking the ring.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    /// list.push_front(2);
    /// list.push_front(1);
    /// list.push_back(3);
    /// assert_eq!(list.len(), 3);
    /// ```
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Removes all elements from the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    #[inline]
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the front node of a non-empty list is not the ghost node.
        Some(unsafe { &(*self.front_node().as_ptr()).element })
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the back node of a non-empty list is not the ghost node.
        Some(unsafe { &(*self.back_node().as_ptr()).element })
    }

    /// Adds an element first in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.front(), Some(&2));
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    pub fn push_front(&mut self, elt: T) {
        let node = Node::new_detached(elt);
        // SAFETY: the ghost node and the front node are adjacent nodes of this list.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) }
    }

    /// Appends an element to the back of a list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_back(&mut self, elt: T) {
        let node = Node::new_detached(elt);
        // SAFETY: the back node and the ghost node are adjacent nodes of this list.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) }
    }

    /// Like [`List::push_front`], but hands `elt` back instead of aborting when
    /// the node cannot be allocated. The list is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.try_push_front("b").is_ok());
    /// assert!(list.try_push_front("a").is_ok());
    /// assert_eq!(list.front(), Some(&"a"));
    /// ```
    pub fn try_push_front(&mut self, elt: T) -> Result<(), T> {
        let node = Node::try_new_detached(elt)?;
        // SAFETY: the ghost node and the front node are adjacent nodes of this list.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) };
        Ok(())
    }

    /// Like [`List::push_back`], but hands `elt` back instead of aborting when
    /// the node cannot be allocated. The list is unchanged on failure.
    pub fn try_push_back(&mut self, elt: T) -> Result<(), T> {
        let node = Node::try_new_detached(elt)?;
        // SAFETY: the back node and the ghost node are adjacent nodes of this list.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) };
        Ok(())
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1);
    /// list.push_front(3);
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the front node of a non-empty list is a non-ghost node of this list.
        Some(unsafe { self.detach_node(self.front_node()) }.into_element())
    }

    /// Removes the last element from a list and returns it, or `None` if
    /// it is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the back node of a non-empty list is a non-ghost node of this list.
        Some(unsafe { self.detach_node(self.back_node()) }.into_element())
    }

    /// Provides a forward iterator.
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
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list1 = List::new();
    /// list1.push_back('a');
    ///
    /// let mut list2 = List::new();
    /// list2.push_back('b');
    /// list2.push_back('c');
    ///
    /// list1.append(&mut list2);
    ///
    /// let mut iter = list1.iter();
    /// assert_eq!(iter.next(), Some(&'a'));
    /// assert_eq!(iter.next(), Some(&'b'));
    /// assert_eq!(iter.next(), Some(&'c'));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list2.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // `self.back_node()` and `self.ghost_node()` are valid
            // nodes in the list and they are adjacent, so it is safe.
            unsafe { self.attach_nodes(self.back_node(), self.ghost_node(), detached) }
        }
    }

    /// Walks the ring once and checks that `a.next.prev == a` holds for every
    /// node, the ghost node included.
    pub fn is_well_formed(&self) -> bool {
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: every node reachable from the ghost node belongs to the list.
            let next = unsafe { next_of(node) };
            if unsafe { prev_of(next) } != node {
                return false;
            }
            node = next;
            if node == ghost {
                return true;
            }
        }
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    /// Create a detached node with given element.
    pub(crate) fn new_detached(element: T) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            element,
        })))
    }

    /// Create a detached node with given element, or hand the element back if
    /// the allocation fails.
    ///
    /// The node is released through `Box::from_raw`, which is sound because it
    /// is allocated by the global allocator with the layout of `Node<T>`.
    pub(crate) fn try_new_detached(element: T) -> Result<NonNull<Node<T>>, T> {
        let layout = Layout::new::<Node<T>>();
        // SAFETY: `Node<T>` holds two pointers, so `layout` is never zero-sized.
        let ptr = unsafe { alloc(layout) } as *mut Node<T>;
        match NonNull::new(ptr) {
            Some(node) => {
                // SAFETY: `node` is freshly allocated for a `Node<T>` and uninitialized.
                unsafe {
                    node.as_ptr().write(Node {
                        next: NonNull::dangling(),
                        prev: NonNull::dangling(),
                        element,
                    })
                };
                Ok(node)
            }
            None => Err(element),
        }
    }

    pub(crate) fn into_element(self: Box<Self>) -> T {
        self.element
    }
}

impl<T> DetachedNodes<T> {
    /// It is unsafe because it must be guaranteed that `front..=back` is
    /// a valid, non-empty range.
    pub(crate) unsafe fn new(front: NonNull<Node<T>>, back: NonNull<Node<T>>) -> Self {
        Self {
            front,
            back,
            _marker: PhantomData,
        }
    }
}

/// Link `prev` and `next` to each other.
///
/// It is unsafe because both nodes must be alive, and whatever `prev.next` and
/// `next.prev` pointed to before is forgotten.
pub(crate) unsafe fn connect<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    set_next(prev, next);
    set_prev(next, prev);
}

#[inline]
pub(crate) unsafe fn next_of<T>(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    ptr::addr_of!((*node.as_ptr()).next).read()
}

#[inline]
pub(crate) unsafe fn prev_of<T>(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    ptr::addr_of!((*node.as_ptr()).prev).read()
}

#[inline]
pub(crate) unsafe fn set_next<T>(node: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    ptr::addr_of_mut!((*node.as_ptr()).next).write(next);
}

#[inline]
pub(crate) unsafe fn set_prev<T>(node: NonNull<Node<T>>, prev: NonNull<Node<T>>) {
    ptr::addr_of_mut!((*node.as_ptr()).prev).write(prev);
}

/// Unlink `node` and relink it right after `anchor`.
///
/// `anchor.next` is read after the unlink, so moving the node that already
/// follows `anchor` leaves the ring unchanged. `node` must not be `anchor`.
pub(crate) unsafe fn move_after<T>(node: NonNull<Node<T>>, anchor: NonNull<Node<T>>) {
    connect(prev_of(node), next_of(node));
    let next = next_of(anchor);
    connect(anchor, node);
    connect(node, next);
}

fn new_ghost() -> NonNull<Node<Erased>> {
    close_ghost(Node::new_detached(Erased))
}

fn try_new_ghost() -> Option<NonNull<Node<Erased>>> {
    Node::try_new_detached(Erased).ok().map(close_ghost)
}

/// Point both links of a fresh ghost node at itself.
fn close_ghost(ghost: NonNull<Node<Erased>>) -> NonNull<Node<Erased>> {
    // SAFETY: `ghost` is freshly allocated and owned by nobody else yet.
    unsafe { connect(ghost, ghost) };
    ghost
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    unsafe {
        assert_eq!(next_of(prev), next);
        assert_eq!(prev_of(next), prev);
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was allocated as a `Node<Erased>` and no
        // other node links to it once the list is empty.
        drop(unsafe { Box::from_raw(self.ghost.as_ptr()) });
    }
}

unsafe impl<T: Send> Send for List<T> {}

unsafe impl<T: Sync> Sync for List<T> {}

// Ensure that `List` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::list::List;
    use std::cell::RefCell;
    use std::iter::FromIterator;

    #[test]
    fn list_create() {
        let mut list = List::<i32>::new();
        assert!(list.is_empty());
        assert!(list.is_well_formed());
        list.push_back(1);
        assert!(!list.is_empty());
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.is_empty());

        let list = List::<i32>::try_new().expect("ghost allocation");
        assert!(list.is_empty());
        assert!(list.is_well_formed());
    }

    #[test]
    fn list_drop() {
        #[derive(Debug)]
        struct DropChecker<'a> {
            value: i32,
            dropped: &'a RefCell<Vec<i32>>,
        }
        impl Drop for DropChecker<'_> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::new());
        let mut list = List::new();
        for value in 1..=3 {
            list.push_back(DropChecker {
                value,
                dropped: &dropped,
            });
        }
        assert!(list
            .try_push_front(DropChecker {
                value: 0,
                dropped: &dropped,
            })
            .is_ok());
        drop(list.pop_back());
        assert_eq!(dropped.borrow().as_slice(), &[3]);
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[3, 0, 1, 2]);
    }

    #[test]
    fn list_push_and_pop() {
        let mut list = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);

        list.push_back(1);
        assert_eq!(list.back(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());

        list.push_front(1);
        list.push_front(2);
        list.push_back(3);
        assert_eq!(list.len(), 3);
        assert!(list.is_well_formed());
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.front(), Some(&2));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_back(), Some(3));

        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_empty());
        assert!(list.is_well_formed());
    }

    #[test]
    fn list_try_push() {
        let mut list = List::new();
        assert_eq!(list.try_push_back(2), Ok(()));
        assert_eq!(list.try_push_front(1), Ok(()));
        assert_eq!(list.try_push_back(3), Ok(()));
        assert!(list.is_well_formed());
        assert_eq!(Vec::from_iter(list), vec![1, 2, 3]);
    }

    #[test]
    fn list_append() {
        fn test_append(list: &[i32], other: &[i32]) {
            let mut left = List::from_iter(list.iter().copied());
            let mut right = List::from_iter(other.iter().copied());
            left.append(&mut right);
            assert!(right.is_empty());
            assert!(right.is_well_formed());
            assert!(left.is_well_formed());
            let expected: Vec<i32> = list.iter().chain(other).copied().collect();
            assert_eq!(Vec::from_iter(left), expected);
        }
        test_append(&[0, 1, 2], &[3, 4]);
        test_append(&[0, 1, 2], &[]);
        test_append(&[], &[3, 4]);
        test_append(&[], &[]);
        test_append(&[0], &[1]);
    }

    #[test]
    fn list_clear() {
        let mut list = List::from_iter(0..5);
        assert_eq!(list.len(), 5);
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.is_well_formed());
        list.push_back(7);
        assert_eq!(list.front(), Some(&7));
    }
}
