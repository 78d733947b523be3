use crate::list::{next_of, prev_of, List, Node};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A borrowing iterator over the elements of a [`List`], created by
/// [`List::iter`].
///
/// The elements not yet yielded are the nodes `front..=back`. The two ends
/// close in on each other from both sides; once they have met and the last
/// node is yielded, the iterator is `done` and never reads the list again.
pub struct Iter<'a, T> {
    front: NonNull<Node<T>>,
    back: NonNull<Node<T>>,
    done: bool,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Self {
            front: list.front_node(),
            back: list.back_node(),
            done: list.is_empty(),
            _marker: PhantomData,
        }
    }

    /// Take `node` out of the window, which is exhausted if `node` was the
    /// last one in it.
    ///
    /// It is unsafe because `node` must be an element node of the window, so
    /// that the returned reference lives as long as the borrowed list.
    unsafe fn take(&mut self, node: NonNull<Node<T>>) -> &'a T {
        if self.front == self.back {
            self.done = true;
        }
        &(*node.as_ptr()).element
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            done: self.done,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }
        let node = self.front;
        // SAFETY: a window that is not done holds at least `front`, an element
        // node of the borrowed list.
        unsafe {
            let element = self.take(node);
            self.front = next_of(node);
            Some(element)
        }
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }
        let node = self.back;
        // SAFETY: as in `next`, with `back` in place of `front`.
        unsafe {
            let element = self.take(node);
            self.back = prev_of(node);
            Some(element)
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// An owning iterator that pops the elements off a [`List`] from either end.
#[derive(Debug)]
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for item in iter {
            list.push_back(item);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use crate::{List, Queue};
    use std::iter::FromIterator;

    fn strings<'a>(iter: impl Iterator<Item = &'a crate::Element>) -> Vec<&'a str> {
        iter.filter_map(|element| element.as_str()).collect()
    }

    #[test]
    fn iter_meets_in_the_middle() {
        for len in 0..7 {
            let list = List::from_iter(0..len);
            for split in 0..=len {
                let mut iter = list.iter();
                let front: Vec<i32> = Iterator::take(iter.by_ref(), split as usize).copied().collect();
                let back: Vec<i32> = iter.by_ref().rev().copied().collect();
                assert_eq!(front, Vec::from_iter(0..split));
                assert_eq!(back, Vec::from_iter((split..len).rev()));
                assert_eq!(iter.next(), None);
                assert_eq!(iter.next_back(), None);
            }
        }
    }

    #[test]
    fn iter_alternating_ends() {
        let list = List::from_iter(1..=5);
        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);

        assert_eq!(list.iter().last(), Some(&5));
        assert_eq!(List::<i32>::new().iter().next_back(), None);
    }

    #[test]
    fn iter_queue_after_reverse_k() {
        let mut queue = Queue::from_iter(["a", "b", "c", "d", "e", "f", "g"]);
        queue.reverse_k(3);
        assert_eq!(strings(queue.iter()), ["c", "b", "a", "f", "e", "d", "g"]);
        assert_eq!(strings(queue.iter().rev()), ["g", "d", "e", "f", "a", "b", "c"]);

        queue.insert_head("z").unwrap();
        let mut iter = queue.iter();
        assert_eq!(iter.next().unwrap(), "z");
        assert_eq!(iter.next_back().unwrap(), "g");
        assert_eq!(strings(iter), ["c", "b", "a", "f", "e", "d"]);
    }

    #[test]
    fn into_iter_pops_both_ends() {
        let queue = Queue::from_iter(["x", "y", "z"]);
        let mut iter = queue.into_iter();
        assert_eq!(iter.next_back().unwrap(), "z");
        assert_eq!(iter.next().unwrap(), "x");
        assert_eq!(iter.next().unwrap(), "y");
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_debug() {
        let list = List::from_iter([1, 2]);
        let mut iter = list.iter();
        assert_eq!(format!("{:?}", iter), "[1, 2]");
        iter.next();
        assert_eq!(format!("{:?}", iter), "[2]");
        assert_eq!(format!("{:?}", list), "[1, 2]");
    }
}
