use crate::error::{QueueError, Result};
use crate::list::{merge_all_with, List, Node};
use crate::{IntoIter, Iter};
use log::{debug, trace, warn};
use std::fmt;
use std::iter::FromIterator;
use std::mem::size_of;

mod element;

pub use element::Element;

/// A queue of owned byte strings on top of a [`List`].
///
/// Every element is copied in on insertion and handed back to the caller on
/// removal. Besides the operations at both ends, the queue offers whole-queue
/// algorithms (middle deletion, duplicate-run deletion, pairwise swap, full and
/// grouped reversal, stable sort, monotonic filters and a k-way merge) that
/// relink the existing nodes without copying any payload.
///
/// # Examples
///
/// ```
/// use cyclic_queue::Queue;
///
/// let mut queue = Queue::new();
/// queue.insert_tail("dolphin")?;
/// queue.insert_tail("bear")?;
/// queue.insert_head("gerbil")?;
/// assert_eq!(queue.size(), 3);
///
/// queue.sort();
/// let mut buf = [0; 16];
/// let element = queue.remove_head(&mut buf)?;
/// assert_eq!(element.as_str(), Some("bear"));
/// assert_eq!(&buf[..5], b"bear\0");
/// # Ok::<(), cyclic_queue::QueueError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Queue {
    list: List<Element>,
}

impl Queue {
    /// Creates an empty queue.
    #[inline]
    pub fn new() -> Self {
        Self { list: List::new() }
    }

    /// Creates an empty queue, or reports an allocation failure of the ghost
    /// node instead of aborting.
    pub fn try_new() -> Result<Self> {
        match List::try_new() {
            Some(list) => Ok(Self { list }),
            None => {
                warn!("failed to allocate an empty queue");
                Err(QueueError::AllocationFailure { bytes: None })
            }
        }
    }

    /// Inserts a copy of `s` at the head of the queue.
    ///
    /// The queue is left unchanged if either the payload or the node cannot
    /// be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b")?;
    /// queue.insert_head("a")?;
    /// assert_eq!(format!("{:?}", queue), r#"["a", "b"]"#);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn insert_head(&mut self, s: impl AsRef<[u8]>) -> Result<()> {
        let element = new_element(s.as_ref())?;
        trace!("insert {:?} at head", element);
        self.list.try_push_front(element).map_err(node_failure)
    }

    /// Inserts a copy of `s` at the tail of the queue.
    ///
    /// The queue is left unchanged if either the payload or the node cannot
    /// be allocated.
    pub fn insert_tail(&mut self, s: impl AsRef<[u8]>) -> Result<()> {
        let element = new_element(s.as_ref())?;
        trace!("insert {:?} at tail", element);
        self.list.try_push_back(element).map_err(node_failure)
    }

    /// Removes the head element and copies its payload into `buf`, as
    /// [`Element::copy_to`] does. The removed element is returned to the
    /// caller, who frees it by dropping it.
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove.
    pub fn remove_head(&mut self, buf: &mut [u8]) -> Result<Element> {
        let element = self.pop_head().ok_or(QueueError::Empty)?;
        element.copy_to(buf);
        Ok(element)
    }

    /// Removes the tail element and copies its payload into `buf`, as
    /// [`Element::copy_to`] does.
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove.
    pub fn remove_tail(&mut self, buf: &mut [u8]) -> Result<Element> {
        let element = self.pop_tail().ok_or(QueueError::Empty)?;
        element.copy_to(buf);
        Ok(element)
    }

    /// Removes the head element without copying it out.
    pub fn pop_head(&mut self) -> Option<Element> {
        let element = self.list.pop_front();
        trace!("remove {:?} from head", element);
        element
    }

    /// Removes the tail element without copying it out.
    pub fn pop_tail(&mut self) -> Option<Element> {
        let element = self.list.pop_back();
        trace!("remove {:?} from tail", element);
        element
    }

    /// Counts the elements by walking the whole queue.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn size(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the queue holds no element, without walking it.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Deletes the element at 1-indexed position ⌈*n*/2⌉ of a queue of
    /// length *n*.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
    /// queue.delete_mid()?;
    /// assert_eq!(format!("{:?}", queue), r#"["a", "c", "d"]"#);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn delete_mid(&mut self) -> Result<()> {
        let element = self.list.remove_mid().ok_or(QueueError::Empty)?;
        debug!("deleted middle element {:?}", element);
        Ok(())
    }

    /// Deletes every run of two or more adjacent equal elements, leaving no
    /// copy of a duplicated string behind. Usually called on a sorted queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "a", "b", "c", "c"]);
    /// queue.delete_dup()?;
    /// assert_eq!(format!("{:?}", queue), r#"["b"]"#);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn delete_dup(&mut self) -> Result<()> {
        let removed = self.list.remove_duplicate_runs();
        debug!("deleted {} duplicated elements", removed);
        Ok(())
    }

    /// Swaps every two adjacent elements, from the head.
    pub fn swap(&mut self) {
        self.list.swap_pairs();
    }

    /// Reverses the queue in place.
    pub fn reverse(&mut self) {
        self.list.reverse();
    }

    /// Reverses the elements `k` at a time; see [`List::reverse_k`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.reverse_k(2);
    /// assert_eq!(format!("{:?}", queue), r#"["2", "1", "4", "3", "5"]"#);
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        self.list.reverse_k(k);
    }

    /// Sorts the queue in ascending byte order. The sort is stable.
    pub fn sort(&mut self) {
        self.list.sort();
    }

    /// Sorts the queue in descending byte order. The sort is stable.
    pub fn sort_descending(&mut self) {
        self.list.sort_by(|a, b| b.cmp(a));
    }

    /// Deletes every element that has a strictly greater element anywhere
    /// after it, and returns the number of elements left. The remaining
    /// elements are in non-increasing order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["5", "2", "9", "3", "8"]);
    /// assert_eq!(queue.descend(), 2);
    /// assert_eq!(format!("{:?}", queue), r#"["9", "8"]"#);
    /// ```
    pub fn descend(&mut self) -> usize {
        let kept = self.list.remove_dominated_by(|element, later| element < later);
        debug!("descend kept {} elements", kept);
        kept
    }

    /// Deletes every element that has a strictly smaller element anywhere
    /// after it, and returns the number of elements left. The remaining
    /// elements are in non-decreasing order.
    pub fn ascend(&mut self) -> usize {
        let kept = self.list.remove_dominated_by(|element, later| element > later);
        debug!("ascend kept {} elements", kept);
        kept
    }

    /// Merges the ascending sorted `queues` into `queues[0]` and returns its
    /// size. The other queues are left empty. Returns 0 if `queues` is empty.
    ///
    /// On equal strings, the ones from lower-indexed queues come first.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queues = vec![
    ///     Queue::from_iter(["b", "d"]),
    ///     Queue::from_iter(["a", "e"]),
    ///     Queue::from_iter(["c"]),
    /// ];
    /// assert_eq!(Queue::merge_all(&mut queues), 5);
    /// assert_eq!(format!("{:?}", queues[0]), r#"["a", "b", "c", "d", "e"]"#);
    /// assert!(queues[1].is_empty() && queues[2].is_empty());
    /// ```
    pub fn merge_all(queues: &mut [Queue]) -> usize {
        let merged = merge_all_with(queues, |queue| &mut queue.list, |a, b| a < b);
        debug!("merged {} queues into {} elements", queues.len(), merged);
        merged
    }

    /// The head element, or `None` if the queue is empty.
    pub fn front(&self) -> Option<&Element> {
        self.list.front()
    }

    /// The tail element, or `None` if the queue is empty.
    pub fn back(&self) -> Option<&Element> {
        self.list.back()
    }

    /// Provides a forward iterator over the elements, head first.
    pub fn iter(&self) -> Iter<'_, Element> {
        self.list.iter()
    }

    /// Borrows the underlying list.
    pub fn as_list(&self) -> &List<Element> {
        &self.list
    }
}

fn new_element(s: &[u8]) -> Result<Element> {
    Element::try_new(s).map_err(|err| {
        warn!("failed to allocate a payload of {} bytes", s.len() + 1);
        err
    })
}

fn node_failure(element: Element) -> QueueError {
    let bytes = size_of::<Node<Element>>();
    warn!("failed to allocate a node of {} bytes for {:?}", bytes, element);
    QueueError::alloc(bytes)
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.list, f)
    }
}

impl<S: AsRef<[u8]>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            list: iter
                .into_iter()
                .map(|s| Element::new(s.as_ref()))
                .collect(),
        }
    }
}

impl IntoIterator for Queue {
    type Item = Element;
    type IntoIter = IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a Element;
    type IntoIter = Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
