use crate::error::{QueueError, Result};
use std::cmp::Ordering;
use std::fmt;

/// An owned string payload of a [`Queue`](crate::Queue).
///
/// The bytes are stored with a trailing NUL terminator, so a string of
/// length *n* occupies a buffer of *n* + 1 bytes. Interior NUL bytes are kept
/// as they are. Elements compare by their bytes, without the terminator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Element {
    value: Vec<u8>,
}

impl Element {
    /// Copy `s` into a new buffer of `s.len() + 1` bytes, or report the
    /// failed request size.
    pub(crate) fn try_new(s: &[u8]) -> Result<Self> {
        let bytes = s.len() + 1;
        let mut value = Vec::new();
        value
            .try_reserve_exact(bytes)
            .map_err(|_| QueueError::alloc(bytes))?;
        value.extend_from_slice(s);
        value.push(0);
        Ok(Self { value })
    }

    pub(crate) fn new(s: &[u8]) -> Self {
        let mut value = Vec::with_capacity(s.len() + 1);
        value.extend_from_slice(s);
        value.push(0);
        Self { value }
    }

    /// The payload bytes, without the terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("cat").unwrap();
    /// assert_eq!(queue.front().unwrap().as_bytes(), b"cat");
    /// ```
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.value[..self.len()]
    }

    /// The payload bytes, followed by the NUL terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.value
    }

    /// The payload as a `str`, or `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Length of the payload in bytes, without the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies at most `buf.len() - 1` payload bytes into `buf`, then fills
    /// the rest of `buf` with NUL bytes. Returns the number of payload bytes
    /// copied. Nothing is written if `buf` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("gerbil").unwrap();
    /// let element = queue.pop_head().unwrap();
    ///
    /// let mut buf = [0xff; 4];
    /// assert_eq!(element.copy_to(&mut buf), 3);
    /// assert_eq!(&buf, b"ger\0");
    ///
    /// let mut buf = [0xff; 8];
    /// assert_eq!(element.copy_to(&mut buf), 6);
    /// assert_eq!(&buf, b"gerbil\0\0");
    /// ```
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let room = match buf.len().checked_sub(1) {
            Some(room) => room,
            None => return 0,
        };
        let bytes = self.as_bytes();
        let copied = bytes.len().min(room);
        buf[..copied].copy_from_slice(&bytes[..copied]);
        buf[copied..].fill(0);
        copied
    }

    /// Consumes the element and returns its payload, without the terminator.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.value.pop();
        self.value
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialEq<[u8]> for Element {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<str> for Element {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Element {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl AsRef<[u8]> for Element {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
    }
}
