//! Counts the allocations made by a `Queue` on the current thread, and
//! injects allocation failures to check that a failed insertion leaves the
//! queue untouched.

use cyclic_queue::{Queue, QueueError};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::iter::FromIterator;
use std::ptr;

struct Counting;

thread_local! {
    static ALLOCS: Cell<usize> = const { Cell::new(0) };
    static FREES: Cell<usize> = const { Cell::new(0) };
    // number of allocations that still succeed before the next one fails
    static FAIL_AFTER: Cell<Option<usize>> = const { Cell::new(None) };
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let fail = FAIL_AFTER
            .try_with(|fail_after| match fail_after.get() {
                Some(0) => true,
                Some(n) => {
                    fail_after.set(Some(n - 1));
                    false
                }
                None => false,
            })
            .unwrap_or(false);
        if fail {
            return ptr::null_mut();
        }
        let _ = ALLOCS.try_with(|n| n.set(n.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = FREES.try_with(|n| n.set(n.get() + 1));
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn counts() -> (usize, usize) {
    (ALLOCS.with(Cell::get), FREES.with(Cell::get))
}

fn with_failure_after<R>(after: usize, f: impl FnOnce() -> R) -> R {
    FAIL_AFTER.with(|fail_after| fail_after.set(Some(after)));
    let result = f();
    FAIL_AFTER.with(|fail_after| fail_after.set(None));
    result
}

fn collect(queue: &Queue) -> Vec<Vec<u8>> {
    queue.iter().map(|e| e.as_bytes().to_vec()).collect()
}

#[test]
fn queue_drop_releases_everything() {
    let (allocs, frees) = counts();
    let mut queue = Queue::new();
    assert_eq!(counts(), (allocs + 1, frees));

    for s in ["gerbil", "", "bear", "dolphin"] {
        queue.insert_tail(s).unwrap();
    }
    assert_eq!(counts(), (allocs + 1 + 2 * 4, frees));

    drop(queue);
    assert_eq!(counts(), (allocs + 9, frees + 9));
}

#[test]
fn queue_remove_hands_over_payload() {
    let mut queue = Queue::new();
    queue.insert_head("a").unwrap();
    queue.insert_head("b").unwrap();

    let (allocs, frees) = counts();
    let mut buf = [0u8; 4];
    let element = queue.remove_head(&mut buf).unwrap();
    // the node is gone, the payload now belongs to the caller
    assert_eq!(counts(), (allocs, frees + 1));
    drop(element);
    assert_eq!(counts(), (allocs, frees + 2));

    queue.delete_mid().unwrap();
    assert_eq!(counts(), (allocs, frees + 4));
    assert!(queue.is_empty());
}

#[test]
fn queue_algorithms_do_not_allocate() {
    let mut queue = Queue::from_iter(["d", "a", "c", "a", "b", "e", "b", "f"]);
    let mut queues = vec![
        Queue::from_iter(["a", "c"]),
        Queue::from_iter(["b"]),
        Queue::from_iter(["a", "d", "e"]),
    ];

    let (allocs, frees) = counts();
    queue.swap();
    queue.reverse();
    queue.reverse_k(3);
    queue.sort();
    queue.sort_descending();
    queue.sort();
    assert_eq!(queue.size(), 8);
    assert_eq!(Queue::merge_all(&mut queues), 6);
    assert_eq!(counts(), (allocs, frees));

    // ["a", "a", "b", "b", "c", "d", "e", "f"] loses both runs
    queue.delete_dup().unwrap();
    assert_eq!(counts(), (allocs, frees + 2 * 4));
    assert_eq!(queue.descend(), 1);
    assert_eq!(counts(), (allocs, frees + 2 * 7));
}

#[test]
fn queue_failed_payload_allocation() {
    let mut queue = Queue::from_iter(["x"]);
    let (allocs, frees) = counts();

    let result = with_failure_after(0, || queue.insert_head("hello"));
    assert_eq!(result, Err(QueueError::AllocationFailure { bytes: Some(6) }));
    assert_eq!(counts(), (allocs, frees));
    assert_eq!(collect(&queue), [b"x".to_vec()]);
}

#[test]
fn queue_failed_node_allocation() {
    let mut queue = Queue::from_iter(["x"]);
    let (allocs, frees) = counts();

    let result = with_failure_after(1, || queue.insert_tail("hello"));
    assert!(matches!(
        result,
        Err(QueueError::AllocationFailure { bytes: Some(_) })
    ));
    // the payload was allocated and released again
    assert_eq!(counts(), (allocs + 1, frees + 1));
    assert_eq!(collect(&queue), [b"x".to_vec()]);
    assert!(queue.as_list().is_well_formed());

    queue.insert_tail("y").unwrap();
    assert_eq!(queue.size(), 2);
    let backwards: Vec<&[u8]> = queue.iter().rev().map(|e| e.as_bytes()).collect();
    assert_eq!(backwards, [&b"y"[..], &b"x"[..]]);
}

#[test]
fn queue_failed_creation() {
    let result = with_failure_after(0, Queue::try_new);
    assert_eq!(
        result.unwrap_err(),
        QueueError::AllocationFailure { bytes: None }
    );
    assert!(Queue::try_new().unwrap().is_empty());
}
