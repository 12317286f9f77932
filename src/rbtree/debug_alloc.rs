//! Test-only bookkeeping of live nodes, so tests can assert that every node
//! allocated on the current thread was freed exactly once.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static LIVE: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

pub fn mark_pointer_allocated<T>(ptr: *const T) {
    LIVE.with(|live| {
        let fresh = live.borrow_mut().insert(ptr as usize);
        assert!(fresh, "pointer {:p} allocated twice", ptr);
    });
}

pub fn mark_pointer_deleted<T>(ptr: *const T) {
    LIVE.with(|live| {
        let known = live.borrow_mut().remove(&(ptr as usize));
        assert!(known, "pointer {:p} freed but never allocated", ptr);
    });
}

pub fn is_live<T>(ptr: *const T) -> bool {
    LIVE.with(|live| live.borrow().contains(&(ptr as usize)))
}

pub fn count_allocated_pointers() -> usize {
    LIVE.with(|live| live.borrow().len())
}
