//! A red-black tree whose nodes are linked with raw pointers.
//!
//! Every node knows its parent, so in-order navigation walks the links
//! directly instead of keeping a stack, and the rebalancing code climbs from
//! the modified position toward the root without recursion. A null pointer
//! stands for an absent child (or, at the root, an absent parent).
//!
//! The tree owns every node reachable from `root`. Parent pointers are
//! back-references only; they are never followed to free anything.

use std::cmp::Ordering::{self, Equal, Greater, Less};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::compare::{Compare, Natural};
use crate::error::Violation;

#[cfg(test)]
pub(crate) mod debug_alloc;

pub mod entry;
pub mod iterator;

pub use iterator::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// The colour of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

// 1. The root is black.
// 2. Children of a red node are black.
// 3. Every path from a node down to an absent child goes through the same
//    number of black nodes.
// 4. `left.parent` and `right.parent` point back at the node.
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    parent: *mut Node<K, V>,
    left: *mut Node<K, V>,
    right: *mut Node<K, V>,
    color: Color,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Where a key is, or where it would be attached.
pub(crate) enum Probe<K, V> {
    Found(*mut Node<K, V>),
    /// A null parent means the tree is empty.
    Vacant(*mut Node<K, V>, Side),
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> *mut Self {
        let node = Box::into_raw(Box::new(Self {
            key,
            value,
            parent: Node::null(),
            left: Node::null(),
            right: Node::null(),
            color: Color::Red,
        }));

        #[cfg(test)]
        debug_alloc::mark_pointer_allocated(node);

        node
    }

    fn null() -> *mut Self {
        ptr::null_mut()
    }

    /// Frees a node that is no longer linked into any tree.
    unsafe fn free(n: *mut Self) -> (K, V) {
        debug_assert!(!n.is_null());

        #[cfg(test)]
        debug_alloc::mark_pointer_deleted(n);

        let node = Box::from_raw(n);
        (node.key, node.value)
    }

    unsafe fn delete(n: *mut Self) {
        if n.is_null() {
            return;
        }
        Self::delete((*n).left);
        Self::delete((*n).right);
        Self::free(n);
    }

    unsafe fn min(mut n: *mut Self) -> *mut Self {
        debug_assert!(!n.is_null());
        while !(*n).left.is_null() {
            n = (*n).left;
        }
        n
    }

    unsafe fn max(mut n: *mut Self) -> *mut Self {
        debug_assert!(!n.is_null());
        while !(*n).right.is_null() {
            n = (*n).right;
        }
        n
    }

    /// The in-order successor of `n`, or null if `n` holds the largest key.
    unsafe fn next(mut n: *mut Self) -> *mut Self {
        if !(*n).right.is_null() {
            return Self::min((*n).right);
        }
        loop {
            let parent = (*n).parent;
            if parent.is_null() || (*parent).left == n {
                return parent;
            }
            n = parent;
        }
    }

    /// The in-order predecessor of `n`, or null if `n` holds the smallest key.
    unsafe fn prev(mut n: *mut Self) -> *mut Self {
        if !(*n).left.is_null() {
            return Self::max((*n).left);
        }
        loop {
            let parent = (*n).parent;
            if parent.is_null() || (*parent).right == n {
                return parent;
            }
            n = parent;
        }
    }
}

/// An ordered map stored as a red-black tree of individually allocated nodes.
///
/// Keys are ordered by the comparator `C`, which defaults to the keys' own
/// [`Ord`] implementation. See [`crate::OrderedMap`] for the convenience
/// methods built on top of the operations defined here.
pub struct RbTree<K, V, C = Natural> {
    root: *mut Node<K, V>,
    len: usize,
    compare: C,
    marker: PhantomData<Box<Node<K, V>>>,
}

// The tree uniquely owns its nodes, the raw pointers never escape a borrow of
// the tree.
unsafe impl<K: Send, V: Send, C: Send> Send for RbTree<K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for RbTree<K, V, C> {}

impl<K, V, C> Drop for RbTree<K, V, C> {
    fn drop(&mut self) {
        unsafe {
            Node::delete(self.root);
        }
    }
}

impl<K, V, C: Default> Default for RbTree<K, V, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C> RbTree<K, V, C> {
    #[inline]
    pub fn new(compare: C) -> Self {
        Self {
            root: Node::null(),
            len: 0,
            compare,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        let root = mem::replace(&mut self.root, Node::null());
        let dropped = mem::replace(&mut self.len, 0);
        unsafe {
            Node::delete(root);
        }
        debug!("cleared {} entries", dropped);
    }

    /// The root node, mostly useful to inspect the shape of the tree.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        unsafe { NodeRef::new(self.root) }
    }

    /// The node holding the smallest key.
    #[inline]
    pub fn first_node(&self) -> Option<NodeRef<'_, K, V>> {
        if self.root.is_null() {
            return None;
        }
        unsafe { NodeRef::new(Node::min(self.root)) }
    }

    /// The node holding the largest key.
    #[inline]
    pub fn last_node(&self) -> Option<NodeRef<'_, K, V>> {
        if self.root.is_null() {
            return None;
        }
        unsafe { NodeRef::new(Node::max(self.root)) }
    }

    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|n| (n.key(), n.value()))
    }

    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|n| (n.key(), n.value()))
    }

    /// An iterator over the entries in ascending key order; call `.rev()` to
    /// walk them in descending order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Like [`RbTree::iter`] but hands out mutable references to the values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// Returns the `i`-th entry counting up from the smallest key.
    ///
    /// This walks `i` successor links, it is linear in `i`.
    #[inline]
    pub fn nth_from_min(&self, i: usize) -> Option<(&K, &V)> {
        self.iter().nth(i)
    }

    /// Returns the `i`-th entry counting down from the largest key.
    #[inline]
    pub fn nth_from_max(&self, i: usize) -> Option<(&K, &V)> {
        self.iter().rev().nth(i)
    }

    /// The number of nodes on the longest path from the root to a leaf.
    ///
    /// This visits every node, it is meant for diagnostics.
    pub fn height(&self) -> usize {
        if self.root.is_null() {
            return 0;
        }

        unsafe {
            let mut node = self.root;
            let mut depth = 1;
            let mut max = 1;
            loop {
                if !(*node).left.is_null() {
                    node = (*node).left;
                    depth += 1;
                    continue;
                }
                if !(*node).right.is_null() {
                    node = (*node).right;
                    depth += 1;
                    continue;
                }

                max = max.max(depth);

                // Climb until we leave a left subtree whose parent still has
                // an unvisited right subtree.
                loop {
                    let parent = (*node).parent;
                    if parent.is_null() {
                        return max;
                    }
                    depth -= 1;
                    if (*parent).left == node && !(*parent).right.is_null() {
                        node = (*parent).right;
                        depth += 1;
                        break;
                    }
                    node = parent;
                }
            }
        }
    }

    /// Renders the tree one node per line, children indented below their
    /// parent. With `verbose` each line also carries the value and the
    /// parent's key.
    pub fn render(&self, verbose: bool) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        format!(
            "{:?}",
            DebugView {
                root: self.root,
                verbose
            }
        )
    }

    /// Links a detached node under `parent` and restores the colour
    /// invariants. A null `parent` makes the node the root of an empty tree.
    unsafe fn attach(&mut self, node: *mut Node<K, V>, parent: *mut Node<K, V>, side: Side) {
        (*node).parent = parent;
        (*node).left = Node::null();
        (*node).right = Node::null();
        self.len += 1;

        if parent.is_null() {
            debug_assert!(self.root.is_null());
            (*node).color = Color::Black;
            self.root = node;
            return;
        }

        (*node).color = Color::Red;
        match side {
            Side::Left => (*parent).left = node,
            Side::Right => (*parent).right = node,
        }
        self.insert_fixup(node);
    }

    unsafe fn insert_fixup(&mut self, mut node: *mut Node<K, V>) {
        loop {
            let parent = (*node).parent;
            if !is_red(parent) {
                return;
            }

            // A red parent is never the root, so the grandparent exists.
            let grand = (*parent).parent;
            let parent_is_left = (*grand).left == parent;
            let uncle = if parent_is_left {
                (*grand).right
            } else {
                (*grand).left
            };

            if is_red(uncle) {
                (*parent).color = Color::Black;
                (*uncle).color = Color::Black;
                if (*grand).parent.is_null() {
                    return;
                }
                (*grand).color = Color::Red;
                node = grand;
                continue;
            }

            let node_is_left = (*parent).left == node;
            let top = match (parent_is_left, node_is_left) {
                (true, true) => {
                    self.rotate_right(grand);
                    parent
                }
                (false, false) => {
                    self.rotate_left(grand);
                    parent
                }
                (true, false) => {
                    self.rotate_left(parent);
                    self.rotate_right(grand);
                    node
                }
                (false, true) => {
                    self.rotate_right(parent);
                    self.rotate_left(grand);
                    node
                }
            };
            (*top).color = Color::Black;
            (*grand).color = Color::Red;
            return;
        }
    }

    /// Unlinks `node` from the tree, rebalances, and frees it.
    unsafe fn remove_node(&mut self, node: *mut Node<K, V>) -> (K, V) {
        let removed_color;
        let work;
        let work_parent;

        if (*node).left.is_null() {
            removed_color = (*node).color;
            work = (*node).right;
            work_parent = (*node).parent;
            self.replace_child((*node).parent, node, work);
        } else if (*node).right.is_null() {
            removed_color = (*node).color;
            work = (*node).left;
            work_parent = (*node).parent;
            self.replace_child((*node).parent, node, work);
        } else {
            // The successor takes over the node's position and colour, so
            // the colour that disappears from the tree is the successor's.
            let next = Node::min((*node).right);
            removed_color = (*next).color;
            work = (*next).right;
            if (*next).parent == node {
                work_parent = next;
            } else {
                work_parent = (*next).parent;
                self.replace_child((*next).parent, next, work);
                (*next).right = (*node).right;
                (*(*next).right).parent = next;
            }
            self.replace_child((*node).parent, node, next);
            (*next).left = (*node).left;
            (*(*next).left).parent = next;
            (*next).color = (*node).color;
        }

        self.len -= 1;
        if removed_color == Color::Black {
            self.remove_fixup(work, work_parent);
        }

        Node::free(node)
    }

    /// Resolves the missing black on the path through `work`. The parent is
    /// passed separately because `work` may be an absent child.
    unsafe fn remove_fixup(&mut self, mut work: *mut Node<K, V>, mut parent: *mut Node<K, V>) {
        while work != self.root && !is_red(work) {
            if work == (*parent).left {
                let mut sibling = (*parent).right;
                if is_red(sibling) {
                    (*sibling).color = Color::Black;
                    (*parent).color = Color::Red;
                    self.rotate_left(parent);
                    sibling = (*parent).right;
                }
                if !is_red((*sibling).left) && !is_red((*sibling).right) {
                    (*sibling).color = Color::Red;
                    work = parent;
                    parent = (*work).parent;
                } else {
                    if !is_red((*sibling).right) {
                        (*(*sibling).left).color = Color::Black;
                        (*sibling).color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = (*parent).right;
                    }
                    (*sibling).color = (*parent).color;
                    (*parent).color = Color::Black;
                    (*(*sibling).right).color = Color::Black;
                    self.rotate_left(parent);
                    work = self.root;
                }
            } else {
                let mut sibling = (*parent).left;
                if is_red(sibling) {
                    (*sibling).color = Color::Black;
                    (*parent).color = Color::Red;
                    self.rotate_right(parent);
                    sibling = (*parent).left;
                }
                if !is_red((*sibling).right) && !is_red((*sibling).left) {
                    (*sibling).color = Color::Red;
                    work = parent;
                    parent = (*work).parent;
                } else {
                    if !is_red((*sibling).left) {
                        (*(*sibling).right).color = Color::Black;
                        (*sibling).color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = (*parent).left;
                    }
                    (*sibling).color = (*parent).color;
                    (*parent).color = Color::Black;
                    (*(*sibling).left).color = Color::Black;
                    self.rotate_right(parent);
                    work = self.root;
                }
            }
        }

        if !work.is_null() {
            (*work).color = Color::Black;
        }
    }

    /// Puts `new` (possibly null) where `old` hangs under `parent`.
    unsafe fn replace_child(
        &mut self,
        parent: *mut Node<K, V>,
        old: *mut Node<K, V>,
        new: *mut Node<K, V>,
    ) {
        if !new.is_null() {
            (*new).parent = parent;
        }
        if parent.is_null() {
            self.root = new;
        } else if (*parent).left == old {
            (*parent).left = new;
        } else {
            (*parent).right = new;
        }
    }

    /// Moves `h` down to the left; its right child takes its place.
    unsafe fn rotate_left(&mut self, h: *mut Node<K, V>) {
        debug_assert!(!h.is_null());
        let x = (*h).right;
        debug_assert!(!x.is_null());

        (*h).right = (*x).left;
        if !(*x).left.is_null() {
            (*(*x).left).parent = h;
        }
        self.replace_child((*h).parent, h, x);
        (*x).left = h;
        (*h).parent = x;
    }

    /// Moves `h` down to the right; its left child takes its place.
    unsafe fn rotate_right(&mut self, h: *mut Node<K, V>) {
        debug_assert!(!h.is_null());
        let x = (*h).left;
        debug_assert!(!x.is_null());

        (*h).left = (*x).right;
        if !(*x).right.is_null() {
            (*(*x).right).parent = h;
        }
        self.replace_child((*h).parent, h, x);
        (*x).right = h;
        (*h).parent = x;
    }
}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    #[inline]
    pub(crate) fn probe(&self, key: &K) -> Probe<K, V> {
        let mut parent = Node::null();
        let mut side = Side::Left;
        let mut node = self.root;
        unsafe {
            while !node.is_null() {
                match self.compare.compare(key, &(*node).key) {
                    Equal => return Probe::Found(node),
                    Less => {
                        parent = node;
                        side = Side::Left;
                        node = (*node).left;
                    }
                    Greater => {
                        parent = node;
                        side = Side::Right;
                        node = (*node).right;
                    }
                }
            }
        }
        Probe::Vacant(parent, side)
    }

    #[inline]
    fn find(&self, key: &K) -> *mut Node<K, V> {
        match self.probe(key) {
            Probe::Found(node) => node,
            Probe::Vacant(..) => Node::null(),
        }
    }

    /// Gets the given key's entry for in-place manipulation.
    pub fn entry(&mut self, key: K) -> entry::Entry<'_, K, V, C> {
        match self.probe(&key) {
            Probe::Found(node) => entry::Entry::Occupied(entry::OccupiedEntry { map: self, node }),
            Probe::Vacant(parent, side) => entry::Entry::Vacant(entry::VacantEntry {
                map: self,
                key,
                parent,
                side,
            }),
        }
    }

    /// The node holding `key`, if any.
    #[inline]
    pub fn node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        unsafe { NodeRef::new(self.find(key)) }
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        !self.find(key).is_null()
    }

    #[inline]
    pub fn try_get(&self, key: &K) -> Option<&V> {
        let node = self.find(key);
        if node.is_null() {
            None
        } else {
            unsafe { Some(&(*node).value) }
        }
    }

    #[inline]
    pub fn try_get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.find(key);
        if node.is_null() {
            None
        } else {
            unsafe { Some(&mut (*node).value) }
        }
    }

    /// Looks a value up with a closure giving the ordering of the wanted key
    /// relative to the key of the node being visited.
    #[inline]
    pub fn get_with(&self, cmp: impl Fn(&K) -> Ordering) -> Option<&V> {
        unsafe {
            let mut root = self.root;
            while !root.is_null() {
                match cmp(&(*root).key) {
                    Equal => return Some(&(*root).value),
                    Less => root = (*root).left,
                    Greater => root = (*root).right,
                }
            }
            None
        }
    }

    /// Inserts the entry unless the key is already present; returns whether
    /// it was inserted.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        match self.probe(&key) {
            Probe::Found(_) => {
                trace!("rejected insert of an existing key");
                false
            }
            Probe::Vacant(parent, side) => {
                unsafe {
                    self.attach(Node::new(key, value), parent, side);
                }
                self.check();
                true
            }
        }
    }

    /// Inserts or overwrites the entry, returning the value it replaced.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(node) => unsafe { Some(mem::replace(&mut (*node).value, value)) },
            Probe::Vacant(parent, side) => {
                unsafe {
                    self.attach(Node::new(key, value), parent, side);
                }
                self.check();
                None
            }
        }
    }

    /// Inserts `insert(&key)` when the key is absent, otherwise runs `update`
    /// on the stored value. Returns `true` when a new entry was created.
    pub fn add_or_update<I, U>(&mut self, key: K, insert: I, update: U) -> bool
    where
        I: FnOnce(&K) -> V,
        U: FnOnce(&mut V),
    {
        match self.entry(key) {
            entry::Entry::Occupied(mut entry) => {
                update(entry.get_mut());
                false
            }
            entry::Entry::Vacant(entry) => {
                let value = insert(entry.key());
                entry.insert(value);
                true
            }
        }
    }

    /// Returns the value stored under `key`, inserting `f(&key)` first if the
    /// key is absent.
    #[inline]
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        self.entry(key).or_insert_with_key(f)
    }

    /// Removes the entry stored under `key`.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.find(key);
        if node.is_null() {
            return None;
        }
        let entry = unsafe { self.remove_node(node) };
        self.check();
        Some(entry)
    }

    /// Removes the entry with the smallest key.
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        if self.root.is_null() {
            return None;
        }
        let entry = unsafe { self.remove_node(Node::min(self.root)) };
        self.check();
        Some(entry)
    }

    /// Removes the entry with the largest key.
    pub fn pop_max(&mut self) -> Option<(K, V)> {
        if self.root.is_null() {
            return None;
        }
        let entry = unsafe { self.remove_node(Node::max(self.root)) };
        self.check();
        Some(entry)
    }

    /// Moves every entry of `other` into `self`, leaving `other` empty.
    ///
    /// The nodes of `other` are relinked into `self` in ascending order
    /// without allocating. When a key exists in both trees the node from
    /// `other` is dropped after handing its value to
    /// `on_collision(existing, incoming)`.
    ///
    /// Both trees must order keys the same way.
    pub fn merge_from<F>(&mut self, other: &mut Self, mut on_collision: F)
    where
        F: FnMut(&mut V, V),
    {
        // Detach everything up front: if `on_collision` panics the rest of
        // the source leaks instead of being left half drained.
        let mut root = mem::replace(&mut other.root, Node::null());
        let incoming = mem::replace(&mut other.len, 0);
        let mut moved = 0usize;
        let mut collided = 0usize;

        unsafe {
            let mut cursor = if root.is_null() {
                Node::null()
            } else {
                Node::min(root)
            };

            while !cursor.is_null() {
                // `cursor` is the minimum of what is left, so it has no left
                // child; its right subtree takes its place.
                let node = cursor;
                let parent = (*node).parent;
                let right = (*node).right;
                if !right.is_null() {
                    (*right).parent = parent;
                }
                if parent.is_null() {
                    root = right;
                } else {
                    (*parent).left = right;
                }
                cursor = if right.is_null() {
                    parent
                } else {
                    Node::min(right)
                };

                match self.probe(&(*node).key) {
                    Probe::Found(existing) => {
                        let (_, value) = Node::free(node);
                        collided += 1;
                        on_collision(&mut (*existing).value, value);
                    }
                    Probe::Vacant(parent, side) => {
                        self.attach(node, parent, side);
                        moved += 1;
                    }
                }
            }
        }

        debug_assert!(root.is_null());
        debug_assert_eq!(moved + collided, incoming);
        debug!("merged {} entries, {} collided", moved, collided);
        self.check();
    }

    /// Checks every structural invariant of the tree.
    pub fn validate(&self) -> Result<(), Violation> {
        unsafe {
            if self.root.is_null() {
                return match self.len {
                    0 => Ok(()),
                    expected => Err(Violation::Count { expected, found: 0 }),
                };
            }
            if is_red(self.root) {
                return Err(Violation::RedRoot);
            }
            if !(*self.root).parent.is_null() {
                return Err(Violation::Parent);
            }

            let mut found = 0;
            let mut last = Node::null();
            self.validate_subtree(self.root, &mut last, &mut found)?;

            if found != self.len {
                return Err(Violation::Count {
                    expected: self.len,
                    found,
                });
            }
            Ok(())
        }
    }

    /// Returns the black height of the subtree under `n`, visiting nodes in
    /// order so each key can be compared with the previous one.
    unsafe fn validate_subtree(
        &self,
        n: *mut Node<K, V>,
        last: &mut *mut Node<K, V>,
        found: &mut usize,
    ) -> Result<usize, Violation> {
        if n.is_null() {
            return Ok(1);
        }

        for child in [(*n).left, (*n).right] {
            if child.is_null() {
                continue;
            }
            if (*child).parent != n {
                return Err(Violation::Parent);
            }
            if is_red(n) && is_red(child) {
                return Err(Violation::RedRed);
            }
        }

        let left = self.validate_subtree((*n).left, last, found)?;

        *found += 1;
        if !last.is_null() && self.compare.compare(&(**last).key, &(*n).key) != Less {
            return Err(Violation::Order);
        }
        *last = n;

        let right = self.validate_subtree((*n).right, last, found)?;
        if left != right {
            return Err(Violation::BlackHeight);
        }

        Ok(left + usize::from(!is_red(n)))
    }

    #[inline]
    pub(crate) fn check(&self) {
        #[cfg(any(test, feature = "check-invariants"))]
        if let Err(violation) = self.validate() {
            log::error!("red-black invariant broken after a mutation: {}", violation);
            panic!("red-black invariant broken: {}", violation);
        }
    }
}

/// A shared handle to one node of an [`RbTree`].
///
/// Handles borrow the tree, they cannot outlive it or observe a mutation.
pub struct NodeRef<'a, K, V> {
    node: NonNull<Node<K, V>>,
    marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

impl<'a, K, V> PartialEq for NodeRef<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<'a, K, V> Eq for NodeRef<'a, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    #[inline]
    unsafe fn new(node: *mut Node<K, V>) -> Option<Self> {
        NonNull::new(node).map(|node| Self {
            node,
            marker: PhantomData,
        })
    }

    #[inline]
    fn raw(&self) -> *mut Node<K, V> {
        self.node.as_ptr()
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        unsafe { &(*self.raw()).key }
    }

    #[inline]
    pub fn value(&self) -> &'a V {
        unsafe { &(*self.raw()).value }
    }

    #[inline]
    pub fn color(&self) -> Color {
        unsafe { (*self.raw()).color }
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline]
    pub fn parent(&self) -> Option<Self> {
        unsafe { Self::new((*self.raw()).parent) }
    }

    #[inline]
    pub fn left(&self) -> Option<Self> {
        unsafe { Self::new((*self.raw()).left) }
    }

    #[inline]
    pub fn right(&self) -> Option<Self> {
        unsafe { Self::new((*self.raw()).right) }
    }

    /// The node with the next larger key.
    #[inline]
    pub fn next(&self) -> Option<Self> {
        unsafe { Self::new(Node::next(self.raw())) }
    }

    /// The node with the next smaller key.
    #[inline]
    pub fn prev(&self) -> Option<Self> {
        unsafe { Self::new(Node::prev(self.raw())) }
    }
}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = RbTree::default();
        result.extend(iter);
        result
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

// helper functions
unsafe fn is_red<K, V>(x: *const Node<K, V>) -> bool {
    if x.is_null() {
        false
    } else {
        (*x).color == Color::Red
    }
}

struct DebugView<K, V> {
    root: *const Node<K, V>,
    verbose: bool,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugView<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unsafe fn go<K: fmt::Debug, V: fmt::Debug>(
            f: &mut fmt::Formatter<'_>,
            h: *const Node<K, V>,
            offset: usize,
            verbose: bool,
        ) -> fmt::Result {
            if h.is_null() {
                return writeln!(f, "{:width$}[B] <null>", "", width = offset);
            }

            write!(
                f,
                "{:width$}[{}] {:?}",
                "",
                if is_red(h) { "R" } else { "B" },
                (*h).key,
                width = offset
            )?;
            if verbose {
                write!(f, " = {:?}", (*h).value)?;
                if !(*h).parent.is_null() {
                    write!(f, " (parent {:?})", (*(*h).parent).key)?;
                }
            }
            writeln!(f)?;

            if (*h).left.is_null() && (*h).right.is_null() {
                return Ok(());
            }
            go(f, (*h).left, offset + 2, verbose)?;
            go(f, (*h).right, offset + 2, verbose)
        }

        if self.root.is_null() {
            return writeln!(f, "<empty>");
        }
        unsafe { go(f, self.root, 0, self.verbose) }
    }
}
