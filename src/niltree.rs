//! A red-black tree whose nodes live in an arena and whose absent children
//! are all the same virtual leaf, [`Link::Nil`].
//!
//! `Nil` answers every read the balancing code makes of a leaf: it is black,
//! its children and parent are `Nil`, and writes to it are dropped. Rotation
//! and fixup code therefore treat leaves and inner nodes alike. Because `Nil`
//! is shared it cannot record whose child it is, so deletion tracks the
//! parent of the position being repaired explicitly.
//!
//! Removing a node with two children moves its successor's key and value into
//! its slot and deletes the successor's slot instead. Handles to the
//! successor are therefore invalidated, which is fine since every handle
//! borrows the tree.

use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::compare::{Compare, Natural};
use crate::error::Violation;
use crate::rbtree::{Color, Side};

mod iterator;
#[cfg(test)]
mod test;

pub use iterator::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// A child or parent reference inside a [`NilTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    /// The shared black leaf standing for every absent node.
    Nil,
    /// A node, by arena slot.
    Node(usize),
}

struct Node<K, V> {
    key: K,
    value: V,
    parent: Link,
    left: Link,
    right: Link,
    color: Color,
}

enum Probe {
    Found(usize),
    Vacant(Link, Side),
}

/// Slot storage plus the link structure over it. The comparator-free half of
/// a [`NilTree`], so a drained source tree can be walked without one.
struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    root: Link,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: Link::Nil,
        }
    }
}

impl<K, V> Arena<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: Link::Nil,
        }
    }

    /// Makes room for `additional` more nodes without reallocating.
    fn reserve(&mut self, additional: usize) {
        self.slots
            .reserve(additional.saturating_sub(self.free.len()));
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            parent: Link::Nil,
            left: Link::Nil,
            right: Link::Nil,
            color: Color::Red,
        };
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: usize) -> Node<K, V> {
        match self.slots[id].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => unreachable!("slot {} released twice", id),
        }
    }

    #[inline]
    fn node(&self, id: usize) -> &Node<K, V> {
        match &self.slots[id] {
            Some(node) => node,
            None => unreachable!("link to vacant slot {}", id),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: usize) -> &mut Node<K, V> {
        match &mut self.slots[id] {
            Some(node) => node,
            None => unreachable!("link to vacant slot {}", id),
        }
    }

    #[inline]
    fn color(&self, link: Link) -> Color {
        match link {
            Link::Nil => Color::Black,
            Link::Node(id) => self.node(id).color,
        }
    }

    #[inline]
    fn is_red(&self, link: Link) -> bool {
        self.color(link) == Color::Red
    }

    #[inline]
    fn parent(&self, link: Link) -> Link {
        match link {
            Link::Nil => Link::Nil,
            Link::Node(id) => self.node(id).parent,
        }
    }

    #[inline]
    fn left(&self, link: Link) -> Link {
        match link {
            Link::Nil => Link::Nil,
            Link::Node(id) => self.node(id).left,
        }
    }

    #[inline]
    fn right(&self, link: Link) -> Link {
        match link {
            Link::Nil => Link::Nil,
            Link::Node(id) => self.node(id).right,
        }
    }

    #[inline]
    fn set_color(&mut self, link: Link, color: Color) {
        if let Link::Node(id) = link {
            self.node_mut(id).color = color;
        }
    }

    #[inline]
    fn set_parent(&mut self, link: Link, parent: Link) {
        if let Link::Node(id) = link {
            self.node_mut(id).parent = parent;
        }
    }

    #[inline]
    fn set_left(&mut self, link: Link, child: Link) {
        if let Link::Node(id) = link {
            self.node_mut(id).left = child;
        }
    }

    #[inline]
    fn set_right(&mut self, link: Link, child: Link) {
        if let Link::Node(id) = link {
            self.node_mut(id).right = child;
        }
    }

    fn min(&self, mut link: Link) -> Link {
        while let left @ Link::Node(_) = self.left(link) {
            link = left;
        }
        link
    }

    fn max(&self, mut link: Link) -> Link {
        while let right @ Link::Node(_) = self.right(link) {
            link = right;
        }
        link
    }

    fn next(&self, mut link: Link) -> Link {
        let right = self.right(link);
        if right != Link::Nil {
            return self.min(right);
        }
        loop {
            let parent = self.parent(link);
            if parent == Link::Nil || self.left(parent) == link {
                return parent;
            }
            link = parent;
        }
    }

    fn prev(&self, mut link: Link) -> Link {
        let left = self.left(link);
        if left != Link::Nil {
            return self.max(left);
        }
        loop {
            let parent = self.parent(link);
            if parent == Link::Nil || self.right(parent) == link {
                return parent;
            }
            link = parent;
        }
    }

    fn replace_child(&mut self, parent: Link, old: Link, new: Link) {
        self.set_parent(new, parent);
        if parent == Link::Nil {
            self.root = new;
        } else if self.left(parent) == old {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
    }

    fn rotate_left(&mut self, h: Link) {
        let x = self.right(h);
        let inner = self.left(x);
        self.set_right(h, inner);
        self.set_parent(inner, h);
        self.replace_child(self.parent(h), h, x);
        self.set_left(x, h);
        self.set_parent(h, x);
    }

    fn rotate_right(&mut self, h: Link) {
        let x = self.left(h);
        let inner = self.right(x);
        self.set_left(h, inner);
        self.set_parent(inner, h);
        self.replace_child(self.parent(h), h, x);
        self.set_right(x, h);
        self.set_parent(h, x);
    }

    /// Links the freshly allocated slot `id` under `parent`; a `Nil` parent
    /// makes it the root of an empty tree.
    fn attach(&mut self, id: usize, parent: Link, side: Side) {
        let node = Link::Node(id);
        {
            let n = self.node_mut(id);
            n.parent = parent;
            n.left = Link::Nil;
            n.right = Link::Nil;
        }

        if parent == Link::Nil {
            debug_assert_eq!(self.root, Link::Nil);
            self.set_color(node, Color::Black);
            self.root = node;
            return;
        }

        self.set_color(node, Color::Red);
        match side {
            Side::Left => self.set_left(parent, node),
            Side::Right => self.set_right(parent, node),
        }
        self.insert_fixup(node);
    }

    fn insert_fixup(&mut self, mut node: Link) {
        loop {
            let parent = self.parent(node);
            if !self.is_red(parent) {
                return;
            }

            let grand = self.parent(parent);
            let parent_is_left = self.left(grand) == parent;
            let uncle = if parent_is_left {
                self.right(grand)
            } else {
                self.left(grand)
            };

            if self.is_red(uncle) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                if self.parent(grand) == Link::Nil {
                    return;
                }
                self.set_color(grand, Color::Red);
                node = grand;
                continue;
            }

            let node_is_left = self.left(parent) == node;
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
            self.set_color(top, Color::Black);
            self.set_color(grand, Color::Red);
            return;
        }
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (&mut head[lo], &mut tail[0]) {
            (Some(x), Some(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => unreachable!("swap with a vacant slot"),
        }
    }

    /// Unlinks the entry in slot `id` and returns it.
    fn remove(&mut self, id: usize) -> Node<K, V> {
        let mut target = Link::Node(id);
        if self.left(target) != Link::Nil && self.right(target) != Link::Nil {
            let next = self.min(self.right(target));
            if let Link::Node(next_id) = next {
                self.swap_entries(id, next_id);
            }
            target = next;
        }

        let work = match self.left(target) {
            Link::Nil => self.right(target),
            left => left,
        };
        let parent = self.parent(target);
        let removed_color = self.color(target);
        self.replace_child(parent, target, work);

        if removed_color == Color::Black {
            self.remove_fixup(work, parent);
        }

        match target {
            Link::Node(target) => self.release(target),
            Link::Nil => unreachable!("removal target is always a node"),
        }
    }

    fn remove_fixup(&mut self, mut work: Link, mut parent: Link) {
        while work != self.root && !self.is_red(work) {
            if work == self.left(parent) {
                let mut sibling = self.right(parent);
                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }
                if !self.is_red(self.left(sibling)) && !self.is_red(self.right(sibling)) {
                    self.set_color(sibling, Color::Red);
                    work = parent;
                    parent = self.parent(work);
                } else {
                    if !self.is_red(self.right(sibling)) {
                        self.set_color(self.left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.right(sibling), Color::Black);
                    self.rotate_left(parent);
                    work = self.root;
                }
            } else {
                let mut sibling = self.left(parent);
                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }
                if !self.is_red(self.right(sibling)) && !self.is_red(self.left(sibling)) {
                    self.set_color(sibling, Color::Red);
                    work = parent;
                    parent = self.parent(work);
                } else {
                    if !self.is_red(self.left(sibling)) {
                        self.set_color(self.right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.left(sibling), Color::Black);
                    self.rotate_right(parent);
                    work = self.root;
                }
            }
        }

        self.set_color(work, Color::Black);
    }

    fn height(&self) -> usize {
        let mut link = self.root;
        if link == Link::Nil {
            return 0;
        }

        let mut depth = 1;
        let mut max = 1;
        loop {
            let left = self.left(link);
            if left != Link::Nil {
                link = left;
                depth += 1;
                continue;
            }
            let right = self.right(link);
            if right != Link::Nil {
                link = right;
                depth += 1;
                continue;
            }

            max = max.max(depth);

            loop {
                let parent = self.parent(link);
                if parent == Link::Nil {
                    return max;
                }
                depth -= 1;
                let sibling = self.right(parent);
                if self.left(parent) == link && sibling != Link::Nil {
                    link = sibling;
                    depth += 1;
                    break;
                }
                link = parent;
            }
        }
    }
}

/// An ordered map stored as a red-black tree in a growable arena.
///
/// Behaves exactly like [`crate::RbTree`]; freed slots are recycled by later
/// insertions and the arena never shrinks until [`NilTree::clear`].
pub struct NilTree<K, V, C = Natural> {
    arena: Arena<K, V>,
    len: usize,
    compare: C,
}

impl<K, V, C: Default> Default for NilTree<K, V, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C> NilTree<K, V, C> {
    pub fn new(compare: C) -> Self {
        Self {
            arena: Arena::default(),
            len: 0,
            compare,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            len: 0,
            compare,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// The number of slots the arena holds, live or free.
    #[inline]
    pub fn slots(&self) -> usize {
        self.arena.slots.len()
    }

    /// Drops every entry and forgets the free slots.
    pub fn clear(&mut self) {
        let dropped = mem::replace(&mut self.len, 0);
        self.arena.slots.clear();
        self.arena.free.clear();
        self.arena.root = Link::Nil;
        debug!("cleared {} entries", dropped);
    }

    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::new(&self.arena, self.arena.root)
    }

    pub fn first_node(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::new(&self.arena, self.arena.min(self.arena.root))
    }

    pub fn last_node(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::new(&self.arena, self.arena.max(self.arena.root))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|n| (n.key(), n.value()))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|n| (n.key(), n.value()))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Mutable iteration in key order.
    ///
    /// The arena cannot hand out disjoint borrows by walking links, so this
    /// first collects one borrow per slot and orders them. Creating the
    /// iterator is O(n) in time and allocates a buffer of `len()` borrows;
    /// [`values_mut`](Self::values_mut) has the same cost.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    pub fn nth_from_min(&self, i: usize) -> Option<(&K, &V)> {
        self.iter().nth(i)
    }

    pub fn nth_from_max(&self, i: usize) -> Option<(&K, &V)> {
        self.iter().rev().nth(i)
    }

    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// Renders the tree one node per line, children indented below their
    /// parent, `Nil` leaves included. With `verbose` each line also carries
    /// the slot, the value and the parent slot.
    pub fn render(&self, verbose: bool) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        fn go<K: fmt::Debug, V: fmt::Debug>(
            out: &mut String,
            arena: &Arena<K, V>,
            link: Link,
            offset: usize,
            verbose: bool,
        ) {
            use std::fmt::Write;

            let id = match link {
                Link::Nil => {
                    let _ = writeln!(out, "{:width$}[B] <nil>", "", width = offset);
                    return;
                }
                Link::Node(id) => id,
            };
            let node = arena.node(id);
            let tag = if node.color == Color::Red { "R" } else { "B" };
            let _ = write!(out, "{:width$}[{}] {:?}", "", tag, node.key, width = offset);
            if verbose {
                let _ = write!(out, " = {:?} @{}", node.value, id);
                if let Link::Node(parent) = node.parent {
                    let _ = write!(out, " (parent @{})", parent);
                }
            }
            out.push('\n');

            if node.left == Link::Nil && node.right == Link::Nil {
                return;
            }
            go(out, arena, node.left, offset + 2, verbose);
            go(out, arena, node.right, offset + 2, verbose);
        }

        if self.arena.root == Link::Nil {
            return "<empty>\n".to_string();
        }
        let mut out = String::new();
        go(&mut out, &self.arena, self.arena.root, 0, verbose);
        out
    }
}

impl<K, V, C: Compare<K>> NilTree<K, V, C> {
    fn probe(&self, key: &K) -> Probe {
        let mut parent = Link::Nil;
        let mut side = Side::Left;
        let mut link = self.arena.root;
        while let Link::Node(id) = link {
            let node = self.arena.node(id);
            match self.compare.compare(key, &node.key) {
                std::cmp::Ordering::Equal => return Probe::Found(id),
                std::cmp::Ordering::Less => {
                    parent = link;
                    side = Side::Left;
                    link = node.left;
                }
                std::cmp::Ordering::Greater => {
                    parent = link;
                    side = Side::Right;
                    link = node.right;
                }
            }
        }
        Probe::Vacant(parent, side)
    }

    fn find(&self, key: &K) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(id) => Some(id),
            Probe::Vacant(..) => None,
        }
    }

    fn insert_at(&mut self, key: K, value: V, parent: Link, side: Side) -> usize {
        let id = self.arena.alloc(key, value);
        self.arena.attach(id, parent, side);
        self.len += 1;
        id
    }

    pub fn node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.find(key).and_then(|id| NodeRef::new(&self.arena, Link::Node(id)))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn try_get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.arena.node(id).value)
    }

    pub fn try_get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Some(id) => Some(&mut self.arena.node_mut(id).value),
            None => None,
        }
    }

    pub fn try_add(&mut self, key: K, value: V) -> bool {
        match self.probe(&key) {
            Probe::Found(_) => {
                trace!("rejected insert of an existing key");
                false
            }
            Probe::Vacant(parent, side) => {
                self.insert_at(key, value, parent, side);
                self.check();
                true
            }
        }
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(id) => Some(mem::replace(&mut self.arena.node_mut(id).value, value)),
            Probe::Vacant(parent, side) => {
                self.insert_at(key, value, parent, side);
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
        match self.probe(&key) {
            Probe::Found(id) => {
                update(&mut self.arena.node_mut(id).value);
                false
            }
            Probe::Vacant(parent, side) => {
                let value = insert(&key);
                self.insert_at(key, value, parent, side);
                self.check();
                true
            }
        }
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        let id = match self.probe(&key) {
            Probe::Found(id) => id,
            Probe::Vacant(parent, side) => {
                let value = f(&key);
                let id = self.insert_at(key, value, parent, side);
                self.check();
                id
            }
        };
        &mut self.arena.node_mut(id).value
    }

    fn remove_slot(&mut self, id: usize) -> (K, V) {
        let node = self.arena.remove(id);
        self.len -= 1;
        self.check();
        (node.key, node.value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        Some(self.remove_slot(id))
    }

    pub fn pop_min(&mut self) -> Option<(K, V)> {
        match self.arena.min(self.arena.root) {
            Link::Node(id) => Some(self.remove_slot(id)),
            Link::Nil => None,
        }
    }

    pub fn pop_max(&mut self) -> Option<(K, V)> {
        match self.arena.max(self.arena.root) {
            Link::Node(id) => Some(self.remove_slot(id)),
            Link::Nil => None,
        }
    }

    /// Moves every entry of `other` into `self` in ascending key order,
    /// leaving `other` empty. Keys and values are moved into slots of
    /// `self`'s arena, never cloned. On a shared key the incoming entry is
    /// dropped after its value is handed to `on_collision(existing, incoming)`.
    pub fn merge_from<F>(&mut self, other: &mut Self, mut on_collision: F)
    where
        F: FnMut(&mut V, V),
    {
        let mut source = mem::take(&mut other.arena);
        let incoming = mem::replace(&mut other.len, 0);
        self.arena.reserve(incoming);

        let mut moved = 0usize;
        let mut collided = 0usize;
        let mut cursor = source.min(source.root);

        while let Link::Node(id) = cursor {
            // The cursor is the minimum of what is left: its right subtree
            // takes its place and the walk continues from there.
            let parent = source.parent(cursor);
            let right = source.right(cursor);
            source.replace_child(parent, cursor, right);
            cursor = if right == Link::Nil {
                parent
            } else {
                source.min(right)
            };

            let node = source.release(id);
            match self.probe(&node.key) {
                Probe::Found(existing) => {
                    collided += 1;
                    on_collision(&mut self.arena.node_mut(existing).value, node.value);
                }
                Probe::Vacant(parent, side) => {
                    self.insert_at(node.key, node.value, parent, side);
                    moved += 1;
                }
            }
        }

        debug_assert_eq!(source.root, Link::Nil);
        debug_assert_eq!(moved + collided, incoming);
        debug!("merged {} entries, {} collided", moved, collided);
        self.check();
    }

    /// Checks every structural invariant of the tree, including that the
    /// arena's live slots match the reported length.
    pub fn validate(&self) -> Result<(), Violation> {
        let occupied = self.arena.slots.iter().filter(|s| s.is_some()).count();
        if occupied != self.len {
            return Err(Violation::Count {
                expected: self.len,
                found: occupied,
            });
        }

        let root = self.arena.root;
        if root == Link::Nil {
            return Ok(());
        }
        if self.arena.is_red(root) {
            return Err(Violation::RedRoot);
        }
        if self.arena.parent(root) != Link::Nil {
            return Err(Violation::Parent);
        }

        let mut found = 0;
        let mut last = None;
        self.validate_subtree(root, &mut last, &mut found)?;
        if found != self.len {
            return Err(Violation::Count {
                expected: self.len,
                found,
            });
        }
        Ok(())
    }

    fn validate_subtree<'a>(
        &'a self,
        link: Link,
        last: &mut Option<&'a K>,
        found: &mut usize,
    ) -> Result<usize, Violation> {
        let id = match link {
            Link::Nil => return Ok(1),
            Link::Node(id) => id,
        };
        let node = self.arena.node(id);

        for child in [node.left, node.right] {
            if child == Link::Nil {
                continue;
            }
            if self.arena.parent(child) != link {
                return Err(Violation::Parent);
            }
            if node.color == Color::Red && self.arena.is_red(child) {
                return Err(Violation::RedRed);
            }
        }

        let left = self.validate_subtree(node.left, last, found)?;

        *found += 1;
        if let Some(prev) = *last {
            if self.compare.compare(prev, &node.key) != std::cmp::Ordering::Less {
                return Err(Violation::Order);
            }
        }
        *last = Some(&node.key);

        let right = self.validate_subtree(node.right, last, found)?;
        if left != right {
            return Err(Violation::BlackHeight);
        }

        Ok(left + usize::from(node.color == Color::Black))
    }

    #[inline]
    fn check(&self) {
        #[cfg(any(test, feature = "check-invariants"))]
        if let Err(violation) = self.validate() {
            log::error!("red-black invariant broken after a mutation: {}", violation);
            panic!("red-black invariant broken: {}", violation);
        }
    }
}

/// A shared handle to one node of a [`NilTree`].
pub struct NodeRef<'a, K, V> {
    arena: &'a Arena<K, V>,
    id: usize,
}

impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

impl<'a, K, V> PartialEq for NodeRef<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.arena, other.arena)
    }
}

impl<'a, K, V> Eq for NodeRef<'a, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn new(arena: &'a Arena<K, V>, link: Link) -> Option<Self> {
        match link {
            Link::Nil => None,
            Link::Node(id) => Some(Self { arena, id }),
        }
    }

    /// This node's link, as stored in its parent.
    pub fn link(&self) -> Link {
        Link::Node(self.id)
    }

    pub fn key(&self) -> &'a K {
        &self.arena.node(self.id).key
    }

    pub fn value(&self) -> &'a V {
        &self.arena.node(self.id).value
    }

    pub fn color(&self) -> Color {
        self.arena.node(self.id).color
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn parent(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.parent(self.link()))
    }

    pub fn left(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.left(self.link()))
    }

    pub fn right(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.right(self.link()))
    }

    pub fn next(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.next(self.link()))
    }

    pub fn prev(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.prev(self.link()))
    }
}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("slot", &self.id)
            .field("key", self.key())
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for NilTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for NilTree<K, V, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = NilTree::with_capacity(iter.size_hint().0, Natural);
        result.extend(iter);
        result
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for NilTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
