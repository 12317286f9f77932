use super::{Node, RbTree, Side};
use crate::compare::Compare;
use std::fmt::{self, Debug};
use Entry::{Occupied, Vacant};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`RbTree`].
///
/// [`entry`]: RbTree::entry
pub enum Entry<'a, K, V, C: Compare<K>> {
    Vacant(VacantEntry<'a, K, V, C>),
    Occupied(OccupiedEntry<'a, K, V, C>),
}

/// A view into a vacant entry in a [`RbTree`]. It is part of the [`Entry`] enum.
///
/// The entry remembers where the key would be attached, inserting through it
/// does not search the tree a second time.
pub struct VacantEntry<'a, K, V, C: Compare<K>> {
    pub(super) map: &'a mut RbTree<K, V, C>,
    pub(super) key: K,
    pub(super) parent: *mut Node<K, V>,
    pub(super) side: Side,
}

/// A view into an occupied entry in a [`RbTree`]. It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V, C: Compare<K>> {
    pub(super) map: &'a mut RbTree<K, V, C>,
    pub(super) node: *mut Node<K, V>,
}

impl<'a, K, V, C: Compare<K>> VacantEntry<'a, K, V, C> {
    /// Sets the value of the entry with the VacantEntry’s key, and returns a mutable
    /// reference to it.
    #[inline]
    pub fn insert(self, value: V) -> &'a mut V {
        let node = Node::new(self.key, value);
        unsafe {
            self.map.attach(node, self.parent, self.side);
            self.map.check();
            &mut (*node).value
        }
    }

    /// Take ownership of the key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Gets a reference to the key that would be used when inserting a value through
    /// the [`VacantEntry`].
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<'a, K, V, C: Compare<K>> OccupiedEntry<'a, K, V, C> {
    /// Gets a reference to the value in the entry.
    #[inline]
    pub fn get(&self) -> &V {
        unsafe { &(*self.node).value }
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the destruction of
    /// the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        unsafe { &mut (*self.node).value }
    }

    /// Converts the entry into a mutable reference to its value.
    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        unsafe { &mut (*self.node).value }
    }

    /// Sets the value of the entry, and returns the entry's old value.
    #[inline]
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Gets a reference to the key stored in the map.
    #[inline]
    pub fn key(&self) -> &K {
        unsafe { &(*self.node).key }
    }

    /// Takes the value of the entry out of the map, and returns it.
    #[inline]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Take ownership of the key and value from the map.
    #[inline]
    pub fn remove_entry(self) -> (K, V) {
        let entry = unsafe { self.map.remove_node(self.node) };
        self.map.check();
        entry
    }
}

impl<'a, K, V, C: Compare<K>> Entry<'a, K, V, C> {
    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    #[inline]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Occupied(mut entry) => {
                f(entry.get_mut());
                Occupied(entry)
            }
            Vacant(entry) => Vacant(entry),
        }
    }

    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    #[inline]
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        match self {
            Occupied(entry) => entry.into_mut(),
            Vacant(entry) => entry.insert(Default::default()),
        }
    }

    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Occupied(entry) => entry.into_mut(),
            Vacant(entry) => entry.insert(default),
        }
    }

    #[inline]
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Occupied(entry) => entry.into_mut(),
            Vacant(entry) => entry.insert(default()),
        }
    }

    /// Like [`Entry::or_insert_with`], the closure receives the key that was
    /// moved into the `.entry(key)` call.
    #[inline]
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Occupied(entry) => entry.into_mut(),
            Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Returns a reference to this entry’s key.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Occupied(entry) => entry.key(),
            Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K: Debug, V: Debug, C: Compare<K>> Debug for Entry<'a, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Vacant(ref v) => f.debug_tuple("Entry").field(v).finish(),
            Occupied(ref o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

impl<'a, K: Debug, V: Debug, C: Compare<K>> Debug for VacantEntry<'a, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}

impl<'a, K: Debug, V: Debug, C: Compare<K>> Debug for OccupiedEntry<'a, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}
