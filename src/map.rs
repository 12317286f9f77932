use crate::compare::Compare;
use crate::error::{Result, TreeError, Violation};
use crate::niltree::{self, NilTree};
use crate::rbtree::{self, RbTree};

/// The operations shared by [`RbTree`] and [`NilTree`].
///
/// Each fallible operation comes in two forms: a `try_` form answering with a
/// `bool` or an `Option`, and a plain form answering with a [`TreeError`].
/// Only the `try_` forms and the structural operations are required, the
/// rest are provided on top of them.
///
/// ```
/// use redblack::{NilTree, OrderedMap, RbTree, TreeError};
///
/// fn histogram<M: OrderedMap<char, usize>>(map: &mut M, text: &str) {
///     for c in text.chars() {
///         map.add_or_update(c, |_| 1, |n| *n += 1);
///     }
/// }
///
/// let mut a = RbTree::<char, usize>::default();
/// let mut b = NilTree::<char, usize>::default();
/// histogram(&mut a, "hello");
/// histogram(&mut b, "hello");
///
/// assert_eq!(a.get(&'l'), Ok(&2));
/// assert_eq!(b.get(&'l'), Ok(&2));
/// assert_eq!(a.get(&'z'), Err(TreeError::KeyNotFound));
/// assert_eq!(b.max_key(), Ok(&'o'));
/// ```
pub trait OrderedMap<K, V> {
    type Iter<'a>: DoubleEndedIterator<Item = (&'a K, &'a V)> + ExactSizeIterator
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    fn clear(&mut self);

    /// Inserts the entry unless the key is present. Returns whether it was
    /// inserted; a rejected entry is dropped.
    fn try_add(&mut self, key: K, value: V) -> bool;

    /// Inserts or overwrites, returning the value that was replaced.
    fn set(&mut self, key: K, value: V) -> Option<V>;

    /// Inserts `insert(&key)` if the key is absent, otherwise calls `update`
    /// on the stored value. Returns `true` if an entry was created.
    fn add_or_update<I, U>(&mut self, key: K, insert: I, update: U) -> bool
    where
        I: FnOnce(&K) -> V,
        U: FnOnce(&mut V);

    /// The value under `key`, created with `f(&key)` if absent.
    fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V;

    fn try_get(&self, key: &K) -> Option<&V>;

    fn try_get_mut(&mut self, key: &K) -> Option<&mut V>;

    fn remove_entry(&mut self, key: &K) -> Option<(K, V)>;

    fn pop_min(&mut self) -> Option<(K, V)>;

    fn pop_max(&mut self) -> Option<(K, V)>;

    /// Entries in ascending key order; reverse it for descending order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Moves every entry of `other` into `self`, leaving `other` empty. On a
    /// shared key the incoming value is passed to
    /// `on_collision(existing, incoming)` and the incoming key is dropped.
    fn merge_from<F>(&mut self, other: &mut Self, on_collision: F)
    where
        Self: Sized,
        F: FnMut(&mut V, V);

    /// The number of nodes on the longest root-to-leaf path.
    fn height(&self) -> usize;

    fn validate(&self) -> std::result::Result<(), Violation>;

    /// Inserts the entry, failing if the key is already present.
    fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.try_add(key, value) {
            Ok(())
        } else {
            Err(TreeError::DuplicateKey)
        }
    }

    fn get(&self, key: &K) -> Result<&V> {
        self.try_get(key).ok_or(TreeError::KeyNotFound)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.try_get(key).is_some()
    }

    /// Removes the key, returning its value. Absent keys are not an error.
    fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    fn remove_min(&mut self) -> Option<(K, V)> {
        self.pop_min()
    }

    fn remove_max(&mut self) -> Option<(K, V)> {
        self.pop_max()
    }

    fn first_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    fn last_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    fn try_min_key<'a>(&'a self) -> Option<&'a K>
    where
        V: 'a,
    {
        self.first_key_value().map(|(k, _)| k)
    }

    fn try_max_key<'a>(&'a self) -> Option<&'a K>
    where
        V: 'a,
    {
        self.last_key_value().map(|(k, _)| k)
    }

    fn min_key<'a>(&'a self) -> Result<&'a K>
    where
        V: 'a,
    {
        self.try_min_key().ok_or(TreeError::EmptyCollection)
    }

    fn max_key<'a>(&'a self) -> Result<&'a K>
    where
        V: 'a,
    {
        self.try_max_key().ok_or(TreeError::EmptyCollection)
    }

    /// The key of rank `i` counting from the smallest. Walks `i` links.
    fn try_nth_key_from_min<'a>(&'a self, i: usize) -> Option<&'a K>
    where
        V: 'a,
    {
        self.iter().nth(i).map(|(k, _)| k)
    }

    fn try_nth_key_from_max<'a>(&'a self, i: usize) -> Option<&'a K>
    where
        V: 'a,
    {
        self.iter().rev().nth(i).map(|(k, _)| k)
    }

    fn nth_key_from_min<'a>(&'a self, i: usize) -> Result<&'a K>
    where
        V: 'a,
    {
        self.try_nth_key_from_min(i)
            .ok_or_else(|| TreeError::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    fn nth_key_from_max<'a>(&'a self, i: usize) -> Result<&'a K>
    where
        V: 'a,
    {
        self.try_nth_key_from_max(i)
            .ok_or_else(|| TreeError::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }
}

macro_rules! delegate_ordered_map {
    ($tree:ident, $module:ident) => {
        impl<K, V, C: Compare<K>> OrderedMap<K, V> for $tree<K, V, C> {
            type Iter<'a> = $module::Iter<'a, K, V>
            where
                Self: 'a,
                K: 'a,
                V: 'a;

            #[inline]
            fn len(&self) -> usize {
                $tree::len(self)
            }

            #[inline]
            fn clear(&mut self) {
                $tree::clear(self)
            }

            #[inline]
            fn try_add(&mut self, key: K, value: V) -> bool {
                $tree::try_add(self, key, value)
            }

            #[inline]
            fn set(&mut self, key: K, value: V) -> Option<V> {
                $tree::set(self, key, value)
            }

            #[inline]
            fn add_or_update<I, U>(&mut self, key: K, insert: I, update: U) -> bool
            where
                I: FnOnce(&K) -> V,
                U: FnOnce(&mut V),
            {
                $tree::add_or_update(self, key, insert, update)
            }

            #[inline]
            fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
            where
                F: FnOnce(&K) -> V,
            {
                $tree::get_or_insert_with(self, key, f)
            }

            #[inline]
            fn try_get(&self, key: &K) -> Option<&V> {
                $tree::try_get(self, key)
            }

            #[inline]
            fn try_get_mut(&mut self, key: &K) -> Option<&mut V> {
                $tree::try_get_mut(self, key)
            }

            #[inline]
            fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
                $tree::remove_entry(self, key)
            }

            #[inline]
            fn pop_min(&mut self) -> Option<(K, V)> {
                $tree::pop_min(self)
            }

            #[inline]
            fn pop_max(&mut self) -> Option<(K, V)> {
                $tree::pop_max(self)
            }

            #[inline]
            fn iter(&self) -> Self::Iter<'_> {
                $tree::iter(self)
            }

            #[inline]
            fn merge_from<F>(&mut self, other: &mut Self, on_collision: F)
            where
                F: FnMut(&mut V, V),
            {
                $tree::merge_from(self, other, on_collision)
            }

            #[inline]
            fn height(&self) -> usize {
                $tree::height(self)
            }

            #[inline]
            fn validate(&self) -> std::result::Result<(), Violation> {
                $tree::validate(self)
            }

            #[inline]
            fn contains_key(&self, key: &K) -> bool {
                $tree::contains_key(self, key)
            }

            #[inline]
            fn first_key_value(&self) -> Option<(&K, &V)> {
                $tree::first_key_value(self)
            }

            #[inline]
            fn last_key_value(&self) -> Option<(&K, &V)> {
                $tree::last_key_value(self)
            }
        }
    };
}

delegate_ordered_map!(RbTree, rbtree);
delegate_ordered_map!(NilTree, niltree);

#[cfg(test)]
mod test;
