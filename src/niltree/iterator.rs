use super::{Arena, Link, NilTree};
use crate::compare::Compare;
use std::iter::FusedIterator;
use std::vec;

/// An iterator over the entries of a [`NilTree`] in key order.
pub struct Iter<'tree, K, V> {
    arena: &'tree Arena<K, V>,
    front: Link,
    back: Link,
    remaining_elements: usize,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(super) fn new<C>(tree: &'tree NilTree<K, V, C>) -> Self {
        let arena = &tree.arena;
        Self {
            arena,
            front: arena.min(arena.root),
            back: arena.max(arena.root),
            remaining_elements: tree.len,
        }
    }

    fn entry(&self, link: Link) -> Option<(&'tree K, &'tree V)> {
        match link {
            Link::Node(id) => {
                let node = self.arena.node(id);
                Some((&node.key, &node.value))
            }
            Link::Nil => None,
        }
    }
}

impl<'tree, K, V> Clone for Iter<'tree, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining_elements: self.remaining_elements,
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        let link = self.front;
        self.front = self.arena.next(link);
        self.remaining_elements -= 1;
        self.entry(link)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining_elements, Some(self.remaining_elements))
    }
}

impl<'tree, K, V> DoubleEndedIterator for Iter<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        let link = self.back;
        self.back = self.arena.prev(link);
        self.remaining_elements -= 1;
        self.entry(link)
    }
}

impl<'tree, K, V> ExactSizeIterator for Iter<'tree, K, V> {}
impl<'tree, K, V> FusedIterator for Iter<'tree, K, V> {}

/// Like [`Iter`], handing out mutable references to the values.
pub struct IterMut<'tree, K, V>(vec::IntoIter<(&'tree K, &'tree mut V)>);

impl<'tree, K, V> IterMut<'tree, K, V> {
    pub(super) fn new<C>(tree: &'tree mut NilTree<K, V, C>) -> Self {
        let arena = &mut tree.arena;

        let mut rank = vec![usize::MAX; arena.slots.len()];
        let mut link = arena.min(arena.root);
        let mut i = 0;
        while let Link::Node(id) = link {
            rank[id] = i;
            i += 1;
            link = arena.next(link);
        }

        let mut ordered: Vec<Option<(&'tree K, &'tree mut V)>> = (0..i).map(|_| None).collect();
        for (id, slot) in arena.slots.iter_mut().enumerate() {
            if let Some(node) = slot {
                ordered[rank[id]] = Some((&node.key, &mut node.value));
            }
        }

        Self(ordered.into_iter().flatten().collect::<Vec<_>>().into_iter())
    }
}

impl<'tree, K, V> Iterator for IterMut<'tree, K, V> {
    type Item = (&'tree K, &'tree mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for IterMut<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<'tree, K, V> ExactSizeIterator for IterMut<'tree, K, V> {}
impl<'tree, K, V> FusedIterator for IterMut<'tree, K, V> {}

#[derive(Clone)]
pub struct Keys<'tree, K, V>(pub(super) Iter<'tree, K, V>);

impl<'tree, K, V> Iterator for Keys<'tree, K, V> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for Keys<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<'tree, K, V> ExactSizeIterator for Keys<'tree, K, V> {}

#[derive(Clone)]
pub struct Values<'tree, K, V>(pub(super) Iter<'tree, K, V>);

impl<'tree, K, V> Iterator for Values<'tree, K, V> {
    type Item = &'tree V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for Values<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'tree, K, V> ExactSizeIterator for Values<'tree, K, V> {}

pub struct ValuesMut<'tree, K, V>(pub(super) IterMut<'tree, K, V>);

impl<'tree, K, V> Iterator for ValuesMut<'tree, K, V> {
    type Item = &'tree mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for ValuesMut<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'tree, K, V> ExactSizeIterator for ValuesMut<'tree, K, V> {}

/// An owning iterator, popping entries from either end of the tree.
pub struct IntoIter<K, V, C: Compare<K>>(NilTree<K, V, C>);

impl<K, V, C: Compare<K>> Iterator for IntoIter<K, V, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_min()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<K, V, C: Compare<K>> DoubleEndedIterator for IntoIter<K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_max()
    }
}

impl<K, V, C: Compare<K>> ExactSizeIterator for IntoIter<K, V, C> {}

impl<K, V, C: Compare<K>> IntoIterator for NilTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'tree, K, V, C> IntoIterator for &'tree NilTree<K, V, C> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'tree, K, V, C> IntoIterator for &'tree mut NilTree<K, V, C> {
    type Item = (&'tree K, &'tree mut V);
    type IntoIter = IterMut<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
