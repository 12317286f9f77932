use super::{Node, RbTree};
use crate::compare::Compare;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// An iterator over the entries of an [`RbTree`] in key order.
///
/// Both ends follow parent links to the in-order neighbour, no stack is kept.
/// The remaining count stops the two ends from crossing.
pub struct Iter<'tree, K, V> {
    front: *mut Node<K, V>,
    back: *mut Node<K, V>,
    remaining_elements: usize,
    lifetime: PhantomData<&'tree Node<K, V>>,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(super) fn new<C>(tree: &'tree RbTree<K, V, C>) -> Self {
        let (front, back) = unsafe { ends(tree.root) };
        Self {
            front,
            back,
            remaining_elements: tree.len,
            lifetime: PhantomData,
        }
    }
}

impl<'tree, K, V> Clone for Iter<'tree, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining_elements: self.remaining_elements,
            lifetime: PhantomData,
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        unsafe {
            let node = self.front;
            self.front = Node::next(node);
            self.remaining_elements -= 1;
            Some((&(*node).key, &(*node).value))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining_elements, Some(self.remaining_elements))
    }
}

impl<'tree, K, V> DoubleEndedIterator for Iter<'tree, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        unsafe {
            let node = self.back;
            self.back = Node::prev(node);
            self.remaining_elements -= 1;
            Some((&(*node).key, &(*node).value))
        }
    }
}

impl<'tree, K, V> ExactSizeIterator for Iter<'tree, K, V> {}
impl<'tree, K, V> FusedIterator for Iter<'tree, K, V> {}

/// Like [`Iter`], handing out mutable references to the values.
pub struct IterMut<'tree, K, V> {
    front: *mut Node<K, V>,
    back: *mut Node<K, V>,
    remaining_elements: usize,
    lifetime: PhantomData<&'tree mut Node<K, V>>,
}

impl<'tree, K, V> IterMut<'tree, K, V> {
    pub(super) fn new<C>(tree: &'tree mut RbTree<K, V, C>) -> Self {
        let (front, back) = unsafe { ends(tree.root) };
        Self {
            front,
            back,
            remaining_elements: tree.len,
            lifetime: PhantomData,
        }
    }
}

impl<'tree, K, V> Iterator for IterMut<'tree, K, V> {
    type Item = (&'tree K, &'tree mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        // Each node is handed out at most once, the counter guarantees the
        // ends never meet twice.
        unsafe {
            let node = self.front;
            self.front = Node::next(node);
            self.remaining_elements -= 1;
            Some((&(*node).key, &mut (*node).value))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining_elements, Some(self.remaining_elements))
    }
}

impl<'tree, K, V> DoubleEndedIterator for IterMut<'tree, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining_elements == 0 {
            return None;
        }
        unsafe {
            let node = self.back;
            self.back = Node::prev(node);
            self.remaining_elements -= 1;
            Some((&(*node).key, &mut (*node).value))
        }
    }
}

impl<'tree, K, V> ExactSizeIterator for IterMut<'tree, K, V> {}
impl<'tree, K, V> FusedIterator for IterMut<'tree, K, V> {}

/// The keys of an [`RbTree`] in order.
#[derive(Clone)]
pub struct Keys<'tree, K, V>(pub(super) Iter<'tree, K, V>);

impl<'tree, K, V> Iterator for Keys<'tree, K, V> {
    type Item = &'tree K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for Keys<'tree, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<'tree, K, V> ExactSizeIterator for Keys<'tree, K, V> {}

/// The values of an [`RbTree`] in key order.
#[derive(Clone)]
pub struct Values<'tree, K, V>(pub(super) Iter<'tree, K, V>);

impl<'tree, K, V> Iterator for Values<'tree, K, V> {
    type Item = &'tree V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for Values<'tree, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'tree, K, V> ExactSizeIterator for Values<'tree, K, V> {}

pub struct ValuesMut<'tree, K, V>(pub(super) IterMut<'tree, K, V>);

impl<'tree, K, V> Iterator for ValuesMut<'tree, K, V> {
    type Item = &'tree mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'tree, K, V> DoubleEndedIterator for ValuesMut<'tree, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'tree, K, V> ExactSizeIterator for ValuesMut<'tree, K, V> {}

/// An owning iterator, popping entries from either end of the tree.
pub struct IntoIter<K, V, C: Compare<K>>(RbTree<K, V, C>);

impl<K, V, C: Compare<K>> Iterator for IntoIter<K, V, C> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_min()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<K, V, C: Compare<K>> DoubleEndedIterator for IntoIter<K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_max()
    }
}

impl<K, V, C: Compare<K>> ExactSizeIterator for IntoIter<K, V, C> {}

impl<K, V, C: Compare<K>> IntoIterator for RbTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'tree, K, V, C> IntoIterator for &'tree RbTree<K, V, C> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'tree, K, V, C> IntoIterator for &'tree mut RbTree<K, V, C> {
    type Item = (&'tree K, &'tree mut V);
    type IntoIter = IterMut<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

unsafe fn ends<K, V>(root: *mut Node<K, V>) -> (*mut Node<K, V>, *mut Node<K, V>) {
    if root.is_null() {
        (root, root)
    } else {
        (Node::min(root), Node::max(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_visit_all() {
        let mut tree = RbTree::<[u8; 1], u8>::default();

        for i in 0..250u8 {
            tree.set([i], i);
        }

        let iter = tree.iter();
        assert_eq!(iter.len(), 250);

        let mut expected_v = 0u8;

        for (_, v) in iter {
            assert_eq!(v, &expected_v);
            expected_v += 1;
        }

        assert_eq!(expected_v, 250);
    }

    #[test]
    fn ends_do_not_cross() {
        let tree: RbTree<u32, ()> = (0..10).map(|i| (i, ())).collect();
        let mut iter = tree.keys();
        let mut seen = Vec::new();
        while let Some(low) = iter.next() {
            seen.push(*low);
            if let Some(high) = iter.next_back() {
                seen.push(*high);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn values_mut_in_order() {
        let mut tree: RbTree<u32, u32> = (0..20).map(|i| (i, 0)).collect();
        for (i, v) in tree.values_mut().enumerate() {
            *v = i as u32 * 10;
        }
        assert!(tree.iter().all(|(k, v)| *v == k * 10));
    }

    #[test]
    fn into_iter_drains_both_ends() {
        let tree: RbTree<u32, u32> = (0..5).map(|i| (i, i)).collect();
        let mut iter = tree.into_iter();
        assert_eq!(iter.next(), Some((0, 0)));
        assert_eq!(iter.next_back(), Some((4, 4)));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<_>>(), vec![(1, 1), (2, 2), (3, 3)]);
    }
}
