use std::cmp::Ordering;

/// A three-way ordering over keys of type `K`.
///
/// The trees have no ordering logic of their own: every descent asks the
/// comparator where a key belongs. Implementations must describe a total
/// order and must keep answering the same way for the lifetime of the tree,
/// otherwise lookups may miss entries that are present.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use redblack::{OrderedMap, RbTree};
///
/// let mut tree = RbTree::new(|a: &String, b: &String| a.len().cmp(&b.len()));
/// tree.set("ccc".to_string(), 3);
/// tree.set("a".to_string(), 1);
/// assert_eq!(tree.min_key().unwrap(), "a");
/// ```
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the order of another comparator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Compare<K>> Compare<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_follows_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7u8, &7u8), Ordering::Equal);
    }

    #[test]
    fn reverse_flips() {
        let cmp = Reverse(Natural);
        assert_eq!(cmp.compare(&1, &2), Ordering::Greater);
        assert_eq!(cmp.compare(&2, &1), Ordering::Less);
        assert_eq!(cmp.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn closures_compare() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-5, &3), Ordering::Greater);
        assert_eq!(Reverse(by_abs).compare(&-5, &3), Ordering::Less);
    }
}
