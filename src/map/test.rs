use super::OrderedMap;
use crate::error::TreeError;
use crate::{NilTree, RbTree};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use simplelog::{Config, LevelFilter, TestLogger};
use std::collections::BTreeMap;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn fill<M: OrderedMap<u32, u32> + Default>(keys: impl IntoIterator<Item = u32>) -> M {
    let mut map = M::default();
    for k in keys {
        assert_eq!(map.add(k, k), Ok(()));
    }
    map
}

fn add_and_lookup_errors<M: OrderedMap<u32, u32> + Default>() {
    let mut map = M::default();
    assert!(map.is_empty());
    assert_eq!(map.min_key(), Err(TreeError::EmptyCollection));
    assert_eq!(map.max_key(), Err(TreeError::EmptyCollection));
    assert_eq!(map.try_min_key(), None);
    assert_eq!(map.nth_key_from_min(0), Err(TreeError::IndexOutOfRange { index: 0, len: 0 }));

    assert_eq!(map.add(2, 20), Ok(()));
    assert_eq!(map.add(1, 10), Ok(()));
    assert_eq!(map.add(3, 30), Ok(()));
    assert_eq!(map.add(2, 99), Err(TreeError::DuplicateKey));
    assert_eq!(map.len(), 3);

    assert_eq!(map.get(&2), Ok(&20));
    assert_eq!(map.get(&4), Err(TreeError::KeyNotFound));
    assert!(map.contains_key(&1));
    assert!(!map.contains_key(&0));

    assert_eq!(map.min_key(), Ok(&1));
    assert_eq!(map.max_key(), Ok(&3));
    assert_eq!(map.nth_key_from_min(1), Ok(&2));
    assert_eq!(map.nth_key_from_max(0), Ok(&3));
    assert_eq!(
        map.nth_key_from_min(3),
        Err(TreeError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(map.try_nth_key_from_max(3), None);

    *map.try_get_mut(&3).unwrap() += 1;
    assert_eq!(map.get(&3), Ok(&31));
    *map.get_or_insert_with(7, |k| k * 100) += 1;
    assert_eq!(map.get(&7), Ok(&701));
}

fn red_stem_removals<M: OrderedMap<u32, u32> + Default>() {
    let mut map: M = fill([7, 3, 8, 2, 5, 4]);
    assert_eq!(map.height(), 4);

    assert_eq!(map.remove(&4), Some(4));
    assert_eq!(map.remove(&5), Some(5));
    assert_eq!(map.len(), 4);
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(
        map.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![2, 3, 7, 8]
    );
}

fn remove_on_empty_or_missing<M: OrderedMap<u32, u32> + Default>() {
    let mut map = M::default();
    assert_eq!(map.remove(&1), None);
    assert_eq!(map.remove_min(), None);
    assert_eq!(map.remove_max(), None);

    map.set(1, 1);
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.len(), 1);
}

fn ascending_insertions<M: OrderedMap<u32, u32> + Default>() {
    let mut map = M::default();
    for i in 0..1023 {
        assert!(map.try_add(i, i));
        assert_eq!(map.min_key(), Ok(&0));
        assert_eq!(map.max_key(), Ok(&i));
        assert!((0..=i).all(|j| map.contains_key(&j)));
    }
    let bound = 2.0 * ((map.len() + 1) as f64).log2();
    assert!(map.height() as f64 <= bound);
}

fn round_trip_removal<M: OrderedMap<u32, u32> + Default>() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<u32> = (0..600).collect();
    keys.shuffle(&mut rng);

    let mut map: M = fill(keys.iter().copied());
    keys.shuffle(&mut rng);
    for (removed, k) in keys.iter().enumerate() {
        assert_eq!(map.remove_entry(k), Some((*k, *k)));
        assert_eq!(map.validate(), Ok(()));
        assert_eq!(map.len(), keys.len() - removed - 1);
        let bound = 2.0 * ((map.len() + 1) as f64).log2();
        assert!(map.height() as f64 <= bound);
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
}

fn drain_from_both_ends<M: OrderedMap<u32, u32> + Default>() {
    let mut map: M = fill([4, 1, 3, 5, 2]);
    assert_eq!(map.remove_min(), Some((1, 1)));
    assert_eq!(map.remove_max(), Some((5, 5)));
    assert_eq!(map.first_key_value(), Some((&2, &2)));
    assert_eq!(map.last_key_value(), Some((&4, &4)));
    assert_eq!(map.iter().rev().map(|(k, _)| *k).collect::<Vec<_>>(), vec![4, 3, 2]);
}

fn merge_disjoint_halves<M: OrderedMap<u32, u32> + Default>() {
    init_logger();

    let mut evens: M = fill((0..4096).step_by(2));
    let mut odds: M = fill((1..4096).step_by(2));

    evens.merge_from(&mut odds, |_, _| panic!("halves are disjoint"));

    assert!(odds.is_empty());
    assert_eq!(evens.len(), 4096);
    assert!(evens.iter().map(|(k, _)| *k).eq(0..4096));
    assert_eq!(evens.validate(), Ok(()));

    for k in (0..4096).step_by(2) {
        assert_eq!(evens.remove(&k), Some(k));
    }
    assert_eq!(evens.len(), 2048);
    assert_eq!(evens.min_key(), Ok(&1));
}

fn merge_overlapping<M: OrderedMap<u32, u32> + Default>() {
    init_logger();

    let mut a: M = fill(0..100);
    let mut b: M = fill(50..150);
    let mut seen = Vec::new();

    a.merge_from(&mut b, |existing, incoming| {
        seen.push(incoming);
        *existing += incoming;
    });

    assert_eq!(seen, (50..100).collect::<Vec<_>>());
    assert_eq!(a.len(), 150);
    assert_eq!(a.get(&60), Ok(&120));
    assert_eq!(a.get(&120), Ok(&120));
    assert!(b.is_empty());

    // The drained source is still a usable map.
    assert_eq!(b.add(1, 1), Ok(()));
    assert_eq!(b.len(), 1);
}

fn clear_empties<M: OrderedMap<u32, u32> + Default>() {
    init_logger();

    let mut map: M = fill(0..10);
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.try_min_key(), None);
    assert_eq!(map.validate(), Ok(()));
}

macro_rules! scenarios {
    ($name:ident, $tree:ty) => {
        mod $name {
            use super::*;

            #[test]
            fn add_and_lookup_errors() {
                super::add_and_lookup_errors::<$tree>()
            }

            #[test]
            fn red_stem_removals() {
                super::red_stem_removals::<$tree>()
            }

            #[test]
            fn remove_on_empty_or_missing() {
                super::remove_on_empty_or_missing::<$tree>()
            }

            #[test]
            fn ascending_insertions() {
                super::ascending_insertions::<$tree>()
            }

            #[test]
            fn round_trip_removal() {
                super::round_trip_removal::<$tree>()
            }

            #[test]
            fn drain_from_both_ends() {
                super::drain_from_both_ends::<$tree>()
            }

            #[test]
            fn merge_disjoint_halves() {
                super::merge_disjoint_halves::<$tree>()
            }

            #[test]
            fn merge_overlapping() {
                super::merge_overlapping::<$tree>()
            }

            #[test]
            fn clear_empties() {
                super::clear_empties::<$tree>()
            }
        }
    };
}

scenarios!(on_rbtree, RbTree<u32, u32>);
scenarios!(on_niltree, NilTree<u32, u32>);

#[derive(Debug, Clone)]
enum Op {
    Add(u16, u32),
    Set(u16, u32),
    Remove(u16),
    PopMin,
    PopMax,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..256u16, any::<u32>()).prop_map(|(k, v)| Op::Add(k, v)),
        2 => (0..256u16, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        3 => (0..256u16).prop_map(Op::Remove),
        1 => Just(Op::PopMin),
        1 => Just(Op::PopMax),
    ]
}

fn apply<M: OrderedMap<u16, u32>>(map: &mut M, model: &mut BTreeMap<u16, u32>, op: &Op) {
    match *op {
        Op::Add(k, v) => {
            let fresh = !model.contains_key(&k);
            if fresh {
                model.insert(k, v);
            }
            assert_eq!(map.try_add(k, v), fresh);
        }
        Op::Set(k, v) => assert_eq!(map.set(k, v), model.insert(k, v)),
        Op::Remove(k) => assert_eq!(map.remove(&k), model.remove(&k)),
        Op::PopMin => assert_eq!(map.pop_min(), model.pop_first()),
        Op::PopMax => assert_eq!(map.pop_max(), model.pop_last()),
    }
    assert_eq!(map.len(), model.len());
}

fn check_against<M: OrderedMap<u16, u32>>(map: &M, model: &BTreeMap<u16, u32>) {
    assert_eq!(map.validate(), Ok(()));
    assert!(map.iter().eq(model.iter()));
    assert!(map.iter().rev().eq(model.iter().rev()));
    assert_eq!(map.try_min_key(), model.keys().next());
    assert_eq!(map.try_max_key(), model.keys().next_back());
}

proptest!(
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rbtree_matches_model(ops in proptest::collection::vec(op(), 0..400)) {
        let mut map = RbTree::<u16, u32>::default();
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut map, &mut model, op);
        }
        check_against(&map, &model);
    }

    #[test]
    fn niltree_matches_model(ops in proptest::collection::vec(op(), 0..400)) {
        let mut map = NilTree::<u16, u32>::default();
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut map, &mut model, op);
        }
        check_against(&map, &model);
    }

    #[test]
    fn representations_share_shape(ops in proptest::collection::vec(op(), 0..300)) {
        let mut pointers = RbTree::<u16, u32>::default();
        let mut arena = NilTree::<u16, u32>::default();
        let mut model_a = BTreeMap::new();
        let mut model_b = BTreeMap::new();
        for op in &ops {
            apply(&mut pointers, &mut model_a, op);
            apply(&mut arena, &mut model_b, op);

            prop_assert_eq!(
                pointers.render(false).replace("<null>", "<nil>"),
                arena.render(false)
            );
        }
    }

    #[test]
    fn merge_matches_model(
        a in proptest::collection::btree_map(0..500u16, any::<u32>(), 0..200),
        b in proptest::collection::btree_map(0..500u16, any::<u32>(), 0..200),
    ) {
        let mut expected = a.clone();
        for (k, v) in &b {
            expected
                .entry(*k)
                .and_modify(|e: &mut u32| *e = e.wrapping_add(*v))
                .or_insert(*v);
        }

        let mut left: RbTree<u16, u32> = a.clone().into_iter().collect();
        let mut right: RbTree<u16, u32> = b.clone().into_iter().collect();
        left.merge_from(&mut right, |e, v| *e = e.wrapping_add(v));
        prop_assert!(right.is_empty());
        check_against(&left, &expected);

        let mut left: NilTree<u16, u32> = a.into_iter().collect();
        let mut right: NilTree<u16, u32> = b.into_iter().collect();
        left.merge_from(&mut right, |e, v| *e = e.wrapping_add(v));
        prop_assert!(right.is_empty());
        check_against(&left, &expected);
    }
);
