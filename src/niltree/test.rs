use super::{Link, NilTree};
use crate::rbtree::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn build(keys: &[u32]) -> NilTree<u32, u32> {
    let mut t = NilTree::default();
    for &k in keys {
        assert!(t.try_add(k, k * 10));
    }
    t
}

#[test]
fn first_insert_is_a_black_root() {
    let t = build(&[1]);
    let root = t.root().unwrap();
    assert_eq!(root.color(), Color::Black);
    assert_eq!(root.link(), Link::Node(0));
    assert_eq!(root.parent(), None);
    assert_eq!(t.render(false), "[B] 1\n");
}

#[test]
fn insert_recolors_and_rotates() {
    let t = build(&[7, 3, 8, 2, 5, 4]);
    assert_eq!(
        t.render(false),
        "[B] 7\n  [R] 3\n    [B] 2\n    [B] 5\n      [R] 4\n      [B] <nil>\n  [B] 8\n"
    );
}

#[test]
fn remove_red_leaf_then_black_leaf() {
    let mut t = build(&[7, 3, 8, 2, 5, 4]);
    assert_eq!(t.remove_entry(&4), Some((4, 40)));
    assert_eq!(t.remove_entry(&5), Some((5, 50)));
    assert_eq!(t.len(), 4);
    assert_eq!(
        t.render(false),
        "[B] 7\n  [B] 3\n    [R] 2\n    [B] <nil>\n  [B] 8\n"
    );
}

#[test]
fn remove_black_leaf_red_parent() {
    for keys in [[7, 3, 8, 2, 5, 1], [7, 3, 8, 1, 5, 2]] {
        let mut t = build(&keys);
        t.remove_entry(&5);
        assert_eq!(
            t.render(false),
            "[B] 7\n  [R] 2\n    [B] 1\n    [B] 3\n  [B] 8\n",
            "inserted {:?}",
            keys
        );
    }
}

#[test]
fn remove_with_red_sibling() {
    let mut t = build(&[7, 3, 8, 2, 5, 1, 4, 6]);
    t.remove_entry(&8);
    assert_eq!(
        t.render(false),
        "[B] 3\n  [B] 2\n    [R] 1\n    [B] <nil>\n  [R] 5\n    [B] 4\n    [B] 7\n      [R] 6\n      [B] <nil>\n"
    );
}

#[test]
fn inner_removal_moves_successor_into_slot() {
    let mut t = build(&[2, 1, 3]);
    assert_eq!(t.remove_entry(&2), Some((2, 20)));

    let root = t.root().unwrap();
    assert_eq!(root.key(), &3);
    assert_eq!(root.link(), Link::Node(0));
    assert_eq!(t.render(false), "[B] 3\n  [R] 1\n  [B] <nil>\n");

    // The successor's old slot is the first one handed out again.
    t.set(4, 40);
    assert_eq!(t.node(&4).unwrap().link(), Link::Node(2));
    assert_eq!(t.slots(), 3);
}

#[test]
fn freed_slots_are_reused() {
    let mut t = build(&(0..64).collect::<Vec<_>>());
    for k in (0..64).step_by(2) {
        t.remove_entry(&k);
    }
    for k in 100..132 {
        t.set(k, k);
    }
    assert_eq!(t.len(), 64);
    assert_eq!(t.slots(), 64);
}

#[test]
fn verbose_render_names_slots() {
    let t = build(&[2, 1]);
    assert_eq!(
        t.render(true),
        "[B] 2 = 20 @0\n  [R] 1 = 10 @1 (parent @0)\n  [B] <nil>\n"
    );
    assert_eq!(NilTree::<u8, u8>::default().render(true), "<empty>\n");
}

#[test]
fn height_matches_shape() {
    assert_eq!(NilTree::<u8, u8>::default().height(), 0);
    assert_eq!(build(&[7, 3, 8, 2, 5, 4]).height(), 4);

    let mut t = NilTree::<u32, ()>::default();
    for i in 0..1023 {
        t.set(i, ());
    }
    let bound = 2.0 * ((t.len() + 1) as f64).log2();
    assert!(t.height() as f64 <= bound);
}

#[test]
fn random_mutations_match_btree() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut model = BTreeMap::new();
    let mut t = NilTree::<u16, u32>::default();

    for step in 0..4000u32 {
        let key = rng.gen_range(0..512u16);
        if rng.gen_bool(0.6) {
            assert_eq!(t.set(key, step), model.insert(key, step));
        } else {
            assert_eq!(t.remove_entry(&key), model.remove_entry(&key));
        }
        assert_eq!(t.len(), model.len());
    }

    assert!(t.iter().eq(model.iter()));
    assert!(t.iter().rev().eq(model.iter().rev()));
}

#[test]
fn merge_moves_without_cloning() {
    #[derive(Debug, PartialEq)]
    struct Token(u32);

    let mut a = NilTree::<u32, Token>::default();
    let mut b = NilTree::<u32, Token>::default();
    for i in 0..10 {
        a.set(i * 2, Token(i));
        b.set(i * 3, Token(i));
    }

    let mut collisions = 0;
    a.merge_from(&mut b, |existing, incoming| {
        collisions += 1;
        existing.0 += incoming.0 * 100;
    });

    // 0, 6, 12 and 18 are in both.
    assert_eq!(collisions, 4);
    assert!(b.is_empty());
    assert_eq!(b.slots(), 0);
    assert_eq!(a.len(), 16);
    assert_eq!(a.try_get(&6), Some(&Token(3 + 200)));
    assert_eq!(a.try_get(&27), Some(&Token(9)));
    assert_eq!(a.validate(), Ok(()));
}

#[test]
fn clear_forgets_slots() {
    let mut t = build(&[1, 2, 3]);
    t.clear();
    assert!(t.is_empty());
    assert_eq!(t.slots(), 0);
    assert!(t.root().is_none());
    assert_eq!(t.validate(), Ok(()));
}

#[test]
fn node_handles_navigate() {
    let t = build(&[50, 20, 80, 10, 30]);
    let n = t.node(&30).unwrap();
    assert_eq!(n.prev().unwrap().key(), &20);
    assert_eq!(n.next().unwrap().key(), &50);
    assert_eq!(t.first_node().unwrap().key(), &10);
    assert_eq!(t.last_node().unwrap().prev().unwrap().key(), &50);
    assert!(t.last_node().unwrap().next().is_none());
}

#[test]
fn values_mut_follow_key_order() {
    let mut t: NilTree<u32, u32> = [5, 3, 9, 1].iter().map(|&k| (k, 0)).collect();
    for (rank, v) in t.values_mut().enumerate() {
        *v = rank as u32;
    }
    assert_eq!(
        t.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        vec![(1, 0), (3, 1), (5, 2), (9, 3)]
    );
}

mod corrupted {
    use super::build;
    use crate::error::Violation;
    use crate::niltree::{Link, NilTree};
    use crate::rbtree::Color;

    // 7B (3R (2B, 5B (4R, nil)), 8B)
    fn tree() -> NilTree<u32, u32> {
        build(&[7, 3, 8, 2, 5, 4])
    }

    fn slot(t: &NilTree<u32, u32>, key: u32) -> usize {
        t.find(&key).unwrap()
    }

    #[test]
    fn intact_tree_passes() {
        assert_eq!(tree().validate(), Ok(()));
    }

    #[test]
    fn red_root() {
        let mut t = tree();
        let id = slot(&t, 7);
        t.arena.node_mut(id).color = Color::Red;
        assert_eq!(t.validate(), Err(Violation::RedRoot));
    }

    #[test]
    fn red_child_of_red() {
        let mut t = tree();
        let id = slot(&t, 2);
        t.arena.node_mut(id).color = Color::Red;
        assert_eq!(t.validate(), Err(Violation::RedRed));
    }

    #[test]
    fn uneven_black_height() {
        let mut t = tree();
        let id = slot(&t, 8);
        t.arena.node_mut(id).color = Color::Red;
        assert_eq!(t.validate(), Err(Violation::BlackHeight));
    }

    #[test]
    fn keys_out_of_order() {
        let mut t = tree();
        let id = slot(&t, 4);
        t.arena.node_mut(id).key = 6;
        assert_eq!(t.validate(), Err(Violation::Order));
    }

    #[test]
    fn wrong_parent() {
        let mut t = tree();
        let id = slot(&t, 4);
        let root = t.arena.root;
        t.arena.node_mut(id).parent = root;
        assert_eq!(t.validate(), Err(Violation::Parent));
    }

    #[test]
    fn stale_length() {
        let mut t = tree();
        t.len += 1;
        assert_eq!(
            t.validate(),
            Err(Violation::Count {
                expected: 7,
                found: 6
            })
        );
    }

    #[test]
    fn unreachable_slot() {
        let mut t = tree();
        let id = slot(&t, 4);
        let parent = slot(&t, 5);
        t.arena.node_mut(parent).left = Link::Nil;
        t.arena.node_mut(id).parent = Link::Nil;
        assert_eq!(
            t.validate(),
            Err(Violation::Count {
                expected: 6,
                found: 5
            })
        );
    }
}
