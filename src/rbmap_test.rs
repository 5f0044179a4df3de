use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;

use std::collections::BTreeMap;

fn keys_of<F>(index: &RbMap<u32, u32, F>) -> Vec<u32> {
    index.iter().map(|(k, _)| *k).collect()
}

fn walk_forward<K: Clone, V, F>(index: &RbMap<K, V, F>) -> Vec<K> {
    let mut keys = vec![];
    let mut node = index.first();
    while let Some(n) = node {
        keys.push(index.key(n).clone());
        node = index.next(n);
    }
    keys
}

fn walk_backward<K: Clone, V, F>(index: &RbMap<K, V, F>) -> Vec<K> {
    let mut keys = vec![];
    let mut node = index.last();
    while let Some(n) = node {
        keys.push(index.key(n).clone());
        node = index.prev(n);
    }
    keys
}

#[test]
fn test_rbmap_scenario() {
    let mut index: RbMap<u32, u32> = RbMap::new();
    for key in [5, 3, 8, 1, 4, 7, 9].iter() {
        assert!(index.insert(*key, key * 100));
        index.validate().unwrap();
    }

    assert_eq!(index.len(), 7);
    assert_eq!(*index.key(index.first().unwrap()), 1);
    assert_eq!(*index.key(index.last().unwrap()), 9);
    assert_eq!(walk_forward(&index), vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(walk_backward(&index), vec![9, 8, 7, 5, 4, 3, 1]);

    assert!(index.delete(&5));
    index.validate().unwrap();
    assert_eq!(index.find(&5), None);
    assert_eq!(index.find_node(&5), None);
    assert_eq!(index.len(), 6);
    assert_eq!(walk_forward(&index), vec![1, 3, 4, 7, 8, 9]);
    assert_eq!(index.find(&4), Some(&400));

    assert!(!index.delete(&5));
    assert_eq!(index.len(), 6);

    for key in [1, 9, 4, 3, 8, 7].iter() {
        assert!(index.delete(key));
        index.validate().unwrap();
    }
    assert!(index.is_empty());
    assert_eq!(index.first(), None);
    assert_eq!(index.last(), None);
}

#[test]
fn test_rbmap_empty() {
    let mut index: RbMap<u32, u32> = RbMap::default();
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.first(), None);
    assert_eq!(index.last(), None);
    assert_eq!(index.find(&1), None);
    assert_eq!(index.find_mut(&1), None);
    assert!(!index.delete(&1));
    assert_eq!(index.iter().next(), None);
    assert_eq!(index.iter().next_back(), None);
    index.validate().unwrap();
}

#[test]
fn test_rbmap_insert_existing() {
    let mut index: RbMap<u32, &str> = RbMap::new();
    for key in 0..32 {
        assert!(index.insert(key, "old"));
    }
    let node = index.find_node(&17).unwrap();
    let before: Vec<(u32, &str)> = index.iter().map(|(k, v)| (*k, *v)).collect();

    assert!(!index.insert(17, "new"));
    index.validate().unwrap();
    assert_eq!(index.len(), 32);
    assert_eq!(index.find(&17), Some(&"new"));
    // same node, updated in place.
    assert_eq!(index.find_node(&17), Some(node));
    assert_eq!(*index.value(node), "new");

    let after: Vec<(u32, &str)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.0, b.0);
        if a.0 != 17 {
            assert_eq!(a.1, b.1);
        }
    }
}

#[test]
fn test_rbmap_insert_keeps_key() {
    // keys compare equal on the first field only.
    let mut index = RbMap::with_less(|a: &(u32, u32), b: &(u32, u32)| a.0 < b.0);
    assert!(index.insert((1, 10), "a"));
    assert!(!index.insert((1, 20), "b"));

    let node = index.first().unwrap();
    assert_eq!(index.entry(node), (&(1, 10), &"b"));
    assert_eq!(index.find(&(1, 99)), Some(&"b"));
}

#[test]
fn test_rbmap_delete_reinsert() {
    let mut index: RbMap<u32, u32> = (0..1000).map(|k| (k, k)).collect();
    index.validate().unwrap();

    for key in (0..1000).step_by(3) {
        assert!(index.delete(&key));
        assert_eq!(index.find(&key), None);
    }
    index.validate().unwrap();

    for key in (0..1000).step_by(3) {
        assert!(index.insert(key, key + 1));
        assert_eq!(index.find(&key), Some(&(key + 1)));
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 1000);
    assert_eq!(keys_of(&index), (0..1000).collect::<Vec<u32>>());
}

#[test]
fn test_rbmap_find_mut() {
    let mut index: RbMap<u32, Vec<u32>> = RbMap::new();
    for key in 0..10 {
        index.insert(key, vec![]);
    }

    index.find_mut(&3).unwrap().push(30);
    let node = index.find_node(&4).unwrap();
    index.value_mut(node).push(40);

    assert_eq!(index.find(&3), Some(&vec![30]));
    assert_eq!(index.value(node), &vec![40]);
    assert_eq!(index.find(&5), Some(&vec![]));
    index.validate().unwrap();
}

#[test]
fn test_rbmap_custom_less() {
    let mut index = RbMap::with_less(|a: &String, b: &String| a.len() > b.len());
    for word in ["a", "bbb", "cc", "dddd", "xy"].iter() {
        index.insert(word.to_string(), ());
        index.validate().unwrap();
    }

    // "xy" is equal to "cc" under this ordering.
    assert_eq!(index.len(), 4);
    assert_eq!(walk_forward(&index), vec!["dddd", "bbb", "cc", "a"]);
    assert_eq!(walk_backward(&index), vec!["a", "cc", "bbb", "dddd"]);
    assert!(index.find_node(&"zz".to_string()).is_some());
    assert!(index.delete(&"qq".to_string()));
    assert_eq!(walk_forward(&index), vec!["dddd", "bbb", "a"]);
}

#[test]
fn test_rbmap_delete_node_relocate() {
    let mut index: RbMap<u32, u32> = (1..=15).map(|k| (k, k * 10)).collect();

    // find a node with two children, its predecessor moves into it.
    let node = index
        .iter()
        .map(|(k, _)| index.find_node(k).unwrap())
        .find(|n| {
            let tree = index.as_tree();
            tree.node(*n).left.is_some() && tree.node(*n).right.is_some()
        })
        .unwrap();
    let key = *index.key(node);
    let pred = index.prev(node).unwrap();
    let pred_key = *index.key(pred);

    assert_eq!(index.delete_node(node), (key, key * 10));
    index.validate().unwrap();
    assert_eq!(index.entry(node), (&pred_key, &(pred_key * 10)));
    assert_eq!(index.find_node(&pred_key), Some(node));
    assert_eq!(index.find_node(&key), None);
    assert_eq!(index.len(), 14);

    // a node with at most one child goes away on its own.
    let first = index.first().unwrap();
    let next = index.next(first).unwrap();
    let next_key = *index.key(next);
    assert_eq!(index.delete_node(first), (1, 10));
    assert_eq!(*index.key(next), next_key);
    assert_eq!(index.first(), Some(next));
}

#[test]
fn test_rbmap_walk_while_deleting() {
    // delete every other entry while stepping with handles.
    let mut index: RbMap<u32, u32> = (0..200).map(|k| (k, k)).collect();
    let mut node = index.first();
    while let Some(n) = node {
        // deleting `n` frees either `n` or its predecessor, never `next`.
        let next = index.next(n);
        if *index.key(n) % 2 == 1 {
            index.delete_node(n);
        }
        node = next;
    }
    index.validate().unwrap();
    assert_eq!(keys_of(&index), (0..200).step_by(2).collect::<Vec<u32>>());
}

#[test]
fn test_rbmap_fill_and_drain() {
    let seed: u64 = random();
    // let seed: u64 = 11371508230346226186;
    println!("test_rbmap_fill_and_drain {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let fill = |rng: &mut SmallRng| {
        let mut index: RbMap<u32, u32> = RbMap::new();
        let mut realsize = 0;
        for i in 0..100_000 {
            if index.insert(rng.gen::<u32>() % 100_000_000, i) {
                realsize += 1;
            }
            if i % 10_000 == 0 {
                index.validate().unwrap();
            }
        }
        index.validate().unwrap();
        assert_eq!(index.len(), realsize);
        index
    };

    let mut index = fill(&mut rng);
    let forward = walk_forward(&index);
    let mut backward = walk_backward(&index);
    backward.reverse();
    assert_eq!(forward.len(), index.len());
    assert!(forward.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(forward, backward);

    let mut n = 0;
    while let Some(node) = index.first() {
        let (key, _) = index.delete_node(node);
        assert_eq!(key, forward[n]);
        n += 1;
        if n % 10_000 == 0 {
            index.validate().unwrap();
        }
    }
    assert_eq!(n, forward.len());
    assert_eq!(index.len(), 0);
    index.validate().unwrap();

    let mut index = fill(&mut rng);
    while let Some(node) = index.last() {
        index.delete_node(node);
        if index.len() % 10_000 == 0 {
            index.validate().unwrap();
        }
    }
    assert_eq!(index.len(), 0);
    index.validate().unwrap();
}

#[test]
fn test_rbmap_every_step() {
    let seed: u64 = random();
    println!("test_rbmap_every_step {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut keys: Vec<u32> = (0..2000).collect();
    keys.shuffle(&mut rng);

    let mut index: RbMap<u32, u32> = RbMap::new();
    for key in keys.iter() {
        assert!(index.insert(*key, *key));
        index.validate().unwrap();
    }

    keys.shuffle(&mut rng);
    for (i, key) in keys.iter().enumerate() {
        assert!(index.delete(key));
        assert_eq!(index.find(key), None);
        assert_eq!(index.len(), keys.len() - i - 1);
        index.validate().unwrap();
    }
}

#[test]
fn test_rbmap_find_after_delete() {
    let seed: u64 = random();
    println!("test_rbmap_find_after_delete {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbMap<u32, u32> = RbMap::new();
    for i in 0..200_000 {
        index.insert(rng.gen::<u32>() % 100_000_000, i);
    }

    let mut picked = BTreeMap::new();
    let mut node = index.first();
    for _ in 0..20_000 {
        for _ in 0..rng.gen::<usize>() % 10 {
            node = node.and_then(|n| index.next(n));
        }
        match node {
            Some(n) => picked.insert(*index.key(n), ()),
            None => break,
        };
    }

    for key in picked.keys() {
        assert!(index.find(key).is_some());
        assert!(index.delete(key));
        assert!(index.find(key).is_none(), "key {} found after delete", key);
    }
    index.validate().unwrap();
}

#[test]
fn test_rbmap_clear() {
    let mut index: RbMap<u32, u32> = (0..100).map(|k| (k, k)).collect();
    index.clear();
    assert_eq!(index.len(), 0);
    assert_eq!(index.first(), None);
    index.validate().unwrap();

    index.extend((0..10).map(|k| (k, k)));
    assert_eq!(keys_of(&index), (0..10).collect::<Vec<u32>>());
    index.validate().unwrap();
}

#[test]
fn test_rbmap_iter() {
    let index: RbMap<u32, u32> = (0..10).map(|k| (k, k * 2)).collect();

    let mut iter = index.iter();
    assert_eq!(iter.len(), 10);
    assert_eq!(iter.next(), Some((&0, &0)));
    assert_eq!(iter.next_back(), Some((&9, &18)));
    assert_eq!(iter.len(), 8);
    let middle: Vec<u32> = iter.map(|(k, _)| *k).collect();
    assert_eq!(middle, (1..9).collect::<Vec<u32>>());

    let mut n = 0;
    for (key, value) in &index {
        assert_eq!(*value, key * 2);
        n += 1;
    }
    assert_eq!(n, 10);

    let rev: Vec<u32> = index.iter().rev().map(|(k, _)| *k).collect();
    assert_eq!(rev, (0..10).rev().collect::<Vec<u32>>());
}

#[test]
fn test_rbmap_debug() {
    let index: RbMap<u32, &str> = vec![(2, "two"), (1, "one")].into_iter().collect();
    assert_eq!(format!("{:?}", index), r#"{1: "one", 2: "two"}"#);
}

#[test]
fn test_rbmap() {
    let seed: u64 = random();
    // let seed: u64 = 4869524541429217113;
    println!("test_rbmap {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbMap<u8, u64> = RbMap::new();
    let mut btmap: BTreeMap<u8, u64> = BTreeMap::new();

    let mut counts = [0_usize; 13];

    for _i in 0..500_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u8, u64> = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            Op::Insert(key, val) => {
                counts[2] += 1;
                let is_new = index.insert(key, val);
                assert_eq!(is_new, btmap.insert(key, val).is_none(), "key {}", key);
            }
            Op::Delete(key) => {
                counts[3] += 1;
                assert_eq!(index.delete(&key), btmap.remove(&key).is_some(), "key {}", key);
            }
            Op::DeleteFirst => {
                counts[4] += 1;
                let a = index.first().map(|n| index.delete_node(n));
                let key = btmap.keys().next().cloned();
                let b = key.map(|k| (k, btmap.remove(&k).unwrap()));
                assert_eq!(a, b);
            }
            Op::DeleteLast => {
                counts[5] += 1;
                let a = index.last().map(|n| index.delete_node(n));
                let key = btmap.keys().next_back().cloned();
                let b = key.map(|k| (k, btmap.remove(&k).unwrap()));
                assert_eq!(a, b);
            }
            Op::Validate => {
                counts[6] += 1;
                index.validate().unwrap();
            }
            Op::Find(key) => {
                counts[7] += 1;
                assert_eq!(index.find(&key), btmap.get(&key), "key {}", key);
            }
            Op::FindMut(key, val) => {
                counts[8] += 1;
                match (index.find_mut(&key), btmap.get_mut(&key)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => {
                        assert_eq!(v, r, "key {}", key);
                        *v = val;
                        *r = val;
                    }
                    (None, Some(_)) => panic!("find_mut no key {} in rbmap", key),
                    (Some(_), None) => panic!("find_mut no key {} in btree", key),
                }
            }
            Op::Iter => {
                counts[9] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b);
            }
            Op::Reverse => {
                counts[10] += 1;
                let a: Vec<u8> = walk_backward(&index);
                let b: Vec<u8> = btmap.keys().rev().cloned().collect();
                assert_eq!(a, b);
            }
            Op::Walk(key) => {
                counts[11] += 1;
                let a = index.find_node(&key).map(|n| {
                    let next = index.next(n).map(|n| *index.key(n));
                    let prev = index.prev(n).map(|n| *index.key(n));
                    (prev, next)
                });
                let b = btmap.get(&key).map(|_| {
                    let next = btmap.range(key..).nth(1).map(|(k, _)| *k);
                    let prev = btmap.range(..key).next_back().map(|(k, _)| *k);
                    (prev, next)
                });
                assert_eq!(a, b, "walk {}", key);
            }
            Op::Extend(items) => {
                counts[12] += 1;
                index.extend(items.clone());
                btmap.extend(items.clone())
            }
        }
    }

    index.validate().unwrap();
    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, b);

    println!("counts {:?} len:{}/{}", counts, index.len(), btmap.len());
}

#[derive(Debug, Arbitrary)]
enum Op<K, V> {
    Len,
    IsEmpty,
    Insert(K, V),
    Delete(K),
    DeleteFirst,
    DeleteLast,
    Validate,
    Find(K),
    FindMut(K, V),
    Iter,
    Reverse,
    Walk(K),
    Extend(Vec<(K, V)>),
}
