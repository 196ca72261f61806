use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Included, Unbounded};

use super::AvlTreeSet;

const N: i32 = 1_000;
const LARGE_N: i32 = 10_000_000;

fn random_values(n: i32, seed: u64) -> Vec<i32> {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..n * 4)).collect()
}

#[test]
fn test_new() {
    let set_i32 = AvlTreeSet::<i32>::new();
    assert!(set_i32.is_empty());
    assert!(set_i32.begin() == set_i32.end());
    set_i32.check_consistency();

    let set_i8 = AvlTreeSet::<i8>::new();
    assert!(set_i8.is_empty());
    set_i8.check_consistency();

    let set_string = AvlTreeSet::<String>::new();
    assert!(set_string.is_empty());
    assert_eq!(set_string.len(), 0);
    set_string.check_consistency();
}

#[test]
fn test_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let set: AvlTreeSet<_> = [3, 2, 1].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut set: AvlTreeSet<_> = [3, 2, 4, 1].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&4);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let set: AvlTreeSet<_> = [3, 1, 2].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut set: AvlTreeSet<_> = [3, 1, 4, 2].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&4);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let set: AvlTreeSet<_> = [1, 2, 3].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut set: AvlTreeSet<_> = [1, 0, 2, 3].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&0);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let set: AvlTreeSet<_> = [1, 3, 2].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut set: AvlTreeSet<_> = [1, 0, 3, 2].into_iter().collect();
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&0);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
}

#[test]
fn test_remove_rotates_on_several_levels() {
    // Minimal AVL tree of height 5 (a Fibonacci tree): removing 12
    // rotates at 11 first and then again at the root.
    let mut set: AvlTreeSet<_> = [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]
        .into_iter()
        .collect();
    set.check_consistency();
    assert_eq!(set.height(), 5);

    set.remove(&12);
    set.check_consistency();
    assert_eq!(set.height(), 4);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), (1..=11).collect::<Vec<_>>());
}

#[test]
fn test_remove_node_with_two_children() {
    {
        // Successor is the right child
        let mut set: AvlTreeSet<_> = [2, 1, 3].into_iter().collect();
        assert!(set.remove(&2));
        set.check_consistency();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3]);
    }
    {
        // Successor sits deeper in the right subtree and has a right child
        //       5               6
        //     /   \           /   \
        //    3     8    ->   3     8
        //   / \   / \       / \   / \
        //  2   4 6   9     2   4 7   9
        // /       \       /
        // 1        7     1
        let mut set: AvlTreeSet<_> = [5, 3, 8, 2, 4, 6, 9, 7, 1].into_iter().collect();
        set.check_consistency();
        assert!(set.remove(&5));
        set.check_consistency();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(set.select(4).get(), Some(&6));
    }
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut set = AvlTreeSet::new();
    for value in &values {
        let len = set.len();
        assert_eq!(set.insert(*value).get(), Some(value));
        assert_eq!(set.len(), len + 1);
        set.check_consistency();
    }
    assert!(set.len() == values.len());

    for value in &values {
        assert_eq!(set.insert(*value).get(), Some(value));
    }
    assert!(set.len() == values.len());
    set.check_consistency();
}

#[test]
fn test_insert_sorted_range() {
    let mut set = AvlTreeSet::new();
    for value in 0..N {
        set.insert(value);
        set.check_consistency();
    }
    assert!(set.len() == N as usize);
    assert!(set.height() > 0);
    // AVL height is below 1.45 * log2(n + 2)
    assert!(set.height() <= 15);
    assert!(set.get(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
        set.check_consistency();
    }
    assert!(set.len() == values.len());

    for value in &values {
        set.insert(*value);
    }
    assert!(set.len() == values.len());
    assert!(set.get(&-42).is_none());
}

#[test]
fn test_get() {
    let values = random_values(N, 0);

    let mut set = AvlTreeSet::<i32>::new();
    assert!(set.get(&-42).is_none());
    for value in &values {
        set.insert(*value);
    }

    for value in &values {
        assert_eq!(set.get(value), Some(value));
        assert!(set.contains(value));
        assert!(!set.find(value).is_end());
    }
    assert!(set.find(&-1).is_end());
    assert!(set.find(&-1) == set.end());
}

#[test]
fn test_borrowed_lookup() {
    let mut set = AvlTreeSet::new();
    set.insert(String::from("DON'T"));
    set.insert(String::from("PANIC"));
    set.check_consistency();

    assert_eq!(set.begin().get().map(String::as_str), Some("DON'T"));
    assert!(set.contains("PANIC"));
    assert_eq!(set.upper_bound("DON'T").get().map(String::as_str), Some("PANIC"));
    assert!(set.remove("PANIC"));
    assert!(set.find("PANIC").is_end());
}

#[test]
fn test_clear() {
    let values = random_values(N, 1);

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
    }
    assert!(!set.is_empty());

    set.clear();
    assert!(set.is_empty());
    assert!(set.len() == 0);
    assert!(set.begin() == set.end());
    set.check_consistency();

    for value in &values {
        set.insert(*value);
    }
    assert!(!set.is_empty());
    set.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut set: AvlTreeSet<_> = values.iter().copied().collect();

    values.shuffle(&mut rng);
    for value in &values {
        assert!(set.get(value).is_some());
        assert!(set.remove(value));
        assert!(set.get(value).is_none());
        assert!(!set.remove(value));
        set.check_consistency();
    }
    assert!(set.is_empty());
    assert!(set.len() == 0);
}

#[test]
fn test_take() {
    let mut set: AvlTreeSet<_> = (0..10).map(|v| v.to_string()).collect();
    assert_eq!(set.take("3"), Some(String::from("3")));
    assert_eq!(set.take("3"), None);
    assert_eq!(set.len(), 9);
    set.check_consistency();
}

#[test]
fn test_iter() {
    let values = random_values(N, 2);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: BTreeSet<_> = values.iter().copied().collect();

    assert_eq!(set.iter().len(), expected.len());
    assert!(set.iter().eq(expected.iter()));
    assert!(set.iter().rev().eq(expected.iter().rev()));
    assert!((&set).into_iter().eq(expected.iter()));

    // Meeting in the middle yields every value exactly once
    let mut iter = set.iter();
    let mut front = Vec::new();
    let mut back = Vec::new();
    loop {
        match (iter.next(), iter.next_back()) {
            (Some(a), Some(b)) => {
                front.push(*a);
                back.push(*b);
            }
            (Some(a), None) => front.push(*a),
            (None, _) => break,
        }
    }
    front.extend(back.into_iter().rev());
    assert!(front.iter().eq(expected.iter()));
}

#[test]
fn test_into_iter() {
    let values = random_values(N, 3);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: BTreeSet<_> = values.iter().copied().collect();

    assert!(set.clone().into_iter().eq(expected.iter().copied()));
    assert!(set.into_iter().rev().eq(expected.iter().rev().copied()));
}

#[test]
fn test_cursor() {
    let values = random_values(N, 4);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: Vec<_> = values
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cursor = set.begin();
    for value in &expected {
        assert_eq!(cursor.get(), Some(value));
        cursor.move_next();
    }
    assert!(cursor == set.end());
    assert!(cursor.get().is_none());

    for value in expected.iter().rev() {
        cursor.move_prev();
        assert_eq!(cursor.get(), Some(value));
    }
    assert!(cursor == set.begin());
}

#[test]
fn test_bounds() {
    let values = random_values(N, 5);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: BTreeSet<_> = values.iter().copied().collect();

    for probe in -1..=N * 4 {
        let upper = expected.range((Excluded(probe), Unbounded)).next();
        assert_eq!(set.upper_bound(&probe).get(), upper);
        let lower = expected.range((Included(probe), Unbounded)).next();
        assert_eq!(set.lower_bound(&probe).get(), lower);
    }
    assert!(set.upper_bound(&(N * 4)).is_end());
}

#[test]
fn test_rank_and_select() {
    let values = random_values(N, 6);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: Vec<_> = values
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    for (index, value) in expected.iter().enumerate() {
        assert_eq!(set.find(value).rank(), index);
        assert_eq!(set.rank(value), index);
        assert_eq!(set.select(index).get(), Some(value));
    }
    assert_eq!(set.end().rank(), set.len());
    assert!(set.select(set.len()).is_end());
    assert_eq!(set.rank(&-1), 0);
    assert_eq!(set.rank(&(N * 4)), set.len());
}

#[test]
fn test_cursor_mut_remove_current() {
    let mut set: AvlTreeSet<_> = (0..100).collect();

    // Remove every even value in one sweep
    let mut cursor = set.begin_mut();
    while let Some(&value) = cursor.get() {
        if value % 2 == 0 {
            assert_eq!(cursor.remove_current(), Some(value));
        } else {
            cursor.move_next();
        }
    }
    assert!(cursor.is_end());
    assert_eq!(cursor.remove_current(), None);
    assert_eq!(cursor.rank(), 50);

    set.check_consistency();
    assert!(set.iter().copied().eq((0..100).filter(|v| v % 2 == 1)));

    let mut cursor = set.find_mut(&51);
    assert_eq!(cursor.rank(), 25);
    assert_eq!(cursor.remove_current(), Some(51));
    assert_eq!(cursor.get(), Some(&53));
    cursor.move_prev();
    assert_eq!(cursor.get(), Some(&49));
    set.check_consistency();
}

#[test]
fn test_first_last_pop() {
    let mut set: AvlTreeSet<_> = [5, 1, 9, 3, 7].into_iter().collect();
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&9));
    assert_eq!(set.pop_first(), Some(1));
    assert_eq!(set.pop_last(), Some(9));
    set.check_consistency();
    assert_eq!(set.first(), Some(&3));
    assert_eq!(set.last(), Some(&7));

    let mut empty = AvlTreeSet::<i32>::new();
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
    assert_eq!(empty.pop_first(), None);
    assert_eq!(empty.pop_last(), None);
}

#[test]
fn test_range() {
    let values = random_values(N, 7);
    let set: AvlTreeSet<_> = values.iter().copied().collect();
    let expected: BTreeSet<_> = values.iter().copied().collect();

    for (start, end) in [(0, N), (17, 18), (100, 100), (N * 2, N * 5), (-5, 3)] {
        assert!(set.range(start..end).eq(expected.range(start..end)));
        assert!(set.range(start..=end).eq(expected.range(start..=end)));
        assert!(set.range(start..=end).rev().eq(expected.range(start..=end).rev()));
        assert!(set
            .range((Excluded(start), Included(end)))
            .eq(expected.range((Excluded(start), Included(end)))));
    }
    assert!(set.range::<i32, _>(..).eq(expected.iter()));
    assert!(set.range(..N).eq(expected.range(..N)));
    assert!(set.range(N..).eq(expected.range(N..)));

    let small: AvlTreeSet<_> = [1, 10].into_iter().collect();
    assert_eq!(small.range(5..6).next(), None);
    assert_eq!(small.range(5..6).next_back(), None);
}

#[test]
#[should_panic(expected = "range start is greater than range end")]
fn test_range_inverted() {
    let set: AvlTreeSet<_> = (0..10).collect();
    set.range(5..2);
}

#[test]
fn test_clone() {
    let original: AvlTreeSet<_> = [42, 43, 44].into_iter().collect();
    let mut copy = original.clone();
    copy.check_consistency();
    assert_eq!(copy, original);

    copy.insert(45);
    assert!(original.find(&45) == original.end());
    assert!(copy.find(&45) != copy.end());
    assert_ne!(copy, original);

    copy.remove(&42);
    assert!(original.contains(&42));
    original.check_consistency();
    copy.check_consistency();

    let values = random_values(N, 8);
    let large: AvlTreeSet<_> = values.into_iter().collect();
    let large_copy = large.clone();
    large_copy.check_consistency();
    assert_eq!(large_copy.height(), large.height());
    assert!(large_copy.iter().eq(large.iter()));
}

#[test]
fn test_move() {
    let mut src: AvlTreeSet<_> = [42, 43, 44].into_iter().collect();
    let dest = std::mem::take(&mut src);

    for value in [42, 43, 44] {
        assert!(src.find(&value) == src.end());
        assert!(dest.find(&value) != dest.end());
    }
    assert!(src.is_empty());
    src.check_consistency();
    dest.check_consistency();

    // The moved-from set stays usable
    src.insert(1);
    assert_eq!(src.len(), 1);
    src.check_consistency();
}

#[test]
fn test_append() {
    let mut a: AvlTreeSet<_> = (0..10).collect();
    let mut b: AvlTreeSet<_> = (5..20).collect();
    a.append(&mut b);
    assert!(b.is_empty());
    assert!(a.iter().copied().eq(0..20));
    a.check_consistency();

    let mut empty = AvlTreeSet::new();
    empty.append(&mut a);
    assert!(a.is_empty());
    assert_eq!(empty.len(), 20);
    empty.check_consistency();
}

#[test]
fn test_extend_and_debug() {
    let mut set = AvlTreeSet::<i32>::new();
    set.extend([3, 1, 2]);
    set.extend(&[2, 5]);
    assert_eq!(format!("{:?}", set), "{1, 2, 3, 5}");
    assert_eq!(format!("{:?}", set.find(&2)), "Cursor(Some(2))");
    assert_eq!(format!("{:?}", set.end()), "Cursor(None)");
    assert_eq!(format!("{:?}", set.range(2..)), "[2, 3, 5]");
}

#[test]
fn test_mixed_operations() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(9);
    let mut set = AvlTreeSet::new();
    let mut expected = BTreeSet::new();
    for _ in 0..N * 5 {
        let value = rng.gen_range(0..N / 4);
        if rng.gen_bool(0.6) {
            set.insert(value);
            expected.insert(value);
        } else {
            assert_eq!(set.remove(&value), expected.remove(&value));
        }
        assert_eq!(set.len(), expected.len());
        assert_eq!(set.first(), expected.iter().next());
    }
    set.check_consistency();
    assert!(set.iter().eq(expected.iter()));
}

mod property_based {
    use super::AvlTreeSet;

    proptest::proptest! {
        #[test]
        fn test_invariants_hold(
            inserts in proptest::collection::vec(0..200i32, 0..200),
            removes in proptest::collection::vec(0..200i32, 0..200),
        ) {
            let mut set = AvlTreeSet::new();
            for value in &inserts {
                set.insert(*value);
            }
            set.check_consistency();
            for value in &removes {
                set.remove(value);
                set.check_consistency();
            }
        }
    }
}

#[test]
#[ignore]
fn test_large() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
    }
    set.check_consistency();

    values.shuffle(&mut rng);
    values.resize(values.len() / 2, 0);
    for value in &values {
        set.remove(value);
    }
    set.check_consistency();
}
