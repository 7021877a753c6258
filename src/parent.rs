use crate::{identity, r_index, swap_elem};

/// Named predicates for the case dispatch of Parent1 (Algorithm 1).
/// Priority order is LastIsMax, MaxPairAtEnd, LastIsTree, Direct; the first
/// matching case wins, so the variants are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentCase {
  /// v ends with the symbol n.
  LastIsMax,
  /// v ends with (n, n-1) and moving n right does not give the identity.
  MaxPairAtEnd,
  /// v ends with the tree index t.
  LastIsTree,
  /// No special case applies.
  Direct,
}

/// Which branch of Parent1 applies to (v, t). Split out from `parent` so the
/// priority order stays auditable and each branch testable on its own.
pub fn classify(v: &[usize], t: usize, n: usize) -> ParentCase {
  if v[n - 1] == n {
    ParentCase::LastIsMax
  } else if v[n - 1] == n - 1 && v[n - 2] == n && swap_elem(v, n) != identity(n) {
    ParentCase::MaxPairAtEnd
  } else if v[n - 1] == t {
    ParentCase::LastIsTree
  } else {
    ParentCase::Direct
  }
}

/// FindPosition from Algorithm 1. Only reached from the LastIsMax case with
/// t != n-1; resolves which value to move when several candidates would
/// otherwise collide between trees.
fn find_position(v: &[usize], t: usize, n: usize) -> Vec<usize> {
  // Rule (1.1)
  if t == 2 && swap_elem(v, t) == identity(n) {
    return swap_elem(v, t - 1);
  }
  // Rule (1.2)
  if v[n - 2] == t || v[n - 2] == n - 1 {
    let j = r_index(v).expect("find_position called on the identity");
    return swap_elem(v, v[j]);
  }
  // Rule (1.3)
  swap_elem(v, t)
}

/// Parent1 from Algorithm 1: the parent of v in spanning tree t over the
/// permutation graph, always exactly one adjacent transposition away from v.
/// The identity is the root of every tree and has no parent; callers must
/// never pass it in.
pub fn parent(v: &[usize], t: usize, n: usize) -> Vec<usize> {
  debug_assert_eq!(v.len(), n);
  debug_assert!((1..n).contains(&t), "tree index {} out of [1, {})", t, n);
  debug_assert!(v != identity(n), "parent of the root is undefined");

  match classify(v, t, n) {
    ParentCase::LastIsMax => {
      if t != n - 1 {
        find_position(v, t, n)
      } else {
        swap_elem(v, v[n - 2])
      }
    }
    ParentCase::MaxPairAtEnd => {
      if t == 1 {
        swap_elem(v, n)
      } else {
        swap_elem(v, t - 1)
      }
    }
    ParentCase::LastIsTree => swap_elem(v, n),
    ParentCase::Direct => swap_elem(v, t),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Factorials;
  use itertools::Itertools;

  /// True iff b is a with exactly one pair of neighboring entries exchanged.
  fn is_adjacent_transposition(a: &[usize], b: &[usize]) -> bool {
    let diff: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
    diff.len() == 2
      && diff[1] == diff[0] + 1
      && a[diff[0]] == b[diff[1]]
      && a[diff[1]] == b[diff[0]]
  }

  #[test]
  fn classify_picks_cases_in_priority_order() {
    // ends with n
    assert_eq!(classify(&[2, 1, 3, 4], 1, 4), ParentCase::LastIsMax);
    // ends with (n, n-1), and moving 4 right does not restore the identity
    assert_eq!(classify(&[2, 1, 4, 3], 2, 4), ParentCase::MaxPairAtEnd);
    // ends with (n, n-1) but moving n right gives the identity: falls through
    assert_eq!(classify(&[1, 2, 4, 3], 3, 4), ParentCase::LastIsTree);
    // ends with t
    assert_eq!(classify(&[3, 4, 2, 1], 1, 4), ParentCase::LastIsTree);
    // nothing special
    assert_eq!(classify(&[3, 4, 1, 2], 1, 4), ParentCase::Direct);
  }

  #[test]
  fn parent_known_values_n4() {
    assert_eq!(parent(&[2, 1, 3, 4], 1, 4), vec![2, 3, 1, 4]);
    assert_eq!(parent(&[1, 2, 4, 3], 3, 4), vec![1, 2, 3, 4]);
    assert_eq!(parent(&[4, 3, 2, 1], 2, 4), vec![4, 3, 1, 2]);
    assert_eq!(parent(&[2, 3, 4, 1], 1, 4), vec![2, 3, 1, 4]);
    assert_eq!(parent(&[1, 3, 2, 4], 2, 4), vec![1, 3, 4, 2]);
  }

  #[test]
  fn parent_full_table_n3() {
    let cases: &[(&[usize], [&[usize]; 2])] = &[
      (&[1, 3, 2], [&[3, 1, 2], &[1, 2, 3]]),
      (&[2, 1, 3], [&[2, 3, 1], &[2, 3, 1]]),
      (&[2, 3, 1], [&[2, 1, 3], &[3, 2, 1]]),
      (&[3, 1, 2], [&[3, 2, 1], &[1, 3, 2]]),
      (&[3, 2, 1], [&[2, 3, 1], &[3, 1, 2]]),
    ];
    for (v, parents) in cases {
      for t in 1..=2 {
        assert_eq!(parent(v, t, 3), parents[t - 1], "v = {:?}, t = {}", v, t);
      }
    }
  }

  #[test]
  fn parent_is_always_an_adjacent_transposition() {
    for n in 3..=6 {
      let root = identity(n);
      for v in (1..=n).permutations(n) {
        if v == root {
          continue;
        }
        for t in 1..n {
          let p = parent(&v, t, n);
          assert!(
            is_adjacent_transposition(&v, &p),
            "v = {:?}, t = {}, parent = {:?}",
            v,
            t,
            p
          );
        }
      }
    }
  }

  /// Following parent pointers from every vertex reaches the root without
  /// revisiting a vertex. The published rule only yields this for the last
  /// tree of small dimensions; those are the chains we pin down.
  #[test]
  fn last_tree_reaches_root_for_small_n() {
    let facts = Factorials::new();
    for (n, t) in [(3usize, 2usize), (4, 3)] {
      let root = identity(n);
      let total = facts.get(n);
      for v in (1..=n).permutations(n) {
        if v == root {
          continue;
        }
        let mut cur = v.clone();
        let mut steps = 0u64;
        while cur != root {
          cur = parent(&cur, t, n);
          steps += 1;
          assert!(steps < total, "cycle from {:?} in tree {}", v, t);
        }
      }
    }
  }

  #[test]
  fn walk_to_root_example_n3_tree2() {
    // (2,1,3) -> (2,3,1) -> (3,2,1) -> (3,1,2) -> (1,3,2) -> (1,2,3)
    let hops: [&[usize]; 6] = [
      &[2, 1, 3],
      &[2, 3, 1],
      &[3, 2, 1],
      &[3, 1, 2],
      &[1, 3, 2],
      &[1, 2, 3],
    ];
    for w in hops.windows(2) {
      assert_eq!(parent(w[0], 2, 3), w[1]);
    }
  }
}
