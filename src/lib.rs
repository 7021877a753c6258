use std::ops::Range;

pub mod enumerate;
pub mod parent;

/// =============== 階乗テーブル ===============
/// 0!..20! を u64 で保持。21! は u64 に収まらないため 20 が上限。
/// 起動時に一度だけ構築し、使う側へは参照で渡す（グローバル状態にはしない）。

pub const MAX_FACTORIAL: usize = 20;

#[derive(Debug, Clone)]
pub struct Factorials([u64; MAX_FACTORIAL + 1]);

impl Factorials {
    pub fn new() -> Self {
        let mut table = [1u64; MAX_FACTORIAL + 1];
        for i in 1..=MAX_FACTORIAL {
            table[i] = table[i - 1] * i as u64;
        }
        Factorials(table)
    }

    /// n! を返す。n <= 20 のみ。
    pub fn get(&self, n: usize) -> u64 {
        self.0[n]
    }
}

impl Default for Factorials {
    fn default() -> Self {
        Self::new()
    }
}

/// =============== 順列プリミティブ ===============
/// 順列は {1..n} の値を一度ずつ並べた Vec<usize>。index 0 が左端。

pub fn identity(n: usize) -> Vec<usize> {
    (1..=n).collect()
}

pub fn is_permutation(v: &[usize]) -> bool {
    let mut sorted = v.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &x)| x == i + 1)
}

/// 右端の「乱れ」：v[i] != i+1 となる最大の i。恒等順列なら None。
pub fn r_index(v: &[usize]) -> Option<usize> {
    (0..v.len()).rev().find(|&i| v[i] != i + 1)
}

/// 値 x をその右隣の値と交換した順列を返す。
/// x が末尾にある呼び出しは契約違反（有効な入力では起きない）なので panic する。
pub fn swap_elem(v: &[usize], x: usize) -> Vec<usize> {
    let mut w = v.to_vec();
    let i = w
        .iter()
        .position(|&y| y == x)
        .unwrap_or_else(|| panic!("swap_elem: {} not in {:?}", x, v));
    assert!(
        i + 1 < w.len(),
        "swap_elem: {} is the last element of {:?}",
        x,
        v
    );
    w.swap(i, i + 1);
    w
}

/// =============== unrank（factoradic 復号） ===============
/// idx を階乗進法の桁に分解し、残っている値の中から sel 番目を順に取り出す。
/// [0, n!-1] と n 次の順列全体との間の全単射。逆方向（rank）は不要。

pub fn unrank(idx: u64, n: usize, facts: &Factorials) -> Vec<usize> {
    debug_assert!(idx < facts.get(n), "unrank: idx {} out of range for n = {}", idx, n);
    let mut elements: Vec<usize> = (1..=n).collect();
    let mut result = Vec::with_capacity(n);
    let mut remain = idx;
    for pos in 0..n {
        let f = facts.get(n - 1 - pos);
        let sel = (remain / f) as usize;
        // Vec::remove の詰め直しで O(n^2)。n <= 12 なので十分。
        result.push(elements.remove(sel));
        remain %= f;
    }
    result
}

/// =============== ブロック分割 ===============
/// [0, total) を workers 個の連続区間に分ける。total % workers 個の先頭ブロック
/// だけ 1 つ長い。重複も欠けもないことが並列カウントの前提。

pub fn block_ranges(total: u64, workers: usize) -> Vec<Range<u64>> {
    assert!(workers > 0, "block_ranges: workers must be positive");
    let base = total / workers as u64;
    let rem = total % workers as u64;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0u64;
    for w in 0..workers as u64 {
        let len = if w < rem { base + 1 } else { base };
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}
