use std::ops::Range;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::{Factorials, block_ranges, identity, parent::parent, unrank};

/// Below 3 there is no non-identity permutation that exercises the full case
/// logic; above 12 exhaustive enumeration stops being practical.
pub const MIN_DIMENSION: usize = 3;
pub const MAX_DIMENSION: usize = 12;

#[derive(Debug, Error)]
pub enum EnumerationError {
  #[error("dimension must satisfy 3 <= n <= 12, got {0}")]
  InvalidDimension(usize),
  #[error("failed to build worker thread pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How one enumeration run is laid out: `workers` share-nothing outer threads,
/// each owning one contiguous rank block and an inner rayon pool of
/// `threads_per_worker` threads.
#[derive(Debug, Clone)]
pub struct Config {
  pub n: usize,
  pub workers: usize,
  pub threads_per_worker: usize,
}

/// Result of one run, owned by the caller after the final reduction.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub n: usize,
  pub workers: usize,
  pub threads_per_worker: usize,
  /// n! for the requested dimension.
  pub total: u64,
  /// Parent-rule applications per tree index, counts[t-1] for tree t.
  pub counts: Vec<u64>,
  pub elapsed_secs: f64,
}

impl Report {
  /// Every non-identity permutation contributes one application per tree.
  pub fn expected_per_tree(&self) -> u64 {
    self.total - 1
  }
}

/// Enumerate all n! ranks, apply the parent rule to every non-identity
/// permutation for every tree index, and reduce the per-worker tallies into
/// one global count array. The progress bar advances by one block per worker;
/// pass `ProgressBar::hidden()` for silent runs.
pub fn run(cfg: &Config, facts: &Factorials, pb: &ProgressBar) -> Result<Report, EnumerationError> {
  if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&cfg.n) {
    return Err(EnumerationError::InvalidDimension(cfg.n));
  }
  let n = cfg.n;
  let workers = cfg.workers.max(1);
  let threads = cfg.threads_per_worker.max(1);

  let total = facts.get(n);
  let blocks = block_ranges(total, workers);

  // Build every inner pool up front: a bad thread configuration must abort
  // the whole run before any counting starts.
  let pools = (0..workers)
    .map(|_| {
      rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
    })
    .collect::<Result<Vec<_>, _>>()?;

  pb.set_length(total);
  let started = Instant::now();

  let mut per_worker: Vec<Vec<u64>> = Vec::with_capacity(workers);
  thread::scope(|s| {
    let handles: Vec<_> = blocks
      .into_iter()
      .zip(&pools)
      .map(|(block, pool)| s.spawn(move || count_block(block, n, facts, pool, pb)))
      .collect();
    for handle in handles {
      per_worker.push(handle.join().expect("worker thread panicked"));
    }
  });

  // Global sum-reduction over the joined per-worker arrays.
  let mut counts = vec![0u64; n - 1];
  for local in &per_worker {
    for (slot, c) in counts.iter_mut().zip(local) {
      *slot += c;
    }
  }
  let elapsed_secs = started.elapsed().as_secs_f64();

  Ok(Report {
    n,
    workers,
    threads_per_worker: threads,
    total,
    counts,
    elapsed_secs,
  })
}

/// Decode-and-count loop over one worker's rank block. The inner rayon pool
/// splits the block dynamically; each task folds into a thread-private tally,
/// and tallies merge into the worker-local array one at a time under the
/// mutex. Rank 0 decodes to the identity, which is the root and counts for
/// nothing.
fn count_block(
  block: Range<u64>,
  n: usize,
  facts: &Factorials,
  pool: &rayon::ThreadPool,
  pb: &ProgressBar,
) -> Vec<u64> {
  let root = identity(n);
  let len = block.end - block.start;
  let local = Mutex::new(vec![0u64; n - 1]);

  pool.install(|| {
    block
      .into_par_iter()
      .fold(
        || vec![0u64; n - 1],
        |mut tally, idx| {
          let v = unrank(idx, n, facts);
          if v != root {
            for t in 1..n {
              // the parent permutation itself is discarded: the reference
              // algorithm keeps only the application count
              let _ = parent(&v, t, n);
              tally[t - 1] += 1;
            }
          }
          tally
        },
      )
      .for_each(|tally| {
        let mut merged = local.lock().expect("worker counter mutex poisoned");
        for (slot, c) in merged.iter_mut().zip(&tally) {
          *slot += c;
        }
      });
  });

  pb.inc(len);
  local.into_inner().expect("worker counter mutex poisoned")
}
