use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::thread::available_parallelism;

use indicatif::{ProgressBar, ProgressStyle};

use ist_enumeration::Factorials;
use ist_enumeration::enumerate::{self, Config, Report};

/// ist-enumeration <n> [workers] [threads-per-worker] [report.json]
///
/// Enumerates all n! permutations, applies the independent-spanning-tree
/// parent rule for every tree index, and prints per-tree application counts
/// with wall-clock time.
fn main() -> ExitCode {
  let mut args = std::env::args().skip(1);
  let n = match args.next().map(|s| s.parse::<usize>()) {
    Some(Ok(n)) => n,
    Some(Err(_)) => {
      eprintln!("Error: n must be an integer between 3 and 12");
      return ExitCode::FAILURE;
    }
    None => 4,
  };
  let workers = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
  let threads = args
    .next()
    .and_then(|s| s.parse().ok())
    .unwrap_or_else(|| available_parallelism().map(|p| p.get()).unwrap_or(1));
  let report_path = args.next();

  let facts = Factorials::new();
  let cfg = Config {
    n,
    workers,
    threads_per_worker: threads,
  };

  let pb = ProgressBar::no_length();
  pb.set_style(
    ProgressStyle::with_template("[count] [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len}")
      .unwrap()
      .progress_chars("█▉▊▋▌▍▎▏  "),
  );

  let report = match enumerate::run(&cfg, &facts, &pb) {
    Ok(report) => report,
    Err(e) => {
      pb.finish_and_clear();
      eprintln!("Error: {}", e);
      return ExitCode::FAILURE;
    }
  };
  pb.finish_with_message("✔ Enumeration complete");

  print_report(&report);

  if let Some(path) = report_path {
    if let Err(e) = save_report(&path, &report) {
      eprintln!("Error: could not write report to {}: {}", path, e);
      return ExitCode::FAILURE;
    }
    println!("Saved report to {}", path);
  }

  ExitCode::SUCCESS
}

fn print_report(report: &Report) {
  let expect = report.expected_per_tree();
  println!(
    "\nParent-rule verification for B_{} with {} workers:",
    report.n, report.workers
  );
  for (i, &count) in report.counts.iter().enumerate() {
    let mark = if count == expect { "✓" } else { "✗" };
    println!(
      " Tree t={:>2}: total edges = {}/{} {}",
      i + 1,
      count,
      expect,
      mark
    );
  }
  println!(
    "Total execution time for n = {} with {} threads: {:.6} seconds.",
    report.n,
    report.workers * report.threads_per_worker,
    report.elapsed_secs
  );
}

fn save_report(path: &str, report: &Report) -> std::io::Result<()> {
  let file = File::create(path)?;
  let writer = BufWriter::new(file);
  serde_json::to_writer_pretty(writer, report)?;
  Ok(())
}
