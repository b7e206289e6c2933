// How far the greedy heuristic falls behind the DP optimum on random instances.
//
// Sizes   : n_items in {4, 8, 12, 16, 24}, budget 50%
// Seeds   : 50 per size
// Score   : greedy value / optimal value (1.0 = greedy was optimal)
//
// Usage:
//   cargo run --release --example greedy_gap -- [--seeds N]

use anyhow::{anyhow, Result};
use knap_algorithms::compare;
use knap_challenges::{Challenge, Track};
use knap_utils::calc_seed;
use std::time::Instant;

struct Stats {
    values: Vec<f64>,
}

impl Stats {
    fn new() -> Self { Self { values: Vec::new() } }
    fn push(&mut self, v: f64) { self.values.push(v); }
    fn mean(&self) -> f64 { self.values.iter().sum::<f64>() / self.values.len() as f64 }
    fn min(&self) -> f64 { self.values.iter().cloned().fold(f64::INFINITY, f64::min) }
}

struct RunResult {
    n_items: usize,
    avg_score: f64,
    min_score: f64,
    optimal_share: f64,
    avg_solve_ms: f64,
}

fn run_size(n_items: usize, num_seeds: u64) -> Result<RunResult> {
    let track = Track {
        n_items,
        max_weight: 40,
        max_value: 100,
        budget: 50,
    };
    let mut scores = Stats::new();
    let mut optimal = 0usize;
    let mut total_ms = 0.0;

    for nonce in 0..num_seeds {
        let challenge = Challenge::generate_instance(&calc_seed("greedy_gap", nonce), &track)?;
        let start = Instant::now();
        let comparison = compare(&challenge)?;
        total_ms += start.elapsed().as_secs_f64() * 1000.0;

        let best = comparison.dynamic.result.total_value;
        let greedy = comparison.greedy.result.total_value;
        scores.push(if best == 0 { 1.0 } else { greedy as f64 / best as f64 });
        if comparison.greedy_is_optimal() {
            optimal += 1;
        }
    }

    Ok(RunResult {
        n_items,
        avg_score: scores.mean(),
        min_score: scores.min(),
        optimal_share: optimal as f64 / num_seeds as f64,
        avg_solve_ms: total_ms / num_seeds as f64,
    })
}

fn parse_seeds() -> Result<u64> {
    let args: Vec<String> = std::env::args().collect();
    match args.iter().position(|a| a == "--seeds") {
        Some(i) => args
            .get(i + 1)
            .ok_or_else(|| anyhow!("--seeds requires a value"))?
            .parse()
            .map_err(|e| anyhow!("Invalid --seeds: {}", e)),
        None => Ok(50),
    }
}

fn main() -> Result<()> {
    let num_seeds = parse_seeds()?;
    if num_seeds == 0 {
        return Err(anyhow!("--seeds must be positive"));
    }

    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10}",
        "n_items", "avg", "min", "optimal", "solve_ms"
    );
    for n_items in [4, 8, 12, 16, 24] {
        let r = run_size(n_items, num_seeds)?;
        println!(
            "{:>8} {:>10.4} {:>10.4} {:>9.0}% {:>10.3}",
            r.n_items,
            r.avg_score,
            r.min_score,
            r.optimal_share * 100.0,
            r.avg_solve_ms
        );
    }
    Ok(())
}
