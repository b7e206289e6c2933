//! Value/weight ratio heuristic. Fast, but not optimal: on the sample
//! instance it takes items 1 and 2 (value 160) while the optimum is 220.

use crate::{Solver, StepRecorder};
use anyhow::Result;
use knap_challenges::{Challenge, Solution};
use knap_structs::trace::{Algorithm, Decision, DecisionRow, Phase, Snapshot, Totals};

pub struct Greedy;

impl Solver for Greedy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Greedy
    }

    fn solve_challenge(
        &self,
        challenge: &Challenge,
        recorder: &mut StepRecorder,
    ) -> Result<Solution> {
        solve_challenge(challenge, recorder)
    }
}

fn decisions(rows: &[DecisionRow], current: Option<usize>) -> Snapshot {
    Snapshot::Decisions {
        rows: rows.to_vec(),
        current,
    }
}

/// Emits exactly `2n + 3` steps: initial, sorted, a check plus a verdict per
/// item, and complete.
pub fn solve_challenge(challenge: &Challenge, recorder: &mut StepRecorder) -> Result<Solution> {
    let capacity = challenge.capacity() as u64;
    let mut rows: Vec<DecisionRow> = challenge.items().iter().map(DecisionRow::pending).collect();

    let mut remaining = capacity;
    let mut total_value = 0u64;
    let mut total_weight = 0u64;
    let totals = |value, weight| Totals {
        value,
        weight: Some(weight),
    };

    recorder.push(
        Phase::Initial,
        format!(
            "{} items in catalog order, capacity {}",
            rows.len(),
            capacity
        ),
        decisions(&rows, None),
        totals(0, 0),
    );

    // sort_by is stable, equal ratios keep catalog order
    rows.sort_by(|a, b| b.item.cmp_ratio(&a.item));
    recorder.push(
        Phase::Sorted,
        "Items sorted by value/weight ratio, highest first",
        decisions(&rows, None),
        totals(0, 0),
    );

    let mut items = Vec::new();
    for index in 0..rows.len() {
        let item = rows[index].item.clone();
        let weight = item.weight() as u64;
        recorder.push(
            Phase::Checking,
            format!(
                "Checking item {} (weight {}, value {}, ratio {:.2}) with {} capacity left",
                item.id(),
                item.weight(),
                item.value(),
                item.ratio(),
                remaining
            ),
            decisions(&rows, Some(index)),
            totals(total_value, total_weight),
        );

        rows[index].remaining_capacity = Some(remaining);
        if weight <= remaining {
            rows[index].decision = Decision::Taken;
            remaining -= weight;
            total_value += item.value() as u64;
            total_weight += weight;
            items.push(item.id());
            recorder.push(
                Phase::Taken,
                format!(
                    "Took item {}: {} capacity left, total value {}",
                    item.id(),
                    remaining,
                    total_value
                ),
                decisions(&rows, Some(index)),
                totals(total_value, total_weight),
            );
        } else {
            rows[index].decision = Decision::Skipped;
            recorder.push(
                Phase::Skipped,
                format!(
                    "Skipped item {}: weight {} exceeds remaining capacity {}",
                    item.id(),
                    weight,
                    remaining
                ),
                decisions(&rows, Some(index)),
                totals(total_value, total_weight),
            );
        }
    }

    items.sort();
    recorder.push(
        Phase::Complete,
        format!(
            "Greedy selected items {:?}: value {}, weight {}",
            items, total_value, total_weight
        ),
        decisions(&rows, None),
        totals(total_value, total_weight),
    );

    Ok(Solution {
        items,
        total_value,
        total_weight,
    })
}
