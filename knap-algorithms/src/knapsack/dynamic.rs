//! Classic `O(n * capacity)` table for 0/1 knapsack:
//!
//! `table[i][w] = max(table[i-1][w], table[i-1][w - weight_i] + value_i)` when
//! `weight_i <= w`, otherwise `table[i-1][w]`.
//!
//! Each filling step carries only the row it filled; `Trace::grid_at`
//! rebuilds the table for any step. Row 0 is never stored, so
//! `MAX_TABLE_CELLS` bounds the `n * (capacity + 1)` computed cells.

use crate::{Solver, StepRecorder};
use anyhow::{anyhow, Result};
use knap_challenges::{Challenge, Solution};
use knap_structs::trace::{Algorithm, Cell, DpGrid, Phase, Snapshot, Totals};

pub const MAX_TABLE_CELLS: usize = 1 << 25;

pub struct Dynamic;

impl Solver for Dynamic {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dynamic
    }

    fn solve_challenge(
        &self,
        challenge: &Challenge,
        recorder: &mut StepRecorder,
    ) -> Result<Solution> {
        solve_challenge(challenge, recorder)
    }
}

fn cell(grid: &DpGrid, row: usize, col: usize) -> Result<u64> {
    grid.get(row, col)
        .ok_or_else(|| anyhow!("DP cell ({}, {}) read before it was filled", row, col))
}

pub fn solve_challenge(challenge: &Challenge, recorder: &mut StepRecorder) -> Result<Solution> {
    let items = challenge.items();
    let num_items = items.len();
    let capacity = challenge.capacity() as usize;

    match num_items.checked_mul(capacity + 1) {
        Some(cells) if cells <= MAX_TABLE_CELLS => {}
        _ => {
            return Err(anyhow!(
                "DP table for {} items at capacity {} exceeds {} cells",
                num_items,
                capacity,
                MAX_TABLE_CELLS
            ))
        }
    }

    let mut grid = DpGrid::new(num_items, capacity);
    recorder.push(
        Phase::Initializing,
        format!(
            "Allocated {}x{} table, row 0 and column 0 set to 0",
            grid.rows(),
            grid.cols()
        ),
        Snapshot::Table {
            rows: grid.rows(),
            cols: grid.cols(),
        },
        Totals {
            value: 0,
            weight: None,
        },
    );

    for i in 1..=num_items {
        let item = &items[i - 1];
        let weight = item.weight() as usize;
        let value = item.value() as u64;
        let mut values = vec![0u64; capacity + 1];
        for w in 1..=capacity {
            let skip = cell(&grid, i - 1, w)?;
            values[w] = if weight <= w {
                skip.max(cell(&grid, i - 1, w - weight)? + value)
            } else {
                skip
            };
        }
        let best = values[capacity];
        recorder.push(
            Phase::Filling,
            format!(
                "Row {} filled with item {} (weight {}, value {}): best value at capacity {} is {}",
                i,
                item.id(),
                item.weight(),
                item.value(),
                capacity,
                best
            ),
            Snapshot::Row {
                row: i,
                values: values.clone(),
            },
            Totals {
                value: best,
                weight: None,
            },
        );
        grid.push_row(values)?;
    }

    // A value change between rows i-1 and i at column w means item i is in
    // every optimal selection for that prefix and capacity.
    let mut path = Vec::with_capacity(num_items + 1);
    let mut chosen = Vec::new();
    let mut w = capacity;
    for i in (1..=num_items).rev() {
        path.push(Cell::new(i, w));
        if w > 0 && cell(&grid, i, w)? != cell(&grid, i - 1, w)? {
            chosen.push(items[i - 1].id());
            w -= items[i - 1].weight() as usize;
        }
    }
    path.push(Cell::new(0, w));
    chosen.reverse();

    let total_value = cell(&grid, num_items, capacity)?;
    let total_weight: u64 = chosen
        .iter()
        .filter_map(|&id| challenge.item(id))
        .map(|item| item.weight() as u64)
        .sum();
    let totals = Totals {
        value: total_value,
        weight: Some(total_weight),
    };

    recorder.push(
        Phase::Backtracking,
        format!(
            "Backtracked from ({}, {}) to row 0: took items {:?}",
            num_items, capacity, chosen
        ),
        Snapshot::Backtrack {
            path: path.clone(),
            chosen: chosen.clone(),
        },
        totals.clone(),
    );
    recorder.push(
        Phase::Complete,
        format!(
            "Optimal value {} with items {:?}, weight {}",
            total_value, chosen, total_weight
        ),
        Snapshot::Backtrack {
            path,
            chosen: chosen.clone(),
        },
        totals,
    );

    Ok(Solution {
        items: chosen,
        total_value,
        total_weight,
    })
}
