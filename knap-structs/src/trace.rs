use crate::serializable_struct;
use anyhow::{anyhow, Result};
use knap_challenges::{Challenge, Item, Solution};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Greedy,
    Dynamic,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Greedy => write!(f, "greedy"),
            Algorithm::Dynamic => write!(f, "dp"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "dp" | "dynamic" => Ok(Algorithm::Dynamic),
            other => Err(anyhow!(
                "Unknown algorithm '{}', expected 'greedy' or 'dp'",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initial,
    Sorted,
    Checking,
    Taken,
    Skipped,
    Initializing,
    Filling,
    Backtracking,
    Complete,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pending,
    Taken,
    Skipped,
}

serializable_struct! {
    DecisionRow {
        item: Item,
        decision: Decision,
        /// Capacity left at the moment the decision was made.
        remaining_capacity: Option<u64>,
    }
}

impl DecisionRow {
    pub fn pending(item: &Item) -> Self {
        Self {
            item: item.clone(),
            decision: Decision::Pending,
            remaining_capacity: None,
        }
    }
}

serializable_struct! {
    Cell {
        row: usize,
        col: usize,
    }
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Dense `(n+1) x (capacity+1)` table filled one row at a time. Row 0 and
/// column 0 are always 0 and are not stored. Cells of rows that have not been
/// filled yet read as `None`, which is distinct from a computed 0.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "DpGridData")]
pub struct DpGrid {
    rows: usize,
    cols: usize,
    filled: Vec<Vec<u64>>,
}

#[derive(Deserialize)]
struct DpGridData {
    rows: usize,
    cols: usize,
    filled: Vec<Vec<u64>>,
}

impl TryFrom<DpGridData> for DpGrid {
    type Error = anyhow::Error;

    fn try_from(data: DpGridData) -> Result<Self> {
        if data.rows == 0 || data.cols == 0 {
            return Err(anyhow!(
                "DP grid must have at least one row and column, got {}x{}",
                data.rows,
                data.cols
            ));
        }
        let mut grid = DpGrid::new(data.rows - 1, data.cols - 1);
        for values in data.filled {
            grid.push_row(values)?;
        }
        Ok(grid)
    }
}

impl DpGrid {
    pub fn new(num_items: usize, capacity: usize) -> Self {
        Self {
            rows: num_items + 1,
            cols: capacity + 1,
            filled: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.rows || col >= self.cols {
            None
        } else if row == 0 || col == 0 {
            Some(0)
        } else {
            self.filled.get(row - 1).map(|values| values[col])
        }
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    /// Number of rows holding values, counting the zero row.
    pub fn filled_rows(&self) -> usize {
        self.filled.len() + 1
    }

    /// Values of a filled row `1..rows`. Row 0 is implicit and not returned.
    pub fn filled_row(&self, row: usize) -> Option<&[u64]> {
        row.checked_sub(1)
            .and_then(|index| self.filled.get(index))
            .map(Vec::as_slice)
    }

    /// Appends the next row, returning its index.
    pub fn push_row(&mut self, values: Vec<u64>) -> Result<usize> {
        let row = self.filled_rows();
        if row >= self.rows {
            return Err(anyhow!("DP grid already holds all {} rows", self.rows));
        }
        if values.len() != self.cols {
            return Err(anyhow!(
                "Row {} has {} values, expected {}",
                row,
                values.len(),
                self.cols
            ));
        }
        if values[0] != 0 {
            return Err(anyhow!("Row {} must start with 0, got {}", row, values[0]));
        }
        self.filled.push(values);
        Ok(row)
    }

    pub fn is_complete(&self) -> bool {
        self.filled_rows() == self.rows
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Snapshot {
    Decisions {
        rows: Vec<DecisionRow>,
        /// Index into `rows` of the item being examined.
        current: Option<usize>,
    },
    /// A freshly allocated table: only the zero border is known.
    Table { rows: usize, cols: usize },
    /// The row filled by this step.
    Row { row: usize, values: Vec<u64> },
    Backtrack { path: Vec<Cell>, chosen: Vec<usize> },
}

serializable_struct! {
    Totals {
        value: u64,
        /// Unknown while the DP table is still being filled.
        weight: Option<u64>,
    }
}

serializable_struct! {
    Step {
        index: usize,
        algorithm: Algorithm,
        phase: Phase,
        message: String,
        snapshot: Snapshot,
        totals: Totals,
    }
}

serializable_struct! {
    Trace {
        algorithm: Algorithm,
        /// Catalog revision the trace was computed against.
        revision: u64,
        capacity: u32,
        steps: Vec<Step>,
        result: Solution,
    }
}

impl Trace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn is_stale_for(&self, challenge: &Challenge) -> bool {
        self.revision != challenge.revision()
    }

    /// The DP table as it stood after step `index`, rebuilt from the rows
    /// recorded up to that step. `None` for greedy traces and out of range
    /// indices.
    pub fn grid_at(&self, index: usize) -> Option<DpGrid> {
        if self.algorithm != Algorithm::Dynamic {
            return None;
        }
        let mut grid = None;
        for step in self.steps.get(..=index)? {
            match &step.snapshot {
                Snapshot::Table { rows, cols } => {
                    grid = Some(DpGrid::new(rows.checked_sub(1)?, cols.checked_sub(1)?));
                }
                Snapshot::Row { values, .. } => {
                    grid.as_mut()?.push_row(values.clone()).ok()?;
                }
                _ => {}
            }
        }
        grid
    }
}

serializable_struct! {
    Comparison {
        greedy: Trace,
        dynamic: Trace,
    }
}

impl Comparison {
    /// How much value greedy leaves on the table compared to the optimum.
    pub fn optimality_gap(&self) -> u64 {
        self.dynamic
            .result
            .total_value
            .saturating_sub(self.greedy.result.total_value)
    }

    pub fn greedy_is_optimal(&self) -> bool {
        self.optimality_gap() == 0
    }

    pub fn is_stale_for(&self, challenge: &Challenge) -> bool {
        self.greedy.is_stale_for(challenge) || self.dynamic.is_stale_for(challenge)
    }
}
