pub mod decision_tree;
pub mod dynamic;
pub mod greedy;

use crate::record;
use anyhow::Result;
use knap_challenges::Challenge;
use knap_structs::trace::{Comparison, Trace};

pub fn solve_greedy(challenge: &Challenge) -> Result<Trace> {
    record(&greedy::Greedy, challenge)
}

pub fn solve_dp(challenge: &Challenge) -> Result<Trace> {
    record(&dynamic::Dynamic, challenge)
}

/// Greedy first, then DP, matching the order the comparison is played back.
pub fn compare(challenge: &Challenge) -> Result<Comparison> {
    Ok(Comparison {
        greedy: solve_greedy(challenge)?,
        dynamic: solve_dp(challenge)?,
    })
}
