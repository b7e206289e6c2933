pub mod knapsack;
mod recorder;
pub use knapsack::{compare, solve_dp, solve_greedy};
pub use recorder::{record, StepRecorder};

use anyhow::Result;
use knap_challenges::{Challenge, Solution};
use knap_structs::trace::Algorithm;

/// A solver reports its intermediate decisions to the recorder as it runs and
/// returns the final selection.
pub trait Solver {
    fn algorithm(&self) -> Algorithm;

    fn solve_challenge(
        &self,
        challenge: &Challenge,
        recorder: &mut StepRecorder,
    ) -> Result<Solution>;
}
