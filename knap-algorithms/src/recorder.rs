use crate::Solver;
use anyhow::Result;
use knap_challenges::Challenge;
use knap_structs::trace::{Algorithm, Phase, Snapshot, Step, Totals, Trace};
use tracing::{debug, debug_span};

/// Collects the steps of a single solve in order.
pub struct StepRecorder {
    algorithm: Algorithm,
    steps: Vec<Step>,
}

impl StepRecorder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            steps: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        phase: Phase,
        message: impl Into<String>,
        snapshot: Snapshot,
        totals: Totals,
    ) {
        let message = message.into();
        debug!(index = self.steps.len(), ?phase, "{}", message);
        self.steps.push(Step {
            index: self.steps.len(),
            algorithm: self.algorithm,
            phase,
            message,
            snapshot,
            totals,
        });
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

/// Runs `solver` to completion on a validated instance and returns the fully
/// materialized trace.
pub fn record(solver: &dyn Solver, challenge: &Challenge) -> Result<Trace> {
    challenge.validate()?;
    let algorithm = solver.algorithm();
    let span = debug_span!("record", %algorithm, revision = challenge.revision());
    let _enter = span.enter();

    let mut recorder = StepRecorder::new(algorithm);
    let result = solver.solve_challenge(challenge, &mut recorder)?;
    debug!(
        steps = recorder.steps().len(),
        total_value = result.total_value,
        total_weight = result.total_weight,
        "solve finished"
    );

    Ok(Trace {
        algorithm,
        revision: challenge.revision(),
        capacity: challenge.capacity(),
        steps: recorder.into_steps(),
        result,
    })
}
