use crate::playback::Playback;
use anyhow::{anyhow, Result};
use knap_algorithms::compare;
use knap_challenges::{Challenge, Item};
use knap_structs::{
    config::PlaybackConfig,
    trace::{Algorithm, Comparison, Step},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Comparison workflow: `Idle -> Greedy -> Transition -> Dp -> Complete`.
/// There are no back-edges; `reset` is the only way back to `Idle`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Greedy,
    Transition,
    Dp,
    Complete,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub stage: Stage,
    pub algorithm: Option<Algorithm>,
    pub step: Option<&'a Step>,
}

/// Owns the problem instance and the comparison computed from it. Mutations
/// go through the session so that a stale comparison is never replayed.
pub struct Session {
    challenge: Challenge,
    config: PlaybackConfig,
    comparison: Option<Comparison>,
    stage: Stage,
    cursor: Playback,
    transition_left: u32,
}

impl Session {
    pub fn new(challenge: Challenge, config: PlaybackConfig) -> Self {
        Self {
            challenge,
            config,
            comparison: None,
            stage: Stage::Idle,
            cursor: Playback::default(),
            transition_left: 0,
        }
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn add_item(&mut self, weight: i64, value: i64) -> Result<Item> {
        let item = self.challenge.add_item(weight, value)?;
        self.invalidate();
        Ok(item)
    }

    pub fn remove_item(&mut self, id: usize) -> Result<Item> {
        let item = self.challenge.remove_item(id)?;
        self.invalidate();
        Ok(item)
    }

    pub fn update_item(&mut self, id: usize, weight: i64, value: i64) -> Result<Item> {
        let item = self.challenge.update_item(id, weight, value)?;
        self.invalidate();
        Ok(item)
    }

    pub fn set_capacity(&mut self, capacity: i64) -> u32 {
        let capacity = self.challenge.set_capacity(capacity);
        self.invalidate();
        capacity
    }

    pub fn clear(&mut self) {
        self.challenge.clear();
        self.invalidate();
    }

    /// Back to `Idle`, discarding both traces.
    pub fn reset(&mut self) {
        self.invalidate();
    }

    fn invalidate(&mut self) {
        if self.comparison.is_some() {
            info!(stage = ?self.stage, "discarding comparison");
        }
        self.comparison = None;
        self.stage = Stage::Idle;
        self.cursor = Playback::default();
        self.transition_left = 0;
    }

    /// Solves both algorithms up front and starts playback at the first
    /// greedy step.
    pub fn start(&mut self) -> Result<()> {
        if self.stage != Stage::Idle {
            return Err(anyhow!(
                "Comparison already running ({:?}), reset it first",
                self.stage
            ));
        }
        let comparison = compare(&self.challenge)?;
        info!(
            greedy_steps = comparison.greedy.len(),
            dp_steps = comparison.dynamic.len(),
            optimality_gap = comparison.optimality_gap(),
            "comparison ready"
        );
        self.cursor = Playback::for_trace(&comparison.greedy);
        self.comparison = Some(comparison);
        self.stage = Stage::Greedy;
        Ok(())
    }

    /// Advances playback by one step and returns the resulting stage.
    pub fn tick(&mut self) -> Stage {
        let next = match self.stage {
            Stage::Idle | Stage::Complete => self.stage,
            Stage::Greedy => {
                if self.cursor.advance() {
                    Stage::Greedy
                } else {
                    self.transition_left = self.config.transition_ticks.max(1);
                    Stage::Transition
                }
            }
            Stage::Transition => {
                self.transition_left = self.transition_left.saturating_sub(1);
                if self.transition_left == 0 {
                    if let Some(comparison) = &self.comparison {
                        self.cursor = Playback::for_trace(&comparison.dynamic);
                    }
                    Stage::Dp
                } else {
                    Stage::Transition
                }
            }
            Stage::Dp => {
                if self.cursor.advance() {
                    Stage::Dp
                } else {
                    Stage::Complete
                }
            }
        };
        if next != self.stage {
            debug!(from = ?self.stage, to = ?next, "stage change");
        }
        self.stage = next;
        next
    }

    /// Ticks until `Complete`, returning the number of ticks taken.
    pub fn run_to_completion(&mut self) -> usize {
        let mut ticks = 0;
        while !matches!(self.stage, Stage::Idle | Stage::Complete) {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// What to render right now. During the transition the final greedy step
    /// stays on screen; once complete the final DP step does.
    pub fn frame(&self) -> Frame<'_> {
        let Some(comparison) = &self.comparison else {
            return Frame {
                stage: self.stage,
                algorithm: None,
                step: None,
            };
        };
        let (algorithm, step) = match self.stage {
            Stage::Idle => (None, None),
            Stage::Greedy => (
                Some(Algorithm::Greedy),
                comparison.greedy.step(self.cursor.position()),
            ),
            Stage::Transition => (Some(Algorithm::Greedy), comparison.greedy.steps.last()),
            Stage::Dp => (
                Some(Algorithm::Dynamic),
                comparison.dynamic.step(self.cursor.position()),
            ),
            Stage::Complete => (Some(Algorithm::Dynamic), comparison.dynamic.steps.last()),
        };
        Frame {
            stage: self.stage,
            algorithm,
            step,
        }
    }
}
