use anyhow::{anyhow, Result};
use knap_structs::trace::{Step, Trace};

/// Step `n` of a trace. Rendering is a pure function of the trace and the
/// index, the caller owns the clock.
pub fn frame(trace: &Trace, n: usize) -> Option<&Step> {
    trace.step(n)
}

/// Position within a fully materialized trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    len: usize,
    position: usize,
}

impl Playback {
    pub fn new(len: usize) -> Self {
        Self { len, position: 0 }
    }

    pub fn for_trace(trace: &Trace) -> Self {
        Self::new(trace.len())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// True once the cursor rests on the last step.
    pub fn is_finished(&self) -> bool {
        self.position + 1 >= self.len
    }

    /// Moves to the next step. Returns false, without moving, when already on
    /// the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            false
        } else {
            self.position += 1;
            true
        }
    }

    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position >= self.len {
            return Err(anyhow!(
                "Step {} is out of range for a trace of {} steps",
                position,
                self.len
            ));
        }
        self.position = position;
        Ok(())
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}
