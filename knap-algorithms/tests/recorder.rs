use anyhow::Result;
use knap_algorithms::{record, solve_greedy, Solver, StepRecorder};
use knap_challenges::{Challenge, Solution};
use knap_structs::trace::{Algorithm, Phase, Snapshot, Totals};

struct TakeNothing;

impl Solver for TakeNothing {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Greedy
    }

    fn solve_challenge(
        &self,
        challenge: &Challenge,
        recorder: &mut StepRecorder,
    ) -> Result<Solution> {
        for message in ["first", "second"] {
            recorder.push(
                Phase::Complete,
                message,
                Snapshot::Decisions {
                    rows: Vec::new(),
                    current: None,
                },
                Totals {
                    value: 0,
                    weight: Some(challenge.capacity() as u64),
                },
            );
        }
        Ok(Solution::new())
    }
}

#[test]
fn test_record_numbers_steps_and_tags_algorithm() {
    let challenge = Challenge::sample();
    let trace = record(&TakeNothing, &challenge).unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.steps[0].index, 0);
    assert_eq!(trace.steps[1].index, 1);
    assert_eq!(trace.steps[1].message, "second");
    assert!(trace.steps.iter().all(|s| s.algorithm == Algorithm::Greedy));
    assert_eq!(trace.capacity, 50);
    assert_eq!(trace.result, Solution::new());
}

#[test]
fn test_trace_records_revision() {
    let mut challenge = Challenge::sample();
    challenge.add_item(5, 5).unwrap();
    let trace = solve_greedy(&challenge).unwrap();
    assert_eq!(trace.revision, challenge.revision());
    assert!(!trace.is_stale_for(&challenge));

    challenge.remove_item(4).unwrap();
    assert!(trace.is_stale_for(&challenge));
    let fresh = solve_greedy(&challenge).unwrap();
    assert!(!fresh.is_stale_for(&challenge));
    assert_eq!(fresh.len(), 2 * 3 + 3);
}
