use knap_algorithms::{solve_dp, solve_greedy};
use knap_challenges::Challenge;
use knap_runtime::{frame, Playback};
use knap_structs::trace::Phase;

#[test]
fn test_frame_is_step_lookup() {
    let trace = solve_greedy(&Challenge::sample()).unwrap();
    assert_eq!(frame(&trace, 0).unwrap().phase, Phase::Initial);
    assert_eq!(frame(&trace, 1).unwrap().phase, Phase::Sorted);
    assert_eq!(frame(&trace, trace.len() - 1).unwrap().phase, Phase::Complete);
    assert!(frame(&trace, trace.len()).is_none());
}

#[test]
fn test_frame_is_pure() {
    let trace = solve_dp(&Challenge::sample()).unwrap();
    let first = frame(&trace, 2).cloned();
    let second = frame(&trace, 2).cloned();
    assert_eq!(first, second);
}

#[test]
fn test_advance_stops_on_last_step() {
    let trace = solve_dp(&Challenge::sample()).unwrap();
    let mut playback = Playback::for_trace(&trace);
    assert_eq!(playback.len(), 6);

    let mut advanced = 0;
    while playback.advance() {
        advanced += 1;
    }
    assert_eq!(advanced, 5);
    assert_eq!(playback.position(), 5);
    assert!(playback.is_finished());
    assert!(!playback.advance());
    assert_eq!(playback.position(), 5);
}

#[test]
fn test_seek_and_rewind() {
    let mut playback = Playback::new(4);
    playback.seek(3).unwrap();
    assert_eq!(playback.position(), 3);
    assert!(playback.is_finished());
    assert!(playback.seek(4).is_err());
    assert_eq!(playback.position(), 3);
    playback.rewind();
    assert_eq!(playback.position(), 0);
    assert!(!playback.is_finished());
}

#[test]
fn test_empty_playback() {
    let mut playback = Playback::default();
    assert!(playback.is_empty());
    assert!(playback.is_finished());
    assert!(!playback.advance());
    assert!(playback.seek(0).is_err());
}
