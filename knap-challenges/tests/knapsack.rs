use knap_challenges::knapsack::*;
use knap_utils::{calc_seed, dejsonify, jsonify};
use std::{
    io,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_warnings(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

fn three_items() -> Challenge {
    Challenge::from_pairs(50, &[(10, 60), (20, 100), (30, 120)]).unwrap()
}

#[test]
fn test_add_item_assigns_dense_ids() {
    let mut challenge = Challenge::new(10);
    let a = challenge.add_item(2, 4).unwrap();
    let b = challenge.add_item(5, 5).unwrap();
    assert_eq!(a.id(), 1);
    assert_eq!(b.id(), 2);
    assert_eq!(a.ratio(), 2.0);
    assert_eq!(b.ratio(), 1.0);
    assert_eq!(challenge.num_items(), 2);
    assert_eq!(challenge.revision(), 2);
}

#[test]
fn test_add_item_rejects_non_positive_input() {
    let mut challenge = three_items();
    assert!(challenge.add_item(0, 10).is_err());
    assert!(challenge.add_item(10, -1).is_err());
    assert!(challenge.add_item(i64::MAX, 1).is_err());
    assert_eq!(challenge.num_items(), 3);
    assert_eq!(challenge.revision(), 0);
}

#[test]
fn test_remove_item_renumbers_remaining_items() {
    let mut challenge = three_items();
    let removed = challenge.remove_item(2).unwrap();
    assert_eq!(removed.weight(), 20);

    let items = challenge.items();
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].id(), items[0].weight(), items[0].value()), (1, 10, 60));
    assert_eq!((items[1].id(), items[1].weight(), items[1].value()), (2, 30, 120));
    assert_eq!(items[0].ratio(), 6.0);
    assert_eq!(items[1].ratio(), 4.0);
    assert!(challenge.validate().is_ok());
    assert_eq!(challenge.revision(), 1);
}

#[test]
fn test_remove_unknown_item_is_rejected() {
    let mut challenge = three_items();
    assert!(challenge.remove_item(0).is_err());
    assert!(challenge.remove_item(4).is_err());
    assert_eq!(challenge.num_items(), 3);
    assert_eq!(challenge.revision(), 0);
}

#[test]
fn test_update_item_recomputes_ratio() {
    let mut challenge = three_items();
    let item = challenge.update_item(3, 40, 10).unwrap();
    assert_eq!(item.ratio(), 0.25);
    assert_eq!(challenge.item(3).unwrap().ratio(), 0.25);
    assert!(challenge.update_item(3, 0, 10).is_err());
    assert_eq!(challenge.item(3).unwrap().weight(), 40);
}

#[test]
fn test_rejected_update_is_logged() {
    let mut challenge = three_items();
    let logs = capture_warnings(|| {
        assert!(challenge.update_item(2, 10, -5).is_err());
        assert!(challenge.update_item(9, 10, 10).is_err());
    });
    assert_eq!(logs.matches("update_item rejected").count(), 2);
    assert!(logs.contains("value must be a positive integer"));
    assert!(logs.contains("No item with id 9"));
    assert_eq!(challenge.revision(), 0);
    assert_eq!(challenge.item(2).unwrap().value(), 100);

    let logs = capture_warnings(|| {
        challenge.update_item(2, 10, 5).unwrap();
    });
    assert!(logs.is_empty());
}

#[test]
fn test_set_capacity_defaults_to_one() {
    let mut challenge = three_items();
    assert_eq!(challenge.set_capacity(0), 1);
    assert_eq!(challenge.set_capacity(-20), 1);
    assert_eq!(challenge.set_capacity(75), 75);
    assert_eq!(challenge.set_capacity(i64::MAX), u32::MAX);
    assert_eq!(challenge.revision(), 4);
}

#[test]
fn test_clear() {
    let mut challenge = three_items();
    challenge.clear();
    assert!(challenge.is_empty());
    assert_eq!(challenge.capacity(), 50);
}

#[test]
fn test_cmp_ratio_is_exact() {
    let a = Item::new(1, 3, 1).unwrap();
    let b = Item::new(2, 6, 2).unwrap();
    assert_eq!(a.cmp_ratio(&b), std::cmp::Ordering::Equal);
    let c = Item::new(3, 1, 1).unwrap();
    assert_eq!(c.cmp_ratio(&a), std::cmp::Ordering::Greater);
}

#[test]
fn test_challenge_json_roundtrip_ignores_ids_and_ratio() {
    let challenge: Challenge = dejsonify(
        r#"{"capacity":50,"items":[{"id":9,"weight":10,"value":60,"ratio":99.0},{"weight":20,"value":100}]}"#,
    )
    .unwrap();
    assert_eq!(challenge.items()[0].id(), 1);
    assert_eq!(challenge.items()[0].ratio(), 6.0);
    assert_eq!(challenge.items()[1].id(), 2);

    let json = jsonify(&challenge).unwrap();
    assert_eq!(
        json,
        r#"{"capacity":50,"items":[{"id":1,"ratio":6.0,"value":60,"weight":10},{"id":2,"ratio":5.0,"value":100,"weight":20}]}"#
    );
}

#[test]
fn test_malformed_challenge_json_fails_fast() {
    assert!(dejsonify::<Challenge>(r#"{"capacity":0,"items":[]}"#).is_err());
    assert!(dejsonify::<Challenge>(r#"{"capacity":5,"items":[{"weight":0,"value":1}]}"#).is_err());
    assert!(dejsonify::<Challenge>(r#"{"capacity":5}"#).is_err());
}

#[test]
fn test_track_parsing() {
    let track: Track = "n_items=8, budget=30".parse().unwrap();
    assert_eq!(track.n_items, 8);
    assert_eq!(track.budget, 30);
    assert_eq!(track.max_weight, Track::default().max_weight);
    assert_eq!(track.to_string().parse::<Track>().unwrap(), track);
    assert!("n_items".parse::<Track>().is_err());
    assert!("colour=red".parse::<Track>().is_err());
    assert!("n_items=-1".parse::<Track>().is_err());
}

#[test]
fn test_generate_instance_is_deterministic() {
    let track = Track {
        n_items: 10,
        max_weight: 30,
        max_value: 60,
        budget: 40,
    };
    let seed = calc_seed("generate", 0);
    let a = Challenge::generate_instance(&seed, &track).unwrap();
    let b = Challenge::generate_instance(&seed, &track).unwrap();
    assert_eq!(a.items(), b.items());
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.num_items(), 10);
    assert!(a.validate().is_ok());
    assert!(a
        .items()
        .iter()
        .all(|i| (1..=30).contains(&i.weight()) && (1..=60).contains(&i.value())));
    assert_eq!(a.capacity() as u64, (a.total_weight() * 40 / 100).max(1));

    let c = Challenge::generate_instance(&calc_seed("generate", 1), &track).unwrap();
    assert_ne!(a.items(), c.items());
}

#[test]
fn test_generate_instance_rejects_degenerate_track() {
    let track = Track {
        max_weight: 0,
        ..Track::default()
    };
    assert!(Challenge::generate_instance(&[0; 32], &track).is_err());
}

#[test]
fn test_evaluate_selection() {
    let challenge = three_items();
    let solution = challenge.evaluate_selection(&[3, 2]).unwrap();
    assert_eq!(solution.items, vec![2, 3]);
    assert_eq!(solution.total_value, 220);
    assert_eq!(solution.total_weight, 50);

    assert!(challenge.evaluate_selection(&[1, 1]).is_err());
    assert!(challenge.evaluate_selection(&[4]).is_err());
    assert!(challenge.evaluate_selection(&[1, 2, 3]).is_err());
}

#[test]
fn test_verify_solution() {
    let challenge = three_items();
    let good = Solution {
        items: vec![1, 2],
        total_value: 160,
        total_weight: 30,
    };
    assert!(challenge.verify_solution(&good).is_ok());
    let bad_value = Solution {
        total_value: 161,
        ..good.clone()
    };
    assert!(challenge.verify_solution(&bad_value).is_err());
    let unsorted = Solution {
        items: vec![2, 1],
        ..good
    };
    assert!(challenge.verify_solution(&unsorted).is_err());
}

#[test]
fn test_exhaustive_baseline() {
    let solution = three_items().compute_exhaustive_baseline().unwrap();
    assert_eq!(solution.items, vec![2, 3]);
    assert_eq!(solution.total_value, 220);

    let empty = Challenge::new(50).compute_exhaustive_baseline().unwrap();
    assert!(empty.is_empty());

    let too_heavy = Challenge::from_pairs(50, &[(60, 100)]).unwrap();
    assert_eq!(too_heavy.compute_exhaustive_baseline().unwrap(), Solution::new());

    let pairs = vec![(1, 1); MAX_EXHAUSTIVE_ITEMS + 1];
    let big = Challenge::from_pairs(10, &pairs).unwrap();
    assert!(big.compute_exhaustive_baseline().is_err());
}

#[test]
fn test_sample_matches_scenario() {
    let sample = Challenge::sample();
    assert_eq!(sample.capacity(), 50);
    assert_eq!(sample.items(), three_items().items());
}
