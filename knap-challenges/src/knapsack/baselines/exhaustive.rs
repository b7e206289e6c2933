use crate::knapsack::{Challenge, Solution};
use anyhow::{anyhow, Result};

pub const MAX_EXHAUSTIVE_ITEMS: usize = 24;

pub fn solve_challenge(challenge: &Challenge) -> Result<Solution> {
    let num_items = challenge.num_items();
    if num_items > MAX_EXHAUSTIVE_ITEMS {
        return Err(anyhow!(
            "Exhaustive baseline supports at most {} items, got {}",
            MAX_EXHAUSTIVE_ITEMS,
            num_items
        ));
    }
    let capacity = challenge.capacity() as u64;
    let items = challenge.items();

    // Ties on value keep the lighter subset
    let mut best_mask = 0u32;
    let mut best_value = 0u64;
    let mut best_weight = 0u64;
    for mask in 0u32..(1u32 << num_items) {
        let mut weight = 0u64;
        let mut value = 0u64;
        for (i, item) in items.iter().enumerate() {
            if mask & (1 << i) != 0 {
                weight += item.weight() as u64;
                value += item.value() as u64;
            }
        }
        if weight <= capacity
            && (value > best_value || (value == best_value && weight < best_weight))
        {
            best_mask = mask;
            best_value = value;
            best_weight = weight;
        }
    }

    Ok(Solution {
        items: items
            .iter()
            .enumerate()
            .filter(|&(i, _)| best_mask & (1 << i) != 0)
            .map(|(_, item)| item.id())
            .collect(),
        total_value: best_value,
        total_weight: best_weight,
    })
}
