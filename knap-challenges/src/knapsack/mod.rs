mod baselines;
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashSet, fmt, str::FromStr};
use tracing::{debug, info, warn};

pub use baselines::exhaustive::MAX_EXHAUSTIVE_ITEMS;

fn ratio_of(value: u32, weight: u32) -> f64 {
    value as f64 / weight as f64
}

fn positive_u32(name: &str, input: i64) -> Result<u32> {
    if input < 1 {
        return Err(anyhow!("{} must be a positive integer, got {}", name, input));
    }
    u32::try_from(input).map_err(|_| anyhow!("{} ({}) exceeds {}", name, input, u32::MAX))
}

/// A candidate item. The ratio is derived from weight and value and can not
/// be set independently.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "ItemData")]
pub struct Item {
    id: usize,
    weight: u32,
    value: u32,
    ratio: f64,
}

#[derive(Deserialize)]
struct ItemData {
    id: usize,
    weight: u32,
    value: u32,
}

impl TryFrom<ItemData> for Item {
    type Error = anyhow::Error;

    fn try_from(data: ItemData) -> Result<Self> {
        Item::new(data.id, data.weight, data.value)
    }
}

impl Item {
    pub fn new(id: usize, weight: u32, value: u32) -> Result<Self> {
        if id == 0 {
            return Err(anyhow!("Item ids are 1-based"));
        }
        if weight == 0 {
            return Err(anyhow!("Item ({}) weight must be positive", id));
        }
        if value == 0 {
            return Err(anyhow!("Item ({}) value must be positive", id));
        }
        Ok(Self::unchecked(id, weight, value))
    }

    fn unchecked(id: usize, weight: u32, value: u32) -> Self {
        Self {
            id,
            weight,
            value,
            ratio: ratio_of(value, weight),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Exact comparison of value/weight ratios by cross multiplication.
    pub fn cmp_ratio(&self, other: &Item) -> Ordering {
        (self.value as u64 * other.weight as u64).cmp(&(other.value as u64 * self.weight as u64))
    }

    fn renumbered(&self, id: usize) -> Self {
        Self::unchecked(id, self.weight, self.value)
    }
}

/// Parameters for random instance generation. Capacity is `budget` percent of
/// the total generated weight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Track {
    pub n_items: usize,
    pub max_weight: u32,
    pub max_value: u32,
    pub budget: u32,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            n_items: 6,
            max_weight: 20,
            max_value: 100,
            budget: 50,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n_items={},max_weight={},max_value={},budget={}",
            self.n_items, self.max_weight, self.max_value, self.budget
        )
    }
}

impl FromStr for Track {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut track = Track::default();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected key=value, got '{}'", pair))?;
            let parse_err = |e| anyhow!("Invalid value for {}: {}", key, e);
            match key.trim() {
                "n_items" => track.n_items = value.trim().parse().map_err(parse_err)?,
                "max_weight" => track.max_weight = value.trim().parse().map_err(parse_err)?,
                "max_value" => track.max_value = value.trim().parse().map_err(parse_err)?,
                "budget" => track.budget = value.trim().parse().map_err(parse_err)?,
                other => return Err(anyhow!("Unknown track parameter '{}'", other)),
            }
        }
        Ok(track)
    }
}

/// Outcome of a solve: the chosen item ids in ascending order and their totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub items: Vec<usize>,
    pub total_value: u64,
    pub total_weight: u64,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The problem instance: an ordered item catalog and a knapsack capacity.
///
/// Every successful mutation bumps `revision`, which is how results computed
/// against an older catalog are recognised as stale.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(try_from = "ChallengeData")]
pub struct Challenge {
    items: Vec<Item>,
    capacity: u32,
    #[serde(skip_serializing)]
    revision: u64,
}

#[derive(Deserialize)]
struct ChallengeData {
    items: Vec<ItemSpec>,
    capacity: u32,
}

#[derive(Deserialize)]
struct ItemSpec {
    weight: u32,
    value: u32,
}

impl TryFrom<ChallengeData> for Challenge {
    type Error = anyhow::Error;

    fn try_from(data: ChallengeData) -> Result<Self> {
        let pairs: Vec<(u32, u32)> = data.items.iter().map(|i| (i.weight, i.value)).collect();
        Challenge::from_pairs(data.capacity, &pairs)
    }
}

impl Challenge {
    /// An empty catalog. A zero capacity is raised to 1.
    pub fn new(capacity: u32) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
            revision: 0,
        }
    }

    /// Builds a catalog from `(weight, value)` pairs, numbering items 1..=n.
    pub fn from_pairs(capacity: u32, pairs: &[(u32, u32)]) -> Result<Self> {
        if capacity == 0 {
            return Err(anyhow!("Capacity must be a positive integer"));
        }
        let items = pairs
            .iter()
            .enumerate()
            .map(|(i, &(weight, value))| Item::new(i + 1, weight, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            items,
            capacity,
            revision: 0,
        })
    }

    /// Three items, capacity 50. Greedy and DP disagree on this instance.
    pub fn sample() -> Self {
        Self {
            items: vec![
                Item::unchecked(1, 10, 60),
                Item::unchecked(2, 20, 100),
                Item::unchecked(3, 30, 120),
            ],
            capacity: 50,
            revision: 0,
        }
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        if track.max_weight == 0 || track.max_value == 0 {
            return Err(anyhow!(
                "max_weight and max_value must be positive (track: {})",
                track
            ));
        }
        let mut rng = SmallRng::from_seed(*seed);

        let pairs: Vec<(u32, u32)> = (0..track.n_items)
            .map(|_| {
                (
                    rng.gen_range(1..=track.max_weight),
                    rng.gen_range(1..=track.max_value),
                )
            })
            .collect();

        let total_weight: u64 = pairs.iter().map(|&(w, _)| w as u64).sum();
        let capacity = (total_weight * track.budget as u64 / 100).clamp(1, u32::MAX as u64) as u32;

        debug!(%track, capacity, "generated instance");
        Challenge::from_pairs(capacity, &pairs)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: usize) -> Option<&Item> {
        id.checked_sub(1).and_then(|index| self.items.get(index))
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|i| i.weight as u64).sum()
    }

    fn touch(&mut self, operation: &str) {
        self.revision += 1;
        info!(
            operation,
            revision = self.revision,
            num_items = self.items.len(),
            capacity = self.capacity,
            "catalog changed, previous results invalidated"
        );
    }

    fn index_of(&self, id: usize) -> Result<usize> {
        match self.item(id) {
            Some(_) => Ok(id - 1),
            None => Err(anyhow!(
                "No item with id {} (catalog holds {} items)",
                id,
                self.items.len()
            )),
        }
    }

    /// Appends an item with the next dense id. Rejected input leaves the
    /// catalog untouched.
    pub fn add_item(&mut self, weight: i64, value: i64) -> Result<Item> {
        let (weight, value) = match (positive_u32("weight", weight), positive_u32("value", value)) {
            (Ok(w), Ok(v)) => (w, v),
            (Err(e), _) | (_, Err(e)) => {
                warn!("add_item rejected: {}", e);
                return Err(e);
            }
        };
        let item = Item::unchecked(self.items.len() + 1, weight, value);
        self.items.push(item.clone());
        self.touch("add_item");
        Ok(item)
    }

    /// Removes an item and renumbers the remaining items to 1..=k in their
    /// current order. Ids are therefore not stable across removals.
    pub fn remove_item(&mut self, id: usize) -> Result<Item> {
        let index = self.index_of(id).map_err(|e| {
            warn!("remove_item rejected: {}", e);
            e
        })?;
        let removed = self.items.remove(index);
        self.items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| item.renumbered(i + 1))
            .collect();
        self.touch("remove_item");
        Ok(removed)
    }

    /// Replaces the weight and value of an item, recomputing its ratio.
    pub fn update_item(&mut self, id: usize, weight: i64, value: i64) -> Result<Item> {
        let checked = self.index_of(id).and_then(|index| {
            Ok((
                index,
                positive_u32("weight", weight)?,
                positive_u32("value", value)?,
            ))
        });
        let (index, weight, value) = checked.map_err(|e| {
            warn!("update_item rejected: {}", e);
            e
        })?;
        let item = Item::unchecked(id, weight, value);
        self.items[index] = item.clone();
        self.touch("update_item");
        Ok(item)
    }

    /// Sets the capacity, returning the value actually stored. Non-positive
    /// input becomes 1 and input above `u32::MAX` is clamped.
    pub fn set_capacity(&mut self, capacity: i64) -> u32 {
        self.capacity = if capacity < 1 {
            warn!(capacity, "non-positive capacity replaced by 1");
            1
        } else {
            u32::try_from(capacity).unwrap_or(u32::MAX)
        };
        self.touch("set_capacity");
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch("clear");
    }

    /// Checks the catalog invariants. Solvers call this on entry.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(anyhow!("Capacity must be a positive integer"));
        }
        for (position, item) in self.items.iter().enumerate() {
            if item.id != position + 1 {
                return Err(anyhow!(
                    "Item ids must be dense and 1-based: position {} holds id {}",
                    position,
                    item.id
                ));
            }
            if item.weight == 0 || item.value == 0 {
                return Err(anyhow!(
                    "Item ({}) must have positive weight and value",
                    item.id
                ));
            }
            if item.ratio != ratio_of(item.value, item.weight) {
                return Err(anyhow!("Item ({}) ratio is out of date", item.id));
            }
        }
        Ok(())
    }

    /// Totals of a selection, checking it is a feasible subset of the catalog.
    pub fn evaluate_selection(&self, ids: &[usize]) -> Result<Solution> {
        let selected: HashSet<usize> = ids.iter().cloned().collect();
        if selected.len() != ids.len() {
            return Err(anyhow!("Duplicate items selected."));
        }
        let mut items: Vec<usize> = selected.into_iter().collect();
        items.sort();

        let mut total_value = 0u64;
        let mut total_weight = 0u64;
        for &id in &items {
            let item = self
                .item(id)
                .ok_or_else(|| anyhow!("Item ({}) is out of bounds", id))?;
            total_value += item.value as u64;
            total_weight += item.weight as u64;
        }

        if total_weight > self.capacity as u64 {
            return Err(anyhow!(
                "Total weight ({}) exceeded capacity ({})",
                total_weight,
                self.capacity
            ));
        }
        Ok(Solution {
            items,
            total_value,
            total_weight,
        })
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        let evaluated = self.evaluate_selection(&solution.items)?;
        if evaluated.items != solution.items {
            return Err(anyhow!("Selected items must be listed in ascending order"));
        }
        if evaluated.total_value != solution.total_value {
            return Err(anyhow!(
                "Claimed total value ({}) does not match selection ({})",
                solution.total_value,
                evaluated.total_value
            ));
        }
        if evaluated.total_weight != solution.total_weight {
            return Err(anyhow!(
                "Claimed total weight ({}) does not match selection ({})",
                solution.total_weight,
                evaluated.total_weight
            ));
        }
        Ok(())
    }

    /// Optimal selection by enumerating every subset. Only usable for small
    /// catalogs, see `MAX_EXHAUSTIVE_ITEMS`.
    pub fn compute_exhaustive_baseline(&self) -> Result<Solution> {
        baselines::exhaustive::solve_challenge(self)
    }
}
