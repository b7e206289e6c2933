pub mod knapsack;
pub use knapsack::{Challenge, Item, Solution, Track};
