//! Sparse state-action value table.
//!
//! Entries are created lazily: any `(state, action)` pair that has never been
//! written reads as `0.0`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A hashable key identifying a discrete environment state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(String);

impl StateId {
    /// Creates a `StateId` from a raw string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of an action in a learning agent's action set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(String);

impl ActionId {
    /// Creates an `ActionId` from a raw string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A composite key representing a state-action pair, used for indexing Q-values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateActionPair {
    pub state: StateId,
    pub action: ActionId,
}

impl StateActionPair {
    /// Creates the key for `(state, action)`.
    pub fn new(state: StateId, action: ActionId) -> Self {
        Self { state, action }
    }
}

/// Aggregate statistics over a Q-table and its experience log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableSummary {
    /// Number of stored `(state, action)` entries.
    pub total_entries: usize,
    /// Number of experiences recorded by `learn`.
    pub total_experiences: usize,
    /// Arithmetic mean of all stored values, `0.0` for an empty table.
    pub average_q_value: f64,
    /// Number of distinct states with at least one stored entry.
    pub states_visited: usize,
}

/// The learned values of state-action pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<StateActionPair, f64>,
}

impl QTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `(state, action)`, `0.0` when absent.
    pub fn get(&self, state: &StateId, action: &ActionId) -> f64 {
        let pair = StateActionPair::new(state.clone(), action.clone());
        self.values.get(&pair).copied().unwrap_or(0.0)
    }

    /// Stores a value for `(state, action)`.
    pub fn set(&mut self, state: StateId, action: ActionId, value: f64) {
        self.values.insert(StateActionPair::new(state, action), value);
    }

    /// The best value reachable from `state` over `actions`.
    ///
    /// Absent entries count as `0.0`, so an unseen state yields `0.0`. An
    /// empty action slice also yields `0.0`.
    pub fn max_value(&self, state: &StateId, actions: &[ActionId]) -> f64 {
        actions
            .iter()
            .map(|action| self.get(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// The action in `actions` with the highest value at `state`.
    ///
    /// Ties go to the action that appears first in `actions`.
    pub fn best_action<'a>(&self, state: &StateId, actions: &'a [ActionId]) -> Option<&'a ActionId> {
        let mut best: Option<(&ActionId, f64)> = None;
        for action in actions {
            let q = self.get(state, action);
            match best {
                Some((_, best_q)) if q <= best_q => {}
                _ => best = Some((action, q)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct states with at least one stored entry.
    pub fn state_count(&self) -> usize {
        self.values
            .keys()
            .map(|pair| &pair.state)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Mean of all stored values, `0.0` for an empty table.
    pub fn mean_value(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.values().sum::<f64>() / self.values.len() as f64
    }

    /// Summarizes the table alongside the size of an experience log.
    pub fn summary(&self, total_experiences: usize) -> QTableSummary {
        QTableSummary {
            total_entries: self.len(),
            total_experiences,
            average_q_value: self.mean_value(),
            states_visited: self.state_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(names: &[&str]) -> Vec<ActionId> {
        names.iter().map(|n| ActionId::from(*n)).collect()
    }

    #[test]
    fn test_absent_entries_read_as_zero() {
        let table = QTable::new();
        assert_eq!(table.get(&"s0".into(), &"left".into()), 0.0);
        assert_eq!(table.max_value(&"s0".into(), &actions(&["left", "right"])), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut table = QTable::new();
        table.set("s0".into(), "left".into(), 5.0);

        assert_eq!(table.get(&"s0".into(), &"left".into()), 5.0);
        assert_eq!(table.get(&"s0".into(), &"right".into()), 0.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_max_value_counts_absent_as_zero() {
        let mut table = QTable::new();
        table.set("s0".into(), "left".into(), -3.0);

        let acts = actions(&["left", "right"]);
        assert_eq!(table.max_value(&"s0".into(), &acts), 0.0);

        table.set("s0".into(), "right".into(), -1.0);
        assert_eq!(table.max_value(&"s0".into(), &acts), -1.0);
        assert_eq!(table.max_value(&"s0".into(), &[]), 0.0);
    }

    #[test]
    fn test_best_action_prefers_highest() {
        let mut table = QTable::new();
        table.set("s0".into(), "left".into(), 5.0);
        table.set("s0".into(), "right".into(), 1.0);

        let acts = actions(&["left", "right"]);
        assert_eq!(table.best_action(&"s0".into(), &acts).unwrap().as_str(), "left");
    }

    #[test]
    fn test_best_action_ties_go_to_first_declared() {
        let mut table = QTable::new();
        let acts = actions(&["up", "down", "left"]);

        assert_eq!(table.best_action(&"s".into(), &acts).unwrap().as_str(), "up");

        table.set("s".into(), "down".into(), 2.0);
        table.set("s".into(), "left".into(), 2.0);
        assert_eq!(table.best_action(&"s".into(), &acts).unwrap().as_str(), "down");

        assert!(table.best_action(&"s".into(), &[]).is_none());
    }

    #[test]
    fn test_summary() {
        let mut table = QTable::new();
        assert_eq!(
            table.summary(0),
            QTableSummary {
                total_entries: 0,
                total_experiences: 0,
                average_q_value: 0.0,
                states_visited: 0,
            }
        );

        table.set("s0".into(), "left".into(), 1.0);
        table.set("s0".into(), "right".into(), 3.0);
        table.set("s1".into(), "left".into(), 2.0);

        let summary = table.summary(4);
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_experiences, 4);
        assert!((summary.average_q_value - 2.0).abs() < 1e-12);
        assert_eq!(summary.states_visited, 2);
    }
}
