//! Learning extension of the agent loop.
//!
//! A [`LearningAgent`] accepts a scalar reward for its previous action and
//! keeps a log of [`Experience`] records. The feedback-bearing cycle lets a
//! training loop hand over the reward for step `t` together with the
//! observation for step `t + 1`:
//!
//! ```text
//! observe(s0) → act(a0) → reward r0 arrives → observe(s1) + learn(r0) → act(a1) → ...
//! ```

pub mod q_table;

pub use q_table::{ActionId, QTable, QTableSummary, StateActionPair, StateId};

use crate::agent::{begin_cycle, complete_cycle, guarded, Agent, AgentState};
use crate::error::{Error, Result};
use crate::observation::Observation;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// A single `(state, action, reward, next_state)` tuple recorded by `learn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: StateId,
    pub action: ActionId,
    pub reward: f64,
    pub next_state: StateId,
    /// The value stored for `(state, action)` after the update.
    pub q_value: f64,
    pub timestamp: Timestamp,
}

impl Experience {
    /// Creates a new `Experience` tuple.
    pub fn new(
        state: StateId,
        action: ActionId,
        reward: f64,
        next_state: StateId,
        q_value: f64,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            q_value,
            timestamp: Timestamp::now(),
        }
    }
}

/// An [`Agent`] that improves from reward feedback.
pub trait LearningAgent: Agent {
    /// Applies `reward` to the most recent decision.
    ///
    /// Fails with [`Error::NonFiniteReward`](crate::Error::NonFiniteReward) for
    /// NaN or infinite rewards and with
    /// [`Error::NoPendingDecision`](crate::Error::NoPendingDecision) when no
    /// decision is waiting for a reward.
    fn learn(&mut self, reward: f64) -> Result<()>;

    /// Returns `true` while a decision is waiting for its reward.
    fn has_pending_action(&self) -> bool;

    /// Every experience recorded so far, oldest first.
    fn experiences(&self) -> &[Experience];

    /// Runs a cycle, first crediting `reward` to the previous action.
    ///
    /// The observation is perceived before learning so the update uses it as
    /// the next state. A finite reward with no pending action is ignored. A
    /// NaN or infinite reward fails before anything is recorded or perceived,
    /// so the step can be retried with a valid reward.
    fn run_cycle_with_feedback(
        &mut self,
        observation: Observation,
        reward: Option<f64>,
    ) -> Result<Option<Self::Output>> {
        if let Some(r) = reward.filter(|r| !r.is_finite()) {
            return Err(Error::NonFiniteReward(r));
        }
        begin_cycle(self, observation)?;

        match reward {
            Some(reward) if self.has_pending_action() => {
                self.core_mut().transition(AgentState::Learning)?;
                guarded(self, |a| a.learn(reward))?;
                self.core_mut().transition(AgentState::Thinking)?;
            }
            Some(reward) => {
                log::debug!(
                    "agent '{}': reward {} ignored, no pending action",
                    self.name(),
                    reward
                );
            }
            None => {}
        }

        complete_cycle(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::agent::AgentCore;

    /// Sums rewards and records the state seen while learning.
    struct Tally {
        core: AgentCore,
        pending: bool,
        total: f64,
        learn_states: Vec<AgentState>,
        log: Vec<Experience>,
    }

    impl Tally {
        fn new() -> Self {
            Self {
                core: AgentCore::new("tally"),
                pending: false,
                total: 0.0,
                learn_states: Vec::new(),
                log: Vec::new(),
            }
        }
    }

    impl Agent for Tally {
        type Output = ();

        fn core(&self) -> &AgentCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut AgentCore {
            &mut self.core
        }

        fn perceive(&mut self, _observation: &Observation) -> Result<()> {
            Ok(())
        }

        fn decide(&mut self) -> Result<Option<Action>> {
            self.pending = true;
            Ok(Some(Action::new("step")))
        }

        fn act(&mut self, _action: &Action) -> Result<()> {
            Ok(())
        }
    }

    impl LearningAgent for Tally {
        fn learn(&mut self, reward: f64) -> Result<()> {
            if !reward.is_finite() {
                return Err(Error::NonFiniteReward(reward));
            }
            if !self.pending {
                return Err(Error::NoPendingDecision);
            }
            self.learn_states.push(self.state());
            self.total += reward;
            self.pending = false;
            self.log.push(Experience::new(
                "s".into(),
                "step".into(),
                reward,
                "s".into(),
                self.total,
            ));
            Ok(())
        }

        fn has_pending_action(&self) -> bool {
            self.pending
        }

        fn experiences(&self) -> &[Experience] {
            &self.log
        }
    }

    #[test]
    fn test_feedback_cycle_learns_before_deciding() {
        let mut agent = Tally::new();

        agent.run_cycle_with_feedback(Observation::new(0), None).unwrap();
        assert!(agent.has_pending_action());

        agent
            .run_cycle_with_feedback(Observation::new(1), Some(2.5))
            .unwrap();

        assert_eq!(agent.total, 2.5);
        assert_eq!(agent.learn_states, vec![AgentState::Learning]);
        assert_eq!(agent.experiences().len(), 1);
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.actions_taken().len(), 2);
    }

    #[test]
    fn test_reward_without_pending_action_is_ignored() {
        let mut agent = Tally::new();

        agent
            .run_cycle_with_feedback(Observation::new(0), Some(1.0))
            .unwrap();

        assert_eq!(agent.total, 0.0);
        assert!(agent.experiences().is_empty());
    }

    #[test]
    fn test_non_finite_reward_leaves_agent_untouched() {
        let mut agent = Tally::new();
        agent.run_cycle_with_feedback(Observation::new(0), None).unwrap();

        let err = agent
            .run_cycle_with_feedback(Observation::new(1), Some(f64::NAN))
            .unwrap_err();

        assert!(matches!(err, Error::NonFiniteReward(r) if r.is_nan()));
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.observations().len(), 1);
        assert_eq!(agent.actions_taken().len(), 1);
        assert!(agent.has_pending_action());
        assert!(agent.learn_states.is_empty());
    }

    #[test]
    fn test_non_finite_reward_without_pending_action_fails() {
        let mut agent = Tally::new();

        let err = agent
            .run_cycle_with_feedback(Observation::new(0), Some(f64::INFINITY))
            .unwrap_err();

        assert!(matches!(err, Error::NonFiniteReward(r) if r.is_infinite()));
        assert!(agent.observations().is_empty());
        assert!(!agent.has_pending_action());
    }

    #[test]
    fn test_failed_learn_returns_to_idle() {
        struct Refusing(Tally);

        impl Agent for Refusing {
            type Output = ();

            fn core(&self) -> &AgentCore {
                self.0.core()
            }

            fn core_mut(&mut self) -> &mut AgentCore {
                self.0.core_mut()
            }

            fn perceive(&mut self, observation: &Observation) -> Result<()> {
                self.0.perceive(observation)
            }

            fn decide(&mut self) -> Result<Option<Action>> {
                self.0.decide()
            }

            fn act(&mut self, action: &Action) -> Result<()> {
                self.0.act(action)
            }
        }

        impl LearningAgent for Refusing {
            fn learn(&mut self, _reward: f64) -> Result<()> {
                Err(Error::Internal("value store unavailable".into()))
            }

            fn has_pending_action(&self) -> bool {
                self.0.has_pending_action()
            }

            fn experiences(&self) -> &[Experience] {
                self.0.experiences()
            }
        }

        let mut agent = Refusing(Tally::new());
        agent.run_cycle_with_feedback(Observation::new(0), None).unwrap();

        let err = agent
            .run_cycle_with_feedback(Observation::new(1), Some(1.0))
            .unwrap_err();

        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.actions_taken().len(), 1);
    }
}
