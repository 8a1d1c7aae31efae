//! Grid world Q-learning
//!
//! Trains a Q-learning agent to walk from the top-left corner of a 3x3 grid
//! to the bottom-right corner, then evaluates the greedy policy.
//!
//! Run with: cargo run --example grid_world

use autonomous_agents::*;
use serde_json::json;

const SIZE: i64 = 3;
const GOAL: (i64, i64) = (2, 2);
const MAX_STEPS: usize = 50;
const EPISODES: usize = 200;

const GOAL_REWARD: f64 = 100.0;
const STEP_REWARD: f64 = -1.0;
const TIMEOUT_REWARD: f64 = -50.0;

struct GridWorld {
    pos: (i64, i64),
}

impl GridWorld {
    fn new() -> Self {
        Self { pos: (0, 0) }
    }

    fn observe(&self) -> Observation {
        Observation::new(json!({"x": self.pos.0, "y": self.pos.1}))
    }

    /// Applies a move, clamped to the grid. Returns `true` at the goal.
    fn apply(&mut self, action: &str) -> bool {
        let (x, y) = self.pos;
        let (nx, ny) = match action {
            "up" => (x, y - 1),
            "down" => (x, y + 1),
            "left" => (x - 1, y),
            "right" => (x + 1, y),
            _ => (x, y),
        };
        self.pos = (nx.clamp(0, SIZE - 1), ny.clamp(0, SIZE - 1));
        self.pos == GOAL
    }
}

fn run_episode(agent: &mut QLearningAgent) -> Result<(usize, f64)> {
    let mut world = GridWorld::new();
    let mut reward = None;
    let mut total = 0.0;

    for steps in 1..=MAX_STEPS {
        let Some(result) = agent.run_cycle_with_feedback(world.observe(), reward)? else {
            break;
        };

        if world.apply(&result.action) {
            agent.run_cycle_with_feedback(world.observe(), Some(GOAL_REWARD))?;
            agent.end_episode();
            return Ok((steps, total + GOAL_REWARD));
        }

        let r = if steps == MAX_STEPS { TIMEOUT_REWARD } else { STEP_REWARD };
        total += r;
        reward = Some(r);
    }

    // Credit the timeout before closing the episode.
    if let Some(r) = reward {
        agent.run_cycle_with_feedback(world.observe(), Some(r))?;
    }
    agent.end_episode();
    Ok((MAX_STEPS, total))
}

fn main() -> Result<()> {
    println!("=== Grid World Q-Learning ===\n");

    let config = QLearningConfig::exploratory("grid_agent", &["up", "down", "left", "right"])
        .with_learning_rate(0.5)
        .with_seed(42);
    let mut agent = QLearningAgent::new(config)?;

    for episode in 1..=EPISODES {
        let (steps, total) = run_episode(&mut agent)?;
        if episode % 25 == 0 {
            println!(
                "episode {:>3}: {:>2} steps, return {:>6.1}, epsilon {:.3}",
                episode,
                steps,
                total,
                agent.exploration_rate()
            );
        }
    }

    let summary = agent.q_table_summary();
    println!(
        "\nQ-table: {} entries over {} states, mean value {:.2}, {} experiences",
        summary.total_entries,
        summary.states_visited,
        summary.average_q_value,
        summary.total_experiences
    );

    println!("\n--- Evaluation (epsilon = 0) ---");
    agent.set_exploration_rate(0.0)?;
    agent.reset();

    let mut world = GridWorld::new();
    let mut path = vec![world.pos];
    for _ in 0..MAX_STEPS {
        let Some(result) = agent.run_cycle(world.observe())? else {
            break;
        };
        let done = world.apply(&result.action);
        path.push(world.pos);
        if done {
            break;
        }
    }

    println!("path: {:?}", path);
    println!(
        "reached goal in {} steps: {}",
        path.len() - 1,
        path.last() == Some(&GOAL)
    );
    Ok(())
}
