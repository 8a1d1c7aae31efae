//! Benchmarks for the agent loop
//!
//! Run with: cargo bench -p autonomous_agents

use autonomous_agents::{
    Action, Agent, LearningAgent, Observation, QLearningAgent, QLearningConfig, ReactiveAgent,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn reactive_with_rules(count: usize) -> ReactiveAgent {
    let mut agent = ReactiveAgent::new("bench");
    for i in 0..count {
        let name = format!("action_{}", i);
        agent.add_rule(&format!("cond_{}", i), move |_| Action::new(name.as_str()));
    }
    agent.set_default_action(Action::new("noop"));
    agent
}

/// Benchmark reactive decisions for growing rule tables
fn bench_reactive_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reactive Cycle");

    for rules in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("rules", rules), &rules, |b, &rules| {
            let mut agent = reactive_with_rules(rules);
            let obs = Observation::new(json!({"type": "cond_0", "temperature": 25}));
            b.iter(|| {
                let out = agent.run_cycle(black_box(obs.clone()));
                agent.reset();
                black_box(out)
            });
        });
    }

    group.finish();
}

/// Benchmark epsilon-greedy selection
fn bench_q_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("Q Decide");

    for actions in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("actions", actions), &actions, |b, &actions| {
            let names: Vec<String> = (0..actions).map(|i| format!("a{}", i)).collect();
            let config = QLearningConfig::new("bench", &names).with_seed(1);
            let mut agent = QLearningAgent::new(config).unwrap();
            agent.perceive(&Observation::new("s0")).unwrap();

            b.iter(|| black_box(agent.decide().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark a full learning step over a small state space
fn bench_q_feedback_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Q Feedback Cycle");

    group.bench_function("16_states", |b| {
        let config = QLearningConfig::new("bench", &["up", "down", "left", "right"]).with_seed(7);
        let mut agent = QLearningAgent::new(config).unwrap();
        let observations: Vec<_> = (0..16).map(|i| Observation::new(json!({"cell": i}))).collect();
        let mut i = 0;

        b.iter(|| {
            let obs = observations[i % observations.len()].clone();
            i += 1;
            let out = agent.run_cycle_with_feedback(black_box(obs), Some(-1.0));
            // Keep the histories bounded.
            if i % 1024 == 0 {
                agent.reset();
            }
            black_box(out)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reactive_cycle,
    bench_q_decide,
    bench_q_feedback_cycle,
);
criterion_main!(benches);
