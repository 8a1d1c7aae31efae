//! Reactive thermostat
//!
//! Classifies temperature readings and lets a rule-based agent respond to
//! each class.
//!
//! Run with: cargo run --example thermostat

use autonomous_agents::*;
use serde_json::json;

const TARGET_TEMP: i64 = 20;

fn classify(temperature: f64) -> &'static str {
    if temperature > 25.0 {
        "hot"
    } else if temperature < 18.0 {
        "cold"
    } else {
        "comfortable"
    }
}

fn main() -> Result<()> {
    println!("=== Reactive Thermostat ===\n");

    let mut agent = create_reactive_agent("thermostat");
    agent.add_rule("hot", |data| {
        Action::new("cool_down")
            .with_param("target_temp", TARGET_TEMP)
            .with_param("current_temp", data["temperature"].clone())
    });
    agent.add_rule("cold", |data| {
        Action::new("heat_up")
            .with_param("target_temp", TARGET_TEMP)
            .with_param("current_temp", data["temperature"].clone())
    });
    agent.add_rule("comfortable", |data| {
        Action::new("maintain").with_param("current_temp", data["temperature"].clone())
    });
    agent.set_default_action(Action::new("idle"));

    for temperature in [15.0, 22.0, 28.0, 19.5, 30.0, 12.0] {
        let observation = Observation::new(json!({
            "type": classify(temperature),
            "temperature": temperature,
        }));

        match agent.run_cycle(observation)? {
            Some(result) => println!(
                "{:>5.1}°C -> {:<10} {:?}",
                temperature, result.action, result.parameters
            ),
            None => println!("{:>5.1}°C -> no action", temperature),
        }
    }

    println!(
        "\nProcessed {} observations, took {} actions",
        agent.observations().len(),
        agent.actions_taken().len()
    );
    Ok(())
}
