//! Patrol Guard State Machine
//!
//! This example drives a small hierarchical AI through a scripted sequence
//! of ticks.
//!
//! Key concepts:
//! - Nested states with default children
//! - Message-driven transitions
//! - A sub-machine spliced into a host state
//! - Leaf edges checked before ancestor edges
//!
//! Run with: cargo run --example patrol_guard

use hfsm::{FnState, Guard, LogState, MessageQueue, StateMachine};
use std::cell::Cell;
use std::rc::Rc;

#[rustfmt::skip]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Patrol Guard State Machine ===\n");

    let messages: MessageQueue = MessageQueue::new();
    let ammo = Rc::new(Cell::new(3u32));

    let shots = Rc::clone(&ammo);
    let refill = Rc::clone(&ammo);
    let empty = Rc::clone(&ammo);

    let combat = StateMachine::builder()
        .add_state("Shoot")
            .set_state(FnState::updating(move || {
                shots.set(shots.get().saturating_sub(1));
                println!("  bang, {} left", shots.get());
            }))
            .add_transition("Reload", Guard::new(move || empty.get() == 0))
            .end_state()
        .add_state("Reload")
            .set_state(LogState::labeled("Reload"))
            .add_transition("Shoot", Guard::always().with_transition(move || refill.set(3)))
            .end_state()
        .build()
        .unwrap();

    let mut guard = StateMachine::builder()
        .add_state("Patrol")
            .set_state(LogState::labeled("Patrol"))
            .add_transition("Combat", messages.on_message("enemy_spotted"))
            .add_state("Walk")
                .add_transition("Rest", messages.on_message("tired"))
                .end_state()
            .add_state("Rest")
                .add_transition("Walk", messages.on_message("rested"))
                .end_state()
            .end_state()
        .add_state("Combat")
            .set_state(LogState::labeled("Combat"))
            .add_transition("Patrol", messages.on_message("enemy_lost"))
            .add_sub_state_machine(combat)
            .end_state()
        .build()
        .unwrap();

    let script: [&[&str]; 8] = [
        &[],
        &["tired"],
        &["rested"],
        &["enemy_spotted"],
        &[],
        &[],
        &[],
        &["enemy_lost"],
    ];

    for (tick, sent) in script.iter().enumerate() {
        for message in sent.iter() {
            messages.send(*message);
        }
        match guard.update() {
            Ok(fired) => println!(
                "tick {tick}: {:<22} fired {fired}, now {}",
                sent.join(","),
                guard.active_path()
            ),
            Err(error) => println!("tick {tick}: {error}"),
        }
    }

    println!("\nFinal snapshot:");
    match serde_json::to_string_pretty(&guard.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(error) => println!("  could not serialize snapshot: {error}"),
    }

    println!("\n=== Example Complete ===");
}
