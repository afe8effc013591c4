//! Solve Binary
//!
//! One-shot planning over the toy collaborator: builds a goal from the
//! command line, runs `driver::solve` (or the Segment Loop for currency
//! goals, which need it to cross upgrade boundaries), and prints the plan.

use clap::{Parser, Subcommand};
use wayfarer::config::SolverConfig;
use wayfarer::driver::{self, SolveOutcome};
use wayfarer::segment;
use wayfarer::toy::{ToyWorld, FIREMAKING, THIEVING, WOODCUTTING};
use wayfarer::types::Goal;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    goal: GoalArg,

    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Subcommand)]
enum GoalArg {
    #[command(about = "Reach a currency target")]
    Currency { target: i64 },
    #[command(about = "Reach a skill level (woodcutting, firemaking, thieving)")]
    Skill { skill: String, level: u32 },
}

fn resolve_skill(name: &str) -> Result<wayfarer::types::SkillId, String> {
    match name {
        "woodcutting" => Ok(WOODCUTTING),
        "firemaking" => Ok(FIREMAKING),
        "thieving" => Ok(THIEVING),
        other => Err(format!("unknown skill {other:?}")),
    }
}

fn main() {
    wayfarer::init_logging();
    let args = Args::parse();

    let goal = match args.goal {
        GoalArg::Currency { target } => Goal::ReachCurrency { target },
        GoalArg::Skill { skill, level } => match resolve_skill(&skill) {
            Ok(skill) => Goal::ReachSkillLevel { skill, target_level: level },
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    };

    let world = ToyWorld::new();
    let state = world.initial_state();
    let config = SolverConfig::default();

    if matches!(goal, Goal::ReachCurrency { .. }) {
        match segment::solve_to_goal(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            args.seed,
        ) {
            Ok(segments) => {
                let total_ticks: u64 = segments.iter().map(|s| s.plan.total_ticks).sum();
                println!("solved in {} segment(s), {total_ticks} ticks", segments.len());
                if let Some(last) = segments.last() {
                    println!("terminal currency: {}", last.terminal_state.currency());
                }
            }
            Err(failure) => {
                eprintln!("segment loop failed: {failure}");
                std::process::exit(1);
            }
        }
        return;
    }

    match driver::solve(
        &state,
        &goal,
        world.registries.as_ref(),
        &world.estimator,
        &world.sim,
        &world.value_model,
        &world.enumerator,
        &config,
        args.seed,
    ) {
        SolveOutcome::Success { plan, terminal_state, profile } => {
            println!(
                "solved: {} step(s), {} ticks, {} expected deaths",
                plan.steps.len(),
                plan.total_ticks,
                plan.expected_deaths
            );
            println!("expanded {} nodes, enqueued {}", profile.expanded_nodes, profile.enqueued_nodes);
            println!("terminal currency: {}", terminal_state.currency());
        }
        SolveOutcome::Failed { failure, profile } => {
            eprintln!("solve failed: {failure} (expanded {} nodes)", profile.expanded_nodes);
            std::process::exit(1);
        }
    }
}
