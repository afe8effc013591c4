//! Replan Binary
//!
//! Runs the Replanning Loop over the toy collaborator: plans, executes
//! stochastically against a seeded RNG, and replans on deviation until
//! the goal is reached or a limit fires.

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wayfarer::config::SolverConfig;
use wayfarer::replan::{self, ReplanOutcome};
use wayfarer::toy::{ToyWorld, FIREMAKING, THIEVING, WOODCUTTING};
use wayfarer::types::Goal;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    goal: GoalArg,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, default_value_t = 50)]
    max_replans: usize,
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
    let mut config = SolverConfig::default();
    config.max_replans = args.max_replans;
    let mut rng = SmallRng::seed_from_u64(args.seed);

    match replan::solve_with_replanning(
        &state,
        &goal,
        world.registries.as_ref(),
        &world.estimator,
        &world.sim,
        &world.value_model,
        &world.enumerator,
        &config,
        args.seed,
        &mut rng,
    ) {
        ReplanOutcome::Done { state, total_ticks, replans } => {
            println!("done in {replans} replan(s), {total_ticks} ticks");
            println!("terminal currency: {}", state.currency());
        }
        ReplanOutcome::Terminated { state, boundary, total_ticks, replans } => {
            eprintln!("terminated after {replans} replan(s), {total_ticks} ticks: {boundary}");
            eprintln!("terminal currency: {}", state.currency());
            std::process::exit(1);
        }
    }
}
