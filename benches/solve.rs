criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        solving_single_skill_goal,
        solving_consuming_skill_goal,
        solving_multi_skill_goal,
        solving_currency_goal_with_segments,
}

fn solving_single_skill_goal(c: &mut criterion::Criterion) {
    let world = ToyWorld::new();
    let state = world.initial_state();
    let goal = Goal::ReachSkillLevel { skill: WOODCUTTING, target_level: 5 };
    let config = SolverConfig::default();
    c.bench_function("solve a single-skill goal", |b| {
        b.iter(|| {
            driver::solve(
                &state,
                &goal,
                world.registries.as_ref(),
                &world.estimator,
                &world.sim,
                &world.value_model,
                &world.enumerator,
                &config,
                1,
            )
        })
    });
}

fn solving_consuming_skill_goal(c: &mut criterion::Criterion) {
    let world = ToyWorld::new();
    let state = world.initial_state();
    let goal = Goal::ReachSkillLevel { skill: FIREMAKING, target_level: 3 };
    let config = SolverConfig::default();
    c.bench_function("solve a consuming-skill goal (auto-gather macro)", |b| {
        b.iter(|| {
            driver::solve(
                &state,
                &goal,
                world.registries.as_ref(),
                &world.estimator,
                &world.sim,
                &world.value_model,
                &world.enumerator,
                &config,
                1,
            )
        })
    });
}

fn solving_multi_skill_goal(c: &mut criterion::Criterion) {
    let world = ToyWorld::new();
    let state = world.initial_state();
    let goal = Goal::MultiSkill { subgoals: vec![(WOODCUTTING, 3), (FIREMAKING, 3)] };
    let config = SolverConfig::default();
    c.bench_function("solve a multi-skill conjunction", |b| {
        b.iter(|| {
            driver::solve(
                &state,
                &goal,
                world.registries.as_ref(),
                &world.estimator,
                &world.sim,
                &world.value_model,
                &world.enumerator,
                &config,
                1,
            )
        })
    });
}

fn solving_currency_goal_with_segments(c: &mut criterion::Criterion) {
    let world = ToyWorld::new();
    let state = world.initial_state();
    let goal = Goal::ReachCurrency { target: 200 };
    let config = SolverConfig::default();
    c.bench_function("solve a currency goal crossing an upgrade boundary", |b| {
        b.iter(|| {
            segment::solve_to_goal(
                &state,
                &goal,
                world.registries.as_ref(),
                &world.estimator,
                &world.sim,
                &world.value_model,
                &world.enumerator,
                &config,
                1,
            )
        })
    });
}

use wayfarer::config::SolverConfig;
use wayfarer::driver;
use wayfarer::segment;
use wayfarer::toy::{ToyWorld, FIREMAKING, WOODCUTTING};
use wayfarer::types::Goal;
