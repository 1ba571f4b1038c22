//! Benchmarks for matching and inference.

use chrono::{DateTime, Duration, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use goalmatch::inference::InferenceEngine;
use goalmatch::matching::matches_on_keywords;
use goalmatch::model::{Action, ActionabilityHints, Goal};

const UNITS: [&str; 6] = ["km", "minutes", "pages", "sessions", "steps", "words"];
const WORDS: [&str; 6] = ["run", "read", "write", "swim", "lift", "walk"];

fn anchor() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_000_000, 0).unwrap_or_default()
}

fn random_actions(rng: &mut StdRng, n: usize) -> Vec<Action> {
    (0..n)
        .map(|_| {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            let logged = anchor() + Duration::hours(rng.gen_range(-500..500));
            let mut action = Action::new(format!("Evening {word}"), logged);
            for _ in 0..rng.gen_range(1..=3) {
                action.record(UNITS[rng.gen_range(0..UNITS.len())], rng.gen_range(0.0..50.0));
            }
            action
        })
        .collect()
}

fn random_goals(rng: &mut StdRng, n: usize) -> Vec<Goal> {
    (0..n)
        .map(|i| {
            let start = anchor() - Duration::days(rng.gen_range(0..30));
            let mut goal = Goal::new(format!("Goal {i}"))
                .with_window(start, start + Duration::days(rng.gen_range(7..60)));
            for _ in 0..rng.gen_range(1..=2) {
                goal = goal.with_target(UNITS[rng.gen_range(0..UNITS.len())], 100.0);
            }
            if rng.gen_bool(0.5) {
                let unit = goal.targets[0].measure.to_string();
                let word = WORDS[rng.gen_range(0..WORDS.len())];
                goal = goal.with_hints(ActionabilityHints::new([unit], [word]));
            }
            goal
        })
        .collect()
}

fn bench_keywords(c: &mut Criterion) {
    let action = Action::new("Long Ｒｕｎ along the canal", anchor())
        .with_description("Easy pace, felt good");

    c.bench_function("keywords_fold_3", |bench| {
        bench.iter(|| black_box(matches_on_keywords(&action, ["swim", "lift", "run"])))
    });
}

fn bench_infer(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let goals = random_goals(&mut rng, 40);
    let mut group = c.benchmark_group("infer_matches");

    for n in [100, 1_000, 5_000] {
        let actions = random_actions(&mut rng, n);
        let sequential = InferenceEngine::new().with_parallelism(false, 0);
        let sharded = InferenceEngine::new();

        group.bench_with_input(BenchmarkId::new("sequential", n), &actions, |bench, actions| {
            bench.iter(|| black_box(sequential.infer_matches(actions, &goals, true)))
        });
        group.bench_with_input(BenchmarkId::new("sharded", n), &actions, |bench, actions| {
            bench.iter(|| black_box(sharded.infer_matches(actions, &goals, true)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_keywords, bench_infer);
criterion_main!(benches);
