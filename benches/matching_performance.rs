//! Performance benchmarks for matching passes

use automatch::config::MatchingConfig;
use automatch::matching::GroupAssembler;
use automatch::requirement::load_seeks;
use automatch::types::{Player, RatingTier, Requirement, Seek};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_pool(size: usize, seed: u64) -> Vec<Seek> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let tier = match rng.gen_range(0..10) {
                0..=1 => RatingTier::Pro,
                2..=6 => RatingTier::Casual,
                _ => RatingTier::Unrated,
            };
            let min = rng.gen_range(2..=4);
            let max = rng.gen_range(min..=6);
            let player = Player::new(format!("player{i}"))
                .with_sets((0..rng.gen_range(0..4)).map(|s| format!("set{s}")));

            Seek::new(
                player,
                vec![
                    Requirement::party_size(min, max),
                    Requirement::rating_tier(tier),
                ],
            )
        })
        .collect()
}

fn bench_pass_by_pool_size(c: &mut Criterion) {
    let assembler = GroupAssembler::new(MatchingConfig::default());
    let mut group = c.benchmark_group("run_pass");

    for size in [50, 500, 5000] {
        let pool = create_pool(size, 17);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                let outcome = assembler.run_pass(black_box(pool), &mut rng);
                black_box(outcome.matches.len())
            });
        });
    }

    group.finish();
}

fn bench_unhostable_pool(c: &mut Criterion) {
    // Every trial fails, so each anchor burns its full trial budget
    let assembler = GroupAssembler::new(MatchingConfig::default());
    let pool: Vec<Seek> = (0..500)
        .map(|i| {
            Seek::new(
                Player::new(format!("guest{i}")).without_hosting(),
                vec![
                    Requirement::party_size(2, 6),
                    Requirement::rating_tier(RatingTier::Casual),
                ],
            )
        })
        .collect();

    c.bench_function("run_pass_unhostable_500", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| {
            let outcome = assembler.run_pass(black_box(&pool), &mut rng);
            black_box(outcome.stats.failed_trials)
        });
    });
}

fn bench_seek_ingestion(c: &mut Criterion) {
    let records: Vec<serde_json::Value> = (0..1000)
        .map(|i| {
            serde_json::json!({
                "player": {"name": format!("player{i}"), "sets_owned": ["base"]},
                "requirements": [
                    {"kind": "party_size", "min_players": "2", "max_players": 4},
                    {"kind": "rating_tier", "tier": "casual"},
                    {"kind": "score_display", "value": "on"}
                ]
            })
        })
        .collect();
    let json = serde_json::Value::Array(records).to_string();

    c.bench_function("load_seeks_1000", |b| {
        b.iter(|| load_seeks(black_box(&json)).map(|seeks| seeks.len()))
    });
}

criterion_group!(
    benches,
    bench_pass_by_pool_size,
    bench_unhostable_pool,
    bench_seek_ingestion
);
criterion_main!(benches);
