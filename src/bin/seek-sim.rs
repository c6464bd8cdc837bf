//! Seek pool simulator
//!
//! Generates a random pool of seeks and runs repeated matching passes over it,
//! printing how many games each pass forms. Useful for tuning trial counts and
//! party size orders without a running service.
//!
//! Usage:
//!   cargo run --bin seek-sim -- --players 200 --passes 5 --seed 7
//!   cargo run --bin seek-sim -- --players 60 --pro-share 0.5 --arrivals 20

use anyhow::{anyhow, Result};
use automatch::config::MatchingConfig;
use automatch::matching::GroupAssembler;
use automatch::types::{Player, RatingTier, Requirement, ScoreDisplay, Seek};
use automatch::utils::match_rng;
use clap::Parser;
use rand::Rng;
use std::collections::HashSet;
use std::time::Instant;

const SET_NAMES: [&str; 5] = ["base", "seafarers", "cities", "traders", "explorers"];

#[derive(Parser)]
#[command(name = "seek-sim")]
#[command(about = "Simulate matching passes over a randomly generated seek pool")]
struct Cli {
    /// Seeks in the initial pool
    #[arg(short, long, default_value = "100")]
    players: usize,

    /// Passes to run
    #[arg(long, default_value = "3")]
    passes: usize,

    /// New seeks added before each pass after the first
    #[arg(short, long, default_value = "0")]
    arrivals: usize,

    /// Random seed for both pool generation and matching
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fraction of seeks asking for pro games
    #[arg(long, default_value = "0.2")]
    pro_share: f64,

    /// Fraction of seeks asking for casual games
    #[arg(long, default_value = "0.5")]
    casual_share: f64,

    /// Fraction of players whose client cannot host
    #[arg(long, default_value = "0.1")]
    no_host_share: f64,

    /// Trials per anchor
    #[arg(short, long, default_value = "5")]
    trials: usize,

    /// Print every match formed
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        for (name, share) in [
            ("pro-share", self.pro_share),
            ("casual-share", self.casual_share),
            ("no-host-share", self.no_host_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(anyhow!("--{} must be between 0 and 1, got {}", name, share));
            }
        }
        if self.pro_share + self.casual_share > 1.0 {
            return Err(anyhow!("--pro-share and --casual-share add up to more than 1"));
        }
        Ok(())
    }
}

fn random_seek<R: Rng + ?Sized>(cli: &Cli, index: usize, rng: &mut R) -> Seek {
    let roll: f64 = rng.gen();
    let tier = if roll < cli.pro_share {
        RatingTier::Pro
    } else if roll < cli.pro_share + cli.casual_share {
        RatingTier::Casual
    } else {
        RatingTier::Unrated
    };

    let min_players = rng.gen_range(2..=4);
    let max_players = rng.gen_range(min_players..=6);

    let set_count = rng.gen_range(0..=SET_NAMES.len());
    let mut player =
        Player::new(format!("player{index}")).with_sets(SET_NAMES.iter().take(set_count).copied());
    if rng.gen_bool(cli.no_host_share) {
        player = player.without_hosting();
    }

    let mut requirements = vec![
        Requirement::party_size(min_players, max_players),
        Requirement::rating_tier(tier),
    ];
    match rng.gen_range(0..3) {
        0 => requirements.push(Requirement::score_display(ScoreDisplay::On)),
        1 => requirements.push(Requirement::score_display(ScoreDisplay::Off)),
        _ => {}
    }

    Seek::new(player, requirements)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    cli.validate()?;

    let config = MatchingConfig {
        max_trials: cli.trials,
        ..MatchingConfig::default()
    };
    config.validate()?;

    let assembler = GroupAssembler::new(config);
    let mut rng = match_rng(cli.seed);

    let mut next_index = 0;
    let mut pool: Vec<Seek> = Vec::with_capacity(cli.players);
    for _ in 0..cli.players {
        pool.push(random_seek(&cli, next_index, &mut rng));
        next_index += 1;
    }

    println!(
        "🎲 Simulating {} passes over {} seeks (seed: {})",
        cli.passes,
        pool.len(),
        cli.seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    );

    let mut total_matches = 0;
    let mut total_matched = 0;

    for pass in 1..=cli.passes {
        if pass > 1 {
            for _ in 0..cli.arrivals {
                pool.push(random_seek(&cli, next_index, &mut rng));
                next_index += 1;
            }
        }

        let started = Instant::now();
        let outcome = assembler.run_pass(&pool, &mut rng);
        let elapsed = started.elapsed();

        let matched = outcome.matched_seek_count();
        total_matches += outcome.matches.len();
        total_matched += matched;

        println!(
            "Pass {:>3}: {:>5} seeks -> {:>4} matches, {:>5} matched, {:>5} waiting, {:>5} trials ({} failed), {:.2}ms",
            pass,
            pool.len(),
            outcome.matches.len(),
            matched,
            outcome.unmatched.len(),
            outcome.stats.trials,
            outcome.stats.failed_trials,
            elapsed.as_secs_f64() * 1000.0
        );

        if cli.verbose {
            for game in &outcome.matches {
                let names: Vec<&str> = game.players().map(|p| p.name.as_str()).collect();
                println!(
                    "    {} {}p host={} score={} [{}]",
                    game.tier,
                    game.size(),
                    game.host,
                    game.score_display,
                    names.join(", ")
                );
            }
        }

        let consumed: HashSet<_> = outcome.matches.iter().flat_map(|m| m.seek_ids()).collect();
        pool.retain(|seek| !consumed.contains(&seek.id));
    }

    println!(
        "✅ {} matches formed, {} seeks matched, {} still waiting",
        total_matches,
        total_matched,
        pool.len()
    );

    Ok(())
}
