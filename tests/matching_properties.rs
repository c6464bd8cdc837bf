//! Property tests for matching passes over arbitrary pools

use automatch::config::MatchingConfig;
use automatch::matching::GroupAssembler;
use automatch::requirement::accepts;
use automatch::types::{Player, RatingTier, Requirement, ScoreDisplay, Seek};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn tier_strategy() -> impl Strategy<Value = RatingTier> {
    prop_oneof![
        Just(RatingTier::Pro),
        Just(RatingTier::Casual),
        Just(RatingTier::Unrated),
    ]
}

fn score_strategy() -> impl Strategy<Value = ScoreDisplay> {
    prop_oneof![
        Just(ScoreDisplay::On),
        Just(ScoreDisplay::Off),
        Just(ScoreDisplay::Unset),
    ]
}

prop_compose! {
    fn seek_strategy(index: usize)(
        min in 2u32..=6,
        spread in 0u32..=4,
        tier in tier_strategy(),
        score in score_strategy(),
        set_count in 0usize..=4,
        can_host in prop::bool::weighted(0.8),
    ) -> Seek {
        let mut player = Player::new(format!("player{index}"))
            .with_sets((0..set_count).map(|s| format!("set{s}")));
        if !can_host {
            player = player.without_hosting();
        }

        Seek::new(
            player,
            vec![
                Requirement::party_size(min, (min + spread).min(6)),
                Requirement::rating_tier(tier),
                Requirement::score_display(score),
            ],
        )
    }
}

fn pool_strategy() -> impl Strategy<Value = Vec<Seek>> {
    (0usize..40).prop_flat_map(|len| {
        (0..len)
            .map(seek_strategy)
            .collect::<Vec<_>>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_seek_lands_exactly_once(pool in pool_strategy(), seed in any::<u64>()) {
        let outcome = GroupAssembler::new(MatchingConfig::default())
            .run_pass(&pool, &mut StdRng::seed_from_u64(seed));

        let mut seen: HashMap<_, usize> = HashMap::new();
        for id in outcome.matches.iter().flat_map(|m| m.seek_ids()) {
            *seen.entry(id).or_default() += 1;
        }
        for seek in &outcome.unmatched {
            *seen.entry(seek.id).or_default() += 1;
        }

        prop_assert_eq!(seen.len(), pool.len());
        for seek in &pool {
            prop_assert_eq!(seen.get(&seek.id).copied(), Some(1));
        }
    }

    #[test]
    fn matches_satisfy_every_member(pool in pool_strategy(), seed in any::<u64>()) {
        let config = MatchingConfig::default();
        let outcome = GroupAssembler::new(config.clone())
            .run_pass(&pool, &mut StdRng::seed_from_u64(seed));

        for game in &outcome.matches {
            prop_assert!(config.party_sizes.contains(&game.size()));
            let fits = accepts(game.size(), game.tier);
            for seek in &game.seeks {
                prop_assert!(fits(seek), "{} does not accept its match", seek.player_name());
            }
        }
    }

    #[test]
    fn host_is_legal_and_best_stocked(pool in pool_strategy(), seed in any::<u64>()) {
        let outcome = GroupAssembler::new(MatchingConfig::default())
            .run_pass(&pool, &mut StdRng::seed_from_u64(seed));

        for game in &outcome.matches {
            let host = game.host_player();
            prop_assert!(host.is_some());
            let host = host.unwrap();

            prop_assert!(host.can_host);
            prop_assert!(game.is_match_ok(&game.host));

            for player in game.players() {
                if game.is_match_ok(&player.name) {
                    prop_assert!(player.set_count() <= host.set_count());
                }
            }
        }
    }

    #[test]
    fn input_pool_is_untouched(pool in pool_strategy(), seed in any::<u64>()) {
        let before = pool.clone();
        let _ = GroupAssembler::new(MatchingConfig::default())
            .run_pass(&pool, &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(pool, before);
    }

    #[test]
    fn same_seed_same_matches(pool in pool_strategy(), seed in any::<u64>()) {
        let assembler = GroupAssembler::new(MatchingConfig::default());
        let first = assembler.run_pass(&pool, &mut StdRng::seed_from_u64(seed));
        let second = assembler.run_pass(&pool, &mut StdRng::seed_from_u64(seed));

        let members = |outcome: &automatch::PassOutcome| -> Vec<Vec<_>> {
            outcome
                .matches
                .iter()
                .map(|m| m.seek_ids().collect())
                .collect()
        };
        prop_assert_eq!(members(&first), members(&second));
    }
}
