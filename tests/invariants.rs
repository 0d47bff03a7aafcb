//! Property-based tests for the crate's cross-module invariants
//! (flipper-only invariants are covered in `src/flipper.rs`'s own
//! `proptest!` block; these exercise the LK engine, kicks and the
//! outer iterator together).

use proptest::prelude::*;

use linkern::candidates::CandidateSet;
use linkern::config::{KickType, SolverConfig};
use linkern::flipper::Flipper;
use linkern::kick::apply_kick;
use linkern::oracle::{DistanceOracle, Euclidean2D, MemoizingOracle};
use linkern::rng::LaggedFibRng;

fn ring_instance(n: usize) -> (Euclidean2D, CandidateSet) {
    let coords: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / n as f64;
            (theta.cos() * 100.0, theta.sin() * 100.0)
        })
        .collect();
    let oracle = Euclidean2D::new(&coords);
    let cs = CandidateSet::k_nearest(n, 6.min(n - 1), &oracle).unwrap();
    (oracle, cs)
}

fn tour_length<O: DistanceOracle>(tour: &[usize], oracle: &O) -> f64 {
    let n = tour.len();
    (0..n)
        .map(|i| oracle.distance(tour[i], tour[(i + 1) % n]) as i64)
        .sum::<i64>() as f64
}

proptest! {
    /// Every committed LK move strictly decreases length.
    #[test]
    fn lk_inner_loop_never_increases_length(n in 4usize..60, seed in 0u32..1000) {
        let (oracle, cs) = ring_instance(n);
        let mut rng = LaggedFibRng::new(seed);
        let mut order: Vec<usize> = (0..n).collect();
        // Scramble the initial tour with a few kicks so there is
        // something left to improve.
        {
            let mut flipper = Flipper::init(&order).unwrap();
            for _ in 0..3 {
                apply_kick(&mut flipper, &oracle, &cs, &mut rng, KickType::Random);
            }
            flipper.cycle(&mut order);
        }
        let before = tour_length(&order, &oracle);

        let config = SolverConfig::new(50, 0, 0.0, 0.0, KickType::Random, true);
        let (_, length, _) = linkern::linkern_tour(
            n, &oracle, &cs, &order, &config, &mut rng,
        ).unwrap();

        prop_assert!(length <= before);
    }

    /// The iterator's reported best length never increases as more
    /// kicks are attempted with the same seed and instance.
    #[test]
    fn iterator_best_length_is_non_increasing(n in 5usize..40, seed in 0u32..1000) {
        let (oracle, cs) = ring_instance(n);
        let order: Vec<usize> = (0..n).collect();

        let config_few = SolverConfig::new(20, 2, 0.0, 0.0, KickType::Random, true);
        let mut rng_a = LaggedFibRng::new(seed);
        let (_, len_few, _) = linkern::linkern_tour(
            n, &oracle, &cs, &order, &config_few, &mut rng_a,
        ).unwrap();

        let config_many = SolverConfig::new(20, 8, 0.0, 0.0, KickType::Random, true);
        let mut rng_b = LaggedFibRng::new(seed);
        let (_, len_many, _) = linkern::linkern_tour(
            n, &oracle, &cs, &order, &config_many, &mut rng_b,
        ).unwrap();

        prop_assert!(len_many <= len_few);
    }

    /// Wrapping the oracle in a memoizing cache must not change the
    /// result.
    #[test]
    fn memoizing_oracle_is_bit_identical(n in 5usize..30, seed in 0u32..1000) {
        let (oracle, cs) = ring_instance(n);
        let order: Vec<usize> = (0..n).collect();

        let config = SolverConfig::new(20, 3, 0.0, 0.0, KickType::Random, true);
        let mut rng_a = LaggedFibRng::new(seed);
        let (tour_plain, len_plain, _) = linkern::linkern_tour(
            n, &oracle, &cs, &order, &config, &mut rng_a,
        ).unwrap();

        let memo = MemoizingOracle::new(&oracle, n);
        let mut rng_b = LaggedFibRng::new(seed);
        let (tour_memo, len_memo, _) = linkern::linkern_tour(
            n, &memo, &cs, &order, &config, &mut rng_b,
        ).unwrap();

        prop_assert_eq!(tour_plain, tour_memo);
        prop_assert_eq!(len_plain, len_memo);
    }

    /// Any kick leaves the tour Hamiltonian.
    #[test]
    fn kicks_preserve_hamiltonicity(n in 5usize..60, seed in 0u32..1000, kick_idx in 0usize..4) {
        let (oracle, cs) = ring_instance(n);
        let order: Vec<usize> = (0..n).collect();
        let mut flipper = Flipper::init(&order).unwrap();
        let mut rng = LaggedFibRng::new(seed);
        let kind = [KickType::Random, KickType::Geometric, KickType::Close, KickType::Walk][kick_idx];

        apply_kick(&mut flipper, &oracle, &cs, &mut rng, kind);

        let mut out = vec![0usize; n];
        flipper.cycle(&mut out);
        let mut seen = vec![false; n];
        for &c in &out {
            prop_assert!(!seen[c]);
            seen[c] = true;
        }
        prop_assert!(seen.iter().all(|&b| b));
    }
}
