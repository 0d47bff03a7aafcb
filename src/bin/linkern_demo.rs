//! Small CLI demo (C11): builds a synthetic Euclidean instance, a
//! nearest-neighbor initial tour and a k-nearest candidate set, then
//! runs [`linkern::linkern_tour`] and prints the result.

use clap::Parser;

use linkern::candidates::CandidateSet;
use linkern::config::{KickType, SolverConfig};
use linkern::oracle::{DistanceOracle, Euclidean2D};
use linkern::rng::LaggedFibRng;

#[derive(Parser)]
#[command(about = "Iterated Lin-Kernighan demo over a random Euclidean instance")]
struct Cli {
    /// Number of cities in the synthetic instance.
    #[arg(long, default_value_t = 200)]
    ncount: usize,

    /// Candidate-list size per city.
    #[arg(long, default_value_t = 8)]
    k: usize,

    /// Consecutive no-improvement passes that end an LK inner loop.
    #[arg(long, default_value_t = 1000)]
    stallcount: i32,

    /// Number of kicks the outer iterator attempts.
    #[arg(long, default_value_t = 50)]
    repeatcount: i32,

    /// Wall-clock budget in seconds; 0 disables.
    #[arg(long, default_value_t = 0.0)]
    time_bound: f64,

    /// RNG seed, also used to place the synthetic cities.
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Which kick variant the outer iterator applies.
    #[arg(long, value_enum, default_value_t = KickArg::Random)]
    kick: KickArg,

    /// Suppress the per-kick progress line.
    #[arg(long, default_value_t = false)]
    silent: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum KickArg {
    Random,
    Geometric,
    Close,
    Walk,
}

impl From<KickArg> for KickType {
    fn from(k: KickArg) -> Self {
        match k {
            KickArg::Random => KickType::Random,
            KickArg::Geometric => KickType::Geometric,
            KickArg::Close => KickType::Close,
            KickArg::Walk => KickType::Walk,
        }
    }
}

/// Scatters `n` points uniformly over a `[0, side] x [0, side]` square.
fn random_instance(n: usize, side: f64, rng: &mut LaggedFibRng) -> Euclidean2D {
    let coords: Vec<(f64, f64)> = (0..n)
        .map(|_| {
            let x = (rng.below(1_000_000) as f64 / 1_000_000.0) * side;
            let y = (rng.below(1_000_000) as f64 / 1_000_000.0) * side;
            (x, y)
        })
        .collect();
    Euclidean2D::new(&coords)
}

/// Greedy nearest-neighbor tour, used only to seed the search; the
/// solver itself treats the initial tour as caller-supplied.
fn nearest_neighbor_tour<O: DistanceOracle>(n: usize, oracle: &O) -> Vec<usize> {
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut cur = 0usize;
    visited[0] = true;
    tour.push(0);
    for _ in 1..n {
        let next = (0..n)
            .filter(|&c| !visited[c])
            .min_by_key(|&c| oracle.distance(cur, c))
            .expect("at least one unvisited city remains");
        visited[next] = true;
        tour.push(next);
        cur = next;
    }
    tour
}

fn main() {
    let cli = Cli::parse();

    if cli.ncount < 3 {
        eprintln!("ncount must be >= 3");
        std::process::exit(1);
    }

    let mut rng = LaggedFibRng::new(cli.seed);
    let oracle = random_instance(cli.ncount, 10_000.0, &mut rng);
    let candidates = match CandidateSet::k_nearest(cli.ncount, cli.k, &oracle) {
        Ok(cs) => cs,
        Err(e) => {
            eprintln!("failed to build candidate set: {}", e);
            std::process::exit(1);
        }
    };
    let initial_tour = nearest_neighbor_tour(cli.ncount, &oracle);
    let config = SolverConfig::new(
        cli.stallcount,
        cli.repeatcount,
        cli.time_bound,
        0.0,
        cli.kick.into(),
        cli.silent,
    );

    match linkern::linkern_tour(
        cli.ncount,
        &oracle,
        &candidates,
        &initial_tour,
        &config,
        &mut rng,
    ) {
        Ok((tour, length, why)) => {
            println!("tour length: {:.1} ({})", length, why);
            println!("tour: {:?}", tour);
        }
        Err(e) => {
            eprintln!("linkern failed: {}", e);
            std::process::exit(1);
        }
    }
}
