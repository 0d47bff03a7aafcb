//! The kick engine (C6): perturbs a converged tour by a double bridge
//! so that no single 2- or 3-opt move can undo it, letting the next LK
//! inner loop explore a different basin.
//!
//! A double bridge on cyclic segments `P1 P2 P3 P4` reconnects them as
//! `P1 P3 P2 P4`. That reordering is not a contiguous-arc reversal, but
//! it decomposes into exactly three: reverse `P2 P3` as one block, then
//! reverse each of the two now-misordered halves back to front. Three
//! `Flipper::flip` calls realize it without any new primitive.

use crate::candidates::CandidateSet;
use crate::config::KickType;
use crate::flipper::Flipper;
use crate::oracle::DistanceOracle;
use crate::rng::LaggedFibRng;

/// Number of random-walk attempts to spend looking for a shorter-than-
/// average quadruple in the `Close` variant.
const CLOSE_TRIALS: usize = 20;
/// Bounded walk length used by `Geometric`/`Walk`.
const WALK_STEPS: usize = 3;

/// Applies `kind`'s perturbation to `flipper` and returns the cities
/// whose don't-look bits must be cleared and who must be re-enqueued.
pub fn apply_kick<O: DistanceOracle>(
    flipper: &mut Flipper,
    oracle: &O,
    candidates: &CandidateSet,
    rng: &mut LaggedFibRng,
    kind: KickType,
) -> Vec<usize> {
    let n = flipper.len();
    let mut cities = match kind {
        KickType::Random => pick_random(rng, n),
        KickType::Geometric => pick_geometric(candidates, rng, n),
        KickType::Close => pick_close(flipper, oracle, rng, n),
        KickType::Walk => pick_walk(candidates, rng, n),
    };
    dedup_by_replacement(&mut cities, rng, n);
    cyclic_sort(flipper, &mut cities);
    double_bridge(flipper, cities[0], cities[1], cities[2]);
    cities
}

/// Replaces any city that repeats earlier in `cities` with a fresh one
/// not already present, so `double_bridge` never sees degenerate
/// (equal) cut points.
fn dedup_by_replacement(cities: &mut [usize], rng: &mut LaggedFibRng, n: usize) {
    for i in 0..cities.len() {
        while cities[..i].contains(&cities[i]) {
            cities[i] = rng.range(0, n);
        }
    }
}

fn pick_random(rng: &mut LaggedFibRng, n: usize) -> Vec<usize> {
    distinct_random(rng, n, 4)
}

fn pick_geometric(candidates: &CandidateSet, rng: &mut LaggedFibRng, n: usize) -> Vec<usize> {
    let first = rng.range(0, n);
    let mut picked = vec![first];
    for _ in 0..3 {
        let c = random_walk_from(first, candidates, rng, WALK_STEPS, &picked, n);
        picked.push(c);
    }
    picked
}

fn pick_walk(candidates: &CandidateSet, rng: &mut LaggedFibRng, n: usize) -> Vec<usize> {
    let first = rng.range(0, n);
    let mut picked = vec![first];
    let mut cur = first;
    for _ in 0..3 {
        let c = random_walk_from(cur, candidates, rng, WALK_STEPS, &picked, n);
        picked.push(c);
        cur = c;
    }
    picked
}

fn pick_close<O: DistanceOracle>(
    flipper: &Flipper,
    oracle: &O,
    rng: &mut LaggedFibRng,
    n: usize,
) -> Vec<usize> {
    let min_gap = (n / 8).max(1);
    let mut best: Option<(i64, Vec<usize>)> = None;
    for _ in 0..CLOSE_TRIALS {
        let mut cand = distinct_random(rng, n, 4);
        cyclic_sort(flipper, &mut cand);
        if !well_separated(flipper, &cand, min_gap) {
            continue;
        }
        let cost = cut_cost(flipper, oracle, &cand);
        if best.as_ref().map(|(c, _)| cost < *c).unwrap_or(true) {
            best = Some((cost, cand));
        }
    }
    best.map(|(_, c)| c)
        .unwrap_or_else(|| distinct_random(rng, n, 4))
}

fn well_separated(flipper: &Flipper, cities: &[usize], min_gap: usize) -> bool {
    for w in 0..cities.len() {
        let a = cities[w];
        let b = cities[(w + 1) % cities.len()];
        let mut gap = 0usize;
        let mut cur = a;
        while cur != b {
            cur = flipper.next(cur);
            gap += 1;
            if gap >= min_gap {
                break;
            }
        }
        if gap < min_gap {
            return false;
        }
    }
    true
}

/// Sum of the four edges that would be cut at `cities` (each paired
/// with its tour successor), used by `Close` to rank candidate
/// quadruples.
fn cut_cost<O: DistanceOracle>(flipper: &Flipper, oracle: &O, cities: &[usize]) -> i64 {
    cities
        .iter()
        .map(|&c| oracle.distance(c, flipper.next(c)) as i64)
        .sum()
}

fn distinct_random(rng: &mut LaggedFibRng, n: usize, k: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let c = rng.range(0, n);
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

fn random_walk_from(
    start: usize,
    candidates: &CandidateSet,
    rng: &mut LaggedFibRng,
    steps: usize,
    avoid: &[usize],
    n: usize,
) -> usize {
    let mut cur = start;
    for _ in 0..steps {
        let nbrs = candidates.candidates(cur);
        if nbrs.is_empty() {
            break;
        }
        let idx = rng.range(0, nbrs.len());
        cur = nbrs[idx] as usize;
    }
    if avoid.contains(&cur) {
        // Degenerate walk landed on an already-picked city; fall back
        // to the first candidate of `start` not already picked.
        for &nb in candidates.candidates(start) {
            if !avoid.contains(&(nb as usize)) {
                return nb as usize;
            }
        }
        // Every candidate of `start` is already picked too (only
        // possible for tiny or sparsely connected instances): take any
        // city outside `avoid`. `avoid` never covers the whole
        // instance (it has at most 3 entries here), so this halts.
        loop {
            let c = rng.range(0, n);
            if !avoid.contains(&c) {
                return c;
            }
        }
    }
    cur
}

/// Reorders `cities` (length >= 2) so that, starting from `cities[0]`,
/// they appear in the same order the tour visits them.
fn cyclic_sort(flipper: &Flipper, cities: &mut [usize]) {
    if cities.len() <= 2 {
        return;
    }
    let pivot = cities[0];
    cities[1..].sort_by(|&a, &b| {
        if flipper.sequence(pivot, a, b) {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });
}

/// Performs the double bridge defined by three cut cities `c1`, `c2`,
/// `c3` given in cyclic tour order (`c1` before `c2` before `c3`): the
/// segment starting right after `c1` and the segment starting right
/// after `c2` are swapped.
fn double_bridge(flipper: &mut Flipper, c1: usize, c2: usize, c3: usize) {
    let a = flipper.next(c1);
    let b = c2;
    let e = flipper.next(c2);
    let f = c3;
    flipper.flip(a, f);
    flipper.flip(f, e);
    flipper.flip(b, a);
}
