//! The outer iterator (C7): build, improve, kick, improve, accept or
//! reject by length, until stall / wall-clock / length-bound stops it.
//! [`linkern_tour`] is the crate's single public entry point.

use std::time::Instant;

use crate::candidates::CandidateSet;
use crate::config::SolverConfig;
use crate::error::{LinkernError, LinkernResult, TerminationReason};
use crate::flipper::Flipper;
use crate::kick::apply_kick;
use crate::lk::LkEngine;
use crate::oracle::DistanceOracle;
use crate::rng::LaggedFibRng;

/// Runs the iterated Lin-Kernighan search and returns the best tour
/// found, its length, and why the search stopped.
///
/// `initial_tour` must be a permutation of `0..ncount`; `candidate_set`
/// must cover all `ncount` cities. Both are validated up front
/// ([`LinkernError::InvalidInput`] on mismatch) before anything is
/// allocated. `config` carries every tunable (stall/kick/time/length
/// bounds, kick variant, progress reporting); the caller owns it and
/// nothing here reads process-wide state.
pub fn linkern_tour<O: DistanceOracle>(
    ncount: usize,
    distance_oracle: &O,
    candidate_set: &CandidateSet,
    initial_tour: &[usize],
    config: &SolverConfig,
    rng_state: &mut LaggedFibRng,
) -> LinkernResult<(Vec<usize>, f64, TerminationReason)> {
    if ncount < 3 {
        return Err(LinkernError::InvalidInput(format!(
            "ncount must be >= 3, got {}",
            ncount
        )));
    }
    if initial_tour.len() != ncount {
        return Err(LinkernError::InvalidInput(format!(
            "initial_tour has {} cities, expected {}",
            initial_tour.len(),
            ncount
        )));
    }
    if candidate_set.len() != ncount {
        return Err(LinkernError::InvalidInput(format!(
            "candidate_set covers {} cities, expected {}",
            candidate_set.len(),
            ncount
        )));
    }
    let stallcount = config.stallcount();
    let repeatcount = config.repeatcount();
    let time_bound = config.time_bound();
    let length_bound = config.length_bound();
    let kicktype = config.kicktype();
    let silent = config.silent();
    if stallcount <= 0 {
        return Err(LinkernError::InvalidInput(
            "stallcount must be > 0".to_string(),
        ));
    }

    let mut flipper = Flipper::init(initial_tour)?;
    {
        let mut engine = LkEngine::new(&mut flipper, distance_oracle, candidate_set);
        engine.reset_all();
        engine.run(stallcount);
    }

    let mut best_tour = snapshot(&flipper);
    let mut best_length = tour_length(&flipper, distance_oracle);
    let mut current_length = best_length;

    let start = Instant::now();
    let mut termination = TerminationReason::StallLimitReached;
    let mut iterations_done: i32 = 0;

    while iterations_done < repeatcount.max(0) {
        let touched = apply_kick(&mut flipper, distance_oracle, candidate_set, rng_state, kicktype);
        {
            let mut engine = LkEngine::new(&mut flipper, distance_oracle, candidate_set);
            for &c in &touched {
                engine.wake(c);
            }
            engine.run(stallcount);
        }
        current_length = tour_length(&flipper, distance_oracle);

        if current_length < best_length {
            best_length = current_length;
            best_tour = snapshot(&flipper);
        } else {
            flipper = Flipper::init(&best_tour)?;
            current_length = best_length;
        }

        iterations_done += 1;
        if !silent {
            eprintln!(
                "linkern: kick {}/{} best_length={:.1}",
                iterations_done, repeatcount, best_length
            );
        }

        if time_bound > 0.0 && start.elapsed().as_secs_f64() > time_bound {
            termination = TerminationReason::TimeBoundReached;
            break;
        }
        if length_bound > 0.0 && best_length <= length_bound {
            termination = TerminationReason::LengthBoundReached;
            break;
        }
        termination = TerminationReason::KicksExhausted;
    }

    Ok((best_tour, best_length, termination))
}

fn snapshot(flipper: &Flipper) -> Vec<usize> {
    let mut out = vec![0usize; flipper.len()];
    flipper.cycle(&mut out);
    out
}

fn tour_length<O: DistanceOracle>(flipper: &Flipper, oracle: &O) -> f64 {
    let n = flipper.len();
    let mut total = 0i64;
    let mut cur = 0usize;
    for _ in 0..n {
        let nxt = flipper.next(cur);
        total += oracle.distance(cur, nxt) as i64;
        cur = nxt;
    }
    total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KickType;
    use crate::oracle::MatrixOracle;

    #[test]
    fn rejects_wrong_sized_initial_tour() {
        let dense = vec![0, 1, 1, 0];
        let oracle = MatrixOracle::from_dense(2, &dense);
        let cs = CandidateSet::from_lists(2, vec![vec![1], vec![0]]);
        let cs = cs.unwrap();
        let mut rng = LaggedFibRng::new(1);
        let config = SolverConfig::new(10, 0, 0.0, 0.0, KickType::Random, true);
        let result = linkern_tour(3, &oracle, &cs, &[0, 1], &config, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn scenario_s3_degenerate_line_distances() {
        #[rustfmt::skip]
        let dense = vec![
            0, 1, 2, 3,
            1, 0, 1, 2,
            2, 1, 0, 1,
            3, 2, 1, 0,
        ];
        let oracle = MatrixOracle::from_dense(4, &dense);
        let cs = CandidateSet::k_nearest(4, 3, &oracle).unwrap();
        let mut rng = LaggedFibRng::new(7);
        let config = SolverConfig::new(20, 0, 0.0, 0.0, KickType::Random, true);
        let (tour, length, _term) =
            linkern_tour(4, &oracle, &cs, &[0, 2, 1, 3], &config, &mut rng).unwrap();
        assert_eq!(length, 6.0);
        assert_eq!(tour.len(), 4);
    }

    #[test]
    fn zero_repeatcount_runs_exactly_one_inner_loop() {
        #[rustfmt::skip]
        let dense = vec![
            0, 1, 2, 3,
            1, 0, 1, 2,
            2, 1, 0, 1,
            3, 2, 1, 0,
        ];
        let oracle = MatrixOracle::from_dense(4, &dense);
        let cs = CandidateSet::k_nearest(4, 3, &oracle).unwrap();
        let mut rng = LaggedFibRng::new(1);
        let config = SolverConfig::new(1, 0, 0.0, 0.0, KickType::Random, true);
        let (_tour, _len, term) =
            linkern_tour(4, &oracle, &cs, &[0, 1, 2, 3], &config, &mut rng).unwrap();
        assert_eq!(term, TerminationReason::StallLimitReached);
    }
}
