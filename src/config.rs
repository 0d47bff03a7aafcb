//! Configuration record (C9): a plain struct threaded through the
//! entry point instead of process-wide mutable state.

use getset::{CopyGetters, Getters};

/// Which of the four kick variants the iterator applies after each
/// converged LK inner loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickType {
    Random,
    Geometric,
    Close,
    Walk,
}

/// Parameters for a single `linkern_tour` run. Constructed by the
/// caller and passed by reference; the solver never reads environment
/// variables or process-wide state.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct SolverConfig {
    /// Consecutive no-improvement passes over `Q` that end an LK inner
    /// loop.
    #[getset(get_copy = "pub")]
    stallcount: i32,
    /// Number of kicks the outer iterator attempts.
    #[getset(get_copy = "pub")]
    repeatcount: i32,
    /// Wall-clock budget in seconds; `<= 0` disables.
    #[getset(get_copy = "pub")]
    time_bound: f64,
    /// Stop once tour length reaches this bound; `<= 0` disables.
    #[getset(get_copy = "pub")]
    length_bound: f64,
    #[getset(get_copy = "pub")]
    kicktype: KickType,
    /// Suppresses the per-kick progress line (C10).
    #[getset(get_copy = "pub")]
    silent: bool,
}

impl SolverConfig {
    pub fn new(
        stallcount: i32,
        repeatcount: i32,
        time_bound: f64,
        length_bound: f64,
        kicktype: KickType,
        silent: bool,
    ) -> Self {
        Self {
            stallcount,
            repeatcount,
            time_bound,
            length_bound,
            kicktype,
            silent,
        }
    }
}

impl Default for SolverConfig {
    /// A permissive default: one stall-bounded inner loop, no kicks, no
    /// time or length bound, progress reporting on.
    fn default() -> Self {
        Self {
            stallcount: 100,
            repeatcount: 0,
            time_bound: 0.0,
            length_bound: 0.0,
            kicktype: KickType::Random,
            silent: false,
        }
    }
}
