//! Error taxonomy (C8): recoverable input/allocation/oracle failures
//! plus a separate non-error termination-reason enum.

use std::fmt;

/// Error taxonomy surfaced by [`crate::linkern_tour`].
///
/// Running out of wall-clock time is not treated as a failure here:
/// it is a normal termination condition, reported via
/// [`TerminationReason`] inside a successful [`crate::LinkernResult`]
/// instead of as an error.
#[derive(Debug)]
pub enum LinkernError {
    /// `n < 3`, a duplicated city in the initial tour, an out-of-range
    /// candidate entry, etc. Surfaced immediately; no partial state is
    /// produced.
    InvalidInput(String),
    /// An internal array allocation failed.
    AllocationFailure,
    /// The distance oracle reported a failure mid-search.
    OracleFailure(String),
    /// A flipper invariant broke. Only raised in debug builds; in release
    /// builds the condition it would have caught is instead treated as
    /// fatal UB-adjacent and is not checked at all (see
    /// [`crate::flipper::Flipper`] debug assertions).
    InternalInvariantViolation(String),
}

impl fmt::Display for LinkernError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkernError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            LinkernError::AllocationFailure => write!(f, "allocation failure"),
            LinkernError::OracleFailure(msg) => write!(f, "distance oracle failure: {}", msg),
            LinkernError::InternalInvariantViolation(msg) => {
                write!(f, "internal invariant violation: {}", msg)
            }
        }
    }
}

impl std::error::Error for LinkernError {}

/// Why the outer iterator (C7) stopped, reported alongside a successful
/// result. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// `repeatcount == 0`: the single initial LK inner loop ran its
    /// `stallcount` consecutive no-improvement passes and stopped; no
    /// kicks were ever attempted.
    StallLimitReached,
    /// `repeatcount` kicks were attempted and none improved further.
    KicksExhausted,
    /// `time_bound > 0` and wall-clock elapsed past it.
    TimeBoundReached,
    /// `length_bound > 0` and the current tour reached or undercut it.
    LengthBoundReached,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::StallLimitReached => write!(f, "stall limit reached"),
            TerminationReason::KicksExhausted => write!(f, "kick budget exhausted"),
            TerminationReason::TimeBoundReached => write!(f, "time bound reached"),
            TerminationReason::LengthBoundReached => write!(f, "length bound reached"),
        }
    }
}

pub type LinkernResult<T> = Result<T, LinkernError>;
