//! `linkern`: an iterated Lin-Kernighan local-search core for the
//! symmetric travelling salesman problem.
//!
//! The crate is organized around the pipeline described by its own
//! module docs: a [`oracle::DistanceOracle`] and [`candidates::CandidateSet`]
//! feed the [`flipper::Flipper`] tour representation, which the
//! [`lk::LkEngine`] improves and the [`kick`] module perturbs, all driven
//! by [`iterator::linkern_tour`] under a [`config::SolverConfig`].
//!
//! ```
//! use linkern::{
//!     candidates::CandidateSet, config::{KickType, SolverConfig},
//!     oracle::Euclidean2D, rng::LaggedFibRng,
//! };
//!
//! let coords = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
//! let oracle = Euclidean2D::new(&coords);
//! let candidates = CandidateSet::k_nearest(4, 3, &oracle).unwrap();
//! let mut rng = LaggedFibRng::new(1);
//! let config = SolverConfig::new(50, 0, 0.0, 0.0, KickType::Random, true);
//!
//! let (tour, length, _why) = linkern::linkern_tour(
//!     4, &oracle, &candidates, &[0, 1, 2, 3], &config, &mut rng,
//! ).unwrap();
//! assert_eq!(tour.len(), 4);
//! assert_eq!(length, 4.0);
//! ```

pub mod candidates;
pub mod config;
pub mod error;
pub mod flipper;
pub mod heap;
pub mod iterator;
pub mod kick;
pub mod lk;
pub mod oracle;
pub mod rng;

pub use config::{KickType, SolverConfig};
pub use error::{LinkernError, LinkernResult, TerminationReason};
pub use iterator::linkern_tour;
