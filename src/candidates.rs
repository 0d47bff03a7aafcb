//! The candidate set (C3): an immutable, ascending-by-distance list of
//! nearest neighbors per city, computed once by an external edge
//! generator (out of scope for this crate) and consumed by the LK step
//! engine to restrict which exchanges are considered.

use crate::error::{LinkernError, LinkernResult};
use crate::oracle::DistanceOracle;

/// For each city, an ordered (ascending by distance) list of up to `K`
/// neighbor city ids. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    n: usize,
    /// Flattened ragged array: `offsets[i]..offsets[i+1]` indexes into
    /// `neighbors` for city `i`.
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl CandidateSet {
    /// Builds a candidate set from a per-city neighbor list, validating
    /// that every entry is in range and that no city lists itself.
    pub fn from_lists(n: usize, lists: Vec<Vec<usize>>) -> LinkernResult<Self> {
        if lists.len() != n {
            return Err(LinkernError::InvalidInput(format!(
                "expected {} candidate lists, got {}",
                n,
                lists.len()
            )));
        }
        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::new();
        offsets.push(0u32);
        for (city, list) in lists.into_iter().enumerate() {
            for &nb in &list {
                if nb >= n {
                    return Err(LinkernError::InvalidInput(format!(
                        "candidate {} for city {} is out of range (n={})",
                        nb, city, n
                    )));
                }
                if nb == city {
                    return Err(LinkernError::InvalidInput(format!(
                        "city {} lists itself as a candidate",
                        city
                    )));
                }
                neighbors.push(nb as u32);
            }
            offsets.push(neighbors.len() as u32);
        }
        Ok(Self {
            n,
            offsets,
            neighbors,
        })
    }

    /// Computes a candidate set by taking, for each city, the `k`
    /// nearest neighbors under `oracle` (ties broken by city id). This
    /// is a convenience constructor for callers and demos that do not
    /// bring their own edge generator; the quadratic scan is acceptable
    /// only for the small synthetic instances the CLI demo (C11) builds.
    pub fn k_nearest<O: DistanceOracle>(n: usize, k: usize, oracle: &O) -> LinkernResult<Self> {
        if n < 3 {
            return Err(LinkernError::InvalidInput(format!(
                "n must be >= 3, got {}",
                n
            )));
        }
        let mut lists = Vec::with_capacity(n);
        for i in 0..n {
            let mut others: Vec<(i32, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (oracle.distance(i, j), j))
                .collect();
            others.sort_unstable();
            others.truncate(k.min(others.len()));
            lists.push(others.into_iter().map(|(_, j)| j).collect());
        }
        Self::from_lists(n, lists)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// The candidates of `city`, ascending by distance under whatever
    /// oracle built this set.
    pub fn candidates(&self, city: usize) -> &[u32] {
        let start = self.offsets[city] as usize;
        let end = self.offsets[city + 1] as usize;
        &self.neighbors[start..end]
    }
}
