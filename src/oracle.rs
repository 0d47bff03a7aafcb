//! The distance oracle (C1): a pure, symmetric, non-negative integer
//! function of two city indices.

/// A pure function `d(i, j) -> i32`. Implementations must be reentrant
/// (the core calls `distance` millions of times per iteration) and are
/// expected to satisfy `d(i, i) == 0` and `d(i, j) == d(j, i)`, though
/// neither is enforced at the trait boundary — the core never inspects
/// coordinates, only the returned values.
pub trait DistanceOracle {
    fn distance(&self, i: usize, j: usize) -> i32;
}

impl<F> DistanceOracle for F
where
    F: Fn(usize, usize) -> i32,
{
    fn distance(&self, i: usize, j: usize) -> i32 {
        (self)(i, j)
    }
}

/// Dense lower-triangular distance matrix, the simplest possible oracle.
/// `n` cities, `n*(n-1)/2` stored entries.
#[derive(Debug, Clone)]
pub struct MatrixOracle {
    n: usize,
    rows: Vec<i32>,
}

impl MatrixOracle {
    /// Builds a matrix oracle from a full `n x n` row-major matrix,
    /// reading only the entries actually needed (`i != j`).
    pub fn from_dense(n: usize, dense: &[i32]) -> Self {
        assert_eq!(dense.len(), n * n, "dense matrix size mismatch");
        let mut rows = Vec::with_capacity(n * (n.saturating_sub(1)) / 2);
        for i in 1..n {
            for j in 0..i {
                rows.push(dense[i * n + j]);
            }
        }
        Self { n, rows }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        // i > j, row-major lower triangle: row i starts at i*(i-1)/2
        i * (i - 1) / 2 + j
    }
}

impl DistanceOracle for MatrixOracle {
    fn distance(&self, i: usize, j: usize) -> i32 {
        if i == j {
            return 0;
        }
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        debug_assert!(hi < self.n);
        self.rows[self.index(hi, lo)]
    }
}

/// Rounded 2D Euclidean distance, the most common TSPLIB `EUC_2D` norm.
#[derive(Debug, Clone)]
pub struct Euclidean2D {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Euclidean2D {
    pub fn new(coords: &[(f64, f64)]) -> Self {
        Self {
            xs: coords.iter().map(|c| c.0).collect(),
            ys: coords.iter().map(|c| c.1).collect(),
        }
    }
}

impl DistanceOracle for Euclidean2D {
    fn distance(&self, i: usize, j: usize) -> i32 {
        let dx = self.xs[i] - self.xs[j];
        let dy = self.ys[i] - self.ys[j];
        (dx * dx + dy * dy).sqrt().round() as i32
    }
}

/// Wraps another oracle with a flat memoization cache. Used to test
/// oracle purity: swapping a wrapped oracle in for the bare one must
/// produce bit-identical search results.
pub struct MemoizingOracle<'a, O: DistanceOracle> {
    inner: &'a O,
    n: usize,
    cache: std::cell::RefCell<Vec<Option<i32>>>,
}

impl<'a, O: DistanceOracle> MemoizingOracle<'a, O> {
    pub fn new(inner: &'a O, n: usize) -> Self {
        Self {
            inner,
            n,
            cache: std::cell::RefCell::new(vec![None; n * n]),
        }
    }
}

impl<'a, O: DistanceOracle> DistanceOracle for MemoizingOracle<'a, O> {
    fn distance(&self, i: usize, j: usize) -> i32 {
        let idx = i * self.n + j;
        if let Some(v) = self.cache.borrow()[idx] {
            return v;
        }
        let v = self.inner.distance(i, j);
        self.cache.borrow_mut()[idx] = Some(v);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_oracle_is_symmetric() {
        let n = 4;
        #[rustfmt::skip]
        let dense = vec![
            0, 1, 2, 3,
            1, 0, 4, 5,
            2, 4, 0, 6,
            3, 5, 6, 0,
        ];
        let oracle = MatrixOracle::from_dense(n, &dense);
        for i in 0..n {
            for j in 0..n {
                assert_eq!(oracle.distance(i, j), oracle.distance(j, i));
            }
            assert_eq!(oracle.distance(i, i), 0);
        }
        assert_eq!(oracle.distance(0, 3), 3);
        assert_eq!(oracle.distance(2, 1), 4);
    }

    #[test]
    fn euclidean_rounds_to_nearest_integer() {
        let oracle = Euclidean2D::new(&[(0.0, 0.0), (3.0, 4.0)]);
        assert_eq!(oracle.distance(0, 1), 5);
    }

    #[test]
    fn memoizing_oracle_matches_inner() {
        let oracle = Euclidean2D::new(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
        let memo = MemoizingOracle::new(&oracle, 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(memo.distance(i, j), oracle.distance(i, j));
                // Second call exercises the cache hit path.
                assert_eq!(memo.distance(i, j), oracle.distance(i, j));
            }
        }
    }

    #[test]
    fn closures_implement_the_trait() {
        let oracle = |i: usize, j: usize| (i as i32 - j as i32).abs();
        assert_eq!(oracle.distance(2, 5), 3);
    }
}
