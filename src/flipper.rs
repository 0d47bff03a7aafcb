//! The two-level flipper (C4): a Hamiltonian cycle represented as a
//! two-level segmented doubly linked list with lazy per-segment
//! reversal, supporting `next`/`prev`/`sequence`/`flip`/`cycle` in
//! O(√n) amortized time.
//!
//! Parents and children live in index-addressed arenas (`Vec`s) rather
//! than a graph of `Rc<RefCell<_>>`/`Weak` nodes — ownership is trivial
//! (the flipper owns both arenas outright) and there is no
//! `Weak::upgrade` failure mode to reason about.

use crate::error::{LinkernError, LinkernResult};

/// A child slot, one per city, indexed directly by city id. Permanent
/// for the life of the flipper: cities never move between slots, only
/// the `parent`/`seq` fields are rewritten as segments split.
#[derive(Debug, Clone, Copy)]
struct ChildSlot {
    parent: u32,
    /// Position of this city within `parents[parent].cities`, the
    /// segment's *base* (pre-reversal) order.
    seq: u32,
}

/// A segment ("parent") owning a contiguous run of cities in base
/// order, plus a lazy reversal bit that flips the effective traversal
/// direction of the whole segment in O(1).
#[derive(Debug, Clone)]
struct ParentSlot {
    cities: Vec<u32>,
    reverse: bool,
    /// Sparse sequence number used for O(1) `sequence`/`between`
    /// comparisons: comparing `(parent-rank, child-seq)` tuples.
    /// Ring-monotonic except at one wraparound seam; renumbered locally
    /// whenever a split needs headroom.
    rank: i64,
    prev: u32,
    next: u32,
}

/// Sequence-number spacing assigned at `init`/rebuild time and whenever
/// ranks are renumbered.
const RANK_GAP: i64 = 1 << 20;
/// Upper bound on any segment's length, used to pack `(rank, eff_seq)`
/// into a single comparable `i64`. Segment sizes only ever shrink
/// between rebuilds, so this only needs to exceed the largest segment
/// size right after a rebuild.
const SEQ_SCALE: i64 = 1 << 16;

/// Two-level segmented tour representation (C4). Owns both arenas
/// exclusively; there is no aliasing to reason about.
#[derive(Debug)]
pub struct Flipper {
    children: Vec<ChildSlot>,
    parents: Vec<ParentSlot>,
    target_group: usize,
    /// Flips the meaning of `next`/`prev`/`sequence` relative to the
    /// physical segment chain. Set when `flip` reverses the shorter
    /// complementary arc instead of the named one: that physically
    /// reverses the rest of the ring, which swaps the tour's global
    /// traversal direction, so the public view must be read backwards
    /// to keep `next`/`prev` consistent with `flip`'s own postcondition.
    orientation: bool,
}

impl Flipper {
    /// Builds a flipper from an initial Hamiltonian cycle given as a
    /// permutation of `0..n`. `cyc[i]` and `cyc[(i+1) % n]` are tour
    /// neighbors.
    pub fn init(cyc: &[usize]) -> LinkernResult<Self> {
        let n = cyc.len();
        if n < 3 {
            return Err(LinkernError::InvalidInput(format!(
                "flipper requires n >= 3, got {}",
                n
            )));
        }
        let mut seen = vec![false; n];
        for &c in cyc {
            if c >= n || seen[c] {
                return Err(LinkernError::InvalidInput(
                    "initial tour is not a permutation of 0..n".to_string(),
                ));
            }
            seen[c] = true;
        }

        let target_group = (((n as f64).sqrt()).round() as usize).max(1);
        let mut flipper = Self {
            children: vec![ChildSlot { parent: 0, seq: 0 }; n],
            parents: Vec::new(),
            target_group,
            orientation: false,
        };
        flipper.rebuild_from(cyc);
        Ok(flipper)
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The target segment size `G ~= round(sqrt(n))` used for
    /// rebalancing decisions.
    pub fn target_group_size(&self) -> usize {
        self.target_group
    }

    /// Current number of live segments.
    pub fn segment_count(&self) -> usize {
        self.parents.len()
    }

    /// The successor of `city` along the tour.
    pub fn next(&self, city: usize) -> usize {
        if self.orientation {
            self.prev_impl(city)
        } else {
            self.next_impl(city)
        }
    }

    /// The predecessor of `city` along the tour.
    pub fn prev(&self, city: usize) -> usize {
        if self.orientation {
            self.next_impl(city)
        } else {
            self.prev_impl(city)
        }
    }

    /// The successor of `city` in the physical segment chain,
    /// irrespective of `orientation`.
    fn next_impl(&self, city: usize) -> usize {
        let c = self.children[city];
        let p = &self.parents[c.parent as usize];
        if !p.reverse {
            if (c.seq as usize) + 1 < p.cities.len() {
                p.cities[c.seq as usize + 1] as usize
            } else {
                self.first_city(p.next) as usize
            }
        } else if c.seq > 0 {
            p.cities[c.seq as usize - 1] as usize
        } else {
            self.first_city(p.next) as usize
        }
    }

    /// The predecessor of `city` in the physical segment chain,
    /// irrespective of `orientation`.
    fn prev_impl(&self, city: usize) -> usize {
        let c = self.children[city];
        let p = &self.parents[c.parent as usize];
        if !p.reverse {
            if c.seq > 0 {
                p.cities[c.seq as usize - 1] as usize
            } else {
                self.last_city(p.prev) as usize
            }
        } else if (c.seq as usize) + 1 < p.cities.len() {
            p.cities[c.seq as usize + 1] as usize
        } else {
            self.last_city(p.prev) as usize
        }
    }

    /// True iff walking forward from `a` one reaches `b` strictly
    /// before `c`. `a`, `b`, `c` must be pairwise distinct.
    pub fn sequence(&self, a: usize, b: usize, c: usize) -> bool {
        if self.orientation {
            cyclic_between(self.key(c), self.key(b), self.key(a))
        } else {
            cyclic_between(self.key(a), self.key(b), self.key(c))
        }
    }

    /// Reverses the closed arc from `a` to `b` inclusive, walking
    /// forward. Equivalent to replacing tour edges `(prev(a), a)` and
    /// `(b, next(b))` with `(prev(a), b)` and `(a, next(b))`.
    ///
    /// Internally this may physically reverse either the named arc or
    /// its complement, whichever spans fewer segments; reversing the
    /// complement leaves the same undirected cycle but flips the ring's
    /// global traversal direction, which is tracked by `orientation` so
    /// that `next`/`prev` keep honoring the postcondition above.
    pub fn flip(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "flip requires distinct endpoints");
        let (a2, b2) = if self.orientation { (b, a) } else { (a, b) };
        let comp_a2 = self.next_impl(b2);
        let comp_b2 = self.prev_impl(a2);

        let fwd_span = self.segment_span(self.children[a2].parent, self.children[b2].parent);
        let bwd_span =
            self.segment_span(self.children[comp_a2].parent, self.children[comp_b2].parent);

        if fwd_span <= bwd_span {
            self.reverse_arc(a2, b2);
        } else {
            self.reverse_arc(comp_a2, comp_b2);
            self.orientation ^= true;
        }
        self.maybe_rebuild();

        #[cfg(debug_assertions)]
        self.debug_check_invariants();
    }

    /// Emits the current tour, starting at city 0, into `out`.
    pub fn cycle(&self, out: &mut [usize]) {
        debug_assert_eq!(out.len(), self.children.len());
        let mut cur = 0usize;
        for slot in out.iter_mut() {
            *slot = cur;
            cur = self.next(cur);
        }
    }

    // ---- internal ----

    fn first_city(&self, pidx: u32) -> u32 {
        let p = &self.parents[pidx as usize];
        if p.reverse {
            *p.cities.last().unwrap()
        } else {
            p.cities[0]
        }
    }

    fn last_city(&self, pidx: u32) -> u32 {
        let p = &self.parents[pidx as usize];
        if p.reverse {
            p.cities[0]
        } else {
            *p.cities.last().unwrap()
        }
    }

    fn key(&self, city: usize) -> i64 {
        let c = self.children[city];
        let p = &self.parents[c.parent as usize];
        let eff = if p.reverse {
            p.cities.len() - 1 - c.seq as usize
        } else {
            c.seq as usize
        };
        p.rank * SEQ_SCALE + eff as i64
    }

    fn effective_seq(&self, city: usize) -> usize {
        let c = self.children[city];
        let p = &self.parents[c.parent as usize];
        if p.reverse {
            p.cities.len() - 1 - c.seq as usize
        } else {
            c.seq as usize
        }
    }

    fn effective_order(&self, pidx: u32) -> Vec<u32> {
        let p = &self.parents[pidx as usize];
        if p.reverse {
            p.cities.iter().rev().copied().collect()
        } else {
            p.cities.clone()
        }
    }

    fn reindex_parent(&mut self, pidx: u32) {
        let cities = self.parents[pidx as usize].cities.clone();
        for (seq, city) in cities.into_iter().enumerate() {
            self.children[city as usize] = ChildSlot {
                parent: pidx,
                seq: seq as u32,
            };
        }
    }

    /// Number of ring hops from segment `from` to segment `to`, walking
    /// forward. Used only as a cheap heuristic for which side of a flip
    /// is shorter; never correctness-critical.
    fn segment_span(&self, from: u32, to: u32) -> usize {
        let cap = self.parents.len();
        let mut p = from;
        let mut count = 0;
        while p != to && count <= cap {
            p = self.parents[p as usize].next;
            count += 1;
        }
        count
    }

    /// Reassigns ranks in ring order starting at `start`, which
    /// receives the minimum rank. Guarantees maximal headroom between
    /// `start` and its successor, which is exactly the gap callers need
    /// before inserting a freshly split segment there.
    fn renumber_ranks_from(&mut self, start: u32) {
        let mut p = start;
        let mut i: i64 = 0;
        loop {
            self.parents[p as usize].rank = i * RANK_GAP;
            i += 1;
            p = self.parents[p as usize].next;
            if p == start {
                break;
            }
        }
    }

    /// Splits the segment `pidx` between effective positions `k-1` and
    /// `k`, leaving the prefix `[0..k)` in `pidx` and pushing the
    /// suffix `[k..)` into a freshly allocated segment inserted right
    /// after `pidx` in the ring. Returns the new segment's id.
    fn split_parent_at(&mut self, pidx: u32, k: usize) -> u32 {
        let eff = self.effective_order(pidx);
        debug_assert!(k > 0 && k < eff.len());
        let left = eff[..k].to_vec();
        let right = eff[k..].to_vec();

        self.renumber_ranks_from(pidx);
        let old_next = self.parents[pidx as usize].next;
        let left_rank = self.parents[pidx as usize].rank;
        let right_rank = self.parents[old_next as usize].rank;
        let new_rank = left_rank + (right_rank - left_rank) / 2;

        let new_idx = self.parents.len() as u32;
        self.parents[pidx as usize].cities = left;
        self.parents[pidx as usize].reverse = false;
        self.parents[pidx as usize].next = new_idx;
        self.parents[old_next as usize].prev = new_idx;
        self.parents.push(ParentSlot {
            cities: right,
            reverse: false,
            rank: new_rank,
            prev: pidx,
            next: old_next,
        });

        self.reindex_parent(pidx);
        self.reindex_parent(new_idx);
        new_idx
    }

    /// Ensures `city` is the first element (in effective order) of its
    /// segment, splitting the segment if necessary.
    fn split_before(&mut self, city: usize) {
        let k = self.effective_seq(city);
        if k == 0 {
            return;
        }
        let pidx = self.children[city].parent;
        self.split_parent_at(pidx, k);
    }

    /// Ensures `city` is the last element (in effective order) of its
    /// segment, splitting the segment if necessary.
    fn split_after(&mut self, city: usize) {
        let pidx = self.children[city].parent;
        let len = self.parents[pidx as usize].cities.len();
        let k = self.effective_seq(city) + 1;
        if k == len {
            return;
        }
        self.split_parent_at(pidx, k);
    }

    /// Physically reverses the arc from `a` to `b` inclusive. `a` and
    /// `b` must not together span the entire ring (callers choose the
    /// shorter of the two complementary arcs, which guarantees this for
    /// any `n >= 3` with a non-trivial candidate move).
    fn reverse_arc(&mut self, a: usize, b: usize) {
        self.split_before(a);
        self.split_after(b);

        let seg_start = self.children[a].parent;
        let seg_end = self.children[b].parent;

        let mut chain = vec![seg_start];
        if seg_start != seg_end {
            let mut p = seg_start;
            loop {
                p = self.parents[p as usize].next;
                chain.push(p);
                if p == seg_end {
                    break;
                }
            }
        }
        debug_assert!(
            chain.len() < self.parents.len() || self.parents.len() == chain.len(),
            "flip arc bookkeeping"
        );

        let before = self.parents[seg_start as usize].prev;
        let after = self.parents[seg_end as usize].next;
        let ranks: Vec<i64> = chain.iter().map(|&p| self.parents[p as usize].rank).collect();
        let k = chain.len();

        for (i, &rank) in ranks.iter().enumerate() {
            let slot = chain[k - 1 - i] as usize;
            self.parents[slot].rank = rank;
            self.parents[slot].reverse ^= true;
        }

        self.parents[before as usize].next = chain[k - 1];
        self.parents[chain[k - 1] as usize].prev = before;
        for i in (1..k).rev() {
            self.parents[chain[i] as usize].next = chain[i - 1];
            self.parents[chain[i - 1] as usize].prev = chain[i];
        }
        self.parents[chain[0] as usize].next = after;
        self.parents[after as usize].prev = chain[0];
    }

    fn maybe_rebuild(&mut self) {
        let cap = 2 * (self.children.len() / self.target_group + 2);
        if self.parents.len() > cap {
            let mut order = vec![0usize; self.children.len()];
            self.cycle(&mut order);
            self.rebuild_from(&order);
        }
    }

    /// Rebuilds the segment arenas from scratch given a tour order,
    /// resetting segment sizes to the target `G`. This both implements
    /// `init` and serves as the periodic rebalancing mechanism (see
    /// DESIGN.md): splits only ever shrink segments, so a full rebuild
    /// every O(sqrt(n)) splits keeps the amortized cost of `flip` at
    /// O(sqrt(n)).
    fn rebuild_from(&mut self, order: &[usize]) {
        let n = order.len();
        let g = self.target_group;
        let n_parents = (n + g - 1) / g;

        let mut parents = Vec::with_capacity(n_parents);
        for seg in 0..n_parents {
            let start = seg * g;
            let end = (start + g).min(n);
            let cities: Vec<u32> = order[start..end].iter().map(|&c| c as u32).collect();
            parents.push(ParentSlot {
                cities,
                reverse: false,
                rank: seg as i64 * RANK_GAP,
                prev: ((seg + n_parents - 1) % n_parents) as u32,
                next: ((seg + 1) % n_parents) as u32,
            });
        }
        self.parents = parents;
        for pidx in 0..self.parents.len() {
            self.reindex_parent(pidx as u32);
        }
        // `order` already reflects the public traversal (it comes from
        // `self.cycle`, or is the caller's own tour at `init`), so the
        // freshly rebuilt physical chain now matches the public view
        // directly.
        self.orientation = false;
    }

    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        let n = self.children.len();
        let mut seen = vec![false; n];
        let mut cur = 0usize;
        for _ in 0..n {
            assert!(!seen[cur], "city visited twice during invariant check");
            seen[cur] = true;
            let nxt = self.next(cur);
            assert_eq!(self.prev(nxt), cur, "next/prev mismatch at {}", cur);
            cur = nxt;
        }
        assert_eq!(cur, 0, "cycle did not return to start");
        assert!(seen.iter().all(|&b| b), "not all cities visited");
    }
}

/// True iff `y` lies strictly between `x` and `z` in the cyclic order
/// implied by the linear keys `x`, `y`, `z` (exactly one wraparound
/// point is tolerated). Distinct from an ordinary `<` comparison only
/// in how it treats that single wrap.
fn cyclic_between(x: i64, y: i64, z: i64) -> bool {
    if x < z {
        x < y && y < z
    } else {
        y > x || y < z
    }
}
