//! The LK step engine (C5): bounded, sequential-exchange local search
//! with gain accumulation, don't-look bits and a FIFO queue of cities
//! to revisit.
//!
//! The per-city search below is an explicit-stack DFS, not a recursive
//! function: each level tentatively *commits* its 2-opt closing flip
//! right away (flips always preserve the Hamiltonian invariant,
//! whatever their gain), and backtracking undoes a level by
//! re-applying the same flip a second time — `flip` is its own inverse
//! for identical arguments. This reaches arbitrarily deep exchange
//! chains without ever holding a non-cyclic intermediate structure, and
//! without recursion.

use std::collections::VecDeque;

use crate::candidates::CandidateSet;
use crate::flipper::Flipper;
use crate::heap::IndexedHeap;
use crate::oracle::DistanceOracle;

/// Per-level backtrack budgets: 5 candidates at level 1, 5 at level 2,
/// 1 for every level beyond (customary LK bounds).
const BACKTRACK_LIMIT: [usize; 5] = [5, 5, 1, 1, 1];
const MAX_LEVELS: usize = BACKTRACK_LIMIT.len();

/// Drives one LK inner loop over a flipper, given a fixed candidate set
/// and distance oracle. Owns the don't-look bits, the queue `Q`, and
/// one `IndexedHeap` per search-tree level for the duration of the
/// loop. Each level's heap orders that level's still-untried candidates
/// by `d(t2,t3)`, ties broken by insertion order; since the candidate
/// set is already distance-sorted the heap degenerates to a plain
/// queue in practice, but a search that ever needed to re-prioritize by
/// a live quantity (running gain, say) would only need to change what
/// gets inserted, not how levels are walked.
pub struct LkEngine<'a, O: DistanceOracle> {
    flipper: &'a mut Flipper,
    oracle: &'a O,
    candidates: &'a CandidateSet,
    dont_look: Vec<bool>,
    in_queue: Vec<bool>,
    queue: VecDeque<usize>,
    level_heaps: Vec<IndexedHeap>,
}

impl<'a, O: DistanceOracle> LkEngine<'a, O> {
    pub fn new(flipper: &'a mut Flipper, oracle: &'a O, candidates: &'a CandidateSet) -> Self {
        let n = candidates.len();
        Self {
            flipper,
            oracle,
            candidates,
            dont_look: vec![false; n],
            in_queue: vec![false; n],
            queue: VecDeque::with_capacity(n),
            level_heaps: (0..MAX_LEVELS).map(|_| IndexedHeap::new(n)).collect(),
        }
    }

    /// Seeds the queue with every city and clears every don't-look bit.
    pub fn reset_all(&mut self) {
        self.queue.clear();
        for c in 0..self.dont_look.len() {
            self.dont_look[c] = false;
            self.in_queue[c] = true;
            self.queue.push_back(c);
        }
    }

    /// Clears the don't-look bit on `city` and enqueues it if it is
    /// not already queued.
    pub fn wake(&mut self, city: usize) {
        self.dont_look[city] = false;
        if !self.in_queue[city] {
            self.in_queue[city] = true;
            self.queue.push_back(city);
        }
    }

    /// Runs the inner loop until `Q` drains or `stallcount` consecutive
    /// full passes over `Q` yield no improving flip. Returns the total
    /// gain (tour-length decrease) accumulated across every committed
    /// move.
    pub fn run(&mut self, stallcount: i32) -> i64 {
        let mut stall = 0;
        let mut total_gain: i64 = 0;
        while !self.queue.is_empty() && stall < stallcount {
            let pass_len = self.queue.len();
            let mut improved_this_pass = false;
            for _ in 0..pass_len {
                let t1 = match self.queue.pop_front() {
                    Some(c) => c,
                    None => break,
                };
                self.in_queue[t1] = false;
                if self.dont_look[t1] {
                    continue;
                }
                if let Some(gain) = self.improve_from(t1) {
                    total_gain += gain;
                    improved_this_pass = true;
                } else {
                    self.dont_look[t1] = true;
                }
            }
            stall = if improved_this_pass { 0 } else { stall + 1 };
        }
        total_gain
    }

    /// Attempts one improving sequential exchange rooted at `t1`, in
    /// both tour directions. Commits and returns `Some(gain)` on
    /// success (with the four-or-more touched cities woken); leaves
    /// the tour untouched and returns `None` on failure.
    fn improve_from(&mut self, t1: usize) -> Option<i64> {
        for &dir_next in &[true, false] {
            if let Some((gain, touched)) = self.try_chain(t1, dir_next) {
                for c in touched {
                    self.wake(c);
                }
                return Some(gain);
            }
        }
        None
    }

    fn tour_neighbor(&self, city: usize, dir_next: bool) -> usize {
        if dir_next {
            self.flipper.next(city)
        } else {
            self.flipper.prev(city)
        }
    }

    fn try_chain(&mut self, base: usize, dir_next: bool) -> Option<(i64, Vec<usize>)> {
        let mut committed: Vec<(usize, usize, i64)> = Vec::with_capacity(MAX_LEVELS);
        let mut touched: Vec<usize> = vec![base];
        let mut level_t2: [Option<usize>; MAX_LEVELS] = [None; MAX_LEVELS];
        let mut level_extracted = [0usize; MAX_LEVELS];
        let mut running_gain: i64 = 0;
        let mut level = 0usize;

        loop {
            if level == MAX_LEVELS {
                match self.backtrack(&mut committed, &mut level, &mut running_gain) {
                    Some(()) => continue,
                    None => return None,
                }
            }

            let t2 = self.tour_neighbor(base, dir_next);
            let d_base_t2 = self.oracle.distance(base, t2) as i64;

            if level_t2[level] != Some(t2) {
                self.level_heaps[level].clear();
                for &raw in self.candidates.candidates(t2) {
                    let t3 = raw as usize;
                    if t3 == base || t3 == t2 || self.level_heaps[level].contains(t3) {
                        continue;
                    }
                    let d23 = self.oracle.distance(t2, t3);
                    self.level_heaps[level].insert(t3, d23);
                }
                level_t2[level] = Some(t2);
                level_extracted[level] = 0;
            }

            let mut descended = false;
            while level_extracted[level] < BACKTRACK_LIMIT[level] {
                let (t3, d23) = match self.level_heaps[level].extract_min() {
                    Some(entry) => entry,
                    None => break,
                };
                level_extracted[level] += 1;
                let d23 = d23 as i64;
                if d23 >= d_base_t2 {
                    // The heap hands out candidates ascending by
                    // distance: no remaining one at this level can help
                    // either.
                    break;
                }
                let t4 = if dir_next {
                    self.flipper.prev(t3)
                } else {
                    self.flipper.next(t3)
                };
                if t4 == base || t4 == t2 {
                    continue;
                }

                let g_level1 = d_base_t2 - d23;
                let d34 = self.oracle.distance(t3, t4) as i64;
                let d4base = self.oracle.distance(t4, base) as i64;
                let close_gain = running_gain + g_level1 + d34 - d4base;

                let args = if dir_next { (t2, t4) } else { (base, t3) };
                self.flipper.flip(args.0, args.1);
                touched.push(t2);
                touched.push(t3);
                touched.push(t4);

                if close_gain > 0 {
                    return Some((close_gain, touched));
                }

                committed.push((args.0, args.1, running_gain));
                running_gain = close_gain;
                level += 1;
                descended = true;
                break;
            }

            if !descended {
                match self.backtrack(&mut committed, &mut level, &mut running_gain) {
                    Some(()) => continue,
                    None => return None,
                }
            }
        }
    }

    /// Undoes the most recent commit. Returns `None` once level 0
    /// itself has been exhausted (the whole chain failed). The level we
    /// return to keeps whatever candidates its heap has left; nothing
    /// needs re-inserting, since a candidate only ever leaves a heap via
    /// `extract_min` and is never wanted a second time.
    fn backtrack(
        &mut self,
        committed: &mut Vec<(usize, usize, i64)>,
        level: &mut usize,
        running_gain: &mut i64,
    ) -> Option<()> {
        if *level == 0 {
            return None;
        }
        *level -= 1;
        let (a, b, prev_gain) = committed.pop().expect("commit stack matches level");
        self.flipper.flip(a, b);
        *running_gain = prev_gain;
        Some(())
    }
}
