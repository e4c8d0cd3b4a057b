//! The Knuth-Plass dynamic-programming search.
//!
//! The sweep walks the item positions once. At every legal break it
//! scores a line from each candidate predecessor on the active list,
//! keeps the cheapest candidate per fitness class, and records the
//! winners as new break nodes. Candidates that can never again start
//! a fitting line are dropped from the list, which keeps the search
//! linear on ordinary paragraphs; they are remembered for a final
//! rescue pass so that a paragraph always breaks, even when no line
//! fits within the tolerance.

use crate::active_list::{ActiveList, Entry, WidthTriple};
use crate::core::{
    adjust_triple, badness, demerits, displayed_ratio, is_valid_break, ratio_from_triple, Fitness,
    Item, Line, Sums, FEASIBILITY_REL_EPS,
};
use crate::{Error, LineBreakOptions};

/// An accepted break, arena-allocated; `prev` indices form the
/// backtracking chain.
#[derive(Debug)]
struct BreakNode {
    position: usize,
    /// Accumulated demerits from the paragraph start.
    demerits: f64,
    prev: Option<usize>,
    fitness: Fitness,
    /// Whether the item before `position` is a flagged penalty.
    flagged: bool,
}

/// Best candidate seen for one fitness class at the current position.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    prev: usize,
    demerits: f64,
}

/// The least-overfull way to end a line here, used when nothing fits.
#[derive(Debug, Clone, Copy)]
struct RescueCandidate {
    prev: usize,
    overfull: f64,
    prev_demerits: f64,
}

/// Per-position scratch state, cleared for every legal break.
#[derive(Debug, Default)]
struct Scratch {
    class_best: [Option<Candidate>; 4],
    rescue: Option<RescueCandidate>,
    /// (active-list entry, node) pairs to drop after the walk.
    deactivate: Vec<(usize, usize)>,
}

/// Breaks a paragraph of items into lines.
///
/// Returns the lines in order; together they partition the item range
/// exactly, and every line boundary satisfies
/// [`is_valid_break`](crate::is_valid_break). An empty item slice
/// yields no lines. When not even an overfull line can be avoided,
/// the least overfull candidate is taken, so the paragraph always
/// breaks.
///
/// # Errors
///
/// Returns [`Error::NonPositiveLineWidth`] if
/// `options.line_width <= 0`.
///
/// # Examples
///
/// ```
/// use parabreak::{break_lines, Item, LineBreakOptions};
///
/// let items = [
///     Item::box_(30.0),
///     Item::glue(10.0, 5.0, 3.0),
///     Item::box_(40.0),
/// ];
/// let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!((lines[0].start, lines[0].end), (0, 3));
/// ```
pub fn break_lines(options: &LineBreakOptions, items: &[Item]) -> Result<Vec<Line>, Error> {
    if !(options.line_width > 0.0) {
        return Err(Error::NonPositiveLineWidth);
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }
    Sweep::new(options, items).run()
}

struct Sweep<'a> {
    options: &'a LineBreakOptions,
    items: &'a [Item],
    sums: Sums,
    /// `forced_ahead[i]`: an explicit forced-break penalty exists at
    /// some item index >= i.
    forced_ahead: Vec<bool>,
    nodes: Vec<BreakNode>,
    /// Active-list entry of each node, while it has one.
    active_entry: Vec<Option<usize>>,
    /// Best node per (position, fitness class).
    best: Vec<[Option<usize>; 4]>,
    active: ActiveList,
    /// Nodes dropped as hopeless, replayed at the paragraph end.
    deferred: Vec<usize>,
    boundary_eps: f64,
}

impl<'a> Sweep<'a> {
    fn new(options: &'a LineBreakOptions, items: &'a [Item]) -> Sweep<'a> {
        let n = items.len();
        let mut forced_ahead = vec![false; n + 1];
        for j in (0..n).rev() {
            forced_ahead[j] = forced_ahead[j + 1] || items[j].is_forced_break();
        }
        Sweep {
            options,
            items,
            sums: Sums::compute(items),
            forced_ahead,
            nodes: Vec::new(),
            active_entry: Vec::new(),
            best: vec![[None; 4]; n + 1],
            active: ActiveList::new(),
            deferred: Vec::new(),
            boundary_eps: FEASIBILITY_REL_EPS * options.line_width,
        }
    }

    fn run(mut self) -> Result<Vec<Line>, Error> {
        let n = self.items.len();

        // The paragraph start is an unflagged, normally-fitting break.
        self.nodes.push(BreakNode {
            position: 0,
            demerits: 0.0,
            prev: None,
            fitness: Fitness::Normal,
            flagged: false,
        });
        self.active_entry.push(None);
        self.best[0][Fitness::Normal.index()] = Some(0);
        let entry = self.active.append_node(0, WidthTriple::ZERO);
        self.active_entry[0] = Some(entry);

        let mut scratch = Scratch::default();
        for i in 1..=n {
            self.active.advance(WidthTriple::new(self.items[i - 1].contribution()));
            if !is_valid_break(self.items, i) {
                continue;
            }
            self.process_position(i, &mut scratch);
        }

        self.backtrack(n)
    }

    fn process_position(&mut self, i: usize, scratch: &mut Scratch) {
        let n = self.items.len();
        let is_end = i == n;
        let (raw_cost, curr_flagged) = match self.items[i - 1] {
            Item::Penalty { cost, flagged, .. } => (cost, flagged),
            _ => (0.0, false),
        };
        let is_explicit_forced = self.items[i - 1].is_forced_break();
        // The implicit paragraph end is itself a forced break; an
        // infinite trailing cost contributes no penalty term there.
        let penalty_cost = if is_end && raw_cost.is_infinite() {
            f64::NEG_INFINITY
        } else if is_end && !matches!(self.items[i - 1], Item::Penalty { .. }) {
            f64::NEG_INFINITY
        } else {
            raw_cost
        };
        let is_forced = penalty_cost == f64::NEG_INFINITY || is_end;
        let rescue_eligible = is_explicit_forced || is_end;

        scratch.class_best = [None; 4];
        scratch.rescue = None;
        scratch.deactivate.clear();

        // Score a line from every active candidate to this position,
        // peeling deltas off a running copy of the active width.
        let mut running = self.active.active_width;
        let mut cursor = self.active.next(self.active.head());
        while let Some(entry_idx) = cursor {
            let entry = self.active.entry(entry_idx);
            cursor = self.active.next(entry_idx);
            match entry {
                Entry::Delta(d) => running -= d,
                Entry::Node(node_idx) => {
                    let deactivate = self.consider(
                        scratch,
                        node_idx,
                        running.as_tuple(),
                        i,
                        penalty_cost,
                        curr_flagged,
                        is_forced,
                        rescue_eligible,
                    );
                    if deactivate {
                        scratch.deactivate.push((entry_idx, node_idx));
                    }
                }
                Entry::Sentinel => unreachable!("sentinel inside the list"),
            }
        }

        // The paragraph end is the last chance for nodes that were
        // dropped as hopeless.
        if is_end {
            for idx in 0..self.deferred.len() {
                let node_idx = self.deferred[idx];
                let raw = self.sums.raw(self.nodes[node_idx].position, i);
                self.consider(
                    scratch,
                    node_idx,
                    raw,
                    i,
                    penalty_cost,
                    curr_flagged,
                    is_forced,
                    rescue_eligible,
                );
            }
        }

        for k in 0..scratch.deactivate.len() {
            let (entry_idx, node_idx) = scratch.deactivate[k];
            self.active.remove(entry_idx);
            self.active_entry[node_idx] = None;
            self.deferred.push(node_idx);
        }

        // Turn the per-class winners into break nodes.
        let mut created: Vec<usize> = Vec::new();
        for fitness in Fitness::ALL {
            let candidate = match scratch.class_best[fitness.index()] {
                Some(c) => c,
                None => continue,
            };
            let slot = self.best[i][fitness.index()];
            if let Some(old) = slot {
                if self.nodes[old].demerits <= candidate.demerits {
                    continue;
                }
                if let Some(entry_idx) = self.active_entry[old].take() {
                    self.active.remove(entry_idx);
                }
            }
            let node_idx = self.push_node(BreakNode {
                position: i,
                demerits: candidate.demerits,
                prev: Some(candidate.prev),
                fitness,
                flagged: curr_flagged,
            });
            self.best[i][fitness.index()] = Some(node_idx);
            created.push(node_idx);
        }

        // Nothing fit: accept the least overfull line, as tight as a
        // line can be.
        if created.is_empty() {
            if let Some(rescue) = scratch.rescue {
                let node_idx = self.push_node(BreakNode {
                    position: i,
                    demerits: rescue.prev_demerits,
                    prev: Some(rescue.prev),
                    fitness: Fitness::Tight,
                    flagged: curr_flagged,
                });
                self.best[i][Fitness::Tight.index()] = Some(node_idx);
                created.push(node_idx);
            }
        }

        // No line may span a forced break: every older candidate dies
        // and the sweep restarts from the nodes made here.
        if is_forced {
            let mut cursor = self.active.next(self.active.head());
            while let Some(entry_idx) = cursor {
                if let Entry::Node(node_idx) = self.active.entry(entry_idx) {
                    self.active_entry[node_idx] = None;
                }
                cursor = self.active.next(entry_idx);
            }
            self.active.clear();
        }

        for &node_idx in &created {
            let delta = match self.active.last_node() {
                Some(last) => WidthTriple::new(self.sums.raw(self.nodes[last].position, i)),
                None => WidthTriple::ZERO,
            };
            let entry_idx = self.active.append_node(node_idx, delta);
            self.active_entry[node_idx] = Some(entry_idx);
        }
    }

    /// Scores the line from `node_idx` to position `i`. Returns true
    /// when the candidate should be dropped from the active list.
    #[allow(clippy::too_many_arguments)]
    fn consider(
        &self,
        scratch: &mut Scratch,
        node_idx: usize,
        raw: (f64, f64, f64),
        i: usize,
        penalty_cost: f64,
        curr_flagged: bool,
        is_forced: bool,
        rescue_eligible: bool,
    ) -> bool {
        let prev = &self.nodes[node_idx];
        let adjusted = adjust_triple(self.items, i, raw);
        let (w, _, sh) = adjusted;
        let ratio = ratio_from_triple(self.options, adjusted);

        if let Some(r) = ratio {
            let feasible = r >= -1.0 - self.boundary_eps
                && (is_forced || badness(r) <= self.options.tolerance);
            if feasible {
                let fitness = Fitness::from_ratio(r);
                let total = prev.demerits
                    + demerits(
                        self.options,
                        r,
                        penalty_cost,
                        prev.fitness,
                        fitness,
                        prev.flagged,
                        curr_flagged,
                        i == self.items.len(),
                    );
                let slot = &mut scratch.class_best[fitness.index()];
                if slot.map_or(true, |c| total < c.demerits) {
                    *slot = Some(Candidate { prev: node_idx, demerits: total });
                }
                return false;
            }
        }

        let overfull = w - self.options.line_width;
        if rescue_eligible && overfull > 0.0 {
            let replace = match scratch.rescue {
                None => true,
                Some(r) => {
                    overfull < r.overfull
                        || (overfull == r.overfull && prev.demerits < r.prev_demerits)
                }
            };
            if replace {
                scratch.rescue = Some(RescueCandidate {
                    prev: node_idx,
                    overfull,
                    prev_demerits: prev.demerits,
                });
            }
            false
        } else {
            // Once a line is overfull beyond every shrink the rest of
            // the paragraph could supply, this candidate can never
            // start a fitting line again. Keep it if a forced break
            // is still ahead; the rescue there needs candidates.
            overfull > sh + self.sums.suffix_shrink(i) && !self.forced_ahead[i]
        }
    }

    fn push_node(&mut self, node: BreakNode) -> usize {
        self.nodes.push(node);
        self.active_entry.push(None);
        self.nodes.len() - 1
    }

    fn backtrack(self, n: usize) -> Result<Vec<Line>, Error> {
        let mut terminal: Option<usize> = None;
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.position == n
                && terminal.map_or(true, |t| node.demerits < self.nodes[t].demerits)
            {
                terminal = Some(idx);
            }
        }
        let mut idx = terminal.ok_or(Error::NoFeasibleBreaking)?;

        let mut lines = Vec::new();
        while let Some(prev_idx) = self.nodes[idx].prev {
            let start = self.nodes[prev_idx].position;
            let end = self.nodes[idx].position;
            lines.push(Line {
                start,
                end,
                adjustment_ratio: displayed_ratio(self.options, self.items, start, end),
            });
            idx = prev_idx;
        }
        lines.reverse();
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(lines: &[Line]) -> Vec<(usize, usize)> {
        lines.iter().map(|l| (l.start, l.end)).collect()
    }

    #[test]
    fn empty_paragraph_has_no_lines() {
        let lines = break_lines(&LineBreakOptions::new(100.0), &[]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn non_positive_line_width_is_rejected() {
        let items = [Item::box_(10.0)];
        assert_eq!(
            break_lines(&LineBreakOptions::new(0.0), &items),
            Err(Error::NonPositiveLineWidth)
        );
        assert_eq!(
            break_lines(&LineBreakOptions::new(-5.0), &items),
            Err(Error::NonPositiveLineWidth)
        );
    }

    #[test]
    fn forced_break_splits_the_paragraph() {
        let items = [
            Item::box_(30.0),
            Item::glue(10.0, 5.0, 3.0),
            Item::box_(20.0),
            Item::forced_break(),
            Item::box_(40.0),
        ];
        let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
        assert_eq!(widths(&lines), vec![(0, 4), (4, 5)]);
    }

    #[test]
    fn oversized_box_is_rescued() {
        let items = [Item::box_(150.0)];
        let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
        assert_eq!(widths(&lines), vec![(0, 1)]);
        assert_eq!(lines[0].adjustment_ratio, -1.0);
    }

    #[test]
    fn rescue_prefers_the_least_overfull_candidate() {
        // The last box fits on no line. Breaking after the first two
        // boxes (an exact fit) leaves an overflow of 20; not breaking
        // at all would overflow by 130. Rescue must take the former.
        let items = [
            Item::box_(60.0),
            Item::glue(10.0, 5.0, 0.0),
            Item::box_(30.0),
            Item::glue(10.0, 5.0, 0.0),
            Item::box_(120.0),
        ];
        let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
        assert_eq!(widths(&lines), vec![(0, 4), (4, 5)]);
        assert_eq!(lines[0].adjustment_ratio, 0.0);
        assert_eq!(lines[1].adjustment_ratio, -1.0);
    }

    #[test]
    fn no_line_spans_a_forced_break() {
        // The forced break sits where a single line would fit best;
        // it must still end a line.
        let items = [
            Item::box_(20.0),
            Item::glue(5.0, 2.5, 1.5),
            Item::box_(20.0),
            Item::forced_break(),
            Item::box_(20.0),
            Item::glue(5.0, 2.5, 1.5),
            Item::box_(20.0),
        ];
        let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
        assert!(lines.iter().any(|l| l.end == 4));
        for line in &lines {
            assert!(!(line.start < 4 && line.end > 4));
        }
    }

    #[test]
    fn deferred_nodes_still_finish_the_paragraph() {
        // The first box alone overflows the line and there is no
        // shrink anywhere, so every candidate is dropped as hopeless
        // mid-sweep and must be replayed at the end.
        let items = [
            Item::box_(150.0),
            Item::glue(1.0, 0.5, 0.0),
            Item::box_(150.0),
        ];
        let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
        assert_eq!(lines.last().unwrap().end, 3);
        assert_eq!(lines[0].start, 0);
        for line in &lines {
            assert_eq!(line.adjustment_ratio, -1.0);
        }
    }

    #[test]
    fn equal_inputs_break_identically() {
        let items: Vec<Item> = (0..40)
            .flat_map(|_| [Item::box_(8.0), Item::glue(2.0, 1.0, 0.5)])
            .collect();
        let options = LineBreakOptions::new(40.0);
        let a = break_lines(&options, &items).unwrap();
        let b = break_lines(&options, &items).unwrap();
        assert_eq!(a, b);
    }
}
