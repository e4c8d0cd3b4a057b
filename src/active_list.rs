//! The list of candidate predecessor breaks maintained by the sweep.
//!
//! The dynamic-programming search keeps the break nodes that may
//! still begin a line under consideration in a doubly-linked list.
//! Between two consecutive node entries sits exactly one *delta*
//! entry carrying the (width, stretch, shrink) difference between
//! their positions. Together with a running `active_width` triple
//! (the sums from the first listed node's position to the current
//! sweep position) this gives every candidate's line width in O(1)
//! during a single pass, and O(1) removal of candidates that can no
//! longer start a feasible line.
//!
//! The list is stored in a freelist-backed slot arena; slot indices
//! play the role of pointers.

use std::ops::{AddAssign, SubAssign};

/// A (width, stretch, shrink) triple.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WidthTriple {
    pub width: f64,
    pub stretch: f64,
    pub shrink: f64,
}

impl WidthTriple {
    pub(crate) const ZERO: WidthTriple = WidthTriple { width: 0.0, stretch: 0.0, shrink: 0.0 };

    pub(crate) fn new((width, stretch, shrink): (f64, f64, f64)) -> WidthTriple {
        WidthTriple { width, stretch, shrink }
    }

    pub(crate) fn as_tuple(self) -> (f64, f64, f64) {
        (self.width, self.stretch, self.shrink)
    }
}

impl AddAssign for WidthTriple {
    fn add_assign(&mut self, rhs: WidthTriple) {
        self.width += rhs.width;
        self.stretch += rhs.stretch;
        self.shrink += rhs.shrink;
    }
}

impl SubAssign for WidthTriple {
    fn sub_assign(&mut self, rhs: WidthTriple) {
        self.width -= rhs.width;
        self.stretch -= rhs.stretch;
        self.shrink -= rhs.shrink;
    }
}

/// One entry of the active list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Entry {
    /// The list head.
    Sentinel,
    /// A candidate predecessor, by break-node index.
    Node(usize),
    /// The width difference between the positions of the surrounding
    /// node entries.
    Delta(WidthTriple),
}

#[derive(Debug)]
struct Slot {
    prev: Option<usize>,
    next: Option<usize>,
    entry: Entry,
}

#[derive(Debug)]
pub(crate) struct ActiveList {
    slots: Vec<Slot>,
    free: Vec<usize>,
    /// Index of the sentinel slot.
    head: usize,
    /// Index of the last slot in the list (the sentinel when empty).
    tail: usize,
    /// Sums from the first listed node's position to the current
    /// sweep position. Zero while the list is empty.
    pub active_width: WidthTriple,
}

impl ActiveList {
    pub(crate) fn new() -> ActiveList {
        ActiveList {
            slots: vec![Slot { prev: None, next: None, entry: Entry::Sentinel }],
            free: Vec::new(),
            head: 0,
            tail: 0,
            active_width: WidthTriple::ZERO,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tail == self.head
    }

    pub(crate) fn head(&self) -> usize {
        self.head
    }

    pub(crate) fn next(&self, idx: usize) -> Option<usize> {
        self.slots[idx].next
    }

    pub(crate) fn entry(&self, idx: usize) -> Entry {
        self.slots[idx].entry
    }

    /// The node index of the last listed candidate. A non-empty list
    /// always ends on a node entry.
    pub(crate) fn last_node(&self) -> Option<usize> {
        match self.slots[self.tail].entry {
            Entry::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Accounts for the sweep moving one item forward.
    pub(crate) fn advance(&mut self, contribution: WidthTriple) {
        if !self.is_empty() {
            self.active_width += contribution;
        }
    }

    /// Appends a node entry at the back and returns its slot index.
    ///
    /// `delta_from_last` must be the raw sums between the current
    /// last node's position and the new node's position; it is only
    /// consulted when the list is non-empty.
    pub(crate) fn append_node(&mut self, node: usize, delta_from_last: WidthTriple) -> usize {
        if !self.is_empty() {
            self.push_back(Entry::Delta(delta_from_last));
        }
        self.push_back(Entry::Node(node))
    }

    /// Removes a node entry, restoring the delta invariants.
    pub(crate) fn remove(&mut self, idx: usize) {
        debug_assert!(matches!(self.slots[idx].entry, Entry::Node(_)));
        let prev = self.slots[idx].prev.expect("node entry has a predecessor");
        let next = self.slots[idx].next;
        self.unlink(idx);

        match (self.slots[prev].entry, next.map(|n| self.slots[n].entry)) {
            // Last node of the list gone: drop a now-trailing delta
            // and reset the running width.
            (Entry::Sentinel, None) => {
                self.active_width = WidthTriple::ZERO;
            }
            (Entry::Delta(_), None) => {
                self.unlink(prev);
            }
            // First node gone: the orphan delta ahead of the new
            // first node folds into the running width.
            (Entry::Sentinel, Some(Entry::Delta(d))) => {
                self.active_width -= d;
                self.unlink(next.unwrap());
            }
            // Interior node gone: merge the surrounding deltas.
            (Entry::Delta(d_before), Some(Entry::Delta(d_after))) => {
                self.slots[prev].entry = Entry::Delta(WidthTriple {
                    width: d_before.width + d_after.width,
                    stretch: d_before.stretch + d_after.stretch,
                    shrink: d_before.shrink + d_after.shrink,
                });
                self.unlink(next.unwrap());
            }
            other => unreachable!("delta invariant violated: {:?}", other),
        }
    }

    /// Detaches every entry and resets the running width.
    pub(crate) fn clear(&mut self) {
        let mut cursor = self.slots[self.head].next;
        while let Some(idx) = cursor {
            cursor = self.slots[idx].next;
            self.free.push(idx);
        }
        self.slots[self.head].next = None;
        self.tail = self.head;
        self.active_width = WidthTriple::ZERO;
    }

    fn push_back(&mut self, entry: Entry) -> usize {
        let prev = Some(self.tail);
        let slot = Slot { prev, next: None, entry };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.slots[self.tail].next = Some(idx);
        self.tail = idx;
        idx
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;
        if let Some(p) = prev {
            self.slots[p].next = next;
        }
        if let Some(n) = next {
            self.slots[n].prev = prev;
        } else {
            self.tail = prev.expect("only the sentinel has no predecessor");
        }
        self.free.push(idx);
    }
}
