//! The decision-diagram arena and its operations.

use std::cell::{Cell, RefCell};

use num_complex::Complex64;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::complex::{ComplexTable, DEFAULT_TOLERANCE, WEIGHT_ONE, WEIGHT_ZERO};
use crate::error::{DdError, DdResult};
use crate::handle::DdHandle;
use crate::node::{Edge, Node, TERMINAL};
use crate::side::Side;

/// Dead-node count that triggers an unforced collection.
const GC_THRESHOLD: usize = 4096;

/// One arena slot.
#[derive(Debug, Clone, Copy)]
struct Slot {
    node: Node,
    refs: u32,
    in_use: bool,
}

/// Which reduction a side-tagged rewrite performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReduceKind {
    Ancillary,
    Garbage,
}

/// The arena owning every decision-diagram node.
///
/// All nodes live in one slot vector; handles are `(arena, index)` pairs and
/// never outlive the arena. Canonicity rests on two tables: the
/// [`ComplexTable`] interning edge weights under a tolerance, and the unique
/// table hash-consing nodes, so structurally identical operators always
/// resolve to the same index.
///
/// The arena is single-threaded; interior mutability keeps the whole API on
/// `&self` so that handles (which borrow the arena) can be released on any
/// exit path.
pub struct Package {
    slots: RefCell<Vec<Slot>>,
    free: RefCell<Vec<u32>>,
    unique: RefCell<FxHashMap<Node, u32>>,
    complex: RefCell<ComplexTable>,
    mul_cache: RefCell<FxHashMap<(u32, u32), Edge>>,
    add_cache: RefCell<FxHashMap<(Edge, Edge), Edge>>,
    /// Slots currently in use (dead or alive).
    used: Cell<usize>,
    /// Nodes with a positive reference count.
    active: Cell<usize>,
    /// High-water mark of `active`.
    peak_active: Cell<usize>,
    node_limit: usize,
}

impl Package {
    /// Create an arena with the default weight tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Create an arena canonicalizing weights under the given tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        let terminal = Slot {
            node: Node {
                level: u32::MAX,
                edges: [Edge::ZERO; 4],
            },
            refs: 1,
            in_use: true,
        };
        Self {
            slots: RefCell::new(vec![terminal]),
            free: RefCell::new(vec![]),
            unique: RefCell::new(FxHashMap::default()),
            complex: RefCell::new(ComplexTable::new(tolerance)),
            mul_cache: RefCell::new(FxHashMap::default()),
            add_cache: RefCell::new(FxHashMap::default()),
            used: Cell::new(0),
            active: Cell::new(0),
            peak_active: Cell::new(0),
            node_limit: u32::MAX as usize,
        }
    }

    /// Cap the number of simultaneously allocated nodes.
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit;
        self
    }

    /// Get the weight tolerance.
    pub fn tolerance(&self) -> f64 {
        self.complex.borrow().tolerance()
    }

    /// Number of nodes currently holding a positive reference count.
    pub fn num_active_nodes(&self) -> usize {
        self.active.get()
    }

    /// High-water mark of concurrently active nodes.
    pub fn peak_active_nodes(&self) -> usize {
        self.peak_active.get()
    }

    /// Get a copy of a non-terminal node.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the terminal or not allocated.
    pub fn node(&self, index: u32) -> Node {
        assert_ne!(index, TERMINAL, "the terminal node has no structure");
        let slots = self.slots.borrow();
        assert!(slots[index as usize].in_use, "node {index} is not allocated");
        slots[index as usize].node
    }

    /// Get the complex value behind an interned weight index.
    pub fn weight_value(&self, weight: u32) -> Complex64 {
        self.complex.borrow().value(weight)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Build the identity operator over `n` qubit lines.
    pub fn make_identity(&self, n: u32) -> DdResult<DdHandle<'_>> {
        let e = self.identity_edge(n)?;
        Ok(self.retain(e))
    }

    /// Build a (multi-)controlled single-qubit gate over `n` lines.
    ///
    /// `matrix` is the 2x2 gate in row-major order, `controls` the positive
    /// control lines, `target` the target line.
    pub fn make_gate(
        &self,
        n: u32,
        matrix: [Complex64; 4],
        controls: &[u32],
        target: u32,
    ) -> DdResult<DdHandle<'_>> {
        let e = self.gate_edge(n, matrix, controls, target)?;
        Ok(self.retain(e))
    }

    /// Build the SWAP of two lines over `n` lines.
    pub fn make_swap(&self, n: u32, a: u32, b: u32) -> DdResult<DdHandle<'_>> {
        let x = [
            Complex64::ZERO,
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::ZERO,
        ];
        // SWAP(a, b) = CX(a, b) · CX(b, a) · CX(a, b)
        let cab = self.gate_edge(n, x, &[a], b)?;
        let cba = self.gate_edge(n, x, &[b], a)?;
        let level = i64::from(n) - 1;
        let partial = self.mul_edges(cab, cba, level)?;
        let swap = self.mul_edges(partial, cab, level)?;
        Ok(self.retain(swap))
    }

    fn identity_edge(&self, n: u32) -> DdResult<Edge> {
        let mut e = Edge::terminal(WEIGHT_ONE);
        for level in 0..n {
            e = self.make_node(level, [e, Edge::ZERO, Edge::ZERO, e])?;
        }
        Ok(e)
    }

    fn gate_edge(
        &self,
        n: u32,
        matrix: [Complex64; 4],
        controls: &[u32],
        target: u32,
    ) -> DdResult<Edge> {
        debug_assert!(target < n);
        debug_assert!(controls.iter().all(|&c| c < n && c != target));
        let is_control = |line: u32| controls.contains(&line);

        let mut em = [Edge::ZERO; 4];
        for (slot, &entry) in em.iter_mut().zip(matrix.iter()) {
            *slot = self.terminal_for(entry);
        }

        // lines below the target
        for z in 0..target {
            for i in 0..4 {
                let diagonal = i / 2 == i % 2;
                em[i] = if is_control(z) {
                    if diagonal {
                        let ident = self.identity_edge(z)?;
                        self.make_node(z, [ident, Edge::ZERO, Edge::ZERO, em[i]])?
                    } else {
                        self.make_node(z, [Edge::ZERO, Edge::ZERO, Edge::ZERO, em[i]])?
                    }
                } else {
                    self.make_node(z, [em[i], Edge::ZERO, Edge::ZERO, em[i]])?
                };
            }
        }

        let mut e = self.make_node(target, em)?;

        // lines above the target
        for z in (target + 1)..n {
            e = if is_control(z) {
                let ident = self.identity_edge(z)?;
                self.make_node(z, [ident, Edge::ZERO, Edge::ZERO, e])?
            } else {
                self.make_node(z, [e, Edge::ZERO, Edge::ZERO, e])?
            };
        }
        Ok(e)
    }

    // =========================================================================
    // Algebra
    // =========================================================================

    /// Multiply two operators: `a · b`.
    pub fn multiply<'p>(&'p self, a: &DdHandle<'p>, b: &DdHandle<'p>) -> DdResult<DdHandle<'p>> {
        let (ra, rb) = (a.root(), b.root());
        let level = match (ra.is_terminal(), rb.is_terminal()) {
            (true, true) => -1,
            (false, _) => i64::from(self.node(ra.node).level),
            (true, false) => i64::from(self.node(rb.node).level),
        };
        let e = self.mul_edges(ra, rb, level)?;
        Ok(self.retain(e))
    }

    /// Number of distinct nodes in the diagram under `root`, terminal included.
    pub fn size_of(&self, root: Edge) -> usize {
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        let mut stack = vec![];
        if !root.is_terminal() {
            stack.push(root.node);
        }
        while let Some(i) = stack.pop() {
            if seen.insert(i) {
                for e in self.node(i).edges {
                    if !e.is_terminal() {
                        stack.push(e.node);
                    }
                }
            }
        }
        seen.len() + 1
    }

    fn mul_edges(&self, a: Edge, b: Edge, level: i64) -> DdResult<Edge> {
        if a.weight == WEIGHT_ZERO || b.weight == WEIGHT_ZERO {
            return Ok(Edge::ZERO);
        }
        let w = self.weight_value(a.weight) * self.weight_value(b.weight);
        if level < 0 {
            debug_assert!(a.is_terminal() && b.is_terminal());
            return Ok(self.terminal_for(w));
        }
        debug_assert!(!a.is_terminal() && !b.is_terminal());

        // cache on the weight-stripped nodes, rescale afterwards
        let key = (a.node, b.node);
        let cached = self.mul_cache.borrow().get(&key).copied();
        if let Some(r) = cached {
            return Ok(self.scale(r, w));
        }

        let an = self.node(a.node);
        let bn = self.node(b.node);
        debug_assert_eq!(i64::from(an.level), level);
        debug_assert_eq!(i64::from(bn.level), level);

        let mut edges = [Edge::ZERO; 4];
        for row in 0..2 {
            for col in 0..2 {
                let mut acc = Edge::ZERO;
                for k in 0..2 {
                    let prod =
                        self.mul_edges(an.edges[row * 2 + k], bn.edges[k * 2 + col], level - 1)?;
                    acc = self.add_edges(acc, prod, level - 1)?;
                }
                edges[row * 2 + col] = acc;
            }
        }
        let result = self.make_node(an.level, edges)?;
        self.mul_cache.borrow_mut().insert(key, result);
        Ok(self.scale(result, w))
    }

    fn add_edges(&self, a: Edge, b: Edge, level: i64) -> DdResult<Edge> {
        if a.weight == WEIGHT_ZERO {
            return Ok(b);
        }
        if b.weight == WEIGHT_ZERO {
            return Ok(a);
        }
        if level < 0 {
            let sum = self.weight_value(a.weight) + self.weight_value(b.weight);
            return Ok(self.terminal_for(sum));
        }

        let key = if a <= b { (a, b) } else { (b, a) };
        let cached = self.add_cache.borrow().get(&key).copied();
        if let Some(r) = cached {
            return Ok(r);
        }

        let an = self.node(a.node);
        let bn = self.node(b.node);
        let wa = self.weight_value(a.weight);
        let wb = self.weight_value(b.weight);

        let mut edges = [Edge::ZERO; 4];
        for i in 0..4 {
            let x = self.scale(an.edges[i], wa);
            let y = self.scale(bn.edges[i], wb);
            edges[i] = self.add_edges(x, y, level - 1)?;
        }
        let result = self.make_node(level as u32, edges)?;
        self.add_cache.borrow_mut().insert(key, result);
        Ok(result)
    }

    // =========================================================================
    // Reductions
    // =========================================================================

    /// Collapse ancillary lines on one side of the comparison.
    ///
    /// An ancilla enters in |0⟩, so the flagged level's block loses its
    /// input-1 entries: columns on the right side, rows on the left.
    pub fn reduce_ancillae<'p>(
        &'p self,
        handle: DdHandle<'p>,
        ancillary: &[bool],
        side: Side,
    ) -> DdResult<DdHandle<'p>> {
        self.reduce(handle, ancillary, side, ReduceKind::Ancillary)
    }

    /// Sum out garbage lines on one side of the comparison.
    ///
    /// A garbage output's value is irrelevant, so the flagged level's block
    /// entries are summed pairwise into the 0-entries: columns on the right
    /// side, rows on the left.
    pub fn reduce_garbage<'p>(
        &'p self,
        handle: DdHandle<'p>,
        garbage: &[bool],
        side: Side,
    ) -> DdResult<DdHandle<'p>> {
        self.reduce(handle, garbage, side, ReduceKind::Garbage)
    }

    fn reduce<'p>(
        &'p self,
        handle: DdHandle<'p>,
        flags: &[bool],
        side: Side,
        kind: ReduceKind,
    ) -> DdResult<DdHandle<'p>> {
        let Some(lowerbound) = flags.iter().position(|&b| b) else {
            return Ok(handle);
        };
        let root = handle.root();
        if root.is_terminal() {
            return Ok(handle);
        }
        let mut memo: FxHashMap<u32, Edge> = FxHashMap::default();
        let reduced = self.reduce_node(root.node, flags, lowerbound as u32, side, kind, &mut memo)?;
        let new_root = self.scale(reduced, self.weight_value(root.weight));
        Ok(self.retain(new_root))
    }

    fn reduce_node(
        &self,
        index: u32,
        flags: &[bool],
        lowerbound: u32,
        side: Side,
        kind: ReduceKind,
        memo: &mut FxHashMap<u32, Edge>,
    ) -> DdResult<Edge> {
        if let Some(&e) = memo.get(&index) {
            return Ok(e);
        }
        let n = self.node(index);
        if n.level < lowerbound {
            // nothing flagged at or below this level
            let e = Edge {
                node: index,
                weight: WEIGHT_ONE,
            };
            memo.insert(index, e);
            return Ok(e);
        }

        let mut edges = [Edge::ZERO; 4];
        for i in 0..4 {
            let e = n.edges[i];
            edges[i] = if e.is_terminal() {
                e
            } else {
                let r = self.reduce_node(e.node, flags, lowerbound, side, kind, memo)?;
                self.scale(r, self.weight_value(e.weight))
            };
        }

        if flags.get(n.level as usize).copied().unwrap_or(false) {
            let child_level = i64::from(n.level) - 1;
            edges = match (kind, side) {
                (ReduceKind::Ancillary, Side::Right) => {
                    [edges[0], Edge::ZERO, edges[2], Edge::ZERO]
                }
                (ReduceKind::Ancillary, Side::Left) => {
                    [edges[0], edges[1], Edge::ZERO, Edge::ZERO]
                }
                (ReduceKind::Garbage, Side::Right) => {
                    let col0 = self.add_edges(edges[0], edges[1], child_level)?;
                    let col1 = self.add_edges(edges[2], edges[3], child_level)?;
                    [col0, Edge::ZERO, col1, Edge::ZERO]
                }
                (ReduceKind::Garbage, Side::Left) => {
                    let row0 = self.add_edges(edges[0], edges[2], child_level)?;
                    let row1 = self.add_edges(edges[1], edges[3], child_level)?;
                    [row0, row1, Edge::ZERO, Edge::ZERO]
                }
            };
        }

        let e = self.make_node(n.level, edges)?;
        memo.insert(index, e);
        Ok(e)
    }

    // =========================================================================
    // Memory management
    // =========================================================================

    /// Reclaim unreferenced nodes.
    ///
    /// Unless `force` is set, collection only runs once enough dead nodes
    /// have accumulated. Returns the number of reclaimed nodes. Both
    /// operation caches are dropped on collection, since their entries may
    /// reference reclaimed slots.
    pub fn garbage_collect(&self, force: bool) -> usize {
        let dead = self.used.get() - self.active.get();
        if !force && dead < GC_THRESHOLD {
            return 0;
        }

        let mut slots = self.slots.borrow_mut();
        let mut unique = self.unique.borrow_mut();
        let mut free = self.free.borrow_mut();
        let mut collected = 0usize;
        for (i, slot) in slots.iter_mut().enumerate().skip(1) {
            if slot.in_use && slot.refs == 0 {
                unique.remove(&slot.node);
                slot.in_use = false;
                free.push(i as u32);
                collected += 1;
            }
        }
        self.used.set(self.used.get() - collected);
        self.mul_cache.borrow_mut().clear();
        self.add_cache.borrow_mut().clear();
        trace!(collected, remaining = self.used.get(), "garbage collected");
        collected
    }

    pub(crate) fn retain(&self, root: Edge) -> DdHandle<'_> {
        self.inc_ref(root);
        DdHandle::new(self, root)
    }

    pub(crate) fn inc_ref(&self, edge: Edge) {
        if edge.is_terminal() {
            return;
        }
        let mut slots = self.slots.borrow_mut();
        self.inc_ref_inner(&mut slots, edge.node);
    }

    fn inc_ref_inner(&self, slots: &mut [Slot], index: u32) {
        let slot = &mut slots[index as usize];
        slot.refs += 1;
        if slot.refs == 1 {
            let active = self.active.get() + 1;
            self.active.set(active);
            if active > self.peak_active.get() {
                self.peak_active.set(active);
            }
            let children = slot.node.edges;
            for child in children {
                if !child.is_terminal() {
                    self.inc_ref_inner(slots, child.node);
                }
            }
        }
    }

    pub(crate) fn dec_ref(&self, edge: Edge) {
        if edge.is_terminal() {
            return;
        }
        let mut slots = self.slots.borrow_mut();
        self.dec_ref_inner(&mut slots, edge.node);
    }

    fn dec_ref_inner(&self, slots: &mut [Slot], index: u32) {
        let slot = &mut slots[index as usize];
        debug_assert!(slot.refs > 0, "reference count underflow on node {index}");
        slot.refs -= 1;
        if slot.refs == 0 {
            self.active.set(self.active.get() - 1);
            let children = slot.node.edges;
            for child in children {
                if !child.is_terminal() {
                    self.dec_ref_inner(slots, child.node);
                }
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup_weight(&self, value: Complex64) -> u32 {
        self.complex.borrow_mut().lookup(value)
    }

    fn terminal_for(&self, value: Complex64) -> Edge {
        let idx = self.lookup_weight(value);
        if idx == WEIGHT_ZERO {
            Edge::ZERO
        } else {
            Edge::terminal(idx)
        }
    }

    fn scale(&self, edge: Edge, factor: Complex64) -> Edge {
        if edge.weight == WEIGHT_ZERO {
            return Edge::ZERO;
        }
        let idx = self.lookup_weight(self.weight_value(edge.weight) * factor);
        if idx == WEIGHT_ZERO {
            Edge::ZERO
        } else {
            Edge {
                node: edge.node,
                weight: idx,
            }
        }
    }

    /// Normalize a block of four edges into a canonical node.
    ///
    /// The largest-magnitude weight (earliest index on ties) is factored out
    /// onto the returned edge; an all-zero block collapses to the zero edge.
    fn make_node(&self, level: u32, mut edges: [Edge; 4]) -> DdResult<Edge> {
        for e in &mut edges {
            if e.weight == WEIGHT_ZERO {
                *e = Edge::ZERO;
            }
        }

        let mut pivot: Option<usize> = None;
        let mut best = 0.0f64;
        for (i, e) in edges.iter().enumerate() {
            if !e.is_zero() {
                let m = self.weight_value(e.weight).norm_sqr();
                if pivot.is_none() || m > best {
                    pivot = Some(i);
                    best = m;
                }
            }
        }
        let Some(pivot) = pivot else {
            return Ok(Edge::ZERO);
        };

        let top_weight = edges[pivot].weight;
        let top = self.weight_value(top_weight);
        for (i, e) in edges.iter_mut().enumerate() {
            if e.is_zero() {
                continue;
            }
            if i == pivot {
                e.weight = WEIGHT_ONE;
                continue;
            }
            let idx = self.lookup_weight(self.weight_value(e.weight) / top);
            *e = if idx == WEIGHT_ZERO {
                Edge::ZERO
            } else {
                Edge {
                    node: e.node,
                    weight: idx,
                }
            };
        }

        let node = Node { level, edges };
        let existing = self.unique.borrow().get(&node).copied();
        let index = match existing {
            Some(idx) => idx,
            None => self.alloc(node)?,
        };
        Ok(Edge {
            node: index,
            weight: top_weight,
        })
    }

    fn alloc(&self, node: Node) -> DdResult<u32> {
        let mut slots = self.slots.borrow_mut();
        let reused = self.free.borrow_mut().pop();
        let index = match reused {
            Some(i) => {
                slots[i as usize] = Slot {
                    node,
                    refs: 0,
                    in_use: true,
                };
                i
            }
            None => {
                if slots.len() > self.node_limit {
                    return Err(DdError::NodeLimitExceeded {
                        limit: self.node_limit,
                    });
                }
                slots.push(Slot {
                    node,
                    refs: 0,
                    in_use: true,
                });
                (slots.len() - 1) as u32
            }
        };
        self.used.set(self.used.get() + 1);
        self.unique.borrow_mut().insert(node, index);
        Ok(index)
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}
