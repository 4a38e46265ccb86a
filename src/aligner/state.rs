use std::fmt;

use nonmax::NonMaxU32;
use smallvec::SmallVec;

use crate::aligner::utils::AlignedPair;
use crate::aligner::weighting::WeightingStrategy;
use crate::errors::AlignError;

/// A position in the alignment lattice, stored as the number of tokens consumed from each
/// sequence. The anchor sits at `(0, 0)` and the terminal cell at `(left.len(), right.len())`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeCell {
    pub left: usize,
    pub right: usize,
}

impl LatticeCell {
    pub const ANCHOR: LatticeCell = LatticeCell { left: 0, right: 0 };

    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Index of the last consumed left token, `-1` if none were consumed yet.
    #[inline]
    pub fn lidx(&self) -> isize {
        self.left as isize - 1
    }

    /// Index of the last consumed right token, `-1` if none were consumed yet.
    #[inline]
    pub fn ridx(&self) -> isize {
        self.right as isize - 1
    }

    /// Number of tokens left to consume on each side before reaching `end`.
    #[inline]
    pub fn remaining(&self, end: LatticeCell) -> (usize, usize) {
        (end.left.saturating_sub(self.left), end.right.saturating_sub(self.right))
    }
}

impl fmt::Display for LatticeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lidx(), self.ridx())
    }
}

/// The kind of step that led to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Anchor,

    /// Consume one token from both sequences (match or substitution)
    Diagonal,

    /// Consume a left token only (deletion)
    LeftOnly,

    /// Consume a right token only (insertion)
    RightOnly,
}

impl Step {
    /// Steps in the order they are tried when growing a node
    pub const EXPANSION_ORDER: [Step; 3] = [Step::Diagonal, Step::LeftOnly, Step::RightOnly];

    #[inline]
    pub fn consumes_left(&self) -> bool {
        matches!(self, Self::Diagonal | Self::LeftOnly)
    }

    #[inline]
    pub fn consumes_right(&self) -> bool {
        matches!(self, Self::Diagonal | Self::RightOnly)
    }

    #[inline]
    pub fn advance(&self, cell: LatticeCell) -> LatticeCell {
        LatticeCell {
            left: cell.left + self.consumes_left() as usize,
            right: cell.right + self.consumes_right() as usize,
        }
    }
}

/// Index of a node in the [`SearchTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIx(NonMaxU32);

impl NodeIx {
    fn new(value: usize) -> Option<Self> {
        u32::try_from(value).ok()
            .and_then(NonMaxU32::new)
            .map(Self)
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0.get() as usize
    }
}

/// Immutable snapshot of a partial alignment ending at a particular lattice cell.
#[derive(Debug, Clone)]
pub struct SearchNode {
    cell: LatticeCell,
    step: Step,

    /// Cumulative scaled penalty from the anchor to this node
    penalty: f64,

    /// Scaled penalty of the step leading to this node
    step_penalty: f64,

    num_steps: usize,
    priority: f64,
    parent: Option<NodeIx>,
}

impl SearchNode {
    #[inline]
    pub fn cell(&self) -> LatticeCell {
        self.cell
    }

    #[inline]
    pub fn step(&self) -> Step {
        self.step
    }

    #[inline]
    pub fn consumed_left(&self) -> bool {
        self.step.consumes_left()
    }

    #[inline]
    pub fn consumed_right(&self) -> bool {
        self.step.consumes_right()
    }

    #[inline]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    #[inline]
    pub fn step_penalty(&self) -> f64 {
        self.step_penalty
    }

    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Cached `penalty + num_steps + heuristic` used to order the search queue
    #[inline]
    pub fn priority(&self) -> f64 {
        self.priority
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeIx> {
        self.parent
    }

    #[inline]
    pub fn is_anchor(&self) -> bool {
        self.parent.is_none()
    }

    /// True if both sequences are fully consumed
    #[inline]
    pub fn is_finished<T, W>(&self, lattice: &Lattice<'_, T, W>) -> bool {
        self.cell == lattice.end()
    }

    /// Produce the children of this node, trying a diagonal, a left-only and a right-only step
    /// in that order. Steps running past the end of a sequence are omitted.
    pub fn grow<T, W>(
        &self,
        self_ix: NodeIx,
        lattice: &Lattice<'_, T, W>,
    ) -> Result<SmallVec<[SearchNode; 3]>, AlignError>
    where
        W: WeightingStrategy<T>,
    {
        let mut children = SmallVec::new();

        for step in Step::EXPANSION_ORDER {
            let cell = step.advance(self.cell);
            if !lattice.contains(cell) {
                continue;
            }

            let step_penalty = lattice.weight_scale() * lattice.step_weight(self.cell, step)?;
            let penalty = self.penalty + step_penalty;
            let num_steps = self.num_steps + 1;
            let h = lattice.heuristic(cell)?;

            children.push(SearchNode {
                cell,
                step,
                penalty,
                step_penalty,
                num_steps,
                priority: penalty + num_steps as f64 + h,
                parent: Some(self_ix),
            });
        }

        Ok(children)
    }
}

/// The two sequences being aligned together with the weighting strategy scoring each step.
pub struct Lattice<'a, T, W> {
    left: &'a [T],
    right: &'a [T],
    strategy: &'a W,
    weight_scale: f64,
}

impl<'a, T, W> Lattice<'a, T, W> {
    #[inline]
    pub fn left(&self) -> &'a [T] {
        self.left
    }

    #[inline]
    pub fn right(&self) -> &'a [T] {
        self.right
    }

    #[inline]
    pub fn weight_scale(&self) -> f64 {
        self.weight_scale
    }

    #[inline]
    pub fn end(&self) -> LatticeCell {
        LatticeCell::new(self.left.len(), self.right.len())
    }

    #[inline]
    pub fn contains(&self, cell: LatticeCell) -> bool {
        cell.left <= self.left.len() && cell.right <= self.right.len()
    }

    /// Upper bound on the number of distinct lattice cells
    pub fn num_cells(&self) -> usize {
        (self.left.len() + 1).saturating_mul(self.right.len() + 1)
    }
}

impl<'a, T, W> Lattice<'a, T, W>
where
    W: WeightingStrategy<T>,
{
    pub fn new(left: &'a [T], right: &'a [T], strategy: &'a W) -> Result<Self, AlignError> {
        let weight_scale = strategy.weight_scale();
        if !weight_scale.is_finite() || weight_scale <= 0.0 {
            return Err(AlignError::Configuration(
                format!("weight scale must be a positive finite number, got {weight_scale}")
            ));
        }

        Ok(Self { left, right, strategy, weight_scale })
    }

    /// The unique zero-cost starting node
    pub fn anchor(&self) -> Result<SearchNode, AlignError> {
        let h = self.heuristic(LatticeCell::ANCHOR)?;

        Ok(SearchNode {
            cell: LatticeCell::ANCHOR,
            step: Step::Anchor,
            penalty: 0.0,
            step_penalty: 0.0,
            num_steps: 0,
            priority: h,
            parent: None,
        })
    }

    /// Unscaled weighter output for taking `step` from `from`
    fn step_weight(&self, from: LatticeCell, step: Step) -> Result<f64, AlignError> {
        let left_pos = step.consumes_left().then_some(from.left);
        let right_pos = step.consumes_right().then_some(from.right);

        let penalty = self.strategy.weighter(
            left_pos.map(|p| &self.left[p]),
            right_pos.map(|p| &self.right[p]),
        );

        if !penalty.is_finite() || penalty < 0.0 {
            return Err(AlignError::InvalidPenalty { left: left_pos, right: right_pos, penalty });
        }

        Ok(penalty)
    }

    fn heuristic(&self, cell: LatticeCell) -> Result<f64, AlignError> {
        let estimate = self.strategy.admissible_heuristic(cell, self.end());

        if !estimate.is_finite() || estimate < 0.0 {
            return Err(AlignError::InvalidHeuristic { left: cell.left, right: cell.right, estimate });
        }

        Ok(estimate)
    }
}

/// Arena owning every node created during a single search.
///
/// Parent links are stored as [`NodeIx`] values into the arena, such that dominated branches
/// don't need any bookkeeping; all nodes are dropped together with the tree.
#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { nodes: Vec::with_capacity(capacity) }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn get_node(&self, ix: NodeIx) -> &SearchNode {
        &self.nodes[ix.index()]
    }

    pub fn add_node(&mut self, node: SearchNode) -> Result<NodeIx, AlignError> {
        let ix = NodeIx::new(self.nodes.len())
            .ok_or(AlignError::SearchSpaceTooLarge(self.nodes.len()))?;
        self.nodes.push(node);

        Ok(ix)
    }

    /// Nodes from the anchor (exclusive) to `ix` (inclusive), oldest first.
    pub fn path(&self, ix: NodeIx) -> Vec<NodeIx> {
        let mut path = Vec::with_capacity(self.get_node(ix).num_steps());

        let mut curr = Some(ix);
        while let Some(node_ix) = curr {
            let node = self.get_node(node_ix);
            if node.is_anchor() {
                break;
            }

            path.push(node_ix);
            curr = node.parent();
        }

        path.reverse();
        path
    }

    /// Per-step token positions on the path to `ix`.
    pub fn positions(&self, ix: NodeIx) -> Vec<AlignedPair<usize>> {
        self.path(ix).into_iter()
            .map(|node_ix| {
                let node = self.get_node(node_ix);
                let cell = node.cell();

                AlignedPair::new(
                    node.consumed_left().then(|| cell.left - 1),
                    node.consumed_right().then(|| cell.right - 1),
                )
            })
            .collect()
    }

    /// Per-step aligned tokens on the path to `ix`.
    pub fn pairs<'a, T>(&self, ix: NodeIx, left: &'a [T], right: &'a [T]) -> Vec<AlignedPair<&'a T>> {
        self.positions(ix).into_iter()
            .map(|pos| AlignedPair::new(
                pos.left.map(|p| &left[p]),
                pos.right.map(|p| &right[p]),
            ))
            .collect()
    }

    /// Unscaled penalty of each step on the path to `ix`.
    pub fn costs(&self, ix: NodeIx, weight_scale: f64) -> Vec<f64> {
        self.path(ix).into_iter()
            .map(|node_ix| self.get_node(node_ix).step_penalty() / weight_scale)
            .collect()
    }
}
