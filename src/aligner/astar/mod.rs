use serde::Serialize;
use tracing::{debug, info_span, trace};

use crate::aligner::config::SearchConfig;
use crate::aligner::state::{Lattice, NodeIx, SearchNode, SearchTree};
use crate::aligner::visited::BestCostTable;
use crate::aligner::weighting::WeightingStrategy;
use crate::errors::AlignError;
use queue::AstarQueue;

pub mod heuristic;
pub mod queue;

/// Counters collected while searching
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes pushed onto the queue, including the anchor
    pub num_queued: usize,

    /// Nodes popped from the queue and expanded (or accepted)
    pub num_visited: usize,

    /// Nodes popped from the queue but discarded, because a path with equal or lower
    /// priority to the same cell was already visited
    pub num_pruned: usize,

    /// Children never queued, because a path with lower priority to the same cell was known
    pub num_skipped: usize,
}

pub struct AstarResult {
    /// Arena holding every node created during the search
    pub tree: SearchTree,

    /// The accepted node at the end of both sequences
    pub end: NodeIx,

    pub stats: SearchStats,
}

impl AstarResult {
    pub fn end_node(&self) -> &SearchNode {
        self.tree.get_node(self.end)
    }
}

/// Best-first search from the anchor to the end of both sequences
pub(crate) struct Astar<'a, 'c, T, W> {
    lattice: Lattice<'a, T, W>,
    config: &'c SearchConfig,
    tree: SearchTree,
    best: BestCostTable,
    queue: AstarQueue<NodeIx>,
    stats: SearchStats,
}

impl<'a, 'c, T, W> Astar<'a, 'c, T, W>
where
    W: WeightingStrategy<T>,
{
    pub fn new(lattice: Lattice<'a, T, W>, config: &'c SearchConfig) -> Self {
        // Rough guess: a band around the main diagonal gets explored
        let left_len = lattice.left().len();
        let right_len = lattice.right().len();
        let capacity = (left_len + right_len + 1)
            .saturating_mul(4)
            .min(lattice.num_cells());

        Self {
            lattice,
            config,
            tree: SearchTree::with_capacity(capacity),
            best: BestCostTable::with_capacity(capacity),
            queue: AstarQueue::with_capacity(capacity),
            stats: SearchStats::default(),
        }
    }

    pub fn run(mut self) -> Result<AstarResult, AlignError> {
        let span = info_span!(
            "astar_run",
            seq_id = self.config.label.as_deref(),
            left_len = self.lattice.left().len(),
            right_len = self.lattice.right().len()
        );
        let _enter = span.enter();

        let anchor = self.lattice.anchor()?;
        self.queue_node(anchor)?;

        let end = loop {
            let Some((priority, node_ix)) = self.queue.pop() else {
                debug!(visited = self.stats.num_visited, "Empty queue before reaching end!");
                return Err(AlignError::SearchExhausted { visited: self.stats.num_visited });
            };

            let node = self.tree.get_node(node_ix);
            let cell = node.cell();

            if self.best.is_dominated(cell, priority) {
                self.stats.num_pruned += 1;
                continue;
            }

            self.best.record(cell, priority);
            self.stats.num_visited += 1;

            if self.config.log_nodes() {
                trace!(
                    target: "lattice_align::aligner::astar::set_visited",
                    lidx = cell.lidx(),
                    ridx = cell.ridx(),
                    steps = node.num_steps(),
                    penalty = node.penalty(),
                    priority = priority
                );
            }

            if node.is_finished(&self.lattice) {
                break node_ix;
            }

            for child in node.grow(node_ix, &self.lattice)? {
                if !self.best.can_improve(child.cell(), child.priority()) {
                    self.stats.num_skipped += 1;
                    continue;
                }

                self.queue_node(child)?;
            }
        };

        let end_node = self.tree.get_node(end);
        if self.config.log_summary() {
            debug!(
                penalty = end_node.penalty() / self.lattice.weight_scale(),
                steps = end_node.num_steps(),
                queued = self.stats.num_queued,
                visited = self.stats.num_visited,
                pruned = self.stats.num_pruned,
                skipped = self.stats.num_skipped,
                "END"
            );
        }

        Ok(AstarResult {
            tree: self.tree,
            end,
            stats: self.stats,
        })
    }

    fn queue_node(&mut self, node: SearchNode) -> Result<(), AlignError> {
        let priority = node.priority();

        if self.config.log_nodes() {
            let cell = node.cell();
            trace!(
                target: "lattice_align::aligner::astar::queue_item",
                lidx = cell.lidx(),
                ridx = cell.ridx(),
                steps = node.num_steps(),
                penalty = node.penalty(),
                priority = priority
            );
        }

        let node_ix = self.tree.add_node(node)?;
        self.queue.queue(node_ix, priority);
        self.stats.num_queued += 1;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::Astar;
    use crate::aligner::config::{SearchConfig, Verbosity};
    use crate::aligner::state::{Lattice, LatticeCell};
    use crate::aligner::weighting::{FnWeighting, Levenshtein};
    use crate::errors::AlignError;

    #[test]
    fn test_astar_run() {
        let left = b"abcde";
        let right = b"bde";
        let lattice = Lattice::new(&left[..], &right[..], &Levenshtein).unwrap();
        let config = SearchConfig::new().with_verbosity(Verbosity::Nodes);

        let result = Astar::new(lattice, &config).run().unwrap();
        let end = result.end_node();

        assert_eq!(end.cell(), LatticeCell::new(5, 3));
        assert_eq!(end.penalty(), 2000.0);
        assert_eq!(end.num_steps(), 5);
        assert_eq!(end.priority(), 2005.0);

        let stats = result.stats;
        assert!(stats.num_visited <= 6 * 4);
        assert!(stats.num_queued >= stats.num_visited);
        assert_eq!(result.tree.num_nodes(), stats.num_queued);
    }

    #[test]
    fn test_empty_sequences() {
        let left: [u8; 0] = [];
        let right = b"xy";
        let config = SearchConfig::default();

        let lattice = Lattice::new(&left[..], &left[..], &Levenshtein).unwrap();
        let result = Astar::new(lattice, &config).run().unwrap();
        assert!(result.end_node().is_anchor());
        assert_eq!(result.stats.num_visited, 1);

        let lattice = Lattice::new(&left[..], &right[..], &Levenshtein).unwrap();
        let result = Astar::new(lattice, &config).run().unwrap();
        assert_eq!(result.end_node().penalty(), 2000.0);
        assert_eq!(result.tree.path(result.end).len(), 2);
    }

    #[test]
    fn test_invalid_penalty() {
        let left = b"ab";
        let right = b"ac";
        let strategy = FnWeighting::<u8>::builder()
            .weighter(|l, r| if l.is_some() && r.is_some() { 0.0 } else { -1.0 })
            .build()
            .unwrap();

        let lattice = Lattice::new(&left[..], &right[..], &strategy).unwrap();
        let result = Astar::new(lattice, &SearchConfig::default()).run();

        assert!(matches!(result, Err(AlignError::InvalidPenalty { left: Some(0), right: None, .. })));
    }

    #[test]
    fn test_invalid_heuristic() {
        let left = b"ab";
        let right = b"ac";
        let strategy = FnWeighting::<u8>::builder()
            .weighter(|_, _| 1.0)
            .heuristic(|_, _| f64::NAN)
            .build()
            .unwrap();

        let lattice = Lattice::new(&left[..], &right[..], &strategy).unwrap();
        let result = Astar::new(lattice, &SearchConfig::default()).run();

        assert!(matches!(result, Err(AlignError::InvalidHeuristic { left: 0, right: 0, .. })));
    }
}
