use rustc_hash::FxHashMap;

use crate::aligner::state::LatticeCell;

/// Lowest priority recorded for each lattice cell expanded so far.
///
/// Only lives for the duration of a single search.
#[derive(Debug, Default)]
pub struct BestCostTable {
    best: FxHashMap<LatticeCell, f64>,
}

impl BestCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut best = FxHashMap::default();
        best.reserve(capacity);

        Self { best }
    }

    #[inline]
    pub fn get(&self, cell: LatticeCell) -> Option<f64> {
        self.best.get(&cell).copied()
    }

    /// True if a path with equal or lower priority to `cell` was already recorded
    #[inline]
    pub fn is_dominated(&self, cell: LatticeCell, priority: f64) -> bool {
        self.get(cell)
            .is_some_and(|best| best <= priority)
    }

    /// True unless a path with strictly lower priority to `cell` was already recorded
    #[inline]
    pub fn can_improve(&self, cell: LatticeCell, priority: f64) -> bool {
        self.get(cell)
            .map_or(true, |best| best >= priority)
    }

    #[inline]
    pub fn record(&mut self, cell: LatticeCell, priority: f64) {
        self.best.insert(cell, priority);
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
