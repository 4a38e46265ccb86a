use crate::aligner::state::LatticeCell;
use crate::aligner::weighting::WeightingStrategy;

/// Default admissible heuristic: the absolute difference between the number of tokens remaining
/// on each side.
///
/// Every remaining path takes at least that many single-sided steps, each costing one unit of
/// step count, assuming the remaining tokens otherwise all match at zero penalty.
#[inline]
pub fn remaining_length_difference(cell: LatticeCell, end: LatticeCell) -> f64 {
    let (remaining_left, remaining_right) = cell.remaining(end);

    remaining_left.abs_diff(remaining_right) as f64
}

/// Wraps a weighting strategy and replaces its heuristic with 0, such that
/// A* reduces to standard Dijkstra's algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra<W>(pub W);

impl<T, W> WeightingStrategy<T> for Dijkstra<W>
where
    W: WeightingStrategy<T>,
{
    #[inline(always)]
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64 {
        self.0.weighter(left, right)
    }

    #[inline(always)]
    fn admissible_heuristic(&self, _: LatticeCell, _: LatticeCell) -> f64 {
        0.0
    }

    #[inline(always)]
    fn weight_scale(&self) -> f64 {
        self.0.weight_scale()
    }
}
