use std::fmt;

use crate::aligner::astar::heuristic::remaining_length_difference;
use crate::aligner::state::LatticeCell;
use crate::errors::AlignError;

/// Multiplier applied to weighter output unless a strategy overrides it
pub const DEFAULT_WEIGHT_SCALE: f64 = 1000.0;

/// Scores the steps of an alignment.
///
/// The weighter is called with exactly one of three patterns: `(Some, Some)` for a diagonal
/// step, `(Some, None)` for a left-only step (deletion) and `(None, Some)` for a right-only step
/// (insertion). Every step additionally costs one unit of step count, so callers who prefer an
/// insertion and deletion over a substitution need
/// `weighter(l, r) > weighter(l, None) + weighter(None, r) + 1 / weight_scale`.
pub trait WeightingStrategy<T> {
    /// Non-negative penalty of a single step
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64;

    /// Lower bound on the remaining scaled penalty plus step count from `cell` to `end`.
    ///
    /// Must never overestimate, otherwise the returned alignment is not guaranteed to be optimal.
    fn admissible_heuristic(&self, cell: LatticeCell, end: LatticeCell) -> f64 {
        remaining_length_difference(cell, end)
    }

    fn weight_scale(&self) -> f64 {
        DEFAULT_WEIGHT_SCALE
    }
}

impl<T, W> WeightingStrategy<T> for &W
where
    W: WeightingStrategy<T> + ?Sized,
{
    #[inline(always)]
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64 {
        (**self).weighter(left, right)
    }

    #[inline(always)]
    fn admissible_heuristic(&self, cell: LatticeCell, end: LatticeCell) -> f64 {
        (**self).admissible_heuristic(cell, end)
    }

    #[inline(always)]
    fn weight_scale(&self) -> f64 {
        (**self).weight_scale()
    }
}

/// Unit costs for mismatches and indels, free matches. The total penalty equals the edit
/// distance between both sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Levenshtein;

impl<T> WeightingStrategy<T> for Levenshtein
where
    T: PartialEq,
{
    #[inline]
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64 {
        match (left, right) {
            (Some(l), Some(r)) if l == r => 0.0,
            _ => 1.0,
        }
    }
}

/// Free matches with separate penalties for mismatches and indels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MismatchIndel {
    mismatch: f64,
    indel: f64,
    scale: f64,
}

impl MismatchIndel {
    pub fn new(mismatch: f64, indel: f64) -> Self {
        Self::with_scale(mismatch, indel, DEFAULT_WEIGHT_SCALE)
    }

    pub fn with_scale(mismatch: f64, indel: f64, scale: f64) -> Self {
        Self { mismatch, indel, scale }
    }

    #[inline(always)]
    pub fn mismatch(&self) -> f64 {
        self.mismatch
    }

    #[inline(always)]
    pub fn indel(&self) -> f64 {
        self.indel
    }

    /// True if an insertion plus a deletion is preferred over a single mismatch
    pub fn prefers_indels(&self) -> bool {
        self.mismatch > 2.0 * self.indel + 1.0 / self.scale
    }
}

impl Default for MismatchIndel {
    fn default() -> Self {
        Self::new(1.5, 1.0)
    }
}

impl<T> WeightingStrategy<T> for MismatchIndel
where
    T: PartialEq,
{
    #[inline]
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64 {
        match (left, right) {
            (Some(l), Some(r)) => if l == r { 0.0 } else { self.mismatch },
            _ => self.indel,
        }
    }

    #[inline(always)]
    fn weight_scale(&self) -> f64 {
        self.scale
    }
}

type WeighterFn<T> = Box<dyn Fn(Option<&T>, Option<&T>) -> f64>;
type HeuristicFn = Box<dyn Fn(LatticeCell, LatticeCell) -> f64>;

/// Weighting strategy assembled from closures, see [`FnWeighting::builder`].
pub struct FnWeighting<T> {
    weighter: WeighterFn<T>,
    heuristic: Option<HeuristicFn>,
    scale: f64,
}

impl<T> FnWeighting<T> {
    pub fn builder() -> FnWeightingBuilder<T> {
        FnWeightingBuilder::default()
    }
}

impl<T> WeightingStrategy<T> for FnWeighting<T> {
    #[inline]
    fn weighter(&self, left: Option<&T>, right: Option<&T>) -> f64 {
        (self.weighter)(left, right)
    }

    #[inline]
    fn admissible_heuristic(&self, cell: LatticeCell, end: LatticeCell) -> f64 {
        match self.heuristic {
            Some(ref h) => h(cell, end),
            None => remaining_length_difference(cell, end),
        }
    }

    #[inline]
    fn weight_scale(&self) -> f64 {
        self.scale
    }
}

impl<T> fmt::Debug for FnWeighting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnWeighting")
            .field("custom_heuristic", &self.heuristic.is_some())
            .field("scale", &self.scale)
            .finish()
    }
}

pub struct FnWeightingBuilder<T> {
    weighter: Option<WeighterFn<T>>,
    heuristic: Option<HeuristicFn>,
    scale: f64,
}

impl<T> Default for FnWeightingBuilder<T> {
    fn default() -> Self {
        Self {
            weighter: None,
            heuristic: None,
            scale: DEFAULT_WEIGHT_SCALE,
        }
    }
}

impl<T> FnWeightingBuilder<T> {
    pub fn weighter<F>(mut self, weighter: F) -> Self
    where
        F: Fn(Option<&T>, Option<&T>) -> f64 + 'static,
    {
        self.weighter = Some(Box::new(weighter));
        self
    }

    pub fn heuristic<F>(mut self, heuristic: F) -> Self
    where
        F: Fn(LatticeCell, LatticeCell) -> f64 + 'static,
    {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    pub fn weight_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(self) -> Result<FnWeighting<T>, AlignError> {
        let weighter = self.weighter.ok_or(AlignError::MissingWeighter)?;

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(AlignError::Configuration(
                format!("weight scale must be a positive finite number, got {}", self.scale)
            ));
        }

        Ok(FnWeighting {
            weighter,
            heuristic: self.heuristic,
            scale: self.scale,
        })
    }
}
