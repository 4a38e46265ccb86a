use astar::{Astar, SearchStats};
use config::SearchConfig;
use state::Lattice;
use utils::AlignedPair;
use weighting::WeightingStrategy;
use crate::errors::AlignError;

pub mod astar;
pub mod config;
pub mod state;
pub mod utils;
pub mod visited;
pub mod weighting;

pub trait PairwiseAligner<T> {
    fn align<'a>(&self, left: &'a [T], right: &'a [T]) -> Result<Alignment<'a, T>, AlignError>;
}

/// Aligns pairs of sequences with a fixed weighting strategy and search configuration.
pub struct LatticeAligner<W> {
    strategy: W,
    config: SearchConfig,
}

impl<W> LatticeAligner<W> {
    pub fn new(strategy: W) -> Self {
        Self::with_config(strategy, SearchConfig::default())
    }

    pub fn with_config(strategy: W, config: SearchConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> &W {
        &self.strategy
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Align with a different configuration for a single call, e.g., to label the search span.
    pub fn align_with_config<'a, T>(
        &self,
        left: &'a [T],
        right: &'a [T],
        config: &SearchConfig,
    ) -> Result<Alignment<'a, T>, AlignError>
    where
        W: WeightingStrategy<T>,
    {
        let lattice = Lattice::new(left, right, &self.strategy)?;
        let weight_scale = lattice.weight_scale();
        let result = Astar::new(lattice, config).run()?;

        let end = result.end_node();
        Ok(Alignment {
            left,
            right,
            positions: result.tree.positions(result.end),
            costs: result.tree.costs(result.end, weight_scale),
            scaled_penalty: end.penalty(),
            num_steps: end.num_steps(),
            priority: end.priority(),
            weight_scale,
            stats: result.stats,
        })
    }
}

impl<T, W> PairwiseAligner<T> for LatticeAligner<W>
where
    W: WeightingStrategy<T>,
{
    fn align<'a>(&self, left: &'a [T], right: &'a [T]) -> Result<Alignment<'a, T>, AlignError> {
        self.align_with_config(left, right, &self.config)
    }
}

/// Minimum penalty alignment of two sequences.
///
/// The search tree is discarded once the alignment is constructed; only the winning path is kept.
#[derive(Debug, Clone)]
pub struct Alignment<'a, T> {
    left: &'a [T],
    right: &'a [T],
    positions: Vec<AlignedPair<usize>>,
    costs: Vec<f64>,
    scaled_penalty: f64,
    num_steps: usize,
    priority: f64,
    weight_scale: f64,
    stats: SearchStats,
}

impl<'a, T> Alignment<'a, T> {
    /// Run the search to completion with the default search configuration.
    pub fn new<W>(left: &'a [T], right: &'a [T], strategy: W) -> Result<Self, AlignError>
    where
        W: WeightingStrategy<T>,
    {
        LatticeAligner::new(strategy).align(left, right)
    }

    /// Aligned tokens, one pair per step, from the start of both sequences to the end.
    pub fn pairwise(&self) -> Vec<AlignedPair<&'a T>> {
        self.positions.iter()
            .map(|pos| AlignedPair::new(
                pos.left.map(|p| &self.left[p]),
                pos.right.map(|p| &self.right[p]),
            ))
            .collect()
    }

    /// Aligned token positions, one pair per step.
    pub fn positions(&self) -> &[AlignedPair<usize>] {
        &self.positions
    }

    /// Unscaled penalty of each step.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Total unscaled penalty of the alignment.
    pub fn penalty(&self) -> f64 {
        self.scaled_penalty / self.weight_scale
    }

    /// Synonym for [`Alignment::penalty`].
    pub fn weight(&self) -> f64 {
        self.penalty()
    }

    pub fn weight_scale(&self) -> f64 {
        self.weight_scale
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Priority of the accepted end node, i.e., scaled penalty plus step count.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn left(&self) -> &'a [T] {
        self.left
    }

    pub fn right(&self) -> &'a [T] {
        self.right
    }
}


#[cfg(test)]
mod tests {
    use super::astar::heuristic::Dijkstra;
    use super::config::{SearchConfig, Verbosity};
    use super::utils::AlignedPair;
    use super::weighting::{FnWeighting, Levenshtein, MismatchIndel};
    use super::{Alignment, LatticeAligner, PairwiseAligner};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Reference edit distance by dynamic programming
    fn edit_distance(a: &[char], b: &[char]) -> usize {
        let mut prev: Vec<usize> = (0..=b.len()).collect();
        for (i, ca) in a.iter().enumerate() {
            let mut curr = vec![i + 1; b.len() + 1];
            for (j, cb) in b.iter().enumerate() {
                let sub = prev[j] + usize::from(ca != cb);
                curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
            }
            prev = curr;
        }

        prev[b.len()]
    }

    /// Reference minimum of `scale * penalty + num_steps` over all lattice paths
    fn min_priority(a: &[char], b: &[char], mismatch: f64, indel: f64, scale: f64) -> f64 {
        let mut dp = vec![vec![f64::INFINITY; b.len() + 1]; a.len() + 1];
        dp[0][0] = 0.0;
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                if i > 0 && j > 0 {
                    let w = if a[i - 1] == b[j - 1] { 0.0 } else { mismatch };
                    dp[i][j] = dp[i][j].min(dp[i - 1][j - 1] + scale * w + 1.0);
                }
                if i > 0 {
                    dp[i][j] = dp[i][j].min(dp[i - 1][j] + scale * indel + 1.0);
                }
                if j > 0 {
                    dp[i][j] = dp[i][j].min(dp[i][j - 1] + scale * indel + 1.0);
                }
            }
        }

        dp[a.len()][b.len()]
    }

    /// All strings over `alphabet` up to length `max_len`
    fn all_strings(alphabet: &[char], max_len: usize) -> Vec<Vec<char>> {
        let mut result = vec![vec![]];
        let mut frontier = vec![vec![]];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for prefix in &frontier {
                for c in alphabet {
                    let mut s: Vec<char> = prefix.clone();
                    s.push(*c);
                    next.push(s);
                }
            }
            result.extend(next.iter().cloned());
            frontier = next;
        }

        result
    }

    #[test]
    fn test_deletions() {
        let left = chars("abcde");
        let right = chars("bde");

        let aln = Alignment::new(&left, &right, MismatchIndel::default()).unwrap();
        assert_eq!(aln.penalty(), 2.0);
        assert_eq!(aln.weight(), 2.0);
        assert_eq!(aln.costs(), &[1.0, 0.0, 1.0, 0.0, 0.0]);

        let pairs = aln.pairwise();
        assert_eq!(pairs, vec![
            AlignedPair::new(Some(&'a'), None),
            AlignedPair::new(Some(&'b'), Some(&'b')),
            AlignedPair::new(Some(&'c'), None),
            AlignedPair::new(Some(&'d'), Some(&'d')),
            AlignedPair::new(Some(&'e'), Some(&'e')),
        ]);
    }

    #[test]
    fn test_insertions_and_deletions() {
        let left = chars("abcde");
        let right = chars("aabdef");

        let aln = Alignment::new(&left, &right, MismatchIndel::default()).unwrap();
        assert_eq!(aln.penalty(), 3.0);
        assert_eq!(aln.num_steps(), 7);
        assert_eq!(aln.priority(), 3007.0);
        assert_eq!(aln.costs().iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn test_unit_weighter_matches_edit_distance() {
        let left = chars("abcde");
        let right = chars("bde");

        let aln = Alignment::new(&left, &right, Levenshtein).unwrap();
        assert_eq!(aln.penalty(), 2.0);
        assert_eq!(aln.penalty(), edit_distance(&left, &right) as f64);
    }

    #[test]
    fn test_self_alignment() {
        let seq = chars("the quick brown fox");

        let aln = Alignment::new(&seq, &seq, Levenshtein).unwrap();
        assert_eq!(aln.penalty(), 0.0);
        assert_eq!(aln.num_steps(), seq.len());
        assert!(aln.pairwise().iter().all(|pair| pair.is_match()));
    }

    #[test]
    fn test_empty_sequences() {
        let empty: Vec<char> = vec![];
        let seq = chars("abc");

        let aln = Alignment::new(&empty, &empty, Levenshtein).unwrap();
        assert!(aln.pairwise().is_empty());
        assert!(aln.costs().is_empty());
        assert_eq!(aln.penalty(), 0.0);

        let aln = Alignment::new(&seq, &empty, Levenshtein).unwrap();
        assert_eq!(aln.penalty(), 3.0);
        assert!(aln.pairwise().iter().all(|pair| pair.is_deletion()));

        let aln = Alignment::new(&empty, &seq, Levenshtein).unwrap();
        assert!(aln.pairwise().iter().all(|pair| pair.is_insertion()));
    }

    #[test]
    fn test_prefers_indels_over_expensive_substitution() {
        let left = chars("ab");
        let right = chars("ac");

        // 2.5 > 1 + 1 + 1/1000, so deleting b and inserting c is cheaper
        let aln = Alignment::new(&left, &right, MismatchIndel::new(2.5, 1.0)).unwrap();
        assert_eq!(aln.penalty(), 2.0);
        assert_eq!(aln.num_steps(), 3);

        // Cheaper substitution wins
        let aln = Alignment::new(&left, &right, MismatchIndel::new(1.5, 1.0)).unwrap();
        assert_eq!(aln.penalty(), 1.5);
        assert_eq!(aln.num_steps(), 2);
    }

    #[test]
    fn test_levenshtein_equivalence_exhaustive() {
        let strings = all_strings(&['a', 'b', 'c'], 4);

        for a in &strings {
            for b in &strings {
                let aln = Alignment::new(a, b, Levenshtein).unwrap();
                assert_eq!(aln.penalty(), edit_distance(a, b) as f64, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_optimality_and_coverage_exhaustive() {
        let strings = all_strings(&['a', 'b'], 4);
        let aligner = LatticeAligner::new(MismatchIndel::with_scale(1.5, 1.0, 4.0));
        let dijkstra = LatticeAligner::new(Dijkstra(MismatchIndel::with_scale(1.5, 1.0, 4.0)));

        for a in &strings {
            for b in &strings {
                let aln = aligner.align(a, b).unwrap();
                let expected = min_priority(a, b, 1.5, 1.0, 4.0);
                assert!((aln.priority() - expected).abs() < 1e-9, "{a:?} vs {b:?}");
                assert!((aln.priority() - dijkstra.align(a, b).unwrap().priority()).abs() < 1e-9);

                // Every token is consumed exactly once, in order
                let lefts: Vec<usize> = aln.positions().iter().filter_map(|p| p.left).collect();
                let rights: Vec<usize> = aln.positions().iter().filter_map(|p| p.right).collect();
                assert_eq!(lefts, (0..a.len()).collect::<Vec<_>>());
                assert_eq!(rights, (0..b.len()).collect::<Vec<_>>());
                assert!(aln.positions().iter().all(|p| p.left.is_some() || p.right.is_some()));
                assert_eq!(aln.costs().len(), aln.num_steps());
            }
        }
    }

    #[test]
    fn test_custom_strategy_and_config() {
        let left = vec![1, 2, 3, 4];
        let right = vec![1, 3, 4, 5];

        let strategy = FnWeighting::<i32>::builder()
            .weighter(|l, r| match (l, r) {
                (Some(l), Some(r)) => (l - r).abs() as f64,
                _ => 2.0,
            })
            .weight_scale(100.0)
            .build()
            .unwrap();

        let config = SearchConfig::new()
            .with_verbosity(Verbosity::Summary)
            .with_label("ints");
        let aligner = LatticeAligner::with_config(strategy, config);
        let aln = aligner.align(&left[..], &right[..]).unwrap();

        // Substituting each token by its neighbour (1+1+1) beats deleting 2 and inserting 5 (2+2)
        assert_eq!(aln.penalty(), 3.0);
        assert_eq!(aln.weight_scale(), 100.0);
        assert_eq!(aln.num_steps(), 4);
        assert!(aln.stats().num_visited > 0);
    }

    #[test]
    fn test_invalid_weight_scale() {
        let left = chars("a");
        let result = Alignment::new(&left, &left, MismatchIndel::with_scale(1.0, 1.0, 0.0));

        assert!(matches!(result, Err(crate::errors::AlignError::Configuration(_))));
    }
}
