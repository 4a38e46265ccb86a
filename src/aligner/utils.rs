use itertools::Itertools;
use serde::Serialize;

/// An aligned pair of tokens (or token positions). The first element comes from the left
/// sequence, the second from the right sequence.
///
/// In case of an insertion or deletion, one of the elements is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignedPair<T> {
    pub left: Option<T>,
    pub right: Option<T>,
}

impl<T> AlignedPair<T> {
    pub fn new(left: Option<T>, right: Option<T>) -> Self {
        AlignedPair { left, right }
    }

    pub fn is_aligned(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn is_indel(&self) -> bool {
        !self.is_aligned()
    }

    /// Only a left token was consumed
    pub fn is_deletion(&self) -> bool {
        self.left.is_some() && self.right.is_none()
    }

    /// Only a right token was consumed
    pub fn is_insertion(&self) -> bool {
        self.left.is_none() && self.right.is_some()
    }
}

impl<T> AlignedPair<&T>
where
    T: PartialEq,
{
    pub fn is_match(&self) -> bool {
        matches!((self.left, self.right), (Some(l), Some(r)) if l == r)
    }

    pub fn is_mismatch(&self) -> bool {
        self.is_aligned() && !self.is_match()
    }
}

/// Render an alignment as three rows: left tokens, a match line (`|` for matches, `*` for
/// mismatches), and right tokens. Gaps are shown as `-`.
///
/// Tokens are rendered with `render` and padded to equal column widths.
pub fn print_alignment<T, F>(aln: &[AlignedPair<&T>], render: F) -> String
where
    T: PartialEq,
    F: Fn(&T) -> String,
{
    let mut left_row = String::with_capacity(aln.len());
    let mut aln_row = String::with_capacity(aln.len());
    let mut right_row = String::with_capacity(aln.len());

    for pair in aln {
        let left = pair.left.map(&render).unwrap_or_else(|| "-".to_string());
        let right = pair.right.map(&render).unwrap_or_else(|| "-".to_string());
        let width = left.chars().count().max(right.chars().count());

        let marker = if pair.is_match() {
            '|'
        } else if pair.is_mismatch() {
            '*'
        } else {
            ' '
        };

        left_row.push_str(&format!("{left:<width$}"));
        aln_row.extend(std::iter::repeat(marker).take(width));
        right_row.push_str(&format!("{right:<width$}"));
    }

    [left_row, aln_row, right_row].iter()
        .map(|row| row.trim_end())
        .join("\n")
}

/// Render an alignment as a line oriented diff: matching tokens are prefixed with ` `, tokens
/// only present in the left sequence with `-` and tokens only present in the right sequence
/// with `+`. Substituted tokens are shown as a `-` line followed by a `+` line.
pub fn print_diff<T, F>(aln: &[AlignedPair<&T>], render: F) -> String
where
    T: PartialEq,
    F: Fn(&T) -> String,
{
    aln.iter()
        .flat_map(|pair| {
            if pair.is_match() {
                let token = pair.left.map(&render).unwrap_or_default();
                vec![format!(" {token}")]
            } else {
                pair.left.map(|l| format!("-{}", render(l))).into_iter()
                    .chain(pair.right.map(|r| format!("+{}", render(r))))
                    .collect()
            }
        })
        .join("\n")
}


#[cfg(test)]
mod tests {
    use super::{print_alignment, print_diff, AlignedPair};

    #[test]
    fn test_pair_kinds() {
        let a = b'a';
        let b = b'b';

        let matched = AlignedPair::new(Some(&a), Some(&a));
        assert!(matched.is_aligned());
        assert!(matched.is_match());
        assert!(!matched.is_mismatch());

        let mismatched = AlignedPair::new(Some(&a), Some(&b));
        assert!(mismatched.is_mismatch());

        let deletion = AlignedPair::new(Some(&a), None);
        assert!(deletion.is_indel());
        assert!(deletion.is_deletion());
        assert!(!deletion.is_insertion());
        assert!(!deletion.is_match());

        let insertion: AlignedPair<&u8> = AlignedPair::new(None, Some(&b));
        assert!(insertion.is_insertion());
    }

    #[test]
    fn test_print_alignment() {
        let left = b"abcde";
        let right = b"bxe";

        let aln = vec![
            AlignedPair::new(Some(&left[0]), None),
            AlignedPair::new(Some(&left[1]), Some(&right[0])),
            AlignedPair::new(Some(&left[2]), None),
            AlignedPair::new(Some(&left[3]), Some(&right[1])),
            AlignedPair::new(Some(&left[4]), Some(&right[2])),
        ];

        let printed = print_alignment(&aln, |c| char::from(*c).to_string());
        assert_eq!(printed, "abcde\n | *|\n-b-xe");
    }

    #[test]
    fn test_print_alignment_wide_tokens() {
        let left = ["foo", "x"];
        let right = ["foo", "yy"];

        let aln = vec![
            AlignedPair::new(Some(&left[0]), Some(&right[0])),
            AlignedPair::new(Some(&left[1]), Some(&right[1])),
        ];

        let printed = print_alignment(&aln, |s| s.to_string());
        assert_eq!(printed, "foox\n|||**\nfooyy");
    }

    #[test]
    fn test_print_diff() {
        let left = ["fn main() {", "    old();", "}"];
        let right = ["fn main() {", "    new();", "    more();", "}"];

        let aln = vec![
            AlignedPair::new(Some(&left[0]), Some(&right[0])),
            AlignedPair::new(Some(&left[1]), Some(&right[1])),
            AlignedPair::new(None, Some(&right[2])),
            AlignedPair::new(Some(&left[2]), Some(&right[3])),
        ];

        let printed = print_diff(&aln, |s| s.to_string());
        assert_eq!(printed, " fn main() {\n-    old();\n+    new();\n+    more();\n }");
    }
}
