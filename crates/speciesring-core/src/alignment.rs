//! Pairwise sequence comparison.
//!
//! This module provides the distance metrics and alignment helpers used to
//! compare every species against the reference:
//!
//! - [`edit_distance`] - Levenshtein distance (substitution, insertion and
//!   deletion each cost 1)
//! - [`hamming_distance`] - position-wise mismatch count of equal-length
//!   sequences
//! - [`edit_script`] - a minimal sequence of [`EditOp`]s turning one sequence
//!   into another
//! - [`difference_mask`] - per-character [`Mask`] over the *other* sequence
//!   flagging residues that differ from the reference
//!
//! Sequences are compared per `char`. No alphabet is enforced here; see
//! [`crate::record::validate_sequence`] for the check applied to fetched data.
//!
//! # Tie-breaking
//!
//! When several minimal edit scripts exist, [`edit_script`] backtracks from
//! the bottom-right cell of the dynamic-programming table and prefers, among
//! predecessors of equal cost: match, then substitute, then delete, then
//! insert. The same inputs therefore always produce the same script and mask.

use std::{fmt, str::FromStr};

use crate::CoreError;

/// Kind of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Replace the source character with the destination character.
    Substitute,
    /// Insert the destination character.
    Insert,
    /// Remove the source character.
    Delete,
}

/// One step of an edit script turning a reference into another sequence.
///
/// Positions follow the usual editops convention: `source_pos` indexes the
/// reference and `dest_pos` indexes the other sequence. For an insertion,
/// `source_pos` is the reference position the new character is inserted
/// before; for a deletion, `dest_pos` is the position in the other sequence
/// the deletion happens before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditOp {
    kind: EditKind,
    source_pos: usize,
    dest_pos: usize,
}

impl EditOp {
    pub fn new(kind: EditKind, source_pos: usize, dest_pos: usize) -> Self {
        Self {
            kind,
            source_pos,
            dest_pos,
        }
    }

    pub fn kind(self) -> EditKind {
        self.kind
    }

    pub fn source_pos(self) -> usize {
        self.source_pos
    }

    pub fn dest_pos(self) -> usize {
        self.dest_pos
    }

    /// Returns true when this operation produces a character in the
    /// destination sequence.
    pub fn touches_destination(self) -> bool {
        matches!(self.kind, EditKind::Substitute | EditKind::Insert)
    }
}

/// Per-position difference flags over a sequence.
///
/// Displays as a string of `0` (same) and `1` (differs) characters, one per
/// character of the sequence it was derived for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    flags: Vec<bool>,
}

impl Mask {
    /// Creates an all-clear mask of the given length.
    pub fn clear(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns whether the character at `position` differs.
    ///
    /// Out-of-range positions report no difference.
    pub fn differs(&self, position: usize) -> bool {
        self.flags.get(position).copied().unwrap_or(false)
    }

    /// Number of flagged positions.
    pub fn count_differences(&self) -> usize {
        self.flags.iter().filter(|flag| **flag).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Walks `sequence` alongside the mask, passing each flagged character
    /// to `wrap` and copying the others verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use speciesring_core::alignment::difference_mask;
    ///
    /// let mask = difference_mask("ACGT", "ACGA");
    /// let marked = mask.highlight("ACGA", |c| format!("[{c}]"));
    /// assert_eq!(marked, "ACG[A]");
    /// ```
    pub fn highlight<F>(&self, sequence: &str, wrap: F) -> String
    where
        F: FnMut(char) -> String,
    {
        self.highlight_with(sequence, |c| c.to_string(), wrap)
    }

    /// Like [`Mask::highlight`], but unflagged characters go through `plain`
    /// instead of being copied, so callers can escape them.
    pub fn highlight_with<P, F>(&self, sequence: &str, mut plain: P, mut wrap: F) -> String
    where
        P: FnMut(char) -> String,
        F: FnMut(char) -> String,
    {
        let mut out = String::with_capacity(sequence.len());
        for (c, flag) in sequence.chars().zip(self.flags.iter()) {
            if *flag {
                out.push_str(&wrap(c));
            } else {
                out.push_str(&plain(c));
            }
        }
        out
    }

    fn set(&mut self, position: usize) {
        if let Some(flag) = self.flags.get_mut(position) {
            *flag = true;
        }
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in &self.flags {
            f.write_str(if *flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Mask {
    type Err = CoreError;

    /// Parses the `0`/`1` form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(idx, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CoreError::invalid_input(
                    "mask",
                    format!("unexpected character `{other}` at position {idx}"),
                )),
            })
            .collect::<Result<Vec<bool>, _>>()
            .map(|flags| Self { flags })
    }
}

/// Levenshtein distance between `a` and `b`.
///
/// Runs in O(n·m) time with two rows of memory.
///
/// # Examples
///
/// ```
/// use speciesring_core::alignment::edit_distance;
///
/// assert_eq!(edit_distance("kitten", "sitting"), 3);
/// assert_eq!(edit_distance("", "ACGT"), 4);
/// ```
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Number of positions at which `a` and `b` differ.
///
/// # Errors
///
/// Returns [`CoreError::LengthMismatch`] carrying both lengths when the
/// sequences do not have the same number of characters.
///
/// # Examples
///
/// ```
/// use speciesring_core::alignment::hamming_distance;
///
/// assert_eq!(hamming_distance("GATTACA", "GACTATA").unwrap(), 2);
/// assert!(hamming_distance("AAA", "AA").is_err());
/// ```
pub fn hamming_distance(a: &str, b: &str) -> Result<usize, CoreError> {
    let left = a.chars().count();
    let right = b.chars().count();
    if left != right {
        return Err(CoreError::LengthMismatch { left, right });
    }

    Ok(a.chars().zip(b.chars()).filter(|(x, y)| x != y).count())
}

/// Full dynamic-programming table of prefix edit distances.
struct DistanceTable {
    cells: Vec<usize>,
    width: usize,
}

impl DistanceTable {
    fn build(reference: &[char], other: &[char]) -> Self {
        let width = other.len() + 1;
        let mut cells = vec![0; (reference.len() + 1) * width];

        for (j, cell) in cells.iter_mut().enumerate().take(width) {
            *cell = j;
        }
        for i in 1..=reference.len() {
            cells[i * width] = i;
            for j in 1..=other.len() {
                let cost = usize::from(reference[i - 1] != other[j - 1]);
                let diagonal = cells[(i - 1) * width + j - 1] + cost;
                let up = cells[(i - 1) * width + j] + 1;
                let left = cells[i * width + j - 1] + 1;
                cells[i * width + j] = diagonal.min(up).min(left);
            }
        }

        Self { cells, width }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }
}

/// Minimal edit script turning `reference` into `other`.
///
/// Matches are omitted; the operations are returned in forward order. The
/// number of operations equals [`edit_distance`] of the two inputs. See the
/// [module documentation](self) for the tie-breaking order.
///
/// # Examples
///
/// ```
/// use speciesring_core::alignment::{edit_script, EditKind};
///
/// let ops = edit_script("ACGT", "ACGTA");
/// assert_eq!(ops.len(), 1);
/// assert_eq!(ops[0].kind(), EditKind::Insert);
/// assert_eq!(ops[0].dest_pos(), 4);
/// ```
pub fn edit_script(reference: &str, other: &str) -> Vec<EditOp> {
    let reference: Vec<char> = reference.chars().collect();
    let other: Vec<char> = other.chars().collect();
    let table = DistanceTable::build(&reference, &other);

    let mut ops = Vec::with_capacity(table.get(reference.len(), other.len()));
    let (mut i, mut j) = (reference.len(), other.len());

    while i > 0 || j > 0 {
        let current = table.get(i, j);

        if i > 0 && j > 0 {
            let diagonal = table.get(i - 1, j - 1);
            if reference[i - 1] == other[j - 1] && current == diagonal {
                i -= 1;
                j -= 1;
                continue;
            }
            if current == diagonal + 1 {
                ops.push(EditOp::new(EditKind::Substitute, i - 1, j - 1));
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && current == table.get(i - 1, j) + 1 {
            ops.push(EditOp::new(EditKind::Delete, i - 1, j));
            i -= 1;
            continue;
        }
        // Only an insertion can remain; the table guarantees it is optimal.
        ops.push(EditOp::new(EditKind::Insert, i, j - 1));
        j -= 1;
    }

    ops.reverse();
    ops
}

/// Flags the characters of `other` that differ from `reference` under an
/// optimal alignment.
///
/// The mask always has one flag per character of `other`. Substitutions and
/// insertions mark their destination position; deletions only remove
/// reference characters and leave no mark.
///
/// # Examples
///
/// ```
/// use speciesring_core::alignment::difference_mask;
///
/// assert_eq!(difference_mask("ACGT", "ACGA").to_string(), "0001");
/// assert_eq!(difference_mask("ACGT", "ACGTA").to_string(), "00001");
/// assert_eq!(difference_mask("ACGT", "AGT").len(), 3);
/// ```
pub fn difference_mask(reference: &str, other: &str) -> Mask {
    let mut mask = Mask::clear(other.chars().count());
    for op in edit_script(reference, other) {
        if op.touches_destination() {
            mask.set(op.dest_pos());
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_scenarios() {
        assert_eq!(hamming_distance("AAA", "AAA").unwrap(), 0);
        assert_eq!(hamming_distance("AAA", "AAT").unwrap(), 1);
        assert_eq!(hamming_distance("GATTACA", "GACTATA").unwrap(), 2);
        assert_eq!(hamming_distance("", "").unwrap(), 0);
    }

    #[test]
    fn test_hamming_length_mismatch() {
        let err = hamming_distance("ACGT", "AC").unwrap_err();
        assert_eq!(err, CoreError::LengthMismatch { left: 4, right: 2 });
    }

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("ACGT", ""), 4);
        assert_eq!(edit_distance("", "ACGT"), 4);
        assert_eq!(edit_distance("ACGT", "ACGT"), 0);
        assert_eq!(edit_distance("ACGT", "ACGA"), 1);
        assert_eq!(edit_distance("ACGT", "AGT"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("αβγ", "αβδ"), 1);
        assert_eq!(hamming_distance("αβγ", "αβδ").unwrap(), 1);
    }

    #[test]
    fn test_mask_substitution_at_end() {
        assert_eq!(difference_mask("ACGT", "ACGA").to_string(), "0001");
    }

    #[test]
    fn test_mask_substitution_at_start() {
        let mask = difference_mask("ACGT", "TCGT");
        assert_eq!(mask.len(), 4);
        assert_eq!(mask.to_string(), "1000");
    }

    #[test]
    fn test_mask_trailing_insertion() {
        assert_eq!(difference_mask("ACGT", "ACGTA").to_string(), "00001");
    }

    #[test]
    fn test_mask_deletion_leaves_no_mark() {
        let mask = difference_mask("ACGT", "AGT");
        assert_eq!(mask.len(), 3);
        assert_eq!(mask.to_string(), "000");
    }

    #[test]
    fn test_mask_against_empty_reference_flags_everything() {
        assert_eq!(difference_mask("", "ACG").to_string(), "111");
        assert!(difference_mask("ACG", "").is_empty());
    }

    #[test]
    fn test_mask_is_deterministic() {
        let first = difference_mask("GATTACA", "GCATGCU");
        for _ in 0..10 {
            assert_eq!(difference_mask("GATTACA", "GCATGCU"), first);
        }
    }

    #[test]
    fn test_mask_accessors() {
        let mask = difference_mask("ACGT", "TCGA");
        assert!(mask.differs(0));
        assert!(!mask.differs(1));
        assert!(mask.differs(3));
        assert!(!mask.differs(99));
        assert_eq!(mask.count_differences(), 2);
        assert_eq!(mask.flags(), &[true, false, false, true]);
    }

    #[test]
    fn test_edit_script_operations() {
        let ops = edit_script("ACGT", "ACGA");
        assert_eq!(ops, vec![EditOp::new(EditKind::Substitute, 3, 3)]);

        let ops = edit_script("ACGT", "AGT");
        assert_eq!(ops, vec![EditOp::new(EditKind::Delete, 1, 1)]);

        let ops = edit_script("ACGT", "ACGTA");
        assert_eq!(ops, vec![EditOp::new(EditKind::Insert, 4, 4)]);
    }

    #[test]
    fn test_edit_script_is_forward_ordered() {
        let ops = edit_script("ACGT", "TCGA");
        let positions: Vec<usize> = ops.iter().map(|op| op.dest_pos()).collect();
        assert_eq!(positions, vec![0, 3]);
    }

    #[test]
    fn test_highlight_wraps_flagged_characters() {
        let mask = difference_mask("ACGT", "TCGA");
        let html = mask.highlight("TCGA", |c| format!("<b>{c}</b>"));
        assert_eq!(html, "<b>T</b>CG<b>A</b>");
    }

    #[test]
    fn test_mask_parses_display_form() {
        let mask: Mask = "0110".parse().unwrap();
        assert_eq!(mask.flags(), &[false, true, true, false]);
        assert_eq!(mask.to_string(), "0110");

        assert!("01x".parse::<Mask>().is_err());
        assert!("".parse::<Mask>().unwrap().is_empty());
    }

    #[test]
    fn test_highlight_with_maps_plain_characters() {
        let mask = difference_mask("AB", "A<");
        let out = mask.highlight_with(
            "A<",
            |c| if c == '<' { "&lt;".to_string() } else { c.to_string() },
            |c| format!("[{c}]"),
        );
        assert_eq!(out, "A[<]");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn sequence_strategy() -> impl Strategy<Value = String> {
        "[ACGT]{0,24}"
    }

    fn equal_length_pair() -> impl Strategy<Value = (String, String)> {
        (0usize..24).prop_flat_map(|len| {
            (
                prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T']), len),
                prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T']), len),
            )
                .prop_map(|(a, b)| -> (String, String) {
                    (a.into_iter().collect(), b.into_iter().collect())
                })
        })
    }

    /// Hamming distance is the count of differing positions and symmetric.
    fn check_hamming_counts_and_symmetry(a: &str, b: &str) -> Result<(), TestCaseError> {
        let expected = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();

        prop_assert_eq!(hamming_distance(a, b).unwrap(), expected);
        prop_assert_eq!(hamming_distance(b, a).unwrap(), expected);
        Ok(())
    }

    /// Edit distance is symmetric and zero on identical input.
    fn check_edit_distance_symmetry(a: &str, b: &str) -> Result<(), TestCaseError> {
        prop_assert_eq!(edit_distance(a, b), edit_distance(b, a));
        prop_assert_eq!(edit_distance(a, a), 0);
        Ok(())
    }

    /// The edit script is minimal.
    fn check_script_length_is_distance(a: &str, b: &str) -> Result<(), TestCaseError> {
        prop_assert_eq!(edit_script(a, b).len(), edit_distance(a, b));
        Ok(())
    }

    /// The mask is sized to the other sequence regardless of the reference.
    fn check_mask_length(a: &str, b: &str) -> Result<(), TestCaseError> {
        prop_assert_eq!(difference_mask(a, b).len(), b.chars().count());
        Ok(())
    }

    /// A sequence compared with itself has no differences.
    fn check_self_mask_is_clear(a: &str) -> Result<(), TestCaseError> {
        let mask = difference_mask(a, a);

        prop_assert_eq!(mask.len(), a.chars().count());
        prop_assert_eq!(mask.count_differences(), 0);
        Ok(())
    }

    /// Every flagged position is paid for by an edit operation.
    fn check_mask_bounded_by_distance(a: &str, b: &str) -> Result<(), TestCaseError> {
        prop_assert!(difference_mask(a, b).count_differences() <= edit_distance(a, b));
        Ok(())
    }

    proptest! {
        #[test]
        fn hamming_counts_and_symmetry((a, b) in equal_length_pair()) {
            check_hamming_counts_and_symmetry(&a, &b)?;
        }

        #[test]
        fn edit_distance_symmetry(a in sequence_strategy(), b in sequence_strategy()) {
            check_edit_distance_symmetry(&a, &b)?;
        }

        #[test]
        fn script_length_is_distance(a in sequence_strategy(), b in sequence_strategy()) {
            check_script_length_is_distance(&a, &b)?;
        }

        #[test]
        fn mask_length(a in sequence_strategy(), b in sequence_strategy()) {
            check_mask_length(&a, &b)?;
        }

        #[test]
        fn self_mask_is_clear(a in sequence_strategy()) {
            check_self_mask_is_clear(&a)?;
        }

        #[test]
        fn mask_bounded_by_distance(a in sequence_strategy(), b in sequence_strategy()) {
            check_mask_bounded_by_distance(&a, &b)?;
        }
    }
}
