//! Merge many sorted timestamp sequences into one timeline.
//!
//! Sequences are merged pairwise in rounds: each round pairs neighbours
//! (0 with 1, 2 with 3, ...) and carries an odd one over unchanged. This
//! is the same balanced tree a recursive halving would build, so the work
//! stays O(N log K) for N timestamps across K sequences, but the depth is
//! a loop counter rather than a call stack.

use super::validate_strictly_increasing;
use crate::utils::error::ValidationError;
use log::debug;

/// Merge two strictly increasing sequences, collapsing shared timestamps
///
/// **Public** - building block of [`merge_all`]
///
/// Each input is already free of duplicates, so a repeat can only show up
/// as equal heads; comparing against the last emitted value is enough.
pub fn merge_two(a: &[i64], b: &[i64]) -> Vec<i64> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        let next = if j == b.len() || (i < a.len() && a[i] < b[j]) {
            i += 1;
            a[i - 1]
        } else {
            j += 1;
            b[j - 1]
        };

        if merged.last() != Some(&next) {
            merged.push(next);
        }
    }

    merged
}

/// Merge any number of strictly increasing sequences
///
/// **Public** - main entry point for timeline construction
///
/// # Arguments
/// * `sequences` - each sorted ascending with no internal duplicates
///
/// # Returns
/// The deduplicated, strictly increasing union. An empty list yields an
/// empty timeline; a single sequence is returned unchanged.
pub fn merge_all(sequences: Vec<Vec<i64>>) -> Vec<i64> {
    let input_count = sequences.len();
    let mut round = sequences;
    let mut rounds = 0;

    while round.len() > 1 {
        let mut next = Vec::with_capacity(round.len().div_ceil(2));
        let mut iter = round.into_iter();

        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(merge_two(&left, &right)),
                None => next.push(left),
            }
        }

        round = next;
        rounds += 1;
    }

    let timeline = round.pop().unwrap_or_default();

    debug!(
        "Merged {} sequences into {} timestamps in {} rounds",
        input_count,
        timeline.len(),
        rounds
    );

    timeline
}

/// Validate every sequence, then merge them
///
/// **Public** - use when the input has not been through normalization
///
/// # Errors
/// * `ValidationError::UnsortedTimestamps` - a sequence goes backwards
/// * `ValidationError::DuplicateTimestamp` - a sequence repeats a timestamp
pub fn merge_all_checked(sequences: Vec<Vec<i64>>) -> Result<Vec<i64>, ValidationError> {
    for (index, sequence) in sequences.iter().enumerate() {
        validate_strictly_increasing(sequence.iter().copied(), &format!("sequence {}", index))?;
    }
    Ok(merge_all(sequences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_two_interleaved() {
        assert_eq!(merge_two(&[1, 4, 6], &[2, 4, 7]), vec![1, 2, 4, 6, 7]);
    }

    #[test]
    fn test_merge_two_one_side_empty() {
        assert_eq!(merge_two(&[], &[3, 5]), vec![3, 5]);
        assert_eq!(merge_two(&[3, 5], &[]), vec![3, 5]);
        assert!(merge_two(&[], &[]).is_empty());
    }

    #[test]
    fn test_merge_all_empty() {
        assert!(merge_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_all_single_unchanged() {
        assert_eq!(merge_all(vec![vec![5, 9, 12]]), vec![5, 9, 12]);
    }

    #[test]
    fn test_merge_all_odd_count() {
        let merged = merge_all(vec![vec![1, 5], vec![2, 5], vec![3], vec![1, 4], vec![6]]);
        assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_merge_all_with_empty_members() {
        let merged = merge_all(vec![vec![], vec![2, 3], vec![]]);
        assert_eq!(merged, vec![2, 3]);
    }

    #[test]
    fn test_merge_all_checked_rejects_unsorted() {
        let err = merge_all_checked(vec![vec![1, 2], vec![5, 3]]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsortedTimestamps {
                context: "sequence 1".to_string(),
                index: 1,
                previous: 5,
                current: 3,
            }
        );
    }

    #[test]
    fn test_merge_all_checked_rejects_duplicates() {
        let err = merge_all_checked(vec![vec![1, 1]]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateTimestamp { timestamp: 1, .. }));
    }
}
