//! Matching-pair counting.
//!
//! A "matching pair" is an unordered pair of responses carrying the same
//! label. Rather than enumerate pairs, each distinct label with frequency
//! `n` contributes `C(n, 2)` matches, so a table of N cells is counted in
//! O(N) time.
//!
//! All quantities are exact integers. Frequency tables are hash maps, and
//! because the per-label contributions are summed with integer addition the
//! result does not depend on iteration order.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::error::{CwsError, Result};
use crate::table::ResponseTable;

/// Counts occurrences of each distinct value.
///
/// # Examples
///
/// ```
/// use cws_index::frequency_counts;
///
/// let freq = frequency_counts(["A", "B", "A", "C", "A"]);
/// assert_eq!(freq["A"], 3);
/// assert_eq!(freq["B"], 1);
/// assert_eq!(freq.len(), 3);
/// ```
pub fn frequency_counts<I>(values: I) -> HashMap<I::Item, u64>
where
    I: IntoIterator,
    I::Item: Eq + Hash,
{
    let mut freq = HashMap::new();
    for v in values {
        *freq.entry(v).or_insert(0) += 1;
    }
    freq
}

/// Number of unordered pairs among `n` items: C(n, 2) = n(n-1)/2.
///
/// Returns 0 for `n < 2`. The halving is applied to the even factor first,
/// so no intermediate product exceeds the result.
///
/// # Examples
///
/// ```
/// use cws_index::count_pairs;
///
/// assert_eq!(count_pairs(0), 0);
/// assert_eq!(count_pairs(1), 0);
/// assert_eq!(count_pairs(5), 10);
/// ```
pub fn count_pairs(n: u64) -> u64 {
    if n < 2 {
        0
    } else if n % 2 == 0 {
        (n / 2) * (n - 1)
    } else {
        n * ((n - 1) / 2)
    }
}

/// Total matching pairs implied by a frequency table: Σ C(countᵢ, 2).
///
/// # Examples
///
/// ```
/// use cws_index::{frequency_counts, sum_pairs_across_frequencies};
///
/// // A×3, B×2 → 3 + 1 matching pairs
/// let freq = frequency_counts(["A", "A", "B", "A", "B"]);
/// assert_eq!(sum_pairs_across_frequencies(&freq), 4);
/// ```
pub fn sum_pairs_across_frequencies<K>(freq: &HashMap<K, u64>) -> u64 {
    freq.values().map(|&n| count_pairs(n)).sum()
}

/// Pair statistics of a response table.
///
/// With R items and C occasions:
///
/// ```text
/// total_responses        = R·C
/// total_possible_pairs   = C(R·C, 2)
/// within_possible_pairs  = R·C(C, 2)
/// between_possible_pairs = total_possible_pairs − within_possible_pairs
/// within_observed        = Σ_rows Σ_labels C(n_row,label, 2)
/// total_observed         = Σ_labels C(n_label, 2)
/// between_observed       = total_observed − within_observed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairCounts {
    /// Number of cells, R·C.
    pub total_responses: u64,
    /// Unordered pairs among all cells.
    pub total_possible_pairs: u64,
    /// Pairs whose two cells belong to the same item.
    pub within_possible_pairs: u64,
    /// Pairs whose two cells belong to different items.
    pub between_possible_pairs: u64,
    /// Same-item pairs with identical labels.
    pub within_observed_matches: u64,
    /// Pairs with identical labels, ignoring table structure.
    pub total_observed_matches: u64,
    /// Different-item pairs with identical labels.
    pub between_observed_matches: u64,
}

impl PairCounts {
    /// Counts possible and observed matching pairs for `table`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cws_index::{PairCounts, ResponseTable};
    ///
    /// let table = ResponseTable::from_rows([["A", "A"], ["A", "B"]]).unwrap();
    /// let counts = PairCounts::from_table(&table);
    /// assert_eq!(counts.total_possible_pairs, 6);
    /// assert_eq!(counts.within_possible_pairs, 2);
    /// assert_eq!(counts.within_observed_matches, 1);
    /// assert_eq!(counts.total_observed_matches, 3);
    /// assert_eq!(counts.between_observed_matches, 2);
    /// ```
    pub fn from_table(table: &ResponseTable) -> Self {
        let rows = table.rows() as u64;
        let occasions = table.occasions() as u64;

        let total_responses = rows * occasions;
        let total_possible_pairs = count_pairs(total_responses);
        let within_possible_pairs = rows * count_pairs(occasions);
        let between_possible_pairs = total_possible_pairs - within_possible_pairs;

        let within_observed_matches = table
            .iter_rows()
            .map(|row| sum_pairs_across_frequencies(&frequency_counts(row)))
            .sum::<u64>();
        let total_observed_matches =
            sum_pairs_across_frequencies(&frequency_counts(table.cells()));
        let between_observed_matches = total_observed_matches - within_observed_matches;

        Self {
            total_responses,
            total_possible_pairs,
            within_possible_pairs,
            between_possible_pairs,
            within_observed_matches,
            total_observed_matches,
            between_observed_matches,
        }
    }

    /// Checks that these counts could have come from a computable table.
    ///
    /// Counts from [`PairCounts::from_table`] always pass. Hand-assembled
    /// counts are rejected when either sub-index would be undefined or
    /// when an observed count exceeds what is possible.
    ///
    /// # Errors
    ///
    /// - [`CwsError::InsufficientRows`] if there are no responses
    /// - [`CwsError::InsufficientColumns`] if there are no within-item pairs
    /// - [`CwsError::DegenerateBetweenPairs`] if there are no between-item pairs
    /// - [`CwsError::InconsistentCounts`] if the totals do not add up or an
    ///   observed count exceeds its possible count
    pub fn validate(&self) -> Result<()> {
        if self.total_responses == 0 {
            return Err(CwsError::InsufficientRows);
        }
        if self.within_possible_pairs == 0 {
            // R ≥ 1 with no within-item pairs means a single occasion.
            return Err(CwsError::InsufficientColumns { found: 1 });
        }
        if self.between_possible_pairs == 0 {
            return Err(CwsError::DegenerateBetweenPairs);
        }

        let checks = [
            (
                "possible pairs",
                self.within_possible_pairs.checked_add(self.between_possible_pairs),
                self.total_possible_pairs,
            ),
            (
                "observed matches",
                self.within_observed_matches.checked_add(self.between_observed_matches),
                self.total_observed_matches,
            ),
        ];
        for (what, parts, total) in checks {
            if parts != Some(total) {
                return Err(CwsError::InconsistentCounts {
                    what,
                    observed: parts.unwrap_or(u64::MAX),
                    possible: total,
                });
            }
        }

        if self.within_observed_matches > self.within_possible_pairs {
            return Err(CwsError::InconsistentCounts {
                what: "within-item matches",
                observed: self.within_observed_matches,
                possible: self.within_possible_pairs,
            });
        }
        if self.between_observed_matches > self.between_possible_pairs {
            return Err(CwsError::InconsistentCounts {
                what: "between-item matches",
                observed: self.between_observed_matches,
                possible: self.between_possible_pairs,
            });
        }
        Ok(())
    }

    /// Same-item pairs whose labels differ.
    ///
    /// Zero if the observed count exceeds the possible count, which
    /// [`PairCounts::validate`] rejects.
    pub fn within_nonmatches(&self) -> u64 {
        self.within_possible_pairs
            .saturating_sub(self.within_observed_matches)
    }

    /// Different-item pairs whose labels differ.
    ///
    /// Zero if the observed count exceeds the possible count, which
    /// [`PairCounts::validate`] rejects.
    pub fn between_nonmatches(&self) -> u64 {
        self.between_possible_pairs
            .saturating_sub(self.between_observed_matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Building blocks
    // -----------------------------------------------------------------------

    #[test]
    fn count_pairs_matches_binomial() {
        let expected = [0, 0, 1, 3, 6, 10, 15, 21, 28, 36, 45];
        for (n, &e) in expected.iter().enumerate() {
            assert_eq!(count_pairs(n as u64), e, "C({n}, 2)");
        }
    }

    #[test]
    fn count_pairs_large_n_does_not_overflow() {
        // n(n-1) would overflow u64 here; C(n, 2) itself does not.
        let n = 1u64 << 32;
        assert_eq!(count_pairs(n), (1u64 << 31) * (n - 1));
        assert_eq!(count_pairs(n + 1), (n + 1) * (1u64 << 31));
    }

    #[test]
    fn frequency_counts_empty() {
        let freq = frequency_counts(Vec::<&str>::new());
        assert!(freq.is_empty());
        assert_eq!(sum_pairs_across_frequencies(&freq), 0);
    }

    #[test]
    fn frequency_counts_is_order_independent() {
        let a = frequency_counts(["x", "y", "x", "z", "y", "x"]);
        let b = frequency_counts(["z", "x", "y", "x", "x", "y"]);
        assert_eq!(a, b);
    }

    #[test]
    fn all_distinct_has_no_matches() {
        let freq = frequency_counts(1..=20);
        assert_eq!(sum_pairs_across_frequencies(&freq), 0);
    }

    #[test]
    fn all_identical_matches_every_pair() {
        let freq = frequency_counts(std::iter::repeat("k").take(7));
        assert_eq!(sum_pairs_across_frequencies(&freq), count_pairs(7));
    }

    // -----------------------------------------------------------------------
    // PairCounts
    // -----------------------------------------------------------------------

    /// Worked example, R = 5, C = 2.
    ///
    /// Rows: (A,A) (A,B) (B,D) (D,D) (C,C) → 3 within matches.
    /// Flattened: A×3, B×2, C×2, D×3 → 3 + 1 + 1 + 3 = 8 matches.
    #[test]
    fn worked_example_counts() {
        let table = ResponseTable::from_columns([
            ["A", "A", "B", "D", "C"],
            ["A", "B", "D", "D", "C"],
        ])
        .unwrap();
        let c = PairCounts::from_table(&table);

        assert_eq!(c.total_responses, 10);
        assert_eq!(c.total_possible_pairs, 45);
        assert_eq!(c.within_possible_pairs, 5);
        assert_eq!(c.between_possible_pairs, 40);
        assert_eq!(c.within_observed_matches, 3);
        assert_eq!(c.total_observed_matches, 8);
        assert_eq!(c.between_observed_matches, 5);
        assert_eq!(c.within_nonmatches(), 2);
        assert_eq!(c.between_nonmatches(), 35);
    }

    #[test]
    fn three_occasion_counts() {
        let table = ResponseTable::from_rows([[1, 1, 2], [2, 2, 2], [3, 1, 3]]).unwrap();
        let c = PairCounts::from_table(&table);

        assert_eq!(c.total_responses, 9);
        assert_eq!(c.total_possible_pairs, 36);
        assert_eq!(c.within_possible_pairs, 9);
        assert_eq!(c.between_possible_pairs, 27);
        // 1 + 3 + 1
        assert_eq!(c.within_observed_matches, 5);
        // 1×3, 2×4, 3×2 → 3 + 6 + 1
        assert_eq!(c.total_observed_matches, 10);
        assert_eq!(c.between_observed_matches, 5);
    }

    #[test]
    fn table_counts_always_validate() {
        let table = ResponseTable::from_rows([["a", "b", "a"], ["c", "a", "c"]]).unwrap();
        assert_eq!(PairCounts::from_table(&table).validate(), Ok(()));
    }

    fn worked_counts() -> PairCounts {
        PairCounts {
            total_responses: 10,
            total_possible_pairs: 45,
            within_possible_pairs: 5,
            between_possible_pairs: 40,
            within_observed_matches: 3,
            total_observed_matches: 8,
            between_observed_matches: 5,
        }
    }

    #[test]
    fn validate_rejects_missing_between_pairs() {
        // R = 1, C = 2: one pair, all of it within the item.
        let counts = PairCounts {
            total_responses: 2,
            total_possible_pairs: 1,
            within_possible_pairs: 1,
            between_possible_pairs: 0,
            within_observed_matches: 0,
            total_observed_matches: 0,
            between_observed_matches: 0,
        };
        assert_eq!(counts.validate(), Err(CwsError::DegenerateBetweenPairs));
    }

    #[test]
    fn validate_rejects_empty_and_single_occasion() {
        let empty = PairCounts {
            total_responses: 0,
            total_possible_pairs: 0,
            within_possible_pairs: 0,
            between_possible_pairs: 0,
            within_observed_matches: 0,
            total_observed_matches: 0,
            between_observed_matches: 0,
        };
        assert_eq!(empty.validate(), Err(CwsError::InsufficientRows));

        // R = 3, C = 1
        let single = PairCounts {
            total_responses: 3,
            total_possible_pairs: 3,
            between_possible_pairs: 3,
            ..empty
        };
        assert_eq!(
            single.validate(),
            Err(CwsError::InsufficientColumns { found: 1 })
        );
    }

    #[test]
    fn validate_rejects_observed_above_possible() {
        let counts = PairCounts {
            within_observed_matches: 6,
            between_observed_matches: 2,
            ..worked_counts()
        };
        assert_eq!(
            counts.validate(),
            Err(CwsError::InconsistentCounts {
                what: "within-item matches",
                observed: 6,
                possible: 5
            })
        );
        // No panic on the subtraction either.
        assert_eq!(counts.within_nonmatches(), 0);
    }

    #[test]
    fn validate_rejects_totals_that_do_not_add_up() {
        let counts = PairCounts {
            total_observed_matches: 9,
            ..worked_counts()
        };
        assert!(matches!(
            counts.validate(),
            Err(CwsError::InconsistentCounts {
                what: "observed matches",
                ..
            })
        ));
        assert_eq!(worked_counts().validate(), Ok(()));
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let table = ResponseTable::from_rows([["A", "A"], ["B", "B"]]).unwrap();
        let json = serde_json::to_value(PairCounts::from_table(&table)).unwrap();
        assert_eq!(json["within_possible_pairs"], 2);
        assert_eq!(json["within_observed_matches"], 2);
        assert_eq!(json["between_observed_matches"], 0);
    }
}
