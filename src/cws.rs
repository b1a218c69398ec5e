//! Cochran-Weiss-Shanteau (CWS) index.
//!
//! The CWS index rates a judge (or instrument) by how well it tells items
//! apart relative to how inconsistently it rates the same item:
//!
//! ```text
//! inconsistency  = 1 − within_observed / within_possible
//! discrimination = (between_possible − between_observed) / between_possible
//! CWS            = discrimination / inconsistency
//! ```
//!
//! Both sub-indices lie in [0, 1]. A perfectly consistent judge has
//! inconsistency 0 and an index of `f64::INFINITY`, which is a defined
//! outcome, not an error.
//!
//! Each ratio is formed from exact integer counts and rounded once, so the
//! result is bit-for-bit independent of row order, column order and label
//! insertion order.
//!
//! # References
//!
//! - Weiss, D.J. & Shanteau, J. (2003). "Empirical Assessment of Expertise",
//!   *Human Factors* 45(1), pp. 104-116.
//! - Cochran, W.G. (1943). "The comparison of different scales of
//!   measurement for experimental results", *Annals of Mathematical
//!   Statistics* 14(3), pp. 205-216.

use std::fmt;
use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::pairs::PairCounts;
use crate::table::ResponseTable;

/// Full CWS breakdown for one response table.
///
/// Serializing a perfectly consistent result with `serde_json` writes the
/// infinite `cws` field as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CwsIndex {
    /// Pair statistics the indices are derived from.
    pub counts: PairCounts,
    /// Fraction of same-item pairs that disagree, in [0, 1]. Lower is more
    /// consistent.
    pub inconsistency: f64,
    /// Fraction of different-item pairs that disagree, in [0, 1]. Higher
    /// means items are better distinguished.
    pub discrimination: f64,
    /// `discrimination / inconsistency`, or `f64::INFINITY` when
    /// inconsistency is zero. Never NaN.
    pub cws: f64,
}

impl CwsIndex {
    /// Derives the indices from pair statistics.
    ///
    /// Counts are checked with [`PairCounts::validate`] first, so
    /// hand-assembled counts can never yield NaN.
    ///
    /// # Errors
    ///
    /// Any [`CwsError`](crate::CwsError) raised by [`PairCounts::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cws_index::{CwsError, CwsIndex, PairCounts, ResponseTable};
    ///
    /// let table = ResponseTable::from_rows([["a", "a"], ["b", "c"]]).unwrap();
    /// let counts = PairCounts::from_table(&table);
    /// assert!(CwsIndex::from_counts(counts).is_ok());
    ///
    /// let single_item = PairCounts {
    ///     total_responses: 2,
    ///     total_possible_pairs: 1,
    ///     within_possible_pairs: 1,
    ///     between_possible_pairs: 0,
    ///     ..counts
    /// };
    /// assert_eq!(
    ///     CwsIndex::from_counts(single_item),
    ///     Err(CwsError::DegenerateBetweenPairs)
    /// );
    /// ```
    pub fn from_counts(counts: PairCounts) -> Result<Self> {
        counts.validate()?;
        Ok(Self::from_valid_counts(counts))
    }

    /// Counts from a [`ResponseTable`] need no further checks.
    fn from_valid_counts(counts: PairCounts) -> Self {
        let within_nonmatches = counts.within_nonmatches();
        let between_nonmatches = counts.between_nonmatches();

        let inconsistency = ratio(within_nonmatches, counts.within_possible_pairs);
        let discrimination = ratio(between_nonmatches, counts.between_possible_pairs);

        let cws = if within_nonmatches == 0 {
            f64::INFINITY
        } else {
            let num = u128::from(between_nonmatches) * u128::from(counts.within_possible_pairs);
            let den = u128::from(counts.between_possible_pairs) * u128::from(within_nonmatches);
            num as f64 / den as f64
        };

        Self {
            counts,
            inconsistency,
            discrimination,
            cws,
        }
    }

    /// Whether every item received the same label on every occasion.
    pub fn is_perfectly_consistent(&self) -> bool {
        self.counts.within_nonmatches() == 0
    }
}

impl Display for CwsIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CWS = {:.4} (discrimination {:.4}, inconsistency {:.4})",
            self.cws, self.discrimination, self.inconsistency
        )
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    num as f64 / den as f64
}

/// Computes the full CWS breakdown for a validated table.
///
/// # Examples
///
/// ```
/// use cws_index::{cws_report, ResponseTable};
///
/// let table = ResponseTable::from_columns([
///     ["A", "A", "B", "D", "C"],
///     ["A", "B", "D", "D", "C"],
/// ])
/// .unwrap();
///
/// let report = cws_report(&table);
/// assert_eq!(report.counts.within_observed_matches, 3);
/// assert!((report.inconsistency - 0.4).abs() < 1e-12);
/// assert!((report.discrimination - 0.875).abs() < 1e-12);
/// assert!((report.cws - 2.1875).abs() < 1e-12);
/// ```
#[instrument(skip_all, fields(rows = table.rows(), occasions = table.occasions()))]
pub fn cws_report(table: &ResponseTable) -> CwsIndex {
    let counts = PairCounts::from_table(table);
    debug!(
        within_possible = counts.within_possible_pairs,
        within_observed = counts.within_observed_matches,
        between_possible = counts.between_possible_pairs,
        between_observed = counts.between_observed_matches,
        "counted matching pairs"
    );

    let index = CwsIndex::from_valid_counts(counts);
    if index.is_perfectly_consistent() {
        debug!("perfect within-item consistency, CWS is infinite");
    }
    index
}

/// Computes the CWS index of a validated table.
///
/// Returns `f64::INFINITY` when every item is rated identically on every
/// occasion.
///
/// # Examples
///
/// ```
/// use cws_index::{cws_index, ResponseTable};
///
/// let consistent = ResponseTable::from_rows([["x", "x"], ["y", "y"]]).unwrap();
/// assert_eq!(cws_index(&consistent), f64::INFINITY);
/// ```
pub fn cws_index(table: &ResponseTable) -> f64 {
    cws_report(table).cws
}

/// Validates item rows and computes their CWS index in one step.
///
/// Labels are compared exactly by their `Display` form.
///
/// # Errors
///
/// Any [`CwsError`](crate::CwsError) raised by
/// [`ResponseTable::from_rows`].
///
/// # Examples
///
/// ```
/// use cws_index::{cws_index_of_rows, CwsError};
///
/// let cws = cws_index_of_rows([[1, 1, 2], [2, 2, 2], [3, 1, 3]]).unwrap();
/// assert!((cws - 11.0 / 6.0).abs() < 1e-12);
///
/// assert_eq!(
///     cws_index_of_rows([["a", "b"]]),
///     Err(CwsError::DegenerateBetweenPairs)
/// );
/// ```
pub fn cws_index_of_rows<I, R>(rows: I) -> Result<f64>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: Display,
{
    let table = ResponseTable::from_rows(rows)?;
    Ok(cws_index(&table))
}

/// Validates occasion columns and computes their CWS index in one step.
///
/// # Errors
///
/// Any [`CwsError`](crate::CwsError) raised by
/// [`ResponseTable::from_columns`].
pub fn cws_index_of_columns<I, C>(columns: I) -> Result<f64>
where
    I: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Display,
{
    let table = ResponseTable::from_columns(columns)?;
    Ok(cws_index(&table))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn label_table() -> impl Strategy<Value = Vec<Vec<u8>>> {
        (2usize..12, 2usize..6).prop_flat_map(|(r, c)| {
            proptest::collection::vec(proptest::collection::vec(0u8..6, c..=c), r..=r)
        })
    }

    fn cws_of(rows: &[Vec<u8>]) -> CwsIndex {
        cws_report(&ResponseTable::from_rows(rows).unwrap())
    }

    proptest! {
        #[test]
        fn sub_indices_bounded(rows in label_table()) {
            let r = cws_of(&rows);
            prop_assert!((0.0..=1.0).contains(&r.inconsistency), "inconsistency = {}", r.inconsistency);
            prop_assert!((0.0..=1.0).contains(&r.discrimination), "discrimination = {}", r.discrimination);
            prop_assert!(!r.cws.is_nan());
            prop_assert!(r.cws >= 0.0);
        }

        #[test]
        fn row_permutation_invariant(
            (rows, permuted) in label_table().prop_flat_map(|rows| {
                (Just(rows.clone()), Just(rows).prop_shuffle())
            })
        ) {
            prop_assert_eq!(cws_of(&rows).cws.to_bits(), cws_of(&permuted).cws.to_bits());
        }

        #[test]
        fn column_permutation_invariant(
            (rows, order) in label_table().prop_flat_map(|rows| {
                let c = rows[0].len();
                (Just(rows), Just((0..c).collect::<Vec<usize>>()).prop_shuffle())
            })
        ) {
            let permuted: Vec<Vec<u8>> = rows
                .iter()
                .map(|row| order.iter().map(|&j| row[j]).collect())
                .collect();
            prop_assert_eq!(cws_of(&rows).cws.to_bits(), cws_of(&permuted).cws.to_bits());
        }

        #[test]
        fn from_counts_agrees_with_report(rows in label_table()) {
            let table = ResponseTable::from_rows(&rows).unwrap();
            let report = cws_report(&table);
            prop_assert_eq!(CwsIndex::from_counts(report.counts), Ok(report));
        }

        #[test]
        fn infinite_iff_perfectly_consistent(rows in label_table()) {
            let r = cws_of(&rows);
            let consistent = rows.iter().all(|row| row.iter().all(|v| *v == row[0]));
            prop_assert_eq!(r.cws.is_infinite(), consistent);
        }

        #[test]
        fn relabeling_invariant(rows in label_table()) {
            // Any injective relabeling preserves every match.
            let relabeled: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.iter().map(|v| format!("cat-{}", 5 - v)).collect())
                .collect();
            let table = ResponseTable::from_rows(&relabeled).unwrap();
            prop_assert_eq!(cws_of(&rows).cws.to_bits(), cws_index(&table).to_bits());
        }
    }
}
