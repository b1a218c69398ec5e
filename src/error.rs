//! Error types for CWS index computation.
//!
//! Every precondition is checked when a [`ResponseTable`](crate::ResponseTable)
//! is built, so no counting ever starts on input that cannot yield a
//! defined index. Hand-assembled [`PairCounts`](crate::PairCounts) are
//! checked again by [`CwsIndex::from_counts`](crate::CwsIndex::from_counts).

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CwsError>;

/// Which side of the input a ragged sequence was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// An item row (row-major input).
    Row,
    /// An occasion column (occasion-major input).
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Reasons a response table cannot produce a CWS index.
///
/// Note that a perfectly consistent table is *not* an error: its index is
/// `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CwsError {
    /// The input is not rectangular: sequence `index` along `axis` has
    /// `found` cells where `expected` were required.
    #[error("input is not a rectangular table: {axis} {index} has {found} cells, expected {expected}")]
    InvalidInputType {
        axis: Axis,
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The table has no items.
    #[error("table has no rows: at least two items are required")]
    InsufficientRows,

    /// Fewer than two occasions, so no within-item pair exists.
    #[error("table has {found} occasion column(s): at least 2 are required")]
    InsufficientColumns { found: usize },

    /// Exactly one item, so there are no between-item pairs and the
    /// discrimination index is undefined.
    #[error("table has a single row: between-item pairs are undefined")]
    DegenerateBetweenPairs,

    /// Pair counts that no response table could produce.
    #[error("inconsistent pair counts: {what} ({observed} observed, {possible} possible)")]
    InconsistentCounts {
        what: &'static str,
        observed: u64,
        possible: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_violation() {
        let e = CwsError::InvalidInputType {
            axis: Axis::Row,
            index: 3,
            expected: 2,
            found: 1,
        };
        assert_eq!(
            e.to_string(),
            "input is not a rectangular table: row 3 has 1 cells, expected 2"
        );
        assert!(CwsError::InsufficientColumns { found: 1 }
            .to_string()
            .contains("1 occasion column"));
        assert!(CwsError::DegenerateBetweenPairs
            .to_string()
            .contains("single row"));
    }

    #[test]
    fn ragged_column_message_names_the_column() {
        let e = CwsError::InvalidInputType {
            axis: Axis::Column,
            index: 1,
            expected: 3,
            found: 2,
        };
        assert_eq!(
            e.to_string(),
            "input is not a rectangular table: column 1 has 2 cells, expected 3"
        );
    }
}
