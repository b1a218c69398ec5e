//! Categorical response tables.
//!
//! A [`ResponseTable`] holds R items (rows) × C occasions (columns) of
//! nominal labels. Every cell is reduced to a canonical string token at
//! construction, so labels of any `Display` type compare consistently:
//! `1_u8`, `"1"` and an enum variant printing as `1` are the same category.
//!
//! Labels are opaque. They are compared for equality only, never ordered
//! or treated as quantities.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Axis, CwsError, Result};

// ---------------------------------------------------------------------------
// Label normalization
// ---------------------------------------------------------------------------

/// How raw labels are mapped to canonical tokens before comparison.
///
/// The default keeps the `Display` form verbatim.
///
/// # Examples
///
/// ```
/// use cws_index::LabelNormalization;
///
/// let exact = LabelNormalization::exact();
/// assert_ne!(exact.canonicalize(" Yes"), exact.canonicalize("yes"));
///
/// let loose = LabelNormalization::exact()
///     .with_trim_whitespace()
///     .with_case_insensitive();
/// assert_eq!(loose.canonicalize(" Yes"), loose.canonicalize("yes"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNormalization {
    /// Strip leading and trailing whitespace.
    pub trim_whitespace: bool,
    /// Compare labels after lowercase folding.
    pub case_insensitive: bool,
}

impl LabelNormalization {
    /// Labels are compared exactly as they print.
    pub fn exact() -> Self {
        Self::default()
    }

    /// Enables whitespace trimming.
    pub fn with_trim_whitespace(mut self) -> Self {
        self.trim_whitespace = true;
        self
    }

    /// Enables case-insensitive comparison.
    pub fn with_case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Returns the canonical token for `value`.
    pub fn canonicalize<T: Display + ?Sized>(&self, value: &T) -> String {
        let raw = value.to_string();
        let label = if self.trim_whitespace {
            raw.trim()
        } else {
            raw.as_str()
        };
        if self.case_insensitive {
            label.to_lowercase()
        } else {
            label.to_owned()
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseTable
// ---------------------------------------------------------------------------

/// An immutable, validated table of categorical responses.
///
/// Construction guarantees a rectangular shape with at least 2 rows and at
/// least 2 occasions, which is exactly what a defined CWS index needs.
///
/// # Examples
///
/// ```
/// use cws_index::ResponseTable;
///
/// let table = ResponseTable::from_rows([["A", "A"], ["A", "B"], ["C", "C"]]).unwrap();
/// assert_eq!(table.rows(), 3);
/// assert_eq!(table.occasions(), 2);
/// assert_eq!(table.row(1).unwrap(), ["A", "B"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    /// Canonical labels, row-major.
    cells: Vec<String>,
    rows: usize,
    occasions: usize,
}

impl ResponseTable {
    /// Builds a table from item rows, comparing labels exactly.
    ///
    /// # Errors
    ///
    /// - [`CwsError::InvalidInputType`] if rows differ in length
    /// - [`CwsError::InsufficientRows`] if there are no rows
    /// - [`CwsError::InsufficientColumns`] if rows have fewer than 2 cells
    /// - [`CwsError::DegenerateBetweenPairs`] if there is exactly one row
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: Display,
    {
        Self::from_rows_with(rows, LabelNormalization::exact())
    }

    /// Builds a table from item rows using the given label normalization.
    ///
    /// # Errors
    ///
    /// Same as [`ResponseTable::from_rows`].
    pub fn from_rows_with<I, R>(rows: I, normalization: LabelNormalization) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: Display,
    {
        let mut cells = Vec::new();
        let mut expected: Option<usize> = None;
        let mut n_rows = 0;

        for (i, row) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(row.into_iter().map(|v| normalization.canonicalize(&v)));
            let found = cells.len() - before;

            match expected {
                None => expected = Some(found),
                Some(width) if width != found => {
                    return Err(reject(CwsError::InvalidInputType {
                        axis: Axis::Row,
                        index: i,
                        expected: width,
                        found,
                    }));
                }
                Some(_) => {}
            }
            n_rows += 1;
        }

        let occasions = expected.unwrap_or(0);
        validate_shape(n_rows, occasions)?;

        Ok(Self {
            cells,
            rows: n_rows,
            occasions,
        })
    }

    /// Builds a table from occasion columns, comparing labels exactly.
    ///
    /// Each inner sequence holds one occasion's responses for every item,
    /// in item order.
    ///
    /// # Errors
    ///
    /// - [`CwsError::InvalidInputType`] if columns differ in length
    ///   (with `axis` set to [`Axis::Column`])
    /// - [`CwsError::InsufficientColumns`] if there are fewer than 2 columns
    /// - [`CwsError::InsufficientRows`] if the columns are empty
    /// - [`CwsError::DegenerateBetweenPairs`] if columns hold a single item
    ///
    /// # Examples
    ///
    /// ```
    /// use cws_index::ResponseTable;
    ///
    /// let time1 = ["A", "A", "B", "D", "C"];
    /// let time2 = ["A", "B", "D", "D", "C"];
    /// let table = ResponseTable::from_columns([time1, time2]).unwrap();
    /// assert_eq!(table.rows(), 5);
    /// assert_eq!(table.row(2).unwrap(), ["B", "D"]);
    /// ```
    pub fn from_columns<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Display,
    {
        Self::from_columns_with(columns, LabelNormalization::exact())
    }

    /// Builds a table from occasion columns using the given label
    /// normalization.
    ///
    /// # Errors
    ///
    /// Same as [`ResponseTable::from_columns`].
    pub fn from_columns_with<I, C>(columns: I, normalization: LabelNormalization) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Display,
    {
        let columns: Vec<Vec<String>> = columns
            .into_iter()
            .map(|col| {
                col.into_iter()
                    .map(|v| normalization.canonicalize(&v))
                    .collect()
            })
            .collect();

        let Some(first) = columns.first() else {
            return Err(reject(CwsError::InsufficientColumns { found: 0 }));
        };
        let n_rows = first.len();
        if let Some((j, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != n_rows) {
            return Err(reject(CwsError::InvalidInputType {
                axis: Axis::Column,
                index: j,
                expected: n_rows,
                found: col.len(),
            }));
        }

        let occasions = columns.len();
        validate_shape(n_rows, occasions)?;

        let mut cells = Vec::with_capacity(n_rows * occasions);
        for i in 0..n_rows {
            cells.extend(columns.iter().map(|col| col[i].clone()));
        }

        Ok(Self {
            cells,
            rows: n_rows,
            occasions,
        })
    }

    /// Number of items (R).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of occasions per item (C).
    pub fn occasions(&self) -> usize {
        self.occasions
    }

    /// Canonical labels of item `index`, or `None` if out of range.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.occasions;
        Some(&self.cells[start..start + self.occasions])
    }

    /// Iterates over item rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.cells.chunks_exact(self.occasions)
    }

    /// All canonical labels, flattened row-major.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Checks the R ≥ 2, C ≥ 2 preconditions in reporting order.
fn validate_shape(rows: usize, occasions: usize) -> Result<()> {
    if rows == 0 {
        return Err(reject(CwsError::InsufficientRows));
    }
    if occasions < 2 {
        return Err(reject(CwsError::InsufficientColumns { found: occasions }));
    }
    if rows == 1 {
        return Err(reject(CwsError::DegenerateBetweenPairs));
    }
    Ok(())
}

fn reject(err: CwsError) -> CwsError {
    debug!(error = %err, "rejecting response table");
    err
}
