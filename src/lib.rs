#![forbid(unsafe_code)]
//! # cws-index
//!
//! The Cochran-Weiss-Shanteau (CWS) index for categorical response tables.
//!
//! A response table has one row per item and one column per measurement
//! occasion. The CWS index divides how well responses *discriminate*
//! between items by how *inconsistent* they are for the same item, both
//! measured as fractions of non-matching response pairs.
//!
//! ```
//! use cws_index::{cws_report, ResponseTable};
//!
//! let time1 = ["A", "A", "B", "D", "C"];
//! let time2 = ["A", "B", "D", "D", "C"];
//! let table = ResponseTable::from_columns([time1, time2]).unwrap();
//!
//! let report = cws_report(&table);
//! assert_eq!(report.cws, 2.1875);
//! ```
//!
//! ## Modules
//!
//! - [`table`] — Validated categorical tables and label normalization
//! - [`pairs`] — Frequency tables and matching-pair counts
//! - [`cws`] — Inconsistency, discrimination and the CWS ratio
//! - [`error`] — Precondition failures
//!
//! ## Conventions
//!
//! - **Errors**: fallible constructors return [`Result`] with a [`CwsError`].
//! - **Logging**: `tracing` events at `debug` level; no subscriber is installed.
//! - **Exactness**: counts are integers; each index is rounded once.

pub mod cws;
pub mod error;
pub mod pairs;
pub mod table;

pub use cws::{cws_index, cws_index_of_columns, cws_index_of_rows, cws_report, CwsIndex};
pub use error::{Axis, CwsError, Result};
pub use pairs::{count_pairs, frequency_counts, sum_pairs_across_frequencies, PairCounts};
pub use table::{LabelNormalization, ResponseTable};
