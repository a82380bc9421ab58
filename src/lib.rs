//! Income percentile lookup against government per-mille bracket tables.
//!
//! The data layer loads a reference file into an immutable
//! [`ReferenceTable`]; the resolver locates a query income inside it and
//! estimates a continuous percentile by linear interpolation; the report
//! module turns the structured result into text or JSON.

pub mod data;
pub mod error;
pub mod report;
pub mod resolver;

pub use data::loader::{load_file, LoadOptions};
pub use data::model::{BracketRow, ReferenceTable};
pub use error::RankError;
pub use report::{render, RankReport};
pub use resolver::{parse_query, resolve, Position, Resolution};
