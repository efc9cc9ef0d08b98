//! Output module
//!
//! Writes projected tables as UTF-8 CSV files.

mod writer;

pub use writer::{write_table, CsvWriter};
