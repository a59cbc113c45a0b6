pub mod csv;

#[cfg(test)]
mod csv_test;

pub use csv::{parse_csv, CellWarning, ParseOutcome, WarningKind};
