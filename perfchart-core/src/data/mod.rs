//! Turning static CSV text into aligned raw series.

pub mod align;
pub mod csv_reader;

pub use align::{find_misalignments, validate_alignment, AlignmentPolicy};
pub use csv_reader::{parse_csv, parse_csv_str, parse_date, RowPolicy};
