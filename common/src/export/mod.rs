//! Export core modules shared by the CLI and any other front end.
//!
//! Text generation only; writing files is the caller's job.

pub mod csv_core;
pub mod json_core;

pub use csv_core::{to_csv, CsvOptions};
pub use json_core::to_pretty_json;
