//! Result payload parsing: XML result feeds, JSON, HTML tables and CSV.

pub mod results;

pub use results::{PayloadFormat, ResultsParser};
