// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing with encoding and delimiter detection

mod csv_parser;

pub use csv_parser::{CsvParser, SourceEncoding};
