pub mod csv;
pub mod json;

pub use self::csv::CsvWriter;
pub use self::json::JsonWriter;
