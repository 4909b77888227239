pub mod extract;
pub mod registry;
pub mod r#trait;
pub mod types;

pub use extract::{extract, extract_file, extract_from_bytes, validate_file};
pub use r#trait::TextExtractor;
pub use registry::ExtractorRegistry;
pub use types::{CsvExtractor, DocxExtractor, PdfExtractor, SpreadsheetExtractor, TxtExtractor};
