pub mod csv;
pub mod docx;
pub mod pdf;
pub mod spreadsheet;
pub mod txt;

pub use self::csv::CsvExtractor;
pub use self::docx::DocxExtractor;
pub use self::pdf::PdfExtractor;
pub use self::spreadsheet::SpreadsheetExtractor;
pub use self::txt::TxtExtractor;
