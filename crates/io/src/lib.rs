// Row readers: turn spreadsheet and delimited files into numbered rows of cells.

pub mod csv;
pub mod error;
pub mod sheet;
pub mod xlsx;

pub use error::IoError;
pub use sheet::{read_rows, FileFormat, SheetOptions, SheetSource};
