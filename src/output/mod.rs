pub mod row_format;
pub mod writer;

pub use row_format::RowFormatter;
pub use writer::{sort_file_by_column, write_rows};
