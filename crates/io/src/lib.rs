// File I/O operations

pub mod columns;
pub mod csv;
pub mod decode;
pub mod error;
pub mod format;
pub mod source;
pub mod table;
pub mod text;
pub mod xlsx;

pub use columns::{resolve_column, ColumnMatch, MatchStrategy, ResolveScope};
pub use decode::TextEncoding;
pub use error::ReadError;
pub use format::FileFormat;
pub use source::{read_input, InputFile, InputSource, Loaded};
pub use table::{Content, Table};
