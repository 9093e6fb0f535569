//! CSV dialect: line tokenizing, separator detection and field encoding

mod detector;
mod encoder;
mod lines;
mod tokenizer;

pub use detector::{detect_separator, SeparatorDetector};
pub use encoder::CsvEncoder;
pub use lines::{DecodedLines, PhysicalLines};
pub use tokenizer::LineTokenizer;

/// Quote character of the dialect
pub const QUOTE: char = '"';

// Re-export CompressionMethod from s-zip for convenience
pub use s_zip::CompressionMethod;
