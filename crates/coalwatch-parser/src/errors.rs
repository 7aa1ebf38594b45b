use thiserror::Error;

/// Structural upload failures. These reject the whole file before any row
/// reaches storage; per-row coercion failures are not errors, they only
/// shrink the accepted-row count.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unsupported file '{filename}': name must mention temperature, fire, or weather")]
    UnsupportedFile { filename: String },

    #[error("{format} upload has {found} columns, expected at least {expected}")]
    NotEnoughColumns {
        format: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("{format} upload contained no rows")]
    EmptyFile { format: &'static str },
}
