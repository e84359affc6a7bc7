//! Fatal, call-level error results. Malformed RCSS syntax is never reported through these;
//! recoverable conditions travel as in-band diagnostics alongside the parsed tree.

use thiserror::Error;

/// Errors that fail a parse call outright, without producing a tree
#[derive(Debug, Error)]
pub enum RcssError {
    #[error("input too large: {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("input is not decodable text (detected encoding: {0})")]
    InvalidEncoding(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result that can be returned which holds either T or an `RcssError`
pub type RcssResult<T> = std::result::Result<T, RcssError>;
