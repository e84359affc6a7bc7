//! Shared plumbing for the RCSS parser: the character stream the tokenizer
//! reads from, source locations and spans, and the fatal error types.

pub mod byte_stream;
pub mod errors;
