use crate::errors::{Diagnostic, DiagnosticKind};
use crate::tokenizer::{Token, TokenType};
use crate::Rcss;
use rcss_shared::byte_stream::Span;

mod block;
mod declaration;
mod rule;
mod selector;
mod stylesheet;
mod value;

impl Rcss<'_> {
    /// Consumes a specific token. `expected` describes the expectation for the message when
    /// some other token is found.
    pub(crate) fn consume(&mut self, token_type: TokenType, expected: &str) -> Result<Token, Diagnostic> {
        let t = self.tokenizer.consume();
        if t.token_type != token_type {
            return Err(self.unexpected(&t, expected));
        }

        Ok(t)
    }

    /// Consumes any identifier token
    pub(crate) fn consume_any_ident(&mut self, expected: &str) -> Result<(String, Span), Diagnostic> {
        let t = self.tokenizer.consume();
        match t.token_type {
            TokenType::Ident(s) => Ok((s, t.span)),
            _ => Err(self.unexpected(&t, expected)),
        }
    }

    /// Builds the diagnostic for an unexpected token. At end of input this becomes an
    /// `UnexpectedEndOfInput` so callers can tell a truncated file from a malformed one.
    pub(crate) fn unexpected(&self, token: &Token, expected: &str) -> Diagnostic {
        let kind = if token.is_eof() {
            DiagnosticKind::UnexpectedEndOfInput
        } else {
            DiagnosticKind::SyntaxError
        };

        Diagnostic::new(kind, format!("expected {expected}, got {token}"), token.span)
    }
}
