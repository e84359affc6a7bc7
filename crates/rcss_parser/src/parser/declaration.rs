use crate::errors::{Diagnostic, DiagnosticKind};
use crate::node::{Node, NodeType};
use crate::tokenizer::TokenType;
use crate::Rcss;
use rcss_shared::byte_stream::Span;

impl Rcss<'_> {
    /// Either the declaration parses as a whole or not at all. On failure the error becomes
    /// a diagnostic and the input is skipped up to the next declaration boundary, leaving
    /// '}' in place for the enclosing block.
    pub fn parse_declaration(&mut self) -> Option<Node> {
        log::trace!("parse_declaration");

        match self.parse_declaration_internal() {
            Ok(declaration) => Some(declaration),
            Err(diagnostic) => {
                log::warn!("recovering from declaration error: {diagnostic}");
                self.diagnostics.push(diagnostic);
                self.tokenizer.reconsume();
                self.parse_until_declaration_end();
                None
            }
        }
    }

    fn parse_declaration_internal(&mut self) -> Result<Node, Diagnostic> {
        let start = self.tokenizer.current_location();

        let (property, property_span) = self.consume_any_ident("a property name")?;
        if !property.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(Diagnostic::new(
                DiagnosticKind::SyntaxError,
                format!("'{property}' is not a valid property name"),
                property_span,
            ));
        }

        self.consume(TokenType::Colon, "':' after property name")?;

        let value = self.parse_value_sequence()?;
        if value.is_empty() {
            let location = self.tokenizer.current_location();
            return Err(Diagnostic::new(
                DiagnosticKind::SyntaxError,
                format!("expected a value for property '{property}'"),
                Span::empty(location),
            ));
        }

        // A missing ';' before '}' or at the end of input is fine; a missing ';' before the
        // next declaration is reported, but the parsed declaration is kept.
        let t = self.tokenizer.consume();
        match t.token_type {
            TokenType::Semicolon => {}
            TokenType::RCurly | TokenType::Eof => {
                self.tokenizer.reconsume();
            }
            _ => {
                self.diagnostics.push(self.unexpected(&t, "';' after declaration value"));
                self.tokenizer.reconsume();
            }
        }

        let end = self.tokenizer.current_location();
        Ok(Node::new(NodeType::Declaration { property, value }, Span::new(start, end)))
    }

    /// Skips input up to and including the next ';'. A '}' is left in place so the
    /// enclosing block still sees its closing brace.
    fn parse_until_declaration_end(&mut self) {
        loop {
            let t = self.tokenizer.consume();
            match t.token_type {
                TokenType::Semicolon | TokenType::Eof => {
                    break;
                }
                TokenType::RCurly => {
                    self.tokenizer.reconsume();
                    break;
                }
                _ => {
                    // skip
                }
            }
        }
    }
}
