use crate::errors::{Diagnostic, DiagnosticKind};
use crate::node::{Node, NodeType};
use crate::tokenizer::TokenType;
use crate::Rcss;
use rcss_shared::byte_stream::Span;

impl Rcss<'_> {
    /// Either the rule parses as a whole or not at all. On failure the error is recorded as
    /// a diagnostic, the input is skipped up to the next rule boundary and None is returned
    /// so the caller can continue with the following rule.
    pub fn parse_rule(&mut self) -> Option<Node> {
        log::trace!("parse_rule");

        match self.parse_rule_internal() {
            Ok(rule_node) => Some(rule_node),
            Err(diagnostic) => {
                log::warn!("recovering from rule error: {diagnostic}");
                self.diagnostics.push(diagnostic);
                self.tokenizer.reconsume();
                self.parse_until_rule_end();
                None
            }
        }
    }

    fn parse_rule_internal(&mut self) -> Result<Node, Diagnostic> {
        let start = self.tokenizer.current_location();

        let selector = self.parse_selector()?;

        let lcurly = self.consume(TokenType::LCurly, "'{' after selector")?;

        let block = self.parse_block();

        // parse_block stops just before '}' or the end of input. An unclosed block is
        // closed implicitly so the rule is kept in the tree; the diagnostic points at the
        // opening brace.
        let t = self.tokenizer.consume();
        if t.is_eof() {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnexpectedEndOfInput,
                "unclosed block, '}' inserted at end of input",
                lcurly.span,
            ));
        }

        let end = self.tokenizer.current_location();
        Ok(Node::new(NodeType::Rule { selector, block }, Span::new(start, end)))
    }

    /// Skips input up to and including the next ';' or '}', the rule-level resync points
    fn parse_until_rule_end(&mut self) {
        loop {
            let t = self.tokenizer.consume();
            match t.token_type {
                TokenType::Semicolon | TokenType::RCurly | TokenType::Eof => {
                    break;
                }
                _ => {
                    // skip
                }
            }
        }
    }
}
