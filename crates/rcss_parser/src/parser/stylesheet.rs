use crate::node::{Node, NodeType};
use crate::Rcss;
use rcss_shared::byte_stream::Span;

impl Rcss<'_> {
    /// Parses a full source unit: zero or more rules up to the end of input. This never
    /// fails; rules that cannot be parsed are recorded as diagnostics and skipped.
    pub fn parse_stylesheet(&mut self) -> Node {
        log::trace!("parse_stylesheet");

        let start = self.tokenizer.current_location();
        let mut children = Vec::new();

        loop {
            let t = self.tokenizer.consume();
            if t.is_eof() {
                break;
            }
            self.tokenizer.reconsume();

            if let Some(rule) = self.parse_rule() {
                children.push(rule);
            }
        }

        let end = self.tokenizer.current_location();
        Node::new(NodeType::StyleSheet { children }, Span::new(start, end))
    }
}
