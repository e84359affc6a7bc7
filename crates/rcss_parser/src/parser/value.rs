use crate::errors::{Diagnostic, DiagnosticKind};
use crate::node::{Node, NodeType};
use crate::tokenizer::TokenType;
use crate::Rcss;

impl Rcss<'_> {
    /// Parses a whitespace-separated value list. Stops just before ';', '}' or the end of
    /// input. A hash token in this position is a hex color. An identifier that is directly
    /// followed by ':' is taken as the property name of the next declaration instead, so a
    /// declaration with a missing ';' does not swallow its neighbour.
    pub fn parse_value_sequence(&mut self) -> Result<Vec<Node>, Diagnostic> {
        log::trace!("parse_value_sequence");

        let mut values = Vec::new();

        loop {
            let t = self.tokenizer.consume();
            match t.token_type {
                TokenType::Semicolon | TokenType::RCurly | TokenType::Eof => {
                    self.tokenizer.reconsume();
                    break;
                }
                TokenType::Ident(value) => {
                    if self.tokenizer.lookahead(0).token_type == TokenType::Colon {
                        self.tokenizer.reconsume();
                        break;
                    }
                    values.push(Node::new(NodeType::Ident { value }, t.span));
                }
                TokenType::Number { value, unit } => {
                    values.push(Node::new(NodeType::Number { value, unit }, t.span));
                }
                TokenType::Hash(value) => {
                    if !is_hex_color(&value) {
                        return Err(Diagnostic::new(
                            DiagnosticKind::SyntaxError,
                            format!("'#{value}' is not a valid hex color"),
                            t.span,
                        ));
                    }
                    values.push(Node::new(
                        NodeType::Color {
                            value: format!("#{value}"),
                        },
                        t.span,
                    ));
                }
                TokenType::Color(value) => {
                    values.push(Node::new(NodeType::Color { value }, t.span));
                }
                TokenType::TokenRef { name, version } => {
                    values.push(Node::new(NodeType::TokenRef { name, version }, t.span));
                }
                _ => {
                    return Err(self.unexpected(&t, "a value"));
                }
            }
        }

        Ok(values)
    }
}

/// Hex notation is 3 or 6 hex digits
fn is_hex_color(s: &str) -> bool {
    (s.len() == 3 || s.len() == 6) && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use crate::node::NodeType;
    use crate::parser_config::ParserConfig;
    use rcss_shared::byte_stream::{ByteStream, Encoding, Stream};

    fn parse_values(input: &str) -> Vec<crate::node::Node> {
        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str(input);
        stream.close();

        let mut parser = crate::Rcss::new(&mut stream, ParserConfig::default());
        parser.parse_value_sequence().unwrap()
    }

    #[test]
    fn test_parse_value_sequence() {
        let values = parse_values("red 12px #fff oklch(0.7 0.1 200) @brand/2;");

        assert_eq!(values.len(), 5);
        assert_eq!(*values[0].node_type, NodeType::Ident { value: "red".to_string() });
        assert_eq!(
            *values[1].node_type,
            NodeType::Number { value: 12.0, unit: Some("px".to_string()) }
        );
        assert_eq!(*values[2].node_type, NodeType::Color { value: "#fff".to_string() });
        assert_eq!(
            *values[3].node_type,
            NodeType::Color { value: "oklch(0.7 0.1 200)".to_string() }
        );
        assert_eq!(
            *values[4].node_type,
            NodeType::TokenRef { name: "brand".to_string(), version: Some("2".to_string()) }
        );
    }

    #[test]
    fn stops_before_the_next_declaration() {
        // 'y' is followed by ':' and belongs to the next declaration
        let values = parse_values("1 y: 2;");

        assert_eq!(values.len(), 1);
        assert_eq!(*values[0].node_type, NodeType::Number { value: 1.0, unit: None });
    }

    #[test]
    fn hex_colors_have_three_or_six_digits() {
        assert!(!parse_values("#fff;").is_empty());
        assert!(!parse_values("#a1b2c3;").is_empty());

        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str("#grid;");
        stream.close();

        let mut parser = crate::Rcss::new(&mut stream, ParserConfig::default());
        let diagnostic = parser.parse_value_sequence().unwrap_err();

        assert_eq!(diagnostic.message, "'#grid' is not a valid hex color");
    }

    #[test]
    fn punctuation_is_not_a_value() {
        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str("red . blue;");
        stream.close();

        let mut parser = crate::Rcss::new(&mut stream, ParserConfig::default());
        let diagnostic = parser.parse_value_sequence().unwrap_err();

        assert_eq!(diagnostic.message, "expected a value, got '.'");
    }
}
