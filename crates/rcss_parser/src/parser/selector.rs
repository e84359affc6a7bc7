use crate::errors::Diagnostic;
use crate::node::{Node, NodeType};
use crate::tokenizer::TokenType;
use crate::Rcss;
use rcss_shared::byte_stream::Span;

impl Rcss<'_> {
    /// Parses a single selector: `.class`, `#id` or a bare element name. A hash token in
    /// this position is an id selector; the same token in value position would have been a
    /// hex color.
    pub fn parse_selector(&mut self) -> Result<Node, Diagnostic> {
        log::trace!("parse_selector");

        let t = self.tokenizer.consume();
        let start = t.span.start;

        match t.token_type {
            TokenType::Dot => {
                let (name, name_span) = self.consume_any_ident("a class name after '.'")?;
                check_selector_name(&name, name_span)?;
                Ok(Node::new(
                    NodeType::ClassSelector { name },
                    Span::new(start, name_span.end),
                ))
            }
            TokenType::Hash(name) => {
                check_selector_name(&name, t.span)?;
                Ok(Node::new(NodeType::IdSelector { name }, t.span))
            }
            TokenType::Ident(name) => {
                check_selector_name(&name, t.span)?;
                Ok(Node::new(NodeType::ElementSelector { name }, t.span))
            }
            _ => Err(self.unexpected(&t, "a selector")),
        }
    }
}

/// Selector names must start with a letter or underscore; the scanner already limits the
/// remaining characters to the name class.
fn check_selector_name(name: &str, span: Span) -> Result<(), Diagnostic> {
    if name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Ok(());
    }

    Err(Diagnostic::new(
        crate::errors::DiagnosticKind::SyntaxError,
        format!("'{name}' is not a valid selector name"),
        span,
    ))
}

#[cfg(test)]
mod tests {
    use crate::parser_config::ParserConfig;
    use crate::walker::Walker;
    use rcss_shared::byte_stream::{ByteStream, Encoding, Stream};

    fn parse_selector(input: &str) -> Result<crate::node::Node, crate::errors::Diagnostic> {
        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str(input);
        stream.close();

        let mut parser = crate::Rcss::new(&mut stream, ParserConfig::default());
        parser.parse_selector()
    }

    #[test]
    fn test_parse_selector() {
        let selectors = vec![
            (".box", "[ClassSelector] box\n"),
            ("#title", "[IdSelector] title\n"),
            ("body", "[ElementSelector] body\n"),
            (".with-dashes_and_underscores", "[ClassSelector] with-dashes_and_underscores\n"),
        ];

        for (input, expected) in selectors {
            let node = parse_selector(input).unwrap();
            assert_eq!(Walker::new(&node).walk_to_string(), expected);
        }
    }

    #[test]
    fn dot_without_a_name() {
        let diagnostic = parse_selector(". {").unwrap_err();
        assert_eq!(diagnostic.message, "expected a class name after '.', got '{'");
    }

    #[test]
    fn selector_position_rejects_values() {
        assert!(parse_selector("12px").is_err());
        assert!(parse_selector("{").is_err());
    }

    #[test]
    fn selector_names_must_start_with_a_letter() {
        let diagnostic = parse_selector("#9grid").unwrap_err();
        assert_eq!(diagnostic.message, "'9grid' is not a valid selector name");

        assert!(parse_selector("-leading-dash").is_err());
        assert!(parse_selector("_private").is_ok());
    }
}
