use crate::node::{Node, NodeType};
use crate::tokenizer::TokenType;
use crate::Rcss;
use rcss_shared::byte_stream::Span;

impl Rcss<'_> {
    /// Parses the declarations of a block. Stops just before the closing '}' or the end of
    /// input; the caller owns the braces. Stray semicolons between declarations are eaten.
    pub fn parse_block(&mut self) -> Node {
        log::trace!("parse_block");

        let start = self.tokenizer.current_location();
        let mut children = Vec::new();

        loop {
            let t = self.tokenizer.consume();
            match t.token_type {
                TokenType::RCurly | TokenType::Eof => {
                    self.tokenizer.reconsume();
                    break;
                }
                TokenType::Semicolon => {
                    // empty declaration
                }
                _ => {
                    self.tokenizer.reconsume();
                    if let Some(declaration) = self.parse_declaration() {
                        children.push(declaration);
                    }
                }
            }
        }

        let end = self.tokenizer.current_location();
        Node::new(NodeType::Block { children }, Span::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser_config::ParserConfig;
    use crate::walker::Walker;
    use rcss_shared::byte_stream::{ByteStream, Encoding, Stream};

    macro_rules! test {
        ($input:expr, $expected:expr) => {
            let mut stream = ByteStream::new(Encoding::UTF8);
            stream.read_from_str($input);
            stream.close();

            let mut parser = crate::Rcss::new(&mut stream, ParserConfig::default());
            let result = parser.parse_block();

            let w = Walker::new(&result);
            assert_eq!(w.walk_to_string(), $expected);
        };
    }

    #[test]
    fn test_parse_block() {
        test!("}", "[Block]\n");
        test!(
            "color: red; size: 12px; }",
            "[Block]\n  [Declaration] property: color\n    [Ident] red\n  [Declaration] property: size\n    [Number] 12px\n"
        );
        // stray semicolons are not declarations
        test!(
            ";; color: red ;; }",
            "[Block]\n  [Declaration] property: color\n    [Ident] red\n"
        );
    }

    #[test]
    fn broken_declaration_does_not_take_the_block_down() {
        test!(
            "color red; size: 12px; }",
            "[Block]\n  [Declaration] property: size\n    [Number] 12px\n"
        );
    }
}
