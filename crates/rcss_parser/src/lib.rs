//! Parser for the RCSS stylesheet language.
//!
//! The entry points are [`Rcss::parse_str`] and [`Rcss::parse_bytes`], which run the full
//! pipeline: scan, parse with recovery, and return a [`SyntaxTree`] together with the
//! diagnostics collected along the way. Malformed input still yields a tree; only inputs
//! that cannot be processed at all (too large, not decodable) fail the call.

use crate::errors::Diagnostic;
use crate::node::Node;
use crate::parser_config::ParserConfig;
use crate::tokenizer::Tokenizer;

use rcss_shared::byte_stream::{ByteStream, Encoding, Location, Stream};
use rcss_shared::errors::{RcssError, RcssResult};
use serde::Serialize;

pub mod errors;
pub mod node;
pub mod parser;
pub mod parser_config;
pub mod tokenizer;
pub mod walker;

/// The result of a parse: the root node plus every diagnostic, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxTree {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    /// The rules of the source unit in document order
    pub fn rules(&self) -> &[Node] {
        self.root.children()
    }

    /// Returns true when the parse recovered from at least one error
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub struct Rcss<'stream> {
    /// The tokenizer is responsible for reading the input stream
    pub tokenizer: Tokenizer<'stream>,
    /// The parser configuration as given
    config: ParserConfig,
    /// Recoverable errors found while parsing
    diagnostics: Vec<Diagnostic>,
}

impl<'stream> Rcss<'stream> {
    /// Creates a new parser with the given byte stream so only `parse()` needs to be called.
    fn new(stream: &'stream mut ByteStream, config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(stream, Location::default()),
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Parses a direct string to a `SyntaxTree`
    pub fn parse_str(data: &str, config: ParserConfig) -> RcssResult<SyntaxTree> {
        if data.len() > config.max_input_size {
            return Err(RcssError::InputTooLarge {
                size: data.len(),
                limit: config.max_input_size,
            });
        }

        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_str(data);
        stream.close();

        Rcss::parse_stream(&mut stream, config)
    }

    /// Parses raw bytes to a `SyntaxTree`. The encoding is detected from the bytes; input
    /// that does not decode as ASCII or UTF-8 is rejected as a whole.
    pub fn parse_bytes(data: &[u8], config: ParserConfig) -> RcssResult<SyntaxTree> {
        if data.len() > config.max_input_size {
            return Err(RcssError::InputTooLarge {
                size: data.len(),
                limit: config.max_input_size,
            });
        }

        let mut stream = ByteStream::new(Encoding::UTF8);
        stream.read_from_bytes(data);

        let encoding = stream.detect_encoding()?;
        stream.set_encoding(encoding);
        stream.close();

        Rcss::parse_stream(&mut stream, config)
    }

    /// Parses a direct stream to a `SyntaxTree`. The stream is taken as-is; size and
    /// encoding checks are up to the caller.
    pub fn parse_stream(stream: &mut ByteStream, config: ParserConfig) -> RcssResult<SyntaxTree> {
        Rcss::new(stream, config).parse()
    }

    fn parse(&mut self) -> RcssResult<SyntaxTree> {
        log::debug!("parsing {}", self.config.source.as_deref().unwrap_or("<inline>"));

        let root = self.parse_stylesheet();

        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        diagnostics.extend(self.tokenizer.take_errors());
        // Stable sort: parser and scanner diagnostics interleave by source position
        diagnostics.sort_by_key(|d| d.span.start.offset);

        Ok(SyntaxTree { root, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DiagnosticKind;
    use crate::node::NodeType;
    use crate::walker::Walker;
    use simple_logger::SimpleLogger;

    fn parse(input: &str) -> SyntaxTree {
        Rcss::parse_str(input, ParserConfig::default()).unwrap()
    }

    fn walk(tree: &SyntaxTree) -> String {
        Walker::new(&tree.root).walk_to_string()
    }

    #[test]
    fn parse_a_simple_stylesheet() {
        let tree = parse(".box { color: #fff; size: 12px; }");

        assert!(!tree.has_errors());
        assert_eq!(tree.rules().len(), 1);
        assert_eq!(
            walk(&tree),
            "[Stylesheet (1)]\n  [Rule]\n    [ClassSelector] box\n    [Block]\n      [Declaration] property: color\n        [Color] #fff\n      [Declaration] property: size\n        [Number] 12px\n"
        );
    }

    #[test]
    fn hash_means_id_in_selector_position_and_color_in_value_position() {
        let tree = parse("#title { color: #fff; }");

        assert!(!tree.has_errors());
        assert_eq!(
            walk(&tree),
            "[Stylesheet (1)]\n  [Rule]\n    [IdSelector] title\n    [Block]\n      [Declaration] property: color\n        [Color] #fff\n"
        );
    }

    #[test]
    fn token_references() {
        let tree = parse(".card { background: @brand/2; spacing: @space-4; }");

        assert!(!tree.has_errors());
        assert_eq!(
            walk(&tree),
            "[Stylesheet (1)]\n  [Rule]\n    [ClassSelector] card\n    [Block]\n      [Declaration] property: background\n        [TokenRef] brand/2\n      [Declaration] property: spacing\n        [TokenRef] space-4\n"
        );
    }

    #[test]
    fn empty_input() {
        let tree = parse("");

        assert!(!tree.has_errors());
        assert!(tree.rules().is_empty());
    }

    #[test]
    fn unclosed_block_is_closed_implicitly() {
        let tree = parse(".box { color: red;");

        assert_eq!(tree.rules().len(), 1);
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::UnexpectedEndOfInput);

        let (_, block) = tree.rules()[0].rule_parts().unwrap();
        assert_eq!(block.children().len(), 1);
    }

    #[test]
    fn missing_semicolon_recovers_without_losing_the_next_declaration() {
        let tree = parse(".a { x: 1 y: 2; }");

        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::SyntaxError);

        let (_, block) = tree.rules()[0].rule_parts().unwrap();
        assert_eq!(block.children().len(), 2);
    }

    #[test]
    fn garbage_input_terminates_with_a_tree() {
        let _ = SimpleLogger::new().init();

        let inputs = [
            "~!$%^&*()",
            "{}{}{}",
            ";;;",
            ".a { : ; } }",
            "#### {{{{",
            ". . . @@@",
        ];

        for input in inputs {
            let tree = Rcss::parse_str(input, ParserConfig::default()).unwrap();
            assert!(tree.has_errors(), "expected diagnostics for {input:?}");
        }
    }

    #[test]
    fn diagnostics_are_in_source_order() {
        // a syntax error, a scanner error and another syntax error, in that source order
        let tree = parse(".a color; x ~ ;");

        assert!(tree.diagnostics.len() >= 2);
        for pair in tree.diagnostics.windows(2) {
            assert!(pair[0].span.start.offset <= pair[1].span.start.offset);
        }
        assert!(tree
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::LexError));
    }

    #[test]
    fn oversized_input_is_rejected() {
        let config = ParserConfig {
            max_input_size: 16,
            ..Default::default()
        };

        let result = Rcss::parse_str(".box { color: red; }", config);
        assert!(matches!(
            result,
            Err(RcssError::InputTooLarge { size: 20, limit: 16 })
        ));
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        // UTF-16LE encoded ".box"
        let data = [0xFF, 0xFE, 0x2E, 0x00, 0x62, 0x00, 0x6F, 0x00, 0x78, 0x00];

        let result = Rcss::parse_bytes(&data, ParserConfig::default());
        assert!(matches!(result, Err(RcssError::InvalidEncoding(_))));
    }

    #[test]
    fn parse_bytes_detects_utf8() {
        let tree = Rcss::parse_bytes(
            "// d\u{e9}j\u{e0} vu\n.box { color: red; }".as_bytes(),
            ParserConfig::default(),
        )
        .unwrap();

        assert!(!tree.has_errors());
        assert_eq!(
            *tree.rules()[0].rule_parts().unwrap().0.node_type,
            NodeType::ClassSelector { name: "box".to_string() }
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = ".a { x: 1 y: 2; } ~ #b { c: oklch(0.7 0.1 200); }";

        let first = parse(input);
        let second = parse(input);

        assert_eq!(walk(&first), walk(&second));
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn trees_serialize_to_json() {
        let tree = parse(".box { size: 12px; }");
        let json = serde_json::to_string(&tree).unwrap();

        assert!(json.contains("\"ClassSelector\""));
        assert!(json.contains("\"diagnostics\":[]"));

        let spanned: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(spanned["root"]["span"]["start"]["line"], 1);
    }
}
