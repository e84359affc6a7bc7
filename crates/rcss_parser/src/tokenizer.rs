use crate::errors::{Diagnostic, DiagnosticKind};
use rcss_shared::byte_stream::Character::Ch;
use rcss_shared::byte_stream::{ByteStream, Character, Location, LocationHandler, Span, Stream};
use std::fmt;

pub type Number = f32;

/// Unit suffixes the scanner will attach to a numeric literal. Any other ident-run after a
/// number is left in the stream and lexed as a separate identifier.
const UNITS: [&str; 3] = ["rem", "px", "em"];

/// Function-notation color prefixes. The inner text is preserved verbatim, not parsed.
const COLOR_FUNCTIONS: [&str; 3] = ["oklch", "rgba", "rgb"];

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    /// A `.` introducing a class selector
    Dot,
    /// A `#` followed by a name. Lexically ambiguous: an id selector in selector position,
    /// a hex color in value position. The value does not include the `#` marker; the parser
    /// re-tags the token based on its production context.
    Hash(String),
    /// A `{`
    LCurly,
    /// A `}`
    RCurly,
    /// A `:`
    Colon,
    /// A `;`
    Semicolon,
    /// Fallback class: any run of `[a-zA-Z0-9_-]+` not matched by a more specific rule
    Ident(String),
    /// A numeric literal with an optional unit suffix
    Number { value: Number, unit: Option<String> },
    /// A function-notation color literal (`oklch(...)`, `rgb(...)`, `rgba(...)`), raw text
    /// preserved verbatim including the parentheses
    Color(String),
    /// A design token reference `@name` or `@name/version`
    TokenRef { name: String, version: Option<String> },
    /// End of input
    Eof,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Extent of the token in the stream
    pub span: Span,
}

impl Token {
    /// Returns a new token for the given type on the given span
    fn new(token_type: TokenType, span: Span) -> Token {
        Token { token_type, span }
    }

    fn new_hash(value: &str, span: Span) -> Token {
        Token::new(TokenType::Hash(value.to_string()), span)
    }

    fn new_ident(value: &str, span: Span) -> Token {
        Token::new(TokenType::Ident(value.to_string()), span)
    }

    fn new_number(value: Number, unit: Option<String>, span: Span) -> Token {
        Token::new(TokenType::Number { value, unit }, span)
    }

    fn new_color(value: &str, span: Span) -> Token {
        Token::new(TokenType::Color(value.to_string()), span)
    }

    fn new_token_ref(name: &str, version: Option<String>, span: Span) -> Token {
        Token::new(
            TokenType::TokenRef {
                name: name.to_string(),
                version,
            },
            span,
        )
    }
}

impl Token {
    pub(crate) fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_type {
            TokenType::Dot => write!(f, "'.'"),
            TokenType::Hash(val) => write!(f, "'#{val}'"),
            TokenType::LCurly => write!(f, "'{{'"),
            TokenType::RCurly => write!(f, "'}}'"),
            TokenType::Colon => write!(f, "':'"),
            TokenType::Semicolon => write!(f, "';'"),
            TokenType::Ident(val) => write!(f, "'{val}'"),
            TokenType::Number { value, unit } => {
                write!(f, "'{}{}'", value, unit.as_deref().unwrap_or(""))
            }
            TokenType::Color(val) => write!(f, "'{val}'"),
            TokenType::TokenRef { name, version } => match version {
                Some(version) => write!(f, "'@{name}/{version}'"),
                None => write!(f, "'@{name}'"),
            },
            TokenType::Eof => write!(f, "end of input"),
        }
    }
}

/// RCSS tokenizer. Classifies one token at a time with a fixed priority order: punctuation,
/// token-reference, numeric literal, color literal, identifier fallback. Whitespace and line
/// comments are consumed silently and never emitted as tokens.
pub struct Tokenizer<'stream> {
    stream: &'stream mut ByteStream,
    /// Position of the NEXT token to consume. If it's outside the token list, new tokens are
    /// produced on demand
    position: usize,
    /// All tokens produced so far (lookahead keeps them buffered)
    tokens: Vec<Token>,
    /// Tracks the line/column/offset of the read cursor
    location: LocationHandler,
    /// Lexical errors collected along the way; drained by the parser when the parse finishes
    errors: Vec<Diagnostic>,
}

impl<'stream> Tokenizer<'stream> {
    /// Creates a new tokenizer with the given stream that starts on the given location. This
    /// does not have to be 1/1, but can be any location.
    pub fn new(stream: &'stream mut ByteStream, start_location: Location) -> Self {
        Self {
            stream,
            position: 0,
            tokens: Vec::new(),
            location: LocationHandler::new(start_location),
            errors: Vec::new(),
        }
    }

    /// Returns the current location of the read cursor
    pub fn current_location(&self) -> Location {
        self.location.cur_location
    }

    /// Returns true when the read cursor has reached the end of the stream
    pub fn eof(&self) -> bool {
        self.stream.eof()
    }

    /// Consumes the next token and returns it
    pub fn consume(&mut self) -> Token {
        if self.tokens.len() == self.position {
            let token = self.consume_token();
            self.tokens.push(token);
        }

        let token = &self.tokens[self.position];
        self.position += 1;

        log::trace!("{:?}", token);

        token.clone()
    }

    /// Reconsume will push the current position back so the next read will be the same token
    pub fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Looks ahead at the token with the given offset. So `lookahead(0)` will look at the
    /// next token that will be consumed with `consume()`
    pub fn lookahead(&mut self, offset: usize) -> Token {
        while self.tokens.len() <= self.position + offset {
            let token = self.consume_token();
            self.tokens.push(token);
        }

        self.tokens[self.position + offset].clone()
    }

    /// Drains the lexical errors collected so far
    pub(crate) fn take_errors(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.errors)
    }

    /// Classifies and consumes one token. Applies the fixed priority order; on an
    /// unrecognized character a `LexError` is recorded, exactly one character is skipped
    /// and scanning resumes.
    fn consume_token(&mut self) -> Token {
        loop {
            self.consume_trivia();

            let start = self.current_location();
            let current = self.current_char();

            let c = match current {
                Character::StreamEnd | Character::StreamEmpty => {
                    return Token::new(TokenType::Eof, Span::empty(start));
                }
                Ch(c) => c,
            };

            match c {
                '.' => {
                    self.next_char();
                    return Token::new(TokenType::Dot, self.span_from(start));
                }
                '{' => {
                    self.next_char();
                    return Token::new(TokenType::LCurly, self.span_from(start));
                }
                '}' => {
                    self.next_char();
                    return Token::new(TokenType::RCurly, self.span_from(start));
                }
                ':' => {
                    self.next_char();
                    return Token::new(TokenType::Colon, self.span_from(start));
                }
                ';' => {
                    self.next_char();
                    return Token::new(TokenType::Semicolon, self.span_from(start));
                }
                '#' => {
                    self.next_char();
                    let name = self.consume_name();
                    if name.is_empty() {
                        self.lex_error('#', start);
                        continue;
                    }

                    return Token::new_hash(name.as_str(), self.span_from(start));
                }
                '@' => {
                    self.next_char();
                    let name = self.consume_name();
                    if name.is_empty() {
                        self.lex_error('@', start);
                        continue;
                    }

                    let version = self.consume_version();
                    return Token::new_token_ref(name.as_str(), version, self.span_from(start));
                }
                c if c.is_ascii_digit() => {
                    return self.consume_numeric_token(start);
                }
                c if is_name_char(c) => {
                    let name = self.consume_name();

                    if self.current_char() == Ch('(')
                        && COLOR_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())
                    {
                        return self.consume_color_function(name, start);
                    }

                    return Token::new_ident(name.as_str(), self.span_from(start));
                }
                c => {
                    self.next_char();
                    self.lex_error(c, start);
                }
            }
        }
    }

    /// Consumes whitespace and line comments (`//` up to the end of the line). Neither is
    /// ever emitted as a token.
    fn consume_trivia(&mut self) {
        loop {
            while self.current_char().is_whitespace() {
                self.next_char();
            }

            if self.current_char() == Ch('/') && self.stream.look_ahead(1) == Ch('/') {
                while !matches!(self.current_char(), Character::StreamEnd | Character::StreamEmpty)
                    && self.current_char() != Ch('\n')
                {
                    self.next_char();
                }
                continue;
            }

            break;
        }
    }

    /// Consumes a numeric literal: a digit run, an optional fractional part, and an optional
    /// unit suffix. An ident-run after the digits that is not a known unit is left in the
    /// stream and will be lexed as a separate identifier.
    fn consume_numeric_token(&mut self, start: Location) -> Token {
        let mut value = String::new();

        value.push_str(&self.consume_digits());

        if self.current_char() == Ch('.') && self.stream.look_ahead(1).is_numeric() {
            value.push(self.next_char().into());
            value.push_str(&self.consume_digits());
        }

        // Digit-only text with at most one interior dot always parses
        let magnitude: Number = value.parse().unwrap_or_default();

        if self.current_char() == Ch('%') {
            self.next_char();
            return Token::new_number(magnitude, Some("%".to_string()), self.span_from(start));
        }

        let suffix = self.peek_name();
        if UNITS.contains(&suffix.as_str()) {
            for _ in 0..suffix.len() {
                self.next_char();
            }
            return Token::new_number(magnitude, Some(suffix), self.span_from(start));
        }

        Token::new_number(magnitude, None, self.span_from(start))
    }

    /// Consumes a function-notation color literal through its closing parenthesis, keeping
    /// the raw text verbatim. An unterminated literal is closed implicitly at end of input.
    fn consume_color_function(&mut self, name: String, start: Location) -> Token {
        let mut raw = name;

        // consume '('
        raw.push(self.next_char().into());

        loop {
            match self.current_char() {
                Character::StreamEnd | Character::StreamEmpty => {
                    self.errors.push(Diagnostic::new(
                        DiagnosticKind::UnexpectedEndOfInput,
                        format!("unterminated color literal '{raw}'"),
                        Span::new(start, self.current_location()),
                    ));
                    break;
                }
                Ch(')') => {
                    raw.push(self.next_char().into());
                    break;
                }
                Ch(_) => {
                    raw.push(self.next_char().into());
                }
            }
        }

        Token::new_color(raw.as_str(), self.span_from(start))
    }

    /// Consumes a name run: `[a-zA-Z0-9_-]+`
    fn consume_name(&mut self) -> String {
        let mut value = String::new();

        while let Ch(c) = self.current_char() {
            if !is_name_char(c) {
                break;
            }
            value.push(self.next_char().into());
        }

        value
    }

    /// Consumes the optional `/version` part of a token reference. The slash is only taken
    /// when a version character follows it.
    fn consume_version(&mut self) -> Option<String> {
        if self.current_char() != Ch('/') || !is_version_char(self.stream.look_ahead(1).into()) {
            return None;
        }

        // consume '/'
        self.next_char();

        let mut version = String::new();
        while let Ch(c) = self.current_char() {
            if !is_version_char(c) {
                break;
            }
            version.push(self.next_char().into());
        }

        Some(version)
    }

    fn consume_digits(&mut self) -> String {
        let mut value = String::new();

        while matches!(self.current_char(), Ch(c) if c.is_ascii_digit()) {
            value.push(self.next_char().into());
        }

        value
    }

    /// Looks ahead at the name run starting at the current position without consuming it
    fn peek_name(&self) -> String {
        let mut value = String::new();

        let mut offset = 0;
        while let Ch(c) = self.stream.look_ahead(offset) {
            if !is_name_char(c) {
                break;
            }
            value.push(c);
            offset += 1;
        }

        value
    }

    fn lex_error(&mut self, c: char, start: Location) {
        self.errors.push(Diagnostic::new(
            DiagnosticKind::LexError,
            format!("unrecognized character '{c}'"),
            Span::new(start, self.current_location()),
        ));
    }

    fn current_char(&self) -> Character {
        self.stream.read()
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.current_location())
    }

    fn next_char(&mut self) -> Character {
        if self.stream.eof() {
            return Character::StreamEnd;
        }

        let c = self.stream.read();
        self.location.inc(c);
        self.stream.next();

        c
    }
}

/// name code point: `[a-zA-Z0-9_-]`
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// version code point: `[0-9.]`
fn is_version_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}
