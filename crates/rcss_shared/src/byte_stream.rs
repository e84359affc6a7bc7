use crate::errors::{RcssError, RcssResult};
use serde::Serialize;
use std::cell::RefCell;
use std::char::REPLACEMENT_CHARACTER;
use std::fmt::{self, Debug, Formatter};

pub const CHAR_LF: char = '\u{000A}';
pub const CHAR_CR: char = '\u{000D}';

/// Encoding defines the way the buffer stream is read, as what defines a "character".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Encoding {
    /// Stream is of single byte ASCII chars (0-127)
    ASCII,
    /// Stream is of UTF8 characters
    UTF8,
}

/// Defines a single character/element in the stream. Note that characters are not the same as
/// bytes, since a single character can be multiple bytes in UTF8.
///
/// `StreamEnd` is denoted as a separate element, so is `StreamEmpty` to indicate that the buffer
/// is empty but not yet closed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Character {
    /// Standard UTF character
    Ch(char),
    /// Stream buffer empty and closed
    StreamEnd,
    /// Stream buffer empty (but not closed)
    StreamEmpty,
}

use Character::*;

/// Converts the given character to a char. Stream end markers are converted to 0x0000
impl From<&Character> for char {
    fn from(c: &Character) -> Self {
        match c {
            Ch(c) => *c,
            StreamEmpty | StreamEnd => 0x0000 as char,
        }
    }
}

impl From<Character> for char {
    fn from(c: Character) -> Self {
        char::from(&c)
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ch(ch) => write!(f, "{ch}"),
            StreamEnd => write!(f, "StreamEnd"),
            StreamEmpty => write!(f, "StreamEmpty"),
        }
    }
}

impl Character {
    /// Returns true when the character is a whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Ch(c) if c.is_whitespace())
    }

    /// Returns true when the character is a numerical
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ch(c) if c.is_numeric())
    }
}

/// Character stream over a byte buffer. The buffer holds the full contents of one RCSS source
/// unit; there is no partial-input mode beyond the open/closed distinction.
pub struct ByteStream {
    /// Actual buffer stream in u8 bytes
    buffer: Vec<u8>,
    /// Current position in the stream
    buffer_pos: RefCell<usize>,
    /// True when the stream is closed and no more data will be added
    closed: bool,
    /// Current encoding
    encoding: Encoding,
}

/// Generic stream trait
pub trait Stream {
    /// Read current character
    fn read(&self) -> Character;
    /// Read current character and advance to next
    fn read_and_next(&self) -> Character;
    /// Look ahead in the stream
    fn look_ahead(&self, offset: usize) -> Character;
    /// Advance with 1 character
    fn next(&self);
    /// Advance with offset characters
    fn next_n(&self, offset: usize);
    /// Resets the stream back to the start position
    fn reset_stream(&self);
    /// Closes the stream (no more data can be added)
    fn close(&mut self);
    /// Returns true when the stream is closed
    fn closed(&self) -> bool;
    /// Returns true when the stream is empty (but still open)
    fn exhausted(&self) -> bool;
    /// Returns true when the stream is closed and empty
    fn eof(&self) -> bool;
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new(Encoding::UTF8)
    }
}

impl Stream for ByteStream {
    fn read(&self) -> Character {
        let (ch, _) = self.read_with_length();
        ch
    }

    fn read_and_next(&self) -> Character {
        let (ch, len) = self.read_with_length();

        {
            let mut pos = self.buffer_pos.borrow_mut();
            *pos += len;
        }

        // A CRLF pair reads as a single LF
        if ch == Ch(CHAR_CR) && self.read() == Ch(CHAR_LF) {
            self.next();
            return Ch(CHAR_LF);
        }

        ch
    }

    /// Looks ahead in the stream, can use an optional index if we want to seek further
    /// in the stream.
    fn look_ahead(&self, offset: usize) -> Character {
        if self.buffer.is_empty() {
            return StreamEnd;
        }

        let original_pos = *self.buffer_pos.borrow();

        self.next_n(offset);
        let ch = self.read();

        let mut pos = self.buffer_pos.borrow_mut();
        *pos = original_pos;

        ch
    }

    fn next(&self) {
        self.next_n(1);
    }

    fn next_n(&self, offset: usize) {
        for _ in 0..offset {
            let (_, len) = self.read_with_length();
            if len == 0 {
                return;
            }

            let mut pos = self.buffer_pos.borrow_mut();
            *pos += len;
        }
    }

    fn reset_stream(&self) {
        let mut pos = self.buffer_pos.borrow_mut();
        *pos = 0;
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn closed(&self) -> bool {
        self.closed
    }

    fn exhausted(&self) -> bool {
        *self.buffer_pos.borrow() >= self.buffer.len()
    }

    /// Returns true when the stream is closed and all the bytes have been read
    fn eof(&self) -> bool {
        self.closed() && self.exhausted()
    }
}

impl ByteStream {
    /// Create a new empty input stream with the given encoding
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        Self {
            buffer: Vec::new(),
            buffer_pos: RefCell::new(0),
            closed: false,
            encoding,
        }
    }

    // Read the character and return it together with the number of bytes the character took
    fn read_with_length(&self) -> (Character, usize) {
        let buf_pos = *self.buffer_pos.borrow();

        if self.buffer.is_empty() || buf_pos >= self.buffer.len() {
            if self.closed {
                return (StreamEnd, 0);
            }
            return (StreamEmpty, 0);
        }

        match self.encoding {
            Encoding::ASCII => {
                let b = self.buffer[buf_pos];
                if b > 127 {
                    (Ch(REPLACEMENT_CHARACTER), 1)
                } else {
                    (Ch(b as char), 1)
                }
            }
            Encoding::UTF8 => {
                let first_byte = self.buffer[buf_pos];
                let width = utf8_char_width(first_byte);

                if buf_pos + width > self.buffer.len() {
                    // Truncated multi-byte sequence at the end of the buffer
                    return (Ch(REPLACEMENT_CHARACTER), self.buffer.len() - buf_pos);
                }

                let ch = match width {
                    1 => u32::from(first_byte),
                    2 => ((u32::from(first_byte) & 0x1F) << 6) | (u32::from(self.buffer[buf_pos + 1]) & 0x3F),
                    3 => {
                        ((u32::from(first_byte) & 0x0F) << 12)
                            | ((u32::from(self.buffer[buf_pos + 1]) & 0x3F) << 6)
                            | (u32::from(self.buffer[buf_pos + 2]) & 0x3F)
                    }
                    4 => {
                        ((u32::from(first_byte) & 0x07) << 18)
                            | ((u32::from(self.buffer[buf_pos + 1]) & 0x3F) << 12)
                            | ((u32::from(self.buffer[buf_pos + 2]) & 0x3F) << 6)
                            | (u32::from(self.buffer[buf_pos + 3]) & 0x3F)
                    }
                    _ => 0xFFFD, // Invalid UTF-8 byte sequence
                };

                (char::from_u32(ch).map_or(Ch(REPLACEMENT_CHARACTER), Ch), width)
            }
        }
    }

    /// Populates the current buffer with the contents of the given string s
    pub fn read_from_str(&mut self, s: &str) {
        self.buffer = Vec::from(s.as_bytes());
        self.reset_stream();
    }

    /// Populates the current buffer directly from bytes
    pub fn read_from_bytes(&mut self, bytes: &[u8]) {
        self.buffer = bytes.to_vec();
        self.reset_stream();
    }

    /// Changes the encoding that the decoder uses to read the buffer
    pub fn set_encoding(&mut self, e: Encoding) {
        self.encoding = e;
    }

    /// Detect the encoding of the buffered bytes from stream analysis. Returns an error for
    /// any encoding the parser cannot decode; the input is then rejected as a whole rather
    /// than scanned.
    pub fn detect_encoding(&self) -> RcssResult<Encoding> {
        if self.buffer.is_ascii() {
            return Ok(Encoding::ASCII);
        }

        // Skip a UTF-8 BOM if present
        if self.buffer.starts_with(b"\xEF\xBB\xBF") {
            return Ok(Encoding::UTF8);
        }

        let mut encoding_detector = chardetng::EncodingDetector::new();
        encoding_detector.feed(&self.buffer, true);

        let encoding = encoding_detector.guess(None, true);
        if encoding == encoding_rs::UTF_8 && std::str::from_utf8(&self.buffer).is_ok() {
            Ok(Encoding::UTF8)
        } else {
            Err(RcssError::InvalidEncoding(encoding.name().to_string()))
        }
    }
}

/// Location holds a position of an element in the data source
#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
    /// Byte offset, starting with 0
    pub offset: usize,
}

impl Default for Location {
    /// Default to line 1, column 1
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Location {
    /// Create a new Location
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// Span holds the start and end position of an element in the data source
#[derive(Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    /// Create a new Span between the two given locations
    #[must_use]
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// A zero-width span on the given location
    #[must_use]
    pub fn empty(location: Location) -> Self {
        Self {
            start: location,
            end: location,
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}-{}:{})", self.start.line, self.start.column, self.end.line, self.end.column)
    }
}

/// LocationHandler is a wrapper that will deal with line/column locations in the stream
pub struct LocationHandler {
    /// The current location of the stream
    pub cur_location: Location,
}

impl LocationHandler {
    /// Create a new LocationHandler. The start location can be set in case the stream is
    /// not starting at 1:1
    #[must_use]
    pub fn new(start_location: Location) -> Self {
        Self {
            cur_location: start_location,
        }
    }

    /// Will increase the current location based on the given character
    pub fn inc(&mut self, ch: Character) {
        match ch {
            Ch(CHAR_LF) => {
                self.cur_location.line += 1;
                self.cur_location.column = 1;
                self.cur_location.offset += 1;
            }
            Ch(_) => {
                self.cur_location.column += 1;
                self.cur_location.offset += 1;
            }
            StreamEnd | StreamEmpty => {}
        }
    }
}

/// Returns the width of the given UTF8 character, which is based on the first byte
#[inline]
fn utf8_char_width(first_byte: u8) -> usize {
    if first_byte < 0x80 {
        1
    } else {
        2 + usize::from(first_byte >= 0xE0) + usize::from(first_byte >= 0xF0)
    }
}
