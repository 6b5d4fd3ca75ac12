//! Reading content streams.
//!
//! A content stream is a flat sequence of operands followed by the command that
//! consumes them. [`ContentParser`] yields these one at a time, leaving operand
//! bookkeeping to the caller.

use crate::parser::{Lexer, Token, parse_object};
use crate::object::Object;
use crate::reader::find_subslice;
use crate::trivia::{is_regular_character, is_white_space_character};
use log::warn;
use std::fmt;

/// The name of a content stream command, like `re` or `Tj`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command<'a>(&'a [u8]);

impl<'a> Command<'a> {
    /// Create a new command from its name.
    pub fn new(name: &'a [u8]) -> Self {
        Self(name)
    }

    /// The bytes of the command name.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// The command name as a string.
    pub fn as_str(&self) -> &'a str {
        std::str::from_utf8(self.0).unwrap_or("?")
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0))
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0))
    }
}

/// A single item of a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken<'a> {
    /// An operand.
    Operand(Object),
    /// A command.
    Command(Command<'a>),
}

/// A parser for content streams.
pub struct ContentParser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> ContentParser<'a> {
    /// Create a new parser over decoded content stream data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(data),
        }
    }

    /// The current byte offset into the content stream.
    pub fn offset(&self) -> usize {
        self.lexer.offset()
    }

    /// Read the binary data of an inline image. Must be called right after the
    /// `ID` command has been returned.
    ///
    /// `length` is the value of the `L`/`Length` entry of the inline image
    /// dictionary, if present. It is only trusted if it is followed by `EI`.
    /// Afterwards, the parser is positioned after the `EI` command.
    pub fn inline_image_data(&mut self, length: Option<usize>) -> Option<&'a [u8]> {
        let reader = self.lexer.reader_mut();
        let data = reader.data();

        // Exactly one white-space character separates `ID` from the data.
        if reader.peek_byte().is_some_and(is_white_space_character) {
            reader.forward();
        }

        let start = reader.offset();

        if let Some(len) = length {
            let end = start.checked_add(len)?;

            if let Some(tail) = data.get(end..) {
                let after = skip_ws(tail);

                if tail[after..].starts_with(b"EI") && ends_command(&tail[after + 2..]) {
                    reader.jump(end + after + 2);

                    return Some(&data[start..end]);
                }
            }
        }

        let mut search = start;

        loop {
            let Some(pos) = find_subslice(&data[search..], b"EI").map(|p| p + search) else {
                warn!("inline image data is not terminated by EI");
                reader.jump(data.len());

                return None;
            };

            let preceded_by_ws = pos == start
                || data
                    .get(pos - 1)
                    .copied()
                    .is_some_and(is_white_space_character);

            if preceded_by_ws
                && ends_command(&data[pos + 2..])
                && looks_like_content(&data[pos + 2..])
            {
                let end = if pos > start { pos - 1 } else { pos };
                reader.jump(pos + 2);

                return Some(&data[start..end]);
            }

            search = pos + 2;
        }
    }
}

impl<'a> Iterator for ContentParser<'a> {
    type Item = ContentToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = self.lexer.next_token()?;

            match token {
                Token::Keyword(k) if !matches!(k, b"true" | b"false" | b"null") => {
                    return Some(ContentToken::Command(Command(k)));
                }
                Token::ArrayEnd | Token::DictEnd => {
                    warn!("unbalanced delimiter at offset {}", self.lexer.offset());
                }
                token => {
                    if let Some(obj) = parse_object(&mut self.lexer, token, false) {
                        return Some(ContentToken::Operand(obj));
                    }
                }
            }
        }
    }
}

fn skip_ws(data: &[u8]) -> usize {
    data.iter()
        .position(|b| !is_white_space_character(*b))
        .unwrap_or(data.len())
}

fn ends_command(rest: &[u8]) -> bool {
    rest.first().is_none_or(|b| !is_regular_character(*b))
}

// Binary image data can contain `EI` by accident. Require that whatever comes next
// is plain ASCII, as real content operators would be.
fn looks_like_content(rest: &[u8]) -> bool {
    rest.iter()
        .take(32)
        .all(|b| b.is_ascii_graphic() || is_white_space_character(*b))
}
