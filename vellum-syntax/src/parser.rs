//! The PDF token grammar and an object parser on top of it.

use crate::object::string::{decode_hex, decode_literal};
use crate::object::{Array, Dict, Name, Number, ObjRef, Object, PdfString};
use crate::reader::Reader;
use crate::trivia::is_regular_character;
use log::warn;

// Arrays and dictionaries nested deeper than this are cut off.
const MAX_NESTING: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Number(Number),
    Name(Name),
    String(PdfString),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
    Keyword(&'a [u8]),
}

#[derive(Clone)]
pub(crate) struct Lexer<'a> {
    reader: Reader<'a>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    pub(crate) fn new_at(data: &'a [u8], offset: usize) -> Self {
        Self {
            reader: Reader::new_at(data, offset),
        }
    }

    pub(crate) fn reader(&self) -> &Reader<'a> {
        &self.reader
    }

    pub(crate) fn reader_mut(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }

    pub(crate) fn offset(&self) -> usize {
        self.reader.offset()
    }

    pub(crate) fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            self.reader.skip_white_spaces_and_comments();

            let b = self.reader.peek_byte()?;

            match b {
                b'/' => {
                    self.reader.forward();
                    let raw = self.reader.forward_while(is_regular_character);

                    return Some(Token::Name(Name::from_escaped(raw)));
                }
                b'(' => {
                    self.reader.forward();

                    return Some(Token::String(self.literal_string()));
                }
                b'<' => {
                    self.reader.forward();

                    if self.reader.peek_byte() == Some(b'<') {
                        self.reader.forward();

                        return Some(Token::DictStart);
                    }

                    let raw = self.reader.forward_while(|b| b != b'>');
                    self.reader.forward();

                    return Some(Token::String(PdfString::from(decode_hex(raw))));
                }
                b'>' => {
                    self.reader.forward();

                    if self.reader.peek_byte() == Some(b'>') {
                        self.reader.forward();

                        return Some(Token::DictEnd);
                    }

                    warn!("stray `>` at offset {}", self.reader.offset());
                }
                b'[' => {
                    self.reader.forward();

                    return Some(Token::ArrayStart);
                }
                b']' => {
                    self.reader.forward();

                    return Some(Token::ArrayEnd);
                }
                b')' | b'{' | b'}' => {
                    warn!(
                        "unexpected `{}` at offset {}",
                        b as char,
                        self.reader.offset()
                    );
                    self.reader.forward();
                }
                _ => {
                    let raw = self.reader.forward_while(is_regular_character);

                    if matches!(raw.first(), Some(b'0'..=b'9' | b'+' | b'-' | b'.')) {
                        if let Some(n) = Number::parse(raw) {
                            return Some(Token::Number(n));
                        }
                    }

                    return Some(Token::Keyword(raw));
                }
            }
        }
    }

    fn literal_string(&mut self) -> PdfString {
        let start = self.reader.offset();
        let mut depth = 1u32;

        while let Some(b) = self.reader.read_byte() {
            match b {
                b'\\' => self.reader.forward(),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;

                    if depth == 0 {
                        let raw = &self.reader.data()[start..self.reader.offset() - 1];

                        return PdfString::from(decode_literal(raw));
                    }
                }
                _ => {}
            }
        }

        warn!("unterminated literal string");

        PdfString::from(decode_literal(&self.reader.data()[start..]))
    }
}

/// Parse the object starting with `first`, reading further tokens from the lexer
/// as needed. With `allow_refs`, `N G R` sequences are turned into references.
pub(crate) fn parse_object<'a>(
    lexer: &mut Lexer<'a>,
    first: Token<'a>,
    allow_refs: bool,
) -> Option<Object> {
    parse_object_impl(lexer, first, allow_refs, 0)
}

fn parse_object_impl<'a>(
    lexer: &mut Lexer<'a>,
    first: Token<'a>,
    allow_refs: bool,
    depth: u32,
) -> Option<Object> {
    if depth > MAX_NESTING {
        warn!("objects are nested too deeply");

        return None;
    }

    match first {
        Token::Number(n) => {
            if allow_refs && let Some(r) = try_reference(lexer, n) {
                return Some(Object::Ref(r));
            }

            Some(Object::Number(n))
        }
        Token::Name(n) => Some(Object::Name(n)),
        Token::String(s) => Some(Object::String(s)),
        Token::Keyword(b"true") => Some(Object::Boolean(true)),
        Token::Keyword(b"false") => Some(Object::Boolean(false)),
        Token::Keyword(b"null") => Some(Object::Null),
        Token::ArrayStart => {
            let mut items = vec![];

            loop {
                match lexer.next_token() {
                    None => {
                        warn!("unterminated array");

                        break;
                    }
                    Some(Token::ArrayEnd) => break,
                    Some(token) => {
                        if let Some(obj) = parse_object_impl(lexer, token, allow_refs, depth + 1)
                        {
                            items.push(obj);
                        }
                    }
                }
            }

            Some(Object::Array(Array::new(items)))
        }
        Token::DictStart => {
            let mut entries = vec![];

            loop {
                match lexer.next_token() {
                    None => {
                        warn!("unterminated dictionary");

                        break;
                    }
                    Some(Token::DictEnd) => break,
                    Some(Token::Name(key)) => {
                        let Some(token) = lexer.next_token() else {
                            break;
                        };

                        if token == Token::DictEnd {
                            break;
                        }

                        if let Some(value) = parse_object_impl(lexer, token, allow_refs, depth + 1)
                        {
                            entries.push((key, value));
                        }
                    }
                    Some(other) => {
                        warn!("ignoring non-name dictionary key {other:?}");
                    }
                }
            }

            Some(Object::Dict(entries.into_iter().collect::<Dict>()))
        }
        Token::ArrayEnd | Token::DictEnd | Token::Keyword(_) => None,
    }
}

fn try_reference(lexer: &mut Lexer<'_>, num: Number) -> Option<ObjRef> {
    let Number::Integer(num) = num else {
        return None;
    };

    let mut lookahead = lexer.clone();

    let Some(Token::Number(Number::Integer(gen_num))) = lookahead.next_token() else {
        return None;
    };

    if lookahead.next_token() != Some(Token::Keyword(b"R")) {
        return None;
    }

    *lexer = lookahead;

    Some(ObjRef::new(u32::try_from(num).ok()?, u16::try_from(gen_num).ok()?))
}

/// Parse a single object from the start of `data`.
#[cfg(test)]
pub(crate) fn parse_single(data: &[u8]) -> Option<Object> {
    let mut lexer = Lexer::new(data);
    let first = lexer.next_token()?;

    parse_object(&mut lexer, first, true)
}
