//! A byte cursor used by the lexer, the filters and the object scanner.

use crate::trivia::{is_eol_character, is_white_space_character};

#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub(crate) fn new_at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    #[inline]
    pub(crate) fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn jump(&mut self, offset: usize) {
        self.offset = offset.min(self.data.len());
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    #[inline]
    pub(crate) fn tail(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    #[inline]
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    #[inline]
    pub(crate) fn peek_byte_at(&self, ahead: usize) -> Option<u8> {
        self.data.get(self.offset + ahead).copied()
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.offset += 1;

        Some(b)
    }

    #[inline]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let bytes = self.data.get(self.offset..self.offset.checked_add(len)?)?;
        self.offset += len;

        Some(bytes)
    }

    #[inline]
    pub(crate) fn forward(&mut self) {
        self.offset = (self.offset + 1).min(self.data.len());
    }

    pub(crate) fn forward_tag(&mut self, tag: &[u8]) -> Option<()> {
        if self.tail().starts_with(tag) {
            self.offset += tag.len();

            Some(())
        } else {
            None
        }
    }

    pub(crate) fn forward_while(&mut self, f: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.offset;

        while self.peek_byte().is_some_and(&f) {
            self.offset += 1;
        }

        &self.data[start..self.offset]
    }

    pub(crate) fn skip_white_spaces(&mut self) {
        self.forward_while(is_white_space_character);
    }

    /// Skip a single end-of-line marker (`\r`, `\n` or `\r\n`).
    pub(crate) fn skip_eol(&mut self) {
        if self.peek_byte() == Some(b'\r') {
            self.forward();
        }

        if self.peek_byte() == Some(b'\n') {
            self.forward();
        }
    }

    pub(crate) fn skip_white_spaces_and_comments(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if is_white_space_character(b) => self.skip_white_spaces(),
                Some(b'%') => {
                    self.forward_while(|b| !is_eol_character(b));
                }
                _ => return,
            }
        }
    }

    /// Find the next occurrence of `needle` at or after the current offset.
    pub(crate) fn find(&self, needle: &[u8]) -> Option<usize> {
        find_subslice(self.tail(), needle).map(|pos| pos + self.offset)
    }
}

pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_skipped() {
        let mut r = Reader::new(b"  % a comment\n  % another\r\n42");
        r.skip_white_spaces_and_comments();
        assert_eq!(r.tail(), b"42");
    }

    #[test]
    fn read_past_end() {
        let mut r = Reader::new(b"ab");
        assert_eq!(r.read_bytes(3), None);
        assert_eq!(r.read_bytes(2), Some(&b"ab"[..]));
        assert!(r.at_end());
        assert_eq!(r.read_byte(), None);
    }

    #[test]
    fn find_from_offset() {
        let mut r = Reader::new(b"xxEIyyEI");
        r.jump(3);
        assert_eq!(r.find(b"EI"), Some(6));
    }
}
