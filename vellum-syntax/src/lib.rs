/*!
A low-level crate for reading PDF files.

This crate provides the object layer that content-stream interpretation sits on top of:

- [`object`]: owned, cheaply clonable PDF objects (numbers, names, strings, arrays,
  dictionaries and streams).
- [`content`]: a token parser for content streams, including support for skipping
  over the binary payload of inline images.
- [`filter`]: the stream filters needed to get at the decoded data of a stream.
- [`XRef`]: an object store that resolves indirect references.
- [`Document`] and [`Page`]: access to the page tree with inherited attributes.

Malformed input results in `None` values and log messages rather than panics, since
real-world files frequently violate the format in small ways.
*/

#![forbid(unsafe_code)]

pub mod bit_reader;
pub mod content;
pub mod document;
pub mod filter;
pub mod object;
pub(crate) mod parser;
pub(crate) mod reader;
pub mod trivia;
pub mod xref;

pub use document::{Document, LoadError, Page, PageBox};
pub use xref::XRef;

use log::warn;

pub(crate) trait OptionLog {
    fn warn_none(self, f: &str) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn warn_none(self, f: &str) -> Self {
        self.or_else(|| {
            warn!("{f}");

            None
        })
    }
}
