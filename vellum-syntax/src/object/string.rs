//! Strings.

use std::fmt;
use std::sync::Arc;

/// A PDF string (literal or hexadecimal), with escapes decoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PdfString(Arc<[u8]>);

impl PdfString {
    /// Create a new string from its decoded bytes.
    pub fn new(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }

    /// The bytes of the string.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode the string as text. Handles UTF-16BE with a byte order mark and falls
    /// back to Latin-1 otherwise.
    pub fn to_text(&self) -> String {
        match self.0.as_ref() {
            [0xfe, 0xff, rest @ ..] => {
                let units = rest
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]));

                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
            bytes => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl From<&[u8]> for PdfString {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for PdfString {
    fn from(value: Vec<u8>) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Debug for PdfString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", String::from_utf8_lossy(&self.0))
    }
}

/// Decode the body of a literal string, i.e. everything between the outer parentheses.
pub(crate) fn decode_literal(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        i += 1;

        if b == b'\r' {
            // A bare end-of-line in a literal string always means `\n`.
            if raw.get(i) == Some(&b'\n') {
                i += 1;
            }

            out.push(b'\n');
            continue;
        }

        if b != b'\\' {
            out.push(b);
            continue;
        }

        let Some(&e) = raw.get(i) else {
            break;
        };
        i += 1;

        match e {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'\r' => {
                // Line continuation.
                if raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = (e - b'0') as u16;

                for _ in 0..2 {
                    match raw.get(i) {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + (d - b'0') as u16;
                            i += 1;
                        }
                        _ => break,
                    }
                }

                out.push(value as u8);
            }
            other => out.push(other),
        }
    }

    out
}

/// Decode the body of a hex string, i.e. everything between `<` and `>`.
pub(crate) fn decode_hex(raw: &[u8]) -> Vec<u8> {
    let digits = raw
        .iter()
        .filter_map(|b| (*b as char).to_digit(16))
        .map(|d| d as u8)
        .collect::<Vec<_>>();

    // An odd number of digits behaves as if a trailing zero followed.
    digits
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
        .collect()
}
