//! Character classes of the PDF token grammar.

/// Whether the byte is one of the six PDF white-space characters.
#[inline(always)]
pub fn is_white_space_character(byte: u8) -> bool {
    matches!(byte, 0x00 | 0x09 | 0x0a | 0x0c | 0x0d | 0x20)
}

/// Whether the byte terminates a token without being white space.
#[inline(always)]
pub fn is_delimiter_character(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Whether the byte can be part of a keyword, number or name.
#[inline(always)]
pub fn is_regular_character(byte: u8) -> bool {
    !is_white_space_character(byte) && !is_delimiter_character(byte)
}

/// Whether the byte is an end-of-line marker.
#[inline(always)]
pub fn is_eol_character(byte: u8) -> bool {
    matches!(byte, 0x0a | 0x0d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_disjoint() {
        for b in 0..=255u8 {
            let classes = [
                is_white_space_character(b),
                is_delimiter_character(b),
                is_regular_character(b),
            ];

            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "byte {b}");
        }
    }

    #[test]
    fn eol_is_white_space() {
        assert!(is_white_space_character(b'\n'));
        assert!(is_eol_character(b'\r'));
        assert!(!is_eol_character(b' '));
    }
}
