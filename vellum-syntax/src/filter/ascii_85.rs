use crate::trivia::is_white_space_character;
use log::warn;

pub(crate) fn decode(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4 / 5);
    let mut group = [0u8; 5];
    let mut len = 0;

    let data = data.strip_prefix(b"<~").unwrap_or(data);

    for &b in data {
        match b {
            b'~' => break,
            b'z' if len == 0 => out.extend_from_slice(&[0; 4]),
            b'!'..=b'u' => {
                group[len] = b - b'!';
                len += 1;

                if len == 5 {
                    out.extend_from_slice(&word(&group)?);
                    len = 0;
                }
            }
            b if is_white_space_character(b) => {}
            b => {
                warn!("invalid character {b:#x} in ASCII85 stream");

                return None;
            }
        }
    }

    if len == 1 {
        warn!("ASCII85 stream has a dangling final character");
    } else if len > 1 {
        // Pad the final group with the highest digit, then drop the padding bytes.
        group[len..].fill(84);
        out.extend_from_slice(&word(&group)?[..len - 1]);
    }

    Some(out)
}

fn word(group: &[u8; 5]) -> Option<[u8; 4]> {
    let value = group
        .iter()
        .fold(0u64, |acc, &d| acc * 85 + d as u64);

    u32::try_from(value).ok().map(u32::to_be_bytes)
}

#[cfg(test)]
mod tests {
    use super::decode;

    #[test]
    fn simple() {
        assert_eq!(decode(b"87cURDZ~>").unwrap(), b"Hello");
        assert_eq!(decode(b"<~87cU RD\nZ~>").unwrap(), b"Hello");
    }

    #[test]
    fn zero_group() {
        assert_eq!(decode(b"z~>").unwrap(), [0; 4]);
    }

    #[test]
    fn overflow() {
        assert_eq!(decode(b"uuuuu~>"), None);
    }
}
