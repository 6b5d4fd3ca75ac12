use crate::trivia::is_white_space_character;
use log::warn;

pub(crate) fn decode(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high: Option<u8> = None;

    for &b in data {
        if b == b'>' {
            break;
        }

        if is_white_space_character(b) {
            continue;
        }

        let Some(nibble) = (b as char).to_digit(16) else {
            warn!("invalid character {b:#x} in hex stream");

            return None;
        };

        match high.take() {
            Some(h) => out.push((h << 4) | nibble as u8),
            None => high = Some(nibble as u8),
        }
    }

    if let Some(h) = high {
        out.push(h << 4);
    }

    Some(out)
}
