use crate::filter::predictor::PredictorParams;
use crate::object::Dict;
use crate::xref::XRef;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use log::warn;
use std::io::Read;

pub(crate) fn decode(data: &[u8], params: Option<&Dict>, xref: &XRef) -> Option<Vec<u8>> {
    let decoded = inflate(ZlibDecoder::new(data)).or_else(|| inflate(DeflateDecoder::new(data)))?;

    PredictorParams::from_params(params, xref).apply(decoded)
}

fn inflate(mut decoder: impl Read) -> Option<Vec<u8>> {
    let mut out = vec![];

    match decoder.read_to_end(&mut out) {
        Ok(_) => Some(out),
        // Many files have corrupt or truncated checksums. Keep whatever could be decoded.
        Err(e) if !out.is_empty() => {
            warn!("flate stream is corrupt ({e}), using partial data");

            Some(out)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // zlib stream of `hello hello hello`.
    const HELLO: &[u8] = &[
        0x78, 0x9c, 0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0x57, 0xc8, 0x40, 0x90, 0x00, 0x3a, 0x2e, 0x06,
        0x7d,
    ];

    #[test]
    fn zlib() {
        assert_eq!(
            decode(HELLO, None, &XRef::new()).unwrap(),
            b"hello hello hello"
        );
    }

    #[test]
    fn raw_deflate() {
        assert_eq!(
            decode(&HELLO[2..HELLO.len() - 4], None, &XRef::new()).unwrap(),
            b"hello hello hello"
        );
    }

    #[test]
    fn garbage() {
        assert_eq!(decode(b"\xff\xff\xff", None, &XRef::new()), None);
    }
}
