use log::warn;

pub(crate) fn decode(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = vec![];
    let mut i = 0;

    while let Some(&len) = data.get(i) {
        i += 1;

        match len {
            128 => return Some(out),
            0..=127 => {
                let n = len as usize + 1;
                let Some(run) = data.get(i..i + n) else {
                    warn!("run-length stream ended prematurely");
                    out.extend_from_slice(&data[i..]);

                    return Some(out);
                };

                out.extend_from_slice(run);
                i += n;
            }
            _ => {
                let Some(&b) = data.get(i) else {
                    break;
                };

                out.extend(std::iter::repeat_n(b, 257 - len as usize));
                i += 1;
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::decode;

    #[test]
    fn literal_and_repeat() {
        assert_eq!(
            decode(&[2, b'a', b'b', b'c', 254, b'x', 128, 9]).unwrap(),
            b"abcxxx"
        );
    }

    #[test]
    fn missing_eod() {
        assert_eq!(decode(&[1, b'a']).unwrap(), b"a");
    }
}
