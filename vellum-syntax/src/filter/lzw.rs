use crate::bit_reader::BitReader;
use crate::filter::predictor::PredictorParams;
use crate::object::Dict;
use crate::xref::XRef;
use log::warn;

const CLEAR_TABLE: usize = 256;
const EOD: usize = 257;
const FIRST_FREE: usize = 258;
const MAX_ENTRIES: usize = 4096;

pub(crate) fn decode(data: &[u8], params: Option<&Dict>, xref: &XRef) -> Option<Vec<u8>> {
    let params = PredictorParams::from_params(params, xref);
    let decoded = decode_codes(data, params.early_change)?;

    params.apply(decoded)
}

fn decode_codes(data: &[u8], early_change: bool) -> Option<Vec<u8>> {
    // Each entry is stored as (prefix entry, last byte, length), so that adding an
    // entry doesn't need to copy the prefix.
    let mut table: Vec<(usize, u8, usize)> = (0..=255u8).map(|b| (usize::MAX, b, 1)).collect();
    table.push((usize::MAX, 0, 0));
    table.push((usize::MAX, 0, 0));

    let mut reader = BitReader::new(data);
    let mut out = vec![];
    let mut prev: Option<usize> = None;

    loop {
        let width = code_width(table.len(), early_change);

        let Some(code) = reader.read(width) else {
            warn!("LZW stream has no end-of-data marker");

            return Some(out);
        };

        let code = code as usize;

        match code {
            CLEAR_TABLE => {
                table.truncate(FIRST_FREE);
                prev = None;
            }
            EOD => return Some(out),
            _ => {
                let start = out.len();

                if code < table.len() {
                    write_entry(&table, code, &mut out)?;

                    if let Some(prev) = prev {
                        push_entry(&mut table, prev, out[start]);
                    }
                } else if code == table.len() {
                    // The entry that is about to be defined: previous entry plus its
                    // own first byte.
                    let prev = prev?;
                    write_entry(&table, prev, &mut out)?;
                    let first = out[start];
                    out.push(first);
                    push_entry(&mut table, prev, first);
                } else {
                    warn!("invalid LZW code {code}");

                    return Some(out);
                }

                prev = Some(code);
            }
        }
    }
}

fn write_entry(table: &[(usize, u8, usize)], code: usize, out: &mut Vec<u8>) -> Option<()> {
    let len = table.get(code)?.2;
    let start = out.len();
    out.resize(start + len, 0);

    let mut cur = code;

    for i in (0..len).rev() {
        let (prefix, byte, _) = *table.get(cur)?;
        out[start + i] = byte;
        cur = prefix;
    }

    Some(())
}

fn push_entry(table: &mut Vec<(usize, u8, usize)>, prefix: usize, byte: u8) {
    if table.len() < MAX_ENTRIES {
        let len = table[prefix].2 + 1;
        table.push((prefix, byte, len));
    }
}

fn code_width(table_len: usize, early_change: bool) -> u8 {
    let next = table_len + usize::from(early_change);

    match next {
        0..=511 => 9,
        512..=1023 => 10,
        1024..=2047 => 11,
        _ => 12,
    }
}
