use crate::diagnostic::Diagnostic;
use crate::font::cmap::CMap;
use crate::font::{FontChar, FontFlags};
use log::warn;
use rustc_hash::FxHashMap;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Object, Stream};

/// A composite (Type 0) font together with its descendant CIDFont.
#[derive(Debug)]
pub(crate) struct CidFont {
    cmap: CMap,
    flags: FontFlags,
    widths: FxHashMap<u32, f64>,
    dw: f64,
    // The vertical advance and the position vector per CID.
    vertical: FxHashMap<u32, [f64; 3]>,
    dw2: [f64; 2],
}

impl CidFont {
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Result<Self, Diagnostic> {
        let descendant = dict
            .get::<Array>(DESCENDANT_FONTS, xref)
            .and_then(|a| a.get::<Dict>(0, xref))
            .ok_or_else(|| Diagnostic::MissingResource {
                category: "font",
                name: "descendant font".to_string(),
            })?;

        let cmap = match dict.get::<Object>(ENCODING, xref) {
            Some(Object::Name(n)) => CMap::predefined(n.as_bytes()).unwrap_or_else(|| {
                warn!("unsupported CMap {n}, falling back to Identity-H");

                CMap::identity(0)
            }),
            Some(Object::Stream(s)) => cmap_stream(&s, xref),
            _ => {
                warn!("composite font without an encoding, assuming Identity-H");

                CMap::identity(0)
            }
        };

        let flags = descendant
            .get::<Dict>(FONT_DESCRIPTOR, xref)
            .and_then(|d| d.get::<u32>(FLAGS, xref))
            .map(FontFlags::from_bits_truncate)
            .unwrap_or_default();

        let dw2 = descendant
            .get::<Array>(DW2, xref)
            .and_then(|a| a.to_vec::<f64>(xref))
            .and_then(|v| <[f64; 2]>::try_from(v).ok())
            .unwrap_or([880.0, -1000.0]);

        Ok(Self {
            cmap,
            flags,
            widths: descendant
                .get::<Array>(W, xref)
                .map(|w| read_widths(&w, xref))
                .unwrap_or_default(),
            dw: descendant.get::<f64>(DW, xref).unwrap_or(1000.0),
            vertical: descendant
                .get::<Array>(W2, xref)
                .map(|w| read_widths2(&w, xref))
                .unwrap_or_default(),
            dw2,
        })
    }

    pub(crate) fn wmode(&self) -> u8 {
        self.cmap.wmode()
    }

    pub(crate) fn flags(&self) -> FontFlags {
        self.flags
    }

    pub(crate) fn next_char(&self, bytes: &[u8]) -> Option<FontChar> {
        let (code, len) = self.cmap.next_code(bytes)?;
        let cid = self.cmap.cid(code);
        let width = self.widths.get(&cid).copied().unwrap_or(self.dw);

        let (dx, dy, origin_x, origin_y) = if self.wmode() == 1 {
            let [w1, vx, vy] = self
                .vertical
                .get(&cid)
                .copied()
                .unwrap_or([self.dw2[1], width / 2.0, self.dw2[0]]);

            (0.0, w1 / 1000.0, vx / 1000.0, vy / 1000.0)
        } else {
            (width / 1000.0, 0.0, 0.0, 0.0)
        };

        Some(FontChar {
            code,
            len,
            unicode: String::new(),
            dx,
            dy,
            origin_x,
            origin_y,
        })
    }
}

fn cmap_stream(stream: &Stream, xref: &XRef) -> CMap {
    let Some(data) = stream.decoded(xref) else {
        warn!("failed to decode embedded CMap, assuming Identity-H");

        return CMap::identity(0);
    };

    let cmap = CMap::parse(&data);
    let dict = stream.dict();

    if let Some(wmode) = dict.get::<u8>(WMODE, xref) {
        return cmap.with_wmode(wmode);
    }

    // A parent CMap in the stream dictionary only matters for its writing mode.
    match dict.get::<Object>(USE_CMAP, xref) {
        Some(Object::Name(n)) if cmap.wmode() == 0 && n.as_bytes() == IDENTITY_V => {
            cmap.with_wmode(1)
        }
        _ => cmap,
    }
}

// Entries alternate between `c [w1 w2 ...]` and `c_first c_last w`.
fn read_widths(array: &Array, xref: &XRef) -> FxHashMap<u32, f64> {
    let mut widths = FxHashMap::default();
    let mut iter = array.iter().map(|o| xref.resolve(o));

    while let Some(first) = iter.next() {
        let Some(first) = first.as_number().and_then(|n| u32::try_from(n.as_i64()).ok()) else {
            break;
        };

        match iter.next() {
            Some(Object::Array(ws)) => {
                for (i, w) in ws.iter().enumerate() {
                    if let Some(w) = xref.resolve(w).as_number() {
                        widths.insert(first + i as u32, w.as_f64());
                    }
                }
            }
            Some(Object::Number(last)) => {
                let Some(w) = iter.next().and_then(|w| w.as_number()) else {
                    break;
                };
                let last = u32::try_from(last.as_i64()).unwrap_or(0);

                for cid in first..=last.min(first.saturating_add(1 << 16)) {
                    widths.insert(cid, w.as_f64());
                }
            }
            _ => break,
        }
    }

    widths
}

// Like `read_widths`, but every entry is a triple of the vertical advance and the
// position vector: `c [w1y v1x v1y ...]` and `c_first c_last w1y v1x v1y`.
fn read_widths2(array: &Array, xref: &XRef) -> FxHashMap<u32, [f64; 3]> {
    let mut widths = FxHashMap::default();
    let mut iter = array.iter().map(|o| xref.resolve(o));

    while let Some(first) = iter.next() {
        let Some(first) = first.as_number().and_then(|n| u32::try_from(n.as_i64()).ok()) else {
            break;
        };

        match iter.next() {
            Some(Object::Array(ws)) => {
                let values = ws
                    .iter()
                    .filter_map(|w| xref.resolve(w).as_number().map(|n| n.as_f64()))
                    .collect::<Vec<_>>();

                for (i, chunk) in values.chunks_exact(3).enumerate() {
                    widths.insert(first + i as u32, [chunk[0], chunk[1], chunk[2]]);
                }
            }
            Some(Object::Number(last)) => {
                let mut next = || iter.next().and_then(|w| w.as_number()).map(|n| n.as_f64());
                let (Some(w1), Some(vx), Some(vy)) = (next(), next(), next()) else {
                    break;
                };
                let last = u32::try_from(last.as_i64()).unwrap_or(0);

                for cid in first..=last.min(first.saturating_add(1 << 16)) {
                    widths.insert(cid, [w1, vx, vy]);
                }
            }
            _ => break,
        }
    }

    widths
}
