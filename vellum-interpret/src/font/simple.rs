use crate::font::encoding_tables::{MAC_ROMAN, STANDARD, WIN_ANSI};
use crate::font::{FontChar, FontFlags, FontType, glyph_name_to_unicode};
use crate::util::OptionLog;
use kurbo::Affine;
use log::warn;
use rustc_hash::FxHashMap;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Name, Object, Stream};

// Advance of characters in fonts without a `Widths` array, in glyph units.
const FALLBACK_WIDTH: f64 = 500.0;

/// A font with single-byte character codes: Type 1, MMType1, TrueType or Type 3.
#[derive(Debug)]
pub(crate) struct SimpleFont {
    font_type: FontType,
    names: Vec<Option<String>>,
    widths: Option<Vec<f64>>,
    first_char: u32,
    missing_width: f64,
    font_matrix: Affine,
    char_procs: FxHashMap<u8, Stream>,
    resources: Option<Dict>,
}

impl SimpleFont {
    pub(crate) fn new(dict: &Dict, font_type: FontType, flags: FontFlags, xref: &XRef) -> Self {
        let names = glyph_names(dict, font_type, flags, xref);
        let widths = dict.get::<Array>(WIDTHS, xref).map(|a| {
            a.iter()
                .map(|w| xref.resolve(w).as_number().map(|n| n.as_f64()).unwrap_or(0.0))
                .collect::<Vec<_>>()
        });
        let missing_width = dict
            .get::<Dict>(FONT_DESCRIPTOR, xref)
            .and_then(|d| d.get::<f64>(MISSING_WIDTH, xref))
            .unwrap_or(0.0);

        let (font_matrix, char_procs, resources) = if font_type == FontType::Type3 {
            let font_matrix = dict
                .get::<Affine>(FONT_MATRIX, xref)
                .warn_none("Type 3 font without a font matrix")
                .unwrap_or(Affine::scale(0.001));
            let procs = dict.get::<Dict>(CHAR_PROCS, xref).unwrap_or_default();
            let char_procs = names
                .iter()
                .enumerate()
                .filter_map(|(code, name)| {
                    let stream = procs.get::<Stream>(name.as_ref()?.as_bytes(), xref)?;

                    Some((code as u8, stream))
                })
                .collect();

            (font_matrix, char_procs, dict.get::<Dict>(RESOURCES, xref))
        } else {
            (Affine::scale(0.001), FxHashMap::default(), None)
        };

        Self {
            font_type,
            names,
            widths,
            first_char: dict.get::<u32>(FIRST_CHAR, xref).unwrap_or(0),
            missing_width,
            font_matrix,
            char_procs,
            resources,
        }
    }

    pub(crate) fn font_matrix(&self) -> Affine {
        self.font_matrix
    }

    pub(crate) fn char_proc(&self, code: u32) -> Option<Stream> {
        u8::try_from(code)
            .ok()
            .and_then(|c| self.char_procs.get(&c))
            .cloned()
    }

    pub(crate) fn resources(&self) -> Option<&Dict> {
        self.resources.as_ref()
    }

    fn width(&self, code: u8) -> f64 {
        let Some(widths) = &self.widths else {
            return FALLBACK_WIDTH;
        };

        (code as u32)
            .checked_sub(self.first_char)
            .and_then(|i| widths.get(i as usize).copied())
            .unwrap_or(self.missing_width)
    }

    pub(crate) fn next_char(&self, bytes: &[u8]) -> Option<FontChar> {
        let code = *bytes.first()?;
        let width = self.width(code);
        let dx = if self.font_type == FontType::Type3 {
            width * self.font_matrix.as_coeffs()[0]
        } else {
            width / 1000.0
        };
        let unicode = self.names[code as usize]
            .as_deref()
            .and_then(glyph_name_to_unicode)
            .unwrap_or_default();

        Some(FontChar {
            code: code as u32,
            len: 1,
            unicode,
            dx,
            dy: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
        })
    }
}

fn base_encoding(name: &[u8]) -> Option<&'static phf::Map<u8, &'static str>> {
    match name {
        STANDARD_ENCODING => Some(&STANDARD),
        WIN_ANSI_ENCODING => Some(&WIN_ANSI),
        MAC_ROMAN_ENCODING => Some(&MAC_ROMAN),
        _ => {
            warn!("unsupported base encoding {}", String::from_utf8_lossy(name));

            None
        }
    }
}

fn glyph_names(dict: &Dict, font_type: FontType, flags: FontFlags, xref: &XRef) -> Vec<Option<String>> {
    let symbolic = flags.contains(FontFlags::SYMBOLIC) && !flags.contains(FontFlags::NON_SYMBOLIC);
    let builtin = match font_type {
        FontType::Type3 => None,
        _ if symbolic => None,
        FontType::TrueType => Some(&WIN_ANSI),
        _ => Some(&STANDARD),
    };

    let encoding = dict.get::<Object>(ENCODING, xref);
    let (base, differences) = match &encoding {
        Some(Object::Name(n)) => (base_encoding(n.as_bytes()).or(builtin), None),
        Some(Object::Dict(d)) => {
            let base = match d.get::<Name>(BASE_ENCODING, xref) {
                Some(n) => base_encoding(n.as_bytes()).or(builtin),
                None => builtin,
            };

            (base, d.get::<Array>(DIFFERENCES, xref))
        }
        _ => (builtin, None),
    };

    let mut names = (0..=255u8)
        .map(|code| base.and_then(|b| b.get(&code)).map(|n| n.to_string()))
        .collect::<Vec<_>>();

    if let Some(differences) = differences {
        let mut code = 0usize;

        for obj in differences.iter() {
            match xref.resolve(obj) {
                Object::Number(n) => code = n.as_i64().clamp(0, 256) as usize,
                Object::Name(n) => {
                    if let Some(slot) = names.get_mut(code) {
                        *slot = Some(n.as_str().into_owned());
                    }

                    code += 1;
                }
                _ => {}
            }
        }
    }

    names
}
