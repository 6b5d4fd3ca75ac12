//! Fonts, as far as the interpreter needs them: decoding strings into character codes,
//! their advances and their Unicode text.
//!
//! Glyph outlines are not loaded. Builders that want to draw glyphs get the font
//! dictionary and can use the font program themselves.

use crate::diagnostic::Diagnostic;
use crate::font::cid::CidFont;
use crate::font::cmap::ToUnicode;
use crate::font::simple::SimpleFont;
use bitflags::bitflags;
use kurbo::Affine;
use std::sync::Arc;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Dict, Name, Stream};

mod cid;
pub mod cmap;
mod encoding_tables;
mod glyph_names;
mod simple;

bitflags! {
    /// Bitflags describing various characteristics of fonts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontFlags: u32 {
        const FIXED_PITCH = 1 << 0;
        const SERIF = 1 << 1;
        const SYMBOLIC = 1 << 2;
        const SCRIPT = 1 << 3;
        const NON_SYMBOLIC = 1 << 5;
        const ITALIC = 1 << 6;
        const ALL_CAP = 1 << 16;
        const SMALL_CAP = 1 << 17;
        const FORCE_BOLD = 1 << 18;
    }
}

/// The subtype of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontType {
    /// A Type 1 font.
    Type1,
    /// A multiple master font.
    MmType1,
    /// A TrueType font.
    TrueType,
    /// A Type 3 font, whose glyphs are content streams.
    Type3,
    /// A composite font.
    Type0,
}

/// A decoded character of a string.
#[derive(Debug, Clone, PartialEq)]
pub struct FontChar {
    /// The character code.
    pub code: u32,
    /// The number of bytes the code occupies in the string.
    pub len: usize,
    /// The text the character stands for, empty if unknown.
    pub unicode: String,
    /// The horizontal advance, in text space units for a font size of 1.
    pub dx: f64,
    /// The vertical advance.
    pub dy: f64,
    /// The horizontal displacement of the glyph origin in vertical writing mode.
    pub origin_x: f64,
    /// The vertical displacement of the glyph origin in vertical writing mode.
    pub origin_y: f64,
}

/// A font.
#[derive(Clone, Debug)]
pub struct Font(Arc<FontInner>);

#[derive(Debug)]
struct FontInner {
    font_type: FontType,
    dict: Dict,
    base_font: Option<Name>,
    flags: FontFlags,
    to_unicode: Option<ToUnicode>,
    kind: FontKind,
}

#[derive(Debug)]
enum FontKind {
    Simple(SimpleFont),
    Cid(CidFont),
}

impl Font {
    /// Load a font from its dictionary.
    pub fn new(dict: &Dict, xref: &XRef) -> Result<Self, Diagnostic> {
        let subtype = dict.get::<Name>(SUBTYPE, xref).ok_or_else(|| bad_font("no subtype"))?;
        let font_type = match subtype.as_bytes() {
            TYPE1 => FontType::Type1,
            MM_TYPE1 => FontType::MmType1,
            TRUE_TYPE => FontType::TrueType,
            TYPE3 => FontType::Type3,
            TYPE0 => FontType::Type0,
            _ => return Err(bad_font(&format!("unknown subtype {subtype}"))),
        };

        let to_unicode = dict
            .get::<Stream>(TO_UNICODE, xref)
            .and_then(|s| s.decoded(xref))
            .map(|data| ToUnicode::parse(&data));

        let (kind, flags) = if font_type == FontType::Type0 {
            let cid = CidFont::new(dict, xref)?;
            let flags = cid.flags();

            (FontKind::Cid(cid), flags)
        } else {
            let flags = dict
                .get::<Dict>(FONT_DESCRIPTOR, xref)
                .and_then(|d| d.get::<u32>(FLAGS, xref))
                .map(FontFlags::from_bits_truncate)
                .unwrap_or_default();

            (
                FontKind::Simple(SimpleFont::new(dict, font_type, flags, xref)),
                flags,
            )
        };

        Ok(Self(Arc::new(FontInner {
            font_type,
            dict: dict.clone(),
            base_font: dict.get::<Name>(BASE_FONT, xref),
            flags,
            to_unicode,
            kind,
        })))
    }

    /// The subtype of the font.
    pub fn font_type(&self) -> FontType {
        self.0.font_type
    }

    /// The font dictionary.
    pub fn dict(&self) -> &Dict {
        &self.0.dict
    }

    /// The PostScript name of the font, if any.
    pub fn base_font(&self) -> Option<&Name> {
        self.0.base_font.as_ref()
    }

    /// The flags of the font descriptor.
    pub fn flags(&self) -> FontFlags {
        self.0.flags
    }

    /// The writing mode: 0 for horizontal, 1 for vertical.
    pub fn wmode(&self) -> u8 {
        match &self.0.kind {
            FontKind::Simple(_) => 0,
            FontKind::Cid(c) => c.wmode(),
        }
    }

    /// Whether character codes are always a single byte.
    pub fn is_simple(&self) -> bool {
        matches!(self.0.kind, FontKind::Simple(_))
    }

    /// The font matrix, mapping glyph space to text space.
    pub fn font_matrix(&self) -> Affine {
        match &self.0.kind {
            FontKind::Simple(s) => s.font_matrix(),
            FontKind::Cid(_) => Affine::scale(0.001),
        }
    }

    /// The glyph procedure of a Type 3 character code.
    pub fn char_proc(&self, code: u32) -> Option<Stream> {
        match &self.0.kind {
            FontKind::Simple(s) => s.char_proc(code),
            FontKind::Cid(_) => None,
        }
    }

    /// The resources of the glyph procedures of a Type 3 font.
    pub fn resources(&self) -> Option<&Dict> {
        match &self.0.kind {
            FontKind::Simple(s) => s.resources(),
            FontKind::Cid(_) => None,
        }
    }

    /// Decode the next character of `bytes`.
    ///
    /// Returns `None` once `bytes` is exhausted.
    pub fn next_char(&self, bytes: &[u8]) -> Option<FontChar> {
        let mut c = match &self.0.kind {
            FontKind::Simple(s) => s.next_char(bytes)?,
            FontKind::Cid(c) => c.next_char(bytes)?,
        };

        if let Some(text) = self.0.to_unicode.as_ref().and_then(|t| t.get(c.code)) {
            c.unicode = text.to_string();
        }

        Some(c)
    }
}

/// Map a glyph name to the text it stands for.
///
/// Handles the names of the Latin character set as well as the `uniXXXX` and
/// `uXXXX[XX]` conventions. Suffixes like `.sc` are ignored.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    let base = name.split('.').next().unwrap_or(name);

    if let Some(c) = glyph_names::get(base) {
        return Some(c.to_string());
    }

    if let Some(hex) = base.strip_prefix("uni")
        && !hex.is_empty()
        && hex.len() % 4 == 0
    {
        let units = hex
            .as_bytes()
            .chunks(4)
            .map(|c| std::str::from_utf8(c).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
            .collect::<Option<Vec<_>>>()?;

        return char::decode_utf16(units).collect::<Result<String, _>>().ok();
    }

    if let Some(hex) = base.strip_prefix('u')
        && (4..=6).contains(&hex.len())
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string());
    }

    None
}

fn bad_font(msg: &str) -> Diagnostic {
    Diagnostic::MissingResource {
        category: "font",
        name: msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_syntax::object::{Array, Object};

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_unicode("A").as_deref(), Some("A"));
        assert_eq!(glyph_name_to_unicode("eacute").as_deref(), Some("é"));
        assert_eq!(glyph_name_to_unicode("uni20AC").as_deref(), Some("€"));
        assert_eq!(glyph_name_to_unicode("uni00410042").as_deref(), Some("AB"));
        assert_eq!(glyph_name_to_unicode("u1D400").as_deref(), Some("\u{1d400}"));
        assert_eq!(glyph_name_to_unicode("a.sc").as_deref(), Some("a"));
        assert_eq!(glyph_name_to_unicode("g123"), None);
    }

    #[test]
    fn simple_font() {
        let xref = XRef::new();
        let encoding = Dict::new().with(
            DIFFERENCES,
            Object::Array(Array::new(vec![
                65.into(),
                Name::from("Euro").into(),
                Name::from("uni0416").into(),
            ])),
        );
        let dict = Dict::new()
            .with(TYPE, Name::from("Font"))
            .with(SUBTYPE, Name::from("Type1"))
            .with(BASE_FONT, Name::from("Helvetica"))
            .with(FIRST_CHAR, 32)
            .with(WIDTHS, vec![278, 0, 0])
            .with(ENCODING, encoding);
        let font = Font::new(&dict, &xref).unwrap();

        assert_eq!(font.font_type(), FontType::Type1);
        assert_eq!(font.wmode(), 0);

        let space = font.next_char(b" A").unwrap();
        assert_eq!((space.code, space.len), (32, 1));
        assert_eq!(space.unicode, " ");
        assert_eq!(space.dx, 0.278);

        assert_eq!(font.next_char(b"A").unwrap().unicode, "€");
        assert_eq!(font.next_char(b"B").unwrap().unicode, "Ж");
        assert_eq!(font.next_char(b"c").unwrap().unicode, "c");
        assert!(font.next_char(b"").is_none());
    }

    #[test]
    fn to_unicode_overrides_encoding() {
        let mut xref = XRef::new();
        let cmap = Stream::new(
            Dict::new(),
            b"1 beginbfchar <41> <0042> endbfchar".to_vec(),
        );
        let id = vellum_syntax::object::ObjRef::new(5, 0);
        xref.insert(id, cmap);
        let dict = Dict::new()
            .with(SUBTYPE, Name::from("TrueType"))
            .with(TO_UNICODE, id);
        let font = Font::new(&dict, &xref).unwrap();

        assert_eq!(font.next_char(b"A").unwrap().unicode, "B");
        assert_eq!(font.next_char(b"C").unwrap().unicode, "C");
    }

    #[test]
    fn unknown_subtype() {
        let dict = Dict::new().with(SUBTYPE, Name::from("OpenType"));

        assert!(Font::new(&dict, &XRef::new()).is_err());
    }
}
