//! The object store.
//!
//! Instead of trusting the cross-reference table of a file, objects are recovered by
//! scanning the whole file for `N G obj` markers. This is slower than reading the table,
//! but works for the many files whose tables are broken, and it means that in-memory
//! documents can be built with the same type.

use crate::document::LoadError;
use crate::object::keys::{CATALOG, ENCRYPT, FIRST, LENGTH, N, OBJ_STM, ROOT, TYPE, XREF};
use crate::object::{Dict, Name, Number, ObjRef, Object, Stream};
use crate::parser::{Lexer, Token, parse_object};
use crate::reader::{Reader, find_subslice};
use crate::trivia::{is_regular_character, is_white_space_character};
use log::{debug, warn};
use rustc_hash::FxHashMap;

// Chains of references to references are followed at most this many times.
const MAX_RESOLVE_DEPTH: u32 = 16;

/// A store of indirect objects, together with the trailer dictionary.
#[derive(Debug, Clone, Default)]
pub struct XRef {
    objects: FxHashMap<ObjRef, Object>,
    trailer: Dict,
}

impl XRef {
    /// Create a new, empty object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all objects of a PDF file.
    pub fn load(data: &[u8]) -> Result<Self, LoadError> {
        let mut xref = Self::new();
        let mut trailers = vec![];

        for (id, offset) in object_markers(data) {
            let Some((obj, _)) = read_indirect_object(data, offset) else {
                debug!("failed to read object {id}");

                continue;
            };

            if let Object::Stream(s) = &obj
                && s.dict().get::<Name>(TYPE, &xref).as_deref() == Some(XREF)
            {
                trailers.push(s.dict().clone());
            }

            // Later definitions override earlier ones, as in incremental updates.
            xref.objects.insert(id, obj);
        }

        if xref.objects.is_empty() {
            return Err(LoadError::NoObjects);
        }

        xref.unpack_object_streams();

        let mut search = 0;

        while let Some(pos) = find_subslice(&data[search..], b"trailer").map(|p| p + search) {
            let mut lexer = Lexer::new_at(data, pos + 7);

            if let Some(Object::Dict(d)) = lexer
                .next_token()
                .and_then(|t| parse_object(&mut lexer, t, true))
            {
                trailers.push(d);
            }

            search = pos + 7;
        }

        // The last trailer with a catalog wins.
        xref.trailer = trailers
            .into_iter()
            .rev()
            .find(|t| t.contains_key(ROOT))
            .or_else(|| xref.synthesize_trailer())
            .ok_or(LoadError::MissingCatalog)?;

        if xref.trailer.contains_key(ENCRYPT) {
            return Err(LoadError::Encrypted);
        }

        Ok(xref)
    }

    /// Insert an object, replacing any existing object with the same identifier.
    pub fn insert(&mut self, id: ObjRef, obj: impl Into<Object>) {
        self.objects.insert(id, obj.into());
    }

    /// Set the trailer dictionary.
    pub fn set_trailer(&mut self, trailer: Dict) {
        self.trailer = trailer;
    }

    /// The trailer dictionary.
    pub fn trailer(&self) -> &Dict {
        &self.trailer
    }

    /// The document catalog.
    pub fn root(&self) -> Option<Dict> {
        self.trailer.get(ROOT, self)
    }

    /// The number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Return the object with the given identifier.
    pub fn get(&self, id: ObjRef) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Resolve an object: references are replaced by the object they point to, or by
    /// the null object if that doesn't exist. Other objects are returned as they are.
    pub fn resolve(&self, obj: &Object) -> Object {
        let mut cur = obj;

        for _ in 0..MAX_RESOLVE_DEPTH {
            match cur {
                Object::Ref(id) => match self.objects.get(id) {
                    Some(next) => cur = next,
                    None => return Object::Null,
                },
                other => return other.clone(),
            }
        }

        warn!("reference chain is too long");

        Object::Null
    }

    fn unpack_object_streams(&mut self) {
        let streams = self
            .objects
            .values()
            .filter_map(|o| o.as_stream())
            .filter(|s| s.dict().get::<Name>(TYPE, self).as_deref() == Some(OBJ_STM))
            .cloned()
            .collect::<Vec<_>>();

        for stream in streams {
            let Some(data) = stream.decoded(self) else {
                continue;
            };

            let n = stream.dict().get::<usize>(N, self).unwrap_or(0);
            let first = stream.dict().get::<usize>(FIRST, self).unwrap_or(0);
            let mut header = Lexer::new(&data);
            let mut entries = vec![];

            for _ in 0..n {
                match (header.next_token(), header.next_token()) {
                    (
                        Some(Token::Number(Number::Integer(num))),
                        Some(Token::Number(Number::Integer(offset))),
                    ) => entries.push((num, offset)),
                    _ => break,
                }
            }

            for (num, offset) in entries {
                let (Ok(num), Ok(offset)) = (u32::try_from(num), usize::try_from(offset)) else {
                    continue;
                };

                let id = ObjRef::new(num, 0);

                if self.objects.contains_key(&id) {
                    continue;
                }

                let mut lexer = Lexer::new_at(&data, first + offset);

                if let Some(obj) = lexer
                    .next_token()
                    .and_then(|t| parse_object(&mut lexer, t, true))
                {
                    self.objects.insert(id, obj);
                }
            }
        }
    }

    fn synthesize_trailer(&self) -> Option<Dict> {
        let (id, _) = self.objects.iter().find(|(_, o)| {
            o.as_dict()
                .and_then(|d| d.get::<Name>(TYPE, self))
                .as_deref()
                == Some(CATALOG)
        })?;

        warn!("file has no trailer, using catalog {id}");

        Some(Dict::new().with(ROOT, *id))
    }
}

/// Find all `N G obj` markers and return the object identifier together with the
/// offset right after `obj`.
fn object_markers(data: &[u8]) -> Vec<(ObjRef, usize)> {
    let mut markers = vec![];
    let mut search = 0;

    while let Some(pos) = find_subslice(&data[search..], b"obj").map(|p| p + search) {
        search = pos + 3;

        if data.get(pos + 3).is_some_and(|b| is_regular_character(*b)) {
            continue;
        }

        if let Some(id) = marker_id(&data[..pos]) {
            markers.push((id, pos + 3));
        }
    }

    markers
}

fn marker_id(before: &[u8]) -> Option<ObjRef> {
    let mut end = before.len();

    let skip_ws = |end: &mut usize| {
        let start = *end;

        while *end > 0 && is_white_space_character(before[*end - 1]) {
            *end -= 1;
        }

        start - *end
    };

    let read_digits = |end: &mut usize| -> Option<u64> {
        let stop = *end;

        while *end > 0 && before[*end - 1].is_ascii_digit() {
            *end -= 1;
        }

        std::str::from_utf8(&before[*end..stop]).ok()?.parse().ok()
    };

    skip_ws(&mut end);
    let gen_num = read_digits(&mut end)?;

    if skip_ws(&mut end) == 0 {
        return None;
    }

    let num = read_digits(&mut end)?;

    if end > 0 && is_regular_character(before[end - 1]) {
        return None;
    }

    Some(ObjRef::new(
        u32::try_from(num).ok()?,
        u16::try_from(gen_num).ok()?,
    ))
}

/// Read the object following an `obj` marker, including stream data. Returns the
/// object and the offset after it.
fn read_indirect_object(data: &[u8], offset: usize) -> Option<(Object, usize)> {
    let mut lexer = Lexer::new_at(data, offset);
    let first = lexer.next_token()?;
    let obj = parse_object(&mut lexer, first, true)?;

    let Object::Dict(dict) = obj else {
        return Some((obj, lexer.offset()));
    };

    let mut after = lexer.clone();

    if after.next_token() != Some(Token::Keyword(b"stream")) {
        return Some((Object::Dict(dict), lexer.offset()));
    }

    let mut r = Reader::new_at(data, after.offset());
    r.skip_eol();
    let start = r.offset();

    let direct_len = match dict.get_raw(LENGTH) {
        Some(Object::Number(n)) => usize::try_from(n.as_i64()).ok(),
        _ => None,
    };

    let end = direct_len
        .and_then(|len| {
            let end = start.checked_add(len)?;
            let mut check = Reader::new_at(data, end);
            check.skip_white_spaces();
            check.forward_tag(b"endstream")?;

            Some(end)
        })
        .or_else(|| {
            let pos = r.find(b"endstream")?;
            let mut end = pos;

            // Strip the end-of-line marker before `endstream`.
            if end > start && data[end - 1] == b'\n' {
                end -= 1;
            }

            if end > start && data[end - 1] == b'\r' {
                end -= 1;
            }

            Some(end)
        })?;

    Some((Object::Stream(Stream::new(dict, &data[start..end])), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::keys::PAGES;

    const FILE: &[u8] = b"%PDF-1.7
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [] /Count 0 >>
endobj
3 0 obj
<< /Length 5 >>
stream
hello
endstream
endobj
4 0 obj
<< /Length 99 >>
stream
bad length
endstream
endobj
trailer
<< /Root 1 0 R /Size 5 >>
%%EOF";

    #[test]
    fn scan_objects() {
        let xref = XRef::load(FILE).unwrap();

        assert_eq!(xref.len(), 4);
        assert!(xref.root().unwrap().contains_key(PAGES));

        let s = xref.get(ObjRef::new(3, 0)).unwrap().as_stream().unwrap();
        assert_eq!(s.raw_data(), b"hello");

        let s = xref.get(ObjRef::new(4, 0)).unwrap().as_stream().unwrap();
        assert_eq!(s.raw_data(), b"bad length");
    }

    #[test]
    fn resolve_missing_is_null() {
        let xref = XRef::new();
        assert_eq!(xref.resolve(&Object::Ref(ObjRef::new(9, 0))), Object::Null);
        assert_eq!(xref.resolve(&Object::from(3)), Object::from(3));
    }

    #[test]
    fn reference_cycle() {
        let mut xref = XRef::new();
        xref.insert(ObjRef::new(1, 0), ObjRef::new(2, 0));
        xref.insert(ObjRef::new(2, 0), ObjRef::new(1, 0));

        assert_eq!(xref.resolve(&Object::Ref(ObjRef::new(1, 0))), Object::Null);
    }

    #[test]
    fn missing_trailer_uses_catalog() {
        let xref = XRef::load(b"7 0 obj << /Type /Catalog >> endobj").unwrap();
        assert_eq!(
            xref.trailer().get_raw(ROOT),
            Some(&Object::Ref(ObjRef::new(7, 0)))
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(XRef::load(b"nothing"), Err(LoadError::NoObjects)));
        assert!(matches!(
            XRef::load(b"1 0 obj << >> endobj"),
            Err(LoadError::MissingCatalog)
        ));
        assert!(matches!(
            XRef::load(b"1 0 obj << /Type /Catalog >> endobj trailer << /Root 1 0 R /Encrypt 5 0 R >>"),
            Err(LoadError::Encrypted)
        ));
    }

    #[test]
    fn marker_needs_white_space() {
        assert_eq!(marker_id(b"x 12 0 "), Some(ObjRef::new(12, 0)));
        assert_eq!(marker_id(b"120 "), None);
        assert_eq!(marker_id(b"a12 0 "), None);
    }
}
