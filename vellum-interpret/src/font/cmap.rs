//! Character maps: the encoding of composite fonts and `ToUnicode` maps.
//!
//! Both are PostScript programs, but in practice only a handful of operators matter.
//! They are tokenized with the content stream parser, since the syntax is the same.

use log::warn;
use rustc_hash::FxHashMap;
use vellum_syntax::content::{ContentParser, ContentToken};
use vellum_syntax::object::Object;

// Guards against absurdly large `bfrange` and `cidrange` entries.
const MAX_RANGE: u32 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodespaceRange {
    low: u32,
    high: u32,
    len: u8,
}

impl CodespaceRange {
    fn matches(&self, code: u32, len: usize) -> bool {
        self.len as usize == len && (self.low..=self.high).contains(&code)
    }
}

/// A CMap mapping character codes of a composite font to CIDs.
#[derive(Debug, Clone)]
pub struct CMap {
    codespace: Vec<CodespaceRange>,
    // Sorted by the start of the range.
    cid_ranges: Vec<(u32, u32, u32)>,
    wmode: u8,
    identity: bool,
}

impl CMap {
    /// The predefined `Identity-H` or `Identity-V` CMap.
    pub fn identity(wmode: u8) -> Self {
        Self {
            codespace: vec![CodespaceRange {
                low: 0,
                high: 0xffff,
                len: 2,
            }],
            cid_ranges: vec![],
            wmode,
            identity: true,
        }
    }

    /// Look up a predefined CMap by name. Only the identity CMaps are supported.
    pub fn predefined(name: &[u8]) -> Option<Self> {
        match name {
            b"Identity-H" => Some(Self::identity(0)),
            b"Identity-V" => Some(Self::identity(1)),
            _ => None,
        }
    }

    /// Parse an embedded CMap program.
    pub fn parse(data: &[u8]) -> Self {
        let mut cmap = Self {
            codespace: vec![],
            cid_ranges: vec![],
            wmode: 0,
            identity: false,
        };

        for (op, operands) in commands(data) {
            match op.as_slice() {
                b"endcodespacerange" => {
                    for pair in operands.chunks_exact(2) {
                        if let (Some((low, len)), Some((high, _))) =
                            (code(&pair[0]), code(&pair[1]))
                        {
                            cmap.codespace.push(CodespaceRange { low, high, len });
                        }
                    }
                }
                b"endcidchar" => {
                    for pair in operands.chunks_exact(2) {
                        if let (Some((c, _)), Some(cid)) = (code(&pair[0]), integer(&pair[1])) {
                            cmap.cid_ranges.push((c, c, cid));
                        }
                    }
                }
                b"endcidrange" => {
                    for triple in operands.chunks_exact(3) {
                        if let (Some((low, _)), Some((high, _)), Some(cid)) =
                            (code(&triple[0]), code(&triple[1]), integer(&triple[2]))
                            && low <= high
                        {
                            cmap.cid_ranges.push((low, high, cid));
                        }
                    }
                }
                b"def" => {
                    if let [Object::Name(n), Object::Number(v)] = operands.as_slice()
                        && n.as_bytes() == b"WMode"
                    {
                        cmap.wmode = (v.as_i64() == 1) as u8;
                    }
                }
                b"usecmap" => {
                    if let Some(Object::Name(n)) = operands.last()
                        && let Some(parent) = Self::predefined(n.as_bytes())
                    {
                        cmap.identity = cmap.cid_ranges.is_empty();
                        if cmap.codespace.is_empty() {
                            cmap.codespace = parent.codespace;
                        }
                    } else {
                        warn!("unsupported parent CMap");
                    }
                }
                _ => {}
            }
        }

        cmap.cid_ranges.sort_by_key(|r| r.0);

        if cmap.codespace.is_empty() {
            warn!("CMap has no codespace ranges, assuming two-byte codes");
            cmap.codespace = Self::identity(0).codespace;
        }

        cmap
    }

    /// The writing mode: 0 for horizontal, 1 for vertical.
    pub fn wmode(&self) -> u8 {
        self.wmode
    }

    /// Override the writing mode.
    pub fn with_wmode(mut self, wmode: u8) -> Self {
        self.wmode = (wmode == 1) as u8;
        self
    }

    /// Read the next character code from `bytes`, returning the code and the number
    /// of bytes it occupies.
    pub fn next_code(&self, bytes: &[u8]) -> Option<(u32, usize)> {
        if bytes.is_empty() {
            return None;
        }

        let mut code = 0u32;

        for len in 1..=bytes.len().min(4) {
            code = (code << 8) | bytes[len - 1] as u32;

            if self.codespace.iter().any(|r| r.matches(code, len)) {
                return Some((code, len));
            }
        }

        // Not in any range, consume as many bytes as the shortest range would.
        let len = self
            .codespace
            .iter()
            .map(|r| r.len as usize)
            .min()
            .unwrap_or(1)
            .min(bytes.len());
        let code = bytes[..len].iter().fold(0, |acc, b| (acc << 8) | *b as u32);

        Some((code, len))
    }

    /// Map a character code to a CID. Unmapped codes map to CID 0.
    pub fn cid(&self, code: u32) -> u32 {
        let idx = self.cid_ranges.partition_point(|r| r.0 <= code);

        // Ranges may overlap, so the closest start isn't necessarily the right one.
        for (low, high, cid) in self.cid_ranges[..idx].iter().rev() {
            if (*low..=*high).contains(&code) {
                return cid + (code - low);
            }
        }

        if self.identity { code } else { 0 }
    }
}

/// A `ToUnicode` map.
#[derive(Debug, Clone, Default)]
pub struct ToUnicode {
    map: FxHashMap<u32, String>,
}

impl ToUnicode {
    /// Parse a `ToUnicode` CMap program.
    pub fn parse(data: &[u8]) -> Self {
        let mut map = FxHashMap::default();

        for (op, operands) in commands(data) {
            match op.as_slice() {
                b"endbfchar" => {
                    for pair in operands.chunks_exact(2) {
                        if let (Some((c, _)), Some(text)) = (code(&pair[0]), utf16(&pair[1])) {
                            map.insert(c, text);
                        }
                    }
                }
                b"endbfrange" => {
                    for triple in operands.chunks_exact(3) {
                        let (Some((low, _)), Some((high, _))) = (code(&triple[0]), code(&triple[1]))
                        else {
                            continue;
                        };

                        if low > high || high - low > MAX_RANGE {
                            continue;
                        }

                        match &triple[2] {
                            Object::Array(dsts) => {
                                for (c, dst) in (low..=high).zip(dsts.iter()) {
                                    if let Some(text) = utf16(dst) {
                                        map.insert(c, text);
                                    }
                                }
                            }
                            Object::String(s) => {
                                for (i, c) in (low..=high).enumerate() {
                                    if let Some(text) = increment(s.as_bytes(), i as u32) {
                                        map.insert(c, text);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        Self { map }
    }

    /// The text of a character code.
    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }
}

// Split a CMap program into commands and the operands since the previous command.
fn commands(data: &[u8]) -> Vec<(Vec<u8>, Vec<Object>)> {
    let mut out = vec![];
    let mut operands = vec![];

    for token in ContentParser::new(data) {
        match token {
            ContentToken::Operand(obj) => operands.push(obj),
            ContentToken::Command(c) => {
                out.push((c.as_bytes().to_vec(), std::mem::take(&mut operands)));
            }
        }
    }

    out
}

fn code(obj: &Object) -> Option<(u32, u8)> {
    let bytes = obj.as_string()?.as_bytes();

    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }

    Some((
        bytes.iter().fold(0, |acc, b| (acc << 8) | *b as u32),
        bytes.len() as u8,
    ))
}

fn integer(obj: &Object) -> Option<u32> {
    u32::try_from(obj.as_number()?.as_i64()).ok()
}

fn decode_utf16(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]));

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn utf16(obj: &Object) -> Option<String> {
    match obj {
        Object::String(s) if s.as_bytes().len() == 1 => Some((s.as_bytes()[0] as char).to_string()),
        Object::String(s) => Some(decode_utf16(s.as_bytes())),
        // Some producers write names instead of strings.
        Object::Name(n) => Some(n.as_str().into_owned()),
        _ => None,
    }
}

// The destination of a `bfrange` is incremented in its last byte.
fn increment(base: &[u8], offset: u32) -> Option<String> {
    let mut bytes = base.to_vec();
    let last = bytes.last_mut()?;
    let sum = *last as u32 + offset;
    *last = (sum & 0xff) as u8;

    if sum > 0xff && bytes.len() >= 2 {
        let idx = bytes.len() - 2;
        bytes[idx] = bytes[idx].wrapping_add((sum >> 8) as u8);
    }

    if bytes.len() == 1 {
        return Some((bytes[0] as char).to_string());
    }

    Some(decode_utf16(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CMapName /Adobe-Identity-UCS def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0003> <0020>
<0011> <00660069>
endbfchar
2 beginbfrange
<0024> <0026> <0041>
<0030> <0031> [<0061> <D835DC00>]
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

    #[test]
    fn to_unicode() {
        let map = ToUnicode::parse(TO_UNICODE);

        assert_eq!(map.get(0x03), Some(" "));
        assert_eq!(map.get(0x11), Some("fi"));
        assert_eq!(map.get(0x24), Some("A"));
        assert_eq!(map.get(0x26), Some("C"));
        assert_eq!(map.get(0x30), Some("a"));
        assert_eq!(map.get(0x31), Some("\u{1d400}"));
        assert_eq!(map.get(0x27), None);
    }

    #[test]
    fn embedded_cmap() {
        let cmap = CMap::parse(
            b"begincmap
/WMode 1 def
2 begincodespacerange
<00> <80>
<8140> <9FFC>
endcodespacerange
1 begincidrange
<8140> <817E> 633
endcidrange
1 begincidchar
<20> 1
endcidchar
endcmap",
        );

        assert_eq!(cmap.wmode(), 1);
        assert_eq!(cmap.next_code(b"\x20\x81\x41"), Some((0x20, 1)));
        assert_eq!(cmap.next_code(b"\x81\x41"), Some((0x8141, 2)));
        assert_eq!(cmap.cid(0x20), 1);
        assert_eq!(cmap.cid(0x8141), 634);
        assert_eq!(cmap.cid(0x30), 0);
    }

    #[test]
    fn identity() {
        let cmap = CMap::predefined(b"Identity-H").unwrap();

        assert_eq!(cmap.next_code(b"\x01\x02\x03"), Some((0x0102, 2)));
        assert_eq!(cmap.cid(0x0102), 0x0102);
        // A trailing odd byte is still consumed.
        assert_eq!(cmap.next_code(b"\x07"), Some((0x07, 1)));
        assert!(CMap::predefined(b"UniJIS-UCS2-H").is_none());
    }
}
