//! Image data and color maps, as handed to the builder.

use crate::color::{ColorSpace, Rgb};
use crate::diagnostic::Diagnostic;
use smallvec::SmallVec;
use vellum_syntax::XRef;
use vellum_syntax::filter::ImageEncoding;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Name, Object, Stream};

/// The data of an image XObject or inline image.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// The sample data. Decoded unless `encoding` is set, in which case it is still
    /// encoded with that image codec.
    pub data: Vec<u8>,
    /// The image codec of `data`, if any.
    pub encoding: Option<ImageEncoding>,
    /// The decode parameters of the image codec.
    pub decode_params: Option<Dict>,
    /// The width in samples.
    pub width: u32,
    /// The height in samples.
    pub height: u32,
    /// The number of bits per color component.
    pub bits_per_component: u8,
    /// Whether the image should be interpolated when scaled up.
    pub interpolate: bool,
}

impl ImageData {
    /// Decode the data of an image stream with expanded keys.
    pub(crate) fn new(stream: &Stream, xref: &XRef) -> Result<Self, Diagnostic> {
        let dict = stream.dict();
        let width = dimension(dict, WIDTH, xref).ok_or(Diagnostic::BadImage("invalid width"))?;
        let height = dimension(dict, HEIGHT, xref).ok_or(Diagnostic::BadImage("invalid height"))?;
        let image_mask = dict.get::<bool>(IMAGE_MASK, xref).unwrap_or(false);
        let bits_per_component = match dict.get::<u8>(BITS_PER_COMPONENT, xref) {
            Some(bpc @ (1 | 2 | 4 | 8 | 16)) => bpc,
            None if image_mask => 1,
            // Encoded images carry their own bit depth.
            None if is_self_describing(dict, xref) => 8,
            _ => return Err(Diagnostic::BadImage("invalid bits per component")),
        };

        let decoded = stream
            .decoded_image(xref)
            .ok_or(Diagnostic::BadImage("failed to decode image data"))?;

        Ok(Self {
            data: decoded.data,
            encoding: decoded.encoding,
            decode_params: decoded.params,
            width,
            height,
            bits_per_component,
            interpolate: dict.get::<bool>(INTERPOLATE, xref).unwrap_or(false),
        })
    }
}

fn is_self_describing(dict: &Dict, xref: &XRef) -> bool {
    let last = match dict.get::<Object>(FILTER, xref) {
        Some(Object::Name(n)) => Some(n),
        Some(Object::Array(a)) => a.iter().last().and_then(|o| o.as_name().cloned()),
        _ => None,
    };

    last.is_some_and(|n| n.as_bytes() == JPX_DECODE)
}

// Sizes are sometimes written as reals.
fn dimension(dict: &Dict, key: &[u8], xref: &XRef) -> Option<u32> {
    dict.get::<f64>(key, xref)
        .filter(|v| *v >= 1.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

/// How the samples of an image map to colors.
#[derive(Debug, Clone)]
pub struct ColorMap {
    /// The color space of the samples.
    pub color_space: ColorSpace,
    /// The number of bits per component.
    pub bits_per_component: u8,
    /// The decode range of each component.
    pub decode: SmallVec<[(f32, f32); 4]>,
}

impl ColorMap {
    /// Create a color map, using the default decode ranges if `decode` is missing
    /// or has the wrong length.
    pub fn new(
        color_space: ColorSpace,
        bits_per_component: u8,
        decode: Option<&Array>,
        xref: &XRef,
    ) -> Result<Self, Diagnostic> {
        if color_space.is_pattern() {
            return Err(Diagnostic::BadImage("images can't use a pattern color space"));
        }

        let n = color_space.num_components();
        let decode = decode
            .and_then(|a| a.to_vec::<f32>(xref))
            .filter(|d| d.len() == 2 * n)
            .map(|d| d.chunks_exact(2).map(|c| (c[0], c[1])).collect())
            .unwrap_or_else(|| color_space.default_decode(bits_per_component));

        Ok(Self {
            color_space,
            bits_per_component,
            decode,
        })
    }

    /// The number of components per sample.
    pub fn num_components(&self) -> usize {
        self.color_space.num_components()
    }

    /// Map the raw component values of one sample to a color.
    pub fn to_rgb(&self, raw: &[u32]) -> Rgb {
        let max = ((1u64 << self.bits_per_component.min(32)) - 1) as f32;
        let components = raw
            .iter()
            .zip(&self.decode)
            .map(|(v, (d_min, d_max))| d_min + *v as f32 * (d_max - d_min) / max)
            .collect::<SmallVec<[f32; 4]>>();

        self.color_space.to_rgb(&components)
    }
}

/// Replace the abbreviated keys and values of an inline image dictionary by their
/// full names.
pub fn expand_inline_dict(dict: &Dict) -> Dict {
    dict.iter()
        .map(|(key, value)| {
            let key = expand_key(key.as_bytes());
            let value = match key {
                COLOR_SPACE | FILTER => expand_value(value),
                _ => value.clone(),
            };

            (Name::new(key), value)
        })
        .collect()
}

fn expand_key(key: &[u8]) -> &[u8] {
    match key {
        BPC => BITS_PER_COMPONENT,
        CS => COLOR_SPACE,
        D => DECODE,
        DP => DECODE_PARMS,
        F => FILTER,
        H => HEIGHT,
        IM => IMAGE_MASK,
        I => INTERPOLATE,
        W => WIDTH,
        L => LENGTH,
        _ => key,
    }
}

fn expand_name(name: &[u8]) -> &[u8] {
    match name {
        G => DEVICE_GRAY,
        RGB => DEVICE_RGB,
        CMYK => DEVICE_CMYK,
        I => INDEXED,
        ASCII_HEX_DECODE_ABBREVIATION => ASCII_HEX_DECODE,
        ASCII85_DECODE_ABBREVIATION => ASCII85_DECODE,
        LZW_DECODE_ABBREVIATION => LZW_DECODE,
        FLATE_DECODE_ABBREVIATION => FLATE_DECODE,
        RL => RUN_LENGTH_DECODE,
        CCITTFAX_DECODE_ABBREVIATION => CCITTFAX_DECODE,
        DCT_DECODE_ABBREVIATION => DCT_DECODE,
        _ => name,
    }
}

fn expand_value(value: &Object) -> Object {
    match value {
        Object::Name(n) => Object::Name(Name::new(expand_name(n.as_bytes()))),
        Object::Array(a) => Object::Array(a.iter().map(expand_value).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_abbreviations() {
        let dict = Dict::new()
            .with(W, 4)
            .with(H, 2)
            .with(BPC, 8)
            .with(CS, vec![Name::from("I"), Name::from("RGB")])
            .with(F, Name::from("AHx"))
            .with(IM, false);
        let expanded = expand_inline_dict(&dict);
        let xref = XRef::new();

        assert_eq!(expanded.get::<u32>(WIDTH, &xref), Some(4));
        assert_eq!(expanded.get::<u32>(HEIGHT, &xref), Some(2));
        assert_eq!(expanded.get::<u8>(BITS_PER_COMPONENT, &xref), Some(8));
        assert_eq!(expanded.get::<bool>(IMAGE_MASK, &xref), Some(false));
        assert_eq!(
            expanded.get::<Name>(FILTER, &xref).map(|n| n.as_bytes().to_vec()),
            Some(ASCII_HEX_DECODE.to_vec())
        );
        let cs = expanded.get::<Array>(COLOR_SPACE, &xref).unwrap();
        assert_eq!(cs.get::<Name>(0, &xref).unwrap().as_bytes(), INDEXED);
        assert_eq!(cs.get::<Name>(1, &xref).unwrap().as_bytes(), DEVICE_RGB);
    }

    #[test]
    fn image_data() {
        let xref = XRef::new();
        let dict = Dict::new()
            .with(WIDTH, 2.0)
            .with(HEIGHT, 1)
            .with(BITS_PER_COMPONENT, 8)
            .with(FILTER, Name::from("ASCIIHexDecode"));
        let image = ImageData::new(&Stream::new(dict, b"ff00ff>".to_vec()), &xref).unwrap();

        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.data, vec![0xff, 0x00, 0xff]);
        assert!(image.encoding.is_none());
        assert!(!image.interpolate);

        let dict = Dict::new().with(WIDTH, 0).with(HEIGHT, 1);
        assert_eq!(
            ImageData::new(&Stream::new(dict, vec![]), &xref).unwrap_err(),
            Diagnostic::BadImage("invalid width")
        );
    }

    #[test]
    fn color_map_decode() {
        let xref = XRef::new();
        let decode = Array::new(vec![1.into(), 0.into()]);
        let map = ColorMap::new(ColorSpace::device_gray(), 1, Some(&decode), &xref).unwrap();

        assert_eq!(map.decode.as_slice(), &[(1.0, 0.0)]);
        assert_eq!(map.to_rgb(&[0]).to_string(), "#ffffff");
        assert_eq!(map.to_rgb(&[1]).to_string(), "#000000");

        // A decode array of the wrong length falls back to the default.
        let map = ColorMap::new(ColorSpace::device_rgb(), 8, Some(&decode), &xref).unwrap();
        assert_eq!(map.decode.len(), 3);
        assert_eq!(map.to_rgb(&[255, 0, 0]).to_string(), "#ff0000");

        assert!(ColorMap::new(ColorSpace::pattern(None), 8, None, &xref).is_err());
    }
}
