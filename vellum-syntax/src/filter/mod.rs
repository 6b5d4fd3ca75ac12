//! Stream filters.
//!
//! The general-purpose filters are implemented here. Image codecs (DCT, JPX,
//! CCITT fax and JBIG2) are not decoded; they are reported as an
//! [`ImageEncoding`] so that the consumer can handle the encoded data itself.

mod ascii_85;
mod ascii_hex;
mod flate;
mod lzw;
mod predictor;
mod run_length;

use crate::OptionLog;
use crate::object::Dict;
use crate::object::keys::*;
use crate::xref::XRef;
use log::warn;

/// A stream filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `ASCIIHexDecode`.
    AsciiHexDecode,
    /// `ASCII85Decode`.
    Ascii85Decode,
    /// `LZWDecode`.
    LzwDecode,
    /// `FlateDecode`.
    FlateDecode,
    /// `RunLengthDecode`.
    RunLengthDecode,
    /// `CCITTFaxDecode`.
    CcittFaxDecode,
    /// `JBIG2Decode`.
    Jbig2Decode,
    /// `DCTDecode`.
    DctDecode,
    /// `JPXDecode`.
    JpxDecode,
    /// `Crypt`.
    Crypt,
}

/// The encoding of image data that is passed through undecoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JPEG.
    Dct,
    /// JPEG 2000.
    Jpx,
    /// CCITT group 3 or 4 fax.
    CcittFax,
    /// JBIG2.
    Jbig2,
}

impl Filter {
    /// Look up a filter by name, including the abbreviations used by inline images.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let filter = match name {
            ASCII_HEX_DECODE | ASCII_HEX_DECODE_ABBREVIATION => Self::AsciiHexDecode,
            ASCII85_DECODE | ASCII85_DECODE_ABBREVIATION => Self::Ascii85Decode,
            LZW_DECODE | LZW_DECODE_ABBREVIATION => Self::LzwDecode,
            FLATE_DECODE | FLATE_DECODE_ABBREVIATION => Self::FlateDecode,
            RUN_LENGTH_DECODE | RL => Self::RunLengthDecode,
            CCITTFAX_DECODE | CCITTFAX_DECODE_ABBREVIATION => Self::CcittFaxDecode,
            JBIG2_DECODE => Self::Jbig2Decode,
            DCT_DECODE | DCT_DECODE_ABBREVIATION => Self::DctDecode,
            JPX_DECODE => Self::JpxDecode,
            CRYPT => Self::Crypt,
            _ => {
                warn!("unknown filter: {}", String::from_utf8_lossy(name));

                return None;
            }
        };

        Some(filter)
    }

    /// The image encoding of the filter, if it is an image codec.
    pub fn image_encoding(&self) -> Option<ImageEncoding> {
        match self {
            Self::DctDecode => Some(ImageEncoding::Dct),
            Self::JpxDecode => Some(ImageEncoding::Jpx),
            Self::CcittFaxDecode => Some(ImageEncoding::CcittFax),
            Self::Jbig2Decode => Some(ImageEncoding::Jbig2),
            _ => None,
        }
    }

    fn debug_name(&self) -> &'static str {
        match self {
            Self::AsciiHexDecode => "ascii_hex",
            Self::Ascii85Decode => "ascii_85",
            Self::LzwDecode => "lzw",
            Self::FlateDecode => "flate",
            Self::RunLengthDecode => "run_length",
            Self::CcittFaxDecode => "ccitt_fax",
            Self::Jbig2Decode => "jbig2",
            Self::DctDecode => "dct",
            Self::JpxDecode => "jpx",
            Self::Crypt => "crypt",
        }
    }

    /// Apply the filter. Image codecs can't be applied and return `None`.
    pub fn apply(&self, data: &[u8], params: Option<&Dict>, xref: &XRef) -> Option<Vec<u8>> {
        match self {
            Self::AsciiHexDecode => ascii_hex::decode(data),
            Self::Ascii85Decode => ascii_85::decode(data),
            Self::RunLengthDecode => run_length::decode(data),
            Self::FlateDecode => flate::decode(data, params, xref),
            Self::LzwDecode => lzw::decode(data, params, xref),
            // Documents are never decrypted, so the identity crypt filter is the only one
            // that can show up.
            Self::Crypt => Some(data.to_vec()),
            _ => None,
        }
        .warn_none(&format!("failed to apply filter {}", self.debug_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations() {
        assert_eq!(Filter::from_name(b"AHx"), Some(Filter::AsciiHexDecode));
        assert_eq!(Filter::from_name(b"Fl"), Some(Filter::FlateDecode));
        assert_eq!(Filter::from_name(b"RL"), Some(Filter::RunLengthDecode));
        assert_eq!(Filter::from_name(b"Foo"), None);
    }

    #[test]
    fn image_codecs() {
        assert_eq!(
            Filter::DctDecode.image_encoding(),
            Some(ImageEncoding::Dct)
        );
        assert_eq!(Filter::FlateDecode.image_encoding(), None);
        assert_eq!(Filter::DctDecode.apply(b"", None, &XRef::new()), None);
    }
}
