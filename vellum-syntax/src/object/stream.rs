//! Streams.

use crate::OptionLog;
use crate::filter::{Filter, ImageEncoding};
use crate::object::keys::{DECODE_PARMS, DP, F, FILTER};
use crate::object::{Dict, Name, Object};
use crate::xref::XRef;
use std::fmt;
use std::sync::Arc;

/// A stream: a dictionary plus its raw, still-encoded data.
#[derive(Clone, PartialEq)]
pub struct Stream {
    dict: Dict,
    data: Arc<[u8]>,
}

/// The decoded data of an image stream.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The decoded data. If `encoding` is set, the data is still encoded in that format.
    pub data: Vec<u8>,
    /// The image codec the data is encoded with, if any.
    pub encoding: Option<ImageEncoding>,
    /// The decode parameters of the final filter.
    pub params: Option<Dict>,
}

impl Stream {
    /// Create a new stream.
    pub fn new(dict: Dict, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            dict,
            data: data.into(),
        }
    }

    /// The dictionary of the stream.
    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    /// The raw, undecoded data of the stream.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// The filters of the stream, together with their decode parameters.
    pub fn filters(&self, xref: &XRef) -> Option<Vec<(Filter, Option<Dict>)>> {
        self.filters_with(xref, &[FILTER], &[DECODE_PARMS])
    }

    /// Same as [`Stream::filters`], but also accepts the abbreviated keys used
    /// by inline images.
    pub(crate) fn filters_with(
        &self,
        xref: &XRef,
        filter_keys: &[&[u8]],
        params_keys: &[&[u8]],
    ) -> Option<Vec<(Filter, Option<Dict>)>> {
        let filters = match self.dict.get_raw_any(filter_keys).map(|o| xref.resolve(o)) {
            None | Some(Object::Null) => vec![],
            Some(Object::Name(n)) => vec![n],
            Some(Object::Array(a)) => a.to_vec::<Name>(xref)?,
            Some(_) => return None,
        };

        let params = match self.dict.get_raw_any(params_keys).map(|o| xref.resolve(o)) {
            Some(Object::Dict(d)) => vec![Some(d)],
            Some(Object::Array(a)) => a
                .iter()
                .map(|o| match xref.resolve(o) {
                    Object::Dict(d) => Some(d),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        };

        filters
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let filter = Filter::from_name(name)?;

                Some((filter, params.get(i).cloned().flatten()))
            })
            .collect()
    }

    /// Decode the stream by applying all of its filters.
    ///
    /// Returns `None` if a filter fails or if the stream is encoded with an image codec.
    pub fn decoded(&self, xref: &XRef) -> Option<Vec<u8>> {
        let image = self.decode_with(xref, &[FILTER], &[DECODE_PARMS])?;

        image
            .encoding
            .is_none()
            .then_some(image.data)
            .warn_none("stream is encoded with an image codec")
    }

    /// Decode an image stream. Image codecs are not applied, instead the
    /// still-encoded data is returned together with its encoding.
    pub fn decoded_image(&self, xref: &XRef) -> Option<DecodedImage> {
        self.decode_with(xref, &[FILTER, F], &[DECODE_PARMS, DP])
    }

    fn decode_with(
        &self,
        xref: &XRef,
        filter_keys: &[&[u8]],
        params_keys: &[&[u8]],
    ) -> Option<DecodedImage> {
        let filters = self
            .filters_with(xref, filter_keys, params_keys)
            .warn_none("stream has invalid filters")?;

        let mut data = self.data.to_vec();
        let mut last_params = None;

        for (i, (filter, params)) in filters.iter().enumerate() {
            if let Some(encoding) = filter.image_encoding() {
                if i != filters.len() - 1 {
                    log::warn!("image codec {filter:?} must be the last filter");

                    return None;
                }

                return Some(DecodedImage {
                    data,
                    encoding: Some(encoding),
                    params: params.clone(),
                });
            }

            data = filter.apply(&data, params.as_ref(), xref)?;
            last_params = params.clone();
        }

        Some(DecodedImage {
            data,
            encoding: None,
            params: last_params,
        })
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("dict", &self.dict)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Array;
    use crate::object::keys::{ASCII_HEX_DECODE, DCT_DECODE, RUN_LENGTH_DECODE};

    #[test]
    fn unfiltered() {
        let stream = Stream::new(Dict::new(), b"abc".to_vec());
        assert_eq!(stream.decoded(&XRef::new()).unwrap(), b"abc");
    }

    #[test]
    fn filter_chain() {
        let filters = Array::new(vec![
            Object::Name(Name::new(ASCII_HEX_DECODE)),
            Object::Name(Name::new(RUN_LENGTH_DECODE)),
        ]);
        let dict = Dict::new().with(FILTER, filters);
        // Run-length data `02 61 62 63 80`, hex encoded.
        let stream = Stream::new(dict, b"0261626380>".to_vec());

        assert_eq!(stream.decoded(&XRef::new()).unwrap(), b"abc");
    }

    #[test]
    fn image_codec_is_passed_through() {
        let dict = Dict::new().with(FILTER, Name::new(DCT_DECODE));
        let stream = Stream::new(dict, b"\xff\xd8".to_vec());
        let xref = XRef::new();

        assert!(stream.decoded(&xref).is_none());

        let image = stream.decoded_image(&xref).unwrap();
        assert_eq!(image.encoding, Some(ImageEncoding::Dct));
        assert_eq!(image.data, b"\xff\xd8");
    }
}
