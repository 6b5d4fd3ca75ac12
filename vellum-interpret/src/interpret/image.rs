use crate::color::{ColorSpace, ColorSpaceKind};
use crate::diagnostic::Diagnostic;
use crate::image::{ColorMap, ImageData, expand_inline_dict};
use crate::interpret::Interpreter;
use vellum_syntax::XRef;
use vellum_syntax::content::{ContentParser, ContentToken};
use vellum_syntax::filter::ImageEncoding;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Object, Stream};

impl Interpreter<'_> {
    /// `BI`: read the dictionary and data of an inline image and draw it.
    pub(crate) fn inline_image(&mut self, parser: &mut ContentParser<'_>) {
        let mut operands = Vec::new();

        loop {
            match parser.next() {
                None => {
                    self.warn(Diagnostic::InlineImageEof);

                    return;
                }
                Some(ContentToken::Command(cmd)) if cmd.as_bytes() == b"ID" => break,
                Some(ContentToken::Command(_)) => {
                    self.warn(Diagnostic::BadImage(
                        "inline image dictionary key must be a name",
                    ));
                }
                Some(ContentToken::Operand(obj)) => operands.push(obj),
            }
        }

        let mut dict = Dict::new();

        for pair in operands.chunks(2) {
            match pair {
                [Object::Name(key), value] => dict.insert(key.clone(), value.clone()),
                _ => self.warn(Diagnostic::BadImage(
                    "inline image dictionary key must be a name",
                )),
            }
        }

        let dict = expand_inline_dict(&dict);
        let length = dict.get::<usize>(LENGTH, self.xref);

        let Some(data) = parser.inline_image_data(length) else {
            self.warn(Diagnostic::InlineImageEof);

            return;
        };

        self.draw_image(&Stream::new(dict, data.to_vec()), true);
    }

    /// Draw an image XObject or inline image, with its mask if it has one.
    pub(crate) fn draw_image(&mut self, stream: &Stream, inline: bool) {
        if let Err(e) = self.draw_image_inner(stream, inline) {
            self.warn(e);
        }
    }

    fn draw_image_inner(&mut self, stream: &Stream, inline: bool) -> Result<(), Diagnostic> {
        let xref = self.xref;
        let dict = stream.dict();
        let image = ImageData::new(stream, xref)?;

        if dict.get::<bool>(IMAGE_MASK, xref).unwrap_or(false) {
            if image.bits_per_component != 1 {
                return Err(Diagnostic::BadImage(
                    "image masks must have 1 bit per component",
                ));
            }

            self.builder
                .add_image_mask(&self.state, &image, decode_inverted(dict, xref));

            return Ok(());
        }

        let color_space = self.image_color_space(dict, image.encoding)?;
        let decode = dict.get::<Array>(DECODE, xref);
        let color_map = ColorMap::new(color_space, image.bits_per_component, decode.as_ref(), xref)?;

        if let Some(smask) = dict.get::<Stream>(SMASK, xref) {
            if inline {
                return Err(Diagnostic::BadImage("inline images can't have a soft mask"));
            }

            let mask = ImageData::new(&smask, xref)?;
            let mask_dict = smask.dict();
            let mask_space = self.image_color_space(mask_dict, mask.encoding)?;

            if !matches!(mask_space.kind(), ColorSpaceKind::DeviceGray) {
                return Err(Diagnostic::BadImage("soft masks must be DeviceGray"));
            }

            let mask_decode = mask_dict.get::<Array>(DECODE, xref);
            let mask_map = ColorMap::new(
                mask_space,
                mask.bits_per_component,
                mask_decode.as_ref(),
                xref,
            )?;

            self.builder
                .add_soft_masked_image(&self.state, &image, &color_map, &mask, &mask_map);

            return Ok(());
        }

        match dict.get::<Object>(MASK, xref) {
            Some(Object::Array(colors)) => {
                let colors = colors
                    .to_vec::<u32>(xref)
                    .filter(|c| c.len() <= 2 * color_map.num_components())
                    .ok_or(Diagnostic::BadImage("invalid color key mask"))?;

                self.builder
                    .add_image(&self.state, &image, &color_map, Some(&colors));
            }
            Some(Object::Stream(mask_stream)) => {
                if inline {
                    return Err(Diagnostic::BadImage("inline images can't have a mask"));
                }

                let mask_dict = mask_stream.dict();

                if !mask_dict.get::<bool>(IMAGE_MASK, xref).unwrap_or(false) {
                    return Err(Diagnostic::BadImage("mask is not an image mask"));
                }

                let mask = ImageData::new(&mask_stream, xref)?;

                self.builder.add_masked_image(
                    &self.state,
                    &image,
                    &color_map,
                    &mask,
                    decode_inverted(mask_dict, xref),
                );
            }
            _ => self.builder.add_image(&self.state, &image, &color_map, None),
        }

        Ok(())
    }

    fn image_color_space(
        &self,
        dict: &Dict,
        encoding: Option<ImageEncoding>,
    ) -> Result<ColorSpace, Diagnostic> {
        match dict.get_raw(COLOR_SPACE) {
            Some(Object::Name(name)) => {
                let obj = self
                    .lookup(COLOR_SPACE, name)
                    .unwrap_or_else(|| Object::Name(name.clone()));

                ColorSpace::new(&obj, self.xref)
            }
            Some(obj) => ColorSpace::new(obj, self.xref),
            // JPEG 2000 data carries its own color space.
            None if encoding == Some(ImageEncoding::Jpx) => Ok(ColorSpace::device_rgb()),
            None => Err(Diagnostic::BadImage("missing color space")),
        }
    }
}

fn decode_inverted(dict: &Dict, xref: &XRef) -> bool {
    dict.get::<Array>(DECODE, xref)
        .and_then(|d| d.get::<f64>(0, xref))
        .is_some_and(|v| v == 1.0)
}
