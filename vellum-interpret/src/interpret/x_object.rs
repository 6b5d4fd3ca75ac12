use crate::builder::{SoftMask, TransparencyGroup};
use crate::color::{ColorComponents, ColorSpace};
use crate::diagnostic::Diagnostic;
use crate::function::TransferFunction;
use crate::interpret::{Interpreter, MAX_NESTING};
use crate::state::{BlendMode, FillRule};
use kurbo::{Affine, Rect};
use log::warn;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Name, Object, Stream};

/// The parameters of a soft mask that is drawn from a form.
pub(crate) struct SoftMaskParams {
    pub(crate) alpha: bool,
    pub(crate) transfer: Option<TransferFunction>,
    pub(crate) backdrop: ColorComponents,
    pub(crate) color_space: Option<ColorSpace>,
    pub(crate) isolated: bool,
    pub(crate) knockout: bool,
}

impl Interpreter<'_> {
    /// `Do`.
    pub(crate) fn do_x_object(&mut self, name: &Name) {
        let Some(obj) = self.lookup_resolved(XOBJECT, "xobject", name) else {
            return;
        };

        let Object::Stream(stream) = obj else {
            warn!("XObject '{name}' is not a stream");

            return;
        };

        match stream.dict().get::<Name>(SUBTYPE, self.xref) {
            Some(subtype) if subtype.as_bytes() == IMAGE => self.draw_image(&stream, false),
            Some(subtype) if subtype.as_bytes() == FORM => self.do_form(&stream),
            Some(subtype) if subtype.as_bytes() == PS => {}
            other => warn!("unknown XObject subtype {other:?}"),
        }
    }

    fn do_form(&mut self, stream: &Stream) {
        if self.nesting > MAX_NESTING {
            return;
        }

        let xref = self.xref;
        let dict = stream.dict();

        if dict.get::<i64>(FORM_TYPE, xref).is_some_and(|t| t != 1) {
            warn!("unknown form type");
        }

        let Some(bbox) = form_bbox(dict, xref) else {
            self.warn(Diagnostic::BadForm("bad form bounding box"));

            return;
        };

        let matrix = dict.get::<Affine>(MATRIX, xref).unwrap_or_default();
        let resources = dict.get::<Dict>(RESOURCES, xref).unwrap_or_default();
        let group = dict
            .get::<Dict>(GROUP, xref)
            .filter(|g| g.get::<Name>(S, xref).is_some_and(|s| s.as_bytes() == TRANSPARENCY))
            .map(|g| TransparencyGroup {
                bbox,
                color_space: g
                    .get_raw(CS)
                    .and_then(|cs| ColorSpace::new(cs, xref).ok()),
                isolated: g.get::<bool>(I, xref).unwrap_or(false),
                knockout: g.get::<bool>(K, xref).unwrap_or(false),
                for_soft_mask: false,
            });

        self.nesting += 1;
        self.draw_form(stream, resources, matrix, bbox, group, None);
        self.nesting -= 1;
    }

    /// Draw the form that defines a soft mask and install the mask.
    pub(crate) fn do_soft_mask(&mut self, stream: &Stream, params: SoftMaskParams) {
        if self.nesting > MAX_NESTING {
            return;
        }

        let xref = self.xref;
        let dict = stream.dict();

        let Some(bbox) = form_bbox(dict, xref) else {
            self.warn(Diagnostic::BadForm("bad soft mask bounding box"));

            return;
        };

        let matrix = dict.get::<Affine>(MATRIX, xref).unwrap_or_default();
        let resources = dict.get::<Dict>(RESOURCES, xref).unwrap_or_default();
        let group = TransparencyGroup {
            bbox,
            color_space: params.color_space,
            isolated: params.isolated,
            knockout: params.knockout,
            for_soft_mask: true,
        };
        let mask = SoftMask {
            bbox,
            alpha: params.alpha,
            transfer: params.transfer,
            backdrop: params.backdrop,
        };

        self.nesting += 1;
        self.draw_form(stream, resources, matrix, bbox, Some(group), Some(mask));
        self.nesting -= 1;
    }

    fn draw_form(
        &mut self,
        stream: &Stream,
        resources: Dict,
        matrix: Affine,
        bbox: Rect,
        group: Option<TransparencyGroup>,
        soft_mask: Option<SoftMask>,
    ) {
        self.push_resources(resources);
        self.save_state();
        self.state.clear_path();

        if let Some(group) = &group {
            self.builder.clear_soft_mask(&self.state);
            self.builder.push_transparency_group(&self.state, group);
        }

        self.state.ctm = self.state.ctm * matrix;
        self.set_builder_transform(matrix);

        self.state.rect(bbox);
        self.clip_history
            .set_clip(self.state.path().clone(), FillRule::NonZero);
        self.builder.clip(&self.state, false);
        self.state.clear_path();

        if group.is_some() {
            self.state.blend_mode = BlendMode::Normal;

            if self.state.fill_opacity != 1.0 {
                self.builder.set_group_opacity(self.state.fill_opacity);
                self.state.fill_opacity = 1.0;
            }

            self.state.stroke_opacity = 1.0;
        }

        let base_matrix = std::mem::replace(&mut self.base_matrix, self.state.ctm);
        self.run_nested(stream);
        self.base_matrix = base_matrix;

        if group.is_some() {
            self.builder.pop_transparency_group(&self.state);
        }

        self.restore_state();
        self.pop_resources();

        if let Some(mask) = soft_mask {
            self.builder.set_soft_mask(&self.state, &mask);
            self.state.soft_mask = Some(mask);
        } else if group.is_some() {
            self.builder.paint_transparency_group(&self.state, bbox);
        }
    }
}

// Not normalized, unlike `Rect` conversions.
fn form_bbox(dict: &Dict, xref: &XRef) -> Option<Rect> {
    let values = dict.get::<Array>(BBOX, xref)?;
    let c = values.to_vec::<f64>(xref).filter(|c| c.len() == 4)?;

    Some(Rect::new(c[0], c[1], c[2], c[3]))
}

