use crate::color::{ColorComponents, ColorSpace};
use crate::diagnostic::Diagnostic;
use crate::function::{Function, TransferFunction};
use crate::interpret::Interpreter;
use crate::interpret::x_object::SoftMaskParams;
use crate::state::BlendMode;
use crate::util::OptionLog;
use kurbo::{Cap, Join};
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Name, Object, Stream};

impl Interpreter<'_> {
    /// `gs`: apply a graphics state parameter dictionary.
    pub(crate) fn set_ext_g_state(&mut self, name: &Name) {
        let Some(obj) = self.lookup_resolved(EXT_G_STATE, "ExtGState", name) else {
            return;
        };

        let Object::Dict(dict) = obj else {
            self.warn(Diagnostic::BadExtGState("not a dictionary"));

            return;
        };

        // The soft mask is drawn with the other parameters of the dictionary
        // already in effect.
        for key in dict.keys().filter(|k| k.as_bytes() != SMASK) {
            self.ext_g_state_entry(&dict, key).warn_none(&format!(
                "invalid value in graphics state for {}",
                key.as_str()
            ));
        }

        if let Some(mask) = dict.get_raw(SMASK) {
            let mask = self.xref.resolve(mask);
            self.apply_soft_mask(&mask);
        }

        self.builder.update_style(&self.state);
    }

    fn ext_g_state_entry(&mut self, dict: &Dict, key: &Name) -> Option<()> {
        let xref = self.xref;

        match key.as_bytes() {
            LW => self.state.line_width = dict.get::<f64>(key, xref)?,
            LC => {
                self.state.line_cap = match dict.get::<i64>(key, xref)? {
                    0 => Cap::Butt,
                    1 => Cap::Round,
                    2 => Cap::Square,
                    _ => return None,
                }
            }
            LJ => {
                self.state.line_join = match dict.get::<i64>(key, xref)? {
                    0 => Join::Miter,
                    1 => Join::Round,
                    2 => Join::Bevel,
                    _ => return None,
                }
            }
            ML => self.state.miter_limit = dict.get::<f64>(key, xref)?,
            D => {
                let dash = dict.get::<Array>(key, xref)?;
                let array = dash.get::<Array>(0, xref)?.to_vec::<f64>(xref)?;
                self.state.dash_array = array.into_iter().collect();
                self.state.dash_phase = dash.get::<f64>(1, xref)?;
            }
            RI => self.state.rendering_intent = dict.get::<Name>(key, xref)?.as_str().into_owned(),
            FL => self.state.flatness = dict.get::<f64>(key, xref)?,
            FONT => {
                let font = dict.get::<Array>(key, xref)?;
                let size = font.get::<f64>(1, xref)?;
                self.state.text.font = self.font_from_object(font.get_raw(0)?);
                self.state.text.font_size = size;
                self.font_changed = true;
            }
            BM => match blend_mode(dict.get_raw(key)?, xref) {
                Some(mode) => self.state.blend_mode = mode,
                None => self.warn(Diagnostic::BadExtGState("invalid blend mode")),
            },
            CA_NS => self.state.fill_opacity = dict.get::<f32>(key, xref)?,
            CA => self.state.stroke_opacity = dict.get::<f32>(key, xref)?,
            OP_NS => self.state.fill_overprint = dict.get::<bool>(key, xref)?,
            OP => {
                let overprint = dict.get::<bool>(key, xref)?;
                self.state.stroke_overprint = overprint;

                if !dict.contains_key(OP_NS) {
                    self.state.fill_overprint = overprint;
                }
            }
            OPM => self.state.overprint_mode = dict.get::<u8>(key, xref)?,
            SA => self.state.stroke_adjust = dict.get::<bool>(key, xref)?,
            TR2 => self.set_transfer(dict.get_raw(key)?),
            TR if !dict.contains_key(TR2) => self.set_transfer(dict.get_raw(key)?),
            _ => {}
        }

        Some(())
    }

    fn set_transfer(&mut self, obj: &Object) {
        match transfer_function(&self.xref.resolve(obj), self.xref) {
            Ok(transfer) => self.state.transfer = transfer,
            Err(e) => self.warn(e),
        }
    }

    fn apply_soft_mask(&mut self, obj: &Object) {
        let xref = self.xref;

        let dict = match obj {
            Object::Name(n) if n.as_bytes() == NONE => {
                self.state.soft_mask = None;
                self.builder.clear_soft_mask(&self.state);

                return;
            }
            Object::Dict(dict) => dict,
            _ => {
                self.warn(Diagnostic::BadExtGState("invalid soft mask"));

                return;
            }
        };

        let alpha = match dict.get::<Name>(S, xref) {
            Some(s) if s.as_bytes() == ALPHA => true,
            Some(s) if s.as_bytes() == LUMINOSITY => false,
            _ => {
                self.warn(Diagnostic::BadExtGState("invalid soft mask type"));

                return;
            }
        };

        let transfer = match dict.get_raw(TR).map(|o| xref.resolve(o)) {
            None => None,
            Some(Object::Name(n)) if n.as_bytes() == IDENTITY => None,
            Some(obj) => match Function::new(&obj, xref) {
                Ok(f) if f.input_size() == 1 && f.output_size() == Some(1) => {
                    Some(TransferFunction::Single(f))
                }
                _ => {
                    self.warn(Diagnostic::BadExtGState(
                        "invalid transfer function in soft mask",
                    ));

                    return;
                }
            },
        };

        let Some(group_form) = dict.get::<Stream>(G, xref) else {
            self.warn(Diagnostic::BadExtGState("soft mask has no group"));

            return;
        };

        let Some(group) = group_form.dict().get::<Dict>(GROUP, xref) else {
            self.warn(Diagnostic::BadExtGState("soft mask is missing its group"));

            return;
        };

        let color_space = group
            .get_raw(CS)
            .and_then(|cs| ColorSpace::new(cs, xref).ok());
        let backdrop = dict
            .get::<Array>(BC, xref)
            .and_then(|bc| bc.to_vec::<f32>(xref))
            .map(|bc| bc.into_iter().collect::<ColorComponents>())
            .or_else(|| color_space.as_ref().map(ColorSpace::default_color))
            .unwrap_or_default();

        self.do_soft_mask(
            &group_form,
            SoftMaskParams {
                alpha,
                transfer,
                backdrop,
                color_space,
                isolated: group.get::<bool>(I, xref).unwrap_or(false),
                knockout: group.get::<bool>(K, xref).unwrap_or(false),
            },
        );
    }
}

fn blend_mode(obj: &Object, xref: &XRef) -> Option<BlendMode> {
    match xref.resolve(obj) {
        Object::Name(name) => BlendMode::from_name(&name),
        // The first supported mode of the array wins.
        Object::Array(modes) => modes
            .iter()
            .filter_map(|m| m.as_name())
            .find_map(|m| BlendMode::from_name(m)),
        _ => None,
    }
}

fn transfer_function(obj: &Object, xref: &XRef) -> Result<Option<TransferFunction>, Diagnostic> {
    match obj {
        Object::Name(n) if matches!(n.as_bytes(), DEFAULT | IDENTITY) => Ok(None),
        Object::Array(functions) if functions.len() == 4 => {
            let parsed = functions
                .iter()
                .map(|f| Function::new(f, xref))
                .collect::<Result<Vec<_>, _>>()?;
            let functions: [Function; 4] = parsed
                .try_into()
                .map_err(|_| Diagnostic::BadExtGState("invalid transfer function"))?;

            Ok(Some(TransferFunction::PerComponent(Box::new(functions))))
        }
        Object::Dict(_) | Object::Stream(_) => {
            Ok(Some(TransferFunction::Single(Function::new(obj, xref)?)))
        }
        _ => Err(Diagnostic::BadExtGState("invalid transfer function")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_mode_from_array() {
        let xref = XRef::new();
        let modes = Object::Array(Array::new(vec![
            Object::Name(Name::new(b"Bogus")),
            Object::Name(Name::new(b"Multiply")),
            Object::Name(Name::new(b"Screen")),
        ]));

        assert_eq!(blend_mode(&modes, &xref), Some(BlendMode::Multiply));
        assert_eq!(blend_mode(&Object::Name(Name::new(b"Bogus")), &xref), None);
    }

    #[test]
    fn identity_transfer() {
        let xref = XRef::new();

        assert!(matches!(
            transfer_function(&Object::Name(Name::new(b"Identity")), &xref),
            Ok(None)
        ));
        assert!(transfer_function(&Object::Number(1.into()), &xref).is_err());
    }
}
