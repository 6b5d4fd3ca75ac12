use crate::builder::Paint;
use crate::gradient::Gradient;
use crate::interpret::Interpreter;
use crate::op_history::OP_HISTORY_DEPTH;
use crate::pattern::ShadingPattern;
use crate::shading::Shading;
use crate::tessellate::tessellate;
use crate::util::AffineExt;
use kurbo::Affine;
use log::debug;
use vellum_syntax::object::Name;
use vellum_syntax::object::keys::SHADING;

impl Interpreter<'_> {
    /// `sh`: paint a shading, clipped to the current clip.
    pub(crate) fn shading_fill(&mut self, name: &Name) {
        let Some(obj) = self.lookup_resolved(SHADING, "shading", name) else {
            return;
        };
        let shading = match Shading::new(&obj, self.xref) {
            Ok(shading) => shading,
            Err(e) => {
                self.warn(e);

                return;
            }
        };

        let shading_type = shading.shading_type();
        let is_gradient = matches!(shading_type, 2 | 3);
        let mut matrix = None;
        let mut saved_path = None;

        if is_gradient {
            let seen_concat = (1..=OP_HISTORY_DEPTH).any(|i| self.op_history.previous(i) == "cm");

            // The gradient is placed in the coordinate system of a clip that
            // was set up under a transform.
            if seen_concat
                && self.clip_history.has_clip()
                && let Some(transform) = self.builder.transform()
            {
                matrix = Some(transform);
                self.builder.set_transform(Affine::IDENTITY);
            }
        } else {
            saved_path = Some(self.state.path().clone());
            self.save_state();
        }

        if let Some(bbox) = shading.bbox() {
            self.state.rect(bbox);

            if saved_path.is_some() {
                self.builder.set_clip_path(&self.state, false);
            } else {
                self.builder.clip(&self.state, false);
            }

            self.state.clear_path();
        }

        if saved_path.is_some() {
            self.state.fill_color_space = shading.color_space().clone();
        }

        if is_gradient {
            if let Some(clip) = self.clip_history.clip().cloned() {
                match Gradient::from_shading(&shading, matrix) {
                    Ok(gradient) => {
                        if let Some(id) = self.builder.add_gradient(&gradient, true) {
                            self.builder.add_shaded_fill(&shading, &id, &clip);
                        }
                    }
                    Err(e) => self.warn(e),
                }
            }
        } else {
            self.fill_cells(&shading);
        }

        if let Some(path) = saved_path {
            self.restore_state();
            self.state.set_path(path);
        }
    }

    /// Approximate painting a path with a shading pattern: the shading is
    /// tessellated inside of the path.
    pub(crate) fn shading_pattern_fallback(
        &mut self,
        pattern: &ShadingPattern,
        is_stroke: bool,
        even_odd: bool,
    ) {
        let shading = &pattern.shading;
        let saved_path = self.state.path().clone();

        self.save_state();

        if !is_stroke {
            self.builder.set_clip_path(&self.state, even_odd);
        }

        self.state.fill_color_space = shading.color_space().clone();

        if let Some(background) = shading.background() {
            self.state.fill_color = background.clone();
            let paint = Paint::Color {
                rgb: self.state.fill_color_space.to_rgb(background),
                opacity: self.state.fill_opacity,
            };
            self.builder.add_path(&self.state, Some(&paint), None, false);
        }

        self.state.clear_path();

        // Pattern space is the coordinate system of the page or form.
        if self.state.ctm.is_invertible() {
            let m = self.state.ctm.inverse() * self.base_matrix * pattern.matrix;
            self.state.ctm = self.state.ctm * m;
            self.set_builder_transform(m);
        }

        self.fill_cells(shading);
        self.restore_state();
        self.state.set_path(saved_path);
    }

    /// Fill the tessellated cells of a shading one by one.
    fn fill_cells(&mut self, shading: &Shading) {
        let state = &mut self.state;
        let builder = &mut *self.builder;

        let tessellated = tessellate(shading, &self.precision, &mut |cell, color| {
            state.set_path(cell);
            state.fill_color = color.iter().copied().collect();
            let paint = Paint::Color {
                rgb: state.fill_color_space.to_rgb(color),
                opacity: state.fill_opacity,
            };
            builder.add_path(state, Some(&paint), None, false);
            state.clear_path();
        });

        if !tessellated {
            debug!("shading type {} can't be tessellated", shading.shading_type());
        }
    }
}
