use crate::builder::{Paint, PaintId};
use crate::color::{ColorComponents, ColorSpace};
use crate::diagnostic::Diagnostic;
use crate::gradient::Gradient;
use crate::interpret::{DeviceSpace, Interpreter, MAX_NESTING};
use crate::pattern::{Pattern, TilingPattern};
use log::warn;
use vellum_syntax::object::keys::{COLOR_SPACE, PATTERN};
use vellum_syntax::object::{Name, Object};

impl Interpreter<'_> {
    pub(crate) fn set_device_color(&mut self, is_stroke: bool, args: &[Object], space: DeviceSpace) {
        let color_space = match space {
            DeviceSpace::Gray => ColorSpace::device_gray(),
            DeviceSpace::Rgb => ColorSpace::device_rgb(),
            DeviceSpace::Cmyk => ColorSpace::device_cmyk(),
        };

        self.select(is_stroke, color_space, components(args), None);
    }

    pub(crate) fn set_color_space(&mut self, is_stroke: bool, args: &[Object]) {
        let Some(name) = args.first().and_then(Object::as_name) else {
            return;
        };

        if is_stroke {
            self.state.stroke_pattern = None;
        } else {
            self.state.fill_pattern = None;
        }

        let obj = self
            .lookup(COLOR_SPACE, name)
            .unwrap_or_else(|| Object::Name(name.clone()));

        match ColorSpace::new(&obj, self.xref) {
            Ok(color_space) => {
                let color = color_space.default_color();
                self.select(is_stroke, color_space, color, None);
            }
            Err(e) => self.warn(e),
        }
    }

    /// `sc`/`SC`.
    pub(crate) fn set_color(&mut self, is_stroke: bool, op: &'static str, args: &[Object]) {
        let color_space = self.color_space(is_stroke).clone();
        let expected = color_space.num_components();

        if args.len() != expected {
            self.warn(Diagnostic::ColorComponentCount {
                op,
                expected,
                found: args.len(),
            });

            return;
        }

        self.select(is_stroke, color_space, components(args), None);
    }

    /// `scn`/`SCN`, which also select patterns.
    pub(crate) fn set_color_n(&mut self, is_stroke: bool, op: &'static str, args: &[Object]) {
        let color_space = self.color_space(is_stroke).clone();

        if !color_space.is_pattern() {
            self.set_color(is_stroke, op, args);

            return;
        }

        let mut color = self.color(is_stroke).clone();

        if args.len() > 1 {
            let Some(under) = color_space.under() else {
                self.warn(Diagnostic::ColorComponentCount {
                    op,
                    expected: 1,
                    found: args.len(),
                });

                return;
            };

            if args.len() - 1 != under.num_components() {
                self.warn(Diagnostic::ColorComponentCount {
                    op,
                    expected: under.num_components() + 1,
                    found: args.len(),
                });

                return;
            }

            color = components(&args[..args.len() - 1]);
        }

        let pattern = match args.last().and_then(Object::as_name) {
            Some(name) => self.pattern(name),
            None if is_stroke => self.state.stroke_pattern.clone(),
            None => self.state.fill_pattern.clone(),
        };

        self.select(is_stroke, color_space, color, pattern);
    }

    fn pattern(&self, name: &Name) -> Option<Pattern> {
        let obj = self.lookup_resolved(PATTERN, "pattern", name)?;

        Pattern::new(&obj, self.xref).map_err(|e| self.warn(e)).ok()
    }

    fn select(
        &mut self,
        is_stroke: bool,
        color_space: ColorSpace,
        color: ColorComponents,
        pattern: Option<Pattern>,
    ) {
        if is_stroke {
            self.state.stroke_color_space = color_space;
            self.state.stroke_color = color;
            self.state.stroke_pattern = pattern;
        } else {
            self.state.fill_color_space = color_space;
            self.state.fill_color = color;
            self.state.fill_pattern = pattern;
        }

        self.builder.update_style(&self.state);
    }

    fn color_space(&self, is_stroke: bool) -> &ColorSpace {
        if is_stroke {
            &self.state.stroke_color_space
        } else {
            &self.state.fill_color_space
        }
    }

    fn color(&self, is_stroke: bool) -> &ColorComponents {
        if is_stroke {
            &self.state.stroke_color
        } else {
            &self.state.fill_color
        }
    }

    /// Turn the current fill or stroke color into a paint. Gradients and tiling
    /// patterns are created on the builder on the way.
    pub(crate) fn paint(&mut self, is_stroke: bool) -> Option<Paint> {
        let color_space = self.color_space(is_stroke).clone();

        if !color_space.is_pattern() {
            let opacity = if is_stroke {
                self.state.stroke_opacity
            } else {
                self.state.fill_opacity
            };

            return Some(Paint::Color {
                rgb: color_space.to_rgb(self.color(is_stroke)),
                opacity,
            });
        }

        let pattern = if is_stroke {
            self.state.stroke_pattern.clone()
        } else {
            self.state.fill_pattern.clone()
        }?;

        match pattern {
            Pattern::Shading(sp) => {
                let transform = self.pattern_transform(sp.matrix);
                let gradient = Gradient::from_shading(&sp.shading, Some(transform))
                    .map_err(|e| self.warn(e))
                    .ok()?;

                self.builder
                    .add_gradient(&gradient, false)
                    .map(Paint::Gradient)
            }
            Pattern::Tiling(tp) => self.tiling_paint(&tp, is_stroke).map(Paint::Pattern),
        }
    }

    /// Create a tiling pattern on the builder by running its content with a
    /// separate interpreter.
    fn tiling_paint(&mut self, pattern: &TilingPattern, is_stroke: bool) -> Option<PaintId> {
        if self.nesting > MAX_NESTING {
            return None;
        }

        let mut transformed = pattern.clone();
        transformed.matrix = self.pattern_transform(pattern.matrix);

        // Uncolored patterns are painted in the color given to `scn`.
        let seed = if pattern.is_uncolored() {
            self.color_space(is_stroke)
                .under()
                .map(|under| (under.clone(), self.color(is_stroke).clone()))
        } else {
            None
        };

        let id = self.builder.push_tiling_pattern(&transformed, is_stroke);

        {
            let mut sub = Interpreter::new_pattern(
                self.xref,
                &mut *self.builder,
                pattern.resources.clone(),
                pattern.bbox,
                self.settings.clone(),
            );
            sub.precision = self.precision;
            sub.nesting = self.nesting + 1;

            if let Some((color_space, color)) = seed {
                sub.state.fill_color_space = color_space.clone();
                sub.state.fill_color = color.clone();
                sub.state.stroke_color_space = color_space;
                sub.state.stroke_color = color;
            }

            if let Err(e) = sub.parse(&Object::Stream(pattern.content.clone())) {
                warn!("failed to interpret tiling pattern: {e}");
            }
        }

        self.builder.pop_tiling_pattern();

        Some(id)
    }
}

fn components(args: &[Object]) -> ColorComponents {
    args.iter()
        .map(|o| o.as_number().map(|n| n.as_f32()).unwrap_or(0.0))
        .collect()
}
