use crate::diagnostic::Diagnostic;
use crate::interpret::Interpreter;
use crate::pattern::Pattern;
use kurbo::{Point, Rect};

impl Interpreter<'_> {
    pub(crate) fn move_to(&mut self, p: Point) {
        self.state.move_to(p);
    }

    pub(crate) fn line_to(&mut self, p: Point) {
        if !self.state.line_to(p) {
            self.warn(Diagnostic::NoCurrentPoint("lineto"));
        }
    }

    pub(crate) fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        if !self.state.curve_to(p1, p2, p3) {
            self.warn(Diagnostic::NoCurrentPoint("curveto"));
        }
    }

    /// `v`: the first control point is the current point.
    pub(crate) fn curve_to1(&mut self, p2: Point, p3: Point) {
        let Some(p1) = self.state.cur_pt() else {
            self.warn(Diagnostic::NoCurrentPoint("curveto1"));

            return;
        };

        self.state.curve_to(p1, p2, p3);
    }

    /// `y`: the second control point is the end point.
    pub(crate) fn curve_to2(&mut self, p1: Point, p3: Point) {
        if !self.state.curve_to(p1, p3, p3) {
            self.warn(Diagnostic::NoCurrentPoint("curveto2"));
        }
    }

    pub(crate) fn close_path(&mut self) {
        if !self.state.close_path() {
            self.warn(Diagnostic::NoCurrentPoint("closepath"));
        }
    }

    pub(crate) fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) {
        // Not normalized, the direction of the rectangle matters for the winding.
        self.state.rect(Rect::new(x, y, x + w, y + h));
    }

    /// Paint the current path and end it.
    ///
    /// Without a current point nothing is painted and the path is not ended, so a
    /// pending clip stays pending.
    ///
    /// If only one of fill and stroke uses a pattern that has to be approximated,
    /// only that part goes through the fallback. The other part is added as a
    /// plain path.
    pub(crate) fn paint_path(
        &mut self,
        op: &'static str,
        fill: bool,
        stroke: bool,
        even_odd: bool,
        close: bool,
    ) {
        if !self.state.is_cur_pt() {
            self.warn(Diagnostic::NoCurrentPoint(op));

            return;
        }

        if close {
            self.state.close_path();
        }

        if self.state.is_path() {
            let fill_fallback = fill && self.needs_fallback(false);
            let stroke_fallback = stroke && self.needs_fallback(true);

            if !fill_fallback && !stroke_fallback {
                let fill_paint = if fill { self.paint(false) } else { None };
                let stroke_paint = if stroke { self.paint(true) } else { None };

                if fill_paint.is_some() || stroke_paint.is_some() {
                    self.builder.add_path(
                        &self.state,
                        fill_paint.as_ref(),
                        stroke_paint.as_ref(),
                        even_odd,
                    );
                }
            } else {
                if fill {
                    if fill_fallback {
                        self.pattern_fallback(false, even_odd);
                    } else if let Some(paint) = self.paint(false) {
                        self.builder
                            .add_path(&self.state, Some(&paint), None, even_odd);
                    }
                }

                if stroke {
                    if stroke_fallback {
                        self.pattern_fallback(true, even_odd);
                    } else if let Some(paint) = self.paint(true) {
                        self.builder
                            .add_path(&self.state, None, Some(&paint), even_odd);
                    }
                }
            }
        }

        self.end_path();
    }

    /// End the path, applying a pending clip.
    pub(crate) fn end_path(&mut self) {
        if self.state.is_cur_pt()
            && let Some(rule) = self.pending_clip
        {
            self.clip_history
                .set_clip(self.state.path().clone(), rule);
            self.builder.clip(&self.state, rule.is_even_odd());
        }

        self.pending_clip = None;
        self.state.clear_path();
    }

    /// Whether painting with the current fill or stroke pattern has to be
    /// approximated by the interpreter.
    fn needs_fallback(&self, is_stroke: bool) -> bool {
        let (color_space, pattern) = if is_stroke {
            (&self.state.stroke_color_space, &self.state.stroke_pattern)
        } else {
            (&self.state.fill_color_space, &self.state.fill_pattern)
        };

        color_space.is_pattern()
            && pattern
                .as_ref()
                .is_some_and(|p| !self.builder.is_pattern_type_supported(p))
    }

    fn pattern_fallback(&mut self, is_stroke: bool, even_odd: bool) {
        let pattern = if is_stroke {
            self.state.stroke_pattern.clone()
        } else {
            self.state.fill_pattern.clone()
        };

        match pattern {
            Some(Pattern::Shading(sp)) => {
                self.shading_pattern_fallback(&sp, is_stroke, even_odd);
            }
            // Tiling patterns are painted by every builder.
            Some(Pattern::Tiling(_)) | None => {}
        }
    }
}
