use crate::builder::CharPlacement;
use crate::diagnostic::Diagnostic;
use crate::font::{Font, FontType};
use crate::interpret::{Interpreter, MAX_NESTING, num};
use crate::state::TextRenderingMode;
use crate::util::AffineExt;
use kurbo::{Affine, Point};
use log::warn;
use vellum_syntax::object::keys::FONT;
use vellum_syntax::object::{Dict, Name, Object};

impl Interpreter<'_> {
    pub(crate) fn begin_text(&mut self) {
        self.state.text.matrix = Affine::IDENTITY;
        self.state.text.move_to(0.0, 0.0);
        self.builder.update_text_position(0.0, 0.0);
        self.font_changed = true;
        self.builder.begin_text_object(&self.state);
    }

    pub(crate) fn set_font(&mut self, name: &Name, size: f64) {
        self.state.text.font = self.font(name);
        self.state.text.font_size = size;
        self.font_changed = true;
    }

    /// Load a font resource, reusing fonts that were loaded before.
    pub(crate) fn font(&mut self, name: &Name) -> Option<Font> {
        let Some(entry) = self.lookup(FONT, name) else {
            self.warn(Diagnostic::MissingResource {
                category: "font",
                name: name.as_str().into_owned(),
            });

            return None;
        };

        self.font_from_object(&entry)
    }

    pub(crate) fn font_from_object(&mut self, entry: &Object) -> Option<Font> {
        let id = match entry {
            Object::Ref(id) => Some(*id),
            _ => None,
        };

        if let Some(font) = id.and_then(|id| self.font_cache.get(&id)) {
            return Some(font.clone());
        }

        let dict = self.xref.resolve(entry).as_dict().cloned().or_else(|| {
            warn!("font resource is not a dictionary");

            None
        })?;

        match Font::new(&dict, self.xref) {
            Ok(font) => {
                if let Some(id) = id {
                    self.font_cache.insert(id, font.clone());
                }

                Some(font)
            }
            Err(e) => {
                self.warn(e);

                None
            }
        }
    }

    pub(crate) fn set_text_render(&mut self, mode: Option<i64>) {
        match mode.and_then(TextRenderingMode::from_i64) {
            Some(mode) => {
                self.state.text.render_mode = mode;
                self.builder.update_style(&self.state);
            }
            None => warn!("invalid text rendering mode {mode:?}"),
        }
    }

    pub(crate) fn set_horiz_scaling(&mut self, scaling: f64) {
        self.state.text.horiz_scaling = scaling / 100.0;
        self.builder.update_text_matrix(&self.state);
        self.font_changed = true;
    }

    /// `Td`, also used by `TD` and `T*`.
    pub(crate) fn text_move(&mut self, tx: f64, ty: f64) {
        let text = &mut self.state.text;
        let (x, y) = (text.line_x + tx, text.line_y + ty);

        text.move_to(x, y);
        self.builder.update_text_position(x, y);
    }

    pub(crate) fn text_next_line(&mut self) {
        let leading = self.state.text.leading;
        self.text_move(0.0, -leading);
    }

    pub(crate) fn set_text_matrix(&mut self, matrix: Affine) {
        self.state.text.matrix = matrix;
        self.state.text.move_to(0.0, 0.0);
        self.builder.update_text_matrix(&self.state);
        self.builder.update_text_position(0.0, 0.0);
        self.font_changed = true;
    }

    /// `Tj`, `'` and `"`.
    pub(crate) fn show_text(&mut self, op: &'static str, args: &[Object]) {
        let Some(string) = args.last().and_then(Object::as_string).cloned() else {
            return;
        };

        if !self.prepare_font(op) {
            return;
        }

        match op {
            "'" => self.text_next_line(),
            "\"" => {
                self.state.text.word_space = num(args, 0);
                self.state.text.char_space = num(args, 1);
                self.text_next_line();
            }
            _ => {}
        }

        self.show_string(string.as_bytes());
    }

    /// `TJ`.
    pub(crate) fn show_space_text(&mut self, op: &'static str, args: &[Object]) {
        let Some(array) = args.first().and_then(Object::as_array).cloned() else {
            return;
        };

        if !self.prepare_font(op) {
            return;
        }

        for item in array.iter() {
            match item {
                Object::Number(n) => {
                    let n = n.as_f64();
                    let size = self.state.text.font_size.abs();
                    let shift = -n * 0.001 * size;

                    if self.state.text.wmode() == 1 {
                        self.state.text.text_shift(0.0, shift);
                    } else {
                        self.state.text.text_shift(shift, 0.0);
                    }

                    self.builder.update_text_shift(&self.state, n);
                }
                Object::String(s) => self.show_string(s.as_bytes()),
                other => warn!(
                    "element of show/space array must be number or string, not {}",
                    other.type_name()
                ),
            }
        }
    }

    fn prepare_font(&mut self, op: &'static str) -> bool {
        if self.state.text.font.is_none() {
            self.warn(Diagnostic::NoFont(op));

            return false;
        }

        if self.font_changed {
            self.builder.update_font(&self.state);
            self.font_changed = false;
        }

        true
    }

    fn show_string(&mut self, bytes: &[u8]) {
        let Some(font) = self.state.text.font.clone() else {
            return;
        };

        self.builder.begin_string(&self.state, bytes);

        let glyphs = font.font_type() == FontType::Type3 && self.settings.interpret_type3_glyphs;
        let text = &self.state.text;
        let size = text.font_size;
        let vertical = text.wmode() == 1;
        let rise = text.transform_delta(0.0, text.rise);
        let mut rest = bytes;

        while let Some(c) = font.next_char(rest) {
            let text = &self.state.text;
            let word_space = if c.len == 1 && c.code == 0x20 {
                text.word_space
            } else {
                0.0
            };

            let (dx, dy) = if vertical {
                (c.dx * size, c.dy * size + text.char_space + word_space)
            } else {
                (
                    (c.dx * size + text.char_space + word_space) * text.horiz_scaling,
                    c.dy * size,
                )
            };

            let advance = text.transform_delta(dx, dy);
            let origin = text.transform_delta(c.origin_x * size, c.origin_y * size);
            let pen = Point::new(text.cur_x + rise.x, text.cur_y + rise.y);

            if glyphs {
                self.draw_glyph(&font, c.code, pen);
            } else {
                self.builder.add_char(
                    &self.state,
                    &CharPlacement {
                        x: pen.x,
                        y: pen.y,
                        dx,
                        dy,
                        origin_x: origin.x,
                        origin_y: origin.y,
                        code: c.code,
                        len: c.len,
                        unicode: &c.unicode,
                    },
                );
            }

            self.state.text.shift(advance.x, advance.y);
            rest = rest.get(c.len.max(1)..).unwrap_or_default();
        }

        self.builder.end_string(&self.state);
    }

    /// Run the glyph procedure of a Type 3 character at `pen`.
    fn draw_glyph(&mut self, font: &Font, code: u32, pen: Point) {
        if self.type3_depth > MAX_NESTING {
            return;
        }

        let Some(proc) = font.char_proc(code) else {
            return;
        };

        let ctm = self.state.ctm;

        if !ctm.is_invertible() {
            return;
        }

        let text = &self.state.text;
        let glyph_ctm = (ctm
            * text.matrix
            * Affine::scale_non_uniform(text.font_size * text.horiz_scaling, text.font_size)
            * font.font_matrix())
        .with_translation((ctm * pen).to_vec2());

        self.save_state();
        self.concat_nested(ctm.inverse() * glyph_ctm);
        self.push_resources(font.resources().cloned().unwrap_or_else(Dict::new));
        self.type3_depth += 1;
        self.run_nested(&proc);
        self.type3_depth -= 1;
        self.pop_resources();
        self.restore_state();
    }
}
