use crate::builder::Builder;
use crate::clip_history::ClipHistory;
use crate::diagnostic::Diagnostic;
use crate::font::Font;
use crate::op_history::OpHistory;
use crate::operator::{self, Arity, MAX_OPERANDS, OpKind};
use crate::state::{FillRule, State};
use crate::tessellate::ShadingPrecision;
use crate::util::AffineExt;
use crate::{InterpretError, InterpreterSettings};
use kurbo::{Affine, Cap, Join, Point, Rect};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use vellum_syntax::content::{ContentParser, ContentToken};
use vellum_syntax::object::{Dict, Name, ObjRef, Object, Stream};
use vellum_syntax::{Page, PageBox, XRef};

pub(crate) mod color;
pub(crate) mod image;
pub(crate) mod path;
pub(crate) mod shading;
pub(crate) mod state;
pub(crate) mod text;
pub(crate) mod x_object;

/// The number of output pixels per PDF point.
pub const PX_PER_PT: f64 = 1.25;

/// How deeply forms, soft masks, tiling patterns and Type 3 glyphs may nest.
pub(crate) const MAX_NESTING: usize = 20;

/// The page that is being interpreted.
#[derive(Debug, Clone)]
pub struct PageParams {
    /// The page box the coordinate system is derived from, usually the media box.
    pub bbox: Rect,
    /// The rotation of the page in degrees. Values other than 90, 180 and 270
    /// mean no rotation.
    pub rotation: u32,
    /// The resources of the page.
    pub resources: Dict,
    /// The crop box. If it doesn't cover the whole page, the page is clipped to it.
    pub crop_box: Option<Rect>,
}

impl PageParams {
    /// Create new page parameters without a crop box.
    pub fn new(bbox: Rect, rotation: u32, resources: Dict) -> Self {
        Self {
            bbox,
            rotation,
            resources,
            crop_box: None,
        }
    }

    /// Set the crop box.
    pub fn with_crop_box(mut self, crop_box: Rect) -> Self {
        self.crop_box = Some(crop_box);
        self
    }

    /// The parameters of a page of a document, clipped to `crop` if given.
    pub fn from_page(page: &Page, crop: Option<PageBox>) -> Self {
        Self {
            bbox: page.media_box(),
            rotation: page.rotation(),
            resources: page.resources().clone(),
            crop_box: crop.map(|b| page.page_box(b)),
        }
    }
}

/// An interpreter for content streams.
///
/// An interpreter is created either for a page, in which case it sets up the page
/// coordinate system on the builder, or for the content of a tiling pattern. Any
/// number of content objects can then be run with [`Interpreter::parse`]. Saved
/// states that are still open when the interpreter is dropped are restored.
pub struct Interpreter<'a> {
    xref: &'a XRef,
    builder: &'a mut dyn Builder,
    settings: InterpreterSettings,
    precision: ShadingPrecision,

    state: State,
    saved: Vec<State>,
    clip_history: ClipHistory,
    resources: Vec<Dict>,
    op_history: OpHistory,
    font_cache: FxHashMap<ObjRef, Font>,

    // The CTM at the start of the page or of the current form. Pattern space maps
    // to this coordinate system.
    base_matrix: Affine,
    // The first transform that was set on the builder's own groups.
    ttm: Option<Affine>,
    pending_clip: Option<FillRule>,
    font_changed: bool,
    ignore_undef: u32,
    marked_content: u32,
    // The number of saved states that belong to the interpreter itself.
    base_depth: usize,
    // `Q` doesn't restore below this depth.
    restore_floor: usize,
    nesting: usize,
    type3_depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter for a page.
    ///
    /// This sets the document size and the page transform on the builder and clips
    /// to the crop box, if there is one.
    pub fn new(
        xref: &'a XRef,
        builder: &'a mut dyn Builder,
        params: PageParams,
        settings: InterpreterSettings,
    ) -> Self {
        let PageParams {
            bbox,
            rotation,
            resources,
            crop_box,
        } = params;
        let (x1, y1, x2, y2) = (bbox.x0, bbox.y0, bbox.x1, bbox.y1);

        // The y axis points down in the output.
        let (ctm, width, height) = match rotation {
            90 => (Affine::new([0.0, 1.0, 1.0, 0.0, -y1, -x1]), y2 - y1, x2 - x1),
            180 => (Affine::new([-1.0, 0.0, 0.0, 1.0, x2, -y1]), x2 - x1, y2 - y1),
            270 => (Affine::new([0.0, -1.0, -1.0, 0.0, y2, x2]), y2 - y1, x2 - x1),
            _ => (Affine::new([1.0, 0.0, 0.0, -1.0, -x1, y2]), x2 - x1, y2 - y1),
        };

        let mut interpreter = Self::with_state(xref, builder, resources, ctm, settings);

        interpreter
            .builder
            .set_document_size(width * PX_PER_PT, height * PX_PER_PT);
        interpreter.save_state();
        interpreter
            .builder
            .set_transform(Affine::scale(PX_PER_PT) * ctm);

        if let Some(crop) = crop_box
            && (crop.x0 != 0.0 || crop.y0 != 0.0 || crop.x1 != width || crop.y1 != height)
        {
            interpreter.state.rect(crop);
            interpreter
                .clip_history
                .set_clip(interpreter.state.path().clone(), FillRule::NonZero);
            interpreter.builder.set_clip_path(&interpreter.state, false);
            interpreter.state.clear_path();
        }

        interpreter.base_depth = interpreter.saved.len();
        interpreter.restore_floor = interpreter.base_depth;
        interpreter.op_history.push("startPage");

        interpreter
    }

    /// Create an interpreter for the content of a tiling pattern with the given cell
    /// bounding box. Nothing is reported to the builder until content is parsed.
    pub fn new_pattern(
        xref: &'a XRef,
        builder: &'a mut dyn Builder,
        resources: Dict,
        bbox: Rect,
        settings: InterpreterSettings,
    ) -> Self {
        let ctm = Affine::translate((-bbox.x0, -bbox.y0));

        Self::with_state(xref, builder, resources, ctm, settings)
    }

    fn with_state(
        xref: &'a XRef,
        builder: &'a mut dyn Builder,
        resources: Dict,
        ctm: Affine,
        settings: InterpreterSettings,
    ) -> Self {
        Self {
            xref,
            builder,
            precision: settings.shading_precision,
            settings,
            state: State::new(ctm),
            saved: Vec::new(),
            clip_history: ClipHistory::new(),
            resources: vec![resources],
            op_history: OpHistory::new(),
            font_cache: FxHashMap::default(),
            base_matrix: ctm,
            ttm: None,
            pending_clip: None,
            font_changed: false,
            ignore_undef: 0,
            marked_content: 0,
            base_depth: 0,
            restore_floor: 0,
            nesting: 0,
            type3_depth: 0,
        }
    }

    /// Interpret a content object: a stream, or an array of streams that are
    /// concatenated.
    pub fn parse(&mut self, contents: &Object) -> Result<(), InterpretError> {
        let data = match self.xref.resolve(contents) {
            Object::Stream(stream) => self.decode(&stream),
            Object::Array(array) => {
                let mut data = Vec::new();

                for item in array.iter() {
                    let Object::Stream(stream) = self.xref.resolve(item) else {
                        return Err(InterpretError::WeirdPageContents);
                    };

                    if !data.is_empty() {
                        data.push(b' ');
                    }

                    data.extend(self.decode(&stream));
                }

                data
            }
            _ => return Err(InterpretError::WeirdPageContents),
        };

        self.run(&data);

        Ok(())
    }

    /// Set the tessellation precision of a shading type, for all following
    /// shadings of that type.
    pub fn set_approximation_precision(&mut self, shading_type: u8, delta: f32, max_depth: u32) {
        self.precision.set(shading_type, delta, max_depth);
    }

    /// The current graphics state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The number of states saved with `q` that are still open.
    pub fn saved_states(&self) -> usize {
        self.saved.len() - self.base_depth
    }

    /// The number of saved clip levels that are still open. Always equal to
    /// [`Interpreter::saved_states`].
    pub fn clip_depth(&self) -> usize {
        self.clip_history.depth() - self.base_depth
    }

    /// The number of resource dictionaries on the lookup stack.
    pub fn resource_depth(&self) -> usize {
        self.resources.len()
    }

    /// The clip that will be applied by the next path-ending operator.
    pub fn pending_clip(&self) -> Option<FillRule> {
        self.pending_clip
    }

    /// The names of the most recently executed operators.
    pub fn op_history(&self) -> &OpHistory {
        &self.op_history
    }

    fn decode(&self, stream: &Stream) -> Vec<u8> {
        stream.decoded(self.xref).unwrap_or_else(|| {
            warn!("failed to decode content stream");

            Vec::new()
        })
    }

    fn run(&mut self, data: &[u8]) {
        let mut parser = ContentParser::new(data);
        let mut args: Vec<Object> = Vec::with_capacity(MAX_OPERANDS);

        while let Some(token) = parser.next() {
            match token {
                ContentToken::Operand(obj) => {
                    if args.len() < MAX_OPERANDS {
                        args.push(obj);
                    } else {
                        self.warn(Diagnostic::OperandOverflow {
                            offset: parser.offset(),
                        });
                    }
                }
                ContentToken::Command(cmd) => {
                    self.exec_op(cmd.as_bytes(), &args, &mut parser);
                    args.clear();
                }
            }
        }

        if !args.is_empty() {
            self.warn(Diagnostic::LeftoverOperands(args.len()));
        }
    }

    /// Run nested content (a form or a glyph procedure). States that the content
    /// leaves open are restored afterwards.
    pub(crate) fn run_nested(&mut self, stream: &Stream) {
        let data = self.decode(stream);
        let depth = self.saved.len();
        let floor = std::mem::replace(&mut self.restore_floor, depth);

        self.run(&data);

        while self.saved.len() > depth {
            self.restore_state();
        }

        self.restore_floor = floor;
    }

    fn exec_op(&mut self, name: &[u8], args: &[Object], parser: &mut ContentParser<'_>) {
        let Some(op) = operator::find(name) else {
            if self.ignore_undef == 0 {
                self.warn(Diagnostic::UnknownOperator(
                    String::from_utf8_lossy(name).into_owned(),
                ));
            }

            return;
        };

        let args = match op.arity {
            Arity::Exact(n) => {
                if args.len() < n {
                    self.warn(Diagnostic::TooFewArguments {
                        op: op.name,
                        expected: n,
                        found: args.len(),
                    });

                    return;
                }

                // Extra operands are dropped from the front.
                &args[args.len() - n..]
            }
            Arity::AtMost(n) => {
                if args.len() > n {
                    self.warn(Diagnostic::TooManyArguments {
                        op: op.name,
                        max: n,
                        found: args.len(),
                    });

                    return;
                }

                args
            }
        };

        for (index, arg) in args.iter().enumerate() {
            if !op.check(index).accepts(arg) {
                self.warn(Diagnostic::ArgumentType {
                    op: op.name,
                    index,
                    found: arg.type_name(),
                });

                return;
            }
        }

        self.op_history.push(op.name);
        self.dispatch(op.kind, op.name, args, parser);
    }

    fn dispatch(
        &mut self,
        kind: OpKind,
        name: &'static str,
        args: &[Object],
        parser: &mut ContentParser<'_>,
    ) {
        match kind {
            // Graphics state.
            OpKind::Save => self.save_state(),
            OpKind::Restore => self.restore(),
            OpKind::Concat => self.concat(matrix(args)),
            OpKind::SetLineWidth => {
                self.state.line_width = num(args, 0);
                self.builder.update_style(&self.state);
            }
            OpKind::SetLineCap => {
                match args.first().and_then(int) {
                    Some(0) => self.state.line_cap = Cap::Butt,
                    Some(1) => self.state.line_cap = Cap::Round,
                    Some(2) => self.state.line_cap = Cap::Square,
                    _ => warn!("invalid line cap"),
                }
                self.builder.update_style(&self.state);
            }
            OpKind::SetLineJoin => {
                match args.first().and_then(int) {
                    Some(0) => self.state.line_join = Join::Miter,
                    Some(1) => self.state.line_join = Join::Round,
                    Some(2) => self.state.line_join = Join::Bevel,
                    _ => warn!("invalid line join"),
                }
                self.builder.update_style(&self.state);
            }
            OpKind::SetMiterLimit => {
                self.state.miter_limit = num(args, 0);
                self.builder.update_style(&self.state);
            }
            OpKind::SetDash => {
                if let Some(dashes) = args
                    .first()
                    .and_then(Object::as_array)
                    .and_then(|a| a.to_vec::<f64>(self.xref))
                {
                    self.state.dash_array = dashes.into_iter().collect();
                    self.state.dash_phase = num(args, 1);
                }
                self.builder.update_style(&self.state);
            }
            OpKind::SetRenderingIntent => {
                if let Some(intent) = args.first().and_then(Object::as_name) {
                    self.state.rendering_intent = intent.as_str().into_owned();
                }
            }
            OpKind::SetFlatness => self.state.flatness = num(args, 0),
            OpKind::SetExtGState => {
                if let Some(name) = args.first().and_then(Object::as_name) {
                    self.set_ext_g_state(name);
                }
            }

            // Paths.
            OpKind::MoveTo => self.move_to(point(args, 0)),
            OpKind::LineTo => self.line_to(point(args, 0)),
            OpKind::CurveTo => self.curve_to(point(args, 0), point(args, 2), point(args, 4)),
            OpKind::CurveTo1 => self.curve_to1(point(args, 0), point(args, 2)),
            OpKind::CurveTo2 => self.curve_to2(point(args, 0), point(args, 2)),
            OpKind::ClosePath => self.close_path(),
            OpKind::Rectangle => self.rectangle(
                num(args, 0),
                num(args, 1),
                num(args, 2),
                num(args, 3),
            ),
            OpKind::EndPath => self.end_path(),
            OpKind::Stroke => self.paint_path("stroke", false, true, false, false),
            OpKind::CloseStroke => self.paint_path("closestroke", false, true, false, true),
            OpKind::Fill | OpKind::FillCompat => self.paint_path("fill", true, false, false, false),
            OpKind::EoFill => self.paint_path("eofill", true, false, true, false),
            OpKind::FillStroke => self.paint_path("fillstroke", true, true, false, false),
            OpKind::EoFillStroke => self.paint_path("eofillstroke", true, true, true, false),
            OpKind::CloseFillStroke => self.paint_path("closefillstroke", true, true, false, true),
            OpKind::CloseEoFillStroke => {
                self.paint_path("closeeofillstroke", true, true, true, true)
            }
            OpKind::ShFill => {
                if let Some(name) = args.first().and_then(Object::as_name) {
                    self.shading_fill(name);
                }
            }
            OpKind::Clip => self.pending_clip = Some(FillRule::NonZero),
            OpKind::EoClip => self.pending_clip = Some(FillRule::EvenOdd),

            // Colors.
            OpKind::SetFillGray => self.set_device_color(false, args, DeviceSpace::Gray),
            OpKind::SetStrokeGray => self.set_device_color(true, args, DeviceSpace::Gray),
            OpKind::SetFillRgb => self.set_device_color(false, args, DeviceSpace::Rgb),
            OpKind::SetStrokeRgb => self.set_device_color(true, args, DeviceSpace::Rgb),
            OpKind::SetFillCmyk => self.set_device_color(false, args, DeviceSpace::Cmyk),
            OpKind::SetStrokeCmyk => self.set_device_color(true, args, DeviceSpace::Cmyk),
            OpKind::SetFillColorSpace => self.set_color_space(false, args),
            OpKind::SetStrokeColorSpace => self.set_color_space(true, args),
            OpKind::SetFillColor => self.set_color(false, name, args),
            OpKind::SetStrokeColor => self.set_color(true, name, args),
            OpKind::SetFillColorN => self.set_color_n(false, name, args),
            OpKind::SetStrokeColorN => self.set_color_n(true, name, args),

            // Text.
            OpKind::BeginText => self.begin_text(),
            OpKind::EndText => self.builder.end_text_object(&self.state),
            OpKind::SetCharSpacing => self.state.text.char_space = num(args, 0),
            OpKind::SetWordSpacing => self.state.text.word_space = num(args, 0),
            OpKind::SetHorizScaling => self.set_horiz_scaling(num(args, 0)),
            OpKind::SetTextLeading => self.state.text.leading = num(args, 0),
            OpKind::SetFont => {
                if let Some(font) = args.first().and_then(Object::as_name) {
                    self.set_font(font, num(args, 1));
                }
            }
            OpKind::SetTextRender => self.set_text_render(args.first().and_then(int)),
            OpKind::SetTextRise => self.state.text.rise = num(args, 0),
            OpKind::TextMove => self.text_move(num(args, 0), num(args, 1)),
            OpKind::TextMoveSet => {
                self.state.text.leading = -num(args, 1);
                self.text_move(num(args, 0), num(args, 1));
            }
            OpKind::SetTextMatrix => self.set_text_matrix(matrix(args)),
            OpKind::TextNextLine => self.text_next_line(),
            OpKind::ShowText => self.show_text(name, args),
            OpKind::MoveShowText => self.show_text(name, args),
            OpKind::MoveSetShowText => self.show_text(name, args),
            OpKind::ShowSpaceText => self.show_space_text(name, args),
            OpKind::SetCharWidth | OpKind::SetCacheDevice => {}

            // XObjects and images.
            OpKind::XObject => {
                if let Some(name) = args.first().and_then(Object::as_name) {
                    self.do_x_object(name);
                }
            }
            OpKind::BeginImage => self.inline_image(parser),
            OpKind::ImageData | OpKind::EndImage => {
                self.warn(Diagnostic::UnexpectedOperator(name));
            }

            // Compatibility and marked content.
            OpKind::BeginIgnoreUndef => self.ignore_undef = self.ignore_undef.saturating_add(1),
            OpKind::EndIgnoreUndef => self.ignore_undef = self.ignore_undef.saturating_sub(1),
            OpKind::BeginMarkedContent | OpKind::BeginMarkedContentProps => {
                self.marked_content += 1;
                debug!("begin marked content, depth {}", self.marked_content);
            }
            OpKind::EndMarkedContent => {
                if self.marked_content == 0 {
                    self.warn(Diagnostic::UnbalancedMarkedContent);
                } else {
                    self.marked_content -= 1;
                }
            }
            OpKind::MarkPoint | OpKind::MarkPointProps => {}
        }
    }

    /// Report a diagnostic.
    pub(crate) fn warn(&self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        (self.settings.warning_sink)(diagnostic);
    }

    /// Look up a named resource in the resource stack, innermost first. The entry
    /// is returned as is, so it may be a reference.
    pub(crate) fn lookup(&self, category: &[u8], name: &Name) -> Option<Object> {
        self.resources.iter().rev().find_map(|res| {
            res.get::<Dict>(category, self.xref)
                .and_then(|d| d.get_raw(name).cloned())
        })
    }

    /// Like [`Interpreter::lookup`], but resolves the entry and reports missing
    /// resources.
    pub(crate) fn lookup_resolved(
        &self,
        category: &[u8],
        label: &'static str,
        name: &Name,
    ) -> Option<Object> {
        let found = self.lookup(category, name).map(|o| self.xref.resolve(&o));

        if found.is_none() {
            self.warn(Diagnostic::MissingResource {
                category: label,
                name: name.as_str().into_owned(),
            });
        }

        found
    }

    pub(crate) fn push_resources(&mut self, resources: Dict) {
        self.resources.push(resources);
    }

    pub(crate) fn pop_resources(&mut self) {
        // The page or pattern resources stay.
        if self.resources.len() > 1 {
            self.resources.pop();
        }
    }

    /// Save the graphics state, on the builder as well.
    pub(crate) fn save_state(&mut self) {
        self.builder.save_state();
        self.saved.push(self.state.clone());
        self.clip_history.save();
    }

    /// Restore the graphics state. The path under construction is kept.
    pub(crate) fn restore_state(&mut self) {
        let Some(mut restored) = self.saved.pop() else {
            return;
        };

        self.clip_history.restore();
        std::mem::swap(&mut self.state, &mut restored);
        self.state.set_path(restored.path().clone());
        self.builder.restore_state();
    }

    fn restore(&mut self) {
        if self.saved.len() <= self.restore_floor {
            self.warn(Diagnostic::UnbalancedRestore);

            return;
        }

        self.restore_state();
    }

    /// Set the transform of the builder's current group.
    pub(crate) fn set_builder_transform(&mut self, transform: Affine) {
        if self.ttm.is_none() {
            self.ttm = Some(transform);
        }

        self.builder.set_transform(transform);
    }

    fn concat(&mut self, m: Affine) {
        self.state.ctm = self.state.ctm * m;

        match self.op_history.previous(1) {
            // A fresh group from `q` can take the transform directly.
            "q" => self.set_builder_transform(m),
            "cm" | "startPage" => {
                let current = self.builder.transform().unwrap_or(Affine::IDENTITY);
                self.set_builder_transform(current * m);
            }
            _ => {
                self.builder.push_group();
                self.set_builder_transform(m);
            }
        }

        self.font_changed = true;
    }

    /// Concatenate a transform for nested content that runs in a state that was
    /// just saved.
    pub(crate) fn concat_nested(&mut self, m: Affine) {
        self.state.ctm = self.state.ctm * m;
        self.builder.push_group();
        self.set_builder_transform(m);
        self.font_changed = true;
    }

    /// The transform that maps pattern space into the coordinate system of the
    /// builder's groups.
    pub(crate) fn pattern_transform(&self, pattern_matrix: Affine) -> Affine {
        match self.ttm {
            Some(ttm) if ttm.is_invertible() => ttm.inverse() * pattern_matrix,
            Some(_) => Affine::IDENTITY,
            None => pattern_matrix,
        }
    }

    pub(crate) fn xref(&self) -> &'a XRef {
        self.xref
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        while !self.saved.is_empty() {
            self.restore_state();
        }

        self.resources.clear();
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum DeviceSpace {
    Gray,
    Rgb,
    Cmyk,
}

pub(crate) fn num(args: &[Object], index: usize) -> f64 {
    args.get(index)
        .and_then(Object::as_number)
        .map(|n| n.as_f64())
        .unwrap_or(0.0)
}

pub(crate) fn int(obj: &Object) -> Option<i64> {
    obj.as_number().map(|n| n.as_i64())
}

fn point(args: &[Object], index: usize) -> Point {
    Point::new(num(args, index), num(args, index + 1))
}

fn matrix(args: &[Object]) -> Affine {
    Affine::new([
        num(args, 0),
        num(args, 1),
        num(args, 2),
        num(args, 3),
        num(args, 4),
        num(args, 5),
    ])
}
