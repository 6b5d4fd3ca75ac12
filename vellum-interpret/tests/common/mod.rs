#![allow(dead_code)]

use kurbo::{Affine, BezPath, Rect};
use std::sync::{Arc, Mutex};
use vellum_interpret::builder::{CharPlacement, Paint, PaintId, SoftMask, TransparencyGroup};
use vellum_interpret::gradient::Gradient;
use vellum_interpret::image::{ColorMap, ImageData};
use vellum_interpret::pattern::{Pattern, TilingPattern};
use vellum_interpret::shading::Shading;
use vellum_interpret::state::State;
use vellum_interpret::style::Style;
use vellum_interpret::vellum_syntax::XRef;
use vellum_interpret::vellum_syntax::object::{Dict, Name, Object, Stream};
use vellum_interpret::{
    Builder, ClipPath, Diagnostic, Interpreter, InterpreterSettings, PageParams,
};

/// A builder call, with the parts of its arguments that tests look at.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DocumentSize(f64, f64),
    Save,
    Restore,
    PushGroup,
    SetTransform(Affine),
    AddPath {
        style: String,
        path: BezPath,
        ctm: Affine,
    },
    Clip(bool),
    SetClipPath(bool),
    Gradient(bool),
    ShadedFill,
    PushTiling(bool),
    PopTiling,
    BeginText,
    EndText,
    UpdateFont,
    UpdateTextMatrix,
    TextPosition(f64, f64),
    TextShift(f64),
    BeginString(Vec<u8>),
    Char {
        x: f64,
        y: f64,
        dx: f64,
        code: u32,
        unicode: String,
    },
    EndString,
    ImageMask(bool),
    Image {
        width: u32,
        height: u32,
        mask_colors: Option<Vec<u32>>,
    },
    MaskedImage(bool),
    SoftMaskedImage,
    PushTransparencyGroup {
        for_soft_mask: bool,
        isolated: bool,
    },
    PopTransparencyGroup,
    PaintTransparencyGroup(Rect),
    GroupOpacity(f32),
    SetSoftMask(bool),
    ClearSoftMask,
}

/// A builder that records its calls. Style updates are not recorded.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub gradients: Vec<Gradient>,
    pub tiling_patterns: Vec<TilingPattern>,
    pub shaded_clips: Vec<ClipPath>,
    /// Report shading patterns as unsupported, so that they are tessellated.
    pub no_shading_patterns: bool,
    pub transforms: Vec<Option<Affine>>,
}

impl Recorder {
    pub fn styles(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::AddPath { style, .. } => Some(style.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn ctms(&self) -> Vec<Affine> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::AddPath { ctm, .. } => Some(*ctm),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    pub fn paths(&self) -> usize {
        self.count(|c| matches!(c, Call::AddPath { .. }))
    }

    pub fn clips(&self) -> usize {
        self.count(|c| matches!(c, Call::Clip(_) | Call::SetClipPath(_)))
    }
}

impl Builder for Recorder {
    fn set_document_size(&mut self, width: f64, height: f64) {
        self.calls.push(Call::DocumentSize(width, height));
    }

    fn save_state(&mut self) {
        self.transforms.push(None);
        self.calls.push(Call::Save);
    }

    fn restore_state(&mut self) {
        self.transforms.pop();
        self.calls.push(Call::Restore);
    }

    fn push_group(&mut self) {
        if let Some(top) = self.transforms.last_mut() {
            *top = None;
        }

        self.calls.push(Call::PushGroup);
    }

    fn set_transform(&mut self, transform: Affine) {
        if let Some(top) = self.transforms.last_mut() {
            *top = Some(transform);
        }

        self.calls.push(Call::SetTransform(transform));
    }

    fn transform(&self) -> Option<Affine> {
        self.transforms.last().copied().flatten()
    }

    fn add_path(
        &mut self,
        state: &State,
        fill: Option<&Paint>,
        stroke: Option<&Paint>,
        even_odd: bool,
    ) {
        self.calls.push(Call::AddPath {
            style: Style::for_path(state, fill, stroke, even_odd).to_string(),
            path: state.path().clone(),
            ctm: state.ctm,
        });
    }

    fn clip(&mut self, _: &State, even_odd: bool) {
        self.calls.push(Call::Clip(even_odd));
    }

    fn set_clip_path(&mut self, _: &State, even_odd: bool) {
        self.calls.push(Call::SetClipPath(even_odd));
    }

    fn is_pattern_type_supported(&self, pattern: &Pattern) -> bool {
        match pattern {
            Pattern::Tiling(_) => true,
            Pattern::Shading(s) => {
                !self.no_shading_patterns && matches!(s.shading.shading_type(), 2 | 3)
            }
        }
    }

    fn add_gradient(&mut self, gradient: &Gradient, for_shading: bool) -> Option<PaintId> {
        self.gradients.push(gradient.clone());
        self.calls.push(Call::Gradient(for_shading));

        Some(PaintId(format!("gradient{}", self.gradients.len())))
    }

    fn add_shaded_fill(&mut self, _: &Shading, _: &PaintId, clip: &ClipPath) {
        self.shaded_clips.push(clip.clone());
        self.calls.push(Call::ShadedFill);
    }

    fn push_tiling_pattern(&mut self, pattern: &TilingPattern, is_stroke: bool) -> PaintId {
        self.tiling_patterns.push(pattern.clone());
        self.calls.push(Call::PushTiling(is_stroke));

        PaintId(format!("pattern{}", self.tiling_patterns.len()))
    }

    fn pop_tiling_pattern(&mut self) {
        self.calls.push(Call::PopTiling);
    }

    fn begin_text_object(&mut self, _: &State) {
        self.calls.push(Call::BeginText);
    }

    fn end_text_object(&mut self, _: &State) {
        self.calls.push(Call::EndText);
    }

    fn update_font(&mut self, _: &State) {
        self.calls.push(Call::UpdateFont);
    }

    fn update_text_matrix(&mut self, _: &State) {
        self.calls.push(Call::UpdateTextMatrix);
    }

    fn update_text_position(&mut self, x: f64, y: f64) {
        self.calls.push(Call::TextPosition(x, y));
    }

    fn update_text_shift(&mut self, _: &State, shift: f64) {
        self.calls.push(Call::TextShift(shift));
    }

    fn begin_string(&mut self, _: &State, bytes: &[u8]) {
        self.calls.push(Call::BeginString(bytes.to_vec()));
    }

    fn add_char(&mut self, _: &State, placement: &CharPlacement<'_>) {
        self.calls.push(Call::Char {
            x: placement.x,
            y: placement.y,
            dx: placement.dx,
            code: placement.code,
            unicode: placement.unicode.to_string(),
        });
    }

    fn end_string(&mut self, _: &State) {
        self.calls.push(Call::EndString);
    }

    fn add_image_mask(&mut self, _: &State, _: &ImageData, invert: bool) {
        self.calls.push(Call::ImageMask(invert));
    }

    fn add_image(
        &mut self,
        _: &State,
        image: &ImageData,
        _: &ColorMap,
        mask_colors: Option<&[u32]>,
    ) {
        self.calls.push(Call::Image {
            width: image.width,
            height: image.height,
            mask_colors: mask_colors.map(<[u32]>::to_vec),
        });
    }

    fn add_masked_image(
        &mut self,
        _: &State,
        _: &ImageData,
        _: &ColorMap,
        _: &ImageData,
        invert: bool,
    ) {
        self.calls.push(Call::MaskedImage(invert));
    }

    fn add_soft_masked_image(
        &mut self,
        _: &State,
        _: &ImageData,
        _: &ColorMap,
        _: &ImageData,
        _: &ColorMap,
    ) {
        self.calls.push(Call::SoftMaskedImage);
    }

    fn push_transparency_group(&mut self, _: &State, group: &TransparencyGroup) {
        self.calls.push(Call::PushTransparencyGroup {
            for_soft_mask: group.for_soft_mask,
            isolated: group.isolated,
        });
    }

    fn pop_transparency_group(&mut self, _: &State) {
        self.calls.push(Call::PopTransparencyGroup);
    }

    fn paint_transparency_group(&mut self, _: &State, bbox: Rect) {
        self.calls.push(Call::PaintTransparencyGroup(bbox));
    }

    fn set_group_opacity(&mut self, opacity: f32) {
        self.calls.push(Call::GroupOpacity(opacity));
    }

    fn set_soft_mask(&mut self, _: &State, mask: &SoftMask) {
        self.calls.push(Call::SetSoftMask(mask.alpha));
    }

    fn clear_soft_mask(&mut self, _: &State) {
        self.calls.push(Call::ClearSoftMask);
    }
}

/// The page all tests run on.
pub const PAGE: Rect = Rect::new(0.0, 0.0, 200.0, 200.0);

/// The page transform of [`PAGE`], flipping the y axis.
pub const PAGE_CTM: Affine = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, 200.0]);

/// The number of builder calls made when an interpreter for [`PAGE`] is created.
pub const SETUP_CALLS: usize = 3;

/// Settings whose warning sink collects the diagnostics.
pub fn settings() -> (InterpreterSettings, Arc<Mutex<Vec<Diagnostic>>>) {
    let diagnostics = Arc::new(Mutex::new(Vec::new()));
    let sink = diagnostics.clone();
    let settings = InterpreterSettings {
        warning_sink: Arc::new(move |d| sink.lock().unwrap().push(d)),
        ..InterpreterSettings::default()
    };

    (settings, diagnostics)
}

pub fn stream(dict: Dict, content: &[u8]) -> Object {
    Object::Stream(Stream::new(dict, content.to_vec()))
}

pub fn name(name: &str) -> Object {
    Object::Name(Name::from(name))
}

/// A resource dictionary with a single category.
pub fn resources(category: &str, entries: Vec<(&str, Object)>) -> Dict {
    let entries = entries.into_iter().collect::<Dict>();

    Dict::new().with(category, entries)
}

/// The dictionary of a form XObject with the given bounding box.
pub fn form_dict(bbox: [i32; 4]) -> Dict {
    Dict::new()
        .with("Type", name("XObject"))
        .with("Subtype", name("Form"))
        .with("BBox", bbox.to_vec())
}

pub fn form(bbox: [i32; 4], content: &[u8]) -> Object {
    stream(form_dict(bbox), content)
}

/// Run `content` on [`PAGE`]. The page setup calls are not part of the result,
/// but the restores made when the interpreter is dropped are.
pub fn run(content: &[u8]) -> (Recorder, Vec<Diagnostic>) {
    run_with(&XRef::new(), Dict::new(), content)
}

pub fn run_with(xref: &XRef, resources: Dict, content: &[u8]) -> (Recorder, Vec<Diagnostic>) {
    run_recorder(xref, resources, content, Recorder::default())
}

pub fn run_recorder(
    xref: &XRef,
    resources: Dict,
    content: &[u8],
    recorder: Recorder,
) -> (Recorder, Vec<Diagnostic>) {
    inspect(xref, resources, content, recorder, |_| {})
}

/// Like [`run_recorder`], but `check` can look at the interpreter after the
/// content ran and before it is dropped.
pub fn inspect(
    xref: &XRef,
    resources: Dict,
    content: &[u8],
    mut recorder: Recorder,
    check: impl FnOnce(&Interpreter<'_>),
) -> (Recorder, Vec<Diagnostic>) {
    let (settings, diagnostics) = settings();

    {
        let params = PageParams::new(PAGE, 0, resources);
        let mut interpreter = Interpreter::new(xref, &mut recorder, params, settings);
        interpreter
            .parse(&stream(Dict::new(), content))
            .expect("content is a stream");
        check(&interpreter);
    }

    recorder.calls.drain(..SETUP_CALLS);
    let diagnostics = diagnostics.lock().unwrap().clone();

    (recorder, diagnostics)
}
