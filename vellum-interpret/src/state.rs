//! The graphics state.

use crate::builder::SoftMask;
use crate::color::{ColorComponents, ColorSpace};
use crate::font::Font;
use crate::function::TransferFunction;
use crate::pattern::Pattern;
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Point, Rect, Shape, Vec2};
use smallvec::SmallVec;

/// A fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// The non-zero winding rule.
    #[default]
    NonZero,
    /// The even-odd rule.
    EvenOdd,
}

impl FillRule {
    /// Whether this is the even-odd rule.
    pub fn is_even_odd(self) -> bool {
        self == Self::EvenOdd
    }
}

/// A blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Parse a blend mode from its PDF name. `Compatible` is an alias of `Normal`.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"Normal" | b"Compatible" => Self::Normal,
            b"Multiply" => Self::Multiply,
            b"Screen" => Self::Screen,
            b"Overlay" => Self::Overlay,
            b"Darken" => Self::Darken,
            b"Lighten" => Self::Lighten,
            b"ColorDodge" => Self::ColorDodge,
            b"ColorBurn" => Self::ColorBurn,
            b"HardLight" => Self::HardLight,
            b"SoftLight" => Self::SoftLight,
            b"Difference" => Self::Difference,
            b"Exclusion" => Self::Exclusion,
            b"Hue" => Self::Hue,
            b"Saturation" => Self::Saturation,
            b"Color" => Self::Color,
            b"Luminosity" => Self::Luminosity,
            _ => return None,
        })
    }

    /// The name of the blend mode in CSS.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }
}

/// A text rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderingMode {
    /// Fill text.
    #[default]
    Fill,
    /// Stroke text.
    Stroke,
    /// Fill, then stroke text.
    FillStroke,
    /// Neither fill nor stroke text (invisible).
    Invisible,
    /// Fill text and add to path for clipping.
    FillAndClip,
    /// Stroke text and add to path for clipping.
    StrokeAndClip,
    /// Fill, then stroke text and add to path for clipping.
    FillAndStrokeAndClip,
    /// Add text to path for clipping.
    Clip,
}

impl TextRenderingMode {
    /// Convert the operand of `Tr`. Values outside of `0..=7` are rejected.
    pub fn from_i64(value: i64) -> Option<Self> {
        Some(match value {
            0 => Self::Fill,
            1 => Self::Stroke,
            2 => Self::FillStroke,
            3 => Self::Invisible,
            4 => Self::FillAndClip,
            5 => Self::StrokeAndClip,
            6 => Self::FillAndStrokeAndClip,
            7 => Self::Clip,
            _ => return None,
        })
    }

    /// Whether glyphs are filled.
    pub fn is_fill(self) -> bool {
        matches!(
            self,
            Self::Fill | Self::FillStroke | Self::FillAndClip | Self::FillAndStrokeAndClip
        )
    }

    /// Whether glyphs are stroked.
    pub fn is_stroke(self) -> bool {
        matches!(
            self,
            Self::Stroke | Self::FillStroke | Self::StrokeAndClip | Self::FillAndStrokeAndClip
        )
    }

    /// Whether glyphs contribute to the clip path.
    pub fn is_clip(self) -> bool {
        matches!(
            self,
            Self::FillAndClip | Self::StrokeAndClip | Self::FillAndStrokeAndClip | Self::Clip
        )
    }
}

/// The text state.
///
/// The current and line position are tracked the way most PDF consumers do it:
/// `line_x`/`line_y` are in text space relative to the text matrix, while
/// `cur_x`/`cur_y` are the text-matrix-transformed pen position in user space.
#[derive(Debug, Clone)]
pub struct TextState {
    /// The current font, if any.
    pub font: Option<Font>,
    /// The font size.
    pub font_size: f64,
    /// The text matrix.
    pub matrix: Affine,
    /// The character spacing.
    pub char_space: f64,
    /// The word spacing.
    pub word_space: f64,
    /// The horizontal scaling, as a factor. `100 Tz` is stored as 1.
    pub horiz_scaling: f64,
    /// The leading.
    pub leading: f64,
    /// The text rise.
    pub rise: f64,
    /// The rendering mode.
    pub render_mode: TextRenderingMode,
    /// The start of the current line, in text space.
    pub line_x: f64,
    #[allow(missing_docs)]
    pub line_y: f64,
    /// The pen position, in user space.
    pub cur_x: f64,
    #[allow(missing_docs)]
    pub cur_y: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 0.0,
            matrix: Affine::IDENTITY,
            char_space: 0.0,
            word_space: 0.0,
            horiz_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: TextRenderingMode::Fill,
            line_x: 0.0,
            line_y: 0.0,
            cur_x: 0.0,
            cur_y: 0.0,
        }
    }
}

impl TextState {
    /// Start a new line at `(tx, ty)` in text space.
    pub fn move_to(&mut self, tx: f64, ty: f64) {
        self.line_x = tx;
        self.line_y = ty;

        let cur = self.matrix * Point::new(tx, ty);
        self.cur_x = cur.x;
        self.cur_y = cur.y;
    }

    /// Transform a distance in text space into user space. The translation of the
    /// text matrix is ignored.
    pub fn transform_delta(&self, dx: f64, dy: f64) -> Vec2 {
        let [a, b, c, d, _, _] = self.matrix.as_coeffs();

        Vec2::new(a * dx + c * dy, b * dx + d * dy)
    }

    /// Advance the pen by a distance in text space.
    pub fn text_shift(&mut self, dx: f64, dy: f64) {
        let delta = self.transform_delta(dx, dy);
        self.shift(delta.x, delta.y);
    }

    /// Advance the pen by a distance in user space.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.cur_x += dx;
        self.cur_y += dy;
    }

    /// The writing mode of the current font: 0 for horizontal, 1 for vertical.
    pub fn wmode(&self) -> u8 {
        self.font.as_ref().map(|f| f.wmode()).unwrap_or(0)
    }
}

/// The graphics state, together with the path under construction.
#[derive(Debug, Clone)]
pub struct State {
    /// The current transformation matrix.
    pub ctm: Affine,

    // Paint parameters.
    /// The color space for non-stroking operations.
    pub fill_color_space: ColorSpace,
    /// The color for non-stroking operations.
    pub fill_color: ColorComponents,
    /// The pattern for non-stroking operations. Overrides the flat color.
    pub fill_pattern: Option<Pattern>,
    /// The color space for stroking operations.
    pub stroke_color_space: ColorSpace,
    /// The color for stroking operations.
    pub stroke_color: ColorComponents,
    /// The pattern for stroking operations. Overrides the flat color.
    pub stroke_pattern: Option<Pattern>,
    /// The non-stroking opacity.
    pub fill_opacity: f32,
    /// The stroking opacity.
    pub stroke_opacity: f32,
    /// The blend mode.
    pub blend_mode: BlendMode,
    /// Non-stroking overprint.
    pub fill_overprint: bool,
    /// Stroking overprint.
    pub stroke_overprint: bool,
    /// The overprint mode, 0 or 1.
    pub overprint_mode: u8,
    /// The active soft mask.
    pub soft_mask: Option<SoftMask>,
    /// The transfer function.
    pub transfer: Option<TransferFunction>,

    // Stroke parameters.
    /// The line width.
    pub line_width: f64,
    /// The line cap style.
    pub line_cap: Cap,
    /// The line join style.
    pub line_join: Join,
    /// The miter limit.
    pub miter_limit: f64,
    /// The dash array. Empty for solid lines.
    pub dash_array: SmallVec<[f64; 4]>,
    /// The dash phase.
    pub dash_phase: f64,
    /// Automatic stroke adjustment.
    pub stroke_adjust: bool,

    // Miscellaneous.
    /// The rendering intent.
    pub rendering_intent: String,
    /// The flatness tolerance.
    pub flatness: f64,
    /// The text state.
    pub text: TextState,

    // The path under construction, in user space.
    path: BezPath,
    cur_pt: Option<Point>,
    subpath_start: Point,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Affine::IDENTITY)
    }
}

impl State {
    /// Create a new state with default values and the given CTM.
    pub fn new(ctm: Affine) -> Self {
        let gray = ColorSpace::device_gray();

        Self {
            ctm,
            fill_color: gray.default_color(),
            fill_color_space: gray.clone(),
            fill_pattern: None,
            stroke_color: gray.default_color(),
            stroke_color_space: gray,
            stroke_pattern: None,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            blend_mode: BlendMode::Normal,
            fill_overprint: false,
            stroke_overprint: false,
            overprint_mode: 0,
            soft_mask: None,
            transfer: None,
            line_width: 1.0,
            line_cap: Cap::Butt,
            line_join: Join::Miter,
            miter_limit: 10.0,
            dash_array: SmallVec::new(),
            dash_phase: 0.0,
            stroke_adjust: false,
            rendering_intent: "RelativeColorimetric".to_string(),
            flatness: 1.0,
            text: TextState::default(),
            path: BezPath::new(),
            cur_pt: None,
            subpath_start: Point::ZERO,
        }
    }

    /// The path under construction, in user space.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// The path under construction, transformed by the CTM.
    pub fn device_path(&self) -> BezPath {
        self.ctm * self.path.clone()
    }

    /// The current point, if the path has one.
    pub fn cur_pt(&self) -> Option<Point> {
        self.cur_pt
    }

    /// Whether the path has a current point.
    pub fn is_cur_pt(&self) -> bool {
        self.cur_pt.is_some()
    }

    /// Whether the path contains at least one segment.
    pub fn is_path(&self) -> bool {
        self.path.elements().iter().any(|e| !matches!(e, PathEl::MoveTo(_)))
    }

    /// Begin a new subpath.
    pub fn move_to(&mut self, p: Point) {
        // Consecutive move-tos collapse into one.
        if let Some(PathEl::MoveTo(_)) = self.path.elements().last() {
            self.path.truncate(self.path.elements().len() - 1);
        }

        self.path.move_to(p);
        self.cur_pt = Some(p);
        self.subpath_start = p;
    }

    fn reopen(&mut self) {
        if matches!(self.path.elements().last(), Some(PathEl::ClosePath)) {
            self.path.move_to(self.subpath_start);
        }
    }

    /// Append a line. Returns `false` if there is no current point.
    pub fn line_to(&mut self, p: Point) -> bool {
        if self.cur_pt.is_none() {
            return false;
        }

        self.reopen();
        self.path.line_to(p);
        self.cur_pt = Some(p);

        true
    }

    /// Append a cubic Bézier curve. Returns `false` if there is no current point.
    pub fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) -> bool {
        if self.cur_pt.is_none() {
            return false;
        }

        self.reopen();
        self.path.curve_to(p1, p2, p3);
        self.cur_pt = Some(p3);

        true
    }

    /// Close the current subpath. The current point moves back to its start.
    pub fn close_path(&mut self) -> bool {
        if self.cur_pt.is_none() {
            return false;
        }

        if !matches!(
            self.path.elements().last(),
            Some(PathEl::ClosePath) | Some(PathEl::MoveTo(_))
        ) {
            self.path.close_path();
        }

        self.cur_pt = Some(self.subpath_start);

        true
    }

    /// Append a closed rectangle subpath.
    pub fn rect(&mut self, rect: Rect) {
        self.move_to(Point::new(rect.x0, rect.y0));
        self.path.line_to(Point::new(rect.x1, rect.y0));
        self.path.line_to(Point::new(rect.x1, rect.y1));
        self.path.line_to(Point::new(rect.x0, rect.y1));
        self.path.close_path();
    }

    /// Replace the path under construction. The current point becomes the end of
    /// the last segment.
    pub fn set_path(&mut self, path: BezPath) {
        let mut cur_pt = None;
        let mut start = Point::ZERO;

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    start = p;
                    cur_pt = Some(p);
                }
                PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                    cur_pt = Some(p);
                }
                PathEl::ClosePath => cur_pt = Some(start),
            }
        }

        self.path = path;
        self.cur_pt = cur_pt;
        self.subpath_start = start;
    }

    /// Discard the path under construction.
    pub fn clear_path(&mut self) {
        self.path = BezPath::new();
        self.cur_pt = None;
    }

    /// The bounding box of the current path, in user space.
    pub fn path_bbox(&self) -> Rect {
        self.path.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_needs_current_point() {
        let mut state = State::default();

        assert!(!state.line_to(Point::new(1.0, 1.0)));
        assert!(!state.is_cur_pt());

        state.move_to(Point::new(3.0, 4.0));
        assert!(state.is_cur_pt());
        assert!(!state.is_path());

        assert!(state.line_to(Point::new(5.0, 6.0)));
        assert!(state.is_path());
        assert_eq!(state.cur_pt(), Some(Point::new(5.0, 6.0)));

        state.clear_path();
        assert!(!state.is_cur_pt());
        assert!(state.path().elements().is_empty());
    }

    #[test]
    fn line_after_close_starts_new_subpath() {
        let mut state = State::default();
        state.move_to(Point::new(0.0, 0.0));
        state.line_to(Point::new(10.0, 0.0));
        state.close_path();
        assert_eq!(state.cur_pt(), Some(Point::ZERO));

        state.line_to(Point::new(0.0, 10.0));
        let els = state.path().elements();

        assert_eq!(els[3], PathEl::MoveTo(Point::ZERO));
        assert_eq!(els[4], PathEl::LineTo(Point::new(0.0, 10.0)));
    }

    #[test]
    fn rectangle() {
        let mut state = State::default();
        state.rect(Rect::new(10.0, 10.0, 110.0, 110.0));

        assert!(state.is_path());
        assert_eq!(state.path().elements().len(), 5);
        assert_eq!(state.path_bbox(), Rect::new(10.0, 10.0, 110.0, 110.0));
    }

    #[test]
    fn text_positions() {
        let mut text = TextState {
            matrix: Affine::new([2.0, 0.0, 0.0, 2.0, 100.0, 50.0]),
            ..TextState::default()
        };

        text.move_to(10.0, 5.0);
        assert_eq!((text.line_x, text.line_y), (10.0, 5.0));
        assert_eq!((text.cur_x, text.cur_y), (120.0, 60.0));

        text.text_shift(3.0, 0.0);
        assert_eq!((text.cur_x, text.cur_y), (126.0, 60.0));
        assert_eq!((text.line_x, text.line_y), (10.0, 5.0));
    }

    #[test]
    fn blend_modes() {
        assert_eq!(BlendMode::from_name(b"Compatible"), Some(BlendMode::Normal));
        assert_eq!(BlendMode::from_name(b"ColorDodge"), Some(BlendMode::ColorDodge));
        assert_eq!(BlendMode::from_name(b"Foo"), None);
        assert_eq!(BlendMode::HardLight.css_name(), "hard-light");
    }

    #[test]
    fn render_modes() {
        let mode = TextRenderingMode::from_i64(6).unwrap();

        assert!(mode.is_fill() && mode.is_stroke() && mode.is_clip());
        assert!(TextRenderingMode::from_i64(8).is_none());
    }
}
