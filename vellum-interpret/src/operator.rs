//! The table of content stream operators.
//!
//! Each operator declares how many operands it takes and which types they must have.
//! The table is sorted by the byte values of the operator names, so that lookups can
//! use a binary search.

use vellum_syntax::object::Object;

/// The maximum number of operands an operator can take, which is the most `scn`
/// can need for a DeviceN color space with 32 colorants plus a pattern name.
pub const MAX_OPERANDS: usize = 33;

/// The number of operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands. Extra leading operands are dropped.
    Exact(usize),
    /// Any number of operands up to this many.
    AtMost(usize),
}

/// A type check for a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCheck {
    /// A boolean.
    Bool,
    /// An integer or real number.
    Num,
    /// An integer.
    Int,
    /// A string.
    String,
    /// A name.
    Name,
    /// An array.
    Array,
    /// A dictionary or a name, for marked content properties.
    Props,
    /// A number or a name, for the operands of `scn` and `SCN`.
    Scn,
    /// Anything.
    Any,
}

impl ArgCheck {
    /// Whether the operand passes the check.
    pub fn accepts(self, obj: &Object) -> bool {
        match self {
            Self::Bool => matches!(obj, Object::Boolean(_)),
            Self::Num => matches!(obj, Object::Number(_)),
            Self::Int => matches!(obj, Object::Number(n) if n.is_integer()),
            Self::String => matches!(obj, Object::String(_)),
            Self::Name => matches!(obj, Object::Name(_)),
            Self::Array => matches!(obj, Object::Array(_)),
            Self::Props => matches!(obj, Object::Dict(_) | Object::Name(_)),
            Self::Scn => matches!(obj, Object::Number(_) | Object::Name(_)),
            Self::Any => true,
        }
    }
}

/// What an operator does.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    MoveSetShowText,
    MoveShowText,
    FillStroke,
    EoFillStroke,
    BeginMarkedContentProps,
    BeginImage,
    BeginMarkedContent,
    BeginText,
    BeginIgnoreUndef,
    SetStrokeColorSpace,
    MarkPointProps,
    XObject,
    EndImage,
    EndMarkedContent,
    EndText,
    EndIgnoreUndef,
    FillCompat,
    SetStrokeGray,
    ImageData,
    SetLineCap,
    SetStrokeCmyk,
    SetMiterLimit,
    MarkPoint,
    Restore,
    SetStrokeRgb,
    Stroke,
    SetStrokeColor,
    SetStrokeColorN,
    TextNextLine,
    TextMoveSet,
    ShowSpaceText,
    SetTextLeading,
    SetCharSpacing,
    TextMove,
    SetFont,
    ShowText,
    SetTextMatrix,
    SetTextRender,
    SetTextRise,
    SetWordSpacing,
    SetHorizScaling,
    Clip,
    EoClip,
    CloseFillStroke,
    CloseEoFillStroke,
    CurveTo,
    Concat,
    SetFillColorSpace,
    SetDash,
    SetCharWidth,
    SetCacheDevice,
    Fill,
    EoFill,
    SetFillGray,
    SetExtGState,
    ClosePath,
    SetFlatness,
    SetLineJoin,
    SetFillCmyk,
    LineTo,
    MoveTo,
    EndPath,
    Save,
    Rectangle,
    SetFillRgb,
    SetRenderingIntent,
    CloseStroke,
    SetFillColor,
    SetFillColorN,
    ShFill,
    CurveTo1,
    SetLineWidth,
    CurveTo2,
}

/// An entry of the operator table.
#[derive(Debug, Clone, Copy)]
pub struct Operator {
    /// The name of the operator, as it appears in content streams.
    pub name: &'static str,
    /// The number of operands.
    pub arity: Arity,
    /// The type checks for the operands. Variadic operators repeat the last check
    /// for all remaining operands.
    pub checks: &'static [ArgCheck],
    /// What the operator does.
    pub kind: OpKind,
}

impl Operator {
    /// The type check for the operand at `index`.
    pub fn check(&self, index: usize) -> ArgCheck {
        match self.checks {
            [] => ArgCheck::Any,
            checks => checks[index.min(checks.len() - 1)],
        }
    }

    /// The smallest number of operands the operator accepts.
    pub fn min_args(&self) -> usize {
        match self.arity {
            Arity::Exact(n) => n,
            Arity::AtMost(_) => 0,
        }
    }
}

macro_rules! op {
    ($name:literal, $arity:ident($n:literal), [$($check:ident),*], $kind:ident) => {
        Operator {
            name: $name,
            arity: Arity::$arity($n),
            checks: &[$(ArgCheck::$check),*],
            kind: OpKind::$kind,
        }
    };
}

/// All operators, sorted by name.
pub static OPERATORS: &[Operator] = &[
    op!("\"", Exact(3), [Num, Num, String], MoveSetShowText),
    op!("'", Exact(1), [String], MoveShowText),
    op!("B", Exact(0), [], FillStroke),
    op!("B*", Exact(0), [], EoFillStroke),
    op!("BDC", Exact(2), [Name, Props], BeginMarkedContentProps),
    op!("BI", Exact(0), [], BeginImage),
    op!("BMC", Exact(1), [Name], BeginMarkedContent),
    op!("BT", Exact(0), [], BeginText),
    op!("BX", Exact(0), [], BeginIgnoreUndef),
    op!("CS", Exact(1), [Name], SetStrokeColorSpace),
    op!("DP", Exact(2), [Name, Props], MarkPointProps),
    op!("Do", Exact(1), [Name], XObject),
    op!("EI", Exact(0), [], EndImage),
    op!("EMC", Exact(0), [], EndMarkedContent),
    op!("ET", Exact(0), [], EndText),
    op!("EX", Exact(0), [], EndIgnoreUndef),
    op!("F", Exact(0), [], FillCompat),
    op!("G", Exact(1), [Num], SetStrokeGray),
    op!("ID", Exact(0), [], ImageData),
    op!("J", Exact(1), [Int], SetLineCap),
    op!("K", Exact(4), [Num, Num, Num, Num], SetStrokeCmyk),
    op!("M", Exact(1), [Num], SetMiterLimit),
    op!("MP", Exact(1), [Name], MarkPoint),
    op!("Q", Exact(0), [], Restore),
    op!("RG", Exact(3), [Num, Num, Num], SetStrokeRgb),
    op!("S", Exact(0), [], Stroke),
    op!("SC", AtMost(4), [Num, Num, Num, Num], SetStrokeColor),
    op!("SCN", AtMost(33), [Scn], SetStrokeColorN),
    op!("T*", Exact(0), [], TextNextLine),
    op!("TD", Exact(2), [Num, Num], TextMoveSet),
    op!("TJ", Exact(1), [Array], ShowSpaceText),
    op!("TL", Exact(1), [Num], SetTextLeading),
    op!("Tc", Exact(1), [Num], SetCharSpacing),
    op!("Td", Exact(2), [Num, Num], TextMove),
    op!("Tf", Exact(2), [Name, Num], SetFont),
    op!("Tj", Exact(1), [String], ShowText),
    op!("Tm", Exact(6), [Num, Num, Num, Num, Num, Num], SetTextMatrix),
    op!("Tr", Exact(1), [Int], SetTextRender),
    op!("Ts", Exact(1), [Num], SetTextRise),
    op!("Tw", Exact(1), [Num], SetWordSpacing),
    op!("Tz", Exact(1), [Num], SetHorizScaling),
    op!("W", Exact(0), [], Clip),
    op!("W*", Exact(0), [], EoClip),
    op!("b", Exact(0), [], CloseFillStroke),
    op!("b*", Exact(0), [], CloseEoFillStroke),
    op!("c", Exact(6), [Num, Num, Num, Num, Num, Num], CurveTo),
    op!("cm", Exact(6), [Num, Num, Num, Num, Num, Num], Concat),
    op!("cs", Exact(1), [Name], SetFillColorSpace),
    op!("d", Exact(2), [Array, Num], SetDash),
    op!("d0", Exact(2), [Num, Num], SetCharWidth),
    op!("d1", Exact(6), [Num, Num, Num, Num, Num, Num], SetCacheDevice),
    op!("f", Exact(0), [], Fill),
    op!("f*", Exact(0), [], EoFill),
    op!("g", Exact(1), [Num], SetFillGray),
    op!("gs", Exact(1), [Name], SetExtGState),
    op!("h", Exact(0), [], ClosePath),
    op!("i", Exact(1), [Num], SetFlatness),
    op!("j", Exact(1), [Int], SetLineJoin),
    op!("k", Exact(4), [Num, Num, Num, Num], SetFillCmyk),
    op!("l", Exact(2), [Num, Num], LineTo),
    op!("m", Exact(2), [Num, Num], MoveTo),
    op!("n", Exact(0), [], EndPath),
    op!("q", Exact(0), [], Save),
    op!("re", Exact(4), [Num, Num, Num, Num], Rectangle),
    op!("rg", Exact(3), [Num, Num, Num], SetFillRgb),
    op!("ri", Exact(1), [Name], SetRenderingIntent),
    op!("s", Exact(0), [], CloseStroke),
    op!("sc", AtMost(4), [Num, Num, Num, Num], SetFillColor),
    op!("scn", AtMost(33), [Scn], SetFillColorN),
    op!("sh", Exact(1), [Name], ShFill),
    op!("v", Exact(4), [Num, Num, Num, Num], CurveTo1),
    op!("w", Exact(1), [Num], SetLineWidth),
    op!("y", Exact(4), [Num, Num, Num, Num], CurveTo2),
];

/// Look up an operator by name.
pub fn find(name: &[u8]) -> Option<&'static Operator> {
    OPERATORS
        .binary_search_by(|op| op.name.as_bytes().cmp(name))
        .ok()
        .map(|i| &OPERATORS[i])
}
