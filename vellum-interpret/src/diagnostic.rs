//! Non-fatal problems found while interpreting content.

use thiserror::Error;

/// A problem found while interpreting a content stream.
///
/// None of these abort the interpretation: the offending command, image or resource
/// is skipped and interpretation continues with the next object of the stream.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Diagnostic {
    /// A command that isn't in the operator table, outside of a `BX`/`EX` section.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    /// A command with fewer operands than it needs. The command is skipped.
    #[error("too few ({found}) args to '{op}' operator, expected {expected}")]
    TooFewArguments {
        /// The operator.
        op: &'static str,
        /// The number of operands the operator needs.
        expected: usize,
        /// The number of operands that were given.
        found: usize,
    },
    /// A variadic command with more operands than it accepts. The command is skipped.
    #[error("too many ({found}) args to '{op}' operator, at most {max} are allowed")]
    TooManyArguments {
        /// The operator.
        op: &'static str,
        /// The maximum number of operands.
        max: usize,
        /// The number of operands that were given.
        found: usize,
    },
    /// An operand with the wrong type. The command is skipped.
    #[error("arg #{index} to '{op}' operator is wrong type ({found})")]
    ArgumentType {
        /// The operator.
        op: &'static str,
        /// The index of the operand.
        index: usize,
        /// The type of the operand that was given.
        found: &'static str,
    },
    /// More operands than the operand buffer can hold. The operand is dropped.
    #[error("too many args in content stream at offset {offset}")]
    OperandOverflow {
        /// The byte offset in the content stream.
        offset: usize,
    },
    /// Operands that were not consumed by a command at the end of a content stream.
    #[error("{0} leftover args in content stream")]
    LeftoverOperands(usize),
    /// A path operator that needs a current point, used without one.
    #[error("no current point in '{0}'")]
    NoCurrentPoint(&'static str),
    /// A named resource that doesn't exist.
    #[error("unknown {category} '{name}'")]
    MissingResource {
        /// The resource category, like `font` or `pattern`.
        category: &'static str,
        /// The name of the resource.
        name: String,
    },
    /// A color space that couldn't be parsed.
    #[error("bad color space: {0}")]
    BadColorSpace(String),
    /// A color with the wrong number of components for its color space.
    #[error("wrong number of components ({found}) in '{op}', expected {expected}")]
    ColorComponentCount {
        /// The operator.
        op: &'static str,
        /// The number of components of the color space.
        expected: usize,
        /// The number of components that were given.
        found: usize,
    },
    /// A pattern type that isn't supported.
    #[error("unsupported pattern: {0}")]
    UnsupportedPattern(String),
    /// A shading that isn't supported or couldn't be parsed.
    #[error("unsupported shading: {0}")]
    UnsupportedShading(String),
    /// A function type that isn't supported or couldn't be parsed.
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),
    /// A broken image dictionary. The image is skipped.
    #[error("bad image parameters: {0}")]
    BadImage(&'static str),
    /// A broken form XObject. The form is skipped.
    #[error("bad form: {0}")]
    BadForm(&'static str),
    /// A broken graphics state parameter dictionary.
    #[error("bad ExtGState: {0}")]
    BadExtGState(&'static str),
    /// A text showing operator without a font.
    #[error("no font in show '{0}'")]
    NoFont(&'static str),
    /// An operator that is only valid in a specific context, like `ID` outside of an
    /// inline image.
    #[error("unexpected '{0}' operator")]
    UnexpectedOperator(&'static str),
    /// The content stream ended inside of an inline image.
    #[error("end of file in inline image")]
    InlineImageEof,
    /// A `Q` without a matching `q`.
    #[error("restore without a matching save")]
    UnbalancedRestore,
    /// An `EMC` without a matching `BMC` or `BDC`.
    #[error("end of marked content without a matching begin")]
    UnbalancedMarkedContent,
}
