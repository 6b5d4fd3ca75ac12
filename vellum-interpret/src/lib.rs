/*!
A crate for interpreting PDF content streams.

The [`Interpreter`] reads the operators of a page (or of a form XObject, tiling
pattern or Type 3 glyph), validates their operands against a static operator table,
keeps track of the graphics state and reports everything that should be drawn to a
[`Builder`]. What the builder does with these calls is up to it: the typical use
case is building an SVG-like vector document, which is why paints, gradients and
styles are modelled the way they are.

The interpreter never fails on malformed content. Problems are reported as
[`Diagnostic`]s through the warning sink of the [`InterpreterSettings`], and the
offending operator, image or resource is skipped. The only error that is returned
is [`InterpretError::WeirdPageContents`], for content objects that aren't streams.

# Example

```
use vellum_interpret::{Builder, Interpreter, InterpreterSettings, PageParams};
use vellum_interpret::builder::Paint;
use vellum_interpret::state::State;
use vellum_interpret::vellum_syntax::XRef;
use vellum_interpret::vellum_syntax::object::{Dict, Object, Stream};
use kurbo::Rect;

#[derive(Default)]
struct Counter(usize);

impl Builder for Counter {
    fn add_path(&mut self, _: &State, _: Option<&Paint>, _: Option<&Paint>, _: bool) {
        self.0 += 1;
    }
}

let xref = XRef::new();
let mut counter = Counter::default();
let params = PageParams::new(Rect::new(0.0, 0.0, 200.0, 200.0), 0, Dict::new());

{
    let mut interpreter =
        Interpreter::new(&xref, &mut counter, params, InterpreterSettings::default());
    let content = Stream::new(Dict::new(), b"1 0 0 rg 10 10 50 50 re f".to_vec());
    interpreter.parse(&Object::Stream(content)).unwrap();
}

assert_eq!(counter.0, 1);
```
*/

#![forbid(unsafe_code)]

use std::sync::Arc;
use thiserror::Error;

pub mod builder;
mod clip_history;
pub mod color;
pub mod diagnostic;
pub mod font;
pub mod function;
pub mod gradient;
pub mod image;
mod interpret;
mod op_history;
pub mod operator;
pub mod pattern;
pub mod shading;
pub mod state;
pub mod style;
pub mod tessellate;
mod util;

pub use builder::Builder;
pub use clip_history::{ClipHistory, ClipPath};
pub use diagnostic::Diagnostic;
pub use interpret::{Interpreter, PX_PER_PT, PageParams};
pub use op_history::OpHistory;
pub use tessellate::{Precision, ShadingPrecision};
pub use vellum_syntax;

/// A callback function for diagnostics that occur during interpretation.
pub type WarningSinkFn = Arc<dyn Fn(Diagnostic) + Send + Sync>;

/// Settings that should be applied during the interpretation process.
#[derive(Clone)]
pub struct InterpreterSettings {
    /// A sink that receives every diagnostic. Diagnostics are also logged via
    /// the `log` crate, so the default sink ignores them.
    pub warning_sink: WarningSinkFn,
    /// Whether the glyph procedures of Type 3 fonts should be interpreted. If disabled,
    /// glyphs of Type 3 fonts are reported to the builder like any other character.
    pub interpret_type3_glyphs: bool,
    /// The initial tessellation precision for each shading type.
    pub shading_precision: ShadingPrecision,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            warning_sink: Arc::new(|_| {}),
            interpret_type3_glyphs: true,
            shading_precision: ShadingPrecision::default(),
        }
    }
}

impl std::fmt::Debug for InterpreterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterSettings")
            .field("interpret_type3_glyphs", &self.interpret_type3_glyphs)
            .field("shading_precision", &self.shading_precision)
            .finish_non_exhaustive()
    }
}

/// An error that aborts the interpretation of a content object.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InterpretError {
    /// The content object is neither a stream nor an array of streams.
    #[error("weird page contents")]
    WeirdPageContents,
}
