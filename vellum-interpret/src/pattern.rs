//! Tiling and shading patterns.

use crate::diagnostic::Diagnostic;
use crate::shading::Shading;
use kurbo::{Affine, Rect};
use std::sync::Arc;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Dict, Object, Stream};

/// A pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A tiling pattern (type 1).
    Tiling(Arc<TilingPattern>),
    /// A shading pattern (type 2).
    Shading(Arc<ShadingPattern>),
}

impl Pattern {
    /// Parse a pattern from a pattern dictionary or stream.
    pub fn new(obj: &Object, xref: &XRef) -> Result<Self, Diagnostic> {
        let obj = xref.resolve(obj);
        let dict = obj
            .dict_like()
            .ok_or_else(|| unsupported("pattern is not a dictionary".to_string()))?;
        let matrix = dict.get::<Affine>(MATRIX, xref).unwrap_or_default();

        match dict.get::<u8>(PATTERN_TYPE, xref) {
            Some(1) => {
                let stream = obj
                    .as_stream()
                    .ok_or_else(|| unsupported("tiling pattern is not a stream".to_string()))?;

                TilingPattern::new(stream, matrix, xref).map(|t| Self::Tiling(Arc::new(t)))
            }
            Some(2) => {
                let shading = dict
                    .get_raw(SHADING)
                    .ok_or_else(|| Diagnostic::UnsupportedShading("pattern has no shading".into()))
                    .and_then(|s| Shading::new(s, xref))?;

                Ok(Self::Shading(Arc::new(ShadingPattern { shading, matrix })))
            }
            Some(t) => Err(unsupported(format!("unknown pattern type {t}"))),
            None => Err(unsupported("pattern has no type".to_string())),
        }
    }

    /// The pattern type: 1 for tiling, 2 for shading patterns.
    pub fn pattern_type(&self) -> u8 {
        match self {
            Self::Tiling(_) => 1,
            Self::Shading(_) => 2,
        }
    }

    /// The pattern matrix, mapping pattern space to the default coordinate space
    /// of the pattern's parent content stream.
    pub fn matrix(&self) -> Affine {
        match self {
            Self::Tiling(t) => t.matrix,
            Self::Shading(s) => s.matrix,
        }
    }
}

/// A tiling pattern.
#[derive(Debug, Clone)]
pub struct TilingPattern {
    /// 1 for colored, 2 for uncolored patterns.
    pub paint_type: u8,
    /// The tiling type, between 1 and 3.
    pub tiling_type: u8,
    /// The bounding box of a pattern cell, in pattern space.
    pub bbox: Rect,
    /// The horizontal spacing between pattern cells.
    pub x_step: f64,
    /// The vertical spacing between pattern cells.
    pub y_step: f64,
    /// The pattern matrix.
    pub matrix: Affine,
    /// The resources of the pattern content.
    pub resources: Dict,
    /// The pattern content.
    pub content: Stream,
}

impl TilingPattern {
    fn new(stream: &Stream, matrix: Affine, xref: &XRef) -> Result<Self, Diagnostic> {
        let dict = stream.dict();
        let paint_type = dict
            .get::<u8>(PAINT_TYPE, xref)
            .filter(|t| matches!(t, 1 | 2))
            .ok_or_else(|| unsupported("tiling pattern has an invalid paint type".to_string()))?;
        let tiling_type = dict
            .get::<u8>(TILING_TYPE, xref)
            .filter(|t| matches!(t, 1..=3))
            .unwrap_or(1);
        let bbox = dict
            .get::<Rect>(BBOX, xref)
            .ok_or_else(|| unsupported("tiling pattern has no bounding box".to_string()))?;
        let x_step = dict
            .get::<f64>(X_STEP, xref)
            .filter(|s| *s != 0.0)
            .ok_or_else(|| unsupported("tiling pattern has an invalid x step".to_string()))?;
        let y_step = dict
            .get::<f64>(Y_STEP, xref)
            .filter(|s| *s != 0.0)
            .ok_or_else(|| unsupported("tiling pattern has an invalid y step".to_string()))?;
        let resources = dict.get::<Dict>(RESOURCES, xref).unwrap_or_default();

        Ok(Self {
            paint_type,
            tiling_type,
            bbox,
            x_step,
            y_step,
            matrix,
            resources,
            content: stream.clone(),
        })
    }

    /// Whether the pattern is uncolored, i.e. takes its color from the `scn` operands.
    pub fn is_uncolored(&self) -> bool {
        self.paint_type == 2
    }
}

/// A shading pattern.
#[derive(Debug)]
pub struct ShadingPattern {
    /// The shading.
    pub shading: Shading,
    /// The pattern matrix.
    pub matrix: Affine,
}

fn unsupported(msg: String) -> Diagnostic {
    Diagnostic::UnsupportedPattern(msg)
}
