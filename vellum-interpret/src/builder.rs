//! The interface between the interpreter and the document that is being built.

use crate::clip_history::ClipPath;
use crate::color::{ColorComponents, ColorSpace, Rgb};
use crate::function::TransferFunction;
use crate::gradient::Gradient;
use crate::image::{ColorMap, ImageData};
use crate::pattern::{Pattern, TilingPattern};
use crate::shading::Shading;
use crate::state::State;
use kurbo::{Affine, Rect};

/// The identifier of a paint server (gradient or pattern) created by a builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaintId(pub String);

/// How a path is filled or stroked.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A flat color.
    Color {
        /// The color.
        rgb: Rgb,
        /// The opacity.
        opacity: f32,
    },
    /// A gradient previously created with [`Builder::add_gradient`].
    Gradient(PaintId),
    /// A tiling pattern previously created with [`Builder::push_tiling_pattern`].
    Pattern(PaintId),
}

/// The parameters of a transparency group.
#[derive(Debug, Clone)]
pub struct TransparencyGroup {
    /// The bounding box of the group, in the form's coordinate system.
    pub bbox: Rect,
    /// The blending color space of the group.
    pub color_space: Option<ColorSpace>,
    /// Whether the group is isolated.
    pub isolated: bool,
    /// Whether the group is a knockout group.
    pub knockout: bool,
    /// Whether the group is drawn as the content of a soft mask.
    pub for_soft_mask: bool,
}

/// A soft mask, built from the transparency group that was drawn last.
#[derive(Debug, Clone)]
pub struct SoftMask {
    /// The bounding box of the mask group.
    pub bbox: Rect,
    /// Whether the mask uses the alpha channel of the group rather than its luminosity.
    pub alpha: bool,
    /// The transfer function mask values are mapped through.
    pub transfer: Option<TransferFunction>,
    /// The backdrop color, in the color space of the group.
    pub backdrop: ColorComponents,
}

/// The placement of a single character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharPlacement<'a> {
    /// The pen position before the character, in user space.
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
    /// The advance, in text space scaled by the font size.
    pub dx: f64,
    #[allow(missing_docs)]
    pub dy: f64,
    /// The displacement of the glyph origin, transformed like a text space
    /// distance. Only nonzero in vertical writing mode.
    pub origin_x: f64,
    #[allow(missing_docs)]
    pub origin_y: f64,
    /// The character code.
    pub code: u32,
    /// The number of bytes of the character code.
    pub len: usize,
    /// The text of the character. Empty if unknown.
    pub unicode: &'a str,
}

/// A sink for the drawing operations of a content stream.
///
/// The interpreter calls these methods in the order in which the content stream
/// (and any nested content) dictates. Everything besides [`Builder::add_path`] has an
/// empty default implementation.
pub trait Builder {
    /// Set the size of the document, in pixels.
    fn set_document_size(&mut self, _width: f64, _height: f64) {}

    /// Save the builder state. Always paired with [`Builder::restore_state`].
    fn save_state(&mut self) {}
    /// Restore the builder state.
    fn restore_state(&mut self) {}
    /// Start a new group, which is closed again by the next `restore_state`.
    fn push_group(&mut self) {}
    /// Close the current group.
    fn pop_group(&mut self) {}

    /// Set the transform of the current group.
    fn set_transform(&mut self, _transform: Affine) {}
    /// The transform of the current group, if known.
    fn transform(&self) -> Option<Affine> {
        None
    }

    /// Add the path of `state`, filled and/or stroked.
    fn add_path(
        &mut self,
        state: &State,
        fill: Option<&Paint>,
        stroke: Option<&Paint>,
        even_odd: bool,
    );
    /// Intersect the clip region with the path of `state`.
    fn clip(&mut self, _state: &State, _even_odd: bool) {}
    /// Set the clip path of the current group to the path of `state`.
    fn set_clip_path(&mut self, _state: &State, _even_odd: bool) {}

    /// The fill or stroke parameters of `state` changed.
    fn update_style(&mut self, _state: &State) {}
    /// Whether the builder can paint with a pattern, as opposed to the interpreter
    /// approximating it.
    fn is_pattern_type_supported(&self, pattern: &Pattern) -> bool {
        match pattern {
            Pattern::Tiling(_) => true,
            Pattern::Shading(s) => matches!(s.shading.shading_type(), 2 | 3),
        }
    }
    /// Create a gradient. `for_shading` is set if the gradient is painted by `sh`
    /// rather than used as the paint of a path.
    fn add_gradient(&mut self, _gradient: &Gradient, _for_shading: bool) -> Option<PaintId> {
        None
    }
    /// Fill the clip region with a gradient created for `shading`.
    fn add_shaded_fill(&mut self, _shading: &Shading, _gradient: &PaintId, _clip: &ClipPath) {}
    /// Start a tiling pattern. Content until the matching `pop_tiling_pattern` is
    /// the pattern cell.
    fn push_tiling_pattern(&mut self, _pattern: &TilingPattern, _is_stroke: bool) -> PaintId {
        PaintId(String::new())
    }
    /// Finish the current tiling pattern.
    fn pop_tiling_pattern(&mut self) {}

    /// Start a text object (`BT`).
    fn begin_text_object(&mut self, _state: &State) {}
    /// End a text object (`ET`).
    fn end_text_object(&mut self, _state: &State) {}
    /// The font or its size changed.
    fn update_font(&mut self, _state: &State) {}
    /// The text matrix changed.
    fn update_text_matrix(&mut self, _state: &State) {}
    /// The start of the current line moved.
    fn update_text_position(&mut self, _x: f64, _y: f64) {}
    /// The pen was moved by a `TJ` adjustment, in text space units.
    fn update_text_shift(&mut self, _state: &State, _shift: f64) {}
    /// Start showing a string.
    fn begin_string(&mut self, _state: &State, _bytes: &[u8]) {}
    /// Show a single character.
    fn add_char(&mut self, _state: &State, _placement: &CharPlacement<'_>) {}
    /// Finish showing a string.
    fn end_string(&mut self, _state: &State) {}

    /// Draw a stencil mask with the fill paint of `state`.
    fn add_image_mask(&mut self, _state: &State, _image: &ImageData, _invert: bool) {}
    /// Draw an image. `mask_colors` are the color key ranges of the image, in
    /// pairs of minimum and maximum per component.
    fn add_image(
        &mut self,
        _state: &State,
        _image: &ImageData,
        _color_map: &ColorMap,
        _mask_colors: Option<&[u32]>,
    ) {
    }
    /// Draw an image with a stencil mask.
    fn add_masked_image(
        &mut self,
        _state: &State,
        _image: &ImageData,
        _color_map: &ColorMap,
        _mask: &ImageData,
        _mask_invert: bool,
    ) {
    }
    /// Draw an image with a grayscale soft mask.
    fn add_soft_masked_image(
        &mut self,
        _state: &State,
        _image: &ImageData,
        _color_map: &ColorMap,
        _mask: &ImageData,
        _mask_color_map: &ColorMap,
    ) {
    }

    /// Start a transparency group.
    fn push_transparency_group(&mut self, _state: &State, _group: &TransparencyGroup) {}
    /// Finish the current transparency group.
    fn pop_transparency_group(&mut self, _state: &State) {}
    /// Draw the transparency group that was finished last.
    fn paint_transparency_group(&mut self, _state: &State, _bbox: Rect) {}
    /// Set the opacity of the current group.
    fn set_group_opacity(&mut self, _opacity: f32) {}
    /// Use the transparency group that was finished last as the soft mask.
    fn set_soft_mask(&mut self, _state: &State, _mask: &SoftMask) {}
    /// Remove the soft mask.
    fn clear_soft_mask(&mut self, _state: &State) {}
}
