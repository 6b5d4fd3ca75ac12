//! PDF colors and color spaces.
//!
//! Colors are converted to sRGB with the simple device formulas. ICC profiles are
//! not evaluated, ICC-based spaces use their alternate space instead.

use crate::diagnostic::Diagnostic;
use crate::function::Function;
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::sync::Arc;
use vellum_syntax::XRef;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Name, Object, Stream};

/// A storage for the components of colors.
pub type ColorComponents = SmallVec<[f32; 4]>;

// Color spaces can reference each other, guard against cycles.
const MAX_NESTING: u32 = 8;

/// An sRGB color with components between 0 and 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new color, clamping the components to the valid range.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Return the color as RGB8.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r * 255.0 + 0.5) as u8,
            (self.g * 255.0 + 0.5) as u8,
            (self.b * 255.0 + 0.5) as u8,
        ]
    }
}

impl fmt::Display for Rgb {
    /// Formats the color as a hex color like `#ff0000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// A color space.
#[derive(Debug, Clone)]
pub struct ColorSpace(Arc<ColorSpaceKind>);

/// The different kinds of color spaces.
#[derive(Debug)]
pub enum ColorSpaceKind {
    /// `DeviceGray`.
    DeviceGray,
    /// `DeviceRGB`.
    DeviceRgb,
    /// `DeviceCMYK`.
    DeviceCmyk,
    /// `CalGray`, treated like `DeviceGray`.
    CalGray,
    /// `CalRGB`, treated like `DeviceRGB`.
    CalRgb,
    /// `Lab`.
    Lab {
        /// The diffuse white point.
        white_point: [f32; 3],
        /// The ranges of the a* and b* components.
        range: [f32; 4],
    },
    /// `ICCBased`, represented by its alternate space.
    IccBased {
        /// The number of components.
        num_components: usize,
        /// The space the colors are converted with.
        alternate: ColorSpace,
    },
    /// `Indexed`.
    Indexed {
        /// The base color space.
        base: ColorSpace,
        /// The maximum valid index.
        hival: u8,
        /// The color table, `base.num_components()` bytes per entry.
        lookup: Vec<u8>,
    },
    /// `Separation`.
    Separation {
        /// The name of the colorant.
        name: Name,
        /// The alternate space.
        alternate: ColorSpace,
        /// The tint transform into the alternate space.
        tint_transform: Function,
    },
    /// `DeviceN`.
    DeviceN {
        /// The names of the colorants.
        names: Vec<Name>,
        /// The alternate space.
        alternate: ColorSpace,
        /// The tint transform into the alternate space.
        tint_transform: Function,
    },
    /// `Pattern`, optionally with the space of uncolored tiling patterns.
    Pattern(Option<ColorSpace>),
}

impl ColorSpace {
    fn from_kind(kind: ColorSpaceKind) -> Self {
        Self(Arc::new(kind))
    }

    /// The `DeviceGray` color space.
    pub fn device_gray() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceGray)
    }

    /// The `DeviceRGB` color space.
    pub fn device_rgb() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceRgb)
    }

    /// The `DeviceCMYK` color space.
    pub fn device_cmyk() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceCmyk)
    }

    /// A pattern color space.
    pub fn pattern(under: Option<Self>) -> Self {
        Self::from_kind(ColorSpaceKind::Pattern(under))
    }

    /// Look up a color space that can be given by name alone, including the
    /// abbreviations used by inline images.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            DEVICE_GRAY | G => Some(Self::device_gray()),
            DEVICE_RGB | RGB => Some(Self::device_rgb()),
            DEVICE_CMYK | CMYK => Some(Self::device_cmyk()),
            CAL_GRAY => Some(Self::from_kind(ColorSpaceKind::CalGray)),
            CAL_RGB => Some(Self::from_kind(ColorSpaceKind::CalRgb)),
            PATTERN => Some(Self::pattern(None)),
            _ => None,
        }
    }

    /// Parse a color space from a name or array. Named resources must already have
    /// been resolved.
    pub fn new(obj: &Object, xref: &XRef) -> Result<Self, Diagnostic> {
        Self::new_inner(obj, xref, 0)
    }

    fn new_inner(obj: &Object, xref: &XRef, depth: u32) -> Result<Self, Diagnostic> {
        if depth > MAX_NESTING {
            return Err(bad("color spaces are nested too deeply"));
        }

        match xref.resolve(obj) {
            Object::Name(name) => Self::from_name(&name)
                .ok_or_else(|| Diagnostic::BadColorSpace(format!("unknown name {name}"))),
            Object::Array(array) => Self::from_array(&array, xref, depth),
            other => Err(Diagnostic::BadColorSpace(format!(
                "unexpected {}",
                other.type_name()
            ))),
        }
    }

    fn from_array(array: &Array, xref: &XRef, depth: u32) -> Result<Self, Diagnostic> {
        let family = array
            .get::<Name>(0, xref)
            .ok_or_else(|| bad("color space array has no family name"))?;
        let nested = |i: usize| {
            array
                .get_raw(i)
                .ok_or_else(|| bad("color space array is too short"))
                .and_then(|o| Self::new_inner(o, xref, depth + 1))
        };

        let kind = match family.as_bytes() {
            // Some writers wrap device spaces in an array.
            DEVICE_GRAY | G | DEVICE_RGB | RGB | DEVICE_CMYK | CMYK if array.len() == 1 => {
                return Self::from_name(&family).ok_or_else(|| bad("unknown device space"));
            }
            CAL_GRAY => ColorSpaceKind::CalGray,
            CAL_RGB => ColorSpaceKind::CalRgb,
            LAB => {
                let dict = array.get::<Dict>(1, xref).unwrap_or_default();
                let white_point = dict
                    .get::<Array>(WHITE_POINT, xref)
                    .and_then(|a| a.to_vec::<f32>(xref))
                    .filter(|w| w.len() == 3)
                    .map(|w| [w[0], w[1], w[2]])
                    .unwrap_or([0.9505, 1.0, 1.089]);
                let range = dict
                    .get::<Array>(RANGE, xref)
                    .and_then(|a| a.to_vec::<f32>(xref))
                    .filter(|r| r.len() == 4)
                    .map(|r| [r[0], r[1], r[2], r[3]])
                    .unwrap_or([-100.0, 100.0, -100.0, 100.0]);

                ColorSpaceKind::Lab { white_point, range }
            }
            ICC_BASED => {
                let stream = array
                    .get::<Stream>(1, xref)
                    .ok_or_else(|| bad("ICCBased space has no profile stream"))?;
                let dict = stream.dict();
                let num_components = dict
                    .get::<usize>(N, xref)
                    .filter(|n| matches!(n, 1 | 3 | 4))
                    .ok_or_else(|| bad("ICCBased space has an invalid number of components"))?;
                let alternate = dict
                    .get_raw(ALTERNATE)
                    .and_then(|o| Self::new_inner(o, xref, depth + 1).ok())
                    .filter(|cs| cs.num_components() == num_components)
                    .unwrap_or_else(|| match num_components {
                        1 => Self::device_gray(),
                        3 => Self::device_rgb(),
                        _ => Self::device_cmyk(),
                    });

                ColorSpaceKind::IccBased {
                    num_components,
                    alternate,
                }
            }
            INDEXED | I => {
                let base = nested(1)?;

                if matches!(
                    base.kind(),
                    ColorSpaceKind::Indexed { .. } | ColorSpaceKind::Pattern(_)
                ) {
                    return Err(bad("invalid base space of Indexed space"));
                }

                let hival = array
                    .get::<i32>(2, xref)
                    .map(|h| h.clamp(0, 255) as u8)
                    .ok_or_else(|| bad("Indexed space has no maximum index"))?;
                let lookup = match array.get_raw(3).map(|o| xref.resolve(o)) {
                    Some(Object::String(s)) => s.as_bytes().to_vec(),
                    Some(Object::Stream(s)) => s
                        .decoded(xref)
                        .ok_or_else(|| bad("failed to decode lookup table of Indexed space"))?,
                    _ => return Err(bad("Indexed space has no lookup table")),
                };

                if lookup.len() < (hival as usize + 1) * base.num_components() {
                    return Err(bad("lookup table of Indexed space is too short"));
                }

                ColorSpaceKind::Indexed {
                    base,
                    hival,
                    lookup,
                }
            }
            SEPARATION => {
                let name = array
                    .get::<Name>(1, xref)
                    .ok_or_else(|| bad("Separation space has no colorant name"))?;
                let alternate = nested(2)?;
                let tint_transform = tint_transform(array, 3, xref)?;

                ColorSpaceKind::Separation {
                    name,
                    alternate,
                    tint_transform,
                }
            }
            DEVICE_N => {
                let names = array
                    .get::<Array>(1, xref)
                    .and_then(|a| a.to_vec::<Name>(xref))
                    .filter(|n| !n.is_empty() && n.len() <= 32)
                    .ok_or_else(|| bad("DeviceN space has invalid colorant names"))?;
                let alternate = nested(2)?;
                let tint_transform = tint_transform(array, 3, xref)?;

                ColorSpaceKind::DeviceN {
                    names,
                    alternate,
                    tint_transform,
                }
            }
            PATTERN => {
                let under = match array.get_raw(1) {
                    Some(o) => Some(Self::new_inner(o, xref, depth + 1)?),
                    None => None,
                };

                ColorSpaceKind::Pattern(under)
            }
            other => {
                return Err(Diagnostic::BadColorSpace(format!(
                    "unknown family {}",
                    String::from_utf8_lossy(other)
                )));
            }
        };

        Ok(Self::from_kind(kind))
    }

    /// The kind of the color space.
    pub fn kind(&self) -> &ColorSpaceKind {
        &self.0
    }

    /// Whether this is a pattern color space.
    pub fn is_pattern(&self) -> bool {
        matches!(self.kind(), ColorSpaceKind::Pattern(_))
    }

    /// The underlying space of a pattern color space.
    pub fn under(&self) -> Option<&Self> {
        match self.kind() {
            ColorSpaceKind::Pattern(under) => under.as_ref(),
            _ => None,
        }
    }

    /// The number of components of a color in this space.
    pub fn num_components(&self) -> usize {
        match self.kind() {
            ColorSpaceKind::DeviceGray
            | ColorSpaceKind::CalGray
            | ColorSpaceKind::Indexed { .. }
            | ColorSpaceKind::Separation { .. }
            | ColorSpaceKind::Pattern(_) => 1,
            ColorSpaceKind::DeviceRgb | ColorSpaceKind::CalRgb | ColorSpaceKind::Lab { .. } => 3,
            ColorSpaceKind::DeviceCmyk => 4,
            ColorSpaceKind::IccBased { num_components, .. } => *num_components,
            ColorSpaceKind::DeviceN { names, .. } => names.len(),
        }
    }

    /// The initial color that is selected together with the space.
    pub fn default_color(&self) -> ColorComponents {
        match self.kind() {
            ColorSpaceKind::DeviceCmyk => smallvec![0.0, 0.0, 0.0, 1.0],
            ColorSpaceKind::Lab { range, .. } => {
                smallvec![0.0, 0.0f32.clamp(range[0], range[1]), 0.0f32.clamp(range[2], range[3])]
            }
            ColorSpaceKind::Separation { .. } | ColorSpaceKind::DeviceN { .. } => {
                smallvec![1.0; self.num_components()]
            }
            _ => smallvec![0.0; self.num_components()],
        }
    }

    /// The default decode ranges of images with the given bit depth in this space.
    pub fn default_decode(&self, bits_per_component: u8) -> SmallVec<[(f32, f32); 4]> {
        match self.kind() {
            ColorSpaceKind::Indexed { .. } => {
                smallvec![(0.0, ((1u32 << bits_per_component.min(16)) - 1) as f32)]
            }
            ColorSpaceKind::Lab { range, .. } => {
                smallvec![(0.0, 100.0), (range[0], range[1]), (range[2], range[3])]
            }
            _ => smallvec![(0.0, 1.0); self.num_components()],
        }
    }

    /// Convert a color in this space to sRGB.
    pub fn to_rgb(&self, c: &[f32]) -> Rgb {
        let get = |i: usize| c.get(i).copied().unwrap_or(0.0);

        match self.kind() {
            ColorSpaceKind::DeviceGray | ColorSpaceKind::CalGray => {
                Rgb::new(get(0), get(0), get(0))
            }
            ColorSpaceKind::DeviceRgb | ColorSpaceKind::CalRgb => Rgb::new(get(0), get(1), get(2)),
            ColorSpaceKind::DeviceCmyk => cmyk_to_rgb(get(0), get(1), get(2), get(3)),
            ColorSpaceKind::Lab { white_point, .. } => {
                lab_to_rgb(get(0), get(1), get(2), white_point)
            }
            ColorSpaceKind::IccBased { alternate, .. } => alternate.to_rgb(c),
            ColorSpaceKind::Indexed {
                base,
                hival,
                lookup,
            } => {
                let index = get(0).round().clamp(0.0, *hival as f32) as usize;
                let n = base.num_components();
                let decode = base.default_decode(8);
                let components = (0..n)
                    .map(|i| {
                        let byte = lookup.get(index * n + i).copied().unwrap_or(0);
                        let (min, max) = decode.get(i).copied().unwrap_or((0.0, 1.0));
                        min + byte as f32 / 255.0 * (max - min)
                    })
                    .collect::<ColorComponents>();

                base.to_rgb(&components)
            }
            ColorSpaceKind::Separation {
                alternate,
                tint_transform,
                ..
            }
            | ColorSpaceKind::DeviceN {
                alternate,
                tint_transform,
                ..
            } => alternate.to_rgb(&tint_transform.eval(c)),
            ColorSpaceKind::Pattern(_) => Rgb::BLACK,
        }
    }
}

fn tint_transform(array: &Array, index: usize, xref: &XRef) -> Result<Function, Diagnostic> {
    let obj = array
        .get_raw(index)
        .ok_or_else(|| bad("color space has no tint transform"))?;

    Function::new(obj, xref).map_err(|e| Diagnostic::BadColorSpace(format!("tint transform: {e}")))
}

fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> Rgb {
    Rgb::new((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
}

fn lab_to_rgb(l: f32, a: f32, b: f32, white_point: &[f32; 3]) -> Rgb {
    fn g(x: f32) -> f32 {
        if x >= 6.0 / 29.0 {
            x * x * x
        } else {
            108.0 / 841.0 * (x - 4.0 / 29.0)
        }
    }

    fn gamma(x: f32) -> f32 {
        if x <= 0.0031308 {
            12.92 * x
        } else {
            1.055 * x.powf(1.0 / 2.4) - 0.055
        }
    }

    let m = (l + 16.0) / 116.0;
    let x = white_point[0] * g(m + a / 500.0);
    let y = white_point[1] * g(m);
    let z = white_point[2] * g(m - b / 200.0);

    // XYZ (D65) to linear sRGB.
    let r = 3.2406 * x - 1.5372 * y - 0.4986 * z;
    let gr = -0.9689 * x + 1.8758 * y + 0.0415 * z;
    let bl = 0.0557 * x - 0.2040 * y + 1.0570 * z;

    Rgb::new(gamma(r), gamma(gr), gamma(bl))
}

fn bad(msg: &str) -> Diagnostic {
    Diagnostic::BadColorSpace(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_syntax::object::PdfString;

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.0).to_string(), "#ff0000");
        assert_eq!(Rgb::new(0.0, 0.0, 2.0).to_string(), "#0000ff");
        assert_eq!(Rgb::new(0.5, 0.5, 0.5).to_string(), "#808080");
    }

    #[test]
    fn device_spaces() {
        let xref = XRef::new();
        let cmyk = ColorSpace::new(&Object::Name(Name::from("CMYK")), &xref).unwrap();

        assert_eq!(cmyk.num_components(), 4);
        assert_eq!(cmyk.default_color().as_slice(), &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(cmyk.to_rgb(&[0.0, 1.0, 1.0, 0.0]), Rgb::new(1.0, 0.0, 0.0));
        assert!(ColorSpace::new(&Object::Name(Name::from("Foo")), &xref).is_err());
    }

    #[test]
    fn indexed() {
        let xref = XRef::new();
        let array = Object::from(vec![
            Object::Name(Name::from("Indexed")),
            Object::Name(Name::from("DeviceRGB")),
            Object::from(1),
            Object::String(PdfString::new(&[255, 0, 0, 0, 0, 255])),
        ]);
        let cs = ColorSpace::new(&array, &xref).unwrap();

        assert_eq!(cs.num_components(), 1);
        assert_eq!(cs.to_rgb(&[1.0]), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(cs.to_rgb(&[7.0]), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(cs.default_decode(8).as_slice(), &[(0.0, 255.0)]);
    }

    #[test]
    fn separation() {
        let xref = XRef::new();
        let tint = Dict::new()
            .with(FUNCTION_TYPE, 2)
            .with(DOMAIN, vec![0.0, 1.0])
            .with(C0, vec![0.0, 0.0, 0.0, 0.0])
            .with(C1, vec![0.0, 0.0, 0.0, 1.0])
            .with(N, 1);
        let array = Object::from(vec![
            Object::Name(Name::from("Separation")),
            Object::Name(Name::from("Black")),
            Object::Name(Name::from("DeviceCMYK")),
            Object::Dict(tint),
        ]);
        let cs = ColorSpace::new(&array, &xref).unwrap();

        assert_eq!(cs.default_color().as_slice(), &[1.0]);
        assert_eq!(cs.to_rgb(&[1.0]), Rgb::BLACK);
        assert_eq!(cs.to_rgb(&[0.0]), Rgb::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn pattern_with_underlying_space() {
        let xref = XRef::new();
        let array = Object::from(vec![
            Object::Name(Name::from("Pattern")),
            Object::Name(Name::from("DeviceGray")),
        ]);
        let cs = ColorSpace::new(&array, &xref).unwrap();

        assert!(cs.is_pattern());
        assert_eq!(cs.under().map(|u| u.num_components()), Some(1));
    }
}
