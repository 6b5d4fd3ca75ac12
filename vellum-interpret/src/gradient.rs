//! Converting axial and radial shadings into gradients.

use crate::color::Rgb;
use crate::diagnostic::Diagnostic;
use crate::function::{Function, FunctionKind};
use crate::shading::{Shading, ShadingFunction, ShadingKind};
use crate::util::interpolate;
use kurbo::{Affine, Point};

/// The geometry of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// A linear gradient from `start` to `end`.
    Linear {
        /// The start point.
        start: Point,
        /// The end point.
        end: Point,
    },
    /// A radial gradient. The radius of the inner circle is not representable and
    /// is dropped.
    Radial {
        /// The focal point, the center of the inner circle.
        focal: Point,
        /// The center of the outer circle.
        center: Point,
        /// The radius of the outer circle.
        radius: f64,
    },
}

/// How a gradient continues beyond its first and last stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadMethod {
    /// The renderer's default.
    #[default]
    Default,
    /// The end colors are extended.
    Pad,
}

/// A gradient stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// The offset, between 0 and 1.
    pub offset: f32,
    /// The color.
    pub color: Rgb,
    /// The opacity.
    pub opacity: f32,
}

/// A gradient built from an axial or radial shading.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// The geometry, in shading space.
    pub kind: GradientKind,
    /// The stops, in ascending order of their offsets.
    pub stops: Vec<GradientStop>,
    /// The spread method.
    pub spread: SpreadMethod,
    /// The transform from shading space into the space of the builder, if any.
    pub transform: Option<Affine>,
}

impl Gradient {
    /// Convert an axial or radial shading into a gradient.
    pub fn from_shading(shading: &Shading, transform: Option<Affine>) -> Result<Self, Diagnostic> {
        let (kind, domain, function, extend) = match shading.kind() {
            ShadingKind::Axial {
                coords,
                domain,
                function,
                extend,
            } => (
                GradientKind::Linear {
                    start: Point::new(coords[0], coords[1]),
                    end: Point::new(coords[2], coords[3]),
                },
                *domain,
                function,
                *extend,
            ),
            ShadingKind::Radial {
                coords,
                domain,
                function,
                extend,
            } => (
                GradientKind::Radial {
                    focal: Point::new(coords[0], coords[1]),
                    center: Point::new(coords[3], coords[4]),
                    radius: coords[5],
                },
                *domain,
                function,
                *extend,
            ),
            _ => {
                return Err(Diagnostic::UnsupportedShading(format!(
                    "type {} shadings can't be converted into gradients",
                    shading.shading_type()
                )));
            }
        };

        let stops = stops(shading, function, domain)?;
        let spread = if extend[0] && extend[1] {
            SpreadMethod::Pad
        } else {
            SpreadMethod::Default
        };

        Ok(Self {
            kind,
            stops,
            spread,
            transform,
        })
    }
}

fn stops(
    shading: &Shading,
    function: &ShadingFunction,
    domain: [f32; 2],
) -> Result<Vec<GradientStop>, Diagnostic> {
    let [function] = function.functions() else {
        return Err(Diagnostic::UnsupportedFunction(
            "gradients need a single color function".to_string(),
        ));
    };

    let [t0, t1] = domain;
    let stop = |t: f32| GradientStop {
        offset: interpolate(t, t0, t1, 0.0, 1.0).clamp(0.0, 1.0),
        color: shading.color_space().to_rgb(&function.eval(&[t])),
        opacity: 1.0,
    };

    match function.kind() {
        FunctionKind::Sampled(_) | FunctionKind::Exponential(_) => Ok(vec![stop(t0), stop(t1)]),
        FunctionKind::Stitching(stitching) => {
            let bounds = std::iter::once(t0)
                .chain(stitching.bounds().iter().copied())
                .chain(std::iter::once(t1))
                .collect::<Vec<_>>();
            let mut stops = vec![stop(bounds[0])];

            for (i, sub) in stitching.functions().iter().enumerate() {
                let (low, high) = (bounds[i], bounds[i + 1]);
                let prev = *stops.last().unwrap_or(&stop(low));
                let next = stop(high);

                // An exponential segment with an exponent above 1 stays close to its
                // start color for most of the way, approximate that with a hard edge.
                if let Some(exponent) = steep_exponent(sub) {
                    let width = (high - low) / exponent;

                    if stitching.encode()[i].0 == 0.0 {
                        stops.push(GradientStop {
                            offset: interpolate(high - width, t0, t1, 0.0, 1.0),
                            ..prev
                        });
                    } else {
                        stops.push(GradientStop {
                            offset: interpolate(low + width, t0, t1, 0.0, 1.0),
                            ..next
                        });
                    }
                }

                stops.push(next);
            }

            Ok(stops)
        }
    }
}

fn steep_exponent(function: &Function) -> Option<f32> {
    match function.kind() {
        FunctionKind::Exponential(e) if e.exponent() > 1.0 => Some(e.exponent()),
        _ => None,
    }
}
