use kurbo::Affine;
use log::warn;

pub(crate) trait OptionLog {
    fn warn_none(self, f: &str) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn warn_none(self, f: &str) -> Self {
        self.or_else(|| {
            warn!("{f}");

            None
        })
    }
}

const SCALAR_NEARLY_ZERO: f64 = 1.0 / (1 << 12) as f64;

pub(crate) trait FloatExt: Sized + Copy {
    /// Whether the number is approximately 0.
    fn is_nearly_zero(&self) -> bool;
}

impl FloatExt for f64 {
    fn is_nearly_zero(&self) -> bool {
        self.abs() <= SCALAR_NEARLY_ZERO
    }
}

pub(crate) trait AffineExt {
    /// Whether the transform can be inverted.
    fn is_invertible(&self) -> bool;
}

impl AffineExt for Affine {
    fn is_invertible(&self) -> bool {
        let det = self.determinant();

        det.is_finite() && det != 0.0
    }
}

/// Map `x` from the interval `[x_min, x_max]` to `[y_min, y_max]`.
#[inline]
pub(crate) fn interpolate(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    if x_max == x_min {
        return y_min;
    }

    y_min + (x - x_min) * (y_max - y_min) / (x_max - x_min)
}
