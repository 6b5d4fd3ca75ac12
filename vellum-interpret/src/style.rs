//! The CSS-like style of a painted path.

use crate::builder::Paint;
use crate::interpret::PX_PER_PT;
use crate::state::State;
use kurbo::{Cap, Join};
use std::fmt;

/// An ordered list of style properties, like `fill:#ff0000;fill-opacity:1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style(Vec<(&'static str, String)>);

impl Style {
    /// The style of a path painted with the given paints.
    ///
    /// A missing paint results in `none` for that property and leaves out the
    /// properties that depend on it.
    pub fn for_path(
        state: &State,
        fill: Option<&Paint>,
        stroke: Option<&Paint>,
        even_odd: bool,
    ) -> Self {
        let mut style = Self::default();

        match fill {
            Some(paint) => {
                style.set("fill", paint_value(paint));
                style.set("fill-opacity", opacity(paint, state.fill_opacity));
                style.set("fill-rule", if even_odd { "evenodd" } else { "nonzero" });
            }
            None => style.set("fill", "none"),
        }

        let Some(paint) = stroke else {
            style.set("stroke", "none");

            return style;
        };

        style.set("stroke", paint_value(paint));
        style.set("stroke-opacity", opacity(paint, state.stroke_opacity));
        style.set("stroke-width", stroke_width(state));
        style.set(
            "stroke-linecap",
            match state.line_cap {
                Cap::Butt => "butt",
                Cap::Round => "round",
                Cap::Square => "square",
            },
        );
        style.set(
            "stroke-linejoin",
            match state.line_join {
                Join::Miter => "miter",
                Join::Round => "round",
                Join::Bevel => "bevel",
            },
        );
        style.set("stroke-miterlimit", state.miter_limit);

        if state.dash_array.is_empty() {
            style.set("stroke-dasharray", "none");
        } else {
            let dashes = state
                .dash_array
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(",");
            style.set("stroke-dasharray", dashes);
            style.set("stroke-dashoffset", state.dash_phase);
        }

        style
    }

    /// Set a property, replacing an earlier value.
    pub fn set(&mut self, key: &'static str, value: impl ToString) {
        let value = value.to_string();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// The value of a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All properties, in the order they were set.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }

            write!(f, "{key}:{value}")?;
        }

        Ok(())
    }
}

fn paint_value(paint: &Paint) -> String {
    match paint {
        Paint::Color { rgb, .. } => rgb.to_string(),
        Paint::Gradient(id) | Paint::Pattern(id) => format!("url(#{})", id.0),
    }
}

fn opacity(paint: &Paint, state_opacity: f32) -> f32 {
    match paint {
        Paint::Color { opacity, .. } => *opacity,
        _ => state_opacity,
    }
}

// A zero line width means the thinnest line that can be drawn, which is one pixel.
fn stroke_width(state: &State) -> f64 {
    if state.line_width > 0.0 {
        return state.line_width;
    }

    let [a, b, c, d, _, _] = state.ctm.as_coeffs();
    let scale = (0.5 * (a * a + b * b + c * c + d * d)).sqrt() * PX_PER_PT;

    if scale > 0.0 { 1.0 / scale } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PaintId;
    use crate::color::Rgb;
    use kurbo::Affine;

    #[test]
    fn fill_only() {
        let state = State::default();
        let red = Paint::Color {
            rgb: Rgb::new(1.0, 0.0, 0.0),
            opacity: 1.0,
        };
        let style = Style::for_path(&state, Some(&red), None, true);

        assert_eq!(
            style.to_string(),
            "fill:#ff0000;fill-opacity:1;fill-rule:evenodd;stroke:none"
        );
        assert_eq!(style.get("stroke-width"), None);
    }

    #[test]
    fn stroke_properties() {
        let mut state = State::default();
        state.line_cap = Cap::Round;
        state.dash_array = smallvec::smallvec![3.0, 1.5];
        state.dash_phase = 2.0;
        state.stroke_opacity = 0.5;
        let pattern = Paint::Pattern(PaintId("pattern1".to_string()));
        let style = Style::for_path(&state, None, Some(&pattern), false);

        assert_eq!(style.get("fill"), Some("none"));
        assert_eq!(style.get("stroke"), Some("url(#pattern1)"));
        assert_eq!(style.get("stroke-opacity"), Some("0.5"));
        assert_eq!(style.get("stroke-width"), Some("1"));
        assert_eq!(style.get("stroke-linecap"), Some("round"));
        assert_eq!(style.get("stroke-linejoin"), Some("miter"));
        assert_eq!(style.get("stroke-miterlimit"), Some("10"));
        assert_eq!(style.get("stroke-dasharray"), Some("3,1.5"));
        assert_eq!(style.get("stroke-dashoffset"), Some("2"));
    }

    #[test]
    fn hairline() {
        let mut state = State::new(Affine::scale(2.0));
        state.line_width = 0.0;
        let black = Paint::Color {
            rgb: Rgb::BLACK,
            opacity: 1.0,
        };
        let style = Style::for_path(&state, None, Some(&black), false);

        assert_eq!(style.get("stroke-width"), Some("0.4"));
    }
}
