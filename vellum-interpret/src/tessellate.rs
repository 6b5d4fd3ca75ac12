//! Approximating shadings with flat-colored paths.
//!
//! Function-based shadings, triangle meshes and patch meshes are subdivided
//! recursively until the colors at the corners of a cell are close enough to each
//! other, or until a maximum depth is reached. Each resulting cell is emitted as a
//! closed path together with a single fill color.

use crate::shading::{Patch, Shading, ShadingKind, Triangle};
use kurbo::{Affine, BezPath, Point};
use smallvec::SmallVec;

type Color = SmallVec<[f32; 4]>;

/// The precision used when tessellating one shading type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    /// The largest difference of a color component between neighboring corners for
    /// which a cell is not subdivided any further.
    pub delta: f32,
    /// The maximum subdivision depth.
    pub max_depth: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            delta: 0.5,
            max_depth: 6,
        }
    }
}

/// The tessellation precision for each of the seven shading types.
///
/// Axial and radial shadings are never tessellated, but accept a precision like
/// the other types.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadingPrecision([Precision; 7]);

impl ShadingPrecision {
    /// The precision of a shading type. Unknown types use the default precision.
    pub fn get(&self, shading_type: u8) -> Precision {
        shading_type
            .checked_sub(1)
            .and_then(|i| self.0.get(i as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Set the precision of a shading type. Unknown types are ignored.
    pub fn set(&mut self, shading_type: u8, delta: f32, max_depth: u32) {
        if let Some(p) = shading_type
            .checked_sub(1)
            .and_then(|i| self.0.get_mut(i as usize))
        {
            *p = Precision { delta, max_depth };
        }
    }
}

/// Tessellate a function-based, triangle mesh or patch mesh shading.
///
/// `emit` receives each cell in shading space together with its color, in the
/// color space of the shading. Returns `false` for axial and radial shadings, which
/// can't be tessellated.
pub fn tessellate(
    shading: &Shading,
    precision: &ShadingPrecision,
    emit: &mut dyn FnMut(BezPath, &[f32]),
) -> bool {
    let p = precision.get(shading.shading_type());

    match shading.kind() {
        ShadingKind::Function { .. } => function_fill(shading, p, emit),
        ShadingKind::TriangleMesh { .. } => gouraud_fill(shading, p, emit),
        ShadingKind::PatchMesh { .. } => patch_fill(shading, p, emit),
        ShadingKind::Axial { .. } | ShadingKind::Radial { .. } => return false,
    }

    true
}

fn close(a: &[f32], b: &[f32], delta: f32) -> bool {
    a.iter().zip(b).all(|(a, b)| (a - b).abs() <= delta)
}

/// Tessellate a function-based shading by subdividing its domain into quadrants.
pub fn function_fill(shading: &Shading, precision: Precision, emit: &mut dyn FnMut(BezPath, &[f32])) {
    let ShadingKind::Function {
        domain,
        matrix,
        function,
    } = shading.kind()
    else {
        return;
    };

    let mut fill = FunctionFill {
        eval: &|x: f64, y: f64| function.eval(&[x as f32, y as f32]),
        matrix: *matrix,
        precision,
        emit,
    };
    let [x0, x1, y0, y1] = *domain;
    let colors = [
        (fill.eval)(x0, y0),
        (fill.eval)(x0, y1),
        (fill.eval)(x1, y0),
        (fill.eval)(x1, y1),
    ];

    fill.fill(x0, y0, x1, y1, &colors, 0);
}

struct FunctionFill<'a> {
    eval: &'a dyn Fn(f64, f64) -> Color,
    matrix: Affine,
    precision: Precision,
    emit: &'a mut dyn FnMut(BezPath, &[f32]),
}

impl FunctionFill<'_> {
    // `colors` are the colors at (x0, y0), (x0, y1), (x1, y0) and (x1, y1).
    fn fill(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, colors: &[Color; 4], depth: u32) {
        let delta = self.precision.delta;
        let corners_close = (0..4).all(|i| close(&colors[i], &colors[(i + 1) & 3], delta));

        let xm = 0.5 * (x0 + x1);
        let ym = 0.5 * (y0 + y1);
        let center = (self.eval)(xm, ym);

        // A cell is only emitted without subdividing at least once if the function
        // is constant over it.
        let done = if depth == 0 {
            corners_close && colors.iter().all(|c| close(c, &center, 0.0))
        } else {
            corners_close
        };

        if done || depth >= self.precision.max_depth {
            let mut path = BezPath::new();
            path.move_to(self.matrix * Point::new(x0, y0));
            path.line_to(self.matrix * Point::new(x1, y0));
            path.line_to(self.matrix * Point::new(x1, y1));
            path.line_to(self.matrix * Point::new(x0, y1));
            path.close_path();
            (self.emit)(path, &center);

            return;
        }

        let color_0m = (self.eval)(x0, ym);
        let color_1m = (self.eval)(x1, ym);
        let color_m0 = (self.eval)(xm, y0);
        let color_m1 = (self.eval)(xm, y1);
        let [c0, c1, c2, c3] = colors;

        self.fill(
            x0,
            y0,
            xm,
            ym,
            &[c0.clone(), color_0m.clone(), color_m0.clone(), center.clone()],
            depth + 1,
        );
        self.fill(
            x0,
            ym,
            xm,
            y1,
            &[color_0m, c1.clone(), center.clone(), color_m1.clone()],
            depth + 1,
        );
        self.fill(
            xm,
            y0,
            x1,
            ym,
            &[color_m0, center.clone(), c2.clone(), color_1m.clone()],
            depth + 1,
        );
        self.fill(
            xm,
            ym,
            x1,
            y1,
            &[center, color_m1, color_1m, c3.clone()],
            depth + 1,
        );
    }
}

/// Tessellate a triangle mesh by splitting each triangle at its edge midpoints.
///
/// If the shading has a function, the function input is interpolated and each
/// emitted triangle is mapped through the function.
pub fn gouraud_fill(shading: &Shading, precision: Precision, emit: &mut dyn FnMut(BezPath, &[f32])) {
    let ShadingKind::TriangleMesh { triangles, .. } = shading.kind() else {
        return;
    };

    for Triangle([a, b, c]) in triangles {
        gouraud_triangle(
            shading,
            [
                (a.point, a.color.clone()),
                (b.point, b.color.clone()),
                (c.point, c.color.clone()),
            ],
            precision,
            0,
            emit,
        );
    }
}

fn midpoint(a: &(Point, Color), b: &(Point, Color)) -> (Point, Color) {
    (
        a.0.midpoint(b.0),
        a.1.iter().zip(&b.1).map(|(a, b)| (a + b) / 2.0).collect(),
    )
}

fn gouraud_triangle(
    shading: &Shading,
    v: [(Point, Color); 3],
    precision: Precision,
    depth: u32,
    emit: &mut dyn FnMut(BezPath, &[f32]),
) {
    if (close(&v[0].1, &v[1].1, precision.delta) && close(&v[1].1, &v[2].1, precision.delta))
        || depth >= precision.max_depth
    {
        let mut path = BezPath::new();
        path.move_to(v[0].0);
        path.line_to(v[1].0);
        path.line_to(v[2].0);
        path.close_path();
        emit(path, &shading.vertex_color(&v[0].1));

        return;
    }

    let v01 = midpoint(&v[0], &v[1]);
    let v12 = midpoint(&v[1], &v[2]);
    let v20 = midpoint(&v[2], &v[0]);
    let [v0, v1, v2] = v;

    let next = depth + 1;
    gouraud_triangle(shading, [v0, v01.clone(), v20.clone()], precision, next, emit);
    gouraud_triangle(shading, [v01.clone(), v1, v12.clone()], precision, next, emit);
    gouraud_triangle(shading, [v01, v12.clone(), v20.clone()], precision, next, emit);
    gouraud_triangle(shading, [v20, v12, v2], precision, next, emit);
}

/// Tessellate a patch mesh by splitting each patch into four.
///
/// Meshes with many patches start at a larger depth, so that the total number of
/// emitted paths stays bounded.
pub fn patch_fill(shading: &Shading, precision: Precision, emit: &mut dyn FnMut(BezPath, &[f32])) {
    let ShadingKind::PatchMesh { patches, .. } = shading.kind() else {
        return;
    };

    let start = match patches.len() {
        n if n > 128 => 3,
        n if n > 64 => 2,
        n if n > 16 => 1,
        _ => 0,
    };

    for patch in patches {
        fill_patch(shading, patch, precision, start, emit);
    }
}

fn fill_patch(
    shading: &Shading,
    patch: &Patch,
    precision: Precision,
    depth: u32,
    emit: &mut dyn FnMut(BezPath, &[f32]),
) {
    let c = &patch.colors;
    let delta = precision.delta;
    let uniform = close(&c[0][0], &c[0][1], delta)
        && close(&c[0][1], &c[1][1], delta)
        && close(&c[1][1], &c[1][0], delta)
        && close(&c[1][0], &c[0][0], delta);

    if uniform || depth >= precision.max_depth {
        let p = &patch.points;
        let mut path = BezPath::new();
        path.move_to(p[0][0]);
        path.curve_to(p[0][1], p[0][2], p[0][3]);
        path.curve_to(p[1][3], p[2][3], p[3][3]);
        path.curve_to(p[3][2], p[3][1], p[3][0]);
        path.curve_to(p[2][0], p[1][0], p[0][0]);
        path.close_path();
        emit(path, &shading.vertex_color(&c[0][0]));

        return;
    }

    let [p00, p10, p01, p11] = split_patch(patch);

    for child in [p00, p10, p01, p11] {
        fill_patch(shading, &child, precision, depth + 1, emit);
    }
}

// Split a patch into four, returning them in the order in which they are drawn.
fn split_patch(patch: &Patch) -> [Patch; 4] {
    let p = &patch.points;
    let mid = |a: Point, b: Point| a.midpoint(b);

    // Split each row of control points at its middle with de Casteljau, giving the
    // control points of the left (0..4) and right (4..8) half.
    let mut xx = [[Point::ZERO; 8]; 4];

    for i in 0..4 {
        let m = mid(p[i][1], p[i][2]);
        xx[i][0] = p[i][0];
        xx[i][1] = mid(p[i][0], p[i][1]);
        xx[i][6] = mid(p[i][2], p[i][3]);
        xx[i][2] = mid(xx[i][1], m);
        xx[i][5] = mid(m, xx[i][6]);
        xx[i][3] = mid(xx[i][2], xx[i][5]);
        xx[i][4] = xx[i][3];
        xx[i][7] = p[i][3];
    }

    // Then split each column of both halves.
    let split_columns = |offset: usize| {
        let mut top = [[Point::ZERO; 4]; 4];
        let mut bottom = [[Point::ZERO; 4]; 4];

        for j in 0..4 {
            let col = |i: usize| xx[i][j + offset];
            let m = mid(col(1), col(2));
            top[0][j] = col(0);
            top[1][j] = mid(col(0), col(1));
            bottom[2][j] = mid(col(2), col(3));
            top[2][j] = mid(top[1][j], m);
            bottom[1][j] = mid(m, bottom[2][j]);
            top[3][j] = mid(top[2][j], bottom[1][j]);
            bottom[0][j] = top[3][j];
            bottom[3][j] = col(3);
        }

        (top, bottom)
    };

    let (points00, points10) = split_columns(0);
    let (points01, points11) = split_columns(4);

    let c = &patch.colors;
    let avg = |a: &Color, b: &Color| -> Color { a.iter().zip(b).map(|(a, b)| (a + b) / 2.0).collect() };

    let c00_01 = avg(&c[0][0], &c[0][1]);
    let c01_11 = avg(&c[0][1], &c[1][1]);
    let c11_10 = avg(&c[1][1], &c[1][0]);
    let c10_00 = avg(&c[1][0], &c[0][0]);
    let center = avg(&c10_00, &c01_11);

    [
        Patch {
            points: points00,
            colors: [
                [c[0][0].clone(), c00_01.clone()],
                [c10_00.clone(), center.clone()],
            ],
        },
        Patch {
            points: points10,
            colors: [
                [c10_00, center.clone()],
                [c[1][0].clone(), c11_10.clone()],
            ],
        },
        Patch {
            points: points01,
            colors: [
                [c00_01, c[0][1].clone()],
                [center.clone(), c01_11.clone()],
            ],
        },
        Patch {
            points: points11,
            colors: [[center, c01_11], [c11_10, c[1][1].clone()]],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_syntax::XRef;
    use vellum_syntax::object::keys::*;
    use vellum_syntax::object::{Dict, Name, Object, Stream};

    fn function_shading(c0: Vec<i32>, c1: Vec<i32>) -> Shading {
        let function = Dict::new()
            .with(FUNCTION_TYPE, 2)
            .with(DOMAIN, vec![0, 1, 0, 1])
            .with(C0, c0)
            .with(C1, c1)
            .with(N, 1);
        let dict = Dict::new()
            .with(SHADING_TYPE, 1)
            .with(COLOR_SPACE, Name::from("DeviceGray"))
            .with(MATRIX, vec![100, 0, 0, 100, 0, 0])
            .with(FUNCTION, function);

        Shading::new(&Object::Dict(dict), &XRef::new()).unwrap()
    }

    fn count(shading: &Shading, precision: &ShadingPrecision) -> Vec<(BezPath, Vec<f32>)> {
        let mut cells = vec![];
        let mut emit = |path: BezPath, color: &[f32]| cells.push((path, color.to_vec()));

        assert!(tessellate(shading, precision, &mut emit));

        cells
    }

    #[test]
    fn constant_function_is_one_cell() {
        let shading = function_shading(vec![1], vec![1]);
        let cells = count(&shading, &ShadingPrecision::default());

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].1, vec![1.0]);
        // The cell covers the domain mapped through the shading matrix.
        assert_eq!(
            kurbo::Shape::bounding_box(&cells[0].0),
            kurbo::Rect::new(0.0, 0.0, 100.0, 100.0)
        );
    }

    #[test]
    fn varying_function_is_bounded() {
        let shading = function_shading(vec![0], vec![1]);
        let mut precision = ShadingPrecision::default();

        let cells = count(&shading, &precision);
        assert!(cells.len() >= 4);
        assert!(cells.len() <= 4usize.pow(6));

        // A tiny delta forces subdivision down to the maximum depth everywhere.
        precision.set(1, 0.0, 3);
        assert_eq!(count(&shading, &precision).len(), 64);
    }

    #[test]
    fn precision_table() {
        let mut precision = ShadingPrecision::default();
        precision.set(4, 0.1, 2);
        precision.set(9, 0.1, 2);

        assert_eq!(precision.get(4), Precision { delta: 0.1, max_depth: 2 });
        assert_eq!(precision.get(1), Precision::default());
        assert_eq!(precision.get(0), Precision::default());
    }

    fn mesh(shading_type: i32, data: Vec<u8>) -> Shading {
        let dict = Dict::new()
            .with(SHADING_TYPE, shading_type)
            .with(COLOR_SPACE, Name::from("DeviceGray"))
            .with(BITS_PER_COORDINATE, 8)
            .with(BITS_PER_COMPONENT, 8)
            .with(BITS_PER_FLAG, 8)
            .with(DECODE, vec![0, 255, 0, 255, 0, 1]);

        Shading::new(&Object::Stream(Stream::new(dict, data)), &XRef::new()).unwrap()
    }

    #[test]
    fn gouraud_triangles() {
        let uniform = mesh(4, vec![0, 0, 0, 128, 0, 10, 0, 128, 0, 0, 10, 128]);
        assert_eq!(count(&uniform, &ShadingPrecision::default()).len(), 1);

        let varying = mesh(4, vec![0, 0, 0, 0, 0, 10, 0, 255, 0, 0, 10, 0]);
        let mut precision = ShadingPrecision::default();
        precision.set(4, 0.0, 2);
        assert_eq!(count(&varying, &precision).len(), 16);
    }

    #[test]
    fn patches_are_split_into_four() {
        let mut data = vec![0];
        for (x, y) in [
            (0, 0),
            (0, 10),
            (0, 20),
            (0, 30),
            (10, 30),
            (20, 30),
            (30, 30),
            (30, 20),
            (30, 10),
            (30, 0),
            (20, 0),
            (10, 0),
        ] {
            data.extend([x, y]);
        }
        data.extend([0, 255, 255, 0]);

        let shading = mesh(6, data);
        let mut precision = ShadingPrecision::default();
        precision.set(6, 0.0, 1);
        let cells = count(&shading, &precision);

        assert_eq!(cells.len(), 4);
        // The first child keeps the color of the first corner.
        assert_eq!(cells[0].1, vec![0.0]);
        let bbox = kurbo::Shape::bounding_box(&cells[0].0);
        assert!((bbox.x1 - 15.0).abs() < 1e-3 && (bbox.y1 - 15.0).abs() < 1e-3);
    }
}
