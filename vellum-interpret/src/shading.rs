//! Shadings.
//!
//! All seven shading types are parsed. Mesh shadings (types 4 to 7) are decoded
//! into triangles and patches up front, so that they can be tessellated without
//! going back to the stream data.

use crate::color::{ColorComponents, ColorSpace};
use crate::diagnostic::Diagnostic;
use crate::function::Function;
use kurbo::{Affine, Point, Rect};
use log::warn;
use smallvec::SmallVec;
use std::sync::Arc;
use vellum_syntax::XRef;
use vellum_syntax::bit_reader::BitReader;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Object, Stream};

/// The color function of a shading: either a single function with one output per
/// color component, or one single-output function per component.
#[derive(Debug, Clone)]
pub struct ShadingFunction(SmallVec<[Function; 1]>);

impl ShadingFunction {
    fn new(obj: &Object, xref: &XRef) -> Result<Self, Diagnostic> {
        let functions = match xref.resolve(obj) {
            Object::Array(a) => a
                .iter()
                .map(|f| Function::new(f, xref))
                .collect::<Result<SmallVec<_>, _>>()?,
            other => SmallVec::from_elem(Function::new(&other, xref)?, 1),
        };

        if functions.is_empty() {
            return Err(unsupported("shading has an empty function array"));
        }

        Ok(Self(functions))
    }

    /// The functions.
    pub fn functions(&self) -> &[Function] {
        &self.0
    }

    /// Evaluate the function(s).
    pub fn eval(&self, input: &[f32]) -> ColorComponents {
        match self.0.as_slice() {
            [single] => single.eval(input),
            many => many.iter().map(|f| f.eval(input)[0]).collect(),
        }
    }
}

/// A vertex of a triangle mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The position of the vertex, in shading space.
    pub point: Point,
    /// The color, or the function input if the shading has a function.
    pub color: ColorComponents,
}

/// A triangle of a triangle mesh.
#[derive(Debug, Clone)]
pub struct Triangle(pub [Vertex; 3]);

/// A Coons or tensor-product patch.
///
/// `points[i][j]` is the control point in row `i` and column `j`, so that the four
/// corners are `points[0][0]`, `points[0][3]`, `points[3][3]` and `points[3][0]`.
/// `colors[0][0]`, `colors[0][1]`, `colors[1][1]` and `colors[1][0]` are the colors
/// of these corners, or the function inputs if the shading has a function.
#[derive(Debug, Clone)]
pub struct Patch {
    /// The 4x4 control points.
    pub points: [[Point; 4]; 4],
    /// The corner colors.
    pub colors: [[ColorComponents; 2]; 2],
}

/// The type-specific data of a shading.
#[derive(Debug, Clone)]
pub enum ShadingKind {
    /// A function-based shading (type 1).
    Function {
        /// The domain `[x0, x1, y0, y1]`.
        domain: [f64; 4],
        /// The transform from the shading domain into shading space.
        matrix: Affine,
        /// The color function.
        function: ShadingFunction,
    },
    /// An axial shading (type 2).
    Axial {
        /// The start and end point `[x0, y0, x1, y1]`.
        coords: [f64; 4],
        /// The parametric domain `[t0, t1]`.
        domain: [f32; 2],
        /// The color function.
        function: ShadingFunction,
        /// Whether the shading extends beyond the start and end point.
        extend: [bool; 2],
    },
    /// A radial shading (type 3).
    Radial {
        /// The two circles `[x0, y0, r0, x1, y1, r1]`.
        coords: [f64; 6],
        /// The parametric domain `[t0, t1]`.
        domain: [f32; 2],
        /// The color function.
        function: ShadingFunction,
        /// Whether the shading extends beyond the start and end circle.
        extend: [bool; 2],
    },
    /// A free-form (type 4) or lattice-form (type 5) triangle mesh.
    TriangleMesh {
        /// The triangles.
        triangles: Vec<Triangle>,
        /// The function vertex colors are mapped through.
        function: Option<ShadingFunction>,
    },
    /// A Coons (type 6) or tensor-product (type 7) patch mesh.
    PatchMesh {
        /// The patches.
        patches: Vec<Patch>,
        /// The function corner colors are mapped through.
        function: Option<ShadingFunction>,
    },
}

/// A shading.
#[derive(Debug, Clone)]
pub struct Shading(Arc<ShadingInner>);

#[derive(Debug)]
struct ShadingInner {
    shading_type: u8,
    kind: ShadingKind,
    color_space: ColorSpace,
    background: Option<ColorComponents>,
    bbox: Option<Rect>,
    anti_alias: bool,
}

impl Shading {
    /// Parse a shading from a shading dictionary or stream.
    pub fn new(obj: &Object, xref: &XRef) -> Result<Self, Diagnostic> {
        let obj = xref.resolve(obj);
        let dict = obj
            .dict_like()
            .ok_or_else(|| unsupported("shading is not a dictionary"))?;

        let shading_type = dict
            .get::<u8>(SHADING_TYPE, xref)
            .ok_or_else(|| unsupported("shading has no type"))?;

        let color_space = dict
            .get_raw(COLOR_SPACE)
            .ok_or_else(|| unsupported("shading has no color space"))
            .and_then(|cs| ColorSpace::new(cs, xref))?;

        if color_space.is_pattern() {
            return Err(unsupported("shading has a pattern color space"));
        }

        let background = dict
            .get::<Array>(BACKGROUND, xref)
            .and_then(|a| a.to_vec::<f32>(xref))
            .filter(|b| b.len() == color_space.num_components())
            .map(ColorComponents::from_vec);
        let bbox = dict.get::<Rect>(BBOX, xref);
        let anti_alias = dict.get::<bool>(ANTI_ALIAS, xref).unwrap_or(false);

        let function = || {
            dict.get_raw(FUNCTION)
                .ok_or_else(|| unsupported("shading has no function"))
                .and_then(|f| ShadingFunction::new(f, xref))
        };
        let optional_function = || {
            dict.get_raw(FUNCTION)
                .map(|f| ShadingFunction::new(f, xref))
                .transpose()
        };

        let kind = match shading_type {
            1 => {
                let domain = dict
                    .get::<Array>(DOMAIN, xref)
                    .and_then(|a| a.to_vec::<f64>(xref))
                    .filter(|d| d.len() == 4)
                    .map(|d| [d[0], d[1], d[2], d[3]])
                    .unwrap_or([0.0, 1.0, 0.0, 1.0]);
                let matrix = dict.get::<Affine>(MATRIX, xref).unwrap_or_default();

                ShadingKind::Function {
                    domain,
                    matrix,
                    function: function()?,
                }
            }
            2 | 3 => {
                let len = if shading_type == 2 { 4 } else { 6 };
                let coords = dict
                    .get::<Array>(COORDS, xref)
                    .and_then(|a| a.to_vec::<f64>(xref))
                    .filter(|c| c.len() == len)
                    .ok_or_else(|| unsupported("shading has invalid coordinates"))?;
                let domain = dict
                    .get::<Array>(DOMAIN, xref)
                    .and_then(|a| a.to_vec::<f32>(xref))
                    .filter(|d| d.len() == 2)
                    .map(|d| [d[0], d[1]])
                    .unwrap_or([0.0, 1.0]);
                let extend = dict
                    .get::<Array>(EXTEND, xref)
                    .and_then(|a| a.to_vec::<bool>(xref))
                    .filter(|e| e.len() == 2)
                    .map(|e| [e[0], e[1]])
                    .unwrap_or([false, false]);
                let function = function()?;

                if shading_type == 2 {
                    ShadingKind::Axial {
                        coords: [coords[0], coords[1], coords[2], coords[3]],
                        domain,
                        function,
                        extend,
                    }
                } else {
                    ShadingKind::Radial {
                        coords: [
                            coords[0], coords[1], coords[2], coords[3], coords[4], coords[5],
                        ],
                        domain,
                        function,
                        extend,
                    }
                }
            }
            4..=7 => {
                let stream = obj
                    .as_stream()
                    .ok_or_else(|| unsupported("mesh shading is not a stream"))?;
                let function = optional_function()?;
                let num_components = if function.is_some() {
                    1
                } else {
                    color_space.num_components()
                };
                let params = MeshParams::new(stream.dict(), num_components, xref)?;
                let data = stream
                    .decoded(xref)
                    .ok_or_else(|| unsupported("failed to decode mesh shading"))?;

                match shading_type {
                    4 => ShadingKind::TriangleMesh {
                        triangles: read_free_form_triangles(&data, &params),
                        function,
                    },
                    5 => {
                        let per_row = dict
                            .get::<usize>(VERTICES_PER_ROW, xref)
                            .filter(|n| *n >= 2)
                            .ok_or_else(|| unsupported("lattice shading has too few columns"))?;

                        ShadingKind::TriangleMesh {
                            triangles: read_lattice_triangles(&data, &params, per_row),
                            function,
                        }
                    }
                    _ => ShadingKind::PatchMesh {
                        patches: read_patches(&data, &params, shading_type == 7),
                        function,
                    },
                }
            }
            t => return Err(Diagnostic::UnsupportedShading(format!("unknown type {t}"))),
        };

        Ok(Self(Arc::new(ShadingInner {
            shading_type,
            kind,
            color_space,
            background,
            bbox,
            anti_alias,
        })))
    }

    /// The shading type, between 1 and 7.
    pub fn shading_type(&self) -> u8 {
        self.0.shading_type
    }

    /// The type-specific data.
    pub fn kind(&self) -> &ShadingKind {
        &self.0.kind
    }

    /// The color space of the shading.
    pub fn color_space(&self) -> &ColorSpace {
        &self.0.color_space
    }

    /// The background color, used by shading patterns outside of the shading's extent.
    pub fn background(&self) -> Option<&ColorComponents> {
        self.0.background.as_ref()
    }

    /// The bounding box of the shading, in shading space.
    pub fn bbox(&self) -> Option<Rect> {
        self.0.bbox
    }

    /// Whether anti-aliasing was requested.
    pub fn anti_alias(&self) -> bool {
        self.0.anti_alias
    }

    /// Map the color of a mesh vertex, which is a function input if the shading has
    /// a function, to a color in the shading's color space.
    pub fn vertex_color(&self, color: &[f32]) -> ColorComponents {
        match self.kind() {
            ShadingKind::TriangleMesh {
                function: Some(f), ..
            }
            | ShadingKind::PatchMesh {
                function: Some(f), ..
            } => f.eval(color),
            _ => ColorComponents::from_slice(color),
        }
    }
}

struct MeshParams {
    bits_per_coordinate: u8,
    bits_per_component: u8,
    bits_per_flag: u8,
    x_range: (f32, f32),
    y_range: (f32, f32),
    color_ranges: Vec<(f32, f32)>,
}

impl MeshParams {
    fn new(dict: &Dict, num_components: usize, xref: &XRef) -> Result<Self, Diagnostic> {
        let bits_per_coordinate = dict
            .get::<u8>(BITS_PER_COORDINATE, xref)
            .filter(|b| matches!(b, 1 | 2 | 4 | 8 | 12 | 16 | 24 | 32))
            .ok_or_else(|| unsupported("invalid bits per coordinate"))?;
        let bits_per_component = dict
            .get::<u8>(BITS_PER_COMPONENT, xref)
            .filter(|b| matches!(b, 1 | 2 | 4 | 8 | 12 | 16))
            .ok_or_else(|| unsupported("invalid bits per component"))?;
        // Lattice-form meshes have no flags.
        let bits_per_flag = dict
            .get::<u8>(BITS_PER_FLAG, xref)
            .filter(|b| matches!(b, 2 | 4 | 8))
            .unwrap_or(8);
        let decode = dict
            .get::<Array>(DECODE, xref)
            .and_then(|a| a.to_vec::<f32>(xref))
            .filter(|d| d.len() >= 4 + 2 * num_components)
            .ok_or_else(|| unsupported("mesh shading has an invalid decode array"))?;

        Ok(Self {
            bits_per_coordinate,
            bits_per_component,
            bits_per_flag,
            x_range: (decode[0], decode[1]),
            y_range: (decode[2], decode[3]),
            color_ranges: decode[4..4 + 2 * num_components]
                .chunks_exact(2)
                .map(|c| (c[0], c[1]))
                .collect(),
        })
    }

    fn read_point(&self, reader: &mut BitReader<'_>) -> Option<Point> {
        let x = reader.read_scaled(self.bits_per_coordinate, self.x_range.0, self.x_range.1)?;
        let y = reader.read_scaled(self.bits_per_coordinate, self.y_range.0, self.y_range.1)?;

        Some(Point::new(x as f64, y as f64))
    }

    fn read_color(&self, reader: &mut BitReader<'_>) -> Option<ColorComponents> {
        self.color_ranges
            .iter()
            .map(|(min, max)| reader.read_scaled(self.bits_per_component, *min, *max))
            .collect()
    }

    fn read_vertex(&self, reader: &mut BitReader<'_>) -> Option<Vertex> {
        Some(Vertex {
            point: self.read_point(reader)?,
            color: self.read_color(reader)?,
        })
    }
}

fn read_free_form_triangles(data: &[u8], params: &MeshParams) -> Vec<Triangle> {
    let mut reader = BitReader::new(data);
    let mut triangles: Vec<Triangle> = vec![];
    let read = |reader: &mut BitReader<'_>| {
        let flag = reader.read(params.bits_per_flag)?;
        let vertex = params.read_vertex(reader)?;
        reader.align();

        Some((flag, vertex))
    };

    while let Some((flag, a)) = read(&mut reader) {
        let triangle = match (flag, triangles.last()) {
            (0, _) => {
                let Some(((_, b), (_, c))) = read(&mut reader).zip(read(&mut reader)) else {
                    break;
                };

                Triangle([a, b, c])
            }
            (1, Some(Triangle([_, vb, vc]))) => Triangle([vb.clone(), vc.clone(), a]),
            (2, Some(Triangle([va, _, vc]))) => Triangle([va.clone(), vc.clone(), a]),
            _ => {
                warn!("invalid edge flag {flag} in triangle mesh");

                continue;
            }
        };

        triangles.push(triangle);
    }

    triangles
}

fn read_lattice_triangles(data: &[u8], params: &MeshParams, per_row: usize) -> Vec<Triangle> {
    let mut reader = BitReader::new(data);
    let mut vertices = vec![];

    while let Some(vertex) = params.read_vertex(&mut reader) {
        reader.align();
        vertices.push(vertex);
    }

    let rows = vertices.chunks_exact(per_row).collect::<Vec<_>>();
    let mut triangles = vec![];

    for pair in rows.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);

        for j in 0..per_row - 1 {
            triangles.push(Triangle([
                top[j].clone(),
                top[j + 1].clone(),
                bottom[j].clone(),
            ]));
            triangles.push(Triangle([
                top[j + 1].clone(),
                bottom[j + 1].clone(),
                bottom[j].clone(),
            ]));
        }
    }

    triangles
}

// The order in which the boundary points of a patch appear in the stream.
const BOUNDARY: [(usize, usize); 12] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
    (3, 2),
    (3, 1),
    (3, 0),
    (2, 0),
    (1, 0),
];
const INTERIOR: [(usize, usize); 4] = [(1, 1), (1, 2), (2, 2), (2, 1)];
const CORNERS: [(usize, usize); 4] = [(0, 0), (0, 1), (1, 1), (1, 0)];

fn read_patches(data: &[u8], params: &MeshParams, tensor: bool) -> Vec<Patch> {
    let mut reader = BitReader::new(data);
    let mut patches: Vec<Patch> = vec![];

    loop {
        let Some(flag) = reader.read(params.bits_per_flag) else {
            break;
        };

        let mut points = [[Point::ZERO; 4]; 4];
        let mut colors: [[ColorComponents; 2]; 2] = Default::default();

        // With a non-zero flag, the first edge and two corner colors are shared with
        // an edge of the previous patch.
        let (shared_points, shared_colors) = match (flag, patches.last()) {
            (0, _) => (0, 0),
            (1..=3, Some(prev)) => {
                let edge: [(usize, usize); 4] = match flag {
                    1 => [(0, 3), (1, 3), (2, 3), (3, 3)],
                    2 => [(3, 3), (3, 2), (3, 1), (3, 0)],
                    _ => [(3, 0), (2, 0), (1, 0), (0, 0)],
                };
                let edge_colors: [(usize, usize); 2] = match flag {
                    1 => [(0, 1), (1, 1)],
                    2 => [(1, 1), (1, 0)],
                    _ => [(1, 0), (0, 0)],
                };

                for (k, (i, j)) in edge.iter().enumerate() {
                    let (ti, tj) = BOUNDARY[k];
                    points[ti][tj] = prev.points[*i][*j];
                }

                for (k, (i, j)) in edge_colors.iter().enumerate() {
                    let (ti, tj) = CORNERS[k];
                    colors[ti][tj] = prev.colors[*i][*j].clone();
                }

                (4, 2)
            }
            _ => {
                warn!("invalid edge flag {flag} in patch mesh");

                break;
            }
        };

        let mut complete = true;

        for (i, j) in BOUNDARY.iter().skip(shared_points) {
            match params.read_point(&mut reader) {
                Some(p) => points[*i][*j] = p,
                None => complete = false,
            }
        }

        if tensor {
            for (i, j) in INTERIOR {
                match params.read_point(&mut reader) {
                    Some(p) => points[i][j] = p,
                    None => complete = false,
                }
            }
        }

        for (i, j) in CORNERS.iter().skip(shared_colors) {
            match params.read_color(&mut reader) {
                Some(c) => colors[*i][*j] = c,
                None => complete = false,
            }
        }

        if !complete {
            break;
        }

        if !tensor {
            coons_interior(&mut points);
        }

        reader.align();
        patches.push(Patch { points, colors });
    }

    patches
}

// Compute the implicit interior control points of a Coons patch, so that it can be
// treated as a tensor-product patch.
fn coons_interior(p: &mut [[Point; 4]; 4]) {
    let f = |a: Point, b: Point, c: Point, d: Point, e: Point, g: Point, h: Point, k: Point| {
        (-4.0 * a.to_vec2() + 6.0 * (b.to_vec2() + c.to_vec2())
            - 2.0 * (d.to_vec2() + e.to_vec2())
            + 3.0 * (g.to_vec2() + h.to_vec2())
            - k.to_vec2())
            / 9.0
    };

    p[1][1] = f(
        p[0][0], p[0][1], p[1][0], p[0][3], p[3][0], p[3][1], p[1][3], p[3][3],
    )
    .to_point();
    p[1][2] = f(
        p[0][3], p[0][2], p[1][3], p[0][0], p[3][3], p[3][2], p[1][0], p[3][0],
    )
    .to_point();
    p[2][1] = f(
        p[3][0], p[3][1], p[2][0], p[3][3], p[0][0], p[0][1], p[2][3], p[0][3],
    )
    .to_point();
    p[2][2] = f(
        p[3][3], p[3][2], p[2][3], p[3][0], p[0][3], p[0][2], p[2][0], p[0][0],
    )
    .to_point();
}

fn unsupported(msg: &str) -> Diagnostic {
    Diagnostic::UnsupportedShading(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_syntax::object::Name;

    fn mesh_dict(shading_type: i32) -> Dict {
        Dict::new()
            .with(SHADING_TYPE, shading_type)
            .with(COLOR_SPACE, Name::from("DeviceGray"))
            .with(BITS_PER_COORDINATE, 8)
            .with(BITS_PER_COMPONENT, 8)
            .with(BITS_PER_FLAG, 8)
            .with(DECODE, vec![0, 255, 0, 255, 0, 1])
    }

    #[test]
    fn axial() {
        let xref = XRef::new();
        let function = Dict::new()
            .with(FUNCTION_TYPE, 2)
            .with(DOMAIN, vec![0, 1])
            .with(N, 1);
        let dict = Dict::new()
            .with(SHADING_TYPE, 2)
            .with(COLOR_SPACE, Name::from("DeviceGray"))
            .with(COORDS, vec![0, 0, 100, 0])
            .with(EXTEND, vec![true, false])
            .with(FUNCTION, function);
        let shading = Shading::new(&Object::Dict(dict), &xref).unwrap();

        assert_eq!(shading.shading_type(), 2);
        let ShadingKind::Axial {
            coords,
            domain,
            extend,
            ..
        } = shading.kind()
        else {
            panic!("expected an axial shading");
        };
        assert_eq!(coords, &[0.0, 0.0, 100.0, 0.0]);
        assert_eq!(domain, &[0.0, 1.0]);
        assert_eq!(extend, &[true, false]);
    }

    #[test]
    fn free_form_triangles() {
        let xref = XRef::new();
        // Flag, x, y, gray. The second vertex with flag 1 forms a triangle with the
        // last two vertices of the first triangle.
        let data = vec![
            0, 0, 0, 0, //
            0, 10, 0, 255, //
            0, 0, 10, 0, //
            1, 10, 10, 255,
        ];
        let stream = Stream::new(mesh_dict(4), data);
        let shading = Shading::new(&Object::Stream(stream), &xref).unwrap();

        let ShadingKind::TriangleMesh { triangles, .. } = shading.kind() else {
            panic!("expected a triangle mesh");
        };
        assert_eq!(triangles.len(), 2);
        assert!((triangles[1].0[0].point - Point::new(10.0, 0.0)).hypot() < 1e-4);
        assert!((triangles[1].0[2].point - Point::new(10.0, 10.0)).hypot() < 1e-4);
        assert_eq!(triangles[1].0[2].color.as_slice(), &[1.0]);
    }

    #[test]
    fn lattice_triangles() {
        let xref = XRef::new();
        let data = vec![
            0, 0, 0, //
            10, 0, 0, //
            0, 10, 0, //
            10, 10, 0,
        ];
        let dict = mesh_dict(5).with(VERTICES_PER_ROW, 2);
        let stream = Stream::new(dict, data);
        let shading = Shading::new(&Object::Stream(stream), &xref).unwrap();

        let ShadingKind::TriangleMesh { triangles, .. } = shading.kind() else {
            panic!("expected a triangle mesh");
        };
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn coons_patch() {
        let xref = XRef::new();
        let mut data = vec![0];
        // A square from (0, 0) to (30, 30) with straight edges.
        let boundary = [
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
        ];
        for (x, y) in boundary {
            data.extend([x, y]);
        }
        data.extend([0, 255, 255, 0]);

        let stream = Stream::new(mesh_dict(6), data);
        let shading = Shading::new(&Object::Stream(stream), &xref).unwrap();

        let ShadingKind::PatchMesh { patches, .. } = shading.kind() else {
            panic!("expected a patch mesh");
        };
        assert_eq!(patches.len(), 1);
        let p = &patches[0];
        assert!((p.points[1][1] - Point::new(10.0, 10.0)).hypot() < 1e-4);
        assert!((p.points[2][2] - Point::new(20.0, 20.0)).hypot() < 1e-4);
        assert_eq!(p.colors[1][1].as_slice(), &[1.0]);
    }

    #[test]
    fn pattern_space_is_rejected() {
        let xref = XRef::new();
        let dict = Dict::new()
            .with(SHADING_TYPE, 1)
            .with(COLOR_SPACE, Name::from("Pattern"));

        assert!(Shading::new(&Object::Dict(dict), &xref).is_err());
    }
}
