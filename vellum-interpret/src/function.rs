//! PDF functions.
//!
//! Sampled (type 0), exponential (type 2) and stitching (type 3) functions are
//! supported. PostScript calculator functions (type 4) are reported as unsupported.

use crate::diagnostic::Diagnostic;
use crate::util::interpolate;
use smallvec::SmallVec;
use std::sync::Arc;
use vellum_syntax::XRef;
use vellum_syntax::bit_reader::BitReader;
use vellum_syntax::object::keys::*;
use vellum_syntax::object::{Array, Dict, Object};

/// The output values of a function.
pub type Values = SmallVec<[f32; 4]>;

type Ranges = SmallVec<[(f32, f32); 4]>;

// Stitching functions can nest, guard against reference cycles.
const MAX_NESTING: u32 = 8;
// Interpolation visits 2^m corners for m inputs.
const MAX_SAMPLED_INPUTS: usize = 8;

/// A PDF function.
#[derive(Debug, Clone)]
pub struct Function(Arc<FunctionKind>);

/// The different kinds of functions.
#[derive(Debug)]
pub enum FunctionKind {
    /// A sampled function.
    Sampled(Sampled),
    /// An exponential interpolation function.
    Exponential(Exponential),
    /// A stitching function.
    Stitching(Stitching),
}

impl Function {
    /// Create a new function from a function dictionary or stream.
    pub fn new(obj: &Object, xref: &XRef) -> Result<Self, Diagnostic> {
        Self::new_inner(obj, xref, 0)
    }

    fn new_inner(obj: &Object, xref: &XRef, depth: u32) -> Result<Self, Diagnostic> {
        if depth > MAX_NESTING {
            return Err(unsupported("functions are nested too deeply"));
        }

        let obj = xref.resolve(obj);
        let dict = obj
            .dict_like()
            .ok_or_else(|| unsupported("function is not a dictionary"))?;

        let domain = dict
            .get::<Array>(DOMAIN, xref)
            .and_then(|a| ranges(&a, xref))
            .filter(|d| !d.is_empty())
            .ok_or_else(|| unsupported("function has no domain"))?;
        let range = dict.get::<Array>(RANGE, xref).and_then(|a| ranges(&a, xref));

        let kind = match dict.get::<i32>(FUNCTION_TYPE, xref) {
            Some(0) => {
                let stream = obj
                    .as_stream()
                    .ok_or_else(|| unsupported("sampled function is not a stream"))?;
                FunctionKind::Sampled(Sampled::new(stream, domain, range, xref)?)
            }
            Some(2) => FunctionKind::Exponential(Exponential::new(dict, domain, range, xref)?),
            Some(3) => FunctionKind::Stitching(Stitching::new(dict, domain, range, xref, depth)?),
            Some(4) => return Err(unsupported("PostScript functions are not supported")),
            Some(t) => return Err(Diagnostic::UnsupportedFunction(format!("unknown type {t}"))),
            None => return Err(unsupported("function has no type")),
        };

        Ok(Self(Arc::new(kind)))
    }

    /// The kind of the function.
    pub fn kind(&self) -> &FunctionKind {
        &self.0
    }

    /// The function type, as stored in the `FunctionType` entry.
    pub fn function_type(&self) -> u8 {
        match self.kind() {
            FunctionKind::Sampled(_) => 0,
            FunctionKind::Exponential(_) => 2,
            FunctionKind::Stitching(_) => 3,
        }
    }

    /// The domain of the function, one interval per input.
    pub fn domain(&self) -> &[(f32, f32)] {
        match self.kind() {
            FunctionKind::Sampled(s) => &s.domain,
            FunctionKind::Exponential(e) => &e.domain,
            FunctionKind::Stitching(s) => &s.domain,
        }
    }

    /// The number of inputs.
    pub fn input_size(&self) -> usize {
        self.domain().len()
    }

    /// The number of outputs, if it is known.
    pub fn output_size(&self) -> Option<usize> {
        match self.kind() {
            FunctionKind::Sampled(s) => Some(s.range.len()),
            FunctionKind::Exponential(e) => Some(e.c0.len()),
            FunctionKind::Stitching(s) => s
                .range
                .as_ref()
                .map(|r| r.len())
                .or_else(|| s.functions.first().and_then(|f| f.output_size())),
        }
    }

    /// Evaluate the function. Missing inputs are treated as 0.
    pub fn eval(&self, input: &[f32]) -> Values {
        let domain = self.domain();
        let clamped = domain
            .iter()
            .enumerate()
            .map(|(i, (min, max))| clamp(input.get(i).copied().unwrap_or(0.0), *min, *max))
            .collect::<Values>();

        match self.kind() {
            FunctionKind::Sampled(s) => s.eval(&clamped),
            FunctionKind::Exponential(e) => e.eval(clamped[0]),
            FunctionKind::Stitching(s) => s.eval(clamped[0]),
        }
    }
}

/// A sampled function (type 0), evaluated with multilinear interpolation.
#[derive(Debug)]
pub struct Sampled {
    domain: Ranges,
    range: Ranges,
    size: SmallVec<[usize; 4]>,
    encode: Ranges,
    decode: Ranges,
    bits_per_sample: u8,
    samples: Vec<u32>,
}

impl Sampled {
    fn new(
        stream: &vellum_syntax::object::Stream,
        domain: Ranges,
        range: Option<Ranges>,
        xref: &XRef,
    ) -> Result<Self, Diagnostic> {
        let dict = stream.dict();
        let range = range
            .filter(|r| !r.is_empty())
            .ok_or_else(|| unsupported("sampled function has no range"))?;

        if domain.len() > MAX_SAMPLED_INPUTS {
            return Err(unsupported("sampled function has too many inputs"));
        }

        let bits_per_sample = dict.get::<u8>(BITS_PER_SAMPLE, xref).unwrap_or(0);

        if !matches!(bits_per_sample, 1 | 2 | 4 | 8 | 12 | 16 | 24 | 32) {
            return Err(Diagnostic::UnsupportedFunction(format!(
                "invalid bits per sample {bits_per_sample}"
            )));
        }

        let size = dict
            .get::<Array>(SIZE, xref)
            .and_then(|a| a.to_vec::<usize>(xref))
            .filter(|s| s.len() == domain.len() && s.iter().all(|n| *n > 0))
            .ok_or_else(|| unsupported("sampled function has an invalid size"))?
            .into_iter()
            .collect::<SmallVec<[usize; 4]>>();

        let encode = dict
            .get::<Array>(ENCODE, xref)
            .and_then(|a| ranges(&a, xref))
            .filter(|e| e.len() == size.len())
            .unwrap_or_else(|| size.iter().map(|s| (0.0, (*s - 1) as f32)).collect());
        let decode = dict
            .get::<Array>(DECODE, xref)
            .and_then(|a| ranges(&a, xref))
            .filter(|d| d.len() == range.len())
            .unwrap_or_else(|| range.clone());

        let num_samples = size
            .iter()
            .try_fold(range.len(), |acc, s| acc.checked_mul(*s))
            .filter(|n| *n <= 1 << 24)
            .ok_or_else(|| unsupported("sampled function is too large"))?;

        let data = stream
            .decoded(xref)
            .ok_or_else(|| unsupported("failed to decode sampled function"))?;
        let mut reader = BitReader::new(&data);
        let mut samples = Vec::with_capacity(num_samples);

        for _ in 0..num_samples {
            // Truncated sample data is padded with zeros.
            samples.push(reader.read(bits_per_sample).unwrap_or(0));
        }

        Ok(Self {
            domain,
            range,
            size,
            encode,
            decode,
            bits_per_sample,
            samples,
        })
    }

    fn eval(&self, input: &[f32]) -> Values {
        let m = self.size.len();
        let n = self.range.len();
        let mut base = SmallVec::<[usize; 4]>::new();
        let mut frac = SmallVec::<[f32; 4]>::new();

        for i in 0..m {
            let (d0, d1) = self.domain[i];
            let (e0, e1) = self.encode[i];
            let max_index = (self.size[i] - 1) as f32;
            let e = clamp(interpolate(input[i], d0, d1, e0, e1), 0.0, max_index);
            // The last sample has no successor to interpolate with.
            let idx = (e.floor() as usize).min(self.size[i].saturating_sub(2));
            base.push(idx);
            frac.push(if self.size[i] > 1 { e - idx as f32 } else { 0.0 });
        }

        let max_sample = ((1u64 << self.bits_per_sample) - 1) as f32;
        let mut out = Values::new();

        for j in 0..n {
            let mut value = 0.0;

            // Sum up the weighted values of all corners of the surrounding cell.
            for corner in 0..(1usize << m) {
                let mut weight = 1.0;
                let mut index = 0;
                let mut stride = 1;

                for i in 0..m {
                    let bit = (corner >> i) & 1;
                    weight *= if bit == 1 { frac[i] } else { 1.0 - frac[i] };
                    index += (base[i] + bit).min(self.size[i] - 1) * stride;
                    stride *= self.size[i];
                }

                if weight != 0.0 {
                    value += weight * self.samples.get(index * n + j).copied().unwrap_or(0) as f32;
                }
            }

            let (dmin, dmax) = self.decode[j];
            let (rmin, rmax) = self.range[j];
            out.push(clamp(
                interpolate(value, 0.0, max_sample, dmin, dmax),
                rmin,
                rmax,
            ));
        }

        out
    }
}

/// An exponential interpolation function (type 2).
#[derive(Debug)]
pub struct Exponential {
    domain: Ranges,
    range: Option<Ranges>,
    c0: Values,
    c1: Values,
    n: f32,
}

impl Exponential {
    fn new(
        dict: &Dict,
        domain: Ranges,
        range: Option<Ranges>,
        xref: &XRef,
    ) -> Result<Self, Diagnostic> {
        let values = |key, default: f32| {
            dict.get::<Array>(key, xref)
                .and_then(|a| a.to_vec::<f32>(xref))
                .map(Values::from_vec)
                .unwrap_or_else(|| Values::from_slice(&[default]))
        };

        let c0 = values(C0, 0.0);
        let c1 = values(C1, 1.0);

        if c0.len() != c1.len() {
            return Err(unsupported("C0 and C1 of exponential function differ in size"));
        }

        let n = dict
            .get::<f32>(N, xref)
            .ok_or_else(|| unsupported("exponential function has no exponent"))?;

        Ok(Self {
            domain,
            range,
            c0,
            c1,
            n,
        })
    }

    /// The output for input 0.
    pub fn c0(&self) -> &[f32] {
        &self.c0
    }

    /// The output for input 1.
    pub fn c1(&self) -> &[f32] {
        &self.c1
    }

    /// The interpolation exponent.
    pub fn exponent(&self) -> f32 {
        self.n
    }

    fn eval(&self, x: f32) -> Values {
        let t = x.powf(self.n);

        self.c0
            .iter()
            .zip(self.c1.iter())
            .enumerate()
            .map(|(i, (c0, c1))| {
                let v = c0 + t * (c1 - c0);

                match self.range.as_ref().and_then(|r| r.get(i)) {
                    Some((min, max)) => clamp(v, *min, *max),
                    None => v,
                }
            })
            .collect()
    }
}

/// A stitching function (type 3), combining several 1-input functions.
#[derive(Debug)]
pub struct Stitching {
    domain: Ranges,
    range: Option<Ranges>,
    functions: Vec<Function>,
    bounds: Vec<f32>,
    encode: Vec<(f32, f32)>,
}

impl Stitching {
    fn new(
        dict: &Dict,
        domain: Ranges,
        range: Option<Ranges>,
        xref: &XRef,
        depth: u32,
    ) -> Result<Self, Diagnostic> {
        let functions = dict
            .get::<Array>(FUNCTIONS, xref)
            .ok_or_else(|| unsupported("stitching function has no functions"))?
            .iter()
            .map(|f| Function::new_inner(f, xref, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if functions.is_empty() {
            return Err(unsupported("stitching function has no functions"));
        }

        let bounds = dict
            .get::<Array>(BOUNDS, xref)
            .and_then(|a| a.to_vec::<f32>(xref))
            .filter(|b| b.len() == functions.len() - 1)
            .ok_or_else(|| unsupported("stitching function has invalid bounds"))?;

        let encode = dict
            .get::<Array>(ENCODE, xref)
            .and_then(|a| ranges(&a, xref))
            .filter(|e| e.len() == functions.len())
            .ok_or_else(|| unsupported("stitching function has invalid encode array"))?
            .into_vec();

        Ok(Self {
            domain,
            range,
            functions,
            bounds,
            encode,
        })
    }

    /// The sub-functions.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// The bounds between the sub-domains.
    pub fn bounds(&self) -> &[f32] {
        &self.bounds
    }

    /// The encode intervals, one per sub-function.
    pub fn encode(&self) -> &[(f32, f32)] {
        &self.encode
    }

    fn eval(&self, x: f32) -> Values {
        let (d0, d1) = self.domain[0];
        let k = self
            .bounds
            .iter()
            .position(|b| x < *b)
            .unwrap_or(self.bounds.len());
        let low = if k == 0 { d0 } else { self.bounds[k - 1] };
        let high = if k == self.bounds.len() {
            d1
        } else {
            self.bounds[k]
        };
        let (e0, e1) = self.encode[k];

        let mut out = self.functions[k].eval(&[interpolate(x, low, high, e0, e1)]);

        if let Some(range) = &self.range {
            for (v, (min, max)) in out.iter_mut().zip(range.iter()) {
                *v = clamp(*v, *min, *max);
            }
        }

        out
    }
}

/// A transfer function of a graphics state or soft mask.
#[derive(Debug, Clone)]
pub enum TransferFunction {
    /// One function for all components.
    Single(Function),
    /// One function per component.
    PerComponent(Box<[Function; 4]>),
}

fn ranges(array: &Array, xref: &XRef) -> Option<Ranges> {
    let values = array.to_vec::<f32>(xref)?;

    if values.len() % 2 != 0 {
        return None;
    }

    Some(values.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if min <= max {
        v.clamp(min, max)
    } else {
        v
    }
}

fn unsupported(msg: &str) -> Diagnostic {
    Diagnostic::UnsupportedFunction(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_syntax::object::Stream;

    fn exponential(c0: Vec<f32>, c1: Vec<f32>, n: f32) -> Dict {
        Dict::new()
            .with(FUNCTION_TYPE, 2)
            .with(DOMAIN, vec![0.0, 1.0])
            .with(C0, c0)
            .with(C1, c1)
            .with(N, n)
    }

    #[test]
    fn exponential_function() {
        let xref = XRef::new();
        let f = Function::new(&Object::Dict(exponential(vec![0.0], vec![1.0], 2.0)), &xref)
            .unwrap();

        assert_eq!(f.eval(&[0.5]).as_slice(), &[0.25]);
        // Inputs are clamped to the domain.
        assert_eq!(f.eval(&[3.0]).as_slice(), &[1.0]);
        assert_eq!(f.output_size(), Some(1));
    }

    #[test]
    fn stitching_function() {
        let xref = XRef::new();
        let dict = Dict::new()
            .with(FUNCTION_TYPE, 3)
            .with(DOMAIN, vec![0.0, 1.0])
            .with(
                FUNCTIONS,
                vec![
                    Object::Dict(exponential(vec![0.0], vec![1.0], 1.0)),
                    Object::Dict(exponential(vec![1.0], vec![0.0], 1.0)),
                ],
            )
            .with(BOUNDS, vec![0.5])
            .with(ENCODE, vec![0.0, 1.0, 0.0, 1.0]);
        let f = Function::new(&Object::Dict(dict), &xref).unwrap();

        assert_eq!(f.eval(&[0.25]).as_slice(), &[0.5]);
        assert_eq!(f.eval(&[0.75]).as_slice(), &[0.5]);
        assert_eq!(f.eval(&[1.0]).as_slice(), &[0.0]);
    }

    #[test]
    fn sampled_function() {
        let xref = XRef::new();
        let dict = Dict::new()
            .with(FUNCTION_TYPE, 0)
            .with(DOMAIN, vec![0.0, 1.0])
            .with(RANGE, vec![0.0, 1.0, 0.0, 1.0])
            .with(SIZE, vec![2])
            .with(BITS_PER_SAMPLE, 8);
        let stream = Stream::new(dict, vec![0u8, 255, 255, 0]);
        let f = Function::new(&Object::Stream(stream), &xref).unwrap();

        assert_eq!(f.eval(&[0.0]).as_slice(), &[0.0, 1.0]);
        assert_eq!(f.eval(&[0.5]).as_slice(), &[0.5, 0.5]);
        assert_eq!(f.eval(&[1.0]).as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn unsupported_types() {
        let xref = XRef::new();
        let dict = Dict::new()
            .with(FUNCTION_TYPE, 4)
            .with(DOMAIN, vec![0.0, 1.0]);

        assert!(matches!(
            Function::new(&Object::Dict(dict), &xref),
            Err(Diagnostic::UnsupportedFunction(_))
        ));
        assert!(Function::new(&Object::from(1), &xref).is_err());
    }
}
