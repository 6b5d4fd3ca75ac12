//! PDF objects.

pub mod array;
pub mod dict;
pub mod keys;
pub mod name;
pub mod number;
pub mod stream;
pub mod string;

pub use array::Array;
pub use dict::Dict;
pub use name::Name;
pub use number::Number;
pub use stream::{DecodedImage, Stream};
pub use string::PdfString;

use crate::xref::XRef;
use kurbo::{Affine, Rect};
use std::fmt;

/// The identifier of an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef {
    /// The object number.
    pub num: u32,
    /// The generation number.
    pub gen_num: u16,
}

impl ObjRef {
    /// Create a new object reference.
    pub fn new(num: u32, gen_num: u16) -> Self {
        Self { num, gen_num }
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.num, self.gen_num)
    }
}

/// A PDF object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Object {
    /// The null object.
    #[default]
    Null,
    /// A boolean.
    Boolean(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(PdfString),
    /// A name.
    Name(Name),
    /// An array.
    Array(Array),
    /// A dictionary.
    Dict(Dict),
    /// A stream.
    Stream(Stream),
    /// A reference to an indirect object.
    Ref(ObjRef),
}

impl Object {
    /// A short, human-readable name of the object type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(n) if n.is_integer() => "integer",
            Self::Number(_) => "real",
            Self::String(_) => "string",
            Self::Name(_) => "name",
            Self::Array(_) => "array",
            Self::Dict(_) => "dictionary",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "reference",
        }
    }

    /// Whether the object is the null object.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Return the object as a number.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the object as a name.
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Return the object as a string.
    pub fn as_string(&self) -> Option<&PdfString> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the object as an array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Return the object as a dictionary. Streams are not included.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Return the object as a stream.
    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Self::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Return the dictionary of a dictionary or stream object.
    pub fn dict_like(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            Self::Stream(s) => Some(s.dict()),
            _ => None,
        }
    }
}

macro_rules! from_impl {
    ($t:ty, $v:ident) => {
        impl From<$t> for Object {
            fn from(value: $t) -> Self {
                Self::$v(value)
            }
        }
    };
}

from_impl!(bool, Boolean);
from_impl!(Number, Number);
from_impl!(PdfString, String);
from_impl!(Name, Name);
from_impl!(Array, Array);
from_impl!(Dict, Dict);
from_impl!(Stream, Stream);
from_impl!(ObjRef, Ref);

impl From<i32> for Object {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&[u8]> for Object {
    fn from(value: &[u8]) -> Self {
        Self::Name(Name::new(value))
    }
}

impl<T: Into<Self>> From<Vec<T>> for Object {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

/// Conversion of objects into typed values.
///
/// Indirect references are resolved through the object store before converting.
pub trait FromObject: Sized {
    /// Convert an object that is known not to be a reference.
    fn from_direct(obj: &Object, xref: &XRef) -> Option<Self>;

    /// Convert an object, resolving it first if it is a reference.
    fn from_object(obj: &Object, xref: &XRef) -> Option<Self> {
        match obj {
            Object::Ref(_) => Self::from_direct(&xref.resolve(obj), xref),
            _ => Self::from_direct(obj, xref),
        }
    }
}

impl FromObject for Object {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        Some(obj.clone())
    }
}

impl FromObject for bool {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        match obj {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromObject for Number {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_number()
    }
}

impl FromObject for f64 {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_number().map(|n| n.as_f64())
    }
}

impl FromObject for f32 {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_number().map(|n| n.as_f32())
    }
}

macro_rules! int_impl {
    ($t:ty) => {
        impl FromObject for $t {
            fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
                <$t>::try_from(obj.as_number()?.as_i64()).ok()
            }
        }
    };
}

int_impl!(i32);
int_impl!(i64);
int_impl!(u8);
int_impl!(u16);
int_impl!(u32);
int_impl!(usize);

impl FromObject for Name {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_name().cloned()
    }
}

impl FromObject for PdfString {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_string().cloned()
    }
}

impl FromObject for Array {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_array().cloned()
    }
}

impl FromObject for Dict {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_dict().cloned()
    }
}

impl FromObject for Stream {
    fn from_direct(obj: &Object, _: &XRef) -> Option<Self> {
        obj.as_stream().cloned()
    }
}

impl FromObject for Rect {
    fn from_direct(obj: &Object, xref: &XRef) -> Option<Self> {
        let a = obj.as_array()?;

        if a.len() != 4 {
            return None;
        }

        let c = a.to_vec::<f64>(xref)?;

        // Normalize, since the corners can be given in any order.
        Some(Self::new(c[0], c[1], c[2], c[3]).abs())
    }
}

impl FromObject for Affine {
    fn from_direct(obj: &Object, xref: &XRef) -> Option<Self> {
        let a = obj.as_array()?;

        if a.len() != 6 {
            return None;
        }

        let c = a.to_vec::<f64>(xref)?;

        Some(Self::new([c[0], c[1], c[2], c[3], c[4], c[5]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_normalized() {
        let obj = Object::from(vec![10, 20, 0, 5]);
        let rect = Rect::from_object(&obj, &XRef::new()).unwrap();

        assert_eq!(rect, Rect::new(0.0, 5.0, 10.0, 20.0));
    }

    #[test]
    fn affine_needs_six_numbers() {
        let xref = XRef::new();

        let obj = Object::from(vec![1.0, 0.0, 0.0, 1.0, 5.0, 6.0]);
        assert_eq!(
            Affine::from_object(&obj, &xref),
            Some(Affine::translate((5.0, 6.0)))
        );

        let obj = Object::from(vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(Affine::from_object(&obj, &xref), None);
    }

    #[test]
    fn integer_conversions_check_range() {
        let xref = XRef::new();

        assert_eq!(u8::from_object(&Object::from(300), &xref), None);
        assert_eq!(usize::from_object(&Object::from(-1), &xref), None);
        assert_eq!(i32::from_object(&Object::from(3.7), &xref), Some(3));
    }

    #[test]
    fn type_names() {
        assert_eq!(Object::from(1).type_name(), "integer");
        assert_eq!(Object::from(1.5).type_name(), "real");
        assert_eq!(Object::Null.type_name(), "null");
    }
}
