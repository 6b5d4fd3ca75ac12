//! Arrays.

use crate::object::{FromObject, Object};
use crate::xref::XRef;
use std::fmt;
use std::sync::Arc;

/// A PDF array.
#[derive(Clone, PartialEq, Default)]
pub struct Array(Arc<[Object]>);

impl Array {
    /// Create a new array from a list of objects.
    pub fn new(items: Vec<Object>) -> Self {
        Self(Arc::from(items))
    }

    /// The number of elements in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the raw element at an index, without resolving references.
    #[inline]
    pub fn get_raw(&self, index: usize) -> Option<&Object> {
        self.0.get(index)
    }

    /// Return the element at an index as a specific type, resolving references.
    pub fn get<T: FromObject>(&self, index: usize, xref: &XRef) -> Option<T> {
        T::from_object(self.get_raw(index)?, xref)
    }

    /// Iterate over the raw elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.0.iter()
    }

    /// Iterate over all elements converted to `T`, stopping at the first element
    /// that isn't a `T`.
    pub fn iter_as<'a, T: FromObject + 'a>(
        &'a self,
        xref: &'a XRef,
    ) -> impl Iterator<Item = T> + 'a {
        self.0.iter().map_while(|o| T::from_object(o, xref))
    }

    /// Convert all elements to `T`, failing if any of them has the wrong type.
    pub fn to_vec<T: FromObject>(&self, xref: &XRef) -> Option<Vec<T>> {
        self.0.iter().map(|o| T::from_object(o, xref)).collect()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[Object] {
        &self.0
    }
}

impl FromIterator<Object> for Array {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
