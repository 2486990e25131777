use std::borrow::Cow;

/// A trait for vector-like containers of sample points.
///
/// Compiled equations evaluate every element of such a container and return the
/// results in a container of the same type, so callers can stay in `Vec`, ndarray or
/// nalgebra land.
///
/// # Examples
///
/// ```rust
/// use difftree::prelude::Vector;
///
/// let xs = vec![1.0, 2.0, 3.0];
/// assert_eq!(xs.values().as_ref(), &[1.0, 2.0, 3.0]);
///
/// let ys: Vec<f64> = Vector::from_values(vec![4.0, 5.0]);
/// assert_eq!(Vector::len(&ys), 2);
/// ```
pub trait Vector: Sized {
    /// Returns the elements as a contiguous slice, copying only if the storage is not contiguous.
    fn values(&self) -> Cow<'_, [f64]>;

    /// Builds a container from owned values.
    fn from_values(values: Vec<f64>) -> Self;

    /// Returns the length of the vector.
    fn len(&self) -> usize;

    /// Checks if the vector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vector for Vec<f64> {
    fn values(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }

    fn from_values(values: Vec<f64>) -> Self {
        values
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Arrays whose storage is not contiguous are copied once.
///
/// ```rust
/// use difftree::prelude::Vector;
/// use ndarray::array;
///
/// let xs = array![1.0, 2.0];
/// assert_eq!(xs.values().as_ref(), &[1.0, 2.0]);
/// ```
impl Vector for ndarray::Array1<f64> {
    fn values(&self) -> Cow<'_, [f64]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }

    fn from_values(values: Vec<f64>) -> Self {
        ndarray::Array1::from_vec(values)
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Implementation of Vector trait for nalgebra's DVector<f64>.
///
/// ```rust
/// use difftree::prelude::Vector;
/// use nalgebra::DVector;
///
/// let xs = DVector::from_vec(vec![1.0, 2.0]);
/// assert_eq!(xs.values().as_ref(), &[1.0, 2.0]);
/// ```
#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn values(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }

    fn from_values(values: Vec<f64>) -> Self {
        nalgebra::DVector::from_vec(values)
    }

    fn len(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};

    #[test]
    fn test_vec_roundtrip() {
        let xs: Vec<f64> = Vector::from_values(vec![1.0, 2.0]);
        assert_eq!(xs.values(), Cow::Borrowed(&[1.0, 2.0][..]));
        assert!(!Vector::is_empty(&xs));
        assert!(Vector::is_empty(&Vec::<f64>::new()));
    }

    #[test]
    fn test_array_values() {
        let xs = array![0.0, 1.0, 2.0, 3.0];
        let strided = xs.slice(s![..;2]).to_owned();
        assert_eq!(strided.values().as_ref(), &[0.0, 2.0]);
        assert!(matches!(xs.values(), Cow::Borrowed(_)));
    }
}
