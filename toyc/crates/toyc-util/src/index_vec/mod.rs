//! IndexVec - A vector indexed by a specific type.
//!
//! Dense numbering schemes (string-literal ids, for instance) are stored in an
//! [`IndexVec`] so an id from one namespace cannot be used to index another.
//!
//! # Example
//!
//! ```
//! use toyc_util::define_idx;
//! use toyc_util::index_vec::IndexVec;
//!
//! define_idx!(ExprId);
//!
//! let mut exprs: IndexVec<ExprId, i32> = IndexVec::new();
//! let id = exprs.push(42);
//! assert_eq!(id, ExprId(0));
//! assert_eq!(exprs[id], 42);
//! ```

use std::marker::PhantomData;
use std::ops::Index;

/// Trait for types that can be used as indices
pub trait Idx: Copy + Eq + PartialEq {
    /// Convert from usize to index type
    ///
    /// # Panics
    ///
    /// Implementations may panic if the usize value is too large to fit
    /// in the index type.
    fn from_usize(idx: usize) -> Self;

    /// Convert index to usize for array indexing
    fn index(self) -> usize;
}

impl Idx for usize {
    #[inline]
    fn from_usize(idx: usize) -> Self {
        idx
    }

    #[inline]
    fn index(self) -> usize {
        self
    }
}

/// A vector indexed by a specific type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexVec<I, T> {
    raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I, T> IndexVec<I, T> {
    /// Create an empty IndexVec
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the vector is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Remove every element; the next push is index 0 again
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear()
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    /// Push an element and return its typed index
    #[inline]
    pub fn push(&mut self, value: T) -> I {
        let index = self.raw.len();
        self.raw.push(value);
        I::from_usize(index)
    }

    /// Get an element by index
    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.raw.get(index.index())
    }

    /// Iterate over `(index, element)` pairs in insertion order
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> {
        self.raw
            .iter()
            .enumerate()
            .map(|(i, v)| (I::from_usize(i), v))
    }

    /// Iterate over every valid index
    pub fn indices(&self) -> impl Iterator<Item = I> {
        (0..self.raw.len()).map(I::from_usize)
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.raw[index.index()]
    }
}

impl<I, T> Default for IndexVec<I, T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to define index types easily
///
/// Generates a newtype wrapper around `u32` that implements [`Idx`].
#[macro_export]
macro_rules! define_idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::index_vec::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize, "Index {} exceeds u32::MAX", idx);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
