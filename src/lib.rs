//! A binary relation algebra library
//!
//! This crate provides data structures and algorithms for working with binary relations
//! over finite universal sets: the classical operator set (union, intersection,
//! complement, composition, converse, relative sum) and the standard relational
//! property predicates (reflexive, symmetric, transitive, antisymmetric, function,
//! one-to-one, partial order, equivalence).
//!
//! Two interchangeable representations are provided: a sparse one backed by hash sets
//! of ordered pairs ([`sparse`]) and a dense one backed by boolean adjacency matrices
//! ([`dense`]). The operator algebra itself is defined once, in [`algebra`], on top of
//! a small kernel of primitives that each representation implements.
//!
pub mod algebra;
pub mod dense;
pub mod sparse;

use std::fmt;

use thiserror::Error;

/// Error returned when a binary operation is applied to relations over different
/// universal sets.
///
/// Combining two relations is only meaningful when both are defined over the same
/// universe. Every checked binary operator verifies this up front and reports the
/// mismatch to the caller instead of producing a meaningless result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("relations are not defined over the same universal set")]
pub struct UnmatchedUniverse;

/// An ordered pair of elements.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pair<T> {
    pub first: T,
    pub second: T,
}

impl<T> Pair<T> {
    /// Create a pair from its components.
    pub fn new(first: T, second: T) -> Pair<T> {
        Pair { first, second }
    }

    /// The pair with its components exchanged.
    ///
    /// This always builds a fresh pair. Pairs may be shared between derived
    /// relations, so a converse must never reverse a pair in place.
    pub fn swapped(&self) -> Pair<T>
    where
        T: Clone,
    {
        Pair::new(self.second.clone(), self.first.clone())
    }
}

impl<T> From<(T, T)> for Pair<T> {
    fn from((first, second): (T, T)) -> Pair<T> {
        Pair::new(first, second)
    }
}

impl<T: fmt::Display> fmt::Display for Pair<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

impl<T: fmt::Debug> fmt::Debug for Pair<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.first, self.second)
    }
}
