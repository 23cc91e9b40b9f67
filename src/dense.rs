//! Relations represented as boolean adjacency matrices.
//!
//! This representation fixes an ordering of the universe and stores a relation as an
//! n×n bit grid, so every operator is a pass over at most n² cells (n³ for
//! composition, the usual boolean matrix product). Complement and the derived
//! operators that lean on it are as cheap as union here, which is the main trade
//! against the sparse representation in [`crate::sparse`].
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use crate::algebra::RelationAlgebra;
use crate::sparse::{Relation, Universe};
use crate::UnmatchedUniverse;

/// An ordered finite universal set.
///
/// The position of each element defines the row and column it occupies in every
/// matrix relation over this universe, so two matrix relations are combinable only
/// when their universes hold the same elements in the same order. Cloning is cheap;
/// clones share storage.
///
/// Like [`Universe`], the list memoizes its identity matrix on first use behind a
/// race-tolerant, idempotent cell.
pub struct UniverseList<T> {
    inner: Arc<ListInner<T>>,
}

struct ListInner<T> {
    elements: Vec<T>,
    identity: OnceLock<Box<[bool]>>,
}

impl<T: Eq + Clone> UniverseList<T> {
    /// Create an ordered universe from a sequence of elements.
    ///
    /// Duplicates collapse onto their first occurrence, preserving order.
    pub fn new(elements: impl IntoIterator<Item = T>) -> UniverseList<T> {
        let mut deduplicated = Vec::new();
        for element in elements {
            if !deduplicated.contains(&element) {
                deduplicated.push(element);
            }
        }
        UniverseList {
            inner: Arc::new(ListInner {
                elements: deduplicated,
                identity: OnceLock::new(),
            }),
        }
    }

    /// Create an ordered universe from an unordered one.
    ///
    /// The resulting order is arbitrary but stable: repeated calls on the same
    /// universe instance produce the same ordering. Two universes that are
    /// equal by value may still iterate in different orders, so lists derived
    /// from them can disagree; such a mismatch is reported, never silent.
    pub fn from_universe(universe: &Universe<T>) -> UniverseList<T>
    where
        T: Hash,
    {
        UniverseList::new(universe.elements().iter().cloned())
    }

    /// The elements of this universe, in index order.
    pub fn elements(&self) -> &[T] {
        &self.inner.elements
    }

    /// The number of elements in this universe.
    pub fn len(&self) -> usize {
        self.inner.elements.len()
    }

    /// True when this universe has no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.elements.is_empty()
    }

    /// True when the given element is a member of this universe.
    pub fn contains(&self, element: &T) -> bool {
        self.inner.elements.contains(element)
    }

    /// The matrix index of an element, if it is a member.
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.inner.elements.iter().position(|e| e == element)
    }

    /// self ∪ S, keeping this universe's order and appending S's new elements.
    pub fn union(&self, other: &UniverseList<T>) -> UniverseList<T> {
        UniverseList::new(self.elements().iter().chain(other.elements()).cloned())
    }

    /// self ∩ S, in this universe's order.
    pub fn intersection(&self, other: &UniverseList<T>) -> UniverseList<T> {
        UniverseList::new(
            self.elements()
                .iter()
                .filter(|e| other.contains(e))
                .cloned(),
        )
    }

    /// self ∖ S, in this universe's order.
    pub fn relative_complement(&self, other: &UniverseList<T>) -> UniverseList<T> {
        UniverseList::new(
            self.elements()
                .iter()
                .filter(|e| !other.contains(e))
                .cloned(),
        )
    }

    /// S ⊆ self, ignoring order.
    pub fn is_superset_of(&self, other: &UniverseList<T>) -> bool {
        other.elements().iter().all(|e| self.contains(e))
    }

    /// idU = {(α, β) : α, β ∈ U and α = β}
    ///
    /// Computed once per universe and reused.
    pub fn identity_relation(&self) -> MatrixRelation<T> {
        let n = self.len();
        let bits = self.inner.identity.get_or_init(|| {
            let mut bits = vec![false; n * n].into_boxed_slice();
            for i in 0..n {
                bits[i * n + i] = true;
            }
            bits
        });
        MatrixRelation {
            universe: self.clone(),
            bits: bits.clone(),
        }
    }

    /// ∅, the relation with no pairs.
    pub fn empty_relation(&self) -> MatrixRelation<T> {
        let n = self.len();
        MatrixRelation {
            universe: self.clone(),
            bits: vec![false; n * n].into_boxed_slice(),
        }
    }

    /// U × U = {(α, β) : α, β ∈ U}
    ///
    /// Constructed directly by filling the matrix; on this representation that is
    /// no more expensive than deriving it from the identity relation.
    pub fn universal_relation(&self) -> MatrixRelation<T> {
        let n = self.len();
        MatrixRelation {
            universe: self.clone(),
            bits: vec![true; n * n].into_boxed_slice(),
        }
    }

    /// diU = {(α, β) : α, β ∈ U and α ≠ β} = ∼idU
    pub fn diversity_relation(&self) -> MatrixRelation<T> {
        let n = self.len();
        let mut bits = vec![true; n * n].into_boxed_slice();
        for i in 0..n {
            bits[i * n + i] = false;
        }
        MatrixRelation {
            universe: self.clone(),
            bits,
        }
    }
}

impl<T> Clone for UniverseList<T> {
    fn clone(&self) -> UniverseList<T> {
        UniverseList {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Eq> PartialEq for UniverseList<T> {
    fn eq(&self, other: &UniverseList<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.elements == other.inner.elements
    }
}

impl<T: Eq> Eq for UniverseList<T> {}

impl<T: fmt::Debug> fmt::Debug for UniverseList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(&self.inner.elements).finish()
    }
}

/// A binary relation over an ordered finite universe, stored as a boolean matrix.
///
/// Cell (i, j) is true exactly when the i-th element of the universe relates to
/// the j-th. The matrix is stored row-major.
#[derive(Clone)]
pub struct MatrixRelation<T> {
    universe: UniverseList<T>,
    bits: Box<[bool]>,
}

impl<T: Eq + Clone> MatrixRelation<T> {
    /// Create a matrix relation over an ordered universe from a collection of
    /// ordered pairs. Pair components must be members of the universe.
    pub fn from_pairs(
        universe: UniverseList<T>,
        pairs: impl IntoIterator<Item = (T, T)>,
    ) -> MatrixRelation<T> {
        let n = universe.len();
        let mut bits = vec![false; n * n].into_boxed_slice();
        for (first, second) in pairs {
            match (universe.index_of(&first), universe.index_of(&second)) {
                (Some(i), Some(j)) => bits[i * n + j] = true,
                _ => debug_assert!(false, "pair component outside the universal list"),
            }
        }
        MatrixRelation { universe, bits }
    }

    /// Materialize a sparse relation as a matrix over an explicit ordering.
    ///
    /// Fails with [`UnmatchedUniverse`] unless the ordering holds exactly the
    /// elements of the relation's universe.
    pub fn from_sparse(
        relation: &Relation<T>,
        universe: &UniverseList<T>,
    ) -> Result<MatrixRelation<T>, UnmatchedUniverse>
    where
        T: Hash,
    {
        let matched = universe.len() == relation.universe().len()
            && universe
                .elements()
                .iter()
                .all(|e| relation.universe().contains(e));
        if !matched {
            return Err(UnmatchedUniverse);
        }
        Ok(Self::from_sparse_unchecked(relation, universe))
    }

    pub(crate) fn from_sparse_unchecked(
        relation: &Relation<T>,
        universe: &UniverseList<T>,
    ) -> MatrixRelation<T>
    where
        T: Hash,
    {
        debug_assert!(universe.len() == relation.universe().len());
        let n = universe.len();
        let mut bits = vec![false; n * n].into_boxed_slice();
        for pair in relation.pairs() {
            if let (Some(i), Some(j)) = (
                universe.index_of(&pair.first),
                universe.index_of(&pair.second),
            ) {
                bits[i * n + j] = true;
            }
        }
        MatrixRelation {
            universe: universe.clone(),
            bits,
        }
    }

    /// The universe this relation is defined over.
    pub fn universe(&self) -> &UniverseList<T> {
        &self.universe
    }

    /// The matrix cell for a pair of elements, false for non-members.
    pub fn contains(&self, first: &T, second: &T) -> bool {
        match (self.universe.index_of(first), self.universe.index_of(second)) {
            (Some(i), Some(j)) => self.bits[i * self.universe.len() + j],
            _ => false,
        }
    }

    /// The number of pairs in this relation.
    pub fn len(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when this relation has no pairs.
    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Iterate over the pairs of this relation in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        let n = self.universe.len();
        self.bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(cell, _)| {
                (
                    &self.universe.elements()[cell / n],
                    &self.universe.elements()[cell % n],
                )
            })
    }

    /// The elements related to at least one element, i.e. rows with a true cell.
    ///
    /// Duplicate-free: each element appears at most once, in universe order.
    pub fn domain(&self) -> Vec<T> {
        let n = self.universe.len();
        (0..n)
            .filter(|&i| self.bits[i * n..(i + 1) * n].iter().any(|&b| b))
            .map(|i| self.universe.elements()[i].clone())
            .collect()
    }

    /// The elements at least one element relates to, i.e. columns with a true cell.
    ///
    /// Duplicate-free: each element appears at most once, in universe order.
    pub fn range(&self) -> Vec<T> {
        let n = self.universe.len();
        (0..n)
            .filter(|&j| (0..n).any(|i| self.bits[i * n + j]))
            .map(|j| self.universe.elements()[j].clone())
            .collect()
    }
}

impl<T: Eq + Clone> RelationAlgebra for MatrixRelation<T> {
    fn same_universe(&self, other: &Self) -> bool {
        self.universe == other.universe
    }

    fn union_unchecked(&self, other: &Self) -> Self {
        debug_assert!(self.same_universe(other));
        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(&a, &b)| a || b)
            .collect();
        MatrixRelation {
            universe: self.universe.clone(),
            bits,
        }
    }

    fn complement(&self) -> Self {
        MatrixRelation {
            universe: self.universe.clone(),
            bits: self.bits.iter().map(|&b| !b).collect(),
        }
    }

    fn compose_unchecked(&self, other: &Self) -> Self {
        debug_assert!(self.same_universe(other));
        let n = self.universe.len();
        let mut bits = vec![false; n * n].into_boxed_slice();
        // Boolean semiring product: C[i][j] = OR over k of A[i][k] AND B[k][j].
        for i in 0..n {
            for k in 0..n {
                if self.bits[i * n + k] {
                    let row = &other.bits[k * n..(k + 1) * n];
                    for (j, &b) in row.iter().enumerate() {
                        if b {
                            bits[i * n + j] = true;
                        }
                    }
                }
            }
        }
        MatrixRelation {
            universe: self.universe.clone(),
            bits,
        }
    }

    fn converse(&self) -> Self {
        let n = self.universe.len();
        let mut bits = vec![false; n * n].into_boxed_slice();
        for i in 0..n {
            for j in 0..n {
                bits[j * n + i] = self.bits[i * n + j];
            }
        }
        MatrixRelation {
            universe: self.universe.clone(),
            bits,
        }
    }

    fn subset_unchecked(&self, other: &Self) -> bool {
        debug_assert!(self.same_universe(other));
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(&a, &b)| !a || b)
    }

    fn eq_unchecked(&self, other: &Self) -> bool {
        debug_assert!(self.same_universe(other));
        self.bits == other.bits
    }

    fn identity(&self) -> Self {
        self.universe.identity_relation()
    }

    fn universal(&self) -> Self {
        self.universe.universal_relation()
    }

    fn intersection_unchecked(&self, other: &Self) -> Self {
        debug_assert!(self.same_universe(other));
        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(&a, &b)| a && b)
            .collect();
        MatrixRelation {
            universe: self.universe.clone(),
            bits,
        }
    }

    fn is_reflexive(&self) -> bool {
        let n = self.universe.len();
        (0..n).all(|i| self.bits[i * n + i])
    }

    fn is_function(&self) -> bool {
        let n = self.universe.len();
        (0..n).all(|i| self.bits[i * n..(i + 1) * n].iter().filter(|&&b| b).count() <= 1)
    }

    fn is_one_to_one(&self) -> bool {
        let n = self.universe.len();
        (0..n).all(|j| (0..n).filter(|&i| self.bits[i * n + j]).count() <= 1)
    }
}

impl<T: Eq> PartialEq for MatrixRelation<T> {
    fn eq(&self, other: &MatrixRelation<T>) -> bool {
        self.universe == other.universe && self.bits == other.bits
    }
}

impl<T: Eq> Eq for MatrixRelation<T> {}

impl<T: Eq + Clone> fmt::Display for MatrixRelation<T> {
    /// Formats the matrix as rows of `0` and `1` cells.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.universe.len();
        for i in 0..n {
            if i > 0 {
                f.write_str("\n")?;
            }
            for j in 0..n {
                f.write_str(if self.bits[i * n + j] { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

impl<T: Eq + Clone> fmt::Debug for MatrixRelation<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
