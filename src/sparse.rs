//! Relations represented as hash sets of ordered pairs.
//!
//! This representation stores only the pairs a relation actually contains, so its
//! cost scales with the relation's cardinality rather than with |U|². Its complement
//! still enumerates all of U × U, which is what makes the dense representation in
//! [`crate::dense`] attractive for complement-heavy work.
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use itertools::Itertools;

use crate::algebra::RelationAlgebra;
use crate::dense::{MatrixRelation, UniverseList};
use crate::Pair;

/// A finite universal set.
///
/// A universe is the fixed domain over which relations are defined. Two relations
/// are combinable only when their universes are equal by value. Cloning a universe
/// is cheap; clones share storage.
///
/// The universe memoizes its identity pair set on first use. The memoization is
/// idempotent and race-tolerant: concurrent first uses may compute it twice, but a
/// partially constructed value is never observed.
pub struct Universe<T> {
    inner: Arc<UniverseInner<T>>,
}

struct UniverseInner<T> {
    elements: HashSet<T>,
    identity: OnceLock<HashSet<Pair<T>>>,
}

impl<T: Eq + Hash + Clone> Universe<T> {
    /// Create a universe from a collection of elements. Duplicates collapse.
    pub fn new(elements: impl IntoIterator<Item = T>) -> Universe<T> {
        Universe {
            inner: Arc::new(UniverseInner {
                elements: elements.into_iter().collect(),
                identity: OnceLock::new(),
            }),
        }
    }

    /// The elements of this universe.
    pub fn elements(&self) -> &HashSet<T> {
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

    /// self ∪ S
    pub fn union(&self, other: &Universe<T>) -> Universe<T> {
        Universe::new(self.inner.elements.union(&other.inner.elements).cloned())
    }

    /// self ∩ S
    pub fn intersection(&self, other: &Universe<T>) -> Universe<T> {
        Universe::new(
            self.inner
                .elements
                .intersection(&other.inner.elements)
                .cloned(),
        )
    }

    /// self ∖ S
    pub fn relative_complement(&self, other: &Universe<T>) -> Universe<T> {
        Universe::new(
            self.inner
                .elements
                .difference(&other.inner.elements)
                .cloned(),
        )
    }

    /// S ⊆ self
    pub fn is_superset_of(&self, other: &Universe<T>) -> bool {
        self.inner.elements.is_superset(&other.inner.elements)
    }

    fn identity_pairs(&self) -> &HashSet<Pair<T>> {
        self.inner.identity.get_or_init(|| {
            self.inner
                .elements
                .iter()
                .map(|e| Pair::new(e.clone(), e.clone()))
                .collect()
        })
    }

    /// idU = {(α, β) : α, β ∈ U and α = β}
    ///
    /// Computed once per universe and reused.
    pub fn identity_relation(&self) -> Relation<T> {
        Relation {
            universe: self.clone(),
            pairs: self.identity_pairs().clone(),
        }
    }

    /// ∅, the relation with no pairs.
    pub fn empty_relation(&self) -> Relation<T> {
        Relation {
            universe: self.clone(),
            pairs: HashSet::new(),
        }
    }

    /// U × U = {(α, β) : α, β ∈ U}
    ///
    /// Derived through the bootstrapping identity U × U = ∼idU ∪ idU rather than
    /// enumerated directly, exercising the algebra on its own seed relations.
    pub fn universal_relation(&self) -> Relation<T> {
        let identity = self.identity_relation();
        identity.complement().union_unchecked(&identity)
    }

    /// diU = {(α, β) : α, β ∈ U and α ≠ β} = ∼idU
    pub fn diversity_relation(&self) -> Relation<T> {
        self.identity_relation().complement()
    }
}

impl<T> Clone for Universe<T> {
    fn clone(&self) -> Universe<T> {
        Universe {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Eq + Hash> PartialEq for Universe<T> {
    fn eq(&self, other: &Universe<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.elements == other.inner.elements
    }
}

impl<T: Eq + Hash> Eq for Universe<T> {}

impl<T: fmt::Debug> fmt::Debug for Universe<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(&self.inner.elements).finish()
    }
}

/// A binary relation over a finite universe, stored as a set of ordered pairs.
///
/// Every pair's components must be members of the relation's universe; the
/// constructor debug-asserts this, and the algebra relies on it.
#[derive(Clone)]
pub struct Relation<T> {
    universe: Universe<T>,
    pairs: HashSet<Pair<T>>,
}

impl<T: Eq + Hash + Clone> Relation<T> {
    /// Create a relation over a universe from a collection of ordered pairs.
    pub fn new(universe: Universe<T>, pairs: impl IntoIterator<Item = (T, T)>) -> Relation<T> {
        let pairs: HashSet<Pair<T>> = pairs.into_iter().map(Pair::from).collect();
        debug_assert!(
            pairs
                .iter()
                .all(|p| universe.contains(&p.first) && universe.contains(&p.second)),
            "pair component outside the universal set"
        );
        Relation { universe, pairs }
    }

    /// The universe this relation is defined over.
    pub fn universe(&self) -> &Universe<T> {
        &self.universe
    }

    /// The pairs of this relation.
    pub fn pairs(&self) -> &HashSet<Pair<T>> {
        &self.pairs
    }

    /// The number of pairs in this relation.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when this relation has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True when (first, second) is a pair of this relation.
    pub fn contains(&self, first: &T, second: &T) -> bool {
        self.pairs
            .contains(&Pair::new(first.clone(), second.clone()))
    }

    /// The set of elements related to at least one element, i.e. all pair firsts.
    pub fn domain(&self) -> HashSet<T> {
        self.pairs.iter().map(|p| p.first.clone()).collect()
    }

    /// The set of elements at least one element relates to, i.e. all pair seconds.
    pub fn range(&self) -> HashSet<T> {
        self.pairs.iter().map(|p| p.second.clone()).collect()
    }

    /// Materialize this relation as a boolean adjacency matrix.
    ///
    /// The matrix indices follow an arbitrary but stable ordering of this
    /// relation's universe. To combine the results of several conversions, convert
    /// them over one shared [`UniverseList`] with
    /// [`MatrixRelation::from_sparse`] instead.
    pub fn to_matrix(&self) -> MatrixRelation<T> {
        let order = UniverseList::from_universe(&self.universe);
        // The list was just built from this very universe.
        MatrixRelation::from_sparse_unchecked(self, &order)
    }
}

impl<T: Eq + Hash + Clone> RelationAlgebra for Relation<T> {
    fn same_universe(&self, other: &Self) -> bool {
        self.universe == other.universe
    }

    fn union_unchecked(&self, other: &Self) -> Self {
        debug_assert!(self.same_universe(other));
        let mut pairs = self.pairs.clone();
        pairs.extend(other.pairs.iter().cloned());
        Relation {
            universe: self.universe.clone(),
            pairs,
        }
    }

    fn complement(&self) -> Self {
        let elements = self.universe.elements();
        let pairs = elements
            .iter()
            .cartesian_product(elements.iter())
            .map(|(a, b)| Pair::new(a.clone(), b.clone()))
            .filter(|pair| !self.pairs.contains(pair))
            .collect();
        Relation {
            universe: self.universe.clone(),
            pairs,
        }
    }

    fn compose_unchecked(&self, other: &Self) -> Self {
        debug_assert!(self.same_universe(other));

        // Index the right operand by first component, so the join costs
        // O(|R| + |S| + |result|) pair visits instead of O(|R| · |S|).
        let mut by_first: HashMap<&T, Vec<&T>> = HashMap::new();
        for pair in &other.pairs {
            by_first.entry(&pair.first).or_default().push(&pair.second);
        }

        let mut pairs = HashSet::new();
        for pair in &self.pairs {
            if let Some(seconds) = by_first.get(&pair.second) {
                for &second in seconds {
                    pairs.insert(Pair::new(pair.first.clone(), second.clone()));
                }
            }
        }

        Relation {
            universe: self.universe.clone(),
            pairs,
        }
    }

    fn converse(&self) -> Self {
        Relation {
            universe: self.universe.clone(),
            pairs: self.pairs.iter().map(Pair::swapped).collect(),
        }
    }

    fn subset_unchecked(&self, other: &Self) -> bool {
        debug_assert!(self.same_universe(other));
        self.pairs.is_subset(&other.pairs)
    }

    fn eq_unchecked(&self, other: &Self) -> bool {
        debug_assert!(self.same_universe(other));
        self.pairs == other.pairs
    }

    fn identity(&self) -> Self {
        self.universe.identity_relation()
    }

    fn universal(&self) -> Self {
        self.universe.universal_relation()
    }
}

impl<T: Eq + Hash> PartialEq for Relation<T> {
    fn eq(&self, other: &Relation<T>) -> bool {
        self.universe == other.universe && self.pairs == other.pairs
    }
}

impl<T: Eq + Hash> Eq for Relation<T> {}

impl<T: fmt::Debug> fmt::Debug for Relation<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(&self.pairs).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::UnmatchedUniverse;

    fn universe() -> Universe<u32> {
        Universe::new(1..=3)
    }

    fn relation(pairs: &[(u32, u32)]) -> Relation<u32> {
        Relation::new(universe(), pairs.iter().copied())
    }

    fn random_relation(n: u32) -> impl Strategy<Value = Relation<u32>> {
        proptest::collection::hash_set((0..n, 0..n), 0..=(n * n * 3 / 4) as usize)
            .prop_map(move |pairs| Relation::new(Universe::new(0..n), pairs))
    }

    #[test]
    fn universe_set_algebra() {
        let u = Universe::new([1, 2, 3]);
        let v = Universe::new([2, 3, 4]);

        assert_eq!(u.union(&v), Universe::new(1..=4));
        assert_eq!(u.intersection(&v), Universe::new([2, 3]));
        assert_eq!(u.relative_complement(&v), Universe::new([1]));
        assert!(u.union(&v).is_superset_of(&u));
        assert!(!u.is_superset_of(&v));
        assert_eq!(u, Universe::new([3, 2, 1, 1]));
    }

    #[test]
    fn canonical_relation_laws() {
        let u = universe();
        let identity = u.identity_relation();
        let universal = u.universal_relation();
        let diversity = u.diversity_relation();
        let empty = u.empty_relation();

        assert_eq!(universal, diversity.union(&identity).unwrap());
        assert_eq!(empty, universal.complement());
        assert_eq!(universal.len(), u.len() * u.len());
        assert!(identity.is_equivalence());
        assert!(identity.is_partial_order());
        assert!(diversity.is_symmetric());
        assert!(!diversity.is_reflexive());
    }

    #[test]
    fn identity_is_memoized_per_universe() {
        let u = universe();
        assert_eq!(u.identity_relation(), u.identity_relation());
        assert_eq!(u.identity_relation().len(), 3);
    }

    #[test]
    fn equivalence_relation_predicates() {
        let r = relation(&[(1, 1), (2, 2), (3, 3), (1, 2), (2, 1)]);

        assert!(r.is_reflexive());
        assert!(r.is_symmetric());
        assert!(r.is_transitive());
        assert!(r.is_equivalence());
        assert!(!r.is_antisymmetric());
        assert!(!r.is_partial_order());
        assert!(!r.is_function());
    }

    #[test]
    fn transitive_relation_predicates() {
        let r = relation(&[(1, 2), (2, 3), (1, 3)]);

        assert!(!r.is_reflexive());
        assert!(!r.is_symmetric());
        assert!(r.is_transitive());
        assert!(r.is_antisymmetric());
        // 1 relates to both 2 and 3, so this is neither a function nor one-to-one.
        assert!(!r.is_function());
        assert!(!r.is_one_to_one());
    }

    #[test]
    fn bijection_predicates() {
        let r = relation(&[(1, 2), (2, 3), (3, 1)]);

        assert!(r.is_function());
        assert!(r.is_one_to_one());
        assert!(!r.is_transitive());
        assert_eq!(r.pow(3), universe().identity_relation());
    }

    #[test]
    fn divisibility_is_a_partial_order() {
        // Divisibility on {1, 2, 3}: reflexive, antisymmetric, transitive.
        let r = relation(&[(1, 1), (2, 2), (3, 3), (1, 2), (1, 3)]);

        assert!(r.is_partial_order());
        assert!(!r.is_equivalence());
    }

    #[test]
    fn conjugated_quasi_projections_on_a_singleton() {
        // On a one-element universe the identity pairs with itself: id⁻¹ | id is
        // all of U × U and both operands are trivially functions.
        let u = Universe::new([7]);
        let identity = u.identity_relation();

        assert!(identity.conjugated_quasi_projections(&identity).unwrap());
    }

    #[test]
    fn conjugated_quasi_projections_reject_uncovered_pairs() {
        let u = universe();
        let identity = u.identity_relation();

        // id⁻¹ | id = id, which falls short of U × U on any universe with more
        // than one element.
        assert!(!identity.conjugated_quasi_projections(&identity).unwrap());
    }

    #[test]
    fn conjugated_quasi_projections_reject_non_functions() {
        // p relates 1 to both 2 and 3, so the pair is rejected before the
        // coverage check.
        let p = relation(&[(1, 2), (1, 3)]);
        let q = relation(&[(1, 1), (2, 2), (3, 3)]);

        assert!(!p.is_function());
        assert!(!p.conjugated_quasi_projections(&q).unwrap());
    }

    #[test]
    fn unmatched_universes_fail_every_binary_operator() {
        let r = Relation::new(Universe::new(["a", "b"]), [("a", "b")]);
        let s = Relation::new(Universe::new(["a", "b", "c"]), [("a", "b")]);

        assert_eq!(r.union(&s), Err(UnmatchedUniverse));
        assert_eq!(r.intersection(&s), Err(UnmatchedUniverse));
        assert_eq!(r.difference(&s), Err(UnmatchedUniverse));
        assert_eq!(r.symmetric_difference(&s), Err(UnmatchedUniverse));
        assert_eq!(r.compose(&s), Err(UnmatchedUniverse));
        assert_eq!(r.relative_sum(&s), Err(UnmatchedUniverse));
        assert_eq!(r.is_subset_of(&s), Err(UnmatchedUniverse));
        assert_eq!(r.equals(&s), Err(UnmatchedUniverse));
        assert_eq!(r.conjugated_quasi_projections(&s), Err(UnmatchedUniverse));
    }

    #[test]
    fn equal_universes_are_compared_by_value() {
        let r = Relation::new(Universe::new([1, 2]), [(1, 2)]);
        let s = Relation::new(Universe::new([2, 1]), [(2, 1)]);

        assert_eq!(r.union(&s).unwrap().len(), 2);
        assert!(r.converse().equals(&s).unwrap());
    }

    #[test]
    fn domain_and_range_boundaries() {
        let u = universe();

        assert!(u.empty_relation().domain().is_empty());
        assert!(u.empty_relation().range().is_empty());
        assert_eq!(&u.universal_relation().domain(), u.elements());
        assert_eq!(&u.universal_relation().range(), u.elements());

        let r = relation(&[(1, 2), (1, 3)]);
        assert_eq!(r.domain(), HashSet::from([1]));
        assert_eq!(r.range(), HashSet::from([2, 3]));
    }

    #[test]
    fn transitive_closure_of_a_chain() {
        let r = relation(&[(1, 2), (2, 3)]);
        let closure = r.transitive_closure();

        assert!(closure.is_transitive());
        assert_eq!(closure, relation(&[(1, 2), (2, 3), (1, 3)]));
    }

    proptest! {
        #[test]
        fn double_complement(r in random_relation(4)) {
            prop_assert_eq!(r.complement().complement(), r);
        }

        #[test]
        fn union_and_intersection_are_idempotent(r in random_relation(4)) {
            prop_assert_eq!(r.union(&r).unwrap(), r.clone());
            prop_assert_eq!(r.intersection(&r).unwrap(), r);
        }

        #[test]
        fn converse_is_an_involution(r in random_relation(4)) {
            prop_assert_eq!(r.converse().converse(), r);
        }

        #[test]
        fn de_morgan(r in random_relation(4), s in random_relation(4)) {
            let derived = r.complement().union(&s.complement()).unwrap().complement();
            prop_assert_eq!(r.intersection(&s).unwrap(), derived);
        }

        #[test]
        fn union_matches_pair_set_union(r in random_relation(4), s in random_relation(4)) {
            let expected: HashSet<Pair<u32>> = r.pairs().union(s.pairs()).cloned().collect();
            let union = r.union(&s).unwrap();
            prop_assert_eq!(union.pairs(), &expected);
        }

        #[test]
        fn difference_matches_pair_set_difference(r in random_relation(4), s in random_relation(4)) {
            let expected: HashSet<Pair<u32>> = r.pairs().difference(s.pairs()).cloned().collect();
            let difference = r.difference(&s).unwrap();
            prop_assert_eq!(difference.pairs(), &expected);
        }

        #[test]
        fn symmetric_difference_matches_pair_sets(r in random_relation(4), s in random_relation(4)) {
            let expected: HashSet<Pair<u32>> =
                r.pairs().symmetric_difference(s.pairs()).cloned().collect();
            let symmetric_difference = r.symmetric_difference(&s).unwrap();
            prop_assert_eq!(symmetric_difference.pairs(), &expected);
        }

        #[test]
        fn composition_matches_naive_join(r in random_relation(4), s in random_relation(4)) {
            let mut expected = HashSet::new();
            for a in r.pairs() {
                for b in s.pairs() {
                    if a.second == b.first {
                        expected.insert(Pair::new(a.first, b.second));
                    }
                }
            }
            let composition = r.compose(&s).unwrap();
            prop_assert_eq!(composition.pairs(), &expected);
        }

        #[test]
        fn composition_is_associative(
            r in random_relation(4),
            s in random_relation(4),
            t in random_relation(4),
        ) {
            let left = r.compose(&s).unwrap().compose(&t).unwrap();
            let right = r.compose(&s.compose(&t).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn relative_sum_matches_direct_semantics(r in random_relation(3), s in random_relation(3)) {
            // (α, β) ∈ R † S iff for every γ, (α, γ) ∈ R or (γ, β) ∈ S.
            let sum = r.relative_sum(&s).unwrap();
            let elements = r.universe().elements().clone();
            for &a in &elements {
                for &b in &elements {
                    let expected = elements
                        .iter()
                        .all(|&c| r.contains(&a, &c) || s.contains(&c, &b));
                    prop_assert_eq!(sum.contains(&a, &b), expected);
                }
            }
        }

        #[test]
        fn function_predicate_matches_counting(r in random_relation(4)) {
            let expected = r
                .domain()
                .iter()
                .all(|a| r.pairs().iter().filter(|p| p.first == *a).count() <= 1);
            prop_assert_eq!(r.is_function(), expected);
        }

        #[test]
        fn one_to_one_is_function_of_converse(r in random_relation(4)) {
            prop_assert_eq!(r.is_one_to_one(), r.converse().is_function());
        }

        #[test]
        fn powers_add(r in random_relation(3), a in 0..5u32, b in 0..5u32) {
            let combined = r.pow(a).compose(&r.pow(b)).unwrap();
            prop_assert_eq!(combined, r.pow(a + b));
        }

        #[test]
        fn negative_power_is_converse_power(r in random_relation(3), a in 0..5i32) {
            prop_assert_eq!(r.pow(-a), r.converse().pow(a));
        }

        #[test]
        fn transitive_closure_is_transitive_and_contains(r in random_relation(4)) {
            let closure = r.transitive_closure();
            prop_assert!(closure.is_transitive());
            prop_assert!(r.is_subset_of(&closure).unwrap());
            // The closure of something already transitive is itself.
            prop_assert_eq!(closure.transitive_closure(), closure);
        }
    }
}
