//! The relation-algebra operator set, defined once over an abstract representation.
//!
//! Both the sparse pair-set representation and the dense boolean-matrix representation
//! implement the small kernel of primitive operations at the top of
//! [`RelationAlgebra`]. Every derived operator and every property predicate is defined
//! here in terms of that kernel, so the two representations cannot drift apart. A
//! representation may still override a derived method when it has a cheaper direct
//! construction, as long as the result agrees with the algebraic definition.
use num_integer::Integer;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::UnmatchedUniverse;

/// Operations of a binary relation algebra over a fixed finite universe.
///
/// The `*_unchecked` kernel methods assume that both operands are defined over the
/// same universe; implementations debug-assert this. They exist because the derived
/// operators and predicates below combine a relation with values derived from itself
/// (its converse, complement, identity), which share its universe by construction —
/// such internal calls must not surface a spurious [`UnmatchedUniverse`].
///
/// The checked methods are the public face of the algebra: every binary operation on
/// caller-supplied operands verifies universe equality first and reports a mismatch
/// as an explicit error.
pub trait RelationAlgebra: Sized + Clone {
    /// True when both relations are defined over the same universal set.
    ///
    /// Universes are compared by value, not identity.
    fn same_universe(&self, other: &Self) -> bool;

    /// R ∪ S = {(α, β) : (α, β) ∈ R or (α, β) ∈ S}, universe check skipped.
    fn union_unchecked(&self, other: &Self) -> Self;

    /// ∼R = {(α, β) : (α, β) ∈ U × U and (α, β) ∉ R}
    fn complement(&self) -> Self;

    /// R | S = {(α, β) : (α, γ) ∈ R and (γ, β) ∈ S for some γ ∈ U}, universe check
    /// skipped.
    fn compose_unchecked(&self, other: &Self) -> Self;

    /// R⁻¹ = {(α, β) : (β, α) ∈ R}
    ///
    /// The result owns fresh storage; it never aliases the operand's pairs.
    fn converse(&self) -> Self;

    /// R ⊆ S, universe check skipped.
    fn subset_unchecked(&self, other: &Self) -> bool;

    /// R = S, universe check skipped.
    fn eq_unchecked(&self, other: &Self) -> bool;

    /// idU = {(α, α) : α ∈ U} over this relation's universe.
    fn identity(&self) -> Self;

    /// U × U = {(α, β) : α, β ∈ U} over this relation's universe.
    fn universal(&self) -> Self;

    /// R ∩ S = ∼(∼R ∪ ∼S), universe check skipped.
    ///
    /// The default derives the intersection from union and complement through
    /// De Morgan's law. Representations with a cheaper direct construction
    /// (entrywise AND on matrices) override this.
    fn intersection_unchecked(&self, other: &Self) -> Self {
        self.complement()
            .union_unchecked(&other.complement())
            .complement()
    }

    /// Fail with [`UnmatchedUniverse`] unless both relations share a universe.
    fn check_universe(&self, other: &Self) -> Result<(), UnmatchedUniverse> {
        if self.same_universe(other) {
            Ok(())
        } else {
            Err(UnmatchedUniverse)
        }
    }

    /// R ∪ S = {(α, β) : (α, β) ∈ R or (α, β) ∈ S}
    fn union(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.union_unchecked(other))
    }

    /// R ∩ S = {(α, β) : (α, β) ∈ R and (α, β) ∈ S}
    fn intersection(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.intersection_unchecked(other))
    }

    /// R ∖ S = {(α, β) : (α, β) ∈ R and (α, β) ∉ S} = ∼(∼R ∪ S)
    fn difference(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.complement().union_unchecked(other).complement())
    }

    /// R Δ S = (R ∖ S) ∪ (S ∖ R)
    fn symmetric_difference(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        let r_minus_s = self.complement().union_unchecked(other).complement();
        let s_minus_r = other.complement().union_unchecked(self).complement();
        Ok(r_minus_s.union_unchecked(&s_minus_r))
    }

    /// R | S = {(α, β) : (α, γ) ∈ R and (γ, β) ∈ S for some γ ∈ U}
    fn compose(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.compose_unchecked(other))
    }

    /// R † S = {(α, β) : (α, γ) ∈ R or (γ, β) ∈ S for all γ ∈ U} = ∼(∼R | ∼S)
    fn relative_sum(&self, other: &Self) -> Result<Self, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self
            .complement()
            .compose_unchecked(&other.complement())
            .complement())
    }

    /// R ⊆ S
    fn is_subset_of(&self, other: &Self) -> Result<bool, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.subset_unchecked(other))
    }

    /// R = S
    ///
    /// Unlike `PartialEq`, this fails on relations over different universes
    /// instead of answering `false`.
    fn equals(&self, other: &Self) -> Result<bool, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.eq_unchecked(other))
    }

    /// The pair (α, α) is in R for every α in U, i.e. idU ⊆ R.
    fn is_reflexive(&self) -> bool {
        self.identity().subset_unchecked(self)
    }

    /// (α, β) ∈ R implies (β, α) ∈ R, i.e. R⁻¹ ⊆ R.
    fn is_symmetric(&self) -> bool {
        self.converse().subset_unchecked(self)
    }

    /// (α, γ) ∈ R and (γ, β) ∈ R implies (α, β) ∈ R, i.e. R | R ⊆ R.
    fn is_transitive(&self) -> bool {
        self.compose_unchecked(self).subset_unchecked(self)
    }

    /// (α, β) ∈ R and (β, α) ∈ R implies α = β, i.e. R ∩ R⁻¹ ⊆ idU.
    fn is_antisymmetric(&self) -> bool {
        self.intersection_unchecked(&self.converse())
            .subset_unchecked(&self.identity())
    }

    /// Reflexive, symmetric and transitive.
    fn is_equivalence(&self) -> bool {
        self.is_reflexive() && self.is_symmetric() && self.is_transitive()
    }

    /// Reflexive, antisymmetric and transitive.
    fn is_partial_order(&self) -> bool {
        self.is_reflexive() && self.is_antisymmetric() && self.is_transitive()
    }

    /// (α, β) ∈ R and (α, γ) ∈ R implies β = γ, i.e. R⁻¹ | R ⊆ idU.
    ///
    /// Every domain element relates to at most one range element.
    fn is_function(&self) -> bool {
        self.converse()
            .compose_unchecked(self)
            .subset_unchecked(&self.identity())
    }

    /// (α, γ) ∈ R and (β, γ) ∈ R implies α = β, i.e. R | R⁻¹ ⊆ idU.
    ///
    /// Every range element is related to by at most one domain element.
    fn is_one_to_one(&self) -> bool {
        self.compose_unchecked(&self.converse())
            .subset_unchecked(&self.identity())
    }

    /// Whether R and S are conjugated quasi-projections on their universe.
    ///
    /// Both must be functions, and for any two elements α and β of U there must be
    /// a common preimage γ with (γ, α) ∈ R and (γ, β) ∈ S, i.e. R⁻¹ | S = U × U.
    fn conjugated_quasi_projections(&self, other: &Self) -> Result<bool, UnmatchedUniverse> {
        self.check_universe(other)?;
        Ok(self.is_function()
            && other.is_function()
            && self
                .converse()
                .compose_unchecked(other)
                .eq_unchecked(&self.universal()))
    }

    /// The k-fold composition power of this relation.
    ///
    /// This implementation performs efficient exponentiation by squaring. R⁰ is the
    /// identity relation and R¹ is R itself. A negative exponent is the power of the
    /// converse, consistent with (Rᵏ)⁻¹ = (R⁻¹)ᵏ.
    fn pow<E>(&self, exponent: E) -> Self
    where
        E: Integer + FromPrimitive + ToPrimitive,
    {
        if exponent < E::zero() {
            return self.converse().pow(E::zero() - exponent);
        }

        match exponent.to_usize() {
            Some(0) => self.identity(),
            Some(1) => self.clone(),
            _ => {
                let odd = exponent.is_odd();
                let half = exponent / E::from_usize(2).unwrap();
                let root = self.pow(half);
                let squared = root.compose_unchecked(&root);

                if odd {
                    squared.compose_unchecked(self)
                } else {
                    squared
                }
            }
        }
    }

    /// The least transitive relation containing this one.
    ///
    /// Computed by repeated squaring to a fixpoint, so the number of composition
    /// rounds is logarithmic in the length of the longest path.
    fn transitive_closure(&self) -> Self {
        let mut closure = self.clone();
        loop {
            let next = closure.union_unchecked(&closure.compose_unchecked(&closure));
            if next.eq_unchecked(&closure) {
                return closure;
            }
            closure = next;
        }
    }
}
