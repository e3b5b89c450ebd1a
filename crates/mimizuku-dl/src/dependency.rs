//! 依存集合
//!
//! Every fact in the completion graph carries the set of choice points it
//! depends on. Facts whose set holds nothing above the root branch are
//! independent: no backjump can ever retract them.

use lazy_static::lazy_static;
use mimizuku_core::Axiom;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Creation branch of facts made outside any choice point
pub const NO_BRANCH: i32 = -1;

lazy_static! {
    /// Canonical independent dependency set
    pub static ref INDEPENDENT: DependencySet = DependencySet::independent();

    /// Canonical stand-in for "depends on some choice point"
    pub static ref DUMMY: DependencySet = DependencySet::from_branch(1);
}

/// Sorted, duplicate-free set of branch indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BranchSet(SmallVec<[u32; 4]>);

impl BranchSet {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn contains(&self, branch: u32) -> bool {
        self.0.binary_search(&branch).is_ok()
    }

    pub fn insert(&mut self, branch: u32) -> bool {
        match self.0.binary_search(&branch) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, branch);
                true
            }
        }
    }

    pub fn remove(&mut self, branch: u32) -> bool {
        match self.0.binary_search(&branch) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn union(&self, other: &BranchSet) -> BranchSet {
        let (a, b) = (&self.0, &other.0);
        let mut merged = SmallVec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] < b[j] {
                merged.push(a[i]);
                i += 1;
            } else if b[j] < a[i] {
                merged.push(b[j]);
                j += 1;
            } else {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        BranchSet(merged)
    }

    pub fn max(&self) -> Option<u32> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for BranchSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = BranchSet::new();
        for branch in iter {
            set.insert(branch);
        }
        set
    }
}

/// Branch dependencies of a fact, plus the axioms that justify it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    depends: BranchSet,
    explain: BTreeSet<Arc<Axiom>>,
    branch: i32,
}

impl Default for DependencySet {
    fn default() -> Self {
        Self::independent()
    }
}

impl DependencySet {
    pub fn independent() -> Self {
        Self {
            depends: BranchSet::new(),
            explain: BTreeSet::new(),
            branch: NO_BRANCH,
        }
    }

    pub fn from_branch(branch: u32) -> Self {
        let mut ds = Self::independent();
        ds.depends.insert(branch);
        ds
    }

    pub fn from_axiom(axiom: Arc<Axiom>) -> Self {
        let mut ds = Self::independent();
        ds.explain.insert(axiom);
        ds
    }

    /// Set the branch this fact was created on
    pub fn stamped(mut self, branch: i32) -> Self {
        self.branch = branch;
        self
    }

    pub fn branch(&self) -> i32 {
        self.branch
    }

    pub fn branches(&self) -> &BranchSet {
        &self.depends
    }

    pub fn explain(&self) -> &BTreeSet<Arc<Axiom>> {
        &self.explain
    }

    pub fn contains(&self, branch: u32) -> bool {
        self.depends.contains(branch)
    }

    pub fn add(&mut self, branch: u32) {
        self.depends.insert(branch);
    }

    pub fn remove(&mut self, branch: u32) {
        self.depends.remove(branch);
    }

    /// Highest branch this fact depends on, or `NO_BRANCH`
    pub fn max(&self) -> i32 {
        self.depends.max().map_or(NO_BRANCH, |b| b as i32)
    }

    pub fn is_independent(&self) -> bool {
        self.max() <= 0
    }

    pub fn size(&self) -> usize {
        self.depends.len()
    }

    pub fn union_branches(&self, branches: &BranchSet) -> DependencySet {
        DependencySet {
            depends: self.depends.union(branches),
            explain: self.explain.clone(),
            branch: self.branch,
        }
    }

    pub fn union(&self, other: &DependencySet, do_explanation: bool) -> DependencySet {
        let mut explain = self.explain.clone();
        if do_explanation {
            explain.extend(other.explain.iter().cloned());
        }
        DependencySet {
            depends: self.depends.union(&other.depends),
            explain,
            branch: self.branch.max(other.branch),
        }
    }

    pub fn union_explanation<'a, I>(&self, axioms: I, do_explanation: bool) -> DependencySet
    where
        I: IntoIterator<Item = &'a Arc<Axiom>>,
    {
        let mut ds = self.clone();
        if do_explanation {
            ds.explain.extend(axioms.into_iter().cloned());
        }
        ds
    }

    /// Canonical sentinel keeping only whether this set is independent
    pub fn cache(&self) -> &'static DependencySet {
        if self.is_independent() {
            &*INDEPENDENT
        } else {
            &*DUMMY
        }
    }

    pub fn mentions(&self, axiom: &Axiom) -> bool {
        self.explain.iter().any(|a| **a == *axiom)
    }
}

impl fmt::Display for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DS[")?;
        for (i, b) in self.depends.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", b)?;
        }
        write!(f, "]")?;
        if !self.explain.is_empty() {
            write!(f, "({} axioms)", self.explain.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimizuku_core::{ClassExpression, Individual};
    use proptest::prelude::*;

    fn axiom(name: &str) -> Arc<Axiom> {
        Arc::new(Axiom::ClassAssertion(
            ClassExpression::named(format!("http://example.org/{}", name)),
            Individual::new("http://example.org/a"),
        ))
    }

    #[test]
    fn test_root_branch_is_independent() {
        assert!(DependencySet::independent().is_independent());
        assert!(DependencySet::from_branch(0).is_independent());
        assert!(!DependencySet::from_branch(1).is_independent());
        assert_eq!(DependencySet::independent().max(), NO_BRANCH);
    }

    #[test]
    fn test_explanation_only_tracked_on_request() {
        let a = DependencySet::from_axiom(axiom("A"));
        let b = DependencySet::from_axiom(axiom("B"));

        assert_eq!(a.union(&b, true).explain().len(), 2);
        assert_eq!(a.union(&b, false).explain().len(), 1);

        let extra = [axiom("C")];
        assert_eq!(a.union_explanation(extra.iter(), false).explain().len(), 1);
        assert_eq!(a.union_explanation(extra.iter(), true).explain().len(), 2);
    }

    #[test]
    fn test_cache_sentinels() {
        let dependent = DependencySet::from_branch(3).union(&DependencySet::from_axiom(axiom("A")), true);
        assert!(std::ptr::eq(dependent.cache(), &*DUMMY));
        assert!(std::ptr::eq(DependencySet::from_branch(0).cache(), &*INDEPENDENT));
        assert!(dependent.cache().explain().is_empty());
    }

    #[test]
    fn test_add_remove() {
        let mut ds = DependencySet::independent();
        ds.add(4);
        ds.add(2);
        ds.add(4);
        assert_eq!(ds.size(), 2);
        assert_eq!(ds.max(), 4);
        ds.remove(4);
        assert_eq!(ds.max(), 2);
        assert!(!ds.contains(4));
    }

    fn arb_ds() -> impl Strategy<Value = DependencySet> {
        prop::collection::vec(0u32..16, 0..6).prop_map(|branches| {
            let mut ds = DependencySet::independent();
            for b in branches {
                ds.add(b);
            }
            ds
        })
    }

    proptest! {
        #[test]
        fn union_membership(a in arb_ds(), b in arb_ds(), x in 0u32..16) {
            let u = a.union(&b, false);
            prop_assert_eq!(u.contains(x), a.contains(x) || b.contains(x));
        }

        #[test]
        fn union_never_shrinks(a in arb_ds(), b in arb_ds()) {
            let u = a.union(&b, true);
            prop_assert!(u.size() >= a.size());
            prop_assert!(u.size() >= b.size());
        }

        #[test]
        fn independence_matches_max(a in arb_ds()) {
            prop_assert_eq!(a.is_independent(), a.max() <= 0);
        }

        #[test]
        fn cache_preserves_independence(a in arb_ds()) {
            let cached = a.cache();
            prop_assert!(std::ptr::eq(cached, &*INDEPENDENT) || std::ptr::eq(cached, &*DUMMY));
            prop_assert_eq!(cached.is_independent(), a.is_independent());
        }
    }
}
