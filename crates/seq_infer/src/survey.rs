//! A secondary, sequence-global view: for every distinct formal parameter
//! type that appears anywhere in a sequence, the values supplied at it, and
//! the most specific type consistent with all of them.
//!
//! This pass is not wired into [`infer`](crate::infer) — the primary flow
//! resolves each construction from its own evidence. It is kept as the
//! extension point for resolving the cases where usage sites disagree and
//! the per-construction monotonic policy keeps the first assignable
//! refinement: a principled resolution would intersect the views collected
//! here. Only the parameterized case is computed; variable, wildcard and
//! array formals are open cases and yield `None`.

use rustc_hash::FxHashMap;

use seq_model::{OpKind, Sequence, VarRef};
use seq_ty::{ClassRegistry, TypeExpr};

/// Index of every formal parameter type in a sequence to the value handles
/// assigned at it.
#[derive(Debug, Default)]
pub struct UsageSurvey {
    by_formal: FxHashMap<TypeExpr, Vec<VarRef>>,
}

impl UsageSurvey {
    /// Index every constructor and method argument position of `seq`.
    pub fn collect(seq: &Sequence) -> Self {
        let mut by_formal: FxHashMap<TypeExpr, Vec<VarRef>> = FxHashMap::default();
        for (_, op) in seq.iter() {
            let (formals, args) = match &op.kind {
                OpKind::Construct { ctor, args } => (&ctor.params, args),
                OpKind::Invoke { method, args, .. } => (&method.params, args),
                _ => continue,
            };
            for (formal, &arg) in formals.iter().zip(args) {
                by_formal.entry(formal.clone()).or_default().push(arg);
            }
        }
        log::debug!("survey: {} distinct formal types", by_formal.len());
        Self { by_formal }
    }

    pub fn formals(&self) -> impl Iterator<Item = &TypeExpr> + '_ {
        self.by_formal.keys()
    }

    /// Handles assigned at `formal`, in sequence order.
    pub fn assignments(&self, formal: &TypeExpr) -> &[VarRef] {
        self.by_formal.get(formal).map_or(&[], Vec::as_slice)
    }

    /// The most specific exact-supertype view of `formal` across every value
    /// assigned at it. Produces a result for parameterized formals only.
    pub fn most_specific(
        &self,
        seq: &Sequence,
        registry: &ClassRegistry,
        formal: &TypeExpr,
    ) -> Option<TypeExpr> {
        match formal {
            TypeExpr::Parameterized { raw, .. } => {
                let mut exact = formal.clone();
                for &var in self.by_formal.get(formal)? {
                    let actual = &seq[var].decl_ty;
                    let Some(candidate) = registry.exact_supertype(actual, *raw) else {
                        log::trace!("survey: no view of {actual:?} at {raw:?}");
                        continue;
                    };
                    if registry.is_assignable(&candidate, &exact) {
                        exact = candidate;
                    }
                }
                log::trace!("survey: most specific {formal:?} is {exact:?}");
                Some(exact)
            }
            TypeExpr::Var(_) | TypeExpr::Wildcard { .. } | TypeExpr::Array(_) => {
                log::trace!("survey: {formal:?} not handled");
                None
            }
            TypeExpr::Class(_) => None,
        }
    }
}
