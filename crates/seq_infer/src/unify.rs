// ==============================================================================
// Unification rules
// ==============================================================================
//
// One formal/actual evidence pair at a time, refining the run's binding map.
// The rules are shape-directed on the formal:
//
//   Parameterized — re-express the actual through the formal's raw class
//                   (exact supertype view) and refine every owner variable
//                   appearing among the formal's type arguments.
//   Var           — the actual itself is the candidate.
//   Wildcard /    — no binding update. An open refinement opportunity,
//   Array           deliberately left as a no-op.
//   Class         — mentions no parameter, nothing to do.
//
// Rejected candidates leave the map untouched (monotonic policy); every
// decision is reported at trace level.

use seq_ty::TypeExpr;

use crate::{BindingMap, InferCtx};

impl InferCtx<'_> {
    /// Apply one formal-parameter/actual-argument pair to the binding map.
    pub(crate) fn unify_pair(&self, b: &mut BindingMap, formal: &TypeExpr, actual: &TypeExpr) {
        match formal {
            TypeExpr::Parameterized { raw, args } => {
                let Some(view) = self.registry.exact_supertype(actual, *raw) else {
                    log::trace!("no exact supertype view of {actual:?} at {raw:?}, skipping pair");
                    return;
                };
                let TypeExpr::Parameterized {
                    args: view_args, ..
                } = view
                else {
                    // Raw view: no argument evidence to propagate.
                    return;
                };
                for (formal_arg, view_arg) in args.iter().zip(view_args) {
                    if let TypeExpr::Var(p) = formal_arg {
                        if b.tracks(*p) {
                            b.refine(self.registry, *p, view_arg);
                        }
                    }
                }
            }

            TypeExpr::Var(p) => {
                if b.tracks(*p) {
                    b.refine(self.registry, *p, actual.clone());
                }
            }

            TypeExpr::Wildcard { .. } | TypeExpr::Array(_) => {
                log::trace!("formal {formal:?} contributes no binding evidence");
            }

            TypeExpr::Class(_) => {}
        }
    }
}
