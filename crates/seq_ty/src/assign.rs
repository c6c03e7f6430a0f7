// ==============================================================================
// Assignability and exact supertype views
// ==============================================================================
//
// Pure queries over the registry. `is_assignable` is the covariant check the
// unification rules gate on: an unresolved type variable or wildcard stands
// in for its upper bound on either side. `exact_supertype` re-expresses a
// type's arguments as seen through a specific class in its superclass chain,
// which is how argument evidence at a supertype formal (`Collection<T>`)
// reaches the parameters of a subtype actual (`ArrayList<String>`).

use rustc_hash::FxHashMap;

use crate::registry::{ClassId, TypeParamId, BOUND_CHAIN_FUSE};
use crate::{ClassRegistry, TypeExpr};

impl ClassRegistry {
    /// Covariant assignability of `candidate` to `target` over the full
    /// expression algebra.
    pub fn is_assignable(&self, candidate: &TypeExpr, target: &TypeExpr) -> bool {
        self.assignable_fused(candidate, target, 0)
    }

    fn assignable_fused(&self, candidate: &TypeExpr, target: &TypeExpr, depth: usize) -> bool {
        if depth > BOUND_CHAIN_FUSE {
            log::debug!("bound chain too deep comparing {candidate:?} to {target:?}");
            return false;
        }
        use TypeExpr::*;
        match (candidate, target) {
            // Variables and wildcards stand in for their upper bounds.
            (Var(p), t) => self.assignable_fused(&self.params[*p].bound, t, depth + 1),
            (c, Var(p)) => self.assignable_fused(c, &self.params[*p].bound, depth + 1),
            (Wildcard { upper }, t) => {
                let upper = self.upper_or_root(upper);
                self.assignable_fused(&upper, t, depth + 1)
            }
            (c, Wildcard { upper }) => {
                let upper = self.upper_or_root(upper);
                self.assignable_fused(c, &upper, depth + 1)
            }

            (Array(c), Array(t)) => self.assignable_fused(c, t, depth + 1),
            // Arrays are assignable only to other arrays and to the root.
            (Array(_), Class(t)) => *t == self.object(),
            (Array(_), Parameterized { .. }) => false,
            (Class(_) | Parameterized { .. }, Array(_)) => false,

            // Primitives participate via their boxed counterparts, so that
            // primitive evidence can refine reference-typed bindings.
            (Class(c) | Parameterized { raw: c, .. }, Class(t)) => {
                self.is_subclass(self.boxed(*c), self.boxed(*t))
            }

            // A raw class reaching a parameterized target: raw-type laxness,
            // only the erased classes are compared.
            (Class(c), Parameterized { raw: t, .. }) => self.is_subclass(self.boxed(*c), *t),

            (Parameterized { raw: c, .. }, Parameterized { raw: t, args: t_args }) => {
                if !self.is_subclass(*c, *t) {
                    return false;
                }
                match self.exact_supertype(candidate, *t) {
                    Some(TypeExpr::Parameterized { args: c_args, .. })
                        if c_args.len() == t_args.len() =>
                    {
                        c_args
                            .iter()
                            .zip(t_args)
                            .all(|(ca, ta)| self.assignable_fused(ca, ta, depth + 1))
                    }
                    // A raw view carries no arguments to compare.
                    Some(_) => true,
                    None => false,
                }
            }
        }
    }

    fn upper_or_root(&self, upper: &Option<Box<TypeExpr>>) -> TypeExpr {
        match upper {
            Some(u) => (**u).clone(),
            None => TypeExpr::Class(self.object()),
        }
    }

    /// Re-express `actual` as an instantiation of `target_raw`, propagating
    /// `actual`'s type arguments through each superclass link. `None` when
    /// `target_raw` is not a (reflexive) supertype of `actual`'s raw class,
    /// or when `actual` has no class shape to walk from.
    pub fn exact_supertype(&self, actual: &TypeExpr, target_raw: ClassId) -> Option<TypeExpr> {
        self.exact_supertype_fused(actual, target_raw, 0)
    }

    fn exact_supertype_fused(
        &self,
        actual: &TypeExpr,
        target_raw: ClassId,
        depth: usize,
    ) -> Option<TypeExpr> {
        if depth > BOUND_CHAIN_FUSE {
            log::debug!("bound chain too deep resolving supertype view of {actual:?}");
            return None;
        }
        let (mut raw, mut args) = match actual {
            TypeExpr::Parameterized { raw, args } => (*raw, args.clone()),
            // A raw generic class contributes its own variables as arguments.
            TypeExpr::Class(c) => {
                let vars = self.classes[*c]
                    .type_params
                    .iter()
                    .map(|p| TypeExpr::Var(*p))
                    .collect();
                (*c, vars)
            }
            TypeExpr::Var(p) => {
                let bound = self.params[*p].bound.clone();
                return self.exact_supertype_fused(&bound, target_raw, depth + 1);
            }
            TypeExpr::Wildcard { upper: Some(u) } => {
                return self.exact_supertype_fused(u, target_raw, depth + 1);
            }
            TypeExpr::Wildcard { upper: None } | TypeExpr::Array(_) => return None,
        };

        loop {
            if raw == target_raw {
                return Some(if args.is_empty() {
                    TypeExpr::Class(raw)
                } else {
                    TypeExpr::Parameterized { raw, args }
                });
            }
            let def = &self.classes[raw];
            let (sup, sup_args) = def.superclass.as_ref()?;
            // Substitute the current arguments through the link's argument
            // vector (which is written in `raw`'s own variables).
            let map: FxHashMap<TypeParamId, TypeExpr> = def
                .type_params
                .iter()
                .copied()
                .zip(args.iter().cloned())
                .collect();
            args = sup_args.iter().map(|a| self.substitute(a, &map)).collect();
            raw = *sup;
        }
    }

    /// Apply a type-parameter binding through an expression. Unmapped
    /// variables are left as-is.
    pub fn substitute(
        &self,
        expr: &TypeExpr,
        map: &FxHashMap<TypeParamId, TypeExpr>,
    ) -> TypeExpr {
        match expr {
            TypeExpr::Var(p) => map.get(p).cloned().unwrap_or_else(|| expr.clone()),
            TypeExpr::Class(_) => expr.clone(),
            TypeExpr::Parameterized { raw, args } => TypeExpr::Parameterized {
                raw: *raw,
                args: args.iter().map(|a| self.substitute(a, map)).collect(),
            },
            TypeExpr::Wildcard { upper } => TypeExpr::Wildcard {
                upper: upper
                    .as_ref()
                    .map(|u| Box::new(self.substitute(u, map))),
            },
            TypeExpr::Array(elem) => TypeExpr::Array(Box::new(self.substitute(elem, map))),
        }
    }
}
