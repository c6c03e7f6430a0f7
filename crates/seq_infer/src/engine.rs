// ==============================================================================
// Construction-owner inference
// ==============================================================================
//
// For each construction whose owner declares type parameters (visited in
// reverse position order):
//
//   1. seed the binding map from the declared bounds,
//   2. unify each constructor formal against its argument's declared type,
//   3. scan forward and unify the formals of every instance call on the
//      constructed value against its arguments' declared types,
//   4. read the bindings out in declaration order (boxing primitives),
//   5. rebind the constructor to the newly-instantiated owner,
//   6. scan forward again and rebind every such call's method descriptor so
//      downstream consumers observe the resolved type.
//
// Step 5 only ever changes the owner's type-argument list; the erased class
// is untouched.

use itertools::Itertools;

use seq_model::{OpKind, VarRef};
use seq_ty::{ClassInstantiation, ConstructorDescriptor, TypeExpr, TypeParamId};

use crate::{bindings::BindingMap, InferCtx};

impl InferCtx<'_> {
    pub(crate) fn run(&mut self) {
        // Reverse order: later constructions are resolved first so their
        // refinements cannot leak backward into earlier, independent ones.
        let constructions = self
            .seq
            .iter()
            .filter_map(|(id, op)| matches!(op.kind, OpKind::Construct { .. }).then_some(id))
            .collect_vec();

        for id in constructions.into_iter().rev() {
            let (ctor, args) = match &self.seq[id].kind {
                OpKind::Construct { ctor, args } => (ctor.clone(), args.clone()),
                _ => unreachable!("collected above"),
            };
            let params = self.registry.params_of(ctor.owner.raw).to_vec();
            if params.is_empty() {
                log::trace!(
                    "{}: no declared type parameters, construction left untouched",
                    self.registry.class(ctor.owner.raw).name
                );
                continue;
            }
            self.infer_construction(id, ctor, args, &params);
        }
    }

    fn infer_construction(
        &mut self,
        at: VarRef,
        ctor: ConstructorDescriptor,
        args: Vec<VarRef>,
        params: &[TypeParamId],
    ) {
        let mut b = BindingMap::seeded(self.registry, params);

        // Constructor arguments first.
        for (formal, &arg) in ctor.params.iter().zip(&args) {
            let actual = self.seq[arg].decl_ty.clone();
            self.unify_pair(&mut b, formal, &actual);
        }

        // Then every later instance call on the constructed value.
        for (formal, actual) in self.call_site_evidence(at) {
            self.unify_pair(&mut b, &formal, &actual);
        }

        let ty_args = b.resolved(self.registry, params);
        let new_owner = ctor.owner.with_type_arguments(ty_args);
        debug_assert_eq!(new_owner.raw, ctor.owner.raw);
        log::debug!(
            "construction at {}: inferred {:?}",
            self.seq.position(at),
            new_owner
        );

        let new_ctor = ctor.with_owner(new_owner.clone());
        let op = self.seq.op_mut(at);
        op.decl_ty = new_owner.as_type();
        if let OpKind::Construct { ctor, .. } = &mut op.kind {
            *ctor = new_ctor;
        }

        self.rebind_call_sites(at, &new_owner);
    }

    /// Formal/actual pairs contributed by every instance invocation whose
    /// receiver is `callee`, in forward position order starting after the
    /// construction.
    fn call_site_evidence(&self, callee: VarRef) -> Vec<(TypeExpr, TypeExpr)> {
        let start = self.seq.position(callee);
        let mut pairs = Vec::new();
        for (id, op) in self.seq.iter() {
            if self.seq.position(id) <= start {
                continue;
            }
            let OpKind::Invoke {
                method,
                receiver: Some(recv),
                args,
            } = &op.kind
            else {
                continue;
            };
            if method.is_static || *recv != callee {
                continue;
            }
            log::trace!(
                "evidence from `{}` at position {}",
                method.name,
                self.seq.position(id)
            );
            for (formal, &arg) in method.params.iter().zip(args) {
                pairs.push((formal.clone(), self.seq[arg].decl_ty.clone()));
            }
        }
        pairs
    }

    /// Rebind every later instance invocation on `callee` to the
    /// newly-inferred owner.
    fn rebind_call_sites(&mut self, callee: VarRef, owner: &ClassInstantiation) {
        let start = self.seq.position(callee);
        let ids = self.seq.iter().map(|(id, _)| id).collect_vec();
        for id in ids {
            if self.seq.position(id) <= start {
                continue;
            }
            if let OpKind::Invoke {
                method,
                receiver: Some(recv),
                ..
            } = &mut self.seq.op_mut(id).kind
            {
                if !method.is_static && *recv == callee {
                    log::trace!("rebinding `{}` to {:?}", method.name, owner);
                    *method = method.with_owner(owner.clone());
                }
            }
        }
    }
}
