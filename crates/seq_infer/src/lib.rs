//! Type-parameter inference over synthesized operation sequences.
//!
//! A raw sequence typically declares generic objects at their erased or
//! minimally-bound type. [`infer`] is a post-processing pass that recovers
//! the most specific consistent instantiation of each constructed object's
//! type parameters from the evidence at hand — constructor arguments and
//! every later instance call on that object — then rewrites the sequence in
//! place so downstream consumers observe the concrete type.
//!
//! The pass is deterministic and best-effort: refinement is monotonic (a
//! binding never regresses to something less specific), there is no
//! backtracking, and a parameter with no evidence keeps its declared bound.

mod bindings;
mod engine;
pub mod survey;
mod unify;

#[cfg(test)]
mod pbt;

pub use bindings::BindingMap;

use seq_model::Sequence;
use seq_ty::ClassRegistry;

/// Infer concrete type arguments for every generic construction in `seq` and
/// rewrite the affected operations in place.
///
/// Constructions are visited in reverse position order so that later,
/// already-specialized objects do not bias earlier, independent ones. The
/// pass never adds, removes, or reorders operations, never changes an
/// operation's erased type, and is idempotent.
pub fn infer(seq: &mut Sequence, registry: &ClassRegistry) {
    InferCtx { seq, registry }.run();
}

/// One inference run over one sequence. All bookkeeping is owned here;
/// concurrent runs over different sequences share nothing mutable.
pub(crate) struct InferCtx<'a> {
    pub(crate) seq: &'a mut Sequence,
    pub(crate) registry: &'a ClassRegistry,
}
