//! The operation sequence model: an ordered, arena-backed list of synthesized
//! operations and the value handles they produce. Each operation produces
//! exactly one value; a handle is the arena index of its producing operation,
//! so sequence position falls out of the index order and rewriting one
//! operation's descriptor can never dangle a reference held by another.

use std::ops;

use la_arena::{Arena, Idx as Id};
use smol_str::SmolStr;
use thiserror::Error;

use seq_ty::{ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeExpr};

/// Handle to the value produced by one operation.
pub type VarRef = Id<Op>;

/// One synthesized operation plus the declared type of the value it
/// produces. `decl_ty` is refined in place as inference specializes the
/// producing descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub kind: OpKind,
    pub decl_ty: TypeExpr,
}

/// The operation variants a synthesized sequence can contain. Matched
/// exhaustively everywhere; adding a variant is a compile-time event for
/// every consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpKind {
    Construct {
        ctor: ConstructorDescriptor,
        args: Vec<VarRef>,
    },
    Invoke {
        method: MethodDescriptor,
        receiver: Option<VarRef>,
        args: Vec<VarRef>,
    },
    FieldAccess {
        field: FieldDescriptor,
        receiver: Option<VarRef>,
    },
    Assign {
        target: VarRef,
        value: VarRef,
    },
    ArrayNew {
        elem_ty: TypeExpr,
        len: usize,
    },
    NullLiteral,
    PrimitiveLiteral(PrimitiveValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveValue {
    Int(i64),
    Bool(bool),
    Char(char),
    Str(SmolStr),
}

/// An ordered operation sequence. Inference mutates descriptors and declared
/// types in place but never adds, removes, or reorders operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    ops: Arena<Op>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operations in sequence (position) order.
    pub fn iter(&self) -> impl Iterator<Item = (VarRef, &Op)> + '_ {
        self.ops.iter()
    }

    /// Stable position of a handle's producing operation within this run.
    pub fn position(&self, v: VarRef) -> usize {
        u32::from(v.into_raw()) as usize
    }

    pub fn op_mut(&mut self, v: VarRef) -> &mut Op {
        &mut self.ops[v]
    }
}

impl ops::Index<VarRef> for Sequence {
    type Output = Op;
    fn index(&self, index: VarRef) -> &Self::Output {
        &self.ops[index]
    }
}

impl ops::IndexMut<VarRef> for Sequence {
    fn index_mut(&mut self, index: VarRef) -> &mut Self::Output {
        &mut self.ops[index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("instance invocation of `{0}` requires a receiver")]
    MissingReceiver(SmolStr),

    #[error("static invocation of `{0}` cannot take a receiver")]
    ReceiverOnStatic(SmolStr),
}

/// Fallible construction of a well-formed sequence. Handles only ever come
/// from earlier pushes into the same builder, so forward references cannot be
/// expressed; arity and receiver/static agreement are checked per push.
#[derive(Debug)]
pub struct SequenceBuilder<'a> {
    registry: &'a seq_ty::ClassRegistry,
    seq: Sequence,
}

impl<'a> SequenceBuilder<'a> {
    pub fn new(registry: &'a seq_ty::ClassRegistry) -> Self {
        Self {
            registry,
            seq: Sequence::default(),
        }
    }

    pub fn construct(
        &mut self,
        ctor: ConstructorDescriptor,
        args: Vec<VarRef>,
    ) -> Result<VarRef, SequenceError> {
        if ctor.params.len() != args.len() {
            return Err(SequenceError::ArityMismatch {
                expected: ctor.params.len(),
                got: args.len(),
            });
        }
        let decl_ty = ctor.owner.as_type();
        Ok(self.seq.ops.alloc(Op {
            kind: OpKind::Construct { ctor, args },
            decl_ty,
        }))
    }

    pub fn invoke(
        &mut self,
        method: MethodDescriptor,
        receiver: Option<VarRef>,
        args: Vec<VarRef>,
    ) -> Result<VarRef, SequenceError> {
        if method.params.len() != args.len() {
            return Err(SequenceError::ArityMismatch {
                expected: method.params.len(),
                got: args.len(),
            });
        }
        match (method.is_static, receiver) {
            (false, None) => return Err(SequenceError::MissingReceiver(method.name.clone())),
            (true, Some(_)) => return Err(SequenceError::ReceiverOnStatic(method.name.clone())),
            _ => {}
        }
        let decl_ty = method.effective_ret(self.registry);
        Ok(self.seq.ops.alloc(Op {
            kind: OpKind::Invoke {
                method,
                receiver,
                args,
            },
            decl_ty,
        }))
    }

    pub fn field_access(&mut self, field: FieldDescriptor, receiver: Option<VarRef>) -> VarRef {
        let decl_ty = field.effective_ty(self.registry);
        self.seq.ops.alloc(Op {
            kind: OpKind::FieldAccess { field, receiver },
            decl_ty,
        })
    }

    /// The produced handle observes the target's declared type.
    pub fn assign(&mut self, target: VarRef, value: VarRef) -> VarRef {
        let decl_ty = self.seq[target].decl_ty.clone();
        self.seq.ops.alloc(Op {
            kind: OpKind::Assign { target, value },
            decl_ty,
        })
    }

    pub fn array_new(&mut self, elem_ty: TypeExpr, len: usize) -> VarRef {
        let decl_ty = TypeExpr::array(elem_ty.clone());
        self.seq.ops.alloc(Op {
            kind: OpKind::ArrayNew { elem_ty, len },
            decl_ty,
        })
    }

    pub fn null_literal(&mut self, ty: TypeExpr) -> VarRef {
        self.seq.ops.alloc(Op {
            kind: OpKind::NullLiteral,
            decl_ty: ty,
        })
    }

    pub fn primitive(&mut self, value: PrimitiveValue, ty: TypeExpr) -> VarRef {
        self.seq.ops.alloc(Op {
            kind: OpKind::PrimitiveLiteral(value),
            decl_ty: ty,
        })
    }

    pub fn finish(self) -> Sequence {
        self.seq
    }
}
