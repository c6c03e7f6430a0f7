use derive_more::Debug;

use crate::registry::{ClassId, TypeParamId};

/// A formal type expression.
///
/// Closed sum over the shapes the inference engine reasons about; every
/// declared type, formal parameter type and inferred type argument in the
/// system is one of these five.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A concrete (raw) class, with no type arguments of interest.
    #[debug("Class({_0:?})")]
    Class(ClassId),

    /// Reference to a declared type parameter.
    #[debug("Var({_0:?})")]
    Var(TypeParamId),

    /// A generic class applied to type arguments, e.g. `Container<String>`.
    #[debug("Parameterized({raw:?}, {args:?})")]
    Parameterized { raw: ClassId, args: Vec<TypeExpr> },

    /// An existential upper bound, `? extends U`. `None` means unbounded.
    #[debug("Wildcard({upper:?})")]
    Wildcard { upper: Option<Box<TypeExpr>> },

    /// Array whose element type may itself be generic.
    #[debug("Array({_0:?})")]
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn parameterized(raw: ClassId, args: impl IntoIterator<Item = TypeExpr>) -> Self {
        TypeExpr::Parameterized {
            raw,
            args: args.into_iter().collect(),
        }
    }

    pub fn wildcard(upper: Option<TypeExpr>) -> Self {
        TypeExpr::Wildcard {
            upper: upper.map(Box::new),
        }
    }

    pub fn array(elem: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(elem))
    }

    /// Whether this expression references `param` anywhere inside it.
    pub fn mentions(&self, param: TypeParamId) -> bool {
        match self {
            TypeExpr::Class(_) => false,
            TypeExpr::Var(p) => *p == param,
            TypeExpr::Parameterized { args, .. } => args.iter().any(|a| a.mentions(param)),
            TypeExpr::Wildcard { upper } => {
                upper.as_ref().is_some_and(|u| u.mentions(param))
            }
            TypeExpr::Array(elem) => elem.mentions(param),
        }
    }
}

/// The erased runtime shape of a type expression: a raw class plus array
/// depth. `dims == 0` for non-array types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[debug("Erasure({class:?}, dims={dims})")]
pub struct Erasure {
    pub class: ClassId,
    pub dims: usize,
}

impl Erasure {
    pub fn scalar(class: ClassId) -> Self {
        Erasure { class, dims: 0 }
    }

    pub fn is_array(&self) -> bool {
        self.dims > 0
    }
}
