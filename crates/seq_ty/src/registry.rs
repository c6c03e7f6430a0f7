use la_arena::{Arena, Idx as Id};
use smol_str::SmolStr;

use crate::{Erasure, TypeExpr};

pub type ClassId = Id<ClassDef>;
pub type TypeParamId = Id<TypeParamDef>;

/// One erased class known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: SmolStr,
    /// Direct superclass plus the type arguments handed to it, expressed in
    /// this class's own type variables. `Stack<T> extends Vector<T>` stores
    /// `(Vector, [Var(T)])`. `None` only for the root class.
    pub superclass: Option<(ClassId, Vec<TypeExpr>)>,
    /// Declared type parameters, in declaration order.
    pub type_params: Vec<TypeParamId>,
    /// For primitives, the boxed counterpart class. Reference types carry
    /// `None`.
    pub boxed: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: SmolStr,
    /// First declared (implicit) upper bound. Seeds the binding map and
    /// stands in for the variable wherever an unresolved one is erased or
    /// compared.
    pub bound: TypeExpr,
}

/// Bound chains deeper than this indicate a malformed (cyclic) declaration;
/// erasure degrades to the root class instead of looping.
pub(crate) const BOUND_CHAIN_FUSE: usize = 32;

/// The erased class world: what the reflection environment would answer
/// about classes, supertype chains, declared type parameters and
/// primitive/boxed pairs. Immutable once built; all queries are pure.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    pub(crate) classes: Arena<ClassDef>,
    pub(crate) params: Arena<TypeParamDef>,
    object: ClassId,
}

impl ClassRegistry {
    /// A fresh registry containing only the root `Object` class.
    pub fn new() -> Self {
        let mut classes = Arena::new();
        let object = classes.alloc(ClassDef {
            name: "Object".into(),
            superclass: None,
            type_params: Vec::new(),
            boxed: None,
        });
        Self {
            classes,
            params: Arena::new(),
            object,
        }
    }

    pub fn object(&self) -> ClassId {
        self.object
    }

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id]
    }

    pub fn param(&self, id: TypeParamId) -> &TypeParamDef {
        &self.params[id]
    }

    /// Declared type parameters of `class`, in declaration order.
    pub fn params_of(&self, class: ClassId) -> &[TypeParamId] {
        &self.classes[class].type_params
    }

    pub fn add_class(&mut self, name: &str) -> ClassId {
        let object = self.object;
        self.classes.alloc(ClassDef {
            name: name.into(),
            superclass: Some((object, Vec::new())),
            type_params: Vec::new(),
            boxed: None,
        })
    }

    /// Declare a generic class with the given type parameter names, each
    /// bounded by the root class. Returns the class and its parameter ids.
    pub fn add_generic_class(
        &mut self,
        name: &str,
        param_names: &[&str],
    ) -> (ClassId, Vec<TypeParamId>) {
        let bound = TypeExpr::Class(self.object);
        let params: Vec<TypeParamId> = param_names
            .iter()
            .map(|p| {
                self.params.alloc(TypeParamDef {
                    name: (*p).into(),
                    bound: bound.clone(),
                })
            })
            .collect();
        let object = self.object;
        let id = self.classes.alloc(ClassDef {
            name: name.into(),
            superclass: Some((object, Vec::new())),
            type_params: params.clone(),
            boxed: None,
        });
        (id, params)
    }

    /// Declare a primitive class and link it to its boxed counterpart.
    pub fn add_primitive(&mut self, name: &str, boxed: ClassId) -> ClassId {
        self.classes.alloc(ClassDef {
            name: name.into(),
            superclass: None,
            type_params: Vec::new(),
            boxed: Some(boxed),
        })
    }

    /// Replace the default superclass link. `args` are the type arguments
    /// handed to `sup`, expressed in `sub`'s own type variables.
    pub fn set_superclass(&mut self, sub: ClassId, sup: ClassId, args: Vec<TypeExpr>) {
        self.classes[sub].superclass = Some((sup, args));
    }

    /// Tighten a type parameter's declared upper bound.
    pub fn set_param_bound(&mut self, param: TypeParamId, bound: TypeExpr) {
        self.params[param].bound = bound;
    }

    pub fn is_primitive(&self, id: ClassId) -> bool {
        self.classes[id].boxed.is_some()
    }

    /// Boxed counterpart for primitives, identity for reference types.
    pub fn boxed(&self, id: ClassId) -> ClassId {
        self.classes[id].boxed.unwrap_or(id)
    }

    /// Raw-class subtyping via the superclass chain. Reflexive.
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut cur = Some(sub);
        while let Some(c) = cur {
            if c == sup {
                return true;
            }
            cur = self.classes[c].superclass.as_ref().map(|(s, _)| *s);
        }
        false
    }

    /// The declared (implicit) upper bound of a type parameter.
    pub fn implicit_bound(&self, param: TypeParamId) -> TypeExpr {
        self.params[param].bound.clone()
    }

    /// The concrete runtime shape underlying any type expression: the raw
    /// class of a parameterized type, the erased bound of a variable or
    /// wildcard, the array-of-erased-element shape of an array.
    pub fn erase(&self, expr: &TypeExpr) -> Erasure {
        self.erase_fused(expr, 0)
    }

    fn erase_fused(&self, expr: &TypeExpr, depth: usize) -> Erasure {
        if depth > BOUND_CHAIN_FUSE {
            log::debug!("bound chain too deep while erasing {expr:?}, degrading to root");
            return Erasure::scalar(self.object);
        }
        match expr {
            TypeExpr::Class(c) => Erasure::scalar(*c),
            TypeExpr::Parameterized { raw, .. } => Erasure::scalar(*raw),
            TypeExpr::Var(p) => self.erase_fused(&self.params[*p].bound, depth + 1),
            TypeExpr::Wildcard { upper: Some(u) } => self.erase_fused(u, depth + 1),
            TypeExpr::Wildcard { upper: None } => Erasure::scalar(self.object),
            TypeExpr::Array(elem) => {
                let inner = self.erase_fused(elem, depth + 1);
                Erasure {
                    class: inner.class,
                    dims: inner.dims + 1,
                }
            }
        }
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
