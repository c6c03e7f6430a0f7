use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::registry::{ClassId, TypeParamId};
use crate::{ClassRegistry, TypeExpr};

/// A class together with the type arguments it is currently known at — the
/// generic class descriptor. Rebinding via [`with_type_arguments`] only ever
/// changes the argument list, never the raw class.
///
/// [`with_type_arguments`]: ClassInstantiation::with_type_arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInstantiation {
    pub raw: ClassId,
    pub args: Vec<TypeExpr>,
}

impl ClassInstantiation {
    /// The un-instantiated view of a class: each declared parameter stands
    /// for itself.
    pub fn raw_of(registry: &ClassRegistry, class: ClassId) -> Self {
        let args = registry
            .params_of(class)
            .iter()
            .map(|p| TypeExpr::Var(*p))
            .collect();
        Self { raw: class, args }
    }

    /// A new instantiation of the same raw class with the given arguments
    /// (one per declared parameter, in order).
    pub fn with_type_arguments(&self, args: Vec<TypeExpr>) -> Self {
        Self {
            raw: self.raw,
            args,
        }
    }

    pub fn as_type(&self) -> TypeExpr {
        if self.args.is_empty() {
            TypeExpr::Class(self.raw)
        } else {
            TypeExpr::Parameterized {
                raw: self.raw,
                args: self.args.clone(),
            }
        }
    }

    /// Declared parameter → current argument, for substituting through member
    /// signatures.
    pub fn binding_view(&self, registry: &ClassRegistry) -> FxHashMap<TypeParamId, TypeExpr> {
        registry
            .params_of(self.raw)
            .iter()
            .copied()
            .zip(self.args.iter().cloned())
            .collect()
    }
}

/// Immutable description of a constructor: its owner instantiation and its
/// formal parameter types, which may reference the owner's type parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDescriptor {
    pub owner: ClassInstantiation,
    pub params: Vec<TypeExpr>,
}

impl ConstructorDescriptor {
    pub fn new(owner: ClassInstantiation, params: Vec<TypeExpr>) -> Self {
        Self { owner, params }
    }

    /// A copy bound to a (possibly newly parameterized) owner. Pure; the
    /// original is untouched.
    pub fn with_owner(&self, owner: ClassInstantiation) -> Self {
        Self {
            owner,
            params: self.params.clone(),
        }
    }

    /// Formal parameter types with the owner's current arguments substituted
    /// for its type parameters.
    pub fn effective_params(&self, registry: &ClassRegistry) -> Vec<TypeExpr> {
        let view = self.owner.binding_view(registry);
        self.params
            .iter()
            .map(|p| registry.substitute(p, &view))
            .collect()
    }
}

/// Immutable description of a method on a generic-capable owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: SmolStr,
    pub owner: ClassInstantiation,
    pub params: Vec<TypeExpr>,
    pub ret: TypeExpr,
    pub is_static: bool,
}

impl MethodDescriptor {
    pub fn new(
        name: &str,
        owner: ClassInstantiation,
        params: Vec<TypeExpr>,
        ret: TypeExpr,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            params,
            ret,
            is_static: false,
        }
    }

    pub fn new_static(
        name: &str,
        owner: ClassInstantiation,
        params: Vec<TypeExpr>,
        ret: TypeExpr,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            params,
            ret,
            is_static: true,
        }
    }

    /// A copy bound to a new owner instantiation. Pure.
    pub fn with_owner(&self, owner: ClassInstantiation) -> Self {
        Self {
            owner,
            ..self.clone()
        }
    }

    pub fn effective_params(&self, registry: &ClassRegistry) -> Vec<TypeExpr> {
        let view = self.owner.binding_view(registry);
        self.params
            .iter()
            .map(|p| registry.substitute(p, &view))
            .collect()
    }

    pub fn effective_ret(&self, registry: &ClassRegistry) -> TypeExpr {
        let view = self.owner.binding_view(registry);
        registry.substitute(&self.ret, &view)
    }
}

/// Immutable description of a field access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: SmolStr,
    pub owner: ClassInstantiation,
    pub ty: TypeExpr,
}

impl FieldDescriptor {
    pub fn new(name: &str, owner: ClassInstantiation, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            owner,
            ty,
        }
    }

    pub fn effective_ty(&self, registry: &ClassRegistry) -> TypeExpr {
        let view = self.owner.binding_view(registry);
        registry.substitute(&self.ty, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_type_arguments_preserves_raw() {
        let mut registry = ClassRegistry::new();
        let string = registry.add_class("String");
        let (container, _) = registry.add_generic_class("Container", &["T"]);

        let raw = ClassInstantiation::raw_of(&registry, container);
        let bound = raw.with_type_arguments(vec![TypeExpr::Class(string)]);
        assert_eq!(bound.raw, raw.raw);
        assert_eq!(registry.erase(&bound.as_type()), registry.erase(&raw.as_type()));
    }

    #[test]
    fn effective_params_follow_the_owner() {
        let mut registry = ClassRegistry::new();
        let string = registry.add_class("String");
        let (container, params) = registry.add_generic_class("Container", &["T"]);

        let raw = ClassInstantiation::raw_of(&registry, container);
        let add = MethodDescriptor::new(
            "add",
            raw.clone(),
            vec![TypeExpr::Var(params[0])],
            TypeExpr::Class(registry.object()),
        );
        assert_eq!(add.effective_params(&registry), vec![TypeExpr::Var(params[0])]);

        let rebound = add.with_owner(raw.with_type_arguments(vec![TypeExpr::Class(string)]));
        assert_eq!(rebound.effective_params(&registry), vec![TypeExpr::Class(string)]);
        // The original descriptor is untouched.
        assert_eq!(add.owner.args, vec![TypeExpr::Var(params[0])]);
    }
}
