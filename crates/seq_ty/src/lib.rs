mod assign;
mod descriptor;
mod expr;
mod registry;

pub use descriptor::{
    ClassInstantiation, ConstructorDescriptor, FieldDescriptor, MethodDescriptor,
};
pub use expr::{Erasure, TypeExpr};
pub use registry::{ClassDef, ClassId, ClassRegistry, TypeParamDef, TypeParamId};
