use rustc_hash::FxHashMap;

use seq_ty::{ClassRegistry, TypeExpr, TypeParamId};

/// Per-run table of type parameter → currently best-known concrete type.
///
/// Lives only for the duration of inferring one construction's owner type.
/// Seeded from each parameter's declared bound; updates are monotonic — an
/// entry is only replaced by a type assignable to it, never regressed to
/// something less specific or unrelated.
#[derive(Debug, Clone, Default)]
pub struct BindingMap {
    entries: FxHashMap<TypeParamId, TypeExpr>,
}

impl BindingMap {
    /// A map tracking exactly `params`, each at its implicit bound.
    pub fn seeded(registry: &ClassRegistry, params: &[TypeParamId]) -> Self {
        let entries = params
            .iter()
            .map(|&p| (p, registry.implicit_bound(p)))
            .collect();
        Self { entries }
    }

    /// Whether `param` belongs to the owner this map was seeded for.
    /// Evidence mentioning foreign parameters is ignored.
    pub fn tracks(&self, param: TypeParamId) -> bool {
        self.entries.contains_key(&param)
    }

    pub fn get(&self, param: TypeParamId) -> Option<&TypeExpr> {
        self.entries.get(&param)
    }

    /// Monotonic refinement: `candidate` replaces the current entry only if
    /// it is assignable to it. Returns whether the entry advanced.
    pub fn refine(
        &mut self,
        registry: &ClassRegistry,
        param: TypeParamId,
        candidate: TypeExpr,
    ) -> bool {
        let Some(current) = self.entries.get(&param) else {
            return false;
        };
        if registry.is_assignable(&candidate, current) {
            log::trace!(
                "binding {}: refined {current:?} -> {candidate:?}",
                registry.param(param).name
            );
            self.entries.insert(param, candidate);
            true
        } else {
            log::trace!(
                "binding {}: {candidate:?} not assignable to {current:?}, keeping",
                registry.param(param).name
            );
            false
        }
    }

    /// Entries for `params` in declaration order, with any entry whose
    /// erasure is a primitive replaced by its boxed class — type arguments
    /// must be reference types.
    pub fn resolved(&self, registry: &ClassRegistry, params: &[TypeParamId]) -> Vec<TypeExpr> {
        params
            .iter()
            .map(|&p| {
                let ty = self
                    .entries
                    .get(&p)
                    .cloned()
                    .unwrap_or_else(|| registry.implicit_bound(p));
                let erasure = registry.erase(&ty);
                if !erasure.is_array() && registry.is_primitive(erasure.class) {
                    TypeExpr::Class(registry.boxed(erasure.class))
                } else {
                    ty
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinement_is_monotonic() {
        let mut registry = ClassRegistry::new();
        let string = registry.add_class("String");
        let number = registry.add_class("Number");
        let integer = registry.add_class("Integer");
        registry.set_superclass(integer, number, Vec::new());
        let (_, params) = registry.add_generic_class("Container", &["T"]);
        let t = params[0];

        let mut b = BindingMap::seeded(&registry, &params);
        assert_eq!(b.get(t), Some(&TypeExpr::Class(registry.object())));

        assert!(b.refine(&registry, t, TypeExpr::Class(number)));
        assert!(b.refine(&registry, t, TypeExpr::Class(integer)));
        // String is unrelated to Integer: the entry must not regress.
        assert!(!b.refine(&registry, t, TypeExpr::Class(string)));
        assert_eq!(b.get(t), Some(&TypeExpr::Class(integer)));
    }

    #[test]
    fn untracked_params_never_gain_entries() {
        let mut registry = ClassRegistry::new();
        let string = registry.add_class("String");
        let (_, container_params) = registry.add_generic_class("Container", &["T"]);
        let (_, other_params) = registry.add_generic_class("Other", &["U"]);

        let mut b = BindingMap::seeded(&registry, &container_params);
        assert!(!b.tracks(other_params[0]));
        assert!(!b.refine(&registry, other_params[0], TypeExpr::Class(string)));
        assert_eq!(b.get(other_params[0]), None);
    }

    #[test]
    fn resolved_boxes_primitive_entries() {
        let mut registry = ClassRegistry::new();
        let integer = registry.add_class("Integer");
        let int_prim = registry.add_primitive("int", integer);
        let (_, params) = registry.add_generic_class("Container", &["T"]);

        let mut b = BindingMap::seeded(&registry, &params);
        assert!(b.refine(&registry, params[0], TypeExpr::Class(int_prim)));
        assert_eq!(
            b.resolved(&registry, &params),
            vec![TypeExpr::Class(integer)]
        );
    }
}
