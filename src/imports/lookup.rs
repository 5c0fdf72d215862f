use crate::imports::{ImportEntry, ImportTables};
use crate::names::Name;
use crate::path::Path;
use crate::resolve::{ResolutionError, Resolver};
use crate::tree::{DeclId, ModuleTree, ScopeId};

/// Looks up names through imports. Only trustworthy once every import has been collected.
#[derive(Debug, Clone, Copy)]
pub struct NameLookup<'a> {
    resolver: Resolver<'a>,
    imports: &'a ImportTables,
}

impl<'a> NameLookup<'a> {
    pub fn new(tree: &'a ModuleTree, imports: &'a ImportTables) -> Self {
        Self { resolver: Resolver::new(tree), imports }
    }

    pub fn resolver(&self) -> Resolver<'a> {
        self.resolver
    }

    /// What a bare `name` written in `scope` refers to.
    ///
    /// The scope's imports come first, then its own items. An ambiguous glob-imported name is an
    /// error even if the scope also declares it.
    pub fn resolve_via_imports(&self, name: &str, scope: ScopeId) -> Result<DeclId, ResolutionError> {
        let tree = self.resolver.tree();
        match self.imports.get(scope).get(name) {
            Some(ImportEntry::Explicit { target, .. } | ImportEntry::Glob { target, .. }) => Ok(*target),
            Some(ImportEntry::Ambiguous { candidates }) => {
                log::debug!("`{}` is ambiguous in {}", name, tree.display_scope(scope));
                Err(ResolutionError::AmbiguousGlobImport {
                    name: Name::new(name),
                    candidates: candidates.iter().map(|candidate| candidate.target).collect()
                })
            }
            None => tree.lookup_local(scope, name).ok_or_else(|| ResolutionError::UnresolvedSegment {
                name: Name::new(name),
                at_scope: scope
            }),
        }
    }

    /// A `pub use` alias of `scope`, as seen from `requester`.
    ///
    /// Re-exports are public, so this only requires that `requester` can reach `scope`.
    pub fn lookup_reexport(
        &self,
        scope: ScopeId,
        name: &str,
        requester: ScopeId
    ) -> Result<DeclId, ResolutionError> {
        let tree = self.resolver.tree();
        if let Some(blocking) = self.resolver.visibility().first_blocking(scope, requester) {
            let declaration = tree.decl(blocking);
            return Err(ResolutionError::PrivateItem {
                name: declaration.name.clone(),
                decl: blocking,
                declaring_scope: declaration.owner
            });
        }
        match self.imports.get(scope).get(name) {
            Some(ImportEntry::Explicit { target, reexport: true }) => Ok(*target),
            _ => Err(ResolutionError::UnresolvedSegment { name: Name::new(name), at_scope: scope }),
        }
    }

    /// Like [Resolver::resolve], but if the last segment isn't declared in the scope the rest
    /// of the path leads to, it may name a re-export of that scope instead
    pub fn resolve_with_reexports(&self, path: &Path, origin: ScopeId) -> Result<DeclId, ResolutionError> {
        let scope = self.resolver.resolve_parent(path, origin)?;
        let name = path.last();
        if self.resolver.tree().items(scope).contains(name.as_str()) {
            return self.resolver.resolve_last(scope, name, origin);
        }
        match self.imports.get(scope).get(name.as_str()) {
            Some(ImportEntry::Explicit { target, reexport: true }) => {
                log::trace!("{} resolved through re-export in {}", path, self.resolver.tree().display_scope(scope));
                Ok(*target)
            }
            _ => Err(ResolutionError::UnresolvedSegment { name: name.clone(), at_scope: scope }),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::imports::ImportCollector;
    use crate::tree::{ItemKind, PayloadId, Visibility};

    use super::*;

    fn path(path: &str) -> Path {
        path.parse().unwrap()
    }

    #[test]
    fn test_lookup_order() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let a = tree.declare_module(root, "a", Visibility::Public).unwrap();
        let other = tree.declare_module(root, "other", Visibility::Public).unwrap();
        let b = tree.declare_module(root, "b", Visibility::Public).unwrap();
        tree.declare(a, "x", ItemKind::Value(PayloadId(0)), Visibility::Public).unwrap();
        let a_y = tree.declare(a, "y", ItemKind::Value(PayloadId(1)), Visibility::Public).unwrap();
        let a_z = tree.declare(a, "z", ItemKind::Value(PayloadId(2)), Visibility::Public).unwrap();
        let other_x = tree.declare(other, "x", ItemKind::Value(PayloadId(3)), Visibility::Public).unwrap();
        tree.declare(b, "z", ItemKind::Value(PayloadId(4)), Visibility::Private).unwrap();
        let only_local = tree.declare(b, "only_local", ItemKind::Value(PayloadId(5)), Visibility::Private).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.bring_into_scope(b, &path("crate::other::x"), None, false).unwrap();
        collector.expand_glob(b, a).unwrap();
        let imports = collector.finish();
        let lookup = NameLookup::new(&tree, &imports);

        assert_eq!(lookup.resolve_via_imports("x", b), Ok(other_x));
        assert_eq!(lookup.resolve_via_imports("y", b), Ok(a_y));
        // Globs shadow local items
        assert_eq!(lookup.resolve_via_imports("z", b), Ok(a_z));
        assert_eq!(lookup.resolve_via_imports("only_local", b), Ok(only_local));
        assert_eq!(
            lookup.resolve_via_imports("w", b),
            Err(ResolutionError::UnresolvedSegment { name: Name::new("w"), at_scope: b })
        );
    }

    #[test]
    fn test_reexports() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let facade = tree.declare_module(root, "facade", Visibility::Public).unwrap();
        let imp = tree.declare_module(facade, "imp", Visibility::Private).unwrap();
        let thing = tree.declare(imp, "Thing", ItemKind::Type(PayloadId(0)), Visibility::Public).unwrap();
        let helper = tree.declare(imp, "helper", ItemKind::Value(PayloadId(1)), Visibility::Public).unwrap();
        let closed = tree.declare_module(root, "closed", Visibility::Private).unwrap();
        let closed_inner = tree.declare_module(closed, "inner", Visibility::Private).unwrap();
        tree.declare(closed_inner, "item", ItemKind::Value(PayloadId(2)), Visibility::Public).unwrap();
        let user = tree.declare_module(root, "user", Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.bring_into_scope(facade, &path("imp::Thing"), None, true).unwrap();
        collector.bring_into_scope(facade, &path("imp::helper"), None, false).unwrap();
        collector.bring_into_scope(closed, &path("inner::item"), None, true).unwrap();
        let imports = collector.finish();
        let lookup = NameLookup::new(&tree, &imports);

        assert_eq!(lookup.resolve_with_reexports(&path("crate::facade::Thing"), user), Ok(thing));
        assert_eq!(lookup.lookup_reexport(facade, "Thing", user), Ok(thing));
        // The underlying path is still private
        assert!(matches!(
            lookup.resolver().resolve(&path("crate::facade::imp::Thing"), user),
            Err(ResolutionError::PrivateItem { .. })
        ));
        // Plain imports aren't re-exported
        assert!(matches!(
            lookup.resolve_with_reexports(&path("crate::facade::helper"), user),
            Err(ResolutionError::UnresolvedSegment { .. })
        ));
        assert_eq!(lookup.resolve_via_imports("helper", facade), Ok(helper));
        // Private at the root is visible everywhere, but `closed::inner` isn't
        assert!(lookup.lookup_reexport(closed, "item", user).is_ok());
        assert!(matches!(
            lookup.lookup_reexport(closed_inner, "item", user),
            Err(ResolutionError::PrivateItem { .. })
        ));
    }

    #[test]
    fn test_ambiguity_beats_local_items() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let a1 = tree.declare_module(root, "a1", Visibility::Public).unwrap();
        let a2 = tree.declare_module(root, "a2", Visibility::Public).unwrap();
        let b = tree.declare_module(root, "b", Visibility::Public).unwrap();
        let z1 = tree.declare(a1, "z", ItemKind::Value(PayloadId(0)), Visibility::Public).unwrap();
        let z2 = tree.declare(a2, "z", ItemKind::Value(PayloadId(1)), Visibility::Public).unwrap();
        tree.declare(b, "z", ItemKind::Value(PayloadId(2)), Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.expand_glob(b, a1).unwrap();
        collector.expand_glob(b, a2).unwrap();
        let imports = collector.finish();
        let lookup = NameLookup::new(&tree, &imports);

        assert_eq!(
            lookup.resolve_via_imports("z", b),
            Err(ResolutionError::AmbiguousGlobImport { name: Name::new("z"), candidates: vec![z1, z2] })
        );
    }
}
