use crate::imports::{GlobInsert, ImportCollector, ImportError};
use crate::names::Name;
use crate::path::Path;
use crate::resolve::ResolutionError;
use crate::tree::{DeclId, ScopeId};

impl<'a> ImportCollector<'a> {
    /// `use path::*` in `importing`
    pub fn expand_glob_path(&mut self, importing: ScopeId, path: &Path) -> Result<(), ImportError> {
        let target = self.resolver.resolve_module(path, importing)?;
        self.expand_glob(importing, target)
    }

    /// Import every name of `target` which `importing` can see.
    ///
    /// Names hidden from `importing` are skipped. Explicit imports of `importing` always win over
    /// glob-imported names, whichever comes first. Besides `target`'s own items this also brings
    /// in its re-exports, including ones recorded after this glob (see [ImportCollector::finish]).
    /// A name offered by two globs with different targets becomes ambiguous.
    pub fn expand_glob(&mut self, importing: ScopeId, target: ScopeId) -> Result<(), ImportError> {
        let tree = self.tree();
        let visibility = self.resolver.visibility();
        if let Some(blocking) = visibility.first_blocking(target, importing) {
            let declaration = tree.decl(blocking);
            return Err(ImportError::Unresolved(ResolutionError::PrivateItem {
                name: declaration.name.clone(),
                decl: blocking,
                declaring_scope: declaration.owner
            }));
        }
        if importing == target {
            log::debug!("ignoring glob import of {} into itself", tree.display_scope(target));
            return Ok(());
        }

        let offered = tree.items(target).iter()
            .filter(|(name, decl)| {
                let visible = visibility.permits(tree.decl(*decl).visibility, target, importing);
                if !visible {
                    log::trace!("glob skips {} (not visible from {})", name, tree.display_scope(importing));
                }
                visible
            })
            .map(|(name, decl)| (name.clone(), decl))
            .collect::<Vec<(Name, DeclId)>>();
        self.offer(importing, target, offered);
        self.offer_reexports(importing, target);
        self.tables.record_glob(importing, target);
        Ok(())
    }

    /// Offer every recorded glob its target's re-exports again, so a `pub use` issued after a
    /// glob of its scope still reaches the importing scope.
    ///
    /// Globs never add re-exports, so one pass is enough.
    pub(crate) fn settle_globs(&mut self) {
        let globs = self.tables.globs().collect::<Vec<_>>();
        for (importing, target) in globs {
            self.offer_reexports(importing, target);
        }
    }

    /// Re-exports are public, so only items `target` declares itself can hide them
    fn offer_reexports(&mut self, importing: ScopeId, target: ScopeId) {
        let items = self.tree().items(target);
        let offered = self.tables.get(target).reexports()
            .filter(|(alias, _)| !items.contains(alias.as_str()))
            .map(|(alias, decl)| (alias.clone(), decl))
            .collect::<Vec<(Name, DeclId)>>();
        self.offer(importing, target, offered);
    }

    fn offer(&mut self, importing: ScopeId, target: ScopeId, offered: Vec<(Name, DeclId)>) {
        let tree = self.tree();
        let table = self.tables.get_mut(importing);
        for (name, decl) in offered {
            match table.insert_glob(name.clone(), decl, target) {
                GlobInsert::Inserted | GlobInsert::AlreadyPresent => {}
                GlobInsert::Shadowed => log::trace!(
                    "glob import of {} shadowed by explicit import in {}",
                    name,
                    tree.display_scope(importing)
                ),
                GlobInsert::MadeAmbiguous => log::debug!(
                    "`{}` is now ambiguous in {} (also glob-imported from {})",
                    name,
                    tree.display_scope(importing),
                    tree.display_scope(target)
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::imports::ImportEntry;
    use crate::tree::{ItemKind, ModuleTree, PayloadId, Visibility};

    use super::*;

    fn path(path: &str) -> Path {
        path.parse().unwrap()
    }

    #[test]
    fn test_glob_skips_hidden_names() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let a = tree.declare_module(root, "a", Visibility::Public).unwrap();
        let b = tree.declare_module(root, "b", Visibility::Public).unwrap();
        let x = tree.declare(a, "x", ItemKind::Value(PayloadId(0)), Visibility::Public).unwrap();
        tree.declare(a, "hidden", ItemKind::Value(PayloadId(1)), Visibility::Private).unwrap();
        let inner = tree.declare_module(a, "inner", Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.expand_glob_path(b, &path("crate::a")).unwrap();
        let tables = collector.finish();
        let table = tables.get(b);
        assert_eq!(table.get("x"), Some(&ImportEntry::Glob { target: x, source: a }));
        assert_eq!(table.get("hidden"), None);
        assert_eq!(table.get("inner").and_then(ImportEntry::target), tree.scope_decl(inner));
    }

    #[test]
    fn test_glob_of_unreachable_scope() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let a = tree.declare_module(root, "a", Visibility::Public).unwrap();
        let private = tree.declare_module(a, "private", Visibility::Private).unwrap();
        let b = tree.declare_module(root, "b", Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        assert_eq!(
            collector.expand_glob(b, private),
            Err(ImportError::Unresolved(ResolutionError::PrivateItem {
                name: Name::new("private"),
                decl: tree.scope_decl(private).unwrap(),
                declaring_scope: a
            }))
        );
        assert!(matches!(
            collector.expand_glob_path(b, &path("crate::a::nothing")),
            Err(ImportError::Unresolved(ResolutionError::UnresolvedSegment { .. }))
        ));
        assert!(collector.tables().get(b).is_empty());
    }

    #[test]
    fn test_glob_brings_reexports() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let facade = tree.declare_module(root, "facade", Visibility::Public).unwrap();
        let imp = tree.declare_module(facade, "imp", Visibility::Private).unwrap();
        let thing = tree.declare(imp, "Thing", ItemKind::Type(PayloadId(0)), Visibility::Public).unwrap();
        let user = tree.declare_module(root, "user", Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.bring_into_scope(facade, &path("imp::Thing"), None, true).unwrap();
        collector.expand_glob(user, facade).unwrap();
        let tables = collector.finish();
        // `imp` is private to `facade`, so only the re-export makes it through
        assert_eq!(tables.get(user).get("imp"), None);
        assert_eq!(tables.get(user).get("Thing"), Some(&ImportEntry::Glob { target: thing, source: facade }));
    }

    #[test]
    fn test_glob_brings_later_reexports() {
        let mut tree = ModuleTree::new();
        let root = tree.root();
        let facade = tree.declare_module(root, "facade", Visibility::Public).unwrap();
        let imp = tree.declare_module(facade, "imp", Visibility::Private).unwrap();
        let thing = tree.declare(imp, "Thing", ItemKind::Type(PayloadId(0)), Visibility::Public).unwrap();
        let user = tree.declare_module(root, "user", Visibility::Public).unwrap();

        let mut collector = ImportCollector::new(&tree);
        collector.expand_glob(user, facade).unwrap();
        collector.bring_into_scope(facade, &path("imp::Thing"), None, true).unwrap();
        // Not yet: the glob ran before the re-export existed
        assert_eq!(collector.tables().get(user).get("Thing"), None);
        let tables = collector.finish();
        assert_eq!(tables.get(user).get("Thing"), Some(&ImportEntry::Glob { target: thing, source: facade }));
        assert_eq!(tables.globs().collect::<Vec<_>>(), vec![(user, facade)]);
    }
}
