use thiserror::Error;

use crate::names::Name;
use crate::path::{Path, RootKind};
use crate::tree::{DeclId, ModuleTree, ScopeId};

/// Who can see what
pub mod visibility;

pub use visibility::VisibilityChecker;

/// Resolves paths against a [ModuleTree], enforcing visibility.
///
/// Paths only walk declared items: `use`-introduced names are never followed by a path segment.
/// See [crate::imports::NameLookup] for lookups which do consider imports.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tree: &'a ModuleTree,
    visibility: VisibilityChecker<'a>,
}

/// Why a path or name failed to resolve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("cannot find `{name}` in {at_scope}")]
    UnresolvedSegment { name: Name, at_scope: ScopeId },
    #[error("`{name}` ({decl}) is not a module")]
    NotAModule { name: Name, decl: DeclId },
    #[error("`{name}` ({decl}) is private to {declaring_scope}")]
    PrivateItem { name: Name, decl: DeclId, declaring_scope: ScopeId },
    #[error("too many `super`s: {requested} requested but only {available} parent(s) above")]
    TooManySupers { requested: usize, available: usize },
    #[error("unknown root `{name}`")]
    UnknownRoot { name: Name },
    #[error("`{name}` is ambiguous: glob-imported from {} places", .candidates.len())]
    AmbiguousGlobImport { name: Name, candidates: Vec<DeclId> },
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ModuleTree) -> Self {
        Self { tree, visibility: VisibilityChecker::new(tree) }
    }

    pub fn tree(&self) -> &'a ModuleTree {
        self.tree
    }

    pub fn visibility(&self) -> VisibilityChecker<'a> {
        self.visibility
    }

    /// Resolve `path` as written in `origin` to the declaration it names.
    ///
    /// Stops at the first segment which is missing, not a module (when more segments follow),
    /// or not visible from `origin`.
    pub fn resolve(&self, path: &Path, origin: ScopeId) -> Result<DeclId, ResolutionError> {
        let result = self.resolve_parent(path, origin)
            .and_then(|scope| self.resolve_last(scope, path.last(), origin));
        self.log_result(path, origin, &result);
        result
    }

    /// Resolve `path` and require that it names a module
    pub fn resolve_module(&self, path: &Path, origin: ScopeId) -> Result<ScopeId, ResolutionError> {
        let decl = self.resolve(path, origin)?;
        self.tree.decl(decl).as_scope().ok_or_else(|| ResolutionError::NotAModule {
            name: path.last().clone(),
            decl
        })
    }

    /// Resolve every segment except the last, which must all be modules, and return the scope
    /// the last segment would be looked up in
    pub fn resolve_parent(&self, path: &Path, origin: ScopeId) -> Result<ScopeId, ResolutionError> {
        let mut scope = self.start_scope(&path.root, origin)?;
        for segment in path.prefix() {
            let decl = self.lookup(scope, segment)?;
            let declaration = self.tree.decl(decl);
            let Some(child) = declaration.as_scope() else {
                return Err(ResolutionError::NotAModule { name: segment.clone(), decl });
            };
            self.check_visible(decl, origin)?;
            log::trace!("  {} -> {}", segment, self.tree.display_scope(child));
            scope = child;
        }
        Ok(scope)
    }

    /// Where the first segment of a path with `root` is looked up, when written in `origin`
    pub fn start_scope(&self, root: &RootKind, origin: ScopeId) -> Result<ScopeId, ResolutionError> {
        match root {
            RootKind::Absolute => Ok(self.tree.root()),
            RootKind::RelativeSelf => Ok(origin),
            RootKind::RelativeSuper(levels) => {
                self.tree.nth_ancestor(origin, levels.get()).ok_or_else(|| ResolutionError::TooManySupers {
                    requested: levels.get(),
                    available: self.tree.depth(origin)
                })
            }
            RootKind::ExternalRoot(name) if self.tree.crate_name() == Some(name) => Ok(self.tree.root()),
            RootKind::ExternalRoot(name) => Err(ResolutionError::UnknownRoot { name: name.clone() }),
        }
    }

    /// Look up the final segment of a path in `scope`: any kind of declaration, if visible
    pub(crate) fn resolve_last(
        &self,
        scope: ScopeId,
        name: &Name,
        origin: ScopeId
    ) -> Result<DeclId, ResolutionError> {
        let decl = self.lookup(scope, name)?;
        self.check_visible(decl, origin)?;
        Ok(decl)
    }

    fn lookup(&self, scope: ScopeId, name: &Name) -> Result<DeclId, ResolutionError> {
        self.tree.lookup_local(scope, name.as_str()).ok_or_else(|| ResolutionError::UnresolvedSegment {
            name: name.clone(),
            at_scope: scope
        })
    }

    /// Only checks the declaration itself: walking down to it already checked the modules above
    fn check_visible(&self, decl: DeclId, origin: ScopeId) -> Result<(), ResolutionError> {
        let declaration = self.tree.decl(decl);
        if self.visibility.permits(declaration.visibility, declaration.owner, origin) {
            Ok(())
        } else {
            Err(ResolutionError::PrivateItem {
                name: declaration.name.clone(),
                decl,
                declaring_scope: declaration.owner
            })
        }
    }

    fn log_result(&self, path: &Path, origin: ScopeId, result: &Result<DeclId, ResolutionError>) {
        match result {
            Ok(decl) => log::trace!(
                "resolved {} from {} to {}",
                path,
                self.tree.display_scope(origin),
                self.tree.display_decl(*decl)
            ),
            Err(error) => log::debug!(
                "failed to resolve {} from {}: {}",
                path,
                self.tree.display_scope(origin),
                error
            ),
        }
    }
}
