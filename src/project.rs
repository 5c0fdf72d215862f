use thiserror::Error;

use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, ToDiagnostic};
use crate::imports::{ImportCollector, ImportError, ImportTables, NameLookup};
use crate::names::Name;
use crate::path::{Path, PathParseError};
use crate::resolve::{ResolutionError, Resolver};
use crate::tree::{DeclId, DuplicateNameError, ItemKind, ModuleTree, ScopeId, Visibility};

/// "Declare `name` in the scope at `scope`", from whatever collects declarations out of source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclDirective {
    /// Module names from the root, empty for the root itself
    pub scope: Vec<Name>,
    pub name: Name,
    pub kind: ItemKind,
    pub visibility: Visibility,
}

/// "`use path as alias`" (or `pub use` if `reexport`) written in the scope at `scope`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub scope: Vec<Name>,
    pub path: Path,
    pub alias: Option<Name>,
    pub reexport: bool,
}

/// "`use target::*`" written in the scope at `scope`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobDirective {
    pub scope: Vec<Name>,
    pub target: Path,
}

/// Declaration phase: builds the module tree.
#[derive(Debug)]
pub struct ProjectBuilder {
    config: ResolverConfig,
    tree: ModuleTree,
}

/// Import phase: the tree is final, `use`s are being recorded.
#[derive(Debug)]
pub struct ImportPhase {
    config: ResolverConfig,
    tree: ModuleTree,
    imports: ImportTables,
}

/// A fully built project. Read-only, so it can be queried from many threads at once.
#[derive(Debug)]
pub struct Project {
    config: ResolverConfig,
    tree: ModuleTree,
    imports: ImportTables,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// A directive named a scope which hasn't been declared (yet)
    #[error("unknown scope `{path}`")]
    UnknownScope { path: String },
    #[error(transparent)]
    Duplicate(#[from] DuplicateNameError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Path(#[from] PathParseError),
}

impl DeclDirective {
    pub fn new<N: Into<Name>>(
        scope: impl IntoIterator<Item = N>,
        name: impl Into<Name>,
        kind: ItemKind,
        visibility: Visibility
    ) -> Self {
        Self { scope: crate::names::names(scope), name: name.into(), kind, visibility }
    }
}

impl ImportDirective {
    pub fn new<N: Into<Name>>(
        scope: impl IntoIterator<Item = N>,
        path: Path,
        alias: Option<Name>,
        reexport: bool
    ) -> Self {
        Self { scope: crate::names::names(scope), path, alias, reexport }
    }
}

impl GlobDirective {
    pub fn new<N: Into<Name>>(scope: impl IntoIterator<Item = N>, target: Path) -> Self {
        Self { scope: crate::names::names(scope), target }
    }
}

impl ProjectBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        let tree = match &config.crate_name {
            Some(crate_name) => ModuleTree::with_crate_name(crate_name),
            None => ModuleTree::new(),
        };
        Self { config, tree }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn tree(&self) -> &ModuleTree {
        &self.tree
    }

    /// Direct access, for callers which already have scope handles
    pub fn tree_mut(&mut self) -> &mut ModuleTree {
        &mut self.tree
    }

    pub fn scope(&self, segments: &[Name]) -> Result<ScopeId, ProjectError> {
        find_scope(&self.tree, segments)
    }

    pub fn declare(&mut self, directive: DeclDirective) -> Result<DeclId, ProjectError> {
        let result = self.scope(&directive.scope).and_then(|scope| {
            Ok(self.tree.declare(scope, directive.name, directive.kind, directive.visibility)?)
        });
        report(&self.config, &self.tree, result)
    }

    /// Declare in order, stopping at the first failure
    pub fn declare_all(&mut self, directives: impl IntoIterator<Item = DeclDirective>) -> Result<(), ProjectError> {
        for directive in directives {
            self.declare(directive)?;
        }
        Ok(())
    }

    /// Freeze the tree and move on to imports
    pub fn finish_declarations(self) -> ImportPhase {
        log::debug!(
            "module tree done: {} scope(s), {} declaration(s)",
            self.tree.num_scopes(),
            self.tree.num_decls()
        );
        let imports = ImportTables::new(&self.tree);
        ImportPhase { config: self.config, tree: self.tree, imports }
    }
}

impl ImportPhase {
    pub fn tree(&self) -> &ModuleTree {
        &self.tree
    }

    pub fn scope(&self, segments: &[Name]) -> Result<ScopeId, ProjectError> {
        find_scope(&self.tree, segments)
    }

    pub fn import(&mut self, directive: ImportDirective) -> Result<DeclId, ProjectError> {
        let ImportDirective { scope, path, alias, reexport } = directive;
        let result = self.scope(&scope).and_then(|scope| {
            Ok(self.collect(|collector| collector.bring_into_scope(scope, &path, alias, reexport))?)
        });
        report(&self.config, &self.tree, result)
    }

    pub fn glob(&mut self, directive: GlobDirective) -> Result<(), ProjectError> {
        let GlobDirective { scope, target } = directive;
        let result = self.scope(&scope).and_then(|scope| {
            Ok(self.collect(|collector| collector.expand_glob_path(scope, &target))?)
        });
        report(&self.config, &self.tree, result)
    }

    /// Import in order, stopping at the first failure
    pub fn import_all(&mut self, directives: impl IntoIterator<Item = ImportDirective>) -> Result<(), ProjectError> {
        for directive in directives {
            self.import(directive)?;
        }
        Ok(())
    }

    /// Glob-import in order, stopping at the first failure
    pub fn glob_all(&mut self, directives: impl IntoIterator<Item = GlobDirective>) -> Result<(), ProjectError> {
        for directive in directives {
            self.glob(directive)?;
        }
        Ok(())
    }

    /// Every import has been seen: lookups through imports are now final
    pub fn finish(self) -> Project {
        let imports = ImportCollector::resume(&self.tree, self.imports).finish();
        Project { config: self.config, tree: self.tree, imports }
    }

    fn collect<T>(
        &mut self,
        f: impl FnOnce(&mut ImportCollector<'_>) -> Result<T, ImportError>
    ) -> Result<T, ImportError> {
        let mut collector = ImportCollector::resume(&self.tree, std::mem::take(&mut self.imports));
        let result = f(&mut collector);
        self.imports = collector.suspend();
        result
    }
}

impl Project {
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn tree(&self) -> &ModuleTree {
        &self.tree
    }

    pub fn imports(&self) -> &ImportTables {
        &self.imports
    }

    /// The scope at the given module names, ignoring visibility
    pub fn scope(&self, segments: &[Name]) -> Option<ScopeId> {
        self.tree.find_scope(segments)
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.tree)
    }

    pub fn lookup(&self) -> NameLookup<'_> {
        NameLookup::new(&self.tree, &self.imports)
    }

    /// [Resolver::resolve]
    pub fn resolve(&self, path: &Path, origin: ScopeId) -> Result<DeclId, ResolutionError> {
        report(&self.config, &self.tree, self.resolver().resolve(path, origin))
    }

    /// Parse `path` with the configured syntax, then [Self::resolve]
    pub fn resolve_str(&self, path: &str, origin: ScopeId) -> Result<DeclId, ProjectError> {
        let path = Path::parse(path, &self.config.path_syntax)?;
        Ok(self.resolve(&path, origin)?)
    }

    /// [NameLookup::resolve_via_imports]
    pub fn resolve_via_imports(&self, name: &str, scope: ScopeId) -> Result<DeclId, ResolutionError> {
        report(&self.config, &self.tree, self.lookup().resolve_via_imports(name, scope))
    }

    /// [NameLookup::resolve_with_reexports]
    pub fn resolve_with_reexports(&self, path: &Path, origin: ScopeId) -> Result<DeclId, ResolutionError> {
        report(&self.config, &self.tree, self.lookup().resolve_with_reexports(path, origin))
    }

    /// Describe an error from this project for a user
    pub fn diagnose(&self, error: &impl ToDiagnostic) -> Diagnostic {
        error.to_diagnostic(&self.tree)
    }
}

impl ToDiagnostic for ProjectError {
    fn to_diagnostic(&self, tree: &ModuleTree) -> Diagnostic {
        match self {
            ProjectError::UnknownScope { path } => Diagnostic::error(format!("unknown scope `{}`", path))
                .with_hint("declare a module before declaring or importing anything in it"),
            ProjectError::Duplicate(error) => error.to_diagnostic(tree),
            ProjectError::Import(error) => error.to_diagnostic(tree),
            ProjectError::Resolution(error) => error.to_diagnostic(tree),
            ProjectError::Path(error) => Diagnostic::error(error.to_string()),
        }
    }
}

fn find_scope(tree: &ModuleTree, segments: &[Name]) -> Result<ScopeId, ProjectError> {
    tree.find_scope(segments).ok_or_else(|| ProjectError::UnknownScope {
        path: std::iter::once("crate")
            .chain(segments.iter().map(Name::as_str))
            .collect::<Vec<_>>()
            .join("::")
    })
}

/// Log the failure if configured to
fn report<T, E: ToDiagnostic>(config: &ResolverConfig, tree: &ModuleTree, result: Result<T, E>) -> Result<T, E> {
    if config.log_diagnostics {
        if let Err(error) = &result {
            error.to_diagnostic(tree).log_to_rust();
        }
    }
    result
}
