use std::fmt::{Display, Formatter};
use std::iter::successors;

use smallvec::SmallVec;

use crate::names::Name;
use crate::tree::{DeclId, DeclKind, Declaration, DuplicateNameError, ItemKind, ItemTable, ScopeId, Visibility};

/// The hierarchy of scopes and everything declared in them.
///
/// Scopes and declarations live in arenas and refer to each other by handle: a child scope's
/// declaration points down (via [DeclKind::ChildScope]) and the child points back up to its
/// parent. Built once, then only read, so it can be shared between threads freely.
///
/// Methods taking a [ScopeId] or [DeclId] panic if the handle came from a different tree.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    scopes: Vec<ScopeData>,
    decls: Vec<Declaration>,
    /// Name other trees would use for this one, so `::<crate_name>::a` means `crate::a`
    crate_name: Option<Name>,
}

#[derive(Debug, Clone)]
struct ScopeData {
    parent: Option<ScopeId>,
    /// The declaration which names this scope. `None` for the root
    decl: Option<DeclId>,
    items: ItemTable,
    children: Vec<ScopeId>,
}

/// Displays a scope as an absolute path, e.g. `crate::a::b`
#[derive(Debug, Clone, Copy)]
pub struct DisplayScope<'a> {
    tree: &'a ModuleTree,
    scope: ScopeId,
}

/// Displays a declaration as an absolute path, e.g. `crate::a::helper`
#[derive(Debug, Clone, Copy)]
pub struct DisplayDecl<'a> {
    tree: &'a ModuleTree,
    decl: DeclId,
}

impl ModuleTree {
    pub const ROOT: ScopeId = ScopeId(0);

    /// Create a tree with only the (empty) root scope
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData::new(None, None)],
            decls: Vec::new(),
            crate_name: None,
        }
    }

    /// Create a tree which other trees refer to as `crate_name`
    pub fn with_crate_name(crate_name: impl Into<Name>) -> Self {
        Self {
            crate_name: Some(crate_name.into()),
            ..Self::new()
        }
    }

    pub fn root(&self) -> ScopeId {
        Self::ROOT
    }

    pub fn crate_name(&self) -> Option<&Name> {
        self.crate_name.as_ref()
    }

    /// Declare an item in `scope`. If it's a [ItemKind::Module] this also creates the child scope.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: impl Into<Name>,
        kind: ItemKind,
        visibility: Visibility
    ) -> Result<DeclId, DuplicateNameError> {
        let name = name.into();
        let decl = DeclId(self.decls.len() as u32);
        self.scope_data_mut(scope).items.insert(name.clone(), decl, scope)?;
        let kind = match kind {
            ItemKind::Value(payload) => DeclKind::Value(payload),
            ItemKind::Type(payload) => DeclKind::Type(payload),
            ItemKind::Module => {
                let child = ScopeId(self.scopes.len() as u32);
                self.scopes.push(ScopeData::new(Some(scope), Some(decl)));
                self.scope_data_mut(scope).children.push(child);
                DeclKind::ChildScope(child)
            }
        };
        log::trace!("declared {} {} in {}", visibility_str(visibility), name, self.display_scope(scope));
        self.decls.push(Declaration { name, owner: scope, visibility, kind });
        Ok(decl)
    }

    /// Declare a child module and return its scope
    pub fn declare_module(
        &mut self,
        scope: ScopeId,
        name: impl Into<Name>,
        visibility: Visibility
    ) -> Result<ScopeId, DuplicateNameError> {
        let decl = self.declare(scope, name, ItemKind::Module, visibility)?;
        Ok(self.decl(decl).as_scope().expect("just declared a module"))
    }

    pub fn decl(&self, decl: DeclId) -> &Declaration {
        &self.decls[decl.index()]
    }

    pub fn items(&self, scope: ScopeId) -> &ItemTable {
        &self.scope_data(scope).items
    }

    /// [ItemTable::lookup_local] for `scope`
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        self.items(scope).lookup_local(name)
    }

    /// Parent scope, `None` for the root
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope_data(scope).parent
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scope_data(scope).children
    }

    /// The declaration which names `scope` in its parent, `None` for the root
    pub fn scope_decl(&self, scope: ScopeId) -> Option<DeclId> {
        self.scope_data(scope).decl
    }

    /// `scope`, its parent, its grandparent, ... ending at the root
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        successors(Some(scope), move |scope| self.parent(*scope))
    }

    /// Walk `n` parents up from `scope`, `None` if that goes above the root
    pub fn nth_ancestor(&self, scope: ScopeId, n: usize) -> Option<ScopeId> {
        self.ancestors(scope).nth(n)
    }

    /// Number of parents between `scope` and the root
    pub fn depth(&self, scope: ScopeId) -> usize {
        self.ancestors(scope).count() - 1
    }

    /// Whether `scope` is `ancestor` or one of its descendants
    pub fn is_within(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|scope| scope == ancestor)
    }

    /// All scopes, parents before children
    pub fn scopes(&self) -> impl Iterator<Item = ScopeId> {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    pub fn num_scopes(&self) -> usize {
        self.scopes.len()
    }

    pub fn num_decls(&self) -> usize {
        self.decls.len()
    }

    /// Names of the modules from the root down to `scope`. Empty for the root.
    pub fn scope_segments(&self, scope: ScopeId) -> SmallVec<[&Name; 4]> {
        let mut segments = self.ancestors(scope)
            .filter_map(|scope| self.scope_decl(scope))
            .map(|decl| &self.decl(decl).name)
            .collect::<SmallVec<[&Name; 4]>>();
        segments.reverse();
        segments
    }

    /// Find a scope from its module names, ignoring visibility.
    ///
    /// This is how external input (which names scopes by path) is mapped onto the tree; it is
    /// not path resolution.
    pub fn find_scope<N: AsRef<str>>(&self, segments: &[N]) -> Option<ScopeId> {
        segments.iter().try_fold(self.root(), |scope, segment| {
            let decl = self.lookup_local(scope, segment.as_ref())?;
            self.decl(decl).as_scope()
        })
    }

    pub fn display_scope(&self, scope: ScopeId) -> DisplayScope<'_> {
        DisplayScope { tree: self, scope }
    }

    pub fn display_decl(&self, decl: DeclId) -> DisplayDecl<'_> {
        DisplayDecl { tree: self, decl }
    }

    fn scope_data(&self, scope: ScopeId) -> &ScopeData {
        &self.scopes[scope.index()]
    }

    fn scope_data_mut(&mut self, scope: ScopeId) -> &mut ScopeData {
        &mut self.scopes[scope.index()]
    }
}

impl Default for ModuleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeData {
    fn new(parent: Option<ScopeId>, decl: Option<DeclId>) -> Self {
        Self {
            parent,
            decl,
            items: ItemTable::new(),
            children: Vec::new(),
        }
    }
}

fn visibility_str(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Private => "private",
        Visibility::Public => "public",
        Visibility::PublicRestricted(_) => "restricted",
    }
}

impl<'a> Display for DisplayScope<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "crate")?;
        for segment in self.tree.scope_segments(self.scope) {
            write!(f, "::{}", segment)?;
        }
        Ok(())
    }
}

impl<'a> Display for DisplayDecl<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let decl = self.tree.decl(self.decl);
        write!(f, "{}::{}", self.tree.display_scope(decl.owner), decl.name)
    }
}
