use crate::tree::{DeclId, ModuleTree, ScopeId, Visibility};

/// Decides whether a scope may name a declaration.
///
/// A declaration is accessible from a requester when its own visibility permits the requester
/// *and* every module declaration from the root down to the declaring scope does too.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityChecker<'a> {
    tree: &'a ModuleTree,
}

impl<'a> VisibilityChecker<'a> {
    pub fn new(tree: &'a ModuleTree) -> Self {
        Self { tree }
    }

    /// Whether `visibility` on an item in `declaring` lets `requester` see it. Only checks the
    /// item itself, not whether `declaring` is reachable.
    pub fn permits(&self, visibility: Visibility, declaring: ScopeId, requester: ScopeId) -> bool {
        match visibility {
            Visibility::Public => true,
            Visibility::Private => self.tree.is_within(requester, declaring),
            Visibility::PublicRestricted(restricted_to) => {
                self.tree.is_within(requester, restricted_to) || self.tree.is_within(requester, declaring)
            }
        }
    }

    /// Whether `requester` can name `decl`, including every module on the way to it
    pub fn is_accessible(&self, decl: DeclId, requester: ScopeId) -> bool {
        let declaration = self.tree.decl(decl);
        self.permits(declaration.visibility, declaration.owner, requester)
            && self.is_scope_reachable(declaration.owner, requester)
    }

    /// Whether `requester` can name `scope` (the root is always reachable)
    pub fn is_scope_reachable(&self, scope: ScopeId, requester: ScopeId) -> bool {
        self.first_blocking(scope, requester).is_none()
    }

    /// The outermost module declaration between the root and `scope` (inclusive) which hides
    /// `scope` from `requester`, if any. This is where walking down from the root would fail.
    pub fn first_blocking(&self, scope: ScopeId, requester: ScopeId) -> Option<DeclId> {
        // ancestors go inside-out, so the last hit is the outermost
        self.tree.ancestors(scope)
            .filter_map(|scope| self.tree.scope_decl(scope))
            .filter(|decl| {
                let declaration = self.tree.decl(*decl);
                !self.permits(declaration.visibility, declaration.owner, requester)
            })
            .last()
    }
}
