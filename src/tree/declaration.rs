use derive_more::Display;

use crate::names::Name;

/// Handle to a scope in a [ModuleTree](crate::tree::ModuleTree).
///
/// Only meaningful for the tree which issued it. Handles are never reused.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "scope#{}", _0)]
pub struct ScopeId(pub(crate) u32);

/// Handle to a declaration in a [ModuleTree](crate::tree::ModuleTree)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "decl#{}", _0)]
pub struct DeclId(pub(crate) u32);

/// What a value or type declaration "is", as far as downstream passes care.
///
/// The resolver never interprets it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "payload#{}", _0)]
pub struct PayloadId(pub u32);

impl ScopeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl DeclId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Who can name a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible within the declaring scope and all of its descendants
    Private,
    /// Visible from anywhere which can reach the declaring scope
    Public,
    /// Visible within the subtree of the given scope (and the declaring scope's own subtree)
    PublicRestricted(ScopeId),
}

/// The kind of item being declared. See [DeclKind] for the stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Value(PayloadId),
    Type(PayloadId),
    /// A child module. Declaring one creates the child scope.
    Module,
}

/// A declared item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Value(PayloadId),
    Type(PayloadId),
    ChildScope(ScopeId),
}

/// One named item in one scope. Immutable once declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Name,
    /// Scope whose item table holds this declaration
    pub owner: ScopeId,
    pub visibility: Visibility,
    pub kind: DeclKind,
}

impl Declaration {
    /// The child scope, if this declares a module
    pub fn as_scope(&self) -> Option<ScopeId> {
        match self.kind {
            DeclKind::ChildScope(scope) => Some(scope),
            DeclKind::Value(_) | DeclKind::Type(_) => None,
        }
    }

    /// User-facing label
    pub fn kind_str(&self) -> &'static str {
        match self.kind {
            DeclKind::Value(_) => "value",
            DeclKind::Type(_) => "type",
            DeclKind::ChildScope(_) => "module",
        }
    }
}
