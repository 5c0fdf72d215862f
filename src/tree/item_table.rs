use indexmap::map::Entry;
use indexmap::IndexMap;
use thiserror::Error;

use crate::names::Name;
use crate::tree::{DeclId, ScopeId};

/// The items declared directly in one scope, in declaration order.
///
/// Values, types and child modules share one namespace.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: IndexMap<Name, DeclId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{name}` is declared more than once in {scope}")]
pub struct DuplicateNameError {
    pub name: Name,
    pub scope: ScopeId,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup a name declared in this scope. Does not look at parents or imports.
    pub fn lookup_local(&self, name: &str) -> Option<DeclId> {
        self.items.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Names and declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Name, DeclId)> + '_ {
        self.items.iter().map(|(name, decl)| (name, *decl))
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> + '_ {
        self.items.keys()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `scope` is only used for the error
    pub(crate) fn insert(
        &mut self,
        name: Name,
        decl: DeclId,
        scope: ScopeId
    ) -> Result<(), DuplicateNameError> {
        match self.items.entry(name) {
            Entry::Occupied(entry) => Err(DuplicateNameError { name: entry.key().clone(), scope }),
            Entry::Vacant(entry) => {
                entry.insert(decl);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = ItemTable::new();
        let scope = ScopeId(0);
        table.insert(Name::new("a"), DeclId(0), scope).unwrap();
        table.insert(Name::new("b"), DeclId(1), scope).unwrap();
        assert_eq!(table.lookup_local("a"), Some(DeclId(0)));
        assert_eq!(table.lookup_local("c"), None);
        assert_eq!(table.names().map(Name::as_str).collect::<Vec<_>>(), ["a", "b"]);

        let error = table.insert(Name::new("a"), DeclId(2), scope).unwrap_err();
        assert_eq!(error, DuplicateNameError { name: Name::new("a"), scope });
        // The original survives
        assert_eq!(table.lookup_local("a"), Some(DeclId(0)));
        assert_eq!(table.len(), 2);
    }
}
