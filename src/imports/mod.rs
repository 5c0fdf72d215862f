use thiserror::Error;

use crate::names::Name;
use crate::path::Path;
use crate::resolve::{ResolutionError, Resolver};
use crate::tree::{DeclId, ModuleTree, ScopeId};

/// Import entries and per-scope import tables
mod table;
/// `use target::*`
mod glob;
/// Looking names up through imports once every import is recorded
mod lookup;

pub use table::*;
pub use lookup::*;

/// Records `use` declarations into [ImportTables].
///
/// All imports and globs of a compilation must go through one collector before lookups are
/// trusted: a glob ambiguity is only known once every glob into that scope has been seen.
#[derive(Debug)]
pub struct ImportCollector<'a> {
    resolver: Resolver<'a>,
    tables: ImportTables,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("unresolved import: {0}")]
    Unresolved(#[from] ResolutionError),
    #[error("`{alias}` is already imported in {scope} from a different item ({existing}, not {incoming})")]
    Conflict { alias: Name, scope: ScopeId, existing: DeclId, incoming: DeclId },
}

impl<'a> ImportCollector<'a> {
    pub fn new(tree: &'a ModuleTree) -> Self {
        Self {
            resolver: Resolver::new(tree),
            tables: ImportTables::new(tree),
        }
    }

    /// Keep collecting into tables from an earlier collector over the same tree
    pub fn resume(tree: &'a ModuleTree, tables: ImportTables) -> Self {
        Self { resolver: Resolver::new(tree), tables }
    }

    pub fn tree(&self) -> &'a ModuleTree {
        self.resolver.tree()
    }

    /// Imports recorded so far
    pub fn tables(&self) -> &ImportTables {
        &self.tables
    }

    /// `use path as alias` (or `pub use` if `reexport`) in `importing`.
    ///
    /// The name defaults to the path's last segment. Importing the same target under the same
    /// name again is fine; a different target under an explicitly imported name is a
    /// [ImportError::Conflict].
    pub fn bring_into_scope(
        &mut self,
        importing: ScopeId,
        path: &Path,
        alias: Option<Name>,
        reexport: bool
    ) -> Result<DeclId, ImportError> {
        let target = self.resolver.resolve(path, importing)?;
        let alias = alias.unwrap_or_else(|| path.last().clone());
        log::trace!(
            "{}use {} as {} in {}",
            if reexport { "pub " } else { "" },
            path,
            alias,
            self.tree().display_scope(importing)
        );
        self.tables.get_mut(importing)
            .insert_explicit(alias.clone(), target, reexport)
            .map_err(|existing| ImportError::Conflict { alias, scope: importing, existing, incoming: target })?;
        Ok(target)
    }

    /// Finish collecting: globs pick up re-exports recorded after them
    pub fn finish(mut self) -> ImportTables {
        self.settle_globs();
        self.tables
    }

    /// Stop collecting for now, to [Self::resume] later. Globs are not settled
    pub(crate) fn suspend(self) -> ImportTables {
        self.tables
    }
}
