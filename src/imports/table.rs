use indexmap::{IndexMap, IndexSet};
use smallvec::{smallvec, SmallVec};

use crate::names::Name;
use crate::tree::{DeclId, ModuleTree, ScopeId};

/// What a name brought into a scope by `use` points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEntry {
    /// `use path as alias`. `reexport` makes it visible to whoever can see the importing scope
    Explicit { target: DeclId, reexport: bool },
    /// Brought in by `use source::*`
    Glob { target: DeclId, source: ScopeId },
    /// Brought in by several globs which disagree. Any lookup of the name is an error
    Ambiguous { candidates: SmallVec<[GlobCandidate; 2]> },
}

/// One glob's claim on an ambiguous name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobCandidate {
    pub target: DeclId,
    /// The scope which was glob-imported
    pub source: ScopeId,
}

/// Names a scope has imported, in the order they were first imported
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: IndexMap<Name, ImportEntry>,
}

/// The import table of every scope in a tree
#[derive(Debug, Clone, Default)]
pub struct ImportTables {
    tables: Vec<ImportTable>,
    /// `(importing, target)` of every glob import, in the order they were issued
    globs: IndexSet<(ScopeId, ScopeId)>,
}

/// What happened when a glob offered a name to an [ImportTable]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobInsert {
    Inserted,
    /// An explicit import already owns the name
    Shadowed,
    /// Same name, same target: nothing to do
    AlreadyPresent,
    MadeAmbiguous,
}

impl ImportEntry {
    /// The declaration this name refers to, `None` if ambiguous
    pub fn target(&self) -> Option<DeclId> {
        match self {
            ImportEntry::Explicit { target, .. } | ImportEntry::Glob { target, .. } => Some(*target),
            ImportEntry::Ambiguous { .. } => None,
        }
    }

    pub fn is_reexport(&self) -> bool {
        matches!(self, ImportEntry::Explicit { reexport: true, .. })
    }
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, alias: &str) -> Option<&ImportEntry> {
        self.entries.get(alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &ImportEntry)> + '_ {
        self.entries.iter()
    }

    /// Aliases visible to the importing scope's own clients, and what they point at
    pub fn reexports(&self) -> impl Iterator<Item = (&Name, DeclId)> + '_ {
        self.entries.iter().filter_map(|(alias, entry)| match entry {
            ImportEntry::Explicit { target, reexport: true } => Some((alias, *target)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an explicit import. Replaces glob-introduced entries.
    ///
    /// Returns the existing target if `alias` is already explicitly imported from something else,
    /// in which case nothing changes. Importing the same target again is a no-op, except that
    /// `reexport` can widen an existing entry to a re-export.
    pub(crate) fn insert_explicit(&mut self, alias: Name, target: DeclId, reexport: bool) -> Result<(), DeclId> {
        match self.entries.get_mut(&alias) {
            Some(ImportEntry::Explicit { target: existing, .. }) if *existing != target => Err(*existing),
            Some(ImportEntry::Explicit { reexport: existing_reexport, .. }) => {
                *existing_reexport |= reexport;
                Ok(())
            }
            Some(entry) => {
                *entry = ImportEntry::Explicit { target, reexport };
                Ok(())
            }
            None => {
                self.entries.insert(alias, ImportEntry::Explicit { target, reexport });
                Ok(())
            }
        }
    }

    /// Offer a glob-imported name. Never overrides an explicit import.
    pub(crate) fn insert_glob(&mut self, name: Name, target: DeclId, source: ScopeId) -> GlobInsert {
        let candidate = GlobCandidate { target, source };
        let Some(entry) = self.entries.get_mut(&name) else {
            self.entries.insert(name, ImportEntry::Glob { target, source });
            return GlobInsert::Inserted
        };
        match *entry {
            ImportEntry::Explicit { .. } => GlobInsert::Shadowed,
            ImportEntry::Glob { target: existing, .. } if existing == target => GlobInsert::AlreadyPresent,
            ImportEntry::Glob { target: existing, source: existing_source } => {
                *entry = ImportEntry::Ambiguous {
                    candidates: smallvec![GlobCandidate { target: existing, source: existing_source }, candidate]
                };
                GlobInsert::MadeAmbiguous
            }
            ImportEntry::Ambiguous { ref mut candidates } => {
                if candidates.iter().any(|existing| existing.target == target) {
                    GlobInsert::AlreadyPresent
                } else {
                    candidates.push(candidate);
                    GlobInsert::MadeAmbiguous
                }
            }
        }
    }
}

impl ImportTables {
    /// Empty tables for every scope of `tree`
    pub fn new(tree: &ModuleTree) -> Self {
        Self {
            tables: vec![ImportTable::new(); tree.num_scopes()],
            globs: IndexSet::new(),
        }
    }

    /// Glob imports recorded so far, as `(importing, target)`
    pub fn globs(&self) -> impl Iterator<Item = (ScopeId, ScopeId)> + '_ {
        self.globs.iter().copied()
    }

    pub(crate) fn record_glob(&mut self, importing: ScopeId, target: ScopeId) {
        self.globs.insert((importing, target));
    }

    pub fn get(&self, scope: ScopeId) -> &ImportTable {
        &self.tables[scope.index()]
    }

    pub(crate) fn get_mut(&mut self, scope: ScopeId) -> &mut ImportTable {
        &mut self.tables[scope.index()]
    }
}
