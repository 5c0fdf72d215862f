use std::fmt::{Display, Formatter};

use smallvec::SmallVec;

use crate::imports::ImportError;
use crate::names::Name;
use crate::resolve::ResolutionError;
use crate::tree::{DuplicateNameError, ModuleTree, ScopeId, Visibility};

/// A resolution failure described for a user: scopes and declarations spelled out as paths,
/// plus notes like where a private item was declared.
///
/// Rendering (source snippets, colors) is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic level AKA error, warning, info, or debug
    pub level: DiagnosticLevel,
    /// Diagnostic message (formatted string)
    pub message: String,
    /// Ex: hints or root causes
    pub additional_info: SmallVec<[AdditionalInfo; 4]>,
}

/// Diagnostic level: how important is the diagnostic, and is it a bad thing or just debug message?
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Diagnostic must be fixed, prevents successful compilation
    Error,
    /// Diagnostic should be fixed but doesn't prevent successful compilation
    Warning,
    /// Diagnostic doesn't have to be addressed, is shown to the user
    Info,
    /// Diagnostic doesn't have to be addressed and is only shown in debug mode
    Debug,
}

/// Additional info tied to diagnostics like hints or root causes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInfo {
    /// Whether this is a hint, note, or root cause
    pub type_: AdditionalInfoType,
    pub message: String,
}

/// Type of additional info tied to diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdditionalInfoType {
    /// This points towards the root cause or a contributing cause
    Issue,
    /// This is a suggestion for how to fix the diagnostic
    Hint,
    /// Any other type of additional info which isn't a hint or issue
    Note,
}

/// Errors which can be described as a [Diagnostic] given the tree they came from
pub trait ToDiagnostic {
    fn to_diagnostic(&self, tree: &ModuleTree) -> Diagnostic;
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            additional_info: SmallVec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }

    pub fn with_info(mut self, type_: AdditionalInfoType, message: impl Into<String>) -> Self {
        self.additional_info.push(AdditionalInfo { type_, message: message.into() });
        self
    }

    pub fn with_issue(self, message: impl Into<String>) -> Self {
        self.with_info(AdditionalInfoType::Issue, message)
    }

    pub fn with_hint(self, message: impl Into<String>) -> Self {
        self.with_info(AdditionalInfoType::Hint, message)
    }

    pub fn with_note(self, message: impl Into<String>) -> Self {
        self.with_info(AdditionalInfoType::Note, message)
    }

    /// Print the diagnostic using the [log] crate.
    pub fn log_to_rust(&self) {
        log::log!(self.level.rust_log_level(), "{}", DisplayDiagnosticWithoutLevel(self));
    }
}

impl DiagnosticLevel {
    pub fn rust_log_level(&self) -> log::Level {
        match self {
            DiagnosticLevel::Error => log::Level::Error,
            DiagnosticLevel::Warning => log::Level::Warn,
            DiagnosticLevel::Info => log::Level::Info,
            DiagnosticLevel::Debug => log::Level::Debug,
        }
    }
}

/// Display a diagnostic without its log level. Used internally to abstract regular printing and
/// [Diagnostic::log_to_rust]
struct DisplayDiagnosticWithoutLevel<'a>(&'a Diagnostic);

impl<'a> Display for DisplayDiagnosticWithoutLevel<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.message)?;
        for info in &self.0.additional_info {
            write!(f, "\n  {}", info)?;
        }
        Ok(())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.level, DisplayDiagnosticWithoutLevel(self))
    }
}

impl Display for DiagnosticLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Debug => "debug",
        })
    }
}

impl Display for AdditionalInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self.type_ {
            AdditionalInfoType::Issue => "issue",
            AdditionalInfoType::Hint => "hint",
            AdditionalInfoType::Note => "note",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

impl ToDiagnostic for ResolutionError {
    fn to_diagnostic(&self, tree: &ModuleTree) -> Diagnostic {
        match self {
            ResolutionError::UnresolvedSegment { name, at_scope } => {
                let diagnostic = Diagnostic::error(format!(
                    "cannot find `{}` in `{}`",
                    name,
                    tree.display_scope(*at_scope)
                ));
                match similar_name(tree, *at_scope, name) {
                    Some(similar) => diagnostic.with_hint(format!("a similar name exists: `{}`", similar)),
                    None => diagnostic,
                }
            }
            ResolutionError::NotAModule { name, decl } => Diagnostic::error(format!(
                "expected module, found {} `{}`",
                tree.decl(*decl).kind_str(),
                name
            )).with_note(format!("`{}` is declared here", tree.display_decl(*decl))),
            ResolutionError::PrivateItem { name, decl, declaring_scope } => {
                let diagnostic = Diagnostic::error(format!("{} `{}` is private", tree.decl(*decl).kind_str(), name))
                    .with_note(format!("`{}` is declared in `{}`", name, tree.display_scope(*declaring_scope)));
                match tree.decl(*decl).visibility {
                    Visibility::Private => diagnostic.with_hint(format!(
                        "it can only be named from within `{}`",
                        tree.display_scope(*declaring_scope)
                    )),
                    Visibility::PublicRestricted(restricted_to) => diagnostic.with_hint(format!(
                        "it can only be named from within `{}`",
                        tree.display_scope(restricted_to)
                    )),
                    Visibility::Public => diagnostic,
                }
            }
            ResolutionError::TooManySupers { requested, available } => Diagnostic::error(
                "too many `super`s in path"
            ).with_issue(format!(
                "went up {} scope(s) but there are only {} above",
                requested,
                available
            )),
            ResolutionError::UnknownRoot { name } => {
                let diagnostic = Diagnostic::error(format!("unknown root `{}`", name));
                match tree.crate_name() {
                    Some(crate_name) => diagnostic.with_note(format!("only `{}` can be named this way", crate_name)),
                    None => diagnostic,
                }
            }
            ResolutionError::AmbiguousGlobImport { name, candidates } => {
                let mut diagnostic = Diagnostic::error(format!("`{}` is ambiguous", name));
                for candidate in candidates {
                    diagnostic = diagnostic.with_issue(format!(
                        "it could refer to `{}`, brought in by a glob import",
                        tree.display_decl(*candidate)
                    ));
                }
                diagnostic.with_hint(format!("import `{}` explicitly to choose one", name))
            }
        }
    }
}

impl ToDiagnostic for ImportError {
    fn to_diagnostic(&self, tree: &ModuleTree) -> Diagnostic {
        match self {
            ImportError::Unresolved(error) => {
                let mut diagnostic = error.to_diagnostic(tree);
                diagnostic.message = format!("unresolved import: {}", diagnostic.message);
                diagnostic
            }
            ImportError::Conflict { alias, scope, existing, incoming } => Diagnostic::error(format!(
                "`{}` is imported more than once in `{}`",
                alias,
                tree.display_scope(*scope)
            ))
                .with_note(format!("first imported from `{}`", tree.display_decl(*existing)))
                .with_issue(format!("then from `{}`", tree.display_decl(*incoming)))
                .with_hint("import one of them under a different name"),
        }
    }
}

impl ToDiagnostic for DuplicateNameError {
    fn to_diagnostic(&self, tree: &ModuleTree) -> Diagnostic {
        let diagnostic = Diagnostic::error(format!(
            "`{}` is declared more than once in `{}`",
            self.name,
            tree.display_scope(self.scope)
        ));
        match tree.lookup_local(self.scope, self.name.as_str()) {
            Some(first) => diagnostic.with_note(format!(
                "first declared as a {} here",
                tree.decl(first).kind_str()
            )),
            None => diagnostic,
        }
    }
}

/// A name declared in `scope` which `name` is probably a typo of
fn similar_name<'a>(tree: &'a ModuleTree, scope: ScopeId, name: &Name) -> Option<&'a Name> {
    tree.items(scope).names().find(|candidate| {
        candidate.as_str().eq_ignore_ascii_case(name.as_str()) || is_one_edit_apart(candidate.as_str(), name.as_str())
    })
}

/// Whether `a` and `b` differ by exactly one inserted, removed or replaced character
fn is_one_edit_apart(a: &str, b: &str) -> bool {
    let (a, b) = (a.chars().collect::<Vec<_>>(), b.chars().collect::<Vec<_>>());
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if longer.len() - shorter.len() > 1 {
        return false;
    }
    let prefix = shorter.iter().zip(longer.iter()).take_while(|(x, y)| x == y).count();
    if shorter.len() == longer.len() {
        prefix < shorter.len() && shorter[prefix + 1..] == longer[prefix + 1..]
    } else {
        shorter[prefix..] == longer[prefix + 1..]
    }
}
